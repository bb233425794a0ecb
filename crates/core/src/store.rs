//! Authoritative storage of patient records.
//!
//! The [`RecordStore`] owns the canonical collection. All mutations and
//! reads go through a single mutex, so callers never observe a
//! half-written record. When the configuration carries a data directory,
//! the collection is mirrored to a JSON snapshot that is rewritten through
//! a temp-file rename after every successful mutation; a store built from
//! [`RecordStore::in_memory`] skips persistence entirely.
//!
//! Derived views ([`crate::SearchIndex`], [`crate::StatsAggregator`]) hold
//! no copies; they read through the store on every call.

use crate::config::CoreConfig;
use crate::error::{RegistryError, RegistryResult};
use crate::record::{NewPatient, PatientId, PatientRecord, PatientUpdate};
use std::fs;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// The canonical, insertion-ordered set of patient records.
#[derive(Debug)]
pub struct RecordStore {
    cfg: Arc<CoreConfig>,
    records: Mutex<Vec<PatientRecord>>,
}

impl RecordStore {
    /// Opens the store, loading the snapshot file if one exists.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::FileRead` / `Deserialization` if an existing
    /// snapshot cannot be loaded. A missing snapshot is not an error; the
    /// store starts empty.
    pub fn open(cfg: Arc<CoreConfig>) -> RegistryResult<Self> {
        let records = match cfg.snapshot_path() {
            Some(path) if path.is_file() => {
                let contents = fs::read_to_string(&path).map_err(RegistryError::FileRead)?;
                serde_json::from_str(&contents).map_err(RegistryError::Deserialization)?
            }
            _ => Vec::new(),
        };

        Ok(Self {
            cfg,
            records: Mutex::new(records),
        })
    }

    /// Creates a store with no backing file. Used by tests and embedders
    /// that manage persistence themselves.
    pub fn in_memory() -> Self {
        Self {
            cfg: Arc::new(CoreConfig::in_memory()),
            records: Mutex::new(Vec::new()),
        }
    }

    // Every mutation either completes or is rolled back before its error
    // propagates, so a poisoned guard still holds consistent data.
    fn lock(&self) -> MutexGuard<'_, Vec<PatientRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a new patient and returns the stored record.
    ///
    /// The identifier is assigned here and is unique across the store.
    /// Required-field validation happens at the type level (`NonEmptyText`,
    /// `Age`), so by the time a [`NewPatient`] exists it is well-formed.
    ///
    /// # Errors
    ///
    /// Returns a snapshot I/O error if persisting fails; the in-memory
    /// collection is rolled back first.
    pub fn register(&self, new: NewPatient) -> RegistryResult<PatientRecord> {
        let record = PatientRecord::create(new);

        let mut records = self.lock();
        records.push(record.clone());
        if let Err(e) = self.persist(&records) {
            records.pop();
            return Err(e);
        }

        tracing::info!(id = %record.id, "registered patient");
        Ok(record)
    }

    /// Returns a copy of the record with the given id.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` if the id is absent.
    pub fn get(&self, id: PatientId) -> RegistryResult<PatientRecord> {
        self.lock()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(RegistryError::NotFound(id))
    }

    /// Applies a partial update and returns the updated record.
    ///
    /// Fields left unset in `changes` keep their current values.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` if the id is absent, or a snapshot
    /// I/O error (with the in-memory record restored) if persisting fails.
    pub fn update(&self, id: PatientId, changes: PatientUpdate) -> RegistryResult<PatientRecord> {
        let mut records = self.lock();
        let pos = records
            .iter()
            .position(|r| r.id == id)
            .ok_or(RegistryError::NotFound(id))?;

        let previous = records[pos].clone();
        records[pos].apply(changes);
        if let Err(e) = self.persist(&records) {
            records[pos] = previous;
            return Err(e);
        }

        Ok(records[pos].clone())
    }

    /// Removes the record with the given id and returns it.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` if the id is absent. A second
    /// delete of the same id fails the same way rather than silently
    /// succeeding.
    pub fn delete(&self, id: PatientId) -> RegistryResult<PatientRecord> {
        let mut records = self.lock();
        let pos = records
            .iter()
            .position(|r| r.id == id)
            .ok_or(RegistryError::NotFound(id))?;

        let removed = records.remove(pos);
        if let Err(e) = self.persist(&records) {
            records.insert(pos, removed);
            return Err(e);
        }

        tracing::info!(id = %removed.id, "deleted patient");
        Ok(removed)
    }

    /// Returns all records in insertion order.
    pub fn list_all(&self) -> Vec<PatientRecord> {
        self.lock().clone()
    }

    /// Number of records currently in the store.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Rewrites the snapshot file to match `records`.
    ///
    /// Writes to a temp file in the same directory and renames it over the
    /// snapshot, so readers only ever see the old or the new contents.
    fn persist(&self, records: &[PatientRecord]) -> RegistryResult<()> {
        let Some(path) = self.cfg.snapshot_path() else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(RegistryError::FileWrite)?;
        }

        let json =
            serde_json::to_string_pretty(records).map_err(RegistryError::Serialization)?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(RegistryError::FileWrite)?;
        fs::rename(&tmp, &path).map_err(RegistryError::FileWrite)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{AdmissionStatus, Gender};
    use hpms_types::{Age, NonEmptyText};
    use tempfile::TempDir;

    fn new_patient(name: &str, age: u16) -> NewPatient {
        NewPatient {
            name: NonEmptyText::new(name).expect("name should be valid"),
            age: Age::new(age).expect("age should be valid"),
            contact: NonEmptyText::new("0700 000000").expect("contact should be valid"),
            gender: None,
            address: None,
            blood_type: None,
            medical_history: None,
        }
    }

    #[test]
    fn register_then_get_returns_matching_record() {
        let store = RecordStore::in_memory();

        let created = store
            .register(new_patient("Alice", 30))
            .expect("register should succeed");
        let fetched = store.get(created.id).expect("get should succeed");

        assert_eq!(fetched, created);
        assert_eq!(fetched.name.as_str(), "Alice");
        assert_eq!(fetched.age.years(), 30);
        assert_eq!(fetched.admission_status, AdmissionStatus::Registered);
    }

    #[test]
    fn register_assigns_unique_ids() {
        let store = RecordStore::in_memory();
        let a = store
            .register(new_patient("Alice", 30))
            .expect("register should succeed");
        let b = store
            .register(new_patient("Alice", 30))
            .expect("register should succeed");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn get_unknown_id_is_not_found() {
        let store = RecordStore::in_memory();
        let err = store
            .get(PatientId::new())
            .expect_err("get of unknown id should fail");
        assert!(matches!(err, RegistryError::NotFound(_)));
    }

    #[test]
    fn update_changes_only_the_given_fields() {
        let store = RecordStore::in_memory();
        let created = store
            .register(new_patient("Alice", 30))
            .expect("register should succeed");

        let updated = store
            .update(
                created.id,
                PatientUpdate {
                    age: Some(Age::new(31).expect("age should be valid")),
                    gender: Some(Gender::Female),
                    ..PatientUpdate::default()
                },
            )
            .expect("update should succeed");

        assert_eq!(updated.age.years(), 31);
        assert_eq!(updated.gender, Some(Gender::Female));
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.contact, created.contact);
        assert_eq!(updated.registered_at, created.registered_at);

        let fetched = store.get(created.id).expect("get should succeed");
        assert_eq!(fetched, updated);
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let store = RecordStore::in_memory();
        let err = store
            .update(PatientId::new(), PatientUpdate::default())
            .expect_err("update of unknown id should fail");
        assert!(matches!(err, RegistryError::NotFound(_)));
    }

    #[test]
    fn delete_removes_record_and_second_delete_fails() {
        let store = RecordStore::in_memory();
        let created = store
            .register(new_patient("Alice", 30))
            .expect("register should succeed");

        let removed = store.delete(created.id).expect("delete should succeed");
        assert_eq!(removed.id, created.id);

        let err = store
            .get(created.id)
            .expect_err("get after delete should fail");
        assert!(matches!(err, RegistryError::NotFound(_)));

        let err = store
            .delete(created.id)
            .expect_err("second delete should fail");
        assert!(matches!(err, RegistryError::NotFound(_)));
    }

    #[test]
    fn list_all_preserves_insertion_order() {
        let store = RecordStore::in_memory();
        let names = ["Alice", "Bob", "Carol"];
        for name in names {
            store
                .register(new_patient(name, 40))
                .expect("register should succeed");
        }

        let listed: Vec<String> = store
            .list_all()
            .into_iter()
            .map(|r| r.name.into_inner())
            .collect();
        assert_eq!(listed, names);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn snapshot_survives_reopen() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let cfg = Arc::new(
            CoreConfig::new(temp_dir.path().to_path_buf()).expect("config should build"),
        );

        let alice_id;
        {
            let store = RecordStore::open(cfg.clone()).expect("open should succeed");
            alice_id = store
                .register(new_patient("Alice", 30))
                .expect("register should succeed")
                .id;
            store
                .register(new_patient("Bob", 45))
                .expect("register should succeed");
        }

        let reopened = RecordStore::open(cfg).expect("reopen should succeed");
        assert_eq!(reopened.len(), 2);

        let listed = reopened.list_all();
        assert_eq!(listed[0].id, alice_id, "order should survive reopen");
        assert_eq!(listed[0].name.as_str(), "Alice");
        assert_eq!(listed[1].name.as_str(), "Bob");
    }

    #[test]
    fn open_rejects_corrupt_snapshot() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let cfg = Arc::new(
            CoreConfig::new(temp_dir.path().to_path_buf()).expect("config should build"),
        );
        std::fs::write(
            cfg.snapshot_path().expect("snapshot path should be set"),
            "not json",
        )
        .expect("should write file");

        let err = RecordStore::open(cfg).expect_err("open should fail on corrupt snapshot");
        assert!(matches!(err, RegistryError::Deserialization(_)));
    }

    #[test]
    fn stale_temp_file_does_not_shadow_snapshot() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let cfg = Arc::new(
            CoreConfig::new(temp_dir.path().to_path_buf()).expect("config should build"),
        );

        {
            let store = RecordStore::open(cfg.clone()).expect("open should succeed");
            store
                .register(new_patient("Alice", 30))
                .expect("register should succeed");
        }

        // Simulate a crash that left a half-written temp file behind.
        let snapshot = cfg.snapshot_path().expect("snapshot path should be set");
        std::fs::write(snapshot.with_extension("json.tmp"), "{ truncated")
            .expect("should write temp file");

        let reopened = RecordStore::open(cfg).expect("reopen should succeed");
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.list_all()[0].name.as_str(), "Alice");
    }
}
