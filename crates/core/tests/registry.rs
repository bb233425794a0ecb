//! End-to-end registry behaviour across store, search and stats.

use hpms_core::{
    Age, CoreConfig, NewPatient, NonEmptyText, PatientUpdate, RecordStore, RegistryError,
    SearchIndex, StatsAggregator,
};
use std::sync::Arc;
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
fn register_search_count_delete_scenario() {
    let store = RecordStore::in_memory();

    let alice = store
        .register(new_patient("Alice", 30))
        .expect("register should succeed");
    store
        .register(new_patient("bob", 45))
        .expect("register should succeed");

    let index = SearchIndex::new(&store);
    let hits = index.search("al");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, alice.id);

    let stats = StatsAggregator::new(&store);
    assert_eq!(stats.total_count(), 2);

    store.delete(alice.id).expect("delete should succeed");
    assert_eq!(stats.total_count(), 1);

    let err = store
        .get(alice.id)
        .expect_err("get after delete should fail");
    assert!(matches!(err, RegistryError::NotFound(_)));
}

#[test]
fn persistent_registry_round_trip() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let cfg =
        Arc::new(CoreConfig::new(temp_dir.path().to_path_buf()).expect("config should build"));

    let alice_id = {
        let store = RecordStore::open(cfg.clone()).expect("open should succeed");
        let alice = store
            .register(new_patient("Alice", 30))
            .expect("register should succeed");
        store
            .register(new_patient("Bob", 45))
            .expect("register should succeed");

        store
            .update(
                alice.id,
                PatientUpdate {
                    age: Some(Age::new(31).expect("age should be valid")),
                    ..PatientUpdate::default()
                },
            )
            .expect("update should succeed");
        alice.id
    };

    let reopened = RecordStore::open(cfg).expect("reopen should succeed");
    assert_eq!(reopened.len(), 2);

    let alice = reopened.get(alice_id).expect("get should succeed");
    assert_eq!(alice.age.years(), 31, "update should survive reopen");
    assert_eq!(alice.name.as_str(), "Alice");

    let index = SearchIndex::new(&reopened);
    assert_eq!(index.search("").len(), 2, "empty query returns everything");
}
