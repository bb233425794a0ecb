//! Dashboard statistics derived from the record store.
//!
//! All aggregations are pure functions of the store's current contents;
//! nothing here caches or persists anything.

use crate::record::{PatientRecord, ParseFieldError};
use crate::store::RecordStore;
use std::collections::BTreeMap;

/// Bucket used for records where the grouped field is unset, so category
/// counts always add up to the total.
pub const UNKNOWN_BUCKET: &str = "unknown";

/// A categorical record field that [`StatsAggregator::count_by_category`]
/// can group on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryField {
    Gender,
    BloodType,
    AdmissionStatus,
    Ward,
}

impl CategoryField {
    pub fn label(&self) -> &'static str {
        match self {
            CategoryField::Gender => "gender",
            CategoryField::BloodType => "blood-type",
            CategoryField::AdmissionStatus => "status",
            CategoryField::Ward => "ward",
        }
    }

    fn bucket_of(&self, record: &PatientRecord) -> String {
        match self {
            CategoryField::Gender => record
                .gender
                .map(|g| g.label().to_string())
                .unwrap_or_else(|| UNKNOWN_BUCKET.to_string()),
            CategoryField::BloodType => record
                .blood_type
                .map(|b| b.label().to_string())
                .unwrap_or_else(|| UNKNOWN_BUCKET.to_string()),
            CategoryField::AdmissionStatus => record.admission_status.label().to_string(),
            CategoryField::Ward => record
                .admission_status
                .ward()
                .map(|w| w.as_str().to_string())
                .unwrap_or_else(|| UNKNOWN_BUCKET.to_string()),
        }
    }
}

impl std::fmt::Display for CategoryField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for CategoryField {
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gender" => Ok(CategoryField::Gender),
            "blood-type" | "blood_type" => Ok(CategoryField::BloodType),
            "status" | "admission-status" => Ok(CategoryField::AdmissionStatus),
            "ward" => Ok(CategoryField::Ward),
            _ => Err(ParseFieldError::new("category field", s)),
        }
    }
}

/// Computes dashboard figures over a [`RecordStore`].
#[derive(Debug, Clone, Copy)]
pub struct StatsAggregator<'a> {
    store: &'a RecordStore,
}

impl<'a> StatsAggregator<'a> {
    pub fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    /// Number of records currently in the store.
    pub fn total_count(&self) -> usize {
        self.store.len()
    }

    /// Number of records currently admitted to a ward.
    pub fn admitted_count(&self) -> usize {
        self.store
            .list_all()
            .iter()
            .filter(|r| r.admission_status.ward().is_some())
            .count()
    }

    /// Maps each distinct value of `field` to the number of records holding
    /// it. Records with the field unset land in [`UNKNOWN_BUCKET`].
    pub fn count_by_category(&self, field: CategoryField) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for record in self.store.list_all() {
            *counts.entry(field.bucket_of(&record)).or_insert(0) += 1;
        }
        counts
    }

    /// The `n` most recently registered records, newest first.
    ///
    /// Ties on the timestamp are broken towards the later insertion.
    pub fn recently_registered(&self, n: usize) -> Vec<PatientRecord> {
        let mut records = self.store.list_all();
        // list_all is insertion-ordered, so a stable sort on the timestamp
        // alone keeps later insertions after earlier ones; reverse afterwards.
        records.sort_by_key(|r| r.registered_at);
        records.reverse();
        records.truncate(n);
        records
    }
}
