//! # HPMS Core
//!
//! Core data service for the hospital patient management registry.
//!
//! This crate contains pure data operations:
//! - [`RecordStore`]: authoritative, mutex-guarded storage of patient
//!   records with an optional JSON snapshot on disk
//! - [`SearchIndex`]: read-only substring search over the store
//! - [`StatsAggregator`]: on-demand dashboard figures
//! - [`ActivityLog`]: capped recent-activity feed
//! - [`export::write_csv`]: CSV export of the registry
//!
//! **No presentation concerns**: forms, tables and command parsing belong
//! to the embedding presentation layer (the `hpms` binary), which receives
//! an explicitly constructed [`CoreConfig`] and store rather than reaching
//! for process-wide state.

pub mod activity;
pub mod config;
pub mod error;
pub mod export;
pub mod record;
pub mod search;
pub mod stats;
pub mod store;

pub use activity::{ActivityEntry, ActivityLog};
pub use config::CoreConfig;
pub use error::{RegistryError, RegistryResult};
pub use hpms_types::{Age, AgeError, NonEmptyText, TextError};
pub use record::{
    AdmissionStatus, BloodType, Gender, NewPatient, ParseFieldError, PatientId, PatientRecord,
    PatientUpdate,
};
pub use search::SearchIndex;
pub use stats::{CategoryField, StatsAggregator, UNKNOWN_BUCKET};
pub use store::RecordStore;
