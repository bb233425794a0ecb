//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into
//! the registry components. Nothing in this crate reads environment
//! variables during an operation, which keeps behaviour consistent across
//! threads and test harnesses.

use crate::error::{RegistryError, RegistryResult};
use std::path::{Path, PathBuf};

/// File name of the registry snapshot inside the data directory.
pub const SNAPSHOT_FILE_NAME: &str = "patients.json";

/// File name of the activity feed inside the data directory.
pub const ACTIVITY_FILE_NAME: &str = "activity.log";

/// Core configuration resolved at startup.
///
/// A config without a data directory yields a purely in-memory registry,
/// which is what the test suites use.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: Option<PathBuf>,
}

impl CoreConfig {
    /// Create a new `CoreConfig` backed by `data_dir`.
    ///
    /// The directory does not have to exist yet; it is created on the first
    /// write. A path pointing at an existing regular file is rejected.
    pub fn new(data_dir: PathBuf) -> RegistryResult<Self> {
        if data_dir.as_os_str().is_empty() {
            return Err(RegistryError::Validation(
                "data directory cannot be empty".into(),
            ));
        }
        if data_dir.is_file() {
            return Err(RegistryError::Validation(format!(
                "data directory {} is an existing file",
                data_dir.display()
            )));
        }
        Ok(Self {
            data_dir: Some(data_dir),
        })
    }

    /// Create a config with no backing directory; nothing is persisted.
    pub fn in_memory() -> Self {
        Self { data_dir: None }
    }

    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    /// Path of the registry snapshot file, when a data directory is set.
    pub fn snapshot_path(&self) -> Option<PathBuf> {
        self.data_dir.as_ref().map(|d| d.join(SNAPSHOT_FILE_NAME))
    }

    /// Path of the activity feed file, when a data directory is set.
    pub fn activity_log_path(&self) -> Option<PathBuf> {
        self.data_dir.as_ref().map(|d| d.join(ACTIVITY_FILE_NAME))
    }
}
