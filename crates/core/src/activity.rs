//! Recent-activity feed for the dashboard.
//!
//! Keeps the latest [`ActivityLog::CAPACITY`] entries in memory, newest
//! first. When the configuration carries a data directory, entries are also
//! appended to a plain-text log file (one tab-separated line per entry) so
//! short-lived CLI invocations still build up a useful feed. Append
//! failures are logged and otherwise ignored; the feed is informational and
//! must never fail a registry mutation.

use crate::config::CoreConfig;
use crate::error::{RegistryError, RegistryResult};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::fs;
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

/// One timestamped activity message.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ActivityEntry {
    pub at: DateTime<Utc>,
    pub message: String,
}

/// Capped feed of recent registry activity.
#[derive(Debug)]
pub struct ActivityLog {
    cfg: Arc<CoreConfig>,
    entries: Mutex<VecDeque<ActivityEntry>>,
}

impl ActivityLog {
    /// Maximum number of entries retained.
    pub const CAPACITY: usize = 64;

    /// Opens the feed, loading the tail of an existing log file if present.
    ///
    /// Lines that fail to parse are skipped with a warning, in the same
    /// spirit as skipping unreadable record files elsewhere.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::FileRead` if an existing log file cannot be
    /// read at all. A missing file is not an error.
    pub fn open(cfg: Arc<CoreConfig>) -> RegistryResult<Self> {
        let mut entries = VecDeque::new();

        if let Some(path) = cfg.activity_log_path() {
            if path.is_file() {
                let contents = fs::read_to_string(&path).map_err(RegistryError::FileRead)?;
                for line in contents.lines() {
                    match parse_line(line) {
                        Some(entry) => {
                            entries.push_front(entry);
                            entries.truncate(Self::CAPACITY);
                        }
                        None => {
                            tracing::warn!("skipping malformed activity line: {line:?}");
                        }
                    }
                }
            }
        }

        Ok(Self {
            cfg,
            entries: Mutex::new(entries),
        })
    }

    /// Creates a feed with no backing file.
    pub fn in_memory() -> Self {
        Self {
            cfg: Arc::new(CoreConfig::in_memory()),
            entries: Mutex::new(VecDeque::new()),
        }
    }

    /// Records an activity message, timestamped now.
    pub fn record(&self, message: impl Into<String>) {
        // Newlines would corrupt the line-oriented log file.
        let message = message.into().replace(['\n', '\r'], " ");
        let entry = ActivityEntry {
            at: Utc::now(),
            message,
        };

        if let Some(path) = self.cfg.activity_log_path() {
            if let Err(e) = append_line(&path, &entry) {
                tracing::warn!("failed to append activity entry: {e}");
            }
        }

        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        entries.push_front(entry);
        entries.truncate(Self::CAPACITY);
    }

    /// Returns the retained entries, newest first.
    pub fn entries(&self) -> Vec<ActivityEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }
}

fn parse_line(line: &str) -> Option<ActivityEntry> {
    let (timestamp, message) = line.split_once('\t')?;
    let at = DateTime::parse_from_rfc3339(timestamp).ok()?;
    Some(ActivityEntry {
        at: at.with_timezone(&Utc),
        message: message.to_string(),
    })
}

fn append_line(path: &std::path::Path, entry: &ActivityEntry) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}\t{}", entry.at.to_rfc3339(), entry.message)
}
