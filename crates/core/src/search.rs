//! Read-only querying over the record store.
//!
//! The index holds no state of its own: every call reads the store's
//! current contents, so results are never stale. Matching is
//! case-insensitive substring containment.

use crate::record::PatientRecord;
use crate::store::RecordStore;

/// Read-only view over a [`RecordStore`].
#[derive(Debug, Clone, Copy)]
pub struct SearchIndex<'a> {
    store: &'a RecordStore,
}

impl<'a> SearchIndex<'a> {
    pub fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    /// Returns all records whose name contains `query`, case-insensitively.
    ///
    /// An empty (or all-whitespace) query matches every record. No match
    /// yields an empty vector, not an error. Results keep store order.
    pub fn search(&self, query: &str) -> Vec<PatientRecord> {
        let needle = query.trim().to_lowercase();
        self.store
            .list_all()
            .into_iter()
            .filter(|r| needle.is_empty() || r.name.as_str().to_lowercase().contains(&needle))
            .collect()
    }

    /// Like [`search`](Self::search), but also matches the id and contact
    /// fields.
    pub fn search_any(&self, query: &str) -> Vec<PatientRecord> {
        let needle = query.trim().to_lowercase();
        self.store
            .list_all()
            .into_iter()
            .filter(|r| {
                needle.is_empty()
                    || r.name.as_str().to_lowercase().contains(&needle)
                    || r.id.to_string().to_lowercase().contains(&needle)
                    || r.contact.as_str().to_lowercase().contains(&needle)
            })
            .collect()
    }
}
