//! In-memory user records.

use indexmap::IndexMap;
use mpi_meta::Meta;
use parking_lot::Mutex;

/// User records keyed by gid, in insertion order.
#[derive(Debug, Default)]
pub struct Store {
    records: Mutex<IndexMap<String, Meta>>,
    issued: Mutex<u64>,
}

impl Store {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding two sample users.
    #[must_use]
    pub fn seeded() -> Self {
        let store = Self::new();
        store.insert(Meta::new("User").with_attr("name", "ann").with_tag("role", "admin"));
        store.insert(Meta::new("User").with_attr("name", "bob"));
        store
    }

    /// Stores `user` under a fresh gid and returns the stored record.
    pub fn insert(&self, user: Meta) -> Meta {
        let gid = {
            let mut issued = self.issued.lock();
            *issued += 1;
            format!("u{issued}")
        };
        let record = user.with_gid(gid.clone());
        self.records.lock().insert(gid, record.clone());
        record
    }

    /// Record with `gid`.
    #[must_use]
    pub fn get(&self, gid: &str) -> Option<Meta> {
        self.records.lock().get(gid).cloned()
    }

    /// Up to `limit` records, oldest first.
    #[must_use]
    pub fn list(&self, limit: usize) -> Vec<Meta> {
        self.records.lock().values().take(limit).cloned().collect()
    }

    /// Removes and returns the record with `gid`.
    pub fn remove(&self, gid: &str) -> Option<Meta> {
        self.records.lock().shift_remove(gid)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// True if there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every record.
    pub fn clear(&self) {
        self.records.lock().clear();
    }
}
