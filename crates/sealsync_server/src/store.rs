//! The authoritative record.

use parking_lot::RwLock;
use sealsync_protocol::Record;
use tracing::info;

/// Holds the single authoritative record. Writes replace it wholesale.
#[derive(Debug)]
pub struct RecordStore {
    record: RwLock<Record>,
}

impl RecordStore {
    /// Creates a store holding `initial`.
    pub fn new(initial: Record) -> Self {
        Self {
            record: RwLock::new(initial),
        }
    }

    /// Returns the current record.
    pub fn get(&self) -> Record {
        self.record.read().clone()
    }

    /// Replaces the record, returning the stored value.
    pub fn replace(&self, record: Record) -> Record {
        let mut guard = self.record.write();
        *guard = record;
        info!(len = guard.data.len(), "authoritative record replaced");
        guard.clone()
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new(Record::new("Hello World!"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins() {
        let store = RecordStore::default();
        assert_eq!(store.get().data, "Hello World!");

        store.replace(Record::new("A"));
        let stored = store.replace(Record::new("B"));
        assert_eq!(stored, Record::new("B"));
        assert_eq!(store.get(), Record::new("B"));
    }
}
