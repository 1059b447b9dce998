//! In-memory state backend for testing.

use crate::backend::{validate_slot, StateBackend};
use crate::error::StorageResult;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// An in-memory state backend.
///
/// This backend keeps every slot in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Clients that deliberately forget their key on exit
///
/// # Thread Safety
///
/// This backend is thread-safe and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use sealsync_storage::{InMemoryBackend, StateBackend};
///
/// let backend = InMemoryBackend::new();
/// backend.put("data", br#"{"data":"x"}"#).unwrap();
/// assert_eq!(backend.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    slots: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl InMemoryBackend {
    /// Creates a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory backend with pre-existing slots.
    ///
    /// Useful for testing restart and corruption scenarios.
    #[must_use]
    pub fn with_slots<I, K, V>(slots: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Vec<u8>>,
    {
        let slots = slots
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            slots: RwLock::new(slots),
        }
    }

    /// Returns a copy of every stored slot.
    ///
    /// Useful for testing and debugging.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, Vec<u8>> {
        self.slots.read().clone()
    }

    /// Returns the number of stored slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    /// Returns true if no slot is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }
}

impl StateBackend for InMemoryBackend {
    fn get(&self, slot: &str) -> StorageResult<Option<Vec<u8>>> {
        validate_slot(slot)?;
        Ok(self.slots.read().get(slot).cloned())
    }

    fn put(&self, slot: &str, value: &[u8]) -> StorageResult<()> {
        validate_slot(slot)?;
        self.slots.write().insert(slot.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&self, slot: &str) -> StorageResult<()> {
        validate_slot(slot)?;
        self.slots.write().remove(slot);
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        self.slots.write().clear();
        Ok(())
    }
}
