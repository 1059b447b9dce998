//! State backend trait definition.

use crate::error::{StorageError, StorageResult};
use std::sync::Arc;

/// A slot-addressed byte store for persisted client state.
///
/// Backends are **opaque byte stores**. The client decides which slots exist
/// and how their contents are encoded; a backend only guarantees that a value
/// written under a slot reads back byte-identical until it is replaced,
/// removed or cleared.
///
/// # Invariants
///
/// - `get` returns exactly the bytes last passed to `put` for that slot
/// - `remove` of a missing slot is not an error
/// - `clear` removes every slot this backend owns
/// - Backends must be `Send + Sync`; writes take `&self`
///
/// # Implementors
///
/// - [`super::InMemoryBackend`] - For testing
/// - [`super::FileBackend`] - For persistent storage
pub trait StateBackend: Send + Sync {
    /// Reads the value stored under `slot`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot name is invalid or an I/O error occurs.
    fn get(&self, slot: &str) -> StorageResult<Option<Vec<u8>>>;

    /// Stores `value` under `slot`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot name is invalid or an I/O error occurs.
    fn put(&self, slot: &str, value: &[u8]) -> StorageResult<()>;

    /// Removes the value stored under `slot`.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot name is invalid or an I/O error occurs.
    fn remove(&self, slot: &str) -> StorageResult<()>;

    /// Removes every stored slot.
    ///
    /// # Errors
    ///
    /// Returns an error if an I/O error occurs.
    fn clear(&self) -> StorageResult<()>;
}

impl<B: StateBackend + ?Sized> StateBackend for Arc<B> {
    fn get(&self, slot: &str) -> StorageResult<Option<Vec<u8>>> {
        (**self).get(slot)
    }

    fn put(&self, slot: &str, value: &[u8]) -> StorageResult<()> {
        (**self).put(slot, value)
    }

    fn remove(&self, slot: &str) -> StorageResult<()> {
        (**self).remove(slot)
    }

    fn clear(&self) -> StorageResult<()> {
        (**self).clear()
    }
}

/// Checks that a slot name is non-empty and only uses `[A-Za-z0-9_-]`.
///
/// Slot names double as file names for [`super::FileBackend`], so the same
/// rule applies to every backend.
///
/// # Errors
///
/// Returns [`StorageError::InvalidSlot`] when the name is rejected.
pub fn validate_slot(slot: &str) -> StorageResult<()> {
    let valid = !slot.is_empty()
        && slot
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidSlot(slot.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_names() {
        assert!(validate_slot("secret-key").is_ok());
        assert!(validate_slot("data_v2").is_ok());
        assert!(validate_slot("").is_err());
        assert!(validate_slot("../escape").is_err());
        assert!(validate_slot("with space").is_err());
    }
}
