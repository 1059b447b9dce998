//! Persisted client state.

use crate::error::ChannelResult;
use sealsync_protocol::{Payload, ProtocolError, Signature};
use sealsync_storage::StateBackend;
use std::fmt;
use std::sync::Arc;

/// Slot holding the exported signing key.
pub(crate) const KEY_SLOT: &str = "secret-key";
/// Slot holding the canonical bytes of the last record.
pub(crate) const RECORD_SLOT: &str = "data";
/// Slot holding the last produced signature.
pub(crate) const SIGNATURE_SLOT: &str = "signature";

/// The three persisted slots of a client: exported key, last record and
/// last signature.
///
/// Cloning is cheap; clones share the same backend.
#[derive(Clone)]
pub struct LocalState {
    backend: Arc<dyn StateBackend>,
}

impl LocalState {
    /// Wraps a backend.
    pub fn new(backend: impl StateBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Wraps an already shared backend.
    pub fn from_shared(backend: Arc<dyn StateBackend>) -> Self {
        Self { backend }
    }

    pub(crate) fn exported_key(&self) -> ChannelResult<Option<Vec<u8>>> {
        Ok(self.backend.get(KEY_SLOT)?)
    }

    pub(crate) fn store_exported_key(&self, exported: &[u8]) -> ChannelResult<()> {
        Ok(self.backend.put(KEY_SLOT, exported)?)
    }

    /// Returns true if a signing key has been persisted.
    pub fn has_key(&self) -> ChannelResult<bool> {
        Ok(self.backend.get(KEY_SLOT)?.is_some())
    }

    /// Returns the canonical bytes of the cached record, if any.
    pub fn record_bytes(&self) -> ChannelResult<Option<Vec<u8>>> {
        Ok(self.backend.get(RECORD_SLOT)?)
    }

    /// Decodes the cached record, if any.
    pub fn record<P: Payload>(&self) -> ChannelResult<Option<P>> {
        match self.record_bytes()? {
            Some(bytes) => Ok(Some(P::from_canonical(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Persists a record in canonical form.
    pub fn store_record<P: Payload>(&self, record: &P) -> ChannelResult<()> {
        let bytes = record.canonical_bytes()?;
        self.store_record_bytes(&bytes)
    }

    pub(crate) fn store_record_bytes(&self, bytes: &[u8]) -> ChannelResult<()> {
        Ok(self.backend.put(RECORD_SLOT, bytes)?)
    }

    /// Returns the last persisted signature, if any.
    pub fn signature(&self) -> ChannelResult<Option<Signature>> {
        match self.backend.get(SIGNATURE_SLOT)? {
            Some(bytes) => {
                let text = String::from_utf8(bytes).map_err(ProtocolError::from)?;
                Ok(Some(Signature::from_wire(text)))
            }
            None => Ok(None),
        }
    }

    pub(crate) fn store_signature(&self, signature: &Signature) -> ChannelResult<()> {
        Ok(self.backend.put(SIGNATURE_SLOT, signature.as_str().as_bytes())?)
    }

    /// Removes every slot.
    pub fn clear(&self) -> ChannelResult<()> {
        Ok(self.backend.clear()?)
    }
}

impl fmt::Debug for LocalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalState").finish_non_exhaustive()
    }
}
