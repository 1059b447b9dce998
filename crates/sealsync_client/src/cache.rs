//! The persisted last-produced signature.

use crate::error::ChannelResult;
use crate::local::LocalState;
use sealsync_protocol::Signature;
use tracing::debug;

/// Holds the most recently produced signature.
///
/// A signature presented for verification is only considered if it equals
/// this value.
#[derive(Debug, Clone)]
pub struct SignatureCache {
    state: LocalState,
}

impl SignatureCache {
    /// Creates a cache over the given state.
    pub fn new(state: LocalState) -> Self {
        Self { state }
    }

    /// Records `signature` as the latest one.
    pub fn remember(&self, signature: &Signature) -> ChannelResult<()> {
        self.state.store_signature(signature)?;
        debug!("cached signature updated");
        Ok(())
    }

    /// Returns the latest signature, if any.
    pub fn last(&self) -> ChannelResult<Option<Signature>> {
        self.state.signature()
    }

    /// Returns true if `signature` is the latest one.
    pub fn matches(&self, signature: &Signature) -> ChannelResult<bool> {
        Ok(self.last()?.as_ref() == Some(signature))
    }
}
