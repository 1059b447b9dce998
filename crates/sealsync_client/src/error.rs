//! Error types for the client.

use sealsync_protocol::ProtocolError;
use sealsync_storage::StorageError;
use thiserror::Error;

/// Result type for channel operations.
pub type ChannelResult<T> = Result<T, ChannelError>;

/// Errors that can occur on a secure channel.
#[derive(Error, Debug)]
pub enum ChannelError {
    /// No signing key could be created or persisted. No signing is possible.
    #[error("key generation failed: {0}")]
    KeyGenerationFailed(String),

    /// Materializing the key or the initial fetch failed.
    #[error("unable to establish secure channel: {0}")]
    EstablishFailed(#[source] Box<ChannelError>),

    /// A data operation was attempted after `close`.
    #[error("channel is closed")]
    ChannelClosed,

    /// Transport failure or non-success status on a fetch.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// The server did not accept a posted record.
    #[error("send failed: server answered {status}")]
    SendFailed {
        /// Response status.
        status: u16,
    },

    /// The response carries no `x-signature` header.
    #[error("response is missing the x-signature header")]
    MissingSignature,

    /// The echoed signature is not the one the client sent.
    #[error("echoed signature does not match the signature sent")]
    SignatureEchoMismatch,

    /// The authoritative record does not verify against the client's signature.
    #[error("invalid signature")]
    InvalidSignature,

    /// The authoritative record differs from the locally cached record.
    #[error("local record differs from the authoritative record")]
    DataMismatch,

    /// There is no local record to verify.
    #[error("no local record cached")]
    NothingCached,

    /// Persisted state could not be read or written.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// A payload or signature could not be encoded or decoded.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl ChannelError {
    /// Wraps a failure during establishment.
    pub(crate) fn establish(cause: ChannelError) -> Self {
        match cause {
            already @ ChannelError::EstablishFailed(_) => already,
            other => ChannelError::EstablishFailed(Box::new(other)),
        }
    }

    /// Returns the underlying error, looking through `EstablishFailed`.
    pub fn cause(&self) -> &ChannelError {
        match self {
            ChannelError::EstablishFailed(inner) => inner.cause(),
            other => other,
        }
    }

    /// Returns true for divergence between local and authoritative data, or a
    /// protocol-integrity violation. These drive the recovery flow.
    pub fn is_integrity_violation(&self) -> bool {
        matches!(
            self.cause(),
            ChannelError::MissingSignature
                | ChannelError::SignatureEchoMismatch
                | ChannelError::InvalidSignature
                | ChannelError::DataMismatch
        )
    }

    /// Returns true for network failures and non-success statuses.
    pub fn is_transport(&self) -> bool {
        matches!(
            self.cause(),
            ChannelError::RequestFailed(_) | ChannelError::SendFailed { .. }
        )
    }
}
