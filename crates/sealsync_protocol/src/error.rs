//! Error types for the wire contract.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors that can occur while encoding or decoding protocol values.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The authorization header is absent.
    #[error("missing authorization header")]
    MissingAuthorization,

    /// The authorization header is not `Bearer <base64>`.
    #[error("invalid authorization header")]
    InvalidAuthorization,

    /// A signature string is not valid padded base64.
    #[error("invalid signature encoding: {0}")]
    SignatureEncoding(String),

    /// A payload could not be serialized or parsed as JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A string payload was not valid UTF-8.
    #[error("payload is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}
