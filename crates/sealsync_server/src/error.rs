//! Error types for the server.

use sealsync_protocol::{ErrorBody, ProtocolError, INVALID_AUTHORIZATION, MISSING_AUTHORIZATION};
use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur in the server.
#[derive(Error, Debug)]
pub enum ServerError {
    /// No `Authorization` header.
    #[error("{}", MISSING_AUTHORIZATION)]
    MissingAuthorization,

    /// `Authorization` is not `Bearer <base64>`.
    #[error("{}", INVALID_AUTHORIZATION)]
    InvalidAuthorization,

    /// Malformed request body.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Unknown path.
    #[error("not found: {0}")]
    NotFound(String),

    /// Known path, unsupported method.
    #[error("method not allowed: {0}")]
    MethodNotAllowed(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    /// Returns the HTTP status for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ServerError::MissingAuthorization | ServerError::InvalidAuthorization => 401,
            ServerError::InvalidRequest(_) => 400,
            ServerError::NotFound(_) => 404,
            ServerError::MethodNotAllowed(_) => 405,
            ServerError::Io(_) => 500,
        }
    }

    /// Returns true if this is a client error (4xx).
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    /// Returns true if this is a server error (5xx).
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// Returns true for authorization gate rejections.
    pub fn is_auth_rejection(&self) -> bool {
        self.status_code() == 401
    }

    /// Returns the JSON body sent with this error.
    pub fn body(&self) -> ErrorBody {
        ErrorBody::new(self.to_string())
    }
}

impl From<ProtocolError> for ServerError {
    fn from(err: ProtocolError) -> Self {
        match err {
            ProtocolError::MissingAuthorization => ServerError::MissingAuthorization,
            ProtocolError::InvalidAuthorization => ServerError::InvalidAuthorization,
            other => ServerError::InvalidRequest(other.to_string()),
        }
    }
}
