//! Error bodies returned by the server.

use serde::{Deserialize, Serialize};

/// Message sent when the authorization header is absent.
pub const MISSING_AUTHORIZATION: &str = "Missing authorization header";

/// Message sent when the authorization header has the wrong shape.
pub const INVALID_AUTHORIZATION: &str = "Invalid authorization header";

/// JSON body of every non-success response: `{"message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable reason.
    pub message: String,
}

impl ErrorBody {
    /// Creates an error body.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
