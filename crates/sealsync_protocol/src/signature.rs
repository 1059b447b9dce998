//! Transportable signatures.

use crate::error::{ProtocolError, ProtocolResult};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Size of an HMAC-SHA256 tag in bytes.
pub const TAG_SIZE: usize = 32;

/// An authentication tag in its transportable form: standard, padded base64.
///
/// Two signatures compare equal iff their strings are identical, which for
/// tags produced by the same key means they were computed over byte-identical
/// canonical payloads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(String);

impl Signature {
    /// Encodes a raw tag.
    #[must_use]
    pub fn from_tag(tag: &[u8]) -> Self {
        Self(STANDARD.encode(tag))
    }

    /// Wraps a string received on the wire without decoding it.
    ///
    /// Use [`Signature::tag`] to check that it actually decodes.
    #[must_use]
    pub fn from_wire(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Decodes the raw tag bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::SignatureEncoding`] if the string is not valid
    /// padded base64.
    pub fn tag(&self) -> ProtocolResult<Vec<u8>> {
        STANDARD
            .decode(self.0.as_bytes())
            .map_err(|e| ProtocolError::SignatureEncoding(e.to_string()))
    }

    /// Returns the encoded form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the signature, returning the encoded form.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Signature {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
