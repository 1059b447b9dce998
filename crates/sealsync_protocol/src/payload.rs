//! Canonical payload encoding.
//!
//! Every signature is computed over the canonical bytes of a payload:
//! - strings are used verbatim (UTF-8)
//! - [`Record`] is compact JSON, `{"data":"..."}`
//! - [`Json`] goes through a `serde_json::Value` first, so every object
//!   (struct or map) is written with its keys sorted
//!
//! The string rule matters: the client signs the *stored* canonical form of
//! its cached record as a string, and that must produce the same tag as
//! signing the decoded record.

use crate::error::ProtocolResult;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A value that can be signed and exchanged.
pub trait Payload: Sized {
    /// Returns the canonical byte encoding used for signing.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be serialized.
    fn canonical_bytes(&self) -> ProtocolResult<Vec<u8>>;

    /// Decodes a value from its canonical bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a valid encoding.
    fn from_canonical(bytes: &[u8]) -> ProtocolResult<Self>;
}

impl Payload for String {
    fn canonical_bytes(&self) -> ProtocolResult<Vec<u8>> {
        Ok(self.as_bytes().to_vec())
    }

    fn from_canonical(bytes: &[u8]) -> ProtocolResult<Self> {
        Ok(String::from_utf8(bytes.to_vec())?)
    }
}

/// Adapter giving any serde type the JSON canonical form.
///
/// ```
/// use sealsync_protocol::{Json, Payload};
/// use std::collections::BTreeMap;
///
/// let mut map = BTreeMap::new();
/// map.insert("b".to_string(), 2);
/// map.insert("a".to_string(), 1);
/// assert_eq!(Json(map).canonical_bytes().unwrap(), br#"{"a":1,"b":2}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Json<T>(pub T);

impl<T> Payload for Json<T>
where
    T: Serialize + DeserializeOwned,
{
    fn canonical_bytes(&self) -> ProtocolResult<Vec<u8>> {
        let value = serde_json::to_value(&self.0)?;
        Ok(serde_json::to_vec(&value)?)
    }

    fn from_canonical(bytes: &[u8]) -> ProtocolResult<Self> {
        Ok(Json(serde_json::from_slice(bytes)?))
    }
}

/// The authoritative record: a single string field.
///
/// Canonical form is `{"data":"..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    /// The record's content.
    pub data: String,
}

impl Record {
    /// Creates a record.
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }
}

impl Payload for Record {
    fn canonical_bytes(&self) -> ProtocolResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    fn from_canonical(bytes: &[u8]) -> ProtocolResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
