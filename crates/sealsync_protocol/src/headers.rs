//! Header names and the bearer-token format.
//!
//! The token carried in `authorization: Bearer <token>` is the client's
//! signature. The gate only checks its lexical shape: standard base64
//! alphabet, with standard padding rules. An empty token is accepted, as the
//! pattern allows zero quads.

use crate::error::{ProtocolError, ProtocolResult};
use regex::Regex;
use std::sync::LazyLock;

/// Request header carrying the bearer token.
pub const AUTHORIZATION_HEADER: &str = "authorization";

/// Response header echoing the accepted bearer token.
pub const SIGNATURE_HEADER: &str = "x-signature";

/// Content type header name.
pub const CONTENT_TYPE_HEADER: &str = "content-type";

/// Content type of every request and response body.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Authorization scheme.
pub const BEARER_SCHEME: &str = "Bearer";

#[allow(clippy::expect_used)]
static BEARER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Bearer (?:[A-Za-z0-9+/]{4})*(?:[A-Za-z0-9+/]{2}==|[A-Za-z0-9+/]{3}=)?$")
        .expect("bearer pattern is a valid regex")
});

/// Formats a token as an `authorization` header value.
///
/// ```
/// assert_eq!(sealsync_protocol::bearer_value("c2ln"), "Bearer c2ln");
/// ```
#[must_use]
pub fn bearer_value(token: &str) -> String {
    format!("{BEARER_SCHEME} {token}")
}

/// Returns true if `header` is a well-formed `Bearer <base64>` value.
#[must_use]
pub fn is_valid_bearer(header: &str) -> bool {
    BEARER_PATTERN.is_match(header)
}

/// Validates an `authorization` header and extracts its token.
///
/// # Errors
///
/// - [`ProtocolError::MissingAuthorization`] if `header` is `None`
/// - [`ProtocolError::InvalidAuthorization`] if the shape is wrong
pub fn parse_bearer(header: Option<&str>) -> ProtocolResult<&str> {
    let header = header.ok_or(ProtocolError::MissingAuthorization)?;
    if !is_valid_bearer(header) {
        return Err(ProtocolError::InvalidAuthorization);
    }
    Ok(&header[BEARER_SCHEME.len() + 1..])
}
