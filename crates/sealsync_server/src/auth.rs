//! Authorization gate.
//!
//! The gate checks the shape of the bearer token only. It does not
//! authenticate anyone: the token is the client's signature, and the gate's
//! sole job is to echo it back so the client can check the round trip.

use crate::error::{ServerError, ServerResult};
use sealsync_protocol::parse_bearer;
use tracing::{debug, warn};

/// Validates `Authorization: Bearer <base64>` headers.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthGate;

impl AuthGate {
    /// Admits a request, returning the token to echo as `x-signature`.
    ///
    /// # Errors
    ///
    /// [`ServerError::MissingAuthorization`] if `header` is absent,
    /// [`ServerError::InvalidAuthorization`] if it does not match
    /// `Bearer <padded standard base64>`.
    pub fn admit(header: Option<&str>) -> ServerResult<&str> {
        match parse_bearer(header) {
            Ok(token) => {
                debug!("authorization admitted");
                Ok(token)
            }
            Err(e) => {
                let err = ServerError::from(e);
                warn!(reason = %err, "authorization rejected");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admits_bearer_base64() {
        assert_eq!(AuthGate::admit(Some("Bearer AAAA")).unwrap(), "AAAA");
        assert_eq!(AuthGate::admit(Some("Bearer ab+/cd==")).unwrap(), "ab+/cd==");
        assert_eq!(AuthGate::admit(Some("Bearer ")).unwrap(), "");
    }

    #[test]
    fn rejects_missing() {
        assert!(matches!(
            AuthGate::admit(None),
            Err(ServerError::MissingAuthorization)
        ));
    }

    #[test]
    fn rejects_malformed() {
        for header in ["Basic xyz", "Bearer abc", "bearer AAAA", "Bearer AA-_", "AAAA"] {
            assert!(
                matches!(AuthGate::admit(Some(header)), Err(ServerError::InvalidAuthorization)),
                "{header} should be rejected"
            );
        }
    }
}
