//! Signing key lifecycle.
//!
//! A key is restored from the persisted export if one exists, otherwise a
//! fresh 256-bit key is drawn from the OS RNG and its export is persisted.
//! The export is produced exactly once, at generation; a [`SigningKey`]
//! never hands out its raw bytes afterwards.

use crate::error::{ChannelError, ChannelResult};
use crate::local::LocalState;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use sealsync_protocol::TAG_SIZE;
use sha2::Sha256;
use tracing::{debug, info, warn};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

type HmacSha256 = Hmac<Sha256>;

/// Size of the signing key in bytes.
pub const KEY_SIZE: usize = 32;

/// Algorithm identifier of the signing key.
pub const ALGORITHM: &str = "HMAC-SHA256";

/// HMAC-SHA256 signing key.
///
/// The key is automatically zeroized when dropped.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SigningKey {
    bytes: [u8; KEY_SIZE],
}

impl SigningKey {
    /// Generates a new key, returning it together with its one-time export.
    fn generate() -> ChannelResult<(Self, Zeroizing<String>)> {
        let mut bytes = [0u8; KEY_SIZE];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| ChannelError::KeyGenerationFailed(e.to_string()))?;
        let exported = Zeroizing::new(STANDARD.encode(bytes));
        let key = Self { bytes };
        bytes.zeroize();
        Ok((key, exported))
    }

    /// Imports a key from its exported form.
    fn import(exported: &[u8]) -> Result<Self, String> {
        let raw = Zeroizing::new(STANDARD.decode(exported).map_err(|e| e.to_string())?);
        if raw.len() != KEY_SIZE {
            return Err(format!(
                "invalid key size: expected {KEY_SIZE}, got {}",
                raw.len()
            ));
        }
        let mut bytes = [0u8; KEY_SIZE];
        bytes.copy_from_slice(&raw);
        Ok(Self { bytes })
    }

    #[allow(clippy::expect_used)]
    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.bytes).expect("HMAC can take key of any size")
    }

    /// Computes the tag over `message`.
    pub(crate) fn tag(&self, message: &[u8]) -> [u8; TAG_SIZE] {
        let mut mac = self.mac();
        mac.update(message);
        let mut tag = [0u8; TAG_SIZE];
        tag.copy_from_slice(&mac.finalize().into_bytes());
        tag
    }

    /// Checks `tag` against `message` in constant time.
    pub(crate) fn verify_tag(&self, message: &[u8], tag: &[u8]) -> bool {
        let mut mac = self.mac();
        mac.update(message);
        mac.verify_slice(tag).is_ok()
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("algorithm", &ALGORITHM)
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Restores or generates the signing key in a [`LocalState`].
#[derive(Debug, Clone)]
pub struct KeyStore {
    state: LocalState,
}

impl KeyStore {
    /// Creates a key store over the given state.
    pub fn new(state: LocalState) -> Self {
        Self { state }
    }

    /// Restores the persisted key.
    ///
    /// Returns `None` if there is no key or it cannot be read or imported;
    /// the failure is logged, never propagated.
    pub fn restore(&self) -> Option<SigningKey> {
        let exported = match self.state.exported_key() {
            Ok(Some(exported)) => Zeroizing::new(exported),
            Ok(None) => {
                debug!("no persisted signing key");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "failed to read persisted signing key");
                return None;
            }
        };

        match SigningKey::import(&exported) {
            Ok(key) => {
                info!(algorithm = ALGORITHM, "restored signing key");
                Some(key)
            }
            Err(reason) => {
                warn!(%reason, "discarding unusable persisted signing key");
                None
            }
        }
    }

    /// Generates a fresh key and persists its export.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::KeyGenerationFailed`] if the RNG fails or the
    /// export cannot be persisted.
    pub fn generate(&self) -> ChannelResult<SigningKey> {
        let (key, exported) = SigningKey::generate()?;
        self.state
            .store_exported_key(exported.as_bytes())
            .map_err(|e| ChannelError::KeyGenerationFailed(format!("cannot persist key: {e}")))?;
        info!(algorithm = ALGORITHM, "generated new signing key");
        Ok(key)
    }

    /// Restores the persisted key, generating one if none is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::KeyGenerationFailed`] if generation was needed
    /// and failed.
    pub fn materialize(&self) -> ChannelResult<SigningKey> {
        match self.restore() {
            Some(key) => Ok(key),
            None => self.generate(),
        }
    }
}
