//! Payload signing and verification.

use crate::cache::SignatureCache;
use crate::error::ChannelResult;
use crate::keystore::{SigningKey, ALGORITHM};
use sealsync_protocol::{Payload, Signature};
use tracing::{debug, warn};

/// Signs payloads with the current key and verifies them against the
/// signature cache.
#[derive(Debug)]
pub struct Signer {
    key: SigningKey,
    cache: SignatureCache,
}

impl Signer {
    /// Creates a signer.
    pub fn new(key: SigningKey, cache: SignatureCache) -> Self {
        Self { key, cache }
    }

    /// Returns the algorithm identifier.
    pub fn algorithm(&self) -> &'static str {
        ALGORITHM
    }

    /// Returns the signature cache.
    pub fn cache(&self) -> &SignatureCache {
        &self.cache
    }

    /// Signs the canonical bytes of `payload` and records the result as the
    /// latest signature.
    ///
    /// Signing is deterministic: the same payload under the same key always
    /// yields the same signature.
    pub fn sign<P: Payload>(&self, payload: &P) -> ChannelResult<Signature> {
        let bytes = payload.canonical_bytes()?;
        let signature = Signature::from_tag(&self.key.tag(&bytes));
        self.cache.remember(&signature)?;
        debug!(len = bytes.len(), "signed payload");
        Ok(signature)
    }

    /// Verifies `signature` over `payload`.
    ///
    /// Returns false if `signature` is not the latest cached signature, does
    /// not decode, or does not match the payload under the current key.
    pub fn verify<P: Payload>(&self, payload: &P, signature: &Signature) -> ChannelResult<bool> {
        if !self.cache.matches(signature)? {
            warn!("signature is not the cached signature");
            return Ok(false);
        }
        let Ok(tag) = signature.tag() else {
            warn!("signature does not decode");
            return Ok(false);
        };
        let bytes = payload.canonical_bytes()?;
        Ok(self.key.verify_tag(&bytes, &tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keystore::KeyStore;
    use crate::local::LocalState;
    use proptest::prelude::*;
    use sealsync_protocol::Record;
    use sealsync_storage::InMemoryBackend;

    fn signer() -> Signer {
        let state = LocalState::new(InMemoryBackend::new());
        let key = KeyStore::new(state.clone()).generate().unwrap();
        Signer::new(key, SignatureCache::new(state))
    }

    #[test]
    fn sign_is_deterministic() {
        let signer = signer();
        let a = signer.sign(&Record::new("Hello World!")).unwrap();
        let b = signer.sign(&Record::new("Hello World!")).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.tag().unwrap().len(), 32);
    }

    #[test]
    fn sign_updates_cache() {
        let signer = signer();
        let sig = signer.sign(&Record::new("A")).unwrap();
        assert_eq!(signer.cache().last().unwrap(), Some(sig));
    }

    #[test]
    fn string_and_record_agree_on_canonical_form() {
        let signer = signer();
        let from_record = signer.sign(&Record::new("A")).unwrap();
        let from_string = signer.sign(&r#"{"data":"A"}"#.to_string()).unwrap();
        assert_eq!(from_record, from_string);
    }

    #[test]
    fn verify_accepts_own_signature() {
        let signer = signer();
        let record = Record::new("A");
        let sig = signer.sign(&record).unwrap();
        assert!(signer.verify(&record, &sig).unwrap());
    }

    #[test]
    fn verify_rejects_other_payload() {
        let signer = signer();
        let sig = signer.sign(&Record::new("A")).unwrap();
        assert!(!signer.verify(&Record::new("B"), &sig).unwrap());
    }

    #[test]
    fn verify_rejects_stale_signature() {
        let signer = signer();
        let record = Record::new("A");
        let stale = signer.sign(&record).unwrap();
        signer.sign(&Record::new("B")).unwrap();
        assert!(!signer.verify(&record, &stale).unwrap());
    }

    #[test]
    fn verify_rejects_undecodable_signature() {
        let signer = signer();
        let garbage = Signature::from_wire("not*base64");
        signer.cache().remember(&garbage).unwrap();
        assert!(!signer.verify(&Record::new("A"), &garbage).unwrap());
    }

    #[test]
    fn signatures_differ_across_keys() {
        let a = signer().sign(&Record::new("A")).unwrap();
        let b = signer().sign(&Record::new("A")).unwrap();
        assert_ne!(a, b);
    }

    proptest! {
        #[test]
        fn prop_verify_own_signature(data in ".*") {
            let signer = signer();
            let record = Record::new(data);
            let sig = signer.sign(&record).unwrap();
            prop_assert!(signer.verify(&record, &sig).unwrap());
        }

        #[test]
        fn prop_verify_rejects_other_record(a in ".*", b in ".*") {
            prop_assume!(a != b);
            let signer = signer();
            let sig = signer.sign(&Record::new(a)).unwrap();
            prop_assert!(!signer.verify(&Record::new(b), &sig).unwrap());
        }
    }
}
