//! Update, check and recovery flow for a UI collaborator.

use crate::channel::{Established, SecureChannel};
use crate::error::ChannelResult;
use crate::transport::HttpClient;
use crate::validity::ValidityState;
use sealsync_protocol::{Payload, Record};
use tracing::{error, info, warn};

/// Drives a [`SecureChannel`] and its [`ValidityState`] together.
///
/// - `update` sends a record and adopts the server view
/// - `check` verifies and flips to `Invalid` on an integrity failure
/// - `recover` resubmits a record and flips back to `Valid` on success
#[derive(Debug)]
pub struct Reconciler<C: HttpClient, P: Payload + Clone = Record> {
    channel: SecureChannel<C, P>,
    validity: ValidityState<P>,
    displayed: P,
}

impl<C, P> Reconciler<C, P>
where
    C: HttpClient,
    P: Payload + PartialEq + Clone,
{
    /// Starts from an established channel, displaying its initial record.
    pub fn new(established: Established<C, P>) -> Self {
        Self::with_channel(established.channel, established.record)
    }

    /// Starts from an open channel, displaying `record`.
    pub fn with_channel(channel: SecureChannel<C, P>, record: P) -> Self {
        Self {
            channel,
            validity: ValidityState::new(),
            displayed: record,
        }
    }

    /// Returns the record currently displayed.
    pub fn record(&self) -> &P {
        &self.displayed
    }

    /// Returns the validity state.
    pub fn validity(&self) -> &ValidityState<P> {
        &self.validity
    }

    /// Returns the channel.
    pub fn channel(&self) -> &SecureChannel<C, P> {
        &self.channel
    }

    /// Consumes the reconciler, returning the channel.
    pub fn into_channel(self) -> SecureChannel<C, P> {
        self.channel
    }

    /// Sends `record` and displays the server view on success.
    ///
    /// On failure the displayed record is unchanged.
    pub fn update(&mut self, record: P) -> ChannelResult<&P> {
        self.submit(record)?;
        Ok(&self.displayed)
    }

    /// Verifies the local record against the authoritative one.
    ///
    /// An integrity failure or a `false` verification moves the state to
    /// `Invalid` carrying the record held before the check; transport
    /// failures leave the state unchanged.
    pub fn check(&mut self) -> ChannelResult<bool> {
        let last_known = self
            .channel
            .local_record()?
            .unwrap_or_else(|| self.displayed.clone());

        match self.channel.verify() {
            Ok(true) => Ok(true),
            Ok(false) => {
                warn!("local record failed verification");
                self.validity.set_invalid(last_known);
                Ok(false)
            }
            Err(e) if e.is_integrity_violation() => {
                warn!(error = %e, "integrity violation, entering recovery");
                self.validity.set_invalid(last_known);
                Err(e)
            }
            Err(e) => {
                error!(error = %e, "verification did not complete");
                Err(e)
            }
        }
    }

    /// Resubmits `record` and moves back to `Valid` on success.
    ///
    /// On failure the state stays `Invalid`.
    pub fn recover(&mut self, record: P) -> ChannelResult<&P> {
        self.submit(record)?;
        self.validity.set_valid();
        info!("recovered from mismatch");
        Ok(&self.displayed)
    }

    /// Resubmits the last known record, if invalid.
    pub fn restore(&mut self) -> ChannelResult<Option<&P>> {
        match self.validity.last_known_record() {
            Some(record) => self.recover(record).map(Some),
            None => Ok(None),
        }
    }

    fn submit(&mut self, record: P) -> ChannelResult<()> {
        match self.channel.send(&record) {
            Ok(server) => {
                self.displayed = server;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "failed to send record");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::SignatureCache;
    use crate::config::ChannelConfig;
    use crate::error::ChannelError;
    use crate::keystore::KeyStore;
    use crate::local::LocalState;
    use crate::signer::Signer;
    use crate::transport::ScriptedClient;
    use sealsync_protocol::{HttpResponse, SIGNATURE_HEADER};
    use sealsync_storage::InMemoryBackend;
    use std::sync::Arc;

    fn reconciler() -> (Arc<ScriptedClient>, Reconciler<Arc<ScriptedClient>>) {
        let state = LocalState::new(InMemoryBackend::new());
        let key = KeyStore::new(state.clone()).materialize().unwrap();
        let signer = Signer::new(key, SignatureCache::new(state.clone()));
        let sig = signer.sign(&String::new()).unwrap();

        let client = Arc::new(ScriptedClient::new());
        client.push_response(
            HttpResponse::new(200, br#"{"data":"A"}"#.to_vec())
                .with_header(SIGNATURE_HEADER, sig.into_string()),
        );
        let est = SecureChannel::establish(
            ChannelConfig::default(),
            Arc::clone(&client),
            state,
        )
        .unwrap();
        (client, Reconciler::new(est))
    }

    #[test]
    fn transport_failure_leaves_state_valid() {
        let (client, mut reconciler) = reconciler();
        client.push_failure("connection reset");

        let err = reconciler.check().unwrap_err();
        assert!(err.is_transport());
        assert!(!reconciler.validity().is_invalid());
    }

    #[test]
    fn integrity_failure_enters_invalid() {
        let (client, mut reconciler) = reconciler();
        client.push_response(HttpResponse::new(200, br#"{"data":"A"}"#.to_vec()));

        let err = reconciler.check().unwrap_err();
        assert!(matches!(err, ChannelError::MissingSignature));
        assert_eq!(
            reconciler.validity().last_known_record(),
            Some(Record::new("A"))
        );
    }

    #[test]
    fn failed_recovery_stays_invalid() {
        let (client, mut reconciler) = reconciler();
        reconciler.validity().set_invalid(Record::new("A"));
        client.push_response(HttpResponse::new(500, Vec::new()));

        assert!(matches!(
            reconciler.restore(),
            Err(ChannelError::SendFailed { status: 500 })
        ));
        assert!(reconciler.validity().is_invalid());
        assert_eq!(reconciler.record(), &Record::new("A"));
    }

    #[test]
    fn restore_when_valid_is_noop() {
        let (client, mut reconciler) = reconciler();
        assert!(reconciler.restore().unwrap().is_none());
        assert_eq!(client.call_count(), 1);
    }
}
