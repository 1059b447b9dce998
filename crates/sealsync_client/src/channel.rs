//! The secure channel.
//!
//! Every exchange is an ordered pipeline of fallible steps that
//! short-circuits on the first failure.
//!
//! GET:
//! 1. sign the cached record's canonical string (empty if none)
//! 2. send `Authorization: Bearer <sig>`
//! 3. non-2xx -> [`ChannelError::RequestFailed`]
//! 4. no `x-signature` -> [`ChannelError::MissingSignature`]
//! 5. echo differs from what was sent -> [`ChannelError::SignatureEchoMismatch`]
//! 6. body does not verify -> [`ChannelError::InvalidSignature`]
//!
//! POST signs and persists the outgoing record, sends it, and on success
//! performs a fresh GET.

use crate::cache::SignatureCache;
use crate::config::ChannelConfig;
use crate::error::{ChannelError, ChannelResult};
use crate::keystore::KeyStore;
use crate::local::LocalState;
use crate::signer::Signer;
use crate::transport::HttpClient;
use sealsync_protocol::{
    bearer_value, HttpRequest, HttpResponse, Method, Payload, Record, Signature,
    AUTHORIZATION_HEADER, CONTENT_TYPE_HEADER, JSON_CONTENT_TYPE, SIGNATURE_HEADER,
};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// A freshly established channel with the record fetched while establishing.
pub struct Established<C: HttpClient, P: Payload = Record> {
    /// The open channel.
    pub channel: SecureChannel<C, P>,
    /// The authoritative record at establishment time.
    pub record: P,
}

impl<C: HttpClient, P: Payload + std::fmt::Debug> std::fmt::Debug for Established<C, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Established")
            .field("channel", &self.channel)
            .field("record", &self.record)
            .finish()
    }
}

/// Outcome of GET steps 1-5.
struct Echo<P> {
    record: P,
    signature: Signature,
    had_baseline: bool,
}

/// A signed client session with the authoritative store.
///
/// Operations take `&self` and are meant for one caller at a time; `reset`
/// consumes the channel.
pub struct SecureChannel<C: HttpClient, P: Payload = Record> {
    config: ChannelConfig,
    client: C,
    state: LocalState,
    signer: Signer,
    opened: AtomicBool,
    _payload: PhantomData<fn() -> P>,
}

impl<C: HttpClient, P: Payload> std::fmt::Debug for SecureChannel<C, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureChannel")
            .field("server_url", &self.config.server_url)
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}

impl<C, P> SecureChannel<C, P>
where
    C: HttpClient,
    P: Payload + PartialEq,
{
    /// Materializes the signing key and performs the initial fetch.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::EstablishFailed`] wrapping the cause if either
    /// step fails; no channel is created.
    pub fn establish(
        config: ChannelConfig,
        client: C,
        state: LocalState,
    ) -> ChannelResult<Established<C, P>> {
        let channel = Self::open(config, client, state).map_err(ChannelError::establish)?;
        let record = channel.fetch().map_err(|e| {
            warn!(error = %e, "initial fetch failed");
            ChannelError::establish(e)
        })?;
        info!(server = %channel.config.server_url, "secure channel established");
        Ok(Established { channel, record })
    }

    /// Materializes the signing key and returns an open channel without the
    /// initial fetch.
    ///
    /// A stale local record is then only detected by the next `fetch` or
    /// `verify`, which lets a caller still `send` over it.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::KeyGenerationFailed`] if no key can be
    /// materialized.
    pub fn open(config: ChannelConfig, client: C, state: LocalState) -> ChannelResult<Self> {
        let key = KeyStore::new(state.clone()).materialize()?;
        let signer = Signer::new(key, SignatureCache::new(state.clone()));
        Ok(Self {
            config,
            client,
            state,
            signer,
            opened: AtomicBool::new(true),
            _payload: PhantomData,
        })
    }

    /// Persists `seed` as the local record, then establishes.
    ///
    /// # Errors
    ///
    /// As [`SecureChannel::establish`]; the seed must match the authoritative
    /// record or the initial fetch fails verification.
    pub fn establish_with(
        config: ChannelConfig,
        client: C,
        state: LocalState,
        seed: &P,
    ) -> ChannelResult<Established<C, P>> {
        state.store_record(seed).map_err(ChannelError::establish)?;
        Self::establish(config, client, state)
    }

    /// Fetches and verifies the authoritative record.
    ///
    /// With no record cached yet, the authoritative record is adopted as the
    /// local baseline once the echo checks pass.
    ///
    /// # Errors
    ///
    /// [`ChannelError::ChannelClosed`], [`ChannelError::RequestFailed`],
    /// [`ChannelError::MissingSignature`],
    /// [`ChannelError::SignatureEchoMismatch`] or
    /// [`ChannelError::InvalidSignature`].
    pub fn fetch(&self) -> ChannelResult<P> {
        self.ensure_open()?;
        let echo = self.exchange()?;

        if !echo.had_baseline {
            self.state.store_record(&echo.record)?;
            self.signer.sign(&echo.record)?;
            info!("adopted authoritative record as local baseline");
            return Ok(echo.record);
        }

        if !self.signer.verify(&echo.record, &echo.signature)? {
            warn!("authoritative record does not verify against the local baseline");
            return Err(ChannelError::InvalidSignature);
        }
        Ok(echo.record)
    }

    /// Signs and persists `record`, posts it, then fetches the server view.
    ///
    /// The local write happens before the POST and is kept if the POST fails.
    ///
    /// # Errors
    ///
    /// [`ChannelError::ChannelClosed`], [`ChannelError::RequestFailed`] on a
    /// transport failure, [`ChannelError::SendFailed`] on a non-2xx status, or
    /// any error of the follow-up [`SecureChannel::fetch`].
    pub fn send(&self, record: &P) -> ChannelResult<P> {
        self.ensure_open()?;
        let signature = self.signer.sign(record)?;
        let body = record.canonical_bytes()?;
        self.state.store_record_bytes(&body)?;

        let response = self.dispatch(Method::Post, &signature, Some(body))?;
        if !response.is_success() {
            warn!(status = response.status, "server rejected record");
            return Err(ChannelError::SendFailed {
                status: response.status,
            });
        }
        debug!(status = response.status, "record posted");
        self.fetch()
    }

    /// Checks the local record against the authoritative one.
    ///
    /// Returns `Ok(false)` if the records are equal but the local record does
    /// not verify against the echoed signature.
    ///
    /// # Errors
    ///
    /// [`ChannelError::DataMismatch`] if the records differ,
    /// [`ChannelError::NothingCached`] if there is no local record, or any
    /// error of GET steps 1-5. Local state is never rewritten.
    pub fn verify(&self) -> ChannelResult<bool> {
        self.ensure_open()?;
        let local: P = self.state.record()?.ok_or(ChannelError::NothingCached)?;
        let echo = self.exchange()?;

        if echo.record != local {
            warn!("local record differs from the authoritative record");
            return Err(ChannelError::DataMismatch);
        }
        let valid = self.signer.verify(&local, &echo.signature)?;
        debug!(valid, "verified local record");
        Ok(valid)
    }

    /// Clears all local state and establishes a fresh channel with a new key.
    ///
    /// # Errors
    ///
    /// [`ChannelError::ChannelClosed`] if the channel is closed, otherwise
    /// any error of [`SecureChannel::establish`].
    pub fn reset(self) -> ChannelResult<Established<C, P>> {
        self.ensure_open()?;
        self.state.clear()?;
        self.close();
        info!("local state cleared, re-establishing");

        let Self {
            config,
            client,
            state,
            ..
        } = self;
        Self::establish(config, client, state)
    }

    /// Returns the cached local record, if any.
    pub fn local_record(&self) -> ChannelResult<Option<P>> {
        self.state.record()
    }

    fn exchange(&self) -> ChannelResult<Echo<P>> {
        let baseline = self.state.record_bytes()?;
        let had_baseline = baseline.is_some();
        let outgoing = String::from_canonical(baseline.as_deref().unwrap_or_default())?;
        let signature = self.signer.sign(&outgoing)?;

        let response = self.dispatch(Method::Get, &signature, None)?;
        if !response.is_success() {
            return Err(ChannelError::RequestFailed(format!(
                "GET {} answered {}",
                self.config.server_url, response.status
            )));
        }
        let echoed = check_echo(&response, &signature)?;
        let record = P::from_canonical(&response.body)?;
        Ok(Echo {
            record,
            signature: echoed,
            had_baseline,
        })
    }

    fn dispatch(
        &self,
        method: Method,
        signature: &Signature,
        body: Option<Vec<u8>>,
    ) -> ChannelResult<HttpResponse> {
        let mut request = HttpRequest::new(method, self.config.server_url.clone())
            .with_header(AUTHORIZATION_HEADER, bearer_value(signature.as_str()));
        if let Some(body) = body {
            request = request
                .with_header(CONTENT_TYPE_HEADER, JSON_CONTENT_TYPE)
                .with_body(body);
        }
        self.client.execute(request).map_err(|e| {
            warn!(method = method.as_str(), error = %e, "request failed");
            ChannelError::RequestFailed(e)
        })
    }
}

impl<C: HttpClient, P: Payload> SecureChannel<C, P> {
    /// Closes the channel. Data operations fail until it is reopened.
    pub fn close(&self) {
        self.opened.store(false, Ordering::SeqCst);
        debug!("channel closed");
    }

    /// Reopens a closed channel.
    pub fn reopen(&self) {
        self.opened.store(true, Ordering::SeqCst);
        debug!("channel reopened");
    }

    /// Returns true if the channel is open.
    pub fn is_open(&self) -> bool {
        self.opened.load(Ordering::SeqCst)
    }

    /// Returns true if the channel is closed.
    pub fn is_closed(&self) -> bool {
        !self.is_open()
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// Returns the persisted state.
    pub fn state(&self) -> &LocalState {
        &self.state
    }

    /// Returns the signer.
    pub fn signer(&self) -> &Signer {
        &self.signer
    }

    /// Returns the HTTP client.
    pub fn client(&self) -> &C {
        &self.client
    }

    fn ensure_open(&self) -> ChannelResult<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(ChannelError::ChannelClosed)
        }
    }
}

/// GET steps 4 and 5.
fn check_echo(response: &HttpResponse, sent: &Signature) -> ChannelResult<Signature> {
    let echoed = response
        .header(SIGNATURE_HEADER)
        .ok_or(ChannelError::MissingSignature)?;
    if echoed != sent.as_str() {
        warn!("server echoed a different signature");
        return Err(ChannelError::SignatureEchoMismatch);
    }
    debug!("signature echo confirmed");
    Ok(Signature::from_wire(echoed))
}
