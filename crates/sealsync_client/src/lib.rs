//! # SealSync Client
//!
//! Secure channel, key store and mismatch recovery for SealSync clients.
//!
//! This crate provides:
//! - [`KeyStore`]: restores or generates the HMAC-SHA256 signing key
//! - [`Signer`]: signs and verifies payloads, backed by a [`SignatureCache`]
//! - [`SecureChannel`]: fetch / send / verify / reset over the wire protocol
//! - [`ValidityState`] and [`Reconciler`]: the valid/invalid recovery flow
//! - [`HttpClient`] with a blocking [`UreqClient`] and an in-process
//!   [`LoopbackClient`]
//!
//! ## Trust model
//!
//! The server is a dumb authoritative store that echoes the client's bearer
//! token back. The client is the sole verifier: a GET succeeds only if the
//! authoritative record is byte-identical (canonically) to the record the
//! client last cached, which makes every fetch a staleness check.
//!
//! ## Key Invariants
//!
//! - All persisted state (key, record, signature) lives in one [`LocalState`]
//! - Data operations on a closed channel fail before any network call
//! - Nothing is retried internally; every failure surfaces to the caller
//! - Transport failures never change the [`Validity`] state

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod cache;
mod channel;
mod config;
mod error;
mod http;
mod keystore;
mod local;
mod reconcile;
mod signer;
mod transport;
mod validity;

pub use cache::SignatureCache;
pub use channel::{Established, SecureChannel};
pub use config::ChannelConfig;
pub use error::{ChannelError, ChannelResult};
pub use http::{LoopbackClient, LoopbackServer, UreqClient};
pub use keystore::{KeyStore, SigningKey, ALGORITHM, KEY_SIZE};
pub use local::LocalState;
pub use reconcile::Reconciler;
pub use signer::Signer;
pub use transport::{HttpClient, ScriptedClient};
pub use validity::{Validity, ValidityState};
