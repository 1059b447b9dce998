//! # SealSync Protocol
//!
//! Wire contract shared by the SealSync client and server.
//!
//! This crate provides:
//! - Header names and the `Bearer` token format checked by the auth gate
//! - [`Signature`], the transportable form of an HMAC-SHA256 tag
//! - [`Payload`], the canonical byte encoding every signature is computed over
//! - [`Record`], the single authoritative record exchanged on the wire
//! - Transport-neutral [`HttpRequest`]/[`HttpResponse`] exchange types
//!
//! This is a pure protocol crate with no I/O operations.
//!
//! ## Exchange
//!
//! ```text
//! client                                   server
//!   | GET /   authorization: Bearer <sig>     |
//!   |---------------------------------------->| gate: shape check, echo
//!   |   200   x-signature: <sig>   {record}   |
//!   |<----------------------------------------|
//!   | POST /  authorization: Bearer <sig'>    |
//!   |         {record'}                       |
//!   |---------------------------------------->| replace authoritative record
//!   |   201   x-signature: <sig'>  {record'}  |
//!   |<----------------------------------------|
//! ```
//!
//! The server never verifies signatures; the client is the sole verifier.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod exchange;
mod headers;
mod messages;
mod payload;
mod signature;

pub use error::{ProtocolError, ProtocolResult};
pub use exchange::{HttpRequest, HttpResponse, Method};
pub use headers::{
    bearer_value, is_valid_bearer, parse_bearer, AUTHORIZATION_HEADER, BEARER_SCHEME,
    CONTENT_TYPE_HEADER, JSON_CONTENT_TYPE, SIGNATURE_HEADER,
};
pub use messages::{ErrorBody, INVALID_AUTHORIZATION, MISSING_AUTHORIZATION};
pub use payload::{Json, Payload, Record};
pub use signature::{Signature, TAG_SIZE};
