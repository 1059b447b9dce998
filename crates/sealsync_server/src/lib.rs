//! # SealSync Server
//!
//! Authoritative record server for SealSync.
//!
//! This crate provides:
//! - `GET /` returning the authoritative record
//! - `POST /` replacing it (last write wins)
//! - The authorization gate: a format check on the bearer token, which is
//!   echoed back as `x-signature`
//!
//! # Trust model
//!
//! The server performs no cryptographic verification. It holds no key and
//! never inspects the token beyond its base64 shape; all verification happens
//! on the client, which compares the echo with what it sent.
//!
//! ```
//! use sealsync_protocol::{HttpRequest, Method, Record, SIGNATURE_HEADER};
//! use sealsync_server::{ServerConfig, SyncServer};
//!
//! let server = SyncServer::new(ServerConfig::default());
//! let response = server.handle(
//!     &HttpRequest::new(Method::Get, "http://localhost:3000/")
//!         .with_header("authorization", "Bearer AAAA"),
//! );
//! assert_eq!(response.status, 200);
//! assert_eq!(response.header(SIGNATURE_HEADER), Some("AAAA"));
//! assert_eq!(server.record(), Record::new("Hello World!"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod auth;
mod config;
mod error;
mod handler;
mod router;
mod server;
mod store;

pub use auth::AuthGate;
pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::{HandlerContext, RequestHandler};
pub use router::router;
pub use server::SyncServer;
pub use store::RecordStore;
