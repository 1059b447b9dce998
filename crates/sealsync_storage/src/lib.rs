//! # SealSync Storage
//!
//! Persistent client-state backends for SealSync.
//!
//! The client keeps three small pieces of state across restarts: the exported
//! signing key, the last record it wrote or adopted, and the last signature it
//! produced. Backends store these as **opaque byte values under named slots**;
//! they never interpret what they hold.
//!
//! ## Available Backends
//!
//! - [`InMemoryBackend`] - For testing and ephemeral clients
//! - [`FileBackend`] - One file per slot inside a directory
//!
//! ## Example
//!
//! ```rust
//! use sealsync_storage::{InMemoryBackend, StateBackend};
//!
//! let backend = InMemoryBackend::new();
//! backend.put("signature", b"c2ln").unwrap();
//! assert_eq!(backend.get("signature").unwrap(), Some(b"c2ln".to_vec()));
//! backend.clear().unwrap();
//! assert_eq!(backend.get("signature").unwrap(), None);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::{validate_slot, StateBackend};
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
