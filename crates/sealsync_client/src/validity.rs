//! Valid / invalid state of the local record.
//!
//! ```text
//! Valid --(verification fails or returns false)--> Invalid(last_known)
//! Invalid --(recovery send succeeds)--> Valid
//! ```
//!
//! Transport failures never move the state. The state lives in memory only.

use tokio::sync::watch;

/// Whether the local record is known to agree with the authoritative one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Validity<P> {
    /// No divergence detected.
    #[default]
    Valid,
    /// Divergence detected; `last_known` is the record held before the check.
    Invalid {
        /// The record the client last had.
        last_known: P,
    },
}

impl<P> Validity<P> {
    /// Returns true if no divergence has been detected.
    pub fn is_valid(&self) -> bool {
        matches!(self, Validity::Valid)
    }

    /// Returns true if a divergence has been detected.
    pub fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    /// Returns the last known record, if invalid.
    pub fn last_known(&self) -> Option<&P> {
        match self {
            Validity::Valid => None,
            Validity::Invalid { last_known } => Some(last_known),
        }
    }
}

/// Observable holder of a [`Validity`].
///
/// Subscribers are notified of every transition.
#[derive(Debug)]
pub struct ValidityState<P> {
    sender: watch::Sender<Validity<P>>,
}

impl<P: Clone> ValidityState<P> {
    /// Creates a holder in the `Valid` state.
    pub fn new() -> Self {
        let (sender, _) = watch::channel(Validity::Valid);
        Self { sender }
    }

    /// Returns a snapshot of the current state.
    pub fn current(&self) -> Validity<P> {
        self.sender.borrow().clone()
    }

    /// Returns true if a divergence has been detected.
    pub fn is_invalid(&self) -> bool {
        self.sender.borrow().is_invalid()
    }

    /// Returns the record held before the failed check, if invalid.
    pub fn last_known_record(&self) -> Option<P> {
        self.sender.borrow().last_known().cloned()
    }

    /// Moves to `Invalid`, remembering `last_known`.
    pub fn set_invalid(&self, last_known: P) {
        self.sender.send_replace(Validity::Invalid { last_known });
    }

    /// Moves to `Valid`.
    pub fn set_valid(&self) {
        self.sender.send_replace(Validity::Valid);
    }

    /// Returns a receiver notified on every transition.
    pub fn subscribe(&self) -> watch::Receiver<Validity<P>> {
        self.sender.subscribe()
    }
}

impl<P: Clone> Default for ValidityState<P> {
    fn default() -> Self {
        Self::new()
    }
}
