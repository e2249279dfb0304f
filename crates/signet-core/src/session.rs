//! Broadcast authentication status with replay of the latest value.

use tokio::sync::watch;

/// Multicast boolean signal of the current authentication status.
///
/// Backed by a watch channel: exactly the most recent value is retained, and
/// every subscriber (including ones attaching after an emission) observes it
/// immediately. The initial value before any emission is `false`.
///
/// `AuthService` is the single writer; subscribers are read-only.
pub struct SessionState {
    tx: watch::Sender<bool>,
}

impl SessionState {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Returns a new independent subscriber.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    /// Returns the most recently emitted status.
    pub fn is_authenticated(&self) -> bool {
        *self.tx.borrow()
    }

    /// Emits a new status. Succeeds with zero subscribers.
    pub(crate) fn emit(&self, authenticated: bool) {
        self.tx.send_replace(authenticated);
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
