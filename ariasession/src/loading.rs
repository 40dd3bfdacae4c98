//! Shared loading indicator
//!
//! The "loading" flag was historically an ambient global consumed by any UI
//! surface. Here it is an explicit observable value injected into the
//! session controller: a cheap-to-clone wrapper over a watch channel.
//!
//! Contract: every call to [`LoadingSignal::set`] notifies subscribers,
//! including redundant writes of the current value. Readers must tolerate
//! that.

use std::sync::Arc;
use tokio::sync::watch;

/// Process-wide observable loading boolean.
///
/// The session controller is the writer; UI surfaces subscribe or read the
/// current value.
#[derive(Debug, Clone)]
pub struct LoadingSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl LoadingSignal {
    /// New signal, initially not loading.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Write the flag. Subscribers are notified even when the value is
    /// unchanged.
    pub fn set(&self, loading: bool) {
        self.tx.send_replace(loading);
    }

    /// Current value.
    pub fn get(&self) -> bool {
        *self.tx.borrow()
    }

    /// Subscribe to updates.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for LoadingSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let signal = LoadingSignal::new();
        assert!(!signal.get());

        signal.set(true);
        assert!(signal.get());

        signal.set(false);
        assert!(!signal.get());
    }

    #[tokio::test]
    async fn test_redundant_writes_notify() {
        let signal = LoadingSignal::new();
        let mut rx = signal.subscribe();

        signal.set(false); // same as initial value
        rx.changed().await.expect("subscriber notified");
        assert!(!*rx.borrow());

        signal.set(false);
        rx.changed().await.expect("subscriber notified again");
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let signal = LoadingSignal::new();
        let other = signal.clone();

        signal.set(true);
        assert!(other.get());
    }
}
