//! Cooperative per-request cancellation.
//!
//! One [`CancelHandle`] is created per logical request; its
//! [`CancelToken`] clones are threaded through the cache layer into the
//! engine and every concurrent adapter fetch. Cancellation is level-
//! triggered: once fired, every clone observes it.

use tokio::sync::watch;

/// Owning side of a cancellation signal.
///
/// Dropping the handle without calling [`CancelHandle::cancel`] leaves
/// the tokens permanently un-cancelled.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Create a handle and its first token.
    pub fn new() -> (Self, CancelToken) {
        let (tx, rx) = watch::channel(false);
        (Self { tx }, CancelToken { rx })
    }

    /// Fire the signal. Idempotent.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

/// Observer side of a cancellation signal.
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// A token that can never be cancelled.
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    /// Whether the signal has fired.
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the signal fires. If the handle is dropped without
    /// firing, this future never resolves.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow() {
                return;
            }
            if rx.changed().await.is_err() {
                // Handle gone, signal can no longer fire.
                std::future::pending::<()>().await;
            }
        }
    }
}
