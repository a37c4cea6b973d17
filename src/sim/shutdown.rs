//! Cooperative cancellation.
//!
//! One [`ShutdownHandle`] per run; every task carries a cloned [`Shutdown`]
//! observer and checks it at the top of its loop and across every timed
//! wait. Tasks exit on their own within one of their tick intervals; they
//! are never aborted mid-operation.

use std::time::Duration;

use tokio::sync::watch;

/// Trigger side of the shutdown signal.
#[derive(Debug)]
pub struct ShutdownHandle {
    tx: watch::Sender<bool>,
}

impl ShutdownHandle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        ShutdownHandle { tx }
    }

    /// A new observer for one task.
    pub fn subscribe(&self) -> Shutdown {
        Shutdown {
            rx: self.tx.subscribe(),
        }
    }

    /// Fires the signal. Idempotent.
    pub fn trigger(&self) {
        // send only fails with no receivers left, which is fine: every task
        // already exited
        let _ = self.tx.send(true);
    }
}

impl Default for ShutdownHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Observer side of the shutdown signal.
#[derive(Clone, Debug)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    /// Non-blocking check, used at the top of task loops.
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the signal fires. Also resolves if the handle was
    /// dropped: an abandoned run must wind down, not hang.
    pub async fn triggered(&mut self) {
        while !*self.rx.borrow() {
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }

    /// Sleeps for `duration` unless the signal fires first. Returns `false`
    /// when interrupted, the caller's cue to stop issuing commands and
    /// return.
    pub async fn sleep(&mut self, duration: Duration) -> bool {
        tokio::select! {
            _ = tokio::time::sleep(duration) => true,
            _ = self.triggered() => false,
        }
    }
}
