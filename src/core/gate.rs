//! Initialization gate
//!
//! One-shot barrier around the cache bootstrap. Exactly one caller wins
//! [`InitGate::try_begin`] and runs the bootstrap; everyone else parks in
//! [`InitGate::wait`] until [`InitGate::open`] is called.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

/// One-shot barrier released after the first bootstrap attempt
#[derive(Debug)]
pub struct InitGate {
    started: AtomicBool,
    opened: watch::Sender<bool>,
}

impl InitGate {
    /// Create a closed gate
    pub fn new() -> Self {
        let (opened, _) = watch::channel(false);
        Self {
            started: AtomicBool::new(false),
            opened,
        }
    }

    /// Claim the bootstrap; returns `true` for exactly one caller
    pub fn try_begin(&self) -> bool {
        self.started
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Release every waiter; idempotent
    pub fn open(&self) {
        self.opened.send_replace(true);
    }

    /// Whether the gate has been released
    pub fn is_open(&self) -> bool {
        *self.opened.borrow()
    }

    /// Wait until the gate is released
    pub async fn wait(&self) {
        let mut rx = self.opened.subscribe();
        // The sender lives as long as `self`, so this cannot fail
        let _ = rx.wait_for(|open| *open).await;
    }

    /// Guard that opens the gate when dropped
    ///
    /// The guard owns a handle to the gate so it can move into a spawned task.
    pub fn open_on_drop(gate: &Arc<Self>) -> OpenOnDrop {
        OpenOnDrop(Arc::clone(gate))
    }
}

impl Default for InitGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Opens its gate on drop, including when the bootstrap task panics
pub struct OpenOnDrop(Arc<InitGate>);

impl Drop for OpenOnDrop {
    fn drop(&mut self) {
        self.0.open();
    }
}
