//! Kernel lifecycle state machine.
//!
//! ```text
//! Uninitialized → Constructed → Booted → Preloaded → Ready → ShuttingDown → Shutdown
//! ```

use std::fmt;

use tokio::sync::watch;

/// Where a bridge's kernel is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    Uninitialized,
    Constructed,
    Booted,
    Preloaded,
    Ready,
    ShuttingDown,
    Shutdown,
}

impl LifecycleState {
    /// Whether `next` is the single forward step from `self`.
    pub fn can_advance_to(self, next: LifecycleState) -> bool {
        use LifecycleState::*;
        matches!(
            (self, next),
            (Uninitialized, Constructed)
                | (Constructed, Booted)
                | (Booted, Preloaded)
                | (Preloaded, Ready)
                | (Ready, ShuttingDown)
                | (ShuttingDown, Shutdown)
        )
    }

    pub fn accepts_requests(self) -> bool {
        self == LifecycleState::Ready
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Uninitialized => "uninitialized",
            LifecycleState::Constructed => "constructed",
            LifecycleState::Booted => "booted",
            LifecycleState::Preloaded => "preloaded",
            LifecycleState::Ready => "ready",
            LifecycleState::ShuttingDown => "shutting_down",
            LifecycleState::Shutdown => "shutdown",
        };
        f.write_str(name)
    }
}

/// Observable holder of the current lifecycle state.
#[derive(Debug)]
pub struct Lifecycle {
    tx: watch::Sender<LifecycleState>,
}

impl Lifecycle {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(LifecycleState::Uninitialized);
        Self { tx }
    }

    pub fn current(&self) -> LifecycleState {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.tx.subscribe()
    }

    /// Step forward if `next` directly follows the current state.
    /// Returns whether the transition happened.
    pub fn advance(&self, next: LifecycleState) -> bool {
        let mut from = LifecycleState::Uninitialized;
        let advanced = self.tx.send_if_modified(|state| {
            from = *state;
            if state.can_advance_to(next) {
                *state = next;
                true
            } else {
                false
            }
        });

        if advanced {
            tracing::debug!(from = %from, to = %next, "Kernel lifecycle transition");
        } else {
            tracing::debug!(from = %from, to = %next, "Lifecycle transition rejected");
        }
        advanced
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}
