//! Pulse effect timing and cancellation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::runtime::JoinHandle;

/// The two brightness levels the pulse alternates between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulsePhase {
    Low,
    High,
}

impl PulsePhase {
    const LOW_DIMMING: u8 = 10;
    const HIGH_DIMMING: u8 = 100;
    const LOW_HOLD: Duration = Duration::from_millis(200);
    const HIGH_HOLD: Duration = Duration::from_millis(800);

    /// Dimming level sent while in this phase.
    pub fn dimming(self) -> u8 {
        match self {
            PulsePhase::Low => Self::LOW_DIMMING,
            PulsePhase::High => Self::HIGH_DIMMING,
        }
    }

    /// How long the level is held after it has been sent.
    pub fn hold(self) -> Duration {
        match self {
            PulsePhase::Low => Self::LOW_HOLD,
            PulsePhase::High => Self::HIGH_HOLD,
        }
    }

    pub fn next(self) -> Self {
        match self {
            PulsePhase::Low => PulsePhase::High,
            PulsePhase::High => PulsePhase::Low,
        }
    }
}

/// Cooperative stop signal for a running pulse.
///
/// Clones share the same flag. The pulse loop only looks at it between
/// iterations, so a send or hold already in progress is finished first.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// A pulse running as a background task.
///
/// Returned by [`Light::spawn_pulse`](crate::Light::spawn_pulse).
pub struct PulseHandle {
    token: CancelToken,
    task: JoinHandle<()>,
}

impl PulseHandle {
    pub(crate) fn new(token: CancelToken, task: JoinHandle<()>) -> Self {
        PulseHandle { token, task }
    }

    /// A token that stops this pulse when cancelled.
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    /// Request a stop without waiting for it.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Request a stop and wait until the loop has exited.
    ///
    /// After this returns the pulse sends nothing more.
    pub async fn stop(self) {
        self.token.cancel();
        self.task.await
    }
}
