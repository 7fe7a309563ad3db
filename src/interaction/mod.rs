//! Deferred frame work: throttled window resizes and coalesced redraws.
//!
//! Time is host supplied as a monotonic offset, so scheduling is fully
//! deterministic and no timer or thread is involved.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Resize waiting for its throttle window to elapse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingResize {
    pub width: f64,
    pub due: Duration,
}

/// Work drained by one frame tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameWork {
    pub resize: Option<f64>,
    pub redraw: bool,
}

impl FrameWork {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resize.is_none() && !self.redraw
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameScheduler {
    throttle: Duration,
    pending_resize: Option<PendingResize>,
    redraw_pending: bool,
}

impl FrameScheduler {
    #[must_use]
    pub fn new(throttle: Duration) -> Self {
        Self {
            throttle,
            pending_resize: None,
            redraw_pending: false,
        }
    }

    #[must_use]
    pub fn throttle(&self) -> Duration {
        self.throttle
    }

    /// Records a window resize. The first event of a burst fixes the due
    /// time; later events only update the width.
    pub fn schedule_resize(&mut self, width: f64, now: Duration) {
        match &mut self.pending_resize {
            Some(pending) => pending.width = width,
            None => {
                self.pending_resize = Some(PendingResize {
                    width,
                    due: now + self.throttle,
                });
            }
        }
    }

    pub fn request_redraw(&mut self) {
        self.redraw_pending = true;
    }

    #[must_use]
    pub fn pending_resize(&self) -> Option<PendingResize> {
        self.pending_resize
    }

    #[must_use]
    pub fn redraw_pending(&self) -> bool {
        self.redraw_pending
    }

    /// Drains everything due at `now`. A resize still inside its throttle
    /// window stays queued.
    pub fn take_due(&mut self, now: Duration) -> FrameWork {
        let resize = match self.pending_resize {
            Some(pending) if pending.due <= now => {
                self.pending_resize = None;
                Some(pending.width)
            }
            _ => None,
        };
        FrameWork {
            resize,
            redraw: std::mem::take(&mut self.redraw_pending),
        }
    }

    pub fn cancel_all(&mut self) {
        self.pending_resize = None;
        self.redraw_pending = false;
    }
}
