//! Next-frame redraw scheduling.
//!
//! Any number of [`RedrawHandle::request`] calls between two frames coalesce
//! into one redraw. The host either polls [`RedrawScheduler::take_frame`] from
//! its own frame callback or awaits [`RedrawScheduler::next_frame`].

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Shared {
    dirty: AtomicBool,
    cancelled: AtomicBool,
    requested: AtomicU64,
    rendered: AtomicU64,
    notify: Notify,
}

/// Cloneable handle for marking the surface dirty from anywhere, including
/// background tasks.
#[derive(Debug, Clone)]
pub struct RedrawHandle {
    shared: Arc<Shared>,
}

impl RedrawHandle {
    /// Marks the surface dirty. No-op after cancellation.
    pub fn request(&self) {
        let shared = &self.shared;
        if shared.cancelled.load(Ordering::Acquire) {
            return;
        }
        shared.requested.fetch_add(1, Ordering::Relaxed);
        if shared.dirty.swap(true, Ordering::AcqRel) {
            tracing::trace!("Redraw request coalesced");
        } else {
            tracing::debug!("Redraw scheduled for next frame");
            shared.notify.notify_one();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.shared.cancelled.load(Ordering::Acquire)
    }
}

/// Requested vs rendered frame counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RedrawStats {
    pub requested: u64,
    pub rendered: u64,
}

#[derive(Debug)]
pub struct RedrawScheduler {
    shared: Arc<Shared>,
    frame_interval: Duration,
}

impl RedrawScheduler {
    pub fn new(frame_interval: Duration) -> Self {
        Self {
            shared: Arc::new(Shared::default()),
            frame_interval,
        }
    }

    pub fn handle(&self) -> RedrawHandle {
        RedrawHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn request(&self) {
        self.handle().request();
    }

    /// True when a redraw is waiting for the next frame.
    pub fn is_pending(&self) -> bool {
        self.shared.dirty.load(Ordering::Acquire)
    }

    /// Consumes the pending redraw, if any. At most one `true` per batch of
    /// requests.
    pub fn take_frame(&self) -> bool {
        if self.is_cancelled() {
            return false;
        }
        if self.shared.dirty.swap(false, Ordering::AcqRel) {
            self.shared.rendered.fetch_add(1, Ordering::Relaxed);
            true
        } else {
            false
        }
    }

    /// Waits for a request, then one frame interval, then takes the frame.
    ///
    /// Returns `false` once the scheduler is cancelled.
    pub async fn next_frame(&self) -> bool {
        loop {
            if self.is_cancelled() {
                return false;
            }
            if self.is_pending() {
                break;
            }
            self.shared.notify.notified().await;
        }
        tokio::time::sleep(self.frame_interval).await;
        self.take_frame()
    }

    /// Drops any pending redraw and turns later requests into no-ops.
    pub fn cancel(&self) {
        self.shared.cancelled.store(true, Ordering::Release);
        self.shared.dirty.store(false, Ordering::Release);
        self.shared.notify.notify_waiters();
        self.shared.notify.notify_one();
        tracing::debug!("Redraw scheduler cancelled");
    }

    pub fn is_cancelled(&self) -> bool {
        self.shared.cancelled.load(Ordering::Acquire)
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    pub fn stats(&self) -> RedrawStats {
        RedrawStats {
            requested: self.shared.requested.load(Ordering::Relaxed),
            rendered: self.shared.rendered.load(Ordering::Relaxed),
        }
    }
}

impl Default for RedrawScheduler {
    fn default() -> Self {
        Self::new(Duration::from_millis(certkit_core::constants::FRAME_INTERVAL_MS))
    }
}
