//! # Run Monitor
//!
//! Progress tracking and cooperative cancellation for simulation runs.
//! Uses atomic counters that can be cheaply updated from hot loops and
//! read from another thread without synchronization overhead.
//!
//! The monitor decouples work execution from progress reporting: the
//! samplers and pipelines tick counters with minimal overhead, and a
//! caller (UI thread, signal handler) may observe them or request
//! cancellation at any time. Cancellation is polled between generations
//! and between pedigrees; it never interrupts a step mid-flight.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Shared progress/cancellation state.
///
/// Tick counters use relaxed ordering since we only need eventual
/// visibility; the cancellation flag uses `SeqCst` so a request is seen
/// promptly at the next poll point.
pub struct RunMonitor {
    ticks: AtomicU64,
    cancelled: AtomicBool,
    start_time: Instant,
}

impl RunMonitor {
    pub fn new() -> Self {
        Self {
            ticks: AtomicU64::new(0),
            cancelled: AtomicBool::new(false),
            start_time: Instant::now(),
        }
    }

    /// Create a monitor behind an `Arc` for sharing with an observer thread.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Record one unit of progress (a generation, a pedigree). Best-effort,
    /// no semantic effect.
    #[inline]
    pub fn tick(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of progress units recorded so far.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Request cancellation; honored at the next poll point.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Polled by the samplers and pipelines between major steps.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Seconds since the monitor was created.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }
}

impl Default for RunMonitor {
    fn default() -> Self {
        Self::new()
    }
}
