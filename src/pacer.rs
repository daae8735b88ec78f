//! Fixed frame-rate pacing and frame timing statistics.
//!
//! ```ignore
//! let mut pacer = FramePacer::new(config.frame_time());
//! loop {
//!     // ... input, animation, render ...
//!     pacer.pace();
//! }
//! log::debug!("{}", pacer.stats());
//! ```
//!
//! Each [`FramePacer::pace`] call measures the work done since the previous
//! call, sleeps out whatever is left of the frame budget, and records the frame.
//! A frame that overruns its budget is not compensated: the next frame simply
//! starts late.

use core::fmt;
use std::thread;
use std::time::{Duration, Instant};

/// Time left in a frame budget after `elapsed` of work, or `None` when the
/// budget is already spent.
#[inline]
pub fn remaining(budget: Duration, elapsed: Duration) -> Option<Duration> {
    budget.checked_sub(elapsed).filter(|left| !left.is_zero())
}

// =============================================================================
// Frame Statistics
// =============================================================================

/// Work-time statistics for one session (sleep excluded).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frames paced.
    pub frames: u64,
    /// Frames whose work exceeded the budget.
    pub overruns: u64,
    /// Longest work time observed.
    pub slowest: Duration,
    total: Duration,
}

impl FrameStats {
    /// Record one frame's work time.
    pub fn record(&mut self, work: Duration, budget: Duration) {
        self.frames += 1;
        self.total += work;
        self.slowest = self.slowest.max(work);
        if work > budget {
            self.overruns += 1;
        }
    }

    /// Mean work time per frame.
    pub fn average(&self) -> Duration {
        match u32::try_from(self.frames) {
            Ok(0) => Duration::ZERO,
            Ok(n) => self.total / n,
            Err(_) => Duration::from_secs_f64(self.total.as_secs_f64() / self.frames as f64),
        }
    }
}

impl fmt::Display for FrameStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} frames, avg {:.2}ms, slowest {:.2}ms, {} overruns",
            self.frames,
            self.average().as_secs_f64() * 1000.0,
            self.slowest.as_secs_f64() * 1000.0,
            self.overruns
        )
    }
}

// =============================================================================
// Frame Pacer
// =============================================================================

/// Sleeps each frame out to a fixed budget.
#[derive(Debug)]
pub struct FramePacer {
    budget: Duration,
    frame_start: Instant,
    stats: FrameStats,
}

impl FramePacer {
    /// Pacer for `budget` per frame. The first frame starts now.
    pub fn new(budget: Duration) -> Self { Self { budget, frame_start: Instant::now(), stats: FrameStats::default() } }

    #[inline]
    pub const fn stats(&self) -> &FrameStats { &self.stats }

    /// End the current frame: sleep out the remaining budget and start the next.
    pub fn pace(&mut self) {
        let work = self.frame_start.elapsed();
        self.stats.record(work, self.budget);
        if let Some(left) = remaining(self.budget, work) {
            thread::sleep(left);
        } else {
            log::trace!("frame overran budget: {work:?} > {:?}", self.budget);
        }
        self.frame_start = Instant::now();
    }
}
