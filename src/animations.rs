//! Zone transition animation.
//!
//! Moving between zones slides the outgoing zone off one edge while the incoming
//! zone slides in from the other. The animator only tracks the signed scroll
//! offset; the renderer turns it into blit positions.
//!
//! # Scroll Progression
//!
//! Each tick moves the offset `min(step, height - |offset|)` pixels in the
//! scroll direction, so the last step lands exactly on the zone height:
//!
//! ```text
//! height 240, step 30:  30, 60, 90, ... 210, 240 -> commit (offset back to 0)
//! height 100, step 30:  30, 60, 90, 100 -> commit
//! ```
//!
//! The commit happens in the same tick the boundary is reached: the offset is
//! reset to 0 and [`ScrollTick::Committed`] tells the navigator to promote the
//! current zone to "previous".

/// Direction of a zone transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollDirection {
    /// Next zone; content moves up.
    Down,
    /// Previous zone; content moves down.
    Up,
}

impl ScrollDirection {
    /// Sign of the scroll offset for this direction.
    #[inline]
    pub const fn sign(self) -> i32 {
        match self {
            Self::Down => 1,
            Self::Up => -1,
        }
    }
}

/// Result of advancing the animation by one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollTick {
    /// No transition in progress.
    Idle,
    /// Offset moved; the transition continues.
    Moved(i32),
    /// Boundary reached; offset reset to 0.
    Committed,
}

/// Scroll offset state for zone transitions.
#[derive(Clone, Copy, Debug)]
pub struct ScrollAnimator {
    offset: i32,
    direction: Option<ScrollDirection>,
    height: u32,
    step: u32,
}

impl ScrollAnimator {
    /// Animator for zones `height` pixels tall moving `step` pixels per frame.
    pub const fn new(height: u32, step: u32) -> Self {
        Self { offset: 0, direction: None, height, step: if step == 0 { 1 } else { step } }
    }

    /// Begin a transition. The offset starts moving on the next [`tick`](Self::tick).
    pub const fn start(&mut self, direction: ScrollDirection) {
        self.offset = 0;
        self.direction = Some(direction);
    }

    /// Signed offset in pixels, in `(-height, height)`.
    #[inline]
    pub const fn offset(&self) -> i32 { self.offset }

    /// Whether a transition is pending or running.
    #[inline]
    pub const fn is_active(&self) -> bool { self.direction.is_some() }

    /// Advance one frame.
    pub fn tick(&mut self) -> ScrollTick {
        let Some(direction) = self.direction else {
            return ScrollTick::Idle;
        };
        let travelled = self.offset.unsigned_abs();
        let advance = self.step.min(self.height.saturating_sub(travelled));
        self.offset += direction.sign() * advance as i32;

        if self.offset.unsigned_abs() >= self.height {
            self.offset = 0;
            self.direction = None;
            ScrollTick::Committed
        } else {
            ScrollTick::Moved(self.offset)
        }
    }
}
