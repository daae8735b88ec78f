//! Frame composition and redraw tracking.
//!
//! Every frame is painted back to front onto the target:
//!
//! | Layer | When |
//! |-------|------|
//! | Background snapshot | always |
//! | Previous zone at `y = -offset` | always |
//! | Incoming zone at `y = sign * H - offset` | while scrolling |
//! | Overlay (bar, value text, caption) | settled only |
//! | Navigation arrows | settled and not USB sharing |
//!
//! When settled, previous and current are the same zone, so layer 2 is simply
//! the current zone at `y = 0`.
//!
//! # Redraw Tracking
//!
//! [`RenderState`] decides whether a frame needs painting at all. The first
//! frame always does; after that only input that changed something, an
//! animation tick, or the progress frame before an action marks it dirty.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::config::{PROGRESS_BAR_HEIGHT, PROGRESS_BAR_WIDTH, PROGRESS_BAR_X, PROGRESS_BAR_Y};
use crate::registry::Zone;
use crate::styles::{INFO_STYLE, TITLE_STYLE};
use crate::surface::Surface;
use crate::widgets::{draw_arrows, draw_progress_bar, draw_row};
use crate::zone::{Overlay, Phase, ZoneValues};

// =============================================================================
// Frame View
// =============================================================================

/// Everything one frame depends on, borrowed from the session.
#[derive(Clone, Copy, Debug)]
pub struct FrameView<'a> {
    pub zones: &'a [Zone],
    pub snapshot: &'a Surface,
    pub current: usize,
    pub previous: usize,
    pub scroll_offset: i32,
    pub phase: Phase,
    pub values: &'a ZoneValues,
}

impl FrameView<'_> {
    #[inline]
    const fn is_scrolling(&self) -> bool { self.scroll_offset != 0 }
}

/// Paint one complete frame onto `display`.
pub fn draw_frame<D: DrawTarget<Color = Rgb565> + OriginDimensions>(display: &mut D, view: &FrameView<'_>) {
    view.snapshot.blit(display, Point::zero());

    let offset = view.scroll_offset;
    if let Some(previous) = view.zones.get(view.previous) {
        previous.background.blit(display, Point::new(0, -offset));
    }

    if view.is_scrolling() {
        if let Some(incoming) = view.zones.get(view.current) {
            let height = display.size().height as i32;
            incoming.background.blit(display, Point::new(0, offset.signum() * height - offset));
        }
        return;
    }

    if let Some(zone) = view.zones.get(view.current) {
        draw_overlay(display, &(zone.kind.behavior().overlay)(view.values, view.phase));
    }
    if !view.values.system.usb_sharing {
        draw_arrows(display);
    }
}

fn draw_overlay<D: DrawTarget<Color = Rgb565> + OriginDimensions>(display: &mut D, overlay: &Overlay) {
    if let Some(bar) = overlay.bar {
        draw_progress_bar(
            display,
            Point::new(i32::from(PROGRESS_BAR_X), i32::from(PROGRESS_BAR_Y)),
            Size::new(u32::from(PROGRESS_BAR_WIDTH), u32::from(PROGRESS_BAR_HEIGHT)),
            bar.percent,
            u32::from(bar.bars),
        );
    }
    for line in &overlay.lines {
        let style = if line.large { TITLE_STYLE } else { INFO_STYLE };
        draw_row(display, &line.text, line.row, style);
    }
}

// =============================================================================
// Redraw Tracking
// =============================================================================

/// Tracks whether the next frame needs painting.
#[derive(Clone, Copy, Debug)]
pub struct RenderState {
    /// Nothing painted yet; the snapshot must be covered by the menu.
    first_frame: bool,

    /// Something visible changed since the last paint.
    dirty: bool,

    /// Frames actually painted this session.
    frames_drawn: u32,
}

impl RenderState {
    pub const fn new() -> Self { Self { first_frame: true, dirty: false, frames_drawn: 0 } }

    /// Request a repaint on the next frame.
    #[inline]
    pub const fn mark_dirty(&mut self) { self.dirty = true; }

    #[inline]
    pub const fn needs_redraw(&self) -> bool { self.first_frame || self.dirty }

    #[inline]
    pub const fn frames_drawn(&self) -> u32 { self.frames_drawn }

    /// Call after painting to reset per-frame state.
    pub const fn end_frame(&mut self) {
        self.first_frame = false;
        self.dirty = false;
        self.frames_drawn = self.frames_drawn.saturating_add(1);
    }
}

impl Default for RenderState {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Unit Tests
// =============================================================================
