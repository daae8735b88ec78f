//! Low-level drawing primitives: the segmented progress bar and the
//! navigation arrows.
//!
//! # Progress Bar Layout
//!
//! The bar is a row of `bars` segments with a 1px outline and a bar/padding
//! ratio of 3. All arithmetic is integer and happens once in [`BarLayout`]:
//!
//! ```text
//! max_bars  = (width * 3 / 3 + 1) / 4
//! bar_width = (width / bars) * 3 / 4 + 1
//! padding   = bar_width / 3
//! filled    = bars * percent / 100
//! ```
//!
//! Filled segments are solid gray. Hollow segments are a gray rectangle with a
//! white interior inset by the line width. Zero bars draws nothing.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle, Triangle};

use crate::colors::{ARROW, GRAY_MAIN, WHITE_MAIN};
use crate::config::{ARROW_BOTTOM_Y, ARROW_HEIGHT, ARROW_TOP_Y, ARROW_WIDTH, CENTER_X};

/// Outline width of a hollow segment.
const LINE_WIDTH: u32 = 1;

/// Segment width to gap width ratio.
const PADDING_RATIO: u32 = 3;

const FILLED_STYLE: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_fill(GRAY_MAIN);
const HOLLOW_STYLE: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_fill(WHITE_MAIN);
const ARROW_STYLE: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_fill(ARROW);

/// Clamped segment geometry for one progress bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BarLayout {
    pub origin: Point,
    pub height: u32,
    pub bars: u32,
    pub filled: u32,
    pub bar_width: u32,
    pub padding: u32,
}

impl BarLayout {
    /// Fit a bar into `bounds`.
    ///
    /// The origin is clamped inside the bounds, the size is clamped to at least
    /// `2 * LINE_WIDTH + 1` and at most what fits before the right/bottom edge,
    /// the segment count to what the width allows, and the percentage to 100.
    pub fn new(bounds: Size, origin: Point, size: Size, percent: u8, bars: u32) -> Self {
        let min_side = LINE_WIDTH * 2 + 1;
        let x = (origin.x.max(0) as u32).min(bounds.width.saturating_sub(1));
        let y = (origin.y.max(0) as u32).min(bounds.height.saturating_sub(1));
        let width = size.width.max(min_side).min(bounds.width.saturating_sub(x + 1));
        let height = size.height.max(min_side).min(bounds.height.saturating_sub(y + 1));

        let max_bars = (width * PADDING_RATIO / min_side + 1) / (PADDING_RATIO + 1);
        let bars = bars.min(max_bars);
        let percent = u32::from(percent.min(100));
        let (bar_width, padding) = if bars == 0 {
            (0, 0)
        } else {
            let bar_width = (width / bars) * PADDING_RATIO / (PADDING_RATIO + 1) + 1;
            (bar_width, bar_width / PADDING_RATIO)
        };

        Self {
            origin: Point::new(x as i32, y as i32),
            height,
            bars,
            filled: bars * percent / 100,
            bar_width,
            padding,
        }
    }

    /// Bounding rectangle of segment `i`.
    pub fn segment(&self, i: u32) -> Rectangle {
        let x = self.origin.x + (i * (self.bar_width + self.padding)) as i32;
        Rectangle::new(Point::new(x, self.origin.y), Size::new(self.bar_width, self.height))
    }
}

/// Draw a segmented progress bar; see [`BarLayout`] for the geometry.
pub fn draw_progress_bar<D: DrawTarget<Color = Rgb565> + OriginDimensions>(
    display: &mut D,
    origin: Point,
    size: Size,
    percent: u8,
    bars: u32,
) {
    let layout = BarLayout::new(display.size(), origin, size, percent, bars);
    for i in 0..layout.bars {
        let segment = layout.segment(i);
        segment.into_styled(FILLED_STYLE).draw(display).ok();
        if i >= layout.filled {
            segment.offset(-(LINE_WIDTH as i32)).into_styled(HOLLOW_STYLE).draw(display).ok();
        }
    }
}

/// Draw the up and down navigation arrows.
pub fn draw_arrows<D: DrawTarget<Color = Rgb565>>(display: &mut D) {
    let half_w = (ARROW_WIDTH / 2) as i32;
    let half_h = (ARROW_HEIGHT / 2) as i32;

    Triangle::new(
        Point::new(CENTER_X, ARROW_TOP_Y - half_h),
        Point::new(CENTER_X - half_w, ARROW_TOP_Y + half_h),
        Point::new(CENTER_X + half_w, ARROW_TOP_Y + half_h),
    )
    .into_styled(ARROW_STYLE)
    .draw(display)
    .ok();

    Triangle::new(
        Point::new(CENTER_X, ARROW_BOTTOM_Y + half_h),
        Point::new(CENTER_X - half_w, ARROW_BOTTOM_Y - half_h),
        Point::new(CENTER_X + half_w, ARROW_BOTTOM_Y - half_h),
    )
    .into_styled(ARROW_STYLE)
    .draw(display)
    .ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::TRANSPARENT_KEY;
    use crate::config::{PROGRESS_BAR_HEIGHT, PROGRESS_BAR_WIDTH, PROGRESS_BAR_X, PROGRESS_BAR_Y};
    use crate::surface::{Screen, Surface};

    const SCREEN: Size = Size::new(240, 240);

    fn bar_origin() -> Point { Point::new(i32::from(PROGRESS_BAR_X), i32::from(PROGRESS_BAR_Y)) }

    fn bar_size() -> Size { Size::new(u32::from(PROGRESS_BAR_WIDTH), u32::from(PROGRESS_BAR_HEIGHT)) }

    // -------------------------------------------------------------------------
    // Layout Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_layout_ten_bars() {
        let layout = BarLayout::new(SCREEN, bar_origin(), bar_size(), 70, 10);
        assert_eq!(layout.bars, 10);
        assert_eq!(layout.filled, 7);
        assert_eq!(layout.bar_width, 8, "(100 / 10) * 3 / 4 + 1");
        assert_eq!(layout.padding, 2);
        assert_eq!(layout.origin, Point::new(70, 128));
        assert_eq!(layout.segment(1).top_left, Point::new(80, 128));
    }

    #[test]
    fn test_layout_clamps_bar_count() {
        let layout = BarLayout::new(SCREEN, bar_origin(), bar_size(), 50, 100);
        assert_eq!(layout.bars, 25, "(100 * 3 / 3 + 1) / 4");
        assert_eq!(layout.bar_width, 4);
        assert_eq!(layout.filled, 12);
    }

    #[test]
    fn test_layout_clamps_percent_and_position() {
        let layout = BarLayout::new(SCREEN, Point::new(500, -4), bar_size(), 250, 10);
        assert_eq!(layout.origin, Point::new(239, 0));
        assert_eq!(layout.filled, 0, "Width clamps to 0 at the right edge, so no bars fit");

        let layout = BarLayout::new(SCREEN, bar_origin(), bar_size(), 250, 10);
        assert_eq!(layout.filled, 10);
    }

    #[test]
    fn test_layout_zero_bars() {
        let layout = BarLayout::new(SCREEN, bar_origin(), bar_size(), 50, 0);
        assert_eq!((layout.bars, layout.filled, layout.bar_width), (0, 0, 0));
    }

    // -------------------------------------------------------------------------
    // Drawing Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_progress_bar_pixels() {
        let mut surface = Surface::new(SCREEN, TRANSPARENT_KEY).unwrap();
        draw_progress_bar(&mut surface, bar_origin(), bar_size(), 30, 10);

        // Segment 0 is filled, segment 5 is hollow.
        assert_eq!(surface.pixel(Point::new(74, 138)), Some(GRAY_MAIN));
        assert_eq!(surface.pixel(Point::new(120, 128)), Some(GRAY_MAIN), "Hollow outline");
        assert_eq!(surface.pixel(Point::new(123, 138)), Some(WHITE_MAIN), "Hollow interior");
        // Gap between segments is untouched.
        assert_eq!(surface.pixel(Point::new(78, 138)), Some(TRANSPARENT_KEY));
    }

    #[test]
    fn test_zero_bars_draws_nothing() {
        let mut surface = Surface::new(SCREEN, TRANSPARENT_KEY).unwrap();
        draw_progress_bar(&mut surface, bar_origin(), bar_size(), 100, 0);
        assert_eq!(surface, Surface::new(SCREEN, TRANSPARENT_KEY).unwrap());
    }

    #[test]
    fn test_arrows_drawn_at_both_ends() {
        let mut surface = Surface::new(SCREEN, TRANSPARENT_KEY).unwrap();
        draw_arrows(&mut surface);
        assert_eq!(surface.pixel(Point::new(CENTER_X, ARROW_TOP_Y)), Some(ARROW));
        assert_eq!(surface.pixel(Point::new(CENTER_X, ARROW_BOTTOM_Y)), Some(ARROW));
        assert_eq!(surface.pixel(Point::new(CENTER_X, 120)), Some(TRANSPARENT_KEY));
    }
}
