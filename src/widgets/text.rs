//! Row-based text placement.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;

use crate::config::{CENTER_X, CENTER_Y, ROW_PADDING};
use crate::styles::CENTERED;

/// Anchor of text row `row`: horizontally centred, `row * ROW_PADDING` pixels
/// below the middle of the screen (negative rows are above it).
#[inline]
pub const fn row_anchor(row: i32) -> Point { Point::new(CENTER_X, CENTER_Y + row * ROW_PADDING) }

/// Draw `text` centred on `row`.
pub fn draw_row<D: DrawTarget<Color = Rgb565>>(
    display: &mut D,
    text: &str,
    row: i32,
    style: MonoTextStyle<'static, Rgb565>,
) {
    Text::with_text_style(text, row_anchor(row), style, CENTERED).draw(display).ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{GRAY_MAIN, TRANSPARENT_KEY};
    use crate::styles::TITLE_STYLE;
    use crate::surface::{Screen, Surface};

    #[test]
    fn test_row_anchor() {
        assert_eq!(row_anchor(0), Point::new(120, 120));
        assert_eq!(row_anchor(-2), Point::new(120, 84));
        assert_eq!(row_anchor(2), Point::new(120, 156));
    }

    #[test]
    fn test_draw_row_stays_near_its_row() {
        let mut surface = Surface::new(Size::new(240, 240), TRANSPARENT_KEY).unwrap();
        draw_row(&mut surface, "VOLUME", -1, TITLE_STYLE);
        let (mut min_y, mut max_y) = (i32::MAX, i32::MIN);
        for y in 0..240 {
            for x in 0..240 {
                if surface.pixel(Point::new(x, y)) == Some(GRAY_MAIN) {
                    min_y = min_y.min(y);
                    max_y = max_y.max(y);
                }
            }
        }
        assert!(min_y <= max_y, "Nothing drawn");
        assert!(min_y >= 102 - 12 && max_y <= 102 + 12, "Row -1 text must sit around y = 102, got {min_y}..={max_y}");
    }
}
