//! Color constants for the overlay menu.
//!
//! ## Rgb565 Color Format
//!
//! Rgb565 uses 16 bits per pixel: 5 bits red, 6 bits green, 5 bits blue. The menu
//! palette is defined in 8-bit terms (85/85/85 gray, 236/236/236 white) and
//! shifted down at compile time: `r >> 3`, `g >> 2`, `b >> 3`.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

// =============================================================================
// Standard Colors
// =============================================================================

/// Pure black (0, 0, 0). Blank surfaces and the simulator backdrop.
pub const BLACK: Rgb565 = Rgb565::BLACK;

/// Magenta (31, 0, 31). Never part of the menu palette, so zone surfaces use it
/// as the transparent color key.
pub const TRANSPARENT_KEY: Rgb565 = Rgb565::MAGENTA;

// =============================================================================
// Menu Palette
// =============================================================================

/// Main text and filled bar color. RGB888 (85, 85, 85).
pub const GRAY_MAIN: Rgb565 = Rgb565::new(85 >> 3, 85 >> 2, 85 >> 3);

/// Panel fill and hollow bar interior. RGB888 (236, 236, 236).
pub const WHITE_MAIN: Rgb565 = Rgb565::new(236 >> 3, 236 >> 2, 236 >> 3);

/// Panel outline, slightly darker than the fill.
pub const PANEL_BORDER: Rgb565 = Rgb565::new(160 >> 3, 160 >> 2, 160 >> 3);

/// Arrow fill. Drawn on top of arbitrary game content, so kept bright.
pub const ARROW: Rgb565 = Rgb565::WHITE;

// =============================================================================
// Simulator Palette
// =============================================================================

/// Colors the simulator cycles through to stand in for a running game.
pub const DEMO_BACKDROPS: [Rgb565; 6] = [
    Rgb565::new(4, 20, 12),
    Rgb565::new(20, 8, 4),
    Rgb565::new(6, 12, 24),
    Rgb565::new(24, 40, 2),
    Rgb565::new(14, 4, 18),
    Rgb565::new(2, 30, 26),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_components() {
        assert_eq!((GRAY_MAIN.r(), GRAY_MAIN.g(), GRAY_MAIN.b()), (10, 21, 10));
        assert_eq!((WHITE_MAIN.r(), WHITE_MAIN.g(), WHITE_MAIN.b()), (29, 59, 29));
    }

    #[test]
    fn test_color_key_not_in_palette() {
        for color in [BLACK, GRAY_MAIN, WHITE_MAIN, PANEL_BORDER, ARROW] {
            assert_ne!(color, TRANSPARENT_KEY, "Palette colors must never be keyed out");
        }
        for color in DEMO_BACKDROPS {
            assert_ne!(color, TRANSPARENT_KEY);
        }
    }
}
