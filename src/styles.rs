//! Pre-computed static text styles.
//!
//! `MonoTextStyle` and `TextStyle` are `const`, so every zone title and overlay
//! caption references the same read-only style instead of building one per draw.
//! All menu text is gray on the white panel; only the font size varies.

use embedded_graphics::{
    mono_font::MonoTextStyle,
    pixelcolor::Rgb565,
    text::{Alignment, Baseline, TextStyle, TextStyleBuilder},
};
use profont::{PROFONT_14_POINT, PROFONT_18_POINT};

use crate::colors::GRAY_MAIN;

// =============================================================================
// Text Alignment Styles
// =============================================================================

/// Horizontally centred, vertically centred on the anchor point. Every menu text
/// row uses this, so a row's anchor is its visual centre.
pub const CENTERED: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Center)
    .baseline(Baseline::Middle)
    .build();

// =============================================================================
// Pre-computed Text Styles
// =============================================================================

/// Zone titles and the main value line (`ProFont` 18pt, ~12px wide).
pub const TITLE_STYLE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&PROFONT_18_POINT, GRAY_MAIN);

/// Captions: slot labels, selectors, confirmation and progress text (`ProFont` 14pt).
pub const INFO_STYLE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&PROFONT_14_POINT, GRAY_MAIN);
