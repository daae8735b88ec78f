//! Render surface contract and an owned Rgb565 framebuffer.
//!
//! The menu draws onto any [`Screen`]: an embedded-graphics `DrawTarget` that can
//! also report individual pixels (for the background snapshot) and present a
//! finished frame. The simulator window implements it in the binary; [`Surface`]
//! implements it for zone backgrounds, snapshots, and tests.
//!
//! # Color Key
//!
//! A surface may carry a color key. Pixels equal to the key are skipped by
//! [`Surface::blit`], which is how a zone's transparent margin lets the snapshot
//! of the game screen show through around the panel.

use std::convert::Infallible;
use std::fmt;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::colors::BLACK;
use crate::error::{MenuError, Result};

/// A display the menu can draw on, read back, and flip.
pub trait Screen: DrawTarget<Color = Rgb565> + OriginDimensions {
    /// Color of a single pixel, `None` outside the screen.
    fn pixel(&self, point: Point) -> Option<Rgb565>;

    /// Push the drawn frame to the user.
    fn present(&mut self);
}

/// Heap-backed Rgb565 framebuffer.
#[derive(Clone, PartialEq, Eq)]
pub struct Surface {
    size: Size,
    pixels: Vec<Rgb565>,
    color_key: Option<Rgb565>,
}

impl Surface {
    /// Allocate a surface filled with `fill`.
    ///
    /// Fails with [`MenuError::SurfaceAllocation`] for an empty size or when the
    /// allocator refuses the buffer.
    pub fn new(size: Size, fill: Rgb565) -> Result<Self> {
        let alloc_error = MenuError::SurfaceAllocation { width: size.width, height: size.height };
        let len = match (size.width as usize).checked_mul(size.height as usize) {
            Some(len) if len > 0 => len,
            _ => return Err(alloc_error),
        };
        let mut pixels = Vec::new();
        if pixels.try_reserve_exact(len).is_err() {
            return Err(alloc_error);
        }
        pixels.resize(len, fill);
        Ok(Self { size, pixels, color_key: None })
    }

    /// Copy the current contents of a screen.
    pub fn capture<S: Screen + ?Sized>(screen: &S) -> Result<Self> {
        let size = screen.size();
        let mut snapshot = Self::new(size, BLACK)?;
        for (i, point) in Rectangle::new(Point::zero(), size).points().enumerate() {
            if let (Some(color), Some(slot)) = (screen.pixel(point), snapshot.pixels.get_mut(i)) {
                *slot = color;
            }
        }
        Ok(snapshot)
    }

    /// Mark `key` as transparent for [`blit`](Self::blit).
    #[must_use]
    pub fn with_color_key(mut self, key: Rgb565) -> Self {
        self.color_key = Some(key);
        self
    }

    #[inline]
    pub const fn color_key(&self) -> Option<Rgb565> { self.color_key }

    fn index(&self, point: Point) -> Option<usize> {
        let (x, y) = (u32::try_from(point.x).ok()?, u32::try_from(point.y).ok()?);
        (x < self.size.width && y < self.size.height).then(|| (y * self.size.width + x) as usize)
    }

    /// Draw this surface onto `target` with its top-left corner at `origin`.
    ///
    /// The copy is clipped to the target's bounds, so origins partly (or fully)
    /// off-screen are fine. Keyed pixels are skipped.
    pub fn blit<D: DrawTarget<Color = Rgb565>>(&self, target: &mut D, origin: Point) {
        let area = Rectangle::new(origin, self.size).intersection(&target.bounding_box());
        if area.is_zero_sized() {
            return;
        }
        let pixels = area.points().filter_map(|point| {
            let color = self.index(point - origin).and_then(|i| self.pixels.get(i).copied())?;
            (self.color_key != Some(color)).then_some(Pixel(point, color))
        });
        target.draw_iter(pixels).ok();
    }
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("size", &self.size)
            .field("color_key", &self.color_key)
            .finish_non_exhaustive()
    }
}

impl OriginDimensions for Surface {
    fn size(&self) -> Size { self.size }
}

impl DrawTarget for Surface {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> std::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some(i) = self.index(point) {
                self.pixels[i] = color;
            }
        }
        Ok(())
    }
}

impl Screen for Surface {
    fn pixel(&self, point: Point) -> Option<Rgb565> { self.index(point).and_then(|i| self.pixels.get(i).copied()) }

    fn present(&mut self) {}
}

#[cfg(test)]
mod tests {
    use embedded_graphics::primitives::PrimitiveStyle;

    use super::*;
    use crate::colors::{GRAY_MAIN, TRANSPARENT_KEY, WHITE_MAIN};

    fn filled(w: u32, h: u32, color: Rgb565) -> Surface { Surface::new(Size::new(w, h), color).unwrap() }

    // -------------------------------------------------------------------------
    // Allocation Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_new_fills_every_pixel() {
        let surface = filled(4, 3, WHITE_MAIN);
        assert_eq!(surface.size(), Size::new(4, 3));
        for point in Rectangle::new(Point::zero(), Size::new(4, 3)).points() {
            assert_eq!(surface.pixel(point), Some(WHITE_MAIN));
        }
    }

    #[test]
    fn test_zero_size_is_allocation_error() {
        let err = Surface::new(Size::new(0, 240), BLACK).unwrap_err();
        assert!(matches!(err, MenuError::SurfaceAllocation { width: 0, height: 240 }));
    }

    #[test]
    fn test_pixel_out_of_bounds() {
        let surface = filled(2, 2, BLACK);
        assert_eq!(surface.pixel(Point::new(2, 0)), None);
        assert_eq!(surface.pixel(Point::new(0, -1)), None);
    }

    // -------------------------------------------------------------------------
    // Drawing Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_draw_target_clips() {
        let mut surface = filled(4, 4, BLACK);
        Rectangle::new(Point::new(2, 2), Size::new(10, 10))
            .into_styled(PrimitiveStyle::with_fill(GRAY_MAIN))
            .draw(&mut surface)
            .ok();
        assert_eq!(surface.pixel(Point::new(3, 3)), Some(GRAY_MAIN));
        assert_eq!(surface.pixel(Point::new(1, 1)), Some(BLACK));
    }

    #[test]
    fn test_capture_copies_screen() {
        let mut screen = filled(3, 3, BLACK);
        Pixel(Point::new(1, 2), GRAY_MAIN).draw(&mut screen).ok();
        let snapshot = Surface::capture(&screen).unwrap();
        assert_eq!(snapshot, screen);
    }

    // -------------------------------------------------------------------------
    // Blit Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_blit_offset_and_clip() {
        let source = filled(4, 4, GRAY_MAIN);
        let mut target = filled(6, 6, BLACK);
        source.blit(&mut target, Point::new(4, -2));
        assert_eq!(target.pixel(Point::new(4, 0)), Some(GRAY_MAIN));
        assert_eq!(target.pixel(Point::new(5, 1)), Some(GRAY_MAIN));
        assert_eq!(target.pixel(Point::new(5, 2)), Some(BLACK), "Rows past the source stay untouched");
        assert_eq!(target.pixel(Point::new(3, 0)), Some(BLACK));
    }

    #[test]
    fn test_blit_fully_offscreen_is_noop() {
        let source = filled(4, 4, GRAY_MAIN);
        let mut target = filled(4, 4, BLACK);
        source.blit(&mut target, Point::new(0, 4));
        assert_eq!(target, filled(4, 4, BLACK));
    }

    #[test]
    fn test_blit_skips_color_key() {
        let mut source = filled(2, 1, TRANSPARENT_KEY).with_color_key(TRANSPARENT_KEY);
        Pixel(Point::new(1, 0), WHITE_MAIN).draw(&mut source).ok();
        let mut target = filled(2, 1, GRAY_MAIN);
        source.blit(&mut target, Point::zero());
        assert_eq!(target.pixel(Point::new(0, 0)), Some(GRAY_MAIN), "Keyed pixel must not be copied");
        assert_eq!(target.pixel(Point::new(1, 0)), Some(WHITE_MAIN));
    }
}
