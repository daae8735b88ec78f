//! Zone registry: builds the ordered list of zones when a session opens.
//!
//! Each [`Zone`] owns a full-screen background with its static text baked in.
//! Nothing on a zone surface changes during the session; values, captions and
//! arrows are drawn over it every frame by the renderer.
//!
//! # Baking Order
//!
//! 1. Background from the [`ZoneArt`] provider (a blank keyed surface if it fails)
//! 2. Title on its row
//! 3. Empty progress bar (volume, brightness)
//! 4. Launcher name (launcher zone)

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyleBuilder, Rectangle, RoundedRectangle, StrokeAlignment};

use crate::colors::{PANEL_BORDER, TRANSPARENT_KEY, WHITE_MAIN};
use crate::config::{
    MenuConfig,
    PANEL_CORNER_RADIUS,
    PANEL_HEIGHT,
    PANEL_WIDTH,
    PROGRESS_BAR_HEIGHT,
    PROGRESS_BAR_WIDTH,
    PROGRESS_BAR_X,
    PROGRESS_BAR_Y,
    ZONE_HEIGHT,
    ZONE_WIDTH,
};
use crate::error::{MenuError, Result};
use crate::styles::TITLE_STYLE;
use crate::surface::Surface;
use crate::widgets::{draw_progress_bar, draw_row};
use crate::zone::ZoneKind;

/// Top-left corner of the centred panel.
const PANEL_ORIGIN: Point =
    Point::new(((ZONE_WIDTH - PANEL_WIDTH) / 2) as i32, ((ZONE_HEIGHT - PANEL_HEIGHT) / 2) as i32);

/// Source of zone background art.
pub trait ZoneArt {
    /// Background for a zone of `size`. Pixels equal to the surface's color key
    /// show the snapshot through.
    fn background(&self, size: Size) -> Result<Surface>;
}

/// Default art: a rounded light panel in the middle of a transparent surface.
#[derive(Clone, Copy, Debug, Default)]
pub struct PanelArt;

impl ZoneArt for PanelArt {
    fn background(&self, size: Size) -> Result<Surface> {
        let mut surface = Surface::new(size, TRANSPARENT_KEY)?.with_color_key(TRANSPARENT_KEY);
        let style = PrimitiveStyleBuilder::new()
            .fill_color(WHITE_MAIN)
            .stroke_color(PANEL_BORDER)
            .stroke_width(1)
            .stroke_alignment(StrokeAlignment::Inside)
            .build();
        RoundedRectangle::with_equal_corners(
            Rectangle::new(PANEL_ORIGIN, Size::new(PANEL_WIDTH, PANEL_HEIGHT)),
            Size::new_equal(PANEL_CORNER_RADIUS),
        )
        .into_styled(style)
        .draw(&mut surface)
        .ok();
        Ok(surface)
    }
}

/// Which collaborators are attached to this session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Availability {
    /// A game host is attached (save and load zones).
    pub game: bool,
    /// Number of layouts in the theme catalog; 0 hides the theme zone.
    pub theme_count: usize,
    /// Launcher display name; `None` hides the launcher zone.
    pub launcher_name: Option<String>,
}

impl Availability {
    fn allows(&self, kind: ZoneKind) -> bool {
        match kind {
            ZoneKind::Save | ZoneKind::Load => self.game,
            ZoneKind::Theme => self.theme_count > 0,
            ZoneKind::Launcher => self.launcher_name.is_some(),
            _ => true,
        }
    }
}

/// One menu screen.
#[derive(Debug)]
pub struct Zone {
    pub kind: ZoneKind,
    pub background: Surface,
}

/// Create every enabled and available zone, in registration order.
///
/// Fails with [`MenuError::NoZones`] if nothing is left.
pub fn build_zones(config: &MenuConfig, availability: &Availability, art: &dyn ZoneArt) -> Result<Vec<Zone>> {
    let size = Size::new(ZONE_WIDTH, ZONE_HEIGHT);
    let mut zones = Vec::new();

    for kind in ZoneKind::ALL {
        if !config.is_enabled(kind) {
            continue;
        }
        if !availability.allows(kind) {
            log::debug!("{kind:?} zone skipped, collaborator missing");
            continue;
        }
        let background = match art.background(size) {
            Ok(surface) => surface,
            Err(e) => {
                log::warn!("{kind:?} background unavailable, using a blank zone: {e}");
                Surface::new(size, TRANSPARENT_KEY)?.with_color_key(TRANSPARENT_KEY)
            }
        };
        zones.push(Zone { kind, background: bake(kind, background, availability, config) });
    }

    if zones.is_empty() {
        return Err(MenuError::NoZones);
    }
    log::debug!("built {} zones: {:?}", zones.len(), zones.iter().map(|z| z.kind).collect::<Vec<_>>());
    Ok(zones)
}

fn bake(kind: ZoneKind, mut surface: Surface, availability: &Availability, config: &MenuConfig) -> Surface {
    let behavior = kind.behavior();
    draw_row(&mut surface, behavior.title, behavior.title_row, TITLE_STYLE);

    if behavior.baked_bar {
        let step = match kind {
            ZoneKind::Brightness => config.brightness_step,
            _ => config.volume_step,
        };
        draw_progress_bar(
            &mut surface,
            Point::new(i32::from(PROGRESS_BAR_X), i32::from(PROGRESS_BAR_Y)),
            Size::new(u32::from(PROGRESS_BAR_WIDTH), u32::from(PROGRESS_BAR_HEIGHT)),
            0,
            100 / u32::from(step.max(1)),
        );
    }

    if kind == ZoneKind::Launcher {
        if let Some(name) = &availability.launcher_name {
            draw_row(&mut surface, name, 0, TITLE_STYLE);
        }
    }
    surface
}
