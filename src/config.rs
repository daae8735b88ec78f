//! Menu configuration: compile-time layout constants and the runtime TOML config.
//!
//! # Pre-computed Layout Constants
//!
//! Every position the renderer needs (row centres, progress bar origin, arrow
//! centres) is derived from the screen size at compile time, so drawing code
//! never repeats the arithmetic per frame.
//!
//! # Runtime Configuration
//!
//! [`MenuConfig`] is read from a TOML file. Every field has a default, so an
//! empty file (or no file at all) yields the stock handheld menu:
//!
//! ```toml
//! zones = ["volume", "brightness", "save", "load", "exit", "powerdown"]
//! volume_step = 10
//! fps = 60
//!
//! [commands]
//! volume_get = "volume get"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::Result;
use crate::zone::ZoneKind;

// =============================================================================
// Display Configuration
// =============================================================================

/// Display width in pixels (square 240x240 handheld panel).
pub const SCREEN_WIDTH: u32 = 240;

/// Display height in pixels.
pub const SCREEN_HEIGHT: u32 = 240;

/// Zones always cover the full viewport.
pub const ZONE_WIDTH: u32 = SCREEN_WIDTH;

/// Zone height, which is also the scroll distance of one transition.
pub const ZONE_HEIGHT: u32 = SCREEN_HEIGHT;

/// Screen center X coordinate, pre-computed as i32 for drawing code.
pub const CENTER_X: i32 = (SCREEN_WIDTH / 2) as i32;

/// Screen center Y coordinate, pre-computed as i32 for drawing code.
pub const CENTER_Y: i32 = (SCREEN_HEIGHT / 2) as i32;

// =============================================================================
// Zone Panel Layout
// =============================================================================

/// Width of the rounded panel drawn in the middle of every zone.
pub const PANEL_WIDTH: u32 = 180;

/// Height of the rounded panel.
pub const PANEL_HEIGHT: u32 = 140;

/// Corner radius of the panel.
pub const PANEL_CORNER_RADIUS: u32 = 10;

/// Vertical distance between text rows. Row `r` is centred at `CENTER_Y + r * ROW_PADDING`.
pub const ROW_PADDING: i32 = 18;

/// Progress bar size used by the volume and brightness zones.
pub const PROGRESS_BAR_WIDTH: u16 = 100;

/// Progress bar height.
pub const PROGRESS_BAR_HEIGHT: u16 = 20;

/// Progress bar top-left X: horizontally centred.
pub const PROGRESS_BAR_X: u16 = ((SCREEN_WIDTH - PROGRESS_BAR_WIDTH as u32) / 2) as u16;

/// Progress bar top-left Y: centred one row below the middle.
pub const PROGRESS_BAR_Y: u16 = ((SCREEN_HEIGHT - PROGRESS_BAR_HEIGHT as u32) / 2) as u16 + ROW_PADDING as u16;

/// Theme names longer than this are elided.
pub const THEME_NAME_MAX_CHARS: usize = 15;

// =============================================================================
// Navigation Arrows
// =============================================================================

/// Arrow triangle width.
pub const ARROW_WIDTH: u32 = 16;

/// Arrow triangle height.
pub const ARROW_HEIGHT: u32 = 8;

/// Centre Y of the "up" arrow, halfway between the screen top and the panel.
pub const ARROW_TOP_Y: i32 = ((SCREEN_HEIGHT - PANEL_HEIGHT) / 4) as i32;

/// Centre Y of the "down" arrow.
pub const ARROW_BOTTOM_Y: i32 = SCREEN_HEIGHT as i32 - ARROW_TOP_Y;

// =============================================================================
// Defaults
// =============================================================================

/// Pixels scrolled per frame during a zone transition.
pub const DEFAULT_SCROLL_SPEED_PX: u32 = 30;

/// Target frame rate of the menu loop.
pub const DEFAULT_FPS: u32 = 60;

/// Volume/brightness change per Left/Right press.
pub const DEFAULT_STEP: u8 = 10;

/// Number of save/load slots.
pub const DEFAULT_SAVE_SLOTS: u8 = 9;

/// Value used when the volume or brightness cannot be read.
pub const FALLBACK_PERCENT: u8 = 50;

// =============================================================================
// Runtime Configuration
// =============================================================================

/// External commands run by [`ShellProbe`](crate::shell::ShellProbe) and
/// [`ShellLauncher`](crate::services::ShellLauncher).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ShellCommands {
    pub volume_get: String,
    pub volume_set: String,
    pub brightness_get: String,
    pub brightness_set: String,
    pub usb_data_connected: String,
    pub usb_check_sharing: String,
    pub usb_mount: String,
    pub usb_unmount: String,
    pub read_only: String,
    pub read_write: String,
    pub read_write_check: String,
    pub powerdown: String,
    pub set_launcher: String,
}

impl Default for ShellCommands {
    fn default() -> Self {
        Self {
            volume_get: "volume get".into(),
            volume_set: "volume set".into(),
            brightness_get: "brightness get".into(),
            brightness_set: "brightness set".into(),
            usb_data_connected: "share is_usb_data_connected".into(),
            usb_check_sharing: "share is_sharing".into(),
            usb_mount: "share start".into(),
            usb_unmount: "share stop".into(),
            read_only: "ro".into(),
            read_write: "rw".into(),
            read_write_check: "grep -q ' / .*rw,' /proc/mounts".into(),
            powerdown: "powerdown now".into(),
            set_launcher: "set_launcher gmenu2x".into(),
        }
    }
}

/// Menu settings loaded at startup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    /// Enabled zone kinds. Listing order is ignored: zones always appear in
    /// registration order.
    pub zones: Vec<ZoneKind>,
    pub volume_step: u8,
    pub brightness_step: u8,
    pub save_slots: u8,
    pub scroll_speed_px: u32,
    pub fps: u32,
    /// Force the root filesystem read-only when the menu starts and when it
    /// shuts down. A read-write choice made in a session lasts until then.
    pub force_read_only: bool,
    /// Label baked into the launcher zone.
    pub launcher_name: String,
    /// Directory holding `layouts/` and `layout.conf`. No theme zone without it.
    pub theme_root: Option<PathBuf>,
    pub commands: ShellCommands,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            zones: ZoneKind::ALL.to_vec(),
            volume_step: DEFAULT_STEP,
            brightness_step: DEFAULT_STEP,
            save_slots: DEFAULT_SAVE_SLOTS,
            scroll_speed_px: DEFAULT_SCROLL_SPEED_PX,
            fps: DEFAULT_FPS,
            force_read_only: true,
            launcher_name: "GMENU2X".into(),
            theme_root: None,
            commands: ShellCommands::default(),
        }
    }
}

impl MenuConfig {
    /// Parse a TOML document and normalise it.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        Ok(config.validated())
    }

    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Load a config file, falling back to defaults when it is missing or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::info!("no config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => {
                log::info!("loaded menu config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("ignoring config {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Clamp values that would break the menu (zero steps, zero slots, zero fps).
    #[must_use]
    pub fn validated(mut self) -> Self {
        self.volume_step = self.volume_step.clamp(1, 100);
        self.brightness_step = self.brightness_step.clamp(1, 100);
        self.save_slots = self.save_slots.max(1);
        self.scroll_speed_px = self.scroll_speed_px.max(1);
        self.fps = self.fps.max(1);
        self
    }

    /// Whether a zone kind is enabled.
    pub fn is_enabled(&self, kind: ZoneKind) -> bool { self.zones.contains(&kind) }

    /// Frame budget derived from the target frame rate.
    pub fn frame_time(&self) -> Duration { Duration::from_secs(1) / self.fps.max(1) }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    // -------------------------------------------------------------------------
    // Layout Constants Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_progress_bar_origin() {
        assert_eq!(PROGRESS_BAR_X, 70, "Bar should be horizontally centred");
        assert_eq!(PROGRESS_BAR_Y, 128, "Bar should sit one row below centre");
    }

    #[test]
    fn test_arrow_positions() {
        assert_eq!(ARROW_TOP_Y, 25);
        assert_eq!(ARROW_BOTTOM_Y, 215);
    }

    // -------------------------------------------------------------------------
    // MenuConfig Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_default_enables_every_zone() {
        let config = MenuConfig::default();
        for kind in ZoneKind::ALL {
            assert!(config.is_enabled(kind), "{kind:?} should be enabled by default");
        }
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = MenuConfig::from_toml("").unwrap();
        assert_eq!(config, MenuConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let config = MenuConfig::from_toml(
            r#"
            zones = ["powerdown", "volume"]
            volume_step = 5
            launcher_name = "RETROFE"

            [commands]
            volume_get = "amixer get"
            "#,
        )
        .unwrap();
        assert_eq!(config.zones, vec![ZoneKind::Powerdown, ZoneKind::Volume]);
        assert_eq!(config.volume_step, 5);
        assert_eq!(config.brightness_step, DEFAULT_STEP);
        assert_eq!(config.launcher_name, "RETROFE");
        assert_eq!(config.commands.volume_get, "amixer get");
        assert_eq!(config.commands.volume_set, "volume set", "Unset commands keep defaults");
    }

    #[test]
    fn test_unknown_zone_is_rejected() {
        assert!(MenuConfig::from_toml(r#"zones = ["radio"]"#).is_err());
    }

    #[test]
    fn test_validated_clamps_zeroes() {
        let config = MenuConfig::from_toml("volume_step = 0\nsave_slots = 0\nfps = 0\nscroll_speed_px = 0").unwrap();
        assert_eq!(config.volume_step, 1);
        assert_eq!(config.save_slots, 1);
        assert_eq!(config.fps, 1);
        assert_eq!(config.scroll_speed_px, 1);
    }

    #[test]
    fn test_validated_clamps_large_step() {
        let config = MenuConfig::from_toml("brightness_step = 250").unwrap();
        assert_eq!(config.brightness_step, 100);
    }

    #[test]
    fn test_frame_time() {
        let config = MenuConfig::default();
        assert_eq!(config.frame_time(), Duration::from_secs(1) / 60);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "save_slots = 4").unwrap();
        let config = MenuConfig::load(file.path()).unwrap();
        assert_eq!(config.save_slots, 4);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = MenuConfig::load_or_default(&dir.path().join("absent.toml"));
        assert_eq!(config, MenuConfig::default());
    }

    #[test]
    fn test_load_or_default_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "fps = \"fast\"").unwrap();
        let config = MenuConfig::load_or_default(file.path());
        assert_eq!(config, MenuConfig::default());
    }
}
