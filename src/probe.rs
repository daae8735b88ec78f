//! System value probe: the boundary between the menu and live system settings.
//!
//! Reads are best-effort. [`SystemValues::read`] never fails: any probe error is
//! logged and replaced with a fixed default, so a broken mixer or a missing USB
//! helper can't keep the menu from opening. Mutators report success or failure
//! and the caller only updates in-memory state on success.

use crate::config::FALLBACK_PERCENT;
use crate::error::{MenuError, Result};

/// Queries and commands for the settings the menu controls.
pub trait SystemProbe {
    fn read_volume(&mut self) -> Result<u8>;
    fn read_brightness(&mut self) -> Result<u8>;
    fn read_usb_connected(&mut self) -> Result<bool>;
    fn read_usb_sharing(&mut self) -> Result<bool>;
    /// `true` when the root filesystem is mounted read-write.
    fn read_filesystem_mode(&mut self) -> Result<bool>;

    fn set_volume(&mut self, percent: u8) -> Result<()>;
    fn set_brightness(&mut self, percent: u8) -> Result<()>;
    fn mount_usb(&mut self) -> Result<()>;
    fn unmount_usb(&mut self) -> Result<()>;
    fn set_filesystem_mode(&mut self, read_write: bool) -> Result<()>;
    /// On real hardware this does not return on success.
    fn power_down(&mut self) -> Result<()>;
}

/// Normalised snapshot of the probed settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SystemValues {
    pub volume: u8,
    pub brightness: u8,
    pub usb_connected: bool,
    pub usb_sharing: bool,
    pub read_write: bool,
}

impl Default for SystemValues {
    fn default() -> Self {
        Self {
            volume: FALLBACK_PERCENT,
            brightness: FALLBACK_PERCENT,
            usb_connected: false,
            usb_sharing: false,
            read_write: false,
        }
    }
}

impl SystemValues {
    /// Read every value, substituting defaults for failed queries.
    ///
    /// Sharing without a data connection is impossible, so a disconnected cable
    /// forces `usb_sharing` off whatever the helper reported.
    pub fn read(probe: &mut dyn SystemProbe) -> Self {
        let defaults = Self::default();
        let volume = or_default("volume", probe.read_volume(), defaults.volume);
        let brightness = or_default("brightness", probe.read_brightness(), defaults.brightness);
        let usb_connected = or_default("USB connection", probe.read_usb_connected(), defaults.usb_connected);
        let usb_sharing =
            usb_connected && or_default("USB sharing", probe.read_usb_sharing(), defaults.usb_sharing);
        let read_write = or_default("filesystem mode", probe.read_filesystem_mode(), defaults.read_write);
        let values = Self {
            volume: volume.min(100),
            brightness: brightness.min(100),
            usb_connected,
            usb_sharing,
            read_write,
        };
        log::debug!("probed {values:?}");
        values
    }
}

fn or_default<T: Copy + core::fmt::Debug>(what: &str, value: Result<T>, default: T) -> T {
    value.unwrap_or_else(|e| {
        log::warn!("cannot read {what} ({e}), using {default:?}");
        default
    })
}

/// Parse a percentage from command output.
///
/// The output must start with a digit (leading whitespace is ignored); the
/// leading run of digits is the value, clamped to 100. `"73\n"` and `"73%"` both
/// read as 73.
pub fn parse_percentage(command: &str, output: &str) -> Result<u8> {
    let malformed = || MenuError::Malformed { command: command.to_owned(), output: output.to_owned() };
    let trimmed = output.trim_start();
    let digits = trimmed.find(|c: char| !c.is_ascii_digit()).map_or(trimmed, |end| &trimmed[..end]);
    if digits.is_empty() {
        return Err(malformed());
    }
    // Long digit runs overflow u32; anything that large is over 100 anyway.
    let value = digits.parse::<u32>().unwrap_or(u32::MAX);
    Ok(value.min(100) as u8)
}
