//! Zone kinds and their per-kind behavior table.
//!
//! Every kind-specific decision the menu makes (how Left/Right adjusts a value,
//! which action Confirm arms, what overlay the renderer draws, where the title
//! sits) is looked up in one place: [`ZoneKind::behavior`]. Navigation and
//! rendering code never match on the kind themselves.

use core::fmt::Write;

use heapless::{String, Vec};
use serde::Deserialize;

use crate::config::{DEFAULT_SAVE_SLOTS, DEFAULT_STEP, PROGRESS_BAR_WIDTH, THEME_NAME_MAX_CHARS};
use crate::probe::{SystemProbe, SystemValues};

// =============================================================================
// Zone Kinds
// =============================================================================

/// Closed set of menu screens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneKind {
    Volume,
    Brightness,
    Save,
    Load,
    AspectRatio,
    ReadWrite,
    Exit,
    Usb,
    Theme,
    Launcher,
    Powerdown,
}

impl ZoneKind {
    /// Every kind, in registration order.
    pub const ALL: [Self; 11] = [
        Self::Volume,
        Self::Brightness,
        Self::Save,
        Self::Load,
        Self::AspectRatio,
        Self::ReadWrite,
        Self::Exit,
        Self::Usb,
        Self::Theme,
        Self::Launcher,
        Self::Powerdown,
    ];

    /// Behavior table entry for this kind.
    pub fn behavior(self) -> &'static ZoneBehavior {
        match self {
            Self::Volume => &VOLUME,
            Self::Brightness => &BRIGHTNESS,
            Self::Save => &SAVE,
            Self::Load => &LOAD,
            Self::AspectRatio => &ASPECT_RATIO,
            Self::ReadWrite => &READ_WRITE,
            Self::Exit => &EXIT,
            Self::Usb => &USB,
            Self::Theme => &THEME,
            Self::Launcher => &LAUNCHER,
            Self::Powerdown => &POWERDOWN,
        }
    }

    /// Whether Confirm arms an action that needs a second Confirm.
    #[inline]
    pub fn requires_confirmation(self) -> bool { self.behavior().action.is_some() }
}

// =============================================================================
// Aspect Ratio
// =============================================================================

/// Screen scaling modes offered by the aspect ratio zone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AspectRatio {
    #[default]
    Stretched,
    Cropped,
    Scaled,
    Zoomed,
}

impl AspectRatio {
    pub const ALL: [Self; 4] = [Self::Stretched, Self::Cropped, Self::Scaled, Self::Zoomed];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Stretched => "STRETCHED",
            Self::Cropped => "CROPPED",
            Self::Scaled => "SCALED",
            Self::Zoomed => "ZOOMED",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Stretched => 0,
            Self::Cropped => 1,
            Self::Scaled => 2,
            Self::Zoomed => 3,
        }
    }

    /// Neighbouring mode, wrapping at both ends.
    #[must_use]
    pub const fn stepped(self, step: Step) -> Self { Self::ALL[step.wrap(self.index(), Self::ALL.len())] }
}

// =============================================================================
// Adjustment Direction
// =============================================================================

/// Direction of a Left/Right adjustment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Decrease,
    Increase,
}

impl Step {
    /// Move a percentage by `amount`, saturating at 0 and 100.
    #[inline]
    pub const fn percent(self, value: u8, amount: u8) -> u8 {
        match self {
            Self::Decrease => value.saturating_sub(amount),
            Self::Increase => {
                let raised = value.saturating_add(amount);
                if raised > 100 { 100 } else { raised }
            }
        }
    }

    /// Move an index over `len` entries, wrapping at both ends. `len == 0` yields 0.
    #[inline]
    pub const fn wrap(self, index: usize, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        match self {
            Self::Decrease => (index + len - 1) % len,
            Self::Increase => (index + 1) % len,
        }
    }
}

// =============================================================================
// Dynamic Values
// =============================================================================

/// Values the overlays display and Left/Right adjusts. Owned by the session,
/// not by any zone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZoneValues {
    pub system: SystemValues,
    pub save_slot: u8,
    pub slot_count: u8,
    pub aspect_ratio: AspectRatio,
    pub layout_index: usize,
    pub layout_names: std::vec::Vec<std::string::String>,
    pub volume_step: u8,
    pub brightness_step: u8,
}

impl ZoneValues {
    pub fn new(system: SystemValues) -> Self {
        Self {
            system,
            save_slot: 0,
            slot_count: DEFAULT_SAVE_SLOTS,
            aspect_ratio: AspectRatio::default(),
            layout_index: 0,
            layout_names: std::vec::Vec::new(),
            volume_step: DEFAULT_STEP,
            brightness_step: DEFAULT_STEP,
        }
    }
}

// =============================================================================
// Actions and Overlays
// =============================================================================

/// Side effect armed by Confirm and run by the second Confirm.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Save(u8),
    Load(u8),
    /// Unmount when sharing, mount otherwise.
    ToggleUsb { unmount: bool },
    /// Target filesystem mode.
    SetReadWrite(bool),
    ApplyTheme(usize),
    SwitchLauncher,
    Exit,
    PowerDown,
}

/// Confirmation stage shown by an overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Confirming,
    Running,
}

/// Text drawn centred on a row. Row `r` is centred `r * ROW_PADDING` pixels
/// below the middle of the screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextLine {
    pub text: String<64>,
    pub row: i32,
    /// Title font instead of the caption font.
    pub large: bool,
}

/// Quantised progress bar value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BarValue {
    pub percent: u8,
    pub bars: u16,
}

/// Dynamic content drawn over a settled zone.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Overlay {
    pub bar: Option<BarValue>,
    pub lines: Vec<TextLine, 3>,
}

impl Overlay {
    fn line(mut self, row: i32, large: bool, args: core::fmt::Arguments<'_>) -> Self {
        let mut text = String::new();
        if text.write_fmt(args).is_err() {
            log::warn!("overlay text truncated to {:?}", text.as_str());
        }
        if self.lines.push(TextLine { text, row, large }).is_err() {
            log::warn!("overlay line on row {row} dropped, overlay full");
        }
        self
    }

    /// Confirmation or progress caption two rows below centre.
    fn caption(self, phase: Phase, running: &str) -> Self {
        match phase {
            Phase::Idle => self,
            Phase::Confirming => self.line(2, false, format_args!("Are you sure?")),
            Phase::Running => self.line(2, false, format_args!("{running}")),
        }
    }
}

/// Shorten a theme name to the display budget: names longer than
/// [`THEME_NAME_MAX_CHARS`] keep their first `budget - 2` characters plus "...".
pub fn elide_theme_name(name: &str) -> String<64> {
    let mut out = String::new();
    if name.chars().count() > THEME_NAME_MAX_CHARS {
        for ch in name.chars().take(THEME_NAME_MAX_CHARS - 2) {
            let _ = out.push(ch);
        }
        let _ = out.push_str("...");
    } else {
        let _ = out.push_str(name);
    }
    out
}

// =============================================================================
// Behavior Table
// =============================================================================

type AdjustFn = fn(&mut ZoneValues, Step, &mut dyn SystemProbe) -> bool;
type ActionFn = fn(&ZoneValues) -> Action;
type OverlayFn = fn(&ZoneValues, Phase) -> Overlay;

/// Capabilities of one zone kind.
pub struct ZoneBehavior {
    /// Title baked into the zone background.
    pub title: &'static str,
    pub title_row: i32,
    /// Bake an empty progress bar under the title.
    pub baked_bar: bool,
    /// Left/Right handler; returns whether a redraw is needed.
    pub adjust: Option<AdjustFn>,
    /// Action armed by Confirm. `None` means Confirm is ignored.
    pub action: Option<ActionFn>,
    pub overlay: OverlayFn,
}

static VOLUME: ZoneBehavior = ZoneBehavior {
    title: "VOLUME",
    title_row: -1,
    baked_bar: true,
    adjust: Some(|values, step, probe| {
        let target = step.percent(values.system.volume, values.volume_step);
        log::debug!("volume -> {target}%");
        match probe.set_volume(target) {
            Ok(()) => values.system.volume = target,
            Err(e) => log::warn!("failed to set volume to {target}%: {e}"),
        }
        true
    }),
    action: None,
    overlay: |values, _| Overlay { bar: Some(bar(values.system.volume, values.volume_step)), ..Overlay::default() },
};

static BRIGHTNESS: ZoneBehavior = ZoneBehavior {
    title: "BRIGHTNESS",
    title_row: -1,
    baked_bar: true,
    adjust: Some(|values, step, probe| {
        let target = step.percent(values.system.brightness, values.brightness_step);
        log::debug!("brightness -> {target}%");
        match probe.set_brightness(target) {
            Ok(()) => values.system.brightness = target,
            Err(e) => log::warn!("failed to set brightness to {target}%: {e}"),
        }
        true
    }),
    action: None,
    overlay: |values, _| Overlay {
        bar: Some(bar(values.system.brightness, values.brightness_step)),
        ..Overlay::default()
    },
};

static SAVE: ZoneBehavior = ZoneBehavior {
    title: "SAVE",
    title_row: -2,
    baked_bar: false,
    adjust: Some(adjust_slot),
    action: Some(|values| Action::Save(values.save_slot)),
    overlay: |values, phase| {
        Overlay::default()
            .line(0, false, format_args!("IN SLOT   < {} >", values.save_slot + 1))
            .caption(phase, "Saving...")
    },
};

static LOAD: ZoneBehavior = ZoneBehavior {
    title: "LOAD",
    title_row: -2,
    baked_bar: false,
    adjust: Some(adjust_slot),
    action: Some(|values| Action::Load(values.save_slot)),
    overlay: |values, phase| {
        Overlay::default()
            .line(0, false, format_args!("FROM SLOT   < {} >", values.save_slot + 1))
            .caption(phase, "Loading...")
    },
};

static ASPECT_RATIO: ZoneBehavior = ZoneBehavior {
    title: "ASPECT RATIO",
    title_row: -1,
    baked_bar: false,
    adjust: Some(|values, step, _| {
        values.aspect_ratio = values.aspect_ratio.stepped(step);
        log::debug!("aspect ratio -> {}", values.aspect_ratio.label());
        true
    }),
    action: None,
    overlay: |values, _| Overlay::default().line(1, false, format_args!("<   {}   >", values.aspect_ratio.label())),
};

static READ_WRITE: ZoneBehavior = ZoneBehavior {
    title: "SET SYSTEM:",
    title_row: -2,
    baked_bar: false,
    adjust: None,
    action: Some(|values| Action::SetReadWrite(!values.system.read_write)),
    overlay: |values, phase| {
        let target = if values.system.read_write { "READ-ONLY" } else { "READ-WRITE" };
        Overlay::default().line(0, true, format_args!("{target}")).caption(phase, "in progress ...")
    },
};

static EXIT: ZoneBehavior = ZoneBehavior {
    title: "EXIT APP",
    title_row: 0,
    baked_bar: false,
    adjust: None,
    action: Some(|_| Action::Exit),
    overlay: |_, phase| Overlay::default().caption(phase, "Exiting..."),
};

static USB: ZoneBehavior = ZoneBehavior {
    title: "USB",
    title_row: -2,
    baked_bar: false,
    adjust: None,
    action: Some(|values| Action::ToggleUsb { unmount: values.system.usb_sharing }),
    overlay: |values, phase| {
        let label = if values.system.usb_sharing { "EJECT USB" } else { "MOUNT USB" };
        Overlay::default().line(0, true, format_args!("{label}")).caption(phase, "in progress ...")
    },
};

static THEME: ZoneBehavior = ZoneBehavior {
    title: "SET THEME",
    title_row: -2,
    baked_bar: false,
    adjust: Some(|values, step, _| {
        values.layout_index = step.wrap(values.layout_index, values.layout_names.len());
        true
    }),
    action: Some(|values| Action::ApplyTheme(values.layout_index)),
    overlay: |values, phase| {
        let name = values.layout_names.get(values.layout_index).map_or("", std::string::String::as_str);
        Overlay::default()
            .line(0, false, format_args!("< {} >", elide_theme_name(name)))
            .caption(phase, "In progress...")
    },
};

static LAUNCHER: ZoneBehavior = ZoneBehavior {
    title: "SET LAUNCHER",
    title_row: -2,
    baked_bar: false,
    adjust: None,
    action: Some(|_| Action::SwitchLauncher),
    overlay: |_, phase| Overlay::default().caption(phase, "In progress..."),
};

static POWERDOWN: ZoneBehavior = ZoneBehavior {
    title: "POWERDOWN",
    title_row: 0,
    baked_bar: false,
    adjust: None,
    action: Some(|_| Action::PowerDown),
    overlay: |_, phase| Overlay::default().caption(phase, "Shutting down..."),
};

fn adjust_slot(values: &mut ZoneValues, step: Step, _: &mut dyn SystemProbe) -> bool {
    values.save_slot = step.wrap(usize::from(values.save_slot), usize::from(values.slot_count)) as u8;
    log::debug!("save slot -> {}", values.save_slot + 1);
    true
}

/// One bar per step: a step of 10 draws ten bars.
const fn bar(percent: u8, step: u8) -> BarValue {
    let step = if step == 0 { 1 } else { step };
    let bars = 100 / step as u16;
    let bars = if bars > PROGRESS_BAR_WIDTH { PROGRESS_BAR_WIDTH } else { bars };
    BarValue { percent, bars }
}
