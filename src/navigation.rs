//! Navigation state machine.
//!
//! The [`Navigator`] owns everything that changes in response to input: the
//! selected zone, the transition animation, the confirmation gate, and whether
//! the session is still running. Kind-specific behavior (value adjustment,
//! which action Confirm arms) comes from the zone behavior table.
//!
//! # States
//!
//! | State | Meaning |
//! |-------|---------|
//! | `Idle` | settled on a zone, nothing armed |
//! | `ConfirmPending` | Confirm pressed once on an action zone |
//! | `ActionRunning` | second Confirm pressed, action about to run |
//! | `Scrolling` | transition animation in progress, input is not read |
//! | `Exiting` | loop stops after this frame |
//!
//! # Confirmation Gate
//!
//! Actions run in two steps so the UI can show progress before a blocking
//! command: [`Navigator::handle`] returns [`Response::RunAction`] only when
//! Confirm arrives with a confirmation already pending, and
//! [`Navigator::execute`] refuses to run anything unless that happened.

use crate::animations::{ScrollAnimator, ScrollDirection, ScrollTick};
use crate::error::{MenuError, Result};
use crate::input::{InputEvent, MenuKey};
use crate::menu::MenuResult;
use crate::services::Services;
use crate::zone::{Action, Phase, Step, ZoneKind, ZoneValues};

/// Navigation state derived from the navigator's flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavState {
    Idle,
    ConfirmPending,
    ActionRunning,
    Scrolling,
    Exiting,
}

/// What the frame loop must do after an input event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Response {
    /// Nothing changed.
    Ignored,
    /// Visible state changed.
    Redraw,
    /// A transition started. Stop draining input until it commits.
    Scroll,
    /// Draw the progress frame, then pass the action to [`Navigator::execute`].
    RunAction(Action),
    /// The session is over.
    Stop,
}

/// Selection, animation and confirmation state for one menu session.
#[derive(Debug)]
pub struct Navigator {
    kinds: Vec<ZoneKind>,
    current: usize,
    previous: usize,
    scroll: ScrollAnimator,
    confirmation_pending: bool,
    action_in_progress: bool,
    running: bool,
    result: MenuResult,
}

impl Navigator {
    /// Start a session on `remembered` (falling back to 0 when out of range),
    /// then apply the USB sanity rules: a USB selection without a cable moves
    /// to the first zone, and an active share forces the USB zone.
    pub fn new(kinds: Vec<ZoneKind>, remembered: usize, values: &ZoneValues, scroll: ScrollAnimator) -> Self {
        let mut current = if remembered < kinds.len() { remembered } else { 0 };
        let usb = kinds.iter().position(|k| *k == ZoneKind::Usb);
        if !values.system.usb_connected && Some(current) == usb {
            current = 0;
        }
        if values.system.usb_sharing {
            if let Some(usb) = usb {
                log::info!("USB share active, locking menu on the USB zone");
                current = usb;
            }
        }
        Self {
            kinds,
            current,
            previous: current,
            scroll,
            confirmation_pending: false,
            action_in_progress: false,
            running: true,
            result: MenuResult::Ok,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    #[inline]
    pub const fn current(&self) -> usize { self.current }

    #[inline]
    pub const fn previous(&self) -> usize { self.previous }

    #[inline]
    pub const fn scroll_offset(&self) -> i32 { self.scroll.offset() }

    #[inline]
    pub const fn is_scrolling(&self) -> bool { self.scroll.is_active() }

    #[inline]
    pub const fn confirmation_pending(&self) -> bool { self.confirmation_pending }

    #[inline]
    pub const fn action_in_progress(&self) -> bool { self.action_in_progress }

    #[inline]
    pub const fn is_running(&self) -> bool { self.running }

    #[inline]
    pub const fn result(&self) -> MenuResult { self.result }

    pub fn current_kind(&self) -> Option<ZoneKind> { self.kinds.get(self.current).copied() }

    pub fn state(&self) -> NavState {
        if !self.running {
            NavState::Exiting
        } else if self.action_in_progress {
            NavState::ActionRunning
        } else if self.scroll.is_active() {
            NavState::Scrolling
        } else if self.confirmation_pending {
            NavState::ConfirmPending
        } else {
            NavState::Idle
        }
    }

    /// Overlay phase for the current zone.
    pub const fn phase(&self) -> Phase {
        if self.action_in_progress {
            Phase::Running
        } else if self.confirmation_pending {
            Phase::Confirming
        } else {
            Phase::Idle
        }
    }

    fn stop(&mut self, result: MenuResult) {
        self.running = false;
        self.result = result;
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    /// Apply one input event.
    pub fn handle(&mut self, event: InputEvent, values: &mut ZoneValues, services: &mut Services<'_>) -> Response {
        if !self.running {
            return Response::Ignored;
        }
        let key = match event {
            InputEvent::Quit => {
                log::info!("quit requested");
                self.stop(MenuResult::Exit);
                return Response::Stop;
            }
            InputEvent::Key(key) => key,
        };
        if self.scroll.is_active() || self.action_in_progress {
            return Response::Ignored;
        }
        log::debug!("{key:?} on {:?}", self.current_kind());

        match key {
            MenuKey::Cancel if self.confirmation_pending => {
                self.confirmation_pending = false;
                Response::Redraw
            }
            MenuKey::Cancel => Response::Ignored,
            MenuKey::Escape if values.system.usb_sharing => Response::Ignored,
            MenuKey::Escape => {
                self.stop(MenuResult::Ok);
                Response::Stop
            }
            MenuKey::Down => self.move_selection(ScrollDirection::Down, values),
            MenuKey::Up => self.move_selection(ScrollDirection::Up, values),
            MenuKey::Left => self.adjust(Step::Decrease, values, services),
            MenuKey::Right => self.adjust(Step::Increase, values, services),
            MenuKey::Confirm => self.confirm(values),
        }
    }

    fn move_selection(&mut self, direction: ScrollDirection, values: &ZoneValues) -> Response {
        if values.system.usb_sharing {
            return Response::Ignored;
        }
        let step = match direction {
            ScrollDirection::Down => Step::Increase,
            ScrollDirection::Up => Step::Decrease,
        };
        let len = self.kinds.len();
        let mut next = step.wrap(self.current, len);
        if self.kinds.get(next) == Some(&ZoneKind::Usb) && !values.system.usb_connected {
            next = step.wrap(next, len);
        }
        if next == self.current {
            return Response::Ignored;
        }
        self.current = next;
        self.confirmation_pending = false;
        self.scroll.start(direction);
        Response::Scroll
    }

    fn adjust(&mut self, step: Step, values: &mut ZoneValues, services: &mut Services<'_>) -> Response {
        let Some(adjust) = self.current_kind().and_then(|k| k.behavior().adjust) else {
            return Response::Ignored;
        };
        // A pending confirmation was for the old value.
        self.confirmation_pending = false;
        if adjust(values, step, &mut *services.probe) { Response::Redraw } else { Response::Ignored }
    }

    fn confirm(&mut self, values: &ZoneValues) -> Response {
        let Some(arm) = self.current_kind().and_then(|k| k.behavior().action) else {
            return Response::Ignored;
        };
        if self.confirmation_pending {
            self.action_in_progress = true;
            Response::RunAction(arm(values))
        } else {
            self.confirmation_pending = true;
            Response::Redraw
        }
    }

    // -------------------------------------------------------------------------
    // Actions
    // -------------------------------------------------------------------------

    /// Run an action returned by [`handle`](Self::handle).
    ///
    /// On success the new state is reflected in `values` or the session stops.
    /// On failure the error is logged and the menu returns to `Idle`. Either way
    /// the confirmation is cleared. Returns `false` (and does nothing) when no
    /// confirmed action is in progress.
    pub fn execute(&mut self, action: &Action, values: &mut ZoneValues, services: &mut Services<'_>) -> bool {
        if !self.action_in_progress {
            log::warn!("refusing to run {action:?} without confirmation");
            return false;
        }
        match perform(action, values, services) {
            Ok(Some(result)) => {
                log::info!("{action:?} done, closing menu with {result:?}");
                self.stop(result);
            }
            Ok(None) => log::info!("{action:?} done"),
            Err(e) => log::warn!("{action:?} failed: {e}"),
        }
        self.action_in_progress = false;
        self.confirmation_pending = false;
        true
    }

    // -------------------------------------------------------------------------
    // Animation
    // -------------------------------------------------------------------------

    /// Advance the transition animation by one frame.
    pub fn tick(&mut self) -> ScrollTick {
        let tick = self.scroll.tick();
        if tick == ScrollTick::Committed {
            self.previous = self.current;
        }
        tick
    }
}

/// Carry out a confirmed action. `Some(result)` ends the session.
fn perform(action: &Action, values: &mut ZoneValues, services: &mut Services<'_>) -> Result<Option<MenuResult>> {
    match *action {
        Action::Save(slot) => {
            services.game.as_deref_mut().ok_or_else(|| missing("game host"))?.save_state(slot)?;
            Ok(Some(MenuResult::Ok))
        }
        Action::Load(slot) => {
            services.game.as_deref_mut().ok_or_else(|| missing("game host"))?.load_state(slot)?;
            Ok(Some(MenuResult::Ok))
        }
        Action::ToggleUsb { unmount } => {
            if unmount {
                services.probe.unmount_usb()?;
            } else {
                services.probe.mount_usb()?;
            }
            values.system.usb_sharing = !unmount;
            Ok(None)
        }
        Action::SetReadWrite(read_write) => {
            services.probe.set_filesystem_mode(read_write)?;
            values.system.read_write = read_write;
            Ok(None)
        }
        Action::ApplyTheme(index) => {
            services.themes.as_deref_mut().ok_or_else(|| missing("theme catalog"))?.persist_layout(index)?;
            Ok(Some(MenuResult::Exit))
        }
        Action::SwitchLauncher => {
            let launcher = services.launcher.as_deref_mut().ok_or_else(|| missing("launcher"))?;
            if let Err(e) = launcher.switch_launcher() {
                log::warn!("launcher switch to {} failed: {e}", launcher.name());
            }
            Ok(Some(MenuResult::Exit))
        }
        Action::Exit => Ok(Some(MenuResult::Exit)),
        Action::PowerDown => {
            services.probe.power_down()?;
            Ok(Some(MenuResult::Exit))
        }
    }
}

fn missing(what: &str) -> MenuError { MenuError::Collaborator(format!("no {what} attached")) }
