//! Menu sessions.
//!
//! [`Menu`] is the long-lived value the host keeps around: it owns the
//! configuration and the memory that survives between sessions (last zone,
//! save slot, aspect ratio). Each call to [`Menu::run`] opens a session,
//! drives it until it stops, and puts the screen back the way
//! it found it.
//!
//! [`Menu::start`] and [`Menu::shutdown`] bracket the whole menu system. Both
//! force the root filesystem read-only, so a read-write choice made in a
//! session lasts until the host shuts the menu down.
//!
//! # Frame Loop
//!
//! 1. Drain input (skipped while scrolling; stops early when a scroll starts or the session ends)
//! 2. Run a confirmed action, after painting one progress frame
//! 3. Advance the scroll animation
//! 4. Paint if anything changed
//! 5. Sleep out the frame budget

use std::fmt;

use embedded_graphics::prelude::*;

use crate::animations::{ScrollAnimator, ScrollTick};
use crate::config::{MenuConfig, ZONE_HEIGHT};
use crate::error::Result;
use crate::input::InputSource;
use crate::navigation::{Navigator, Response};
use crate::pacer::FramePacer;
use crate::probe::{SystemProbe, SystemValues};
use crate::registry::{Availability, Zone, ZoneArt, build_zones};
use crate::render::{FrameView, RenderState, draw_frame};
use crate::services::Services;
use crate::surface::{Screen, Surface};
use crate::zone::{AspectRatio, ZoneValues};

/// How a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuResult {
    /// Closed normally; the host resumes.
    Ok,
    /// The host should shut down (exit, power down, theme or launcher change, quit signal).
    Exit,
    /// The session could not start.
    Error,
}

impl fmt::Display for MenuResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ok => "ok",
            Self::Exit => "exit",
            Self::Error => "error",
        })
    }
}

// =============================================================================
// Menu
// =============================================================================

/// Long-lived menu state.
#[derive(Debug, Clone)]
pub struct Menu {
    config: MenuConfig,
    last_index: usize,
    save_slot: u8,
    aspect_ratio: AspectRatio,
}

impl Menu {
    pub fn new(config: MenuConfig) -> Self {
        Self { config: config.validated(), last_index: 0, save_slot: 0, aspect_ratio: AspectRatio::default() }
    }

    /// Create the menu and put the filesystem in its startup state.
    pub fn start(config: MenuConfig, probe: &mut dyn SystemProbe) -> Self {
        let menu = Self::new(config);
        menu.force_read_only(probe, "start");
        menu
    }

    /// Tear the menu down, leaving the filesystem read-only.
    pub fn shutdown(self, probe: &mut dyn SystemProbe) { self.force_read_only(probe, "shutdown"); }

    fn force_read_only(&self, probe: &mut dyn SystemProbe, stage: &str) {
        if !self.config.force_read_only {
            return;
        }
        match probe.set_filesystem_mode(false) {
            Ok(()) => log::info!("filesystem read-only at menu {stage}"),
            Err(e) => log::warn!("cannot force read-only filesystem at menu {stage}: {e}"),
        }
    }

    #[inline]
    pub const fn config(&self) -> &MenuConfig { &self.config }

    /// Zone index selected when the last session closed.
    #[inline]
    pub const fn last_index(&self) -> usize { self.last_index }

    /// Save slot selected in the last session.
    #[inline]
    pub const fn save_slot(&self) -> u8 { self.save_slot }

    /// Aspect ratio selected in the last session.
    #[inline]
    pub const fn aspect_ratio(&self) -> AspectRatio { self.aspect_ratio }

    /// Run one session on `backend` until the user closes it or an action ends it.
    ///
    /// The screen contents are captured first and restored on close. A session
    /// that cannot start (snapshot allocation, no zones) logs the cause and
    /// returns [`MenuResult::Error`] without entering the loop.
    pub fn run<B: Screen + InputSource>(
        &mut self,
        backend: &mut B,
        services: &mut Services<'_>,
        art: &dyn ZoneArt,
    ) -> MenuResult {
        let mut session = match MenuSession::open(self, backend, services, art) {
            Ok(session) => session,
            Err(e) => {
                log::error!("cannot open menu: {e}");
                return MenuResult::Error;
            }
        };
        log::info!("menu opened on zone {}", session.navigator.current());

        let result = session.run(backend, services);
        session.close(self, backend);
        log::info!("menu closed: {result}");
        result
    }
}

// =============================================================================
// Session
// =============================================================================

/// State for one open menu.
#[derive(Debug)]
struct MenuSession {
    zones: Vec<Zone>,
    snapshot: Surface,
    values: ZoneValues,
    navigator: Navigator,
    render: RenderState,
    pacer: FramePacer,
}

impl MenuSession {
    fn open<S: Screen>(menu: &Menu, screen: &S, services: &mut Services<'_>, art: &dyn ZoneArt) -> Result<Self> {
        let config = &menu.config;
        let snapshot = Surface::capture(screen)?;
        let system = SystemValues::read(&mut *services.probe);

        let availability = Availability {
            game: services.game.is_some(),
            theme_count: services.themes.as_deref().map_or(0, |t| t.layouts().len()),
            launcher_name: services.launcher.as_deref().map(|l| l.name().to_owned()),
        };
        let zones = build_zones(config, &availability, art)?;

        let (layout_names, layout_index) = services
            .themes
            .as_deref()
            .map(|t| (t.layouts().to_vec(), t.current_index()))
            .unwrap_or_default();
        let values = ZoneValues {
            save_slot: menu.save_slot % config.save_slots,
            slot_count: config.save_slots,
            aspect_ratio: menu.aspect_ratio,
            layout_index: if layout_index < layout_names.len() { layout_index } else { 0 },
            layout_names,
            volume_step: config.volume_step,
            brightness_step: config.brightness_step,
            ..ZoneValues::new(system)
        };

        let kinds = zones.iter().map(|z| z.kind).collect();
        let animator = ScrollAnimator::new(ZONE_HEIGHT, config.scroll_speed_px);
        let navigator = Navigator::new(kinds, menu.last_index, &values, animator);

        Ok(Self {
            zones,
            snapshot,
            values,
            navigator,
            render: RenderState::new(),
            pacer: FramePacer::new(config.frame_time()),
        })
    }

    fn run<B: Screen + InputSource>(&mut self, backend: &mut B, services: &mut Services<'_>) -> MenuResult {
        while self.navigator.is_running() {
            if !self.navigator.is_scrolling() {
                self.drain_input(backend, services);
            }
            if !self.navigator.is_running() {
                break;
            }
            if self.navigator.tick() != ScrollTick::Idle {
                self.render.mark_dirty();
            }
            if self.render.needs_redraw() {
                self.paint(backend);
            }
            self.pacer.pace();
        }
        self.navigator.result()
    }

    fn drain_input<B: Screen + InputSource>(&mut self, backend: &mut B, services: &mut Services<'_>) {
        while let Some(event) = backend.poll_event() {
            match self.navigator.handle(event, &mut self.values, services) {
                Response::Ignored => {}
                Response::Redraw => self.render.mark_dirty(),
                Response::Scroll => {
                    self.render.mark_dirty();
                    return;
                }
                Response::RunAction(action) => {
                    // Show the progress caption before a possibly slow command.
                    self.paint(backend);
                    self.navigator.execute(&action, &mut self.values, services);
                    self.render.mark_dirty();
                    if !self.navigator.is_running() {
                        return;
                    }
                }
                Response::Stop => return,
            }
        }
    }

    fn paint<S: Screen>(&mut self, screen: &mut S) {
        let view = FrameView {
            zones: &self.zones,
            snapshot: &self.snapshot,
            current: self.navigator.current(),
            previous: self.navigator.previous(),
            scroll_offset: self.navigator.scroll_offset(),
            phase: self.navigator.phase(),
            values: &self.values,
        };
        draw_frame(screen, &view);
        screen.present();
        self.render.end_frame();
    }

    fn close<S: Screen>(self, menu: &mut Menu, screen: &mut S) {
        menu.last_index = self.navigator.current();
        menu.save_slot = self.values.save_slot;
        menu.aspect_ratio = self.values.aspect_ratio;

        self.snapshot.blit(screen, Point::zero());
        screen.present();
        log::debug!("{} frames painted, pacing: {}", self.render.frames_drawn(), self.pacer.stats());
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::convert::Infallible;

    use embedded_graphics::pixelcolor::Rgb565;

    use super::*;
    use crate::input::{InputEvent, MenuKey};
    use crate::probe::tests::MockProbe;
    use crate::registry::PanelArt;
    use crate::services::tests::{MemoryCatalog, RecordingGame};
    use crate::zone::ZoneKind;

    fn backdrop() -> Rgb565 { Rgb565::new(12, 33, 4) }

    /// Surface-backed screen fed from a script of events. Once the script is
    /// exhausted the queue reads empty for one poll, then quits.
    struct TestBackend {
        screen: Surface,
        events: VecDeque<InputEvent>,
        presents: usize,
        idled: bool,
    }

    impl TestBackend {
        fn new(keys: &[MenuKey]) -> Self {
            Self {
                screen: Surface::new(Size::new(240, 240), backdrop()).unwrap(),
                events: keys.iter().map(|k| InputEvent::Key(*k)).collect(),
                presents: 0,
                idled: false,
            }
        }
    }

    impl OriginDimensions for TestBackend {
        fn size(&self) -> Size { self.screen.size() }
    }

    impl DrawTarget for TestBackend {
        type Color = Rgb565;
        type Error = Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> std::result::Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            self.screen.draw_iter(pixels)
        }
    }

    impl Screen for TestBackend {
        fn pixel(&self, point: Point) -> Option<Rgb565> { self.screen.pixel(point) }
        fn present(&mut self) { self.presents += 1; }
    }

    impl InputSource for TestBackend {
        fn poll_event(&mut self) -> Option<InputEvent> {
            if let Some(event) = self.events.pop_front() {
                return Some(event);
            }
            if self.idled {
                Some(InputEvent::Quit)
            } else {
                self.idled = true;
                None
            }
        }
    }

    /// Backend with nothing to capture.
    struct EmptyBackend;

    impl OriginDimensions for EmptyBackend {
        fn size(&self) -> Size { Size::zero() }
    }

    impl DrawTarget for EmptyBackend {
        type Color = Rgb565;
        type Error = Infallible;

        fn draw_iter<I>(&mut self, _: I) -> std::result::Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            Ok(())
        }
    }

    impl Screen for EmptyBackend {
        fn pixel(&self, _: Point) -> Option<Rgb565> { None }
        fn present(&mut self) {}
    }

    impl InputSource for EmptyBackend {
        fn poll_event(&mut self) -> Option<InputEvent> { Some(InputEvent::Quit) }
    }

    fn config(zones: Vec<ZoneKind>) -> MenuConfig { MenuConfig { zones, fps: 1000, ..MenuConfig::default() } }

    fn menu(zones: Vec<ZoneKind>) -> Menu { Menu::new(config(zones)) }

    fn basic() -> Vec<ZoneKind> { vec![ZoneKind::Volume, ZoneKind::Brightness, ZoneKind::AspectRatio, ZoneKind::Exit] }

    // -------------------------------------------------------------------------
    // Session Lifecycle Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_escape_restores_screen() {
        let mut menu = menu(basic());
        let mut probe = MockProbe::healthy();
        let mut backend = TestBackend::new(&[MenuKey::Escape]);
        let result = menu.run(&mut backend, &mut Services::new(&mut probe), &PanelArt);

        assert_eq!(result, MenuResult::Ok);
        assert_eq!(backend.screen, Surface::new(Size::new(240, 240), backdrop()).unwrap(), "Snapshot restored");
        assert!(backend.presents >= 1, "Restored screen is presented");
    }

    #[test]
    fn test_quit_returns_exit() {
        let mut menu = menu(basic());
        let mut probe = MockProbe::healthy();
        let mut backend = TestBackend::new(&[MenuKey::Down]);
        let result = menu.run(&mut backend, &mut Services::new(&mut probe), &PanelArt);
        assert_eq!(result, MenuResult::Exit, "Exhausted script sends Quit");
        assert_eq!(menu.last_index(), 1);
    }

    #[test]
    fn test_first_frame_covers_snapshot() {
        let mut menu = menu(basic());
        let mut probe = MockProbe::healthy();
        let mut backend = TestBackend::new(&[MenuKey::Left]);
        menu.run(&mut backend, &mut Services::new(&mut probe), &PanelArt);
        assert!(backend.presents >= 2, "At least one menu frame plus the restore");
    }

    #[test]
    fn test_last_index_remembered() {
        let mut menu = menu(basic());
        let mut probe = MockProbe::healthy();
        let mut backend = TestBackend::new(&[MenuKey::Down, MenuKey::Down, MenuKey::Escape]);
        menu.run(&mut backend, &mut Services::new(&mut probe), &PanelArt);
        assert_eq!(menu.last_index(), 2);

        let mut backend = TestBackend::new(&[MenuKey::Up, MenuKey::Escape]);
        menu.run(&mut backend, &mut Services::new(&mut probe), &PanelArt);
        assert_eq!(menu.last_index(), 1, "Second session starts where the first ended");
    }

    #[test]
    fn test_aspect_ratio_survives_session() {
        let mut menu = menu(basic());
        let mut probe = MockProbe::healthy();
        let keys = [MenuKey::Down, MenuKey::Down, MenuKey::Right, MenuKey::Right, MenuKey::Escape];
        let mut backend = TestBackend::new(&keys);
        menu.run(&mut backend, &mut Services::new(&mut probe), &PanelArt);
        assert_eq!(menu.aspect_ratio(), AspectRatio::Scaled);
    }

    // -------------------------------------------------------------------------
    // Startup Failure Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_snapshot_failure_is_error() {
        let mut menu = menu(basic());
        let mut probe = MockProbe::healthy();
        let result = menu.run(&mut EmptyBackend, &mut Services::new(&mut probe), &PanelArt);
        assert_eq!(result, MenuResult::Error);
        assert!(probe.calls.is_empty(), "Probe is not touched before the snapshot");
    }

    #[test]
    fn test_no_zones_is_error() {
        let mut menu = menu(vec![ZoneKind::Save, ZoneKind::Load]);
        let mut probe = MockProbe::healthy();
        let mut backend = TestBackend::new(&[MenuKey::Confirm, MenuKey::Confirm]);
        let result = menu.run(&mut backend, &mut Services::new(&mut probe), &PanelArt);
        assert_eq!(result, MenuResult::Error);
        assert_eq!(backend.presents, 0, "Loop never entered");
        assert_eq!(backend.events.len(), 2, "No input consumed");
    }

    // -------------------------------------------------------------------------
    // Action Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_save_runs_once_and_closes() {
        let mut menu = menu(vec![ZoneKind::Save, ZoneKind::Exit]);
        let mut probe = MockProbe::healthy();
        let mut game = RecordingGame::default();
        let keys = [MenuKey::Right, MenuKey::Confirm, MenuKey::Confirm, MenuKey::Confirm];
        let mut backend = TestBackend::new(&keys);
        let result = menu.run(&mut backend, &mut Services::new(&mut probe).with_game(&mut game), &PanelArt);

        assert_eq!(result, MenuResult::Ok);
        assert_eq!(game.saves, vec![1]);
        assert_eq!(menu.save_slot(), 1);
        assert_eq!(backend.events.len(), 1, "Input after the closing action stays queued");
    }

    #[test]
    fn test_slot_memory_wraps_to_slot_count() {
        let mut menu = menu(vec![ZoneKind::Load]);
        menu.save_slot = 12;
        let mut probe = MockProbe::healthy();
        let mut game = RecordingGame::default();
        let mut backend = TestBackend::new(&[MenuKey::Confirm, MenuKey::Confirm]);
        menu.run(&mut backend, &mut Services::new(&mut probe).with_game(&mut game), &PanelArt);
        assert_eq!(game.loads, vec![3]);
    }

    #[test]
    fn test_theme_starts_on_catalog_layout() {
        let mut menu = menu(vec![ZoneKind::Theme]);
        let mut probe = MockProbe::healthy();
        let mut catalog =
            MemoryCatalog { layouts: vec!["A".into(), "B".into(), "C".into()], current: 1, ..MemoryCatalog::default() };
        let mut backend = TestBackend::new(&[MenuKey::Confirm, MenuKey::Confirm]);
        let result = menu.run(&mut backend, &mut Services::new(&mut probe).with_themes(&mut catalog), &PanelArt);
        assert_eq!(result, MenuResult::Exit);
        assert_eq!(catalog.persisted, vec![1]);
    }

    #[test]
    fn test_progress_frame_painted_before_action() {
        let mut menu = menu(vec![ZoneKind::Exit]);
        let mut probe = MockProbe::healthy();
        let mut backend = TestBackend::new(&[MenuKey::Confirm, MenuKey::Confirm]);
        let result = menu.run(&mut backend, &mut Services::new(&mut probe), &PanelArt);
        assert_eq!(result, MenuResult::Exit);
        // Both presses arrive in the first frame: the progress frame is the only
        // menu frame, followed by the restore.
        assert_eq!(backend.presents, 2);
    }

    // -------------------------------------------------------------------------
    // Filesystem Lifecycle Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_start_and_shutdown_force_read_only() {
        let mut probe = MockProbe::healthy();
        let menu = Menu::start(config(basic()), &mut probe);
        assert_eq!(probe.mutations(), vec!["set_filesystem_mode false"], "Read-only at start");

        menu.shutdown(&mut probe);
        assert_eq!(probe.mutations(), vec!["set_filesystem_mode false"; 2], "Read-only again at shutdown");
    }

    #[test]
    fn test_read_write_choice_outlives_session() {
        let mut probe = MockProbe::healthy();
        let mut menu = Menu::start(config(vec![ZoneKind::ReadWrite, ZoneKind::Exit]), &mut probe);
        probe.calls.clear();

        let mut backend = TestBackend::new(&[MenuKey::Confirm, MenuKey::Confirm, MenuKey::Escape]);
        let result = menu.run(&mut backend, &mut Services::new(&mut probe), &PanelArt);
        assert_eq!(result, MenuResult::Ok);
        assert_eq!(probe.mutations(), vec!["set_filesystem_mode true"], "Closing the menu keeps read-write");

        // A second session reads the mode back instead of touching it.
        probe.read_write = Some(true);
        let mut backend = TestBackend::new(&[MenuKey::Escape]);
        menu.run(&mut backend, &mut Services::new(&mut probe), &PanelArt);
        assert_eq!(probe.mutations(), vec!["set_filesystem_mode true"]);

        menu.shutdown(&mut probe);
        assert_eq!(probe.mutations(), vec!["set_filesystem_mode true", "set_filesystem_mode false"]);
    }

    #[test]
    fn test_force_read_only_disabled() {
        let mut probe = MockProbe { read_write: Some(true), ..MockProbe::healthy() };
        let mut menu = Menu::start(MenuConfig { force_read_only: false, ..config(basic()) }, &mut probe);
        let mut backend = TestBackend::new(&[MenuKey::Escape]);
        menu.run(&mut backend, &mut Services::new(&mut probe), &PanelArt);
        menu.shutdown(&mut probe);
        assert!(probe.mutations().is_empty());
    }

    #[test]
    fn test_force_read_only_failure_is_tolerated() {
        let mut probe = MockProbe { fail_mutations: true, ..MockProbe::healthy() };
        let mut menu = Menu::start(config(basic()), &mut probe);
        let mut backend = TestBackend::new(&[MenuKey::Escape]);
        let result = menu.run(&mut backend, &mut Services::new(&mut probe), &PanelArt);
        assert_eq!(result, MenuResult::Ok, "Menu still opens");
    }
}
