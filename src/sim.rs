//! Desktop backend: an SDL simulator window standing in for the handheld screen.
//!
//! # Key Mapping
//!
//! | Key | Menu event |
//! |-----|------------|
//! | window close | Quit |
//! | B | Cancel |
//! | Q, Escape | Escape |
//! | U, Up | Up |
//! | D, Down | Down |
//! | L, Left | Left |
//! | R, Right | Right |
//! | A, Return | Confirm |
//!
//! Held keys repeat only for the four directions, so a held A never confirms
//! an action. Outside the menu, H opens it and Escape (or closing the window)
//! quits the simulator.

use std::collections::VecDeque;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::sdl2::Keycode;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
use overlay_menu::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use overlay_menu::error::Result;
use overlay_menu::input::{InputEvent, InputSource, MenuKey};
use overlay_menu::services::GameHost;
use overlay_menu::surface::Screen;

/// Menu key for a key press, honouring the repeat policy.
pub fn map_key(keycode: Keycode, repeat: bool) -> Option<MenuKey> {
    let key = match keycode {
        Keycode::B => MenuKey::Cancel,
        Keycode::Q | Keycode::Escape => MenuKey::Escape,
        Keycode::U | Keycode::Up => MenuKey::Up,
        Keycode::D | Keycode::Down => MenuKey::Down,
        Keycode::L | Keycode::Left => MenuKey::Left,
        Keycode::R | Keycode::Right => MenuKey::Right,
        Keycode::A | Keycode::Return => MenuKey::Confirm,
        _ => return None,
    };
    let repeats = matches!(key, MenuKey::Up | MenuKey::Down | MenuKey::Left | MenuKey::Right);
    (!repeat || repeats).then_some(key)
}

/// What the host loop should do this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostCommand {
    None,
    OpenMenu,
    Quit,
}

/// Simulator window plus its framebuffer and event queue.
pub struct SimBackend {
    display: SimulatorDisplay<Rgb565>,
    window: Window,
    pending: VecDeque<InputEvent>,
}

impl SimBackend {
    /// Open a 240x240 window at scale 2.
    pub fn new(title: &str) -> Self {
        let display = SimulatorDisplay::new(Size::new(SCREEN_WIDTH, SCREEN_HEIGHT));
        let output_settings = OutputSettingsBuilder::new().scale(2).build();
        let mut window = Window::new(title, &output_settings);
        // The SDL window only exists after the first update.
        window.update(&display);
        Self { display, window, pending: VecDeque::new() }
    }

    /// Poll the window outside a menu session.
    ///
    /// Events left over from a finished session are discarded, except a quit.
    pub fn poll_host(&mut self) -> HostCommand {
        let mut command = if self.pending.drain(..).any(|e| e == InputEvent::Quit) {
            HostCommand::Quit
        } else {
            HostCommand::None
        };
        for event in self.window.events() {
            match event {
                SimulatorEvent::Quit | SimulatorEvent::KeyDown { keycode: Keycode::Escape, .. } => {
                    command = HostCommand::Quit;
                }
                SimulatorEvent::KeyDown { keycode: Keycode::H, repeat: false, .. } if command == HostCommand::None => {
                    command = HostCommand::OpenMenu;
                }
                _ => {}
            }
        }
        command
    }

    fn pump(&mut self) {
        for event in self.window.events() {
            match event {
                SimulatorEvent::Quit => self.pending.push_back(InputEvent::Quit),
                SimulatorEvent::KeyDown { keycode, repeat, .. } => {
                    if let Some(key) = map_key(keycode, repeat) {
                        self.pending.push_back(InputEvent::Key(key));
                    }
                }
                _ => {}
            }
        }
    }
}

impl OriginDimensions for SimBackend {
    fn size(&self) -> Size { self.display.size() }
}

impl DrawTarget for SimBackend {
    type Color = Rgb565;
    type Error = <SimulatorDisplay<Rgb565> as DrawTarget>::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> std::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.display.draw_iter(pixels)
    }
}

impl Screen for SimBackend {
    fn pixel(&self, point: Point) -> Option<Rgb565> {
        self.display.bounding_box().contains(point).then(|| self.display.get_pixel(point))
    }

    fn present(&mut self) { self.window.update(&self.display); }
}

impl InputSource for SimBackend {
    fn poll_event(&mut self) -> Option<InputEvent> {
        if self.pending.is_empty() {
            self.pump();
        }
        self.pending.pop_front()
    }
}

/// Game host for the demo: there is no game, so save and load just log.
#[derive(Debug, Default)]
pub struct LoggingGame;

impl GameHost for LoggingGame {
    fn save_state(&mut self, slot: u8) -> Result<()> {
        log::info!("demo game saved to slot {}", slot + 1);
        Ok(())
    }

    fn load_state(&mut self, slot: u8) -> Result<()> {
        log::info!("demo game loaded from slot {}", slot + 1);
        Ok(())
    }
}
