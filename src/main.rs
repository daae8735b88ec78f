//! Overlay menu simulator.
//!
//! Runs the handheld settings menu in a desktop window. A flat colour that
//! changes every second stands in for the running game; press H to open the
//! menu over it and Escape (or close the window) to quit.
//!
//! ```text
//! overlay-menu-sim [menu.toml]
//! RUST_LOG=debug overlay-menu-sim
//! ```
//!
//! Volume, brightness, USB and filesystem settings run the shell commands from
//! the config, so on a desktop most of them fail and fall back to defaults;
//! the failures are logged.

mod sim;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use embedded_graphics::prelude::*;
use overlay_menu::colors::DEMO_BACKDROPS;
use overlay_menu::config::MenuConfig;
use overlay_menu::menu::{Menu, MenuResult};
use overlay_menu::pacer::FramePacer;
use overlay_menu::registry::PanelArt;
use overlay_menu::services::{LayoutDirectory, Services, ShellLauncher};
use overlay_menu::shell::ShellProbe;
use overlay_menu::surface::Screen;
use sim::{HostCommand, LoggingGame, SimBackend};

/// How long each demo backdrop colour stays up.
const BACKDROP_PERIOD: Duration = Duration::from_secs(1);

const DEFAULT_CONFIG: &str = "menu.toml";

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = std::env::args().nth(1).map_or_else(|| PathBuf::from(DEFAULT_CONFIG), PathBuf::from);
    let config = if path.exists() {
        MenuConfig::load(&path).with_context(|| format!("invalid menu config {}", path.display()))?
    } else {
        log::info!("{} not found, using default config", path.display());
        MenuConfig::default()
    };

    let mut probe = ShellProbe::new(config.commands.clone());
    let mut menu = Menu::start(config, &mut probe);
    let config = menu.config().clone();

    let mut launcher = ShellLauncher::new(config.launcher_name.clone(), config.commands.set_launcher.clone());
    let mut game = LoggingGame;
    let mut themes = config.theme_root.as_deref().and_then(|root| {
        LayoutDirectory::open(root)
            .inspect_err(|e| log::warn!("no themes from {}: {e}", root.display()))
            .ok()
    });

    let mut backend = SimBackend::new("Overlay Menu");
    let mut backdrop = 0;
    backend.clear(DEMO_BACKDROPS[backdrop]).ok();
    backend.present();
    let mut last_switch = Instant::now();
    let mut pacer = FramePacer::new(config.frame_time());

    log::info!("press H to open the menu, Escape to quit");
    loop {
        match backend.poll_host() {
            HostCommand::Quit => break,
            HostCommand::OpenMenu => {
                let mut services = Services::new(&mut probe).with_launcher(&mut launcher).with_game(&mut game);
                if let Some(themes) = themes.as_mut() {
                    services = services.with_themes(themes);
                }
                let result = menu.run(&mut backend, &mut services, &PanelArt);
                log::info!(
                    "session ended ({result}), slot {}, aspect ratio {}",
                    menu.save_slot() + 1,
                    menu.aspect_ratio().label()
                );
                if result == MenuResult::Exit {
                    break;
                }
                last_switch = Instant::now();
            }
            HostCommand::None => {}
        }

        if last_switch.elapsed() >= BACKDROP_PERIOD {
            backdrop = (backdrop + 1) % DEMO_BACKDROPS.len();
            backend.clear(DEMO_BACKDROPS[backdrop]).ok();
            backend.present();
            last_switch = Instant::now();
        }
        pacer.pace();
    }

    menu.shutdown(&mut probe);
    log::info!("simulator stopped");
    Ok(())
}
