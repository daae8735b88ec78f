// Crate-level lints: pixel math casts between u16/u32/i32 are range-checked by construction
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)] // u64 -> f64 in frame statistics
#![allow(clippy::module_name_repetitions)] // MenuError, MenuConfig, ZoneKind read better qualified
#![allow(clippy::struct_excessive_bools)] // SystemValues and the navigator are flag sets

//! Settings overlay menu for a small handheld console.
//!
//! The menu is drawn over whatever is on screen when it opens: a vertical
//! carousel of full-screen zones (volume, brightness, save/load slots, aspect
//! ratio, filesystem mode, USB sharing, theme, launcher, exit, power down),
//! each a rounded panel over the frozen game image.
//!
//! # Module Overview
//!
//! | Module | Role |
//! |--------|------|
//! | [`menu`] | long-lived [`Menu`] and the per-session frame loop |
//! | [`navigation`] | input state machine and the confirmation gate |
//! | [`zone`] | zone kinds and their behavior table |
//! | [`registry`] | builds zone backgrounds with baked titles |
//! | [`render`] | composes frames: snapshot, sliding zones, overlay, arrows |
//! | [`animations`] | zone transition scroll |
//! | [`probe`], [`shell`] | reads and changes system settings |
//! | [`services`] | theme catalog, launcher and game host collaborators |
//! | [`surface`] | `Screen` trait and the owned Rgb565 framebuffer |
//! | [`pacer`] | fixed frame-rate sleep |
//!
//! # Usage
//!
//! ```ignore
//! let config = MenuConfig::load_or_default(Path::new("menu.toml"));
//! let mut probe = ShellProbe::new(config.commands.clone());
//! let mut menu = Menu::start(config, &mut probe);
//! let mut services = Services::new(&mut probe).with_game(&mut game);
//! match menu.run(&mut screen, &mut services, &PanelArt) {
//!     MenuResult::Ok => {}
//!     MenuResult::Exit => menu.shutdown(&mut probe),
//!     MenuResult::Error => log::error!("menu unavailable"),
//! }
//! ```

pub mod animations;
pub mod colors;
pub mod config;
pub mod error;
pub mod input;
pub mod menu;
pub mod navigation;
pub mod pacer;
pub mod probe;
pub mod registry;
pub mod render;
pub mod services;
pub mod shell;
pub mod styles;
pub mod surface;
pub mod widgets;
pub mod zone;

pub use config::MenuConfig;
pub use error::{MenuError, Result};
pub use input::{InputEvent, InputSource, MenuKey};
pub use menu::{Menu, MenuResult};
pub use probe::{SystemProbe, SystemValues};
pub use registry::{PanelArt, ZoneArt};
pub use services::{GameHost, LauncherSwitch, Services, ThemeCatalog};
pub use surface::{Screen, Surface};
pub use zone::ZoneKind;
