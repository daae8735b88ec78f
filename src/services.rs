//! External collaborators the menu triggers but does not implement.
//!
//! - [`ThemeCatalog`]: the list of UI layouts and which one is active.
//! - [`LauncherSwitch`]: hands the device over to another launcher.
//! - [`GameHost`]: the running game's save/load state.
//!
//! [`Services`] bundles them with the [`SystemProbe`] for one menu session.
//! A missing collaborator simply removes its zone from the menu.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{MenuError, Result};
use crate::probe::SystemProbe;
use crate::shell;

// =============================================================================
// Collaborator Traits
// =============================================================================

/// Available UI layouts.
pub trait ThemeCatalog {
    /// Layout identifiers, in display order.
    fn layouts(&self) -> &[String];
    /// Index of the active layout.
    fn current_index(&self) -> usize;
    /// Make `index` the active layout. Takes effect after a restart.
    fn persist_layout(&mut self, index: usize) -> Result<()>;
}

/// Launcher hand-over command.
pub trait LauncherSwitch {
    /// Name shown in the launcher zone.
    fn name(&self) -> &str;
    fn switch_launcher(&mut self) -> Result<()>;
}

/// Save states of the running game.
pub trait GameHost {
    fn save_state(&mut self, slot: u8) -> Result<()>;
    fn load_state(&mut self, slot: u8) -> Result<()>;
}

/// Collaborators for one session.
pub struct Services<'a> {
    pub probe: &'a mut dyn SystemProbe,
    pub themes: Option<&'a mut dyn ThemeCatalog>,
    pub launcher: Option<&'a mut dyn LauncherSwitch>,
    pub game: Option<&'a mut dyn GameHost>,
}

impl<'a> Services<'a> {
    pub fn new(probe: &'a mut dyn SystemProbe) -> Self { Self { probe, themes: None, launcher: None, game: None } }

    #[must_use]
    pub fn with_themes(mut self, themes: &'a mut dyn ThemeCatalog) -> Self {
        self.themes = Some(themes);
        self
    }

    #[must_use]
    pub fn with_launcher(mut self, launcher: &'a mut dyn LauncherSwitch) -> Self {
        self.launcher = Some(launcher);
        self
    }

    #[must_use]
    pub fn with_game(mut self, game: &'a mut dyn GameHost) -> Self {
        self.game = Some(game);
        self
    }
}

// =============================================================================
// Layout Directory
// =============================================================================

/// Name of the file recording the active layout, relative to the theme root.
pub const LAYOUT_CONF: &str = "layout.conf";

/// Themes stored as sub-directories of `<root>/layouts/`, with the active one
/// recorded as a `layout = <name>` line in `<root>/layout.conf`.
#[derive(Debug, Clone)]
pub struct LayoutDirectory {
    root: PathBuf,
    layouts: Vec<String>,
    current: usize,
}

impl LayoutDirectory {
    /// Scan `<root>/layouts/` and read the active layout.
    ///
    /// A missing or unreadable `layout.conf`, or one naming an unknown layout,
    /// selects the first layout.
    pub fn open(root: &Path) -> Result<Self> {
        let mut layouts = Vec::new();
        for entry in fs::read_dir(root.join("layouts"))? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                layouts.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        layouts.sort();

        let active = fs::read_to_string(root.join(LAYOUT_CONF)).ok().and_then(|text| parse_layout_conf(&text));
        let current = active.and_then(|name| layouts.iter().position(|l| *l == name)).unwrap_or(0);
        log::debug!("found {} layouts in {}, active index {current}", layouts.len(), root.display());
        Ok(Self { root: root.to_path_buf(), layouts, current })
    }
}

/// Value of the `layout` key, if present.
fn parse_layout_conf(text: &str) -> Option<String> {
    text.lines().find_map(|line| {
        let (key, value) = line.split_once('=')?;
        (key.trim() == "layout").then(|| value.trim().trim_matches('"').to_owned())
    })
}

impl ThemeCatalog for LayoutDirectory {
    fn layouts(&self) -> &[String] { &self.layouts }

    fn current_index(&self) -> usize { self.current }

    fn persist_layout(&mut self, index: usize) -> Result<()> {
        let name = self
            .layouts
            .get(index)
            .ok_or_else(|| MenuError::Collaborator(format!("no layout at index {index}")))?;
        fs::write(self.root.join(LAYOUT_CONF), format!("layout = {name}\n"))?;
        log::info!("active layout set to {name}");
        self.current = index;
        Ok(())
    }
}

// =============================================================================
// Shell Launcher
// =============================================================================

/// Launcher switch that runs one shell command.
#[derive(Debug, Clone)]
pub struct ShellLauncher {
    name: String,
    command: String,
}

impl ShellLauncher {
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self { name: name.into(), command: command.into() }
    }
}

impl LauncherSwitch for ShellLauncher {
    fn name(&self) -> &str { &self.name }

    fn switch_launcher(&mut self) -> Result<()> { shell::run(&self.command).map(drop) }
}
