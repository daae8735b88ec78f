//! Error types for the overlay menu.
//!
//! Every fallible operation in the crate returns [`Result`]. Whether an error is
//! fatal is decided by the caller: probe and resource failures are logged and
//! replaced with defaults, while a failed snapshot ends the session with
//! [`MenuResult::Error`](crate::menu::MenuResult::Error).

use std::io;

/// Errors produced by the menu, its probe, and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum MenuError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("command `{command}` failed with {status}")]
    Command { command: String, status: String },

    #[error("command `{command}` returned malformed output: {output:?}")]
    Malformed { command: String, output: String },

    #[error("cannot allocate {width}x{height} surface")]
    SurfaceAllocation { width: u32, height: u32 },

    #[error("resource error: {0}")]
    Resource(String),

    #[error("collaborator error: {0}")]
    Collaborator(String),

    #[error("no menu zones are enabled")]
    NoZones,
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, MenuError>;
