//! Shell-command implementation of [`SystemProbe`].
//!
//! Each setting maps to one configured command line run through `sh -c`:
//! getters parse stdout with [`parse_percentage`], boolean queries succeed when
//! the command exits 0, and setters append the value (`"volume set 60"`).
//! Commands run synchronously; a hanging helper stalls the menu.

use std::process::{Command, Output, Stdio};

use crate::config::ShellCommands;
use crate::error::{MenuError, Result};
use crate::probe::{SystemProbe, parse_percentage};

/// Run a command line and return its captured output, whatever the exit status.
fn spawn(command: &str) -> Result<Output> {
    log::debug!("running `{command}`");
    let output = Command::new("sh").args(["-c", command]).stdin(Stdio::null()).output()?;
    Ok(output)
}

/// Run a command line and require a zero exit status.
pub fn run(command: &str) -> Result<String> {
    let output = spawn(command)?;
    if !output.status.success() {
        return Err(MenuError::Command { command: command.to_owned(), status: output.status.to_string() });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Run a command line as a yes/no query: exit 0 means yes.
pub fn query(command: &str) -> Result<bool> { Ok(spawn(command)?.status.success()) }

/// Probe backed by the handheld's helper scripts.
#[derive(Debug, Clone)]
pub struct ShellProbe {
    commands: ShellCommands,
}

impl ShellProbe {
    pub const fn new(commands: ShellCommands) -> Self { Self { commands } }

    fn percentage(command: &str) -> Result<u8> { parse_percentage(command, &run(command)?) }
}

impl SystemProbe for ShellProbe {
    fn read_volume(&mut self) -> Result<u8> { Self::percentage(&self.commands.volume_get) }

    fn read_brightness(&mut self) -> Result<u8> { Self::percentage(&self.commands.brightness_get) }

    fn read_usb_connected(&mut self) -> Result<bool> { query(&self.commands.usb_data_connected) }

    fn read_usb_sharing(&mut self) -> Result<bool> { query(&self.commands.usb_check_sharing) }

    fn read_filesystem_mode(&mut self) -> Result<bool> { query(&self.commands.read_write_check) }

    fn set_volume(&mut self, percent: u8) -> Result<()> {
        run(&format!("{} {percent}", self.commands.volume_set)).map(drop)
    }

    fn set_brightness(&mut self, percent: u8) -> Result<()> {
        run(&format!("{} {percent}", self.commands.brightness_set)).map(drop)
    }

    fn mount_usb(&mut self) -> Result<()> { run(&self.commands.usb_mount).map(drop) }

    fn unmount_usb(&mut self) -> Result<()> { run(&self.commands.usb_unmount).map(drop) }

    fn set_filesystem_mode(&mut self, read_write: bool) -> Result<()> {
        let command = if read_write { &self.commands.read_write } else { &self.commands.read_only };
        run(command).map(drop)
    }

    fn power_down(&mut self) -> Result<()> { run(&self.commands.powerdown).map(drop) }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn commands() -> ShellCommands {
        ShellCommands {
            volume_get: "echo 70".into(),
            volume_set: "true".into(),
            brightness_get: "echo not-a-number".into(),
            brightness_set: "false".into(),
            usb_data_connected: "true".into(),
            usb_check_sharing: "false".into(),
            usb_mount: "exit 3".into(),
            ..ShellCommands::default()
        }
    }

    #[test]
    fn test_run_captures_stdout() {
        assert_eq!(run("echo hello").unwrap(), "hello\n");
    }

    #[test]
    fn test_run_nonzero_is_command_error() {
        let err = run("exit 2").unwrap_err();
        assert!(matches!(err, MenuError::Command { ref command, .. } if command == "exit 2"));
    }

    #[test]
    fn test_query_maps_exit_status() {
        assert!(query("true").unwrap());
        assert!(!query("false").unwrap());
    }

    #[test]
    fn test_shell_probe_reads() {
        let mut probe = ShellProbe::new(commands());
        assert_eq!(probe.read_volume().unwrap(), 70);
        assert!(matches!(probe.read_brightness(), Err(MenuError::Malformed { .. })));
        assert!(probe.read_usb_connected().unwrap());
        assert!(!probe.read_usb_sharing().unwrap());
    }

    #[test]
    fn test_shell_probe_setters() {
        let mut probe = ShellProbe::new(commands());
        assert!(probe.set_volume(60).is_ok(), "`true 60` exits 0");
        assert!(probe.set_brightness(60).is_err(), "`false 60` exits 1");
        assert!(probe.mount_usb().is_err());
    }
}
