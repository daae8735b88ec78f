//! Input events consumed by the menu.
//!
//! Backends translate their native events (SDL keys in the simulator, GPIO
//! buttons on hardware) into [`InputEvent`]s. Anything without a menu meaning is
//! dropped by the backend, so the navigator never sees unknown keys.

/// Menu keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuKey {
    /// Back out of a pending confirmation. Does not close the menu.
    Cancel,
    /// Close the menu.
    Escape,
    Up,
    Down,
    Left,
    Right,
    Confirm,
}

/// One input event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// The host asked the application to quit (window closed, SIGTERM).
    Quit,
    Key(MenuKey),
}

/// Non-blocking event queue.
pub trait InputSource {
    /// Next queued event, or `None` when the queue is empty.
    fn poll_event(&mut self) -> Option<InputEvent>;
}
