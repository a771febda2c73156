use std::io;

use crossterm::{
    cursor, execute,
    event::DisableMouseCapture,
    terminal::{disable_raw_mode, LeaveAlternateScreen},
};

/// Runs a closure once when dropped.
pub struct OnDrop<F: FnOnce()> {
    action: Option<F>,
}

impl<F: FnOnce()> OnDrop<F> {
    pub fn new(action: F) -> Self {
        Self { action: Some(action) }
    }
}

impl<F: FnOnce()> Drop for OnDrop<F> {
    fn drop(&mut self) {
        if let Some(action) = self.action.take() {
            action();
        }
    }
}

/// Leaves raw mode and the alternate screen on every exit path, including
/// a failed setup step after raw mode was enabled. Errors are ignored.
pub fn restore_on_drop() -> OnDrop<impl FnOnce()> {
    OnDrop::new(|| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture, cursor::Show);
    })
}
