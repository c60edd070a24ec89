use crossterm::event;

use crate::tui::event::TuiEvent;

/// Event loop state management.
///
/// There is no tick timer: the loop blocks on terminal input and asks for a
/// redraw only after an event was delivered, so an idle dashboard does no work.
#[derive(Debug)]
pub(super) struct EventLoop {
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    pub fn new() -> Self {
        Self {
            dirty: true, // Initial render is required on startup
        }
    }

    /// Returns the next event.
    ///
    /// Returns `Render` when the screen is out of date, otherwise blocks until
    /// a crossterm event occurs.
    pub(super) fn next(&mut self) -> anyhow::Result<TuiEvent> {
        if self.dirty {
            self.dirty = false;
            return Ok(TuiEvent::Render);
        }
        let event = event::read()?;
        self.dirty = true;
        Ok(event.into())
    }
}
