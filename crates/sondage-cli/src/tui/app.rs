use crossterm::event::Event;
use ratatui::Frame;

/// A full-screen application driven by [`Tui::run`](crate::tui::Tui::run).
///
/// The runner draws the app whenever it may have changed and forwards every
/// terminal event to it, until `should_exit` returns true.
pub trait App {
    fn should_exit(&self) -> bool;

    /// Applies one terminal event (key input, resize, ...).
    fn handle_event(&mut self, event: Event);

    fn draw(&self, frame: &mut Frame);
}
