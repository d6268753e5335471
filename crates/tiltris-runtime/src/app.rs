use crossterm::event::Event;
use ratatui::Frame;

use crate::Runtime;

/// Trait for TUI applications.
///
/// Applications executed by `Runtime::run()` must implement this trait.
pub trait App {
    /// Messages delivered from other threads via [`Runtime::attach_receiver`].
    type Message;

    /// Initializes the application.
    ///
    /// Called at the start of `Runtime::run()`. Use this to configure `tick_rate/render_mode`.
    fn init(&mut self, runtime: &mut Runtime<Self::Message>);

    /// Returns whether the application should exit.
    fn should_exit(&self) -> bool;

    /// Handles terminal events (key input, mouse, resize, etc.).
    fn handle_event(&mut self, runtime: &mut Runtime<Self::Message>, event: Event);

    /// Handles a message received from the attached channel.
    fn handle_message(&mut self, runtime: &mut Runtime<Self::Message>, message: Self::Message);

    /// Draws the screen.
    fn draw(&self, frame: &mut Frame);

    /// Advances application state (called on each tick).
    fn update(&mut self, runtime: &mut Runtime<Self::Message>);
}
