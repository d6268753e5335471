use crossterm::event::Event as CrosstermEvent;

/// Events processed by TUI applications.
#[derive(Debug, Clone, derive_more::IsVariant)]
pub(super) enum TuiEvent<M> {
    /// Logic update timing (based on `tick_interval`).
    Tick,
    /// Screen render timing (based on the render mode).
    Render,
    /// Terminal events such as key input, mouse, and resize.
    Crossterm(CrosstermEvent),
    /// A message from the attached channel.
    External(M),
}
