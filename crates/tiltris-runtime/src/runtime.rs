use std::{io, sync::mpsc::Receiver, time::Duration};

use crate::{
    App,
    event::TuiEvent,
    event_loop::{EventLoop, RenderMode},
};

/// TUI application runtime.
///
/// Manages the event loop and executes applications that implement the `App` trait.
#[derive(Debug)]
pub struct Runtime<M = ()> {
    events: EventLoop<M>,
}

impl<M> Default for Runtime<M> {
    fn default() -> Self {
        Self {
            events: EventLoop::default(),
        }
    }
}

impl<M> Runtime<M> {
    /// Creates a new Runtime.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tick rate (Hz, ticks per second).
    pub fn set_tick_rate(&mut self, rate: Option<f64>) {
        self.set_tick_interval(rate.map(|rate| Duration::from_secs_f64(1.0 / rate)));
    }

    /// Sets the tick interval.
    pub fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.events.set_tick_interval(interval);
    }

    /// Sets the render mode.
    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.events.set_render_mode(mode);
    }

    /// Delivers messages from `receiver` to [`App::handle_message`].
    ///
    /// The receiver is dropped once every sender is gone.
    pub fn attach_receiver(&mut self, receiver: Receiver<M>) {
        self.events.set_receiver(Some(receiver));
    }

    /// Sets how often the channel is checked while waiting for terminal input.
    pub fn set_poll_interval(&mut self, interval: Duration) {
        self.events.set_poll_interval(interval);
    }

    /// Runs the application.
    ///
    /// 1. Calls `app.init()` for initialization
    /// 2. Runs the event loop until `app.should_exit()` returns true
    ///    - `Tick`: calls `app.update()`
    ///    - `Render`: calls `app.draw()`
    ///    - `Crossterm`: calls `app.handle_event()`
    ///    - `External`: calls `app.handle_message()`
    pub fn run<A>(mut self, app: &mut A) -> io::Result<()>
    where
        A: App<Message = M>,
    {
        app.init(&mut self);

        ratatui::run(|terminal| {
            while !app.should_exit() {
                match self.events.next()? {
                    TuiEvent::Tick => {
                        app.update(&mut self);
                    }
                    TuiEvent::Render => {
                        terminal.draw(|f| app.draw(f))?;
                    }
                    TuiEvent::Crossterm(event) => {
                        app.handle_event(&mut self, event);
                    }
                    TuiEvent::External(message) => {
                        app.handle_message(&mut self, message);
                    }
                }
            }
            Ok(())
        })
    }
}
