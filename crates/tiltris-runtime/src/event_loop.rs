use std::{
    io,
    sync::mpsc::{Receiver, TryRecvError},
    time::{Duration, Instant},
};

use crossterm::event;
use tracing::debug;

use crate::event::TuiEvent;

/// Rendering trigger mode.
#[derive(Debug, Clone, Copy, Default)]
pub enum RenderMode {
    /// Render at fixed intervals.
    Interval(Duration),
    /// Render after state changes (tick, message or crossterm event).
    #[default]
    OnDirty,
    /// Render after state changes, but with minimum interval between renders.
    ///
    /// If events occur faster than the interval, they are batched into one render.
    Throttled(Duration),
}

impl RenderMode {
    /// Creates `Interval` mode from frame rate (FPS).
    #[must_use]
    pub fn interval_from_rate(rate: f64) -> Self {
        Self::Interval(Duration::from_secs_f64(1.0 / rate))
    }

    /// Creates `Throttled` mode from frame rate (FPS).
    #[must_use]
    pub fn throttled_from_rate(rate: f64) -> Self {
        Self::Throttled(Duration::from_secs_f64(1.0 / rate))
    }
}

/// Event loop state management.
///
/// Manages tick/render intervals and returns the next event via `next()`.
/// If an interval is not set, that event type will not be generated.
///
/// The channel cannot be waited on together with the terminal, so while a
/// receiver is attached the terminal poll never blocks longer than
/// `poll_interval`.
#[derive(Debug)]
pub(super) struct EventLoop<M> {
    tick_interval: Option<Duration>,
    render_mode: RenderMode,
    last_tick: Instant,
    last_render: Instant,
    dirty: bool,
    receiver: Option<Receiver<M>>,
    poll_interval: Duration,
}

impl<M> Default for EventLoop<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> EventLoop<M> {
    pub(super) const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

    /// Creates a new `EventLoop`.
    ///
    /// Tick interval is unset, no receiver is attached, and render mode defaults to `OnDirty`.
    pub fn new() -> Self {
        let now = Instant::now();
        let past_time = now.checked_sub(Duration::from_secs(86400)).unwrap_or(now);
        Self {
            tick_interval: None,
            render_mode: RenderMode::default(),
            last_tick: past_time,
            last_render: past_time,
            dirty: true, // Initial render is required on startup
            receiver: None,
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
        }
    }

    pub(super) fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.tick_interval = interval;
    }

    pub(super) fn set_render_mode(&mut self, render_mode: RenderMode) {
        self.render_mode = render_mode;
    }

    pub(super) fn set_receiver(&mut self, receiver: Option<Receiver<M>>) {
        self.receiver = receiver;
    }

    pub(super) fn set_poll_interval(&mut self, interval: Duration) {
        self.poll_interval = interval;
    }

    /// Returns the next event.
    ///
    /// Blocks until a tick/render time is reached, a message arrives, or a
    /// crossterm event occurs. Ticks win over messages, and messages over renders.
    pub(super) fn next(&mut self) -> io::Result<TuiEvent<M>> {
        loop {
            let now = Instant::now();
            if let Some(tick_interval) = self.tick_interval
                && now.duration_since(self.last_tick) >= tick_interval
            {
                self.last_tick = now;
                self.dirty = true;
                return Ok(TuiEvent::Tick);
            }

            if let Some(message) = self.poll_message() {
                self.dirty = true;
                return Ok(TuiEvent::External(message));
            }

            let do_render = match self.render_mode {
                RenderMode::Interval(interval) => now.duration_since(self.last_render) >= interval,
                RenderMode::OnDirty => self.dirty,
                RenderMode::Throttled(interval) => {
                    self.dirty && now.duration_since(self.last_render) >= interval
                }
            };
            if do_render {
                self.last_render = now;
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            if let Some(timeout) = self.compute_timeout(now)
                && !event::poll(timeout)?
            {
                continue;
            }

            self.dirty = true;
            return Ok(TuiEvent::Crossterm(event::read()?));
        }
    }

    /// Takes one pending message. Detaches the receiver once all senders are gone.
    fn poll_message(&mut self) -> Option<M> {
        let receiver = self.receiver.as_ref()?;
        match receiver.try_recv() {
            Ok(message) => Some(message),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                debug!("message channel disconnected");
                self.receiver = None;
                None
            }
        }
    }

    fn compute_timeout(&self, now: Instant) -> Option<Duration> {
        let next_tick_at = self.tick_interval.map(|interval| self.last_tick + interval);
        let next_render_at = match self.render_mode {
            RenderMode::Interval(interval) => Some(self.last_render + interval),
            RenderMode::OnDirty => self.dirty.then_some(now),
            RenderMode::Throttled(interval) => self.dirty.then(|| self.last_render + interval),
        };
        let next_poll_at = self.receiver.as_ref().map(|_| now + self.poll_interval);
        let next_timeout_at = [next_tick_at, next_render_at, next_poll_at]
            .into_iter()
            .flatten()
            .min()?;
        Some(next_timeout_at.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;

    #[test]
    fn test_tick_comes_first() {
        let (tx, rx) = mpsc::channel();
        let mut events = EventLoop::new();
        events.set_receiver(Some(rx));
        events.set_tick_interval(Some(Duration::from_secs(1)));
        tx.send(1).unwrap();

        assert!(events.next().unwrap().is_tick());
        assert!(matches!(events.next().unwrap(), TuiEvent::External(1)));
        assert!(events.next().unwrap().is_render());
    }

    #[test]
    fn test_messages_precede_render() {
        let (tx, rx) = mpsc::channel();
        let mut events = EventLoop::new();
        events.set_receiver(Some(rx));
        tx.send("a").unwrap();
        tx.send("b").unwrap();

        assert!(matches!(events.next().unwrap(), TuiEvent::External("a")));
        assert!(matches!(events.next().unwrap(), TuiEvent::External("b")));
        assert!(events.next().unwrap().is_render());
    }

    #[test]
    fn test_disconnected_receiver_is_detached() {
        let (tx, rx) = mpsc::channel();
        let mut events = EventLoop::new();
        events.set_receiver(Some(rx));
        tx.send(7).unwrap();
        drop(tx);

        assert_eq!(events.poll_message(), Some(7));
        assert_eq!(events.poll_message(), None);
        assert!(events.receiver.is_none());
    }

    #[test]
    fn test_receiver_caps_timeout() {
        let mut events = EventLoop::<()>::new();
        events.dirty = false;
        let now = Instant::now();
        assert_eq!(events.compute_timeout(now), None);

        let (_tx, rx) = mpsc::channel();
        events.set_receiver(Some(rx));
        events.set_poll_interval(Duration::from_millis(5));
        assert_eq!(events.compute_timeout(now), Some(Duration::from_millis(5)));

        events.last_tick = now;
        events.set_tick_interval(Some(Duration::from_millis(2)));
        assert_eq!(events.compute_timeout(now), Some(Duration::from_millis(2)));
    }
}
