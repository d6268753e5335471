//! Terminal event loop for `tiltris`.
//!
//! Drives an [`App`] with tick, render and terminal events, plus messages sent
//! from other threads through an attached [`std::sync::mpsc`] channel.

pub use self::{app::App, event_loop::RenderMode, runtime::Runtime};

mod app;
mod event;
mod event_loop;
mod runtime;
