//! Input handling: commands, debouncers and the session controller.
//!
//! External producers (a head-tilt classifier, a speech recognizer) deliver a
//! noisy stream of [`InboundEvent`]s. [`GestureDebouncer`] and [`VoiceGate`]
//! turn that stream into discrete [`Action`]s, and [`SessionController`]
//! applies them to a [`GameSession`](crate::GameSession) once per tick.

pub use self::{command::*, controller::*, gesture::*, voice::*};

mod command;
mod controller;
mod gesture;
mod voice;
