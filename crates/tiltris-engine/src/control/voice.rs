use std::time::Duration;

use super::command::{Action, parse_voice_command};

/// Rate limiter for voice commands.
///
/// After an accepted command the gate stays closed for the cooldown; commands
/// arriving meanwhile are dropped, not queued. Unrecognized transcripts leave
/// the gate as it is. Time is whatever monotonic clock the caller uses for the
/// game loop, so the cooldown needs no timer of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceGate {
    cooldown: Duration,
    reopen_at: Option<Duration>,
}

impl VoiceGate {
    #[must_use]
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            reopen_at: None,
        }
    }

    #[must_use]
    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    #[must_use]
    pub fn is_open(&self, now: Duration) -> bool {
        self.reopen_at.is_none_or(|reopen_at| now >= reopen_at)
    }

    /// Returns the action for `transcript` if the gate is open, closing it on a match.
    pub fn accept(&mut self, transcript: &str, now: Duration) -> Option<Action> {
        if !self.is_open(now) {
            return None;
        }
        let action = parse_voice_command(transcript)?;
        self.reopen_at = Some(now + self.cooldown);
        Some(action)
    }

    pub fn reset(&mut self) {
        self.reopen_at = None;
    }
}
