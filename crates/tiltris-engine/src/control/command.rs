use serde::{Deserialize, Serialize};

/// A discrete game action, whatever input produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    #[display("move left")]
    MoveLeft,
    #[display("move right")]
    MoveRight,
    #[display("rotate")]
    Rotate,
    #[display("drop")]
    Drop,
}

/// Classification label of the head-tilt signal.
///
/// Labels arrive as free text; anything that is not one of the five known
/// labels is kept verbatim as [`TiltLabel::Unknown`].
///
/// ```
/// use tiltris_engine::{Action, TiltLabel};
///
/// assert_eq!(TiltLabel::from("Tilted Up").action(), Some(Action::Rotate));
/// assert!(TiltLabel::from("Center").is_center());
/// assert_eq!(TiltLabel::from("No Face Detected").action(), None);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum TiltLabel {
    #[default]
    Center,
    Left,
    Right,
    Up,
    Down,
    Unknown(String),
}

impl TiltLabel {
    #[must_use]
    pub fn is_center(&self) -> bool {
        *self == TiltLabel::Center
    }

    /// Action fired when the signal leaves the center with this label.
    #[must_use]
    pub fn action(&self) -> Option<Action> {
        match self {
            TiltLabel::Left => Some(Action::MoveLeft),
            TiltLabel::Right => Some(Action::MoveRight),
            TiltLabel::Up => Some(Action::Rotate),
            TiltLabel::Down => Some(Action::Drop),
            TiltLabel::Center | TiltLabel::Unknown(_) => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            TiltLabel::Center => "Center",
            TiltLabel::Left => "Tilted Left",
            TiltLabel::Right => "Tilted Right",
            TiltLabel::Up => "Tilted Up",
            TiltLabel::Down => "Tilted Down",
            TiltLabel::Unknown(label) => label,
        }
    }
}

impl From<&str> for TiltLabel {
    fn from(label: &str) -> Self {
        match label {
            "Center" => TiltLabel::Center,
            "Tilted Left" => TiltLabel::Left,
            "Tilted Right" => TiltLabel::Right,
            "Tilted Up" => TiltLabel::Up,
            "Tilted Down" => TiltLabel::Down,
            _ => TiltLabel::Unknown(label.to_owned()),
        }
    }
}

impl From<String> for TiltLabel {
    fn from(label: String) -> Self {
        TiltLabel::from(label.as_str())
    }
}

impl From<TiltLabel> for String {
    fn from(label: TiltLabel) -> Self {
        match label {
            TiltLabel::Unknown(label) => label,
            known => known.as_str().to_owned(),
        }
    }
}

/// Maps a voice transcript to an action.
///
/// The transcript is trimmed and matched exactly (case-sensitive) against the
/// vocabulary `left`, `right`, `rotate`/`up` and `drop`/`down`.
#[must_use]
pub fn parse_voice_command(transcript: &str) -> Option<Action> {
    match transcript.trim() {
        "left" => Some(Action::MoveLeft),
        "right" => Some(Action::MoveRight),
        "rotate" | "up" => Some(Action::Rotate),
        "drop" | "down" => Some(Action::Drop),
        _ => None,
    }
}

/// One event of the push channel, encoded as a JSON object per line.
///
/// ```
/// use tiltris_engine::{InboundEvent, TiltLabel};
///
/// let event = InboundEvent::parse_line(r#"{"event":"control_command","action":"Tilted Left"}"#);
/// assert_eq!(event.unwrap().unwrap(), InboundEvent::ControlCommand { action: TiltLabel::Left });
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InboundEvent {
    /// A producer connected.
    Connect,
    /// A producer went away.
    Disconnect,
    /// A camera frame (base64 JPEG). Only counted.
    VideoFeed { image: String },
    /// A head-tilt classification.
    ControlCommand { action: TiltLabel },
    /// A speech transcript.
    VoiceCommand { command: String },
}

impl InboundEvent {
    /// Parses one line of the push channel.
    ///
    /// Lines starting with `{` are JSON events. Any other non-blank line is taken
    /// as a bare head-tilt label, so a classifier can write its output directly.
    /// Returns `None` for blank lines.
    pub fn parse_line(line: &str) -> Option<Result<Self, serde_json::Error>> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        if line.starts_with('{') {
            return Some(serde_json::from_str(line));
        }
        Some(Ok(InboundEvent::ControlCommand {
            action: TiltLabel::from(line),
        }))
    }
}

/// A unit of work for the session controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Begin play if not already playing.
    Start,
    /// Reinitialize and begin play, from any state.
    Reset,
    /// A direct action (keyboard).
    Action(Action),
    /// An event from the push channel.
    Inbound(InboundEvent),
}

impl From<Action> for Command {
    fn from(action: Action) -> Self {
        Command::Action(action)
    }
}

impl From<InboundEvent> for Command {
    fn from(event: InboundEvent) -> Self {
        Command::Inbound(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_mapping() {
        let cases = [
            ("Center", None),
            ("Tilted Left", Some(Action::MoveLeft)),
            ("Tilted Right", Some(Action::MoveRight)),
            ("Tilted Up", Some(Action::Rotate)),
            ("Tilted Down", Some(Action::Drop)),
            ("No Face Detected", None),
            ("tilted left", None),
        ];
        for (label, action) in cases {
            assert_eq!(TiltLabel::from(label).action(), action, "{label}");
        }
    }

    #[test]
    fn test_label_string_roundtrip() {
        for label in ["Center", "Tilted Left", "Tilted Down", "No Face Detected"] {
            assert_eq!(String::from(TiltLabel::from(label)), label);
        }
    }

    #[test]
    fn test_voice_vocabulary() {
        assert_eq!(parse_voice_command("left"), Some(Action::MoveLeft));
        assert_eq!(parse_voice_command("  right\n"), Some(Action::MoveRight));
        assert_eq!(parse_voice_command("rotate"), Some(Action::Rotate));
        assert_eq!(parse_voice_command("up"), Some(Action::Rotate));
        assert_eq!(parse_voice_command("drop"), Some(Action::Drop));
        assert_eq!(parse_voice_command("down"), Some(Action::Drop));
        assert_eq!(parse_voice_command("Left"), None);
        assert_eq!(parse_voice_command("go left"), None);
        assert_eq!(parse_voice_command(""), None);
    }

    #[test]
    fn test_parse_json_events() {
        let cases = [
            (r#"{"event":"connect"}"#, InboundEvent::Connect),
            (r#"{"event":"disconnect"}"#, InboundEvent::Disconnect),
            (
                r#"{"event":"video_feed","image":"AAAA"}"#,
                InboundEvent::VideoFeed {
                    image: "AAAA".to_owned(),
                },
            ),
            (
                r#"{"event":"control_command","action":"No Face Detected"}"#,
                InboundEvent::ControlCommand {
                    action: TiltLabel::Unknown("No Face Detected".to_owned()),
                },
            ),
            (
                r#"{"event":"voice_command","command":" drop "}"#,
                InboundEvent::VoiceCommand {
                    command: " drop ".to_owned(),
                },
            ),
        ];
        for (line, expected) in cases {
            assert_eq!(InboundEvent::parse_line(line).unwrap().unwrap(), expected);
        }
    }

    #[test]
    fn test_parse_bare_label_and_blank() {
        assert_eq!(
            InboundEvent::parse_line("Tilted Right\n").unwrap().unwrap(),
            InboundEvent::ControlCommand {
                action: TiltLabel::Right
            }
        );
        assert!(InboundEvent::parse_line("   ").is_none());
    }

    #[test]
    fn test_parse_malformed_json() {
        assert!(InboundEvent::parse_line(r#"{"event":"jump"}"#).unwrap().is_err());
        assert!(InboundEvent::parse_line(r#"{"event":"voice_command"}"#).unwrap().is_err());
        assert!(InboundEvent::parse_line("{not json").unwrap().is_err());
    }

    #[test]
    fn test_serialize_event() {
        let event = InboundEvent::ControlCommand {
            action: TiltLabel::Up,
        };
        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"{"event":"control_command","action":"Tilted Up"}"#
        );
    }
}
