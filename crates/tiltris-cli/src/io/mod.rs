//! Push channel: a Unix socket accepting one event per line.

use std::{
    fs,
    io::{self, BufRead as _, BufReader},
    os::unix::net::{UnixListener, UnixStream},
    path::{Path, PathBuf},
    sync::mpsc::Sender,
    thread,
};

use anyhow::Context as _;
use tiltris_engine::{Command, InboundEvent};
use tracing::{debug, info, warn};

pub const DEFAULT_SOCKET_PATH: &str = "/tmp/tiltris.sock";

/// Removes the socket file when dropped.
#[derive(Debug)]
pub struct SocketGuard {
    path: PathBuf,
}

impl SocketGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for SocketGuard {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path)
            && e.kind() != io::ErrorKind::NotFound
        {
            warn!(path = %self.path.display(), error = %e, "failed to remove socket");
        }
    }
}

/// Binds `path` and forwards every received event to `tx` from background threads.
///
/// Each connection is read on its own thread. Opening and closing a connection
/// is reported as [`InboundEvent::Connect`] and [`InboundEvent::Disconnect`].
pub fn spawn_socket_listener(path: &Path, tx: Sender<Command>) -> anyhow::Result<SocketGuard> {
    match fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "removed stale socket"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(e).with_context(|| format!("failed to remove {}", path.display()));
        }
    }
    let listener = UnixListener::bind(path)
        .with_context(|| format!("failed to bind socket {}", path.display()))?;
    info!(path = %path.display(), "listening for events");

    thread::spawn(move || {
        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    let tx = tx.clone();
                    thread::spawn(move || handle_stream(stream, &tx));
                }
                Err(e) => warn!(error = %e, "failed to accept connection"),
            }
        }
    });

    Ok(SocketGuard {
        path: path.to_owned(),
    })
}

fn handle_stream(stream: UnixStream, tx: &Sender<Command>) {
    if tx.send(InboundEvent::Connect.into()).is_err() {
        return;
    }
    let reader = BufReader::new(stream);
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                debug!(error = %e, "connection read failed");
                break;
            }
        };
        let Some(command) = parse_command(&line) else {
            continue;
        };
        if tx.send(command).is_err() {
            return;
        }
    }
    let _ = tx.send(InboundEvent::Disconnect.into());
}

/// Parses one line into a command, dropping blank, malformed and connection-state lines.
fn parse_command(line: &str) -> Option<Command> {
    match InboundEvent::parse_line(line)? {
        Ok(InboundEvent::Connect | InboundEvent::Disconnect) => {
            debug!(line, "ignored connection event from peer");
            None
        }
        Ok(event) => Some(event.into()),
        Err(e) => {
            debug!(line, error = %e, "ignored malformed event");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{io::Write as _, sync::mpsc, time::Duration};

    use tiltris_engine::TiltLabel;

    use super::*;

    #[test]
    fn test_parse_command() {
        assert_eq!(
            parse_command("Tilted Left"),
            Some(Command::Inbound(InboundEvent::ControlCommand {
                action: TiltLabel::Left
            }))
        );
        assert_eq!(
            parse_command(r#"{"event":"voice_command","command":"drop"}"#),
            Some(Command::Inbound(InboundEvent::VoiceCommand {
                command: "drop".to_owned()
            }))
        );
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command(r#"{"event":"connect"}"#), None);
        assert_eq!(parse_command(r#"{"event":"unknown"}"#), None);
    }

    #[test]
    fn test_listener_forwards_events() {
        let path = std::env::temp_dir().join(format!("tiltris-test-{}.sock", std::process::id()));
        let (tx, rx) = mpsc::channel();
        let guard = spawn_socket_listener(&path, tx).unwrap();

        let mut stream = UnixStream::connect(&path).unwrap();
        writeln!(stream, "Tilted Up").unwrap();
        writeln!(stream, "{{not json").unwrap();
        writeln!(stream, r#"{{"event":"voice_command","command":"left"}}"#).unwrap();
        drop(stream);

        let timeout = Duration::from_secs(5);
        let received: Vec<_> = (0..4).map(|_| rx.recv_timeout(timeout).unwrap()).collect();
        assert_eq!(
            received,
            [
                Command::Inbound(InboundEvent::Connect),
                Command::Inbound(InboundEvent::ControlCommand {
                    action: TiltLabel::Up
                }),
                Command::Inbound(InboundEvent::VoiceCommand {
                    command: "left".to_owned()
                }),
                Command::Inbound(InboundEvent::Disconnect),
            ]
        );

        drop(guard);
        assert!(!path.exists());
    }
}
