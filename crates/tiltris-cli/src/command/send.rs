use std::{
    io::{self, BufRead as _, BufWriter, Write as _},
    os::unix::net::UnixStream,
    path::PathBuf,
};

use anyhow::Context as _;
use clap::Subcommand;
use tiltris_engine::{InboundEvent, TiltLabel};

use crate::io::DEFAULT_SOCKET_PATH;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SendArg {
    /// Socket of the running game
    #[clap(long, default_value = DEFAULT_SOCKET_PATH)]
    socket: PathBuf,
    #[command(subcommand)]
    event: SendEvent,
}

#[derive(Debug, Clone, Subcommand)]
enum SendEvent {
    /// Send a head-tilt label such as "Tilted Left" or "Center"
    Gesture { label: String },
    /// Send a voice transcript such as "rotate"
    Voice { text: String },
    /// Copy lines from stdin to the socket unchanged
    Raw,
}

impl SendEvent {
    fn to_event(&self) -> Option<InboundEvent> {
        match self {
            SendEvent::Gesture { label } => Some(InboundEvent::ControlCommand {
                action: TiltLabel::from(label.as_str()),
            }),
            SendEvent::Voice { text } => Some(InboundEvent::VoiceCommand {
                command: text.clone(),
            }),
            SendEvent::Raw => None,
        }
    }
}

pub(crate) fn run(arg: &SendArg) -> anyhow::Result<()> {
    let SendArg { socket, event } = arg;

    let stream = UnixStream::connect(socket)
        .with_context(|| format!("failed to connect to {}", socket.display()))?;
    let mut writer = BufWriter::new(stream);

    if let Some(event) = event.to_event() {
        serde_json::to_writer(&mut writer, &event)?;
        writeln!(writer)?;
    } else {
        for line in io::stdin().lock().lines() {
            let line = line.context("failed to read stdin")?;
            writeln!(writer, "{line}")?;
            writer.flush()?;
        }
    }
    writer.flush().context("failed to send event")?;
    Ok(())
}
