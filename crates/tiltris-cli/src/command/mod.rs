use clap::{Parser, Subcommand};

use self::{play::PlayArg, send::SendArg};

mod play;
mod send;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play in the terminal, listening for gesture and voice events on a socket
    Play(#[clap(flatten)] PlayArg),
    /// Send events to a running game
    Send(#[clap(flatten)] SendArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Send(arg) => send::run(&arg)?,
    }
    Ok(())
}
