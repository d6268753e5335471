use std::{
    fs,
    path::{Path, PathBuf},
    sync::mpsc,
};

use anyhow::Context as _;
use clap::ValueEnum;
use tiltris_engine::{GameConfig, PieceSeed, SpawnPolicy, StartMode};
use tiltris_runtime::Runtime;
use tracing::info;

use crate::{command::play::app::PlayApp, io, logging};

mod app;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Socket to listen on for gesture and voice events
    #[clap(long, default_value = io::DEFAULT_SOCKET_PATH)]
    socket: PathBuf,
    /// Game settings file (JSON)
    #[clap(long)]
    config: Option<PathBuf>,
    /// How the next piece is chosen
    #[clap(long, value_enum)]
    spawn: Option<SpawnArg>,
    /// Whether to wait for Enter before the first game
    #[clap(long, value_enum)]
    start: Option<StartArg>,
    /// Seed for random spawning (32 hex digits)
    #[clap(long)]
    seed: Option<PieceSeed>,
    /// Milliseconds between forced descents
    #[clap(long)]
    drop_interval_ms: Option<u64>,
    /// Milliseconds the voice input is ignored after an accepted command
    #[clap(long)]
    voice_cooldown_ms: Option<u64>,
    /// Write logs to this file
    #[clap(long)]
    log_file: Option<PathBuf>,
    /// Save the final session state to this file (JSON)
    #[clap(long)]
    save_snapshot: Option<PathBuf>,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            socket: PathBuf::from(io::DEFAULT_SOCKET_PATH),
            config: None,
            spawn: None,
            start: None,
            seed: None,
            drop_interval_ms: None,
            voice_cooldown_ms: None,
            log_file: None,
            save_snapshot: None,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SpawnArg {
    /// Fixed repeating order
    Sequence,
    /// Uniform random choice
    Random,
}

impl From<SpawnArg> for SpawnPolicy {
    fn from(arg: SpawnArg) -> Self {
        match arg {
            SpawnArg::Sequence => SpawnPolicy::Sequence,
            SpawnArg::Random => SpawnPolicy::Random,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StartArg {
    /// Wait for Enter
    Manual,
    /// Start right away
    Immediate,
}

impl From<StartArg> for StartMode {
    fn from(arg: StartArg) -> Self {
        match arg {
            StartArg::Manual => StartMode::Manual,
            StartArg::Immediate => StartMode::Immediate,
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    if let Some(path) = &arg.log_file {
        logging::init(path)?;
    }
    let config = build_config(arg)?;
    info!(?config, "starting session");

    let (tx, rx) = mpsc::channel();
    let socket = io::spawn_socket_listener(&arg.socket, tx)?;

    let mut app = PlayApp::new(&config, socket.path());
    let mut runtime = Runtime::new();
    runtime.attach_receiver(rx);
    runtime.run(&mut app)?;
    drop(socket);

    if let Some(path) = &arg.save_snapshot {
        let json = serde_json::to_string_pretty(&app.snapshot())?;
        fs::write(path, json)
            .with_context(|| format!("failed to write snapshot {}", path.display()))?;
    }
    Ok(())
}

/// Loads the configuration file, if any, and applies command-line overrides.
fn build_config(arg: &PlayArg) -> anyhow::Result<GameConfig> {
    let mut config = match &arg.config {
        Some(path) => load_config(path)?,
        None => GameConfig::default(),
    };
    if let Some(spawn) = arg.spawn {
        config.spawn_policy = spawn.into();
    }
    if let Some(start) = arg.start {
        config.start_mode = start.into();
    }
    if let Some(seed) = arg.seed {
        config.seed = Some(seed);
    }
    if let Some(ms) = arg.drop_interval_ms {
        config.drop_interval_ms = ms;
    }
    if let Some(ms) = arg.voice_cooldown_ms {
        config.voice_cooldown_ms = ms;
    }
    config.validate()?;
    Ok(config)
}

fn load_config(path: &Path) -> anyhow::Result<GameConfig> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("invalid config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = build_config(&PlayArg::default()).unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_flags_override_defaults() {
        let arg = PlayArg {
            spawn: Some(SpawnArg::Random),
            start: Some(StartArg::Immediate),
            seed: Some("0000000000000000000000000000beef".parse().unwrap()),
            drop_interval_ms: Some(250),
            voice_cooldown_ms: Some(100),
            ..PlayArg::default()
        };
        let config = build_config(&arg).unwrap();
        assert_eq!(config.spawn_policy, SpawnPolicy::Random);
        assert_eq!(config.start_mode, StartMode::Immediate);
        assert!(config.seed.is_some());
        assert_eq!(config.drop_interval_ms, 250);
        assert_eq!(config.voice_cooldown_ms, 100);
    }

    #[test]
    fn test_flags_override_file() {
        let path = std::env::temp_dir().join(format!("tiltris-config-{}.json", std::process::id()));
        fs::write(&path, r#"{ "board_width": 12, "drop_interval_ms": 800 }"#).unwrap();
        let arg = PlayArg {
            config: Some(path.clone()),
            drop_interval_ms: Some(400),
            ..PlayArg::default()
        };
        let config = build_config(&arg).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(config.board_width, 12);
        assert_eq!(config.drop_interval_ms, 400);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let arg = PlayArg {
            drop_interval_ms: Some(0),
            ..PlayArg::default()
        };
        assert!(build_config(&arg).is_err());

        let arg = PlayArg {
            config: Some(PathBuf::from("/nonexistent/tiltris.json")),
            ..PlayArg::default()
        };
        assert!(build_config(&arg).is_err());
    }
}
