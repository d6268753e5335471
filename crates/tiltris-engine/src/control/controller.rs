use std::{collections::VecDeque, time::Duration};

use serde::Serialize;
use tracing::{debug, info};

use crate::{
    ActionError,
    core::shape::{ShapeColor, ShapeKind, ShapeMatrix},
    engine::{GameConfig, GameSession, PieceSeed, SessionState, StartMode},
};

use super::{
    command::{Action, Command, InboundEvent},
    gesture::GestureDebouncer,
    voice::VoiceGate,
};

/// State of the push-channel producers.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeerStatus {
    connections: usize,
    frames_received: u64,
}

impl PeerStatus {
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connections > 0
    }

    #[must_use]
    pub fn connections(&self) -> usize {
        self.connections
    }

    #[must_use]
    pub fn frames_received(&self) -> u64 {
        self.frames_received
    }
}

/// Owns a [`GameSession`] and feeds it from every input source.
///
/// Commands are queued with [`Self::push`] and applied in arrival order at the
/// start of the next [`Self::tick`], before the drop timer advances. The
/// controller is the only writer of the session, so an input-driven move and
/// the timed descent never interleave.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use tiltris_engine::{Command, GameConfig, InboundEvent, SessionController, TiltLabel};
///
/// let mut controller = SessionController::new(&GameConfig::default());
/// controller.push(Command::Start);
/// controller.push(InboundEvent::ControlCommand { action: TiltLabel::Left }.into());
/// controller.tick(Duration::ZERO);
///
/// assert_eq!(controller.session().falling_piece().position().x(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct SessionController {
    session: GameSession,
    gesture: GestureDebouncer,
    voice: VoiceGate,
    queue: VecDeque<Command>,
    peer: PeerStatus,
    start_mode: StartMode,
    now: Duration,
}

impl SessionController {
    /// Creates a controller; with [`StartMode::Immediate`] the session is already playing.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        let mut this = Self {
            session: GameSession::new(config),
            gesture: GestureDebouncer::new(),
            voice: VoiceGate::new(config.voice_cooldown()),
            queue: VecDeque::new(),
            peer: PeerStatus::default(),
            start_mode: config.start_mode,
            now: Duration::ZERO,
        };
        if this.start_mode == StartMode::Immediate {
            this.start();
        }
        this
    }

    #[must_use]
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    #[must_use]
    pub fn gesture(&self) -> &GestureDebouncer {
        &self.gesture
    }

    #[must_use]
    pub fn voice(&self) -> &VoiceGate {
        &self.voice
    }

    #[must_use]
    pub fn peer(&self) -> &PeerStatus {
        &self.peer
    }

    #[must_use]
    pub fn start_mode(&self) -> StartMode {
        self.start_mode
    }

    /// Clock reading of the last tick.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of commands waiting for the next tick.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn push(&mut self, command: Command) {
        self.queue.push_back(command);
    }

    /// Applies queued commands, then advances the drop timer to `now`.
    pub fn tick(&mut self, now: Duration) {
        self.now = now;
        while let Some(command) = self.queue.pop_front() {
            self.handle(command);
        }
        self.session.update(now);
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Start => {
                if self.session.state().is_playing() {
                    debug!("start ignored while playing");
                } else {
                    self.start();
                }
            }
            Command::Reset => self.reset(),
            Command::Action(action) => self.try_apply(action),
            Command::Inbound(event) => self.handle_inbound(event),
        }
    }

    fn handle_inbound(&mut self, event: InboundEvent) {
        match event {
            InboundEvent::Connect => {
                self.peer.connections += 1;
                info!(connections = self.peer.connections, "producer connected");
            }
            InboundEvent::Disconnect => {
                self.peer.connections = self.peer.connections.saturating_sub(1);
                info!(connections = self.peer.connections, "producer disconnected");
            }
            InboundEvent::VideoFeed { .. } => self.peer.frames_received += 1,
            InboundEvent::ControlCommand { action: label } => {
                if !self.session.state().is_playing() {
                    return;
                }
                if let Some(action) = self.gesture.observe(label) {
                    self.try_apply(action);
                }
            }
            InboundEvent::VoiceCommand { command } => {
                if !self.session.state().is_playing() {
                    return;
                }
                match self.voice.accept(&command, self.now) {
                    Some(action) => self.try_apply(action),
                    None => debug!(command = command.trim(), "voice command dropped"),
                }
            }
        }
    }

    fn start(&mut self) {
        self.session.start();
        self.gesture.reset();
        self.voice.reset();
    }

    fn reset(&mut self) {
        self.session.reset();
        self.gesture.reset();
        self.voice.reset();
    }

    fn try_apply(&mut self, action: Action) {
        if let Err(err) = self.apply_action(action) {
            debug!(%action, %err, "action refused");
        }
    }

    /// Performs `action` on the session immediately, bypassing the queue.
    pub fn apply_action(&mut self, action: Action) -> Result<(), ActionError> {
        match action {
            Action::MoveLeft => self.session.try_move_left(),
            Action::MoveRight => self.session.try_move_right(),
            Action::Rotate => self.session.try_rotate(),
            Action::Drop => self.session.piece_drop().map(|_| ()),
        }
    }

    /// Captures the observable state for presentation or export.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let piece = self.session.falling_piece();
        SessionSnapshot {
            board: self.session.board().to_values(),
            piece: PieceSnapshot {
                kind: piece.kind(),
                color: piece.color(),
                x: piece.position().x(),
                y: piece.position().y(),
                shape: piece.shape().clone(),
            },
            score: self.session.stats().score(),
            cleared_lines: self.session.stats().cleared_lines(),
            completed_pieces: self.session.stats().completed_pieces(),
            state: self.session.state(),
            seed: self.session.spawner().seed(),
            connected: self.peer.is_connected(),
            frames_received: self.peer.frames_received,
        }
    }
}

/// Serializable view of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub board: Vec<Vec<u8>>,
    pub piece: PieceSnapshot,
    pub score: usize,
    pub cleared_lines: usize,
    pub completed_pieces: usize,
    pub state: SessionState,
    /// Seed of the random spawner; replaying with it repeats the piece order.
    pub seed: PieceSeed,
    pub connected: bool,
    pub frames_received: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieceSnapshot {
    pub kind: ShapeKind,
    pub color: ShapeColor,
    pub x: i32,
    pub y: i32,
    pub shape: ShapeMatrix,
}

#[cfg(test)]
mod tests {
    use crate::{
        SpawnPolicy,
        control::command::TiltLabel,
        core::{board::Block, shape::ShapeKind},
    };

    use super::*;

    fn gesture(label: &str) -> Command {
        InboundEvent::ControlCommand {
            action: TiltLabel::from(label),
        }
        .into()
    }

    fn voice(text: &str) -> Command {
        InboundEvent::VoiceCommand {
            command: text.to_owned(),
        }
        .into()
    }

    fn playing() -> SessionController {
        let config = GameConfig {
            start_mode: StartMode::Immediate,
            ..GameConfig::default()
        };
        SessionController::new(&config)
    }

    fn x(controller: &SessionController) -> i32 {
        controller.session().falling_piece().position().x()
    }

    #[test]
    fn test_start_modes() {
        let manual = SessionController::new(&GameConfig::default());
        assert!(manual.session().state().is_idle());
        assert!(playing().session().state().is_playing());
    }

    #[test]
    fn test_idle_ignores_inputs_without_memory() {
        let mut controller = SessionController::new(&GameConfig::default());
        controller.push(gesture("Tilted Left"));
        controller.push(voice("left"));
        controller.tick(Duration::ZERO);
        assert_eq!(controller.gesture().last_label(), &TiltLabel::Center);
        assert!(controller.voice().is_open(Duration::ZERO));

        controller.push(Command::Start);
        controller.push(gesture("Tilted Left"));
        controller.tick(Duration::from_millis(10));
        assert_eq!(x(&controller), 2);
    }

    #[test]
    fn test_commands_apply_in_order() {
        let mut controller = playing();
        controller.push(Action::MoveRight.into());
        controller.push(Action::MoveRight.into());
        controller.push(Action::Drop.into());
        assert_eq!(controller.pending(), 3);
        controller.tick(Duration::ZERO);
        assert_eq!(controller.pending(), 0);
        assert_eq!(x(&controller), 5);
        assert_eq!(controller.session().falling_piece().position().y(), 1);
    }

    #[test]
    fn test_start_ignored_while_playing() {
        let mut controller = playing();
        controller.push(Action::Drop.into());
        controller.push(Command::Start);
        controller.tick(Duration::ZERO);
        assert_eq!(controller.session().falling_piece().position().y(), 1);
    }

    #[test]
    fn test_reset_clears_debouncers() {
        let mut controller = playing();
        controller.push(gesture("Tilted Right"));
        controller.push(voice("rotate"));
        controller.tick(Duration::ZERO);
        assert_eq!(x(&controller), 4);
        assert!(!controller.voice().is_open(Duration::ZERO));

        controller.push(Command::Reset);
        controller.push(gesture("Tilted Right"));
        controller.push(voice("right"));
        controller.tick(Duration::from_millis(1));
        assert_eq!(x(&controller), 5);
        assert!(!controller.voice().is_open(Duration::from_millis(1)));
        assert_eq!(controller.gesture().last_label(), &TiltLabel::Right);
    }

    #[test]
    fn test_voice_uses_tick_clock() {
        let mut controller = playing();
        controller.push(voice("left"));
        controller.push(voice("left"));
        controller.tick(Duration::ZERO);
        assert_eq!(x(&controller), 2);

        controller.push(voice("left"));
        controller.tick(Duration::from_millis(600));
        assert_eq!(x(&controller), 1);
    }

    #[test]
    fn test_game_over_ignores_gestures() {
        let mut controller = playing();
        let board = controller.session_mut().board_mut();
        for x in [1, 2, 7, 8, 9] {
            board.fill_block_at(x, 0, Block::Piece(ShapeKind::Z));
        }
        for x in 1..10 {
            board.fill_block_at(x, 1, Block::Piece(ShapeKind::Z));
        }
        controller.push(Action::Drop.into());
        controller.push(gesture("Tilted Left"));
        controller.tick(Duration::ZERO);
        assert!(controller.session().state().is_game_over());
        assert_eq!(controller.gesture().last_label(), &TiltLabel::Center);

        controller.push(Command::Start);
        controller.tick(Duration::from_millis(1));
        assert!(controller.session().state().is_playing());
        assert!(controller.session().board().is_empty());
    }

    #[test]
    fn test_peer_status() {
        let mut controller = playing();
        controller.push(InboundEvent::Connect.into());
        controller.push(
            InboundEvent::VideoFeed {
                image: String::new(),
            }
            .into(),
        );
        controller.push(
            InboundEvent::VideoFeed {
                image: String::new(),
            }
            .into(),
        );
        controller.tick(Duration::ZERO);
        assert!(controller.peer().is_connected());
        assert_eq!(controller.peer().frames_received(), 2);

        controller.push(InboundEvent::Disconnect.into());
        controller.push(InboundEvent::Disconnect.into());
        controller.tick(Duration::ZERO);
        assert!(!controller.peer().is_connected());
        assert_eq!(controller.peer().connections(), 0);
    }

    #[test]
    fn test_snapshot_serializes() {
        let controller = playing();
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.piece.kind, ShapeKind::I);
        assert_eq!((snapshot.piece.x, snapshot.piece.y), (3, 0));

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["state"], "playing");
        assert_eq!(json["piece"]["color"], "cyan");
        assert_eq!(json["piece"]["shape"], serde_json::json!([[1, 1, 1, 1]]));
        assert_eq!(json["board"].as_array().unwrap().len(), 20);
        assert_eq!(json["score"], 0);
    }

    #[test]
    fn test_snapshot_seed_replays_random_spawns() {
        fn spawned_kinds(controller: &mut SessionController) -> Vec<ShapeKind> {
            let mut kinds = vec![controller.session().falling_piece().kind()];
            while kinds.len() < 20 && controller.session().state().is_playing() {
                let outcome = controller.session_mut().piece_drop().unwrap();
                if !outcome.is_moved() {
                    kinds.push(controller.session().falling_piece().kind());
                }
            }
            kinds
        }

        let config = GameConfig {
            start_mode: StartMode::Immediate,
            spawn_policy: SpawnPolicy::Random,
            seed: None,
            ..GameConfig::default()
        };
        let mut first = SessionController::new(&config);
        let seed = first.snapshot().seed;
        let expected = spawned_kinds(&mut first);

        let json = serde_json::to_value(first.snapshot()).unwrap();
        assert_eq!(json["seed"], seed.to_string());

        let replay_config = GameConfig {
            seed: Some(seed),
            ..config
        };
        let mut replay = SessionController::new(&replay_config);
        assert_eq!(replay.snapshot().seed, seed);
        assert_eq!(spawned_kinds(&mut replay), expected);
    }
}
