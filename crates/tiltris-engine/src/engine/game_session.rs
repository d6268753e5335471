use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use crate::{
    ActionError, PieceCollisionError,
    core::{board::Board, piece::Piece},
};

use super::{GameConfig, GameStats, Spawner};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display, derive_more::IsVariant)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Created but not started yet.
    #[display("idle")]
    Idle,
    #[display("playing")]
    Playing,
    /// A freshly spawned piece collided. Nothing changes until reset.
    #[display("game over")]
    GameOver,
}

/// Result of a single [`GameSession::piece_drop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum DropOutcome {
    /// The piece moved down one row.
    Moved,
    /// The piece locked and the next one spawned.
    Locked { cleared_lines: usize },
    /// The piece locked and the next one collided at its spawn position.
    ToppedOut { cleared_lines: usize },
}

/// A single game: board, falling piece, spawner, score and drop timer.
///
/// All mutation goes through `&mut self`, so a session is driven from exactly
/// one place. Player actions return [`ActionError::NotPlaying`] outside of play
/// and leave the session untouched when refused.
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    falling_piece: Piece,
    spawner: Spawner,
    stats: GameStats,
    state: SessionState,
    drop_counter: Duration,
    drop_interval: Duration,
    last_time: Option<Duration>,
}

impl GameSession {
    /// Creates an idle session.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        let board = Board::new(config.board_width, config.board_height);
        let mut spawner = Spawner::new(config.spawn_policy, config.seed);
        let falling_piece = spawner.spawn(board.width());
        Self {
            board,
            falling_piece,
            spawner,
            stats: GameStats::new(),
            state: SessionState::Idle,
            drop_counter: Duration::ZERO,
            drop_interval: config.drop_interval(),
            last_time: None,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable access to the settled blocks, for setting up positions.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[must_use]
    pub fn falling_piece(&self) -> &Piece {
        &self.falling_piece
    }

    #[must_use]
    pub fn spawner(&self) -> &Spawner {
        &self.spawner
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn drop_counter(&self) -> Duration {
        self.drop_counter
    }

    #[must_use]
    pub fn drop_interval(&self) -> Duration {
        self.drop_interval
    }

    /// Clears everything and begins play.
    pub fn start(&mut self) {
        self.reinitialize();
        info!(
            state = %self.state,
            policy = %self.spawner.policy(),
            seed = %self.spawner.seed(),
            "session started"
        );
    }

    /// Same as [`Self::start`]; also leaves the game-over state.
    pub fn reset(&mut self) {
        self.reinitialize();
        info!(
            state = %self.state,
            policy = %self.spawner.policy(),
            seed = %self.spawner.seed(),
            "session reset"
        );
    }

    fn reinitialize(&mut self) {
        self.board = Board::new(self.board.width(), self.board.height());
        self.stats = GameStats::new();
        self.spawner.reset();
        self.falling_piece = self.spawner.spawn(self.board.width());
        self.drop_counter = Duration::ZERO;
        self.last_time = None;
        self.state = if self.board.is_colliding(&self.falling_piece) {
            SessionState::GameOver
        } else {
            SessionState::Playing
        };
    }

    fn ensure_playing(&self) -> Result<(), ActionError> {
        if self.state.is_playing() {
            Ok(())
        } else {
            Err(ActionError::NotPlaying)
        }
    }

    /// Replaces the falling piece if it fits on the board.
    pub fn set_falling_piece(&mut self, piece: Piece) -> Result<(), PieceCollisionError> {
        if self.board.is_colliding(&piece) {
            return Err(PieceCollisionError);
        }
        self.falling_piece = piece;
        Ok(())
    }

    pub fn try_move_left(&mut self) -> Result<(), ActionError> {
        self.ensure_playing()?;
        let piece = self.falling_piece.left();
        self.set_falling_piece(piece)?;
        Ok(())
    }

    pub fn try_move_right(&mut self) -> Result<(), ActionError> {
        self.ensure_playing()?;
        let piece = self.falling_piece.right();
        self.set_falling_piece(piece)?;
        Ok(())
    }

    pub fn try_rotate(&mut self) -> Result<(), ActionError> {
        self.ensure_playing()?;
        self.falling_piece = self.falling_piece.super_rotated(&self.board)?;
        Ok(())
    }

    /// Moves the piece down one row, locking it when it cannot move.
    ///
    /// Locking merges the piece, clears full lines, updates the score and spawns
    /// the next piece; if that piece collides the session is over. The drop timer
    /// restarts in every case.
    pub fn piece_drop(&mut self) -> Result<DropOutcome, ActionError> {
        self.ensure_playing()?;
        self.drop_counter = Duration::ZERO;

        let piece = self.falling_piece.down();
        if !self.board.is_colliding(&piece) {
            self.falling_piece = piece;
            return Ok(DropOutcome::Moved);
        }

        self.board.merge(&self.falling_piece);
        let cleared_lines = self.board.clear_lines();
        self.stats.complete_piece_drop(cleared_lines);
        self.falling_piece = self.spawner.spawn(self.board.width());

        if self.board.is_colliding(&self.falling_piece) {
            self.state = SessionState::GameOver;
            info!(
                score = self.stats.score(),
                cleared_lines = self.stats.cleared_lines(),
                "game over"
            );
            return Ok(DropOutcome::ToppedOut { cleared_lines });
        }
        Ok(DropOutcome::Locked { cleared_lines })
    }

    /// Advances the drop timer to `now` and drops the piece once the interval is exceeded.
    ///
    /// `now` is any monotonic clock reading; the first call after (re)start only
    /// records it. Returns the outcome of the timed drop, if one happened.
    pub fn update(&mut self, now: Duration) -> Option<DropOutcome> {
        if !self.state.is_playing() {
            return None;
        }
        let delta = self
            .last_time
            .map_or(Duration::ZERO, |last| now.saturating_sub(last));
        self.last_time = Some(now);
        self.drop_counter += delta;
        if self.drop_counter <= self.drop_interval {
            return None;
        }
        match self.piece_drop() {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                debug!(%err, "timed drop refused");
                None
            }
        }
    }
}
