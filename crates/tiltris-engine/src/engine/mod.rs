//! Game loop and session state.
//!
//! - [`GameSession`] - Owns the board, the falling piece, the spawner and the drop timer
//! - [`Spawner`] - Produces the next piece according to a [`SpawnPolicy`]
//! - [`GameStats`] - Score and counters
//! - [`GameConfig`] - Tunables shared by the session and the controller
//!
//! # Game Flow
//!
//! 1. Create a [`GameSession`] from a [`GameConfig`] (it starts out idle)
//! 2. Call [`GameSession::start`] to begin play
//! 3. Feed the frame clock to [`GameSession::update`]; it drops the piece once per interval
//! 4. Apply player actions (`try_move_left`, `try_rotate`, `piece_drop`, ...)
//! 5. When a freshly spawned piece collides, the session is over until [`GameSession::reset`]
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use tiltris_engine::{GameConfig, GameSession};
//!
//! let mut session = GameSession::new(&GameConfig::default());
//! session.start();
//!
//! session.try_move_left().ok();
//! session.try_rotate().ok();
//!
//! session.update(Duration::ZERO);
//! session.update(Duration::from_millis(1200));
//! assert_eq!(session.falling_piece().position().y(), 1);
//! ```

pub use self::{config::*, game_session::*, game_stats::*, spawner::*};

mod config;
mod game_session;
mod game_stats;
mod spawner;
