use std::{fmt, str::FromStr};

use rand::{Rng, SeedableRng as _, distr::StandardUniform, prelude::Distribution};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::{piece::Piece, shape::ShapeKind};

/// Fixed spawn order used by [`SpawnPolicy::Sequence`].
pub const PIECE_SEQUENCE: [ShapeKind; ShapeKind::LEN] = [
    ShapeKind::I,
    ShapeKind::O,
    ShapeKind::J,
    ShapeKind::L,
    ShapeKind::S,
    ShapeKind::Z,
    ShapeKind::T,
];

/// How the next piece kind is chosen.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum SpawnPolicy {
    /// Cycle through [`PIECE_SEQUENCE`], restarting on reset.
    #[default]
    #[display("sequence")]
    Sequence,
    /// Independent uniform draws over all kinds.
    #[display("random")]
    Random,
}

/// Seed for reproducible random spawning.
///
/// A 128-bit seed written as a 32-digit hex string in configuration files and
/// on the command line.
///
/// # Example
///
/// ```
/// use rand::Rng as _;
/// use tiltris_engine::PieceSeed;
///
/// let seed: PieceSeed = rand::rng().random();
/// let parsed: PieceSeed = seed.to_string().parse().unwrap();
/// assert_eq!(parsed, seed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceSeed([u8; 16]);

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParsePieceSeedError {
    #[display("invalid seed: expected 32 hex digits, got {len}")]
    InvalidLength { len: usize },
    #[display("invalid seed: {_0}")]
    InvalidDigit(std::num::ParseIntError),
}

impl FromStr for PieceSeed {
    type Err = ParsePieceSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParsePieceSeedError::InvalidLength { len: s.len() });
        }
        let num = u128::from_str_radix(s, 16).map_err(ParsePieceSeedError::InvalidDigit)?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `PieceSeed` values with `rng.random()`.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

/// Produces the next falling piece.
#[derive(Debug, Clone)]
pub struct Spawner {
    policy: SpawnPolicy,
    sequence_index: usize,
    seed: PieceSeed,
    rng: Pcg32,
}

impl Spawner {
    /// Creates a spawner. Without a seed one is drawn from the thread RNG.
    #[must_use]
    pub fn new(policy: SpawnPolicy, seed: Option<PieceSeed>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::rng().random());
        Self {
            policy,
            sequence_index: 0,
            seed,
            rng: Pcg32::from_seed(seed.0),
        }
    }

    #[must_use]
    pub fn policy(&self) -> SpawnPolicy {
        self.policy
    }

    /// Seed of the random policy.
    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.seed
    }

    pub fn next_kind(&mut self) -> ShapeKind {
        match self.policy {
            SpawnPolicy::Sequence => {
                let kind = PIECE_SEQUENCE[self.sequence_index];
                self.sequence_index = (self.sequence_index + 1) % PIECE_SEQUENCE.len();
                kind
            }
            SpawnPolicy::Random => ShapeKind::ALL[self.rng.random_range(0..ShapeKind::LEN)],
        }
    }

    /// Spawns the next piece centered on a board of `board_width` columns.
    pub fn spawn(&mut self, board_width: usize) -> Piece {
        Piece::spawn(self.next_kind(), board_width)
    }

    /// Restarts the fixed sequence. The random stream continues where it was.
    pub fn reset(&mut self) {
        self.sequence_index = 0;
    }
}
