pub use self::{control::*, core::*, engine::*};

pub mod control;
pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece colliding at the requested position")]
pub struct PieceCollisionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("no free position found for the rotated piece")]
pub struct RotationError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::IsVariant,
)]
pub enum ActionError {
    #[display("session is not in play")]
    NotPlaying,
    #[display("{_0}")]
    Collision(PieceCollisionError),
    #[display("{_0}")]
    Rotation(RotationError),
}

impl From<PieceCollisionError> for ActionError {
    fn from(err: PieceCollisionError) -> Self {
        Self::Collision(err)
    }
}

impl From<RotationError> for ActionError {
    fn from(err: RotationError) -> Self {
        Self::Rotation(err)
    }
}
