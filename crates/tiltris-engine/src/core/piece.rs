use serde::Serialize;

use super::{
    board::Board,
    shape::{ShapeColor, ShapeKind, ShapeMatrix},
};
use crate::RotationError;

/// The falling piece: a shape matrix anchored at a board-relative origin.
///
/// Pieces are values; movement and rotation return new `Piece` instances and the
/// caller decides whether to keep them after asking [`Board::is_colliding`].
///
/// # Coordinate System
///
/// - The origin is the top-left cell of the shape's bounding box
/// - Coordinates are signed; a piece may stick out above the board (`y < 0`)
/// - X increases rightward (columns), Y increases downward (rows)
///
/// # Example
///
/// ```
/// use tiltris_engine::{Board, Piece, ShapeKind};
///
/// let board = Board::new(10, 20);
/// let piece = Piece::spawn(ShapeKind::T, board.width());
/// assert_eq!((piece.position().x(), piece.position().y()), (4, 0));
///
/// let rotated = piece.super_rotated(&board).unwrap();
/// assert_eq!(rotated.shape().width(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Piece {
    kind: ShapeKind,
    shape: ShapeMatrix,
    position: PiecePosition,
}

impl Piece {
    /// Creates a piece of `kind` in spawn orientation at `position`.
    #[must_use]
    pub fn new(kind: ShapeKind, position: PiecePosition) -> Self {
        Self {
            kind,
            shape: kind.template(),
            position,
        }
    }

    /// Creates a piece horizontally centered on a board of `board_width` columns, at row 0.
    #[must_use]
    pub fn spawn(kind: ShapeKind, board_width: usize) -> Self {
        let shape = kind.template();
        let x = to_coord(board_width / 2) - to_coord(shape.width() / 2);
        Self {
            kind,
            shape,
            position: PiecePosition::new(x, 0),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    #[must_use]
    pub fn color(&self) -> ShapeColor {
        self.kind.color()
    }

    #[must_use]
    pub fn shape(&self) -> &ShapeMatrix {
        &self.shape
    }

    #[must_use]
    pub fn position(&self) -> PiecePosition {
        self.position
    }

    /// Returns the board coordinates of the occupied cells.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .occupied_positions()
            .map(move |(dx, dy)| (self.position.x + to_coord(dx), self.position.y + to_coord(dy)))
    }

    #[must_use]
    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            kind: self.kind,
            shape: self.shape.clone(),
            position: PiecePosition::new(self.position.x + dx, self.position.y + dy),
        }
    }

    #[must_use]
    pub fn left(&self) -> Self {
        self.shifted(-1, 0)
    }

    #[must_use]
    pub fn right(&self) -> Self {
        self.shifted(1, 0)
    }

    #[must_use]
    pub fn down(&self) -> Self {
        self.shifted(0, 1)
    }

    /// Rotates the shape clockwise around the same origin, without any collision check.
    #[must_use]
    pub fn rotated_clockwise(&self) -> Self {
        Self {
            kind: self.kind,
            shape: self.shape.rotated_clockwise(),
            position: self.position,
        }
    }

    /// Rotates clockwise, kicking the piece sideways if the rotated shape collides.
    ///
    /// The kick search shifts the origin by `+1, -2, +3, -4, ...` columns
    /// cumulatively (so it visits `x+1, x-1, x+2, x-2, ...`) and stops as soon as a
    /// shift would exceed the rotated shape's width.
    ///
    /// # Errors
    ///
    /// Returns [`RotationError`] if no kick position is free. `self` is left
    /// untouched, so the caller simply keeps the pre-rotation piece.
    pub fn super_rotated(&self, board: &Board) -> Result<Self, RotationError> {
        let mut piece = self.rotated_clockwise();
        let limit = to_coord(piece.shape.width());
        let mut offset = 1;
        while board.is_colliding(&piece) {
            piece.position.x += offset;
            offset = -(offset + offset.signum());
            if offset > limit {
                return Err(RotationError);
            }
        }
        Ok(piece)
    }
}

/// Origin of a piece on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PiecePosition {
    x: i32,
    y: i32,
}

impl PiecePosition {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }
}

fn to_coord(n: usize) -> i32 {
    i32::try_from(n).expect("board dimensions must fit in i32")
}

#[cfg(test)]
mod tests {
    use crate::core::board::Block;

    use super::*;

    #[test]
    fn test_spawn_is_centered() {
        let cases = [
            (ShapeKind::I, 3),
            (ShapeKind::O, 4),
            (ShapeKind::J, 4),
            (ShapeKind::L, 4),
            (ShapeKind::S, 4),
            (ShapeKind::T, 4),
            (ShapeKind::Z, 4),
        ];
        for (kind, x) in cases {
            let piece = Piece::spawn(kind, 10);
            assert_eq!(piece.position(), PiecePosition::new(x, 0), "{kind:?}");
        }
        assert_eq!(Piece::spawn(ShapeKind::I, 7).position().x(), 1);
    }

    #[test]
    fn test_occupied_positions_follow_origin() {
        let piece = Piece::new(ShapeKind::S, PiecePosition::new(2, -1));
        let mut cells: Vec<_> = piece.occupied_positions().collect();
        cells.sort_unstable();
        assert_eq!(cells, vec![(2, 0), (3, -1), (3, 0), (4, -1)]);
    }

    #[test]
    fn test_moves_do_not_touch_shape() {
        let piece = Piece::spawn(ShapeKind::L, 10);
        assert_eq!(piece.left().position(), PiecePosition::new(3, 0));
        assert_eq!(piece.right().position(), PiecePosition::new(5, 0));
        assert_eq!(piece.down().position(), PiecePosition::new(4, 1));
        assert_eq!(piece.down().shape(), piece.shape());
    }

    #[test]
    fn test_rotation_without_collision_keeps_origin() {
        let board = Board::new(10, 20);
        for kind in ShapeKind::ALL {
            let mut piece = Piece::new(kind, PiecePosition::new(4, 8));
            for _ in 0..4 {
                piece = piece.super_rotated(&board).unwrap();
                assert_eq!(piece.position(), PiecePosition::new(4, 8));
            }
            assert_eq!(piece, Piece::new(kind, PiecePosition::new(4, 8)));
        }
    }

    #[test]
    fn test_rotation_right_after_spawn() {
        let board = Board::new(10, 20);
        let piece = Piece::spawn(ShapeKind::I, 10);
        let rotated = piece.super_rotated(&board).unwrap();
        assert_eq!(rotated.position(), piece.position());
        assert_eq!((rotated.shape().width(), rotated.shape().height()), (1, 4));
    }

    #[test]
    fn test_rotation_kicks_off_right_wall() {
        let board = Board::new(10, 20);
        let piece = Piece::spawn(ShapeKind::I, 10)
            .rotated_clockwise()
            .shifted(4, 5);
        assert_eq!(piece.position().x(), 7);
        assert!(board.is_colliding(&piece.rotated_clockwise()));

        // x+1 still collides, x-1 is the first free position.
        let rotated = piece.super_rotated(&board).unwrap();
        assert_eq!(rotated.position(), PiecePosition::new(6, 5));
        assert!(!board.is_colliding(&rotated));
    }

    #[test]
    fn test_rotation_kick_search_is_bounded() {
        let board = Board::new(10, 20);
        // Only x+1, x-1 and x+2 are tried for a 4-wide shape.
        let piece = Piece::spawn(ShapeKind::I, 10)
            .rotated_clockwise()
            .shifted(5, 5);
        assert_eq!(piece.position().x(), 8);
        assert_eq!(piece.super_rotated(&board), Err(RotationError));
    }

    #[test]
    fn test_rotation_rejected_when_no_kick_fits() {
        let mut board = Board::new(10, 20);
        for y in 10..14 {
            for x in 0..10 {
                if x != 5 {
                    board.fill_block_at(x, y, Block::Piece(ShapeKind::Z));
                }
            }
        }
        // Vertical I in a one-column shaft.
        let piece = Piece::spawn(ShapeKind::I, 10)
            .rotated_clockwise()
            .shifted(2, 10);
        assert_eq!(piece.position().x(), 5);
        assert!(!board.is_colliding(&piece));
        assert!(piece.super_rotated(&board).is_err());
    }
}
