use serde::{Serialize, Serializer};

use super::{piece::Piece, shape::ShapeKind};

/// A single cell of the board or of a shape matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Block {
    /// Empty cell.
    #[default]
    Empty,
    /// Cell occupied by a block of the given shape.
    Piece(ShapeKind),
}

impl Block {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Block::Empty
    }

    /// Returns the integer cell value: `0` when empty, otherwise the shape identifier.
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Block::Empty => 0,
            Block::Piece(kind) => kind.id(),
        }
    }

    /// Parses an integer cell value.
    #[must_use]
    pub const fn from_value(value: u8) -> Option<Self> {
        if value == 0 {
            return Some(Block::Empty);
        }
        match ShapeKind::from_id(value) {
            Some(kind) => Some(Block::Piece(kind)),
            None => None,
        }
    }
}

impl Serialize for Block {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.value())
    }
}

/// A single board row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BoardRow {
    cells: Vec<Block>,
}

impl BoardRow {
    fn empty(width: usize) -> Self {
        Self {
            cells: vec![Block::Empty; width],
        }
    }

    #[must_use]
    pub fn cells(&self) -> &[Block] {
        &self.cells
    }

    /// Returns `true` when every cell of the row is occupied.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.cells.iter().all(|b| !b.is_empty())
    }
}

/// Settled blocks of a session.
///
/// The board has fixed dimensions chosen at creation. Row `0` is the top of the
/// well and rows grow downward; columns grow rightward.
///
/// # Collision model
///
/// [`Board::is_colliding`] is the only placement check in the engine. A piece
/// collides when one of its cells is outside `0..width` horizontally, at or below
/// the floor (`row >= height`), or on an occupied cell. Cells above the top
/// (`row < 0`) never collide, which lets tall pieces rotate right after spawning.
///
/// # Example
///
/// ```
/// use tiltris_engine::{Board, Piece, ShapeKind};
///
/// let mut board = Board::new(10, 20);
/// let piece = Piece::spawn(ShapeKind::O, board.width());
/// assert!(!board.is_colliding(&piece));
///
/// board.merge(&piece);
/// assert!(board.is_colliding(&piece));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    width: usize,
    height: usize,
    rows: Vec<BoardRow>,
}

impl Board {
    /// Creates an empty board.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rows: vec![BoardRow::empty(width); height],
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the block at `(x, y)`, or `None` outside the board.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<Block> {
        self.rows.get(y)?.cells.get(x).copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = &BoardRow> + '_ {
        self.rows.iter()
    }

    /// Returns `true` when no cell is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows
            .iter()
            .all(|row| row.cells.iter().all(|b| b.is_empty()))
    }

    /// Overwrites a single cell.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the board.
    pub fn fill_block_at(&mut self, x: usize, y: usize, block: Block) {
        self.rows[y].cells[x] = block;
    }

    /// Returns `true` if the piece overlaps the walls, the floor or settled blocks.
    #[must_use]
    pub fn is_colliding(&self, piece: &Piece) -> bool {
        piece.occupied_positions().any(|(x, y)| {
            let Ok(x) = usize::try_from(x) else {
                return true;
            };
            if x >= self.width {
                return true;
            }
            let Ok(y) = usize::try_from(y) else {
                return false;
            };
            y >= self.height || !self.rows[y].cells[x].is_empty()
        })
    }

    /// Writes the piece's cells into the board.
    ///
    /// This does not check for collisions; callers must ensure the piece is at a
    /// valid position.
    ///
    /// # Panics
    ///
    /// Panics if a cell of the piece lies outside the board.
    pub fn merge(&mut self, piece: &Piece) {
        let block = Block::Piece(piece.kind());
        for (x, y) in piece.occupied_positions() {
            let cell = usize::try_from(y)
                .ok()
                .zip(usize::try_from(x).ok())
                .and_then(|(y, x)| self.rows.get_mut(y)?.cells.get_mut(x))
                .unwrap_or_else(|| panic!("merge target ({x}, {y}) is outside the board"));
            *cell = block;
        }
    }

    /// Removes filled rows and returns how many were removed.
    ///
    /// Rows are scanned from the bottom up. A filled row is removed and an empty
    /// row is inserted at the top; the same index is then examined again since the
    /// rows above have shifted into it.
    pub fn clear_lines(&mut self) -> usize {
        let mut count = 0;
        let mut y = self.height;
        while y > 0 {
            if self.rows[y - 1].is_filled() {
                self.rows.remove(y - 1);
                self.rows.insert(0, BoardRow::empty(self.width));
                count += 1;
                continue;
            }
            y -= 1;
        }
        count
    }

    /// Returns the board as rows of cell identifiers.
    #[must_use]
    pub fn to_values(&self) -> Vec<Vec<u8>> {
        self.rows
            .iter()
            .map(|row| row.cells.iter().map(|b| b.value()).collect())
            .collect()
    }
}
