use serde::{Deserialize, Serialize, Serializer};

use super::board::Block;

/// Kind of a catalogue shape.
///
/// The discriminant is the cell identifier written into the board when a piece
/// of this kind is merged, so color lookup works the same for settled blocks and
/// for the falling piece. Identifier `0` is reserved for empty cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum ShapeKind {
    /// I-piece.
    I = 1,
    /// J-piece.
    J = 2,
    /// L-piece.
    L = 3,
    /// O-piece.
    O = 4,
    /// S-piece.
    S = 5,
    /// T-piece.
    T = 6,
    /// Z-piece.
    Z = 7,
}

impl ShapeKind {
    /// Number of shape kinds (7).
    pub const LEN: usize = 7;

    /// All kinds in identifier order.
    pub const ALL: [Self; Self::LEN] = [
        ShapeKind::I,
        ShapeKind::J,
        ShapeKind::L,
        ShapeKind::O,
        ShapeKind::S,
        ShapeKind::T,
        ShapeKind::Z,
    ];

    /// Returns the cell identifier of this kind (`1..=7`).
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Looks up a kind by its cell identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use tiltris_engine::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::from_id(1), Some(ShapeKind::I));
    /// assert_eq!(ShapeKind::from_id(0), None);
    /// assert_eq!(ShapeKind::from_id(8), None);
    /// ```
    #[must_use]
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(ShapeKind::I),
            2 => Some(ShapeKind::J),
            3 => Some(ShapeKind::L),
            4 => Some(ShapeKind::O),
            5 => Some(ShapeKind::S),
            6 => Some(ShapeKind::T),
            7 => Some(ShapeKind::Z),
            _ => None,
        }
    }

    #[must_use]
    pub const fn color(self) -> ShapeColor {
        match self {
            ShapeKind::I => ShapeColor::Cyan,
            ShapeKind::J => ShapeColor::Blue,
            ShapeKind::L => ShapeColor::Orange,
            ShapeKind::O => ShapeColor::Yellow,
            ShapeKind::S => ShapeColor::Green,
            ShapeKind::T => ShapeColor::Purple,
            ShapeKind::Z => ShapeColor::Red,
        }
    }

    /// Returns the spawn-orientation template of this kind.
    #[must_use]
    pub fn template(self) -> ShapeMatrix {
        ShapeMatrix::from_rows(TEMPLATES[usize::from(self.id() - 1)])
    }
}

/// Display color attached to a shape kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum ShapeColor {
    #[display("cyan")]
    Cyan,
    #[display("blue")]
    Blue,
    #[display("orange")]
    Orange,
    #[display("yellow")]
    Yellow,
    #[display("green")]
    Green,
    #[display("purple")]
    Purple,
    #[display("red")]
    Red,
}

const TEMPLATES: [&[&[u8]]; ShapeKind::LEN] = [
    &[&[1, 1, 1, 1]],
    &[&[2, 0, 0], &[2, 2, 2]],
    &[&[0, 0, 3], &[3, 3, 3]],
    &[&[4, 4], &[4, 4]],
    &[&[0, 5, 5], &[5, 5, 0]],
    &[&[0, 6, 0], &[6, 6, 6]],
    &[&[7, 7, 0], &[0, 7, 7]],
];

/// Rectangular matrix of blocks describing a (possibly rotated) shape.
///
/// Unlike board rows, the dimensions of a matrix swap on every rotation, so the
/// cells are kept in a flat row-major vector together with the current width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeMatrix {
    width: usize,
    height: usize,
    cells: Vec<Block>,
}

impl ShapeMatrix {
    /// Builds a matrix from rows of cell identifiers.
    ///
    /// # Panics
    ///
    /// Panics if the rows are ragged or contain an identifier outside `0..=7`.
    #[must_use]
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        let width = rows.first().map_or(0, |row| row.len());
        let mut cells = Vec::with_capacity(width * rows.len());
        for row in rows {
            assert_eq!(row.len(), width, "shape rows must have equal length");
            cells.extend(row.iter().map(|&value| {
                Block::from_value(value)
                    .unwrap_or_else(|| panic!("invalid shape cell value: {value}"))
            }));
        }
        Self {
            width,
            height: rows.len(),
            cells,
        }
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Block {
        self.cells[y * self.width + x]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Block]> + '_ {
        self.cells.chunks(self.width.max(1))
    }

    /// Returns the local `(x, y)` offsets of non-empty cells.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows().enumerate().flat_map(|(dy, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, cell)| !cell.is_empty())
                .map(move |(dx, _)| (dx, dy))
        })
    }

    /// Returns the matrix rotated 90° clockwise.
    ///
    /// For an `N`-row source, the cell at `[y][x]` moves to `[x][N - 1 - y]`
    /// of the result, whose width and height are swapped.
    ///
    /// # Example
    ///
    /// ```
    /// use tiltris_engine::{ShapeKind, ShapeMatrix};
    ///
    /// let t = ShapeKind::T.template();
    /// let rotated = t.rotated_clockwise();
    /// assert_eq!(rotated, ShapeMatrix::from_rows(&[&[6, 0], &[6, 6], &[6, 0]]));
    /// ```
    #[must_use]
    pub fn rotated_clockwise(&self) -> Self {
        let n = self.height;
        let mut cells = vec![Block::Empty; self.cells.len()];
        for y in 0..self.height {
            for x in 0..self.width {
                cells[x * n + (n - 1 - y)] = self.get(x, y);
            }
        }
        Self {
            width: n,
            height: self.width,
            cells,
        }
    }

    /// Returns the matrix as rows of cell identifiers.
    #[must_use]
    pub fn to_values(&self) -> Vec<Vec<u8>> {
        self.rows()
            .map(|row| row.iter().map(|block| block.value()).collect())
            .collect()
    }
}

impl Serialize for ShapeMatrix {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_values().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(matrix: &ShapeMatrix) -> Vec<u8> {
        let mut values: Vec<u8> = matrix.to_values().into_iter().flatten().collect();
        values.sort_unstable();
        values
    }

    #[test]
    fn test_id_roundtrip() {
        for kind in ShapeKind::ALL {
            assert_eq!(ShapeKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(ShapeKind::from_id(0), None);
    }

    #[test]
    fn test_templates_use_own_identifier() {
        for kind in ShapeKind::ALL {
            let template = kind.template();
            for (x, y) in template.occupied_positions() {
                assert_eq!(template.get(x, y), Block::Piece(kind));
            }
            assert_eq!(template.occupied_positions().count(), 4, "{kind:?}");
        }
    }

    #[test]
    fn test_rotate_swaps_dimensions() {
        let i = ShapeKind::I.template();
        assert_eq!((i.width(), i.height()), (4, 1));
        let rotated = i.rotated_clockwise();
        assert_eq!((rotated.width(), rotated.height()), (1, 4));
    }

    #[test]
    fn test_rotate_clockwise_j() {
        let j = ShapeKind::J.template();
        let rotated = j.rotated_clockwise();
        assert_eq!(rotated, ShapeMatrix::from_rows(&[&[2, 2], &[2, 0], &[2, 0]]));
    }

    #[test]
    fn test_four_rotations_restore_template() {
        for kind in ShapeKind::ALL {
            let template = kind.template();
            let mut matrix = template.clone();
            for _ in 0..4 {
                let next = matrix.rotated_clockwise();
                assert_eq!(values(&next), values(&template));
                matrix = next;
            }
            assert_eq!(matrix, template, "{kind:?}");
        }
    }

    #[test]
    fn test_colors_are_distinct() {
        for (i, a) in ShapeKind::ALL.iter().enumerate() {
            for b in &ShapeKind::ALL[i + 1..] {
                assert_ne!(a.color(), b.color());
            }
        }
        assert_eq!(ShapeKind::T.color().to_string(), "purple");
    }

    #[test]
    #[should_panic(expected = "invalid shape cell value")]
    fn test_from_rows_rejects_unknown_identifier() {
        let _ = ShapeMatrix::from_rows(&[&[9]]);
    }
}
