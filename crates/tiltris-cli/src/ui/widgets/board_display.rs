use std::iter;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};
use tiltris_engine::{Block, Board, Piece};

use crate::ui::widgets::BlockDisplay;

#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    falling_piece: Option<&'a Piece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            falling_piece: None,
            block: None,
        }
    }

    pub fn falling_piece(self, piece: &'a Piece) -> Self {
        Self {
            falling_piece: Some(piece),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        cells_u16(self.board.width()) * BlockDisplay::width()
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        cells_u16(self.board.height()) * BlockDisplay::height()
            + super::block_vertical_margin(self.block.as_ref())
    }

    /// Board cells with the falling piece drawn over them. Cells above the top are skipped.
    fn overlaid_rows(&self) -> Vec<Vec<Block>> {
        let mut rows: Vec<Vec<Block>> = self
            .board
            .rows()
            .map(|row| row.cells().to_vec())
            .collect();
        if let Some(piece) = self.falling_piece {
            for (x, y) in piece.occupied_positions() {
                if let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y))
                    && let Some(cell) = rows.get_mut(y).and_then(|row| row.get_mut(x))
                {
                    *cell = Block::Piece(piece.kind());
                }
            }
        }
        rows
    }
}

fn cells_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let col_constraints =
            (0..self.board.width()).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints =
            (0..self.board.height()).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let rows = self.overlaid_rows();
        for (row_area, row) in iter::zip(vertical.split(area).iter(), &rows) {
            for (cell_area, block) in iter::zip(horizontal.split(*row_area).iter(), row) {
                BlockDisplay::from_block(*block, true).render(*cell_area, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tiltris_engine::{PiecePosition, ShapeKind};

    use super::*;

    #[test]
    fn test_overlay_skips_cells_above_top() {
        let board = Board::new(4, 4);
        let piece = Piece::new(ShapeKind::O, PiecePosition::new(1, -1));
        let display = BoardDisplay::new(&board).falling_piece(&piece);
        let rows = display.overlaid_rows();
        assert_eq!(rows[0][1], Block::Piece(ShapeKind::O));
        assert_eq!(rows[0][2], Block::Piece(ShapeKind::O));
        assert_eq!(rows[1][1], Block::Empty);
        assert_eq!(display.width(), 8);
        assert_eq!(display.height(), 4);
    }
}
