/// Points awarded per cleared line.
pub const SCORE_PER_LINE: usize = 10;

/// Score and counters of a session.
///
/// The score grows by a flat [`SCORE_PER_LINE`] for each cleared line, applied
/// once per locked piece no matter how many lines it cleared.
///
/// # Example
///
/// ```
/// use tiltris_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(2);
///
/// assert_eq!(stats.score(), 20);
/// assert_eq!(stats.cleared_lines(), 2);
/// assert_eq!(stats.completed_pieces(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStats {
    score: usize,
    cleared_lines: usize,
    completed_pieces: usize,
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            cleared_lines: 0,
            completed_pieces: 0,
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub const fn cleared_lines(&self) -> usize {
        self.cleared_lines
    }

    /// Number of pieces locked into the board.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    /// Records a locked piece and the lines it cleared.
    pub const fn complete_piece_drop(&mut self, cleared_lines: usize) {
        self.completed_pieces += 1;
        self.cleared_lines += cleared_lines;
        self.score += SCORE_PER_LINE * cleared_lines;
    }
}
