//! Self-play: one board, one piece source and a lookahead queue driven by a
//! [`SearchEngine`].

use autotris_engine::{Board, Piece, PieceSource};
use serde::Serialize;

use crate::SearchEngine;

/// Result of a single [`Session::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// A piece was placed and `cleared_lines` rows were cleared.
    Placed { cleared_lines: usize },
    /// No valid placement exists for the queue; the board is unchanged.
    NoMove,
}

/// Counters collected over a played game.
///
/// # Example
///
/// ```
/// use autotris_evaluator::SessionStats;
///
/// let mut stats = SessionStats::new();
/// stats.record_placement(4);
/// stats.record_placement(0);
///
/// assert_eq!(stats.moves(), 2);
/// assert_eq!(stats.cleared_lines(), 4);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SessionStats {
    moves: usize,
    cleared_lines: usize,
    line_cleared_counter: [usize; 5],
    topped_out: bool,
}

impl SessionStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            moves: 0,
            cleared_lines: 0,
            line_cleared_counter: [0; 5],
            topped_out: false,
        }
    }

    /// Number of pieces placed.
    #[must_use]
    pub const fn moves(&self) -> usize {
        self.moves
    }

    /// Total rows cleared; this is the score of the game.
    #[must_use]
    pub const fn cleared_lines(&self) -> usize {
        self.cleared_lines
    }

    /// Placements by number of rows they cleared (index 0 to 4).
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Whether the game ended because the stack reached the spawn rows or no
    /// placement was left.
    #[must_use]
    pub const fn topped_out(&self) -> bool {
        self.topped_out
    }

    pub fn record_placement(&mut self, cleared_lines: usize) {
        self.moves += 1;
        self.cleared_lines += cleared_lines;
        // a single piece clears at most four rows
        self.line_cleared_counter[cleared_lines.min(4)] += 1;
    }
}

/// A self-playing game.
///
/// # Example
///
/// ```
/// use autotris_engine::{Board, PieceSource, RngSeed};
/// use autotris_evaluator::{HeuristicWeights, SearchEngine, Session};
///
/// let board = Board::standard();
/// let source = PieceSource::with_seed(board.columns(), RngSeed::from(3));
/// let mut session = Session::new(board, source, 2);
/// let engine = SearchEngine::new(HeuristicWeights::default());
///
/// let stats = session.play(&engine, 50);
/// assert_eq!(stats.moves(), 50);
/// assert!(!stats.topped_out());
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    board: Board,
    source: PieceSource,
    queue: Vec<Piece>,
    stats: SessionStats,
}

impl Session {
    /// Starts a game on `board`, filling a queue of `lookahead` pieces.
    ///
    /// # Panics
    ///
    /// Panics if `lookahead` is zero.
    #[must_use]
    pub fn new(board: Board, mut source: PieceSource, lookahead: usize) -> Self {
        assert!(lookahead >= 1, "lookahead must be at least 1");
        let queue = (0..lookahead).map(|_| source.next_piece()).collect();
        Self {
            board,
            source,
            queue,
            stats: SessionStats::new(),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Upcoming pieces; the first one is placed next.
    #[must_use]
    pub fn queue(&self) -> &[Piece] {
        &self.queue
    }

    #[must_use]
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.stats.topped_out || self.board.exceeded()
    }

    /// Places the next piece where `engine` chooses, clears full rows and
    /// advances the queue.
    pub fn step(&mut self, engine: &SearchEngine) -> StepOutcome {
        let Some(mut piece) = engine.best(&self.board, &self.queue) else {
            return StepOutcome::NoMove;
        };
        while piece.move_down(&self.board) {}
        self.board.add_piece(&piece);
        let cleared_lines = self.board.clear_lines();
        self.stats.record_placement(cleared_lines);

        self.queue.rotate_left(1);
        if let Some(last) = self.queue.last_mut() {
            *last = self.source.next_piece();
        }
        StepOutcome::Placed { cleared_lines }
    }

    /// Plays until `max_moves` pieces are placed in total or the game is over.
    pub fn play(&mut self, engine: &SearchEngine, max_moves: usize) -> SessionStats {
        while self.stats.moves < max_moves && !self.is_over() {
            if self.step(engine) == StepOutcome::NoMove {
                self.stats.topped_out = true;
            }
        }
        self.stats.topped_out |= self.board.exceeded();
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use autotris_engine::{Block, PieceKind, RngSeed};

    use super::*;
    use crate::HeuristicWeights;

    fn session(seed: u64, lookahead: usize) -> Session {
        let board = Board::standard();
        let source = PieceSource::with_seed(board.columns(), RngSeed::from(seed));
        Session::new(board, source, lookahead)
    }

    #[test]
    fn test_queue_follows_source() {
        let mut expected = PieceSource::with_seed(10, RngSeed::from(11));
        let mut session = session(11, 3);
        let kinds = |session: &Session| session.queue().iter().map(Piece::kind).collect::<Vec<_>>();

        let mut upcoming: Vec<_> = (0..3).map(|_| expected.next_kind()).collect();
        assert_eq!(kinds(&session), upcoming);

        let engine = SearchEngine::new(HeuristicWeights::default());
        for _ in 0..10 {
            assert!(matches!(session.step(&engine), StepOutcome::Placed { .. }));
            upcoming.remove(0);
            upcoming.push(expected.next_kind());
            assert_eq!(kinds(&session), upcoming);
        }
    }

    #[test]
    fn test_step_places_four_cells() {
        let mut session = session(5, 1);
        let engine = SearchEngine::new(HeuristicWeights::default());
        let outcome = session.step(&engine);
        assert_eq!(outcome, StepOutcome::Placed { cleared_lines: 0 });
        let occupied = (0..session.board().rows())
            .flat_map(|row| session.board().row(row).iter())
            .filter(|block| block.is_occupied())
            .count();
        assert_eq!(occupied, 4);
        assert_eq!(session.stats().moves(), 1);
    }

    #[test]
    fn test_default_weights_clear_lines() {
        let mut session = session(2024, 2);
        let engine = SearchEngine::new(HeuristicWeights::default());
        let stats = session.play(&engine, 200);
        assert_eq!(stats.moves(), 200);
        assert!(!stats.topped_out());
        assert!(stats.cleared_lines() > 0);
        let counted: usize = stats
            .line_cleared_counter()
            .iter()
            .enumerate()
            .map(|(lines, count)| lines * count)
            .sum();
        assert_eq!(counted, stats.cleared_lines());
        assert_eq!(stats.line_cleared_counter().iter().sum::<usize>(), 200);
    }

    #[test]
    fn test_same_seed_same_game() {
        let engine = SearchEngine::new(HeuristicWeights::default());
        let a = session(77, 2).play(&engine, 60);
        let b = session(77, 2).play(&engine, 60);
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_weights_top_out() {
        // without weights every piece lands against the left wall
        let mut session = session(8, 1);
        let engine = SearchEngine::new(HeuristicWeights::ZERO);
        let stats = session.play(&engine, 1000);
        assert!(stats.topped_out());
        assert!(stats.moves() < 1000);
        assert!(session.is_over());

        let moves = stats.moves();
        assert_eq!(session.play(&engine, 1000).moves(), moves);
    }

    #[test]
    fn test_no_move_on_blocked_board() {
        let mut board = Board::new(4, 4);
        for row in 0..4 {
            for column in 0..4 {
                board.set_cell(row, column, Block::Piece(PieceKind::I));
            }
        }
        let source = PieceSource::with_seed(4, RngSeed::from(1));
        let mut session = Session::new(board.clone(), source, 1);
        let engine = SearchEngine::new(HeuristicWeights::default());
        assert_eq!(session.step(&engine), StepOutcome::NoMove);
        assert_eq!(session.board(), &board);
        assert_eq!(session.stats().moves(), 0);
    }

    #[test]
    #[should_panic(expected = "lookahead must be at least 1")]
    fn test_zero_lookahead_panics() {
        let _ = session(0, 0);
    }
}
