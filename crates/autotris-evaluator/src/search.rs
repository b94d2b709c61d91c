//! Exhaustive lookahead search over piece placements.
//!
//! For every piece in the queue, the search tries each of the four rotation
//! counts and every column reachable by sliding right from the left wall,
//! drops the piece straight down and merges it into a copy of the board. The
//! next queued piece is searched on that merged board; the last one scores it
//! with the [`HeuristicWeights`]. The best score over all paths picks the
//! placement of the first piece.
//!
//! Lines are not cleared between depths, so a deeper piece sees the full rows
//! completed by earlier ones.

use std::iter;

use autotris_engine::{Board, Piece};

use crate::HeuristicWeights;

/// Chooses placements by exhaustive search over a piece queue.
///
/// # Example
///
/// ```
/// use autotris_engine::{Board, Piece, PieceKind};
/// use autotris_evaluator::{HeuristicWeights, SearchEngine};
///
/// let board = Board::standard();
/// let engine = SearchEngine::new(HeuristicWeights::default());
/// let queue = [
///     Piece::from_kind(PieceKind::T, board.columns()),
///     Piece::from_kind(PieceKind::I, board.columns()),
/// ];
///
/// let mut best = engine.best(&board, &queue).unwrap();
/// assert_eq!(best.kind(), PieceKind::T);
/// while best.move_down(&board) {}
/// assert!(board.valid(&best));
/// ```
#[derive(Debug, Clone)]
pub struct SearchEngine {
    weights: HeuristicWeights,
}

impl SearchEngine {
    #[must_use]
    pub fn new(weights: HeuristicWeights) -> Self {
        Self { weights }
    }

    #[must_use]
    pub fn weights(&self) -> &HeuristicWeights {
        &self.weights
    }

    #[must_use]
    pub fn evaluate_board(&self, board: &Board) -> f64 {
        self.weights.score(board)
    }

    /// Returns the best placement for `queue[0]`.
    ///
    /// The returned piece carries the chosen rotation and column but has not
    /// been dropped; the caller drops and merges it. Returns `None` when no
    /// path through the whole queue has a valid placement.
    ///
    /// # Panics
    ///
    /// Panics if `queue` is empty.
    #[must_use]
    pub fn best(&self, board: &Board, queue: &[Piece]) -> Option<Piece> {
        self.best_with_score(board, queue).map(|(piece, _score)| piece)
    }

    /// Like [`Self::best`], but also returns the score of the best path.
    #[must_use]
    pub fn best_with_score(&self, board: &Board, queue: &[Piece]) -> Option<(Piece, f64)> {
        assert!(!queue.is_empty(), "piece queue must not be empty");
        self.search(board, queue)
    }

    fn search(&self, board: &Board, queue: &[Piece]) -> Option<(Piece, f64)> {
        let (&piece, rest) = queue.split_first()?;
        let mut best: Option<(Piece, f64)> = None;

        for candidate in placements(piece, board) {
            let mut dropped = candidate;
            while dropped.move_down(board) {}
            let mut merged = board.clone();
            merged.add_piece(&dropped);

            let score = if rest.is_empty() {
                self.evaluate_board(&merged)
            } else {
                match self.search(&merged, rest) {
                    Some((_, score)) => score,
                    None => continue,
                }
            };

            // ties keep the first placement found
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((candidate, score));
            }
        }

        best
    }
}

/// Enumerates candidate placements in search order.
///
/// For rotation counts 0 to 3 the piece is rotated that many times (failed
/// rotations are skipped), slid fully left, then stepped right one column at
/// a time until the first invalid position.
fn placements(piece: Piece, board: &Board) -> impl Iterator<Item = Piece> + '_ {
    (0..4).flat_map(move |rotations| {
        let mut start = piece;
        for _ in 0..rotations {
            start.rotate(board);
        }
        while start.move_left(board) {}
        iter::successors(Some(start).filter(|p| board.valid(p)), move |p| {
            Some(p.with_position(p.row(), p.column() + 1)).filter(|p| board.valid(p))
        })
    })
}

#[cfg(test)]
mod tests {
    use autotris_engine::{Block, PieceKind};

    use super::*;

    const X: Block = Block::Piece(PieceKind::Z);

    fn spawn(kind: PieceKind, board: &Board) -> Piece {
        Piece::from_kind(kind, board.columns())
    }

    #[test]
    fn test_zero_weights_pick_first_placement() {
        let board = Board::standard();
        let engine = SearchEngine::new(HeuristicWeights::ZERO);
        let best = engine.best(&board, &[spawn(PieceKind::O, &board)]).unwrap();
        assert_eq!(best.column(), 0);
        assert_eq!(best.row(), 0);
        assert_eq!(best.rotation(), 0);
    }

    #[test]
    fn test_placement_count() {
        let board = Board::standard();
        // O: 9 columns in each of 4 rotations
        assert_eq!(placements(spawn(PieceKind::O, &board), &board).count(), 36);
        // I: 7 horizontal + 10 vertical, twice
        assert_eq!(placements(spawn(PieceKind::I, &board), &board).count(), 34);
    }

    #[test]
    fn test_fills_well_to_clear_line() {
        let mut board = Board::standard();
        for column in 0..9 {
            board.set_cell(21, column, X);
        }
        let engine = SearchEngine::new(HeuristicWeights::default());
        let (best, score) = engine
            .best_with_score(&board, &[spawn(PieceKind::I, &board)])
            .unwrap();

        assert_eq!(best.rotation(), 1);
        assert_eq!(best.row(), 0);
        assert!(best.occupied_cells().all(|(_, column)| column == 9));

        let mut dropped = best;
        while dropped.move_down(&board) {}
        let mut merged = board.clone();
        merged.add_piece(&dropped);
        assert_eq!(merged.lines(), 1);
        assert!((score - engine.evaluate_board(&merged)).abs() < 1e-12);
    }

    #[test]
    fn test_lookahead_returns_first_piece() {
        let board = Board::standard();
        let engine = SearchEngine::new(HeuristicWeights::default());
        let queue = [spawn(PieceKind::S, &board), spawn(PieceKind::Z, &board)];
        let best = engine.best(&board, &queue).unwrap();
        assert_eq!(best.kind(), PieceKind::S);
        assert!(board.valid(&best));
    }

    #[test]
    fn test_lookahead_sees_deeper_line() {
        // two-wide well, four deep: only two stacked O pieces clear all four rows
        let mut board = Board::new(6, 6);
        for row in 2..6 {
            for column in 0..4 {
                board.set_cell(row, column, X);
            }
        }
        let engine = SearchEngine::new(HeuristicWeights::from_array([0.0, 1.0, 0.0, 0.0]));
        let queue = [spawn(PieceKind::O, &board), spawn(PieceKind::O, &board)];
        let (best, score) = engine.best_with_score(&board, &queue).unwrap();
        assert_eq!(best.column(), 4);
        assert!((score - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_full_board_has_no_move() {
        let mut board = Board::standard();
        for row in 0..board.rows() {
            for column in 0..board.columns() {
                board.set_cell(row, column, X);
            }
        }
        let engine = SearchEngine::new(HeuristicWeights::default());
        for kind in PieceKind::ALL {
            assert_eq!(engine.best(&board, &[spawn(kind, &board)]), None);
        }
    }

    #[test]
    fn test_dead_end_branch_yields_no_move() {
        // the first O fills the board, leaving no room for the second
        let board = Board::new(2, 2);
        let engine = SearchEngine::new(HeuristicWeights::default());
        let first = spawn(PieceKind::O, &board);
        assert!(engine.best(&board, &[first]).is_some());
        assert_eq!(engine.best(&board, &[first, first]), None);
    }

    #[test]
    #[should_panic(expected = "piece queue must not be empty")]
    fn test_empty_queue_panics() {
        let engine = SearchEngine::new(HeuristicWeights::default());
        let _ = engine.best(&Board::standard(), &[]);
    }
}
