//! Board, piece and piece-sequencing primitives for automated Tetris play.
//!
//! - [`Board`] - fixed-size occupancy grid with line clearing and board metrics
//! - [`Piece`] - tetromino cell matrix anchored on the board, with movement and
//!   wall-kick rotation
//! - [`PieceSource`] - 7-bag piece randomizer
//! - [`RngSeed`] - seed shared by every random source in the workspace
//!
//! # Example
//!
//! ```
//! use autotris_engine::{Board, PieceSource, RngSeed};
//!
//! let mut board = Board::standard();
//! let mut source = PieceSource::with_seed(board.columns(), RngSeed::from(7));
//!
//! let mut piece = source.next_piece();
//! while piece.move_down(&board) {}
//! board.add_piece(&piece);
//!
//! assert_eq!(board.clear_lines(), 0);
//! assert!(!board.exceeded());
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;
