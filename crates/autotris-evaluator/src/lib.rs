//! Placement search and self-play for automated Tetris.
//!
//! - [`heuristic`] - the linear board score and its [`HeuristicWeights`]
//! - [`search`] - [`SearchEngine`], an exhaustive lookahead search over a
//!   queue of upcoming pieces
//! - [`session`] - [`Session`], a game driven by a search engine, used both for
//!   headless play and for measuring fitness during weight tuning
//!
//! # Example
//!
//! ```
//! use autotris_engine::{Board, PieceSource, RngSeed};
//! use autotris_evaluator::{HeuristicWeights, SearchEngine, Session, StepOutcome};
//!
//! let board = Board::standard();
//! let source = PieceSource::with_seed(board.columns(), RngSeed::from(42));
//! let mut session = Session::new(board, source, 2);
//! let engine = SearchEngine::new(HeuristicWeights::default());
//!
//! assert!(matches!(session.step(&engine), StepOutcome::Placed { .. }));
//! ```

pub use self::{heuristic::*, search::*, session::*};

pub mod heuristic;
pub mod search;
pub mod session;
