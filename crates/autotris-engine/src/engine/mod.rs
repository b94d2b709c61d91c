//! Random sources feeding pieces to a game loop.
//!
//! - [`PieceSource`] - 7-bag piece generation
//! - [`RngSeed`] - seed for deterministic generation

pub use self::{piece_source::*, seed::*};

mod piece_source;
mod seed;
