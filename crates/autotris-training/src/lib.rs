//! Genetic tuning of the search heuristic.
//!
//! A [`Tuner`] evolves a population of unit-length [`HeuristicWeights`]
//! vectors. A candidate's fitness is the number of lines it clears in a few
//! fixed-length self-play games (see [`autotris_evaluator::Session`]).
//!
//! - [`weights`] - vector operations: normalization, random directions,
//!   crossover and mutation
//! - [`genetic`] - candidates, sorting, tournament selection and replacement
//! - [`tuner`] - configuration, the generational loop and its reports
//!
//! The loop never ends on its own. Every generation is handed to a
//! [`GenerationReporter`], which stops the run by returning
//! [`ControlFlow::Break`](std::ops::ControlFlow::Break).
//!
//! [`HeuristicWeights`]: autotris_evaluator::HeuristicWeights

pub use self::{genetic::Candidate, tuner::*};

pub mod genetic;
pub mod tuner;
pub mod weights;
