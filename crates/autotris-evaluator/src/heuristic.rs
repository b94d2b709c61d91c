//! Linear board heuristic.
//!
//! A board is scored as
//!
//! ```text
//! score = −height·aggregate_height + lines·lines − holes·holes − bumpiness·bumpiness
//! ```
//!
//! where every metric is read from the board right after a piece is merged and
//! before full rows are cleared. Higher is better.

use std::{fmt, num::ParseFloatError, str::FromStr};

use autotris_engine::Board;
use serde::{Deserialize, Serialize};

/// Weights of the four board metrics.
///
/// Each weight is applied with a fixed sign (see the module docs), so positive
/// weights penalize height, holes and bumpiness and reward complete lines.
///
/// Weights are written as `height,lines,holes,bumpiness`:
///
/// ```
/// use autotris_evaluator::HeuristicWeights;
///
/// let weights: HeuristicWeights = "0.5, 0.75, 0.35, 0.18".parse().unwrap();
/// assert_eq!(weights.lines, 0.75);
/// assert_eq!(weights.to_string(), "0.5,0.75,0.35,0.18");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeuristicWeights {
    pub height: f64,
    pub lines: f64,
    pub holes: f64,
    pub bumpiness: f64,
}

impl Default for HeuristicWeights {
    /// Hand-tuned weights that play well without any training.
    fn default() -> Self {
        Self {
            height: 0.510_066,
            lines: 0.760_666,
            holes: 0.356_63,
            bumpiness: 0.184_483,
        }
    }
}

impl HeuristicWeights {
    pub const LEN: usize = 4;

    pub const ZERO: Self = Self::from_array([0.0; Self::LEN]);

    #[must_use]
    pub const fn from_array([height, lines, holes, bumpiness]: [f64; Self::LEN]) -> Self {
        Self {
            height,
            lines,
            holes,
            bumpiness,
        }
    }

    #[must_use]
    pub const fn to_array(self) -> [f64; Self::LEN] {
        [self.height, self.lines, self.holes, self.bumpiness]
    }

    /// Scores a board; higher is better.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn score(&self, board: &Board) -> f64 {
        -self.height * board.aggregate_height() as f64 + self.lines * board.lines() as f64
            - self.holes * board.holes() as f64
            - self.bumpiness * board.bumpiness() as f64
    }
}

impl fmt::Display for HeuristicWeights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            height,
            lines,
            holes,
            bumpiness,
        } = self;
        write!(f, "{height},{lines},{holes},{bumpiness}")
    }
}

/// Error returned when parsing [`HeuristicWeights`] from text fails.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseWeightsError {
    #[display("expected {} comma-separated weights, got {count}", HeuristicWeights::LEN)]
    WrongCount { count: usize },
    #[display("invalid weight {value:?}: {source}")]
    InvalidNumber {
        value: String,
        source: ParseFloatError,
    },
}

impl FromStr for HeuristicWeights {
    type Err = ParseWeightsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s.split(',').map(str::trim).collect::<Vec<_>>();
        let values: [&str; Self::LEN] = parts
            .as_slice()
            .try_into()
            .map_err(|_| ParseWeightsError::WrongCount { count: parts.len() })?;
        let mut weights = [0.0; Self::LEN];
        for (weight, value) in weights.iter_mut().zip(values) {
            *weight = value
                .parse()
                .map_err(|source| ParseWeightsError::InvalidNumber {
                    value: value.to_owned(),
                    source,
                })?;
        }
        Ok(Self::from_array(weights))
    }
}
