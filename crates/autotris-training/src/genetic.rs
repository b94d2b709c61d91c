//! Genetic operators over a population of weight candidates.
//!
//! The population is kept sorted by fitness, best first. Selection relies on
//! that order: a tournament draws random indices and the smallest ones win.

use autotris_evaluator::HeuristicWeights;
use rand::{Rng, seq::index};
use serde::Serialize;

use crate::weights;

/// Probability that a freshly bred child is mutated.
pub const MUTATION_PROBABILITY: f64 = 0.05;

/// A weight vector and the fitness it scored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Candidate {
    pub weights: HeuristicWeights,
    pub fitness: f64,
}

impl Candidate {
    /// Creates an unscored candidate.
    #[must_use]
    pub fn new(weights: HeuristicWeights) -> Self {
        Self {
            weights,
            fitness: 0.0,
        }
    }

    /// Creates an unscored candidate pointing in a random direction.
    pub fn random<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::new(weights::random_unit(rng))
    }
}

/// Sorts by fitness, best first. Equal fitnesses keep their order.
pub fn sort(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
}

/// Tournament selection of two parents.
///
/// Draws `ways` distinct indices without replacement and returns the
/// candidates at the two smallest, which are the two fittest entrants when
/// `candidates` is sorted.
///
/// # Panics
///
/// Panics if `ways` is not in `2..=candidates.len()`.
pub fn tournament_select_pair<'a, R>(
    candidates: &'a [Candidate],
    ways: usize,
    rng: &mut R,
) -> (&'a Candidate, &'a Candidate)
where
    R: Rng + ?Sized,
{
    assert!(
        (2..=candidates.len()).contains(&ways),
        "tournament of {ways} from {} candidates",
        candidates.len()
    );
    let mut drawn = index::sample(rng, candidates.len(), ways).into_vec();
    drawn.sort_unstable();
    (&candidates[drawn[0]], &candidates[drawn[1]])
}

/// Breeds an unscored child from two scored parents.
///
/// See [`weights::cross_over`].
#[must_use]
pub fn cross_over(c1: &Candidate, c2: &Candidate) -> Candidate {
    Candidate::new(weights::cross_over(
        &c1.weights,
        c1.fitness,
        &c2.weights,
        c2.fitness,
    ))
}

/// Replaces the last `offspring.len()` candidates with `offspring` and
/// re-sorts.
///
/// # Panics
///
/// Panics if there are more offspring than candidates.
pub fn replace_worst(candidates: &mut Vec<Candidate>, offspring: Vec<Candidate>) {
    assert!(
        offspring.len() <= candidates.len(),
        "{} offspring cannot replace {} candidates",
        offspring.len(),
        candidates.len()
    );
    candidates.truncate(candidates.len() - offspring.len());
    candidates.extend(offspring);
    sort(candidates);
}
