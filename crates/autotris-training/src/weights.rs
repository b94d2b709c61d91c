//! Operations on [`HeuristicWeights`] viewed as 4-dimensional vectors.
//!
//! Only the direction of a weight vector matters to the search (scaling every
//! weight by the same positive factor ranks placements identically), so the
//! tuner keeps every vector at unit Euclidean length.

use autotris_evaluator::HeuristicWeights;
use rand::Rng;

/// Euclidean length of the weight vector.
#[must_use]
pub fn norm(weights: &HeuristicWeights) -> f64 {
    weights.to_array().iter().map(|w| w * w).sum::<f64>().sqrt()
}

/// Scales `weights` to unit length.
///
/// A zero vector has no direction; it is left unchanged and `false` is
/// returned.
pub fn normalize(weights: &mut HeuristicWeights) -> bool {
    let norm = norm(weights);
    if norm <= 0.0 || !norm.is_finite() {
        return false;
    }
    *weights = HeuristicWeights::from_array(weights.to_array().map(|w| w / norm));
    true
}

/// Generates a random unit vector.
///
/// Components are drawn uniformly from `[-0.5, 0.5)` before normalization.
pub fn random_unit<R>(rng: &mut R) -> HeuristicWeights
where
    R: Rng + ?Sized,
{
    loop {
        let mut weights =
            HeuristicWeights::from_array(std::array::from_fn(|_| rng.random_range(-0.5..0.5)));
        if normalize(&mut weights) {
            return weights;
        }
    }
}

/// Fitness-weighted sum of two parents, normalized.
///
/// The fitter parent pulls the child's direction towards itself. When the
/// weighted sum vanishes (for example, both fitnesses are zero) the plain sum
/// of the parents is used instead, and if that vanishes too the child copies
/// `p1`.
///
/// # Example
///
/// ```
/// use autotris_evaluator::HeuristicWeights;
/// use autotris_training::weights;
///
/// let p1 = HeuristicWeights::from_array([1.0, 0.0, 0.0, 0.0]);
/// let p2 = HeuristicWeights::from_array([0.0, 1.0, 0.0, 0.0]);
/// let child = weights::cross_over(&p1, 3.0, &p2, 4.0);
/// assert!((child.height - 0.6).abs() < 1e-12);
/// assert!((child.lines - 0.8).abs() < 1e-12);
/// ```
#[must_use]
pub fn cross_over(
    p1: &HeuristicWeights,
    fitness1: f64,
    p2: &HeuristicWeights,
    fitness2: f64,
) -> HeuristicWeights {
    let blend = |f1: f64, f2: f64| {
        let (a, b) = (p1.to_array(), p2.to_array());
        HeuristicWeights::from_array(std::array::from_fn(|i| f1 * a[i] + f2 * b[i]))
    };
    let mut child = blend(fitness1, fitness2);
    if normalize(&mut child) {
        return child;
    }
    let mut child = blend(1.0, 1.0);
    if normalize(&mut child) {
        return child;
    }
    *p1
}

/// Adds a uniform offset in `[-0.2, 0.2)` to one randomly chosen weight.
///
/// The result is not normalized.
pub fn mutate<R>(weights: &mut HeuristicWeights, rng: &mut R)
where
    R: Rng + ?Sized,
{
    let delta = rng.random_range(-0.2..0.2);
    let mut values = weights.to_array();
    values[rng.random_range(0..HeuristicWeights::LEN)] += delta;
    *weights = HeuristicWeights::from_array(values);
}
