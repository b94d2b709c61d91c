//! Generational weight tuning.
//!
//! Each generation breeds 30 % of the population size as offspring through
//! tournament selection, fitness-weighted crossover and occasional mutation,
//! scores them by self-play and lets them replace the worst candidates.

use std::{ops::ControlFlow, thread};

use autotris_engine::{Board, PieceSource, RngSeed};
use autotris_evaluator::{HeuristicWeights, SearchEngine, Session};
use rand::Rng as _;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::{
    genetic::{self, Candidate, MUTATION_PROBABILITY},
    weights,
};

/// Pieces known to the search during fitness games.
pub const LOOKAHEAD: usize = 2;

/// Population and fitness-game sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TuneConfig {
    /// Number of candidates kept alive.
    pub population: usize,
    /// Games played per candidate fitness evaluation.
    pub rounds: usize,
    /// Move limit of each game.
    pub moves: usize,
}

impl Default for TuneConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Error returned by [`TuneConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum TuneConfigError {
    #[display("population must be at least 2, got {population}")]
    PopulationTooSmall { population: usize },
    #[display("rounds must be at least 1")]
    NoRounds,
    #[display("moves must be at least 1")]
    NoMoves,
}

impl TuneConfig {
    pub const DEFAULT: Self = Self {
        population: 100,
        rounds: 5,
        moves: 200,
    };

    pub fn validate(&self) -> Result<(), TuneConfigError> {
        if self.population < 2 {
            return Err(TuneConfigError::PopulationTooSmall {
                population: self.population,
            });
        }
        if self.rounds == 0 {
            return Err(TuneConfigError::NoRounds);
        }
        if self.moves == 0 {
            return Err(TuneConfigError::NoMoves);
        }
        Ok(())
    }

    /// Children bred per generation: 30 % of the population, at least one.
    #[must_use]
    pub fn offspring_count(&self) -> usize {
        (self.population * 3 / 10).max(1)
    }

    /// Tournament entrants: 10 % of the population, clamped to `2..=population`.
    #[must_use]
    pub fn tournament_size(&self) -> usize {
        (self.population / 10).clamp(2, self.population.max(2))
    }
}

/// Population summary delivered after every generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationReport {
    /// Zero-based generation counter.
    pub generation: usize,
    pub average_fitness: f64,
    pub best_fitness: f64,
    pub best: HeuristicWeights,
}

impl GenerationReport {
    /// Summarizes a sorted, non-empty population.
    #[must_use]
    pub fn new(generation: usize, candidates: &[Candidate]) -> Self {
        let best = candidates[0];
        let total: f64 = candidates.iter().map(|c| c.fitness).sum();
        #[expect(clippy::cast_precision_loss)]
        let average_fitness = total / candidates.len() as f64;
        Self {
            generation,
            average_fitness,
            best_fitness: best.fitness,
            best: best.weights,
        }
    }
}

/// Sink for generation reports.
///
/// Returning [`ControlFlow::Break`] stops the tuning loop.
pub trait GenerationReporter {
    fn report(&mut self, report: &GenerationReport) -> ControlFlow<()>;
}

impl<F> GenerationReporter for F
where
    F: FnMut(&GenerationReport) -> ControlFlow<()>,
{
    fn report(&mut self, report: &GenerationReport) -> ControlFlow<()> {
        self(report)
    }
}

/// Genetic tuner for [`HeuristicWeights`].
///
/// All randomness comes from one PCG generator, so a run is reproducible
/// from its seed regardless of thread scheduling.
///
/// # Example
///
/// ```
/// use std::ops::ControlFlow;
///
/// use autotris_engine::RngSeed;
/// use autotris_training::{GenerationReport, TuneConfig, Tuner};
///
/// let config = TuneConfig { population: 4, rounds: 1, moves: 10 };
/// let mut tuner = Tuner::with_seed(config, RngSeed::from(1)).unwrap();
/// let population = tuner.run(&mut |report: &GenerationReport| {
///     println!("{report:?}");
///     ControlFlow::Break(())
/// });
/// assert_eq!(population.len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct Tuner {
    config: TuneConfig,
    rng: Pcg32,
}

impl Tuner {
    /// Creates a tuner seeded from the thread RNG.
    pub fn new(config: TuneConfig) -> Result<Self, TuneConfigError> {
        Self::with_seed(config, rand::rng().random())
    }

    pub fn with_seed(config: TuneConfig, seed: RngSeed) -> Result<Self, TuneConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            rng: seed.rng(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &TuneConfig {
        &self.config
    }

    /// Creates `population` unscored random candidates.
    pub fn random_population(&mut self) -> Vec<Candidate> {
        (0..self.config.population)
            .map(|_| Candidate::random(&mut self.rng))
            .collect()
    }

    /// Scores every candidate by the lines it clears in `rounds` games.
    ///
    /// Each candidate plays on its own thread. Game seeds are drawn from the
    /// tuner's generator before any thread starts.
    pub fn compute_fitnesses(&mut self, candidates: &mut [Candidate]) {
        let TuneConfig { rounds, moves, .. } = self.config;
        let seeds: Vec<Vec<RngSeed>> = candidates
            .iter()
            .map(|_| (0..rounds).map(|_| self.rng.random()).collect())
            .collect();

        thread::scope(|s| {
            for (candidate, seeds) in candidates.iter_mut().zip(&seeds) {
                s.spawn(move || {
                    candidate.fitness = play_games(&candidate.weights, seeds, moves);
                });
            }
        });
    }

    /// Breeds one generation of unscored offspring from a sorted population.
    pub fn breed(&mut self, candidates: &[Candidate]) -> Vec<Candidate> {
        let ways = self.config.tournament_size();
        (0..self.config.offspring_count())
            .map(|_| {
                let (c1, c2) = genetic::tournament_select_pair(candidates, ways, &mut self.rng);
                let mut child = genetic::cross_over(c1, c2);
                if self.rng.random_bool(MUTATION_PROBABILITY) {
                    weights::mutate(&mut child.weights, &mut self.rng);
                }
                weights::normalize(&mut child.weights);
                child
            })
            .collect()
    }

    /// Runs generations until `reporter` breaks, then returns the population
    /// sorted best first.
    pub fn run<R>(&mut self, reporter: &mut R) -> Vec<Candidate>
    where
        R: GenerationReporter + ?Sized,
    {
        let mut candidates = self.random_population();
        self.compute_fitnesses(&mut candidates);
        genetic::sort(&mut candidates);

        for generation in 0.. {
            let mut offspring = self.breed(&candidates);
            self.compute_fitnesses(&mut offspring);
            genetic::replace_worst(&mut candidates, offspring);

            let report = GenerationReport::new(generation, &candidates);
            if reporter.report(&report).is_break() {
                break;
            }
        }
        candidates
    }
}

#[expect(clippy::cast_precision_loss)]
fn play_games(weights: &HeuristicWeights, seeds: &[RngSeed], moves: usize) -> f64 {
    let engine = SearchEngine::new(*weights);
    let cleared_lines: usize = seeds
        .iter()
        .map(|&seed| {
            let board = Board::standard();
            let source = PieceSource::with_seed(board.columns(), seed);
            Session::new(board, source, LOOKAHEAD)
                .play(&engine, moves)
                .cleared_lines()
        })
        .sum();
    cleared_lines as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> TuneConfig {
        TuneConfig {
            population: 4,
            rounds: 1,
            moves: 20,
        }
    }

    #[test]
    fn test_config_validation() {
        assert_eq!(TuneConfig::default().validate(), Ok(()));
        let config = TuneConfig {
            population: 1,
            ..TuneConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(TuneConfigError::PopulationTooSmall { population: 1 })
        );
        let config = TuneConfig {
            rounds: 0,
            ..TuneConfig::default()
        };
        assert_eq!(config.validate(), Err(TuneConfigError::NoRounds));
        let config = TuneConfig {
            moves: 0,
            ..TuneConfig::default()
        };
        assert_eq!(config.validate(), Err(TuneConfigError::NoMoves));
        assert!(Tuner::new(config).is_err());
    }

    #[test]
    fn test_generation_sizes() {
        let sizes = |population| {
            let config = TuneConfig {
                population,
                ..TuneConfig::default()
            };
            (config.offspring_count(), config.tournament_size())
        };
        assert_eq!(sizes(100), (30, 10));
        assert_eq!(sizes(2), (1, 2));
        assert_eq!(sizes(5), (1, 2));
        assert_eq!(sizes(25), (7, 2));
        assert_eq!(sizes(1000), (300, 100));
    }

    #[test]
    fn test_report_summarizes_population() {
        let candidates = [
            Candidate {
                weights: HeuristicWeights::default(),
                fitness: 6.0,
            },
            Candidate::new(HeuristicWeights::ZERO),
        ];
        let report = GenerationReport::new(3, &candidates);
        assert_eq!(report.generation, 3);
        assert_eq!(report.best_fitness, 6.0);
        assert_eq!(report.average_fitness, 3.0);
        assert_eq!(report.best, HeuristicWeights::default());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["generation"], 3);
        assert_eq!(json["best_fitness"], 6.0);
        assert_eq!(json["best"]["holes"], HeuristicWeights::default().holes);
    }

    #[test]
    fn test_fitness_counts_cleared_lines() {
        let config = TuneConfig {
            moves: 60,
            ..small_config()
        };
        let mut tuner = Tuner::with_seed(config, RngSeed::from(10)).unwrap();
        let mut candidates = [
            Candidate::new(HeuristicWeights::default()),
            Candidate::new(HeuristicWeights::ZERO),
        ];
        tuner.compute_fitnesses(&mut candidates);
        // without weights every piece lands against the left wall
        assert!(candidates[0].fitness > 0.0);
        assert_eq!(candidates[1].fitness, 0.0);
    }

    #[test]
    fn test_run_stops_on_break() {
        let mut tuner = Tuner::with_seed(small_config(), RngSeed::from(99)).unwrap();
        let mut generations = vec![];
        let population = tuner.run(&mut |report: &GenerationReport| {
            generations.push(report.generation);
            if report.generation == 2 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });

        assert_eq!(generations, [0, 1, 2]);
        assert_eq!(population.len(), 4);
        assert!(population.is_sorted_by(|a, b| a.fitness >= b.fitness));
        for candidate in &population {
            assert!((weights::norm(&candidate.weights) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_run_is_reproducible() {
        let run = |seed| {
            let mut tuner = Tuner::with_seed(small_config(), RngSeed::from(seed)).unwrap();
            let mut reports = vec![];
            let population = tuner.run(&mut |report: &GenerationReport| {
                reports.push(report.clone());
                if reports.len() < 2 {
                    ControlFlow::Continue(())
                } else {
                    ControlFlow::Break(())
                }
            });
            (population, reports)
        };
        assert_eq!(run(5), run(5));
    }
}
