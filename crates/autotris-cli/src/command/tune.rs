use std::{ops::ControlFlow, path::PathBuf};

use anyhow::Context as _;
use autotris_engine::RngSeed;
use autotris_training::{Candidate, GenerationReport, TuneConfig, Tuner};
use chrono::{DateTime, Utc};
use rand::Rng as _;
use serde::Serialize;

use crate::{model::TunedModel, util::JsonLines};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TuneArg {
    /// Number of candidates in the population
    #[arg(long, default_value_t = TuneConfig::DEFAULT.population)]
    population: usize,
    /// Games played per fitness evaluation
    #[arg(long, default_value_t = TuneConfig::DEFAULT.rounds)]
    rounds: usize,
    /// Move limit of each game
    #[arg(long, default_value_t = TuneConfig::DEFAULT.moves)]
    moves: usize,
    /// Stop after this many generations (runs until interrupted if omitted)
    #[arg(long)]
    pub(super) generations: Option<usize>,
    /// Seed as 32 hex digits (random if omitted)
    #[arg(long)]
    pub(super) seed: Option<RngSeed>,
    /// Print a JSON line per generation to stdout
    #[arg(long)]
    pub(super) json: bool,
    /// Save the best weights to this file
    #[arg(long)]
    output: Option<PathBuf>,
}

impl TuneArg {
    pub(super) fn config(&self) -> TuneConfig {
        TuneConfig {
            population: self.population,
            rounds: self.rounds,
            moves: self.moves,
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerationLog<'a> {
    timestamp: DateTime<Utc>,
    #[serde(flatten)]
    report: &'a GenerationReport,
}

pub(crate) fn run(arg: &TuneArg) -> anyhow::Result<()> {
    let config = arg.config();
    let seed = arg.seed.unwrap_or_else(|| rand::rng().random());
    let mut tuner = Tuner::with_seed(config, seed).context("Invalid tuning configuration")?;

    eprintln!("Seed: {seed}");
    eprintln!(
        "Population: {}, rounds: {}, moves: {}",
        config.population, config.rounds, config.moves
    );
    eprintln!("Computing fitnesses of initial population...");

    let mut json_output = arg.json.then(JsonLines::stdout);
    let mut error = None;
    let mut generations = 0;
    let population = tuner.run(&mut |report: &GenerationReport| {
        generations = report.generation + 1;
        print_report(report);
        if let Some(output) = &mut json_output {
            let log = GenerationLog {
                timestamp: Utc::now(),
                report,
            };
            if let Err(e) = output.write(&log) {
                error = Some(e);
                return ControlFlow::Break(());
            }
        }
        if arg.generations.is_some_and(|limit| generations >= limit) {
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    });
    if let Some(e) = error {
        return Err(e);
    }

    print_best(&population);

    if let Some(path) = &arg.output {
        let best = population[0];
        let model = TunedModel {
            trained_at: Utc::now(),
            seed,
            config,
            generations,
            fitness: best.fitness,
            weights: best.weights,
        };
        model.save(path)?;
        eprintln!();
        eprintln!("Model saved successfully");
        eprintln!("  Path: {}", path.display());
        eprintln!("  Trained at: {}", model.trained_at);
        eprintln!("  Fitness: {}", model.fitness);
    }

    Ok(())
}

fn print_report(report: &GenerationReport) {
    let GenerationReport {
        generation,
        average_fitness,
        best_fitness,
        best,
    } = report;
    eprintln!("Generation #{generation}:");
    eprintln!("  Average fitness: {average_fitness:.3}");
    eprintln!("  Highest fitness: {best_fitness}");
    eprintln!("  Fittest weights: {best}");
}

fn print_best(population: &[Candidate]) {
    eprintln!("Best Candidates:");
    for (i, candidate) in population.iter().take(5).enumerate() {
        eprintln!(
            "  {i:2}: {:.6?} => {}",
            candidate.weights.to_array(),
            candidate.fitness
        );
    }
}
