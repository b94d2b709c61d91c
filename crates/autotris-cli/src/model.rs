use std::{
    fs::File,
    io::{BufReader, BufWriter, Write as _},
    path::Path,
};

use anyhow::Context as _;
use autotris_engine::RngSeed;
use autotris_evaluator::HeuristicWeights;
use autotris_training::TuneConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Best weights found by a tuning run, saved with `tune --output`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TunedModel {
    pub trained_at: DateTime<Utc>,
    pub seed: RngSeed,
    pub config: TuneConfig,
    pub generations: usize,
    pub fitness: f64,
    pub weights: HeuristicWeights,
}

impl TunedModel {
    /// Writes the model as pretty-printed JSON, replacing any existing file.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create model file: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .with_context(|| format!("Failed to write model file: {}", path.display()))?;
        writeln!(writer)
            .and_then(|()| writer.flush())
            .with_context(|| format!("Failed to write model file: {}", path.display()))?;
        Ok(())
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open model file: {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse model file: {}", path.display()))
    }
}
