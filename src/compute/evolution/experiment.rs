//! Repeated independent runs and their statistical aggregation.

use log::info;
use rayon::prelude::*;

use crate::compute::stats::{LengthMismatch, mean};
use crate::schema::{
    BestRun, ConfigError, ExperimentConfig, ExperimentResult, GenerationStats, RunResult,
    SummaryStats,
};

use super::search::{EvolutionError, run_single};

/// Experiment errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExperimentError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Run {run} failed: {source}")]
    Run {
        run: usize,
        #[source]
        source: EvolutionError,
    },
    #[error("Run {run} recorded {found} generations, expected {expected}")]
    ConfigurationMismatch {
        run: usize,
        expected: usize,
        found: usize,
    },
    #[error("No runs to aggregate")]
    NoRuns,
}

impl From<LengthMismatch> for ExperimentError {
    fn from(err: LengthMismatch) -> Self {
        Self::ConfigurationMismatch {
            run: err.index,
            expected: err.expected,
            found: err.found,
        }
    }
}

/// Runs the engine `n_runs` times with seeds `seed_base + i`.
pub struct Experiment {
    config: ExperimentConfig,
}

impl Experiment {
    /// Validate the configuration and create the experiment.
    pub fn new(config: ExperimentConfig) -> Result<Self, ExperimentError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Execute one run of the experiment.
    pub fn run_one(&self, run: usize) -> Result<RunResult, ExperimentError> {
        let ga = self.config.ga.with_seed(self.config.run_seed(run));
        run_single(&self.config.problem, &ga, |_| {})
            .map_err(|source| ExperimentError::Run { run, source })
    }

    /// Execute all runs and aggregate them.
    ///
    /// Runs only share read-only configuration, so parallel execution yields
    /// the same results as sequential execution.
    pub fn run(&self) -> Result<ExperimentResult, ExperimentError> {
        let n_runs = self.config.run_count();
        info!(
            "experiment: {} runs, representation={}, n={}",
            n_runs, self.config.problem.representation, self.config.problem.point_count
        );

        let runs: Vec<RunResult> = if self.config.parallel {
            (0..n_runs)
                .into_par_iter()
                .map(|run| self.run_one(run))
                .collect::<Result<_, _>>()?
        } else {
            (0..n_runs)
                .map(|run| self.run_one(run))
                .collect::<Result<_, _>>()?
        };

        let result = aggregate(&runs, self.config.seed_base)?;
        info!(
            "experiment done: final mean={:.6} std={:.6} CI95=[{:.6}, {:.6}]",
            result.final_stats.mean,
            result.final_stats.std,
            result.final_stats.ci_low,
            result.final_stats.ci_high
        );
        Ok(result)
    }
}

/// Fold completed runs into experiment statistics.
///
/// Run `i` is assumed to have been seeded with `seed_base + i`. Every run must
/// have recorded the same number of generations.
pub fn aggregate(runs: &[RunResult], seed_base: u64) -> Result<ExperimentResult, ExperimentError> {
    let first = runs.first().ok_or(ExperimentError::NoRuns)?;

    let best_by_gen_all: Vec<Vec<f64>> = runs.iter().map(|r| r.best_by_gen.clone()).collect();
    let avg_by_gen_all: Vec<Vec<f64>> = runs.iter().map(|r| r.avg_by_gen.clone()).collect();

    let generation_stats = GenerationStats::from_series(&best_by_gen_all)?;
    if let Some((run, r)) = runs
        .iter()
        .enumerate()
        .find(|(_, r)| r.avg_by_gen.len() != first.best_by_gen.len())
    {
        return Err(ExperimentError::ConfigurationMismatch {
            run,
            expected: first.best_by_gen.len(),
            found: r.avg_by_gen.len(),
        });
    }

    let final_fitness: Vec<f64> = runs.iter().map(|r| r.final_best_fitness).collect();
    let final_stats = SummaryStats::from_samples(&final_fitness);
    let final_generation_mean = generation_stats.mean.last().copied().unwrap_or(f64::NAN);
    let final_avg: Vec<f64> = runs.iter().map(|r| r.final_avg_fitness).collect();

    // Ties keep the earliest run
    let mut best_idx = 0;
    for (i, r) in runs.iter().enumerate() {
        if r.best_fitness > runs[best_idx].best_fitness {
            best_idx = i;
        }
    }
    let best = &runs[best_idx];

    Ok(ExperimentResult {
        problem: first.problem.clone(),
        config: first.config.clone(),
        runs: runs.len(),
        best_by_gen_all,
        avg_by_gen_all,
        final_fitness,
        final_stats,
        generation_stats,
        final_generation_mean,
        final_avg_fitness_mean: mean(&final_avg),
        best_run: BestRun {
            run: best_idx,
            seed: seed_base.wrapping_add(best_idx as u64),
            fitness: best.best_fitness,
            curve: best.best_by_gen.clone(),
            points: best.best_points.clone(),
        },
    })
}
