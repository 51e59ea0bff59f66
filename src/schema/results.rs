//! Progress and result types produced by runs and experiments.

use serde::{Deserialize, Serialize};

use super::{CartesianPoint, GaConfig, ProblemConfig};

/// Current phase of a run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum EvolutionPhase {
    /// Building the initial population.
    #[default]
    Initializing,
    /// Scoring individuals without a cached fitness.
    Evaluating,
    /// Tournament selection of the offspring pool.
    Selecting,
    /// Crossover and mutation.
    Varying,
    /// Offspring become the new population.
    Replacing,
    /// All generations finished.
    Done,
}

/// Per-generation telemetry handed to callbacks and log writers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSnapshot {
    /// 0 is the initial population.
    pub generation: usize,
    pub best_fitness: f64,
    pub avg_fitness: f64,
    /// Decoded coordinates of this generation's best individual.
    pub best_points: Vec<CartesianPoint>,
}

/// Fitness history for plotting.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct EvolutionHistory {
    /// Best fitness per generation.
    pub best_fitness: Vec<f64>,
    /// Average fitness per generation.
    pub avg_fitness: Vec<f64>,
}

impl EvolutionHistory {
    pub fn len(&self) -> usize {
        self.best_fitness.len()
    }

    pub fn is_empty(&self) -> bool {
        self.best_fitness.is_empty()
    }
}

/// Outcome of a single run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub problem: ProblemConfig,
    pub config: GaConfig,
    /// Best fitness per generation (`generations + 1` entries).
    pub best_by_gen: Vec<f64>,
    /// Average fitness per generation (`generations + 1` entries).
    pub avg_by_gen: Vec<f64>,
    /// Best individual seen during the run, decoded to Cartesian coordinates.
    pub best_points: Vec<CartesianPoint>,
    /// Fitness of `best_points`.
    pub best_fitness: f64,
    /// Generation in which `best_points` first appeared.
    pub best_generation: usize,
    /// Best fitness of the final population.
    pub final_best_fitness: f64,
    /// Average fitness of the final population.
    pub final_avg_fitness: f64,
    /// Number of fitness evaluations performed.
    pub evaluations: u64,
}

impl RunResult {
    /// Number of recorded generations, including the initial population.
    pub fn recorded_generations(&self) -> usize {
        self.best_by_gen.len()
    }
}

/// Mean, sample standard deviation and 95% confidence interval.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SummaryStats {
    pub mean: f64,
    pub std: f64,
    pub ci_low: f64,
    pub ci_high: f64,
}

/// Column-wise mean and 95% confidence band across runs.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GenerationStats {
    pub mean: Vec<f64>,
    pub ci_low: Vec<f64>,
    pub ci_high: Vec<f64>,
}

/// The run that produced the best individual of an experiment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BestRun {
    pub run: usize,
    pub seed: u64,
    pub fitness: f64,
    /// Best-fitness-by-generation curve of this run.
    pub curve: Vec<f64>,
    pub points: Vec<CartesianPoint>,
}

/// Aggregated outcome of many independent runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentResult {
    pub problem: ProblemConfig,
    pub config: GaConfig,
    pub runs: usize,
    pub best_by_gen_all: Vec<Vec<f64>>,
    pub avg_by_gen_all: Vec<Vec<f64>>,
    /// Final best fitness of each run.
    pub final_fitness: Vec<f64>,
    pub final_stats: SummaryStats,
    pub generation_stats: GenerationStats,
    /// Mean best fitness at the last generation.
    pub final_generation_mean: f64,
    /// Mean of the final population's average fitness across runs.
    pub final_avg_fitness_mean: f64,
    pub best_run: BestRun,
}
