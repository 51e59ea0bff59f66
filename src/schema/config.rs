//! Configuration types for point-scattering searches.
//!
//! All configuration is plain data: it is built once per invocation, validated
//! up front, and then passed by reference (or cloned) into each run.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Coordinate scheme used for an individual's genes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepresentationKind {
    /// Free `(x, y)` points inside the unit disk.
    #[default]
    Cartesian,
    /// `(r, θ)` points with `0 <= r <= 1`.
    Polar,
    /// Angles on the unit circle (`r = 1`).
    Boundary,
}

impl RepresentationKind {
    pub const ALL: [RepresentationKind; 3] = [Self::Cartesian, Self::Polar, Self::Boundary];

    /// Lowercase selector name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cartesian => "cartesian",
            Self::Polar => "polar",
            Self::Boundary => "boundary",
        }
    }

    /// Human-readable label with the native coordinates.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cartesian => "Cartesian (x, y)",
            Self::Polar => "Polar (r, θ)",
            Self::Boundary => "Boundary (θ)",
        }
    }

    /// Default number of independent runs for an experiment.
    pub fn default_runs(&self) -> usize {
        match self {
            Self::Cartesian | Self::Polar => 25,
            Self::Boundary => 50,
        }
    }
}

impl fmt::Display for RepresentationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RepresentationKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cartesian" => Ok(Self::Cartesian),
            "polar" => Ok(Self::Polar),
            "boundary" => Ok(Self::Boundary),
            _ => Err(ConfigError::UnknownRepresentation(s.to_string())),
        }
    }
}

/// Genetic algorithm parameters for a single run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaConfig {
    /// Number of individuals per generation.
    #[serde(default = "default_population_size")]
    pub population_size: usize,
    /// Number of generations after the initial population.
    #[serde(default = "default_generations")]
    pub generations: usize,
    /// Probability that a consecutive offspring pair is crossed over.
    #[serde(default = "default_crossover_rate")]
    pub crossover_rate: f64,
    /// Probability that an offspring is mutated.
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f64,
    /// Independent per-gene resampling probability inside a mutation.
    #[serde(default = "default_gene_mutation_rate")]
    pub gene_mutation_rate: f64,
    /// Individuals drawn (with replacement) per tournament.
    #[serde(default = "default_tournament_size")]
    pub tournament_size: usize,
    /// Random seed for the run.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: default_population_size(),
            generations: default_generations(),
            crossover_rate: default_crossover_rate(),
            mutation_rate: default_mutation_rate(),
            gene_mutation_rate: default_gene_mutation_rate(),
            tournament_size: default_tournament_size(),
            seed: default_seed(),
        }
    }
}

fn default_population_size() -> usize {
    200
}
fn default_generations() -> usize {
    200
}
fn default_crossover_rate() -> f64 {
    0.7
}
fn default_mutation_rate() -> f64 {
    0.2
}
fn default_gene_mutation_rate() -> f64 {
    0.2
}
fn default_tournament_size() -> usize {
    3
}
fn default_seed() -> u64 {
    42
}

impl GaConfig {
    /// Copy of this configuration with a different seed.
    pub fn with_seed(&self, seed: u64) -> Self {
        Self {
            seed,
            ..self.clone()
        }
    }

    /// Validate GA parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::InvalidPopulationSize);
        }
        if self.generations == 0 {
            return Err(ConfigError::InvalidGenerations);
        }
        if self.tournament_size == 0 {
            return Err(ConfigError::InvalidTournamentSize);
        }

        let check_probability = |value: f64, name: &'static str| {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(ConfigError::InvalidProbability { name, value })
            }
        };

        check_probability(self.crossover_rate, "crossover_rate")?;
        check_probability(self.mutation_rate, "mutation_rate")?;
        check_probability(self.gene_mutation_rate, "gene_mutation_rate")?;

        Ok(())
    }
}

/// The problem instance: how many points, in which representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemConfig {
    /// Number of points per individual.
    #[serde(default = "default_point_count")]
    pub point_count: usize,
    /// Coordinate scheme.
    #[serde(default)]
    pub representation: RepresentationKind,
}

impl Default for ProblemConfig {
    fn default() -> Self {
        Self {
            point_count: default_point_count(),
            representation: RepresentationKind::default(),
        }
    }
}

fn default_point_count() -> usize {
    5
}

impl ProblemConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.point_count == 0 {
            return Err(ConfigError::InvalidPointCount);
        }
        Ok(())
    }
}

/// Multi-run experiment configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    #[serde(default)]
    pub problem: ProblemConfig,
    #[serde(default)]
    pub ga: GaConfig,
    /// Number of independent runs. Falls back to the representation default.
    #[serde(default)]
    pub runs: Option<usize>,
    /// Run `i` is seeded with `seed_base + i`.
    #[serde(default = "default_seed_base")]
    pub seed_base: u64,
    /// Execute runs on the rayon thread pool.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            problem: ProblemConfig::default(),
            ga: GaConfig::default(),
            runs: None,
            seed_base: default_seed_base(),
            parallel: default_parallel(),
        }
    }
}

fn default_seed_base() -> u64 {
    12345
}
fn default_parallel() -> bool {
    true
}

impl ExperimentConfig {
    /// Effective number of runs.
    pub fn run_count(&self) -> usize {
        self.runs
            .unwrap_or_else(|| self.problem.representation.default_runs())
    }

    /// Seed for the run with the given index.
    pub fn run_seed(&self, run: usize) -> u64 {
        self.seed_base.wrapping_add(run as u64)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.problem.validate()?;
        self.ga.validate()?;

        let runs = self.run_count();
        if runs < 2 {
            return Err(ConfigError::TooFewRuns(runs));
        }

        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Probability {name} must be within [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },
    #[error("Population size must be positive")]
    InvalidPopulationSize,
    #[error("Generation count must be positive")]
    InvalidGenerations,
    #[error("Tournament size must be positive")]
    InvalidTournamentSize,
    #[error("Point count must be positive")]
    InvalidPointCount,
    #[error("Unknown representation: {0} (expected cartesian, polar or boundary)")]
    UnknownRepresentation(String),
    #[error("An experiment needs at least 2 runs, got {0}")]
    TooFewRuns(usize),
}
