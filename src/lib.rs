//! Point scattering - evolutionary search for well-spread points in the unit disk.
//!
//! Places `n` points inside (or on) the unit circle so that the minimum
//! pairwise Euclidean distance is as large as possible, using a generational
//! genetic algorithm over one of three representations:
//!
//! - **Cartesian**: free `(x, y)` points inside the disk
//! - **Polar**: `(r, θ)` points with `0 <= r <= 1`
//! - **Boundary**: angles on the circle, `r = 1`
//!
//! # Architecture
//!
//! - `schema`: Configuration, point and result types
//! - `compute`: Representations, fitness, the GA engine, experiments and statistics
//! - `report`: Per-generation logs, summaries and JSON export
//!
//! # Example
//!
//! ```rust,no_run
//! use point_scatter::{
//!     compute::evolution::Experiment,
//!     schema::{ExperimentConfig, ProblemConfig, RepresentationKind},
//! };
//!
//! let config = ExperimentConfig {
//!     problem: ProblemConfig {
//!         point_count: 8,
//!         representation: RepresentationKind::Polar,
//!     },
//!     runs: Some(10),
//!     ..Default::default()
//! };
//!
//! let result = Experiment::new(config).unwrap().run().unwrap();
//! println!(
//!     "mean final fitness {:.4}, 95% CI [{:.4}, {:.4}]",
//!     result.final_stats.mean, result.final_stats.ci_low, result.final_stats.ci_high
//! );
//! ```

pub mod compute;
pub mod report;
pub mod schema;

// Re-export commonly used types
pub use compute::evolution::{EvolutionEngine, Experiment, run_single};
pub use schema::{ExperimentConfig, GaConfig, ProblemConfig, RepresentationKind};
