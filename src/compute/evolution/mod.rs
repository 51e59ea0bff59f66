//! Evolutionary search for point arrangements with maximal minimum distance.
//!
//! # Overview
//!
//! - **Genome** (`genome`): the three representations, `Individual`, and the
//!   seeded `GenomeRng` with uniform crossover
//! - **Fitness** (`fitness`): minimum pairwise distance, in native coordinates
//! - **Search** (`search`): generational GA with tournament selection
//! - **Experiment** (`experiment`): independent repeated runs and statistics
//!
//! # Example
//!
//! ```rust,no_run
//! use point_scatter::compute::evolution::{Boundary, EvolutionEngine};
//! use point_scatter::schema::GaConfig;
//!
//! let mut engine = EvolutionEngine::new(&Boundary, 7, GaConfig::default()).unwrap();
//! let result = engine
//!     .run_with_callback(|snapshot| {
//!         println!("Generation {}: best = {:.4}", snapshot.generation, snapshot.best_fitness);
//!     })
//!     .unwrap();
//!
//! println!("Best minimum distance: {:.6}", result.best_fitness);
//! ```

mod experiment;
mod fitness;
mod genome;
mod search;

pub use experiment::{Experiment, ExperimentError, aggregate};
pub use fitness::{
    FitnessError, FitnessEvaluator, cartesian_distance, min_cartesian_distance,
    min_pairwise_distance, polar_distance,
};
pub use genome::{
    Boundary, Cartesian, GenomeRng, Individual, Polar, Representation, UNIFORM_CROSSOVER_SWAP_PROB,
};
pub use search::{EvolutionEngine, EvolutionError, run_single};
