//! Compute module - Evolutionary search and statistics for point scattering.

mod stats;

pub mod evolution;

pub use stats::*;
