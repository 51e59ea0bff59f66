//! Schema module - Configuration, point and result types for point scattering.

mod config;
mod points;
mod results;

pub use config::*;
pub use points::*;
pub use results::*;
