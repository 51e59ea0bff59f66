//! Reporting surfaces: per-generation logs, summaries and JSON export.

mod generation_log;
mod summary;

pub use generation_log::{COORDINATE_PRECISION, GenerationLog};
pub use summary::{format_experiment_summary, format_run_summary, save_json};
