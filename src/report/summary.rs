//! Text summaries and JSON export of run and experiment results.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;

use crate::schema::{ExperimentResult, RunResult};

/// Multi-line summary of an experiment's final fitness statistics.
pub fn format_experiment_summary(result: &ExperimentResult) -> String {
    let stats = &result.final_stats;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} (n={}, runs={})",
        result.problem.representation.label(),
        result.problem.point_count,
        result.runs
    );
    let _ = writeln!(out, "  Final best fitness mean: {:.6}", stats.mean);
    let _ = writeln!(out, "  Final best fitness std:  {:.6}", stats.std);
    let _ = writeln!(
        out,
        "  95% CI:                  [{:.6}, {:.6}]",
        stats.ci_low, stats.ci_high
    );
    let _ = writeln!(
        out,
        "  Final generation mean:   {:.6}",
        result.final_generation_mean
    );
    let _ = writeln!(
        out,
        "  Final population avg:    {:.6}",
        result.final_avg_fitness_mean
    );
    let _ = writeln!(
        out,
        "  Best run: #{} (seed {}) fitness {:.6}",
        result.best_run.run, result.best_run.seed, result.best_run.fitness
    );

    out
}

/// Short summary of a single run.
pub fn format_run_summary(result: &RunResult) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} (n={}, seed={})",
        result.problem.representation.label(),
        result.problem.point_count,
        result.config.seed
    );
    let _ = writeln!(
        out,
        "  Final best minimum distance: {:.6}",
        result.final_best_fitness
    );
    let _ = writeln!(
        out,
        "  Best seen: {:.6} (generation {})",
        result.best_fitness, result.best_generation
    );
    let _ = writeln!(out, "  Evaluations: {}", result.evaluations);

    out
}

/// Write `value` as pretty-printed JSON.
pub fn save_json<T: Serialize, P: AsRef<Path>>(path: P, value: &T) -> io::Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)
}
