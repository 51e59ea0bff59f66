//! Per-generation text log of the best individual's coordinates.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::schema::{GaConfig, GenerationSnapshot, ProblemConfig};

/// Decimal places for logged coordinates.
pub const COORDINATE_PRECISION: usize = 6;

/// Writes one line per generation: index and decoded best points.
///
/// Usage:
/// ```ignore
/// let mut log = GenerationLog::create(&path, &problem, &ga)?;
/// let result = run_single(&problem, &ga, |snapshot| log.record(snapshot))?;
/// log.finish()?;
/// ```
pub struct GenerationLog {
    writer: BufWriter<File>,
    lines_written: usize,
    error: Option<io::Error>,
}

impl GenerationLog {
    /// Conventional file name: `<repr>_n<n>_gen<G>.txt`.
    pub fn file_name(problem: &ProblemConfig, ga: &GaConfig) -> String {
        format!(
            "{}_n{}_gen{}.txt",
            problem.representation, problem.point_count, ga.generations
        )
    }

    /// Create `<dir>/<file_name>`, creating `dir` if needed.
    pub fn create_in<P: AsRef<Path>>(
        dir: P,
        problem: &ProblemConfig,
        ga: &GaConfig,
    ) -> io::Result<(Self, PathBuf)> {
        fs::create_dir_all(dir.as_ref())?;
        let path = dir.as_ref().join(Self::file_name(problem, ga));
        let log = Self::create(&path, problem, ga)?;
        Ok((log, path))
    }

    /// Create the log file and write its header.
    pub fn create<P: AsRef<Path>>(
        path: P,
        problem: &ProblemConfig,
        ga: &GaConfig,
    ) -> io::Result<Self> {
        let mut writer = BufWriter::new(File::create(path)?);

        writeln!(writer, "{} Representation Log", problem.representation.label())?;
        writeln!(
            writer,
            "n={}, generations={}, population={}",
            problem.point_count, ga.generations, ga.population_size
        )?;
        writeln!(
            writer,
            "crossover_prob={}, mutation_prob={}, indpb={}, seed={}",
            ga.crossover_rate, ga.mutation_rate, ga.gene_mutation_rate, ga.seed
        )?;
        writeln!(writer, "{}", "=".repeat(80))?;
        writeln!(writer)?;

        Ok(Self {
            writer,
            lines_written: 0,
            error: None,
        })
    }

    /// Append a generation line.
    ///
    /// Infallible so it can be used directly as a run callback; the first
    /// write error is kept and returned by [`finish`](Self::finish).
    pub fn record(&mut self, snapshot: &GenerationSnapshot) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.write_line(snapshot) {
            self.error = Some(e);
        }
    }

    fn write_line(&mut self, snapshot: &GenerationSnapshot) -> io::Result<()> {
        write!(self.writer, "Gen {}:", snapshot.generation)?;
        for p in &snapshot.best_points {
            write!(
                self.writer,
                " ({:.prec$}, {:.prec$})",
                p.x,
                p.y,
                prec = COORDINATE_PRECISION
            )?;
        }
        writeln!(self.writer)?;
        self.lines_written += 1;
        Ok(())
    }

    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    /// Flush the file, surfacing any deferred write error.
    pub fn finish(mut self) -> io::Result<usize> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.writer.flush()?;
        Ok(self.lines_written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::evolution::run_single;
    use crate::schema::{CartesianPoint, RepresentationKind};
    use tempfile::tempdir;

    fn problem() -> ProblemConfig {
        ProblemConfig {
            point_count: 3,
            representation: RepresentationKind::Polar,
        }
    }

    #[test]
    fn test_log_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.txt");
        let ga = GaConfig {
            generations: 1,
            ..Default::default()
        };

        let mut log = GenerationLog::create(&path, &problem(), &ga).unwrap();
        log.record(&GenerationSnapshot {
            generation: 0,
            best_fitness: 1.0,
            avg_fitness: 0.5,
            best_points: vec![CartesianPoint::new(0.5, -0.25), CartesianPoint::new(1.0, 0.0)],
        });
        assert_eq!(log.finish().unwrap(), 1);

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Polar (r, θ) Representation Log");
        assert_eq!(lines[1], "n=3, generations=1, population=200");
        assert_eq!(
            lines[2],
            "crossover_prob=0.7, mutation_prob=0.2, indpb=0.2, seed=42"
        );
        assert_eq!(lines[3], "=".repeat(80));
        assert_eq!(lines[4], "");
        assert_eq!(lines[5], "Gen 0: (0.500000, -0.250000) (1.000000, 0.000000)");
    }

    #[test]
    fn test_log_full_run() {
        let dir = tempdir().unwrap();
        let ga = GaConfig {
            population_size: 10,
            generations: 15,
            ..Default::default()
        };

        let (mut log, path) =
            GenerationLog::create_in(dir.path().join("logs"), &problem(), &ga).unwrap();
        run_single(&problem(), &ga, |snapshot| log.record(snapshot)).unwrap();
        assert_eq!(log.lines_written(), 16);
        log.finish().unwrap();

        assert!(path.ends_with("polar_n3_gen15.txt"));
        let text = fs::read_to_string(&path).unwrap();
        let gen_lines: Vec<&str> = text.lines().filter(|l| l.starts_with("Gen ")).collect();
        assert_eq!(gen_lines.len(), 16);
        assert!(gen_lines[15].starts_with("Gen 15: ("));
        assert_eq!(gen_lines[15].matches('(').count(), 3);
    }
}
