//! Point scattering CLI - compare representations on the max-min distance problem.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use point_scatter::{
    compute::evolution::{Experiment, run_single},
    report::{GenerationLog, format_experiment_summary, format_run_summary, save_json},
    schema::{ExperimentConfig, RepresentationKind},
};

/// Parsed command line.
struct CliOptions {
    config: ExperimentConfig,
    representations: Vec<RepresentationKind>,
    output: PathBuf,
    experiment: bool,
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("point-scatter");

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage(program);
        return;
    }

    if args.iter().any(|a| a == "--example") {
        print_example_config();
        return;
    }

    let options = parse_args(&args[1..]).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        eprintln!();
        print_usage(program);
        std::process::exit(1);
    });

    let logs_dir = options.output.join("logs");
    let results_dir = options.output.join("results");

    for representation in &options.representations {
        let mut config = options.config.clone();
        config.problem.representation = *representation;

        println!("===== {} =====", representation.label());
        println!();

        let start = Instant::now();
        if options.experiment {
            let experiment = Experiment::new(config.clone()).unwrap_or_else(|e| {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            });

            let result = experiment.run().unwrap_or_else(|e| {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            });

            print!("{}", format_experiment_summary(&result));

            let path = results_dir.join(format!(
                "{}_n{}_experiment.json",
                representation, config.problem.point_count
            ));
            if let Err(e) = save_json(&path, &result) {
                eprintln!("Error writing {}: {}", path.display(), e);
                std::process::exit(1);
            }
            println!("  Results: {}", path.display());
        } else {
            let (mut log, log_path) =
                GenerationLog::create_in(&logs_dir, &config.problem, &config.ga).unwrap_or_else(
                    |e| {
                        eprintln!("Error creating log in {}: {}", logs_dir.display(), e);
                        std::process::exit(1);
                    },
                );

            let result = run_single(&config.problem, &config.ga, |snapshot| log.record(snapshot))
                .unwrap_or_else(|e| {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                });

            if let Err(e) = log.finish() {
                eprintln!("Error writing {}: {}", log_path.display(), e);
                std::process::exit(1);
            }

            print!("{}", format_run_summary(&result));

            let path = results_dir.join(format!(
                "{}_n{}_run.json",
                representation, config.problem.point_count
            ));
            if let Err(e) = save_json(&path, &result) {
                eprintln!("Error writing {}: {}", path.display(), e);
                std::process::exit(1);
            }
            println!("  Log: {}", log_path.display());
        }

        println!("  Time: {:.2}s", start.elapsed().as_secs_f32());
        println!();
    }
}

fn parse_args(args: &[String]) -> Result<CliOptions, String> {
    let mut pairs = Vec::new();
    let mut experiment_switch = false;
    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        if !flag.starts_with("--") {
            return Err(format!("Unexpected argument: {}", flag));
        }
        if flag == "--experiment" {
            experiment_switch = true;
            continue;
        }
        let value = iter
            .next()
            .ok_or_else(|| format!("Missing value for {}", flag))?;
        pairs.push((flag.as_str(), value.as_str()));
    }

    // Config file first so that flags override it
    let mut config = match pairs.iter().find(|(flag, _)| *flag == "--config") {
        Some((_, path)) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("Error reading config file {}: {}", path, e))?;
            serde_json::from_str::<ExperimentConfig>(&text)
                .map_err(|e| format!("Error parsing config: {}", e))?
        }
        None => ExperimentConfig::default(),
    };

    let mut representations = vec![config.problem.representation];
    let mut all_representations = pairs.iter().all(|(flag, _)| *flag != "--config");
    let mut output = PathBuf::from(".");

    for (flag, value) in &pairs {
        match *flag {
            "--config" => {}
            "--n" => config.problem.point_count = parse_value(flag, value)?,
            "--indpb" => config.ga.gene_mutation_rate = parse_value(flag, value)?,
            "--seed" => config.ga.seed = parse_value(flag, value)?,
            "--population" => config.ga.population_size = parse_value(flag, value)?,
            "--generations" => config.ga.generations = parse_value(flag, value)?,
            "--cxpb" => config.ga.crossover_rate = parse_value(flag, value)?,
            "--mutpb" => config.ga.mutation_rate = parse_value(flag, value)?,
            "--tournament" => config.ga.tournament_size = parse_value(flag, value)?,
            "--runs" => config.runs = Some(parse_value(flag, value)?),
            "--seed-base" => config.seed_base = parse_value(flag, value)?,
            "--output" => output = PathBuf::from(value),
            "--representation" => {
                if value.eq_ignore_ascii_case("all") {
                    all_representations = true;
                } else {
                    let kind: RepresentationKind = value.parse().map_err(|e| format!("{}", e))?;
                    representations = vec![kind];
                    all_representations = false;
                }
            }
            other => return Err(format!("Unknown option: {}", other)),
        }
    }

    if all_representations {
        representations = RepresentationKind::ALL.to_vec();
    }

    // Without --runs, --experiment uses each representation's default run count
    let experiment = experiment_switch || config.runs.is_some_and(|runs| runs > 1);

    // Fail fast before any run starts
    config.problem.validate().map_err(|e| e.to_string())?;
    config.ga.validate().map_err(|e| e.to_string())?;

    Ok(CliOptions {
        config,
        representations,
        output,
        experiment,
    })
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("Invalid value for {}: {}", flag, value))
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [options]", program);
    eprintln!();
    eprintln!("Evolve n points in the unit disk to maximize their minimum distance.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --n N                 Number of points (default: 5)");
    eprintln!("  --indpb P             Per-gene mutation probability (default: 0.2)");
    eprintln!("  --seed S              Random seed for single runs (default: 42)");
    eprintln!("  --representation R    cartesian, polar, boundary or all (default: all)");
    eprintln!("  --population N        Population size (default: 200)");
    eprintln!("  --generations N       Generations (default: 200)");
    eprintln!("  --cxpb P              Crossover probability (default: 0.7)");
    eprintln!("  --mutpb P             Mutation probability (default: 0.2)");
    eprintln!("  --tournament K        Tournament size (default: 3)");
    eprintln!("  --runs K              Independent runs; K >= 2 aggregates statistics");
    eprintln!("  --experiment          Aggregate runs even without --runs (default counts:");
    eprintln!("                        cartesian 25, polar 25, boundary 50)");
    eprintln!("  --seed-base S         Seed of run 0 in an experiment (default: 12345)");
    eprintln!("  --output DIR          Output directory for logs/ and results/ (default: .)");
    eprintln!("  --config FILE         JSON experiment configuration");
    eprintln!("  --example             Print an example configuration");
}

fn print_example_config() {
    let config = ExperimentConfig {
        runs: Some(25),
        ..Default::default()
    };

    println!("Example configuration (experiment.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing config: {}", e),
    }
}
