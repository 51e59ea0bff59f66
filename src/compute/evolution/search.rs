//! Generational genetic algorithm over point genomes.

use log::debug;

use crate::schema::{
    ConfigError, EvolutionHistory, EvolutionPhase, GaConfig, GenerationSnapshot, ProblemConfig,
    RepresentationKind, RunResult,
};

use super::fitness::{FitnessError, FitnessEvaluator};
use super::genome::{Boundary, Cartesian, GenomeRng, Individual, Polar, Representation};

/// Errors surfaced by a run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvolutionError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Fitness evaluation failed: {0}")]
    Fitness(#[from] FitnessError),
    #[error("Engine stepped before initialize()")]
    NotInitialized,
}

/// Evolution engine for one run with a fixed representation.
///
/// Each generation: tournament selection of a full offspring pool, uniform
/// crossover of consecutive pairs, per-individual mutation, evaluation of the
/// individuals whose genome changed, then full replacement of the population.
pub struct EvolutionEngine<'a, R: Representation> {
    representation: &'a R,
    point_count: usize,
    config: GaConfig,
    rng: GenomeRng,
    evaluator: FitnessEvaluator<'a, R>,
    population: Vec<Individual<R::Gene>>,
    history: EvolutionHistory,
    generation: usize,
    phase: EvolutionPhase,
    best: Option<(Individual<R::Gene>, usize)>,
}

impl<'a, R: Representation> EvolutionEngine<'a, R> {
    /// Create a new evolution engine.
    pub fn new(
        representation: &'a R,
        point_count: usize,
        config: GaConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if point_count == 0 {
            return Err(ConfigError::InvalidPointCount);
        }

        Ok(Self {
            representation,
            point_count,
            rng: GenomeRng::new(config.seed),
            config,
            evaluator: FitnessEvaluator::new(representation),
            population: Vec::new(),
            history: EvolutionHistory::default(),
            generation: 0,
            phase: EvolutionPhase::Initializing,
            best: None,
        })
    }

    /// Current phase of the generation cycle.
    pub fn phase(&self) -> EvolutionPhase {
        self.phase
    }

    /// Index of the last recorded generation.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Current population.
    pub fn population(&self) -> &[Individual<R::Gene>] {
        &self.population
    }

    /// Best and average fitness per recorded generation.
    pub fn history(&self) -> &EvolutionHistory {
        &self.history
    }

    /// Fitness evaluations performed so far.
    pub fn evaluations(&self) -> u64 {
        self.evaluator.evaluations()
    }

    /// Build and evaluate the initial population, recording generation 0.
    pub fn initialize(&mut self) -> Result<GenerationSnapshot, EvolutionError> {
        self.phase = EvolutionPhase::Initializing;
        self.generation = 0;
        self.history = EvolutionHistory::default();
        self.best = None;

        self.population = (0..self.config.population_size)
            .map(|_| {
                Individual::new(
                    self.representation
                        .initialize(self.point_count, &mut self.rng),
                )
            })
            .collect();

        self.phase = EvolutionPhase::Evaluating;
        self.evaluator.evaluate_invalid(&mut self.population)?;

        Ok(self.record())
    }

    /// Advance one generation.
    ///
    /// Fails with [`EvolutionError::NotInitialized`] until
    /// [`initialize`](Self::initialize) has built a population.
    pub fn step(&mut self) -> Result<GenerationSnapshot, EvolutionError> {
        if self.population.is_empty() {
            return Err(EvolutionError::NotInitialized);
        }

        self.phase = EvolutionPhase::Selecting;
        let mut offspring = self.select();

        self.phase = EvolutionPhase::Varying;
        self.crossover(&mut offspring);
        self.mutate(&mut offspring);

        self.phase = EvolutionPhase::Evaluating;
        let evaluated = self.evaluator.evaluate_invalid(&mut offspring)?;

        self.phase = EvolutionPhase::Replacing;
        self.population = offspring;
        self.generation += 1;

        let snapshot = self.record();
        debug!(
            "generation {}: best={:.6} avg={:.6} evaluated={}",
            snapshot.generation, snapshot.best_fitness, snapshot.avg_fitness, evaluated
        );
        Ok(snapshot)
    }

    /// Tournament selection with replacement; ties go to the first drawn.
    fn select(&mut self) -> Vec<Individual<R::Gene>> {
        let len = self.population.len();
        (0..self.config.population_size)
            .map(|_| {
                let mut best_idx = self.rng.index(len);
                for _ in 1..self.config.tournament_size {
                    let idx = self.rng.index(len);
                    if fitness_of(&self.population[idx]) > fitness_of(&self.population[best_idx]) {
                        best_idx = idx;
                    }
                }
                self.population[best_idx].clone()
            })
            .collect()
    }

    /// Uniform crossover of pairs `(0, 1), (2, 3), ...`.
    fn crossover(&mut self, offspring: &mut [Individual<R::Gene>]) {
        for pair in offspring.chunks_exact_mut(2) {
            if self.rng.chance(self.config.crossover_rate) {
                let (child1, child2) = self
                    .rng
                    .uniform_crossover(pair[0].genes(), pair[1].genes());
                pair[0] = Individual::new(child1);
                pair[1] = Individual::new(child2);
            }
        }
    }

    fn mutate(&mut self, offspring: &mut [Individual<R::Gene>]) {
        for child in offspring.iter_mut() {
            if self.rng.chance(self.config.mutation_rate) {
                let genes = self.representation.mutate(
                    child.genes(),
                    self.config.gene_mutation_rate,
                    &mut self.rng,
                );
                *child = Individual::new(genes);
            }
        }
    }

    /// Append best/average fitness of the current population to the history.
    fn record(&mut self) -> GenerationSnapshot {
        let mut best_idx = 0;
        let mut total = 0.0;
        for (i, ind) in self.population.iter().enumerate() {
            let fitness = fitness_of(ind);
            total += fitness;
            if fitness > fitness_of(&self.population[best_idx]) {
                best_idx = i;
            }
        }

        let leader = &self.population[best_idx];
        let best_fitness = fitness_of(leader);
        let avg_fitness = total / self.population.len() as f64;

        self.history.best_fitness.push(best_fitness);
        self.history.avg_fitness.push(avg_fitness);

        let improved = self
            .best
            .as_ref()
            .is_none_or(|(ind, _)| best_fitness > fitness_of(ind));
        if improved {
            self.best = Some((leader.clone(), self.generation));
        }

        GenerationSnapshot {
            generation: self.generation,
            best_fitness,
            avg_fitness,
            best_points: self.representation.decode(leader.genes()),
        }
    }

    /// Run all generations, calling `callback` after the initial evaluation
    /// and after every generation.
    pub fn run_with_callback<F>(&mut self, mut callback: F) -> Result<RunResult, EvolutionError>
    where
        F: FnMut(&GenerationSnapshot),
    {
        callback(&self.initialize()?);

        for _ in 0..self.config.generations {
            callback(&self.step()?);
        }

        self.phase = EvolutionPhase::Done;
        Ok(self.result())
    }

    /// Run evolution (blocking).
    pub fn run(&mut self) -> Result<RunResult, EvolutionError> {
        self.run_with_callback(|_| {})
    }

    fn result(&self) -> RunResult {
        let (best_points, best_fitness, best_generation) = match &self.best {
            Some((ind, generation)) => (
                self.representation.decode(ind.genes()),
                fitness_of(ind),
                *generation,
            ),
            None => (Vec::new(), f64::NAN, 0),
        };

        RunResult {
            problem: ProblemConfig {
                point_count: self.point_count,
                representation: self.representation.kind(),
            },
            config: self.config.clone(),
            best_by_gen: self.history.best_fitness.clone(),
            avg_by_gen: self.history.avg_fitness.clone(),
            best_points,
            best_fitness,
            best_generation,
            final_best_fitness: self.history.best_fitness.last().copied().unwrap_or(f64::NAN),
            final_avg_fitness: self.history.avg_fitness.last().copied().unwrap_or(f64::NAN),
            evaluations: self.evaluator.evaluations(),
        }
    }
}

/// Cached fitness; the engine evaluates every individual before reading it.
fn fitness_of<G>(ind: &Individual<G>) -> f64 {
    ind.fitness().unwrap_or(f64::NEG_INFINITY)
}

/// Run a single search, resolving the representation once.
pub fn run_single<F>(
    problem: &ProblemConfig,
    config: &GaConfig,
    callback: F,
) -> Result<RunResult, EvolutionError>
where
    F: FnMut(&GenerationSnapshot),
{
    problem.validate()?;

    match problem.representation {
        RepresentationKind::Cartesian => {
            EvolutionEngine::new(&Cartesian, problem.point_count, config.clone())?
                .run_with_callback(callback)
        }
        RepresentationKind::Polar => {
            EvolutionEngine::new(&Polar, problem.point_count, config.clone())?
                .run_with_callback(callback)
        }
        RepresentationKind::Boundary => {
            EvolutionEngine::new(&Boundary, problem.point_count, config.clone())?
                .run_with_callback(callback)
        }
    }
}
