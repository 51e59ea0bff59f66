//! Fitness evaluation: minimum pairwise distance between points.

use std::sync::atomic::{AtomicU64, Ordering};

use rayon::prelude::*;

use crate::schema::CartesianPoint;

use super::genome::{Individual, Representation};

/// Fitness evaluation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FitnessError {
    #[error("Fitness needs at least 2 points, got {points}")]
    InvalidInput { points: usize },
}

/// `sqrt((x_i - x_j)² + (y_i - y_j)²)`.
pub fn cartesian_distance(a: &CartesianPoint, b: &CartesianPoint) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Law of cosines: `sqrt(r1² + r2² - 2 r1 r2 cos(θ1 - θ2))`.
///
/// The radicand is clamped at zero; rounding makes it slightly negative for
/// near-coincident points.
pub fn polar_distance(r1: f64, theta1: f64, r2: f64, theta2: f64) -> f64 {
    let d2 = r1 * r1 + r2 * r2 - 2.0 * r1 * r2 * (theta1 - theta2).cos();
    d2.max(0.0).sqrt()
}

/// Minimum of `distance` over all unordered pairs `i < j`.
pub fn min_pairwise_distance<G, F>(points: &[G], distance: F) -> Result<f64, FitnessError>
where
    F: Fn(&G, &G) -> f64,
{
    if points.len() < 2 {
        return Err(FitnessError::InvalidInput {
            points: points.len(),
        });
    }

    let mut min_dist = f64::INFINITY;
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            let d = distance(a, b);
            if d < min_dist {
                min_dist = d;
            }
        }
    }

    Ok(min_dist)
}

/// Minimum pairwise distance of already-decoded points.
pub fn min_cartesian_distance(points: &[CartesianPoint]) -> Result<f64, FitnessError> {
    min_pairwise_distance(points, cartesian_distance)
}

/// Evaluates individuals whose fitness is not cached.
pub struct FitnessEvaluator<'a, R: Representation> {
    representation: &'a R,
    evaluations: AtomicU64,
}

impl<'a, R: Representation> FitnessEvaluator<'a, R> {
    /// Create a new fitness evaluator.
    pub fn new(representation: &'a R) -> Self {
        Self {
            representation,
            evaluations: AtomicU64::new(0),
        }
    }

    /// Score a single genome.
    pub fn evaluate(&self, genes: &[R::Gene]) -> Result<f64, FitnessError> {
        self.evaluations.fetch_add(1, Ordering::Relaxed);
        self.representation.fitness(genes)
    }

    /// Evaluate every individual without a cached fitness, in parallel.
    ///
    /// Returns how many individuals were evaluated.
    pub fn evaluate_invalid(
        &self,
        population: &mut [Individual<R::Gene>],
    ) -> Result<usize, FitnessError> {
        let before = self.evaluations();

        population
            .par_iter_mut()
            .filter(|ind| !ind.is_evaluated())
            .try_for_each(|ind| {
                let fitness = self.evaluate(ind.genes())?;
                ind.set_fitness(fitness);
                Ok::<(), FitnessError>(())
            })?;

        Ok((self.evaluations() - before) as usize)
    }

    /// Total evaluations performed so far.
    pub fn evaluations(&self) -> u64 {
        self.evaluations.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::evolution::{Boundary, Cartesian, GenomeRng, Polar};
    use crate::schema::PolarPoint;
    use proptest::prelude::*;
    use std::f64::consts::PI;

    #[test]
    fn test_antipodal_pair() {
        let points = [CartesianPoint::new(-1.0, 0.0), CartesianPoint::new(1.0, 0.0)];
        assert_eq!(min_cartesian_distance(&points), Ok(2.0));
        assert!((Boundary.fitness(&[0.0, PI]).unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_all_pairs_scanned() {
        // The closest pair is the last one; stopping after the first pair would miss it
        let points = [
            CartesianPoint::new(0.0, 0.0),
            CartesianPoint::new(1.0, 0.0),
            CartesianPoint::new(0.0, 1.0),
            CartesianPoint::new(0.0, 0.9),
        ];
        let d = min_cartesian_distance(&points).unwrap();
        assert!((d - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_too_few_points() {
        assert_eq!(
            min_cartesian_distance(&[CartesianPoint::new(0.0, 0.0)]),
            Err(FitnessError::InvalidInput { points: 1 })
        );
        assert_eq!(
            Polar.fitness(&[]),
            Err(FitnessError::InvalidInput { points: 0 })
        );
    }

    #[test]
    fn test_polar_distance_clamped() {
        // Near-coincident points whose radicand rounds below zero
        let (r1, t1): (f64, f64) = (0.541_412_472_793_496_6, 5.814_243_901_764_597);
        let (r2, t2): (f64, f64) = (0.541_412_472_793_495_9, 5.814_243_901_765_322);
        let radicand = r1 * r1 + r2 * r2 - 2.0 * r1 * r2 * (t1 - t2).cos();

        let d = polar_distance(r1, t1, r2, t2);
        assert!(!d.is_nan());
        assert!(d < 1e-6);
        if radicand < 0.0 {
            assert_eq!(d, 0.0);
        }
        assert_eq!(polar_distance(1.0, 0.3, 1.0, 0.3), 0.0);
    }

    #[test]
    fn test_evaluator_skips_cached() {
        let mut rng = GenomeRng::new(5);
        let evaluator = FitnessEvaluator::new(&Cartesian);
        let mut population: Vec<_> = (0..6)
            .map(|_| Individual::new(Cartesian.initialize(4, &mut rng)))
            .collect();

        assert_eq!(evaluator.evaluate_invalid(&mut population), Ok(6));
        assert_eq!(evaluator.evaluate_invalid(&mut population), Ok(0));
        assert!(population.iter().all(|ind| ind.is_evaluated()));

        population[2] = Individual::new(Cartesian.initialize(4, &mut rng));
        assert_eq!(evaluator.evaluate_invalid(&mut population), Ok(1));
        assert_eq!(evaluator.evaluations(), 7);
    }

    #[test]
    fn test_evaluator_surfaces_invalid_input() {
        let evaluator = FitnessEvaluator::new(&Boundary);
        let mut population = vec![Individual::new(vec![0.5])];
        assert_eq!(
            evaluator.evaluate_invalid(&mut population),
            Err(FitnessError::InvalidInput { points: 1 })
        );
    }

    proptest! {
        #[test]
        fn prop_fitness_order_invariant(seed in any::<u64>(), n in 2usize..30) {
            let mut rng = GenomeRng::new(seed);
            let genes = Polar.initialize(n, &mut rng);
            let mut reversed = genes.clone();
            reversed.reverse();
            prop_assert_eq!(Polar.fitness(&genes).unwrap(), Polar.fitness(&reversed).unwrap());

            let points = Cartesian.initialize(n, &mut rng);
            let mut reversed = points.clone();
            reversed.reverse();
            prop_assert_eq!(Cartesian.fitness(&points).unwrap(), Cartesian.fitness(&reversed).unwrap());

            let angles = Boundary.initialize(n, &mut rng);
            let mut reversed = angles.clone();
            reversed.reverse();
            prop_assert_eq!(Boundary.fitness(&angles).unwrap(), Boundary.fitness(&reversed).unwrap());
        }

        #[test]
        fn prop_fitness_finite_non_negative(seed in any::<u64>(), n in 2usize..30) {
            let mut rng = GenomeRng::new(seed);
            for f in [
                Cartesian.fitness(&Cartesian.initialize(n, &mut rng)).unwrap(),
                Polar.fitness(&Polar.initialize(n, &mut rng)).unwrap(),
                Boundary.fitness(&Boundary.initialize(n, &mut rng)).unwrap(),
            ] {
                prop_assert!(f.is_finite());
                prop_assert!(f >= 0.0);
            }
        }

        #[test]
        fn prop_native_matches_decoded(seed in any::<u64>(), n in 2usize..30) {
            let mut rng = GenomeRng::new(seed);

            let polar = Polar.initialize(n, &mut rng);
            let native = Polar.fitness(&polar).unwrap();
            let decoded = min_cartesian_distance(&Polar.decode(&polar)).unwrap();
            prop_assert!((native - decoded).abs() < 1e-9);

            let angles = Boundary.initialize(n, &mut rng);
            let native = Boundary.fitness(&angles).unwrap();
            let decoded = min_cartesian_distance(&Boundary.decode(&angles)).unwrap();
            prop_assert!((native - decoded).abs() < 1e-9);
        }

        #[test]
        fn prop_polar_distance_matches_cartesian(
            r1 in 0.0f64..=1.0, t1 in 0.0f64..6.28, r2 in 0.0f64..=1.0, t2 in 0.0f64..6.28
        ) {
            let a = PolarPoint::new(r1, t1);
            let b = PolarPoint::new(r2, t2);
            let expected = cartesian_distance(&a.to_cartesian(), &b.to_cartesian());
            prop_assert!((polar_distance(r1, t1, r2, t2) - expected).abs() < 1e-9);
        }
    }
}
