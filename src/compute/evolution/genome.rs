//! Genome representations and variation operators.
//!
//! Each representation knows how to draw a feasible gene, how to decode a gene
//! to Cartesian coordinates, and how far apart two genes are in its native
//! coordinates. Initialization and mutation are built from the gene sampler,
//! so every genome they return is feasible by construction.

use std::f64::consts::TAU;
use std::fmt::Debug;

use rand::prelude::*;

use crate::schema::{
    CartesianPoint, PolarPoint, RepresentationKind, angle_to_cartesian, is_canonical_angle,
};

use super::fitness::{FitnessError, cartesian_distance, min_pairwise_distance, polar_distance};

/// Per-gene swap probability of uniform crossover.
pub const UNIFORM_CROSSOVER_SWAP_PROB: f64 = 0.5;

/// Random number generator wrapper for genome operations.
pub struct GenomeRng {
    rng: StdRng,
}

impl GenomeRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform random in inclusive bounds.
    pub fn uniform(&mut self, bounds: (f64, f64)) -> f64 {
        self.rng.gen_range(bounds.0..=bounds.1)
    }

    /// Uniform angle in `[0, 2π)`.
    pub fn angle(&mut self) -> f64 {
        self.rng.gen_range(0.0..TAU)
    }

    /// Bernoulli trial with probability `p` in `[0, 1]`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.gen_bool(p)
    }

    /// Uniform index in `0..len`.
    pub fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    /// Uniform crossover: swap the genes at each position with probability
    /// [`UNIFORM_CROSSOVER_SWAP_PROB`]. Returns two new genomes.
    pub fn uniform_crossover<G: Copy>(&mut self, parent1: &[G], parent2: &[G]) -> (Vec<G>, Vec<G>) {
        let mut child1 = parent1.to_vec();
        let mut child2 = parent2.to_vec();

        for (a, b) in child1.iter_mut().zip(child2.iter_mut()) {
            if self.chance(UNIFORM_CROSSOVER_SWAP_PROB) {
                std::mem::swap(a, b);
            }
        }

        (child1, child2)
    }
}

/// A coordinate scheme for point genomes.
pub trait Representation: Send + Sync {
    /// One point in native coordinates.
    type Gene: Copy + Debug + PartialEq + Send + Sync;

    fn kind(&self) -> RepresentationKind;

    /// Draw one feasible gene.
    fn sample_gene(&self, rng: &mut GenomeRng) -> Self::Gene;

    /// Feasibility invariant of a gene.
    fn is_feasible(&self, gene: &Self::Gene) -> bool;

    /// Canonical `(x, y)` coordinates of a gene.
    fn decode_gene(&self, gene: &Self::Gene) -> CartesianPoint;

    /// Euclidean distance between two genes in native coordinates.
    fn distance(&self, a: &Self::Gene, b: &Self::Gene) -> f64;

    /// Genome of `n` independently drawn genes.
    fn initialize(&self, n: usize, rng: &mut GenomeRng) -> Vec<Self::Gene> {
        (0..n).map(|_| self.sample_gene(rng)).collect()
    }

    /// Copy of `genes` with each gene redrawn with probability `indpb`.
    fn mutate(&self, genes: &[Self::Gene], indpb: f64, rng: &mut GenomeRng) -> Vec<Self::Gene> {
        genes
            .iter()
            .map(|gene| {
                if rng.chance(indpb) {
                    self.sample_gene(rng)
                } else {
                    *gene
                }
            })
            .collect()
    }

    fn decode(&self, genes: &[Self::Gene]) -> Vec<CartesianPoint> {
        genes.iter().map(|g| self.decode_gene(g)).collect()
    }

    /// Minimum pairwise distance of the genome.
    fn fitness(&self, genes: &[Self::Gene]) -> Result<f64, FitnessError> {
        min_pairwise_distance(genes, |a, b| self.distance(a, b))
    }
}

/// Free points inside the unit disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cartesian;

impl Representation for Cartesian {
    type Gene = CartesianPoint;

    fn kind(&self) -> RepresentationKind {
        RepresentationKind::Cartesian
    }

    /// Rejection sampling from `[-1, 1]²` against the disk.
    fn sample_gene(&self, rng: &mut GenomeRng) -> CartesianPoint {
        loop {
            let point = CartesianPoint::new(rng.uniform((-1.0, 1.0)), rng.uniform((-1.0, 1.0)));
            if point.in_unit_disk() {
                return point;
            }
        }
    }

    fn is_feasible(&self, gene: &CartesianPoint) -> bool {
        gene.in_unit_disk()
    }

    fn decode_gene(&self, gene: &CartesianPoint) -> CartesianPoint {
        *gene
    }

    fn distance(&self, a: &CartesianPoint, b: &CartesianPoint) -> f64 {
        cartesian_distance(a, b)
    }
}

/// Radius and angle.
///
/// The radius is drawn uniformly, not as `sqrt(U)`, so samples are denser
/// near the center than a uniform-by-area draw.
#[derive(Debug, Clone, Copy, Default)]
pub struct Polar;

impl Representation for Polar {
    type Gene = PolarPoint;

    fn kind(&self) -> RepresentationKind {
        RepresentationKind::Polar
    }

    fn sample_gene(&self, rng: &mut GenomeRng) -> PolarPoint {
        let r = rng.uniform((0.0, 1.0));
        let theta = rng.angle();
        PolarPoint::new(r, theta)
    }

    fn is_feasible(&self, gene: &PolarPoint) -> bool {
        gene.is_feasible()
    }

    fn decode_gene(&self, gene: &PolarPoint) -> CartesianPoint {
        gene.to_cartesian()
    }

    fn distance(&self, a: &PolarPoint, b: &PolarPoint) -> f64 {
        polar_distance(a.r, a.theta, b.r, b.theta)
    }
}

/// Angles on the unit circle.
#[derive(Debug, Clone, Copy, Default)]
pub struct Boundary;

impl Representation for Boundary {
    type Gene = f64;

    fn kind(&self) -> RepresentationKind {
        RepresentationKind::Boundary
    }

    fn sample_gene(&self, rng: &mut GenomeRng) -> f64 {
        rng.angle()
    }

    fn is_feasible(&self, gene: &f64) -> bool {
        is_canonical_angle(*gene)
    }

    fn decode_gene(&self, gene: &f64) -> CartesianPoint {
        angle_to_cartesian(*gene)
    }

    fn distance(&self, a: &f64, b: &f64) -> f64 {
        polar_distance(1.0, *a, 1.0, *b)
    }
}

/// A genome with its cached fitness.
///
/// The genes are never modified after construction; variation builds a new
/// individual, which starts without a fitness.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual<G> {
    genes: Vec<G>,
    fitness: Option<f64>,
}

impl<G> Individual<G> {
    /// New, unevaluated individual.
    pub fn new(genes: Vec<G>) -> Self {
        Self {
            genes,
            fitness: None,
        }
    }

    /// Genes in native coordinates.
    pub fn genes(&self) -> &[G] {
        &self.genes
    }

    /// Number of points in the genome.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Whether the genome has no points.
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Cached fitness, `None` until evaluated.
    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    /// Whether a fitness has been cached.
    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    pub(crate) fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn all_feasible<R: Representation>(repr: &R, genes: &[R::Gene]) -> bool {
        genes.iter().all(|g| repr.is_feasible(g))
    }

    #[test]
    fn test_initialize_length() {
        let mut rng = GenomeRng::new(7);
        assert_eq!(Cartesian.initialize(12, &mut rng).len(), 12);
        assert_eq!(Polar.initialize(3, &mut rng).len(), 3);
        assert_eq!(Boundary.initialize(0, &mut rng).len(), 0);
    }

    #[test]
    fn test_mutate_zero_probability_is_identity() {
        let mut rng = GenomeRng::new(1);
        let genes = Polar.initialize(10, &mut rng);
        assert_eq!(Polar.mutate(&genes, 0.0, &mut rng), genes);
    }

    #[test]
    fn test_mutate_full_probability_redraws_all() {
        let mut rng = GenomeRng::new(2);
        let genes = Boundary.initialize(10, &mut rng);
        let mutated = Boundary.mutate(&genes, 1.0, &mut rng);

        assert_eq!(mutated.len(), genes.len());
        assert!(mutated.iter().zip(&genes).all(|(a, b)| a != b));
    }

    #[test]
    fn test_uniform_crossover_preserves_genes_per_position() {
        let mut rng = GenomeRng::new(3);
        let a: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let b: Vec<f64> = (0..50).map(|i| -(i as f64) - 1.0).collect();
        let (c1, c2) = rng.uniform_crossover(&a, &b);

        for i in 0..a.len() {
            let swapped = c1[i] == b[i] && c2[i] == a[i];
            let kept = c1[i] == a[i] && c2[i] == b[i];
            assert!(swapped || kept, "position {i}");
        }
        // With 50 fair coin flips, both outcomes occur
        assert!(c1.iter().zip(&a).any(|(x, y)| x != y));
        assert!(c1.iter().zip(&a).any(|(x, y)| x == y));
    }

    #[test]
    fn test_individual_starts_unevaluated() {
        let mut ind = Individual::new(vec![0.0, 1.0]);
        assert!(!ind.is_evaluated());
        ind.set_fitness(0.5);
        assert_eq!(ind.fitness(), Some(0.5));
        assert_eq!(ind.len(), 2);
    }

    #[test]
    fn test_decode_boundary_on_circle() {
        let mut rng = GenomeRng::new(4);
        let genes = Boundary.initialize(20, &mut rng);
        for p in Boundary.decode(&genes) {
            assert!((p.x.hypot(p.y) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_same_seed_same_genome() {
        let a = Cartesian.initialize(8, &mut GenomeRng::new(99));
        let b = Cartesian.initialize(8, &mut GenomeRng::new(99));
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_cartesian_feasible(seed in any::<u64>(), n in 1usize..40, indpb in 0.0f64..=1.0) {
            let mut rng = GenomeRng::new(seed);
            let genes = Cartesian.initialize(n, &mut rng);
            prop_assert!(all_feasible(&Cartesian, &genes));
            let mutated = Cartesian.mutate(&genes, indpb, &mut rng);
            prop_assert!(all_feasible(&Cartesian, &mutated));
        }

        #[test]
        fn prop_polar_feasible(seed in any::<u64>(), n in 1usize..40, indpb in 0.0f64..=1.0) {
            let mut rng = GenomeRng::new(seed);
            let genes = Polar.initialize(n, &mut rng);
            prop_assert!(all_feasible(&Polar, &genes));
            let mutated = Polar.mutate(&genes, indpb, &mut rng);
            prop_assert!(all_feasible(&Polar, &mutated));
        }

        #[test]
        fn prop_boundary_feasible(seed in any::<u64>(), n in 1usize..40, indpb in 0.0f64..=1.0) {
            let mut rng = GenomeRng::new(seed);
            let genes = Boundary.initialize(n, &mut rng);
            prop_assert!(all_feasible(&Boundary, &genes));
            let mutated = Boundary.mutate(&genes, indpb, &mut rng);
            prop_assert!(all_feasible(&Boundary, &mutated));
        }
    }
}
