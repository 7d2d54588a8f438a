//! Genetic operators on weight sets.
//!
//! A [`WeightSet`] is treated as a flat genome of [`GENE_COUNT`] coefficients
//! (8 features for each of the 3 phases, see [`WeightSet::to_genes`]). Operators
//! work on that genome and rebuild a weight set with [`WeightSet::from_genes`],
//! which restores unit length for every phase.
//!
//! # Operations
//!
//! - **Initialization**: [`random_vector`] / [`random_set`] draw raw coefficients
//!   uniformly from `[-0.5, 0.5)` before normalization
//! - **Crossover**: [`uniform_crossover`] takes each gene from either parent with
//!   probability 0.5
//! - **Mutation**: [`mutate`] adds a jitter from `[0, amount)` to each gene with
//!   probability `rate`
//!
//! Jitter is always non-negative; normalization afterwards is what lets a gene
//! effectively shrink relative to the others.

use oxello_evaluator::weight_set::{FEATURE_COUNT, GENE_COUNT, WeightSet, WeightVector};
use rand::Rng;
use rand_distr::Uniform;

const INITIAL_RANGE: std::ops::Range<f32> = -0.5..0.5;

/// Builds a genome by applying `f` to each gene index.
///
/// # Examples
///
/// ```
/// use oxello_training::weights;
///
/// let genes = weights::from_fn(|i| if i < 8 { 1.0 } else { 0.0 });
/// assert_eq!(genes[0], 1.0);
/// assert_eq!(genes[23], 0.0);
/// ```
pub fn from_fn<F>(f: F) -> [f32; GENE_COUNT]
where
    F: FnMut(usize) -> f32,
{
    std::array::from_fn(f)
}

/// A random unit-length weight vector.
pub fn random_vector<R>(rng: &mut R) -> WeightVector
where
    R: Rng + ?Sized,
{
    let raw: [f32; FEATURE_COUNT] = std::array::from_fn(|_| rng.random_range(INITIAL_RANGE));
    WeightVector::new(raw)
}

/// A random weight set with an independent vector per phase.
pub fn random_set<R>(rng: &mut R) -> WeightSet
where
    R: Rng + ?Sized,
{
    let opening = random_vector(rng);
    let midgame = random_vector(rng);
    let endgame = random_vector(rng);
    WeightSet::new(opening, midgame, endgame)
}

/// Uniform crossover: every gene comes from `p1` or `p2` with equal probability.
///
/// The child is renormalized per phase.
pub fn uniform_crossover<R>(p1: &WeightSet, p2: &WeightSet, rng: &mut R) -> WeightSet
where
    R: Rng + ?Sized,
{
    let g1 = p1.to_genes();
    let g2 = p2.to_genes();
    let child = from_fn(|i| if rng.random_bool(0.5) { g1[i] } else { g2[i] });
    WeightSet::from_genes(&child)
}

/// Adds a jitter drawn from `[0, amount)` to each gene with probability `rate`.
///
/// Rates at or above 1 mutate every gene. A non-positive `amount` leaves the
/// genes unchanged.
pub fn mutate<R>(genes: &mut [f32], rate: f32, amount: f32, rng: &mut R)
where
    R: Rng + ?Sized,
{
    let Ok(jitter) = Uniform::new(0.0, amount) else {
        return;
    };
    let probability = f64::from(rate).clamp(0.0, 1.0);
    for gene in genes {
        if rng.random_bool(probability) {
            *gene += rng.sample(jitter);
        }
    }
}

/// Crossover followed by mutation, producing a renormalized child.
pub fn breed<R>(p1: &WeightSet, p2: &WeightSet, rate: f32, amount: f32, rng: &mut R) -> WeightSet
where
    R: Rng + ?Sized,
{
    let mut genes = uniform_crossover(p1, p2, rng).to_genes();
    mutate(&mut genes, rate, amount, rng);
    WeightSet::from_genes(&genes)
}

#[cfg(test)]
mod tests {
    use oxello_evaluator::weight_set::Phase;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    use super::*;

    const TOLERANCE: f32 = 1e-5;

    fn assert_unit(set: &WeightSet) {
        for phase in Phase::ALL {
            let length = set.for_phase(phase).length();
            assert!((length - 1.0).abs() < TOLERANCE, "{phase:?}: {length}");
        }
    }

    #[test]
    fn test_random_set_is_unit_length() {
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        for _ in 0..100 {
            assert_unit(&random_set(&mut rng));
        }
    }

    #[test]
    fn test_random_vectors_differ() {
        let mut rng = Pcg64Mcg::seed_from_u64(2);
        let set = random_set(&mut rng);
        assert_ne!(set.opening, set.midgame);
        assert_ne!(set.midgame, set.endgame);
    }

    #[test]
    fn test_crossover_takes_genes_from_parents() {
        let mut rng = Pcg64Mcg::seed_from_u64(3);
        let p1 = WeightSet::uniform(WeightVector::new([1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]));
        let p2 = WeightSet::uniform(WeightVector::new([0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]));
        for _ in 0..50 {
            // A phase may pick both zero genes; that phase stays zero.
            let child = uniform_crossover(&p1, &p2, &mut rng);
            for phase in Phase::ALL {
                let coefficients = child.for_phase(phase).coefficients();
                assert!(coefficients[2..].iter().all(|&c| c == 0.0));
                assert!(coefficients[0] >= 0.0 && coefficients[1] >= 0.0);
            }
        }
    }

    #[test]
    fn test_crossover_of_identical_parents() {
        let mut rng = Pcg64Mcg::seed_from_u64(4);
        let parent = random_set(&mut rng);
        let child = uniform_crossover(&parent, &parent, &mut rng);
        for (a, b) in child.to_genes().iter().zip(parent.to_genes()) {
            assert!((a - b).abs() < TOLERANCE);
        }
    }

    #[test]
    fn test_mutate_rate_bounds() {
        let mut rng = Pcg64Mcg::seed_from_u64(5);
        let original = [0.25; GENE_COUNT];

        let mut genes = original;
        mutate(&mut genes, 0.0, 0.05, &mut rng);
        assert_eq!(genes, original);

        let mut genes = original;
        mutate(&mut genes, 1.0, 0.05, &mut rng);
        for gene in genes {
            assert!((0.25..0.30).contains(&gene), "{gene}");
        }

        let mut genes = original;
        mutate(&mut genes, 1.0, 0.0, &mut rng);
        assert_eq!(genes, original);

        // rates above 1 behave like 1
        let mut genes = original;
        mutate(&mut genes, 2.0, 0.05, &mut rng);
        assert!(genes.iter().all(|gene| (0.25..0.30).contains(gene)));
        assert_ne!(genes, original);
    }

    #[test]
    fn test_breed_is_unit_length() {
        let mut rng = Pcg64Mcg::seed_from_u64(6);
        for _ in 0..100 {
            let p1 = random_set(&mut rng);
            let p2 = random_set(&mut rng);
            assert_unit(&breed(&p1, &p2, 0.3, 0.05, &mut rng));
        }
    }
}
