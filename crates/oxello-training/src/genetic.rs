//! Evolution of weight sets through self-play tournaments.
//!
//! # Algorithm Overview
//!
//! Each generation:
//!
//! 1. **Evaluate Fitness** - Every individual plays both colors against every
//!    enemy in a fixed roster; per-game fitness (see
//!    [`game_fitness`](oxello_evaluator::match_runner::game_fitness)) is summed
//! 2. **Elite Selection** - The top `elite_count` individuals survive unchanged
//! 3. **Breeding** - Two parents are drawn uniformly, with replacement, from the
//!    elites; the child is their uniform crossover followed by mutation
//!    ([`weights::breed`])
//!
//! After the last generation the first individual of the final population (the
//! best elite of the last evaluation) is the result.
//!
//! # Pairing Cache
//!
//! Every individual carries an [`IndividualId`] assigned when it is created.
//! The two games of a pairing are cached under the ordered id pair
//! `(individual, enemy)`, so elites that survive into later generations are
//! not replayed. Identity is by id, never by weight content: two individuals
//! with equal weights are distinct opponents. Individuals never play enemies
//! sharing their id.
//!
//! # Parallelization
//!
//! The two color-swapped games of an uncached pairing run on two scoped
//! threads. Individuals and enemies are otherwise processed sequentially.

use std::{
    cmp::Ordering,
    collections::HashMap,
    fmt, thread,
    time::{Duration, Instant},
};

use oxello_engine::Color;
use oxello_evaluator::{
    match_runner::{MatchOutcome, MatchRunner},
    weight_set::{GENE_COUNT, WeightSet},
};
use oxello_stats::descriptive::DescriptiveStats;
use rand::{Rng, seq::IndexedRandom};

use crate::weights;

/// Identity of an individual or enemy for pairing bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndividualId(u64);

impl fmt::Display for IndividualId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A weight set with an identity and its last evaluated fitness.
#[derive(Debug, Clone, Copy)]
pub struct Individual {
    id: IndividualId,
    weights: WeightSet,
    fitness: f32,
}

impl Individual {
    #[must_use]
    pub fn id(&self) -> IndividualId {
        self.id
    }

    #[must_use]
    pub fn weights(&self) -> &WeightSet {
        &self.weights
    }

    /// Fitness from the most recent evaluation; `f32::MIN` before the first one.
    #[must_use]
    pub fn fitness(&self) -> f32 {
        self.fitness
    }
}

/// Individuals of one generation.
#[derive(Debug, Clone)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// The first individual; after evaluation, the fittest.
    #[must_use]
    pub fn first(&self) -> Option<&Individual> {
        self.individuals.first()
    }

    /// Stable sort by fitness, highest first.
    fn sort_by_fitness(&mut self) {
        self.individuals
            .sort_by(|a, b| b.fitness.partial_cmp(&a.fitness).unwrap_or(Ordering::Equal));
    }

    #[must_use]
    pub fn compute_fitness_stats(&self) -> Option<DescriptiveStats> {
        DescriptiveStats::new(self.individuals.iter().map(|ind| ind.fitness))
    }

    /// Statistics per gene (phase-major, see [`WeightSet::to_genes`]).
    #[must_use]
    pub fn compute_weight_stats(&self) -> Vec<DescriptiveStats> {
        let genes = self
            .individuals
            .iter()
            .map(|ind| ind.weights.to_genes())
            .collect::<Vec<_>>();
        (0..GENE_COUNT)
            .filter_map(|i| DescriptiveStats::new(genes.iter().map(|g| g[i])))
            .collect()
    }
}

/// Hyperparameters of the evolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneticParams {
    pub population_size: usize,
    pub elite_count: usize,
    pub generations: usize,
    /// Per-gene mutation probability; values above 1 act as 1.
    pub mutation_rate: f32,
    /// Upper bound (exclusive) of the non-negative mutation jitter.
    pub mutation_amount: f32,
}

impl Default for GeneticParams {
    fn default() -> Self {
        Self {
            population_size: 8,
            elite_count: 3,
            generations: 20,
            mutation_rate: 0.3,
            mutation_amount: 0.05,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
pub enum InvalidParamsError {
    #[display("population size must be positive")]
    EmptyPopulation,
    #[display("elite count must be positive")]
    NoElites,
    #[display("elite count {elite_count} exceeds population size {population_size}")]
    TooManyElites {
        elite_count: usize,
        population_size: usize,
    },
    #[display("mutation rate {rate} is negative")]
    MutationRate { rate: f32 },
    #[display("mutation amount {amount} is negative")]
    MutationAmount { amount: f32 },
}

impl GeneticParams {
    /// Checks what the algorithm needs to run: a non-empty population with at
    /// least one elite, and non-negative mutation settings. Rates above 1
    /// mutate every gene.
    pub fn validate(&self) -> Result<(), InvalidParamsError> {
        if self.population_size == 0 {
            return Err(InvalidParamsError::EmptyPopulation);
        }
        if self.elite_count == 0 {
            return Err(InvalidParamsError::NoElites);
        }
        if self.elite_count > self.population_size {
            return Err(InvalidParamsError::TooManyElites {
                elite_count: self.elite_count,
                population_size: self.population_size,
            });
        }
        if self.mutation_rate.is_nan() || self.mutation_rate < 0.0 {
            return Err(InvalidParamsError::MutationRate {
                rate: self.mutation_rate,
            });
        }
        if self.mutation_amount.is_nan() || self.mutation_amount < 0.0 {
            return Err(InvalidParamsError::MutationAmount {
                amount: self.mutation_amount,
            });
        }
        Ok(())
    }
}

/// One game of a pairing as seen from the evaluated individual.
#[derive(Debug, Clone, Copy)]
pub struct GameReport {
    pub enemy: IndividualId,
    /// Color played by the evaluated individual.
    pub color: Color,
    pub fitness: f32,
    /// The game was replayed from the pairing cache.
    pub cached: bool,
}

/// End-of-generation snapshot handed to [`ProgressReporter::generation_finished`].
#[derive(Debug)]
pub struct GenerationSummary<'a> {
    /// Zero-based generation index.
    pub generation: usize,
    /// Evaluated population, sorted by fitness.
    pub population: &'a Population,
    pub elapsed: Duration,
}

impl GenerationSummary<'_> {
    #[must_use]
    pub fn best(&self) -> Option<&Individual> {
        self.population.first()
    }
}

/// Observer of training progress. Every method defaults to doing nothing.
///
/// Reporters only observe; they cannot influence the evolution.
pub trait ProgressReporter {
    fn run_started(&mut self, _enemy_count: usize, _params: &GeneticParams) {}

    fn generation_started(&mut self, _generation: usize, _generations: usize) {}

    fn individual_started(&mut self, _generation: usize, _index: usize) {}

    fn match_played(&mut self, _report: &GameReport) {}

    fn individual_evaluated(&mut self, _index: usize, _individual: &Individual, _elapsed: Duration) {}

    fn generation_finished(&mut self, _summary: &GenerationSummary<'_>) {}
}

/// Reporter that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {}

/// Result of [`EvolutionEngine::run`].
#[derive(Debug, Clone)]
pub struct EvolutionResult {
    /// First individual of the final population.
    pub best: Individual,
    /// Final population; elites keep their last evaluated fitness, children
    /// have not been evaluated.
    pub population: Population,
    pub generations: usize,
}

/// Memo of played pairings, keyed by `(individual, enemy)` ids.
#[derive(Debug, Default)]
struct PairingCache {
    games: HashMap<(IndividualId, IndividualId), [MatchOutcome; 2]>,
}

/// Drives the generation loop.
#[derive(Debug)]
pub struct EvolutionEngine<R> {
    params: GeneticParams,
    runner: MatchRunner,
    rng: R,
    next_id: u64,
    cache: PairingCache,
}

impl<R> EvolutionEngine<R>
where
    R: Rng,
{
    /// Creates an engine after validating `params`.
    pub fn new(params: GeneticParams, runner: MatchRunner, rng: R) -> Result<Self, InvalidParamsError> {
        params.validate()?;
        Ok(Self {
            params,
            runner,
            rng,
            next_id: 0,
            cache: PairingCache::default(),
        })
    }

    #[must_use]
    pub fn params(&self) -> &GeneticParams {
        &self.params
    }

    /// Number of cached pairings.
    #[must_use]
    pub fn cached_pairings(&self) -> usize {
        self.cache.games.len()
    }

    /// Wraps `weights` in an individual with a fresh identity.
    pub fn individual(&mut self, weights: WeightSet) -> Individual {
        let id = IndividualId(self.next_id);
        self.next_id += 1;
        Individual {
            id,
            weights,
            fitness: f32::MIN,
        }
    }

    pub fn random_individual(&mut self) -> Individual {
        let weights = weights::random_set(&mut self.rng);
        self.individual(weights)
    }

    /// Builds the enemy roster from `loaded` weight sets, padded with random
    /// ones up to `enemy_count`. Extra loaded sets are kept.
    pub fn build_roster(&mut self, loaded: &[WeightSet], enemy_count: usize) -> Vec<Individual> {
        let mut roster = loaded.iter().map(|&w| self.individual(w)).collect::<Vec<_>>();
        while roster.len() < enemy_count {
            let enemy = self.random_individual();
            roster.push(enemy);
        }
        roster
    }

    /// A population of `population_size` random individuals.
    pub fn initialize_population(&mut self) -> Population {
        let individuals = (0..self.params.population_size)
            .map(|_| self.random_individual())
            .collect();
        Population { individuals }
    }

    /// Evaluates every individual against `enemies` and sorts the population
    /// by fitness, highest first.
    pub fn evaluate<P>(
        &mut self,
        generation: usize,
        population: &mut Population,
        enemies: &[Individual],
        progress: &mut P,
    ) where
        P: ProgressReporter + ?Sized,
    {
        for (index, individual) in population.individuals.iter_mut().enumerate() {
            let start = Instant::now();
            progress.individual_started(generation, index);

            let mut fitness = 0.0;
            for enemy in enemies {
                if enemy.id == individual.id {
                    continue;
                }
                let key = (individual.id, enemy.id);
                let cached = self.cache.games.contains_key(&key);
                let games = match self.cache.games.get(&key) {
                    Some(games) => {
                        log::info!("reusing games of {} vs {}", individual.id, enemy.id);
                        *games
                    }
                    None => {
                        let games = play_pairing(&self.runner, &individual.weights, &enemy.weights);
                        self.cache.games.insert(key, games);
                        games
                    }
                };

                for (game, color) in games.iter().zip(Color::ALL) {
                    let report = GameReport {
                        enemy: enemy.id,
                        color,
                        fitness: game.fitness(color),
                        cached,
                    };
                    progress.match_played(&report);
                    fitness += report.fitness;
                }
            }

            individual.fitness = fitness;
            progress.individual_evaluated(index, individual, start.elapsed());
        }

        population.sort_by_fitness();
    }

    /// The first `elite_count` individuals of an evaluated population.
    #[must_use]
    pub fn select_elites<'a>(&self, population: &'a Population) -> &'a [Individual] {
        let count = self.params.elite_count.min(population.individuals.len());
        &population.individuals[..count]
    }

    /// The next population: `elites` unchanged, then bred children up to
    /// `population_size`.
    pub fn next_generation(&mut self, elites: &[Individual]) -> Population {
        let mut individuals = elites.to_vec();
        while individuals.len() < self.params.population_size {
            let (Some(p1), Some(p2)) = (elites.choose(&mut self.rng), elites.choose(&mut self.rng)) else {
                break;
            };
            let child = weights::breed(
                &p1.weights,
                &p2.weights,
                self.params.mutation_rate,
                self.params.mutation_amount,
                &mut self.rng,
            );
            let child = self.individual(child);
            individuals.push(child);
        }
        Population { individuals }
    }

    /// Runs every generation against `enemies`.
    pub fn run<P>(&mut self, enemies: &[Individual], progress: &mut P) -> EvolutionResult
    where
        P: ProgressReporter + ?Sized,
    {
        progress.run_started(enemies.len(), &self.params);

        let generations = self.params.generations;
        let mut population = self.initialize_population();
        for generation in 0..generations {
            let start = Instant::now();
            progress.generation_started(generation, generations);

            self.evaluate(generation, &mut population, enemies, progress);
            progress.generation_finished(&GenerationSummary {
                generation,
                population: &population,
                elapsed: start.elapsed(),
            });

            let elites = self.select_elites(&population).to_vec();
            population = self.next_generation(&elites);
            log::debug!(
                "generation {} done, {} pairings cached",
                generation + 1,
                self.cache.games.len()
            );
        }

        // population_size > 0 is validated, so the population is never empty
        let best = population.individuals[0];
        EvolutionResult {
            best,
            population,
            generations,
        }
    }
}

/// Plays `individual` as black and as white against `enemy` in parallel.
///
/// Index 0 is the game with `individual` as black, index 1 as white.
fn play_pairing(runner: &MatchRunner, individual: &WeightSet, enemy: &WeightSet) -> [MatchOutcome; 2] {
    thread::scope(|s| {
        let as_black = s.spawn(|| runner.play(individual, enemy));
        let as_white = s.spawn(|| runner.play(enemy, individual));
        [as_black, as_white].map(|handle| {
            handle
                .join()
                .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
        })
    })
}
