//! Evolutionary tuning of Othello evaluation weights.
//!
//! # How Training Works
//!
//! 1. **Population** - Random [`WeightSet`](oxello_evaluator::weight_set::WeightSet)s,
//!    each wrapped in an [`Individual`](genetic::Individual) with its own identity
//! 2. **Tournament** - Each individual plays both colors against a fixed enemy
//!    roster through [`MatchRunner`](oxello_evaluator::match_runner::MatchRunner)
//! 3. **Fitness** - Per-game stone margins, with losses penalized by the empty
//!    cells left, summed over all games
//! 4. **Selection** - Elites survive unchanged
//! 5. **Reproduction** - Uniform crossover and mutation of elite parents
//!    ([`weights`])
//! 6. **Repeat** - For a fixed number of generations
//!
//! ```text
//! EvolutionEngine
//!     ↓ pairs of weight sets
//! MatchRunner
//!     ↓ one SearchEngine per side
//! SearchEngine → position evaluator
//!     ↓ final boards
//! fitness → selection → crossover / mutation
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use oxello_evaluator::match_runner::MatchRunner;
//! use oxello_training::genetic::{EvolutionEngine, GeneticParams, NoProgress};
//! use rand::SeedableRng;
//! use rand_pcg::Pcg64Mcg;
//!
//! let rng = Pcg64Mcg::seed_from_u64(42);
//! let mut engine = EvolutionEngine::new(GeneticParams::default(), MatchRunner::default(), rng)?;
//! let enemies = engine.build_roster(&[], 4);
//! let result = engine.run(&enemies, &mut NoProgress);
//! println!("{}", result.best.weights());
//! # Ok::<(), oxello_training::genetic::InvalidParamsError>(())
//! ```
//!
//! # Current Limitations
//!
//! - **Self-referential fitness**: The enemy roster is fixed for the whole run, so
//!   fitness measures strength against that roster only
//! - **Unbounded caches**: The pairing cache grows with every new individual and is
//!   only released when the engine is dropped
//! - **Sequential outer loop**: Only the two games of one pairing run concurrently

pub mod genetic;
pub mod weights;
