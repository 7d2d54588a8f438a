use std::path::PathBuf;

use anyhow::Context as _;
use chrono::Utc;
use oxello_evaluator::{match_runner::MatchRunner, weight_set::Feature};
use oxello_training::genetic::{EvolutionEngine, GeneticParams};
use rand::SeedableRng as _;
use rand_pcg::Pcg64Mcg;

use super::DepthArg;
use crate::{
    model::{Roster, WeightModel},
    progress::ConsoleProgress,
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Enemy roster JSON file
    #[arg(long)]
    roster: Option<PathBuf>,
    /// Number of enemies, padded with random weights (default: from the roster)
    #[arg(long)]
    enemy_count: Option<usize>,
    #[arg(long, default_value_t = GeneticParams::default().population_size)]
    population_size: usize,
    /// Number of top performers carried into the next generation
    #[arg(long, default_value_t = GeneticParams::default().elite_count)]
    elite_count: usize,
    #[arg(long, default_value_t = GeneticParams::default().generations)]
    generations: usize,
    /// Per-gene mutation probability
    #[arg(long, default_value_t = GeneticParams::default().mutation_rate)]
    mutation_rate: f32,
    /// Upper bound of the mutation jitter
    #[arg(long, default_value_t = GeneticParams::default().mutation_amount)]
    mutation_amount: f32,
    /// Random seed (default: from the OS)
    #[arg(long)]
    seed: Option<u64>,
    #[command(flatten)]
    pub(super) depth: DepthArg,
    /// Model name stored in the output file
    #[arg(long, default_value = "reversi")]
    name: String,
    /// Output file path for the trained model (`-` for stdout)
    #[arg(long)]
    output: Option<PathBuf>,
}

impl TrainArg {
    pub(super) fn genetic_params(&self) -> GeneticParams {
        GeneticParams {
            population_size: self.population_size,
            elite_count: self.elite_count,
            generations: self.generations,
            mutation_rate: self.mutation_rate,
            mutation_amount: self.mutation_amount,
        }
    }
}

fn roster_warning(enemy_count: usize) -> Option<&'static str> {
    (enemy_count == 0).then_some(
        "no enemies to train against, every fitness will be 0 (use --roster or --enemy-count)",
    )
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    eprintln!("=== AI Weight Optimization Start ===");
    eprintln!("{}", util::now());

    let roster = match &arg.roster {
        Some(path) => Roster::open(path)?,
        None => Roster::default(),
    };
    for (i, enemy) in roster.enemies.iter().enumerate() {
        eprintln!();
        eprintln!("Enemy loaded {}", i + 1);
        eprintln!("{}", enemy.weights());
    }
    eprintln!();

    let rng = match arg.seed {
        Some(seed) => Pcg64Mcg::seed_from_u64(seed),
        None => Pcg64Mcg::from_rng(&mut rand::rng()),
    };
    let runner = MatchRunner::new(arg.depth.to_depth());
    let mut engine = EvolutionEngine::new(arg.genetic_params(), runner, rng)
        .context("Invalid training parameters")?;

    let enemy_count = arg.enemy_count.unwrap_or(roster.enemy_count);
    let enemies = engine.build_roster(&roster.weight_sets(), enemy_count);
    if let Some(warning) = roster_warning(enemies.len()) {
        log::warn!("{warning}");
    }
    let mut progress = ConsoleProgress::default();
    let result = engine.run(&enemies, &mut progress);

    eprintln!("=== Optimization Complete! ===");
    eprintln!("{}", util::now());
    eprintln!();

    let header = Feature::ALL.iter().map(|f| f.name()).collect::<Vec<_>>();
    println!("phase,{}", header.join(","));
    println!("{}", result.best.weights());

    if let Some(path) = &arg.output {
        let model = WeightModel {
            name: arg.name.clone(),
            trained_at: Utc::now(),
            final_fitness: result.best.fitness(),
            generations: result.generations,
            weights: *result.best.weights(),
        };
        let saved_to = Output::save_json(&model, util::output_path(path))?;

        eprintln!();
        eprintln!("Model saved successfully");
        eprintln!("  Path: {saved_to}");
        eprintln!("  Name: {}", model.name);
        eprintln!("  Trained at: {}", model.trained_at);
        eprintln!("  Final fitness: {:.3}", model.final_fitness);
    }

    Ok(())
}
