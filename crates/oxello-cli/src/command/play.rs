use std::path::{Path, PathBuf};

use chrono::Utc;
use oxello_engine::Color;
use oxello_evaluator::match_runner::MatchRunner;

use super::DepthArg;
use crate::{
    model::{MatchRecord, WeightsEntry},
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Weights for black (a trained model or a bare weight set)
    black: PathBuf,
    /// Weights for white
    white: PathBuf,
    #[command(flatten)]
    pub(super) depth: DepthArg,
    /// Print only the final position
    #[arg(long)]
    quiet: bool,
    /// Save the game as JSON (stdout when no path or `-` is given)
    #[arg(long, num_args = 0..=1, default_missing_value = "-")]
    pub(super) record: Option<PathBuf>,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let black = WeightsEntry::open(&arg.black)?;
    let white = WeightsEntry::open(&arg.white)?;
    let runner = MatchRunner::new(arg.depth.to_depth());
    let mut moves = vec![];
    let outcome = runner.play_observed(black.weights(), white.weights(), |turn| {
        let mv = turn
            .mv
            .map_or_else(|| "pass".to_owned(), |mv| mv.to_string());
        if !arg.quiet {
            println!("{}: {} {mv}", turn.ply + 1, turn.color);
            println!("{}", turn.state.board());
            println!();
        }
        moves.push(mv);
    });

    let (black_count, white_count) = outcome.final_state.score();
    if arg.quiet {
        println!("{}", outcome.final_state.board());
    }
    println!(
        "black {black_count} - white {white_count} ({} plies, {} passes)",
        outcome.plies, outcome.passes
    );
    match outcome.winner() {
        Some(color) => println!("{color} wins"),
        None => println!("draw"),
    }
    println!(
        "fitness: black {}, white {}",
        outcome.fitness(Color::Black),
        outcome.fitness(Color::White)
    );

    if let Some(path) = &arg.record {
        let record = MatchRecord {
            black: display_name(&black, &arg.black),
            white: display_name(&white, &arg.white),
            played_at: Utc::now(),
            moves,
            final_board: *outcome.final_state.board(),
            black_count,
            white_count,
        };
        let saved_to = Output::save_json(&record, util::output_path(path))?;
        eprintln!("Game record saved to {saved_to}");
    }

    Ok(())
}

fn display_name(entry: &WeightsEntry, path: &Path) -> String {
    entry
        .name()
        .map_or_else(|| path.display().to_string(), str::to_owned)
}
