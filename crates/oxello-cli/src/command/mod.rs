use clap::{Parser, Subcommand};
use oxello_evaluator::search::AdaptiveDepth;

use self::{play::PlayArg, train::TrainArg};

mod play;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log search and training diagnostics (`RUST_LOG` takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve evaluation weights with a genetic algorithm
    Train(#[clap(flatten)] TrainArg),
    /// Play one game between two stored weight sets
    Play(#[clap(flatten)] PlayArg),
}

/// Search depth options shared by every subcommand that plays games.
#[derive(Debug, Clone, Copy, clap::Args)]
struct DepthArg {
    /// Numerator of the empty-cell term of the search depth
    #[arg(long, default_value_t = AdaptiveDepth::default().scale)]
    depth_scale: u32,
    /// Minimum search depth
    #[arg(long, default_value_t = AdaptiveDepth::default().base)]
    depth_base: u32,
}

impl DepthArg {
    fn to_depth(self) -> AdaptiveDepth {
        AdaptiveDepth {
            scale: self.depth_scale,
            base: self.depth_base,
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logger(args.verbose);
    match args.mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Play(arg) => play::run(&arg)?,
    }
    Ok(())
}

fn init_logger(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, level),
    )
    .format_timestamp_millis()
    .target(env_logger::Target::Stderr)
    .init();
}
