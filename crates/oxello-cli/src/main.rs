mod command;
mod model;
mod progress;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
