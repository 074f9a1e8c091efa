use clap::Parser as _;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use self::command::CommandArgs;

mod command;
mod dataset;
mod settings;
mod util;

fn main() -> anyhow::Result<()> {
    let args = CommandArgs::parse();

    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    command::run(args)
}
