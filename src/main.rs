//! `dotkeeper` command-line entry point.
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use dotkeeper::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();

    match &args.command {
        cli::Command::Apply(opts) => {
            logging::init_subscriber(args.verbose, args.command.log_name());
            let log = Arc::new(logging::Logger::new(args.command.log_name()));
            commands::apply::run(&args.global, opts, &log)
        }
        cli::Command::Version => {
            commands::version::run();
            Ok(())
        }
    }
}
