use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use clone_repos::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();
    logging::init_subscriber(args.verbose, args.command_name());
    let log = Arc::new(logging::Logger::new(args.command_name()));

    if args.parse {
        commands::parse::run(&args, &log)
    } else {
        commands::clone::run(&args, &log)
    }
}
