//! `devtools` command-line entry point.
use anyhow::Result;
use clap::Parser;

use devtools::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();
    let name = args.command.name();
    logging::init_subscriber(args.verbose, name);
    let log = logging::Logger::new(name);
    if let Some(path) = log.log_path() {
        log.debug(&format!("log file: {}", path.display()));
    }

    match &args.command {
        cli::Command::Config(opts) => commands::config::run(opts, &log),
        cli::Command::Backup(opts) => commands::backup::run(&args.global, opts, &log),
        cli::Command::Hash(opts) => commands::hash::run(opts, &log),
        cli::Command::Version => {
            commands::version::run();
            Ok(())
        }
    }
}
