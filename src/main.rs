use std::env;
use std::process;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use log::{debug, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use log_archiver::cli::Args;
use log_archiver::config::{load_dotenv, AppConfig};
use log_archiver::workflow::Workflow;

fn main() -> Result<()> {
    // Parse arguments
    let args = parse_args();

    // Initialize logging
    initialize_logging(args.verbose)?;

    // Load configuration once; stages receive it explicitly
    load_dotenv();
    let working_dir = env::current_dir().context("Failed to determine working directory")?;
    let config = AppConfig::from_env(&working_dir);
    debug!("Configuration: {:?}", config);

    // An archive failure is reported but keeps exit code 0
    let report = Workflow::from_config(&config).run(&args.log_dir);
    debug!("Run finished: success={}", report.is_success());

    Ok(())
}

/// Parse arguments, exiting with code 1 on any usage error
fn parse_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            if e.print().is_err() {
                eprintln!("{}", e);
            }
            process::exit(1);
        }
    }
}

/// Initialize logging with the specified verbosity level
fn initialize_logging(verbose: bool) -> Result<()> {
    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    TermLogger::init(
        log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ).context("Failed to initialize logger")?;
    Ok(())
}
