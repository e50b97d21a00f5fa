//! CLI entry point
//!
//! `run()` parses arguments, discovers [`Config`], installs the tracing
//! subscriber, and dispatches. It owns all error output.

use clap::Parser;

use audithub_config::Config;
use audithub_utils::error::AuditHubError;
use audithub_utils::exit_codes::ExitCode;
use audithub_utils::logging::init_tracing;

use super::args::Cli;
use super::commands;

/// Main CLI execution function.
///
/// Returns `Err(ExitCode)` after printing a user-facing report; main.rs only
/// maps that to the process exit status.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();

    let config = match Config::discover(&cli.to_cli_args()) {
        Ok(config) => config,
        Err(err) => return Err(report(&err)),
    };

    if let Err(e) = init_tracing(config.log_options()) {
        eprintln!("⚠ Failed to initialise logging: {e}");
    }

    for (key, (value, source)) in config.effective_config() {
        tracing::debug!(key = %key, value = %value, source = %source, "config");
    }

    let result = if cli.list {
        commands::list(&config, cli.json)
    } else {
        commands::serve(&config)
    };

    result.map_err(|err| report(&err))
}

fn report(err: &AuditHubError) -> ExitCode {
    eprint!("{}", err.display_for_user());
    err.to_exit_code()
}
