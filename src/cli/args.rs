//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

use audithub_config::CliArgs;

/// audithub - local QA checklist server
#[derive(Parser, Debug)]
#[command(name = "audithub")]
#[command(about = "Serve JSON QA checklists with an interactive pass/fail/skip UI")]
#[command(long_about = r#"
audithub serves every audit-<feature>.json in a directory together with the
results recorded against it, and an interactive checklist UI at /.

EXAMPLES:
  # Serve the current directory on port 4000
  audithub

  # Serve a specific folder on another port
  AUDIT_PORT=4100 audithub tasks/audits

  # Print progress for every audit and exit
  audithub tasks/audits --list

CONFIGURATION:
  Precedence: CLI flags > environment (AUDIT_PORT, AUDIT_BIND) > config file > defaults
  The config file is --config, or audithub.toml inside the audits directory
"#)]
#[command(version)]
pub struct Cli {
    /// Directory containing audit-*.json files (defaults to the current directory)
    pub dir: Option<PathBuf>,

    /// Port to listen on [env: AUDIT_PORT] [default: 4000]
    #[arg(long)]
    pub port: Option<u16>,

    /// Address to bind [env: AUDIT_BIND] [default: 0.0.0.0]
    #[arg(long)]
    pub bind: Option<String>,

    /// Path to configuration file (overrides discovery)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// Print a summary of every audit and exit instead of serving
    #[arg(long)]
    pub list: bool,

    /// Print the --list output as JSON
    #[arg(long, requires = "list")]
    pub json: bool,
}

impl Cli {
    /// Values handed to configuration discovery.
    #[must_use]
    pub fn to_cli_args(&self) -> CliArgs {
        CliArgs {
            audits_dir: self.dir.clone(),
            config_path: self.config.clone(),
            port: self.port,
            bind: self.bind.clone(),
            verbose: Some(self.verbose),
            log_json: Some(self.log_json),
        }
    }
}
