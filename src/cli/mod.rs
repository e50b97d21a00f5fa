//! Command-line interface for audithub
//!
//! ## Module Structure
//!
//! - `args`: CLI argument definitions (clap)
//! - `run`: entry point, config discovery, and error reporting
//! - `commands`: `serve` and `--list` implementations

pub mod args;
mod commands;
mod run;


pub use args::Cli;
pub use run::run;
