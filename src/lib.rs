//! audithub - local QA checklist server
//!
//! audithub reads `audit-<feature>.json` checklists from a directory, serves
//! them with the pass/fail/skip results recorded so far over a small JSON
//! API, and ships a single-page UI for marking stories while testing.
//!
//! # Quick Start (CLI)
//!
//! ```bash
//! # Serve the checklists in tasks/audits on port 4000
//! audithub tasks/audits
//!
//! # Pick another port
//! AUDIT_PORT=4100 audithub tasks/audits
//!
//! # Print per-audit progress and exit
//! audithub tasks/audits --list --json
//! ```
//!
//! # Workspace
//!
//! - [`audithub_utils`]: errors, exit codes, feature slugs, atomic writes, logging
//! - [`audithub_config`]: [`Config`] discovery with source attribution
//! - [`audithub_store`]: checklist/results model and [`AuditStore`]
//! - [`audithub_server`]: axum router and embedded UI

pub mod cli;

pub use audithub_config::{CliArgs, Config, ConfigSource};
pub use audithub_server::{AppState, build_router};
pub use audithub_store::{
    AuditListing, AuditStore, AuditSummary, Checklist, FeatureId, Outcome, ResultsPayload,
    ResultsRecord, Revision,
};
pub use audithub_utils::error::{
    AuditHubError, ConfigError, ErrorCategory, StoreError, UserFriendlyError,
};
pub use audithub_utils::exit_codes::ExitCode;
