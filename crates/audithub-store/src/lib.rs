//! Audit checklists, results records, and the directory-backed store
//!
//! An audit directory is flat: `audit-<feature>.json` files define
//! checklists and `results-<feature>.json` files hold the outcomes recorded
//! against them. [`AuditStore`] reads both, derives per-audit summaries,
//! and replaces results files atomically on save.

mod model;
mod revision;
mod store;
mod summary;

pub use audithub_utils::error::StoreError;
pub use audithub_utils::feature_id::FeatureId;
pub use model::*;
pub use revision::Revision;
pub use store::{AuditStore, LoadedResults, SavedResults};
pub use summary::{Tally, humanize_title};
