use serde_json::{Map, Value};
use std::collections::BTreeSet;

use audithub_utils::feature_id::FeatureId;

use crate::model::{AuditSummary, Checklist, Outcome};

/// Pass/fail/skip counts for one audit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub pass: usize,
    pub fail: usize,
    pub skip: usize,
}

impl Tally {
    /// Count outcomes for ids present in `known_ids`.
    ///
    /// Keys without a matching story and values other than the three
    /// outcome strings are ignored, so `marked() <= known_ids.len()` always
    /// holds.
    #[must_use]
    pub fn from_results(results: &Map<String, Value>, known_ids: &BTreeSet<String>) -> Self {
        let mut tally = Self::default();
        for (id, value) in results {
            if !known_ids.contains(id) {
                continue;
            }
            if let Some(outcome) = value.as_str().and_then(|s| s.parse::<Outcome>().ok()) {
                tally.record(outcome);
            }
        }
        tally
    }

    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Pass => self.pass += 1,
            Outcome::Fail => self.fail += 1,
            Outcome::Skip => self.skip += 1,
        }
    }

    #[must_use]
    pub fn marked(&self) -> usize {
        self.pass + self.fail + self.skip
    }
}

impl AuditSummary {
    /// Join a checklist with the tally of its results.
    ///
    /// The title is always derived from the checklist's `feature` field (or
    /// the slug), never from a `title` field.
    #[must_use]
    pub fn from_parts(feature: &FeatureId, checklist: &Checklist, tally: Tally) -> Self {
        let total = checklist.story_count();
        let title = humanize_title(checklist.feature().unwrap_or(feature.as_str()));

        Self {
            feature: feature.to_string(),
            title,
            date: checklist.date().cloned(),
            total,
            pass: tally.pass,
            fail: tally.fail,
            skip: tally.skip,
            remaining: total.saturating_sub(tally.marked()),
        }
    }
}

/// Turn a slug into a display title: `"user-login"` becomes `"User Login"`.
///
/// Hyphens become spaces. Every run of letters starts upper-case and
/// continues lower-case, with any non-letter acting as a word break.
#[must_use]
pub fn humanize_title(raw: &str) -> String {
    let mut title = String::with_capacity(raw.len());
    let mut in_word = false;
    for ch in raw.chars() {
        let ch = if ch == '-' { ' ' } else { ch };
        if ch.is_alphabetic() {
            if in_word {
                title.extend(ch.to_lowercase());
            } else {
                title.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            title.push(ch);
            in_word = false;
        }
    }
    title
}
