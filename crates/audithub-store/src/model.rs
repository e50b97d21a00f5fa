use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Parsed `audit-<feature>.json`, kept exactly as it was read.
///
/// Checklists are authored by hand and never rewritten, so no schema is
/// imposed: the document is served back verbatim and summaries only look
/// at `feature`, `date`, and `sections[].stories[]`. Anything that does not
/// have the expected shape is treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Checklist(Value);

impl Checklist {
    #[must_use]
    pub fn new(document: Value) -> Self {
        Self(document)
    }

    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }

    /// The `feature` field, when it is a string.
    #[must_use]
    pub fn feature(&self) -> Option<&str> {
        self.0.get("feature").and_then(Value::as_str)
    }

    #[must_use]
    pub fn date(&self) -> Option<&Value> {
        self.0.get("date").filter(|date| !date.is_null())
    }

    /// Every entry of every `sections[].stories` array, whatever its shape.
    pub fn stories(&self) -> impl Iterator<Item = &Value> {
        self.0
            .get("sections")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(|section| section.get("stories").and_then(Value::as_array))
            .flatten()
    }

    /// Number of stories across all sections, including stories without an id.
    #[must_use]
    pub fn story_count(&self) -> usize {
        self.stories().count()
    }

    /// Distinct story ids in their results-key form.
    #[must_use]
    pub fn story_keys(&self) -> BTreeSet<String> {
        self.stories()
            .filter_map(|story| story.get("id").and_then(story_key))
            .collect()
    }
}

/// Results key for a story id: strings as written, numbers and booleans in
/// their JSON text form. Other id values cannot be marked.
#[must_use]
pub fn story_key(id: &Value) -> Option<String> {
    match id {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Outcomes that count towards a summary.
///
/// Results files may hold any string; only these three are tallied.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
    Skip,
}

/// Contents of `results-<feature>.json`.
///
/// Values are stored as they were sent. Only string outcomes of
/// `pass`, `fail` or `skip` are tallied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsRecord {
    #[serde(default)]
    pub feature: String,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Map<String, Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: Map<String, Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub new_requirements: Vec<Value>,
}

impl ResultsRecord {
    /// Record served for a feature that has never been saved.
    #[must_use]
    pub fn empty(feature: impl Into<String>) -> Self {
        Self {
            feature: feature.into(),
            updated_at: None,
            results: Map::new(),
            notes: Map::new(),
            new_requirements: Vec::new(),
        }
    }
}

/// Body accepted by a results save. Missing or `null` fields default to
/// empty and unrecognised fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultsPayload {
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Map<String, Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: Map<String, Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub new_requirements: Vec<Value>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Acknowledgement returned by a save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveReceipt {
    pub status: String,
    pub updated_at: DateTime<Utc>,
}

impl SaveReceipt {
    #[must_use]
    pub fn saved(updated_at: DateTime<Utc>) -> Self {
        Self {
            status: "saved".to_string(),
            updated_at,
        }
    }
}

/// Derived per-audit counts. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditSummary {
    pub feature: String,
    pub title: String,
    pub date: Option<Value>,
    pub total: usize,
    pub pass: usize,
    pub fail: usize,
    pub skip: usize,
    pub remaining: usize,
}

/// A file skipped while enumerating the audits directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingDiagnostic {
    pub file: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditListing {
    pub audits: Vec<AuditSummary>,
    pub diagnostics: Vec<ListingDiagnostic>,
}
