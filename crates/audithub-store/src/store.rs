use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use serde::de::DeserializeOwned;
use std::fs;
use std::io;

use audithub_utils::atomic_write::{to_pretty_json, write_file_atomic};
use audithub_utils::error::StoreError;
use audithub_utils::feature_id::FeatureId;

use crate::model::{
    AuditListing, AuditSummary, Checklist, ListingDiagnostic, ResultsPayload, ResultsRecord,
    SaveReceipt,
};
use crate::revision::Revision;
use crate::summary::Tally;

/// Directory-backed store of checklists and results.
///
/// Nothing is cached: every call reads the directory afresh, so edits made
/// by hand between requests are picked up immediately.
#[derive(Debug, Clone)]
pub struct AuditStore {
    root: Utf8PathBuf,
}

/// A results record together with the revision of the file it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedResults {
    pub record: ResultsRecord,
    /// `None` when no results file exists yet.
    pub revision: Option<Revision>,
}

/// Outcome of a successful save.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedResults {
    pub receipt: SaveReceipt,
    pub revision: Revision,
}

impl AuditStore {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn audit_path(&self, feature: &FeatureId) -> Utf8PathBuf {
        self.root.join(feature.audit_file_name())
    }

    fn results_path(&self, feature: &FeatureId) -> Utf8PathBuf {
        self.root.join(feature.results_file_name())
    }

    /// Summarise every `audit-*.json` in file-name order.
    ///
    /// Files that cannot be used are reported in
    /// [`AuditListing::diagnostics`] instead of failing the listing. Only
    /// an unreadable directory is an error.
    pub fn list_audits(&self) -> Result<AuditListing, StoreError> {
        let entries = fs::read_dir(&self.root).map_err(|source| StoreError::Io {
            path: self.root.to_string(),
            source,
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                path: self.root.to_string(),
                source,
            })?;
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }
        names.sort();

        let mut listing = AuditListing::default();
        for name in names {
            let feature = match FeatureId::from_audit_file_name(&name) {
                None => continue,
                Some(Ok(feature)) => feature,
                Some(Err(err)) => {
                    listing.skip(&name, err.to_string());
                    continue;
                }
            };

            let checklist = match self.read_checklist(&feature) {
                Ok(Some(checklist)) => checklist,
                // Removed between read_dir and open.
                Ok(None) => continue,
                Err(err) => {
                    listing.skip(&name, err.to_string());
                    continue;
                }
            };

            let tally = match self.read_results(&feature) {
                Ok(Some((record, _))) => Tally::from_results(&record.results, &checklist.story_keys()),
                Ok(None) => Tally::default(),
                Err(err) => {
                    listing.skip(&feature.results_file_name(), err.to_string());
                    Tally::default()
                }
            };

            listing
                .audits
                .push(AuditSummary::from_parts(&feature, &checklist, tally));
        }

        tracing::debug!(
            dir = %self.root,
            audits = listing.audits.len(),
            skipped = listing.diagnostics.len(),
            "Listed audits"
        );
        Ok(listing)
    }

    /// Summary of a single audit.
    pub fn summary(&self, feature: &FeatureId) -> Result<AuditSummary, StoreError> {
        let checklist = self.get_checklist(feature)?;
        let tally = match self.read_results(feature)? {
            Some((record, _)) => Tally::from_results(&record.results, &checklist.story_keys()),
            None => Tally::default(),
        };
        Ok(AuditSummary::from_parts(feature, &checklist, tally))
    }

    pub fn get_checklist(&self, feature: &FeatureId) -> Result<Checklist, StoreError> {
        self.read_checklist(feature)?
            .ok_or_else(|| StoreError::ChecklistNotFound {
                feature: feature.to_string(),
            })
    }

    /// Saved results, or an empty record if nothing was saved yet.
    pub fn get_results(&self, feature: &FeatureId) -> Result<ResultsRecord, StoreError> {
        Ok(self.load_results(feature)?.record)
    }

    pub fn load_results(&self, feature: &FeatureId) -> Result<LoadedResults, StoreError> {
        Ok(match self.read_results(feature)? {
            Some((record, revision)) => LoadedResults {
                record,
                revision: Some(revision),
            },
            None => LoadedResults {
                record: ResultsRecord::empty(feature.as_str()),
                revision: None,
            },
        })
    }

    /// Revision of the current results file, if any.
    pub fn results_revision(&self, feature: &FeatureId) -> Result<Option<Revision>, StoreError> {
        let path = self.results_path(feature);
        Ok(read_optional(&path)?.map(|bytes| Revision::of_bytes(&bytes)))
    }

    /// Replace the results file for `feature` wholesale (last writer wins).
    pub fn save_results(
        &self,
        feature: &FeatureId,
        payload: ResultsPayload,
    ) -> Result<SavedResults, StoreError> {
        self.save_results_if(feature, payload, None)
    }

    /// Replace the results file, failing if it no longer matches `expected`.
    ///
    /// `None` skips the check. `updated_at` of the new record is strictly
    /// later than that of the record it replaces.
    pub fn save_results_if(
        &self,
        feature: &FeatureId,
        payload: ResultsPayload,
        expected: Option<&Revision>,
    ) -> Result<SavedResults, StoreError> {
        let path = self.results_path(feature);
        let current = read_optional(&path)?;

        if let Some(expected) = expected {
            let actual = current.as_deref().map(Revision::of_bytes);
            if actual.as_ref() != Some(expected) {
                return Err(StoreError::RevisionMismatch {
                    feature: feature.to_string(),
                    expected: expected.to_string(),
                    actual: actual.map(|rev| rev.to_string()),
                });
            }
        }

        let previous = current.as_deref().and_then(|bytes| {
            match serde_json::from_slice::<ResultsRecord>(bytes) {
                Ok(record) => record.updated_at,
                Err(err) => {
                    tracing::warn!(path = %path, error = %err, "Overwriting unreadable results file");
                    None
                }
            }
        });
        let updated_at = next_timestamp(previous);

        let record = ResultsRecord {
            feature: feature.to_string(),
            updated_at: Some(updated_at),
            results: payload.results,
            notes: payload.notes,
            new_requirements: payload.new_requirements,
        };
        let rendered = to_pretty_json(&record).map_err(|source| StoreError::Encode {
            feature: feature.to_string(),
            source,
        })?;

        write_file_atomic(&path, rendered.as_bytes()).map_err(|e| StoreError::Write {
            path: path.to_string(),
            reason: format!("{e:#}"),
        })?;

        tracing::info!(
            feature = %feature,
            updated_at = %updated_at.to_rfc3339(),
            results = record.results.len(),
            "Saved results"
        );

        Ok(SavedResults {
            receipt: SaveReceipt::saved(updated_at),
            revision: Revision::of_bytes(rendered.as_bytes()),
        })
    }

    fn read_checklist(&self, feature: &FeatureId) -> Result<Option<Checklist>, StoreError> {
        let path = self.audit_path(feature);
        read_optional(&path)?
            .map(|bytes| parse_json(&path, &bytes))
            .transpose()
    }

    fn read_results(
        &self,
        feature: &FeatureId,
    ) -> Result<Option<(ResultsRecord, Revision)>, StoreError> {
        let path = self.results_path(feature);
        match read_optional(&path)? {
            Some(bytes) => {
                let record = parse_json(&path, &bytes)?;
                Ok(Some((record, Revision::of_bytes(&bytes))))
            }
            None => Ok(None),
        }
    }
}

impl AuditListing {
    fn skip(&mut self, file: &str, reason: String) {
        tracing::warn!(file, reason = %reason, "Skipping audit file");
        self.diagnostics.push(ListingDiagnostic {
            file: file.to_string(),
            reason,
        });
    }
}

/// Read a file, mapping "does not exist" to `None`.
fn read_optional(path: &Utf8Path) -> Result<Option<Vec<u8>>, StoreError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StoreError::Io {
            path: path.to_string(),
            source,
        }),
    }
}

fn parse_json<T: DeserializeOwned>(path: &Utf8Path, bytes: &[u8]) -> Result<T, StoreError> {
    serde_json::from_slice(bytes).map_err(|source| StoreError::Parse {
        path: path.file_name().unwrap_or(path.as_str()).to_string(),
        source,
    })
}

/// Current time at microsecond precision, bumped past `previous` if the
/// clock has not advanced.
fn next_timestamp(previous: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now().trunc_subsecs(6);
    match previous {
        Some(prev) if now <= prev => prev + TimeDelta::microseconds(1),
        _ => now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_timestamp_moves_forward() {
        let future = Utc::now() + TimeDelta::hours(1);
        let next = next_timestamp(Some(future));
        assert_eq!(next, future + TimeDelta::microseconds(1));

        let past = Utc::now() - TimeDelta::hours(1);
        assert!(next_timestamp(Some(past)) > past);
        assert!(next_timestamp(None) <= Utc::now());
    }

    #[test]
    fn test_read_optional_missing_is_none() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("absent.json")).unwrap();
        assert!(read_optional(&path).unwrap().is_none());
    }

    #[test]
    fn test_parse_errors_name_the_file_only() {
        let err = parse_json::<Checklist>(Utf8Path::new("/srv/audits/audit-x.json"), b"{")
            .unwrap_err();
        match err {
            StoreError::Parse { path, .. } => assert_eq!(path, "audit-x.json"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
