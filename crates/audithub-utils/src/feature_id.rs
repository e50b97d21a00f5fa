//! Feature slug validation
//!
//! A feature slug names an audit and both of its files
//! (`audit-<slug>.json` and `results-<slug>.json`). Slugs are validated
//! before any path is built from them, so a rejected slug never reaches
//! the filesystem.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::error::{ErrorCategory, UserFriendlyError};

/// Pattern every feature slug must match.
pub const FEATURE_ID_PATTERN: &str = r"^[a-z0-9-]+$";

static FEATURE_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(FEATURE_ID_PATTERN).unwrap_or_else(|e| panic!("invalid feature id pattern: {e}"))
});

const AUDIT_PREFIX: &str = "audit-";
const RESULTS_PREFIX: &str = "results-";
const JSON_SUFFIX: &str = ".json";

/// Error type for feature slug validation failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeatureIdError {
    #[error("Feature slug is empty")]
    Empty,

    #[error("Feature slug '{0}' contains characters outside [a-z0-9-]")]
    InvalidCharacters(String),
}

impl UserFriendlyError for FeatureIdError {
    fn user_message(&self) -> String {
        match self {
            Self::Empty => "The feature name is empty".to_string(),
            Self::InvalidCharacters(raw) => format!("'{raw}' is not a valid feature name"),
        }
    }

    fn context(&self) -> Option<String> {
        Some(
            "Feature names are embedded in file names, so only lowercase ASCII letters, digits, and dashes are accepted."
                .to_string(),
        )
    }

    fn suggestions(&self) -> Vec<String> {
        vec![
            "Use lowercase letters, digits, and dashes only".to_string(),
            "Example: login, user-auth, checkout-v2".to_string(),
        ]
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Validation
    }
}

/// Check a raw string against [`FEATURE_ID_PATTERN`].
#[must_use]
pub fn is_valid_feature_id(raw: &str) -> bool {
    FEATURE_ID_RE.is_match(raw)
}

/// A validated feature slug.
///
/// The only way to obtain one is [`FeatureId::parse`], so holding a
/// `FeatureId` proves the slug is safe to splice into a file name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeatureId(String);

impl FeatureId {
    /// Validate `raw` and wrap it.
    pub fn parse(raw: &str) -> Result<Self, FeatureIdError> {
        if raw.is_empty() {
            return Err(FeatureIdError::Empty);
        }
        if !is_valid_feature_id(raw) {
            return Err(FeatureIdError::InvalidCharacters(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    /// Recover the slug from an `audit-<slug>.json` file name.
    ///
    /// Returns `None` when the name does not have the audit shape at all,
    /// and `Some(Err(_))` when it does but the slug is invalid.
    #[must_use]
    pub fn from_audit_file_name(file_name: &str) -> Option<Result<Self, FeatureIdError>> {
        let slug = file_name
            .strip_prefix(AUDIT_PREFIX)?
            .strip_suffix(JSON_SUFFIX)?;
        Some(Self::parse(slug))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `audit-<slug>.json`
    #[must_use]
    pub fn audit_file_name(&self) -> String {
        format!("{AUDIT_PREFIX}{}{JSON_SUFFIX}", self.0)
    }

    /// `results-<slug>.json`
    #[must_use]
    pub fn results_file_name(&self) -> String {
        format!("{RESULTS_PREFIX}{}{JSON_SUFFIX}", self.0)
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FeatureId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_accepts_simple_slugs() {
        for raw in ["login", "user-auth", "v2", "checkout-v2-beta", "-", "123"] {
            assert!(FeatureId::parse(raw).is_ok(), "expected {raw} to be valid");
        }
    }

    #[test]
    fn test_rejects_traversal_and_separators() {
        for raw in [
            "..",
            "../etc/passwd",
            "a/b",
            "a\\b",
            "login.json",
            "Login",
            "user_auth",
            "with space",
            "caf\u{e9}",
        ] {
            assert!(
                matches!(
                    FeatureId::parse(raw),
                    Err(FeatureIdError::InvalidCharacters(_))
                ),
                "expected {raw} to be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(FeatureId::parse(""), Err(FeatureIdError::Empty));
    }

    #[test]
    fn test_file_names() {
        let id = FeatureId::parse("login").unwrap();
        assert_eq!(id.audit_file_name(), "audit-login.json");
        assert_eq!(id.results_file_name(), "results-login.json");
    }

    #[test]
    fn test_from_audit_file_name() {
        assert_eq!(
            FeatureId::from_audit_file_name("audit-login.json"),
            Some(Ok(FeatureId::parse("login").unwrap()))
        );
        assert!(matches!(
            FeatureId::from_audit_file_name("audit-Bad Name.json"),
            Some(Err(_))
        ));
        assert_eq!(FeatureId::from_audit_file_name("results-login.json"), None);
        assert_eq!(FeatureId::from_audit_file_name("audit-login.txt"), None);
    }

    proptest! {
        #[test]
        fn prop_valid_slugs_round_trip(raw in "[a-z0-9-]{1,32}") {
            let id = FeatureId::parse(&raw).unwrap();
            prop_assert_eq!(id.as_str(), raw.as_str());
        }

        #[test]
        fn prop_any_foreign_char_is_rejected(
            prefix in "[a-z0-9-]{0,8}",
            bad in "[^a-z0-9-]",
            suffix in "[a-z0-9-]{0,8}",
        ) {
            let raw = format!("{prefix}{bad}{suffix}");
            prop_assert!(FeatureId::parse(&raw).is_err());
        }
    }
}
