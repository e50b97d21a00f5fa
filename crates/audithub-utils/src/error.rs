use std::fmt;
use std::io;
use thiserror::Error;

pub use crate::feature_id::FeatureIdError;

/// Library-level error type with rich context and user-friendly reporting.
///
/// `AuditHubError` is what library operations hand back to the CLI. It
/// provides:
/// - Detailed error information for programmatic handling
/// - User-friendly messages with context and suggestions
/// - Mapping to CLI exit codes for consistent error reporting
///
/// # Exit Code Mapping
///
/// | Exit Code | Error Type |
/// |-----------|------------|
/// | 2 | Configuration/CLI argument errors, invalid feature names |
/// | 1 | Everything else (I/O, bind failures, storage faults) |
///
/// Library code returns `AuditHubError` and does NOT call `std::process::exit()`.
#[derive(Error, Debug)]
pub enum AuditHubError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Audit store error: {0}")]
    Store(#[from] StoreError),

    #[error("Feature validation error: {0}")]
    FeatureId(#[from] FeatureIdError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Trait for providing user-friendly error reporting with context and suggestions
pub trait UserFriendlyError {
    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Get contextual information about the error
    fn context(&self) -> Option<String>;

    /// Get suggested actions to resolve the error
    fn suggestions(&self) -> Vec<String>;

    /// Get the error category for grouping similar errors
    fn category(&self) -> ErrorCategory;
}

/// Categories of errors for better organization and handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    FileSystem,
    Network,
    Concurrency,
    Validation,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "Configuration"),
            Self::FileSystem => write!(f, "File System"),
            Self::Network => write!(f, "Network"),
            Self::Concurrency => write!(f, "Concurrency"),
            Self::Validation => write!(f, "Validation"),
        }
    }
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration file: {0}")]
    InvalidFile(String),

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found at {path}")]
    NotFound { path: String },

    #[error("Audits directory not found: {path}")]
    DirectoryNotFound { path: String },
}

impl UserFriendlyError for ConfigError {
    fn user_message(&self) -> String {
        match self {
            Self::InvalidFile(reason) => format!("The configuration file is invalid: {reason}"),
            Self::InvalidValue { key, value } => {
                format!("Configuration value '{key}' is invalid: {value}")
            }
            Self::NotFound { path } => format!("Configuration file not found: {path}"),
            Self::DirectoryNotFound { path } => {
                format!("The audits directory does not exist or is not a directory: {path}")
            }
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::InvalidFile(_) | Self::NotFound { .. } => Some(
                "audithub reads an optional TOML file given by --config, or audithub.toml inside the audits directory."
                    .to_string(),
            ),
            Self::InvalidValue { .. } => Some(
                "Values are resolved with precedence: CLI flags > environment > config file > defaults."
                    .to_string(),
            ),
            Self::DirectoryNotFound { .. } => Some(
                "The positional argument names the folder holding audit-*.json files; it defaults to the current directory."
                    .to_string(),
            ),
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidFile(_) => vec![
                "Check the TOML syntax of the configuration file".to_string(),
                "Only [server] and [logging] sections are recognised".to_string(),
            ],
            Self::InvalidValue { key, .. } if key.contains("port") => vec![
                "Use a port number between 1 and 65535".to_string(),
                "Example: AUDIT_PORT=4000 audithub tasks/audits".to_string(),
            ],
            Self::InvalidValue { .. } => {
                vec!["Check the value against the documented format".to_string()]
            }
            Self::NotFound { .. } => vec![
                "Check the path passed to --config".to_string(),
                "Omit --config to fall back to audithub.toml discovery".to_string(),
            ],
            Self::DirectoryNotFound { .. } => vec![
                "Pass the folder containing your audit-*.json files".to_string(),
                "Example: audithub tasks/audits".to_string(),
            ],
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }
}

/// Errors raised by the audit store.
///
/// Each variant maps onto one HTTP status via [`StoreError::status_code`].
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid feature: {0}")]
    InvalidFeature(#[from] FeatureIdError),

    #[error("No checklist for feature '{feature}'")]
    ChecklistNotFound { feature: String },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode results for '{feature}': {source}")]
    Encode {
        feature: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {path}: {reason}")]
    Write { path: String, reason: String },

    #[error("Results for '{feature}' changed since revision {expected}")]
    RevisionMismatch {
        feature: String,
        expected: String,
        actual: Option<String>,
    },
}

impl StoreError {
    /// HTTP status this error surfaces as.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidFeature(_) => 400,
            Self::ChecklistNotFound { .. } => 404,
            Self::RevisionMismatch { .. } => 412,
            Self::Parse { .. } | Self::Encode { .. } | Self::Io { .. } | Self::Write { .. } => 500,
        }
    }

    /// Short message placed in the `error` field of API responses.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::InvalidFeature(_) => "Invalid feature".to_string(),
            Self::ChecklistNotFound { .. } => "Not found".to_string(),
            Self::RevisionMismatch { .. } => "Revision mismatch".to_string(),
            other => other.to_string(),
        }
    }
}

impl UserFriendlyError for StoreError {
    fn user_message(&self) -> String {
        match self {
            Self::InvalidFeature(inner) => inner.user_message(),
            Self::ChecklistNotFound { feature } => {
                format!("No audit-{feature}.json exists in the audits directory")
            }
            Self::Parse { path, .. } => format!("{path} is not valid audit JSON"),
            Self::Encode { feature, .. } => format!("Results for '{feature}' could not be encoded"),
            Self::Io { path, source } => format!("Could not access {path}: {source}"),
            Self::Write { path, reason } => format!("Could not write {path}: {reason}"),
            Self::RevisionMismatch { feature, .. } => {
                format!("Results for '{feature}' were changed by another client")
            }
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::InvalidFeature(inner) => inner.context(),
            Self::RevisionMismatch { expected, actual, .. } => Some(format!(
                "Expected revision {expected}, found {}",
                actual.as_deref().unwrap_or("none")
            )),
            Self::Parse { source, .. } => Some(format!("Parser reported: {source}")),
            _ => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidFeature(inner) => inner.suggestions(),
            Self::ChecklistNotFound { .. } => {
                vec!["Check the audits directory for the expected file name".to_string()]
            }
            Self::Parse { .. } => vec!["Validate the file with a JSON linter".to_string()],
            Self::RevisionMismatch { .. } => {
                vec!["Reload the results and reapply your edits".to_string()]
            }
            Self::Encode { .. } | Self::Io { .. } | Self::Write { .. } => vec![
                "Check permissions on the audits directory".to_string(),
                "Check available disk space".to_string(),
            ],
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidFeature(_) | Self::Parse { .. } | Self::Encode { .. } => {
                ErrorCategory::Validation
            }
            Self::ChecklistNotFound { .. } | Self::Io { .. } | Self::Write { .. } => {
                ErrorCategory::FileSystem
            }
            Self::RevisionMismatch { .. } => ErrorCategory::Concurrency,
        }
    }
}

impl UserFriendlyError for AuditHubError {
    fn user_message(&self) -> String {
        match self {
            Self::Config(inner) => inner.user_message(),
            Self::Store(inner) => inner.user_message(),
            Self::FeatureId(inner) => inner.user_message(),
            Self::Bind { addr, source } => format!("Could not listen on {addr}: {source}"),
            Self::Io(err) => format!("File system operation failed: {err}"),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::Config(inner) => inner.context(),
            Self::Store(inner) => inner.context(),
            Self::FeatureId(inner) => inner.context(),
            Self::Bind { .. } => {
                Some("Another process may already be using this port.".to_string())
            }
            Self::Io(_) => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Config(inner) => inner.suggestions(),
            Self::Store(inner) => inner.suggestions(),
            Self::FeatureId(inner) => inner.suggestions(),
            Self::Bind { .. } => vec![
                "Pick another port with --port or AUDIT_PORT".to_string(),
                "Stop the process currently bound to the port".to_string(),
            ],
            Self::Io(_) => vec!["Check file permissions and disk space".to_string()],
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(inner) => inner.category(),
            Self::Store(inner) => inner.category(),
            Self::FeatureId(inner) => inner.category(),
            Self::Bind { .. } => ErrorCategory::Network,
            Self::Io(_) => ErrorCategory::FileSystem,
        }
    }
}

impl AuditHubError {
    /// Get a user-friendly error message with context and actionable suggestions.
    ///
    /// ```text
    /// Error: <user message>
    ///
    /// Context: <context if available>
    ///
    /// Suggestions:
    ///   • <suggestion 1>
    /// ```
    ///
    /// # Example
    ///
    /// ```rust
    /// use audithub_utils::error::{AuditHubError, ConfigError};
    ///
    /// let err = AuditHubError::Config(ConfigError::NotFound {
    ///     path: "missing.toml".to_string(),
    /// });
    /// let message = err.display_for_user();
    /// assert!(message.contains("missing.toml"));
    /// assert!(message.contains("Suggestions:"));
    /// ```
    #[must_use]
    pub fn display_for_user(&self) -> String {
        let mut output = format!("Error: {}\n", self.user_message());

        if let Some(ctx) = self.context() {
            output.push_str(&format!("\nContext: {ctx}\n"));
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str("\nSuggestions:\n");
            for suggestion in suggestions {
                output.push_str(&format!("  • {suggestion}\n"));
            }
        }

        output
    }

    /// Map this error to the appropriate CLI exit code.
    ///
    /// # Example
    ///
    /// ```rust
    /// use audithub_utils::error::{AuditHubError, ConfigError};
    /// use audithub_utils::exit_codes::ExitCode;
    ///
    /// let err = AuditHubError::Config(ConfigError::InvalidFile("bad".to_string()));
    /// assert_eq!(err.to_exit_code(), ExitCode::CLI_ARGS);
    /// ```
    #[must_use]
    pub fn to_exit_code(&self) -> crate::exit_codes::ExitCode {
        use crate::exit_codes::ExitCode;

        match self {
            AuditHubError::Config(_) | AuditHubError::FeatureId(_) => ExitCode::CLI_ARGS,
            AuditHubError::Store(StoreError::InvalidFeature(_)) => ExitCode::CLI_ARGS,
            _ => ExitCode::INTERNAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit_codes::ExitCode;

    #[test]
    fn test_store_error_status_codes() {
        assert_eq!(
            StoreError::InvalidFeature(FeatureIdError::Empty).status_code(),
            400
        );
        assert_eq!(
            StoreError::ChecklistNotFound {
                feature: "login".to_string()
            }
            .status_code(),
            404
        );
        assert_eq!(
            StoreError::RevisionMismatch {
                feature: "login".to_string(),
                expected: "abc".to_string(),
                actual: None,
            }
            .status_code(),
            412
        );
        assert_eq!(
            StoreError::Write {
                path: "results-login.json".to_string(),
                reason: "disk full".to_string(),
            }
            .status_code(),
            500
        );
    }

    #[test]
    fn test_public_messages_match_api_contract() {
        assert_eq!(
            StoreError::InvalidFeature(FeatureIdError::InvalidCharacters("A".to_string()))
                .public_message(),
            "Invalid feature"
        );
        assert_eq!(
            StoreError::ChecklistNotFound {
                feature: "x".to_string()
            }
            .public_message(),
            "Not found"
        );
    }

    #[test]
    fn test_exit_code_mapping() {
        let config = AuditHubError::Config(ConfigError::InvalidValue {
            key: "port".to_string(),
            value: "0".to_string(),
        });
        assert_eq!(config.to_exit_code(), ExitCode::CLI_ARGS);

        let bind = AuditHubError::Bind {
            addr: "0.0.0.0:4000".to_string(),
            source: io::Error::new(io::ErrorKind::AddrInUse, "in use"),
        };
        assert_eq!(bind.to_exit_code(), ExitCode::INTERNAL);
    }

    #[test]
    fn test_display_for_user_includes_context_and_suggestions() {
        let err = AuditHubError::Config(ConfigError::DirectoryNotFound {
            path: "/nope".to_string(),
        });
        let rendered = err.display_for_user();
        assert!(rendered.starts_with("Error: "));
        assert!(rendered.contains("/nope"));
        assert!(rendered.contains("Context:"));
        assert!(rendered.contains("  • "));
    }

    #[test]
    fn test_port_suggestions_are_specific() {
        let err = ConfigError::InvalidValue {
            key: "AUDIT_PORT".to_string(),
            value: "abc".to_string(),
        };
        assert!(err.suggestions().iter().any(|s| s.contains("65535")));
    }
}
