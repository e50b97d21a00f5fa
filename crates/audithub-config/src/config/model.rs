use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Port used when neither CLI, environment, nor config file set one.
pub const DEFAULT_PORT: u16 = 4000;

/// Interface bound by default.
pub const DEFAULT_BIND: &str = "0.0.0.0";

/// Config file looked up inside the audits directory when `--config` is absent.
pub const CONFIG_FILE_NAME: &str = "audithub.toml";

/// Environment variable selecting the listening port.
pub const PORT_ENV: &str = "AUDIT_PORT";

/// Environment variable selecting the bind address.
pub const BIND_ENV: &str = "AUDIT_BIND";

/// Configuration for audithub.
///
/// # Discovery
///
/// Use [`Config::discover()`] for CLI behaviour. It reads `AUDIT_PORT` and
/// `AUDIT_BIND` from the process environment and looks for `audithub.toml`
/// in the audits directory unless `--config` names a file explicitly.
///
/// # Configuration File Format
///
/// ```toml
/// [server]
/// bind = "127.0.0.1"
/// port = 4100
///
/// [logging]
/// verbose = true
/// json = false
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Absolute path of the directory holding `audit-*.json` files.
    pub audits_dir: Utf8PathBuf,
    /// Listener settings.
    pub server: ServerConfig,
    /// Subscriber settings.
    pub logging: LoggingConfig,
    /// Config file that contributed values, if any.
    pub config_file: Option<Utf8PathBuf>,
    /// Source attribution for each setting.
    pub source_attribution: BTreeMap<String, ConfigSource>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoggingConfig {
    pub verbose: bool,
    pub json: bool,
}

/// Source of a configuration value.
///
/// Serializes to lowercase strings: `"cli"`, `"env"`, `"file"`, `"default"`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    /// Value provided via CLI argument (highest precedence).
    Cli,
    /// Value read from an environment variable.
    Env,
    /// Value loaded from the configuration file.
    File,
    /// Built-in default value (lowest precedence).
    Default,
}

impl ConfigSource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cli => "cli",
            Self::Env => "env",
            Self::File => "file",
            Self::Default => "default",
        }
    }
}

/// Values taken from the command line.
///
/// Every field is optional so that discovery can tell "not given" apart
/// from "given with the default value".
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub audits_dir: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
    pub port: Option<u16>,
    pub bind: Option<String>,
    pub verbose: Option<bool>,
    pub log_json: Option<bool>,
}

/// Raw environment overrides.
///
/// Kept as strings so that a malformed `AUDIT_PORT` is reported as a
/// configuration error rather than silently ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub port: Option<String>,
    pub bind: Option<String>,
}

impl EnvOverrides {
    /// Snapshot the relevant variables from the process environment.
    #[must_use]
    pub fn from_process() -> Self {
        Self {
            port: non_empty_var(PORT_ENV),
            bind: non_empty_var(BIND_ENV),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// TOML configuration file structure
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TomlConfig {
    pub server: Option<ServerSection>,
    pub logging: Option<LoggingSection>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ServerSection {
    pub bind: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct LoggingSection {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}
