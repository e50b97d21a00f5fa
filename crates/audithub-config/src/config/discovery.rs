use camino::{Utf8Path, Utf8PathBuf};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{AuditHubError, ConfigError};

use super::{
    CONFIG_FILE_NAME, CliArgs, Config, ConfigSource, EnvOverrides, LoggingConfig, PORT_ENV,
    ServerConfig, TomlConfig,
};

impl Config {
    /// Discover and load configuration with precedence: CLI > env > file > defaults
    ///
    /// Relative paths are resolved against the current working directory.
    pub fn discover(cli_args: &CliArgs) -> Result<Self, AuditHubError> {
        let start_dir = std::env::current_dir()?;
        Self::discover_from(&start_dir, cli_args, &EnvOverrides::from_process())
    }

    /// Discover configuration from an explicit working directory and environment.
    ///
    /// This is the path-driven variant used by tests to avoid process-global state.
    pub fn discover_from(
        start_dir: &Path,
        cli_args: &CliArgs,
        env: &EnvOverrides,
    ) -> Result<Self, AuditHubError> {
        let mut source_attribution = BTreeMap::new();

        let (raw_dir, dir_source) = match &cli_args.audits_dir {
            Some(dir) => (dir.clone(), ConfigSource::Cli),
            None => (start_dir.to_path_buf(), ConfigSource::Default),
        };
        let audits_dir = resolve_audits_dir(start_dir, &raw_dir)?;
        source_attribution.insert("audits_dir".to_string(), dir_source);

        let config_file = match &cli_args.config_path {
            Some(explicit) => {
                let path = absolutize(start_dir, explicit);
                if !path.is_file() {
                    return Err(ConfigError::NotFound {
                        path: path.display().to_string(),
                    }
                    .into());
                }
                Some(to_utf8(path, "config")?)
            }
            None => {
                let candidate = audits_dir.join(CONFIG_FILE_NAME);
                candidate.is_file().then_some(candidate)
            }
        };

        let file_config = match &config_file {
            Some(path) => {
                tracing::debug!(config_file = %path, "Loading configuration file");
                Self::load_config_file(path)?
            }
            None => TomlConfig::default(),
        };
        let file_server = file_config.server.unwrap_or_default();
        let file_logging = file_config.logging.unwrap_or_default();

        let mut server = ServerConfig::default();
        source_attribution.insert("bind".to_string(), ConfigSource::Default);
        source_attribution.insert("port".to_string(), ConfigSource::Default);

        if let Some(bind) = file_server.bind {
            server.bind = bind;
            source_attribution.insert("bind".to_string(), ConfigSource::File);
        }
        if let Some(port) = file_server.port {
            server.port = port;
            source_attribution.insert("port".to_string(), ConfigSource::File);
        }

        if let Some(bind) = &env.bind {
            server.bind = bind.clone();
            source_attribution.insert("bind".to_string(), ConfigSource::Env);
        }
        if let Some(raw) = &env.port {
            server.port = raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: PORT_ENV.to_string(),
                value: format!("'{raw}' is not a valid port"),
            })?;
            source_attribution.insert("port".to_string(), ConfigSource::Env);
        }

        if let Some(bind) = &cli_args.bind {
            server.bind = bind.clone();
            source_attribution.insert("bind".to_string(), ConfigSource::Cli);
        }
        if let Some(port) = cli_args.port {
            server.port = port;
            source_attribution.insert("port".to_string(), ConfigSource::Cli);
        }

        let mut logging = LoggingConfig::default();
        source_attribution.insert("verbose".to_string(), ConfigSource::Default);
        source_attribution.insert("log_json".to_string(), ConfigSource::Default);

        if let Some(verbose) = file_logging.verbose {
            logging.verbose = verbose;
            source_attribution.insert("verbose".to_string(), ConfigSource::File);
        }
        if let Some(json) = file_logging.json {
            logging.json = json;
            source_attribution.insert("log_json".to_string(), ConfigSource::File);
        }
        // Boolean flags can only switch a setting on from the command line.
        if cli_args.verbose == Some(true) {
            logging.verbose = true;
            source_attribution.insert("verbose".to_string(), ConfigSource::Cli);
        }
        if cli_args.log_json == Some(true) {
            logging.json = true;
            source_attribution.insert("log_json".to_string(), ConfigSource::Cli);
        }

        let config = Config {
            audits_dir,
            server,
            logging,
            config_file,
            source_attribution,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    fn load_config_file(path: &Utf8Path) -> Result<TomlConfig, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::InvalidFile(format!("{path}: {e}")))?;
        toml::from_str(&content).map_err(|e| ConfigError::InvalidFile(format!("{path}: {e}")))
    }
}

fn absolutize(start_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        start_dir.join(path)
    }
}

fn resolve_audits_dir(start_dir: &Path, raw: &Path) -> Result<Utf8PathBuf, ConfigError> {
    let joined = absolutize(start_dir, raw);
    let not_found = || ConfigError::DirectoryNotFound {
        path: joined.display().to_string(),
    };
    let canonical = std::fs::canonicalize(&joined).map_err(|_| not_found())?;
    if !canonical.is_dir() {
        return Err(not_found());
    }
    to_utf8(canonical, "audits_dir")
}

fn to_utf8(path: PathBuf, key: &str) -> Result<Utf8PathBuf, ConfigError> {
    Utf8PathBuf::from_path_buf(path).map_err(|p| ConfigError::InvalidValue {
        key: key.to_string(),
        value: format!("{} is not valid UTF-8", p.display()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn cli_for(dir: &TempDir) -> CliArgs {
        CliArgs {
            audits_dir: Some(dir.path().to_path_buf()),
            ..CliArgs::default()
        }
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let dir = TempDir::new().unwrap();
        let config =
            Config::discover_from(dir.path(), &CliArgs::default(), &EnvOverrides::default())
                .unwrap();

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.server.bind, "0.0.0.0");
        assert!(!config.logging.verbose);
        assert!(config.config_file.is_none());
        assert_eq!(
            config.source_attribution.get("port"),
            Some(&ConfigSource::Default)
        );
        assert_eq!(
            config.audits_dir.as_std_path(),
            fs::canonicalize(dir.path()).unwrap()
        );
    }

    #[test]
    fn test_relative_audits_dir_resolves_against_start_dir() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("audits")).unwrap();
        let cli = CliArgs {
            audits_dir: Some(PathBuf::from("audits")),
            ..CliArgs::default()
        };

        let config = Config::discover_from(dir.path(), &cli, &EnvOverrides::default()).unwrap();

        assert!(config.audits_dir.ends_with("audits"));
        assert_eq!(
            config.source_attribution.get("audits_dir"),
            Some(&ConfigSource::Cli)
        );
    }

    #[test]
    fn test_missing_audits_dir_is_rejected() {
        let dir = TempDir::new().unwrap();
        let cli = CliArgs {
            audits_dir: Some(dir.path().join("nope")),
            ..CliArgs::default()
        };

        let err = Config::discover_from(dir.path(), &cli, &EnvOverrides::default()).unwrap_err();
        assert!(matches!(
            err,
            AuditHubError::Config(ConfigError::DirectoryNotFound { .. })
        ));
    }

    #[test]
    fn test_precedence_cli_over_env_over_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[server]\nport = 4100\nbind = \"127.0.0.1\"\n",
        )
        .unwrap();

        let from_file =
            Config::discover_from(dir.path(), &cli_for(&dir), &EnvOverrides::default()).unwrap();
        assert_eq!(from_file.server.port, 4100);
        assert_eq!(from_file.server.bind, "127.0.0.1");
        assert_eq!(
            from_file.source_attribution.get("port"),
            Some(&ConfigSource::File)
        );

        let env = EnvOverrides {
            port: Some("4200".to_string()),
            bind: None,
        };
        let from_env = Config::discover_from(dir.path(), &cli_for(&dir), &env).unwrap();
        assert_eq!(from_env.server.port, 4200);
        assert_eq!(from_env.server.bind, "127.0.0.1");
        assert_eq!(
            from_env.source_attribution.get("port"),
            Some(&ConfigSource::Env)
        );

        let cli = CliArgs {
            port: Some(4300),
            ..cli_for(&dir)
        };
        let from_cli = Config::discover_from(dir.path(), &cli, &env).unwrap();
        assert_eq!(from_cli.server.port, 4300);
        assert_eq!(
            from_cli.source_attribution.get("port"),
            Some(&ConfigSource::Cli)
        );
    }

    #[test]
    fn test_invalid_env_port_is_reported() {
        let dir = TempDir::new().unwrap();
        let env = EnvOverrides {
            port: Some("forty".to_string()),
            bind: None,
        };

        let err = Config::discover_from(dir.path(), &cli_for(&dir), &env).unwrap_err();
        match err {
            AuditHubError::Config(ConfigError::InvalidValue { key, .. }) => {
                assert_eq!(key, "AUDIT_PORT");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_explicit_config_path_must_exist() {
        let dir = TempDir::new().unwrap();
        let cli = CliArgs {
            config_path: Some(PathBuf::from("missing.toml")),
            ..cli_for(&dir)
        };

        let err = Config::discover_from(dir.path(), &cli, &EnvOverrides::default()).unwrap_err();
        assert!(matches!(
            err,
            AuditHubError::Config(ConfigError::NotFound { .. })
        ));
    }

    #[test]
    fn test_unknown_config_keys_are_rejected() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "[server]\nhost = \"x\"\n").unwrap();

        let err = Config::discover_from(dir.path(), &cli_for(&dir), &EnvOverrides::default())
            .unwrap_err();
        assert!(matches!(
            err,
            AuditHubError::Config(ConfigError::InvalidFile(_))
        ));
    }

    #[test]
    fn test_logging_flags_from_file_and_cli() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "[logging]\njson = true\n").unwrap();
        let cli = CliArgs {
            verbose: Some(true),
            log_json: Some(false),
            ..cli_for(&dir)
        };

        let config = Config::discover_from(dir.path(), &cli, &EnvOverrides::default()).unwrap();
        assert!(config.logging.verbose);
        assert!(config.logging.json);
        assert_eq!(
            config.source_attribution.get("log_json"),
            Some(&ConfigSource::File)
        );
    }
}
