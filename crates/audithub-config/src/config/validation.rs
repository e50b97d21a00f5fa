use std::net::IpAddr;

use crate::error::{AuditHubError, ConfigError};

use super::Config;

impl Config {
    /// Validate configuration values
    pub(crate) fn validate(&self) -> Result<(), AuditHubError> {
        if self.server.port == 0 {
            return Err(AuditHubError::Config(ConfigError::InvalidValue {
                key: "port".to_string(),
                value: "must be greater than 0".to_string(),
            }));
        }

        if self.server.bind.parse::<IpAddr>().is_err() {
            return Err(AuditHubError::Config(ConfigError::InvalidValue {
                key: "bind".to_string(),
                value: format!("'{}' is not an IP address", self.server.bind),
            }));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::{LoggingConfig, ServerConfig};
    use super::*;
    use camino::Utf8PathBuf;
    use std::collections::BTreeMap;

    fn config(bind: &str, port: u16) -> Config {
        Config {
            audits_dir: Utf8PathBuf::from("/tmp/audits"),
            server: ServerConfig {
                bind: bind.to_string(),
                port,
            },
            logging: LoggingConfig::default(),
            config_file: None,
            source_attribution: BTreeMap::new(),
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(config("0.0.0.0", 4000).validate().is_ok());
        assert!(config("::1", 65535).validate().is_ok());
    }

    #[test]
    fn test_zero_port_rejected() {
        let err = config("127.0.0.1", 0).validate().unwrap_err();
        match err {
            AuditHubError::Config(ConfigError::InvalidValue { key, .. }) => assert_eq!(key, "port"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_hostname_bind_rejected() {
        let err = config("localhost", 4000).validate().unwrap_err();
        match err {
            AuditHubError::Config(ConfigError::InvalidValue { key, value }) => {
                assert_eq!(key, "bind");
                assert!(value.contains("localhost"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
