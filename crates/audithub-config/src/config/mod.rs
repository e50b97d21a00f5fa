//! Configuration management for audithub
//!
//! Hierarchical configuration with discovery and precedence:
//! CLI > environment > file > defaults. The optional TOML file carries
//! `[server]` and `[logging]` sections.

mod discovery;
mod model;
mod sources;
mod validation;

pub use model::*;

use audithub_utils::logging::LogOptions;

impl Config {
    /// Address the listener binds to, as `host:port`.
    ///
    /// IPv6 hosts are bracketed so the result parses as a socket address.
    #[must_use]
    pub fn socket_addr(&self) -> String {
        if self.server.bind.contains(':') {
            format!("[{}]:{}", self.server.bind, self.server.port)
        } else {
            format!("{}:{}", self.server.bind, self.server.port)
        }
    }

    /// Subscriber options derived from the `[logging]` settings.
    #[must_use]
    pub fn log_options(&self) -> LogOptions {
        LogOptions {
            verbose: self.logging.verbose,
            json: self.logging.json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use std::collections::BTreeMap;

    fn config_with_bind(bind: &str) -> Config {
        Config {
            audits_dir: Utf8PathBuf::from("/tmp/audits"),
            server: ServerConfig {
                bind: bind.to_string(),
                port: 4000,
            },
            logging: LoggingConfig::default(),
            config_file: None,
            source_attribution: BTreeMap::new(),
        }
    }

    #[test]
    fn test_socket_addr_formats() {
        assert_eq!(config_with_bind("0.0.0.0").socket_addr(), "0.0.0.0:4000");
        assert_eq!(config_with_bind("::1").socket_addr(), "[::1]:4000");
    }

    #[test]
    fn test_socket_addr_parses() {
        for bind in ["127.0.0.1", "::"] {
            let addr: std::net::SocketAddr = config_with_bind(bind).socket_addr().parse().unwrap();
            assert_eq!(addr.port(), 4000);
        }
    }
}
