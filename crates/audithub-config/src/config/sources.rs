use std::collections::BTreeMap;

use super::{Config, ConfigSource};

fn source_label(source: Option<&ConfigSource>) -> String {
    source.copied().unwrap_or(ConfigSource::Default).as_str().to_string()
}

impl Config {
    /// Get effective configuration as key-value pairs with source attribution
    #[must_use]
    pub fn effective_config(&self) -> BTreeMap<String, (String, String)> {
        let mut config = BTreeMap::new();

        let mut add_config = |key: &str, value: String| {
            let source = source_label(self.source_attribution.get(key));
            config.insert(key.to_string(), (value, source));
        };

        add_config("audits_dir", self.audits_dir.to_string());
        add_config("bind", self.server.bind.clone());
        add_config("port", self.server.port.to_string());
        add_config("verbose", self.logging.verbose.to_string());
        add_config("log_json", self.logging.json.to_string());

        if let Some(path) = &self.config_file {
            config.insert(
                "config_file".to_string(),
                (path.to_string(), ConfigSource::File.as_str().to_string()),
            );
        }

        config
    }
}
