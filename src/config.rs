//! Configuration loading

use std::path::Path;

use bus::AppConfiguration;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub shell: ShellConfig,
    /// Flags reported to the dashboard on `config/get`
    #[serde(default)]
    pub capabilities: AppConfiguration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShellConfig {
    /// Dashboard loaded into the web view
    #[serde(default = "default_dashboard_url")]
    pub dashboard_url: String,
    /// Name of the script message handler the dashboard posts to
    #[serde(default = "default_message_handler")]
    pub message_handler: String,
    /// JavaScript function receiving native messages
    #[serde(default = "default_script_receiver")]
    pub script_receiver: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            dashboard_url: default_dashboard_url(),
            message_handler: default_message_handler(),
            script_receiver: default_script_receiver(),
        }
    }
}

fn default_dashboard_url() -> String {
    "http://homeassistant.local:8123/?external_auth=1".to_string()
}

fn default_message_handler() -> String {
    "externalBus".to_string()
}

fn default_script_receiver() -> String {
    bus::emit::DEFAULT_SCRIPT_RECEIVER.to_string()
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

/// Loads the configuration file, falling back to defaults when it is missing.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config = Config::from_toml(&content)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.shell.message_handler, "externalBus");
        assert_eq!(config.shell.script_receiver, "window.externalBus");
        assert_eq!(config.capabilities, AppConfiguration::default());
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config = Config::from_toml(
            r#"
[shell]
dashboard_url = "https://ha.example.org/lovelace/0?external_auth=1"

[capabilities]
can_write_tag = true
has_assist = false
"#,
        )
        .unwrap();

        assert_eq!(
            config.shell.dashboard_url,
            "https://ha.example.org/lovelace/0?external_auth=1"
        );
        assert_eq!(config.shell.message_handler, "externalBus");
        assert!(config.capabilities.can_write_tag);
        assert!(!config.capabilities.has_assist);
        assert!(config.capabilities.has_barcode_scanner);
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let err = Config::from_toml("[shell\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = load_config(Path::new("/nonexistent/casa-shell.toml")).unwrap();
        assert_eq!(config.shell.dashboard_url, default_dashboard_url());
    }
}
