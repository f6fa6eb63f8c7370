use std::path::Path;

use serde::Deserialize;
use tracing_subscriber::filter::LevelFilter;

use crate::wizard::state::NavigationPolicy;

pub const DEFAULT_FILE_NAME: &str = "gui.toml";
pub const DEFAULT_API_URL: &str = "https://findwali.dusrasoftltd.com/api";

/// Settings read from `gui.toml` in the datadir. Everything has a default,
/// running without the file is supported.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// one of "off", "error", "warn", "info", "debug", "trace".
    pub log_level: Option<String>,
    #[serde(default)]
    pub navigation: Navigation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Navigation {
    #[default]
    Free,
    Linear,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            log_level: None,
            navigation: Navigation::default(),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::NotFound,
            _ => ConfigError::ReadingFile(format!("Reading configuration file: {}", e)),
        })?;
        toml::from_str::<Config>(&content)
            .map_err(|e| ConfigError::ReadingFile(format!("Parsing configuration file: {}", e)))
    }

    pub fn log_level(&self) -> Result<LevelFilter, ConfigError> {
        match &self.log_level {
            Some(level) => level
                .parse()
                .map_err(|_| ConfigError::InvalidField("log_level", level.clone())),
            None => Ok(LevelFilter::INFO),
        }
    }

    pub fn navigation_policy(&self) -> NavigationPolicy {
        match self.navigation {
            Navigation::Free => NavigationPolicy::Free,
            Navigation::Linear => NavigationPolicy::Linear,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    NotFound,
    ReadingFile(String),
    InvalidField(&'static str, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "Configuration file not found"),
            Self::ReadingFile(e) => write!(f, "{}", e),
            Self::InvalidField(field, value) => {
                write!(f, "Invalid value for '{}': '{}'", field, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn an_empty_file_yields_the_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.log_level(), Ok(LevelFilter::INFO));
        assert_eq!(config.navigation, Navigation::Free);
    }

    #[test]
    fn fields_override_the_defaults() {
        let config: Config = toml::from_str(
            r#"
            api_url = "http://localhost:5000/api"
            log_level = "debug"
            navigation = "linear"
            "#,
        )
        .unwrap();
        assert_eq!(config.api_url, "http://localhost:5000/api");
        assert_eq!(config.log_level(), Ok(LevelFilter::DEBUG));
        assert_eq!(config.navigation_policy(), NavigationPolicy::Linear);
    }

    #[test]
    fn a_bogus_log_level_is_reported() {
        let config: Config = toml::from_str("log_level = \"noisy\"").unwrap();
        assert_eq!(
            config.log_level(),
            Err(ConfigError::InvalidField("log_level", "noisy".to_string()))
        );
    }
}
