//! # Configuration Management for SqlHaus
//!
//! This crate provides the configuration structures for SqlHaus: how
//! statements are rendered and a catalog of named, declaratively described
//! statements.
//!
//! ## TOML File Configuration
//! ```toml
//! [render]
//! placeholder = "named"   # "none" | "named" | "wildcard"
//! wildcard = "?"
//!
//! [statements.active_users]
//! select = ["id", "name"]
//! from = "users"
//! where = ["active = 1"]
//! orderBy = [["name", "ASC"]]
//! limit = 10
//! ```
//!
//! Statement tables use the same keys as bulk statement parameters and are
//! kept as raw TOML here; interpreting them is up to the caller.
//!
//! Load configuration:
//! ```rust,ignore
//! use config::AppConfig;
//!
//! // Load from the path in SQLHAUS_CONFIG, or ./sqlhaus.toml
//! let config = AppConfig::load()?;
//!
//! // Or load from custom path
//! let config = AppConfig::from_file("config/production.toml")?;
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{env, path::Path};
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "./sqlhaus.toml";
const CONFIG_PATH_VAR: &str = "SQLHAUS_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Environment variable error: {0}")]
    Env(#[from] env::VarError),
    #[error("Dotenvy error: {0}")]
    Dotenvy(#[from] dotenvy::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub render: RenderConfig,
    /// Named statements, keyed by catalog name
    #[serde(default)]
    pub statements: BTreeMap<String, toml::Table>,
}

/// How INSERT/UPDATE values are written into statements
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderStyle {
    /// Quoted literal values
    #[default]
    None,
    /// `:column` parameters
    Named,
    /// The configured wildcard token for every value
    Wildcard,
}

/// Statement rendering configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default)]
    pub placeholder: PlaceholderStyle,
    #[serde(default = "default_wildcard")]
    pub wildcard: String,
}

fn default_wildcard() -> String {
    "?".to_string()
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            placeholder: PlaceholderStyle::default(),
            wildcard: default_wildcard(),
        }
    }
}

impl RenderConfig {
    /// Create a new render configuration
    pub fn new(placeholder: PlaceholderStyle, wildcard: String) -> Self {
        Self {
            placeholder,
            wildcard,
        }
    }
}

impl AppConfig {
    /// Load configuration from the TOML file named by `SQLHAUS_CONFIG`
    /// (from the environment or `.env`), falling back to `./sqlhaus.toml`
    pub fn load() -> Result<Self, ConfigError> {
        let config = {
            // A missing .env file is fine, a malformed one is not
            if let Err(err) = dotenvy::dotenv() {
                if !err.not_found() {
                    return Err(err.into());
                }
            }

            if let Ok(config_path) = env::var(CONFIG_PATH_VAR) {
                Self::from_file(&config_path)
            } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
                Self::from_file(DEFAULT_CONFIG_PATH)
            } else {
                Err(ConfigError::Invalid(format!(
                    "Config path must be specified as {} in the environment or .env file, or in {} file",
                    CONFIG_PATH_VAR, DEFAULT_CONFIG_PATH
                )))
            }
        }?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.render.placeholder == PlaceholderStyle::Wildcard
            && self.render.wildcard.trim().is_empty()
        {
            return Err(ConfigError::Invalid(
                "Render wildcard cannot be empty when placeholder is \"wildcard\"".to_string(),
            ));
        }

        for (name, statement) in &self.statements {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "Statement name cannot be empty".to_string(),
                ));
            }
            if !statement.contains_key("sql") && !statement.contains_key("from") {
                return Err(ConfigError::Invalid(format!(
                    "Statement '{}' must set either sql or from",
                    name
                )));
            }
        }

        Ok(())
    }
}
