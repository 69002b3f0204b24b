//! Runtime configuration for the lifecycle engine.
//!
//! Configuration is read from TOML. Every section is optional and falls back
//! to the defaults below, so an empty document is a valid configuration.
//!
//! # Examples
//!
//! ```
//! use taskmarket::config::MarketplaceConfig;
//!
//! let config = MarketplaceConfig::from_toml_str(
//!     "[limits]\nmax_reason_length = 120\n",
//! )
//! .expect("valid configuration");
//! assert_eq!(config.limits.max_reason_length, 120);
//! assert!(config.notifications.enabled);
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Environment variable naming the configuration file to load.
pub const CONFIG_PATH_ENV: &str = "TASKMARKET_CONFIG";

/// Errors returned while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file: {0}")]
    Read(#[from] std::io::Error),
    /// The configuration document is not valid TOML for this schema.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// The configuration parsed but holds unusable values.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Notification dispatch settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Whether notification intents are handed to the emitter at all.
    pub enabled: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Upper bounds on free-text payload fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextLimits {
    /// Maximum characters in a cancellation, rejection or report reason.
    pub max_reason_length: usize,
    /// Maximum characters in descriptions, resolutions and admin notes.
    pub max_description_length: usize,
    /// Maximum number of custom agreement clauses.
    pub max_custom_clauses: usize,
}

impl Default for TextLimits {
    fn default() -> Self {
        Self {
            max_reason_length: 500,
            max_description_length: 5_000,
            max_custom_clauses: 20,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketplaceConfig {
    /// Notification dispatch settings.
    pub notifications: NotificationConfig,
    /// Free-text limits.
    pub limits: TextLimits,
}

impl MarketplaceConfig {
    /// Creates a lenient configuration with generous text limits.
    ///
    /// Useful for imports of historical data.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            limits: TextLimits {
                max_reason_length: 10_000,
                max_description_length: 100_000,
                max_custom_clauses: 200,
            },
            ..Self::default()
        }
    }

    /// Creates a strict configuration with reduced limits.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            notifications: NotificationConfig { enabled: true },
            limits: TextLimits {
                max_reason_length: 200,
                max_description_length: 1_000,
                max_custom_clauses: 5,
            },
        }
    }

    /// Parses configuration from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] when a limit is zero.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read, otherwise
    /// the errors of [`Self::from_toml_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Loads configuration from the file named by [`CONFIG_PATH_ENV`], or
    /// returns the defaults when the variable is unset.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::from_file`] when the variable is set.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let limits = &self.limits;
        if limits.max_reason_length == 0 || limits.max_description_length == 0 {
            return Err(ConfigError::Invalid(
                "text limits must be greater than zero".to_owned(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, MarketplaceConfig, TextLimits};
    use rstest::rstest;

    #[rstest]
    fn empty_document_yields_defaults() {
        let config = MarketplaceConfig::from_toml_str("").expect("empty config is valid");
        assert_eq!(config, MarketplaceConfig::default());
    }

    #[rstest]
    fn sections_override_individual_fields() {
        let config = MarketplaceConfig::from_toml_str(
            "[notifications]\nenabled = false\n\n[limits]\nmax_custom_clauses = 3\n",
        )
        .expect("valid config");

        assert!(!config.notifications.enabled);
        assert_eq!(config.limits.max_custom_clauses, 3);
        assert_eq!(
            config.limits.max_reason_length,
            TextLimits::default().max_reason_length
        );
    }

    #[rstest]
    fn zero_reason_length_is_invalid() {
        let result = MarketplaceConfig::from_toml_str("[limits]\nmax_reason_length = 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[rstest]
    fn malformed_toml_is_a_parse_error() {
        let result = MarketplaceConfig::from_toml_str("[limits\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[rstest]
    fn strict_preset_tightens_limits() {
        let strict = MarketplaceConfig::strict();
        let defaults = MarketplaceConfig::default();
        assert!(strict.limits.max_reason_length < defaults.limits.max_reason_length);
        assert!(MarketplaceConfig::lenient().limits.max_custom_clauses > 20);
    }
}
