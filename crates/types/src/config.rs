//! Configuration types for the Patrimônio360 registry.
//!
//! Configuration is loaded from TOML files or built programmatically via
//! fallible builders. Post-deserialization validation is available via the
//! [`validate`](CoreConfig::validate) method.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use snafu::Snafu;

/// Configuration validation error.
///
/// Returned when a configuration value is outside its valid range or
/// violates a cross-field constraint.
#[derive(Debug, Snafu)]
pub enum ConfigError {
    /// A configuration value is invalid.
    #[snafu(display("invalid config: {message}"))]
    Validation {
        /// Description of the validation failure.
        message: String,
    },
}

/// Maximum provider timeout: one minute. Anything longer stalls the
/// triggering user action past usefulness.
const MAX_TIMEOUT_SECS: u64 = 60;

/// Main configuration for a registry installation.
#[derive(Debug, Clone, bon::Builder, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Directory for the registry database file.
    #[builder(into)]
    pub data_dir: PathBuf,
    /// Display name stamped on audit log entries; empty when unknown.
    #[serde(default)]
    #[builder(into, default)]
    pub user_display_name: String,
    /// Document analysis provider settings.
    #[serde(default)]
    #[builder(default)]
    pub analysis: AnalysisConfig,
    /// Reference lookup settings.
    #[serde(default)]
    #[builder(default)]
    pub reference: ReferenceConfig,
}

impl CoreConfig {
    /// Validates the full configuration tree.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] describing the first violated
    /// constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation { message: "data_dir must not be empty".into() });
        }
        self.analysis.validate()?;
        self.reference.validate()?;
        Ok(())
    }
}

/// Document analysis provider configuration.
///
/// # Validation Rules
///
/// - `model` must not be empty
/// - `timeout_secs` must be 1–60
#[derive(Debug, Clone, PartialEq, Eq, bon::Builder, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Provider API key; `None` disables analysis (callers get the fallback
    /// report).
    #[serde(default)]
    #[builder(into)]
    pub api_key: Option<String>,
    /// Model name requested from the provider.
    #[serde(default = "default_model")]
    #[builder(into, default = default_model())]
    pub model: String,
    /// Per-call timeout in seconds.
    #[serde(default = "default_analysis_timeout")]
    #[builder(default = default_analysis_timeout())]
    pub timeout_secs: u64,
}

impl AnalysisConfig {
    /// Returns the per-call timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validates this section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if a constraint is violated.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.is_empty() {
            return Err(ConfigError::Validation { message: "analysis.model must not be empty".into() });
        }
        if self.timeout_secs == 0 || self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::Validation {
                message: format!(
                    "analysis.timeout_secs must be 1-{MAX_TIMEOUT_SECS}, found {}",
                    self.timeout_secs
                ),
            });
        }
        Ok(())
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self { api_key: None, model: default_model(), timeout_secs: default_analysis_timeout() }
    }
}

/// Reference lookup (address, company, index series) configuration.
///
/// # Validation Rules
///
/// - `timeout_secs` must be 1–60
/// - `retry_attempts` must be 1–10
#[derive(Debug, Clone, PartialEq, Eq, bon::Builder, Serialize, Deserialize)]
pub struct ReferenceConfig {
    /// Per-call timeout in seconds.
    #[serde(default = "default_reference_timeout")]
    #[builder(default = default_reference_timeout())]
    pub timeout_secs: u64,
    /// Total attempts per lookup (initial call plus retries).
    #[serde(default = "default_retry_attempts")]
    #[builder(default = default_retry_attempts())]
    pub retry_attempts: u32,
}

impl ReferenceConfig {
    /// Returns the per-call timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validates this section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if a constraint is violated.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 || self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::Validation {
                message: format!(
                    "reference.timeout_secs must be 1-{MAX_TIMEOUT_SECS}, found {}",
                    self.timeout_secs
                ),
            });
        }
        if self.retry_attempts == 0 || self.retry_attempts > 10 {
            return Err(ConfigError::Validation {
                message: format!(
                    "reference.retry_attempts must be 1-10, found {}",
                    self.retry_attempts
                ),
            });
        }
        Ok(())
    }
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self { timeout_secs: default_reference_timeout(), retry_attempts: default_retry_attempts() }
    }
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_analysis_timeout() -> u64 {
    30
}

fn default_reference_timeout() -> u64 {
    8
}

fn default_retry_attempts() -> u32 {
    3
}
