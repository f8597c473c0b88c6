use std::{path::Path, time::Duration};

use eyre::WrapErr;
use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::consts;
use crate::error::ConfigError;

/// Settings of a breach checker, read once and never mutated afterwards.
///
/// Every field is optional in the TOML file:
///
/// ```toml
/// timeout_sec = 1.5
/// fail_safe = false
/// url = "https://api.pwnedpasswords.com/range/{password}"
/// ```
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    #[serde(rename = "timeout_sec", deserialize_with = "deserialize_timeout")]
    pub timeout: Duration,
    pub fail_safe: bool,
    pub url: String, // must contain consts::URL_PLACEHOLDER
    pub error_msg: String,
    pub error_fail_msg: String,
    pub help_text: String,
    pub min_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout: consts::DEFAULT_TIMEOUT,
            fail_safe: consts::DEFAULT_FAIL_SAFE,
            url: consts::DEFAULT_URL.to_owned(),
            error_msg: consts::DEFAULT_ERROR_MSG.to_owned(),
            error_fail_msg: consts::DEFAULT_ERROR_FAIL_MSG.to_owned(),
            help_text: consts::DEFAULT_HELP_TEXT.to_owned(),
            min_length: consts::DEFAULT_MIN_LENGTH,
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let path = path.as_ref();
        let buf = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config file {}", path.display()))?;

        let config = Self::from_toml_str(&buf)
            .wrap_err_with(|| format!("invalid config file {}", path.display()))?;

        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(s: &str) -> eyre::Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.url.contains(consts::URL_PLACEHOLDER) {
            return Err(ConfigError::MissingPlaceholder(self.url.clone()));
        }
        Ok(())
    }

    /// Substitutes `prefix` into the url template.
    pub fn range_url(&self, prefix: &str) -> String {
        self.url.replace(consts::URL_PLACEHOLDER, prefix)
    }

    pub fn with_timeout_secs(mut self, secs: f64) -> Result<Self, ConfigError> {
        self.timeout = timeout_from_secs(secs)?;
        Ok(self)
    }
}

fn timeout_from_secs(secs: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::InvalidTimeout(secs))
}

fn deserialize_timeout<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
    let secs = f64::deserialize(d)?;
    timeout_from_secs(secs).map_err(serde::de::Error::custom)
}
