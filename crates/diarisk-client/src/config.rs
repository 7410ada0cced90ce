//! Completion service configuration.
//!
//! Configuration comes from an optional TOML file, then environment
//! overrides, then validation. Every field has a default, so an empty file
//! (or no file at all) is a working configuration.
//!
//! ```toml
//! base_url = "https://api.openai.com/v1"
//! model = "gpt-3.5-turbo"
//! temperature = 0.3
//! json_mode = true
//! api_key_env = "OPENAI_API_KEY"
//! timeout_secs = 30
//! ```

use std::env;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use diarisk_contracts::error::{DiariskError, DiariskResult};
use diarisk_core::prompt::{PromptOptions, DEFAULT_TEMPERATURE};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variables that override file or default values.
pub const ENV_BASE_URL: &str = "DIARISK_BASE_URL";
pub const ENV_MODEL: &str = "DIARISK_MODEL";
pub const ENV_TEMPERATURE: &str = "DIARISK_TEMPERATURE";

/// Settings for the OpenAI-compatible completion service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    /// API root; `/chat/completions` is appended.
    pub base_url: String,
    pub model: String,
    /// Sampling temperature, 0.0 to 2.0.
    pub temperature: f64,
    /// Request a JSON-object response format.
    pub json_mode: bool,
    /// Name of the environment variable holding the API key. The key itself
    /// never lives in the configuration.
    pub api_key_env: String,
    /// Whole-request timeout. `None` keeps the HTTP client's default.
    pub timeout_secs: Option<u64>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            json_mode: true,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            timeout_secs: None,
        }
    }
}

impl ServiceConfig {
    /// Parse `s` as TOML and validate the result.
    ///
    /// Returns `DiariskError::Config` if the TOML is malformed, names an
    /// unknown key, or holds an out-of-range value.
    pub fn from_toml_str(s: &str) -> DiariskResult<Self> {
        let config: ServiceConfig = toml::from_str(s).map_err(|e| DiariskError::Config {
            reason: format!("failed to parse service config TOML: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read the file at `path` and parse it as TOML service configuration.
    pub fn from_file(path: &Path) -> DiariskResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| DiariskError::Config {
            reason: format!("failed to read service config '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> DiariskResult<Self> {
        Self::default().with_overrides(|name| env::var(name).ok())
    }

    /// Load from `path` if given (defaults otherwise), then apply environment
    /// overrides.
    pub fn load(path: Option<&Path>) -> DiariskResult<Self> {
        let base = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        base.with_overrides(|name| env::var(name).ok())
    }

    /// Apply overrides looked up by environment variable name, then validate.
    ///
    /// Blank values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> DiariskResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(model) = get(ENV_MODEL) {
            self.model = model;
        }
        if let Some(raw) = get(ENV_TEMPERATURE) {
            self.temperature = raw.trim().parse().map_err(|_| DiariskError::Config {
                reason: format!("{ENV_TEMPERATURE} must be a number, got '{raw}'"),
            })?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Check value ranges.
    pub fn validate(&self) -> DiariskResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(config_error("base_url must not be empty"));
        }
        if self.model.trim().is_empty() {
            return Err(config_error("model must not be empty"));
        }
        if self.api_key_env.trim().is_empty() {
            return Err(config_error("api_key_env must not be empty"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(config_error(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }
        if self.timeout_secs == Some(0) {
            return Err(config_error("timeout_secs must be greater than zero"));
        }
        Ok(())
    }

    /// The API key from the configured environment variable, if set.
    pub fn api_key(&self) -> Option<String> {
        env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// The request knobs this configuration implies.
    pub fn prompt_options(&self) -> PromptOptions {
        PromptOptions {
            temperature: self.temperature,
            json_mode: self.json_mode,
        }
    }
}

fn config_error(reason: impl Into<String>) -> DiariskError {
    DiariskError::Config {
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let config = ServiceConfig::from_toml_str("").unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert_eq!(config.temperature, 0.3);
        assert!(config.json_mode);
        assert_eq!(config.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn toml_values_override_defaults() {
        let config = ServiceConfig::from_toml_str(
            r#"
            base_url = "http://localhost:8080/v1"
            model = "gpt-4o-mini"
            temperature = 0.0
            json_mode = false
            timeout_secs = 20
            "#,
        )
        .unwrap();

        assert_eq!(config.base_url, "http://localhost:8080/v1");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.temperature, 0.0);
        assert!(!config.json_mode);
        assert_eq!(config.timeout(), Some(Duration::from_secs(20)));
        assert_eq!(
            config.prompt_options(),
            PromptOptions {
                temperature: 0.0,
                json_mode: false
            }
        );
    }

    #[test]
    fn unknown_toml_keys_are_rejected() {
        let err = ServiceConfig::from_toml_str("api_key = \"sk-secret\"").unwrap_err();
        assert!(matches!(err, DiariskError::Config { .. }));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        for toml in ["temperature = 2.5", "temperature = -0.1", "model = \"  \"", "timeout_secs = 0"] {
            let err = ServiceConfig::from_toml_str(toml).unwrap_err();
            assert!(
                err.to_string().starts_with("configuration error"),
                "{toml}: {err}"
            );
        }
    }

    #[test]
    fn overrides_apply_and_blank_values_are_ignored() {
        let config = ServiceConfig::default()
            .with_overrides(lookup(&[
                (ENV_MODEL, "gpt-4o"),
                (ENV_TEMPERATURE, " 0.7 "),
                (ENV_BASE_URL, "   "),
            ]))
            .unwrap();

        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn non_numeric_temperature_override_is_rejected() {
        let err = ServiceConfig::default()
            .with_overrides(lookup(&[(ENV_TEMPERATURE, "warm")]))
            .unwrap_err();
        assert!(err.to_string().contains("DIARISK_TEMPERATURE"), "got: {err}");
    }

    #[test]
    fn missing_config_file_is_a_config_error() {
        let err = ServiceConfig::from_file(Path::new("/nonexistent/diarisk.toml")).unwrap_err();
        assert!(matches!(err, DiariskError::Config { .. }));
    }
}
