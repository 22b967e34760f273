//! Harness configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `PETSTORE_*` environment variables.

use std::collections::HashMap;
use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Default service under test.
pub const DEFAULT_BASE_URL: &str = "https://petstore.swagger.io/v2";

/// Key the public petstore accepts for protected operations.
pub const DEFAULT_API_KEY: &str = "special-key";

/// File read from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "petstore-e2e.toml";

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_VAR: &str = "PETSTORE_CONFIG";

const ENV_PREFIX: &str = "PETSTORE";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or a value has the wrong type.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// `base_url` is not an absolute http(s) URL.
    #[error("invalid base_url '{url}': {reason}")]
    InvalidBaseUrl {
        /// Configured value.
        url: String,
        /// What is wrong with it.
        reason: String,
    },
}

/// How the binary prints the suite report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Grouped human-readable summary.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Settings for one harness run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Service root; scenario paths are appended to it.
    pub base_url: String,
    /// Value sent in the `api_key` header where a scenario asks for it.
    pub api_key: String,
    /// Per-request timeout. `None` uses the transport default.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// `User-Agent` header.
    pub user_agent: String,
    /// Report output format.
    #[serde(default)]
    pub report_format: ReportFormat,
    /// Stop evaluating a scenario's assertions at its first failure.
    #[serde(default)]
    pub stop_on_failure: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            timeout_ms: None,
            user_agent: default_user_agent(),
            report_format: ReportFormat::Text,
            stop_on_failure: false,
        }
    }
}

fn default_user_agent() -> String {
    format!("petstore-e2e/{}", env!("CARGO_PKG_VERSION"))
}

/// Builds a [`HarnessConfig`] from layered sources.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    file_required: bool,
    env: Option<HashMap<String, String>>,
}

impl ConfigLoader {
    /// Loader using the default optional file and the process environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader honouring `PETSTORE_CONFIG` when it is set.
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var_os(CONFIG_PATH_VAR) {
            Some(path) => Self::new().with_file(PathBuf::from(path)),
            None => Self::new(),
        }
    }

    /// Reads `path` instead of the default file; it must exist.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self.file_required = true;
        self
    }

    /// Uses `vars` instead of the process environment.
    ///
    /// Keys carry the `PETSTORE_` prefix, e.g. `PETSTORE_BASE_URL`.
    #[must_use]
    pub fn with_env_vars(mut self, vars: HashMap<String, String>) -> Self {
        self.env = Some(vars);
        self
    }

    /// Loads and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if a source is unreadable or malformed,
    /// and [`ConfigError::InvalidBaseUrl`] if the base URL is unusable.
    pub fn load(self) -> Result<HarnessConfig, ConfigError> {
        let defaults = HarnessConfig::default();
        let file = self
            .file
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let settings = Config::builder()
            .set_default("base_url", defaults.base_url)?
            .set_default("api_key", defaults.api_key)?
            .set_default("user_agent", defaults.user_agent)?
            .set_default("report_format", "text")?
            .set_default("stop_on_failure", defaults.stop_on_failure)?
            .add_source(File::from(file).required(self.file_required))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(self.env.map(|vars| vars.into_iter().collect())),
            )
            .build()?;

        let mut config: HarnessConfig = settings.try_deserialize()?;
        config.base_url = validate_base_url(&config.base_url)?;
        Ok(config)
    }
}

/// Checks the URL is absolute http(s) and strips trailing slashes.
fn validate_base_url(raw: &str) -> Result<String, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }

    Ok(raw.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn missing_file() -> PathBuf {
        std::env::temp_dir().join("petstore-e2e-does-not-exist.toml")
    }

    #[test]
    fn test_defaults() {
        let config = ConfigLoader {
            file: Some(missing_file()),
            file_required: false,
            env: Some(HashMap::new()),
        }
        .load()
        .unwrap_or_else(|e| panic!("load failed: {e}"));

        assert_eq!(config, HarnessConfig::default());
        assert_eq!(config.base_url, "https://petstore.swagger.io/v2");
        assert_eq!(config.api_key, "special-key");
        assert!(config.user_agent.starts_with("petstore-e2e/"));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap_or_else(|e| panic!("tempfile: {e}"));
        writeln!(
            file,
            "base_url = \"http://localhost:8080/v2/\"\ntimeout_ms = 2500\nreport_format = \"json\""
        )
        .unwrap_or_else(|e| panic!("write: {e}"));

        let config = ConfigLoader::new()
            .with_file(file.path())
            .with_env_vars(HashMap::new())
            .load()
            .unwrap_or_else(|e| panic!("load failed: {e}"));

        assert_eq!(config.base_url, "http://localhost:8080/v2");
        assert_eq!(config.timeout_ms, Some(2500));
        assert_eq!(config.report_format, ReportFormat::Json);
        assert_eq!(config.api_key, "special-key");
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap_or_else(|e| panic!("tempfile: {e}"));
        writeln!(file, "api_key = \"from-file\"").unwrap_or_else(|e| panic!("write: {e}"));

        let config = ConfigLoader::new()
            .with_file(file.path())
            .with_env_vars(env(&[
                ("PETSTORE_API_KEY", "from-env"),
                ("PETSTORE_TIMEOUT_MS", "900"),
            ]))
            .load()
            .unwrap_or_else(|e| panic!("load failed: {e}"));

        assert_eq!(config.api_key, "from-env");
        assert_eq!(config.timeout_ms, Some(900));
    }

    #[test]
    fn test_stop_on_failure_from_file_and_env() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap_or_else(|e| panic!("tempfile: {e}"));
        writeln!(file, "stop_on_failure = true").unwrap_or_else(|e| panic!("write: {e}"));

        let from_file = ConfigLoader::new()
            .with_file(file.path())
            .with_env_vars(HashMap::new())
            .load()
            .unwrap_or_else(|e| panic!("load failed: {e}"));
        assert!(from_file.stop_on_failure);

        let from_env = ConfigLoader::new()
            .with_file(file.path())
            .with_env_vars(env(&[("PETSTORE_STOP_ON_FAILURE", "false")]))
            .load()
            .unwrap_or_else(|e| panic!("load failed: {e}"));
        assert!(!from_env.stop_on_failure);
    }

    #[test]
    fn test_required_file_missing() {
        let result = ConfigLoader::new()
            .with_file(missing_file())
            .with_env_vars(HashMap::new())
            .load();
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn test_invalid_base_url() {
        let result = ConfigLoader::new()
            .with_env_vars(env(&[("PETSTORE_BASE_URL", "ftp://petstore.swagger.io/v2")]))
            .load();
        assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));

        assert!(validate_base_url("petstore.swagger.io").is_err());
    }
}
