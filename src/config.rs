//! Application configuration
//!
//! Settings are layered: built-in defaults, then an optional YAML file, then
//! environment variables, then command-line flags. Everything the fetcher
//! and presentation layer need is resolved here once at startup and passed
//! down explicitly.
//!
//! ```yaml
//! base_url: https://newsapi.org/v2/
//! api_key: 0123456789abcdef
//! country: jp
//! page_size: 100
//! timeout_secs: 30
//! utc_offset_hours: 9
//! prefetch_distance: 5
//! ```

use crate::datetime::{DateConverter, DEFAULT_OFFSET_HOURS};
use crate::error::{Error, Result, ResultExt};
use crate::fetch::API_KEY_HEADER;
use crate::http::HttpClientConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Environment variable holding the API key
pub const ENV_API_KEY: &str = "NEWS_API_KEY";

/// Environment variable overriding the base URL
pub const ENV_BASE_URL: &str = "NEWS_API_BASE_URL";

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2/";

// ============================================================================
// AppConfig
// ============================================================================

/// Resolved application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// API base URL
    pub base_url: String,

    /// API key, sent as the `X-Api-Key` header
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Country code for headlines
    pub country: String,

    /// Articles requested per page
    pub page_size: u32,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Display offset for publication dates, in hours east of UTC
    pub utc_offset_hours: i32,

    /// User agent override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// How close to the end of the feed a consumer may scroll before
    /// the next page is requested
    pub prefetch_distance: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            country: "jp".to_string(),
            page_size: 100,
            timeout_secs: 30,
            utc_offset_hours: DEFAULT_OFFSET_HOURS,
            user_agent: None,
            prefetch_distance: 5,
        }
    }
}

impl AppConfig {
    /// Parse config from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load config from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&contents)
    }

    /// Load from an optional file, falling back to defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Apply overrides from the process environment
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    #[must_use]
    pub fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = lookup(ENV_API_KEY).filter(|v| !v.trim().is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.base_url = url;
        }
        self
    }

    /// Override the API key
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Override the base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Check the settings for values that cannot work
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.base_url)
            .map_err(|e| Error::invalid_value("base_url", format!("{}: {e}", self.base_url)))?;

        if self.page_size == 0 {
            return Err(Error::invalid_value("page_size", "must be at least 1"));
        }

        if self.timeout_secs == 0 {
            return Err(Error::invalid_value("timeout_secs", "must be at least 1"));
        }

        if self.country.trim().is_empty() {
            return Err(Error::invalid_value("country", "must not be empty"));
        }

        self.date_converter()?;
        Ok(())
    }

    /// Request timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Date converter for the configured display offset
    pub fn date_converter(&self) -> Result<DateConverter> {
        DateConverter::with_offset_hours(self.utc_offset_hours).ok_or_else(|| {
            Error::invalid_value(
                "utc_offset_hours",
                format!("{} is outside -23..=23", self.utc_offset_hours),
            )
        })
    }

    /// HTTP client settings for the news API.
    ///
    /// Fails when no API key has been configured.
    pub fn http_config(&self) -> Result<HttpClientConfig> {
        self.validate()?;

        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| Error::missing_field("api_key"))?;

        let mut builder = HttpClientConfig::builder()
            .base_url(&self.base_url)
            .timeout(self.timeout())
            .header(API_KEY_HEADER, api_key);

        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent);
        }

        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.base_url, "https://newsapi.org/v2/");
        assert_eq!(config.country, "jp");
        assert_eq!(config.page_size, 100);
        assert_eq!(config.utc_offset_hours, 9);
        assert!(config.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = AppConfig::from_yaml_str("country: us\npage_size: 20\n").unwrap();
        assert_eq!(
            config,
            AppConfig {
                country: "us".to_string(),
                page_size: 20,
                ..AppConfig::default()
            }
        );
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(AppConfig::from_yaml_str("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_invalid_yaml() {
        let err = AppConfig::from_yaml_str("page_size: [1, 2]").unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_key: abc\nutc_offset_hours: 0").unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("abc"));
        assert_eq!(config.utc_offset_hours, 0);
    }

    #[test]
    fn test_missing_file() {
        let err = AppConfig::from_file("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
        assert!(AppConfig::load(None).is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::default().with_env_from(|key| match key {
            ENV_API_KEY => Some("from-env".to_string()),
            ENV_BASE_URL => Some("http://localhost:9999/".to_string()),
            _ => None,
        });
        assert_eq!(config.api_key.as_deref(), Some("from-env"));
        assert_eq!(config.base_url, "http://localhost:9999/");
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let config = AppConfig::default()
            .with_api_key("file-key")
            .with_env_from(|_| Some("  ".to_string()));
        assert_eq!(config.api_key.as_deref(), Some("file-key"));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad_url = AppConfig::default().with_base_url("not a url");
        assert!(bad_url.validate().is_err());

        let zero_page = AppConfig {
            page_size: 0,
            ..AppConfig::default()
        };
        assert!(zero_page.validate().is_err());

        let bad_offset = AppConfig {
            utc_offset_hours: 30,
            ..AppConfig::default()
        };
        let err = bad_offset.validate().unwrap_err();
        assert!(err.to_string().contains("utc_offset_hours"));
    }

    #[test]
    fn test_http_config_requires_api_key() {
        let err = AppConfig::default().http_config().unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { ref field } if field == "api_key"));
    }

    #[test]
    fn test_http_config_sets_key_header() {
        let http = AppConfig::default()
            .with_api_key("secret")
            .http_config()
            .unwrap();
        assert_eq!(http.base_url.as_deref(), Some(DEFAULT_BASE_URL));
        assert_eq!(
            http.default_headers.get(API_KEY_HEADER),
            Some(&"secret".to_string())
        );
        assert_eq!(http.timeout, Duration::from_secs(30));
    }
}
