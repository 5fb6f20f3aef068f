//! Client configuration
//!
//! This module provides configuration structures and builders for the extraction client.

use std::time::Duration;

use derive_builder::Builder;
use url::Url;

use crate::error::{Error, Result};

/// Default base URL of the current API.
pub const DEFAULT_BASE_URL: &str = "https://llmwhisperer-api.unstract.com/api/v2";

/// Default base URL of the legacy API.
pub const DEFAULT_LEGACY_BASE_URL: &str = "https://llmwhisperer-api.unstract.com/v1";

/// Environment variable overriding the base URL of the current API.
pub const BASE_URL_ENV: &str = "LLMWHISPERER_BASE_URL_V2";

/// Environment variable overriding the base URL of the legacy API.
pub const LEGACY_BASE_URL_ENV: &str = "LLMWHISPERER_BASE_URL";

/// Configuration for the extraction client
///
/// Contains the endpoint and the timeouts applied to every request. Submissions
/// additionally honour the synchronous window of the request being sent.
#[derive(Debug, Clone, Builder)]
#[builder(
    name = "WhisperBuilder",
    pattern = "owned",
    setter(into, strip_option, prefix = "with"),
    build_fn(validate = "Self::validate_config")
)]
pub struct WhisperConfig {
    /// Base URL of the API, endpoint paths are appended to it
    #[builder(setter(custom), default = "WhisperConfig::default_base_url()")]
    pub base_url: Url,
    /// Timeout of status, retrieve and management requests
    #[builder(default = "Duration::from_secs(120)")]
    pub api_timeout: Duration,
    /// Connection timeout duration
    #[builder(default = "Duration::from_secs(10)")]
    pub connect_timeout: Duration,
    /// User agent string for requests
    #[builder(default = "WhisperConfig::default_user_agent()")]
    pub user_agent: String,
}

impl Default for WhisperConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            api_timeout: Duration::from_secs(120),
            connect_timeout: Duration::from_secs(10),
            user_agent: Self::default_user_agent(),
        }
    }
}

impl WhisperConfig {
    /// Create a new configuration builder
    pub fn builder() -> WhisperBuilder {
        WhisperBuilder::default()
    }

    /// Default configuration, with the base URL taken from `LLMWHISPERER_BASE_URL_V2` when set.
    pub fn from_env() -> Result<Self> {
        Self::from_env_var(BASE_URL_ENV, DEFAULT_BASE_URL)
    }

    /// Default legacy configuration, with the base URL taken from `LLMWHISPERER_BASE_URL` when set.
    pub fn legacy_from_env() -> Result<Self> {
        Self::from_env_var(LEGACY_BASE_URL_ENV, DEFAULT_LEGACY_BASE_URL)
    }

    fn from_env_var(var: &str, default: &str) -> Result<Self> {
        let base_url = std::env::var(var)
            .ok()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| default.to_string());

        Ok(Self::builder().with_base_url(&base_url)?.build()?)
    }

    /// Resolves an endpoint path against the base URL.
    ///
    /// The path is appended as a new segment, so a base of `.../api/v2` and a
    /// path of `whisper` give `.../api/v2/whisper`.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::invalid_config(format!("Base URL '{}' cannot have paths", self.base_url)))?
            .pop_if_empty()
            .push(path);
        Ok(url)
    }

    fn default_base_url() -> Url {
        Url::parse(DEFAULT_BASE_URL).expect("Valid default URL")
    }

    fn default_user_agent() -> String {
        format!("llmwhisperer/{}", env!("CARGO_PKG_VERSION"))
    }
}

impl WhisperBuilder {
    /// Set the base URL for the API
    pub fn with_base_url(mut self, url: &str) -> Result<Self> {
        let parsed: Url = url
            .parse()
            .map_err(|e| Error::invalid_config(format!("Invalid base URL '{}': {}", url, e)))?;

        if parsed.cannot_be_a_base() {
            return Err(Error::invalid_config(format!(
                "Invalid base URL '{}': not a hierarchical URL",
                url
            )));
        }

        self.base_url = Some(parsed);
        Ok(self)
    }

    fn validate_config(&self) -> std::result::Result<(), String> {
        if let Some(timeout) = &self.api_timeout
            && timeout.is_zero()
        {
            return Err("API timeout must be greater than 0".to_string());
        }

        if let Some(connect_timeout) = &self.connect_timeout
            && connect_timeout.is_zero()
        {
            return Err("Connect timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}
