//! Connection settings in a form that can be parsed from the command line.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

use super::{
    DEFAULT_BASE_URL, DEFAULT_LEGACY_BASE_URL, WhisperConfig, WhisperCredentials,
};
use crate::Result;

/// Default timeout of non-submission requests: 120 seconds.
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 120;

/// Connection settings for the extraction API.
///
/// Every field falls back to the environment variable the other LLMWhisperer
/// clients read, so the same shell setup works for all of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct ClientArgs {
    /// Base URL of the current API
    #[cfg_attr(
        feature = "config",
        arg(long = "base-url", env = "LLMWHISPERER_BASE_URL_V2", default_value = DEFAULT_BASE_URL)
    )]
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Base URL of the legacy API
    #[cfg_attr(
        feature = "config",
        arg(long = "legacy-base-url", env = "LLMWHISPERER_BASE_URL", default_value = DEFAULT_LEGACY_BASE_URL)
    )]
    #[serde(default = "default_legacy_base_url")]
    pub legacy_base_url: String,

    /// API key sent with every request
    #[cfg_attr(
        feature = "config",
        arg(long = "api-key", env = "LLMWHISPERER_API_KEY", hide_env_values = true)
    )]
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Timeout of status, retrieve and management requests in seconds
    #[cfg_attr(
        feature = "config",
        arg(long = "api-timeout", env = "LLMWHISPERER_API_TIMEOUT", default_value = "120")
    )]
    #[serde(default = "default_api_timeout_secs")]
    pub api_timeout: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_legacy_base_url() -> String {
    DEFAULT_LEGACY_BASE_URL.to_string()
}

fn default_api_timeout_secs() -> u64 {
    DEFAULT_API_TIMEOUT_SECS
}

impl Default for ClientArgs {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            legacy_base_url: default_legacy_base_url(),
            api_key: None,
            api_timeout: default_api_timeout_secs(),
        }
    }
}

impl ClientArgs {
    /// Builds the configuration of the current API.
    pub fn config(&self) -> Result<WhisperConfig> {
        self.build_config(&self.base_url)
    }

    /// Builds the configuration of the legacy API.
    pub fn legacy_config(&self) -> Result<WhisperConfig> {
        self.build_config(&self.legacy_base_url)
    }

    /// Returns the credentials to authenticate with.
    pub fn credentials(&self) -> WhisperCredentials {
        match self.api_key.as_deref() {
            Some(key) if !key.is_empty() => WhisperCredentials::api_key(key),
            _ => WhisperCredentials::none(),
        }
    }

    fn build_config(&self, base_url: &str) -> Result<WhisperConfig> {
        let config = WhisperConfig::builder()
            .with_base_url(base_url)?
            .with_api_timeout(Duration::from_secs(self.api_timeout))
            .build()?;

        Ok(config)
    }
}
