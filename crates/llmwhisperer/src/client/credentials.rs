//! Authentication credentials
//!
//! This module provides the credential type attached to every request.

use crate::utils::redact_key;

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "LLMWHISPERER_API_KEY";

/// Header carrying the API key.
pub(crate) const API_KEY_HEADER: &str = "unstract-key";

/// Authentication credentials for the extraction service
#[derive(Clone, PartialEq, Eq)]
pub enum WhisperCredentials {
    /// API key sent in the `unstract-key` header
    ApiKey(String),
    /// No authentication (for self-hosted deployments and testing)
    None,
}

impl WhisperCredentials {
    /// Create API key credentials
    pub fn api_key(key: impl Into<String>) -> Self {
        Self::ApiKey(key.into())
    }

    /// Create credentials with no authentication
    pub fn none() -> Self {
        Self::None
    }

    /// Reads the API key from `LLMWHISPERER_API_KEY`.
    ///
    /// Falls back to [`WhisperCredentials::None`] when the variable is unset or empty.
    pub fn from_env() -> Self {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.is_empty() => Self::ApiKey(key),
            _ => Self::None,
        }
    }

    /// Adds the authentication header to a request.
    pub(crate) fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Self::ApiKey(key) => request.header(API_KEY_HEADER, key),
            Self::None => request,
        }
    }
}

impl std::fmt::Debug for WhisperCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKey(key) => f.debug_tuple("ApiKey").field(&redact_key(key, 4)).finish(),
            Self::None => f.write_str("None"),
        }
    }
}
