//! HTTP client for the extraction API
//!
//! This module provides the [`WhisperClient`] transport together with its
//! configuration and credentials.

mod args;
mod credentials;
mod whisper_client;
mod whisper_config;

pub use args::{ClientArgs, DEFAULT_API_TIMEOUT_SECS};
pub use credentials::{API_KEY_ENV, WhisperCredentials};
#[cfg(test)]
pub(crate) use credentials::API_KEY_HEADER;
pub use whisper_client::WhisperClient;
#[cfg(test)]
pub(crate) use whisper_client::WHISPER_HASH_HEADER;
pub(crate) use whisper_client::{check_response, decode_json, header_whisper_hash};
pub use whisper_config::{
    BASE_URL_ENV, DEFAULT_BASE_URL, DEFAULT_LEGACY_BASE_URL, LEGACY_BASE_URL_ENV, WhisperBuilder,
    WhisperBuilderError, WhisperConfig,
};
