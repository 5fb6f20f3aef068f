#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for client operations.
///
/// Use this target for logging client initialization, requests and API errors.
pub const TRACING_TARGET_CLIENT: &str = "llmwhisperer::client";

/// Tracing target for the polling workflow.
pub const TRACING_TARGET_WORKFLOW: &str = "llmwhisperer::workflow";

/// Tracing target for the legacy API transport.
pub const TRACING_TARGET_LEGACY: &str = "llmwhisperer::legacy";

mod client;
pub mod error;
pub mod legacy;
#[cfg(test)]
mod mock;
#[doc(hidden)]
pub mod prelude;
mod utils;
pub mod whisper;
pub mod workflow;

pub use crate::client::{
    API_KEY_ENV, BASE_URL_ENV, ClientArgs, DEFAULT_API_TIMEOUT_SECS, DEFAULT_BASE_URL,
    DEFAULT_LEGACY_BASE_URL, LEGACY_BASE_URL_ENV, WhisperBuilder, WhisperBuilderError,
    WhisperClient, WhisperConfig, WhisperCredentials,
};
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::legacy::LegacyClient;
pub use crate::utils::{redact_key, version};
pub use crate::workflow::{PollPolicy, Workflow};
