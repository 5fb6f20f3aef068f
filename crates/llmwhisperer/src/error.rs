//! Error types for llmwhisperer
//!
//! Every operation in this crate fails with a single [`Error`] type. Callers
//! that want to branch on the failure class without destructuring can use
//! [`Error::kind`], and [`Error::status_code`] exposes the HTTP status the
//! server answered with, when there was one.

use std::time::Duration;

use strum::{AsRefStr, Display, IntoStaticStr};

use crate::client::WhisperBuilderError;
use crate::whisper::{ExtractionStatus, WhisperHash};

/// Result type for all operations in this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Categories of errors that can occur while talking to the extraction API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// The service could not be reached, or the exchange broke mid-flight.
    Transport,
    /// The service answered with a failure status.
    Api,
    /// The caller asked for something the job's state does not allow.
    InvalidState,
    /// A polling budget ran out before the job reached a terminal state.
    Timeout,
    /// The request was rejected locally before anything was sent.
    InvalidInput,
    /// The client configuration is invalid.
    Configuration,
    /// Reading the document from disk failed.
    Io,
    /// A response body could not be decoded.
    Serialization,
}

/// Unified error type for extraction operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Network-level failure: connection refused, DNS, transport timeout.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response from the extraction API.
    #[error("LLMWhisperer API error: {status} - {message}")]
    Api {
        status: u16,
        message: String,
        whisper_hash: Option<WhisperHash>,
    },

    /// The job is in a state that does not permit the requested operation.
    #[error("Whisper '{whisper_hash}' is {status}: {reason}")]
    InvalidState {
        whisper_hash: WhisperHash,
        status: ExtractionStatus,
        reason: String,
    },

    /// The polling budget was exhausted.
    #[error("Whisper '{whisper_hash}' still pending after {attempts} polls ({elapsed:?})")]
    Timeout {
        whisper_hash: WhisperHash,
        attempts: u32,
        elapsed: Duration,
    },

    /// The request was rejected before transmission.
    #[error("Invalid request: {reason}")]
    InvalidInput { reason: String },

    /// Invalid client configuration.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// The document could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A response body did not match the expected shape.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create an API error
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
            whisper_hash: None,
        }
    }

    /// Create an invalid state error
    pub fn invalid_state(
        whisper_hash: WhisperHash,
        status: ExtractionStatus,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidState {
            whisper_hash,
            status,
            reason: reason.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Attaches the whisper hash the failed request was about.
    ///
    /// Only API errors carry an optional hash; other variants are returned unchanged.
    pub fn with_whisper_hash(self, hash: &WhisperHash) -> Self {
        match self {
            Self::Api {
                status, message, ..
            } => Self::Api {
                status,
                message,
                whisper_hash: Some(hash.clone()),
            },
            other => other,
        }
    }

    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Http(_) => ErrorKind::Transport,
            Error::Api { .. } => ErrorKind::Api,
            Error::InvalidState { .. } => ErrorKind::InvalidState,
            Error::Timeout { .. } => ErrorKind::Timeout,
            Error::InvalidInput { .. } => ErrorKind::InvalidInput,
            Error::InvalidConfig { .. } => ErrorKind::Configuration,
            Error::Io(_) => ErrorKind::Io,
            Error::Serialization(_) => ErrorKind::Serialization,
        }
    }

    /// Returns the HTTP status code the server answered with, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns the whisper hash this error relates to, if known.
    pub fn whisper_hash(&self) -> Option<&WhisperHash> {
        match self {
            Error::Api { whisper_hash, .. } => whisper_hash.as_ref(),
            Error::InvalidState { whisper_hash, .. } | Error::Timeout { whisper_hash, .. } => {
                Some(whisper_hash)
            }
            _ => None,
        }
    }

    /// Check if this error is worth retrying.
    ///
    /// The client itself never retries; this is a hint for caller-owned policies.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(err) => err.is_timeout() || err.is_connect(),
            Error::Api { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

impl From<WhisperBuilderError> for Error {
    fn from(err: WhisperBuilderError) -> Self {
        Error::InvalidConfig {
            reason: err.to_string(),
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::InvalidConfig {
            reason: format!("Invalid URL: {err}"),
        }
    }
}
