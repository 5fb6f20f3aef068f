//! Job status as reported by the status endpoint.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

/// State of a deferred extraction, as observed from the client.
///
/// The state machine lives on the server:
///
/// ```text
/// submitted ─► processing ─► processed ─► delivered
///                  │  ▲
///                  └──┘ (self-loop while waiting)
///      └──────► unknown / failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ExtractionStatus {
    /// Queued by the server but not picked up yet.
    Accepted,
    /// Extraction is running; poll again later.
    Processing,
    /// Extraction finished; the result can be retrieved exactly once.
    Processed,
    /// The result was already retrieved.
    Delivered,
    /// Extraction failed on the server.
    Failed,
    /// The handle is invalid, expired or lost.
    ///
    /// Status strings this client does not recognise also land here, so an
    /// unexpected server answer stops polling instead of looping forever.
    #[serde(other)]
    Unknown,
}

impl ExtractionStatus {
    /// Returns `true` if no further poll can change the outcome.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Accepted | Self::Processing)
    }

    /// Returns `true` if a retrieve call would succeed now.
    pub fn is_ready(self) -> bool {
        self == Self::Processed
    }
}

/// Body of a status endpoint response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhisperStatus {
    /// Reported job state.
    pub status: ExtractionStatus,
    /// Optional human readable detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Any additional fields the server included.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl WhisperStatus {
    /// Creates a status with no detail.
    pub fn new(status: ExtractionStatus) -> Self {
        Self {
            status,
            message: None,
            extra: serde_json::Map::new(),
        }
    }
}
