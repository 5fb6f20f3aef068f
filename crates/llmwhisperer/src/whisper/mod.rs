//! Extraction request, response and status types.
//!
//! A *whisper* is one document-extraction job tracked by the remote service.
//! The [`WhisperApi`] trait captures the three primitive operations every
//! transport offers; the workflow controller is written against it.

mod highlight;
mod request;
mod response;
mod status;
mod usage;
mod webhook;

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

pub use self::highlight::{HighlightData, HighlightRect, LineHighlight, LineMetadata};
pub use self::request::{DocumentSource, Mode, OutputMode, SYNC_CEILING_SECS, WhisperRequest};
pub(crate) use self::request::WhisperParams;
pub use self::response::{Accepted, Extraction, Submission};
pub(crate) use self::response::error_message;
pub use self::status::{ExtractionStatus, WhisperStatus};
pub use self::usage::UsageInfo;
pub use self::webhook::{WebhookDetails, WebhookRegistration, WebhookResponse};
use crate::Result;

/// Opaque handle of a deferred extraction.
///
/// Issued by the server when it accepts a job for asynchronous processing
/// and passed back verbatim to every status and retrieve call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, From, Into)]
#[serde(transparent)]
pub struct WhisperHash(String);

impl WhisperHash {
    /// Wraps a handle returned by the server.
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Returns the handle as sent on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the server handed back an empty handle.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for WhisperHash {
    fn from(hash: &str) -> Self {
        Self(hash.to_owned())
    }
}

impl AsRef<str> for WhisperHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Primitive operations of the extraction API.
///
/// Each call is a single stateless exchange with the service; none of them
/// waits or retries.
#[async_trait::async_trait]
pub trait WhisperApi: Send + Sync {
    /// Submits a document for extraction.
    ///
    /// Returns [`Submission::Completed`] when the server finished within the
    /// synchronous window and [`Submission::Accepted`] when it deferred the job.
    async fn submit(&self, request: &WhisperRequest) -> Result<Submission>;

    /// Queries the current status of a deferred job.
    async fn status(&self, whisper_hash: &WhisperHash) -> Result<WhisperStatus>;

    /// Fetches the result of a processed job.
    ///
    /// The server hands out a result once; afterwards the job reports
    /// [`ExtractionStatus::Delivered`].
    async fn retrieve(&self, whisper_hash: &WhisperHash) -> Result<Extraction>;
}

#[async_trait::async_trait]
impl<T> WhisperApi for &T
where
    T: WhisperApi + ?Sized,
{
    async fn submit(&self, request: &WhisperRequest) -> Result<Submission> {
        (**self).submit(request).await
    }

    async fn status(&self, whisper_hash: &WhisperHash) -> Result<WhisperStatus> {
        (**self).status(whisper_hash).await
    }

    async fn retrieve(&self, whisper_hash: &WhisperHash) -> Result<Extraction> {
        (**self).retrieve(whisper_hash).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whisper_hash_is_opaque() {
        let raw = "a1b2c3|d4e5f6==";
        let hash = WhisperHash::from(raw);

        assert_eq!(hash.as_str(), raw);
        assert_eq!(hash.to_string(), raw);
        assert_eq!(String::from(hash.clone()), raw);
        assert_eq!(serde_json::to_string(&hash).unwrap(), format!("\"{raw}\""));
    }
}
