//! Submission outcomes and extraction results.

use serde::{Deserialize, Serialize};

use super::{ExtractionStatus, WhisperHash};
use crate::{Error, Result};

/// Outcome of a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// The server finished inside the synchronous window.
    Completed(Extraction),
    /// The server deferred the job; poll with the returned handle.
    Accepted(Accepted),
}

impl Submission {
    /// Returns the handle of a deferred job.
    pub fn whisper_hash(&self) -> Option<&WhisperHash> {
        match self {
            Self::Completed(extraction) => extraction.whisper_hash.as_ref(),
            Self::Accepted(accepted) => Some(&accepted.whisper_hash),
        }
    }

    /// Returns `true` if the caller has to poll for the result.
    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

/// Body of a `202 Accepted` submission response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Accepted {
    #[serde(alias = "whisper-hash")]
    pub whisper_hash: WhisperHash,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ExtractionStatus>,
}

impl Accepted {
    /// Reads the body of a `202 Accepted` response.
    ///
    /// The handle is taken from the body and, failing that, from the
    /// `whisper-hash` response header.
    pub(crate) fn from_response(body: &str, header_hash: Option<WhisperHash>) -> Result<Self> {
        let parsed = serde_json::from_str::<Self>(body).ok();
        if let Some(accepted) = &parsed
            && !accepted.whisper_hash.is_empty()
        {
            return Ok(accepted.clone());
        }

        match header_hash {
            Some(whisper_hash) if !whisper_hash.is_empty() => Ok(Self {
                whisper_hash,
                message: parsed.as_ref().and_then(|a| a.message.clone()),
                status: parsed.and_then(|a| a.status),
            }),
            _ => Err(Error::api_error(
                202,
                "Job was accepted but the response carried no whisper hash",
            )),
        }
    }
}

/// Final result of an extraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    /// The extracted text.
    #[serde(rename = "result_text", alias = "extracted_text", default)]
    pub extracted_text: String,
    /// Per-line OCR confidence, when the server reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_metadata: Option<serde_json::Value>,
    /// Per-line layout metadata, when requested with `add_line_nos`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_metadata: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_metadata: Option<String>,
    /// Handle of the job, when the server reports it with the result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whisper_hash: Option<WhisperHash>,
    /// Any additional fields the server included.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Extraction {
    /// Wraps plain text returned by endpoints that answer with a text body.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            extracted_text: text.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_whisper_hash(mut self, hash: WhisperHash) -> Self {
        self.whisper_hash = Some(hash);
        self
    }

    /// Decodes a result body.
    ///
    /// JSON objects are decoded field by field; anything else is taken as the
    /// extracted text itself.
    pub(crate) fn from_body(body: &str) -> Result<Self> {
        if body.trim_start().starts_with('{') {
            Ok(serde_json::from_str(body)?)
        } else {
            Ok(Self::from_text(body))
        }
    }
}

/// Extracts a human readable message from an error response body.
///
/// The service answers failures with a JSON object carrying a `message`
/// field, with a bare JSON string, or with plain text.
pub(crate) fn error_message(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::String(message)) => message,
        Ok(serde_json::Value::Object(map)) => match map.get("message") {
            Some(serde_json::Value::String(message)) => message.clone(),
            Some(other) => other.to_string(),
            None => serde_json::Value::Object(map).to_string(),
        },
        _ if body.trim().is_empty() => "Unknown error".to_string(),
        _ => body.to_string(),
    }
}
