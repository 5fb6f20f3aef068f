//! Transport that replays a fixed status script.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::whisper::{
    Accepted, Extraction, ExtractionStatus, Submission, WhisperApi, WhisperHash, WhisperRequest,
    WhisperStatus,
};

/// A call received by [`ScriptedApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ScriptedCall {
    Submit,
    Status(WhisperHash),
    Retrieve(WhisperHash),
}

/// Transport answering status polls from a script.
///
/// The last scripted status repeats once the script runs out.
pub(crate) struct ScriptedApi {
    completed: Option<String>,
    statuses: Mutex<VecDeque<ExtractionStatus>>,
    status_error: Option<u16>,
    calls: Mutex<Vec<ScriptedCall>>,
}

impl ScriptedApi {
    pub const RESULT_TEXT: &str = "scripted extraction";

    /// Handle of every deferred job, with characters that need escaping.
    pub fn hash() -> WhisperHash {
        WhisperHash::from("c0ffee|42+7/==")
    }

    /// Answers every submission synchronously with `text`.
    pub fn completing(text: &str) -> Self {
        Self {
            completed: Some(text.to_owned()),
            ..Self::deferred([ExtractionStatus::Delivered])
        }
    }

    /// Defers every submission and answers polls with `statuses`.
    pub fn deferred(statuses: impl IntoIterator<Item = ExtractionStatus>) -> Self {
        Self {
            completed: None,
            statuses: Mutex::new(statuses.into_iter().collect()),
            status_error: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Fails every status poll with the given HTTP status.
    pub fn failing_status(mut self, status: u16) -> Self {
        self.status_error = Some(status);
        self
    }

    pub fn calls(&self) -> Vec<ScriptedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: ScriptedCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_status(&self) -> ExtractionStatus {
        let mut statuses = self.statuses.lock().unwrap();
        match statuses.len() {
            0 => ExtractionStatus::Unknown,
            1 => statuses[0],
            _ => statuses.pop_front().unwrap_or(ExtractionStatus::Unknown),
        }
    }
}

#[async_trait::async_trait]
impl WhisperApi for ScriptedApi {
    async fn submit(&self, _request: &WhisperRequest) -> Result<Submission> {
        self.record(ScriptedCall::Submit);

        Ok(match &self.completed {
            Some(text) => Submission::Completed(Extraction::from_text(text.clone())),
            None => Submission::Accepted(Accepted {
                whisper_hash: Self::hash(),
                message: Some("Whisper Job Accepted".to_owned()),
                status: Some(ExtractionStatus::Processing),
            }),
        })
    }

    async fn status(&self, whisper_hash: &WhisperHash) -> Result<WhisperStatus> {
        self.record(ScriptedCall::Status(whisper_hash.clone()));

        if let Some(status) = self.status_error {
            return Err(Error::api_error(status, "scripted failure").with_whisper_hash(whisper_hash));
        }

        Ok(WhisperStatus::new(self.next_status()))
    }

    async fn retrieve(&self, whisper_hash: &WhisperHash) -> Result<Extraction> {
        self.record(ScriptedCall::Retrieve(whisper_hash.clone()));

        Ok(Extraction::from_text(Self::RESULT_TEXT).with_whisper_hash(whisper_hash.clone()))
    }
}
