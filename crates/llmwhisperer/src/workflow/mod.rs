//! Waiting for deferred extractions.
//!
//! [`Workflow`] wraps any [`WhisperApi`] transport and drives a deferred job
//! from submission to its result: it polls the status endpoint under a
//! [`PollPolicy`] and retrieves the result once the job is processed. The
//! primitive operations stay available through [`Workflow::api`].

mod policy;

use tokio::time::{Instant, sleep};

pub use self::policy::{DEFAULT_POLL_DEADLINE, DEFAULT_POLL_INTERVAL, PollPolicy};
use crate::TRACING_TARGET_WORKFLOW;
use crate::error::{Error, Result};
use crate::whisper::{
    Extraction, ExtractionStatus, Submission, WhisperApi, WhisperHash, WhisperRequest,
    WhisperStatus,
};

/// Polling controller over a transport.
///
/// # Examples
///
/// ```rust,ignore
/// use std::time::Duration;
/// use llmwhisperer::WhisperClient;
/// use llmwhisperer::whisper::WhisperRequest;
/// use llmwhisperer::workflow::PollPolicy;
///
/// let policy = PollPolicy::default().with_interval(Duration::from_secs(5));
/// let workflow = WhisperClient::from_env()?.into_workflow(policy);
///
/// let extraction = workflow
///     .whisper(&WhisperRequest::from_file("scan.pdf").with_timeout(5))
///     .await?;
/// println!("{}", extraction.extracted_text);
/// ```
#[derive(Debug, Clone)]
pub struct Workflow<A> {
    api: A,
    policy: PollPolicy,
}

impl<A: WhisperApi> Workflow<A> {
    /// Creates a workflow with the default poll policy.
    pub fn new(api: A) -> Self {
        Self {
            api,
            policy: PollPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the underlying transport.
    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    pub fn into_inner(self) -> A {
        self.api
    }

    /// Submits a document and waits for its result.
    ///
    /// Results delivered inside the synchronous window are returned as is;
    /// deferred jobs are handed to [`Workflow::wait_for_completion`].
    ///
    /// # Errors
    ///
    /// Requests that report completion through a webhook are rejected, since
    /// the webhook consumes the result the caller would be waiting for.
    pub async fn whisper(&self, request: &WhisperRequest) -> Result<Extraction> {
        if request.uses_webhook() {
            return Err(Error::invalid_input(
                "use_webhook cannot be combined with waiting for completion",
            ));
        }

        match self.api.submit(request).await? {
            Submission::Completed(extraction) => Ok(extraction),
            Submission::Accepted(accepted) => self.wait_for_completion(&accepted.whisper_hash).await,
        }
    }

    /// Retrieves the result if the job is processed, without waiting.
    pub async fn retrieve_when_ready(&self, whisper_hash: &WhisperHash) -> Result<Extraction> {
        let status = self.api.status(whisper_hash).await?;

        if status.status.is_ready() {
            return self.api.retrieve(whisper_hash).await;
        }

        Err(not_ready(whisper_hash, &status))
    }

    /// Polls until the job is processed, then retrieves its result once.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidState`] when the job is delivered, unknown or failed.
    /// - [`Error::Timeout`] when the poll policy is used up first.
    /// - Any transport or API error of a status or retrieve call.
    pub async fn wait_for_completion(&self, whisper_hash: &WhisperHash) -> Result<Extraction> {
        self.policy.validate()?;

        let started = Instant::now();
        let mut attempts = 0u32;

        loop {
            let status = self.api.status(whisper_hash).await?;
            attempts += 1;

            tracing::debug!(
                target: TRACING_TARGET_WORKFLOW,
                whisper_hash = %whisper_hash,
                status = %status.status,
                attempts,
                "Polled status"
            );

            match status.status {
                ExtractionStatus::Processed => {
                    tracing::info!(
                        target: TRACING_TARGET_WORKFLOW,
                        whisper_hash = %whisper_hash,
                        attempts,
                        elapsed = ?started.elapsed(),
                        "Extraction processed"
                    );
                    return self.api.retrieve(whisper_hash).await;
                }
                ExtractionStatus::Accepted | ExtractionStatus::Processing => {}
                _ => {
                    tracing::warn!(
                        target: TRACING_TARGET_WORKFLOW,
                        whisper_hash = %whisper_hash,
                        status = %status.status,
                        "Extraction stopped without a result"
                    );
                    return Err(not_ready(whisper_hash, &status));
                }
            }

            let elapsed = started.elapsed();
            let delay = if self.policy.attempts_exhausted(attempts) {
                None
            } else {
                self.policy.next_delay(elapsed)
            };

            let Some(delay) = delay else {
                tracing::warn!(
                    target: TRACING_TARGET_WORKFLOW,
                    whisper_hash = %whisper_hash,
                    attempts,
                    elapsed = ?elapsed,
                    "Polling budget exhausted"
                );
                return Err(Error::Timeout {
                    whisper_hash: whisper_hash.clone(),
                    attempts,
                    elapsed,
                });
            };

            sleep(delay).await;
        }
    }
}

fn not_ready(whisper_hash: &WhisperHash, status: &WhisperStatus) -> Error {
    let reason = match status.status {
        ExtractionStatus::Accepted | ExtractionStatus::Processing => {
            "Whisper operation is still processing"
        }
        ExtractionStatus::Delivered => "Whisper operation already delivered",
        ExtractionStatus::Failed => "Whisper operation failed",
        ExtractionStatus::Unknown => "Whisper operation status unknown",
        ExtractionStatus::Processed => "Whisper operation is processed",
    };

    let reason = match &status.message {
        Some(message) if !message.is_empty() => format!("{reason}: {message}"),
        _ => reason.to_string(),
    };

    Error::invalid_state(whisper_hash.clone(), status.status, reason)
}
