//! Legacy API transport.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};

use super::{LegacyOptions, LegacyParams};
use crate::TRACING_TARGET_LEGACY;
use crate::client::{
    WhisperClient, WhisperConfig, WhisperCredentials, check_response, decode_json,
    header_whisper_hash,
};
use crate::error::Result;
use crate::whisper::{
    Accepted, Extraction, Submission, UsageInfo, WhisperApi, WhisperHash, WhisperRequest,
    WhisperStatus,
};

/// Query key carrying the handle in the legacy API.
const HASH_PARAM: &str = "whisper-hash";

/// Client for the legacy extraction API.
///
/// Accepts the same [`WhisperRequest`] as [`WhisperClient`] and reports the
/// same [`Submission`] and [`Extraction`] types, so callers and the workflow
/// controller do not need to know which API version they talk to.
///
/// Parameters without a legacy counterpart (`lang`, `tag`, webhooks, line
/// marking) are not sent.
#[derive(Debug, Clone)]
pub struct LegacyClient {
    client: WhisperClient,
    options: LegacyOptions,
}

impl LegacyClient {
    /// Create a new legacy client.
    ///
    /// `config.base_url` must point at the legacy API, for example
    /// [`DEFAULT_LEGACY_BASE_URL`](crate::DEFAULT_LEGACY_BASE_URL).
    pub fn new(config: WhisperConfig, credentials: WhisperCredentials) -> Result<Self> {
        tracing::debug!(
            target: TRACING_TARGET_LEGACY,
            base_url = %config.base_url,
            "Creating legacy client"
        );

        Ok(Self {
            client: WhisperClient::new(config, credentials)?,
            options: LegacyOptions::default(),
        })
    }

    /// Create a client from `LLMWHISPERER_BASE_URL` and `LLMWHISPERER_API_KEY`.
    pub fn from_env() -> Result<Self> {
        Self::new(WhisperConfig::legacy_from_env()?, WhisperCredentials::from_env())
    }

    #[must_use]
    pub fn with_options(mut self, options: LegacyOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &LegacyOptions {
        &self.options
    }

    pub fn config(&self) -> &WhisperConfig {
        self.client.config()
    }

    /// Fetches the page usage of the account.
    pub async fn usage_info(&self) -> Result<UsageInfo> {
        self.client.usage_info().await
    }

    /// Locates `search_text` in the result of a job.
    ///
    /// The job must have been submitted with `store_metadata_for_highlighting`
    /// (or `add_line_nos`). The server answers with the positions of the
    /// matching lines, returned here as is.
    pub async fn highlight_data(
        &self,
        whisper_hash: &WhisperHash,
        search_text: &str,
    ) -> Result<serde_json::Value> {
        tracing::debug!(
            target: TRACING_TARGET_LEGACY,
            whisper_hash = %whisper_hash,
            search_len = search_text.len(),
            "Fetching highlight data"
        );

        let response = self
            .client
            .request(Method::POST, "highlight-data")?
            .query(&[(HASH_PARAM, whisper_hash.as_str())])
            .header(CONTENT_TYPE, "text/plain")
            .body(search_text.to_owned())
            .send()
            .await?;

        let response = check_response(response, Some(whisper_hash)).await?;
        decode_json(response).await
    }
}

#[async_trait::async_trait]
impl WhisperApi for LegacyClient {
    async fn submit(&self, request: &WhisperRequest) -> Result<Submission> {
        request.validate()?;

        let body = request.source.read().await?;
        let params = LegacyParams::new(request, &self.options);

        tracing::debug!(
            target: TRACING_TARGET_LEGACY,
            source = %request.source.describe(),
            mode = %request.mode,
            "Submitting document"
        );

        let mut builder = self
            .client
            .request(Method::POST, "whisper")?
            .query(&params)
            .timeout(self.client.submit_timeout(request));

        if let Some(body) = body {
            builder = builder
                .header(CONTENT_TYPE, "application/octet-stream")
                .body(body);
        }

        let response = check_response(builder.send().await?, None).await?;
        let status = response.status();
        let header_hash = header_whisper_hash(&response);
        let body = response.text().await?;

        if status == StatusCode::ACCEPTED {
            let accepted = Accepted::from_response(&body, header_hash)?;

            tracing::info!(
                target: TRACING_TARGET_LEGACY,
                whisper_hash = %accepted.whisper_hash,
                "Extraction deferred"
            );

            return Ok(Submission::Accepted(accepted));
        }

        let mut extraction = Extraction::from_text(body);
        extraction.whisper_hash = header_hash;

        tracing::info!(
            target: TRACING_TARGET_LEGACY,
            text_len = extraction.extracted_text.len(),
            "Extraction completed synchronously"
        );

        Ok(Submission::Completed(extraction))
    }

    async fn status(&self, whisper_hash: &WhisperHash) -> Result<WhisperStatus> {
        let response = self
            .client
            .request(Method::GET, "whisper-status")?
            .query(&[(HASH_PARAM, whisper_hash.as_str())])
            .send()
            .await?;

        let response = check_response(response, Some(whisper_hash)).await?;
        let status: WhisperStatus = decode_json(response).await?;

        tracing::debug!(
            target: TRACING_TARGET_LEGACY,
            whisper_hash = %whisper_hash,
            status = %status.status,
            "Fetched status"
        );

        Ok(status)
    }

    async fn retrieve(&self, whisper_hash: &WhisperHash) -> Result<Extraction> {
        let response = self
            .client
            .request(Method::GET, "whisper-retrieve")?
            .query(&[(HASH_PARAM, whisper_hash.as_str())])
            .send()
            .await?;

        let response = check_response(response, Some(whisper_hash)).await?;
        let text = response.text().await?;

        tracing::debug!(
            target: TRACING_TARGET_LEGACY,
            whisper_hash = %whisper_hash,
            text_len = text.len(),
            "Retrieved extraction"
        );

        Ok(Extraction::from_text(text).with_whisper_hash(whisper_hash.clone()))
    }
}
