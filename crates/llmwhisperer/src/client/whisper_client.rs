//! Extraction client implementation
//!
//! This module provides the transport for the current API. It handles
//! authentication, request encoding and the translation of responses into
//! typed results and errors.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client as HttpClient, ClientBuilder, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use super::{WhisperConfig, WhisperCredentials};
use crate::TRACING_TARGET_CLIENT;
use crate::error::{Error, Result};
use crate::whisper::{
    Accepted, DocumentSource, Extraction, HighlightData, SYNC_CEILING_SECS, Submission, UsageInfo,
    WebhookRegistration, WebhookResponse, WhisperApi, WhisperHash, WhisperParams, WhisperRequest,
    WhisperStatus, error_message,
};
use crate::workflow::{PollPolicy, Workflow};

/// Response header some deployments use to carry the whisper hash.
pub(crate) const WHISPER_HASH_HEADER: &str = "whisper-hash";

/// Extra time granted to a submission on top of its synchronous window.
const SUBMIT_GRACE: Duration = Duration::from_secs(10);

/// Client for the LLMWhisperer extraction API.
///
/// Cloning is cheap: clones share the connection pool and configuration.
/// Every method is a single request; nothing is retried or cached.
///
/// # Examples
///
/// ```rust,ignore
/// use llmwhisperer::{WhisperClient, WhisperConfig, WhisperCredentials};
/// use llmwhisperer::whisper::{Submission, WhisperApi, WhisperRequest};
///
/// let config = WhisperConfig::builder()
///     .with_base_url("https://llmwhisperer-api.unstract.com/api/v2")?
///     .build()?;
///
/// let client = WhisperClient::new(config, WhisperCredentials::api_key("your-api-key"))?;
/// let request = WhisperRequest::from_file("invoice.pdf").with_timeout(30);
///
/// match client.submit(&request).await? {
///     Submission::Completed(extraction) => println!("{}", extraction.extracted_text),
///     Submission::Accepted(accepted) => println!("poll {}", accepted.whisper_hash),
/// }
/// ```
#[derive(Clone)]
pub struct WhisperClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: HttpClient,
    config: WhisperConfig,
    credentials: WhisperCredentials,
}

impl WhisperClient {
    /// Create a new client with the given configuration and credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: WhisperConfig, credentials: WhisperCredentials) -> Result<Self> {
        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            base_url = %config.base_url,
            "Creating extraction client"
        );

        let http_client = ClientBuilder::new()
            .timeout(config.api_timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(Error::Http)?;

        let client = Self {
            inner: Arc::new(ClientInner {
                http_client,
                config,
                credentials,
            }),
        };

        tracing::info!(
            target: TRACING_TARGET_CLIENT,
            base_url = %client.config().base_url,
            credentials = client.credentials_type(),
            "Extraction client created"
        );

        Ok(client)
    }

    /// Create a client from `LLMWHISPERER_BASE_URL_V2` and `LLMWHISPERER_API_KEY`.
    pub fn from_env() -> Result<Self> {
        Self::new(WhisperConfig::from_env()?, WhisperCredentials::from_env())
    }

    /// Get the client configuration.
    pub fn config(&self) -> &WhisperConfig {
        &self.inner.config
    }

    /// Get the credentials type (for debugging/logging purposes only).
    pub fn credentials_type(&self) -> &'static str {
        match &self.inner.credentials {
            WhisperCredentials::ApiKey(_) => "api_key",
            WhisperCredentials::None => "none",
        }
    }

    /// Wraps this client in a polling workflow.
    pub fn into_workflow(self, policy: PollPolicy) -> Workflow<Self> {
        Workflow::new(self).with_policy(policy)
    }

    /// Fetches the page usage of the account.
    pub async fn usage_info(&self) -> Result<UsageInfo> {
        tracing::debug!(target: TRACING_TARGET_CLIENT, "Fetching usage info");

        let response = self.request(Method::GET, "get-usage-info")?.send().await?;
        let response = check_response(response, None).await?;
        decode_json(response).await
    }

    /// Registers a webhook that deferred jobs can report to.
    pub async fn register_webhook(
        &self,
        registration: &WebhookRegistration,
    ) -> Result<WebhookResponse> {
        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            webhook = %registration,
            "Registering webhook"
        );

        let response = self
            .request(Method::POST, "whisper-manage-callback")?
            .json(registration)
            .send()
            .await?;
        let response = check_response(response, None).await?;
        decode_json(response).await
    }

    /// Fetches the stored configuration of a webhook.
    pub async fn webhook_details(&self, webhook_name: &str) -> Result<WebhookResponse> {
        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            webhook_name,
            "Fetching webhook details"
        );

        let response = self
            .request(Method::GET, "whisper-manage-callback")?
            .query(&[("webhook_name", webhook_name)])
            .send()
            .await?;
        let response = check_response(response, None).await?;
        decode_json(response).await
    }

    /// Fetches line positions of a job submitted with `add_line_nos`.
    ///
    /// `lines` selects line numbers the same way `pages_to_extract` selects
    /// pages, for example `1-5,7`.
    pub async fn highlight_data(
        &self,
        whisper_hash: &WhisperHash,
        lines: &str,
    ) -> Result<HighlightData> {
        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            whisper_hash = %whisper_hash,
            lines,
            "Fetching highlight data"
        );

        let response = self
            .request(Method::GET, "highlights")?
            .query(&[("whisper_hash", whisper_hash.as_str()), ("lines", lines)])
            .send()
            .await?;
        let response = check_response(response, Some(whisper_hash)).await?;
        decode_json(response).await
    }

    /// Builds an authenticated request to an endpoint below the base URL.
    pub(crate) fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.inner.config.endpoint(path)?;
        let request = self.inner.http_client.request(method, url);
        Ok(self.inner.credentials.apply(request))
    }

    /// Transport timeout of a submission.
    ///
    /// The server may hold a submission open for the whole synchronous window,
    /// so the request must be allowed to outlive it.
    pub(crate) fn submit_timeout(&self, request: &WhisperRequest) -> Duration {
        let window = Duration::from_secs(u64::from(request.timeout.unwrap_or(SYNC_CEILING_SECS)));
        self.inner.config.api_timeout.max(window + SUBMIT_GRACE)
    }
}

impl std::fmt::Debug for WhisperClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperClient")
            .field("config", &self.inner.config)
            .field("credentials", &self.inner.credentials)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl WhisperApi for WhisperClient {
    async fn submit(&self, request: &WhisperRequest) -> Result<Submission> {
        request.validate()?;

        let body = match &request.source {
            DocumentSource::Url(url) => Bytes::from(url.as_str().to_owned()),
            source => source.read().await?.unwrap_or_default(),
        };

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            source = %request.source.describe(),
            mode = %request.mode,
            output_mode = %request.output_mode,
            timeout = ?request.timeout,
            "Submitting document"
        );

        let response = self
            .request(Method::POST, "whisper")?
            .query(&WhisperParams::from(request))
            .header(CONTENT_TYPE, "application/octet-stream")
            .timeout(self.submit_timeout(request))
            .body(body)
            .send()
            .await?;

        let response = check_response(response, None).await?;
        let status = response.status();
        let header_hash = header_whisper_hash(&response);
        let body = response.text().await?;

        if status == StatusCode::ACCEPTED {
            let accepted = Accepted::from_response(&body, header_hash)?;

            tracing::info!(
                target: TRACING_TARGET_CLIENT,
                whisper_hash = %accepted.whisper_hash,
                "Extraction deferred"
            );

            return Ok(Submission::Accepted(accepted));
        }

        let mut extraction = Extraction::from_body(&body)?;
        if extraction.whisper_hash.is_none() {
            extraction.whisper_hash = header_hash;
        }

        tracing::info!(
            target: TRACING_TARGET_CLIENT,
            status = status.as_u16(),
            text_len = extraction.extracted_text.len(),
            "Extraction completed synchronously"
        );

        Ok(Submission::Completed(extraction))
    }

    async fn status(&self, whisper_hash: &WhisperHash) -> Result<WhisperStatus> {
        let response = self
            .request(Method::GET, "whisper-status")?
            .query(&[("whisper_hash", whisper_hash.as_str())])
            .send()
            .await?;

        let response = check_response(response, Some(whisper_hash)).await?;
        let status: WhisperStatus = decode_json(response).await?;

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            whisper_hash = %whisper_hash,
            status = %status.status,
            "Fetched status"
        );

        Ok(status)
    }

    async fn retrieve(&self, whisper_hash: &WhisperHash) -> Result<Extraction> {
        let response = self
            .request(Method::GET, "whisper-retrieve")?
            .query(&[("whisper_hash", whisper_hash.as_str())])
            .send()
            .await?;

        let response = check_response(response, Some(whisper_hash)).await?;
        let body = response.text().await?;
        let extraction = Extraction::from_body(&body)?.with_whisper_hash(whisper_hash.clone());

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            whisper_hash = %whisper_hash,
            text_len = extraction.extracted_text.len(),
            "Retrieved extraction"
        );

        Ok(extraction)
    }
}

/// Turns a non-success response into an API error.
pub(crate) async fn check_response(
    response: Response,
    whisper_hash: Option<&WhisperHash>,
) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body);

    tracing::warn!(
        target: TRACING_TARGET_CLIENT,
        status = status.as_u16(),
        error = %message,
        "Request failed"
    );

    let error = Error::api_error(status.as_u16(), message);
    Err(match whisper_hash {
        Some(hash) => error.with_whisper_hash(hash),
        None => error,
    })
}

/// Reads the whisper hash response header, if present.
pub(crate) fn header_whisper_hash(response: &Response) -> Option<WhisperHash> {
    response
        .headers()
        .get(WHISPER_HASH_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(WhisperHash::from)
}

/// Decodes a JSON response body.
pub(crate) async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}
