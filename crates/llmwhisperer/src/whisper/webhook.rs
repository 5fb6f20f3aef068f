//! Webhook registration payloads.

use serde::{Deserialize, Serialize};

/// Callback registration sent to the webhook management endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookRegistration {
    /// Endpoint the server calls when a job completes.
    pub url: String,
    /// Token the server presents to the endpoint.
    pub auth_token: String,
    /// Name used as `use_webhook` in submissions.
    pub webhook_name: String,
}

impl WebhookRegistration {
    pub fn new(
        url: impl Into<String>,
        auth_token: impl Into<String>,
        webhook_name: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            auth_token: auth_token.into(),
            webhook_name: webhook_name.into(),
        }
    }
}

impl std::fmt::Display for WebhookRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.webhook_name, self.url)
    }
}

/// Stored webhook configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookDetails {
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_name: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Response of the webhook management endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_details: Option<WebhookDetails>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
