//! The `webhook` commands.

use anyhow::Context;
use clap::Subcommand;
use llmwhisperer::whisper::WebhookRegistration;
use url::Url;

use super::CommandContext;
use crate::TRACING_TARGET_COMMAND;

/// Webhook management.
#[derive(Debug, Clone, Subcommand)]
pub enum WebhookCommand {
    /// Register a webhook for deferred extractions
    Register {
        /// Name to pass as --webhook to `whisper`
        #[arg(long)]
        name: String,

        /// Endpoint called when an extraction completes
        #[arg(long)]
        url: Url,

        /// Token presented to the endpoint
        #[arg(long = "auth-token", env = "LLMWHISPERER_WEBHOOK_TOKEN", hide_env_values = true)]
        auth_token: String,
    },
    /// Show a registered webhook
    Details {
        /// Name of the webhook
        #[arg(long)]
        name: String,
    },
}

impl WebhookCommand {
    pub async fn execute(self, ctx: &CommandContext) -> anyhow::Result<()> {
        let client = ctx.client()?;

        let response = match self {
            Self::Register {
                name,
                url,
                auth_token,
            } => {
                let registration = WebhookRegistration::new(url, auth_token, name);
                tracing::info!(
                    target: TRACING_TARGET_COMMAND,
                    webhook = %registration,
                    "Registering webhook"
                );

                client
                    .register_webhook(&registration)
                    .await
                    .context("failed to register webhook")?
            }
            Self::Details { name } => client
                .webhook_details(&name)
                .await
                .with_context(|| format!("failed to fetch webhook '{name}'"))?,
        };

        ctx.print_json(&response)
    }
}
