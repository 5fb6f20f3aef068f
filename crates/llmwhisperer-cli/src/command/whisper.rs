//! The `whisper` command.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use llmwhisperer::whisper::{Mode, OutputMode, Submission, WhisperRequest};
use llmwhisperer::workflow::Workflow;
use url::Url;

use super::{CommandContext, PollArgs};
use crate::TRACING_TARGET_COMMAND;

/// Arguments of `whisper`.
#[derive(Debug, Clone, Args)]
pub struct WhisperArgs {
    /// Document to upload
    #[arg(required_unless_present = "url", conflicts_with = "url")]
    pub file: Option<PathBuf>,

    /// Let the server download the document from this URL
    #[arg(long)]
    pub url: Option<Url>,

    /// Processing mode: native_text, low_cost, high_quality, form or table
    #[arg(long, default_value_t = Mode::default())]
    pub mode: Mode,

    /// Output mode: layout_preserving or text
    #[arg(long = "output-mode", default_value_t = OutputMode::default())]
    pub output_mode: OutputMode,

    /// Pages to extract, for example 1-5,7
    #[arg(long)]
    pub pages: Option<String>,

    /// Seconds the server may work synchronously before deferring (0-200)
    #[arg(long)]
    pub timeout: Option<u32>,

    /// Keep line positions for the highlight command
    #[arg(long = "line-numbers")]
    pub line_numbers: bool,

    /// Name recorded in usage reports
    #[arg(long = "file-name")]
    pub file_name: Option<String>,

    /// Report completion to this registered webhook
    #[arg(long, conflicts_with = "wait")]
    pub webhook: Option<String>,

    /// Opaque data passed to the webhook
    #[arg(long = "webhook-metadata", requires = "webhook", default_value = "")]
    pub webhook_metadata: String,

    /// Wait for deferred extractions to complete
    #[arg(long)]
    pub wait: bool,

    #[clap(flatten)]
    pub poll: PollArgs,
}

impl WhisperArgs {
    /// Builds the extraction request.
    pub fn request(&self) -> anyhow::Result<WhisperRequest> {
        let mut request = match (&self.file, &self.url) {
            (Some(path), _) => WhisperRequest::from_file(path),
            (None, Some(url)) => WhisperRequest::from_url(url.clone()),
            (None, None) => anyhow::bail!("either a file or --url is required"),
        };

        request = request
            .with_mode(self.mode)
            .with_output_mode(self.output_mode)
            .with_add_line_nos(self.line_numbers);

        if let Some(pages) = &self.pages {
            request = request.with_pages_to_extract(pages);
        }
        if let Some(timeout) = self.timeout {
            request = request.with_timeout(timeout);
        }
        if let Some(file_name) = &self.file_name {
            request = request.with_file_name(file_name);
        }
        if let Some(webhook) = &self.webhook {
            request = request.with_webhook(webhook, &self.webhook_metadata);
        }

        request.validate().context("invalid request")?;
        Ok(request)
    }

    pub async fn execute(self, ctx: &CommandContext) -> anyhow::Result<()> {
        let request = self.request()?;
        let transport = ctx.transport()?;

        if self.wait {
            let workflow = Workflow::new(transport.api()).with_policy(self.poll.policy());
            let extraction = workflow
                .whisper(&request)
                .await
                .context("extraction failed")?;
            return ctx.print_extraction(&extraction);
        }

        match transport
            .api()
            .submit(&request)
            .await
            .context("submission failed")?
        {
            Submission::Completed(extraction) => ctx.print_extraction(&extraction),
            Submission::Accepted(accepted) => {
                tracing::info!(
                    target: TRACING_TARGET_COMMAND,
                    whisper_hash = %accepted.whisper_hash,
                    "Extraction deferred, use `wait` or `status` with the whisper hash"
                );

                if ctx.text_only() {
                    ctx.print_line(accepted.whisper_hash.as_str())
                } else {
                    ctx.print_json(&accepted)
                }
            }
        }
    }
}
