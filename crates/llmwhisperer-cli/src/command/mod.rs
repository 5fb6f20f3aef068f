//! Subcommands and their shared plumbing.

mod highlight;
mod job;
mod usage;
mod webhook;
mod whisper;

use std::io::Write;

use anyhow::Context;
use clap::Subcommand;
use llmwhisperer::whisper::{Extraction, WhisperApi};
use llmwhisperer::{ClientArgs, LegacyClient, WhisperClient};
use serde::Serialize;

pub use self::highlight::HighlightArgs;
pub use self::job::{HashArgs, PollArgs, WaitArgs};
pub use self::webhook::WebhookCommand;
pub use self::whisper::WhisperArgs;
use crate::config::{Cli, OutputArgs};

/// Available commands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show the page usage of the account
    Usage,
    /// Submit a document for extraction
    Whisper(WhisperArgs),
    /// Show the status of a deferred extraction
    Status(HashArgs),
    /// Fetch the result of a processed extraction (only once)
    Retrieve(HashArgs),
    /// Wait for a deferred extraction and fetch its result
    Wait(WaitArgs),
    /// Fetch line positions of an extraction submitted with --line-numbers
    Highlight(HighlightArgs),
    /// Register or inspect webhooks
    #[command(subcommand)]
    Webhook(WebhookCommand),
}

impl Command {
    /// Runs the command.
    pub async fn execute(self, ctx: &CommandContext) -> anyhow::Result<()> {
        match self {
            Self::Usage => usage::execute(ctx).await,
            Self::Whisper(args) => args.execute(ctx).await,
            Self::Status(args) => args.status(ctx).await,
            Self::Retrieve(args) => args.retrieve(ctx).await,
            Self::Wait(args) => args.execute(ctx).await,
            Self::Highlight(args) => args.execute(ctx).await,
            Self::Webhook(command) => command.execute(ctx).await,
        }
    }
}

/// The API transport selected on the command line.
pub enum Transport {
    Current(WhisperClient),
    Legacy(LegacyClient),
}

impl Transport {
    pub fn api(&self) -> &dyn WhisperApi {
        match self {
            Self::Current(client) => client,
            Self::Legacy(client) => client,
        }
    }
}

/// Settings every command runs with.
pub struct CommandContext {
    client: ClientArgs,
    output: OutputArgs,
}

impl CommandContext {
    pub fn new(cli: &Cli) -> Self {
        Self {
            client: cli.client.clone(),
            output: cli.output.clone(),
        }
    }

    /// Returns `true` if only the extracted text should be printed.
    pub fn text_only(&self) -> bool {
        self.output.text
    }

    /// Creates a client for the current API.
    ///
    /// Fails for `--legacy`, since the command has no legacy counterpart.
    pub fn client(&self) -> anyhow::Result<WhisperClient> {
        if self.output.legacy {
            anyhow::bail!("this command is not available for the legacy API");
        }

        let config = self.client.config().context("invalid client configuration")?;
        WhisperClient::new(config, self.client.credentials()).context("failed to create client")
    }

    /// Creates the transport chosen with `--legacy`.
    pub fn transport(&self) -> anyhow::Result<Transport> {
        if !self.output.legacy {
            return self.client().map(Transport::Current);
        }

        let config = self
            .client
            .legacy_config()
            .context("invalid legacy client configuration")?;
        let client = LegacyClient::new(config, self.client.credentials())
            .context("failed to create legacy client")?;
        Ok(Transport::Legacy(client))
    }

    /// Prints a value as pretty JSON.
    pub fn print_json<T: Serialize>(&self, value: &T) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(value).context("failed to encode output")?;
        self.print_line(&json)
    }

    /// Prints an extraction as JSON, or only its text with `--text`.
    pub fn print_extraction(&self, extraction: &Extraction) -> anyhow::Result<()> {
        if self.output.text {
            self.print_line(&extraction.extracted_text)
        } else {
            self.print_json(extraction)
        }
    }

    pub fn print_line(&self, line: &str) -> anyhow::Result<()> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{line}").context("failed to write output")
    }
}
