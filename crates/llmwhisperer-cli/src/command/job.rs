//! Commands on an existing whisper hash.

use std::time::Duration;

use anyhow::Context;
use clap::Args;
use llmwhisperer::PollPolicy;
use llmwhisperer::whisper::WhisperHash;
use llmwhisperer::workflow::Workflow;

use super::CommandContext;
use crate::TRACING_TARGET_COMMAND;

/// A whisper hash as returned by `whisper`.
#[derive(Debug, Clone, Args)]
pub struct HashArgs {
    /// Whisper hash of the extraction
    pub whisper_hash: String,
}

impl HashArgs {
    pub fn whisper_hash(&self) -> WhisperHash {
        WhisperHash::from(self.whisper_hash.as_str())
    }

    pub async fn status(self, ctx: &CommandContext) -> anyhow::Result<()> {
        let transport = ctx.transport()?;
        let status = transport
            .api()
            .status(&self.whisper_hash())
            .await
            .context("failed to fetch status")?;

        if ctx.text_only() {
            ctx.print_line(status.status.as_ref())
        } else {
            ctx.print_json(&status)
        }
    }

    pub async fn retrieve(self, ctx: &CommandContext) -> anyhow::Result<()> {
        let transport = ctx.transport()?;
        let extraction = transport
            .api()
            .retrieve(&self.whisper_hash())
            .await
            .context("failed to retrieve extraction")?;

        ctx.print_extraction(&extraction)
    }
}

/// Polling budget of `--wait` and `wait`.
#[derive(Debug, Clone, Args)]
pub struct PollArgs {
    /// Seconds between two status polls
    #[arg(long = "poll-interval", default_value_t = 2)]
    pub poll_interval: u64,

    /// Give up after this many status polls
    #[arg(long = "max-attempts")]
    pub max_attempts: Option<u32>,

    /// Give up after this many seconds
    #[arg(long = "deadline", default_value_t = 180)]
    pub deadline: u64,
}

impl PollArgs {
    pub fn policy(&self) -> PollPolicy {
        let policy = PollPolicy::default()
            .with_interval(Duration::from_secs(self.poll_interval))
            .with_deadline(Duration::from_secs(self.deadline));

        match self.max_attempts {
            Some(max_attempts) => policy.with_max_attempts(max_attempts),
            None => policy,
        }
    }
}

/// Arguments of `wait`.
#[derive(Debug, Clone, Args)]
pub struct WaitArgs {
    #[clap(flatten)]
    pub hash: HashArgs,

    #[clap(flatten)]
    pub poll: PollArgs,
}

impl WaitArgs {
    pub async fn execute(self, ctx: &CommandContext) -> anyhow::Result<()> {
        let transport = ctx.transport()?;
        let whisper_hash = self.hash.whisper_hash();

        tracing::info!(
            target: TRACING_TARGET_COMMAND,
            whisper_hash = %whisper_hash,
            "Waiting for extraction"
        );

        let workflow = Workflow::new(transport.api()).with_policy(self.poll.policy());
        let extraction = workflow
            .wait_for_completion(&whisper_hash)
            .await
            .context("extraction did not complete")?;

        ctx.print_extraction(&extraction)
    }
}
