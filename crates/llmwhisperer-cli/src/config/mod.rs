//! CLI configuration management.
//!
//! This module defines the CLI configuration hierarchy:
//!
//! ```text
//! Cli
//! ├── client: ClientArgs   # Base URLs, API key, request timeout
//! ├── output: OutputArgs   # --legacy, --text
//! └── command: Command     # usage, whisper, status, retrieve, wait, ...
//! ```
//!
//! Connection settings can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.
//!
//! # Example
//!
//! ```bash
//! # Extract a document and wait for the result
//! llmwhisperer --api-key "..." whisper invoice.pdf --wait
//!
//! # Or via environment variables
//! LLMWHISPERER_API_KEY="..." llmwhisperer whisper invoice.pdf --wait --text
//! ```

use std::process;

use clap::{Args, Parser};
use llmwhisperer::ClientArgs;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::TRACING_TARGET_CONFIG;
use crate::command::Command;

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "llmwhisperer")]
#[command(about = "Extract text from documents with LLMWhisperer")]
#[command(version)]
pub struct Cli {
    /// Connection settings.
    #[clap(flatten)]
    pub client: ClientArgs,

    /// Transport and output selection.
    #[clap(flatten)]
    pub output: OutputArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command.
#[derive(Debug, Clone, Default, Args, Serialize, Deserialize)]
pub struct OutputArgs {
    /// Talk to the legacy (V1) API
    #[arg(long, global = true)]
    pub legacy: bool,

    /// Print only the extracted text instead of JSON
    #[arg(long, global = true)]
    pub text: bool,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// The .env file is loaded before clap parses arguments, so its variables
    /// act as defaults for the `env` fallbacks.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    ///
    /// Logs go to stderr so that stdout only carries command output.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    /// Logs configuration at debug level (no sensitive information).
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            version = llmwhisperer::version(),
            pid = process::id(),
            features = ?Self::enabled_features(),
            "Build information"
        );

        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            base_url = %self.client.base_url,
            legacy_base_url = %self.client.legacy_base_url,
            api_key = ?self.client.api_key.as_deref().map(|key| llmwhisperer::redact_key(key, 4)),
            api_timeout_secs = self.client.api_timeout,
            legacy = self.output.legacy,
            "Client configuration"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}
