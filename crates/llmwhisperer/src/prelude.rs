//! Prelude for the llmwhisperer crate
//!
//! This module re-exports the most commonly used types and traits from the crate
//! to provide a convenient single import for users.

pub use crate::client::{WhisperClient, WhisperConfig, WhisperCredentials};
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::legacy::LegacyClient;
pub use crate::whisper::{
    Extraction, ExtractionStatus, Mode, OutputMode, Submission, WhisperApi, WhisperHash,
    WhisperRequest,
};
pub use crate::workflow::{PollPolicy, Workflow};
