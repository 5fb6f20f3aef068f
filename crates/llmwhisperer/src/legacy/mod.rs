//! Compatibility transport for the legacy (V1) API.
//!
//! The legacy API exposes the same job lifecycle under different shapes: the
//! handle travels as `whisper-hash`, synchronous results and retrieved
//! results are plain text, and OCR is tuned with a separate set of options.
//! [`LegacyClient`] translates those shapes at the boundary so the
//! [`Workflow`](crate::workflow::Workflow) controller drives both versions.

mod legacy_client;
mod options;

pub use self::legacy_client::LegacyClient;
pub use self::options::{LegacyOptions, OcrProvider, ProcessingMode};
pub(crate) use self::options::LegacyParams;
