//! Request options that only exist in the legacy API.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::whisper::{DocumentSource, Mode, OutputMode, SYNC_CEILING_SECS, WhisperRequest};

/// OCR engine used by the legacy API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OcrProvider {
    #[default]
    Advanced,
    Basic,
}

/// Legacy processing mode, derived from [`Mode`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProcessingMode {
    #[default]
    Ocr,
    Text,
}

impl From<Mode> for ProcessingMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::NativeText => Self::Text,
            Mode::LowCost | Mode::HighQuality | Mode::Form | Mode::Table => Self::Ocr,
        }
    }
}

/// Submission options that have no counterpart in [`WhisperRequest`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyOptions {
    /// Skip OCR even for pages without a text layer.
    pub force_text_processing: bool,
    /// Keep line positions for the highlight endpoint.
    pub store_metadata_for_highlighting: bool,
    pub ocr_provider: OcrProvider,
}

impl LegacyOptions {
    #[must_use]
    pub fn with_force_text_processing(mut self, force: bool) -> Self {
        self.force_text_processing = force;
        self
    }

    #[must_use]
    pub fn with_store_metadata_for_highlighting(mut self, store: bool) -> Self {
        self.store_metadata_for_highlighting = store;
        self
    }

    #[must_use]
    pub fn with_ocr_provider(mut self, provider: OcrProvider) -> Self {
        self.ocr_provider = provider;
        self
    }
}

/// Query string of a legacy submission.
#[derive(Debug, Serialize)]
pub(crate) struct LegacyParams<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    processing_mode: ProcessingMode,
    output_mode: &'static str,
    page_seperator: &'a str,
    force_text_processing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pages_to_extract: Option<&'a str>,
    timeout: u32,
    store_metadata_for_highlighting: bool,
    median_filter_size: u32,
    gaussian_blur_radius: u32,
    ocr_provider: OcrProvider,
    line_splitter_tolerance: f64,
    horizontal_stretch_factor: f64,
}

impl<'a> LegacyParams<'a> {
    pub(crate) fn new(request: &'a WhisperRequest, options: &LegacyOptions) -> Self {
        let output_mode = match request.output_mode {
            OutputMode::LayoutPreserving => "line-printer",
            OutputMode::Text => "text",
        };

        let url = match &request.source {
            DocumentSource::Url(url) => Some(url.as_str()),
            DocumentSource::File(_) | DocumentSource::Bytes(_) => None,
        };

        Self {
            url,
            processing_mode: request.mode.into(),
            output_mode,
            page_seperator: &request.page_separator,
            force_text_processing: options.force_text_processing,
            pages_to_extract: request.pages_to_extract.as_deref(),
            timeout: request.timeout.unwrap_or(SYNC_CEILING_SECS),
            store_metadata_for_highlighting: options.store_metadata_for_highlighting
                || request.add_line_nos,
            median_filter_size: request.median_filter_size,
            gaussian_blur_radius: request.gaussian_blur_radius,
            ocr_provider: options.ocr_provider,
            line_splitter_tolerance: request.line_splitter_tolerance,
            horizontal_stretch_factor: request.horizontal_stretch_factor,
        }
    }
}
