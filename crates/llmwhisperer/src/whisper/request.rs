//! Extraction request parameters.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use url::Url;

use crate::{Error, Result};

/// Longest synchronous window the server will hold a submission open, in seconds.
///
/// Jobs that do not finish inside the window are deferred and answered with a
/// whisper hash instead of a result.
pub const SYNC_CEILING_SECS: u32 = 200;

/// Where the document to extract comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentSource {
    /// A file on the local filesystem, read right before submission.
    File(PathBuf),
    /// An in-memory document.
    Bytes(Bytes),
    /// A document the server downloads itself.
    Url(Url),
}

impl DocumentSource {
    /// Resolves the source to the bytes to upload.
    ///
    /// Returns `None` for URL sources, which are passed through to the server.
    pub(crate) async fn read(&self) -> Result<Option<Bytes>> {
        match self {
            Self::File(path) => {
                let data = tokio::fs::read(path).await?;
                Ok(Some(Bytes::from(data)))
            }
            Self::Bytes(data) => Ok(Some(data.clone())),
            Self::Url(_) => Ok(None),
        }
    }

    /// Short description for logs. Never includes document contents.
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::File(path) => format!("file:{}", path.display()),
            Self::Bytes(data) => format!("bytes:{}", data.len()),
            Self::Url(url) => format!("url:{url}"),
        }
    }
}

/// Server-side processing mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Mode {
    /// Text layer only; no OCR.
    NativeText,
    /// Cheaper OCR for clean scans.
    LowCost,
    /// Best OCR quality for photos and noisy scans.
    HighQuality,
    /// OCR tuned for forms, checkboxes and handwriting.
    #[default]
    Form,
    /// OCR tuned for tabular documents.
    Table,
}

/// Shape of the extracted text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OutputMode {
    /// Keeps the visual layout of the page in the text.
    #[default]
    LayoutPreserving,
    /// Plain running text.
    Text,
}

/// Parameters of one extraction.
///
/// Built with [`WhisperRequest::from_file`], [`WhisperRequest::from_bytes`]
/// or [`WhisperRequest::from_url`] and the `with_*` setters.
///
/// # Examples
///
/// ```rust
/// use llmwhisperer::whisper::{Mode, WhisperRequest};
///
/// let request = WhisperRequest::from_file("invoice.pdf")
///     .with_mode(Mode::HighQuality)
///     .with_pages_to_extract("1-3")
///     .with_timeout(30);
///
/// assert_eq!(request.timeout, Some(30));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WhisperRequest {
    pub source: DocumentSource,
    pub mode: Mode,
    pub output_mode: OutputMode,
    /// Marker inserted between pages.
    pub page_separator: String,
    /// Page selection such as `1-5,7`; all pages when `None`.
    pub pages_to_extract: Option<String>,
    pub median_filter_size: u32,
    pub gaussian_blur_radius: u32,
    pub line_splitter_tolerance: f64,
    pub line_splitter_strategy: String,
    pub horizontal_stretch_factor: f64,
    pub mark_vertical_lines: bool,
    pub mark_horizontal_lines: bool,
    pub lang: String,
    pub tag: String,
    /// Name recorded in usage reports.
    pub file_name: Option<String>,
    /// Ask the server to store line metadata for highlighting.
    pub add_line_nos: bool,
    /// Opaque data forwarded to the webhook.
    pub webhook_metadata: Option<String>,
    /// Registered webhook to notify on completion.
    pub use_webhook: Option<String>,
    /// Seconds the caller is willing to wait synchronously, up to [`SYNC_CEILING_SECS`].
    pub timeout: Option<u32>,
}

impl WhisperRequest {
    /// Creates a request with default parameters for the given source.
    pub fn new(source: DocumentSource) -> Self {
        Self {
            source,
            mode: Mode::default(),
            output_mode: OutputMode::default(),
            page_separator: "<<<".to_string(),
            pages_to_extract: None,
            median_filter_size: 0,
            gaussian_blur_radius: 0,
            line_splitter_tolerance: 0.4,
            line_splitter_strategy: "left-priority".to_string(),
            horizontal_stretch_factor: 1.0,
            mark_vertical_lines: false,
            mark_horizontal_lines: false,
            lang: "eng".to_string(),
            tag: "default".to_string(),
            file_name: None,
            add_line_nos: false,
            webhook_metadata: None,
            use_webhook: None,
            timeout: None,
        }
    }

    /// Creates a request that uploads a local file.
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        Self::new(DocumentSource::File(path.as_ref().to_path_buf()))
    }

    /// Creates a request that uploads an in-memory document.
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        Self::new(DocumentSource::Bytes(data.into()))
    }

    /// Creates a request for a document the server downloads itself.
    pub fn from_url(url: Url) -> Self {
        Self::new(DocumentSource::Url(url))
    }

    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_output_mode(mut self, output_mode: OutputMode) -> Self {
        self.output_mode = output_mode;
        self
    }

    #[must_use]
    pub fn with_page_separator(mut self, separator: impl Into<String>) -> Self {
        self.page_separator = separator.into();
        self
    }

    #[must_use]
    pub fn with_pages_to_extract(mut self, pages: impl Into<String>) -> Self {
        self.pages_to_extract = Some(pages.into());
        self
    }

    #[must_use]
    pub fn with_median_filter_size(mut self, size: u32) -> Self {
        self.median_filter_size = size;
        self
    }

    #[must_use]
    pub fn with_gaussian_blur_radius(mut self, radius: u32) -> Self {
        self.gaussian_blur_radius = radius;
        self
    }

    #[must_use]
    pub fn with_line_splitter_tolerance(mut self, tolerance: f64) -> Self {
        self.line_splitter_tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn with_line_splitter_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.line_splitter_strategy = strategy.into();
        self
    }

    #[must_use]
    pub fn with_horizontal_stretch_factor(mut self, factor: f64) -> Self {
        self.horizontal_stretch_factor = factor;
        self
    }

    #[must_use]
    pub fn with_mark_vertical_lines(mut self, mark: bool) -> Self {
        self.mark_vertical_lines = mark;
        self
    }

    #[must_use]
    pub fn with_mark_horizontal_lines(mut self, mark: bool) -> Self {
        self.mark_horizontal_lines = mark;
        self
    }

    #[must_use]
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    #[must_use]
    pub fn with_add_line_nos(mut self, add: bool) -> Self {
        self.add_line_nos = add;
        self
    }

    #[must_use]
    pub fn with_webhook(mut self, name: impl Into<String>, metadata: impl Into<String>) -> Self {
        self.use_webhook = Some(name.into());
        self.webhook_metadata = Some(metadata.into());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, secs: u32) -> Self {
        self.timeout = Some(secs);
        self
    }

    /// Returns `true` if completion is reported through a webhook.
    pub fn uses_webhook(&self) -> bool {
        self.use_webhook.as_deref().is_some_and(|name| !name.is_empty())
    }

    /// Checks the parameters that can be rejected without asking the server.
    pub fn validate(&self) -> Result<()> {
        if let Some(timeout) = self.timeout
            && timeout > SYNC_CEILING_SECS
        {
            return Err(Error::invalid_input(format!(
                "timeout must be between 0 and {SYNC_CEILING_SECS}"
            )));
        }

        if !(self.line_splitter_tolerance.is_finite() && self.line_splitter_tolerance >= 0.0) {
            return Err(Error::invalid_input(
                "line_splitter_tolerance must be a non-negative number",
            ));
        }

        if !(self.horizontal_stretch_factor.is_finite() && self.horizontal_stretch_factor > 0.0) {
            return Err(Error::invalid_input(
                "horizontal_stretch_factor must be a positive number",
            ));
        }

        Ok(())
    }
}

/// Query string of a submission to the current API.
#[derive(Debug, Serialize)]
pub(crate) struct WhisperParams<'a> {
    mode: Mode,
    output_mode: OutputMode,
    page_seperator: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pages_to_extract: Option<&'a str>,
    median_filter_size: u32,
    gaussian_blur_radius: u32,
    line_splitter_tolerance: f64,
    #[serde(rename = "line_spitter_strategy")]
    line_splitter_strategy: &'a str,
    horizontal_stretch_factor: f64,
    mark_vertical_lines: bool,
    mark_horizontal_lines: bool,
    lang: &'a str,
    tag: &'a str,
    #[serde(rename = "filename", skip_serializing_if = "Option::is_none")]
    file_name: Option<&'a str>,
    add_line_nos: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    webhook_metadata: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    use_webhook: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout: Option<u32>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    url_in_post: bool,
}

impl<'a> From<&'a WhisperRequest> for WhisperParams<'a> {
    fn from(request: &'a WhisperRequest) -> Self {
        Self {
            mode: request.mode,
            output_mode: request.output_mode,
            page_seperator: &request.page_separator,
            pages_to_extract: request.pages_to_extract.as_deref(),
            median_filter_size: request.median_filter_size,
            gaussian_blur_radius: request.gaussian_blur_radius,
            line_splitter_tolerance: request.line_splitter_tolerance,
            line_splitter_strategy: &request.line_splitter_strategy,
            horizontal_stretch_factor: request.horizontal_stretch_factor,
            mark_vertical_lines: request.mark_vertical_lines,
            mark_horizontal_lines: request.mark_horizontal_lines,
            lang: &request.lang,
            tag: &request.tag,
            file_name: request.file_name.as_deref(),
            add_line_nos: request.add_line_nos,
            webhook_metadata: request.webhook_metadata.as_deref(),
            use_webhook: request.use_webhook.as_deref().filter(|s| !s.is_empty()),
            timeout: request.timeout,
            url_in_post: matches!(request.source, DocumentSource::Url(_)),
        }
    }
}
