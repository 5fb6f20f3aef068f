//! Line positions for highlighting extracted text on the source page.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Highlight data keyed by line number (as a string, the way the server sends it).
pub type HighlightData = BTreeMap<String, LineHighlight>;

/// Position of one extracted line on its page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineHighlight {
    pub page: u32,
    pub base_y: u32,
    pub base_y_percent: f64,
    pub height: u32,
    pub height_percent: f64,
    pub page_height: u32,
    /// `[page, base_y, height, page_height]` as stored by the server.
    pub raw: Vec<i64>,
}

impl LineHighlight {
    /// Returns the raw metadata of this line.
    pub fn line_metadata(&self) -> LineMetadata {
        LineMetadata {
            page: self.page,
            base_y: self.base_y,
            height: self.height,
            page_height: self.page_height,
        }
    }
}

/// Raw line metadata: the baseline and height of a line on a page of known height.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u32; 4]", into = "[u32; 4]")]
pub struct LineMetadata {
    pub page: u32,
    pub base_y: u32,
    pub height: u32,
    pub page_height: u32,
}

impl From<[u32; 4]> for LineMetadata {
    fn from([page, base_y, height, page_height]: [u32; 4]) -> Self {
        Self {
            page,
            base_y,
            height,
            page_height,
        }
    }
}

impl From<LineMetadata> for [u32; 4] {
    fn from(meta: LineMetadata) -> Self {
        [meta.page, meta.base_y, meta.height, meta.page_height]
    }
}

/// Bounding box of a line, scaled to a target page image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightRect {
    pub page: u32,
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl LineMetadata {
    /// Scales this line to a page rendered at `target_width` x `target_height`.
    ///
    /// The box spans the full width of the page. Returns `None` for lines
    /// without a known page height (blank lines carry all zeros).
    pub fn highlight_rect(&self, target_width: u32, target_height: u32) -> Option<HighlightRect> {
        if self.page_height == 0 {
            return None;
        }

        let top = self.base_y.saturating_sub(self.height);

        Some(HighlightRect {
            page: self.page,
            x1: 0,
            y1: self.scale(top, target_height),
            x2: target_width,
            y2: self.scale(self.base_y, target_height),
        })
    }

    /// Maps a position on the page to `target_height` without rounding error.
    fn scale(&self, y: u32, target_height: u32) -> u32 {
        let scaled = u64::from(y) * u64::from(target_height) / u64::from(self.page_height);
        u32::try_from(scaled).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_rect_scales_to_target() {
        let meta = LineMetadata::from([0, 155, 51, 3168]);
        let rect = meta.highlight_rect(800, 1000).unwrap();

        assert_eq!(rect.page, 0);
        assert_eq!(rect.x1, 0);
        assert_eq!(rect.x2, 800);
        assert_eq!(rect.y1, 32);
        assert_eq!(rect.y2, 48);
    }

    #[test]
    fn test_line_at_page_bottom_reaches_target_height() {
        let rect = LineMetadata::from([0, 15, 5, 15]).highlight_rect(100, 246).unwrap();

        assert_eq!(rect.y1, 164);
        assert_eq!(rect.y2, 246);
    }

    #[test]
    fn test_blank_line_has_no_rect() {
        assert!(LineMetadata::default().highlight_rect(800, 1000).is_none());
    }

    #[test]
    fn test_highlight_data_from_wire() {
        let body = r#"{
            "1": {"base_y": 0, "base_y_percent": 0, "height": 0, "height_percent": 0,
                  "page": 0, "page_height": 0, "raw": [0, 0, 0, 0]},
            "2": {"base_y": 155, "base_y_percent": 4.8927, "height": 51, "height_percent": 1.6098,
                  "page": 0, "page_height": 3168, "raw": [0, 155, 51, 3168]}
        }"#;
        let data: HighlightData = serde_json::from_str(body).unwrap();

        assert_eq!(data.len(), 2);
        assert_eq!(data["2"].page_height, 3168);
        assert!((data["2"].base_y_percent - 4.8927).abs() < 1e-9);
        assert_eq!(data["2"].line_metadata(), LineMetadata::from([0, 155, 51, 3168]));
    }

    #[test]
    fn test_line_metadata_serializes_as_array() {
        let meta = LineMetadata::from([1, 2, 3, 4]);
        assert_eq!(serde_json::to_string(&meta).unwrap(), "[1,2,3,4]");
    }
}
