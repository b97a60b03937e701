//! Document structures shared by extraction and ranking

use serde::{Deserialize, Serialize};

/// Axis-aligned box in page points, origin at the top-left corner (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BoundingBox {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Smallest box enclosing both boxes
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

/// One visual line of a page, merged from the spans that share it
#[derive(Debug, Clone, PartialEq)]
pub struct LineRecord {
    pub text: String,
    pub max_font_size: f32,
    pub is_bold: bool,
    pub bbox: BoundingBox,
    /// 0-based page index
    pub page_index: usize,
    pub page_height: f32,
}

/// Everything structure extraction needs from one PDF
#[derive(Debug, Clone, Default)]
pub struct DocumentLines {
    pub document: String,
    pub page_count: usize,
    pub lines: Vec<LineRecord>,
    /// Sizes of every non-empty span, in document order
    pub font_sizes: Vec<f32>,
    /// Set when a page after the first could not be read
    pub truncated: Option<PageTruncation>,
}

/// Extraction stopped early; `pages_read` pages made it into the lines
#[derive(Debug, Clone, PartialEq)]
pub struct PageTruncation {
    pub pages_read: usize,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub document: String,
    /// 1-based page of the heading
    pub page: usize,
    pub title: String,
    pub text: String,
}

impl Section {
    pub fn new(document: impl Into<String>, page: usize, title: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            page,
            title: title.into(),
            text: String::new(),
        }
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Text handed to the embedder when ranking this section
    pub fn ranking_text(&self) -> String {
        format!("{} {}", self.title, self.text)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSection {
    pub section: Section,
    /// Cosine similarity against the prompt embedding
    pub score: f64,
    /// 1-based position within the document's top-k
    pub rank: usize,
}

/// Collapse whitespace runs to single spaces and trim
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
