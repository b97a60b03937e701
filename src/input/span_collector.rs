//! Span collection: PDF pages to ordered line records

use crate::error::{HighlighterError, Result};
use crate::processing::document::{BoundingBox, DocumentLines, LineRecord, PageTruncation};
use log::{debug, warn};
use pdf_oxide::PdfDocument;
use std::path::Path;
use std::time::{Duration, Instant};

/// One styled run of text as reported by the PDF backend
#[derive(Debug, Clone, PartialEq)]
pub struct RawSpan {
    pub text: String,
    pub size: f32,
    pub is_bold: bool,
    /// Top-left origin, page points
    pub bbox: BoundingBox,
}

#[derive(Debug, Clone, Default)]
pub struct PageSpans {
    pub height: f32,
    /// In backend reading order
    pub spans: Vec<RawSpan>,
}

/// An opened PDF
pub trait PdfPages {
    fn page_count(&mut self) -> Result<usize>;
    fn page(&mut self, index: usize) -> Result<PageSpans>;
}

/// Opens documents by path
pub trait PdfSource: Send + Sync {
    fn open(&self, path: &Path) -> Result<Box<dyn PdfPages>>;
}

/// `PdfSource` backed by pdf_oxide
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfOxideSource;

struct PdfOxidePages {
    doc: PdfDocument,
}

impl PdfSource for PdfOxideSource {
    fn open(&self, path: &Path) -> Result<Box<dyn PdfPages>> {
        let doc = PdfDocument::open(path).map_err(|e| {
            HighlighterError::PdfExtraction(format!("Failed to open PDF '{}': {}", path.display(), e))
        })?;
        Ok(Box::new(PdfOxidePages { doc }))
    }
}

impl PdfPages for PdfOxidePages {
    fn page_count(&mut self) -> Result<usize> {
        Ok(self.doc.page_count()?)
    }

    fn page(&mut self, index: usize) -> Result<PageSpans> {
        let info = self.doc.get_page_info(index)?;
        let page_box = info.crop_box.unwrap_or(info.media_box);
        let height = page_box.height.abs();
        let page_top = page_box.y.max(page_box.y + page_box.height);

        // pdf_oxide reports user space (y up); flip into top-left origin
        let spans = self
            .doc
            .extract_spans(index)?
            .into_iter()
            .map(|span| {
                let bottom = span.bbox.y.min(span.bbox.y + span.bbox.height);
                let top = span.bbox.y.max(span.bbox.y + span.bbox.height);
                RawSpan {
                    text: span.text,
                    size: span.font_size,
                    is_bold: span.font_weight.is_bold(),
                    bbox: BoundingBox::new(
                        span.bbox.x,
                        page_top - top,
                        span.bbox.x + span.bbox.width,
                        page_top - bottom,
                    ),
                }
            })
            .collect();

        Ok(PageSpans { height, spans })
    }
}

/// Groups spans into lines and gathers font sizes, page by page
pub struct SpanCollector {
    line_merge_tolerance: f32,
    max_document_time: Option<Duration>,
}

impl SpanCollector {
    pub fn new(line_merge_tolerance: f32) -> Self {
        Self {
            line_merge_tolerance,
            max_document_time: None,
        }
    }

    /// Abort a document whose collection runs past `limit`
    pub fn with_deadline(mut self, limit: Option<Duration>) -> Self {
        self.max_document_time = limit;
        self
    }

    pub fn collect(&self, source: &dyn PdfSource, path: &Path) -> Result<DocumentLines> {
        let started = Instant::now();
        let document = path.to_string_lossy().to_string();
        let mut pages = source.open(path)?;
        let page_count = pages.page_count()?;

        let mut lines = Vec::new();
        let mut font_sizes = Vec::new();
        let mut truncated = None;

        for page_index in 0..page_count {
            if let Some(limit) = self.max_document_time {
                if started.elapsed() >= limit {
                    return Err(HighlighterError::DeadlineExceeded(format!(
                        "{} exceeded {:.0?} after {} of {} pages",
                        document, limit, page_index, page_count
                    )));
                }
            }

            let page = match pages.page(page_index) {
                Ok(page) => page,
                Err(e) if page_index > 0 => {
                    // Keep what earlier pages produced
                    warn!("{}: page {} unreadable, stopping: {}", document, page_index + 1, e);
                    truncated = Some(PageTruncation {
                        pages_read: page_index,
                        reason: e.to_string(),
                    });
                    break;
                }
                Err(e) => return Err(e),
            };

            font_sizes.extend(
                page.spans
                    .iter()
                    .filter(|s| !s.text.trim().is_empty())
                    .map(|s| s.size),
            );
            lines.extend(self.group_lines(&page, page_index));
        }

        debug!(
            "{}: {} page(s), {} line(s) in {:.2?}",
            document,
            page_count,
            lines.len(),
            started.elapsed()
        );

        Ok(DocumentLines {
            document,
            page_count,
            lines,
            font_sizes,
            truncated,
        })
    }

    /// Consecutive spans whose baselines are within tolerance form one line.
    /// Reading order is kept as reported.
    pub fn group_lines(&self, page: &PageSpans, page_index: usize) -> Vec<LineRecord> {
        let mut lines = Vec::new();
        let mut current: Option<LineRecord> = None;

        for span in &page.spans {
            let text = span.text.trim();
            if text.is_empty() {
                continue;
            }

            if let Some(line) = current.as_mut() {
                if (line.bbox.y1 - span.bbox.y1).abs() <= self.line_merge_tolerance {
                    line.text.push(' ');
                    line.text.push_str(text);
                    line.max_font_size = line.max_font_size.max(span.size);
                    line.is_bold |= span.is_bold;
                    line.bbox = line.bbox.union(&span.bbox);
                    continue;
                }
            }

            if let Some(done) = current.take() {
                lines.push(done);
            }
            current = Some(LineRecord {
                text: text.to_string(),
                max_font_size: span.size,
                is_bold: span.is_bold,
                bbox: span.bbox,
                page_index,
                page_height: page.height,
            });
        }

        lines.extend(current);
        lines
    }
}
