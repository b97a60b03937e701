//! Noise detection: running headers/footers, page numbers and table-of-contents entries

use crate::processing::document::{BoundingBox, LineRecord};
use regex::Regex;

/// Lines longer than this are also checked by their share of dots
const TOC_DOT_RATIO_MIN_CHARS: usize = 20;
const TOC_DOT_RATIO: f32 = 0.25;

pub struct NoiseFilter {
    header_footer_ratio: f32,
    toc_leader_regex: Regex,
    page_number_regex: Regex,
}

/// True when the box starts in the top band or ends in the bottom band of the page.
/// Pages without a usable height never produce positional noise.
pub fn is_header_footer(bbox: &BoundingBox, page_height: f32, ratio: f32) -> bool {
    if page_height <= 0.0 || !page_height.is_finite() {
        return false;
    }
    let band = page_height * ratio;
    bbox.y0 < band || bbox.y1 > page_height - band
}

impl NoiseFilter {
    pub fn new(header_footer_ratio: f32) -> Self {
        // "Introduction ........ 4", "Results.......12-14"
        let toc_leader_regex = Regex::new(r"^.{3,}\.{5,}\s*(?:\d{1,4}\s*[-–]\s*)?\d+\s*$")
            .expect("Invalid TOC leader regex");

        // "12", "Page 3", "3 of 10", "4/12", "- 7 -"
        let page_number_regex =
            Regex::new(r"(?i)^(?:page\s+)?\d{1,4}(?:\s*(?:of|/)\s*\d{1,4})?$|^[-–]\s*\d{1,4}\s*[-–]$")
                .expect("Invalid page number regex");

        Self {
            header_footer_ratio,
            toc_leader_regex,
            page_number_regex,
        }
    }

    pub fn is_toc_entry(&self, text: &str) -> bool {
        let text = text.trim();
        if self.toc_leader_regex.is_match(text) {
            return true;
        }

        let length = text.chars().count();
        if length > TOC_DOT_RATIO_MIN_CHARS {
            let dots = text.chars().filter(|&c| c == '.').count();
            return dots as f32 / length as f32 > TOC_DOT_RATIO;
        }
        false
    }

    pub fn is_page_number(&self, text: &str) -> bool {
        self.page_number_regex.is_match(text.trim())
    }

    /// A noise line contributes neither a heading nor body text
    pub fn is_noise(&self, line: &LineRecord) -> bool {
        is_header_footer(&line.bbox, line.page_height, self.header_footer_ratio)
            || self.is_toc_entry(&line.text)
            || self.is_page_number(&line.text)
    }
}
