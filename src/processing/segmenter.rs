//! Turns a classified line stream into titled sections

use crate::config::ExtractionConfig;
use crate::processing::document::{normalize_whitespace, DocumentLines, LineRecord, Section};
use crate::processing::font_stats::FontThresholds;
use crate::processing::heading::HeadingClassifier;
use crate::processing::noise_filter::NoiseFilter;
use log::debug;

#[derive(Debug)]
enum SegmenterState {
    NoOpenSection,
    SectionOpen(Section),
}

/// Line-at-a-time section builder. The open section is owned by the state and
/// moved into the output when it is finalized.
#[derive(Debug)]
pub struct Segmenter {
    document: String,
    min_section_words: usize,
    state: SegmenterState,
    sections: Vec<Section>,
    dropped: usize,
}

impl Segmenter {
    pub fn new(document: impl Into<String>, min_section_words: usize) -> Self {
        Self {
            document: document.into(),
            min_section_words,
            state: SegmenterState::NoOpenSection,
            sections: Vec::new(),
            dropped: 0,
        }
    }

    pub fn push(&mut self, line: &LineRecord, is_heading: bool) {
        if is_heading {
            self.finalize_open();
            let section = Section::new(self.document.clone(), line.page_index + 1, line.text.trim());
            self.state = SegmenterState::SectionOpen(section);
            return;
        }

        match &mut self.state {
            SegmenterState::SectionOpen(section) => {
                section.text.push_str(line.text.trim());
                section.text.push(' ');
            }
            // Nothing before the first heading belongs to a section
            SegmenterState::NoOpenSection => {}
        }
    }

    pub fn finish(mut self) -> Vec<Section> {
        self.finalize_open();
        if self.dropped > 0 {
            debug!(
                "{}: dropped {} section(s) under {} words",
                self.document, self.dropped, self.min_section_words
            );
        }
        self.sections
    }

    fn finalize_open(&mut self) {
        if let SegmenterState::SectionOpen(mut section) =
            std::mem::replace(&mut self.state, SegmenterState::NoOpenSection)
        {
            section.text = normalize_whitespace(&section.text);
            if section.word_count() >= self.min_section_words {
                self.sections.push(section);
            } else {
                self.dropped += 1;
            }
        }
    }
}

/// Full structure extraction for one document: thresholds, noise removal,
/// heading classification and segmentation, in line order
pub fn extract_sections(doc: &DocumentLines, config: &ExtractionConfig) -> Vec<Section> {
    let thresholds = FontThresholds::estimate(&doc.font_sizes, config);
    debug!(
        "{}: body font {:.2}pt, heading font >= {:.2}pt",
        doc.document, thresholds.body_font_size, thresholds.min_heading_font_size
    );

    let noise_filter = NoiseFilter::new(config.header_footer_ratio);
    let classifier = HeadingClassifier::new();
    let mut segmenter = Segmenter::new(doc.document.clone(), config.min_section_words);

    let mut noise_lines = 0;
    for line in &doc.lines {
        if noise_filter.is_noise(line) {
            noise_lines += 1;
            continue;
        }
        segmenter.push(line, classifier.is_heading(line, &thresholds));
    }

    let sections = segmenter.finish();
    debug!(
        "{}: {} line(s), {} noise, {} section(s)",
        doc.document,
        doc.lines.len(),
        noise_lines,
        sections.len()
    );
    sections
}
