//! Heading classification from typography and line shape

use crate::processing::document::LineRecord;
use crate::processing::font_stats::FontThresholds;
use regex::Regex;

const MIN_HEADING_CHARS: usize = 3;
const MAX_HEADING_CHARS: usize = 200;
const MAX_HEADING_WORDS: usize = 15;

/// Lowercase words still allowed inside a title-cased heading
const TITLE_CONNECTORS: &[&str] = &[
    "a", "an", "and", "as", "at", "but", "by", "for", "from", "in", "into", "nor", "of", "on", "or",
    "the", "to", "vs", "via", "with",
];

pub struct HeadingClassifier {
    numbering_regex: Regex,
}

impl Default for HeadingClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadingClassifier {
    pub fn new() -> Self {
        // "1. Introduction", "2.1 Batch Inference", "3 Conclusion"
        let numbering_regex = Regex::new(r"^\d+(\.\d+)*\.?\s+[A-Z]").expect("Invalid heading numbering regex");
        Self { numbering_regex }
    }

    /// Size is a hard gate; numbering, casing and boldness are alternatives
    pub fn is_heading(&self, line: &LineRecord, thresholds: &FontThresholds) -> bool {
        let text = line.text.trim();

        let length = text.chars().count();
        if !(MIN_HEADING_CHARS..=MAX_HEADING_CHARS).contains(&length) {
            return false;
        }
        if !thresholds.exceeds_body(line.max_font_size) {
            return false;
        }

        let word_count = text.split_whitespace().count();
        if word_count > MAX_HEADING_WORDS {
            return false;
        }

        self.is_numbered(text)
            || (word_count > 1 && is_all_uppercase(text))
            || (word_count > 1 && is_title_case(text))
            || line.is_bold
    }

    pub fn is_numbered(&self, text: &str) -> bool {
        self.numbering_regex.is_match(text)
    }
}

/// At least one cased letter and no lowercase ones
pub fn is_all_uppercase(text: &str) -> bool {
    text.chars().any(|c| c.is_uppercase()) && !text.chars().any(|c| c.is_lowercase())
}

/// Every word that starts with a letter starts uppercase, except connector
/// words after the first one
pub fn is_title_case(text: &str) -> bool {
    let mut saw_word = false;
    for (i, word) in text.split_whitespace().enumerate() {
        let Some(first) = word.chars().find(|c| c.is_alphabetic()) else {
            continue;
        };
        saw_word = true;
        if first.is_uppercase() {
            continue;
        }
        let bare = word.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase();
        if i == 0 || !TITLE_CONNECTORS.contains(&bare.as_str()) {
            return false;
        }
    }
    saw_word
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::document::BoundingBox;

    fn thresholds() -> FontThresholds {
        FontThresholds {
            body_font_size: 12.0,
            min_heading_font_size: 12.5,
        }
    }

    fn line(text: &str, size: f32, bold: bool) -> LineRecord {
        LineRecord {
            text: text.to_string(),
            max_font_size: size,
            is_bold: bold,
            bbox: BoundingBox::new(72.0, 200.0, 400.0, 216.0),
            page_index: 0,
            page_height: 792.0,
        }
    }

    #[test]
    fn test_numbered_headings() {
        let classifier = HeadingClassifier::new();
        assert!(classifier.is_heading(&line("1. Introduction", 16.0, false), &thresholds()));
        assert!(!classifier.is_heading(&line("2.1 batch Inference", 14.0, false), &thresholds()));
        assert!(classifier.is_heading(&line("2.1 Batch inference", 14.0, false), &thresholds()));
        assert!(classifier.is_heading(&line("3 Conclusion", 14.0, false), &thresholds()));
    }

    #[test]
    fn test_size_is_hard_gate() {
        let classifier = HeadingClassifier::new();
        assert!(!classifier.is_heading(&line("1. Introduction", 12.0, true), &thresholds()));
        assert!(!classifier.is_heading(&line("RESULTS AND DISCUSSION", 11.0, true), &thresholds()));
    }

    #[test]
    fn test_length_and_word_limits() {
        let classifier = HeadingClassifier::new();
        assert!(!classifier.is_heading(&line("Ab", 18.0, true), &thresholds()));
        let long = "Word ".repeat(16);
        assert!(!classifier.is_heading(&line(long.trim(), 18.0, true), &thresholds()));
        let runaway = "A".repeat(201);
        assert!(!classifier.is_heading(&line(&runaway, 18.0, true), &thresholds()));
    }

    #[test]
    fn test_casing_and_bold_alternatives() {
        let classifier = HeadingClassifier::new();
        assert!(classifier.is_heading(&line("RELATED WORK", 14.0, false), &thresholds()));
        assert!(classifier.is_heading(&line("Deployment Strategies", 14.0, false), &thresholds()));
        assert!(classifier.is_heading(&line("Summary", 14.0, true), &thresholds()));
        // Single words need boldness or numbering
        assert!(!classifier.is_heading(&line("Summary", 14.0, false), &thresholds()));
        assert!(!classifier.is_heading(&line("the model was trained for days", 14.0, false), &thresholds()));
    }

    #[test]
    fn test_title_case() {
        assert!(is_title_case("Overview of the Deployment Process"));
        assert!(is_title_case("1. Introduction"));
        assert!(!is_title_case("of Mice and Men"));
        assert!(!is_title_case("Overview of the deployment process"));
        assert!(!is_title_case("2024"));
    }

    #[test]
    fn test_title_case_connector_boundary() {
        // Only listed connectors may stay lowercase, and never as the first word
        assert!(is_title_case("Methods and Results"));
        assert!(is_title_case("Travel via the Coast"));
        assert!(!is_title_case("Methods and results"));
        assert!(!is_title_case("Review Over Results then Summary"));
        assert!(!is_title_case("and Then There Were None"));
        // Capitalized words count regardless of the rest of the word
        assert!(is_title_case("RELATED Work"));
        assert!(is_title_case("Results (Continued)"));
    }

    #[test]
    fn test_size_gate_with_non_round_sizes() {
        let classifier = HeadingClassifier::new();
        let thresholds = FontThresholds::estimate(&[9.9626, 9.9626, 14.3462], &Default::default());
        assert!(!classifier.is_heading(&line("Results Are Summarized Below", 9.9626, false), &thresholds));
        assert!(!classifier.is_heading(&line("1. We Propose a Method", 9.9626, true), &thresholds));
        assert!(classifier.is_heading(&line("1. Introduction", 14.3462, false), &thresholds));
    }

    #[test]
    fn test_all_uppercase() {
        assert!(is_all_uppercase("RELATED WORK"));
        assert!(is_all_uppercase("PART 2: RESULTS"));
        assert!(!is_all_uppercase("2024"));
        assert!(!is_all_uppercase("RELATED Work"));
    }
}
