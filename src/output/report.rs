//! Highlight report written at the end of a run

use crate::processing::document::RankedSection;
use crate::processing::refiner::RefinedText;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightReport {
    pub metadata: ReportMetadata,
    /// Per-document top-K, documents in input order
    pub highlights: Vec<Highlight>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub documents: Vec<String>,
    pub persona: String,
    pub job: String,
    /// Wall-clock run time, e.g. "1.23s"
    pub processing_time: String,
    pub generated_at: DateTime<Utc>,
    #[serde(default)]
    pub skipped_documents: Vec<SkippedDocument>,
    /// Documents whose extraction stopped before the last page
    #[serde(default)]
    pub partial_documents: Vec<PartialDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedDocument {
    pub document: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialDocument {
    pub document: String,
    pub pages_read: usize,
    pub page_count: usize,
    pub reason: String,
}

/// A ranked section of one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub document: String,
    pub page: usize,
    pub title: String,
    pub rank: usize,
    pub subsections: Vec<SubsectionHighlight>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsectionHighlight {
    pub document: String,
    pub page: usize,
    /// Always null; kept so consumers see a uniform record shape
    pub title: Option<String>,
    pub rank: usize,
    pub refined_text: String,
    /// 1.0 for rank 1, decreasing with rank
    pub score: f64,
}

impl Highlight {
    pub fn new(ranked: &RankedSection, refined: Vec<RefinedText>) -> Self {
        let section = &ranked.section;
        let subsections = refined
            .into_iter()
            .map(|fragment| SubsectionHighlight {
                document: section.document.clone(),
                page: section.page,
                title: None,
                rank: fragment.rank,
                score: rank_score(fragment.rank),
                refined_text: fragment.refined_text,
            })
            .collect();

        Self {
            document: section.document.clone(),
            page: section.page,
            title: section.title.clone(),
            rank: ranked.rank,
            subsections,
        }
    }
}

/// Relevance derived from a 1-based rank
pub fn rank_score(rank: usize) -> f64 {
    1.0 / rank.max(1) as f64
}

pub fn format_processing_time(elapsed: Duration) -> String {
    format!("{:.2}s", elapsed.as_secs_f64())
}

impl HighlightReport {
    pub fn new(documents: Vec<String>, persona: &str, job: &str) -> Self {
        Self {
            metadata: ReportMetadata {
                documents,
                persona: persona.to_string(),
                job: job.to_string(),
                processing_time: format_processing_time(Duration::ZERO),
                generated_at: Utc::now(),
                skipped_documents: Vec::new(),
                partial_documents: Vec::new(),
            },
            highlights: Vec::new(),
        }
    }

    pub fn skip(&mut self, document: impl Into<String>, reason: impl Into<String>) {
        self.metadata.skipped_documents.push(SkippedDocument {
            document: document.into(),
            reason: reason.into(),
        });
    }

    pub fn highlights_for<'a>(&'a self, document: &'a str) -> impl Iterator<Item = &'a Highlight> + 'a {
        self.highlights.iter().filter(move |h| h.document == document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::document::Section;

    fn ranked(rank: usize) -> RankedSection {
        let mut section = Section::new("guide.pdf", 3, "Packing");
        section.text = "Bring layers for cold evenings and a light rain jacket for the coast.".to_string();
        RankedSection {
            section,
            score: 0.42,
            rank,
        }
    }

    #[test]
    fn test_rank_score_is_monotone() {
        assert_eq!(rank_score(1), 1.0);
        assert!(rank_score(2) > rank_score(3));
        assert_eq!(rank_score(0), 1.0);
    }

    #[test]
    fn test_highlight_from_ranked_section() {
        let refined = vec![
            RefinedText {
                rank: 1,
                refined_text: "Bring layers for cold evenings.".to_string(),
                score: 0.8,
            },
            RefinedText {
                rank: 2,
                refined_text: "A light rain jacket.".to_string(),
                score: 0.3,
            },
        ];
        let highlight = Highlight::new(&ranked(2), refined);

        assert_eq!(highlight.document, "guide.pdf");
        assert_eq!(highlight.page, 3);
        assert_eq!(highlight.rank, 2);
        assert_eq!(highlight.subsections.len(), 2);
        assert_eq!(highlight.subsections[1].score, 0.5);
        assert!(highlight.subsections.iter().all(|s| s.title.is_none() && s.page == 3));
    }

    #[test]
    fn test_json_shape() {
        let mut report = HighlightReport::new(vec!["guide.pdf".to_string()], "Travel planner", "Plan a trip");
        report.highlights.push(Highlight::new(&ranked(1), Vec::new()));
        report.skip("broken.pdf", "PDF extraction error: bad xref");

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["metadata"]["persona"], "Travel planner");
        assert_eq!(value["metadata"]["processing_time"], "0.00s");
        assert_eq!(value["metadata"]["skipped_documents"][0]["document"], "broken.pdf");
        assert_eq!(value["highlights"][0]["title"], "Packing");
        assert!(value["highlights"][0]["subsections"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_processing_time_format() {
        assert_eq!(format_processing_time(Duration::from_millis(1234)), "1.23s");
    }
}
