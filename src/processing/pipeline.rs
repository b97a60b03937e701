//! Run orchestration: documents in, highlight report out

use crate::config::{Config, ExtractionConfig};
use crate::error::{HighlighterError, Result};
use crate::input::span_collector::{PdfSource, SpanCollector};
use crate::output::report::{format_processing_time, Highlight, HighlightReport, PartialDocument};
use crate::processing::document::RankedSection;
use crate::processing::embeddings::Embedder;
use crate::processing::ranker::rank_sections;
use crate::processing::refiner::{RefinedText, Refiner, SentenceRefiner};
use crate::processing::segmenter::extract_sections;
use log::{debug, info, warn};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// No heading qualified, or every section was too short
    NoSections,
    /// Sections exist but none reached the similarity threshold
    BelowThreshold,
}

impl fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyReason::NoSections => write!(f, "no sections extracted"),
            EmptyReason::BelowThreshold => write!(f, "no section reached the similarity threshold"),
        }
    }
}

/// What a single document contributed to the run
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentOutcome {
    Ranked(Vec<Highlight>),
    Empty(EmptyReason),
    Failed(String),
}

pub struct Pipeline {
    source: Arc<dyn PdfSource>,
    embedder: Arc<dyn Embedder>,
    refiner: Arc<dyn Refiner>,
    extraction: ExtractionConfig,
    top_k: usize,
    threshold: f64,
}

impl Pipeline {
    pub fn new(source: Arc<dyn PdfSource>, embedder: Arc<dyn Embedder>, config: &Config) -> Self {
        Self {
            source,
            embedder,
            refiner: Arc::new(SentenceRefiner::new(config.refinement.max_sentences)),
            extraction: config.extraction.clone(),
            top_k: config.ranking.top_k,
            threshold: config.ranking.threshold,
        }
    }

    pub fn with_refiner(mut self, refiner: Arc<dyn Refiner>) -> Self {
        self.refiner = refiner;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn prompt_text(persona: &str, job: &str) -> String {
        format!("{} {}", persona.trim(), job.trim())
    }

    pub fn run(&self, documents: &[PathBuf], persona: &str, job: &str) -> Result<HighlightReport> {
        self.run_with_progress(documents, persona, job, |_| {})
    }

    /// Like `run`, calling `on_document` after each document finishes
    pub fn run_with_progress<F>(
        &self,
        documents: &[PathBuf],
        persona: &str,
        job: &str,
        mut on_document: F,
    ) -> Result<HighlightReport>
    where
        F: FnMut(&str),
    {
        let started = Instant::now();
        let names: Vec<String> = documents.iter().map(|p| p.to_string_lossy().to_string()).collect();
        let mut report = HighlightReport::new(names.clone(), persona, job);

        // Nothing can be ranked without the prompt vector
        let prompt = self
            .embedder
            .embed_one(&Self::prompt_text(persona, job))
            .map_err(|e| HighlighterError::Embedding(format!("Failed to embed prompt: {}", e)))?;

        for (path, name) in documents.iter().zip(names.iter()) {
            let (outcome, partial) = self.process(path, &prompt);
            if let Some(partial) = partial {
                warn!(
                    "{}: only {} of {} page(s) read: {}",
                    name, partial.pages_read, partial.page_count, partial.reason
                );
                report.metadata.partial_documents.push(partial);
            }
            match outcome {
                DocumentOutcome::Ranked(highlights) => {
                    info!("{}: {} highlight(s)", name, highlights.len());
                    report.highlights.extend(highlights);
                }
                DocumentOutcome::Empty(reason) => {
                    info!("{}: skipped, {}", name, reason);
                }
                DocumentOutcome::Failed(reason) => {
                    warn!("{}: skipped after failure: {}", name, reason);
                    report.skip(name.as_str(), reason);
                }
            }
            on_document(name);
        }

        report.metadata.processing_time = format_processing_time(started.elapsed());
        info!(
            "Run finished: {} highlight(s) from {} document(s) in {}",
            report.highlights.len(),
            documents.len(),
            report.metadata.processing_time
        );
        Ok(report)
    }

    /// Extract, rank and refine one document. Never fails the run.
    pub fn process_document(&self, path: &Path, prompt: &[f32]) -> DocumentOutcome {
        self.process(path, prompt).0
    }

    /// Like `process_document`, also reporting an extraction that stopped early
    pub fn process(&self, path: &Path, prompt: &[f32]) -> (DocumentOutcome, Option<PartialDocument>) {
        match self.try_process(path, prompt) {
            Ok(processed) => processed,
            Err(e) => (DocumentOutcome::Failed(e.to_string()), None),
        }
    }

    fn try_process(&self, path: &Path, prompt: &[f32]) -> Result<(DocumentOutcome, Option<PartialDocument>)> {
        let collector = SpanCollector::new(self.extraction.line_merge_tolerance).with_deadline(self.deadline());
        let lines = collector.collect(self.source.as_ref(), path)?;
        let partial = lines.truncated.as_ref().map(|truncation| PartialDocument {
            document: lines.document.clone(),
            pages_read: truncation.pages_read,
            page_count: lines.page_count,
            reason: truncation.reason.clone(),
        });

        let sections = extract_sections(&lines, &self.extraction);
        if sections.is_empty() {
            return Ok((DocumentOutcome::Empty(EmptyReason::NoSections), partial));
        }

        let ranked = rank_sections(&sections, prompt, self.embedder.as_ref(), self.top_k, self.threshold)?;
        if ranked.is_empty() {
            return Ok((DocumentOutcome::Empty(EmptyReason::BelowThreshold), partial));
        }
        debug!("{}: {} of {} section(s) ranked", lines.document, ranked.len(), sections.len());

        let highlights = ranked
            .iter()
            .map(|section| Highlight::new(section, self.refine(section, prompt)))
            .collect();
        Ok((DocumentOutcome::Ranked(highlights), partial))
    }

    fn refine(&self, ranked: &RankedSection, prompt: &[f32]) -> Vec<RefinedText> {
        match self.refiner.refine(&ranked.section, prompt, self.embedder.as_ref()) {
            Ok(refined) => refined,
            Err(e) => {
                warn!(
                    "{}: refinement failed for '{}', keeping section without subsections: {}",
                    ranked.section.document, ranked.section.title, e
                );
                Vec::new()
            }
        }
    }

    fn deadline(&self) -> Option<Duration> {
        match self.extraction.max_document_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}
