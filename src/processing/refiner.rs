//! Subsection refinement: picks the passages of a ranked section closest to the prompt

use crate::error::{HighlighterError, Result};
use crate::processing::document::Section;
use crate::processing::embeddings::{cosine_similarity, Embedder};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinedText {
    /// 1-based, 1 = closest to the prompt
    pub rank: usize,
    pub refined_text: String,
    pub score: f64,
}

pub trait Refiner: Send + Sync {
    fn refine(&self, section: &Section, prompt: &[f32], embedder: &dyn Embedder) -> Result<Vec<RefinedText>>;
}

/// Ranks the sentences of a section by similarity to the prompt
pub struct SentenceRefiner {
    max_sentences: usize,
}

impl SentenceRefiner {
    pub fn new(max_sentences: usize) -> Self {
        Self { max_sentences }
    }

    pub fn split_sentences(text: &str) -> Vec<String> {
        text.unicode_sentences()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl Refiner for SentenceRefiner {
    fn refine(&self, section: &Section, prompt: &[f32], embedder: &dyn Embedder) -> Result<Vec<RefinedText>> {
        let sentences = Self::split_sentences(&section.text);
        if sentences.is_empty() || self.max_sentences == 0 {
            return Ok(Vec::new());
        }

        let embeddings = embedder.embed(&sentences)?;
        if embeddings.len() != sentences.len() {
            return Err(HighlighterError::Embedding(format!(
                "Expected {} sentence embeddings, got {}",
                sentences.len(),
                embeddings.len()
            )));
        }

        let mut scored = sentences
            .into_iter()
            .zip(embeddings.iter())
            .map(|(sentence, embedding)| Ok((sentence, cosine_similarity(embedding, prompt)?)))
            .collect::<Result<Vec<_>>>()?;
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(self.max_sentences);

        Ok(scored
            .into_iter()
            .enumerate()
            .map(|(i, (refined_text, score))| RefinedText {
                rank: i + 1,
                refined_text,
                score,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scores sentences by whether they mention "budget"
    struct KeywordEmbedder;

    impl Embedder for KeywordEmbedder {
        fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts
                .iter()
                .map(|t| if t.contains("budget") { vec![1.0, 0.2] } else { vec![0.1, 1.0] })
                .collect())
        }
    }

    fn section(text: &str) -> Section {
        let mut s = Section::new("trip.pdf", 2, "Planning");
        s.text = text.to_string();
        s
    }

    #[test]
    fn test_split_sentences() {
        let sentences = SentenceRefiner::split_sentences("First one. Second one! Third?");
        assert_eq!(sentences, vec!["First one.", "Second one!", "Third?"]);
    }

    #[test]
    fn test_refine_orders_by_similarity() {
        let refiner = SentenceRefiner::new(2);
        let refined = refiner
            .refine(
                &section("Pack light shoes. Keep a budget for food. Visit the old town."),
                &[1.0, 0.0],
                &KeywordEmbedder,
            )
            .unwrap();
        assert_eq!(refined.len(), 2);
        assert_eq!(refined[0].rank, 1);
        assert_eq!(refined[0].refined_text, "Keep a budget for food.");
        // Equal scores keep text order
        assert_eq!(refined[1].refined_text, "Pack light shoes.");
        assert!(refined[0].score > refined[1].score);
    }

    #[test]
    fn test_empty_section_text() {
        let refiner = SentenceRefiner::new(5);
        assert!(refiner.refine(&section("   "), &[1.0, 0.0], &KeywordEmbedder).unwrap().is_empty());
    }
}
