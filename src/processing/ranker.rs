//! Relevance ranking of a document's sections against the prompt

use crate::error::{HighlighterError, Result};
use crate::processing::document::{RankedSection, Section};
use crate::processing::embeddings::{cosine_similarity, Embedder};
use log::debug;

/// Score every section against `prompt`, keep those at or above `threshold`,
/// and return the best `top_k` by descending score. Equal scores keep their
/// extraction order. All section texts go to the embedder in one call.
pub fn rank_sections(
    sections: &[Section],
    prompt: &[f32],
    embedder: &dyn Embedder,
    top_k: usize,
    threshold: f64,
) -> Result<Vec<RankedSection>> {
    if sections.is_empty() || top_k == 0 {
        return Ok(Vec::new());
    }

    let texts: Vec<String> = sections.iter().map(Section::ranking_text).collect();
    let embeddings = embedder.embed(&texts)?;
    if embeddings.len() != sections.len() {
        return Err(HighlighterError::Embedding(format!(
            "Expected {} section embeddings, got {}",
            sections.len(),
            embeddings.len()
        )));
    }

    let mut scored = Vec::new();
    for (section, embedding) in sections.iter().zip(embeddings.iter()) {
        let score = cosine_similarity(embedding, prompt)?;
        debug!("{}: '{}' scored {:.4}", section.document, section.title, score);
        if score >= threshold {
            scored.push((section, score));
        }
    }

    // sort_by is stable
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(top_k);

    Ok(scored
        .into_iter()
        .enumerate()
        .map(|(i, (section, score))| RankedSection {
            section: section.clone(),
            score,
            rank: i + 1,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns unit vectors whose cosine with [1, 0] is the preset score for each text
    struct ScriptedEmbedder {
        scores: Vec<f64>,
        calls: AtomicUsize,
    }

    impl ScriptedEmbedder {
        fn new(scores: &[f64]) -> Self {
            Self {
                scores: scores.to_vec(),
                calls: AtomicUsize::new(0),
            }
        }

        fn vector(score: f64) -> Vec<f32> {
            vec![score as f32, (1.0 - score * score).max(0.0).sqrt() as f32]
        }
    }

    impl Embedder for ScriptedEmbedder {
        fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.scores[..texts.len()].iter().map(|&s| Self::vector(s)).collect())
        }
    }

    fn sections(n: usize) -> Vec<Section> {
        (0..n)
            .map(|i| {
                let mut s = Section::new("doc.pdf", i + 1, format!("Section {}", i));
                s.text = "words ".repeat(10).trim().to_string();
                s
            })
            .collect()
    }

    const PROMPT: [f32; 2] = [1.0, 0.0];

    #[test]
    fn test_threshold_sort_and_truncate() {
        let embedder = ScriptedEmbedder::new(&[0.9, 0.05, 0.3, 0.02, 0.5]);
        let ranked = rank_sections(&sections(5), &PROMPT, &embedder, 3, 0.05).unwrap();

        let titles: Vec<_> = ranked.iter().map(|r| r.section.title.as_str()).collect();
        assert_eq!(titles, vec!["Section 0", "Section 4", "Section 2"]);
        let expected = [0.9, 0.5, 0.3];
        for (r, e) in ranked.iter().zip(expected) {
            assert!((r.score - e).abs() < 1e-6);
        }
        assert_eq!(ranked.iter().map(|r| r.rank).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let embedder = ScriptedEmbedder::new(&[0.9, 0.05, 0.3, 0.02, 0.5]);
        // The exact f64 score the 0.05 section will get after f32 rounding
        let boundary = cosine_similarity(&ScriptedEmbedder::vector(0.05), &PROMPT).unwrap();
        let ranked = rank_sections(&sections(5), &PROMPT, &embedder, 10, boundary).unwrap();
        assert_eq!(ranked.len(), 4);
        assert_eq!(ranked[3].section.title, "Section 1");
    }

    #[test]
    fn test_all_below_threshold_is_empty() {
        let embedder = ScriptedEmbedder::new(&[0.01, 0.02]);
        let ranked = rank_sections(&sections(2), &PROMPT, &embedder, 5, 0.05).unwrap();
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_ties_keep_extraction_order() {
        let embedder = ScriptedEmbedder::new(&[0.4, 0.6, 0.4, 0.6]);
        let ranked = rank_sections(&sections(4), &PROMPT, &embedder, 4, 0.0).unwrap();
        let titles: Vec<_> = ranked.iter().map(|r| r.section.title.as_str()).collect();
        assert_eq!(titles, vec!["Section 1", "Section 3", "Section 0", "Section 2"]);
    }

    #[test]
    fn test_empty_input_skips_embedder() {
        let embedder = ScriptedEmbedder::new(&[]);
        let ranked = rank_sections(&[], &PROMPT, &embedder, 5, 0.05).unwrap();
        assert!(ranked.is_empty());
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_embedding_count_mismatch_is_error() {
        struct Short;
        impl Embedder for Short {
            fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
                Ok(vec![vec![1.0, 0.0]])
            }
        }
        let result = rank_sections(&sections(2), &PROMPT, &Short, 5, 0.05);
        assert!(matches!(result, Err(HighlighterError::Embedding(_))));
    }

    #[test]
    fn test_ranking_is_deterministic() {
        let embedder = ScriptedEmbedder::new(&[0.2, 0.7, 0.7, 0.1]);
        let first = rank_sections(&sections(4), &PROMPT, &embedder, 3, 0.05).unwrap();
        let second = rank_sections(&sections(4), &PROMPT, &embedder, 3, 0.05).unwrap();
        assert_eq!(first, second);
    }
}
