//! Embeddings generation using Model2Vec

use crate::config::Config;
use crate::error::{HighlighterError, Result};
use log::{debug, info};
use model2vec_rs::model::StaticModel;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Text to dense vectors, one vector per input, in input order.
/// Implementations must be free of observable side effects.
pub trait Embedder: Send + Sync {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        self.embed(&[text.to_string()])?
            .pop()
            .ok_or_else(|| HighlighterError::Embedding("Embedder returned no vector".to_string()))
    }
}

pub struct Model2VecEmbedder {
    model: StaticModel,
    batch_size: usize,
    model_name: String,
}

impl Model2VecEmbedder {
    /// `model` is a local model folder or a Hugging Face repo id
    pub fn load(model: &Path, batch_size: usize) -> Result<Self> {
        let start_time = Instant::now();
        info!("Loading Model2Vec embedding model from: {}", model.display());

        let static_model = StaticModel::from_pretrained(
            model,
            None, // token
            None, // normalize
            None, // subfolder
        )
        .map_err(|e| HighlighterError::Embedding(format!("Failed to load model {}: {}", model.display(), e)))?;

        info!("Model loaded in {:.2?}", start_time.elapsed());

        Ok(Self {
            model: static_model,
            batch_size: batch_size.max(1),
            model_name: model.to_string_lossy().to_string(),
        })
    }

    /// A local folder as given, else `models_dir/name`, else `name` unchanged
    /// so model2vec can treat it as a hub repo id
    pub fn resolve_model_path(config: &Config, name: &str) -> PathBuf {
        let direct = PathBuf::from(name);
        if direct.exists() {
            return direct;
        }
        let local_path = config.models_dir().join(name);
        if local_path.exists() {
            return local_path;
        }
        direct
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}

impl Embedder for Model2VecEmbedder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let start_time = Instant::now();
        let mut embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            embeddings.extend(self.model.encode(batch));
        }
        debug!("Embedded {} text(s) in {:.2?}", texts.len(), start_time.elapsed());
        Ok(embeddings)
    }
}

/// Cosine similarity in double precision. Zero vectors score 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(HighlighterError::Embedding(format!(
            "Embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    let mut dot_product = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (x as f64, y as f64);
        dot_product += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok(dot_product / (norm_a.sqrt() * norm_b.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity_basics() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]).unwrap() - 1.0).abs() < 1e-12);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap().abs() < 1e-12);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_similarity_is_scale_invariant() {
        let a = cosine_similarity(&[1.0, 2.0, 3.0], &[2.0, 1.0, 0.5]).unwrap();
        let b = cosine_similarity(&[10.0, 20.0, 30.0], &[0.2, 0.1, 0.05]).unwrap();
        assert!((a - b).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_edge_cases() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&[], &[]).unwrap(), 0.0);
        assert!(cosine_similarity(&[1.0], &[1.0, 2.0]).is_err());
    }

    struct Constant;

    impl Embedder for Constant {
        fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|t| vec![t.len() as f32, 1.0]).collect())
        }
    }

    #[test]
    fn test_resolve_model_path_prefers_models_dir() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let mut config = Config::default();
        config.models.models_dir = temp_dir.path().to_path_buf();
        std::fs::create_dir(temp_dir.path().join("potion-base-8M")).unwrap();

        assert_eq!(
            Model2VecEmbedder::resolve_model_path(&config, "potion-base-8M"),
            temp_dir.path().join("potion-base-8M")
        );
        assert_eq!(
            Model2VecEmbedder::resolve_model_path(&config, "minishlab/potion-base-32M"),
            PathBuf::from("minishlab/potion-base-32M")
        );
    }

    #[test]
    fn test_embed_one_uses_batch_call() {
        assert_eq!(Constant.embed_one("abc").unwrap(), vec![3.0, 1.0]);
    }
}
