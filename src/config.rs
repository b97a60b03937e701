//! Configuration management for the document highlighter

use crate::error::{HighlighterError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub models: ModelConfig,
    pub extraction: ExtractionConfig,
    pub ranking: RankingConfig,
    pub refinement: RefinementConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub models_dir: PathBuf,
    pub default_embedding_model: String,
}

/// Tunables for structure extraction. The word-count floor and heading margin
/// are corpus dependent, so they live here instead of in the code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Sections whose body has fewer words than this are dropped
    pub min_section_words: usize,
    /// Added to the body font size to get the minimum heading font size
    pub heading_font_margin: f32,
    /// Fraction of the page height treated as header (top) and footer (bottom)
    pub header_footer_ratio: f32,
    /// Spans whose baselines differ by at most this many points share a line
    pub line_merge_tolerance: f32,
    pub fallback_heading_size: f32,
    pub fallback_body_size: f32,
    /// Per-document extraction budget in seconds, 0 disables it
    pub max_document_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    pub top_k: usize,
    pub threshold: f64,
    pub batch_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinementConfig {
    pub max_sentences: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub pretty_json: bool,
    pub color_output: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_section_words: 10,
            heading_font_margin: 0.5,
            header_footer_ratio: 0.10,
            line_merge_tolerance: 2.0,
            fallback_heading_size: 12.0,
            fallback_body_size: 10.0,
            max_document_secs: 60,
        }
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            threshold: 0.05,
            batch_size: 32,
        }
    }
}

impl Default for RefinementConfig {
    fn default() -> Self {
        Self { max_sentences: 5 }
    }
}

impl Default for Config {
    fn default() -> Self {
        let models_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".doc-highlighter")
            .join("models");

        Self {
            models: ModelConfig {
                models_dir,
                default_embedding_model: "potion-base-8M".to_string(),
            },
            extraction: ExtractionConfig::default(),
            ranking: RankingConfig::default(),
            refinement: RefinementConfig::default(),
            output: OutputConfig {
                pretty_json: true,
                color_output: true,
            },
        }
    }
}

impl Config {
    /// Load the user config, writing the defaults on first use
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| HighlighterError::Configuration(format!("Failed to parse config {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| HighlighterError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("doc-highlighter")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        let extraction = &self.extraction;
        if !(0.0..0.5).contains(&extraction.header_footer_ratio) {
            return Err(HighlighterError::Configuration(format!(
                "extraction.header_footer_ratio must be in [0, 0.5), got {}",
                extraction.header_footer_ratio
            )));
        }
        if extraction.heading_font_margin < 0.0 || extraction.line_merge_tolerance < 0.0 {
            return Err(HighlighterError::Configuration(
                "extraction margins and tolerances must not be negative".to_string(),
            ));
        }
        if !(-1.0..=1.0).contains(&self.ranking.threshold) {
            return Err(HighlighterError::Configuration(format!(
                "ranking.threshold must be a cosine similarity in [-1, 1], got {}",
                self.ranking.threshold
            )));
        }
        if self.ranking.batch_size == 0 {
            return Err(HighlighterError::Configuration(
                "ranking.batch_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn models_dir(&self) -> &PathBuf {
        &self.models.models_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ranking.top_k, 5);
        assert_eq!(config.ranking.threshold, 0.05);
        assert_eq!(config.extraction.min_section_words, 10);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.ranking.top_k = 3;
        config.extraction.heading_font_margin = 1.0;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.ranking.top_k, 3);
        assert_eq!(loaded.extraction, config.extraction);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let mut config = Config::default();
        config.ranking.threshold = 1.5;
        assert!(matches!(config.validate(), Err(HighlighterError::Configuration(_))));
    }

    #[test]
    fn test_malformed_file_is_configuration_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "models = 3").unwrap();
        assert!(matches!(Config::load_from(&path), Err(HighlighterError::Configuration(_))));
    }
}
