//! Error handling for the document highlighter

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HighlighterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("Deadline exceeded: {0}")]
    DeadlineExceeded(String),

    #[error("Embedding generation error: {0}")]
    Embedding(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, HighlighterError>;

/// model2vec-rs reports failures through anyhow
impl From<anyhow::Error> for HighlighterError {
    fn from(err: anyhow::Error) -> Self {
        HighlighterError::Embedding(err.to_string())
    }
}

impl From<pdf_oxide::Error> for HighlighterError {
    fn from(err: pdf_oxide::Error) -> Self {
        HighlighterError::PdfExtraction(err.to_string())
    }
}
