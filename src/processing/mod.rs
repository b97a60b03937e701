//! Structure extraction, relevance ranking and run orchestration

pub mod document;
pub mod font_stats;
pub mod noise_filter;
pub mod heading;
pub mod segmenter;
pub mod embeddings;
pub mod embedding_manager;
pub mod ranker;
pub mod refiner;
pub mod pipeline;

pub use embeddings::{Embedder, Model2VecEmbedder};
pub use pipeline::{DocumentOutcome, EmptyReason, Pipeline};
pub use refiner::{Refiner, SentenceRefiner};
