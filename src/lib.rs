//! Document highlighter library

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod processing;
pub mod output;

pub use error::{HighlighterError, Result};
pub use config::Config;
