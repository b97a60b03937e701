//! CLI interface for the document highlighter

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "doc-highlighter")]
#[command(about = "Persona-driven section highlighting for PDF collections")]
#[command(long_about = "Extract titled sections from PDFs, rank them against a persona and a job to be done using static embeddings, and write the most relevant highlights as JSON")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank the sections of one or more PDFs
    Analyze {
        /// PDF files or directories containing PDFs
        #[arg(long, num_args = 1.., required = true)]
        pdfs: Vec<PathBuf>,

        /// Who the highlights are for
        #[arg(long)]
        persona: String,

        /// What the persona needs to get done
        #[arg(long)]
        job: String,

        /// Output JSON path
        #[arg(short, long)]
        output: PathBuf,

        /// Highlights kept per document
        #[arg(long)]
        top_k: Option<usize>,

        /// Minimum cosine similarity for a section to be kept
        #[arg(long)]
        threshold: Option<f64>,

        /// Embedding model id, local folder or HuggingFace repo ID
        #[arg(short, long)]
        embedding: Option<String>,

        /// Also scan sub-directories of directory inputs
        #[arg(short, long)]
        recursive: bool,

        /// Print a summary of the highlights after writing the output
        #[arg(short, long)]
        summary: bool,

        /// Include every refined passage in the summary
        #[arg(short, long)]
        detailed: bool,
    },

    /// Embedding model management
    Models {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ModelAction {
    /// List known embedding models
    List,

    /// Download an embedding model
    Download {
        /// Model id, name or HuggingFace repo ID
        model: String,

        /// Force re-download if model exists
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Reject thresholds outside the cosine range
pub fn validate_threshold(threshold: f64) -> Result<f64, String> {
    if (-1.0..=1.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(format!("Invalid threshold: {}. Expected a value between -1.0 and 1.0", threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from([
            "doc-highlighter",
            "analyze",
            "--pdfs",
            "a.pdf",
            "b.pdf",
            "--persona",
            "Travel planner",
            "--job",
            "Plan a trip",
            "--output",
            "out.json",
            "--top-k",
            "3",
        ])
        .unwrap();

        match cli.command {
            Commands::Analyze { pdfs, top_k, threshold, .. } => {
                assert_eq!(pdfs, vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")]);
                assert_eq!(top_k, Some(3));
                assert_eq!(threshold, None);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_validate_threshold() {
        assert_eq!(validate_threshold(0.05), Ok(0.05));
        assert!(validate_threshold(1.5).is_err());
    }
}
