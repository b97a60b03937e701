//! doc-highlighter: persona-driven section highlighting for PDF collections

use clap::Parser;
use colored::Colorize;
use doc_highlighter::cli::{self, Cli, Commands, ConfigAction, ModelAction};
use doc_highlighter::config::Config;
use doc_highlighter::error::{HighlighterError, Result};
use doc_highlighter::input::{InputManager, PdfOxideSource};
use doc_highlighter::output::formatter::{save_report_to_file, ConsoleFormatter, JsonFormatter, OutputFormatter};
use doc_highlighter::processing::embedding_manager::EmbeddingModelManager;
use doc_highlighter::processing::{Model2VecEmbedder, Pipeline};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_result = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match config_result {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, mut config: Config, config_file: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Analyze {
            pdfs,
            persona,
            job,
            output,
            top_k,
            threshold,
            embedding,
            recursive,
            summary,
            detailed,
        } => {
            if let Some(top_k) = top_k {
                config.ranking.top_k = top_k;
            }
            if let Some(threshold) = threshold {
                config.ranking.threshold = cli::validate_threshold(threshold).map_err(HighlighterError::InvalidInput)?;
            }

            let documents = InputManager::new().with_recursion(recursive).resolve_documents(&pdfs)?;

            println!("🚀 Document highlighting");
            println!("📄 Documents: {}", documents.len());
            println!("👤 Persona: {}", persona);
            println!("🎯 Job: {}", job);

            let model_name = embedding.unwrap_or_else(|| config.models.default_embedding_model.clone());
            let model_path = resolve_embedding_model(&config, &model_name).await?;
            println!("🧠 Embedding Model: {}", model_path.display());

            let progress = ProgressBar::new(documents.len() as u64);
            if let Ok(style) = ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}") {
                progress.set_style(style);
            }

            let run_config = config.clone();
            let run_progress = progress.clone();
            let report = tokio::task::spawn_blocking(move || -> Result<_> {
                let embedder = Model2VecEmbedder::load(&model_path, run_config.ranking.batch_size)?;
                info!("Ranking with embedding model {}", embedder.model_name());
                let pipeline = Pipeline::new(Arc::new(PdfOxideSource), Arc::new(embedder), &run_config);
                pipeline.run_with_progress(&documents, &persona, &job, |name| {
                    run_progress.set_message(name.to_string());
                    run_progress.inc(1);
                })
            })
            .await
            .map_err(|e| HighlighterError::Processing(format!("Analysis task failed: {}", e)))??;
            progress.finish_and_clear();

            let json = JsonFormatter::new(config.output.pretty_json).format_report(&report)?;
            save_report_to_file(&json, &output)?;
            info!("Report written to {}", output.display());

            println!(
                "✅ {} highlight(s) written to {} in {}",
                report.highlights.len(),
                output.display(),
                report.metadata.processing_time
            );
            for skipped in &report.metadata.skipped_documents {
                println!("⚠️  Skipped {}: {}", skipped.document, skipped.reason);
            }

            if summary || detailed {
                let formatter = ConsoleFormatter::new(config.output.color_output, detailed);
                println!("{}", formatter.format_report(&report)?);
            }
        }

        Commands::Models { action } => match action {
            ModelAction::List => {
                println!("📚 Embedding Models\n");
                let manager = EmbeddingModelManager::new(config.models_dir().clone()).await?;

                for (id, info) in manager.list_available_models() {
                    let status = if manager.is_model_downloaded(id) {
                        "✅ Downloaded".green().to_string()
                    } else {
                        "⬇️  Available".to_string()
                    };
                    println!("  • {} ({}) - {} MB, {} dims [{}]", id, info.repo_id, info.size_mb, info.dimensions, status);
                    println!("    {}", info.description);
                }

                println!("\n💡 Default: {}", config.models.default_embedding_model);
                println!("   Download with: doc-highlighter models download {}", manager.auto_select_model());
            }

            ModelAction::Download { model, force } => {
                let mut manager = EmbeddingModelManager::new(config.models_dir().clone()).await?;
                let model_id = manager
                    .resolve_model_id(&model)
                    .ok_or_else(|| HighlighterError::ModelNotFound(model.clone()))?;

                if !force && manager.is_model_downloaded(&model_id) {
                    println!("✅ Model '{}' is already downloaded!", model_id);
                    println!("💡 Use --force to re-download");
                    return Ok(());
                }

                if force {
                    let model_dir = config.models_dir().join(&model_id);
                    if model_dir.exists() {
                        tokio::fs::remove_dir_all(&model_dir).await?;
                    }
                    manager = EmbeddingModelManager::new(config.models_dir().clone()).await?;
                }

                match manager.get_model_info(&model_id) {
                    Some(info) => println!("⬇️  Downloading model: {} ({}, {} MB)", model_id, info.repo_id, info.size_mb),
                    None => println!("⬇️  Downloading model: {}", model_id),
                }
                match manager.download_model(&model_id).await {
                    Ok(model_path) => {
                        println!("✅ Model '{}' downloaded successfully!", model_id);
                        println!("📁 Location: {}", model_path.display());
                    }
                    Err(e) => {
                        println!("❌ Failed to download model '{}': {}", model_id, e);
                        return Err(e);
                    }
                }
            }
        },

        Commands::Config { action } => {
            let config_path = config_file.unwrap_or_else(Config::config_path);
            match action {
                Some(ConfigAction::Show) | None => {
                    println!("⚙️  Current Configuration\n");
                    println!("Models Directory: {}", config.models_dir().display());
                    println!("Default Embedding Model: {}", config.models.default_embedding_model);
                    println!("\nExtraction:");
                    println!("  Minimum section words: {}", config.extraction.min_section_words);
                    println!("  Heading font margin: {:.2}pt", config.extraction.heading_font_margin);
                    println!("  Header/footer band: {:.0}%", config.extraction.header_footer_ratio * 100.0);
                    println!("  Per-document budget: {}s", config.extraction.max_document_secs);
                    println!("\nRanking:");
                    println!("  Top K: {}", config.ranking.top_k);
                    println!("  Threshold: {}", config.ranking.threshold);
                    println!("  Refined sentences: {}", config.refinement.max_sentences);
                }

                Some(ConfigAction::Reset) => {
                    println!("🔄 Resetting configuration to defaults...");
                    Config::default().save_to(&config_path)?;
                    println!("✅ Configuration reset successfully!");
                }

                Some(ConfigAction::Path) => {
                    println!("{}", config_path.display());
                }
            }
        }
    }

    Ok(())
}

/// Catalogue ids are downloaded on first use; anything else is passed to
/// model2vec as a local folder or hub repo id
async fn resolve_embedding_model(config: &Config, name: &str) -> Result<PathBuf> {
    let mut manager = EmbeddingModelManager::new(config.models_dir().clone()).await?;
    match manager.resolve_model_id(name) {
        Some(model_id) => manager.ensure_model_available(&model_id).await,
        None => Ok(Model2VecEmbedder::resolve_model_path(config, name)),
    }
}
