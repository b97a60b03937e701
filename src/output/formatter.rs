//! Output formatters for highlight reports

use crate::error::{HighlighterError, Result};
use crate::output::report::HighlightReport;
use colored::{Color, Colorize};
use std::path::Path;

pub trait OutputFormatter {
    fn format_report(&self, report: &HighlightReport) -> Result<String>;
}

/// Terminal summary of a run
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// The JSON artifact consumed downstream
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &HighlightReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let (prefix, color) = match level {
            1 => ("█", Color::Blue),
            2 => ("▓", Color::Green),
            _ => ("▒", Color::Yellow),
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_rank_badge(&self, rank: usize) -> String {
        let color = match rank {
            1 => Color::Green,
            2 | 3 => Color::Yellow,
            _ => Color::White,
        };
        let badge = format!("#{}", rank);
        if self.use_colors {
            badge.color(color).bold().to_string()
        } else {
            badge
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &HighlightReport) -> Result<String> {
        let metadata = &report.metadata;
        let mut output = String::new();

        output.push_str(&self.format_header("📑 DOCUMENT HIGHLIGHTS", 1));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}\n",
            metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            metadata.processing_time
        ));
        output.push_str(&format!("Persona: {}\n", self.colorize(&metadata.persona, Color::Cyan)));
        output.push_str(&format!("Job: {}\n", self.colorize(&metadata.job, Color::Cyan)));

        for document in &metadata.documents {
            let highlights: Vec<_> = report.highlights_for(document).collect();
            let skipped = metadata.skipped_documents.iter().find(|s| &s.document == document);

            output.push_str(&self.format_header(document, 2));
            if let Some(skipped) = skipped {
                output.push_str(&format!("{} {}\n", self.colorize("skipped:", Color::Red), skipped.reason));
                continue;
            }
            if let Some(partial) = metadata.partial_documents.iter().find(|p| &p.document == document) {
                output.push_str(&format!(
                    "{} only {} of {} page(s) read: {}\n",
                    self.colorize("partial:", Color::Yellow),
                    partial.pages_read,
                    partial.page_count,
                    partial.reason
                ));
            }
            if highlights.is_empty() {
                output.push_str(&self.colorize("no relevant sections\n", Color::BrightBlack));
                continue;
            }

            for highlight in highlights {
                output.push_str(&format!(
                    "{} {} (page {})\n",
                    self.format_rank_badge(highlight.rank),
                    highlight.title,
                    highlight.page
                ));
                if self.detailed {
                    for sub in &highlight.subsections {
                        output.push_str(&format!("    {}. {}\n", sub.rank, sub.refined_text));
                    }
                } else if let Some(best) = highlight.subsections.first() {
                    output.push_str(&format!("    {}\n", self.colorize(&best.refined_text, Color::BrightBlack)));
                }
            }
        }

        output.push_str(&format!(
            "\n{} highlight(s), {} skipped document(s)\n",
            report.highlights.len(),
            metadata.skipped_documents.len()
        ));
        Ok(output)
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content).map_err(|e| {
        HighlighterError::OutputFormatting(format!("Failed to write {}: {}", file_path.display(), e))
    })?;
    Ok(())
}
