//! Input manager for resolving the documents of a run

use crate::error::{HighlighterError, Result};
use crate::input::file_detector::FileType;
use log::{info, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub struct InputManager {
    recursive: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self { recursive: false }
    }

    pub fn with_recursion(mut self, enable: bool) -> Self {
        self.recursive = enable;
        self
    }

    /// Expand files and directories into an ordered, de-duplicated PDF list.
    ///
    /// Directories contribute their PDFs in file-name order. Explicit files keep
    /// the caller's order; a missing file is kept so the run can report it as
    /// skipped, but a file that is clearly not a PDF is rejected up front.
    pub fn resolve_documents(&self, inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut documents = Vec::new();
        let mut seen = HashSet::new();

        for input in inputs {
            if input.is_dir() {
                let found = self.scan_directory(input)?;
                if found.is_empty() {
                    warn!("No PDF files found in {}", input.display());
                }
                for path in found {
                    if seen.insert(path.clone()) {
                        documents.push(path);
                    }
                }
                continue;
            }

            if FileType::from_path(input) != FileType::Pdf {
                return Err(HighlighterError::UnsupportedFormat(format!(
                    "Not a PDF file: {}",
                    input.display()
                )));
            }
            if !input.exists() {
                warn!("Input does not exist and will be skipped: {}", input.display());
            }
            if seen.insert(input.clone()) {
                documents.push(input.clone());
            }
        }

        if documents.is_empty() {
            return Err(HighlighterError::InvalidInput("No PDF documents to analyze".to_string()));
        }

        info!("Resolved {} document(s)", documents.len());
        Ok(documents)
    }

    fn scan_directory(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .collect();
        entries.sort();

        let mut found = Vec::new();
        for path in entries {
            if path.is_dir() {
                if self.recursive {
                    found.extend(self.scan_directory(&path)?);
                }
            } else if FileType::from_path(&path) == FileType::Pdf {
                found.push(path);
            }
        }
        Ok(found)
    }
}
