//! File I/O for native CLI

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use calclue_core::{Document, SettingsError, SettingsStore};

/// Load a text file and create a Document
pub fn load_file(path: &Path) -> Result<Document> {
    let canonical = path
        .canonicalize()
        .with_context(|| format!("Failed to resolve path: {}", path.display()))?;

    let content = fs::read_to_string(&canonical)
        .with_context(|| format!("Failed to read file: {}", canonical.display()))?;

    let filepath = canonical.to_string_lossy().to_string();
    let title = canonical
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "Untitled".to_string());

    Ok(Document::with_file_info(title, content, filepath))
}

/// Get the ~/.calclue directory path
pub fn calclue_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not find home directory")?;
    Ok(home.join(".calclue"))
}

/// Settings blob kept in a JSON file on disk
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// ~/.calclue/data.json
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(calclue_dir()?.join("data.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SettingsError {
        SettingsError::Io {
            location: self.path.display().to_string(),
            source,
        }
    }
}

impl SettingsStore for FileStore {
    fn load(&self) -> Result<Option<String>, SettingsError> {
        if !self.path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&self.path)
            .map(Some)
            .map_err(|e| self.io_error(e))
    }

    fn save(&self, blob: &str) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        fs::write(&self.path, blob).map_err(|e| self.io_error(e))
    }
}
