//! Format-aware loading of rules documents

use std::fmt;
use std::path::Path;

use organize_fs::Error as FsError;

use super::RulesDocument;
use crate::{Error, Result};

/// Serialization format of a rules document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Toml,
    Json,
}

impl Format {
    /// Detect the format from a file extension:
    /// - `.yaml`, `.yml` -> YAML
    /// - `.toml` -> TOML
    /// - `.json` -> JSON
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            _ => Err(Error::UnsupportedFormat { extension }),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Yaml => "YAML",
            Self::Toml => "TOML",
            Self::Json => "JSON",
        })
    }
}

/// Parse a rules document from text.
pub fn parse_document(content: &str, format: Format) -> Result<RulesDocument> {
    parse(content, format).map_err(|message| Error::ConfigParse {
        path: "<inline>".into(),
        format: format.to_string(),
        message,
    })
}

/// Load a rules document, detecting the format from the file extension.
pub fn load_document(path: &Path) -> Result<RulesDocument> {
    let format = Format::from_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|e| FsError::io(path, e))?;
    let document = parse(&content, format).map_err(|message| Error::ConfigParse {
        path: path.to_path_buf(),
        format: format.to_string(),
        message,
    })?;
    tracing::debug!(path = %path.display(), rules = document.rules.len(), "loaded rules document");
    Ok(document)
}

fn parse(content: &str, format: Format) -> std::result::Result<RulesDocument, String> {
    match format {
        Format::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        Format::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        Format::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
    }
}
