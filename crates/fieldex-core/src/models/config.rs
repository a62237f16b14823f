//! Configuration structures for extraction and output rendering.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{FieldexError, Result};

/// Main configuration for fieldex.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldexConfig {
    /// Pattern compilation configuration.
    pub extraction: ExtractionConfig,

    /// Output rendering configuration.
    pub output: OutputConfig,
}

/// Pattern compilation limits passed to the regex engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Approximate size limit, in bytes, of a single compiled pattern.
    pub size_limit: usize,

    /// Approximate size limit, in bytes, of the lazy DFA cache per pattern.
    pub dfa_size_limit: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            size_limit: 10 * (1 << 20),
            dfa_size_limit: 2 * (1 << 20),
        }
    }
}

/// How values are flattened for CSV cells and text reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON output.
    pub pretty_json: bool,

    /// Separator between matches of a field that matched several times.
    pub list_separator: String,

    /// Separator between captures of a multi-group match.
    pub group_separator: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty_json: false,
            list_separator: "; ".to_string(),
            group_separator: "|".to_string(),
        }
    }
}

impl FieldexConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| FieldexError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| FieldexError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
