//! Export options, loadable from a JSON file

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Settings for the spreadsheet export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Name of the single worksheet
    pub sheet_name: String,
    /// Prefix of generated export file names
    pub file_prefix: String,
    /// Column widths in characters: identifier, url, caption
    pub column_widths: [f64; 3],
    /// Write a header row with the column names
    pub header: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            sheet_name: "Postingan".to_string(),
            file_prefix: "postingan".to_string(),
            column_widths: [20.0, 50.0, 80.0],
            header: true,
        }
    }
}

impl ExportOptions {
    /// Load options from JSON; missing fields take their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| Error::FileRead {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(Error::Json)
    }

    /// Save options as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
