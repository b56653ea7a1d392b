//! Directory scanner for discovering URL and caption text files

use crate::error::{Error, Result};
use crate::reader::{extract_identifier, SourceFile};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Result of scanning a directory
#[derive(Debug, Clone)]
pub struct ScanResult {
    /// Directory that was scanned
    pub root: PathBuf,
    /// Discovered text files, sorted by path
    pub files: Vec<SourceFile>,
}

impl ScanResult {
    /// Get the number of files found
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Identifiers of the discovered files, in scan order
    pub fn identifiers(&self) -> Vec<String> {
        self.files.iter().map(SourceFile::identifier).collect()
    }

    pub fn into_files(self) -> Vec<SourceFile> {
        self.files
    }
}

/// Scan a directory (recursively) for `.txt` files
pub fn scan_directory<P: AsRef<Path>>(root: P) -> Result<ScanResult> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(Error::FileRead {
            path: root.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
        });
    }

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if is_text_file(path) {
            paths.push(path.to_path_buf());
        }
    }

    // Deterministic processing order, so identifier collisions resolve the same way every run
    paths.sort();

    let files: Vec<SourceFile> = paths.iter().map(SourceFile::from_path).collect();
    for file in &files {
        debug!(file = %file.name, identifier = %extract_identifier(&file.name), "found text file");
    }

    Ok(ScanResult {
        root: root.to_path_buf(),
        files,
    })
}

fn is_text_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
}
