//! Processing session: file selections, the current table, and state
//!
//! The session is the boundary where user-facing notices are raised:
//! - processing without both file sets selected
//! - exporting before a table exists
//!
//! A failed run leaves the previous table untouched.

use crate::config::ExportOptions;
use crate::error::{Error, Result, SourceKind};
use crate::export::{export_to_path, ExportFormat};
use crate::merger::merge;
use crate::reader::{read_file_sets, SourceFile};
use crate::table::Table;
use std::path::Path;
use tracing::{error, info, warn};

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing selected
    Idle,
    /// At least one file set selected
    FilesSelected,
    /// Reading and merging
    Processing,
    /// The last run produced a table
    TableReady,
    /// The last run failed
    Failed,
}

#[derive(Debug)]
pub struct Session {
    url_files: Vec<SourceFile>,
    caption_files: Vec<SourceFile>,
    table: Option<Table>,
    state: SessionState,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            url_files: Vec::new(),
            caption_files: Vec::new(),
            table: None,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The table from the last successful run
    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    pub fn url_files(&self) -> &[SourceFile] {
        &self.url_files
    }

    pub fn caption_files(&self) -> &[SourceFile] {
        &self.caption_files
    }

    /// Replace the URL file selection
    pub fn select_urls(&mut self, files: Vec<SourceFile>) {
        self.url_files = files;
        self.after_selection();
    }

    /// Replace the caption file selection
    pub fn select_captions(&mut self, files: Vec<SourceFile>) {
        self.caption_files = files;
        self.after_selection();
    }

    fn after_selection(&mut self) {
        self.state = if self.url_files.is_empty() && self.caption_files.is_empty() {
            SessionState::Idle
        } else {
            SessionState::FilesSelected
        };
    }

    /// Read both selections, merge them, and replace the current table
    pub async fn process(&mut self) -> Result<&Table> {
        if self.url_files.is_empty() {
            warn!("processing requested without URL files");
            return Err(Error::MissingInput(SourceKind::Urls));
        }
        if self.caption_files.is_empty() {
            warn!("processing requested without caption files");
            return Err(Error::MissingInput(SourceKind::Captions));
        }

        self.state = SessionState::Processing;
        info!(
            urls = self.url_files.len(),
            captions = self.caption_files.len(),
            "processing file sets"
        );

        match read_file_sets(&self.url_files, &self.caption_files).await {
            Ok((urls, captions)) => {
                self.state = SessionState::TableReady;
                Ok(self.table.insert(merge(&urls, &captions)))
            }
            Err(e) => {
                error!(error = %e, "failed to process files");
                self.state = SessionState::Failed;
                Err(e)
            }
        }
    }

    /// Export the current table
    pub fn export<P: AsRef<Path>>(
        &self,
        path: P,
        format: ExportFormat,
        options: &ExportOptions,
    ) -> Result<()> {
        match &self.table {
            Some(table) if !table.is_empty() => export_to_path(table, path, format, options),
            _ => {
                warn!("export requested with no data");
                Err(Error::EmptyExport)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Row;
    use tempfile::tempdir;

    fn file(name: &str, content: &str) -> SourceFile {
        SourceFile::from_bytes(name, content)
    }

    #[test]
    fn test_selection_transitions() {
        let mut session = Session::new();
        assert_eq!(session.state(), SessionState::Idle);

        session.select_urls(vec![file("a.txt", "http://a")]);
        assert_eq!(session.state(), SessionState::FilesSelected);

        session.select_urls(Vec::new());
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_process_without_captions_is_rejected() {
        let mut session = Session::new();
        session.select_urls(vec![file("a.txt", "http://a")]);

        let err = session.process().await.unwrap_err();

        assert!(matches!(err, Error::MissingInput(SourceKind::Captions)));
        assert_eq!(session.state(), SessionState::FilesSelected);
        assert!(session.table().is_none());
    }

    #[tokio::test]
    async fn test_process_builds_table() {
        let mut session = Session::new();
        session.select_urls(vec![
            file("2024-01-01.txt", "http://a"),
            file("2024-01-02.txt", "http://b"),
        ]);
        session.select_captions(vec![file("2024-01-01.txt", "Hello\n")]);

        let table = session.process().await.unwrap();

        assert_eq!(
            table.rows,
            vec![
                Row::new("2024-01-01", "http://a", "Hello"),
                Row::new("2024-01-02", "http://b", "-"),
            ]
        );
        assert_eq!(session.state(), SessionState::TableReady);
    }

    #[tokio::test]
    async fn test_failed_run_keeps_previous_table() {
        let mut session = Session::new();
        session.select_urls(vec![file("a.txt", "http://a")]);
        session.select_captions(vec![file("a.txt", "caption")]);
        session.process().await.unwrap();

        session.select_captions(vec![SourceFile::from_bytes("a.txt", vec![0xffu8])]);
        assert!(session.process().await.is_err());

        assert_eq!(session.state(), SessionState::Failed);
        assert_eq!(session.table().unwrap().rows[0].caption, "caption");
    }

    #[test]
    fn test_export_without_table_is_notice() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.xlsx");

        let err = Session::new()
            .export(&path, ExportFormat::Xlsx, &ExportOptions::default())
            .unwrap_err();

        assert!(err.is_notice());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_export_after_process() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let mut session = Session::new();
        session.select_urls(vec![file("a.txt", "http://a")]);
        session.select_captions(vec![file("b.txt", "caption b")]);
        session.process().await.unwrap();
        session
            .export(&path, ExportFormat::Csv, &ExportOptions::default())
            .unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "identifier,url,caption\na,http://a,-\nb,-,caption b\n");
    }
}
