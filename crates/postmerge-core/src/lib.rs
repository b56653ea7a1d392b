//! postmerge-core: Core library for pairing post URL and caption files
//!
//! This library provides functionality to:
//! - Extract post URL files from downloaded post metadata
//! - Scan directories for `.txt` URL and caption files
//! - Read file sets into identifier-keyed mappings
//! - Merge the two mappings into one table ordered by identifier
//! - Render the table as text or HTML
//! - Export the table to xlsx, CSV or JSON

pub mod config;
pub mod error;
pub mod export;
pub mod merger;
pub mod metadata;
pub mod reader;
pub mod render;
pub mod scanner;
pub mod session;
pub mod table;

pub use config::ExportOptions;
pub use error::{Error, Result, SourceKind};
pub use export::{
    default_file_name, export_csv, export_file_name, export_json, export_to_path, export_xlsx,
    workbook_bytes, ExportFormat,
};
pub use merger::{merge, MergeStats};
pub use metadata::{
    extract_post_urls, parse_metadata, post_url, read_metadata_file, ExtractResult, PostMetadata,
};
pub use reader::{extract_identifier, read_file_set, read_file_sets, FileSource, SourceFile};
pub use render::{render_html, render_text};
pub use scanner::{scan_directory, ScanResult};
pub use session::{Session, SessionState};
pub use table::{Row, SourceMapping, Table, PLACEHOLDER};
