//! Reading URL and caption file sets into identifier mappings

use crate::error::{Error, Result};
use crate::table::SourceMapping;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Where the content of a selected file comes from
#[derive(Debug, Clone)]
pub enum FileSource {
    /// Read from disk when the set is processed
    Path(PathBuf),
    /// Content already in memory (e.g. handed over by a UI)
    Bytes(Arc<[u8]>),
}

/// A single selected file
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// File name, used to derive the identifier
    pub name: String,
    /// Content location
    pub source: FileSource,
}

impl SourceFile {
    /// A file on disk, named after the last path component
    ///
    /// A path without a file name (e.g. "..") is named after the whole path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let name = match path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => {
                warn!(path = %path.display(), "path has no file name, using the full path");
                path.to_string_lossy().into_owned()
            }
        };
        Self {
            name,
            source: FileSource::Path(path.to_path_buf()),
        }
    }

    /// A file whose content is already loaded
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let bytes: Vec<u8> = bytes.into();
        Self {
            name: name.into(),
            source: FileSource::Bytes(bytes.into()),
        }
    }

    /// Identifier derived from the file name
    pub fn identifier(&self) -> String {
        extract_identifier(&self.name)
    }
}

/// Derive the join key from a file name
///
/// Only the first occurrence of `.txt` is removed, wherever it sits in the
/// name:
/// - "2024-01-01.txt" -> "2024-01-01"
/// - "post.txt.bak" -> "post.bak"
/// - "post.txt.txt" -> "post.txt"
/// - "notes" -> "notes"
pub fn extract_identifier(file_name: &str) -> String {
    file_name.replacen(".txt", "", 1)
}

async fn read_content(file: &SourceFile) -> Result<String> {
    let bytes: Arc<[u8]> = match &file.source {
        FileSource::Path(path) => tokio::fs::read(path)
            .await
            .map_err(|e| Error::FileRead {
                path: path.clone(),
                source: e,
            })?
            .into(),
        FileSource::Bytes(bytes) => Arc::clone(bytes),
    };

    let text = std::str::from_utf8(&bytes).map_err(|e| Error::Decode {
        name: file.name.clone(),
        source: e,
    })?;

    Ok(strip_bom(text).trim().to_string())
}

fn strip_bom(s: &str) -> &str {
    s.strip_prefix('\u{FEFF}').unwrap_or(s)
}

/// Read a file set into an identifier -> trimmed content mapping
///
/// Every file is read on its own task. The call fails as a whole if any
/// read fails; no partial mapping is returned. Entries are applied in input
/// order, so when two files share an identifier the later one wins.
pub async fn read_file_set(files: &[SourceFile]) -> Result<SourceMapping> {
    let mut tasks = JoinSet::new();
    for (index, file) in files.iter().cloned().enumerate() {
        tasks.spawn(async move {
            let content = read_content(&file).await?;
            debug!(file = %file.name, bytes = content.len(), "read file");
            Ok::<_, Error>((index, file.identifier(), content))
        });
    }

    let mut contents: Vec<Option<(String, String)>> = vec![None; files.len()];
    while let Some(joined) = tasks.join_next().await {
        let (index, identifier, content) = joined??;
        contents[index] = Some((identifier, content));
    }

    let mut mapping = SourceMapping::new();
    for (identifier, content) in contents.into_iter().flatten() {
        if mapping.contains_key(&identifier) {
            debug!(%identifier, "identifier seen twice, keeping later file");
        }
        mapping.insert(identifier, content);
    }

    Ok(mapping)
}

/// Read both file sets, returning only once every read in both succeeded
pub async fn read_file_sets(
    urls: &[SourceFile],
    captions: &[SourceFile],
) -> Result<(SourceMapping, SourceMapping)> {
    tokio::try_join!(read_file_set(urls), read_file_set(captions))
}
