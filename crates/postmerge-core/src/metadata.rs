//! Post metadata files (`*.json`, `*.json.xz`) to URL text files
//!
//! A download folder holds one metadata document per post. Each document that
//! names a shortcode and a date becomes a `{date}_{shortcode}_url.txt` file
//! holding the post URL, ready to be selected as part of a URL file set.

use crate::error::{Error, Result};
use chrono::DateTime;
use serde_json::Value;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;
use xz2::read::XzDecoder;

const JSON_SUFFIX: &str = ".json";
const XZ_SUFFIX: &str = ".json.xz";

/// The two facts needed to name and fill a URL file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostMetadata {
    pub shortcode: String,
    /// Post date as `YYYY-MM-DD`
    pub date: String,
}

impl PostMetadata {
    /// "2024-01-01_Cabc123_url.txt"
    pub fn url_file_name(&self) -> String {
        format!("{}_{}_url.txt", self.date, self.shortcode)
    }

    pub fn url(&self) -> String {
        post_url(&self.shortcode)
    }
}

/// Outcome of an extraction run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractResult {
    /// URL files written, in metadata file order
    pub written: Vec<PathBuf>,
    /// Metadata files that could not be read or lacked a shortcode or date
    pub skipped: usize,
}

impl ExtractResult {
    pub fn url_count(&self) -> usize {
        self.written.len()
    }
}

/// Public URL of a post
pub fn post_url(shortcode: &str) -> String {
    format!("https://www.instagram.com/p/{}/", shortcode)
}

/// Pull the shortcode and date out of a metadata document
///
/// The date comes from `node.taken_at_timestamp` (UTC). Without one, the part
/// of the file stem before the first `_` is used, which matches names like
/// "2024-01-01_12-30-00_UTC". Returns `None` when either fact is missing.
pub fn parse_metadata(data: &Value, stem: &str) -> Option<PostMetadata> {
    let node = data.get("node");

    let shortcode = node
        .and_then(|n| n.get("shortcode"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())?;

    let date = node
        .and_then(|n| n.get("taken_at_timestamp"))
        .and_then(timestamp_date)
        .or_else(|| date_from_stem(stem))?;

    Some(PostMetadata {
        shortcode: shortcode.to_string(),
        date,
    })
}

fn timestamp_date(value: &Value) -> Option<String> {
    let secs = value.as_i64().or_else(|| value.as_f64().map(|f| f as i64))?;
    DateTime::from_timestamp(secs, 0).map(|dt| dt.format("%Y-%m-%d").to_string())
}

fn date_from_stem(stem: &str) -> Option<String> {
    let stem = stem.replace(JSON_SUFFIX, "");
    stem.split_once('_').map(|(date, _)| date.to_string())
}

/// Is this a metadata file, plain or xz-compressed?
pub fn is_metadata_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.ends_with(JSON_SUFFIX) || n.ends_with(XZ_SUFFIX))
        .unwrap_or(false)
}

/// File name with the metadata suffix removed
fn metadata_stem(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.strip_suffix(XZ_SUFFIX)
        .or_else(|| name.strip_suffix(JSON_SUFFIX))
        .unwrap_or(&name)
        .to_string()
}

/// Read and parse one metadata file, decompressing `.xz` files
pub fn read_metadata_file<P: AsRef<Path>>(path: P) -> Result<Value> {
    let path = path.as_ref();
    let read_error = |e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    };

    let mut file = File::open(path).map_err(read_error)?;
    let mut text = String::new();
    let read = if path.extension().is_some_and(|ext| ext == "xz") {
        XzDecoder::new(file).read_to_string(&mut text)
    } else {
        file.read_to_string(&mut text)
    };
    read.map_err(read_error)?;

    serde_json::from_str(&text).map_err(|e| Error::Metadata {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write a URL file for every post described in `dir`
///
/// Only the top level of `dir` is searched. URL files go to `out_dir`, and an
/// existing file of the same name is overwritten. A metadata file that cannot
/// be read or parsed is logged and skipped; it never aborts the run.
pub fn extract_post_urls<P: AsRef<Path>, Q: AsRef<Path>>(
    dir: P,
    out_dir: Q,
) -> Result<ExtractResult> {
    let dir = dir.as_ref();
    let out_dir = out_dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::FileRead {
            path: dir.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
        });
    }

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if entry.file_type().is_file() && is_metadata_file(entry.path()) {
            paths.push(entry.path().to_path_buf());
        }
    }
    paths.sort();

    fs::create_dir_all(out_dir)?;

    let mut result = ExtractResult::default();
    for path in &paths {
        let data = match read_metadata_file(path) {
            Ok(data) => data,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping metadata file");
                result.skipped += 1;
                continue;
            }
        };

        let Some(post) = parse_metadata(&data, &metadata_stem(path)) else {
            debug!(path = %path.display(), "no shortcode or date in metadata");
            result.skipped += 1;
            continue;
        };

        let target = out_dir.join(post.url_file_name());
        fs::write(&target, post.url()).map_err(|e| Error::FileRead {
            path: target.clone(),
            source: e,
        })?;
        debug!(file = %target.display(), shortcode = %post.shortcode, "wrote url file");
        result.written.push(target);
    }

    info!(
        dir = %dir.display(),
        written = result.url_count(),
        skipped = result.skipped,
        "extracted post urls"
    );
    Ok(result)
}
