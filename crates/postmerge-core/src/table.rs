//! Core table types for merged post data

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Literal value used when a row has no URL or caption file
pub const PLACEHOLDER: &str = "-";

/// Identifier -> trimmed file content, one per file set
pub type SourceMapping = BTreeMap<String, String>;

/// One merged record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// Join key derived from the filename
    pub identifier: String,
    /// URL file content, or the placeholder
    pub url: String,
    /// Caption file content, or the placeholder
    pub caption: String,
}

impl Row {
    /// Create a new row
    pub fn new(
        identifier: impl Into<String>,
        url: impl Into<String>,
        caption: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            url: url.into(),
            caption: caption.into(),
        }
    }

    /// Whether a URL file existed for this identifier
    pub fn has_url(&self) -> bool {
        self.url != PLACEHOLDER
    }

    /// Whether a caption file existed for this identifier
    pub fn has_caption(&self) -> bool {
        self.caption != PLACEHOLDER
    }

    /// Cell values in column order
    pub fn fields(&self) -> [&str; 3] {
        [&self.identifier, &self.url, &self.caption]
    }
}

/// The ordered result of one merge run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    /// Rows sorted ascending by identifier
    pub rows: Vec<Row>,
}

impl Table {
    /// Column names, in export order
    pub const COLUMNS: [&'static str; 3] = ["identifier", "url", "caption"];

    /// Create a table from rows, sorting them by identifier
    pub fn from_rows(mut rows: Vec<Row>) -> Self {
        rows.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        Self { rows }
    }

    /// Get the number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Find a row by identifier
    pub fn find_row(&self, identifier: &str) -> Option<&Row> {
        self.rows
            .binary_search_by(|r| r.identifier.as_str().cmp(identifier))
            .ok()
            .map(|i| &self.rows[i])
    }

    /// Iterate over rows in order
    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_sorts() {
        let table = Table::from_rows(vec![
            Row::new("b", "u2", "-"),
            Row::new("a", "u1", "-"),
        ]);
        assert_eq!(table.rows[0].identifier, "a");
        assert_eq!(table.rows[1].identifier, "b");
    }

    #[test]
    fn test_find_row() {
        let table = Table::from_rows(vec![
            Row::new("2024-01-02", "http://b", "-"),
            Row::new("2024-01-01", "http://a", "Hello"),
        ]);
        assert_eq!(table.find_row("2024-01-01").unwrap().caption, "Hello");
        assert!(table.find_row("2024-01-03").is_none());
    }

    #[test]
    fn test_placeholder_flags() {
        let row = Row::new("x", PLACEHOLDER, "caption");
        assert!(!row.has_url());
        assert!(row.has_caption());
    }

    #[test]
    fn test_serializes_as_row_array() {
        let table = Table::from_rows(vec![Row::new("a", "u", "c")]);
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"[{"identifier":"a","url":"u","caption":"c"}]"#);
    }
}
