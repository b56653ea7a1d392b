//! Merge engine joining URL and caption mappings into one table

use crate::table::{Row, SourceMapping, Table, PLACEHOLDER};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::info;

/// Counts describing how the two mappings lined up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeStats {
    /// Identifiers with both a URL and a caption
    pub matched: usize,
    /// Identifiers with only a URL
    pub url_only: usize,
    /// Identifiers with only a caption
    pub caption_only: usize,
}

impl MergeStats {
    /// Compute stats for a merged table
    ///
    /// A row whose URL and caption both read `"-"` can only come from two
    /// files holding a literal dash, so it counts as matched.
    pub fn of(table: &Table) -> Self {
        table.iter().fold(Self::default(), |mut stats, row| {
            match (row.has_url(), row.has_caption()) {
                (true, true) | (false, false) => stats.matched += 1,
                (true, false) => stats.url_only += 1,
                (false, true) => stats.caption_only += 1,
            }
            stats
        })
    }

    pub fn total(&self) -> usize {
        self.matched + self.url_only + self.caption_only
    }
}

/// Merge two identifier mappings into a table sorted by identifier
///
/// Every identifier present in either mapping yields exactly one row; a side
/// with no entry for it gets the `"-"` placeholder. Ordering is plain
/// lexicographic string comparison, so "10" sorts before "9".
pub fn merge(urls: &SourceMapping, captions: &SourceMapping) -> Table {
    let identifiers: BTreeSet<&String> = urls.keys().chain(captions.keys()).collect();

    let rows: Vec<Row> = identifiers
        .into_iter()
        .map(|identifier| {
            Row::new(
                identifier.as_str(),
                lookup(urls, identifier),
                lookup(captions, identifier),
            )
        })
        .collect();

    let table = Table::from_rows(rows);
    let stats = MergeStats::of(&table);
    info!(
        rows = table.row_count(),
        matched = stats.matched,
        url_only = stats.url_only,
        caption_only = stats.caption_only,
        "merged file sets"
    );

    table
}

fn lookup<'a>(mapping: &'a SourceMapping, identifier: &str) -> &'a str {
    mapping
        .get(identifier)
        .map(String::as_str)
        .unwrap_or(PLACEHOLDER)
}
