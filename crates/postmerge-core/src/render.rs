//! On-screen rendering of a merged table

use crate::table::{Row, Table};

const HEADER_LABELS: [&str; 3] = ["Identifier", "URL", "Caption"];

/// Render a table as column-aligned plain text
///
/// Multi-line captions are flattened onto one line. With a `limit`, only the
/// first rows are shown followed by a count of the rest.
pub fn render_text(table: &Table, limit: Option<usize>) -> String {
    let row_limit = limit.unwrap_or(table.row_count());
    let shown: Vec<[String; 3]> = table
        .iter()
        .take(row_limit)
        .map(|row| row.fields().map(flatten))
        .collect();

    let mut widths = HEADER_LABELS.map(str::len);
    for cells in &shown {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &HEADER_LABELS, &widths);
    let rule_len = widths.iter().sum::<usize>() + 2 * (widths.len() - 1);
    out.push_str(&"-".repeat(rule_len));
    out.push('\n');

    for cells in &shown {
        let cells = [cells[0].as_str(), cells[1].as_str(), cells[2].as_str()];
        push_line(&mut out, &cells, &widths);
    }

    if table.row_count() > row_limit {
        out.push_str(&format!(
            "... ({} more rows)\n",
            table.row_count() - row_limit
        ));
    }

    out
}

fn push_line(out: &mut String, cells: &[&str; 3], widths: &[usize; 3]) {
    let line = format!(
        "{:<w0$}  {:<w1$}  {}",
        cells[0],
        cells[1],
        cells[2],
        w0 = widths[0],
        w1 = widths[1]
    );
    out.push_str(line.trim_end());
    out.push('\n');
}

fn flatten(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Render a table as an HTML `<table>` fragment
///
/// URLs become links opening in a new tab, except the placeholder. Captions
/// keep their line breaks.
pub fn render_html(table: &Table) -> String {
    let mut out = String::new();
    out.push_str("<table>\n<thead>\n<tr>");
    for label in HEADER_LABELS {
        out.push_str(&format!("<th>{}</th>", label));
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");

    for row in table {
        out.push_str(&html_row(row));
    }

    out.push_str("</tbody>\n</table>\n");
    out
}

fn html_row(row: &Row) -> String {
    let url_cell = if row.has_url() {
        let url = escape_html(&row.url);
        format!(
            "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
            url, url
        )
    } else {
        format!("<span class=\"placeholder\">{}</span>", escape_html(&row.url))
    };

    format!(
        "<tr><td>{}</td><td>{}</td><td><div style=\"white-space: pre-wrap\">{}</div></td></tr>\n",
        escape_html(&row.identifier),
        url_cell,
        escape_html(&row.caption)
    )
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
