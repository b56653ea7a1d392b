//! Export of merged tables to xlsx, CSV and JSON

use crate::config::ExportOptions;
use crate::error::{Error, Result};
use crate::table::Table;
use chrono::{NaiveDate, Utc};
use rust_xlsxwriter::{Format, FormatAlign, Workbook};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// Supported output formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
    Json,
}

impl ExportFormat {
    /// File extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "xlsx" => Ok(ExportFormat::Xlsx),
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

/// File name for an export made on `date`, e.g. "postingan_2024-01-31.xlsx"
pub fn export_file_name(prefix: &str, format: ExportFormat, date: NaiveDate) -> String {
    format!("{}_{}.{}", prefix, date.format("%Y-%m-%d"), format.extension())
}

/// File name for an export made today (UTC calendar date)
pub fn default_file_name(options: &ExportOptions, format: ExportFormat) -> String {
    export_file_name(&options.file_prefix, format, Utc::now().date_naive())
}

/// Serialize a table into an in-memory xlsx workbook
pub fn workbook_bytes(table: &Table, options: &ExportOptions) -> Result<Vec<u8>> {
    if table.is_empty() {
        return Err(Error::EmptyExport);
    }

    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let caption_format = Format::new().set_text_wrap().set_align(FormatAlign::Top);

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(&options.sheet_name)?;

        for (col, width) in options.column_widths.iter().enumerate() {
            sheet.set_column_width(col as u16, *width)?;
        }

        let mut row_idx: u32 = 0;
        if options.header {
            for (col, name) in Table::COLUMNS.iter().enumerate() {
                sheet.write_string_with_format(row_idx, col as u16, *name, &header_format)?;
            }
            row_idx += 1;
        }

        for row in table {
            sheet.write_string(row_idx, 0, &row.identifier)?;
            sheet.write_string(row_idx, 1, &row.url)?;
            sheet.write_string_with_format(row_idx, 2, &row.caption, &caption_format)?;
            row_idx += 1;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Write a table as an xlsx workbook to `path`
///
/// The workbook is fully serialized before the file is created, so a failed
/// export leaves nothing behind.
pub fn export_xlsx<P: AsRef<Path>>(table: &Table, path: P, options: &ExportOptions) -> Result<()> {
    let bytes = workbook_bytes(table, options)?;
    fs::write(path.as_ref(), bytes)?;
    info!(path = %path.as_ref().display(), rows = table.row_count(), "exported workbook");
    Ok(())
}

/// Write a table as CSV with a header row
pub fn export_csv<W: Write>(table: &Table, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(Table::COLUMNS)?;
    for row in table {
        csv_writer.write_record(row.fields())?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write a table as a pretty-printed JSON array of rows
pub fn export_json<W: Write>(table: &Table, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, table)?;
    writeln!(writer)?;
    Ok(())
}

/// Export a table to `path` in the given format
pub fn export_to_path<P: AsRef<Path>>(
    table: &Table,
    path: P,
    format: ExportFormat,
    options: &ExportOptions,
) -> Result<()> {
    if table.is_empty() {
        return Err(Error::EmptyExport);
    }

    let path = path.as_ref();
    match format {
        ExportFormat::Xlsx => export_xlsx(table, path, options),
        ExportFormat::Csv | ExportFormat::Json => {
            let file = File::create(path)?;
            let mut writer = BufWriter::new(file);
            if format == ExportFormat::Csv {
                export_csv(table, &mut writer)?;
            } else {
                export_json(table, &mut writer)?;
            }
            writer.flush()?;
            info!(path = %path.display(), rows = table.row_count(), ?format, "exported table");
            Ok(())
        }
    }
}
