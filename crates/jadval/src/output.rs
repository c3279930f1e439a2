//! Spreadsheet, CSV and JSON writers for [`Frame`]s.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};
use serde::{Deserialize, Serialize};

use jadval_core::{CellValue, Frame};

use crate::error::{Error, Result};

/// Excel's column limit per worksheet.
const MAX_XLSX_COLUMNS: usize = 16_384;

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Excel workbook.
    #[default]
    Xlsx,
    /// Comma-separated values.
    Csv,
    /// Array of JSON records.
    Json,
}

impl OutputFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

/// How extracted pages map to output files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitMode {
    /// One file per page that has tables: `<stem>_page_<n>.<ext>`.
    #[default]
    Page,
    /// One file per PDF with all pages stacked: `<stem>.<ext>`.
    Document,
}

/// Writer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriteOptions {
    /// Display worksheets right to left.
    pub right_to_left: bool,
    /// Worksheet name.
    pub sheet_name: String,
    /// Prefix CSV files with a UTF-8 byte order mark so Excel detects the encoding.
    pub csv_bom: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            right_to_left: true,
            sheet_name: "Sheet1".to_string(),
            csv_bom: true,
        }
    }
}

/// File name for a document's output.
///
/// `page` is 1-based; `None` names the whole-document file.
pub fn output_file_name(stem: &str, page: Option<usize>, format: OutputFormat) -> String {
    match page {
        Some(page) => format!("{stem}_page_{page}.{}", format.extension()),
        None => format!("{stem}.{}", format.extension()),
    }
}

/// Write `frame` to `path` in `format`.
pub fn write_frame(
    frame: &Frame,
    path: &Path,
    format: OutputFormat,
    options: &WriteOptions,
) -> Result<()> {
    match format {
        OutputFormat::Xlsx => write_xlsx(frame, path, options),
        OutputFormat::Csv => write_csv(frame, path, options),
        OutputFormat::Json => write_json(frame, path),
    }
}

fn write_xlsx(frame: &Frame, path: &Path, options: &WriteOptions) -> Result<()> {
    if frame.width() > MAX_XLSX_COLUMNS {
        return Err(Error::TooManyColumns(frame.width()));
    }

    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(options.sheet_name.as_str())?;
    sheet.set_right_to_left(options.right_to_left);
    sheet.set_freeze_panes(1, 0)?;

    for (col, label) in frame.columns().iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, label, &header)?;
    }

    for (r, row) in frame.rows().iter().enumerate() {
        let row_idx = r as u32 + 1;
        for (col, cell) in row.iter().enumerate() {
            let col = col as u16;
            match cell {
                CellValue::Empty => {}
                CellValue::Text(text) => {
                    sheet.write_string(row_idx, col, text)?;
                }
                CellValue::Integer(n) => {
                    sheet.write_number(row_idx, col, *n as f64)?;
                }
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

fn write_csv(frame: &Frame, path: &Path, options: &WriteOptions) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    if options.csv_bom {
        file.write_all("\u{FEFF}".as_bytes())?;
    }

    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(frame.columns())?;
    for row in frame.rows() {
        writer.write_record(row.iter().map(CellValue::to_display))?;
    }
    writer.flush()?;
    Ok(())
}

fn write_json(frame: &Frame, path: &Path) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut file, frame)?;
    file.write_all(b"\n")?;
    file.flush()?;
    Ok(())
}
