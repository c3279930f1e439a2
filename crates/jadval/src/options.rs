//! Extraction settings.
//!
//! [`ExtractOptions`] deserializes from a partial config file: every field
//! has a default, so `subject = "هنر"` alone is a valid configuration.

use serde::{Deserialize, Serialize};

use jadval_core::{ColumnLabels, TextPipeline};
use pdfplumber::{Strategy, TableSettings};

use crate::ocr::OcrOptions;

/// Table detection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStrategy {
    /// Ruled tables: cells bounded by drawn lines and rectangles.
    #[default]
    Lattice,
    /// Borderless tables inferred from text alignment.
    Stream,
}

/// 1-based inclusive range of caption lines taken from below a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterLines {
    pub first: usize,
    pub last: usize,
}

impl Default for FooterLines {
    fn default() -> Self {
        Self { first: 3, last: 5 }
    }
}

/// Everything that controls how a PDF becomes frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Table detection strategy.
    pub strategy: TableStrategy,
    /// Snap tolerance for aligning nearby edges (points).
    pub snap_tolerance: f64,
    /// Join tolerance for merging collinear edges (points).
    pub join_tolerance: f64,
    /// Tolerance for assigning characters to cells (points).
    pub text_tolerance: f64,
    /// Height of the band above a table scanned for title lines (points).
    pub header_height: f64,
    /// Height of the band below a table scanned for footer lines (points).
    pub footer_height: f64,
    /// Which footer lines to keep.
    pub footer_lines: FooterLines,
    /// Separator between kept footer lines.
    pub footer_separator: String,
    /// Reordering and normalization applied to every extracted string.
    pub text: TextPipeline,
    /// Value of the subject column.
    pub subject: String,
    /// Metadata column headers.
    pub labels: ColumnLabels,
    /// Scanned-page handling.
    pub ocr: OcrOptions,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            strategy: TableStrategy::Lattice,
            snap_tolerance: 3.0,
            join_tolerance: 3.0,
            text_tolerance: 3.0,
            header_height: 60.0,
            footer_height: 70.0,
            footer_lines: FooterLines::default(),
            footer_separator: "\n".to_string(),
            text: TextPipeline::default(),
            subject: String::new(),
            labels: ColumnLabels::default(),
            ocr: OcrOptions::default(),
        }
    }
}

impl ExtractOptions {
    /// Table settings for `pdfplumber`.
    pub fn table_settings(&self) -> TableSettings {
        let strategy = match self.strategy {
            TableStrategy::Lattice => Strategy::Lattice,
            TableStrategy::Stream => Strategy::Stream,
        };

        TableSettings {
            strategy,
            snap_tolerance: self.snap_tolerance,
            snap_x_tolerance: self.snap_tolerance,
            snap_y_tolerance: self.snap_tolerance,
            join_tolerance: self.join_tolerance,
            join_x_tolerance: self.join_tolerance,
            join_y_tolerance: self.join_tolerance,
            text_tolerance: self.text_tolerance,
            text_x_tolerance: self.text_tolerance,
            text_y_tolerance: self.text_tolerance,
            ..TableSettings::default()
        }
    }
}
