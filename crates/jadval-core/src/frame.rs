//! A small column-labelled table used between extraction and output.
//!
//! [`Frame`] mirrors the subset of dataframe behaviour the pipeline needs:
//! construction from extracted rows, per-cell text mapping, appending
//! metadata columns, and vertical concatenation with column union.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CellValue {
    /// Missing value (no text in the source cell, or a column absent from a
    /// concatenated frame).
    #[default]
    Empty,
    /// Text content.
    Text(String),
    /// Integer content (page and row numbers).
    Integer(i64),
}

impl CellValue {
    /// Returns the text if this is a `Text` cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true for `Empty`.
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Render the cell as display text. `Empty` renders as an empty string.
    pub fn to_display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Integer(n) => n.to_string(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Integer(n)
    }
}

impl From<Option<String>> for CellValue {
    fn from(s: Option<String>) -> Self {
        match s {
            Some(s) if !s.is_empty() => CellValue::Text(s),
            _ => CellValue::Empty,
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Empty => serializer.serialize_none(),
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Integer(n) => serializer.serialize_i64(*n),
        }
    }
}

/// Rows of [`CellValue`] under an ordered list of column labels.
///
/// Every row has exactly `columns().len()` cells.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Frame {
    /// Build a frame from extracted table rows.
    ///
    /// Columns are labelled `"0"`, `"1"`, ... up to the widest row. Shorter
    /// rows are padded with [`CellValue::Empty`]; `None` and empty strings
    /// become `Empty` as well.
    pub fn from_rows(rows: Vec<Vec<Option<String>>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let columns = (0..width).map(|i| i.to_string()).collect();
        let rows = rows
            .into_iter()
            .map(|row| {
                let mut cells: Vec<CellValue> = row.into_iter().map(CellValue::from).collect();
                cells.resize(width, CellValue::Empty);
                cells
            })
            .collect();
        Self { columns, rows }
    }

    /// Build a frame with explicit labels. Rows are padded or truncated to fit.
    pub fn with_columns(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Column labels in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows.
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// True when the frame has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cells of the column named `label`, top to bottom.
    pub fn column(&self, label: &str) -> Option<Vec<&CellValue>> {
        let idx = self.columns.iter().position(|c| c == label)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }

    /// Apply `f` to every text cell. Results that are empty become `Empty`.
    pub fn map_text<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> String,
    {
        for cell in self.rows.iter_mut().flatten() {
            if let CellValue::Text(text) = cell {
                let mapped = f(text);
                *cell = if mapped.is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::Text(mapped)
                };
            }
        }
        self
    }

    /// Append a column holding `value` in every row.
    ///
    /// Replaces the values of an existing column with the same label.
    pub fn push_constant(&mut self, label: &str, value: CellValue) {
        let idx = self.column_index_or_insert(label);
        for row in &mut self.rows {
            row[idx] = value.clone();
        }
    }

    /// Append a column numbering rows from 1.
    pub fn push_row_numbers(&mut self, label: &str) {
        let idx = self.column_index_or_insert(label);
        for (i, row) in self.rows.iter_mut().enumerate() {
            row[idx] = CellValue::Integer(i as i64 + 1);
        }
    }

    fn column_index_or_insert(&mut self, label: &str) -> usize {
        if let Some(idx) = self.columns.iter().position(|c| c == label) {
            return idx;
        }
        self.columns.push(label.to_string());
        for row in &mut self.rows {
            row.push(CellValue::Empty);
        }
        self.columns.len() - 1
    }

    /// Stack frames vertically.
    ///
    /// The result's columns are the union of all input columns in first-seen
    /// order. Cells for columns a frame lacks are `Empty`.
    pub fn concat<I>(frames: I) -> Frame
    where
        I: IntoIterator<Item = Frame>,
    {
        let frames: Vec<Frame> = frames.into_iter().collect();

        let mut columns: Vec<String> = Vec::new();
        for frame in &frames {
            for label in &frame.columns {
                if !columns.contains(label) {
                    columns.push(label.clone());
                }
            }
        }

        let mut rows = Vec::with_capacity(frames.iter().map(Frame::height).sum());
        for frame in frames {
            let positions: Vec<usize> = frame
                .columns
                .iter()
                .map(|label| columns.iter().position(|c| c == label).unwrap_or(0))
                .collect();
            for row in frame.rows {
                let mut out = vec![CellValue::Empty; columns.len()];
                for (cell, &pos) in row.into_iter().zip(&positions) {
                    out[pos] = cell;
                }
                rows.push(out);
            }
        }

        Frame { columns, rows }
    }
}

impl Serialize for Frame {
    /// Serializes as an array of records keyed by column label.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(&Record {
                columns: &self.columns,
                row,
            })?;
        }
        seq.end()
    }
}

struct Record<'a> {
    columns: &'a [String],
    row: &'a [CellValue],
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (label, cell) in self.columns.iter().zip(self.row) {
            map.serialize_entry(label, cell)?;
        }
        map.end()
    }
}
