//! Metadata columns appended to every extracted table.

use serde::{Deserialize, Serialize};

use crate::frame::{CellValue, Frame};

/// Header labels for the metadata columns.
///
/// Defaults are the Persian headers used by the downstream spreadsheets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnLabels {
    /// 1-based page number ("page number").
    pub page: String,
    /// 1-based row number within the table ("row").
    pub row: String,
    /// Subject / field-of-study label ("high-school field").
    pub subject: String,
    /// First line above the table ("table title").
    pub title: String,
    /// Second line above the table ("second title").
    pub subtitle: String,
    /// Lines three to five below the table.
    pub footer: String,
}

impl Default for ColumnLabels {
    fn default() -> Self {
        Self {
            page: "شماره صفحه".to_string(),
            row: "ردیف".to_string(),
            subject: "رشته دبیرستان".to_string(),
            title: "عنوان جدول".to_string(),
            subtitle: "عنوان دوم".to_string(),
            footer: "خط سوم تا پنجم پایین جدول".to_string(),
        }
    }
}

/// Where a table came from and the captions found around it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableContext {
    /// 1-based page number.
    pub page_number: usize,
    pub subject: String,
    pub title: String,
    pub subtitle: String,
    pub footer: String,
}

/// Append the metadata columns to `frame`.
///
/// Column order: page, row, subject, title, subtitle, footer.
pub fn annotate(mut frame: Frame, ctx: &TableContext, labels: &ColumnLabels) -> Frame {
    frame.push_constant(&labels.page, CellValue::Integer(ctx.page_number as i64));
    frame.push_row_numbers(&labels.row);
    frame.push_constant(&labels.subject, text_or_empty(&ctx.subject));
    frame.push_constant(&labels.title, text_or_empty(&ctx.title));
    frame.push_constant(&labels.subtitle, text_or_empty(&ctx.subtitle));
    frame.push_constant(&labels.footer, text_or_empty(&ctx.footer));
    frame
}

fn text_or_empty(s: &str) -> CellValue {
    if s.is_empty() {
        CellValue::Empty
    } else {
        CellValue::Text(s.to_string())
    }
}
