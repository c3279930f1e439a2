//! Backend-independent pieces of jadval.
//!
//! This crate holds everything that does not touch a PDF: Persian text
//! repair ([`TextPipeline`]), the [`Frame`] table model, caption line
//! selection and the metadata columns appended to each table.

pub mod caption;
pub mod frame;
pub mod labels;
pub mod persian;

pub use caption::{footer_text, header_lines};
pub use frame::{CellValue, Frame};
pub use labels::{ColumnLabels, TableContext, annotate};
pub use persian::{DigitStyle, PersianNormalizer, TextOrder, TextPipeline, contains_rtl, fix_order};
