//! Error type for extraction, OCR and output.
//!
//! Uses [`thiserror`]; library errors from `pdfplumber`, the writers and the
//! filesystem convert into [`Error`] with `?`.

use std::path::PathBuf;

use pdfplumber::PdfError;
use thiserror::Error;

use crate::pages::PageRangeError;

/// Errors raised while turning PDFs into spreadsheet files.
#[derive(Debug, Error)]
pub enum Error {
    /// The input path does not exist.
    #[error("input not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// A directory input contains no PDF files.
    #[error("no PDF files found in {}", .0.display())]
    NoPdfFiles(PathBuf),

    /// The PDF could not be opened or a page could not be read.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// The page range argument is invalid for this document.
    #[error(transparent)]
    PageRange(#[from] PageRangeError),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error while walking an input directory.
    #[error("directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Error writing an `.xlsx` workbook.
    #[error("xlsx error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Error writing a CSV file.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error writing JSON output.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An external OCR tool could not be started.
    #[error("{tool} not found; install it or set its path in the configuration")]
    ToolMissing {
        /// Name or path of the missing executable.
        tool: String,
    },

    /// An external OCR tool ran but failed.
    #[error("OCR failed: {0}")]
    Ocr(String),

    /// A frame is wider than a worksheet allows.
    #[error("table has {0} columns, more than a worksheet can hold")]
    TooManyColumns(usize),
}

/// Result alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_not_found_message_includes_path() {
        let err = Error::InputNotFound(PathBuf::from("/tmp/missing.pdf"));
        assert_eq!(err.to_string(), "input not found: /tmp/missing.pdf");
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn pdf_error_converts() {
        let err: Error = PdfError::ParseError("bad xref".to_string()).into();
        assert!(matches!(err, Error::Pdf(_)));
        assert!(err.to_string().contains("bad xref"));
    }

    #[test]
    fn page_range_error_is_transparent() {
        let err: Error = PageRangeError::PageZero.into();
        assert_eq!(err.to_string(), PageRangeError::PageZero.to_string());
    }

    #[test]
    fn tool_missing_names_tool() {
        let err = Error::ToolMissing {
            tool: "tesseract".to_string(),
        };
        assert!(err.to_string().starts_with("tesseract not found"));
    }
}
