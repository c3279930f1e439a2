//! Extract tables from Persian PDF documents into spreadsheet files.
//!
//! The pipeline is linear: open a PDF with `pdfplumber`, detect tables on
//! each selected page (or OCR scanned pages), repair Persian text, append
//! page and caption metadata, and write `.xlsx`, `.csv` or `.json` output.
//!
//! ```no_run
//! use jadval::{Extractor, ExtractOptions, OutputPlan, NoProgress, process_pdf};
//! use std::path::Path;
//!
//! let options = ExtractOptions {
//!     subject: "هنر".to_string(),
//!     ..ExtractOptions::default()
//! };
//! let extractor = Extractor::new(options);
//! let plan = OutputPlan::new("out");
//! let report = process_pdf(&extractor, Path::new("honar.pdf"), None, &plan, &mut NoProgress)?;
//! println!("{} tables", report.tables_found);
//! # Ok::<(), jadval::Error>(())
//! ```

pub mod batch;
pub mod error;
pub mod extract;
pub mod ocr;
pub mod options;
pub mod output;
pub mod pages;
pub mod ruling;

pub use batch::{
    BatchReport, FileReport, OutputPlan, collect_pdfs, output_stems, process_pdf, run_batch,
    write_document,
};
pub use error::{Error, Result};
pub use extract::{DocumentTables, Extractor, NoProgress, PageSource, PageTables, Progress};
pub use ocr::{OcrEngine, OcrMode, OcrOptions, OcrWord, TesseractOcr};
pub use options::{ExtractOptions, FooterLines, TableStrategy};
pub use output::{OutputFormat, SplitMode, WriteOptions, output_file_name, write_frame};
pub use pages::{PageRangeError, parse_page_range, resolve_pages};
pub use ruling::RulingLines;

pub use jadval_core;
