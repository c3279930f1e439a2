//! Turn PDF pages into annotated [`Frame`]s.
//!
//! Digital pages go through `pdfplumber` table detection; the caption bands
//! above and below each table are read with `within_bbox`. Lattice pages for
//! which `pdfplumber` reports no drawn edges fall back to ruling lines read
//! from the content stream. Scanned pages go through an [`OcrEngine`] when
//! OCR is enabled.

use std::path::{Path, PathBuf};

use pdfplumber::{BBox, Page, Pdf, Table, TableSettings, TextOptions};

use jadval_core::{Frame, TableContext, annotate, footer_text, header_lines};

use crate::error::{Error, Result};
use crate::ocr::{OcrEngine, OcrMode, TesseractOcr, words_to_rows};
use crate::options::{ExtractOptions, TableStrategy};
use crate::pages::resolve_pages;
use crate::ruling::{RulingLines, find_tables_with_edges};

/// How a page's tables were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSource {
    /// Table detection over the PDF text layer.
    TextLayer,
    /// OCR of the rendered page.
    Ocr,
}

/// Tables found on one page, concatenated into a single frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PageTables {
    /// 1-based page number.
    pub page_number: usize,
    /// Number of tables that contributed rows.
    pub table_count: usize,
    pub source: PageSource,
    pub frame: Frame,
}

/// Extraction result for one PDF.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentTables {
    pub path: PathBuf,
    /// Pages in the document.
    pub page_count: usize,
    /// Pages examined (after page selection).
    pub pages_scanned: usize,
    /// Only pages that produced at least one table.
    pub pages: Vec<PageTables>,
}

impl DocumentTables {
    /// Total number of tables across all pages.
    pub fn table_count(&self) -> usize {
        self.pages.iter().map(|p| p.table_count).sum()
    }

    /// All pages stacked into one frame.
    pub fn combined(&self) -> Frame {
        Frame::concat(self.pages.iter().map(|p| p.frame.clone()))
    }
}

/// Receives page-level progress while a document is processed.
pub trait Progress {
    fn start_document(&mut self, _path: &Path, _pages: usize) {}
    /// `current` counts selected pages from 1.
    fn page(&mut self, _current: usize) {}
    fn finish_document(&mut self) {}
}

/// A [`Progress`] that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {}

/// Extracts tables from PDFs according to [`ExtractOptions`].
pub struct Extractor {
    options: ExtractOptions,
    settings: TableSettings,
    ocr: Option<Box<dyn OcrEngine>>,
}

impl Extractor {
    /// Create an extractor. A tesseract-backed OCR engine is attached unless
    /// OCR is off.
    pub fn new(options: ExtractOptions) -> Self {
        let ocr: Option<Box<dyn OcrEngine>> = match options.ocr.mode {
            OcrMode::Off => None,
            OcrMode::Auto | OcrMode::Force => Some(Box::new(TesseractOcr::new(options.ocr.clone()))),
        };
        Self {
            settings: options.table_settings(),
            options,
            ocr,
        }
    }

    /// Replace the OCR engine.
    pub fn with_ocr_engine(mut self, engine: Box<dyn OcrEngine>) -> Self {
        self.ocr = Some(engine);
        self
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract every selected page of the PDF at `path`.
    ///
    /// `pages` is a 1-based range string such as `"1,3-5"`; `None` selects all
    /// pages.
    pub fn extract_file(
        &self,
        path: &Path,
        pages: Option<&str>,
        progress: &mut dyn Progress,
    ) -> Result<DocumentTables> {
        if !path.exists() {
            return Err(Error::InputNotFound(path.to_path_buf()));
        }

        let pdf = Pdf::open_file(path, None)?;
        let page_count = pdf.page_count();
        let indices = resolve_pages(pages, page_count)?;

        let ruling = RulingLines::new(path);
        progress.start_document(path, indices.len());
        let mut found = Vec::new();
        for (i, &idx) in indices.iter().enumerate() {
            progress.page(i + 1);
            let page = pdf.page(idx)?;
            if let Some(tables) = self.extract_page_from(path, &page, idx, &ruling)? {
                tracing::info!(
                    file = %path.display(),
                    page = idx + 1,
                    tables = tables.table_count,
                    rows = tables.frame.height(),
                    "extracted tables"
                );
                found.push(tables);
            }
        }
        progress.finish_document();

        Ok(DocumentTables {
            path: path.to_path_buf(),
            page_count,
            pages_scanned: indices.len(),
            pages: found,
        })
    }

    fn extract_page_from(
        &self,
        path: &Path,
        page: &Page,
        index: usize,
        ruling: &RulingLines<'_>,
    ) -> Result<Option<PageTables>> {
        let page_number = index + 1;
        let use_ocr = match self.options.ocr.mode {
            OcrMode::Off => false,
            OcrMode::Force => true,
            OcrMode::Auto => page.chars().is_empty(),
        };

        if use_ocr {
            if let Some(engine) = &self.ocr {
                return match self.ocr_page(engine.as_ref(), path, index) {
                    Ok(frame) => Ok(frame.map(|frame| PageTables {
                        page_number,
                        table_count: 1,
                        source: PageSource::Ocr,
                        frame,
                    })),
                    Err(err) if self.options.ocr.mode == OcrMode::Auto => {
                        tracing::warn!(page = page_number, error = %err, "OCR failed, skipping page");
                        Ok(None)
                    }
                    Err(err) => Err(err),
                };
            }
        }

        let frames = self.extract_page(page, page_number, Some(ruling));
        if frames.is_empty() {
            tracing::debug!(page = page_number, "no tables on page");
            return Ok(None);
        }
        Ok(Some(PageTables {
            page_number,
            table_count: frames.len(),
            source: PageSource::TextLayer,
            frame: Frame::concat(frames),
        }))
    }

    /// Detect tables on a text-layer page and annotate each with its captions.
    ///
    /// With `ruling`, a lattice page without edges of its own is detected
    /// from the lines its content stream draws. Tables without rows are
    /// skipped.
    pub fn extract_page(
        &self,
        page: &Page,
        page_number: usize,
        ruling: Option<&RulingLines<'_>>,
    ) -> Vec<Frame> {
        let pipeline = &self.options.text;
        let tables = self.find_tables(page, page_number, ruling);
        tracing::debug!(page = page_number, tables = tables.len(), "table detection");

        tables
            .iter()
            .filter(|table| !table.rows.is_empty())
            .map(|table| {
                let rows = table
                    .rows
                    .iter()
                    .map(|row| row.iter().map(|cell| cell.text.clone()).collect())
                    .collect();
                let frame = Frame::from_rows(rows).map_text(|text| pipeline.apply(text));

                let above = header_band(&table.bbox, page.width(), self.options.header_height)
                    .map(|bbox| band_text(page, bbox))
                    .unwrap_or_default();
                let below = footer_band(
                    &table.bbox,
                    page.width(),
                    page.height(),
                    self.options.footer_height,
                )
                .map(|bbox| band_text(page, bbox))
                .unwrap_or_default();

                let (title, subtitle) = header_lines(&above, pipeline);
                let lines = &self.options.footer_lines;
                let footer = footer_text(
                    &below,
                    lines.first..=lines.last,
                    &self.options.footer_separator,
                    pipeline,
                );

                let ctx = TableContext {
                    page_number,
                    subject: self.options.subject.clone(),
                    title,
                    subtitle,
                    footer,
                };
                annotate(frame, &ctx, &self.options.labels)
            })
            .collect()
    }

    fn find_tables(
        &self,
        page: &Page,
        page_number: usize,
        ruling: Option<&RulingLines<'_>>,
    ) -> Vec<Table> {
        if let Some(ruling) = ruling {
            if self.options.strategy == TableStrategy::Lattice && page.edges().is_empty() {
                let edges = ruling.page_edges(page_number, self.options.snap_tolerance);
                if !edges.is_empty() {
                    tracing::debug!(page = page_number, edges = edges.len(), "ruling lines from content stream");
                    return find_tables_with_edges(page, edges, &self.settings);
                }
            }
        }
        page.find_tables(&self.settings)
    }

    fn ocr_page(&self, engine: &dyn OcrEngine, path: &Path, index: usize) -> Result<Option<Frame>> {
        let words = engine.recognize(path, index)?;
        let rows = words_to_rows(&words, self.options.ocr.column_gap);
        if rows.is_empty() {
            return Ok(None);
        }

        // OCR output is already in logical order; only normalize.
        let normalizer = &self.options.text.normalizer;
        let frame = Frame::from_rows(rows).map_text(|text| normalizer.normalize(text));
        let ctx = TableContext {
            page_number: index + 1,
            subject: self.options.subject.clone(),
            ..TableContext::default()
        };
        Ok(Some(annotate(frame, &ctx, &self.options.labels)))
    }
}

fn band_text(page: &Page, bbox: BBox) -> String {
    page.within_bbox(bbox).extract_text(&TextOptions::default())
}

/// Full-width band of `height` points directly above `table`, clipped to the
/// page top. `None` when the table touches the top edge.
pub fn header_band(table: &BBox, page_width: f64, height: f64) -> Option<BBox> {
    let top = (table.top - height).max(0.0);
    (table.top > top).then(|| BBox::new(0.0, top, page_width, table.top))
}

/// Full-width band of `height` points directly below `table`, clipped to the
/// page bottom. `None` when the table touches the bottom edge.
pub fn footer_band(table: &BBox, page_width: f64, page_height: f64, height: f64) -> Option<BBox> {
    let bottom = (table.bottom + height).min(page_height);
    (bottom > table.bottom).then(|| BBox::new(0.0, table.bottom, page_width, bottom))
}
