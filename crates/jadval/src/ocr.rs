//! OCR for scanned pages.
//!
//! A page is rendered to PNG with `pdftoppm` and recognized with `tesseract`
//! in TSV mode. Words are grouped back into lines and split into cells at
//! wide horizontal gaps. Both tools are consumed as black boxes.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde::{Deserialize, Serialize};

use jadval_core::contains_rtl;

use crate::error::{Error, Result};

/// When OCR replaces text-layer extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrMode {
    /// Never run OCR.
    #[default]
    Off,
    /// OCR pages that have no text layer.
    Auto,
    /// OCR every page.
    Force,
}

/// OCR configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrOptions {
    pub mode: OcrMode,
    /// Tesseract language(s), e.g. `fas` or `fas+eng`.
    pub language: String,
    /// Rendering resolution.
    pub dpi: u32,
    /// Horizontal gap (pixels) that separates two cells on one line.
    pub column_gap: f64,
    /// `pdftoppm` executable.
    pub pdftoppm: PathBuf,
    /// `tesseract` executable.
    pub tesseract: PathBuf,
}

impl Default for OcrOptions {
    fn default() -> Self {
        Self {
            mode: OcrMode::Off,
            language: "fas".to_string(),
            dpi: 300,
            column_gap: 40.0,
            pdftoppm: PathBuf::from("pdftoppm"),
            tesseract: PathBuf::from("tesseract"),
        }
    }
}

/// One recognized word from tesseract's TSV output.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrWord {
    pub block: u32,
    pub paragraph: u32,
    pub line: u32,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub confidence: f32,
    pub text: String,
}

impl OcrWord {
    fn right(&self) -> f64 {
        self.left + self.width
    }

    fn middle(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// Source of recognized words for a page.
pub trait OcrEngine {
    /// Recognize page `page_index` (0-based) of the PDF at `pdf`.
    fn recognize(&self, pdf: &Path, page_index: usize) -> Result<Vec<OcrWord>>;
}

/// [`OcrEngine`] backed by the `pdftoppm` and `tesseract` executables.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    options: OcrOptions,
}

impl TesseractOcr {
    pub fn new(options: OcrOptions) -> Self {
        Self { options }
    }

    fn render(&self, pdf: &Path, page_index: usize, dir: &Path) -> Result<PathBuf> {
        // pdftoppm page numbers are 1-based; -singlefile writes `<prefix>.png`.
        let page_number = (page_index + 1).to_string();
        let prefix = dir.join("page");

        let output = run_tool(
            Command::new(&self.options.pdftoppm)
                .arg("-png")
                .arg("-singlefile")
                .arg("-r")
                .arg(self.options.dpi.to_string())
                .arg("-f")
                .arg(&page_number)
                .arg("-l")
                .arg(&page_number)
                .arg(pdf)
                .arg(&prefix),
            &self.options.pdftoppm,
        )?;
        if !output.status.success() {
            return Err(Error::Ocr(format!(
                "pdftoppm exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let image = prefix.with_extension("png");
        if !image.exists() {
            return Err(Error::Ocr(format!(
                "pdftoppm produced no image at {}",
                image.display()
            )));
        }
        Ok(image)
    }

    fn run_tesseract(&self, image: &Path) -> Result<String> {
        let output = run_tool(
            Command::new(&self.options.tesseract)
                .arg(image)
                .arg("stdout")
                .arg("-l")
                .arg(&self.options.language)
                .arg("--dpi")
                .arg(self.options.dpi.to_string())
                .arg("tsv"),
            &self.options.tesseract,
        )?;
        if !output.status.success() {
            return Err(Error::Ocr(format!(
                "tesseract exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize(&self, pdf: &Path, page_index: usize) -> Result<Vec<OcrWord>> {
        let scratch = tempfile::tempdir()?;
        let image = self.render(pdf, page_index, scratch.path())?;
        tracing::debug!(page = page_index + 1, image = %image.display(), "running tesseract");
        let tsv = self.run_tesseract(&image)?;
        let words = parse_tsv(&tsv);
        tracing::debug!(page = page_index + 1, words = words.len(), "OCR finished");
        Ok(words)
    }
}

fn run_tool(command: &mut Command, tool: &Path) -> Result<Output> {
    command.output().map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            Error::ToolMissing {
                tool: tool.display().to_string(),
            }
        } else {
            Error::Io(e)
        }
    })
}

/// Parse tesseract TSV output into word entries.
///
/// Only level-5 (word) rows with non-blank text are kept. The header row and
/// malformed rows are skipped.
pub fn parse_tsv(tsv: &str) -> Vec<OcrWord> {
    tsv.lines().filter_map(parse_tsv_line).collect()
}

fn parse_tsv_line(line: &str) -> Option<OcrWord> {
    let fields: Vec<&str> = line.splitn(12, '\t').collect();
    if fields.len() < 12 || fields[0].trim() != "5" {
        return None;
    }
    let text = fields[11].trim();
    if text.is_empty() {
        return None;
    }

    Some(OcrWord {
        block: fields[2].trim().parse().ok()?,
        paragraph: fields[3].trim().parse().ok()?,
        line: fields[4].trim().parse().ok()?,
        left: fields[6].trim().parse().ok()?,
        top: fields[7].trim().parse().ok()?,
        width: fields[8].trim().parse().ok()?,
        height: fields[9].trim().parse().ok()?,
        confidence: fields[10].trim().parse().ok()?,
        text: text.to_string(),
    })
}

/// Group OCR words into table rows.
///
/// Tesseract often reports each table cell as its own block, so rows are
/// rebuilt from geometry: a word joins the current row when its vertical
/// middle falls inside the row's band. Rows are ordered top to bottom. A row
/// is split into cells wherever the gap between neighbouring words exceeds
/// `column_gap`. Cells are ordered left to right, like text-layer tables;
/// words inside a right-to-left cell are joined in right-to-left reading
/// order.
pub fn words_to_rows(words: &[OcrWord], column_gap: f64) -> Vec<Vec<Option<String>>> {
    let mut sorted: Vec<&OcrWord> = words.iter().collect();
    sorted.sort_by(|a, b| {
        a.middle()
            .total_cmp(&b.middle())
            .then(a.left.total_cmp(&b.left))
    });

    let mut lines: Vec<Line<'_>> = Vec::new();
    for word in sorted {
        match lines.last_mut() {
            Some(line) if line.accepts(word) => line.push(word),
            _ => lines.push(Line::new(word)),
        }
    }

    lines
        .into_iter()
        .map(|mut line| {
            line.words.sort_by(|a, b| a.left.total_cmp(&b.left));
            split_cells(&line.words, column_gap)
                .into_iter()
                .map(|cell| Some(join_cell(&cell)))
                .collect()
        })
        .collect()
}

/// Words on one visual line and the vertical band they cover.
struct Line<'a> {
    top: f64,
    bottom: f64,
    words: Vec<&'a OcrWord>,
}

impl<'a> Line<'a> {
    fn new(word: &'a OcrWord) -> Self {
        Self {
            top: word.top,
            bottom: word.top + word.height,
            words: vec![word],
        }
    }

    fn accepts(&self, word: &OcrWord) -> bool {
        (self.top..=self.bottom).contains(&word.middle())
    }

    fn push(&mut self, word: &'a OcrWord) {
        self.top = self.top.min(word.top);
        self.bottom = self.bottom.max(word.top + word.height);
        self.words.push(word);
    }
}

fn split_cells<'a>(line: &[&'a OcrWord], column_gap: f64) -> Vec<Vec<&'a OcrWord>> {
    let mut cells: Vec<Vec<&OcrWord>> = Vec::new();
    let mut prev_right: Option<f64> = None;
    for &word in line {
        match (prev_right, cells.last_mut()) {
            (Some(right), Some(cell)) if word.left - right <= column_gap => cell.push(word),
            _ => cells.push(vec![word]),
        }
        prev_right = Some(word.right());
    }
    cells
}

fn join_cell(cell: &[&OcrWord]) -> String {
    let rtl = cell.iter().any(|w| contains_rtl(&w.text));
    let texts: Vec<&str> = if rtl {
        cell.iter().rev().map(|w| w.text.as_str()).collect()
    } else {
        cell.iter().map(|w| w.text.as_str()).collect()
    };
    texts.join(" ")
}
