//! Input discovery and the file-by-file driver.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::extract::{DocumentTables, Extractor, Progress};
use crate::output::{OutputFormat, SplitMode, WriteOptions, output_file_name, write_frame};

/// Where and how output files are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPlan {
    pub dir: PathBuf,
    pub format: OutputFormat,
    pub split: SplitMode,
    pub write: WriteOptions,
}

impl OutputPlan {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            format: OutputFormat::default(),
            split: SplitMode::default(),
            write: WriteOptions::default(),
        }
    }
}

/// Outcome of one processed PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub pages_scanned: usize,
    pub tables_found: usize,
    pub written: Vec<PathBuf>,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
    pub failures: Vec<(PathBuf, Error)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn files_written(&self) -> usize {
        self.files.iter().map(|f| f.written.len()).sum()
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Expand an input path into PDF files.
///
/// A file is returned as given. A directory yields its `.pdf` files (any
/// extension case) sorted by path; subdirectories are searched only when
/// `recursive` is set.
pub fn collect_pdfs(input: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if !input.exists() {
        return Err(Error::InputNotFound(input.to_path_buf()));
    }
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    let walker = WalkDir::new(input)
        .min_depth(1)
        .max_depth(if recursive { usize::MAX } else { 1 })
        .sort_by_file_name();

    let mut pdfs = Vec::new();
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && is_pdf(entry.path()) {
            pdfs.push(entry.into_path());
        }
    }

    if pdfs.is_empty() {
        return Err(Error::NoPdfFiles(input.to_path_buf()));
    }
    Ok(pdfs)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}

/// Output file stems for a list of PDFs, one per path, unique ignoring case.
///
/// A PDF keeps its own stem unless another PDF shares it; then the parent
/// directory name is prefixed (`1394/report.pdf` becomes `1394_report`).
/// Stems that still collide get a `_2`, `_3`, ... suffix in input order.
pub fn output_stems(pdfs: &[PathBuf]) -> Vec<String> {
    let base: Vec<String> = pdfs.iter().map(|p| file_stem(p)).collect();
    let shared = |stem: &str| {
        base.iter()
            .filter(|other| other.to_lowercase() == stem.to_lowercase())
            .count()
            > 1
    };

    let mut used = HashSet::new();
    pdfs.iter()
        .zip(&base)
        .map(|(path, stem)| {
            let dir = path.parent().and_then(Path::file_name);
            let stem = match dir {
                Some(dir) if shared(stem) => format!("{}_{stem}", dir.to_string_lossy()),
                _ => stem.clone(),
            };
            if used.insert(stem.to_lowercase()) {
                return stem;
            }
            let mut n = 2;
            loop {
                let candidate = format!("{stem}_{n}");
                if used.insert(candidate.to_lowercase()) {
                    return candidate;
                }
                n += 1;
            }
        })
        .collect()
}

/// Write a document's tables according to `plan`, naming files after `stem`.
///
/// Returns the paths written. Nothing is written for a document without
/// tables.
pub fn write_document(doc: &DocumentTables, stem: &str, plan: &OutputPlan) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    match plan.split {
        SplitMode::Page => {
            for page in &doc.pages {
                let path = plan
                    .dir
                    .join(output_file_name(stem, Some(page.page_number), plan.format));
                write_frame(&page.frame, &path, plan.format, &plan.write)?;
                tracing::info!(path = %path.display(), rows = page.frame.height(), "saved");
                written.push(path);
            }
        }
        SplitMode::Document => {
            if !doc.pages.is_empty() {
                let frame = doc.combined();
                let path = plan.dir.join(output_file_name(stem, None, plan.format));
                write_frame(&frame, &path, plan.format, &plan.write)?;
                tracing::info!(path = %path.display(), rows = frame.height(), "saved");
                written.push(path);
            }
        }
    }
    Ok(written)
}

/// Extract and write one PDF, naming output files after its file stem.
pub fn process_pdf(
    extractor: &Extractor,
    path: &Path,
    pages: Option<&str>,
    plan: &OutputPlan,
    progress: &mut dyn Progress,
) -> Result<FileReport> {
    process_pdf_as(extractor, path, &file_stem(path), pages, plan, progress)
}

fn process_pdf_as(
    extractor: &Extractor,
    path: &Path,
    stem: &str,
    pages: Option<&str>,
    plan: &OutputPlan,
    progress: &mut dyn Progress,
) -> Result<FileReport> {
    tracing::info!(file = %path.display(), stem, "processing");
    let doc = extractor.extract_file(path, pages, progress)?;
    fs::create_dir_all(&plan.dir)?;
    let written = write_document(&doc, stem, plan)?;

    if doc.pages.is_empty() {
        tracing::warn!(file = %path.display(), "no tables found");
    }

    Ok(FileReport {
        path: path.to_path_buf(),
        pages_scanned: doc.pages_scanned,
        tables_found: doc.table_count(),
        written,
    })
}

/// Process every PDF reachable from `inputs`.
///
/// Output names come from [`output_stems`], so PDFs with the same name in
/// different directories do not overwrite each other.
/// Input discovery errors abort the run. Errors for individual PDFs are
/// logged and recorded in the report; remaining files are still processed.
pub fn run_batch(
    extractor: &Extractor,
    inputs: &[PathBuf],
    recursive: bool,
    pages: Option<&str>,
    plan: &OutputPlan,
    progress: &mut dyn Progress,
) -> Result<BatchReport> {
    let mut pdfs = Vec::new();
    for input in inputs {
        pdfs.extend(collect_pdfs(input, recursive)?);
    }

    fs::create_dir_all(&plan.dir)?;

    let stems = output_stems(&pdfs);
    let mut report = BatchReport::default();
    for (path, stem) in pdfs.into_iter().zip(stems) {
        match process_pdf_as(extractor, &path, &stem, pages, plan, progress) {
            Ok(file) => report.files.push(file),
            Err(err) => {
                tracing::error!(file = %path.display(), error = %err, "failed");
                report.failures.push((path, err));
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    use jadval_core::Frame;

    use crate::extract::{PageSource, PageTables};

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"not a pdf").unwrap();
    }

    fn doc_with_pages(pages: &[usize]) -> DocumentTables {
        DocumentTables {
            path: PathBuf::from("/in/report.pdf"),
            page_count: 10,
            pages_scanned: 10,
            pages: pages
                .iter()
                .map(|&n| PageTables {
                    page_number: n,
                    table_count: 1,
                    source: PageSource::TextLayer,
                    frame: Frame::from_rows(vec![vec![Some(format!("p{n}"))]]),
                })
                .collect(),
        }
    }

    #[test]
    fn collect_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.pdf");
        touch(&file);
        assert_eq!(collect_pdfs(&file, false).unwrap(), vec![file]);
    }

    #[test]
    fn collect_directory_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("b.pdf"));
        touch(&dir.path().join("a.PDF"));
        touch(&dir.path().join("notes.txt"));
        touch(&dir.path().join("sub/c.pdf"));

        let found = collect_pdfs(dir.path(), false).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.PDF", "b.pdf"]);
    }

    #[test]
    fn collect_recursive_includes_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.pdf"));
        touch(&dir.path().join("sub/c.pdf"));
        assert_eq!(collect_pdfs(dir.path(), true).unwrap().len(), 2);
    }

    #[test]
    fn collect_missing_input() {
        let err = collect_pdfs(Path::new("/nonexistent/jadval-input"), false).unwrap_err();
        assert!(matches!(err, Error::InputNotFound(_)));
    }

    #[test]
    fn collect_directory_without_pdfs() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("notes.txt"));
        let err = collect_pdfs(dir.path(), false).unwrap_err();
        assert!(matches!(err, Error::NoPdfFiles(_)));
    }

    #[test]
    fn write_document_per_page() {
        let out = tempfile::tempdir().unwrap();
        let plan = OutputPlan {
            format: OutputFormat::Csv,
            ..OutputPlan::new(out.path())
        };
        let written = write_document(&doc_with_pages(&[2, 5]), "report", &plan).unwrap();
        assert_eq!(
            written,
            vec![
                out.path().join("report_page_2.csv"),
                out.path().join("report_page_5.csv"),
            ]
        );
        assert!(written.iter().all(|p| p.exists()));
    }

    #[test]
    fn write_document_combined() {
        let out = tempfile::tempdir().unwrap();
        let plan = OutputPlan {
            format: OutputFormat::Json,
            split: SplitMode::Document,
            ..OutputPlan::new(out.path())
        };
        let written = write_document(&doc_with_pages(&[1, 3]), "report", &plan).unwrap();
        assert_eq!(written, vec![out.path().join("report.json")]);

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&written[0]).unwrap()).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
    }

    #[test]
    fn write_document_without_tables_writes_nothing() {
        let out = tempfile::tempdir().unwrap();
        let plan = OutputPlan {
            split: SplitMode::Document,
            ..OutputPlan::new(out.path())
        };
        assert!(write_document(&doc_with_pages(&[]), "report", &plan).unwrap().is_empty());
    }

    #[test]
    fn stems_are_plain_when_unique() {
        let pdfs = vec![PathBuf::from("/in/a.pdf"), PathBuf::from("/in/sub/b.pdf")];
        assert_eq!(output_stems(&pdfs), vec!["a", "b"]);
    }

    #[test]
    fn shared_stems_take_parent_directory() {
        let pdfs = vec![
            PathBuf::from("/in/1394/report.pdf"),
            PathBuf::from("/in/1395/report.pdf"),
            PathBuf::from("/in/1395/summary.pdf"),
        ];
        assert_eq!(
            output_stems(&pdfs),
            vec!["1394_report", "1395_report", "summary"]
        );
    }

    #[test]
    fn remaining_collisions_get_numbered() {
        let pdfs = vec![
            PathBuf::from("/in/report.pdf"),
            PathBuf::from("/in/report.PDF"),
            PathBuf::from("/other/in/Report.pdf"),
        ];
        assert_eq!(output_stems(&pdfs), vec!["in_report", "in_report_2", "in_Report_3"]);
    }

    #[test]
    fn batch_records_failures_and_continues() {
        let input = tempfile::tempdir().unwrap();
        touch(&input.path().join("broken.pdf"));
        let out = tempfile::tempdir().unwrap();

        let extractor = Extractor::new(Default::default());
        let report = run_batch(
            &extractor,
            &[input.path().to_path_buf()],
            false,
            None,
            &OutputPlan::new(out.path()),
            &mut crate::extract::NoProgress,
        )
        .unwrap();

        assert!(!report.is_success());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.files_written(), 0);
    }
}
