use std::path::Path;

use jadval::Extractor;
use jadval::jadval_core::Frame;

use crate::cli::{TableStrategy, TextArgs};
use crate::shared::{ProgressReporter, fail, load_config};

pub fn run(
    file: &Path,
    pages: Option<&str>,
    text: &TextArgs,
    strategy: Option<TableStrategy>,
    config: Option<&Path>,
) -> Result<(), i32> {
    let options = load_config(config)?.into_preview(text, strategy);
    let extractor = Extractor::new(options);
    let doc = extractor
        .extract_file(file, pages, &mut ProgressReporter::new())
        .map_err(fail)?;

    if doc.pages.is_empty() {
        println!("No tables found.");
        return Ok(());
    }

    for page in &doc.pages {
        println!(
            "--- Page {} ({} table(s), {} row(s)) ---",
            page.page_number,
            page.table_count,
            page.frame.height()
        );
        for line in grid_lines(&page.frame) {
            println!("{line}");
        }
        println!();
    }
    Ok(())
}

/// Render a frame as `| a | b |` lines, header first, columns padded to a
/// common width. Multi-line cells are flattened with ` / `.
fn grid_lines(frame: &Frame) -> Vec<String> {
    let mut text_rows: Vec<Vec<String>> = Vec::with_capacity(frame.height() + 1);
    text_rows.push(frame.columns().to_vec());
    text_rows.extend(frame.rows().iter().map(|row| {
        row.iter()
            .map(|cell| cell.to_display().replace('\n', " / "))
            .collect()
    }));

    let mut col_widths = vec![1usize; frame.width()];
    for row in &text_rows {
        for (ci, text) in row.iter().enumerate() {
            if let Some(width) = col_widths.get_mut(ci) {
                *width = (*width).max(text.chars().count());
            }
        }
    }

    text_rows
        .iter()
        .map(|row| {
            let cells: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(ci, text)| {
                    let width = col_widths.get(ci).copied().unwrap_or(1);
                    format!("{text:<width$}")
                })
                .collect();
            format!("| {} |", cells.join(" | "))
        })
        .collect()
}
