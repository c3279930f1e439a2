//! Caption lines found in the bands above and below a table.

use std::ops::RangeInclusive;

use crate::persian::TextPipeline;

/// Non-empty, trimmed lines of `text` in top-to-bottom order.
fn content_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// First two non-empty lines of the band above a table.
///
/// Missing lines come back as empty strings.
pub fn header_lines(text: &str, pipeline: &TextPipeline) -> (String, String) {
    let lines = content_lines(text);
    let line = |i: usize| {
        lines
            .get(i)
            .map(|l| pipeline.apply(l))
            .unwrap_or_default()
    };
    (line(0), line(1))
}

/// Selected lines of the band below a table joined by `separator`.
///
/// `lines` is 1-based and counts only non-empty lines; lines that are empty
/// after the pipeline runs are skipped.
pub fn footer_text(
    text: &str,
    lines: RangeInclusive<usize>,
    separator: &str,
    pipeline: &TextPipeline,
) -> String {
    let first = (*lines.start()).max(1);
    let last = *lines.end();
    if last < first {
        return String::new();
    }

    content_lines(text)
        .into_iter()
        .skip(first - 1)
        .take(last - first + 1)
        .map(|line| pipeline.apply(line))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}
