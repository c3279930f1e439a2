//! Page selection from user-facing range strings such as `"1,3-5"`.

use thiserror::Error;

/// Invalid page range input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageRangeError {
    /// A component is not a number.
    #[error("invalid page number: '{0}'")]
    InvalidNumber(String),
    /// Pages are 1-based.
    #[error("page 0 is invalid (pages start at 1)")]
    PageZero,
    /// A page beyond the end of the document.
    #[error("page {page} exceeds document page count ({count})")]
    ExceedsCount { page: usize, count: usize },
    /// A range whose start is after its end.
    #[error("page range {start}-{end} is reversed")]
    Reversed { start: usize, end: usize },
}

/// Parse a 1-based range string into sorted, deduplicated 0-based indices.
pub fn parse_page_range(input: &str, page_count: usize) -> Result<Vec<usize>, PageRangeError> {
    let mut pages = Vec::new();

    for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (start, end) = match part.split_once('-') {
            Some((start, end)) => (parse_page(start, page_count)?, parse_page(end, page_count)?),
            None => {
                let page = parse_page(part, page_count)?;
                (page, page)
            }
        };
        if start > end {
            return Err(PageRangeError::Reversed { start, end });
        }
        pages.extend((start..=end).map(|p| p - 1));
    }

    if pages.is_empty() {
        return Err(PageRangeError::InvalidNumber(input.trim().to_string()));
    }
    pages.sort_unstable();
    pages.dedup();
    Ok(pages)
}

fn parse_page(raw: &str, page_count: usize) -> Result<usize, PageRangeError> {
    let raw = raw.trim();
    let page: usize = raw
        .parse()
        .map_err(|_| PageRangeError::InvalidNumber(raw.to_string()))?;
    if page == 0 {
        return Err(PageRangeError::PageZero);
    }
    if page > page_count {
        return Err(PageRangeError::ExceedsCount {
            page,
            count: page_count,
        });
    }
    Ok(page)
}

/// Resolve an optional range string. `None` selects every page.
pub fn resolve_pages(pages: Option<&str>, page_count: usize) -> Result<Vec<usize>, PageRangeError> {
    match pages {
        Some(range) => parse_page_range(range, page_count),
        None => Ok((0..page_count).collect()),
    }
}
