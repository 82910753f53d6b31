// Page math for the movie grid (pages are 1-based)

use crate::error::{LibraryError, Result};

pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Reject pages outside 1..=total_pages. An empty library still has page 1.
pub fn check_page(page: usize, total_pages: usize) -> Result<()> {
    let last = total_pages.max(1);
    if page == 0 || page > last {
        return Err(LibraryError::InvalidInput(format!(
            "page {} is out of range (1-{})",
            page, last
        )));
    }
    Ok(())
}

pub fn page<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}
