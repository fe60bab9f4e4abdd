//! FILENAME: core/table-engine/src/pagination.rs
//! PURPOSE: Slices a logical sequence into fixed-size pages.
//! CONTEXT: A page size of 0, or one at least as large as the sequence,
//! means "show all": one page, no division.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// 0-based page, clamped into range.
    pub page: usize,
    pub page_size: usize,
    pub total_rows: usize,
    pub total_pages: usize,
    /// First row of the page (inclusive).
    pub start: usize,
    /// End of the page (exclusive).
    pub end: usize,
}

impl PageInfo {
    pub fn compute(total_rows: usize, page: usize, page_size: usize) -> Self {
        if page_size == 0 || page_size >= total_rows {
            return PageInfo {
                page: 0,
                page_size,
                total_rows,
                total_pages: 1,
                start: 0,
                end: total_rows,
            };
        }
        let total_pages = total_rows.div_ceil(page_size);
        let page = page.min(total_pages - 1);
        let start = page * page_size;
        PageInfo {
            page,
            page_size,
            total_rows,
            total_pages,
            start,
            end: (start + page_size).min(total_rows),
        }
    }

    pub fn is_paginated(&self) -> bool {
        self.total_pages > 1
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, row: usize) -> bool {
        row >= self.start && row < self.end
    }

    /// Page holding `row` under the same page size.
    pub fn page_of(&self, row: usize) -> usize {
        if self.page_size == 0 {
            0
        } else {
            (row / self.page_size).min(self.total_pages - 1)
        }
    }
}

impl Default for PageInfo {
    fn default() -> Self {
        PageInfo::compute(0, 0, 0)
    }
}

/// Returns the page's slice of `items` together with its page info.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> (&[T], PageInfo) {
    let info = PageInfo::compute(items.len(), page, page_size);
    (&items[info.start..info.end], info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_page_size_shows_all() {
        let items: Vec<u32> = (0..7).collect();
        let (slice, info) = paginate(&items, 3, 0);
        assert_eq!(slice.len(), 7);
        assert_eq!(info.total_pages, 1);
        assert_eq!(info.page, 0);
    }

    #[test]
    fn oversized_page_shows_all() {
        let items = [1, 2, 3];
        let (slice, info) = paginate(&items, 0, 10);
        assert_eq!(slice, &[1, 2, 3]);
        assert_eq!(info.total_pages, 1);
    }

    #[test]
    fn pages_are_sliced() {
        let items: Vec<u32> = (0..10).collect();
        let (slice, info) = paginate(&items, 1, 4);
        assert_eq!(slice, &[4, 5, 6, 7]);
        assert_eq!(info.total_pages, 3);
        let (last, info) = paginate(&items, 2, 4);
        assert_eq!(last, &[8, 9]);
        assert_eq!((info.start, info.end), (8, 10));
    }

    #[test]
    fn page_past_the_end_is_clamped() {
        let items: Vec<u32> = (0..10).collect();
        let (slice, info) = paginate(&items, 99, 4);
        assert_eq!(info.page, 2);
        assert_eq!(slice, &[8, 9]);
    }

    #[test]
    fn empty_input_has_one_empty_page() {
        let items: Vec<u32> = Vec::new();
        let (slice, info) = paginate(&items, 0, 5);
        assert!(slice.is_empty());
        assert_eq!(info.total_pages, 1);
    }

    #[test]
    fn page_of_row() {
        let info = PageInfo::compute(10, 0, 4);
        assert_eq!(info.page_of(5), 1);
        assert_eq!(info.page_of(9), 2);
        assert!(info.contains(3));
        assert!(!info.contains(4));
    }
}
