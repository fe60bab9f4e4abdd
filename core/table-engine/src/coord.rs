//! FILENAME: core/table-engine/src/coord.rs
//! PURPOSE: Logical cell addresses and normalized rectangular ranges.
//! CONTEXT: Cells are addressed by (view row, column id). Ranges keep the
//! ids of their corners and cache the resolved column positions so that a
//! membership test is a handful of integer comparisons.

use serde::{Deserialize, Serialize};

use crate::column::ColumnIndex;

/// A cell coordinate: view row index plus column id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRef {
    pub row: usize,
    pub column: String,
}

impl CellRef {
    pub fn new(row: usize, column: impl Into<String>) -> Self {
        CellRef { row, column: column.into() }
    }
}

/// A rectangular range with `start <= end` on both axes.
/// Column order is the column *position* order, not id order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRange {
    pub start: CellRef,
    pub end: CellRef,
    start_col: usize,
    end_col: usize,
}

impl CellRange {
    /// Builds a normalized range from two arbitrary corners.
    /// Returns `None` if either column id is unknown.
    pub fn new(a: &CellRef, b: &CellRef, columns: &ColumnIndex) -> Option<Self> {
        let col_a = columns.position(&a.column)?;
        let col_b = columns.position(&b.column)?;
        let (start_col, end_col) = (col_a.min(col_b), col_a.max(col_b));
        let start = CellRef::new(a.row.min(b.row), columns.id_at(start_col)?);
        let end = CellRef::new(a.row.max(b.row), columns.id_at(end_col)?);
        Some(CellRange { start, end, start_col, end_col })
    }

    pub fn single(cell: &CellRef, columns: &ColumnIndex) -> Option<Self> {
        Self::new(cell, cell, columns)
    }

    /// Re-resolves the cached column positions after a column reorder.
    pub fn reindex(&self, columns: &ColumnIndex) -> Option<Self> {
        Self::new(&self.start, &self.end, columns)
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.start.row && row <= self.end.row && col >= self.start_col && col <= self.end_col
    }

    pub fn start_col(&self) -> usize {
        self.start_col
    }

    pub fn end_col(&self) -> usize {
        self.end_col
    }

    pub fn row_count(&self) -> usize {
        self.end.row - self.start.row + 1
    }

    pub fn col_count(&self) -> usize {
        self.end_col - self.start_col + 1
    }

    /// Splits the range into the rectangles left after removing one cell:
    /// the rows above, the rows below, and the parts of the cell's row on
    /// either side. A range not containing the cell is returned unchanged.
    pub fn without_cell(&self, row: usize, col: usize, columns: &ColumnIndex) -> Vec<CellRange> {
        if !self.contains(row, col) {
            return vec![self.clone()];
        }
        let block = |r0: usize, c0: usize, r1: usize, c1: usize| {
            let a = CellRef::new(r0, columns.id_at(c0)?);
            let b = CellRef::new(r1, columns.id_at(c1)?);
            CellRange::new(&a, &b, columns)
        };
        let (top, bottom) = (self.start.row, self.end.row);
        let (left, right) = (self.start_col, self.end_col);

        let mut pieces = Vec::with_capacity(4);
        if row > top {
            pieces.push(block(top, left, row - 1, right));
        }
        if row < bottom {
            pieces.push(block(row + 1, left, bottom, right));
        }
        if col > left {
            pieces.push(block(row, left, row, col - 1));
        }
        if col < right {
            pieces.push(block(row, col + 1, row, right));
        }
        pieces.into_iter().flatten().collect()
    }

    /// Drops rows at or past `row_limit`. `None` when nothing is left.
    pub fn clamp_rows(&self, row_limit: usize) -> Option<Self> {
        if self.start.row >= row_limit {
            return None;
        }
        let mut clamped = self.clone();
        clamped.end.row = self.end.row.min(row_limit - 1);
        Some(clamped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;

    fn index() -> ColumnIndex {
        ColumnIndex::new(&[Column::new("a"), Column::new("b"), Column::new("c")])
    }

    #[test]
    fn without_cell_punches_a_hole() {
        let idx = index();
        let range = CellRange::new(&CellRef::new(0, "a"), &CellRef::new(2, "c"), &idx).unwrap();
        let pieces = range.without_cell(1, 1, &idx);

        assert_eq!(pieces.len(), 4);
        let covered: usize = pieces.iter().map(|p| p.row_count() * p.col_count()).sum();
        assert_eq!(covered, 8);
        assert!(pieces.iter().all(|p| !p.contains(1, 1)));
        for (row, col) in [(0, 0), (0, 2), (1, 0), (1, 2), (2, 1)] {
            assert!(pieces.iter().any(|p| p.contains(row, col)));
        }
    }

    #[test]
    fn without_cell_of_single_cell_is_empty() {
        let idx = index();
        let range = CellRange::single(&CellRef::new(4, "b"), &idx).unwrap();
        assert!(range.without_cell(4, 1, &idx).is_empty());
        assert_eq!(range.without_cell(3, 1, &idx), vec![range.clone()]);
    }

    #[test]
    fn corners_are_normalized() {
        let idx = index();
        let range = CellRange::new(&CellRef::new(5, "c"), &CellRef::new(2, "a"), &idx).unwrap();
        assert_eq!(range.start, CellRef::new(2, "a"));
        assert_eq!(range.end, CellRef::new(5, "c"));
        assert_eq!(range.row_count(), 4);
        assert_eq!(range.col_count(), 3);
    }

    #[test]
    fn membership_uses_positions() {
        let idx = index();
        let range = CellRange::new(&CellRef::new(1, "b"), &CellRef::new(3, "c"), &idx).unwrap();
        assert!(range.contains(2, 1));
        assert!(!range.contains(2, 0));
        assert!(!range.contains(4, 2));
    }

    #[test]
    fn reindex_follows_column_reorder() {
        let range = CellRange::new(&CellRef::new(0, "a"), &CellRef::new(0, "b"), &index()).unwrap();
        let reordered = ColumnIndex::new(&[Column::new("b"), Column::new("c"), Column::new("a")]);
        let moved = range.reindex(&reordered).unwrap();
        assert_eq!(moved.start_col(), 0);
        assert_eq!(moved.end_col(), 2);
        assert_eq!(moved.start.column, "b");
        assert_eq!(moved.end.column, "a");
    }

    #[test]
    fn unknown_column_yields_none() {
        assert!(CellRange::single(&CellRef::new(0, "zz"), &index()).is_none());
    }

    #[test]
    fn clamp_rows_trims_or_drops() {
        let range = CellRange::new(&CellRef::new(2, "a"), &CellRef::new(8, "a"), &index()).unwrap();
        assert_eq!(range.clamp_rows(5).unwrap().end.row, 4);
        assert!(range.clamp_rows(2).is_none());
    }
}
