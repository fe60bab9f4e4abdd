//! FILENAME: core/table-engine/src/selection.rs
//! PURPOSE: Row and cell-range selection over the processed view.
//! CONTEXT: Positions are view rows (indices into the flattened processed
//! view) plus column ids. Ranges resolve column ids to positions through a
//! cached `ColumnIndex` that is rebuilt only when the column order changes.
//!
//! SELECT ALL:
//! Above `select_all_threshold` rows, "select all" sets the all-selected
//! marker instead of listing every row. While the marker is set the explicit
//! row set stays empty; ctrl-clicking a row records an exclusion instead.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::column::{Column, ColumnIndex};
use crate::config::DEFAULT_SELECT_ALL_THRESHOLD;
use crate::coord::{CellRange, CellRef};
use crate::{log_debug, log_info};

/// Keys that move the active cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NavKey {
    Up,
    Down,
    Left,
    Right,
    Tab,
    BackTab,
    Home,
    End,
    PageUp,
    PageDown,
    CtrlHome,
    CtrlEnd,
}

/// The rows navigation may reach: `[row_start, row_end)`.
/// With pagination this is the current page, otherwise the whole view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavBounds {
    pub row_start: usize,
    pub row_end: usize,
    /// PageUp/PageDown step.
    pub page_rows: usize,
}

impl NavBounds {
    pub fn new(row_start: usize, row_end: usize, page_rows: usize) -> Self {
        NavBounds { row_start, row_end, page_rows: page_rows.max(1) }
    }

    fn clamp_row(&self, row: isize) -> usize {
        row.clamp(self.row_start as isize, self.row_end as isize - 1) as usize
    }
}

#[derive(Debug, Clone)]
pub struct SelectionModel {
    selected_rows: BTreeSet<usize>,
    all_selected: bool,
    /// Rows deselected while the all-selected marker is set.
    excluded: BTreeSet<usize>,
    ranges: Vec<CellRange>,
    anchor: Option<CellRef>,
    active: Option<CellRef>,
    row_anchor: Option<usize>,
    /// View length as of the last `select_all` / `retain_within`. Bounds the marker.
    view_len: usize,
    columns: ColumnIndex,
    threshold: usize,
}

impl Default for SelectionModel {
    fn default() -> Self {
        SelectionModel::new(DEFAULT_SELECT_ALL_THRESHOLD)
    }
}

impl SelectionModel {
    pub fn new(select_all_threshold: usize) -> Self {
        SelectionModel {
            selected_rows: BTreeSet::new(),
            all_selected: false,
            excluded: BTreeSet::new(),
            ranges: Vec::new(),
            anchor: None,
            active: None,
            row_anchor: None,
            view_len: 0,
            columns: ColumnIndex::default(),
            threshold: select_all_threshold,
        }
    }

    // ========================================================================
    // COLUMN CACHE
    // ========================================================================

    /// Rebuilds the cached column index if the column order changed.
    /// Ranges are re-resolved; anything on a removed column is dropped.
    pub fn sync_columns(&mut self, columns: &[Column]) {
        if self.columns.matches(columns) {
            return;
        }
        self.columns = ColumnIndex::new(columns);
        let index = &self.columns;
        self.ranges = self.ranges.iter().filter_map(|r| r.reindex(index)).collect();
        if self.anchor.as_ref().is_some_and(|c| index.position(&c.column).is_none()) {
            self.anchor = None;
        }
        if self.active.as_ref().is_some_and(|c| index.position(&c.column).is_none()) {
            self.active = None;
        }
        log_debug!("SELECT", "column index rebuilt ({} columns)", index.len());
    }

    pub fn column_index(&self) -> &ColumnIndex {
        &self.columns
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn is_all_selected(&self) -> bool {
        self.all_selected
    }

    /// Explicitly selected rows. Always empty while the all-selected marker is set.
    pub fn explicit_rows(&self) -> &BTreeSet<usize> {
        &self.selected_rows
    }

    pub fn excluded_rows(&self) -> &BTreeSet<usize> {
        &self.excluded
    }

    pub fn ranges(&self) -> &[CellRange] {
        &self.ranges
    }

    pub fn anchor(&self) -> Option<&CellRef> {
        self.anchor.as_ref()
    }

    pub fn active(&self) -> Option<&CellRef> {
        self.active.as_ref()
    }

    pub fn is_row_selected(&self, row: usize) -> bool {
        if self.all_selected {
            row < self.view_len && !self.excluded.contains(&row)
        } else {
            self.selected_rows.contains(&row)
        }
    }

    /// Number of selected rows in a view of `view_len` rows.
    pub fn selected_row_count(&self, view_len: usize) -> usize {
        if self.all_selected {
            view_len - self.excluded.range(..view_len).count()
        } else {
            self.selected_rows.range(..view_len).count()
        }
    }

    /// Materializes the selected rows. Only call this for bounded work such as a copy.
    pub fn selected_rows(&self, view_len: usize) -> Vec<usize> {
        if self.all_selected {
            (0..view_len).filter(|r| !self.excluded.contains(r)).collect()
        } else {
            self.selected_rows.range(..view_len).copied().collect()
        }
    }

    pub fn is_cell_selected(&self, row: usize, column_id: &str) -> bool {
        if self.is_row_selected(row) {
            return true;
        }
        match self.columns.position(column_id) {
            Some(col) => self.ranges.iter().any(|r| r.contains(row, col)),
            None => false,
        }
    }

    pub fn has_selection(&self) -> bool {
        self.all_selected || !self.selected_rows.is_empty() || !self.ranges.is_empty()
    }

    /// The range copy and paste work on: the most recent range, or the active cell.
    pub fn primary_range(&self) -> Option<CellRange> {
        self.ranges
            .last()
            .cloned()
            .or_else(|| self.active.as_ref().and_then(|c| CellRange::single(c, &self.columns)))
    }

    // ========================================================================
    // CELL GESTURES
    // ========================================================================

    /// Plain click: the cell becomes the only selection. Returns false for an unknown column.
    pub fn click_cell(&mut self, cell: CellRef) -> bool {
        let Some(range) = CellRange::single(&cell, &self.columns) else {
            return false;
        };
        self.clear_rows();
        self.ranges = vec![range];
        self.anchor = Some(cell.clone());
        self.active = Some(cell);
        true
    }

    /// Ctrl/Cmd-click: a selected cell is cut out of every range holding it
    /// (larger ranges are split around it); an unselected cell is added as
    /// its own range.
    pub fn ctrl_click_cell(&mut self, cell: CellRef) -> bool {
        let Some(range) = CellRange::single(&cell, &self.columns) else {
            return false;
        };
        let col = range.start_col();
        if self.ranges.iter().any(|r| r.contains(cell.row, col)) {
            let columns = &self.columns;
            self.ranges = self
                .ranges
                .iter()
                .flat_map(|r| r.without_cell(cell.row, col, columns))
                .collect();
        } else {
            self.ranges.push(range);
        }
        self.anchor = Some(cell.clone());
        self.active = Some(cell);
        true
    }

    /// Shift-click: the current range becomes anchor..=cell.
    pub fn shift_click_cell(&mut self, cell: CellRef) -> bool {
        let Some(anchor) = self.anchor.clone() else {
            return self.click_cell(cell);
        };
        let Some(range) = CellRange::new(&anchor, &cell, &self.columns) else {
            return false;
        };
        match self.ranges.last_mut() {
            Some(last) => *last = range,
            None => self.ranges.push(range),
        }
        self.active = Some(cell);
        true
    }

    // ========================================================================
    // ROW GESTURES
    // ========================================================================

    pub fn click_row(&mut self, row: usize) {
        self.clear();
        self.selected_rows.insert(row);
        self.row_anchor = Some(row);
    }

    pub fn ctrl_click_row(&mut self, row: usize) {
        let set = if self.all_selected { &mut self.excluded } else { &mut self.selected_rows };
        if !set.remove(&row) {
            set.insert(row);
        }
        self.row_anchor = Some(row);
    }

    /// Selects anchor..=row, replacing the explicit set (and the marker).
    pub fn shift_click_row(&mut self, row: usize) {
        let anchor = self.row_anchor.unwrap_or(row);
        self.all_selected = false;
        self.excluded.clear();
        self.selected_rows = (anchor.min(row)..=anchor.max(row)).collect();
        self.row_anchor = Some(anchor);
    }

    /// Selects every row of a `view_len` view. Large views set the marker.
    pub fn select_all(&mut self, view_len: usize) {
        self.view_len = view_len;
        self.excluded.clear();
        if view_len > self.threshold {
            self.all_selected = true;
            self.selected_rows.clear();
            log_info!("SELECT", "select all via marker ({} rows > {})", view_len, self.threshold);
        } else {
            self.all_selected = false;
            self.selected_rows = (0..view_len).collect();
        }
        self.ranges.clear();
        if let (Some(first), Some(last)) = (self.columns.id_at(0), self.columns.id_at(self.columns.len().saturating_sub(1))) {
            if view_len > 0 {
                let start = CellRef::new(0, first);
                let end = CellRef::new(view_len - 1, last);
                if let Some(range) = CellRange::new(&start, &end, &self.columns) {
                    self.ranges.push(range);
                }
                self.anchor = Some(start.clone());
                self.active = Some(start);
            }
        }
    }

    pub fn clear(&mut self) {
        self.clear_rows();
        self.ranges.clear();
        self.anchor = None;
        self.active = None;
    }

    fn clear_rows(&mut self) {
        self.selected_rows.clear();
        self.excluded.clear();
        self.all_selected = false;
        self.row_anchor = None;
    }

    /// Drops everything at or past `view_len`. Called after every recompute.
    pub fn retain_within(&mut self, view_len: usize) {
        self.view_len = view_len;
        self.selected_rows.retain(|r| *r < view_len);
        self.excluded.retain(|r| *r < view_len);
        self.ranges = self.ranges.iter().filter_map(|r| r.clamp_rows(view_len)).collect();
        if self.anchor.as_ref().is_some_and(|c| c.row >= view_len) {
            self.anchor = None;
        }
        if self.active.as_ref().is_some_and(|c| c.row >= view_len) {
            self.active = None;
        }
        if self.row_anchor.is_some_and(|r| r >= view_len) {
            self.row_anchor = None;
        }
    }

    // ========================================================================
    // KEYBOARD NAVIGATION
    // ========================================================================

    /// Moves the active cell. With `extend`, the range is recomputed from the
    /// fixed anchor to the new active cell. Returns false when nothing moved.
    pub fn navigate(&mut self, key: NavKey, extend: bool, bounds: NavBounds) -> bool {
        if bounds.row_start >= bounds.row_end || self.columns.is_empty() {
            return false;
        }
        let last_col = self.columns.len() - 1;

        let Some((row, col)) = self.active_position() else {
            let Some(first) = self.columns.id_at(0) else {
                return false;
            };
            return self.click_cell(CellRef::new(bounds.row_start, first));
        };
        let (row, col) = (row.clamp(bounds.row_start, bounds.row_end - 1), col.min(last_col));
        let r = row as isize;
        let page = bounds.page_rows as isize;

        let (next_row, next_col) = match key {
            NavKey::Up => (bounds.clamp_row(r - 1), col),
            NavKey::Down => (bounds.clamp_row(r + 1), col),
            NavKey::Left => (row, col.saturating_sub(1)),
            NavKey::Right => (row, (col + 1).min(last_col)),
            NavKey::Tab => {
                if col < last_col {
                    (row, col + 1)
                } else if row + 1 < bounds.row_end {
                    (row + 1, 0)
                } else {
                    (row, col)
                }
            }
            NavKey::BackTab => {
                if col > 0 {
                    (row, col - 1)
                } else if row > bounds.row_start {
                    (row - 1, last_col)
                } else {
                    (row, col)
                }
            }
            NavKey::Home => (row, 0),
            NavKey::End => (row, last_col),
            NavKey::PageUp => (bounds.clamp_row(r - page), col),
            NavKey::PageDown => (bounds.clamp_row(r + page), col),
            NavKey::CtrlHome => (bounds.row_start, 0),
            NavKey::CtrlEnd => (bounds.row_end - 1, last_col),
        };

        let Some(column) = self.columns.id_at(next_col).map(str::to_string) else {
            return false;
        };
        let target = CellRef::new(next_row, column);
        let extend = extend && !matches!(key, NavKey::Tab | NavKey::BackTab);
        if extend {
            if self.anchor.is_none() {
                self.anchor = self.active.clone();
            }
            self.shift_click_cell(target)
        } else {
            self.click_cell(target)
        }
    }

    fn active_position(&self) -> Option<(usize, usize)> {
        let active = self.active.as_ref()?;
        Some((active.row, self.columns.position(&active.column)?))
    }
}
