//! FILENAME: app/src/state.rs
//! PURPOSE: The single owner of all grid state.
//! CONTEXT: `GridState` holds the raw rows and columns, the filter, sort,
//! grouping and paging inputs, the processed view, the selection and the
//! edit log. Everything changes through its methods (or `dispatch`);
//! subscribers receive immutable snapshots, never references into the state.
//!
//! Recomputes happen eagerly after each change unless a batch is open, in
//! which case the view is rebuilt and subscribers notified once when the
//! outermost batch closes.

use std::sync::Arc;

use group_engine::{all_group_paths, DisplayRow, GroupKey, GroupingModel};
use table_engine::{
    clipboard, log_debug, log_info, log_warn, rows_from_json, serialize_range, CellRef, CellValue, ClipboardBackend, Column,
    ColumnIndex, EditLog, EditRecord, EditTarget, EngineConfig, FilterEntry, FilterModel, MemoryClipboard, NavBounds,
    NavKey, QuickFilter, RowRef, SelectionModel, SortEntry, SortModel, Transaction,
};

use crate::error::GridError;
use crate::snapshot::{GridSnapshot, SubscriptionId, UndoState};
use crate::view::{compute_view, PipelineInput, ProcessedView};

type Subscriber = Box<dyn FnMut(&GridSnapshot) + Send>;

pub struct GridState {
    config: EngineConfig,
    rows: Vec<RowRef>,
    columns: Vec<Column>,
    column_index: ColumnIndex,
    filters: FilterModel,
    quick_filter: QuickFilter,
    sort: SortModel,
    grouping: GroupingModel,
    page: usize,
    page_size: usize,
    selection: SelectionModel,
    edit_log: EditLog,
    view: Arc<ProcessedView>,
    clipboard: Box<dyn ClipboardBackend>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
    revision: u64,
    /// Inputs changed since the last recompute.
    dirty: bool,
    /// Something changed since the last notification.
    pending_notify: bool,
    batch_depth: usize,
}

/// Writes undo/redo values back into the raw rows.
struct RowWriter<'a> {
    rows: &'a mut Vec<RowRef>,
    columns: &'a [Column],
    column_index: &'a ColumnIndex,
}

impl EditTarget for RowWriter<'_> {
    fn write_value(&mut self, row_index: usize, column_id: &str, value: &CellValue) -> bool {
        let Some(column) = self.column_index.position(column_id).and_then(|p| self.columns.get(p)) else {
            return false;
        };
        match self.rows.get_mut(row_index) {
            Some(row) => {
                *row = Arc::new(row.with_value(column.field_key(), value.clone()));
                true
            }
            None => false,
        }
    }
}

impl Default for GridState {
    fn default() -> Self {
        GridState::new(EngineConfig::default())
    }
}

impl GridState {
    pub fn new(config: EngineConfig) -> Self {
        log_info!("PIPELINE", "creating grid state");
        GridState {
            rows: Vec::new(),
            columns: Vec::new(),
            column_index: ColumnIndex::default(),
            filters: FilterModel::new(),
            quick_filter: QuickFilter::default(),
            sort: SortModel::new(),
            grouping: GroupingModel::new(),
            page: 0,
            page_size: config.page_size,
            selection: SelectionModel::new(config.select_all_threshold),
            edit_log: EditLog::with_capacity(config.undo_capacity),
            view: Arc::new(ProcessedView::default()),
            clipboard: Box::new(MemoryClipboard::new()),
            subscribers: Vec::new(),
            next_subscription: 0,
            revision: 0,
            dirty: false,
            pending_notify: false,
            batch_depth: 0,
            config,
        }
    }

    pub fn with_data(config: EngineConfig, columns: Vec<Column>, rows: Vec<RowRef>) -> Self {
        let mut state = GridState::new(config);
        state.batch(|s| {
            s.set_columns(columns);
            s.set_rows(rows);
        });
        state
    }

    pub fn with_clipboard(mut self, clipboard: Box<dyn ClipboardBackend>) -> Self {
        self.clipboard = clipboard;
        self
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn rows(&self) -> &[RowRef] {
        &self.rows
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn view(&self) -> Arc<ProcessedView> {
        Arc::clone(&self.view)
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn edit_log(&self) -> &EditLog {
        &self.edit_log
    }

    pub fn filters(&self) -> &FilterModel {
        &self.filters
    }

    pub fn sort_model(&self) -> &SortModel {
        &self.sort
    }

    pub fn grouping(&self) -> &GroupingModel {
        &self.grouping
    }

    pub fn quick_filter(&self) -> &str {
        self.quick_filter.source()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn column(&self, column_id: &str) -> Result<&Column, GridError> {
        self.column_index
            .position(column_id)
            .and_then(|p| self.columns.get(p))
            .ok_or_else(|| GridError::UnknownColumn(column_id.to_string()))
    }

    pub fn undo_state(&self) -> UndoState {
        UndoState {
            can_undo: self.edit_log.can_undo(),
            can_redo: self.edit_log.can_redo(),
            undo_description: self.edit_log.undo_description().map(String::from),
            redo_description: self.edit_log.redo_description().map(String::from),
        }
    }

    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            view: Arc::clone(&self.view),
            selection: self.selection.clone(),
            undo: self.undo_state(),
            revision: self.revision,
        }
    }

    // ========================================================================
    // CELL QUERIES
    // ========================================================================

    /// Value of a raw row, through the column's getter.
    pub fn value_at(&self, raw_index: usize, column_id: &str) -> Result<CellValue, GridError> {
        let column = self.column(column_id)?;
        let row = self.rows.get(raw_index).ok_or(GridError::RowOutOfRange {
            row: raw_index,
            len: self.rows.len(),
        })?;
        Ok(column.value(row))
    }

    /// Value shown at a view row. Group rows show their key in the grouping
    /// column, their aggregate in aggregated columns and nothing elsewhere.
    pub fn cell_value(&self, view_row: usize, column_id: &str) -> Result<Option<CellValue>, GridError> {
        let column = self.column(column_id)?;
        let display = self.view.row(view_row).ok_or(GridError::RowOutOfRange {
            row: view_row,
            len: self.view.total_len(),
        })?;
        Ok(display_value(&self.rows, display, column))
    }

    // ========================================================================
    // DATA INPUTS
    // ========================================================================

    /// Replaces the rows wholesale. The edit log is kept; entries that point
    /// past the new data become no-ops.
    pub fn set_rows(&mut self, rows: Vec<RowRef>) {
        log_info!("PIPELINE", "set_rows: {} rows", rows.len());
        self.rows = rows;
        self.mark_dirty();
    }

    /// Replaces the rows from a JSON array of objects.
    pub fn load_json(&mut self, value: &serde_json::Value) {
        self.set_rows(rows_from_json(value));
    }

    pub fn set_columns(&mut self, columns: Vec<Column>) {
        log_info!("PIPELINE", "set_columns: {} columns", columns.len());
        if !self.column_index.matches(&columns) {
            self.column_index = ColumnIndex::new(&columns);
        }
        self.columns = columns;
        self.selection.sync_columns(&self.columns);
        self.mark_dirty();
    }

    pub fn set_filter(&mut self, entry: FilterEntry) -> Result<(), GridError> {
        self.column(&entry.column_id)?;
        self.filters.set(entry);
        self.page = 0;
        self.mark_dirty();
        Ok(())
    }

    pub fn remove_filter(&mut self, column_id: &str) {
        if self.filters.remove(column_id).is_some() {
            self.mark_dirty();
        }
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.mark_dirty();
    }

    pub fn set_quick_filter(&mut self, query: &str) {
        if query == self.quick_filter.source() {
            return;
        }
        self.quick_filter = QuickFilter::new(query);
        self.page = 0;
        self.mark_dirty();
    }

    pub fn toggle_sort(&mut self, column_id: &str, multi: bool) -> Result<(), GridError> {
        self.column(column_id)?;
        self.sort.toggle(column_id, multi);
        self.mark_dirty();
        Ok(())
    }

    pub fn set_sort(&mut self, entries: Vec<SortEntry>) {
        self.sort = SortModel::from_entries(entries);
        self.mark_dirty();
    }

    pub fn set_group_by(&mut self, column_ids: Vec<String>) -> Result<(), GridError> {
        if let Some(missing) = column_ids.iter().find(|id| self.column_index.position(id).is_none()) {
            return Err(GridError::UnknownColumn(missing.clone()));
        }
        self.grouping.set_group_by(column_ids);
        self.mark_dirty();
        Ok(())
    }

    pub fn toggle_group(&mut self, path: &[GroupKey]) {
        self.grouping.toggle(path);
        self.mark_dirty();
    }

    /// Toggles the group whose header sits at `view_row`.
    pub fn toggle_group_at(&mut self, view_row: usize) -> Result<(), GridError> {
        self.recompute_if_dirty();
        let path = match self.view.row(view_row) {
            Some(DisplayRow::Group(summary)) => summary.path.clone(),
            _ => return Err(GridError::NotAGroup(view_row)),
        };
        self.toggle_group(&path);
        Ok(())
    }

    pub fn expand_all_groups(&mut self) {
        self.recompute_if_dirty();
        let paths = all_group_paths(
            &self.rows,
            self.view.leaf_order(),
            &self.columns,
            &self.column_index,
            &self.grouping,
        );
        self.grouping.expand_all(paths);
        self.mark_dirty();
    }

    pub fn collapse_all_groups(&mut self) {
        self.grouping.collapse_all();
        self.mark_dirty();
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
        self.mark_dirty();
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size;
        self.page = 0;
        self.mark_dirty();
    }

    // ========================================================================
    // SELECTION
    // ========================================================================

    fn check_cell(&mut self, cell: &CellRef) -> Result<(), GridError> {
        self.column(&cell.column)?;
        self.check_view_row(cell.row)
    }

    /// Gestures address the current view, so a pending recompute runs first.
    fn check_view_row(&mut self, row: usize) -> Result<(), GridError> {
        self.recompute_if_dirty();
        if row >= self.view.total_len() {
            return Err(GridError::RowOutOfRange { row, len: self.view.total_len() });
        }
        Ok(())
    }

    pub fn click_cell(&mut self, cell: CellRef) -> Result<(), GridError> {
        self.check_cell(&cell)?;
        self.selection.click_cell(cell);
        self.mark_changed();
        Ok(())
    }

    pub fn ctrl_click_cell(&mut self, cell: CellRef) -> Result<(), GridError> {
        self.check_cell(&cell)?;
        self.selection.ctrl_click_cell(cell);
        self.mark_changed();
        Ok(())
    }

    pub fn shift_click_cell(&mut self, cell: CellRef) -> Result<(), GridError> {
        self.check_cell(&cell)?;
        self.selection.shift_click_cell(cell);
        self.mark_changed();
        Ok(())
    }

    pub fn click_row(&mut self, row: usize) -> Result<(), GridError> {
        self.check_view_row(row)?;
        self.selection.click_row(row);
        self.mark_changed();
        Ok(())
    }

    pub fn ctrl_click_row(&mut self, row: usize) -> Result<(), GridError> {
        self.check_view_row(row)?;
        self.selection.ctrl_click_row(row);
        self.mark_changed();
        Ok(())
    }

    pub fn shift_click_row(&mut self, row: usize) -> Result<(), GridError> {
        self.check_view_row(row)?;
        self.selection.shift_click_row(row);
        self.mark_changed();
        Ok(())
    }

    pub fn select_all(&mut self) {
        self.recompute_if_dirty();
        self.selection.select_all(self.view.total_len());
        self.mark_changed();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.mark_changed();
    }

    /// Rows the keyboard may reach: the current page, or the whole view.
    pub fn nav_bounds(&self) -> NavBounds {
        let info = &self.view.page_info;
        if info.is_paginated() {
            NavBounds::new(info.start, info.end, info.len())
        } else {
            NavBounds::new(0, self.view.total_len(), self.config.navigation_page_rows)
        }
    }

    pub fn navigate(&mut self, key: NavKey, extend: bool) {
        self.recompute_if_dirty();
        let bounds = self.nav_bounds();
        if self.selection.navigate(key, extend, bounds) {
            self.mark_changed();
        }
    }

    // ========================================================================
    // EDITING
    // ========================================================================

    /// Writes a value at a view position. The edit is logged against the raw row.
    pub fn edit_cell(&mut self, view_row: usize, column_id: &str, value: CellValue) -> Result<(), GridError> {
        self.recompute_if_dirty();
        let raw_index = self.resolve_editable(view_row, column_id)?;
        if self.write_cell(raw_index, column_id, value) {
            self.mark_dirty();
        }
        Ok(())
    }

    fn resolve_editable(&self, view_row: usize, column_id: &str) -> Result<usize, GridError> {
        let column = self.column(column_id)?;
        if !column.is_editable() {
            return Err(GridError::NotEditable(column_id.to_string()));
        }
        match self.view.row(view_row) {
            Some(DisplayRow::Leaf { raw_index, .. }) => Ok(*raw_index),
            Some(DisplayRow::Group(_)) => Err(GridError::GroupRow(view_row)),
            None => Err(GridError::RowOutOfRange { row: view_row, len: self.view.total_len() }),
        }
    }

    /// Replaces one field of a raw row and records the edit. False when nothing changed.
    fn write_cell(&mut self, raw_index: usize, column_id: &str, value: CellValue) -> bool {
        let Some(column) = self.column_index.position(column_id).and_then(|p| self.columns.get(p)) else {
            return false;
        };
        let Some(row) = self.rows.get_mut(raw_index) else {
            return false;
        };
        let old_value = column.value(row);
        if old_value == value {
            return false;
        }
        *row = Arc::new(row.with_value(column.field_key(), value.clone()));
        self.edit_log.push(EditRecord::new(raw_index, column_id, old_value, value));
        log_debug!("UNDO", "edit row {} column '{}'", raw_index, column_id);
        true
    }

    pub fn begin_transaction(&mut self, description: &str) {
        self.edit_log.begin_transaction(description);
    }

    pub fn commit_transaction(&mut self) {
        self.edit_log.commit_transaction();
        self.mark_changed();
    }

    /// Drops the open transaction and restores the values it changed.
    pub fn cancel_transaction(&mut self) {
        if let Some(transaction) = self.edit_log.cancel_transaction() {
            let mut writer = RowWriter {
                rows: &mut self.rows,
                columns: &self.columns,
                column_index: &self.column_index,
            };
            for edit in transaction.edits.iter().rev() {
                if !writer.write_value(edit.row_index, &edit.column_id, &edit.old_value) {
                    log_warn!(
                        "UNDO",
                        "cancel: row {} or column '{}' no longer exists, edit skipped",
                        edit.row_index,
                        edit.column_id
                    );
                }
            }
            self.mark_dirty();
        }
    }

    pub fn undo(&mut self) -> Option<Transaction> {
        let mut writer = RowWriter {
            rows: &mut self.rows,
            columns: &self.columns,
            column_index: &self.column_index,
        };
        let transaction = self.edit_log.undo_into(&mut writer)?;
        self.mark_dirty();
        Some(transaction)
    }

    pub fn redo(&mut self) -> Option<Transaction> {
        let mut writer = RowWriter {
            rows: &mut self.rows,
            columns: &self.columns,
            column_index: &self.column_index,
        };
        let transaction = self.edit_log.redo_into(&mut writer)?;
        self.mark_dirty();
        Some(transaction)
    }

    // ========================================================================
    // CLIPBOARD
    // ========================================================================

    /// Serializes the primary selected range. `None` when nothing is selected.
    pub fn copy_text(&mut self) -> Option<String> {
        self.recompute_if_dirty();
        let range = self.selection.primary_range()?;
        let rows = &self.rows;
        let view = &self.view;
        Some(serialize_range(&range, &self.columns, self.config.copy_include_headers, |view_row, column| {
            view.row(view_row).and_then(|display| display_value(rows, display, column))
        }))
    }

    /// Copies the selection to the clipboard backend. Failures are logged, not raised.
    pub fn copy_to_clipboard(&mut self) -> bool {
        match self.try_copy_to_clipboard() {
            Ok(copied) => copied,
            Err(e) => {
                log_warn!("CLIPBOARD", "copy failed: {}", e);
                false
            }
        }
    }

    /// Like `copy_to_clipboard` but surfaces the backend error.
    /// `Ok(false)` when nothing is selected.
    pub fn try_copy_to_clipboard(&mut self) -> Result<bool, GridError> {
        let Some(text) = self.copy_text() else {
            return Ok(false);
        };
        self.clipboard.write_text(&text)?;
        log_info!("CLIPBOARD", "copied {} bytes", text.len());
        Ok(true)
    }

    /// Pastes clipboard text at the active cell as one undoable transaction.
    /// Returns the number of cells written.
    pub fn paste_text(&mut self, text: &str) -> Result<usize, GridError> {
        self.paste_matrix(clipboard::deserialize(text))
    }

    /// Writes a block of values starting at the active cell. Group rows and
    /// read-only columns are skipped; the block is clipped to the view and
    /// the columns.
    pub fn paste_matrix(&mut self, matrix: Vec<Vec<CellValue>>) -> Result<usize, GridError> {
        self.recompute_if_dirty();
        let active = self.selection.active().cloned().ok_or(GridError::NoActiveCell)?;
        let start_col = self
            .column_index
            .position(&active.column)
            .ok_or_else(|| GridError::UnknownColumn(active.column.clone()))?;

        let view = Arc::clone(&self.view);
        let mut targets: Vec<(usize, String, CellValue)> = Vec::new();
        for (r, values) in matrix.into_iter().enumerate() {
            let Some(display) = view.row(active.row + r) else {
                break;
            };
            let Some(raw_index) = display.raw_index() else {
                continue;
            };
            for (c, value) in values.into_iter().enumerate() {
                let Some(column) = self.columns.get(start_col + c) else {
                    break;
                };
                if column.is_editable() {
                    targets.push((raw_index, column.id.clone(), value));
                }
            }
        }

        // Inside a caller's transaction the paste joins it.
        let owns_transaction = !self.edit_log.in_transaction();
        if owns_transaction {
            self.edit_log.begin_transaction(format!("Paste {} cells", targets.len()));
        }
        let mut written = 0;
        for (raw_index, column_id, value) in targets {
            if self.write_cell(raw_index, &column_id, value) {
                written += 1;
            }
        }
        if owns_transaction {
            self.edit_log.commit_transaction();
        }

        log_info!("CLIPBOARD", "pasted {} cells at row {}", written, active.row);
        if written > 0 {
            self.mark_dirty();
        }
        Ok(written)
    }

    /// Reads the clipboard backend and pastes. Failures are logged, not raised.
    pub fn paste_from_clipboard(&mut self) -> bool {
        match self.try_paste_from_clipboard() {
            Ok(_) => true,
            Err(e) => {
                log_warn!("CLIPBOARD", "paste failed: {}", e);
                false
            }
        }
    }

    pub fn try_paste_from_clipboard(&mut self) -> Result<usize, GridError> {
        let matrix = clipboard::read_matrix(self.clipboard.as_mut())?;
        self.paste_matrix(matrix)
    }

    // ========================================================================
    // RECOMPUTE, BATCHING & SUBSCRIPTIONS
    // ========================================================================

    /// Runs `f` with recompute and notification suspended, then settles once.
    pub fn batch<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.batch_depth += 1;
        let result = f(self);
        self.batch_depth -= 1;
        if self.batch_depth == 0 {
            self.settle();
        }
        result
    }

    /// Recomputes a dirty view and delivers a pending notification.
    /// Hosts call this once per frame.
    pub fn flush(&mut self) {
        if self.batch_depth == 0 {
            self.settle();
        }
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&GridSnapshot) + Send + 'static,
    {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Inputs changed: the view must be rebuilt.
    fn mark_dirty(&mut self) {
        self.dirty = true;
        self.mark_changed();
    }

    /// Something observable changed.
    fn mark_changed(&mut self) {
        self.pending_notify = true;
        if self.batch_depth == 0 {
            self.settle();
        }
    }

    fn settle(&mut self) {
        self.recompute_if_dirty();
        if self.pending_notify {
            self.pending_notify = false;
            self.notify();
        }
    }

    fn recompute_if_dirty(&mut self) {
        if !self.dirty {
            return;
        }
        self.dirty = false;
        let view = compute_view(&PipelineInput {
            rows: &self.rows,
            columns: &self.columns,
            column_index: &self.column_index,
            filters: &self.filters,
            quick_filter: &self.quick_filter,
            sort: &self.sort,
            grouping: &self.grouping,
            page: self.page,
            page_size: self.page_size,
        });
        self.page = view.page_info.page;
        self.selection.retain_within(view.total_len());
        self.view = Arc::new(view);
    }

    fn notify(&mut self) {
        self.revision += 1;
        if self.subscribers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for (_, callback) in self.subscribers.iter_mut() {
            callback(&snapshot);
        }
    }
}

/// Value shown for `column` on a display row.
fn display_value(rows: &[RowRef], display: &DisplayRow, column: &Column) -> Option<CellValue> {
    match display {
        DisplayRow::Leaf { raw_index, .. } => rows.get(*raw_index).map(|row| column.value(row)),
        DisplayRow::Group(summary) => {
            if summary.column_id == column.id {
                Some(summary.key.to_value())
            } else {
                summary.aggregations.get(&column.id).cloned()
            }
        }
    }
}

impl std::fmt::Debug for GridState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridState")
            .field("rows", &self.rows.len())
            .field("columns", &self.column_index.ids())
            .field("filters", &self.filters)
            .field("sort", &self.sort)
            .field("grouping", &self.grouping)
            .field("page", &self.page)
            .field("page_size", &self.page_size)
            .field("revision", &self.revision)
            .finish()
    }
}
