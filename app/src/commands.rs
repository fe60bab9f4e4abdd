//! FILENAME: app/src/commands.rs
//! PURPOSE: Command surface for hosts that drive the grid by message.
//! CONTEXT: Each variant maps onto one `GridState` method. Hosts that hold
//! the state directly can call the methods instead; both paths share the
//! same validation and notification behavior.

use group_engine::GroupPath;
use table_engine::{log_debug, CellRef, CellValue, Column, FilterEntry, NavKey, RowRef, SortEntry};

use crate::error::GridError;
use crate::state::GridState;

#[derive(Debug, Clone)]
pub enum GridCommand {
    // Data
    SetRows(Vec<RowRef>),
    SetColumns(Vec<Column>),

    // Filtering
    SetFilter(FilterEntry),
    RemoveFilter(String),
    ClearFilters,
    SetQuickFilter(String),

    // Sorting
    ToggleSort { column_id: String, multi: bool },
    SetSort(Vec<SortEntry>),

    // Grouping
    SetGroupBy(Vec<String>),
    ToggleGroup(GroupPath),
    /// Toggles the group header at a view row.
    ToggleGroupAt(usize),
    ExpandAllGroups,
    CollapseAllGroups,

    // Pagination
    SetPage(usize),
    SetPageSize(usize),

    // Selection
    ClickCell(CellRef),
    CtrlClickCell(CellRef),
    ShiftClickCell(CellRef),
    ClickRow(usize),
    CtrlClickRow(usize),
    ShiftClickRow(usize),
    SelectAll,
    ClearSelection,
    Navigate { key: NavKey, extend: bool },

    // Editing
    EditCell { view_row: usize, column_id: String, value: CellValue },
    Undo,
    Redo,
    PasteText(String),
    CopyToClipboard,
    PasteFromClipboard,
}

impl GridCommand {
    pub fn name(&self) -> &'static str {
        match self {
            GridCommand::SetRows(_) => "set_rows",
            GridCommand::SetColumns(_) => "set_columns",
            GridCommand::SetFilter(_) => "set_filter",
            GridCommand::RemoveFilter(_) => "remove_filter",
            GridCommand::ClearFilters => "clear_filters",
            GridCommand::SetQuickFilter(_) => "set_quick_filter",
            GridCommand::ToggleSort { .. } => "toggle_sort",
            GridCommand::SetSort(_) => "set_sort",
            GridCommand::SetGroupBy(_) => "set_group_by",
            GridCommand::ToggleGroup(_) => "toggle_group",
            GridCommand::ToggleGroupAt(_) => "toggle_group_at",
            GridCommand::ExpandAllGroups => "expand_all_groups",
            GridCommand::CollapseAllGroups => "collapse_all_groups",
            GridCommand::SetPage(_) => "set_page",
            GridCommand::SetPageSize(_) => "set_page_size",
            GridCommand::ClickCell(_) => "click_cell",
            GridCommand::CtrlClickCell(_) => "ctrl_click_cell",
            GridCommand::ShiftClickCell(_) => "shift_click_cell",
            GridCommand::ClickRow(_) => "click_row",
            GridCommand::CtrlClickRow(_) => "ctrl_click_row",
            GridCommand::ShiftClickRow(_) => "shift_click_row",
            GridCommand::SelectAll => "select_all",
            GridCommand::ClearSelection => "clear_selection",
            GridCommand::Navigate { .. } => "navigate",
            GridCommand::EditCell { .. } => "edit_cell",
            GridCommand::Undo => "undo",
            GridCommand::Redo => "redo",
            GridCommand::PasteText(_) => "paste_text",
            GridCommand::CopyToClipboard => "copy_to_clipboard",
            GridCommand::PasteFromClipboard => "paste_from_clipboard",
        }
    }
}

impl GridState {
    /// Applies one command.
    pub fn dispatch(&mut self, command: GridCommand) -> Result<(), GridError> {
        log_debug!("COMMAND", "{}", command.name());
        match command {
            GridCommand::SetRows(rows) => self.set_rows(rows),
            GridCommand::SetColumns(columns) => self.set_columns(columns),
            GridCommand::SetFilter(entry) => self.set_filter(entry)?,
            GridCommand::RemoveFilter(column_id) => self.remove_filter(&column_id),
            GridCommand::ClearFilters => self.clear_filters(),
            GridCommand::SetQuickFilter(query) => self.set_quick_filter(&query),
            GridCommand::ToggleSort { column_id, multi } => self.toggle_sort(&column_id, multi)?,
            GridCommand::SetSort(entries) => self.set_sort(entries),
            GridCommand::SetGroupBy(column_ids) => self.set_group_by(column_ids)?,
            GridCommand::ToggleGroup(path) => self.toggle_group(&path),
            GridCommand::ToggleGroupAt(view_row) => self.toggle_group_at(view_row)?,
            GridCommand::ExpandAllGroups => self.expand_all_groups(),
            GridCommand::CollapseAllGroups => self.collapse_all_groups(),
            GridCommand::SetPage(page) => self.set_page(page),
            GridCommand::SetPageSize(page_size) => self.set_page_size(page_size),
            GridCommand::ClickCell(cell) => self.click_cell(cell)?,
            GridCommand::CtrlClickCell(cell) => self.ctrl_click_cell(cell)?,
            GridCommand::ShiftClickCell(cell) => self.shift_click_cell(cell)?,
            GridCommand::ClickRow(row) => self.click_row(row)?,
            GridCommand::CtrlClickRow(row) => self.ctrl_click_row(row)?,
            GridCommand::ShiftClickRow(row) => self.shift_click_row(row)?,
            GridCommand::SelectAll => self.select_all(),
            GridCommand::ClearSelection => self.clear_selection(),
            GridCommand::Navigate { key, extend } => self.navigate(key, extend),
            GridCommand::EditCell { view_row, column_id, value } => self.edit_cell(view_row, &column_id, value)?,
            GridCommand::Undo => {
                self.undo();
            }
            GridCommand::Redo => {
                self.redo();
            }
            GridCommand::PasteText(text) => {
                self.paste_text(&text)?;
            }
            GridCommand::CopyToClipboard => {
                self.try_copy_to_clipboard()?;
            }
            GridCommand::PasteFromClipboard => {
                self.try_paste_from_clipboard()?;
            }
        }
        Ok(())
    }

    /// Applies several commands with a single recompute and notification.
    /// Stops at the first error; earlier commands stay applied.
    pub fn dispatch_all<I>(&mut self, commands: I) -> Result<(), GridError>
    where
        I: IntoIterator<Item = GridCommand>,
    {
        self.batch(|state| commands.into_iter().try_for_each(|command| state.dispatch(command)))
    }
}
