//! FILENAME: core/table-engine/src/lib.rs
//! PURPOSE: Main library entry point for the table engine.
//! CONTEXT: Values, rows and columns plus the leaf components of the view
//! pipeline: comparator, filters, sort, pagination, selection, clipboard
//! codec and edit log. Grouping lives in `group-engine`, the orchestrating
//! state object in `table-app`.

#[macro_use]
pub mod logging;

pub mod cell;
pub mod clipboard;
pub mod column;
pub mod comparator;
pub mod config;
pub mod coord;
pub mod error;
pub mod filter;
pub mod pagination;
pub mod quick_filter;
pub mod row;
pub mod selection;
pub mod sort;
pub mod undo;

// Re-export commonly used types at the crate root
pub use cell::{format_date, format_number, CellValue};
pub use clipboard::{deserialize, serialize_range, serialize_values, ClipboardBackend, MemoryClipboard, NoClipboard};
pub use column::{Aggregation, AggregationType, AggregateFn, Column, ColumnIndex, FilterType, ValueComparator, ValueGetter};
pub use comparator::{collate, compare_values};
pub use config::EngineConfig;
pub use coord::{CellRange, CellRef};
pub use error::{ClipboardError, ConfigError};
pub use filter::{evaluate, filter_rows, unique_values, FilterEntry, FilterModel, FilterOperator, FilterValue, UniqueValue, UniqueValues};
pub use pagination::{paginate, PageInfo};
pub use quick_filter::QuickFilter;
pub use row::{rows_from_json, Row, RowRef};
pub use selection::{NavBounds, NavKey, SelectionModel};
pub use sort::{sort_indices, sort_rows, SortDirection, SortEntry, SortModel};
pub use undo::{EditLog, EditRecord, EditTarget, Transaction};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_filters_then_sorts_then_pages() {
        let rows = rows_from_json(&serde_json::json!([
            {"name": "delta", "qty": 4},
            {"name": "alpha", "qty": 9},
            {"name": "charlie", "qty": 1},
            {"name": "bravo", "qty": 7}
        ]));
        let columns = vec![Column::new("name"), Column::new("qty").filter_type(FilterType::Number)];
        let index = ColumnIndex::new(&columns);

        let mut filters = FilterModel::new();
        filters.set(FilterEntry::number("qty", FilterOperator::GreaterThan, 2.0));
        let visible = filter_rows(&rows, &columns, &index, &filters, None);

        let sort = SortModel::from_entries(vec![SortEntry::asc("name")]);
        let ordered = sort_indices(&rows, &visible, &columns, &index, &sort);
        let (page, info) = paginate(&ordered, 0, 2);

        let names: Vec<String> = page.iter().map(|&i| rows[i].get("name").display_value()).collect();
        assert_eq!(names, vec!["alpha", "bravo"]);
        assert_eq!(info.total_pages, 2);
    }
}
