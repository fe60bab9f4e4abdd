//! FILENAME: app/src/view.rs
//! PURPOSE: The processed view and the pipeline that produces it.
//! CONTEXT: Filter -> sort -> group -> flatten -> paginate. The result is
//! computed from scratch out of the current inputs and never patched in
//! place; the grid swaps in a new `Arc<ProcessedView>` on every recompute.

use group_engine::{flatten, group_rows, leaves, DisplayRow, GroupNode, GroupingModel};
use table_engine::{
    filter_rows, log_info, sort_indices, Column, ColumnIndex, FilterModel, PageInfo, QuickFilter, RowRef, SortModel,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessedView {
    /// Every display row after grouping, before pagination. View rows index this.
    display: Vec<DisplayRow>,
    /// Raw indices that passed the filters, in sorted order.
    leaf_order: Vec<usize>,
    pub page_info: PageInfo,
    pub groups: Vec<GroupNode>,
}

impl ProcessedView {
    /// Display rows of the current page.
    pub fn page_rows(&self) -> &[DisplayRow] {
        &self.display[self.page_info.start..self.page_info.end]
    }

    /// Length of the full flattened view (all pages).
    pub fn total_len(&self) -> usize {
        self.display.len()
    }

    /// Leaf rows that passed the filters.
    pub fn filtered_count(&self) -> usize {
        self.leaf_order.len()
    }

    pub fn leaf_order(&self) -> &[usize] {
        &self.leaf_order
    }

    pub fn row(&self, view_row: usize) -> Option<&DisplayRow> {
        self.display.get(view_row)
    }

    pub fn raw_index(&self, view_row: usize) -> Option<usize> {
        self.display.get(view_row).and_then(DisplayRow::raw_index)
    }

    pub fn display_rows(&self) -> &[DisplayRow] {
        &self.display
    }
}

/// Inputs of one pipeline run.
pub struct PipelineInput<'a> {
    pub rows: &'a [RowRef],
    pub columns: &'a [Column],
    pub column_index: &'a ColumnIndex,
    pub filters: &'a FilterModel,
    pub quick_filter: &'a QuickFilter,
    pub sort: &'a SortModel,
    pub grouping: &'a GroupingModel,
    pub page: usize,
    pub page_size: usize,
}

pub fn compute_view(input: &PipelineInput<'_>) -> ProcessedView {
    let visible = filter_rows(
        input.rows,
        input.columns,
        input.column_index,
        input.filters,
        Some(input.quick_filter),
    );
    let leaf_order = sort_indices(input.rows, &visible, input.columns, input.column_index, input.sort);

    let groups = if input.grouping.is_active() {
        group_rows(input.rows, &leaf_order, input.columns, input.column_index, input.grouping)
    } else {
        Vec::new()
    };
    let display = if groups.is_empty() { leaves(&leaf_order) } else { flatten(&groups) };
    let page_info = PageInfo::compute(display.len(), input.page, input.page_size);

    log_info!(
        "PIPELINE",
        "view rebuilt: {} of {} rows visible, {} display rows, page {}/{}",
        leaf_order.len(),
        input.rows.len(),
        display.len(),
        page_info.page + 1,
        page_info.total_pages
    );

    ProcessedView { display, leaf_order, page_info, groups }
}

#[cfg(test)]
mod tests {
    use super::*;
    use table_engine::{rows_from_json, FilterEntry, FilterOperator, SortEntry};

    fn run(rows: &[RowRef], columns: &[Column], filters: &FilterModel, sort: &SortModel, grouping: &GroupingModel, page_size: usize) -> ProcessedView {
        let index = ColumnIndex::new(columns);
        let quick = QuickFilter::default();
        compute_view(&PipelineInput {
            rows,
            columns,
            column_index: &index,
            filters,
            quick_filter: &quick,
            sort,
            grouping,
            page: 0,
            page_size,
        })
    }

    #[test]
    fn empty_input_yields_empty_view() {
        let view = run(&[], &[], &FilterModel::new(), &SortModel::new(), &GroupingModel::new(), 10);
        assert_eq!(view.total_len(), 0);
        assert!(view.page_rows().is_empty());
        assert_eq!(view.page_info.total_pages, 1);
    }

    #[test]
    fn grouping_with_no_surviving_rows_falls_back_to_leaves() {
        let rows = rows_from_json(&serde_json::json!([{"k": "a"}, {"k": "b"}]));
        let columns = vec![Column::new("k")];
        let mut filters = FilterModel::new();
        filters.set(FilterEntry::text("k", FilterOperator::Equals, "zzz"));

        let view = run(&rows, &columns, &filters, &SortModel::new(), &GroupingModel::by(&["k"]), 0);
        assert_eq!(view.total_len(), 0);
        assert!(view.groups.is_empty());
    }

    #[test]
    fn leaf_order_follows_sort() {
        let rows = rows_from_json(&serde_json::json!([{"k": "b"}, {"k": "c"}, {"k": "a"}]));
        let columns = vec![Column::new("k")];
        let sort = SortModel::from_entries(vec![SortEntry::asc("k")]);

        let view = run(&rows, &columns, &FilterModel::new(), &sort, &GroupingModel::new(), 0);
        assert_eq!(view.leaf_order(), &[2, 0, 1]);
        assert_eq!(view.raw_index(0), Some(2));
    }
}
