//! FILENAME: tests/test_pipeline.rs
//! Integration tests for the filter -> sort -> group -> paginate pipeline.

mod common;

use common::TestHarness;
use serde_json::json;
use table_app::{
    CellValue, Column, DisplayRow, FilterEntry, FilterOperator, FilterType, GridCommand, GridError, GroupKey,
    SortEntry,
};
use table_engine::AggregationType;

// ============================================================================
// SORTING
// ============================================================================

#[test]
fn test_toggle_sort_orders_ascending() {
    let mut harness = TestHarness::new();
    harness.state.set_columns(vec![Column::new("n").filter_type(FilterType::Number)]);
    harness.state.load_json(&json!([{"n": 3}, {"n": 1}, {"n": 2}]));

    harness.state.toggle_sort("n", false).unwrap();

    assert_eq!(
        harness.column_values("n"),
        vec![CellValue::from(1.0), CellValue::from(2.0), CellValue::from(3.0)]
    );
    // Raw storage order is untouched.
    assert_eq!(
        harness.raw_values("n"),
        vec![CellValue::from(3.0), CellValue::from(1.0), CellValue::from(2.0)]
    );
}

#[test]
fn test_toggle_sort_cycles_to_unsorted() {
    let mut harness = TestHarness::with_sample_data();

    harness.state.toggle_sort("age", false).unwrap();
    assert_eq!(harness.text_values("name"), vec!["Bob", "Diana", "Alice", "Eve", "Charlie"]);

    harness.state.toggle_sort("age", false).unwrap();
    assert_eq!(harness.text_values("name"), vec!["Charlie", "Eve", "Alice", "Diana", "Bob"]);

    harness.state.toggle_sort("age", false).unwrap();
    assert!(harness.state.sort_model().is_empty());
    assert_eq!(harness.text_values("name"), vec!["Alice", "Bob", "Charlie", "Diana", "Eve"]);
}

#[test]
fn test_multi_sort_keeps_ties_stable() {
    let mut harness = TestHarness::with_sample_data();
    harness.state.set_sort(vec![SortEntry::asc("city"), SortEntry::desc("salary")]);

    assert_eq!(harness.text_values("name"), vec!["Diana", "Bob", "Charlie", "Eve", "Alice"]);
}

#[test]
fn test_sort_unknown_column_is_rejected() {
    let mut harness = TestHarness::with_sample_data();
    let err = harness.state.toggle_sort("missing", false).unwrap_err();
    assert_eq!(err, GridError::UnknownColumn("missing".to_string()));
}

// ============================================================================
// FILTERING
// ============================================================================

#[test]
fn test_quick_filter_exclusion() {
    let mut harness = TestHarness::new();
    harness.state.set_columns(vec![Column::new("title")]);
    harness.state.load_json(&json!([{"title": "foo bar"}, {"title": "baz"}, {"title": "qux"}]));

    harness.state.set_quick_filter("-foo");

    assert_eq!(harness.text_values("title"), vec!["baz", "qux"]);
    assert_eq!(harness.state.view().filtered_count(), 2);
}

#[test]
fn test_quick_filter_terms_and_phrases() {
    let mut harness = TestHarness::with_sample_data();

    harness.state.set_quick_filter("oslo -alice");
    assert_eq!(harness.text_values("name"), vec!["Charlie", "Eve"]);

    harness.state.set_quick_filter("\"bergen\"|eve");
    assert_eq!(harness.text_values("name"), vec!["Bob", "Diana", "Eve"]);

    harness.state.set_quick_filter("");
    assert_eq!(harness.state.view().total_len(), 5);
}

#[test]
fn test_quick_filter_regex() {
    let mut harness = TestHarness::with_sample_data();
    harness.state.set_quick_filter("/^(a|e)/i");
    assert_eq!(harness.text_values("name"), vec!["Alice", "Eve"]);
}

#[test]
fn test_column_filters_combine_with_and() {
    let mut harness = TestHarness::with_sample_data();
    harness
        .state
        .set_filter(FilterEntry::number("salary", FilterOperator::GreaterThanOrEqual, 70000.0))
        .unwrap();
    harness
        .state
        .set_filter(FilterEntry::text("city", FilterOperator::Equals, "oslo"))
        .unwrap();

    assert_eq!(harness.text_values("name"), vec!["Alice", "Charlie", "Eve"]);

    harness.state.remove_filter("city");
    assert_eq!(harness.text_values("name"), vec!["Alice", "Charlie", "Diana", "Eve"]);

    harness.state.clear_filters();
    assert_eq!(harness.state.view().total_len(), 5);
}

#[test]
fn test_filter_on_unknown_column_is_rejected() {
    let mut harness = TestHarness::with_sample_data();
    let result = harness
        .state
        .set_filter(FilterEntry::text("nope", FilterOperator::Contains, "x"));
    assert!(matches!(result, Err(GridError::UnknownColumn(_))));
    assert!(harness.state.filters().is_empty());
}

// ============================================================================
// GROUPING
// ============================================================================

#[test]
fn test_group_sums_per_key() {
    let mut harness = TestHarness::new();
    harness.state.set_columns(vec![
        Column::new("g"),
        Column::new("v").filter_type(FilterType::Number).aggregate(AggregationType::Sum),
    ]);
    harness.state.load_json(&json!([{"g": "x", "v": 1}, {"g": "y", "v": 5}, {"g": "x", "v": 2}]));

    harness.state.set_group_by(vec!["g".to_string()]).unwrap();

    let view = harness.state.view();
    assert_eq!(view.total_len(), 2);
    assert_eq!(harness.state.cell_value(0, "g").unwrap(), Some(CellValue::from("x")));
    assert_eq!(harness.state.cell_value(0, "v").unwrap(), Some(CellValue::from(3.0)));
    assert_eq!(harness.state.cell_value(1, "g").unwrap(), Some(CellValue::from("y")));
    assert_eq!(harness.state.cell_value(1, "v").unwrap(), Some(CellValue::from(5.0)));
}

#[test]
fn test_expand_group_shows_leaves_under_header() {
    let mut harness = TestHarness::with_sample_data();
    harness.state.set_group_by(vec!["city".to_string()]).unwrap();
    assert_eq!(harness.state.view().total_len(), 2);

    harness.state.toggle_group_at(0).unwrap();

    let view = harness.state.view();
    assert_eq!(view.total_len(), 5);
    assert!(view.row(0).is_some_and(DisplayRow::is_group));
    assert_eq!(view.raw_index(1), Some(0));
    assert_eq!(view.raw_index(2), Some(2));
    assert_eq!(view.raw_index(3), Some(4));
    assert!(view.row(4).is_some_and(DisplayRow::is_group));
    assert_eq!(harness.state.cell_value(1, "name").unwrap(), Some(CellValue::from("Alice")));
    assert_eq!(harness.state.cell_value(0, "name").unwrap(), None);
}

#[test]
fn test_group_aggregates_ignore_collapse_state() {
    let mut harness = TestHarness::with_sample_data();
    harness.state.set_group_by(vec!["city".to_string()]).unwrap();

    let collapsed = harness.state.cell_value(0, "salary").unwrap();
    harness.state.expand_all_groups();
    let expanded = harness.state.cell_value(0, "salary").unwrap();

    assert_eq!(collapsed, Some(CellValue::from(240000.0)));
    assert_eq!(collapsed, expanded);
}

#[test]
fn test_expand_and_collapse_all() {
    let mut harness = TestHarness::with_sample_data();
    harness
        .state
        .set_group_by(vec!["city".to_string(), "active".to_string()])
        .unwrap();
    assert_eq!(harness.state.view().total_len(), 2);

    harness.state.expand_all_groups();
    // Oslo: true, false; Bergen: true. Three inner headers plus five leaves.
    assert_eq!(harness.state.view().total_len(), 2 + 3 + 5);

    harness.state.collapse_all_groups();
    assert_eq!(harness.state.view().total_len(), 2);
}

#[test]
fn test_toggle_group_by_path() {
    let mut harness = TestHarness::with_sample_data();
    harness.state.set_group_by(vec!["city".to_string()]).unwrap();

    harness
        .state
        .dispatch(GridCommand::ToggleGroup([GroupKey::from("Bergen")].into_iter().collect()))
        .unwrap();

    let view = harness.state.view();
    assert_eq!(view.total_len(), 4);
    assert_eq!(view.raw_index(2), Some(1));
    assert_eq!(view.raw_index(3), Some(3));
}

#[test]
fn test_toggle_group_at_leaf_is_rejected() {
    let mut harness = TestHarness::with_sample_data();
    assert!(harness.state.toggle_group_at(0).is_err());
}

#[test]
fn test_group_by_unknown_column_is_rejected() {
    let mut harness = TestHarness::with_sample_data();
    let result = harness.state.set_group_by(vec!["nope".to_string()]);
    assert_eq!(result, Err(GridError::UnknownColumn("nope".to_string())));
    assert!(!harness.state.grouping().is_active());
}

#[test]
fn test_groups_follow_sorted_order() {
    let mut harness = TestHarness::with_sample_data();
    harness.state.set_sort(vec![SortEntry::asc("age")]);
    harness.state.set_group_by(vec!["city".to_string()]).unwrap();

    // Bob (Bergen, 25) is the youngest, so Bergen comes first.
    assert_eq!(harness.text_values("city"), vec!["Bergen", "Oslo"]);
}

// ============================================================================
// PAGINATION
// ============================================================================

#[test]
fn test_page_slices_view() {
    let mut harness = TestHarness::with_large_data(95);
    harness.state.set_page_size(10);
    harness.state.set_page(2);

    let view = harness.state.view();
    assert_eq!(view.page_info.total_pages, 10);
    assert_eq!(view.page_info.start, 20);
    assert_eq!(view.page_info.end, 30);
    assert_eq!(view.page_rows().len(), 10);
    assert_eq!(view.page_rows()[0].raw_index(), Some(20));
}

#[test]
fn test_page_is_clamped_to_last_page() {
    let mut harness = TestHarness::with_large_data(95);
    harness.state.set_page_size(10);
    harness.state.set_page(50);

    let view = harness.state.view();
    assert_eq!(view.page_info.page, 9);
    assert_eq!(view.page_rows().len(), 5);
}

#[test]
fn test_zero_page_size_shows_everything() {
    let mut harness = TestHarness::with_large_data(40);
    harness.state.set_page_size(0);

    let view = harness.state.view();
    assert!(!view.page_info.is_paginated());
    assert_eq!(view.page_rows().len(), 40);
}

#[test]
fn test_filter_change_resets_page() {
    let mut harness = TestHarness::with_large_data(95);
    harness.state.set_page_size(10);
    harness.state.set_page(5);
    harness
        .state
        .set_filter(FilterEntry::text("bucket", FilterOperator::Equals, "a"))
        .unwrap();

    let view = harness.state.view();
    assert_eq!(view.page_info.page, 0);
    assert_eq!(view.filtered_count(), 32);
}
