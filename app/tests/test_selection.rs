//! FILENAME: tests/test_selection.rs
//! Integration tests for selection gestures and keyboard navigation.

mod common;

use common::{cell, TestHarness};
use table_app::{EngineConfig, FilterEntry, FilterOperator, GridCommand, GridError, NavKey};

#[test]
fn test_click_and_shift_click_cells() {
    let mut harness = TestHarness::with_sample_data();
    harness.state.click_cell(cell(1, "name")).unwrap();
    harness.state.shift_click_cell(cell(3, "city")).unwrap();

    let selection = harness.state.selection();
    assert!(selection.is_cell_selected(2, "age"));
    assert!(!selection.is_cell_selected(4, "age"));
    assert!(!selection.is_cell_selected(2, "salary"));
    assert_eq!(selection.anchor(), Some(&cell(1, "name")));
    assert_eq!(selection.active(), Some(&cell(3, "city")));
}

#[test]
fn test_ctrl_click_adds_disjoint_ranges() {
    let mut harness = TestHarness::with_sample_data();
    harness.state.click_cell(cell(0, "name")).unwrap();
    harness.state.ctrl_click_cell(cell(4, "salary")).unwrap();

    assert_eq!(harness.state.selection().ranges().len(), 2);
    assert!(harness.state.selection().is_cell_selected(0, "name"));
    assert!(harness.state.selection().is_cell_selected(4, "salary"));
}

#[test]
fn test_row_gestures() {
    let mut harness = TestHarness::with_sample_data();
    harness.state.click_row(1).unwrap();
    harness.state.shift_click_row(3).unwrap();
    assert_eq!(harness.state.selection().selected_rows(5), vec![1, 2, 3]);

    harness.state.ctrl_click_row(2).unwrap();
    assert_eq!(harness.state.selection().selected_rows(5), vec![1, 3]);
}

#[test]
fn test_out_of_range_gestures_are_rejected() {
    let mut harness = TestHarness::with_sample_data();
    assert_eq!(harness.state.click_row(5), Err(GridError::RowOutOfRange { row: 5, len: 5 }));
    assert_eq!(
        harness.state.click_cell(cell(0, "nope")),
        Err(GridError::UnknownColumn("nope".to_string()))
    );
    assert!(!harness.state.selection().has_selection());
}

#[test]
fn test_select_all_small_view_is_explicit() {
    let mut harness = TestHarness::with_sample_data();
    harness.state.select_all();

    let selection = harness.state.selection();
    assert!(!selection.is_all_selected());
    assert_eq!(selection.explicit_rows().len(), 5);
    assert_eq!(harness.last_snapshot().unwrap().selected_row_count(), 5);
}

#[test]
fn test_select_all_marker_tracks_view_length() {
    let config = EngineConfig { select_all_threshold: 10, ..EngineConfig::default() };
    let mut harness = TestHarness::with_config(config);
    let rows: Vec<_> = (0..50).map(|i| serde_json::json!({"id": i, "bucket": (["a", "b", "c"][i % 3])})).collect();
    harness.state.set_columns(vec![table_app::Column::new("id"), table_app::Column::new("bucket")]);
    harness.state.load_json(&serde_json::Value::Array(rows));

    harness.state.select_all();
    assert!(harness.state.selection().is_all_selected());
    assert!(harness.state.selection().explicit_rows().is_empty());

    harness.state.ctrl_click_row(3).unwrap();
    assert_eq!(harness.last_snapshot().unwrap().selected_row_count(), 49);

    // The marker is not materialized; the count follows the filtered view.
    harness
        .state
        .set_filter(FilterEntry::text("bucket", FilterOperator::Equals, "a"))
        .unwrap();
    assert_eq!(harness.state.view().total_len(), 17);
    assert_eq!(harness.last_snapshot().unwrap().selected_row_count(), 16);
    assert!(harness.state.selection().is_row_selected(16));
    assert!(!harness.state.selection().is_row_selected(17));
}

#[test]
fn test_selection_is_clamped_when_view_shrinks() {
    let mut harness = TestHarness::with_sample_data();
    harness.state.click_cell(cell(4, "name")).unwrap();
    harness.state.ctrl_click_cell(cell(0, "name")).unwrap();
    harness.state.click_row(4).unwrap();
    harness.state.click_cell(cell(4, "age")).unwrap();

    harness.state.set_quick_filter("oslo");

    assert_eq!(harness.state.view().total_len(), 3);
    assert_eq!(harness.state.selection().active(), None);
    assert!(harness.state.selection().ranges().is_empty());
}

#[test]
fn test_clear_selection() {
    let mut harness = TestHarness::with_sample_data();
    harness.state.click_row(2).unwrap();
    harness.state.dispatch(GridCommand::ClearSelection).unwrap();
    assert!(!harness.state.selection().has_selection());
}

// ============================================================================
// KEYBOARD NAVIGATION
// ============================================================================

#[test]
fn test_navigation_starts_at_first_cell() {
    let mut harness = TestHarness::with_sample_data();
    harness.state.navigate(NavKey::Down, false);
    assert_eq!(harness.state.selection().active(), Some(&cell(0, "name")));
}

#[test]
fn test_arrow_keys_and_tab_wrap() {
    let mut harness = TestHarness::with_sample_data();
    harness.state.click_cell(cell(0, "code")).unwrap();

    harness.state.navigate(NavKey::Right, false);
    assert_eq!(harness.state.selection().active(), Some(&cell(0, "code")));

    harness.state.navigate(NavKey::Tab, false);
    assert_eq!(harness.state.selection().active(), Some(&cell(1, "name")));

    harness.state.navigate(NavKey::BackTab, false);
    assert_eq!(harness.state.selection().active(), Some(&cell(0, "code")));

    harness.state.navigate(NavKey::Up, false);
    assert_eq!(harness.state.selection().active(), Some(&cell(0, "code")));
}

#[test]
fn test_shift_navigation_extends_from_anchor() {
    let mut harness = TestHarness::with_sample_data();
    harness.state.click_cell(cell(1, "age")).unwrap();
    harness
        .state
        .dispatch_all([
            GridCommand::Navigate { key: NavKey::Down, extend: true },
            GridCommand::Navigate { key: NavKey::Right, extend: true },
        ])
        .unwrap();

    let selection = harness.state.selection();
    assert_eq!(selection.anchor(), Some(&cell(1, "age")));
    assert_eq!(selection.active(), Some(&cell(2, "city")));
    assert!(selection.is_cell_selected(2, "age"));
    assert!(selection.is_cell_selected(1, "city"));
    assert!(!selection.is_cell_selected(3, "age"));
}

#[test]
fn test_navigation_is_bounded_to_current_page() {
    let mut harness = TestHarness::with_large_data(30);
    harness.state.set_page_size(10);
    harness.state.set_page(1);

    harness.state.navigate(NavKey::Down, false);
    assert_eq!(harness.state.selection().active(), Some(&cell(10, "id")));

    harness.state.navigate(NavKey::Up, false);
    assert_eq!(harness.state.selection().active(), Some(&cell(10, "id")));

    harness.state.navigate(NavKey::CtrlEnd, false);
    assert_eq!(harness.state.selection().active(), Some(&cell(19, "value")));

    harness.state.navigate(NavKey::Down, false);
    assert_eq!(harness.state.selection().active(), Some(&cell(19, "value")));

    harness.state.navigate(NavKey::PageUp, false);
    assert_eq!(harness.state.selection().active(), Some(&cell(10, "value")));
}

#[test]
fn test_page_keys_use_configured_step() {
    let config = EngineConfig { navigation_page_rows: 4, ..EngineConfig::default() };
    let mut harness = TestHarness::with_config(config);
    harness.load_sample_data();
    harness.state.click_cell(cell(0, "name")).unwrap();

    harness.state.navigate(NavKey::PageDown, false);
    assert_eq!(harness.state.selection().active(), Some(&cell(4, "name")));

    harness.state.navigate(NavKey::CtrlHome, false);
    assert_eq!(harness.state.selection().active(), Some(&cell(0, "name")));
}
