//! FILENAME: tests/common/mod.rs
//! Test harness and fixtures for table-app integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use serde_json::json;
use table_app::{
    CellRef, CellValue, Column, EngineConfig, FilterType, GridSnapshot, GridState, SubscriptionId,
};
use table_engine::{rows_from_json, AggregationType};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Test harness wrapping a grid and recording every snapshot it emits.
pub struct TestHarness {
    pub state: GridState,
    pub snapshots: Arc<Mutex<Vec<GridSnapshot>>>,
    pub subscription: SubscriptionId,
}

impl TestHarness {
    /// Empty grid with default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        init_logging();
        let mut state = GridState::new(config);
        let snapshots = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&snapshots);
        let subscription = state.subscribe(move |snapshot| {
            sink.lock().unwrap().push(snapshot.clone());
        });
        TestHarness { state, snapshots, subscription }
    }

    /// Five people across two cities.
    pub fn with_sample_data() -> Self {
        let mut harness = Self::new();
        harness.load_sample_data();
        harness
    }

    /// `n` rows with a numeric `id` column and a `bucket` column cycling through "a", "b", "c".
    pub fn with_large_data(n: usize) -> Self {
        let mut harness = Self::new();
        let rows = (0..n)
            .map(|i| json!({"id": i, "bucket": (["a", "b", "c"][i % 3]), "value": (i * 7 % 100)}))
            .collect::<Vec<_>>();
        harness.state.batch(|s| {
            s.set_columns(vec![
                Column::new("id").filter_type(FilterType::Number),
                Column::new("bucket").filter_type(FilterType::Select),
                Column::new("value").filter_type(FilterType::Number).aggregate(AggregationType::Sum),
            ]);
            s.load_json(&serde_json::Value::Array(rows));
        });
        harness.clear_snapshots();
        harness
    }

    pub fn load_sample_data(&mut self) {
        self.state.batch(|s| {
            s.set_columns(sample_columns());
            s.set_rows(rows_from_json(&sample_rows()));
        });
        self.clear_snapshots();
    }

    pub fn snapshot_count(&self) -> usize {
        self.snapshots.lock().unwrap().len()
    }

    pub fn last_snapshot(&self) -> Option<GridSnapshot> {
        self.snapshots.lock().unwrap().last().cloned()
    }

    pub fn clear_snapshots(&self) {
        self.snapshots.lock().unwrap().clear();
    }

    /// Display values of one column down the full view.
    pub fn column_values(&self, column_id: &str) -> Vec<CellValue> {
        let view = self.state.view();
        (0..view.total_len())
            .map(|r| self.state.cell_value(r, column_id).unwrap().unwrap_or(CellValue::Empty))
            .collect()
    }

    /// Raw value of one column across the raw rows, in storage order.
    pub fn raw_values(&self, column_id: &str) -> Vec<CellValue> {
        (0..self.state.rows().len())
            .map(|i| self.state.value_at(i, column_id).unwrap())
            .collect()
    }

    pub fn text_values(&self, column_id: &str) -> Vec<String> {
        self.column_values(column_id).iter().map(CellValue::display_value).collect()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

pub fn sample_columns() -> Vec<Column> {
    vec![
        Column::new("name").header("Name"),
        Column::new("age").header("Age").filter_type(FilterType::Number).aggregate(AggregationType::Avg),
        Column::new("city").header("City").filter_type(FilterType::Select),
        Column::new("salary").header("Salary").filter_type(FilterType::Number).aggregate(AggregationType::Sum),
        Column::new("active").header("Active").filter_type(FilterType::Boolean),
        Column::new("code").header("Code").read_only(),
    ]
}

pub fn sample_rows() -> serde_json::Value {
    json!([
        {"name": "Alice", "age": 30, "city": "Oslo", "salary": 75000, "active": true, "code": "A1"},
        {"name": "Bob", "age": 25, "city": "Bergen", "salary": 65000, "active": true, "code": "B2"},
        {"name": "Charlie", "age": 35, "city": "Oslo", "salary": 85000, "active": false, "code": "C3"},
        {"name": "Diana", "age": 28, "city": "Bergen", "salary": 70000, "active": true, "code": "D4"},
        {"name": "Eve", "age": 32, "city": "Oslo", "salary": 80000, "active": true, "code": "E5"}
    ])
}

pub fn cell(row: usize, column: &str) -> CellRef {
    CellRef::new(row, column)
}
