//! FILENAME: core/table-engine/src/column.rs
//! PURPOSE: Column descriptors and the id -> position index.
//! CONTEXT: Columns are ordered; that order drives selection ranges and
//! clipboard layout. A column may override how its value is read, how it is
//! compared, and how it aggregates inside a group.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cell::CellValue;
use crate::row::Row;

/// Reads a cell value from a row for a column.
pub type ValueGetter = Arc<dyn Fn(&Row, &Column) -> CellValue + Send + Sync>;
/// Orders two values of a column. Receives `Empty` values too.
pub type ValueComparator = Arc<dyn Fn(&CellValue, &CellValue) -> Ordering + Send + Sync>;
/// Reduces the values of all leaf rows of a group to one value.
pub type AggregateFn = Arc<dyn Fn(&[CellValue]) -> CellValue + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum FilterType {
    #[default]
    Text,
    Number,
    Date,
    Boolean,
    Select,
}

/// Builtin aggregation functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AggregationType {
    Sum,
    Avg,
    Count,
    Min,
    Max,
    First,
    Last,
}

impl AggregationType {
    pub fn name(&self) -> &'static str {
        match self {
            AggregationType::Sum => "sum",
            AggregationType::Avg => "avg",
            AggregationType::Count => "count",
            AggregationType::Min => "min",
            AggregationType::Max => "max",
            AggregationType::First => "first",
            AggregationType::Last => "last",
        }
    }
}

#[derive(Clone)]
pub enum Aggregation {
    Builtin(AggregationType),
    Custom(AggregateFn),
}

impl fmt::Debug for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aggregation::Builtin(t) => write!(f, "Builtin({})", t.name()),
            Aggregation::Custom(_) => write!(f, "Custom(<fn>)"),
        }
    }
}

#[derive(Clone)]
pub struct Column {
    pub id: String,
    /// Key into the row. Defaults to `id`.
    pub field: Option<String>,
    pub header: Option<String>,
    pub getter: Option<ValueGetter>,
    pub comparator: Option<ValueComparator>,
    pub aggregation: Option<Aggregation>,
    pub filter_type: FilterType,
    pub editable: bool,
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("field", &self.field)
            .field("header", &self.header)
            .field("getter", &self.getter.is_some())
            .field("comparator", &self.comparator.is_some())
            .field("aggregation", &self.aggregation)
            .field("filter_type", &self.filter_type)
            .field("editable", &self.editable)
            .finish()
    }
}

impl Column {
    pub fn new(id: impl Into<String>) -> Self {
        Column {
            id: id.into(),
            field: None,
            header: None,
            getter: None,
            comparator: None,
            aggregation: None,
            filter_type: FilterType::Text,
            editable: true,
        }
    }

    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn filter_type(mut self, filter_type: FilterType) -> Self {
        self.filter_type = filter_type;
        self
    }

    pub fn aggregate(mut self, aggregation: AggregationType) -> Self {
        self.aggregation = Some(Aggregation::Builtin(aggregation));
        self
    }

    pub fn aggregate_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&[CellValue]) -> CellValue + Send + Sync + 'static,
    {
        self.aggregation = Some(Aggregation::Custom(Arc::new(f)));
        self
    }

    pub fn compare_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&CellValue, &CellValue) -> Ordering + Send + Sync + 'static,
    {
        self.comparator = Some(Arc::new(f));
        self
    }

    pub fn get_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&Row, &Column) -> CellValue + Send + Sync + 'static,
    {
        self.getter = Some(Arc::new(f));
        self
    }

    pub fn read_only(mut self) -> Self {
        self.editable = false;
        self
    }

    pub fn field_key(&self) -> &str {
        self.field.as_deref().unwrap_or(&self.id)
    }

    pub fn header_text(&self) -> &str {
        self.header.as_deref().unwrap_or(&self.id)
    }

    /// The engine-wide value getter: `(row, column) -> value`.
    pub fn value(&self, row: &Row) -> CellValue {
        match &self.getter {
            Some(getter) => getter(row, self),
            None => row.get(self.field_key()),
        }
    }

    /// Computed columns cannot be written back to a row.
    pub fn is_editable(&self) -> bool {
        self.editable && self.getter.is_none()
    }
}

// ============================================================================
// COLUMN INDEX
// ============================================================================

/// Cached `id -> position` lookup. Rebuilt only when the column order changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnIndex {
    ids: Vec<String>,
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    pub fn new(columns: &[Column]) -> Self {
        let ids: Vec<String> = columns.iter().map(|c| c.id.clone()).collect();
        let positions = ids.iter().enumerate().map(|(i, id)| (id.clone(), i)).collect();
        ColumnIndex { ids, positions }
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn id_at(&self, position: usize) -> Option<&str> {
        self.ids.get(position).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// True when `columns` has exactly this order of ids.
    pub fn matches(&self, columns: &[Column]) -> bool {
        self.ids.len() == columns.len() && self.ids.iter().zip(columns).all(|(id, c)| *id == c.id)
    }
}
