//! FILENAME: core/table-engine/src/filter.rs
//! PURPOSE: Per-column filter evaluation and the filter model.
//! CONTEXT: A `FilterModel` holds at most one `FilterEntry` per column.
//! Entries are ANDed together and with the quick filter. Malformed filter
//! input never errors: an unusable filter value or an operator that has no
//! meaning for the entry's type lets every row through.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cell::{date_from_millis, format_date, format_number, parse_bool, parse_date, parse_number, CellValue};
use crate::column::{Column, ColumnIndex, FilterType};
use crate::comparator::compare_values;
use crate::quick_filter::QuickFilter;
use crate::row::RowRef;
use crate::{log_debug, log_enter, log_exit};

// ============================================================================
// FILTER ENTRY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    Blank,
    NotBlank,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Between,
    In,
}

/// The operand of a filter entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterValue {
    Empty,
    Text(String),
    Number(f64),
    Boolean(bool),
    Date(DateTime<Utc>),
    /// Bounds for `between`, choices for `in` and select filters.
    List(Vec<FilterValue>),
}

impl Default for FilterValue {
    fn default() -> Self {
        FilterValue::Empty
    }
}

impl FilterValue {
    /// Missing or empty values make the entry a pass-through.
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Empty => true,
            FilterValue::Text(s) => s.trim().is_empty(),
            FilterValue::List(items) => items.iter().all(FilterValue::is_empty),
            _ => false,
        }
    }

    fn as_text(&self) -> Option<String> {
        match self {
            FilterValue::Empty | FilterValue::List(_) => None,
            FilterValue::Text(s) => Some(s.clone()),
            FilterValue::Number(n) => Some(format_number(*n)),
            FilterValue::Boolean(b) => Some(b.to_string()),
            FilterValue::Date(d) => Some(format_date(d)),
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            FilterValue::Number(n) => Some(*n),
            FilterValue::Text(s) => parse_number(s),
            _ => None,
        }
    }

    fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            FilterValue::Date(d) => Some(*d),
            FilterValue::Text(s) => parse_date(s),
            FilterValue::Number(n) => date_from_millis(*n),
            _ => None,
        }
    }

    fn as_bool(&self) -> Option<bool> {
        match self {
            FilterValue::Boolean(b) => Some(*b),
            FilterValue::Text(s) => parse_bool(s),
            FilterValue::Number(n) => Some(*n != 0.0),
            _ => None,
        }
    }

    /// A list as-is, or a single value as a one-element slice.
    fn items(&self) -> &[FilterValue] {
        match self {
            FilterValue::List(items) => items,
            single => std::slice::from_ref(single),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Text(s.to_string())
    }
}

impl From<f64> for FilterValue {
    fn from(n: f64) -> Self {
        FilterValue::Number(n)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Boolean(b)
    }
}

impl From<DateTime<Utc>> for FilterValue {
    fn from(d: DateTime<Utc>) -> Self {
        FilterValue::Date(d)
    }
}

impl<T: Into<FilterValue>> From<Vec<T>> for FilterValue {
    fn from(items: Vec<T>) -> Self {
        FilterValue::List(items.into_iter().map(Into::into).collect())
    }
}

/// Filter criteria for a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterEntry {
    pub column_id: String,
    pub filter_type: FilterType,
    #[serde(default)]
    pub value: FilterValue,
    pub operator: FilterOperator,
}

impl FilterEntry {
    pub fn new(
        column_id: impl Into<String>,
        filter_type: FilterType,
        operator: FilterOperator,
        value: impl Into<FilterValue>,
    ) -> Self {
        FilterEntry {
            column_id: column_id.into(),
            filter_type,
            value: value.into(),
            operator,
        }
    }

    pub fn text(column_id: impl Into<String>, operator: FilterOperator, value: &str) -> Self {
        Self::new(column_id, FilterType::Text, operator, value)
    }

    pub fn number(column_id: impl Into<String>, operator: FilterOperator, value: impl Into<FilterValue>) -> Self {
        Self::new(column_id, FilterType::Number, operator, value)
    }
}

// ============================================================================
// EVALUATION
// ============================================================================

/// Tests one cell value against one filter entry.
pub fn evaluate(value: &CellValue, entry: &FilterEntry) -> bool {
    match entry.operator {
        FilterOperator::Blank => return value.is_blank(),
        FilterOperator::NotBlank => return !value.is_blank(),
        _ => {}
    }
    if entry.value.is_empty() {
        return true;
    }
    let result = match entry.filter_type {
        FilterType::Text => evaluate_text(value, entry),
        FilterType::Number => evaluate_number(value, entry),
        FilterType::Date => evaluate_date(value, entry),
        FilterType::Boolean => evaluate_boolean(value, entry),
        FilterType::Select => evaluate_select(value, entry),
    };
    result.unwrap_or_else(|| {
        log_debug!(
            "FILTER",
            "operator {:?} not usable for {:?} filter on '{}', passing through",
            entry.operator,
            entry.filter_type,
            entry.column_id
        );
        true
    })
}

/// `None` means the entry is not applicable and passes everything.
fn evaluate_text(value: &CellValue, entry: &FilterEntry) -> Option<bool> {
    let haystack = value.display_value().to_lowercase();
    if entry.operator == FilterOperator::In {
        return Some(entry.value.items().iter().any(|item| {
            item.as_text().is_some_and(|t| t.to_lowercase() == haystack)
        }));
    }
    let needle = entry.value.as_text()?.to_lowercase();
    let matched = match entry.operator {
        FilterOperator::Equals => haystack == needle,
        FilterOperator::NotEquals => haystack != needle,
        FilterOperator::Contains => haystack.contains(&needle),
        FilterOperator::NotContains => !haystack.contains(&needle),
        FilterOperator::StartsWith => haystack.starts_with(&needle),
        FilterOperator::EndsWith => haystack.ends_with(&needle),
        _ => return None,
    };
    Some(matched)
}

fn evaluate_number(value: &CellValue, entry: &FilterEntry) -> Option<bool> {
    match entry.operator {
        FilterOperator::Between => {
            let (lo, hi) = bounds(&entry.value, FilterValue::as_number)?;
            let n = value.as_number();
            Some(n.is_some_and(|n| n >= lo.min(hi) && n <= lo.max(hi)))
        }
        FilterOperator::In => {
            let choices: Vec<f64> = entry.value.items().iter().filter_map(FilterValue::as_number).collect();
            if choices.is_empty() {
                return None;
            }
            Some(value.as_number().is_some_and(|n| choices.contains(&n)))
        }
        op => {
            let target = entry.value.as_number()?;
            let compare: fn(f64, f64) -> bool = match op {
                FilterOperator::Equals => |a, b| a == b,
                FilterOperator::NotEquals => |a, b| a != b,
                FilterOperator::LessThan => |a, b| a < b,
                FilterOperator::LessThanOrEqual => |a, b| a <= b,
                FilterOperator::GreaterThan => |a, b| a > b,
                FilterOperator::GreaterThanOrEqual => |a, b| a >= b,
                _ => return None,
            };
            Some(value.as_number().is_some_and(|n| compare(n, target)))
        }
    }
}

/// Day granularity everywhere except strict less/greater, which use timestamps.
fn evaluate_date(value: &CellValue, entry: &FilterEntry) -> Option<bool> {
    match entry.operator {
        FilterOperator::Between => {
            let (lo, hi) = bounds(&entry.value, FilterValue::as_date)?;
            let (lo, hi) = (lo.min(hi).date_naive(), lo.max(hi).date_naive());
            Some(value.as_date().is_some_and(|d| d.date_naive() >= lo && d.date_naive() <= hi))
        }
        FilterOperator::LessThan => {
            let target = entry.value.as_date()?;
            Some(value.as_date().is_some_and(|d| d < target))
        }
        FilterOperator::GreaterThan => {
            let target = entry.value.as_date()?;
            Some(value.as_date().is_some_and(|d| d > target))
        }
        op => {
            let target = entry.value.as_date()?.date_naive();
            let day = value.as_date().map(|d| d.date_naive());
            let matched = match op {
                FilterOperator::Equals => day.is_some_and(|d| d == target),
                FilterOperator::NotEquals => day.is_some_and(|d| d != target),
                FilterOperator::LessThanOrEqual => day.is_some_and(|d| d <= target),
                FilterOperator::GreaterThanOrEqual => day.is_some_and(|d| d >= target),
                _ => return None,
            };
            Some(matched)
        }
    }
}

fn evaluate_boolean(value: &CellValue, entry: &FilterEntry) -> Option<bool> {
    let target = entry.value.as_bool()?;
    let actual = value.as_bool();
    match entry.operator {
        FilterOperator::Equals | FilterOperator::In => Some(actual == Some(target)),
        FilterOperator::NotEquals => Some(actual.is_some_and(|b| b != target)),
        _ => None,
    }
}

/// Select filters match when the value is any one of the chosen strings.
fn evaluate_select(value: &CellValue, entry: &FilterEntry) -> Option<bool> {
    let haystack = value.display_value().to_lowercase();
    let member = entry
        .value
        .items()
        .iter()
        .filter_map(FilterValue::as_text)
        .any(|choice| choice.to_lowercase() == haystack);
    match entry.operator {
        FilterOperator::Equals | FilterOperator::In => Some(member),
        FilterOperator::NotEquals => Some(!member),
        _ => None,
    }
}

fn bounds<T>(value: &FilterValue, convert: fn(&FilterValue) -> Option<T>) -> Option<(T, T)> {
    match value {
        FilterValue::List(items) if items.len() == 2 => Some((convert(&items[0])?, convert(&items[1])?)),
        _ => None,
    }
}

// ============================================================================
// FILTER MODEL
// ============================================================================

/// The column filters currently in effect, at most one per column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterModel {
    entries: Vec<FilterEntry>,
}

impl FilterModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, replacing any existing entry for the same column.
    pub fn set(&mut self, entry: FilterEntry) {
        match self.entries.iter_mut().find(|e| e.column_id == entry.column_id) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn remove(&mut self, column_id: &str) -> Option<FilterEntry> {
        let pos = self.entries.iter().position(|e| e.column_id == column_id)?;
        Some(self.entries.remove(pos))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, column_id: &str) -> Option<&FilterEntry> {
        self.entries.iter().find(|e| e.column_id == column_id)
    }

    pub fn entries(&self) -> &[FilterEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Returns the raw indices of the rows that pass every column filter and the quick filter.
pub fn filter_rows(
    rows: &[RowRef],
    columns: &[Column],
    column_index: &ColumnIndex,
    model: &FilterModel,
    quick: Option<&QuickFilter>,
) -> Vec<usize> {
    log_enter!("FILTER", "filter_rows", "rows={} entries={}", rows.len(), model.entries().len());

    let active: Vec<(&Column, &FilterEntry)> = model
        .entries()
        .iter()
        .filter_map(|entry| match column_index.position(&entry.column_id) {
            Some(pos) => columns.get(pos).map(|c| (c, entry)),
            None => {
                log_debug!("FILTER", "no column '{}', ignoring its filter", entry.column_id);
                None
            }
        })
        .collect();
    let quick = quick.filter(|q| !q.is_empty());

    let visible: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| active.iter().all(|(column, entry)| evaluate(&column.value(row), entry)))
        .filter(|(_, row)| quick.map_or(true, |q| q.matches_row(row, columns)))
        .map(|(i, _)| i)
        .collect();

    log_exit!("FILTER", "filter_rows", "visible={}", visible.len());
    visible
}

// ============================================================================
// UNIQUE VALUES
// ============================================================================

/// A distinct value in a column with its occurrence count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniqueValue {
    pub value: CellValue,
    pub display: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniqueValues {
    pub values: Vec<UniqueValue>,
    pub blank_count: usize,
}

/// Distinct display values of a column over `rows`, sorted with the default comparator.
pub fn unique_values(rows: &[RowRef], column: &Column) -> UniqueValues {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut result = UniqueValues::default();

    for row in rows {
        let value = column.value(row);
        if value.is_blank() {
            result.blank_count += 1;
            continue;
        }
        let display = value.display_value();
        match positions.get(&display) {
            Some(&pos) => result.values[pos].count += 1,
            None => {
                positions.insert(display.clone(), result.values.len());
                result.values.push(UniqueValue { value, display, count: 1 });
            }
        }
    }

    result.values.sort_by(|a, b| compare_values(&a.value, &b.value));
    result
}
