//! FILENAME: core/table-engine/src/row.rs
//! PURPOSE: The record type the engine reads values from.
//! CONTEXT: Rows are owned by the caller and shared with the engine as
//! `Arc<Row>`. The engine never mutates a row in place; an edit builds a
//! new row with one field replaced (see `Row::with_value`).

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cell::CellValue;

/// A single record: field name -> value. Missing fields read as `Empty`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    fields: BTreeMap<String, CellValue>,
}

/// Shared, immutable handle to a row.
pub type RowRef = Arc<Row>;

impl Row {
    pub fn new() -> Self {
        Row { fields: BTreeMap::new() }
    }

    /// Returns the stored value, or `Empty` if the field is absent.
    pub fn get(&self, field: &str) -> CellValue {
        self.fields.get(field).cloned().unwrap_or_default()
    }

    pub fn get_ref(&self, field: &str) -> Option<&CellValue> {
        self.fields.get(field)
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<CellValue>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Builder-style setter.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.set(field, value);
        self
    }

    /// Returns a copy of this row with one field replaced.
    pub fn with_value(&self, field: &str, value: CellValue) -> Row {
        let mut next = self.clone();
        next.fields.insert(field.to_string(), value);
        next
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Builds a row from a JSON object. Non-object input yields `None`.
    pub fn from_json(value: &serde_json::Value) -> Option<Row> {
        let object = value.as_object()?;
        let fields = object
            .iter()
            .map(|(k, v)| (k.clone(), CellValue::from(v.clone())))
            .collect();
        Some(Row { fields })
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Row {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Convenience for building shared rows from JSON array literals in tests and hosts.
pub fn rows_from_json(value: &serde_json::Value) -> Vec<RowRef> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(Row::from_json).map(Arc::new).collect())
        .unwrap_or_default()
}
