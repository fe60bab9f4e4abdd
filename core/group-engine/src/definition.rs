//! FILENAME: core/group-engine/src/definition.rs
//! Grouping Definition - what the user asked to group by, and which groups are open.
//!
//! A group is addressed by its full path (the keys of all its ancestors plus
//! its own), never by position, so the expanded state survives re-sorting and
//! re-filtering of sibling groups.

use chrono::{DateTime, Utc};
use ordered_float::OrderedFloat;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use table_engine::CellValue;

// ============================================================================
// GROUP KEY
// ============================================================================

/// Hashable form of a grouping column's value. Empty is a key of its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GroupKey {
    Empty,
    Number(OrderedFloat<f64>),
    Text(String),
    Boolean(bool),
    Date(DateTime<Utc>),
    /// Non-primitive values keyed by their JSON text.
    Json(String),
}

impl GroupKey {
    pub fn from_value(value: &CellValue) -> Self {
        match value {
            CellValue::Empty => GroupKey::Empty,
            CellValue::Number(n) => GroupKey::Number(OrderedFloat(*n)),
            CellValue::Text(s) => GroupKey::Text(s.clone()),
            CellValue::Boolean(b) => GroupKey::Boolean(*b),
            CellValue::Date(d) => GroupKey::Date(*d),
            CellValue::Json(v) => GroupKey::Json(v.to_string()),
        }
    }

    pub fn to_value(&self) -> CellValue {
        match self {
            GroupKey::Empty => CellValue::Empty,
            GroupKey::Number(n) => CellValue::Number(n.into_inner()),
            GroupKey::Text(s) => CellValue::Text(s.clone()),
            GroupKey::Boolean(b) => CellValue::Boolean(*b),
            GroupKey::Date(d) => CellValue::Date(*d),
            GroupKey::Json(s) => serde_json::from_str(s).map_or(CellValue::Empty, CellValue::Json),
        }
    }

    /// Display label for a group header.
    pub fn label(&self) -> String {
        match self {
            GroupKey::Empty => "(blank)".to_string(),
            other => other.to_value().display_value(),
        }
    }
}

impl From<&str> for GroupKey {
    fn from(s: &str) -> Self {
        GroupKey::Text(s.to_string())
    }
}

impl From<f64> for GroupKey {
    fn from(n: f64) -> Self {
        GroupKey::Number(OrderedFloat(n))
    }
}

/// Keys from the outermost group down to a group. Most trees are shallow.
pub type GroupPath = SmallVec<[GroupKey; 4]>;

// ============================================================================
// GROUPING MODEL
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupingModel {
    /// Column ids, outermost first.
    group_by: Vec<String>,
    /// Paths of groups whose children are shown.
    expanded: FxHashSet<GroupPath>,
}

impl GroupingModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by(columns: &[&str]) -> Self {
        let mut model = Self::new();
        model.set_group_by(columns.iter().map(|c| c.to_string()).collect());
        model
    }

    pub fn group_by(&self) -> &[String] {
        &self.group_by
    }

    pub fn is_active(&self) -> bool {
        !self.group_by.is_empty()
    }

    /// Replaces the grouping columns. Expanded paths are kept only if the
    /// column list is unchanged.
    pub fn set_group_by(&mut self, columns: Vec<String>) {
        if columns != self.group_by {
            self.expanded.clear();
        }
        self.group_by = columns;
    }

    pub fn is_expanded(&self, path: &[GroupKey]) -> bool {
        self.expanded.contains(path)
    }

    pub fn expand(&mut self, path: &[GroupKey]) {
        self.expanded.insert(GroupPath::from(path));
    }

    pub fn collapse(&mut self, path: &[GroupKey]) {
        self.expanded.remove(path);
    }

    /// Flips a group's state. Returns the new expanded flag.
    pub fn toggle(&mut self, path: &[GroupKey]) -> bool {
        if self.expanded.remove(path) {
            false
        } else {
            self.expanded.insert(GroupPath::from(path));
            true
        }
    }

    pub fn expand_all<I: IntoIterator<Item = GroupPath>>(&mut self, paths: I) {
        self.expanded.extend(paths);
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    pub fn expanded_count(&self) -> usize {
        self.expanded.len()
    }
}
