//! FILENAME: core/table-engine/src/sort.rs
//! PURPOSE: Multi-key stable sort over raw row indices.
//! CONTEXT: Sort keys are read once per row and key, then a stable sort
//! orders the indices. Empty values stay last in both directions when the
//! default comparator is used; a column's own comparator sees every value
//! (Empty included) and its result is simply reversed for descending keys.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::cell::CellValue;
use crate::column::{Column, ColumnIndex, ValueComparator};
use crate::comparator::compare_values;
use crate::row::RowRef;
use crate::{log_debug, log_enter, log_exit};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortEntry {
    pub column_id: String,
    pub direction: SortDirection,
}

impl SortEntry {
    pub fn new(column_id: impl Into<String>, direction: SortDirection) -> Self {
        SortEntry { column_id: column_id.into(), direction }
    }

    pub fn asc(column_id: impl Into<String>) -> Self {
        Self::new(column_id, SortDirection::Asc)
    }

    pub fn desc(column_id: impl Into<String>) -> Self {
        Self::new(column_id, SortDirection::Desc)
    }
}

// ============================================================================
// SORT MODEL
// ============================================================================

/// Priority-ordered sort keys. A column without a direction has no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortModel {
    entries: Vec<SortEntry>,
}

impl SortModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<SortEntry>) -> Self {
        let mut model = SortModel::new();
        for entry in entries {
            model.set(&entry.column_id, Some(entry.direction));
        }
        model
    }

    pub fn entries(&self) -> &[SortEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn direction_of(&self, column_id: &str) -> Option<SortDirection> {
        self.entries.iter().find(|e| e.column_id == column_id).map(|e| e.direction)
    }

    /// Sets or removes (`None`) the key for a column, keeping its priority slot.
    pub fn set(&mut self, column_id: &str, direction: Option<SortDirection>) {
        let pos = self.entries.iter().position(|e| e.column_id == column_id);
        match (pos, direction) {
            (Some(i), Some(d)) => self.entries[i].direction = d,
            (Some(i), None) => {
                self.entries.remove(i);
            }
            (None, Some(d)) => self.entries.push(SortEntry::new(column_id, d)),
            (None, None) => {}
        }
    }

    /// Cycles a column asc -> desc -> unsorted. Without `multi` the column
    /// becomes the only key.
    pub fn toggle(&mut self, column_id: &str, multi: bool) {
        let next = match self.direction_of(column_id) {
            None => Some(SortDirection::Asc),
            Some(SortDirection::Asc) => Some(SortDirection::Desc),
            Some(SortDirection::Desc) => None,
        };
        if !multi {
            self.entries.retain(|e| e.column_id == column_id);
        }
        self.set(column_id, next);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

// ============================================================================
// SORTING
// ============================================================================

struct ResolvedKey<'a> {
    column: &'a Column,
    direction: SortDirection,
    comparator: Option<&'a ValueComparator>,
}

/// Orders two values for one key.
fn compare_for_key(a: &CellValue, b: &CellValue, key: &ResolvedKey<'_>) -> Ordering {
    if let Some(custom) = key.comparator {
        return key.direction.apply(custom(a, b));
    }
    match (a.is_empty(), b.is_empty()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => key.direction.apply(compare_values(a, b)),
    }
}

/// Returns `indices` reordered by the sort model. The input is not modified.
/// Ties keep their relative input order.
pub fn sort_indices(
    rows: &[RowRef],
    indices: &[usize],
    columns: &[Column],
    column_index: &ColumnIndex,
    model: &SortModel,
) -> Vec<usize> {
    let keys: Vec<ResolvedKey<'_>> = model
        .entries()
        .iter()
        .filter_map(|entry| {
            let column = column_index.position(&entry.column_id).and_then(|p| columns.get(p));
            if column.is_none() {
                log_debug!("SORT", "no column '{}', skipping sort key", entry.column_id);
            }
            column.map(|column| ResolvedKey {
                column,
                direction: entry.direction,
                comparator: column.comparator.as_ref(),
            })
        })
        .collect();

    if keys.is_empty() {
        return indices.to_vec();
    }
    log_enter!("SORT", "sort_indices", "rows={} keys={}", indices.len(), keys.len());

    let mut decorated: Vec<(Vec<CellValue>, usize)> = indices
        .iter()
        .filter_map(|&i| {
            let row = rows.get(i)?;
            Some((keys.iter().map(|k| k.column.value(row)).collect(), i))
        })
        .collect();

    decorated.sort_by(|(a, _), (b, _)| {
        keys.iter()
            .zip(a.iter().zip(b.iter()))
            .map(|(key, (va, vb))| compare_for_key(va, vb, key))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });

    log_exit!("SORT", "sort_indices");
    decorated.into_iter().map(|(_, i)| i).collect()
}

/// Returns a new, sorted row vector. The input slice is not modified.
pub fn sort_rows(rows: &[RowRef], columns: &[Column], model: &SortModel) -> Vec<RowRef> {
    let index = ColumnIndex::new(columns);
    let all: Vec<usize> = (0..rows.len()).collect();
    sort_indices(rows, &all, columns, &index, model)
        .into_iter()
        .map(|i| rows[i].clone())
        .collect()
}
