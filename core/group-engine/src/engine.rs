//! FILENAME: core/group-engine/src/engine.rs
//! Grouping Engine - partitions rows into a tree of groups.
//!
//! Algorithm:
//! 1. Partition the incoming (already filtered and sorted) raw indices by
//!    the first grouping column. Groups appear in the order their first row
//!    appears, so sorting by a grouping column orders the groups.
//! 2. For a group whose path is expanded and that has grouping columns left,
//!    partition its rows again by the next column.
//! 3. Aggregate every column that has an aggregation over ALL leaf rows of
//!    the group, whether or not they are currently shown.
//!
//! The tree is rebuilt from scratch on every call; nothing is cached.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use table_engine::{log_debug, log_enter, log_exit, Aggregation, CellValue, Column, ColumnIndex, RowRef};

use crate::accumulator::AggregateAccumulator;
use crate::definition::{GroupKey, GroupPath, GroupingModel};

// ============================================================================
// TREE TYPES
// ============================================================================

/// What sits directly under a group.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupChildren {
    /// Raw row indices, in view order.
    Rows(Vec<usize>),
    Groups(Vec<GroupNode>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupNode {
    pub key: GroupKey,
    /// Keys from the outermost group down to this one.
    pub path: GroupPath,
    /// Grouping column this node partitions on.
    pub column_id: String,
    pub depth: usize,
    pub children: GroupChildren,
    /// All leaf rows below this node, expanded or not.
    pub leaf_count: usize,
    /// Column id -> aggregate value.
    pub aggregations: BTreeMap<String, CellValue>,
    pub expanded: bool,
}

impl GroupNode {
    pub fn label(&self) -> String {
        self.key.label()
    }

    /// Immediate child groups (empty when the children are rows).
    pub fn child_groups(&self) -> &[GroupNode] {
        match &self.children {
            GroupChildren::Groups(groups) => groups,
            GroupChildren::Rows(_) => &[],
        }
    }

    /// Raw indices of every leaf row below this node, in view order.
    pub fn leaf_indices(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.leaf_count);
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves(&self, out: &mut Vec<usize>) {
        match &self.children {
            GroupChildren::Rows(rows) => out.extend_from_slice(rows),
            GroupChildren::Groups(groups) => groups.iter().for_each(|g| g.collect_leaves(out)),
        }
    }

    pub fn aggregate(&self, column_id: &str) -> Option<&CellValue> {
        self.aggregations.get(column_id)
    }
}

// ============================================================================
// BUILD
// ============================================================================

/// Resolved grouping columns plus the columns that aggregate.
struct GroupContext<'a> {
    rows: &'a [RowRef],
    levels: Vec<&'a Column>,
    aggregated: Vec<(&'a Column, &'a Aggregation)>,
    model: &'a GroupingModel,
}

/// Builds the group tree over `indices` (raw row indices in view order).
/// Returns an empty tree when no grouping column resolves.
pub fn group_rows(
    rows: &[RowRef],
    indices: &[usize],
    columns: &[Column],
    column_index: &ColumnIndex,
    model: &GroupingModel,
) -> Vec<GroupNode> {
    let levels = resolve_levels(columns, column_index, model);
    if levels.is_empty() {
        return Vec::new();
    }
    log_enter!("GROUP", "group_rows", "rows={} levels={}", indices.len(), levels.len());

    let context = GroupContext {
        rows,
        levels,
        aggregated: columns
            .iter()
            .filter_map(|c| c.aggregation.as_ref().map(|a| (c, a)))
            .collect(),
        model,
    };
    let roots = build_level(&context, indices, 0, &GroupPath::new());

    log_exit!("GROUP", "group_rows", "groups={}", roots.len());
    roots
}

fn resolve_levels<'a>(columns: &'a [Column], column_index: &ColumnIndex, model: &GroupingModel) -> Vec<&'a Column> {
    model
        .group_by()
        .iter()
        .filter_map(|id| {
            let column = column_index.position(id).and_then(|p| columns.get(p));
            if column.is_none() {
                log_debug!("GROUP", "no column '{}', skipping grouping level", id);
            }
            column
        })
        .collect()
}

/// Splits `indices` by the value of `column`, keeping first-appearance order.
fn partition(rows: &[RowRef], indices: &[usize], column: &Column) -> Vec<(GroupKey, Vec<usize>)> {
    let mut positions: FxHashMap<GroupKey, usize> = FxHashMap::default();
    let mut partitions: Vec<(GroupKey, Vec<usize>)> = Vec::new();
    for &i in indices {
        let Some(row) = rows.get(i) else {
            continue;
        };
        let key = GroupKey::from_value(&column.value(row));
        match positions.get(&key) {
            Some(&pos) => partitions[pos].1.push(i),
            None => {
                positions.insert(key.clone(), partitions.len());
                partitions.push((key, vec![i]));
            }
        }
    }
    partitions
}

fn build_level(context: &GroupContext<'_>, indices: &[usize], level: usize, parent_path: &GroupPath) -> Vec<GroupNode> {
    let column = context.levels[level];
    partition(context.rows, indices, column)
        .into_iter()
        .map(|(key, members)| {
            let mut path = parent_path.clone();
            path.push(key.clone());
            let expanded = context.model.is_expanded(&path);
            let aggregations = aggregate(context, &members);
            let leaf_count = members.len();

            let children = if expanded && level + 1 < context.levels.len() {
                GroupChildren::Groups(build_level(context, &members, level + 1, &path))
            } else {
                GroupChildren::Rows(members)
            };

            GroupNode {
                key,
                path,
                column_id: column.id.clone(),
                depth: level,
                children,
                leaf_count,
                aggregations,
                expanded,
            }
        })
        .collect()
}

fn aggregate(context: &GroupContext<'_>, members: &[usize]) -> BTreeMap<String, CellValue> {
    context
        .aggregated
        .iter()
        .map(|(column, aggregation)| {
            let values = members.iter().filter_map(|&i| context.rows.get(i)).map(|row| column.value(row));
            let result = match aggregation {
                Aggregation::Builtin(kind) => {
                    let mut acc = AggregateAccumulator::new();
                    values.for_each(|v| acc.add(&v));
                    acc.result(*kind)
                }
                Aggregation::Custom(f) => f(&values.collect::<Vec<_>>()),
            };
            (column.id.clone(), result)
        })
        .collect()
}

/// Every group path present in the data, expanded or not. Used by "expand all".
pub fn all_group_paths(
    rows: &[RowRef],
    indices: &[usize],
    columns: &[Column],
    column_index: &ColumnIndex,
    model: &GroupingModel,
) -> Vec<GroupPath> {
    let levels = resolve_levels(columns, column_index, model);
    let mut paths = Vec::new();
    collect_paths(rows, indices, &levels, 0, &SmallVec::new(), &mut paths);
    paths
}

fn collect_paths(
    rows: &[RowRef],
    indices: &[usize],
    levels: &[&Column],
    level: usize,
    parent: &GroupPath,
    out: &mut Vec<GroupPath>,
) {
    let Some(column) = levels.get(level) else {
        return;
    };
    for (key, members) in partition(rows, indices, column) {
        let mut path = parent.clone();
        path.push(key);
        collect_paths(rows, &members, levels, level + 1, &path, out);
        out.push(path);
    }
}
