//! FILENAME: core/group-engine/src/view.rs
//! Display rows - the flattened, renderable form of a group tree.
//!
//! Flattening is a depth-first walk: a group's summary row, then (only if
//! the group is expanded) its children. A collapsed group contributes just
//! its summary row.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use table_engine::CellValue;

use crate::definition::{GroupKey, GroupPath};
use crate::engine::{GroupChildren, GroupNode};

/// Header row of a group as the renderer sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub key: GroupKey,
    pub label: String,
    pub path: GroupPath,
    pub column_id: String,
    pub depth: usize,
    pub leaf_count: usize,
    pub expanded: bool,
    pub aggregations: BTreeMap<String, CellValue>,
}

impl GroupSummary {
    pub fn from_node(node: &GroupNode) -> Self {
        GroupSummary {
            key: node.key.clone(),
            label: node.label(),
            path: node.path.clone(),
            column_id: node.column_id.clone(),
            depth: node.depth,
            leaf_count: node.leaf_count,
            expanded: node.expanded,
            aggregations: node.aggregations.clone(),
        }
    }
}

/// One line of the processed view: a group header or a data row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DisplayRow {
    Group(Arc<GroupSummary>),
    Leaf { raw_index: usize, depth: usize },
}

impl DisplayRow {
    pub fn raw_index(&self) -> Option<usize> {
        match self {
            DisplayRow::Leaf { raw_index, .. } => Some(*raw_index),
            DisplayRow::Group(_) => None,
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            DisplayRow::Leaf { depth, .. } => *depth,
            DisplayRow::Group(summary) => summary.depth,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, DisplayRow::Group(_))
    }

    pub fn as_group(&self) -> Option<&GroupSummary> {
        match self {
            DisplayRow::Group(summary) => Some(summary),
            DisplayRow::Leaf { .. } => None,
        }
    }
}

/// Ungrouped view: one leaf per raw index.
pub fn leaves(indices: &[usize]) -> Vec<DisplayRow> {
    indices
        .iter()
        .map(|&raw_index| DisplayRow::Leaf { raw_index, depth: 0 })
        .collect()
}

/// Depth-first flattening of a group tree.
pub fn flatten(roots: &[GroupNode]) -> Vec<DisplayRow> {
    let mut out = Vec::new();
    flatten_nodes(roots, &mut out);
    out
}

fn flatten_nodes(nodes: &[GroupNode], out: &mut Vec<DisplayRow>) {
    for node in nodes {
        out.push(DisplayRow::Group(Arc::new(GroupSummary::from_node(node))));
        if !node.expanded {
            continue;
        }
        match &node.children {
            GroupChildren::Rows(rows) => out.extend(
                rows.iter()
                    .map(|&raw_index| DisplayRow::Leaf { raw_index, depth: node.depth + 1 }),
            ),
            GroupChildren::Groups(groups) => flatten_nodes(groups, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::GroupingModel;
    use crate::engine::group_rows;
    use table_engine::{rows_from_json, Column, ColumnIndex, RowRef};

    fn setup() -> (Vec<RowRef>, Vec<Column>, ColumnIndex) {
        let rows = rows_from_json(&serde_json::json!([
            {"region": "north", "city": "a"},
            {"region": "south", "city": "b"},
            {"region": "north", "city": "c"}
        ]));
        let columns = vec![Column::new("region"), Column::new("city")];
        let index = ColumnIndex::new(&columns);
        (rows, columns, index)
    }

    #[test]
    fn collapsed_groups_show_only_summaries() {
        let (rows, columns, index) = setup();
        let tree = group_rows(&rows, &[0, 1, 2], &columns, &index, &GroupingModel::by(&["region"]));
        let view = flatten(&tree);
        assert_eq!(view.len(), 2);
        assert!(view.iter().all(DisplayRow::is_group));
    }

    #[test]
    fn expanded_group_emits_leaves_after_header() {
        let (rows, columns, index) = setup();
        let mut model = GroupingModel::by(&["region"]);
        model.expand(&[GroupKey::from("north")]);
        let view = flatten(&group_rows(&rows, &[0, 1, 2], &columns, &index, &model));

        assert_eq!(view.len(), 4);
        assert_eq!(view[0].as_group().map(|g| g.label.as_str()), Some("north"));
        assert_eq!(view[1], DisplayRow::Leaf { raw_index: 0, depth: 1 });
        assert_eq!(view[2], DisplayRow::Leaf { raw_index: 2, depth: 1 });
        assert_eq!(view[3].as_group().map(|g| g.leaf_count), Some(1));
    }

    #[test]
    fn nested_expansion_walks_depth_first() {
        let (rows, columns, index) = setup();
        let mut model = GroupingModel::by(&["region", "city"]);
        model.expand(&[GroupKey::from("north")]);
        model.expand(&[GroupKey::from("north"), GroupKey::from("c")]);
        let view = flatten(&group_rows(&rows, &[0, 1, 2], &columns, &index, &model));

        let shape: Vec<(bool, usize)> = view.iter().map(|r| (r.is_group(), r.depth())).collect();
        assert_eq!(shape, vec![(true, 0), (true, 1), (true, 1), (false, 2), (true, 0)]);
        assert_eq!(view[3].raw_index(), Some(2));
    }

    #[test]
    fn leaves_without_grouping() {
        assert_eq!(leaves(&[4, 1]), vec![
            DisplayRow::Leaf { raw_index: 4, depth: 0 },
            DisplayRow::Leaf { raw_index: 1, depth: 0 },
        ]);
    }
}
