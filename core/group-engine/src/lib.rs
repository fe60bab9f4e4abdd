//! FILENAME: core/group-engine/src/lib.rs
//! Grouping & aggregation subsystem for the table engine.
//!
//! Layers:
//! - `definition`: Serializable grouping state (what to group by, what is open)
//! - `accumulator`: Running aggregates over a group's leaf values
//! - `engine`: Recursive partitioning into a group tree (HOW we group)
//! - `view`: Flattened display rows for the renderer (WHAT we display)

pub mod accumulator;
pub mod definition;
pub mod engine;
pub mod view;

pub use accumulator::AggregateAccumulator;
pub use definition::{GroupKey, GroupPath, GroupingModel};
pub use engine::{all_group_paths, group_rows, GroupChildren, GroupNode};
pub use view::{flatten, leaves, DisplayRow, GroupSummary};
