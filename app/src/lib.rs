//! FILENAME: app/src/lib.rs
//! PURPOSE: Orchestrating state for a table view.
//! CONTEXT: `GridState` owns the raw data and every view input, runs the
//! filter/sort/group/paginate pipeline and hands immutable snapshots to
//! subscribers. The leaf components live in `table-engine` and
//! `group-engine`; this crate only wires them together.

pub mod commands;
pub mod error;
pub mod snapshot;
pub mod state;
pub mod view;

pub use commands::GridCommand;
pub use error::GridError;
pub use snapshot::{GridSnapshot, SubscriptionId, UndoState};
pub use state::GridState;
pub use view::{compute_view, PipelineInput, ProcessedView};

pub use group_engine::{DisplayRow, GroupKey, GroupPath, GroupSummary};
pub use table_engine::{
    CellRange, CellRef, CellValue, Column, EngineConfig, FilterEntry, FilterOperator, FilterType, FilterValue,
    NavKey, Row, RowRef, SortDirection, SortEntry,
};
