//! FILENAME: app/src/error.rs
//! Intents the grid rejects. Returned as `Result`, never panics.

use table_engine::ClipboardError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("unknown column '{0}'")]
    UnknownColumn(String),
    #[error("row {row} is out of range (view has {len} rows)")]
    RowOutOfRange { row: usize, len: usize },
    #[error("column '{0}' is not editable")]
    NotEditable(String),
    #[error("row {0} is a group row")]
    GroupRow(usize),
    #[error("row {0} is not a group row")]
    NotAGroup(usize),
    #[error("no active cell")]
    NoActiveCell,
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
}
