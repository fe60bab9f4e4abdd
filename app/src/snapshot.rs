//! FILENAME: app/src/snapshot.rs
//! Immutable state handed to subscribers after every change.

use std::sync::Arc;

use serde::Serialize;
use table_engine::SelectionModel;

use crate::view::ProcessedView;

/// Undo/redo availability for the UI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UndoState {
    pub can_undo: bool,
    pub can_redo: bool,
    pub undo_description: Option<String>,
    pub redo_description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GridSnapshot {
    pub view: Arc<ProcessedView>,
    pub selection: SelectionModel,
    pub undo: UndoState,
    /// Increments on every notification.
    pub revision: u64,
}

impl GridSnapshot {
    /// Selected rows against the snapshot's own view length.
    pub fn selected_row_count(&self) -> usize {
        self.selection.selected_row_count(self.view.total_len())
    }
}

/// Handle returned by `GridState::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);
