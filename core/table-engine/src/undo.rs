//! FILENAME: core/table-engine/src/undo.rs
//! PURPOSE: Bounded, linear undo/redo history of cell edits.
//! CONTEXT: Records address the *raw* row index (position in the caller's
//! row array), never the displayed position, so an undo after re-sorting or
//! re-filtering still hits the row that was edited. Several edits can be
//! grouped into one transaction that undoes and redoes as a unit.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::cell::CellValue;
use crate::config::DEFAULT_UNDO_CAPACITY;
use crate::{log_debug, log_warn};

/// One cell edit: (raw row index, column id, old value, new value).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditRecord {
    pub row_index: usize,
    pub column_id: String,
    pub old_value: CellValue,
    pub new_value: CellValue,
}

impl EditRecord {
    pub fn new(row_index: usize, column_id: impl Into<String>, old_value: CellValue, new_value: CellValue) -> Self {
        EditRecord {
            row_index,
            column_id: column_id.into(),
            old_value,
            new_value,
        }
    }
}

/// A transaction groups multiple edits into one undoable action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Human-readable description (e.g., "Paste 10 cells")
    pub description: String,
    /// Edits in the order they were applied
    pub edits: Vec<EditRecord>,
}

impl Transaction {
    pub fn new(description: impl Into<String>) -> Self {
        Transaction {
            description: description.into(),
            edits: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}

/// Where undo/redo writes values back to.
pub trait EditTarget {
    /// Writes `value` into the cell. Returns false if the row no longer exists.
    fn write_value(&mut self, row_index: usize, column_id: &str, value: &CellValue) -> bool;
}

/// The history stacks for undo/redo operations.
#[derive(Debug, Clone)]
pub struct EditLog {
    /// Completed transactions that can be undone (most recent at back)
    undo_stack: VecDeque<Transaction>,
    /// Transactions that were undone and can be redone (most recent at back)
    redo_stack: VecDeque<Transaction>,
    /// Currently open transaction being built
    current_transaction: Option<Transaction>,
    max_size: usize,
}

impl EditLog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_UNDO_CAPACITY)
    }

    pub fn with_capacity(max_size: usize) -> Self {
        let max_size = max_size.max(1);
        EditLog {
            undo_stack: VecDeque::with_capacity(max_size),
            redo_stack: VecDeque::with_capacity(max_size),
            current_transaction: None,
            max_size,
        }
    }

    pub fn capacity(&self) -> usize {
        self.max_size
    }

    // ========================================================================
    // RECORDING
    // ========================================================================

    /// Begin a transaction. Nested calls are ignored.
    pub fn begin_transaction(&mut self, description: impl Into<String>) {
        if self.current_transaction.is_none() {
            self.current_transaction = Some(Transaction::new(description));
        }
    }

    /// Commit the open transaction. Empty transactions are dropped.
    pub fn commit_transaction(&mut self) {
        if let Some(transaction) = self.current_transaction.take() {
            if !transaction.is_empty() {
                self.push_transaction(transaction);
            }
        }
    }

    /// Drops the open transaction. Its edits are not undone; the caller
    /// restores them if needed.
    pub fn cancel_transaction(&mut self) -> Option<Transaction> {
        self.current_transaction.take()
    }

    pub fn in_transaction(&self) -> bool {
        self.current_transaction.is_some()
    }

    /// Records an edit. Outside a transaction it becomes a one-edit transaction.
    pub fn push(&mut self, edit: EditRecord) {
        if let Some(ref mut transaction) = self.current_transaction {
            transaction.edits.push(edit);
        } else {
            let mut transaction = Transaction::new(format!("Edit {} (row {})", edit.column_id, edit.row_index));
            transaction.edits.push(edit);
            self.push_transaction(transaction);
        }
    }

    /// New history always invalidates the redo stack.
    fn push_transaction(&mut self, transaction: Transaction) {
        self.redo_stack.clear();
        Self::push_bounded(&mut self.undo_stack, transaction, self.max_size);
    }

    fn push_bounded(stack: &mut VecDeque<Transaction>, transaction: Transaction, max_size: usize) {
        while stack.len() >= max_size {
            stack.pop_front();
        }
        stack.push_back(transaction);
    }

    // ========================================================================
    // UNDO / REDO
    // ========================================================================

    /// Moves the latest transaction to the redo stack and returns it.
    /// The caller applies the old values, last edit first.
    pub fn undo(&mut self) -> Option<Transaction> {
        let transaction = self.undo_stack.pop_back()?;
        Self::push_bounded(&mut self.redo_stack, transaction.clone(), self.max_size);
        Some(transaction)
    }

    /// Moves the latest undone transaction back to the undo stack and returns it.
    /// The caller applies the new values, first edit first.
    pub fn redo(&mut self) -> Option<Transaction> {
        let transaction = self.redo_stack.pop_back()?;
        Self::push_bounded(&mut self.undo_stack, transaction.clone(), self.max_size);
        Some(transaction)
    }

    /// Undo and write the old values into `target`. Edits whose row is gone
    /// are skipped; the transaction still moves to the redo stack.
    pub fn undo_into<T: EditTarget + ?Sized>(&mut self, target: &mut T) -> Option<Transaction> {
        let transaction = self.undo()?;
        for edit in transaction.edits.iter().rev() {
            if !target.write_value(edit.row_index, &edit.column_id, &edit.old_value) {
                log_warn!("UNDO", "undo target row {} no longer exists, skipped", edit.row_index);
            }
        }
        log_debug!("UNDO", "undid '{}' ({} edits)", transaction.description, transaction.edits.len());
        Some(transaction)
    }

    /// Redo and write the new values into `target`.
    pub fn redo_into<T: EditTarget + ?Sized>(&mut self, target: &mut T) -> Option<Transaction> {
        let transaction = self.redo()?;
        for edit in &transaction.edits {
            if !target.write_value(edit.row_index, &edit.column_id, &edit.new_value) {
                log_warn!("UNDO", "redo target row {} no longer exists, skipped", edit.row_index);
            }
        }
        log_debug!("UNDO", "redid '{}' ({} edits)", transaction.description, transaction.edits.len());
        Some(transaction)
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get description of next undo action (for UI).
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.back().map(|t| t.description.as_str())
    }

    /// Get description of next redo action (for UI).
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.back().map(|t| t.description.as_str())
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_transaction = None;
    }

    /// (undo, redo) stack sizes.
    pub fn stack_sizes(&self) -> (usize, usize) {
        (self.undo_stack.len(), self.redo_stack.len())
    }
}

impl Default for EditLog {
    fn default() -> Self {
        Self::new()
    }
}
