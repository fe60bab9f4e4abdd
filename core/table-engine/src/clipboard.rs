//! FILENAME: core/table-engine/src/clipboard.rs
//! PURPOSE: Tab/newline text codec for rectangular cell ranges, plus the
//! clipboard I/O boundary.
//! CONTEXT: Cells are tab-separated, rows newline-separated. Text is written
//! verbatim: an embedded tab or newline is not quoted and will split the cell
//! on the way back in. Reading sniffs booleans and numbers; a number is only
//! accepted if formatting it again gives back the exact token, so "007" or
//! "1.50" stay text.
//!
//! Log lines never include clipboard contents, only sizes.

use crate::cell::{format_number, CellValue};
use crate::column::Column;
use crate::coord::CellRange;
use crate::error::ClipboardError;
use crate::{log_debug, log_warn};

/// Largest text payload accepted from the clipboard.
pub const MAX_TEXT_BYTES: usize = 10 * 1024 * 1024;

// ============================================================================
// SERIALIZE
// ============================================================================

/// Joins a value matrix into clipboard text.
pub fn serialize_values(matrix: &[Vec<CellValue>]) -> String {
    matrix
        .iter()
        .map(|row| row.iter().map(CellValue::display_value).collect::<Vec<_>>().join("\t"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Serializes `range` in column order. `value_at(view_row, column)` returns
/// `None` for cells that have no value (group rows); those are written empty.
pub fn serialize_range<F>(range: &CellRange, columns: &[Column], include_headers: bool, value_at: F) -> String
where
    F: Fn(usize, &Column) -> Option<CellValue>,
{
    let end_col = range.end_col().min(columns.len().saturating_sub(1));
    let span = columns.get(range.start_col()..=end_col).unwrap_or(&[]);

    let mut lines: Vec<String> = Vec::with_capacity(range.row_count() + 1);
    if include_headers {
        lines.push(span.iter().map(Column::header_text).collect::<Vec<_>>().join("\t"));
    }
    for row in range.start.row..=range.end.row {
        let cells: Vec<String> = span
            .iter()
            .map(|column| value_at(row, column).map(|v| v.display_value()).unwrap_or_default())
            .collect();
        lines.push(cells.join("\t"));
    }

    let text = lines.join("\n");
    log_debug!("CLIPBOARD", "serialized {} rows x {} cols ({} bytes)", range.row_count(), span.len(), text.len());
    text
}

// ============================================================================
// DESERIALIZE
// ============================================================================

/// Splits clipboard text into a value matrix. `\r` is ignored and a single
/// trailing newline does not produce an extra row.
pub fn deserialize(text: &str) -> Vec<Vec<CellValue>> {
    let normalized = text.replace('\r', "");
    let mut lines: Vec<&str> = normalized.split('\n').collect();
    if lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
        .into_iter()
        .map(|line| line.split('\t').map(sniff_cell).collect())
        .collect()
}

/// Light type sniffing for a single pasted token.
pub fn sniff_cell(token: &str) -> CellValue {
    match token {
        "" => return CellValue::Empty,
        "true" => return CellValue::Boolean(true),
        "false" => return CellValue::Boolean(false),
        _ => {}
    }
    let looks_numeric = token
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || c == '-' || c == '.');
    if looks_numeric {
        if let Ok(n) = token.parse::<f64>() {
            if n.is_finite() && format_number(n) == token {
                return CellValue::Number(n);
            }
        }
    }
    CellValue::Text(token.to_string())
}

// ============================================================================
// CLIPBOARD I/O
// ============================================================================

/// Access to a system clipboard. Every call may fail.
pub trait ClipboardBackend: Send {
    fn read_text(&mut self) -> Result<String, ClipboardError>;
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Process-local clipboard, used in tests and headless hosts.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    contents: String,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }
}

impl ClipboardBackend for MemoryClipboard {
    fn read_text(&mut self) -> Result<String, ClipboardError> {
        Ok(self.contents.clone())
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if text.len() > MAX_TEXT_BYTES {
            return Err(ClipboardError::InvalidPayload(format!("{} bytes exceeds limit", text.len())));
        }
        self.contents = text.to_string();
        Ok(())
    }
}

/// Stand-in for platforms without clipboard access. Every call fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoClipboard;

impl ClipboardBackend for NoClipboard {
    fn read_text(&mut self) -> Result<String, ClipboardError> {
        Err(ClipboardError::UnsupportedPlatform)
    }

    fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::UnsupportedPlatform)
    }
}

/// Reads and decodes the clipboard. Oversized payloads are rejected.
pub fn read_matrix(backend: &mut dyn ClipboardBackend) -> Result<Vec<Vec<CellValue>>, ClipboardError> {
    let text = backend.read_text()?;
    if text.len() > MAX_TEXT_BYTES {
        log_warn!("CLIPBOARD", "clipboard text of {} bytes exceeds limit", text.len());
        return Err(ClipboardError::InvalidPayload(format!("{} bytes exceeds limit", text.len())));
    }
    Ok(deserialize(&text))
}
