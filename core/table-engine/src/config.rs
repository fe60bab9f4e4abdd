//! FILENAME: core/table-engine/src/config.rs
//! PURPOSE: Engine-wide tunables.
//! CONTEXT: One `EngineConfig` is handed to each grid at construction.
//! Every field has a default so partial JSON documents are accepted.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_SELECT_ALL_THRESHOLD: usize = 100_000;
pub const DEFAULT_UNDO_CAPACITY: usize = 100;
pub const DEFAULT_NAVIGATION_PAGE_ROWS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Above this many rows "select all" sets the all-selected marker
    /// instead of materializing every row index.
    pub select_all_threshold: usize,
    /// Maximum number of entries on each of the undo and redo stacks.
    pub undo_capacity: usize,
    /// Rows per page. 0 shows everything on one page.
    pub page_size: usize,
    /// Whether copies include a header line with the column headers.
    pub copy_include_headers: bool,
    /// PageUp/PageDown step when pagination is off.
    pub navigation_page_rows: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            select_all_threshold: DEFAULT_SELECT_ALL_THRESHOLD,
            undo_capacity: DEFAULT_UNDO_CAPACITY,
            page_size: 0,
            copy_include_headers: false,
            navigation_page_rows: DEFAULT_NAVIGATION_PAGE_ROWS,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.undo_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "undoCapacity",
                message: "must be at least 1".to_string(),
            });
        }
        if self.navigation_page_rows == 0 {
            return Err(ConfigError::InvalidValue {
                field: "navigationPageRows",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
