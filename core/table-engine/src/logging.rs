//! FILENAME: core/table-engine/src/logging.rs
//! PURPOSE: Category-based logging macros shared by every engine component.
//! CONTEXT: Lines go through the `log` facade with the category as the
//! target, so the host decides where they end up (file, console, nothing).
//! The engine keeps no logger state of its own.
//!
//! Categories in use: FILTER, SORT, GROUP, SELECT, CLIPBOARD, UNDO, PIPELINE, COMMAND.

use std::sync::atomic::{AtomicU64, Ordering};

pub use log::Level;

/// Sequence counter so interleaved lines from several grids can be ordered.
static LOG_SEQ: AtomicU64 = AtomicU64::new(0);

/// Get next sequence number
pub fn next_seq() -> u64 {
    LOG_SEQ.fetch_add(1, Ordering::Relaxed) + 1
}

// ============================================================================
// WRITERS
// ============================================================================

/// Write a log line in unified format: `seq|category|message`.
pub fn write_log(level: Level, category: &str, args: std::fmt::Arguments<'_>) {
    let logger = log::logger();
    let metadata = log::Metadata::builder().level(level).target(category).build();
    if !logger.enabled(&metadata) {
        return;
    }
    logger.log(
        &log::Record::builder()
            .metadata(metadata)
            .args(format_args!("{}|{}|{}", next_seq(), category, args))
            .module_path_static(Some(module_path!()))
            .build(),
    );
}

/// Write an ENTER log line for function entry
pub fn write_log_enter(level: Level, category: &str, func_name: &str, params: std::fmt::Arguments<'_>) {
    write_log(level, category, format_args!("ENTER {} {}", func_name, params));
}

/// Write an EXIT log line for function exit
pub fn write_log_exit(level: Level, category: &str, func_name: &str, result: std::fmt::Arguments<'_>) {
    write_log(level, category, format_args!("EXIT {} {}", func_name, result));
}

// ============================================================================
// MACROS
// ============================================================================

#[macro_export]
macro_rules! log_debug {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::write_log($crate::logging::Level::Debug, $cat, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::write_log($crate::logging::Level::Info, $cat, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::write_log($crate::logging::Level::Warn, $cat, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::write_log($crate::logging::Level::Error, $cat, format_args!($($arg)*))
    };
}

// ENTER/EXIT macros for function tracing

#[macro_export]
macro_rules! log_enter {
    ($cat:expr, $func:expr) => {
        $crate::logging::write_log_enter($crate::logging::Level::Debug, $cat, $func, format_args!(""))
    };
    ($cat:expr, $func:expr, $($arg:tt)*) => {
        $crate::logging::write_log_enter($crate::logging::Level::Debug, $cat, $func, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_exit {
    ($cat:expr, $func:expr) => {
        $crate::logging::write_log_exit($crate::logging::Level::Debug, $cat, $func, format_args!(""))
    };
    ($cat:expr, $func:expr, $($arg:tt)*) => {
        $crate::logging::write_log_exit($crate::logging::Level::Debug, $cat, $func, format_args!($($arg)*))
    };
}
