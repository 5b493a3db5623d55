//! Main application modules.
//!
//! This module provides summary printing for download runs and the history
//! maintenance commands used by the binary.

pub mod maintenance;
pub mod statistics;

// Re-export public API
pub use maintenance::{clean_duplicates, plan_duplicate_cleanup, rebuild_index, show_stats};
pub use statistics::print_run_summary;
