//! Download history.
//!
//! This module provides:
//! - The persisted record types and JSON layout
//! - `HistoryStore`, the single owner of records and the content-hash index
//! - Duplicate cleanup planning and execution

pub mod cleanup;
mod store;
mod types;

// Re-export public API
pub use cleanup::{CleanupPlan, CleanupReport, DuplicateGroup, PlannedDeletion};
pub use store::HistoryStore;
pub use types::{
    record_key, BackfillReport, DownloadRecord, HashIndexEntry, HistoryFile, HistoryStats,
};
