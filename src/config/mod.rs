//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, limits, layout defaults)
//! - The library `Config` struct and its option enums
//! - CLI parsing types

pub mod cli;
mod constants;
mod types;

// Re-export all constants
pub use cli::{Cli, Command, DownloadArgs, DuplicatesAction};
pub use constants::*;
pub use types::{Config, LogFormat, LogLevel, SortOrder};
