//! Utility functions.
//!
//! This module provides:
//! - Human-readable formatting for summaries
//! - Regex compilation for the crate's static patterns
//! - Progress bars

pub mod format;
mod progress;

use regex::Regex;

pub use format::{download_speed, format_duration, format_file_size};
pub(crate) use progress::album_progress_bar;

/// Compiles a built-in pattern, logging instead of panicking on failure.
///
/// Callers treat `None` as "pattern never matches".
pub(crate) fn compile_regex(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            log::error!("Failed to compile regex {pattern:?}: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_regex() {
        assert!(compile_regex(r"_([a-f0-9]{32,})\.").is_some());
        assert!(compile_regex(r"(unclosed").is_none());
    }
}
