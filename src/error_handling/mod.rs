//! Error handling and processing statistics.
//!
//! This module provides:
//! - Error type definitions (initialization, configuration, history, download)
//! - Retriability of download failures
//! - Failure categorization and per-category counters

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::update_error_stats;
pub use stats::ProcessingStats;
pub use types::{ConfigError, DownloadError, ErrorType, HistoryError, InitializationError};

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use strum::IntoEnumIterator;

    #[test]
    fn test_processing_stats_initialization() {
        let stats = ProcessingStats::new();
        for error_type in ErrorType::iter() {
            assert_eq!(stats.get_error_count(error_type), 0);
        }
        assert!(stats.non_zero().is_empty());
    }

    #[test]
    fn test_processing_stats_increment() {
        let stats = ProcessingStats::new();
        stats.increment_error(ErrorType::CorruptImage);
        stats.increment_error(ErrorType::CorruptImage);
        stats.increment_error(ErrorType::HttpRequestTimeoutError);
        assert_eq!(stats.get_error_count(ErrorType::CorruptImage), 2);
        assert_eq!(stats.total_errors(), 3);
        assert_eq!(
            stats.non_zero(),
            vec![
                (ErrorType::HttpRequestTimeoutError, 1),
                (ErrorType::CorruptImage, 2)
            ]
        );
    }

    #[test]
    fn test_retriable_statuses() {
        assert!(DownloadError::HttpStatus(StatusCode::SERVICE_UNAVAILABLE).is_retriable());
        assert!(DownloadError::HttpStatus(StatusCode::INTERNAL_SERVER_ERROR).is_retriable());
        assert!(DownloadError::HttpStatus(StatusCode::TOO_MANY_REQUESTS).is_retriable());
        assert!(!DownloadError::HttpStatus(StatusCode::NOT_FOUND).is_retriable());
        assert!(!DownloadError::HttpStatus(StatusCode::FORBIDDEN).is_retriable());
    }

    #[test]
    fn test_content_errors_are_not_retriable() {
        assert!(!DownloadError::NotAnImage("text/html".into()).is_retriable());
        assert!(!DownloadError::TooSmall {
            declared: 12,
            minimum: 1024
        }
        .is_retriable());
        assert!(!DownloadError::CorruptImage("truncated".into()).is_retriable());
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(!DownloadError::Io(io).is_retriable());
    }

    #[test]
    fn test_error_type_display() {
        assert_eq!(ErrorType::NotAnImage.to_string(), "Response is not an image");
        assert_eq!(
            ErrorType::HttpRequestServerError.to_string(),
            "Server error (5xx)"
        );
    }
}
