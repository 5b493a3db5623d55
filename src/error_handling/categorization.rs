//! Error categorization.
//!
//! Maps download failures onto the `ErrorType` counters shown in the run summary.

use super::stats::ProcessingStats;
use super::types::{DownloadError, ErrorType};
use crate::config::HTTP_STATUS_TOO_MANY_REQUESTS;

/// Categorizes a `reqwest::Error` into an `ErrorType`.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> ErrorType {
    if let Some(status) = error.status() {
        return categorize_status(status);
    }

    if error.is_timeout() {
        ErrorType::HttpRequestTimeoutError
    } else if error.is_connect() {
        ErrorType::HttpRequestConnectError
    } else if error.is_body() || error.is_decode() {
        ErrorType::HttpRequestBodyError
    } else if error.is_redirect() {
        ErrorType::HttpRequestRedirectError
    } else {
        ErrorType::HttpRequestOtherError
    }
}

fn categorize_status(status: reqwest::StatusCode) -> ErrorType {
    match status.as_u16() {
        HTTP_STATUS_TOO_MANY_REQUESTS => ErrorType::HttpRequestTooManyRequests,
        _ if status.is_server_error() => ErrorType::HttpRequestServerError,
        _ if status.is_client_error() => ErrorType::HttpRequestClientError,
        _ => ErrorType::HttpRequestOtherError,
    }
}

/// Categorizes any download failure.
pub fn categorize_download_error(error: &DownloadError) -> ErrorType {
    match error {
        DownloadError::Transport(err) => categorize_reqwest_error(err),
        DownloadError::HttpStatus(status) => categorize_status(*status),
        DownloadError::NotAnImage(_) => ErrorType::NotAnImage,
        DownloadError::TooSmall { .. } => ErrorType::BodyTooSmall,
        DownloadError::CorruptImage(_) => ErrorType::CorruptImage,
        DownloadError::Io(_) => ErrorType::FileSystemError,
    }
}

/// Records a download failure in the run statistics.
pub fn update_error_stats(stats: &ProcessingStats, error: &DownloadError) {
    stats.increment_error(categorize_download_error(error));
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_categorize_status_codes() {
        assert_eq!(
            categorize_download_error(&DownloadError::HttpStatus(StatusCode::TOO_MANY_REQUESTS)),
            ErrorType::HttpRequestTooManyRequests
        );
        assert_eq!(
            categorize_download_error(&DownloadError::HttpStatus(StatusCode::BAD_GATEWAY)),
            ErrorType::HttpRequestServerError
        );
        assert_eq!(
            categorize_download_error(&DownloadError::HttpStatus(StatusCode::NOT_FOUND)),
            ErrorType::HttpRequestClientError
        );
    }

    #[test]
    fn test_categorize_content_errors() {
        assert_eq!(
            categorize_download_error(&DownloadError::NotAnImage("text/html".into())),
            ErrorType::NotAnImage
        );
        assert_eq!(
            categorize_download_error(&DownloadError::TooSmall {
                declared: 10,
                minimum: 1024
            }),
            ErrorType::BodyTooSmall
        );
        assert_eq!(
            categorize_download_error(&DownloadError::CorruptImage("bad header".into())),
            ErrorType::CorruptImage
        );
    }

    #[test]
    fn test_update_error_stats() {
        let stats = ProcessingStats::new();
        update_error_stats(&stats, &DownloadError::NotAnImage("text/html".into()));
        update_error_stats(&stats, &DownloadError::NotAnImage("text/plain".into()));
        assert_eq!(stats.get_error_count(ErrorType::NotAnImage), 2);
        assert_eq!(stats.total_errors(), 2);
    }
}
