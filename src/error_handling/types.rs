//! Error type definitions.
//!
//! This module defines all error types and the error categories counted in
//! run statistics.

use std::path::PathBuf;

use chrono::NaiveDate;
use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use reqwest::StatusCode;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

use crate::config::HTTP_STATUS_TOO_MANY_REQUESTS;

/// Error types for initialization failures. Any of these aborts a run.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// The archive base directory could not be created.
    #[error("Cannot create base directory {path}: {source}")]
    BaseDirError {
        /// Directory that could not be created
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

/// Invalid command-line configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A date argument matched none of the accepted formats.
    #[error("Invalid date: {0} (expected YYYY-MM-DD)")]
    InvalidDate(String),

    /// Only one of start/end was given.
    #[error("--start-date and --end-date must be given together")]
    IncompleteRange,

    /// Start date after end date.
    #[error("Start date {start} is after end date {end}")]
    InvertedRange {
        /// Requested start
        start: NaiveDate,
        /// Requested end
        end: NaiveDate,
    },
}

/// Errors reading or writing the download history file.
#[derive(Error, Debug)]
pub enum HistoryError {
    /// File system failure.
    #[error("History file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid history JSON.
    #[error("History file is malformed: {0}")]
    Json(#[from] serde_json::Error),

    /// Atomic replace of the history file failed.
    #[error("Could not replace history file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Errors fetching a single photo.
#[derive(Error, Debug)]
pub enum DownloadError {
    /// Transport-level failure (connect, timeout, body read, ...).
    #[error("Request failed: {0}")]
    Transport(#[from] ReqwestError),

    /// Non-success HTTP status.
    #[error("HTTP status {0}")]
    HttpStatus(StatusCode),

    /// Response content type is not `image/*`.
    #[error("Not an image (content-type: {0:?})")]
    NotAnImage(String),

    /// Declared content length is too small to be a photo.
    #[error("Declared size {declared} bytes is below the {minimum} byte minimum")]
    TooSmall {
        /// Content-Length sent by the server
        declared: u64,
        /// Configured minimum
        minimum: u64,
    },

    /// The written file does not decode as an image.
    #[error("Downloaded file is not a valid image: {0}")]
    CorruptImage(String),

    /// Local file system failure.
    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),
}

impl DownloadError {
    /// Whether another attempt might succeed.
    ///
    /// Timeouts, connection failures, interrupted bodies, 5xx and 429 are
    /// transient. Client errors, wrong content and local I/O are not.
    pub fn is_retriable(&self) -> bool {
        match self {
            DownloadError::Transport(err) => {
                if let Some(status) = err.status() {
                    return is_retriable_status(status);
                }
                if err.is_timeout() || err.is_connect() || err.is_request() || err.is_body() {
                    return true;
                }
                !(err.is_redirect() || err.is_decode() || err.is_builder())
            }
            DownloadError::HttpStatus(status) => is_retriable_status(*status),
            DownloadError::NotAnImage(_)
            | DownloadError::TooSmall { .. }
            | DownloadError::CorruptImage(_)
            | DownloadError::Io(_) => false,
        }
    }
}

fn is_retriable_status(status: StatusCode) -> bool {
    status.as_u16() == HTTP_STATUS_TOO_MANY_REQUESTS || status.is_server_error()
}

/// Categories of download failures, counted per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    // Transient network errors
    /// Request timed out
    HttpRequestTimeoutError,
    /// Could not connect
    HttpRequestConnectError,
    /// Response body could not be read
    HttpRequestBodyError,
    /// 429
    HttpRequestTooManyRequests,
    /// 5xx
    HttpRequestServerError,
    // Permanent HTTP errors
    /// 4xx except 429
    HttpRequestClientError,
    /// Too many or invalid redirects
    HttpRequestRedirectError,
    /// Any other HTTP failure
    HttpRequestOtherError,
    // Content errors
    /// Content type is not `image/*`
    NotAnImage,
    /// Declared size below the minimum
    BodyTooSmall,
    /// File does not decode as an image
    CorruptImage,
    // Local errors
    /// Local file system failure
    FileSystemError,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    /// Label used in summaries.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::HttpRequestTimeoutError => "HTTP request timeout",
            ErrorType::HttpRequestConnectError => "HTTP connect error",
            ErrorType::HttpRequestBodyError => "HTTP body read error",
            ErrorType::HttpRequestTooManyRequests => "Too many requests (429)",
            ErrorType::HttpRequestServerError => "Server error (5xx)",
            ErrorType::HttpRequestClientError => "Client error (4xx)",
            ErrorType::HttpRequestRedirectError => "HTTP redirect error",
            ErrorType::HttpRequestOtherError => "HTTP request other error",
            ErrorType::NotAnImage => "Response is not an image",
            ErrorType::BodyTooSmall => "Response too small to be a photo",
            ErrorType::CorruptImage => "Corrupt image",
            ErrorType::FileSystemError => "File system error",
        }
    }
}
