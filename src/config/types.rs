//! Configuration types.
//!
//! This module defines the enums and the library `Config` struct. The CLI in
//! `config::cli` maps onto these; library callers can build `Config` directly.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use clap::ValueEnum;

use crate::albums::AlbumType;
use crate::config::constants::*;
use crate::download::RetryPolicy;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// How the photos of one album are ordered before download.
///
/// `Smart` inspects the first filename and picks one of the other three.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum SortOrder {
    /// Classify filenames (hash-named, numbered, other) and order accordingly
    #[default]
    Smart,
    /// Compare embedded numbers by value
    Natural,
    /// Case-insensitive lexical order
    Alphabetical,
    /// Keep the order the site listed them in
    None,
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use photo_archiver::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     base_dir: PathBuf::from("/srv/photos"),
///     new_only: false,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the local archive
    pub base_dir: PathBuf,

    /// JSON download history file
    pub history_file: PathBuf,

    /// Album types to process, in order
    pub album_types: Vec<AlbumType>,

    /// First album date to include
    pub start_date: NaiveDate,

    /// Last album date to include
    pub end_date: NaiveDate,

    /// Only albums flagged as new by the site
    pub new_only: bool,

    /// Title keywords; an album matches if any keyword is contained (case-insensitive)
    pub keywords: Vec<String>,

    /// Photo ordering policy
    pub sort_order: SortOrder,

    /// Reverse the order after applying `sort_order`
    pub sort_reverse: bool,

    /// Photo CDN host trusted for full-resolution URLs
    pub photo_host: String,

    /// Maximum download attempts per photo
    pub max_retries: usize,

    /// First retry delay; doubles on every later attempt
    pub retry_base_delay: Duration,

    /// Cap for a single retry delay
    pub retry_max_delay: Duration,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// Minimum delay between two photo requests
    pub download_delay: Duration,

    /// Pause between albums
    pub album_delay: Duration,

    /// Declared content lengths below this are rejected as error pages
    pub min_image_bytes: u64,

    /// HTTP User-Agent header value
    pub user_agent: String,

    /// List what would be downloaded without writing anything
    pub dry_run: bool,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,
}

impl Config {
    /// Retry policy derived from the retry knobs.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, self.retry_base_delay, self.retry_max_delay)
    }
}

impl Default for Config {
    fn default() -> Self {
        let today = Local::now().date_naive();
        Self {
            base_dir: PathBuf::from(DEFAULT_BASE_DIR),
            history_file: PathBuf::from(DEFAULT_HISTORY_FILE),
            album_types: vec![AlbumType::School, AlbumType::Class],
            start_date: today - chrono::Duration::days(DEFAULT_DAYS_BACK),
            end_date: today,
            new_only: true,
            keywords: Vec::new(),
            sort_order: SortOrder::Smart,
            sort_reverse: false,
            photo_host: DEFAULT_PHOTO_HOST.to_string(),
            max_retries: MAX_RETRIES,
            retry_base_delay: Duration::from_millis(RETRY_BASE_DELAY_MS),
            retry_max_delay: Duration::from_secs(RETRY_MAX_DELAY_SECS),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            download_delay: Duration::from_millis(DOWNLOAD_DELAY_MS),
            album_delay: Duration::from_millis(ALBUM_DELAY_MS),
            min_image_bytes: MIN_IMAGE_BYTES,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            dry_run: false,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}
