//! Command-line interface.
//!
//! `clap` derive types for the `photo_archiver` binary. Options that name
//! paths can also come from the environment (a `.env` file is loaded by the
//! binary before parsing).

use std::path::PathBuf;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::albums::{parse_date_arg, AlbumType};
use crate::config::constants::*;
use crate::config::types::{Config, LogFormat, LogLevel, SortOrder};
use crate::error_handling::ConfigError;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "photo_archiver",
    version,
    about = "Downloads school-portal photo albums into a dated local archive"
)]
pub struct Cli {
    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info, global = true)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain, global = true)]
    pub log_format: LogFormat,

    /// Download history file
    #[arg(
        long,
        env = "PHOTO_ARCHIVER_HISTORY_FILE",
        default_value = DEFAULT_HISTORY_FILE,
        global = true
    )]
    pub history_file: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Download albums listed in a manifest
    Download(DownloadArgs),
    /// Show download history statistics
    Stats,
    /// Inspect or remove byte-identical duplicate files
    Duplicates {
        #[command(subcommand)]
        action: DuplicatesAction,
    },
    /// Recompute missing hashes and rebuild the hash index
    RebuildIndex,
}

/// What `duplicates` should do.
#[derive(Debug, Subcommand)]
pub enum DuplicatesAction {
    /// List duplicate groups and reclaimable space
    List,
    /// Show which files a clean would delete
    DryRun,
    /// Delete duplicates (after backing them up)
    Clean {
        /// Where deleted files are copied first (default: a timestamped temp dir)
        #[arg(long)]
        backup_dir: Option<PathBuf>,

        /// Do not ask for confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

/// Which album listings to process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum AlbumSelection {
    /// Campus albums only
    School,
    /// Class albums only
    Class,
    /// Both listings
    Both,
}

impl AlbumSelection {
    /// Album types in processing order.
    pub fn album_types(self) -> Vec<AlbumType> {
        match self {
            AlbumSelection::School => vec![AlbumType::School],
            AlbumSelection::Class => vec![AlbumType::Class],
            AlbumSelection::Both => vec![AlbumType::School, AlbumType::Class],
        }
    }
}

/// Options for `download`.
#[derive(Debug, Args)]
pub struct DownloadArgs {
    /// JSON manifest of albums and photo URLs
    #[arg(value_parser)]
    pub manifest: PathBuf,

    /// Root of the local archive
    #[arg(long, env = "PHOTO_ARCHIVER_BASE_DIR", default_value = DEFAULT_BASE_DIR)]
    pub base_dir: PathBuf,

    /// First album date (YYYY-MM-DD); requires --end-date
    #[arg(long)]
    pub start_date: Option<String>,

    /// Last album date (YYYY-MM-DD); requires --start-date
    #[arg(long)]
    pub end_date: Option<String>,

    /// Look back this many days when no explicit range is given
    #[arg(long, default_value_t = DEFAULT_DAYS_BACK)]
    pub days_back: i64,

    /// Album listings to process
    #[arg(long = "type", value_enum, default_value_t = AlbumSelection::Both)]
    pub album_type: AlbumSelection,

    /// Include albums not flagged as new
    #[arg(long)]
    pub all_albums: bool,

    /// Comma-separated title keywords (any match)
    #[arg(long = "key-word")]
    pub keywords: Option<String>,

    /// Photo ordering policy
    #[arg(long, value_enum, default_value_t = SortOrder::Smart)]
    pub sort_order: SortOrder,

    /// Reverse the photo order
    #[arg(long)]
    pub sort_reverse: bool,

    /// Photo CDN host trusted for full-resolution URLs
    #[arg(long, env = "PHOTO_ARCHIVER_PHOTO_HOST", default_value = DEFAULT_PHOTO_HOST)]
    pub photo_host: String,

    /// Maximum download attempts per photo
    #[arg(long, default_value_t = MAX_RETRIES)]
    pub max_retries: usize,

    /// Minimum delay between photo requests in milliseconds
    #[arg(long, default_value_t = DOWNLOAD_DELAY_MS)]
    pub download_delay_ms: u64,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = REQUEST_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Only show what would be downloaded
    #[arg(long)]
    pub dry_run: bool,

    /// Do not ask for confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,
}

impl DownloadArgs {
    /// Builds the library configuration, validating the date range.
    pub fn into_config(
        self,
        history_file: PathBuf,
        log_level: LogLevel,
        log_format: LogFormat,
    ) -> Result<Config, ConfigError> {
        let (start_date, end_date) = resolve_date_range(
            self.start_date.as_deref(),
            self.end_date.as_deref(),
            self.days_back,
            Local::now().date_naive(),
        )?;

        Ok(Config {
            base_dir: self.base_dir,
            history_file,
            album_types: self.album_type.album_types(),
            start_date,
            end_date,
            new_only: !self.all_albums,
            keywords: parse_keywords(self.keywords.as_deref()),
            sort_order: self.sort_order,
            sort_reverse: self.sort_reverse,
            photo_host: self.photo_host,
            max_retries: self.max_retries.max(1),
            request_timeout: Duration::from_secs(self.timeout_seconds),
            download_delay: Duration::from_millis(self.download_delay_ms),
            user_agent: self.user_agent,
            dry_run: self.dry_run,
            log_level,
            log_format,
            ..Config::default()
        })
    }
}

/// Resolves the album date window.
///
/// Both bounds must be given together and in order; with neither, the window
/// is the last `days_back` days ending `today`.
pub fn resolve_date_range(
    start: Option<&str>,
    end: Option<&str>,
    days_back: i64,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate), ConfigError> {
    match (start, end) {
        (Some(start), Some(end)) => {
            let start_date =
                parse_date_arg(start).ok_or_else(|| ConfigError::InvalidDate(start.to_string()))?;
            let end_date =
                parse_date_arg(end).ok_or_else(|| ConfigError::InvalidDate(end.to_string()))?;
            if start_date > end_date {
                return Err(ConfigError::InvertedRange {
                    start: start_date,
                    end: end_date,
                });
            }
            Ok((start_date, end_date))
        }
        (None, None) => Ok((today - chrono::Duration::days(days_back), today)),
        _ => Err(ConfigError::IncompleteRange),
    }
}

/// Splits a comma-separated keyword list, dropping blanks.
pub fn parse_keywords(arg: Option<&str>) -> Vec<String> {
    arg.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}
