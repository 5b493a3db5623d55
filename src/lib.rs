//! photo_archiver library: duplicate-aware photo album downloads
//!
//! This library downloads the photos of school-portal albums into a dated
//! local archive. Every saved photo is recorded with its content hash in a JSON
//! history file, so photos already on disk are never fetched or stored twice,
//! even under a different name.
//!
//! # Example
//!
//! ```no_run
//! use photo_archiver::{run_download, Config, ManifestAdapter};
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let config = Config {
//!     base_dir: std::path::PathBuf::from("/srv/photos"),
//!     new_only: false,
//!     ..Default::default()
//! };
//!
//! let adapter = ManifestAdapter::from_path(std::path::Path::new("albums.json"))?;
//! let report = run_download(config, &adapter, CancellationToken::new()).await?;
//! println!("{} downloaded, {} skipped, {} failed",
//!          report.downloaded, report.skipped(), report.failed);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

pub mod albums;
mod app;
pub mod config;
pub mod download;
mod error_handling;
pub mod hashing;
pub mod history;
pub mod initialization;
pub mod photos;
mod run;
mod utils;

// Re-export public API
pub use albums::{AlbumRecord, AlbumType, ManifestAdapter, SiteAdapter};
pub use app::{clean_duplicates, plan_duplicate_cleanup, rebuild_index, show_stats};
pub use config::{Config, LogFormat, LogLevel, SortOrder};
pub use error_handling::{
    ConfigError, DownloadError, ErrorType, HistoryError, InitializationError,
};
pub use history::HistoryStore;
pub use run::{run_download, RunReport};
pub use utils::{download_speed, format_duration, format_file_size};
