//! Configuration constants.
//!
//! This module defines the defaults used throughout the application: retry
//! timing, request limits, pagination bounds and the on-disk layout.

// Retry strategy
/// Maximum number of download attempts per photo (initial attempt + retries)
pub const MAX_RETRIES: usize = 3;
/// Base delay in milliseconds before the first retry.
/// Each later retry doubles the previous delay.
pub const RETRY_BASE_DELAY_MS: u64 = 1000;
/// Upper bound for a single retry delay in seconds
pub const RETRY_MAX_DELAY_SECS: u64 = 30;

// Network
/// Per-request timeout in seconds. Exceeding it counts as a transient failure.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
/// Minimum delay between two photo requests, in milliseconds
pub const DOWNLOAD_DELAY_MS: u64 = 1000;
/// Pause between two albums, in milliseconds
pub const ALBUM_DELAY_MS: u64 = 500;
/// HTTP 429 Too Many Requests
pub const HTTP_STATUS_TOO_MANY_REQUESTS: u16 = 429;

/// Default User-Agent string for photo requests.
///
/// Users can override this via the `--user-agent` CLI flag.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Accept header sent with photo requests
pub const IMAGE_ACCEPT_HEADER: &str = "image/webp,image/apng,image/*,*/*;q=0.8";

// Content validation
/// Responses declaring fewer bytes than this are treated as error pages (1KB)
pub const MIN_IMAGE_BYTES: u64 = 1024;

/// Photo CDN whose URLs are trusted as full-resolution originals
pub const DEFAULT_PHOTO_HOST: &str = "isai-prod-v2.s3.hicloud.net.tw";

// Pagination
/// Maximum number of album listing pages read per album type
pub const MAX_ALBUM_PAGES: u32 = 5;
/// Albums per full listing page; a shorter page is the last one
pub const ALBUM_PAGE_SIZE: usize = 10;
/// Maximum number of photo pages read per album
pub const MAX_PHOTO_PAGES: u32 = 30;

// Storage layout
/// Default base directory for the archive
pub const DEFAULT_BASE_DIR: &str = "./downloads";
/// Default history file path
pub const DEFAULT_HISTORY_FILE: &str = "./download_history.json";
/// Maximum length of a sanitized file or folder name, in characters
pub const MAX_FILENAME_CHARS: usize = 200;
/// Extensions counted when looking for the highest existing sequence number
pub const SEQUENCED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];
/// Extension used when a URL path has none
pub const FALLBACK_EXTENSION: &str = ".jpg";

// Date selection
/// Default look-back window in days when no explicit range is given
pub const DEFAULT_DAYS_BACK: i64 = 7;
