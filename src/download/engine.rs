//! Single-photo download engine.
//!
//! `fetch_one` streams a photo into `<dest>.part`, retrying transient failures
//! with the configured backoff, then validates it, hashes it and either commits
//! it (rename + history record) or discards it as a content duplicate. Every
//! attempt waits its turn on the engine's request throttle.
//!
//! The `.part` file is owned by a drop guard: it is removed on every failure
//! path, including when the future itself is dropped on cancellation.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info, warn};
use reqwest::header::CONTENT_TYPE;
use tokio::io::AsyncWriteExt;
use tokio_retry::RetryIf;

use crate::download::retry::RetryPolicy;
use crate::download::throttle::RequestThrottle;
use crate::download::validate::validate_image;
use crate::error_handling::DownloadError;
use crate::hashing::hash_file_or_empty;
use crate::history::{HashIndexEntry, HistoryStore};

/// Result of one `fetch_one` call.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Saved and recorded
    Downloaded {
        /// Bytes written
        bytes: u64,
        /// Content hash (empty if hashing failed)
        hash: String,
    },
    /// Content already archived; the new file was discarded
    Duplicate {
        /// An existing file with the same content
        existing: HashIndexEntry,
    },
    /// Gave up
    Failed(DownloadError),
}

/// Removes its file on drop unless disarmed.
struct PartialFile {
    path: PathBuf,
    armed: bool,
}

impl PartialFile {
    fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Could not remove partial file {}: {e}", self.path.display());
            }
        }
    }
}

/// `<dest>.part`, next to the destination so the final rename stays on one
/// file system.
pub fn part_path(dest: &Path) -> PathBuf {
    let mut name: OsString = dest.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

/// Downloads photos one at a time.
#[derive(Debug, Clone)]
pub struct DownloadEngine {
    client: reqwest::Client,
    policy: RetryPolicy,
    min_image_bytes: u64,
    throttle: RequestThrottle,
}

impl DownloadEngine {
    /// Creates an engine.
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client (timeout and headers already configured)
    /// * `policy` - Attempt bound and backoff
    /// * `min_image_bytes` - Declared sizes below this are rejected as error pages
    ///
    /// Requests are not spaced until `with_request_delay` is applied.
    pub fn new(client: reqwest::Client, policy: RetryPolicy, min_image_bytes: u64) -> Self {
        Self {
            client,
            policy,
            min_image_bytes,
            throttle: RequestThrottle::new(Duration::ZERO),
        }
    }

    /// Spaces every request, retries included, at least `delay` apart.
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.throttle = RequestThrottle::new(delay);
        self
    }

    /// Downloads `url` to `dest` and records it in `history`.
    ///
    /// Transient failures (see `DownloadError::is_retriable`) are retried up to
    /// the policy's attempt bound; content failures are not retried. A file
    /// whose content hash is already archived under an existing file is
    /// deleted and reported as `Duplicate`.
    pub async fn fetch_one(&self, url: &str, dest: &Path, history: &mut HistoryStore) -> FetchOutcome {
        let mut partial = PartialFile::new(part_path(dest));

        let fetched = RetryIf::spawn(
            self.policy.delays(),
            || self.attempt(url, &partial.path),
            |e: &DownloadError| {
                let retry = e.is_retriable();
                if retry {
                    warn!("Transient failure downloading {url}: {e}");
                }
                retry
            },
        )
        .await;

        let bytes = match fetched {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Download failed for {url}: {e}");
                return FetchOutcome::Failed(e);
            }
        };

        if let Err(e) = validate_image(partial.path.clone()).await {
            warn!("Discarding invalid image from {url}: {e}");
            return FetchOutcome::Failed(e);
        }

        let hash_path = partial.path.clone();
        let hash = tokio::task::spawn_blocking(move || hash_file_or_empty(&hash_path))
            .await
            .unwrap_or_default();

        let (duplicate, live) = history.is_content_duplicate(&hash);
        if duplicate {
            if let Some(existing) = live.into_iter().next() {
                info!(
                    "Content of {url} already archived as {}, discarding",
                    existing.filepath
                );
                return FetchOutcome::Duplicate { existing };
            }
        }

        // No await from here on: the rename and the record land together or
        // not at all if the future is dropped
        if let Err(e) = std::fs::rename(&partial.path, dest) {
            return FetchOutcome::Failed(DownloadError::Io(e));
        }
        partial.disarm();

        let filename = dest
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        history.add_record_with_hash(url, &filename, dest, bytes, hash.clone());
        debug!("Saved {url} to {} ({bytes} bytes)", dest.display());

        FetchOutcome::Downloaded { bytes, hash }
    }

    /// One request, streamed into `part`. Returns the bytes written.
    async fn attempt(&self, url: &str, part: &Path) -> Result<u64, DownloadError> {
        self.throttle.acquire().await;
        let mut response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::HttpStatus(status));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.starts_with("image/") {
            return Err(DownloadError::NotAnImage(content_type));
        }

        if let Some(declared) = response.content_length() {
            if declared < self.min_image_bytes {
                return Err(DownloadError::TooSmall {
                    declared,
                    minimum: self.min_image_bytes,
                });
            }
        }

        let mut file = tokio::fs::File::create(part).await?;
        let mut written: u64 = 0;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        Ok(written)
    }
}
