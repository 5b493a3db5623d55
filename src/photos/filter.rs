//! Pre-download duplicate filter.
//!
//! Drops URLs whose content is already archived before any request is made.

use std::sync::LazyLock;

use log::{debug, info};
use regex::Regex;

use crate::history::HistoryStore;
use crate::photos::order::url_filename;
use crate::utils::compile_regex;

/// An underscore, 32 or more hex digits, then the extension dot.
const EMBEDDED_HASH_PATTERN: &str = r"_([a-f0-9]{32,})\.";

static EMBEDDED_HASH: LazyLock<Option<Regex>> =
    LazyLock::new(|| compile_regex(EMBEDDED_HASH_PATTERN));

/// Content hash the photo CDN embeds in a filename, if any.
///
/// `.../1718_5d41402abc4b2a76b9719d911017c592.jpg` yields
/// `5d41402abc4b2a76b9719d911017c592`.
pub fn embedded_content_hash(url: &str) -> Option<String> {
    let re = EMBEDDED_HASH.as_ref()?;
    re.captures(url_filename(url))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Why a URL was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// Embedded hash matches a file that still exists
    ContentHash {
        /// The embedded hash
        hash: String,
        /// Name of the existing file
        existing: String,
    },
    /// Same URL was already downloaded under some file name
    KnownUrl {
        /// Name it was saved under
        existing: String,
    },
}

/// Output of `filter_known_photos`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOutcome {
    /// URLs still to download, input order
    pub kept: Vec<String>,
    /// Dropped URLs with reasons, input order
    pub dropped: Vec<(String, DropReason)>,
}

impl FilterOutcome {
    /// Number of dropped URLs.
    pub fn dropped_count(&self) -> usize {
        self.dropped.len()
    }
}

/// Why `url` is already archived, if it is.
///
/// The embedded-hash lookup runs first because it avoids a scan of all
/// records; the URL scan covers records from before hashes were embedded.
pub fn known_photo(url: &str, history: &HistoryStore) -> Option<DropReason> {
    if let Some(hash) = embedded_content_hash(url) {
        let (duplicate, live) = history.is_content_duplicate(&hash);
        if duplicate {
            let existing = live.first().map(|e| e.filename.clone()).unwrap_or_default();
            return Some(DropReason::ContentHash { hash, existing });
        }
    }
    history.find_by_url(url).map(|record| DropReason::KnownUrl {
        existing: record.filename.clone(),
    })
}

/// Splits `urls` into those still to download and those already archived.
/// Stable: kept URLs keep their relative order.
pub fn filter_known_photos(urls: Vec<String>, history: &HistoryStore) -> FilterOutcome {
    let mut outcome = FilterOutcome::default();
    for url in urls {
        match known_photo(&url, history) {
            Some(reason) => {
                debug!("Skipping already archived photo {url}: {reason:?}");
                outcome.dropped.push((url, reason));
            }
            None => outcome.kept.push(url),
        }
    }
    if !outcome.dropped.is_empty() {
        info!(
            "Duplicate pre-check: {} candidates, {} already archived, {} to fetch",
            outcome.kept.len() + outcome.dropped.len(),
            outcome.dropped.len(),
            outcome.kept.len()
        );
    }
    outcome
}
