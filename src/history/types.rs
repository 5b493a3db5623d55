//! Persisted history records.
//!
//! The history file is plain JSON so that it stays human-diffable:
//!
//! ```json
//! {
//!   "downloads": { "<filename>|<url>": { "url": "...", "filename": "...", ... } },
//!   "hash_index": { "<md5>": [ { "file_key": "...", "filepath": "...", ... } ] }
//! }
//! ```

use std::collections::BTreeMap;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Format of `download_time`, e.g. `2024-05-01T09:30:12.123456`.
pub const DOWNLOAD_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Builds the identity key of a record: `filename|url`.
pub fn record_key(filename: &str, url: &str) -> String {
    format!("{filename}|{url}")
}

/// One successfully saved file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRecord {
    /// Source URL
    pub url: String,
    /// Sanitized file name
    pub filename: String,
    /// Absolute path of the saved file
    pub filepath: String,
    /// Size in bytes
    pub file_size: u64,
    /// Local time of the download
    pub download_time: String,
    /// Lowercase hex MD5; empty when hashing failed
    #[serde(default)]
    pub file_hash: String,
}

impl DownloadRecord {
    /// Builds a record stamped with the current local time.
    pub fn new(url: &str, filename: &str, filepath: &str, file_size: u64, file_hash: String) -> Self {
        Self {
            url: url.to_string(),
            filename: filename.to_string(),
            filepath: filepath.to_string(),
            file_size,
            download_time: Local::now().format(DOWNLOAD_TIME_FORMAT).to_string(),
            file_hash,
        }
    }

    /// Whether the record takes part in duplicate detection.
    pub fn has_hash(&self) -> bool {
        !self.file_hash.is_empty()
    }

    /// Parsed `download_time`, if it is well formed.
    pub fn downloaded_at(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.download_time, DOWNLOAD_TIME_FORMAT).ok()
    }
}

/// One file location under a content hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashIndexEntry {
    /// Key of the owning `DownloadRecord`
    pub file_key: String,
    /// Path of the file
    pub filepath: String,
    /// File name
    pub filename: String,
    /// Source URL
    pub url: String,
}

impl HashIndexEntry {
    pub(crate) fn for_record(file_key: &str, record: &DownloadRecord) -> Self {
        Self {
            file_key: file_key.to_string(),
            filepath: record.filepath.clone(),
            filename: record.filename.clone(),
            url: record.url.clone(),
        }
    }
}

/// On-disk layout of the history file.
///
/// `BTreeMap` keeps the serialized output stable between saves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryFile {
    /// Records keyed by `filename|url`
    #[serde(default)]
    pub downloads: BTreeMap<String, DownloadRecord>,
    /// Content hash to file locations; derivable from `downloads`
    #[serde(default)]
    pub hash_index: BTreeMap<String, Vec<HashIndexEntry>>,
}

/// Summary counts over the history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryStats {
    /// Number of records
    pub total_files: usize,
    /// Sum of recorded sizes
    pub total_size: u64,
    /// Distinct non-empty hashes
    pub unique_hashes: usize,
    /// Sum over hashes of (entries - 1)
    pub duplicate_files: usize,
    /// Hashes with more than one entry
    pub duplicate_hashes: usize,
}

/// Outcome of `HistoryStore::backfill_hashes`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackfillReport {
    /// Records that already had a hash
    pub already_hashed: usize,
    /// Records whose hash was computed now
    pub backfilled: usize,
    /// Records without a hash whose file is gone
    pub missing_files: usize,
    /// Records whose file could not be read
    pub unreadable: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_key() {
        assert_eq!(
            record_key("2024-05-01_001.jpg", "https://h/a.jpg"),
            "2024-05-01_001.jpg|https://h/a.jpg"
        );
    }

    #[test]
    fn test_missing_file_hash_defaults_to_empty() {
        let json = r#"{
            "url": "https://h/a.jpg",
            "filename": "a.jpg",
            "filepath": "/tmp/a.jpg",
            "file_size": 2048,
            "download_time": "2024-05-01T09:30:12.123456"
        }"#;
        let record: DownloadRecord = serde_json::from_str(json).unwrap();
        assert!(!record.has_hash());
        assert!(record.downloaded_at().is_some());
    }

    #[test]
    fn test_history_file_without_index() {
        let file: HistoryFile = serde_json::from_str(r#"{"downloads": {}}"#).unwrap();
        assert!(file.hash_index.is_empty());
        let file: HistoryFile = serde_json::from_str("{}").unwrap();
        assert!(file.downloads.is_empty());
    }

    #[test]
    fn test_new_record_timestamp_format() {
        let record = DownloadRecord::new("u", "f", "/p/f", 1, String::new());
        assert!(record.downloaded_at().is_some(), "{}", record.download_time);
    }
}
