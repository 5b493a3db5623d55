//! The download history store.
//!
//! `HistoryStore` owns every `DownloadRecord` and the derived hash index for
//! the lifetime of a process. Mutations stay in memory until `save()` rewrites
//! the backing file atomically (temp file in the same directory, then rename).

use std::collections::BTreeMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use tempfile::NamedTempFile;

use crate::error_handling::HistoryError;
use crate::hashing::{hash_file, hash_file_or_empty};
use crate::history::types::{
    record_key, BackfillReport, DownloadRecord, HashIndexEntry, HistoryFile, HistoryStats,
};

/// Suffix of the one-time backup written before maintenance rewrites.
const BACKUP_SUFFIX: &str = "backup";

/// Persistent record of downloaded files and their content hashes.
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    data: HistoryFile,
}

impl HistoryStore {
    /// Loads the history at `path`.
    ///
    /// A missing file yields an empty store. An unreadable or malformed file is
    /// logged and also yields an empty store, so a run is never aborted by its
    /// history. The persisted hash index is taken as-is; call
    /// [`rebuild_hash_index`](Self::rebuild_hash_index) before relying on it.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::try_load(&path) {
            Ok(store) => store,
            Err(e) => {
                warn!(
                    "Could not read download history {}: {e}. Starting with an empty history",
                    path.display()
                );
                Self::empty(path)
            }
        }
    }

    /// Loads the history at `path`, reporting read and parse failures.
    ///
    /// A missing file is not an error.
    pub fn try_load(path: impl Into<PathBuf>) -> Result<Self, HistoryError> {
        let path = path.into();
        if !path.exists() {
            debug!("No history file at {}, starting empty", path.display());
            return Ok(Self::empty(path));
        }
        let raw = fs::read_to_string(&path)?;
        let data: HistoryFile = serde_json::from_str(&raw)?;
        debug!(
            "Loaded {} download records from {}",
            data.downloads.len(),
            path.display()
        );
        Ok(Self { path, data })
    }

    /// An empty store that will save to `path`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            data: HistoryFile::default(),
        }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.data.downloads.len()
    }

    /// Whether there are no records.
    pub fn is_empty(&self) -> bool {
        self.data.downloads.is_empty()
    }

    /// All records with their keys, in key order.
    pub fn records(&self) -> impl Iterator<Item = (&String, &DownloadRecord)> {
        self.data.downloads.iter()
    }

    /// Looks up a record by key.
    pub fn record(&self, file_key: &str) -> Option<&DownloadRecord> {
        self.data.downloads.get(file_key)
    }

    /// Whether a file with this name was already saved from this URL.
    pub fn is_recorded(&self, url: &str, filename: &str) -> bool {
        self.data
            .downloads
            .contains_key(&record_key(filename, url))
    }

    /// First record downloaded from `url`, under any file name.
    ///
    /// This is a full scan.
    pub fn find_by_url(&self, url: &str) -> Option<&DownloadRecord> {
        self.data.downloads.values().find(|r| r.url == url)
    }

    /// Checks whether content with `hash` is already stored.
    ///
    /// Only index entries whose file still exists on disk count. Returns
    /// `(true, live_entries)` when at least one exists, `(false, [])` otherwise.
    pub fn is_content_duplicate(&self, hash: &str) -> (bool, Vec<HashIndexEntry>) {
        if hash.is_empty() {
            return (false, Vec::new());
        }
        let live: Vec<HashIndexEntry> = self
            .data
            .hash_index
            .get(hash)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|e| Path::new(&e.filepath).exists())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        (!live.is_empty(), live)
    }

    /// Records a fully written file, hashing it first.
    ///
    /// A hashing failure stores the record with an empty hash. Returns the hash.
    pub fn add_record(&mut self, url: &str, filename: &str, filepath: &Path, file_size: u64) -> String {
        let hash = hash_file_or_empty(filepath);
        self.add_record_with_hash(url, filename, filepath, file_size, hash.clone());
        hash
    }

    /// Records a fully written file whose hash is already known.
    ///
    /// A relative `filepath` is stored resolved against the working directory.
    pub fn add_record_with_hash(
        &mut self,
        url: &str,
        filename: &str,
        filepath: &Path,
        file_size: u64,
        file_hash: String,
    ) {
        let key = record_key(filename, url);
        // Liveness checks resolve paths later, possibly from another directory
        let filepath = std::path::absolute(filepath).unwrap_or_else(|_| filepath.to_path_buf());
        let record = DownloadRecord::new(
            url,
            filename,
            &filepath.to_string_lossy(),
            file_size,
            file_hash,
        );

        if self.data.downloads.contains_key(&key) {
            self.unindex(&key);
        }
        if record.has_hash() {
            self.data
                .hash_index
                .entry(record.file_hash.clone())
                .or_default()
                .push(HashIndexEntry::for_record(&key, &record));
        }
        self.data.downloads.insert(key, record);
    }

    fn unindex(&mut self, key: &str) {
        self.data.hash_index.retain(|_, entries| {
            entries.retain(|e| e.file_key != key);
            !entries.is_empty()
        });
    }

    /// Recomputes the hash index from the records.
    ///
    /// Every record with a non-empty hash is indexed, whether or not its file
    /// still exists; liveness is checked at query time.
    pub fn rebuild_hash_index(&mut self) {
        let mut index: BTreeMap<String, Vec<HashIndexEntry>> = BTreeMap::new();
        for (key, record) in &self.data.downloads {
            if record.has_hash() {
                index
                    .entry(record.file_hash.clone())
                    .or_default()
                    .push(HashIndexEntry::for_record(key, record));
            }
        }
        debug!("Rebuilt hash index: {} unique hashes", index.len());
        self.data.hash_index = index;
    }

    /// Computes missing hashes for records whose file still exists, then
    /// rebuilds the index.
    pub fn backfill_hashes(&mut self) -> BackfillReport {
        let mut report = BackfillReport::default();
        for record in self.data.downloads.values_mut() {
            if record.has_hash() {
                report.already_hashed += 1;
                continue;
            }
            let path = Path::new(&record.filepath);
            if !path.exists() {
                report.missing_files += 1;
                continue;
            }
            match hash_file(path) {
                Ok(hash) => {
                    record.file_hash = hash;
                    report.backfilled += 1;
                }
                Err(e) => {
                    warn!("Could not hash {}: {e}", path.display());
                    report.unreadable += 1;
                }
            }
        }
        self.rebuild_hash_index();
        report
    }

    /// Removes records by key and rebuilds the index. Returns how many existed.
    pub fn remove_records<S: AsRef<str>>(&mut self, keys: &[S]) -> usize {
        let removed = keys
            .iter()
            .filter(|k| self.data.downloads.remove(k.as_ref()).is_some())
            .count();
        if removed > 0 {
            self.rebuild_hash_index();
        }
        removed
    }

    /// Hashes with more than one still-existing file, with those files.
    pub fn get_duplicate_report(&self) -> BTreeMap<String, Vec<HashIndexEntry>> {
        self.data
            .hash_index
            .keys()
            .filter_map(|hash| {
                let (_, live) = self.is_content_duplicate(hash);
                (live.len() > 1).then(|| (hash.clone(), live))
            })
            .collect()
    }

    /// Summary counts over records and index.
    pub fn get_stats(&self) -> HistoryStats {
        let duplicate_groups = self
            .data
            .hash_index
            .values()
            .filter(|entries| entries.len() > 1);
        let (duplicate_hashes, duplicate_files) = duplicate_groups
            .fold((0, 0), |(groups, files), entries| {
                (groups + 1, files + entries.len() - 1)
            });

        HistoryStats {
            total_files: self.data.downloads.len(),
            total_size: self.data.downloads.values().map(|r| r.file_size).sum(),
            unique_hashes: self.data.hash_index.len(),
            duplicate_files,
            duplicate_hashes,
        }
    }

    /// Writes the whole store to its file, replacing it atomically.
    pub fn save(&self) -> Result<(), HistoryError> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)?;

        let tmp = NamedTempFile::new_in(&parent)?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            serde_json::to_writer_pretty(&mut writer, &self.data)?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)?;
        debug!(
            "Saved {} download records to {}",
            self.data.downloads.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Copies the history file to `<file>.backup` unless that backup exists.
    ///
    /// Returns the backup path when one was written.
    pub fn backup_once(&self) -> Result<Option<PathBuf>, HistoryError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let mut backup = self.path.clone().into_os_string();
        backup.push(".");
        backup.push(BACKUP_SUFFIX);
        let backup = PathBuf::from(backup);
        if backup.exists() {
            return Ok(None);
        }
        fs::copy(&self.path, &backup)?;
        info!("Backed up history to {}", backup.display());
        Ok(Some(backup))
    }
}
