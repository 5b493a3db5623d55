//! Duplicate file cleanup.
//!
//! Builds a plan from the store's duplicate report (keep the first existing
//! file of every group, delete the rest) and executes it: each doomed file is
//! copied to a backup directory, deleted, and its record dropped. The index is
//! rebuilt and the history saved once at the end.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use log::{error, info, warn};

use crate::error_handling::HistoryError;
use crate::history::store::HistoryStore;
use crate::history::types::HashIndexEntry;

/// A file slated for deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedDeletion {
    /// Index entry of the file
    pub entry: HashIndexEntry,
    /// Recorded size in bytes
    pub size: u64,
}

/// One group of byte-identical files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// Shared content hash
    pub hash: String,
    /// File that is kept
    pub keep: HashIndexEntry,
    /// Files that are removed
    pub remove: Vec<PlannedDeletion>,
}

/// What a cleanup would do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupPlan {
    /// Groups in hash order
    pub groups: Vec<DuplicateGroup>,
}

impl CleanupPlan {
    /// Plans a cleanup of every duplicate group in `store`.
    pub fn from_store(store: &HistoryStore) -> Self {
        let groups = store
            .get_duplicate_report()
            .into_iter()
            .filter_map(|(hash, mut entries)| {
                if entries.len() < 2 {
                    return None;
                }
                let keep = entries.remove(0);
                let remove = entries
                    .into_iter()
                    .map(|entry| PlannedDeletion {
                        size: store.record(&entry.file_key).map_or(0, |r| r.file_size),
                        entry,
                    })
                    .collect();
                Some(DuplicateGroup { hash, keep, remove })
            })
            .collect();
        Self { groups }
    }

    /// Whether there is nothing to delete.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of files the plan deletes.
    pub fn file_count(&self) -> usize {
        self.groups.iter().map(|g| g.remove.len()).sum()
    }

    /// Bytes the plan frees.
    pub fn reclaimable_bytes(&self) -> u64 {
        self.groups
            .iter()
            .flat_map(|g| g.remove.iter())
            .map(|d| d.size)
            .sum()
    }
}

/// Outcome of `execute`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Directory holding the backups
    pub backup_dir: PathBuf,
    /// Files deleted
    pub deleted: usize,
    /// Bytes freed
    pub deleted_bytes: u64,
    /// Files that could not be backed up or deleted (kept, record kept)
    pub failed: usize,
    /// Records removed from the history
    pub removed_records: usize,
}

/// `$TMPDIR/duplicate_cleanup_backup_<YYYYmmdd_HHMMSS>`.
pub fn default_backup_dir() -> PathBuf {
    std::env::temp_dir().join(format!(
        "duplicate_cleanup_backup_{}",
        Local::now().format("%Y%m%d_%H%M%S")
    ))
}

/// Executes `plan` against `store`, backing files up into `backup_dir`.
///
/// A file that vanished since planning only loses its record. A file that
/// cannot be backed up is left alone. The history is saved when any record
/// was removed.
///
/// # Errors
///
/// Fails if the backup directory cannot be created or the history cannot be
/// saved. Per-file failures are counted, not returned.
pub fn execute(
    store: &mut HistoryStore,
    plan: &CleanupPlan,
    backup_dir: &Path,
) -> Result<CleanupReport, HistoryError> {
    fs::create_dir_all(backup_dir)?;
    info!("Backing up deleted files to {}", backup_dir.display());

    let mut report = CleanupReport {
        backup_dir: backup_dir.to_path_buf(),
        ..Default::default()
    };
    let mut removed_keys = Vec::new();

    for group in &plan.groups {
        let hash_prefix = group.hash.get(..8).unwrap_or(&group.hash);
        for doomed in &group.remove {
            let path = Path::new(&doomed.entry.filepath);
            if !path.exists() {
                warn!(
                    "{} no longer exists, dropping its record",
                    doomed.entry.filename
                );
                removed_keys.push(doomed.entry.file_key.clone());
                continue;
            }

            let backup_path = backup_dir.join(format!("{}_{hash_prefix}", doomed.entry.filename));
            match fs::copy(path, &backup_path).and_then(|_| fs::remove_file(path)) {
                Ok(()) => {
                    info!("Deleted duplicate {}", path.display());
                    report.deleted += 1;
                    report.deleted_bytes += doomed.size;
                    removed_keys.push(doomed.entry.file_key.clone());
                }
                Err(e) => {
                    error!("Could not remove {}: {e}", path.display());
                    report.failed += 1;
                }
            }
        }
    }

    if !removed_keys.is_empty() {
        report.removed_records = store.remove_records(&removed_keys);
        store.save()?;
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with_duplicates(dir: &Path) -> HistoryStore {
        let mut store = HistoryStore::empty(dir.join("history.json"));
        for (name, content) in [("a.jpg", "dup"), ("b.jpg", "dup"), ("c.jpg", "dup"), ("d.jpg", "solo")] {
            let path = dir.join(name);
            fs::write(&path, content).unwrap();
            store.add_record(&format!("https://h/{name}"), name, &path, content.len() as u64);
        }
        store
    }

    #[test]
    fn test_plan_keeps_first_file() {
        let dir = TempDir::new().unwrap();
        let store = store_with_duplicates(dir.path());

        let plan = CleanupPlan::from_store(&store);

        assert_eq!(plan.groups.len(), 1);
        assert_eq!(plan.groups[0].keep.filename, "a.jpg");
        assert_eq!(plan.file_count(), 2);
        assert_eq!(plan.reclaimable_bytes(), 6);
    }

    #[test]
    fn test_execute_backs_up_and_deletes() {
        let dir = TempDir::new().unwrap();
        let backup = TempDir::new().unwrap();
        let mut store = store_with_duplicates(dir.path());
        let plan = CleanupPlan::from_store(&store);

        let report = execute(&mut store, &plan, backup.path()).unwrap();

        assert_eq!(report.deleted, 2);
        assert_eq!(report.deleted_bytes, 6);
        assert_eq!(report.removed_records, 2);
        assert!(dir.path().join("a.jpg").exists());
        assert!(!dir.path().join("b.jpg").exists());
        assert!(!dir.path().join("c.jpg").exists());
        let backed_up = fs::read_dir(backup.path()).unwrap().count();
        assert_eq!(backed_up, 2);

        assert_eq!(store.len(), 2);
        assert!(store.get_duplicate_report().is_empty());
        let reloaded = HistoryStore::try_load(store.path()).unwrap();
        assert_eq!(reloaded.len(), 2);
    }

    #[test]
    fn test_empty_plan() {
        let dir = TempDir::new().unwrap();
        let store = HistoryStore::empty(dir.path().join("history.json"));
        let plan = CleanupPlan::from_store(&store);
        assert!(plan.is_empty());
        assert_eq!(plan.reclaimable_bytes(), 0);
    }

    #[test]
    fn test_default_backup_dir_name() {
        let dir = default_backup_dir();
        let name = dir.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("duplicate_cleanup_backup_"));
    }
}
