//! History maintenance commands: statistics, duplicate cleanup and hash
//! index rebuild.
//!
//! These operate on the history file alone and never touch the network.
//! Unlike a download run, a history file that cannot be parsed is an error
//! here, so a maintenance command never overwrites it with an empty store.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;

use crate::app::statistics::{print_backfill_report, print_cleanup_plan, print_history_stats};
use crate::history::cleanup::{default_backup_dir, execute};
use crate::history::{BackfillReport, CleanupPlan, CleanupReport, HistoryStats, HistoryStore};
use crate::utils::format_file_size;

fn open_store(history_file: &Path) -> Result<HistoryStore> {
    let mut store = HistoryStore::try_load(history_file)
        .with_context(|| format!("Failed to read history file {}", history_file.display()))?;
    store.rebuild_hash_index();
    Ok(store)
}

/// Logs and returns history statistics.
pub fn show_stats(history_file: &Path) -> Result<HistoryStats> {
    let store = open_store(history_file)?;
    let stats = store.get_stats();
    print_history_stats(&stats);
    Ok(stats)
}

/// Logs and returns the cleanup plan for the current duplicates.
pub fn plan_duplicate_cleanup(history_file: &Path) -> Result<CleanupPlan> {
    let store = open_store(history_file)?;
    let plan = CleanupPlan::from_store(&store);
    print_cleanup_plan(&plan);
    Ok(plan)
}

/// Deletes duplicate files after copying them into `backup_dir` (a fresh
/// timestamped temp directory when `None`).
///
/// The plan is recomputed from the history file, so files removed since it
/// was last shown are handled.
pub fn clean_duplicates(history_file: &Path, backup_dir: Option<PathBuf>) -> Result<CleanupReport> {
    let mut store = open_store(history_file)?;
    let plan = CleanupPlan::from_store(&store);
    if plan.is_empty() {
        info!("No duplicate files to clean");
        return Ok(CleanupReport::default());
    }

    let backup_dir = backup_dir.unwrap_or_else(default_backup_dir);
    let report = execute(&mut store, &plan, &backup_dir).context("Duplicate cleanup failed")?;
    info!(
        "Deleted {} duplicate files ({}), {} failed, backups in {}",
        report.deleted,
        format_file_size(report.deleted_bytes),
        report.failed,
        report.backup_dir.display()
    );
    Ok(report)
}

/// Hashes records that have no hash yet and rebuilds the index.
///
/// The history file is backed up once, to `<file>.backup`, before it is
/// rewritten.
pub fn rebuild_index(history_file: &Path) -> Result<BackfillReport> {
    let mut store = open_store(history_file)?;
    store
        .backup_once()
        .context("Failed to back up the history file")?;

    let report = store.backfill_hashes();
    store.save().context("Failed to save the history file")?;
    print_backfill_report(&report);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::DownloadRecord;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_rebuild_index_backfills_and_backs_up() {
        let dir = TempDir::new().unwrap();
        let history_file = dir.path().join("history.json");
        let photo = dir.path().join("2024-05-01_001.jpg");
        fs::write(&photo, b"photo bytes").unwrap();

        // A record written before hashes existed
        let record = DownloadRecord::new(
            "https://h/a.jpg",
            "2024-05-01_001.jpg",
            &photo.to_string_lossy(),
            11,
            String::new(),
        );
        let json = serde_json::json!({
            "downloads": { "2024-05-01_001.jpg|https://h/a.jpg": record }
        });
        fs::write(&history_file, json.to_string()).unwrap();

        let report = rebuild_index(&history_file).unwrap();
        assert_eq!(report.backfilled, 1);
        assert_eq!(report.already_hashed, 0);

        let mut backup = history_file.clone().into_os_string();
        backup.push(".backup");
        assert!(PathBuf::from(backup).exists());

        let stats = show_stats(&history_file).unwrap();
        assert_eq!(stats.total_files, 1);
        assert_eq!(stats.unique_hashes, 1);
    }

    #[test]
    fn test_maintenance_rejects_corrupt_history() {
        let dir = TempDir::new().unwrap();
        let history_file = dir.path().join("history.json");
        fs::write(&history_file, "{ not json").unwrap();

        assert!(show_stats(&history_file).is_err());
        assert!(rebuild_index(&history_file).is_err());
        // Left untouched
        assert_eq!(fs::read_to_string(&history_file).unwrap(), "{ not json");
    }

    #[test]
    fn test_clean_duplicates() {
        let dir = TempDir::new().unwrap();
        let history_file = dir.path().join("history.json");
        let mut store = HistoryStore::empty(&history_file);
        for name in ["a.jpg", "b.jpg"] {
            let path = dir.path().join(name);
            fs::write(&path, b"same").unwrap();
            store.add_record(&format!("https://h/{name}"), name, &path, 4);
        }
        store.save().unwrap();

        let plan = plan_duplicate_cleanup(&history_file).unwrap();
        assert_eq!(plan.file_count(), 1);

        let backup_dir = dir.path().join("backup");
        let report = clean_duplicates(&history_file, Some(backup_dir.clone())).unwrap();
        assert_eq!(report.deleted, 1);
        assert!(dir.path().join("a.jpg").exists());
        assert!(!dir.path().join("b.jpg").exists());
        assert_eq!(fs::read_dir(&backup_dir).unwrap().count(), 1);

        let again = clean_duplicates(&history_file, Some(backup_dir)).unwrap();
        assert_eq!(again.deleted, 0);
    }
}
