//! Statistics printing.

use log::info;

use crate::error_handling::ErrorType;
use crate::history::{BackfillReport, CleanupPlan, HistoryStats, HistoryStore};
use crate::run::RunReport;
use crate::utils::{download_speed, format_duration, format_file_size};

/// Duplicate groups shown in a run summary.
const SUMMARY_DUPLICATE_GROUPS: usize = 3;
/// Files shown per duplicate group in a run summary.
const SUMMARY_FILES_PER_GROUP: usize = 2;

/// Prints the end-of-run summary: outcome counts, throughput, failures and
/// the state of the history afterwards.
pub fn print_run_summary(report: &RunReport, history: &HistoryStore) {
    info!("Download summary:");
    info!("   Albums: {}/{}", report.processed_albums, report.total_albums);
    info!("   Photos found: {}", report.total_photos);
    info!("   Downloaded: {}", report.downloaded);
    info!("   Skipped (already archived): {}", report.skipped_duplicate);
    info!("   Skipped (file exists): {}", report.skipped_existing);
    info!("   Duplicate content discarded: {}", report.duplicate_content);
    info!("   Failed: {}", report.failed);
    info!("   Total size: {}", format_file_size(report.total_bytes));
    info!("   Elapsed: {}", format_duration(report.elapsed));

    if report.downloaded > 0 {
        let per_photo = report.elapsed.as_secs_f64() / report.downloaded as f64;
        info!(
            "   Average speed: {}",
            download_speed(report.total_bytes, report.elapsed)
        );
        info!("   Average time per photo: {per_photo:.1}s");
    }

    print_error_statistics(&report.error_counts);
    print_history_stats(&history.get_stats());

    let duplicates = history.get_duplicate_report();
    if !duplicates.is_empty() {
        info!("Duplicate groups ({} total):", duplicates.len());
        for (hash, entries) in duplicates.iter().take(SUMMARY_DUPLICATE_GROUPS) {
            let short = hash.get(..12).unwrap_or(hash);
            info!("   {short}... ({} files)", entries.len());
            for entry in entries.iter().take(SUMMARY_FILES_PER_GROUP) {
                info!("      {}", entry.filepath);
            }
        }
    }
}

/// Prints failure counters, if any.
pub fn print_error_statistics(error_counts: &[(ErrorType, usize)]) {
    let total_errors: usize = error_counts.iter().map(|(_, count)| count).sum();
    if total_errors > 0 {
        info!("Error Counts ({} total):", total_errors);
        for (error_type, count) in error_counts {
            info!("   {}: {}", error_type.as_str(), count);
        }
    }
}

/// Prints history totals.
pub fn print_history_stats(stats: &HistoryStats) {
    info!("History:");
    info!("   Files: {}", stats.total_files);
    info!("   Size: {}", format_file_size(stats.total_size));
    info!("   Unique hashes: {}", stats.unique_hashes);
    if stats.duplicate_hashes > 0 {
        info!(
            "   Duplicates: {} extra files in {} groups",
            stats.duplicate_files, stats.duplicate_hashes
        );
    }
}

/// Prints every group of a cleanup plan.
pub fn print_cleanup_plan(plan: &CleanupPlan) {
    if plan.is_empty() {
        info!("No duplicate files found");
        return;
    }
    info!(
        "{} duplicate groups, {} files to remove, {} reclaimable",
        plan.groups.len(),
        plan.file_count(),
        format_file_size(plan.reclaimable_bytes())
    );
    for group in &plan.groups {
        info!("   {}", group.hash);
        info!("      keep:   {}", group.keep.filepath);
        for doomed in &group.remove {
            info!(
                "      remove: {} ({})",
                doomed.entry.filepath,
                format_file_size(doomed.size)
            );
        }
    }
}

/// Prints the outcome of a hash backfill.
pub fn print_backfill_report(report: &BackfillReport) {
    info!("Hash index rebuilt:");
    info!("   Already hashed: {}", report.already_hashed);
    info!("   Newly hashed: {}", report.backfilled);
    info!("   Files missing on disk: {}", report.missing_files);
    if report.unreadable > 0 {
        info!("   Unreadable files: {}", report.unreadable);
    }
}
