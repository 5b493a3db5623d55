//! Processing of a single album.
//!
//! Photo URLs are listed, normalized, ordered and pre-filtered against the
//! history, then downloaded one at a time. Request spacing is the engine's
//! job.

use std::path::Path;

use log::{debug, info, warn};
use tokio_util::sync::CancellationToken;

use crate::albums::{list_photo_urls, AlbumRecord, AlbumType, SiteAdapter};
use crate::config::{Config, LogFormat};
use crate::download::{
    album_folder, extension_from_url, next_sequence, photo_filename, DownloadEngine, FetchOutcome,
};
use crate::error_handling::{update_error_stats, ProcessingStats};
use crate::history::HistoryStore;
use crate::photos::{filter_known_photos, order_photo_urls, FilterOutcome, UrlNormalizer};
use crate::utils::album_progress_bar;

use super::report::AlbumTally;

/// Shared, read-only inputs for album processing.
pub(crate) struct AlbumContext<'a, A> {
    pub adapter: &'a A,
    pub config: &'a Config,
    pub normalizer: &'a UrlNormalizer,
    pub cancel: &'a CancellationToken,
}

/// Photo URLs of `album` still to download, and how many candidates there were.
pub(crate) async fn collect_candidates<A: SiteAdapter>(
    ctx: &AlbumContext<'_, A>,
    album: &AlbumRecord,
    history: &HistoryStore,
) -> (usize, FilterOutcome) {
    let raw = list_photo_urls(ctx.adapter, &album.link).await;
    let normalized = ctx.normalizer.normalize_all(&raw);
    debug!(
        "{}: {} raw URLs, {} photos ({} rejected, {} rewritten, {} untrusted, {} repeated)",
        album.title,
        raw.len(),
        normalized.urls.len(),
        normalized.rejected,
        normalized.rewritten,
        normalized.untrusted,
        normalized.repeated
    );

    let candidates = normalized.urls.len();
    let ordered = order_photo_urls(
        normalized.urls,
        ctx.config.sort_order,
        ctx.config.sort_reverse,
    );
    (candidates, filter_known_photos(ordered, history))
}

/// Logs what a real run would do with `album`, without writing anything.
pub(crate) async fn preview_album<A: SiteAdapter>(
    ctx: &AlbumContext<'_, A>,
    album_type: AlbumType,
    album: &AlbumRecord,
    history: &HistoryStore,
) -> AlbumTally {
    let (candidates, filtered) = collect_candidates(ctx, album, history).await;
    let folder = album_folder(&ctx.config.base_dir, album_type, &album.title);

    info!("[dry run] {}", album.title);
    info!("   date: {}", album.date_text);
    info!("   link: {}", album.link);
    info!(
        "   photos: {candidates}, would download: {}, already archived: {}",
        filtered.kept.len(),
        filtered.dropped_count()
    );
    info!("   folder: {}", folder.display());

    AlbumTally {
        candidates,
        skipped_duplicate: filtered.dropped_count(),
        ..Default::default()
    }
}

/// Downloads the new photos of one album into its folder.
///
/// Never fails: per-photo failures are counted and the album carries on. The
/// history is mutated in memory only; saving is the caller's job.
pub(crate) async fn process_album<A: SiteAdapter>(
    ctx: &AlbumContext<'_, A>,
    engine: &DownloadEngine,
    album_type: AlbumType,
    album: &AlbumRecord,
    history: &mut HistoryStore,
    stats: &ProcessingStats,
) -> AlbumTally {
    let mut tally = AlbumTally::default();

    let Some(date) = album.date_string() else {
        warn!("Album {} has no date, skipping", album.title);
        return tally;
    };

    let (candidates, filtered) = collect_candidates(ctx, album, history).await;
    tally.candidates = candidates;
    tally.skipped_duplicate = filtered.dropped_count();

    if filtered.kept.is_empty() {
        info!(
            "{}: nothing new ({candidates} photos, {} already archived)",
            album.title, tally.skipped_duplicate
        );
        return tally;
    }

    let folder = album_folder(&ctx.config.base_dir, album_type, &album.title);
    if let Err(e) = std::fs::create_dir_all(&folder) {
        warn!("Cannot create album folder {}: {e}", folder.display());
        tally.failed = filtered.kept.len();
        return tally;
    }

    let start = next_sequence(&folder, &date);
    info!(
        "{}: downloading {} of {candidates} photos into {} (starting at #{start})",
        album.title,
        filtered.kept.len(),
        folder.display()
    );

    let progress = album_progress_bar(
        filtered.kept.len() as u64,
        &album.title,
        !matches!(ctx.config.log_format, LogFormat::Json),
    );
    for (offset, url) in filtered.kept.iter().enumerate() {
        if ctx.cancel.is_cancelled() {
            tally.cancelled = true;
            break;
        }

        let sequence = start.saturating_add(u32::try_from(offset).unwrap_or(u32::MAX));
        let filename = photo_filename(&date, sequence, &extension_from_url(url));
        let dest = folder.join(&filename);

        if dest.exists() || history.is_recorded(url, &filename) {
            debug!("Skipping {url}: {filename} already exists");
            tally.skipped_existing += 1;
            progress.inc(1);
            continue;
        }

        let outcome = tokio::select! {
            biased;
            _ = ctx.cancel.cancelled() => None,
            outcome = engine.fetch_one(url, &dest, history) => Some(outcome),
        };
        let Some(outcome) = outcome else {
            info!("Interrupted while downloading {url}");
            tally.cancelled = true;
            break;
        };

        record_outcome(&mut tally, stats, &dest, outcome);
        progress.inc(1);
    }
    progress.finish_and_clear();

    info!(
        "{}: {} downloaded, {} skipped, {} duplicate content, {} failed",
        album.title,
        tally.downloaded,
        tally.skipped_duplicate + tally.skipped_existing,
        tally.duplicate_content,
        tally.failed
    );
    tally
}

fn record_outcome(tally: &mut AlbumTally, stats: &ProcessingStats, dest: &Path, outcome: FetchOutcome) {
    match outcome {
        FetchOutcome::Downloaded { bytes, .. } => {
            info!("Saved {}", dest.display());
            tally.downloaded += 1;
            tally.bytes += bytes;
        }
        FetchOutcome::Duplicate { existing } => {
            info!(
                "{} duplicates {}, not kept",
                dest.display(),
                existing.filepath
            );
            tally.duplicate_content += 1;
        }
        FetchOutcome::Failed(e) => {
            update_error_stats(stats, &e);
            tally.failed += 1;
        }
    }
}

/// Sleeps for `delay` unless cancelled first. Returns false on cancellation.
pub(crate) async fn pause(delay: std::time::Duration, cancel: &CancellationToken) -> bool {
    if delay.is_zero() {
        return !cancel.is_cancelled();
    }
    tokio::select! {
        biased;
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(delay) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_pause_honours_cancellation() {
        let cancel = CancellationToken::new();
        assert!(pause(Duration::from_millis(1), &cancel).await);
        assert!(pause(Duration::ZERO, &cancel).await);

        cancel.cancel();
        assert!(!pause(Duration::from_secs(60), &cancel).await);
        assert!(!pause(Duration::ZERO, &cancel).await);
    }
}
