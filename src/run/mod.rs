//! Download run coordinator.
//!
//! Owns the history store for the duration of a run. Albums are processed one
//! after another; the history is saved after every album and once more when
//! the run ends, always at a photo boundary.

mod album;
mod report;

use std::time::Instant;

use anyhow::{Context, Result};
use log::{error, info, warn};
use tokio_util::sync::CancellationToken;

use crate::albums::{filter_albums, list_albums, AlbumFilter, AlbumRecord, AlbumType, SiteAdapter};
use crate::app::statistics::print_run_summary;
use crate::config::Config;
use crate::download::DownloadEngine;
use crate::error_handling::ProcessingStats;
use crate::history::HistoryStore;
use crate::initialization::{init_base_dir, init_client};
use crate::photos::UrlNormalizer;

use album::{pause, preview_album, process_album, AlbumContext};
pub use report::RunReport;

/// Runs a download with the provided configuration.
///
/// Lists the albums of every configured album type through `adapter`, keeps
/// those the date window, novelty and keyword settings select, and downloads
/// their photos into `config.base_dir`. Photos whose content is already in the
/// history are skipped.
///
/// Cancelling `cancel` stops the run at the next photo boundary; the photo in
/// flight is discarded and the history is saved with everything completed so
/// far.
///
/// # Errors
///
/// Only setup failures are errors: the base directory cannot be resolved or
/// created, or the HTTP client cannot be built. Album and photo failures are counted in
/// the returned report.
///
/// # Example
///
/// ```no_run
/// use photo_archiver::{run_download, Config, ManifestAdapter};
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> anyhow::Result<()> {
/// let adapter = ManifestAdapter::from_path(std::path::Path::new("albums.json"))?;
/// let report = run_download(Config::default(), &adapter, CancellationToken::new()).await?;
/// println!("{} downloaded, {} failed", report.downloaded, report.failed);
/// # Ok(())
/// # }
/// ```
pub async fn run_download<A: SiteAdapter>(
    mut config: Config,
    adapter: &A,
    cancel: CancellationToken,
) -> Result<RunReport> {
    let start_time = Instant::now();

    // Recorded paths must stay valid from any working directory
    config.base_dir = std::path::absolute(&config.base_dir).with_context(|| {
        format!("Invalid archive base directory {}", config.base_dir.display())
    })?;

    let mut history = HistoryStore::load(&config.history_file);
    history.rebuild_hash_index();
    info!(
        "Loaded {} history records from {}",
        history.len(),
        history.path().display()
    );

    let selected = select_albums(&config, adapter).await;
    let total_albums = selected.iter().map(|(_, albums)| albums.len()).sum();
    let mut report = RunReport {
        total_albums,
        dry_run: config.dry_run,
        ..Default::default()
    };

    if total_albums == 0 {
        info!("No albums matched the selection");
        report.elapsed = start_time.elapsed();
        return Ok(report);
    }
    info!("{total_albums} albums selected");

    let normalizer = UrlNormalizer::new(config.photo_host.clone());
    let ctx = AlbumContext {
        adapter,
        config: &config,
        normalizer: &normalizer,
        cancel: &cancel,
    };

    if config.dry_run {
        for (album_type, albums) in &selected {
            for album in albums {
                let tally = preview_album(&ctx, *album_type, album, &history).await;
                report.absorb(&tally);
                report.processed_albums += 1;
            }
        }
        report.elapsed = start_time.elapsed();
        info!(
            "[dry run] {} albums, {} photos, {} would be downloaded",
            report.total_albums,
            report.total_photos,
            report.total_photos - report.skipped_duplicate
        );
        return Ok(report);
    }

    init_base_dir(&config.base_dir).context("Failed to create the archive base directory")?;
    let client = init_client(&config).context("Failed to initialize HTTP client")?;
    let engine = DownloadEngine::new(client, config.retry_policy(), config.min_image_bytes)
        .with_request_delay(config.download_delay);
    let error_stats = ProcessingStats::new();

    let album_count = total_albums;
    let mut position = 0usize;
    'albums: for (album_type, albums) in &selected {
        for album in albums {
            if cancel.is_cancelled() {
                report.cancelled = true;
                break 'albums;
            }
            position += 1;
            info!(
                "Album {position}/{album_count} [{}] {} ({})",
                album_type.folder_name(),
                album.title,
                album.date_text
            );

            let tally =
                process_album(&ctx, &engine, *album_type, album, &mut history, &error_stats).await;
            report.absorb(&tally);
            save_history(&history);

            if tally.cancelled {
                report.cancelled = true;
                break 'albums;
            }
            report.processed_albums += 1;

            if position < album_count && !pause(config.album_delay, &cancel).await {
                report.cancelled = true;
                break 'albums;
            }
        }
    }

    if report.cancelled {
        warn!("Run interrupted; progress up to the last completed photo is saved");
    }

    report.error_counts = error_stats.non_zero();
    report.elapsed = start_time.elapsed();
    print_run_summary(&report, &history);
    Ok(report)
}

/// Albums to process per album type, in configuration order.
async fn select_albums<A: SiteAdapter>(
    config: &Config,
    adapter: &A,
) -> Vec<(AlbumType, Vec<AlbumRecord>)> {
    let filter = AlbumFilter::from_config(config);
    let mut selected = Vec::with_capacity(config.album_types.len());
    for album_type in &config.album_types {
        let albums = list_albums(adapter, *album_type).await;
        let kept = filter_albums(albums, &filter);
        info!("{} {album_type} albums selected", kept.len());
        selected.push((*album_type, kept));
    }
    selected
}

fn save_history(history: &HistoryStore) {
    if let Err(e) = history.save() {
        error!(
            "Failed to save history to {}: {e}",
            history.path().display()
        );
    }
}
