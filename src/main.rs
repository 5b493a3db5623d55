//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `photo_archiver` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Confirmation prompts and user-facing output
//!
//! All core functionality is implemented in the library crate.

use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use dialoguer::Confirm;
use tokio_util::sync::CancellationToken;

use photo_archiver::config::{Cli, Command, DuplicatesAction};
use photo_archiver::initialization::init_logger_with;
use photo_archiver::{
    clean_duplicates, format_duration, format_file_size, plan_duplicate_cleanup, rebuild_index,
    run_download, show_stats, Config, ManifestAdapter,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    // Try loading from current directory first, then from the executable's directory
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let Cli {
        log_level,
        log_format,
        history_file,
        command,
    } = Cli::parse();

    init_logger_with(log_level.clone().into(), log_format.clone())
        .context("Failed to initialize logger")?;

    let result = match command {
        Command::Download(args) => {
            let manifest = args.manifest.clone();
            let skip_prompt = args.yes || args.dry_run;
            match args.into_config(history_file, log_level, log_format) {
                Ok(config) => download(config, &manifest, skip_prompt).await,
                Err(e) => Err(e.into()),
            }
        }
        Command::Stats => show_stats(&history_file).map(|stats| {
            println!(
                "{} files, {}, {} unique hashes, {} duplicate files",
                stats.total_files,
                format_file_size(stats.total_size),
                stats.unique_hashes,
                stats.duplicate_files
            );
        }),
        Command::Duplicates { action } => duplicates(&action, &history_file),
        Command::RebuildIndex => rebuild_index(&history_file).map(|report| {
            println!(
                "{} records valid, {} hashed now, {} files missing",
                report.already_hashed, report.backfilled, report.missing_files
            );
        }),
    };

    if let Err(e) = result {
        eprintln!("photo_archiver error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}

async fn download(config: Config, manifest: &Path, skip_prompt: bool) -> Result<()> {
    let adapter = ManifestAdapter::from_path(manifest)?;

    if !skip_prompt
        && !confirm(&format!(
            "Download albums dated {} to {} into {}?",
            config.start_date,
            config.end_date,
            config.base_dir.display()
        ))?
    {
        println!("Cancelled");
        return Ok(());
    }

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupt received, stopping after the current photo");
            on_interrupt.cancel();
        }
    });

    let report = run_download(config, &adapter, cancel).await?;
    if report.dry_run {
        println!(
            "Dry run: {} albums, {} photos, {} would be downloaded",
            report.total_albums,
            report.total_photos,
            report.total_photos - report.skipped_duplicate
        );
        return Ok(());
    }
    println!(
        "{} {} photo{} ({} skipped, {} failed, {}) in {}",
        if report.cancelled { "Interrupted after downloading" } else { "Downloaded" },
        report.downloaded,
        if report.downloaded == 1 { "" } else { "s" },
        report.skipped(),
        report.failed,
        format_file_size(report.total_bytes),
        format_duration(report.elapsed)
    );
    Ok(())
}

fn duplicates(action: &DuplicatesAction, history_file: &Path) -> Result<()> {
    match action {
        DuplicatesAction::List => {
            let plan = plan_duplicate_cleanup(history_file)?;
            println!(
                "{} duplicate groups, {} reclaimable",
                plan.groups.len(),
                format_file_size(plan.reclaimable_bytes())
            );
        }
        DuplicatesAction::DryRun => {
            let plan = plan_duplicate_cleanup(history_file)?;
            println!(
                "Would delete {} files ({}); nothing was changed",
                plan.file_count(),
                format_file_size(plan.reclaimable_bytes())
            );
        }
        DuplicatesAction::Clean { backup_dir, yes } => {
            let plan = plan_duplicate_cleanup(history_file)?;
            if plan.is_empty() {
                return Ok(());
            }
            let question = format!(
                "Delete {} duplicate files ({})?",
                plan.file_count(),
                format_file_size(plan.reclaimable_bytes())
            );
            if !*yes && !confirm(&question)? {
                println!("Cancelled");
                return Ok(());
            }
            let report = clean_duplicates(history_file, backup_dir.clone())?;
            println!(
                "Deleted {} files ({}), {} failed; backups in {}",
                report.deleted,
                format_file_size(report.deleted_bytes),
                report.failed,
                report.backup_dir.display()
            );
        }
    }
    Ok(())
}

/// Asks a yes/no question on the terminal, defaulting to no.
fn confirm(question: &str) -> Result<bool> {
    Confirm::new()
        .with_prompt(question)
        .show_default(true)
        .default(false)
        .interact()
        .context("Confirmation needs a terminal; pass --yes to skip it")
}
