//! Image integrity check for downloaded files.

use std::path::{Path, PathBuf};

use image::ImageReader;

use crate::error_handling::DownloadError;

/// Checks that the file at `path` decodes as an image.
///
/// The format is sniffed from the content, not the extension.
pub fn validate_image_blocking(path: &Path) -> Result<(), DownloadError> {
    let reader = ImageReader::open(path)?
        .with_guessed_format()
        .map_err(DownloadError::Io)?;
    if reader.format().is_none() {
        return Err(DownloadError::CorruptImage("unrecognized image format".into()));
    }
    reader
        .decode()
        .map(|_| ())
        .map_err(|e| DownloadError::CorruptImage(e.to_string()))
}

/// Async wrapper running the decode on the blocking pool.
pub async fn validate_image(path: PathBuf) -> Result<(), DownloadError> {
    tokio::task::spawn_blocking(move || validate_image_blocking(&path))
        .await
        .map_err(|e| DownloadError::CorruptImage(format!("validation task failed: {e}")))?
}
