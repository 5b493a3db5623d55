//! Batch statistics for one download run.

use std::time::Duration;

use crate::error_handling::ErrorType;

/// Results of a download run.
///
/// Every candidate photo ends up in exactly one of `downloaded`,
/// `skipped_duplicate`, `skipped_existing`, `duplicate_content` or `failed`,
/// unless the run was cancelled before reaching it.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Albums left after filtering
    pub total_albums: usize,
    /// Albums fully walked (photos downloaded, skipped or failed)
    pub processed_albums: usize,
    /// Candidate photos across all processed albums
    pub total_photos: usize,
    /// Photos saved and recorded
    pub downloaded: usize,
    /// Photos dropped before any request because history already knows them
    pub skipped_duplicate: usize,
    /// Photos whose destination file or history record already existed
    pub skipped_existing: usize,
    /// Photos downloaded and then discarded because their content was archived
    pub duplicate_content: usize,
    /// Photos that could not be downloaded
    pub failed: usize,
    /// Bytes written for downloaded photos
    pub total_bytes: u64,
    /// Wall time of the run
    pub elapsed: Duration,
    /// The run stopped early on an interrupt
    pub cancelled: bool,
    /// Nothing was written
    pub dry_run: bool,
    /// Non-zero failure counters
    pub error_counts: Vec<(ErrorType, usize)>,
}

impl RunReport {
    /// Photos not downloaded for a reason other than failure.
    pub fn skipped(&self) -> usize {
        self.skipped_duplicate + self.skipped_existing + self.duplicate_content
    }

    /// Adds another album's counters into this report.
    pub(crate) fn absorb(&mut self, album: &AlbumTally) {
        self.total_photos += album.candidates;
        self.downloaded += album.downloaded;
        self.skipped_duplicate += album.skipped_duplicate;
        self.skipped_existing += album.skipped_existing;
        self.duplicate_content += album.duplicate_content;
        self.failed += album.failed;
        self.total_bytes += album.bytes;
    }
}

/// Counters for a single album.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct AlbumTally {
    pub candidates: usize,
    pub downloaded: usize,
    pub skipped_duplicate: usize,
    pub skipped_existing: usize,
    pub duplicate_content: usize,
    pub failed: usize,
    pub bytes: u64,
    /// The album loop stopped on cancellation
    pub cancelled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absorb_and_skipped() {
        let mut report = RunReport::default();
        report.absorb(&AlbumTally {
            candidates: 5,
            downloaded: 2,
            skipped_duplicate: 1,
            skipped_existing: 1,
            duplicate_content: 1,
            failed: 0,
            bytes: 2048,
            cancelled: false,
        });
        report.absorb(&AlbumTally {
            candidates: 1,
            failed: 1,
            ..Default::default()
        });

        assert_eq!(report.total_photos, 6);
        assert_eq!(report.downloaded, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.skipped(), 3);
        assert_eq!(report.total_bytes, 2048);
    }
}
