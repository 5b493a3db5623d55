//! Album selection by date window, novelty and title keywords.

use chrono::NaiveDate;
use log::info;

use crate::albums::types::AlbumRecord;
use crate::config::Config;

/// Which albums to download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumFilter {
    /// First date included
    pub start: NaiveDate,
    /// Last date included
    pub end: NaiveDate,
    /// Only albums flagged as new
    pub new_only: bool,
    /// Any of these must appear in the title (case-insensitive); empty means all
    pub keywords: Vec<String>,
}

impl AlbumFilter {
    /// Filter described by a run configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            start: config.start_date,
            end: config.end_date,
            new_only: config.new_only,
            keywords: config.keywords.clone(),
        }
    }

    fn keyword_match(&self, title: &str) -> bool {
        if self.keywords.is_empty() {
            return true;
        }
        let title = title.to_lowercase();
        self.keywords
            .iter()
            .any(|k| title.contains(&k.to_lowercase()))
    }

    /// Whether `album` is selected. Albums without a date never are.
    pub fn matches(&self, album: &AlbumRecord) -> bool {
        let Some(date) = album.date else {
            return false;
        };
        (self.start..=self.end).contains(&date)
            && (!self.new_only || album.is_new)
            && self.keyword_match(&album.title)
    }
}

/// Keeps the albums `filter` selects, in input order, logging every decision.
pub fn filter_albums(albums: Vec<AlbumRecord>, filter: &AlbumFilter) -> Vec<AlbumRecord> {
    let mut description = format!("Selecting albums dated {} to {}", filter.start, filter.end);
    if filter.new_only {
        description.push_str(", new only");
    }
    if !filter.keywords.is_empty() {
        description.push_str(&format!(", keywords: {}", filter.keywords.join(", ")));
    }
    info!("{description}");

    let total = albums.len();
    let selected: Vec<AlbumRecord> = albums
        .into_iter()
        .filter(|album| {
            let title: String = album.title.chars().take(30).collect();
            let new_marker = if album.is_new { " [NEW]" } else { "" };
            match album.date {
                None => {
                    info!("Album {title}{new_marker} | date: unresolved ({:?}) | skipped", album.date_text);
                    false
                }
                Some(date) => {
                    let selected = filter.matches(album);
                    info!(
                        "Album {title}{new_marker} | date: {date} | in range: {} | selected: {selected}",
                        (filter.start..=filter.end).contains(&date)
                    );
                    selected
                }
            }
        })
        .collect();

    info!("{} of {total} albums selected", selected.len());
    selected
}
