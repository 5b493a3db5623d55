//! Album types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which album listing an album comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlbumType {
    /// Campus-wide albums
    School,
    /// Albums of the child's class
    Class,
}

impl AlbumType {
    /// Folder under the archive root.
    pub fn folder_name(&self) -> &'static str {
        match self {
            AlbumType::School => "校園相簿",
            AlbumType::Class => "班級相簿",
        }
    }

    /// Key used in manifests and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            AlbumType::School => "school",
            AlbumType::Class => "class",
        }
    }
}

impl std::fmt::Display for AlbumType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An album as listed by the site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumRecord {
    /// Album title
    pub title: String,
    /// Resolved album date; `None` when the date text could not be parsed
    pub date: Option<NaiveDate>,
    /// Date text as shown on the site
    pub date_text: String,
    /// Link to the album's photo pages
    pub link: String,
    /// Flagged as new by the site
    pub is_new: bool,
    /// Position in the listing, across pages, starting at 0
    pub page_order: usize,
    /// Numeric album id, when the link carries one
    pub album_id: Option<i64>,
}

impl AlbumRecord {
    /// `YYYY-MM-DD` of the album date, used in photo file names.
    pub fn date_string(&self) -> Option<String> {
        self.date.map(|d| d.format("%Y-%m-%d").to_string())
    }
}
