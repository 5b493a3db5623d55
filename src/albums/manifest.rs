//! File-backed site adapter.
//!
//! A manifest is a JSON snapshot of the site's listings, produced by whatever
//! scrapes the portal:
//!
//! ```json
//! {
//!   "school": [
//!     {
//!       "title": "運動會",
//!       "date": "2024/10/26",
//!       "link": "https://portal.example/Album/Detail?id=1604012",
//!       "is_new": true,
//!       "album_id": 1604012,
//!       "photos": ["https://isai-prod-v2.s3.hicloud.net.tw/.../a_5d41....jpg"]
//!     }
//!   ],
//!   "class": []
//! }
//! ```
//!
//! `date` is free text resolved with `parse_album_date`. Listings are served
//! in pages of `ALBUM_PAGE_SIZE` albums and `MANIFEST_PHOTO_PAGE_SIZE` photos.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::albums::adapter::SiteAdapter;
use crate::albums::date::parse_album_date;
use crate::albums::types::{AlbumRecord, AlbumType};
use crate::config::ALBUM_PAGE_SIZE;

/// Photos per page when serving a manifest album.
pub const MANIFEST_PHOTO_PAGE_SIZE: usize = 60;

#[derive(Debug, Clone, Deserialize)]
struct ManifestAlbum {
    title: String,
    #[serde(default)]
    date: String,
    link: String,
    #[serde(default)]
    is_new: bool,
    #[serde(default)]
    album_id: Option<i64>,
    #[serde(default)]
    photos: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ManifestFile {
    #[serde(default)]
    school: Vec<ManifestAlbum>,
    #[serde(default)]
    class: Vec<ManifestAlbum>,
}

/// Serves albums and photo URLs from a manifest.
#[derive(Debug, Default)]
pub struct ManifestAdapter {
    albums: HashMap<AlbumType, Vec<AlbumRecord>>,
    photos: HashMap<String, Vec<String>>,
}

impl ManifestAdapter {
    /// Reads a manifest file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("Invalid manifest {}", path.display()))
    }

    /// Parses a manifest from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: ManifestFile = serde_json::from_str(json)?;
        let mut adapter = Self::default();
        adapter.insert(AlbumType::School, file.school);
        adapter.insert(AlbumType::Class, file.class);
        Ok(adapter)
    }

    fn insert(&mut self, album_type: AlbumType, entries: Vec<ManifestAlbum>) {
        let records = entries
            .into_iter()
            .enumerate()
            .map(|(page_order, entry)| {
                self.photos.insert(entry.link.clone(), entry.photos);
                AlbumRecord {
                    date: parse_album_date(&entry.date),
                    title: entry.title,
                    date_text: entry.date,
                    link: entry.link,
                    is_new: entry.is_new,
                    page_order,
                    album_id: entry.album_id,
                }
            })
            .collect();
        self.albums.insert(album_type, records);
    }

    /// Number of albums of a type.
    pub fn album_count(&self, album_type: AlbumType) -> usize {
        self.albums.get(&album_type).map_or(0, Vec::len)
    }
}

fn page_of<T: Clone>(items: &[T], page: u32, page_size: usize) -> Vec<T> {
    let start = (page.saturating_sub(1) as usize).saturating_mul(page_size);
    items
        .iter()
        .skip(start)
        .take(page_size)
        .cloned()
        .collect()
}

impl SiteAdapter for ManifestAdapter {
    async fn album_page(&self, album_type: AlbumType, page: u32) -> Result<Vec<AlbumRecord>> {
        Ok(self
            .albums
            .get(&album_type)
            .map(|albums| page_of(albums, page, ALBUM_PAGE_SIZE))
            .unwrap_or_default())
    }

    async fn photo_page(&self, album_link: &str, page: u32) -> Result<Vec<String>> {
        let photos = self
            .photos
            .get(album_link)
            .with_context(|| format!("Unknown album link {album_link}"))?;
        Ok(page_of(photos, page, MANIFEST_PHOTO_PAGE_SIZE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::albums::pagination::{list_albums, list_photo_urls};
    use chrono::NaiveDate;

    const MANIFEST: &str = r#"{
        "school": [
            {"title": "運動會", "date": "2024/10/26", "link": "L1", "is_new": true,
             "album_id": 7, "photos": ["a.jpg", "b.jpg"]},
            {"title": "無日期", "link": "L2"}
        ]
    }"#;

    #[test]
    fn test_parse_manifest() {
        let adapter = ManifestAdapter::from_json(MANIFEST).unwrap();
        assert_eq!(adapter.album_count(AlbumType::School), 2);
        assert_eq!(adapter.album_count(AlbumType::Class), 0);
    }

    #[test]
    fn test_invalid_manifest() {
        assert!(ManifestAdapter::from_json("[]").is_err());
    }

    #[tokio::test]
    async fn test_album_records() {
        let adapter = ManifestAdapter::from_json(MANIFEST).unwrap();
        let albums = list_albums(&adapter, AlbumType::School).await;
        assert_eq!(albums.len(), 2);
        assert_eq!(albums[0].date, NaiveDate::from_ymd_opt(2024, 10, 26));
        assert!(albums[0].is_new);
        assert_eq!(albums[0].album_id, Some(7));
        assert_eq!(albums[1].date, None);
        assert_eq!(albums[1].page_order, 1);
    }

    #[tokio::test]
    async fn test_photo_pages() {
        let photos: Vec<String> = (0..130).map(|i| format!("p{i}.jpg")).collect();
        let json = serde_json::json!({
            "class": [{"title": "t", "date": "2024-01-01", "link": "L", "photos": photos}]
        });
        let adapter = ManifestAdapter::from_json(&json.to_string()).unwrap();

        assert_eq!(adapter.photo_page("L", 1).await.unwrap().len(), 60);
        assert_eq!(adapter.photo_page("L", 3).await.unwrap().len(), 10);
        assert!(adapter.photo_page("L", 4).await.unwrap().is_empty());
        assert!(adapter.photo_page("nope", 1).await.is_err());
        assert_eq!(list_photo_urls(&adapter, "L").await.len(), 130);
    }
}
