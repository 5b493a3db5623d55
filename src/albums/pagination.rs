//! Pagination over a `SiteAdapter`.
//!
//! Album listings: at most `MAX_ALBUM_PAGES` pages; stop at an empty page, or
//! after a short page (fewer than `ALBUM_PAGE_SIZE` albums), which is kept.
//!
//! Photo listings: at most `MAX_PHOTO_PAGES` pages; stop at an empty page.
//!
//! A page that fails to load ends the listing with what was collected so far.

use std::collections::HashSet;

use log::{debug, info, warn};

use crate::albums::adapter::SiteAdapter;
use crate::albums::types::{AlbumRecord, AlbumType};
use crate::config::{ALBUM_PAGE_SIZE, MAX_ALBUM_PAGES, MAX_PHOTO_PAGES};

/// Every album of `album_type`, in listing order.
pub async fn list_albums<A: SiteAdapter>(adapter: &A, album_type: AlbumType) -> Vec<AlbumRecord> {
    let mut albums = Vec::new();

    for page in 1..=MAX_ALBUM_PAGES {
        let page_albums = match adapter.album_page(album_type, page).await {
            Ok(albums) => albums,
            Err(e) => {
                warn!("Failed to load {album_type} album page {page}: {e:#}");
                break;
            }
        };
        if page_albums.is_empty() {
            debug!("{album_type} album page {page} is empty, stopping");
            break;
        }

        let short_page = page_albums.len() < ALBUM_PAGE_SIZE;
        debug!(
            "{album_type} album page {page}: {} albums",
            page_albums.len()
        );
        albums.extend(page_albums);
        if short_page {
            debug!("{album_type} album page {page} is short, treating it as the last");
            break;
        }
    }

    info!("Found {} {album_type} albums", albums.len());
    albums
}

/// Every photo URL of an album, first occurrence kept, in page order.
pub async fn list_photo_urls<A: SiteAdapter>(adapter: &A, album_link: &str) -> Vec<String> {
    let mut urls = Vec::new();
    let mut seen = HashSet::new();

    for page in 1..=MAX_PHOTO_PAGES {
        let page_urls = match adapter.photo_page(album_link, page).await {
            Ok(urls) => urls,
            Err(e) => {
                warn!("Failed to load photo page {page} of {album_link}: {e:#}");
                break;
            }
        };
        if page_urls.is_empty() {
            break;
        }
        debug!("Photo page {page} of {album_link}: {} URLs", page_urls.len());
        for url in page_urls {
            if seen.insert(url.clone()) {
                urls.push(url);
            }
        }
    }

    urls
}
