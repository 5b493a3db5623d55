//! Site adapter seam.
//!
//! Everything site-specific (login, page scraping, selectors) lives behind
//! `SiteAdapter`. The core only asks for one listing page at a time; the
//! paging rules live in `albums::pagination`.

use crate::albums::types::{AlbumRecord, AlbumType};

/// Source of album listings and photo URLs.
///
/// Pages are numbered from 1. An empty page means there is nothing more.
#[allow(async_fn_in_trait)]
pub trait SiteAdapter {
    /// Albums on one listing page.
    async fn album_page(&self, album_type: AlbumType, page: u32) -> anyhow::Result<Vec<AlbumRecord>>;

    /// Raw photo URLs on one page of an album, in page order.
    async fn photo_page(&self, album_link: &str, page: u32) -> anyhow::Result<Vec<String>>;
}
