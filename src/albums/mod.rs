//! Albums: records, the site adapter seam, pagination, selection and date
//! resolution.

mod adapter;
mod date;
mod filter;
mod manifest;
mod pagination;
mod types;

// Re-export public API
pub use adapter::SiteAdapter;
pub use date::{parse_album_date, parse_date_arg};
pub use filter::{filter_albums, AlbumFilter};
pub use manifest::{ManifestAdapter, MANIFEST_PHOTO_PAGE_SIZE};
pub use pagination::{list_albums, list_photo_urls};
pub use types::{AlbumRecord, AlbumType};
