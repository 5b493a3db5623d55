//! Photo URL pipeline: normalize, order, then filter out what is already
//! archived.

pub mod filter;
pub mod normalize;
pub mod order;

// Re-export public API
pub use filter::{embedded_content_hash, filter_known_photos, known_photo, DropReason, FilterOutcome};
pub use normalize::{NormalizedUrls, UrlNormalizer};
pub use order::{classify_filename, natural_cmp, order_photo_urls, url_filename, NameKind};
