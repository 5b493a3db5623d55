//! Photo URL classification and thumbnail rewriting.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::utils::compile_regex;

/// File extensions accepted as photos (matched anywhere in the URL).
const PHOTO_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".bmp", ".webp"];

/// Filename suffixes marking a scaled-down variant, always followed by a dot.
const THUMBNAIL_MARKERS: &[&str] = &["-small.", "_thumb.", "_medium.", "_s.", "_m.", "_l."];

/// Query parameters that request a resized rendition.
const SIZE_PARAMS: &[&str] = &["w", "h", "size"];

const THUMBNAIL_MARKER_PATTERN: &str = r"(?:-small|_thumb|_medium|_s|_m|_l)\.";

static THUMBNAIL_MARKER: LazyLock<Option<Regex>> =
    LazyLock::new(|| compile_regex(THUMBNAIL_MARKER_PATTERN));

/// Classifies and rewrites candidate photo URLs.
///
/// Only URLs on `host` (the photo CDN) are ever trusted as full-resolution.
#[derive(Debug, Clone)]
pub struct UrlNormalizer {
    host: String,
}

/// Result of normalizing one album's raw URL list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedUrls {
    /// Plausible photo URLs, rewritten, first occurrence kept, input order
    pub urls: Vec<String>,
    /// Rejected as non-photos
    pub rejected: usize,
    /// Thumbnails rewritten to their presumed original
    pub rewritten: usize,
    /// Dropped because they are not full-resolution on the trusted host,
    /// even after rewriting
    pub untrusted: usize,
    /// Repeats dropped after rewriting
    pub repeated: usize,
}

impl UrlNormalizer {
    /// Creates a normalizer trusting `host`.
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }

    /// Trusted photo host.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Whether `url` can be a photo at all: not a data URI and carrying an
    /// image extension.
    pub fn is_plausible_photo(&self, url: &str) -> bool {
        if url.is_empty() || url.starts_with("data:") {
            return false;
        }
        let lower = url.to_lowercase();
        PHOTO_EXTENSIONS.iter().any(|ext| lower.contains(ext))
    }

    /// Strips thumbnail markers and size parameters.
    ///
    /// Best effort: the result is not guaranteed to exist. Applying it twice
    /// gives the same URL as applying it once.
    pub fn to_full_resolution(&self, url: &str) -> String {
        let mut current = strip_size_params(url);
        if let Some(re) = THUMBNAIL_MARKER.as_ref() {
            // Each pass shortens the string, so this terminates
            loop {
                let next = re.replace_all(&current, ".").into_owned();
                if next == current {
                    break;
                }
                current = next;
            }
        }
        current
    }

    /// Whether `url` is on the trusted host with no thumbnail marker and no
    /// size parameter.
    pub fn is_full_resolution(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        if parsed.host_str() != Some(self.host.as_str()) {
            return false;
        }
        if THUMBNAIL_MARKERS.iter().any(|m| url.contains(m)) {
            return false;
        }
        !has_size_params(&parsed)
    }

    /// Normalizes one album's raw URL list.
    ///
    /// Non-photos are dropped and anything not already full-resolution is
    /// rewritten. What is still not a full-resolution URL on the trusted host
    /// is dropped, then repeats are removed keeping the first occurrence.
    pub fn normalize_all<I, S>(&self, raw: I) -> NormalizedUrls
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = NormalizedUrls::default();
        let mut seen = std::collections::HashSet::new();

        for url in raw {
            let url = url.as_ref().trim();
            if !self.is_plausible_photo(url) {
                out.rejected += 1;
                continue;
            }
            let url = if self.is_full_resolution(url) {
                url.to_string()
            } else {
                let full = self.to_full_resolution(url);
                if full != url {
                    out.rewritten += 1;
                }
                full
            };
            if !self.is_full_resolution(&url) {
                out.untrusted += 1;
                continue;
            }
            if seen.insert(url.clone()) {
                out.urls.push(url);
            } else {
                out.repeated += 1;
            }
        }
        out
    }
}

fn has_size_params(url: &Url) -> bool {
    url.query_pairs()
        .any(|(k, _)| SIZE_PARAMS.contains(&&*k))
}

/// Drops `w`, `h` and `size` query parameters whatever their value, leaving
/// the URL untouched when there are none.
fn strip_size_params(url: &str) -> String {
    let Ok(mut parsed) = Url::parse(url) else {
        return url.to_string();
    };
    if !has_size_params(&parsed) {
        return url.to_string();
    }
    let kept: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(k, _)| !SIZE_PARAMS.contains(&&**k))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if kept.is_empty() {
        parsed.set_query(None);
    } else {
        parsed.query_pairs_mut().clear().extend_pairs(kept);
    }
    parsed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST: &str = "isai-prod-v2.s3.hicloud.net.tw";

    fn normalizer() -> UrlNormalizer {
        UrlNormalizer::new(HOST)
    }

    #[test]
    fn test_is_plausible_photo() {
        let n = normalizer();
        assert!(n.is_plausible_photo("https://x/a.JPG"));
        assert!(n.is_plausible_photo("https://x/a.webp?v=1"));
        assert!(!n.is_plausible_photo("data:image/png;base64,AAAA.png"));
        assert!(!n.is_plausible_photo("https://x/page.html"));
        assert!(!n.is_plausible_photo(""));
    }

    #[test]
    fn test_small_suffix_round_trip() {
        let n = normalizer();
        let full = n.to_full_resolution("https://host/x-small.jpg");
        assert_eq!(full, "https://host/x.jpg");
        assert_eq!(n.to_full_resolution(&full), full);
    }

    #[test]
    fn test_thumbnail_markers_rewritten() {
        let n = normalizer();
        assert_eq!(n.to_full_resolution("https://h/a_thumb.jpg"), "https://h/a.jpg");
        assert_eq!(n.to_full_resolution("https://h/a_medium.png"), "https://h/a.png");
        assert_eq!(n.to_full_resolution("https://h/a_s.jpg"), "https://h/a.jpg");
        assert_eq!(n.to_full_resolution("https://h/a_l.jpg"), "https://h/a.jpg");
    }

    #[test]
    fn test_stacked_markers_are_idempotent() {
        let n = normalizer();
        let once = n.to_full_resolution("https://h/a-small-small.jpg");
        assert_eq!(once, "https://h/a.jpg");
        assert_eq!(n.to_full_resolution(&once), once);
    }

    #[test]
    fn test_size_params_removed() {
        let n = normalizer();
        assert_eq!(n.to_full_resolution("https://h/a.jpg?w=200"), "https://h/a.jpg");
        assert_eq!(
            n.to_full_resolution("https://h/a.jpg?size=large"),
            "https://h/a.jpg"
        );
        assert_eq!(
            n.to_full_resolution("https://h/a.jpg?size=3&token=abc"),
            "https://h/a.jpg?token=abc"
        );
        assert_eq!(
            n.to_full_resolution("https://h/a.jpg?token=abc"),
            "https://h/a.jpg?token=abc"
        );
    }

    #[test]
    fn test_is_full_resolution_trusts_only_known_host() {
        let n = normalizer();
        assert!(n.is_full_resolution(&format!("https://{HOST}/album/abc.jpg")));
        assert!(!n.is_full_resolution("https://example.com/album/abc.jpg"));
        assert!(!n.is_full_resolution(&format!("https://{HOST}/album/abc-small.jpg")));
        assert!(!n.is_full_resolution(&format!("https://{HOST}/album/abc.jpg?w=100")));
        assert!(!n.is_full_resolution(&format!("https://{HOST}/album/abc.jpg?size=large")));
        assert!(!n.is_full_resolution(&format!("https://{HOST}/album/abc.jpg?w=")));
        assert!(n.is_full_resolution(&format!("https://{HOST}/album/abc.jpg?token=abc")));
        assert!(!n.is_full_resolution("not a url"));
    }

    #[test]
    fn test_normalize_all() {
        let n = normalizer();
        let raw = [
            format!("https://{HOST}/a.jpg"),
            "data:image/png;base64,xx".to_string(),
            format!("https://{HOST}/a-small.jpg"),
            format!("https://{HOST}/b_thumb.jpg"),
            "https://x/readme.txt".to_string(),
            "https://elsewhere.example/c.jpg".to_string(),
        ];
        let out = n.normalize_all(&raw);
        assert_eq!(
            out.urls,
            vec![format!("https://{HOST}/a.jpg"), format!("https://{HOST}/b.jpg")]
        );
        assert_eq!(out.rejected, 2);
        assert_eq!(out.rewritten, 2);
        assert_eq!(out.untrusted, 1);
        assert_eq!(out.repeated, 1);
    }
}
