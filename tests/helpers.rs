// Shared test helpers for synthesizing photos and building run configurations.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::io::Cursor;
use std::path::Path;
use std::time::Duration;

use chrono::NaiveDate;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use photo_archiver::{AlbumType, Config};

/// Date every test album carries.
#[allow(dead_code)] // Used by other test files
pub const ALBUM_DATE: &str = "2024/05/01";

/// A valid PNG of random pixels, well above the 1KB minimum.
///
/// Different seeds give different bytes, so different content hashes.
pub fn random_png(seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let img: ImageBuffer<Rgb<u8>, Vec<u8>> =
        ImageBuffer::from_fn(64, 64, |_, _| Rgb([rng.random(), rng.random(), rng.random()]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("Failed to encode test PNG");
    bytes
}

/// Host part of a mock server URL, as the URL normalizer sees it.
#[allow(dead_code)] // Used by other test files
pub fn server_host(server: &httptest::Server) -> String {
    let url = url::Url::parse(&server.url("/").to_string()).expect("Mock server URL is valid");
    url.host_str().expect("Mock server URL has a host").to_string()
}

/// Run configuration writing into `dir`, trusting `photo_host`, with no delays.
#[allow(dead_code)] // Used by other test files
pub fn test_config(dir: &Path, photo_host: &str) -> Config {
    Config {
        base_dir: dir.join("photos"),
        history_file: dir.join("download_history.json"),
        album_types: vec![AlbumType::School],
        start_date: NaiveDate::from_ymd_opt(2024, 4, 1).expect("valid date"),
        end_date: NaiveDate::from_ymd_opt(2024, 5, 31).expect("valid date"),
        new_only: false,
        photo_host: photo_host.to_string(),
        retry_base_delay: Duration::from_millis(1),
        retry_max_delay: Duration::from_millis(5),
        request_timeout: Duration::from_secs(5),
        download_delay: Duration::ZERO,
        album_delay: Duration::ZERO,
        ..Default::default()
    }
}

/// Manifest JSON with a single school album holding `photos`.
#[allow(dead_code)] // Used by other test files
pub fn single_album_manifest(title: &str, photos: &[String]) -> String {
    serde_json::json!({
        "school": [{
            "title": title,
            "date": ALBUM_DATE,
            "link": "https://portal.example/Album/Detail?id=1",
            "is_new": true,
            "photos": photos,
        }]
    })
    .to_string()
}
