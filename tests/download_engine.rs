//! Tests for the single-photo download engine against a mock HTTP server.

mod helpers;

use std::time::Duration;

use httptest::{matchers::*, responders::*, Expectation, Server};
use reqwest::StatusCode;
use tempfile::TempDir;

use photo_archiver::download::{part_path, DownloadEngine, FetchOutcome, RetryPolicy};
use photo_archiver::hashing::hash_bytes;
use photo_archiver::{DownloadError, HistoryStore};

use helpers::random_png;

fn engine(max_attempts: usize) -> DownloadEngine {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("Failed to build client");
    let policy = RetryPolicy::new(max_attempts, Duration::from_millis(1), Duration::from_millis(5));
    DownloadEngine::new(client, policy, 1024)
}

fn png_response(bytes: Vec<u8>) -> impl httptest::responders::Responder {
    status_code(200)
        .insert_header("Content-Type", "image/png")
        .body(bytes)
}

#[tokio::test]
async fn test_fetch_one_saves_and_records() {
    let dir = TempDir::new().unwrap();
    let server = Server::run();
    let bytes = random_png(1);
    server.expect(
        Expectation::matching(request::method_path("GET", "/a.png"))
            .times(1)
            .respond_with(png_response(bytes.clone())),
    );

    let url = server.url("/a.png").to_string();
    let dest = dir.path().join("2024-05-01_001.png");
    let mut history = HistoryStore::empty(dir.path().join("history.json"));

    let outcome = engine(3).fetch_one(&url, &dest, &mut history).await;

    match outcome {
        FetchOutcome::Downloaded { bytes: written, hash } => {
            assert_eq!(written, bytes.len() as u64);
            assert_eq!(hash, hash_bytes(&bytes));
        }
        other => panic!("Expected Downloaded, got {other:?}"),
    }
    assert_eq!(std::fs::read(&dest).unwrap(), bytes);
    assert!(!part_path(&dest).exists());
    assert!(history.is_recorded(&url, "2024-05-01_001.png"));
    assert!(history.is_content_duplicate(&hash_bytes(&bytes)).0);
}

#[tokio::test]
async fn test_transient_failure_is_attempted_max_retries_times() {
    let dir = TempDir::new().unwrap();
    let server = Server::run();
    // The server verifies on drop that exactly three requests arrived
    server.expect(
        Expectation::matching(request::method_path("GET", "/flaky.png"))
            .times(3)
            .respond_with(status_code(503)),
    );

    let url = server.url("/flaky.png").to_string();
    let dest = dir.path().join("2024-05-01_001.png");
    let mut history = HistoryStore::empty(dir.path().join("history.json"));

    let outcome = engine(3).fetch_one(&url, &dest, &mut history).await;

    assert!(matches!(
        outcome,
        FetchOutcome::Failed(DownloadError::HttpStatus(StatusCode::SERVICE_UNAVAILABLE))
    ));
    assert!(!dest.exists());
    assert!(!part_path(&dest).exists());
    assert!(history.is_empty());
}

#[tokio::test]
async fn test_retries_honour_request_delay() {
    let dir = TempDir::new().unwrap();
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/flaky.png"))
            .times(3)
            .respond_with(status_code(503)),
    );

    let url = server.url("/flaky.png").to_string();
    let dest = dir.path().join("2024-05-01_001.png");
    let mut history = HistoryStore::empty(dir.path().join("history.json"));
    // Backoff is 1-5ms, the request delay dominates
    let engine = engine(3).with_request_delay(Duration::from_millis(150));

    let started = std::time::Instant::now();
    let outcome = engine.fetch_one(&url, &dest, &mut history).await;

    assert!(matches!(outcome, FetchOutcome::Failed(_)));
    assert!(started.elapsed() >= Duration::from_millis(300));
}

#[tokio::test]
async fn test_non_image_content_is_not_retried() {
    let dir = TempDir::new().unwrap();
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/error.png"))
            .times(1)
            .respond_with(
                status_code(200)
                    .insert_header("Content-Type", "text/html")
                    .body(vec![b'x'; 4096]),
            ),
    );

    let url = server.url("/error.png").to_string();
    let dest = dir.path().join("2024-05-01_001.png");
    let mut history = HistoryStore::empty(dir.path().join("history.json"));

    let outcome = engine(3).fetch_one(&url, &dest, &mut history).await;

    assert!(matches!(outcome, FetchOutcome::Failed(DownloadError::NotAnImage(ref ct)) if ct == "text/html"));
    assert!(!dest.exists());
}

#[tokio::test]
async fn test_undersized_body_is_an_error_page() {
    let dir = TempDir::new().unwrap();
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/tiny.png"))
            .times(1)
            .respond_with(png_response(vec![0u8; 100])),
    );

    let url = server.url("/tiny.png").to_string();
    let dest = dir.path().join("2024-05-01_001.png");
    let mut history = HistoryStore::empty(dir.path().join("history.json"));

    let outcome = engine(3).fetch_one(&url, &dest, &mut history).await;

    assert!(matches!(
        outcome,
        FetchOutcome::Failed(DownloadError::TooSmall { declared: 100, minimum: 1024 })
    ));
    assert!(!dest.exists());
}

#[tokio::test]
async fn test_corrupt_image_is_discarded() {
    let dir = TempDir::new().unwrap();
    let server = Server::run();
    let mut truncated = random_png(2);
    truncated.truncate(truncated.len() / 2);
    server.expect(
        Expectation::matching(request::method_path("GET", "/broken.png"))
            .times(1)
            .respond_with(png_response(truncated)),
    );

    let url = server.url("/broken.png").to_string();
    let dest = dir.path().join("2024-05-01_001.png");
    let mut history = HistoryStore::empty(dir.path().join("history.json"));

    let outcome = engine(3).fetch_one(&url, &dest, &mut history).await;

    assert!(matches!(outcome, FetchOutcome::Failed(DownloadError::CorruptImage(_))));
    assert!(!dest.exists());
    assert!(!part_path(&dest).exists());
    assert!(history.is_empty());
}

#[tokio::test]
async fn test_duplicate_content_is_discarded() {
    let dir = TempDir::new().unwrap();
    let server = Server::run();
    let bytes = random_png(3);

    let existing = dir.path().join("2024-04-01_001.png");
    std::fs::write(&existing, &bytes).unwrap();
    let mut history = HistoryStore::empty(dir.path().join("history.json"));
    history.add_record("https://elsewhere/a.png", "2024-04-01_001.png", &existing, bytes.len() as u64);

    server.expect(
        Expectation::matching(request::method_path("GET", "/same.png"))
            .times(1)
            .respond_with(png_response(bytes)),
    );
    let url = server.url("/same.png").to_string();
    let dest = dir.path().join("2024-05-01_001.png");

    let outcome = engine(3).fetch_one(&url, &dest, &mut history).await;

    match outcome {
        FetchOutcome::Duplicate { existing: entry } => {
            assert_eq!(entry.filename, "2024-04-01_001.png");
        }
        other => panic!("Expected Duplicate, got {other:?}"),
    }
    assert!(!dest.exists());
    assert!(!part_path(&dest).exists());
    assert_eq!(history.len(), 1);
}
