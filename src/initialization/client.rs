//! HTTP client initialization.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::ClientBuilder;

use crate::config::{Config, IMAGE_ACCEPT_HEADER};

/// Initializes the HTTP client used for photo downloads.
///
/// Creates a `reqwest::Client` configured with:
/// - User-Agent header from the configuration
/// - An `Accept` header preferring images
/// - Per-request timeout from the configuration
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(config: &Config) -> Result<reqwest::Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(IMAGE_ACCEPT_HEADER));

    ClientBuilder::new()
        .timeout(config.request_timeout)
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .build()
}
