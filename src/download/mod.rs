//! Photo download: retry policy, request spacing, validation, naming and the
//! engine.

mod engine;
pub mod naming;
mod retry;
mod throttle;
mod validate;

// Re-export public API
pub use engine::{part_path, DownloadEngine, FetchOutcome};
pub use naming::{album_folder, extension_from_url, next_sequence, photo_filename, sanitize_filename};
pub use retry::RetryPolicy;
pub use throttle::RequestThrottle;
pub use validate::{validate_image, validate_image_blocking};
