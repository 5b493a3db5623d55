//! Content hashing.
//!
//! Photos are identified by the MD5 digest of their bytes, rendered as
//! lowercase hex. The photo CDN embeds the same digest in its filenames, which
//! is what lets a URL be recognized as already downloaded before fetching it.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use md5::{Digest, Md5};

const READ_CHUNK_SIZE: usize = 64 * 1024;

/// Hashes the file at `path`, streaming it in chunks.
pub fn hash_file(path: &Path) -> std::io::Result<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut hasher = Md5::new();
    let mut chunk = vec![0_u8; READ_CHUNK_SIZE];

    loop {
        let bytes_read = reader.read(&mut chunk)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&chunk[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Hashes the file at `path`, returning an empty string on failure.
///
/// An empty hash marks a record that takes no part in duplicate detection.
pub fn hash_file_or_empty(path: &Path) -> String {
    match hash_file(path) {
        Ok(hash) => hash,
        Err(e) => {
            log::warn!("Could not hash {}: {e}", path.display());
            String::new()
        }
    }
}

/// Hashes an in-memory buffer.
pub fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
