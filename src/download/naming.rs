//! Destination layout and file naming.
//!
//! Photos land in `{base}/{album type}/{album title}/{date}_{seq}{ext}`, where
//! `seq` continues after the highest number already present for that date.

use std::fs;
use std::path::{Path, PathBuf};

use url::Url;

use crate::albums::AlbumType;
use crate::config::{FALLBACK_EXTENSION, MAX_FILENAME_CHARS, SEQUENCED_EXTENSIONS};

/// Characters not allowed in file or folder names on common file systems.
const UNSAFE_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Makes `name` safe as a file or folder name.
///
/// Unsafe characters become `_`, whitespace runs collapse to one space, the
/// ends are trimmed and the result is capped at `MAX_FILENAME_CHARS`
/// characters. CJK text is kept as is.
pub fn sanitize_filename(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if UNSAFE_CHARS.contains(&c) { '_' } else { c })
        .collect();
    let collapsed = replaced.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(MAX_FILENAME_CHARS).collect()
}

/// Folder for one album.
pub fn album_folder(base: &Path, album_type: AlbumType, title: &str) -> PathBuf {
    base.join(album_type.folder_name())
        .join(sanitize_filename(title))
}

/// Lower-case extension of the URL path, with its dot; `.jpg` if none.
pub fn extension_from_url(url: &str) -> String {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.split(['?', '#']).next().unwrap_or(url).to_string(),
    };
    let last = path.rsplit('/').next().unwrap_or(&path);
    Path::new(last)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string())
}

/// `{date}_{seq:03}{ext}`.
pub fn photo_filename(date: &str, sequence: u32, extension: &str) -> String {
    format!("{date}_{sequence:03}{extension}")
}

/// Sequence number a new photo dated `date` should start at in `folder`.
///
/// One past the highest `{date}_NNN` among jpg/jpeg/png/gif files, or 1 when
/// there are none or the folder does not exist yet.
pub fn next_sequence(folder: &Path, date: &str) -> u32 {
    let Ok(entries) = fs::read_dir(folder) else {
        return 1;
    };
    let prefix = format!("{date}_");
    entries
        .filter_map(Result::ok)
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter_map(|name| sequence_of(&name, &prefix))
        .max()
        .map_or(1, |max| max.saturating_add(1))
}

fn sequence_of(name: &str, prefix: &str) -> Option<u32> {
    let rest = name.strip_prefix(prefix)?;
    let (number, ext) = rest.split_once('.')?;
    let ext = ext.rsplit('.').next()?;
    if !SEQUENCED_EXTENSIONS.contains(&ext) {
        return None;
    }
    number.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("  a<b>c:d  e  "), "a_b_c_d e");
        assert_eq!(sanitize_filename("戶外教學 / 動物園?"), "戶外教學 _ 動物園_");
        let long = "照".repeat(300);
        assert_eq!(sanitize_filename(&long).chars().count(), 200);
    }

    #[test]
    fn test_album_folder() {
        let folder = album_folder(Path::new("/archive"), AlbumType::Class, "Sports: Day");
        assert_eq!(folder, PathBuf::from("/archive/班級相簿/Sports_ Day"));
    }

    #[test]
    fn test_extension_from_url() {
        assert_eq!(extension_from_url("https://h/a/photo.JPG?x=1"), ".jpg");
        assert_eq!(extension_from_url("https://h/a/photo.png"), ".png");
        assert_eq!(extension_from_url("https://h/a/photo"), ".jpg");
        assert_eq!(extension_from_url("https://h/a.b/photo"), ".jpg");
    }

    #[test]
    fn test_photo_filename() {
        assert_eq!(photo_filename("2024-05-01", 7, ".jpg"), "2024-05-01_007.jpg");
        assert_eq!(photo_filename("2024-05-01", 1234, ".png"), "2024-05-01_1234.png");
    }

    #[test]
    fn test_next_sequence() {
        let dir = TempDir::new().unwrap();
        assert_eq!(next_sequence(&dir.path().join("missing"), "2024-05-01"), 1);
        assert_eq!(next_sequence(dir.path(), "2024-05-01"), 1);

        for name in [
            "2024-05-01_001.jpg",
            "2024-05-01_007.png",
            "2024-05-01_050.txt",
            "2024-05-02_099.jpg",
            "2024-05-01_abc.jpg",
        ] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        assert_eq!(next_sequence(dir.path(), "2024-05-01"), 8);
        assert_eq!(next_sequence(dir.path(), "2024-05-02"), 100);
    }
}
