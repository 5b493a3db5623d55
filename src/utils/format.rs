//! Human-readable sizes, durations and speeds for summaries.

use std::time::Duration;

const SIZE_UNITS: &[&str] = &["B", "KB", "MB", "GB"];

/// `0B`, `512.0B`, `1.5KB`, `2.0MB`, ...; GB is the largest unit.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0B".to_string();
    }
    #[allow(clippy::cast_precision_loss)] // Display only
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{size:.1}{}", SIZE_UNITS[unit])
}

/// `12.3s`, `4m 5.0s` or `1h 2m 3.0s`.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 60.0 {
        return format!("{secs:.1}s");
    }
    let whole = duration.as_secs();
    let frac = secs - (whole - whole % 60) as f64;
    if secs < 3600.0 {
        format!("{}m {frac:.1}s", whole / 60)
    } else {
        format!("{}h {}m {frac:.1}s", whole / 3600, (whole % 3600) / 60)
    }
}

/// Average speed such as `1.2MB/s`, or `N/A` for a zero duration.
pub fn download_speed(bytes: u64, elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return "N/A".to_string();
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let per_sec = (bytes as f64 / secs) as u64;
    format!("{}/s", format_file_size(per_sec))
}
