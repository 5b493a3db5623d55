//! Per-album progress display.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const ALBUM_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}";

/// Progress bar over the photos of one album, drawn on stderr.
///
/// Hidden when `visible` is false; indicatif also hides it when stderr is not
/// a terminal.
pub(crate) fn album_progress_bar(len: u64, title: &str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let style = ProgressStyle::default_bar()
        .template(ALBUM_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");
    let bar = ProgressBar::with_draw_target(Some(len), ProgressDrawTarget::stderr_with_hz(5));
    bar.set_style(style);
    bar.set_message(title.to_string());
    bar
}
