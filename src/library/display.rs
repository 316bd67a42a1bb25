use std::time::Duration;

use super::model::Track;

/// Format a `Duration` as `M:SS` (minutes are not padded).
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Build the one-line `Artist - Title` label used for logging and the status line.
pub fn track_label(track: &Track) -> String {
    let artist = track.artist.trim();
    let title = track.title.trim();
    if artist.is_empty() {
        title.to_string()
    } else {
        format!("{artist} - {title}")
    }
}
