use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::prelude::{Accessor, AudioFile, TaggedFileExt};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;
use crate::store::{Library, StoreError};

use super::display::track_label;
use super::model::Track;

/// Artist recorded when a file carries no artist tag.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

#[derive(Debug, Error)]
pub enum PickError {
    #[error("no such file or directory: {}", .0.display())]
    NotFound(PathBuf),

    #[error("no audio files found")]
    Empty,
}

/// Duration inspection failed for a file being imported.
#[derive(Debug, Error)]
#[error("failed to inspect {}: {reason}", path.display())]
pub struct ImportProbeError {
    pub path: PathBuf,
    pub reason: String,
}

/// What media inspection learned about a file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Probe {
    pub duration: Duration,
    pub title: Option<String>,
    pub artist: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub added: usize,
    pub duplicates: usize,
    pub probe_failures: usize,
}

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Resolve user-selected locations into the audio files they name.
///
/// Files are kept when their extension is an allowed audio type; directories
/// are expanded according to `settings`. Returned paths are absolute, sorted
/// and free of duplicates.
pub fn pick(inputs: &[PathBuf], settings: &LibrarySettings) -> Result<Vec<PathBuf>, PickError> {
    let mut found: BTreeSet<PathBuf> = BTreeSet::new();

    for original in inputs {
        // Stored paths must resolve from any working directory.
        let input = match std::path::absolute(original) {
            Ok(p) if p.exists() => p,
            _ => return Err(PickError::NotFound(original.clone())),
        };

        if input.is_file() {
            if is_audio_file(&input, settings) {
                found.insert(input);
            } else {
                debug!(path = %input.display(), "skipping non-audio file");
            }
            continue;
        }

        let mut walker = WalkDir::new(&input).follow_links(settings.follow_links);
        if !settings.recursive {
            walker = walker.max_depth(1);
        }

        for entry in walker
            .into_iter()
            .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
            .filter_map(Result::ok)
        {
            let path = entry.path();
            if path.is_file() && is_audio_file(path, settings) {
                found.insert(path.to_path_buf());
            }
        }
    }

    if found.is_empty() {
        return Err(PickError::Empty);
    }
    Ok(found.into_iter().collect())
}

/// Inspect `path` for its duration and basic tags.
pub fn probe(path: &Path) -> Result<Probe, ImportProbeError> {
    let tagged = lofty::read_from_path(path).map_err(|e| ImportProbeError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let duration = tagged.properties().duration();
    let tag = tagged.primary_tag().or_else(|| tagged.first_tag());

    let title = tag
        .and_then(|t| t.title())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let artist = tag
        .and_then(|t| t.artist())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    Ok(Probe {
        duration,
        title,
        artist,
    })
}

/// Build a new record for `path`, filling gaps the probe left with the file
/// stem and [`UNKNOWN_ARTIST`].
pub fn track_from_probe(path: &Path, probe: Option<Probe>) -> Track {
    let probe = probe.unwrap_or_default();
    let title = probe.title.unwrap_or_else(|| {
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string()
    });
    let artist = probe.artist.unwrap_or_else(|| UNKNOWN_ARTIST.to_string());

    Track::new(title, artist, probe.duration, path)
}

/// Probe each of `paths` and insert the resulting tracks into `store`.
///
/// A probe failure is logged and the file is still imported with a zero
/// duration; only storage failures abort the import.
pub fn import(paths: &[PathBuf], store: &Library) -> Result<ImportReport, StoreError> {
    let mut report = ImportReport::default();

    for path in paths {
        let probed = match probe(path) {
            Ok(p) => Some(p),
            Err(err) => {
                warn!(error = %err, "duration probe failed, importing anyway");
                report.probe_failures += 1;
                None
            }
        };

        let track = track_from_probe(path, probed);
        if store.insert(&track)? {
            info!(track = %track_label(&track), path = %path.display(), "imported track");
            report.added += 1;
        } else {
            debug!(path = %path.display(), "already in library");
            report.duplicates += 1;
        }
    }

    Ok(report)
}
