use super::model::prompt_path;
use super::*;
use crate::audio::TransportState;
use crate::audio::fake::driver;
use crate::config::LibrarySettings;
use crate::library::Track;
use crate::store::Library;
use std::path::PathBuf;
use std::time::{Duration, Instant};

fn t(title: &str, path: &str) -> Track {
    Track::new(title, "Artist", Duration::from_secs(200), path)
}

fn app_with(tracks: &[Track]) -> App {
    let library = Library::open_in_memory().unwrap();
    for track in tracks {
        library.insert(track).unwrap();
    }
    App::new(library, Duration::from_secs(4)).unwrap()
}

#[test]
fn next_prev_wrap_around() {
    let mut app = app_with(&[t("A", "/m/a.mp3"), t("B", "/m/b.mp3"), t("C", "/m/c.mp3")]);
    assert_eq!(app.selected, 0);

    app.prev();
    assert_eq!(app.selected, 2);
    app.next();
    assert_eq!(app.selected, 0);

    app.select_last();
    assert_eq!(app.selected, 2);
    app.select_first();
    assert_eq!(app.selected, 0);
}

#[test]
fn navigation_on_empty_library_is_a_no_op() {
    let mut app = app_with(&[]);
    app.next();
    app.prev();
    app.select_last();
    assert_eq!(app.selected, 0);
    assert!(app.selected_track().is_none());
}

#[test]
fn play_selected_loads_the_selected_track() {
    let a = t("A", "/m/a.mp3");
    let b = t("B", "/m/b.mp3");
    let mut app = app_with(&[a, b.clone()]);
    let (mut d, _) = driver();

    app.next();
    app.play_selected(&mut d);

    assert_eq!(d.state(), TransportState::Playing);
    assert_eq!(d.session().current_track().map(|t| t.id), Some(b.id));
    assert!(app.status.is_none());
}

#[test]
fn failed_play_shows_an_error_and_leaves_nothing_loaded() {
    let mut app = app_with(&[t("Gone", "/m/missing.mp3")]);
    let (mut d, _) = driver();

    app.play_selected(&mut d);

    assert_eq!(d.state(), TransportState::Empty);
    let status = app.status.as_ref().unwrap();
    assert_eq!(status.kind, StatusKind::Error);
    assert!(status.text.contains("Gone"));
}

#[test]
fn deleting_the_playing_track_stops_playback_first() {
    let a = t("A", "/m/a.mp3");
    let b = t("B", "/m/b.mp3");
    let mut app = app_with(&[a.clone(), b.clone()]);
    let (mut d, log) = driver();

    app.play_selected(&mut d);
    app.delete_selected(&mut d);

    assert_eq!(d.state(), TransportState::Empty);
    assert!(d.session().current_track().is_none());
    let probe = log.borrow()[0].probe.clone();
    assert!(!probe.borrow().playing);
    assert!(probe.borrow().stopped);

    assert_eq!(app.tracks.len(), 1);
    assert_eq!(app.tracks[0].id, b.id);
    assert_eq!(app.library.query_all().unwrap().len(), 1);
    assert_eq!(app.status.as_ref().unwrap().kind, StatusKind::Info);
}

#[test]
fn deleting_another_track_keeps_playing() {
    let a = t("A", "/m/a.mp3");
    let b = t("B", "/m/b.mp3");
    let mut app = app_with(&[a.clone(), b]);
    let (mut d, _) = driver();

    app.play_selected(&mut d);
    app.select_last();
    app.delete_selected(&mut d);

    assert_eq!(d.state(), TransportState::Playing);
    assert_eq!(d.session().current_track().map(|t| t.id), Some(a.id));
    // Selection is pulled back into range.
    assert_eq!(app.selected, 0);
}

#[test]
fn seek_by_clamps_into_track_bounds() {
    let mut app = app_with(&[t("A", "/m/a.mp3")]);
    let (mut d, _) = driver();
    app.play_selected(&mut d);

    app.seek_by(&mut d, -5);
    assert_eq!(d.session().current_time(), Duration::ZERO);

    app.seek_by(&mut d, 30);
    assert_eq!(d.session().current_time(), Duration::from_secs(30));

    app.seek_by(&mut d, 10_000);
    assert_eq!(d.session().current_time(), Duration::from_secs(180));
}

#[test]
fn seek_by_without_a_track_does_nothing() {
    let mut app = app_with(&[]);
    let (mut d, _) = driver();
    app.seek_by(&mut d, 30);
    assert_eq!(d.session().current_time(), Duration::ZERO);
}

#[test]
fn nudge_volume_saturates_at_bounds() {
    let mut app = app_with(&[]);
    let (mut d, _) = driver();

    app.nudge_volume(&mut d, 0.25);
    assert_eq!(d.session().volume(), 1.0);

    app.nudge_volume(&mut d, -0.25);
    assert!((d.session().volume() - 0.75).abs() < 1e-6);

    for _ in 0..10 {
        app.nudge_volume(&mut d, -0.25);
    }
    assert_eq!(d.session().volume(), 0.0);
}

#[test]
fn status_expires_after_timeout() {
    let mut app = app_with(&[]);
    app.set_status(StatusKind::Info, "hello");

    app.expire_status(Instant::now());
    assert!(app.status.is_some());

    app.expire_status(Instant::now() + Duration::from_secs(5));
    assert!(app.status.is_none());
}

#[test]
fn prompt_editing_and_cancel() {
    let mut app = app_with(&[]);
    app.push_prompt_char('x');
    assert!(app.prompt.is_none());

    app.open_prompt();
    app.push_prompt_char('a');
    app.push_prompt_char('b');
    app.pop_prompt_char();
    assert_eq!(app.prompt.as_deref(), Some("a"));

    app.close_prompt();
    assert!(app.prompt.is_none());
}

#[test]
fn submit_prompt_imports_the_typed_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("one.wav"), b"junk").unwrap();
    std::fs::write(dir.path().join("two.flac"), b"junk").unwrap();

    let mut app = app_with(&[]);
    app.open_prompt();
    for c in dir.path().to_str().unwrap().chars() {
        app.push_prompt_char(c);
    }
    app.submit_prompt(&LibrarySettings::default());

    assert!(app.prompt.is_none());
    assert_eq!(app.tracks.len(), 2);
    let status = app.status.as_ref().unwrap();
    assert_eq!(status.kind, StatusKind::Info);
    assert!(status.text.starts_with("Added 2 track(s)"));
}

#[test]
fn import_of_missing_path_reports_an_error() {
    let mut app = app_with(&[]);
    app.import_paths(
        &[PathBuf::from("/definitely/not/here")],
        &LibrarySettings::default(),
    );

    assert!(app.tracks.is_empty());
    assert_eq!(app.status.as_ref().unwrap().kind, StatusKind::Error);
}

#[test]
fn prompt_path_trims_quotes_and_blank_input() {
    assert_eq!(prompt_path("   "), None);
    assert_eq!(prompt_path("''"), None);
    assert_eq!(
        prompt_path("  '/music/My Album'  "),
        Some(PathBuf::from("/music/My Album"))
    );
    assert_eq!(
        prompt_path("\"/music/a.mp3\""),
        Some(PathBuf::from("/music/a.mp3"))
    );
    assert_eq!(prompt_path("/music"), Some(PathBuf::from("/music")));
}

#[test]
fn failed_import_still_shows_tracks_stored_before_the_failure() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("one.wav"), b"junk").unwrap();
    std::fs::write(dir.path().join("two.wav"), b"junk").unwrap();

    let mut app = app_with(&[]);
    app.library
        .execute_batch(
            "CREATE TRIGGER one_track_only BEFORE INSERT ON tracks
             WHEN (SELECT COUNT(*) FROM tracks) >= 1
             BEGIN SELECT RAISE(ABORT, 'library full'); END;",
        )
        .unwrap();

    app.import_paths(&[dir.path().to_path_buf()], &LibrarySettings::default());

    assert_eq!(app.status.as_ref().unwrap().kind, StatusKind::Error);
    assert_eq!(app.tracks.len(), 1);
    assert_eq!(app.tracks, app.library.query_all().unwrap());
}
