use super::*;
use crate::library::Track;
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use std::time::Duration;
use tempfile::tempdir;

fn track(title: &str, path: &str) -> Track {
    Track::new(title, "Artist", Duration::from_micros(183_250_500), path)
}

#[test]
fn insert_then_query_returns_identical_record() {
    let lib = Library::open_in_memory().unwrap();
    let t = track("One", "/music/one.mp3");

    assert!(lib.insert(&t).unwrap());
    assert_eq!(lib.query_all().unwrap(), vec![t]);
}

#[test]
fn insert_ignores_second_record_for_same_path() {
    let lib = Library::open_in_memory().unwrap();
    let first = track("One", "/music/one.mp3");
    let again = track("One (again)", "/music/one.mp3");

    assert!(lib.insert(&first).unwrap());
    assert!(!lib.insert(&again).unwrap());

    let all = lib.query_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, first.id);
}

#[test]
fn delete_removes_only_the_named_track() {
    let lib = Library::open_in_memory().unwrap();
    let a = track("A", "/music/a.mp3");
    let b = track("B", "/music/b.mp3");
    lib.insert(&a).unwrap();
    lib.insert(&b).unwrap();

    assert!(lib.delete(a.id).unwrap());
    assert!(!lib.delete(a.id).unwrap());

    let all = lib.query_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, b.id);
}

#[test]
fn query_all_orders_by_date_added_then_title() {
    let lib = Library::open_in_memory().unwrap();
    let base = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();

    let mut late = track("Zulu", "/music/z.mp3");
    late.date_added = base + ChronoDuration::seconds(10);
    let mut early_b = track("bravo", "/music/b.mp3");
    early_b.date_added = base;
    let mut early_a = track("Alpha", "/music/a.mp3");
    early_a.date_added = base;

    lib.insert(&late).unwrap();
    lib.insert(&early_b).unwrap();
    lib.insert(&early_a).unwrap();

    let titles: Vec<String> = lib
        .query_all()
        .unwrap()
        .into_iter()
        .map(|t| t.title)
        .collect();
    assert_eq!(titles, vec!["Alpha", "bravo", "Zulu"]);
}

#[test]
fn open_creates_parent_dirs_and_persists_across_handles() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("nested").join("library.db");
    let t = track("Kept", "/music/kept.flac");

    {
        let lib = Library::open(&db).unwrap();
        lib.insert(&t).unwrap();
    }

    let lib = Library::open(&db).unwrap();
    assert_eq!(lib.query_all().unwrap(), vec![t]);
}

#[test]
fn corrupt_rows_are_reported() {
    let lib = Library::open_in_memory().unwrap();
    lib.conn
        .execute(
            "INSERT INTO tracks (id, title, artist, duration_us, path, date_added)
             VALUES ('not-a-uuid', 't', 'a', 0, '/x.mp3', '2026-01-01T00:00:00Z')",
            [],
        )
        .unwrap();

    assert!(matches!(lib.query_all(), Err(StoreError::Corrupt(_))));
}
