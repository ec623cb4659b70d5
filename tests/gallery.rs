use chrono::{Duration, NaiveDate, TimeZone, Utc};
use serde_json::json;
use song_gallery::listing::list_all_at;
use song_gallery::models::SONGS_COLLECTION;
use song_gallery::store::DB_FILE_NAME;
use song_gallery::submission::submit_at;
use song_gallery::{
    list_all, submit, DocumentStore, MemoryDocumentStore, QueryError, SongCandidate, SongField,
    SqliteDocumentStore, SubmissionError,
};
use proptest::prelude::*;
use tempfile::tempdir;

fn ode() -> SongCandidate {
    SongCandidate {
        title: "Ode".to_string(),
        artist: "X".to_string(),
        album_cover: "https://a.co/c.jpg".to_string(),
        lyrics: "la la la la".to_string(),
        release_date: NaiveDate::from_ymd_opt(2020, 1, 1),
        duration: 200,
        genre: "pop".to_string(),
    }
}

#[test]
fn submitted_song_is_listed_with_identical_fields() {
    let store = MemoryDocumentStore::new();
    let created = submit(&store, &ode()).unwrap();

    assert!(!created.id.is_empty());
    assert_eq!(created.created_at, created.updated_at);

    let listed = list_all(&store).unwrap();
    assert_eq!(listed, vec![created]);
}

#[test]
fn empty_title_is_rejected_without_a_write() {
    let store = MemoryDocumentStore::new();
    let candidate = SongCandidate {
        title: String::new(),
        ..ode()
    };

    match submit(&store, &candidate) {
        Err(SubmissionError::Invalid(errors)) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].field, SongField::Title);
            assert_eq!(errors[0].reason, "Title is required");
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
    assert_eq!(store.write_count(), 0);
    assert!(list_all(&store).unwrap().is_empty());
}

#[test]
fn every_failing_field_is_reported_at_once() {
    let store = MemoryDocumentStore::new();
    let candidate = SongCandidate {
        album_cover: "not a url".to_string(),
        lyrics: "short".to_string(),
        duration: 901,
        ..ode()
    };

    let Err(SubmissionError::Invalid(errors)) = submit(&store, &candidate) else {
        panic!("expected validation failure");
    };
    let fields: Vec<SongField> = errors.iter().map(|err| err.field).collect();
    assert_eq!(
        fields,
        vec![SongField::AlbumCover, SongField::Lyrics, SongField::Duration]
    );
}

#[test]
fn listing_is_newest_first_and_keeps_duplicates() {
    let store = MemoryDocumentStore::new();
    let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let first = submit_at(&store, &ode(), start).unwrap();
    let second = submit_at(&store, &ode(), start + Duration::seconds(1)).unwrap();

    let listed = list_all(&store).unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, second.id);
    assert_eq!(listed[1].id, first.id);
    assert_ne!(first.id, second.id);
}

#[test]
fn storage_failures_surface_from_both_operations() {
    let store = MemoryDocumentStore::new();
    store.fail_with("network down");

    assert!(matches!(
        submit(&store, &ode()),
        Err(SubmissionError::StorageFailure(_))
    ));
    assert!(matches!(
        list_all(&store),
        Err(QueryError::StorageFailure(_))
    ));

    store.recover();
    assert!(list_all(&store).unwrap().is_empty());
}

#[test]
fn documents_written_elsewhere_are_read_leniently() {
    let store = MemoryDocumentStore::new();
    let now = Utc.with_ymd_and_hms(2025, 2, 3, 4, 5, 6).unwrap();
    let Some(fields) = json!({
        "title": "Imported",
        "artist": "Y",
        "albumCover": "https://a.co/i.jpg",
        "lyrics": "something long",
        "releaseDate": "1999-12-31",
        "duration": 61,
        "genre": "rock",
        "createdAt": 1234
    })
    .as_object()
    .cloned() else {
        panic!("literal is an object");
    };
    store.seed(SONGS_COLLECTION, fields);

    let listed = list_all_at(&store, now).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].created_at, now);
    assert_eq!(listed[0].updated_at, now);
}

#[test]
fn sqlite_store_survives_a_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join(DB_FILE_NAME);
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    let (older, newer) = {
        let store = SqliteDocumentStore::open(&path).unwrap();
        let older = submit_at(&store, &ode(), start).unwrap();
        let newer = submit_at(
            &store,
            &SongCandidate {
                title: "Second".to_string(),
                ..ode()
            },
            start + Duration::minutes(5),
        )
        .unwrap();
        (older, newer)
    };

    let reopened = SqliteDocumentStore::open(&path).unwrap();
    let listed = list_all(&reopened).unwrap();
    assert_eq!(listed, vec![newer, older]);
}

#[test]
fn sqlite_store_rejects_nothing_that_validation_accepted() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    let boxed: Box<dyn DocumentStore> = Box::new(store);
    let created = submit(boxed.as_ref(), &ode()).unwrap();
    assert_eq!(created.id.as_str().len(), 20);
    assert_eq!(list_all(boxed.as_ref()).unwrap(), vec![created]);
}

#[test]
fn default_store_lives_in_the_configured_data_dir() {
    let dir = tempdir().unwrap();
    let store = SqliteDocumentStore::open_default(Some(dir.path())).unwrap();
    submit(&store, &ode()).unwrap();
    assert!(dir.path().join(DB_FILE_NAME).is_file());
}

#[test]
fn sqlite_listing_orders_by_instant_across_offsets() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    for (title, created_at) in [
        ("earlier", "2024-01-01T05:00:00+00:00"),
        ("later", "2024-01-01T06:00:00+05:00"),
        ("latest", "2024-01-01T05:00:00.500000Z"),
    ] {
        let Some(fields) = json!({
            "title": title,
            "artist": "X",
            "albumCover": "https://a.co/c.jpg",
            "lyrics": "la la la la",
            "releaseDate": "2020-01-01",
            "duration": 200,
            "genre": "pop",
            "createdAt": created_at
        })
        .as_object()
        .cloned() else {
            panic!("literal is an object");
        };
        store.add_document(SONGS_COLLECTION, fields).unwrap();
    }

    let listed = list_all(&store).unwrap();
    let titles: Vec<&str> = listed.iter().map(|song| song.title.as_str()).collect();
    assert_eq!(titles, vec!["latest", "earlier", "later"]);
    assert!(listed
        .windows(2)
        .all(|pair| pair[0].created_at >= pair[1].created_at));
}

proptest! {
    #[test]
    fn submitted_fields_are_listed_unchanged(
        title in "\\PC{1,30}",
        artist in "\\PC{1,30}",
        lyrics in "\\PC{10,80}",
        genre in "\\PC{1,15}",
        duration in 1i64..=900,
        day in 1u32..=365,
    ) {
        let store = MemoryDocumentStore::new();
        let candidate = SongCandidate {
            title,
            artist,
            lyrics,
            genre,
            duration,
            release_date: NaiveDate::from_yo_opt(2001, day),
            ..ode()
        };

        let created = submit(&store, &candidate).unwrap();
        let listed = list_all(&store).unwrap();
        prop_assert_eq!(store.write_count(), 1);
        prop_assert_eq!(&listed, &vec![created.clone()]);
        prop_assert_eq!(&created.title, &candidate.title);
        prop_assert_eq!(&created.artist, &candidate.artist);
        prop_assert_eq!(&created.lyrics, &candidate.lyrics);
        prop_assert_eq!(&created.genre, &candidate.genre);
        prop_assert_eq!(i64::from(created.duration), candidate.duration);
        prop_assert_eq!(Some(created.release_date), candidate.release_date);
    }
}
