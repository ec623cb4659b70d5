//! Domain models that mirror the documents stored in the `songs` collection
//! and get passed throughout the TUI. These types stay light-weight data
//! holders so the schema, persistence and presentation layers can focus on
//! their own concerns.

use std::fmt;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Collection holding every song document.
pub const SONGS_COLLECTION: &str = "songs";

/// Opaque identifier handed out by the document store when a song is created.
/// The application never mints one itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongId(String);

impl SongId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The user-editable fields of a song. Used both to tag validation errors and
/// to drive focus in the create form.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SongField {
    Title,
    Artist,
    AlbumCover,
    Genre,
    ReleaseDate,
    Duration,
    Lyrics,
}

impl SongField {
    /// Form order: the same top-to-bottom sequence the create screen renders.
    pub const ALL: [SongField; 7] = [
        SongField::Title,
        SongField::Artist,
        SongField::AlbumCover,
        SongField::Genre,
        SongField::ReleaseDate,
        SongField::Duration,
        SongField::Lyrics,
    ];

    /// Name of the field inside a stored document.
    pub fn as_str(self) -> &'static str {
        match self {
            SongField::Title => "title",
            SongField::Artist => "artist",
            SongField::AlbumCover => "albumCover",
            SongField::Genre => "genre",
            SongField::ReleaseDate => "releaseDate",
            SongField::Duration => "duration",
            SongField::Lyrics => "lyrics",
        }
    }

    /// Label shown next to the input on the create screen.
    pub fn label(self) -> &'static str {
        match self {
            SongField::Title => "Song Title",
            SongField::Artist => "Artist",
            SongField::AlbumCover => "Album Cover URL",
            SongField::Genre => "Genre",
            SongField::ReleaseDate => "Release Date",
            SongField::Duration => "Duration",
            SongField::Lyrics => "Lyrics",
        }
    }
}

impl fmt::Display for SongField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw, unvalidated input for a new song. `release_date` is `None` when the
/// user has not provided one and `duration` is signed so out-of-range input
/// can still be represented and reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongCandidate {
    pub title: String,
    pub artist: String,
    pub album_cover: String,
    pub lyrics: String,
    pub release_date: Option<NaiveDate>,
    pub duration: i64,
    pub genre: String,
}

/// A candidate that passed every schema check. Only
/// [`crate::schema::validate`] can produce one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSong {
    pub title: String,
    pub artist: String,
    pub album_cover: String,
    pub lyrics: String,
    pub release_date: NaiveDate,
    pub duration: u32,
    pub genre: String,
    pub(crate) _sealed: (),
}

/// A persisted song as returned by submission and listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongRecord {
    /// Identifier assigned by the store on creation.
    pub id: SongId,
    pub title: String,
    pub artist: String,
    /// Absolute URL pointing at the album artwork. Never fetched by the app,
    /// only handed to the system opener.
    pub album_cover: String,
    pub lyrics: String,
    pub release_date: NaiveDate,
    /// Length of the track in whole seconds.
    pub duration: u32,
    pub genre: String,
    /// Submission time; the only sort key for listings.
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SongRecord {
    /// Attach the store-assigned id and timestamps to a validated song.
    pub fn from_validated(id: SongId, song: ValidatedSong, stamped_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: song.title,
            artist: song.artist,
            album_cover: song.album_cover,
            lyrics: song.lyrics,
            release_date: song.release_date,
            duration: song.duration,
            genre: song.genre,
            created_at: stamped_at,
            updated_at: stamped_at,
        }
    }

    /// Compose a `Title - Artist` string, omitting the hyphen when the artist
    /// is blank.
    pub fn display_title(&self) -> String {
        if self.artist.trim().is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", self.title, self.artist)
        }
    }

    /// First character of the title, used as the avatar fallback in lists.
    pub fn initial(&self) -> char {
        self.title
            .trim()
            .chars()
            .next()
            .map(|ch| ch.to_uppercase().next().unwrap_or(ch))
            .unwrap_or('?')
    }
}

/// Serialize a timestamp the way song documents store it: RFC 3339, UTC,
/// fixed microsecond precision so stored values sort lexically.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Read a stored timestamp back. Anything that is not an RFC 3339 string
/// yields `None`.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let text = value.as_str()?;
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn record(title: &str, artist: &str) -> SongRecord {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        SongRecord {
            id: SongId::new("abc"),
            title: title.to_string(),
            artist: artist.to_string(),
            album_cover: "https://a.co/c.jpg".to_string(),
            lyrics: "la la la la".to_string(),
            release_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            duration: 200,
            genre: "pop".to_string(),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn display_title_skips_blank_artist() {
        assert_eq!(record("Ode", "X").display_title(), "Ode - X");
        assert_eq!(record("Ode", "  ").display_title(), "Ode");
    }

    #[test]
    fn initial_falls_back_for_blank_titles() {
        assert_eq!(record("ode", "X").initial(), 'O');
        assert_eq!(record("", "X").initial(), '?');
    }

    #[test]
    fn timestamps_survive_formatting_at_microsecond_precision() {
        let at = Utc.timestamp_opt(1_700_000_000, 123_456_000).unwrap();
        let text = format_timestamp(&at);
        assert_eq!(text, "2023-11-14T22:13:20.123456Z");
        assert_eq!(parse_timestamp(&json!(text)), Some(at));
    }

    #[test]
    fn parse_timestamp_rejects_non_strings() {
        assert_eq!(parse_timestamp(&json!(12)), None);
        assert_eq!(parse_timestamp(&json!("yesterday")), None);
        assert_eq!(parse_timestamp(&Value::Null), None);
    }

    #[test]
    fn field_names_match_stored_documents() {
        let names: Vec<&str> = SongField::ALL.iter().map(|f| f.as_str()).collect();
        assert_eq!(
            names,
            vec!["title", "artist", "albumCover", "genre", "releaseDate", "duration", "lyrics"]
        );
    }
}
