//! Validity rules for a song before it is written. Each rule is a named
//! predicate over one field; all of them run so the form can flag every
//! problem at once.

use url::Url;

use crate::error::ValidationError;
use crate::models::{SongCandidate, SongField, ValidatedSong};

/// Shortest accepted duration, in seconds.
pub const MIN_DURATION: i64 = 1;
/// Longest accepted duration, in seconds (15 minutes).
pub const MAX_DURATION: i64 = 900;
/// Minimum number of characters in the lyrics.
pub const MIN_LYRICS_CHARS: usize = 10;

/// Check every field of `candidate`, returning the validated song or one
/// error per violated field.
pub fn validate(candidate: &SongCandidate) -> Result<ValidatedSong, Vec<ValidationError>> {
    let mut errors = Vec::new();

    require_text(&mut errors, SongField::Title, &candidate.title, "Title is required");
    require_text(&mut errors, SongField::Artist, &candidate.artist, "Artist is required");

    if !is_absolute_url(&candidate.album_cover) {
        errors.push(ValidationError::new(SongField::AlbumCover, "Must be a valid URL"));
    }

    if candidate.lyrics.chars().count() < MIN_LYRICS_CHARS {
        errors.push(ValidationError::new(
            SongField::Lyrics,
            format!("Lyrics must be at least {MIN_LYRICS_CHARS} characters"),
        ));
    }

    if candidate.release_date.is_none() {
        errors.push(ValidationError::new(
            SongField::ReleaseDate,
            "Release date is required",
        ));
    }

    if let Some(reason) = duration_violation(candidate.duration) {
        errors.push(ValidationError::new(SongField::Duration, reason));
    }

    require_text(&mut errors, SongField::Genre, &candidate.genre, "Genre is required");

    match (errors.is_empty(), candidate.release_date) {
        (true, Some(release_date)) => Ok(ValidatedSong {
            title: candidate.title.clone(),
            artist: candidate.artist.clone(),
            album_cover: candidate.album_cover.clone(),
            lyrics: candidate.lyrics.clone(),
            release_date,
            duration: candidate.duration as u32,
            genre: candidate.genre.clone(),
            _sealed: (),
        }),
        _ => Err(errors),
    }
}

fn require_text(errors: &mut Vec<ValidationError>, field: SongField, value: &str, reason: &str) {
    if value.is_empty() {
        errors.push(ValidationError::new(field, reason));
    }
}

/// Syntactic check only; the URL is never fetched.
fn is_absolute_url(value: &str) -> bool {
    Url::parse(value).is_ok()
}

fn duration_violation(duration: i64) -> Option<&'static str> {
    if duration < MIN_DURATION {
        Some("Duration must be at least 1 second")
    } else if duration > MAX_DURATION {
        Some("Duration cannot exceed 15 min")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn valid() -> SongCandidate {
        SongCandidate {
            title: "Ode".to_string(),
            artist: "X".to_string(),
            album_cover: "https://example.com/cover.jpg".to_string(),
            lyrics: "la la la la".to_string(),
            release_date: NaiveDate::from_ymd_opt(2020, 1, 1),
            duration: 200,
            genre: "pop".to_string(),
        }
    }

    fn failed_fields(candidate: &SongCandidate) -> Vec<SongField> {
        validate(candidate)
            .expect_err("candidate should be rejected")
            .into_iter()
            .map(|err| err.field)
            .collect()
    }

    #[test]
    fn valid_candidate_passes_unchanged() {
        let candidate = valid();
        let song = validate(&candidate).expect("valid candidate");
        assert_eq!(song.title, candidate.title);
        assert_eq!(song.artist, candidate.artist);
        assert_eq!(song.album_cover, candidate.album_cover);
        assert_eq!(song.lyrics, candidate.lyrics);
        assert_eq!(Some(song.release_date), candidate.release_date);
        assert_eq!(i64::from(song.duration), candidate.duration);
        assert_eq!(song.genre, candidate.genre);
    }

    #[test]
    fn empty_text_fields_are_reported() {
        let mut candidate = valid();
        candidate.title.clear();
        assert_eq!(failed_fields(&candidate), vec![SongField::Title]);

        let mut candidate = valid();
        candidate.artist.clear();
        assert_eq!(failed_fields(&candidate), vec![SongField::Artist]);

        let mut candidate = valid();
        candidate.genre.clear();
        assert_eq!(failed_fields(&candidate), vec![SongField::Genre]);
    }

    #[test]
    fn whitespace_counts_as_content() {
        let mut candidate = valid();
        candidate.title = " ".to_string();
        assert!(validate(&candidate).is_ok());
    }

    #[test]
    fn short_lyrics_are_rejected() {
        let mut candidate = valid();
        candidate.lyrics = "la la la".to_string();
        assert_eq!(failed_fields(&candidate), vec![SongField::Lyrics]);

        candidate.lyrics = "ééééééééé".to_string();
        assert_eq!(failed_fields(&candidate), vec![SongField::Lyrics]);

        candidate.lyrics = "éééééééééé".to_string();
        assert!(validate(&candidate).is_ok());
    }

    #[test]
    fn duration_bounds_are_inclusive() {
        for ok in [1, 900] {
            let mut candidate = valid();
            candidate.duration = ok;
            assert!(validate(&candidate).is_ok(), "duration {ok} should pass");
        }
        for bad in [0, -5, 901, i64::MAX] {
            let mut candidate = valid();
            candidate.duration = bad;
            assert_eq!(failed_fields(&candidate), vec![SongField::Duration]);
        }
    }

    #[test]
    fn duration_reasons_distinguish_bounds() {
        let mut candidate = valid();
        candidate.duration = 0;
        let errors = validate(&candidate).unwrap_err();
        assert_eq!(errors[0].reason, "Duration must be at least 1 second");

        candidate.duration = 901;
        let errors = validate(&candidate).unwrap_err();
        assert_eq!(errors[0].reason, "Duration cannot exceed 15 min");
    }

    #[test]
    fn album_cover_must_be_an_absolute_url() {
        for bad in ["not a url", "", "/covers/a.jpg", "example.com/cover.jpg"] {
            let mut candidate = valid();
            candidate.album_cover = bad.to_string();
            assert_eq!(failed_fields(&candidate), vec![SongField::AlbumCover], "{bad:?}");
        }
    }

    #[test]
    fn missing_release_date_is_reported() {
        let mut candidate = valid();
        candidate.release_date = None;
        assert_eq!(failed_fields(&candidate), vec![SongField::ReleaseDate]);
    }

    #[test]
    fn every_violation_is_collected() {
        let errors = validate(&SongCandidate::default()).unwrap_err();
        let fields: Vec<SongField> = errors.iter().map(|err| err.field).collect();
        assert_eq!(fields.len(), 7);
        for field in SongField::ALL {
            assert!(fields.contains(&field), "missing {field}");
        }
    }

    fn candidate_strategy() -> impl Strategy<Value = SongCandidate> {
        (
            "\\PC{1,40}",
            "\\PC{1,40}",
            "[a-z]{1,20}",
            "\\PC{10,120}",
            (1900i32..2100, 1u32..=365),
            MIN_DURATION..=MAX_DURATION,
            "\\PC{1,20}",
        )
            .prop_map(|(title, artist, host, lyrics, (year, day), duration, genre)| {
                SongCandidate {
                    title,
                    artist,
                    album_cover: format!("https://{host}.example/cover.jpg"),
                    lyrics,
                    release_date: NaiveDate::from_yo_opt(year, day),
                    duration,
                    genre,
                }
            })
    }

    proptest! {
        #[test]
        fn any_valid_candidate_comes_back_unchanged(candidate in candidate_strategy()) {
            let song = validate(&candidate).expect("generated candidate is valid");
            prop_assert_eq!(&song.title, &candidate.title);
            prop_assert_eq!(&song.artist, &candidate.artist);
            prop_assert_eq!(&song.album_cover, &candidate.album_cover);
            prop_assert_eq!(&song.lyrics, &candidate.lyrics);
            prop_assert_eq!(Some(song.release_date), candidate.release_date);
            prop_assert_eq!(i64::from(song.duration), candidate.duration);
            prop_assert_eq!(&song.genre, &candidate.genre);
        }

        #[test]
        fn in_range_durations_pass(duration in MIN_DURATION..=MAX_DURATION) {
            let candidate = SongCandidate { duration, ..valid() };
            prop_assert!(validate(&candidate).is_ok());
        }

        #[test]
        fn out_of_range_durations_fail_alone(
            duration in prop_oneof![i64::MIN..MIN_DURATION, (MAX_DURATION + 1)..=i64::MAX]
        ) {
            let candidate = SongCandidate { duration, ..valid() };
            prop_assert_eq!(failed_fields(&candidate), vec![SongField::Duration]);
        }

        #[test]
        fn lyrics_under_ten_characters_fail(lyrics in "\\PC{0,9}") {
            let candidate = SongCandidate { lyrics, ..valid() };
            prop_assert_eq!(failed_fields(&candidate), vec![SongField::Lyrics]);
        }

        #[test]
        fn text_without_a_scheme_is_not_a_cover_url(album_cover in "[^:]{0,40}") {
            let candidate = SongCandidate { album_cover, ..valid() };
            prop_assert_eq!(failed_fields(&candidate), vec![SongField::AlbumCover]);
        }

        #[test]
        fn clearing_a_required_text_field_fails_only_that_field(
            mut candidate in candidate_strategy(),
            which in 0usize..3,
        ) {
            let field = match which {
                0 => {
                    candidate.title.clear();
                    SongField::Title
                }
                1 => {
                    candidate.artist.clear();
                    SongField::Artist
                }
                _ => {
                    candidate.genre.clear();
                    SongField::Genre
                }
            };
            prop_assert_eq!(failed_fields(&candidate), vec![field]);
        }
    }
}
