use chrono::NaiveDate;
use ratatui::layout::Position;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::error::ValidationError;
use crate::models::{SongCandidate, SongField};
use crate::schema::{MAX_DURATION, MIN_DURATION};

use super::helpers::format_duration;
use super::theme::Palette;

/// Format accepted by the release date input.
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";
/// Step used by PageUp/PageDown on the duration field.
pub(crate) const DURATION_PAGE: i64 = 15;

/// Form state for creating a song. Every input is kept as raw text so a
/// failed submission can hand the user back exactly what they typed.
#[derive(Clone, Debug)]
pub(crate) struct SongForm {
    pub(crate) title: String,
    pub(crate) artist: String,
    pub(crate) album_cover: String,
    pub(crate) genre: String,
    pub(crate) release_date: String,
    pub(crate) duration: String,
    pub(crate) lyrics: String,
    pub(crate) active: SongField,
    pub(crate) errors: Vec<ValidationError>,
    default_duration: u32,
}

impl SongForm {
    pub(crate) fn new(default_duration: u32) -> Self {
        Self {
            title: String::new(),
            artist: String::new(),
            album_cover: String::new(),
            genre: String::new(),
            release_date: String::new(),
            duration: default_duration.to_string(),
            lyrics: String::new(),
            active: SongField::Title,
            errors: Vec::new(),
            default_duration,
        }
    }

    /// Empty every field after a successful submission.
    pub(crate) fn reset(&mut self) {
        *self = Self::new(self.default_duration);
    }

    pub(crate) fn value(&self, field: SongField) -> &str {
        match field {
            SongField::Title => &self.title,
            SongField::Artist => &self.artist,
            SongField::AlbumCover => &self.album_cover,
            SongField::Genre => &self.genre,
            SongField::ReleaseDate => &self.release_date,
            SongField::Duration => &self.duration,
            SongField::Lyrics => &self.lyrics,
        }
    }

    fn value_mut(&mut self, field: SongField) -> &mut String {
        match field {
            SongField::Title => &mut self.title,
            SongField::Artist => &mut self.artist,
            SongField::AlbumCover => &mut self.album_cover,
            SongField::Genre => &mut self.genre,
            SongField::ReleaseDate => &mut self.release_date,
            SongField::Duration => &mut self.duration,
            SongField::Lyrics => &mut self.lyrics,
        }
    }

    /// Move focus down the form, wrapping at the end.
    pub(crate) fn next_field(&mut self) {
        let index = field_index(self.active);
        self.active = SongField::ALL[(index + 1) % SongField::ALL.len()];
    }

    /// Move focus up the form, wrapping at the top.
    pub(crate) fn previous_field(&mut self) {
        let index = field_index(self.active);
        let len = SongField::ALL.len();
        self.active = SongField::ALL[(index + len - 1) % len];
    }

    /// Insert a character into the active field. Duration only takes digits
    /// and the release date only digits and dashes.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        let accepted = match self.active {
            SongField::Duration => ch.is_ascii_digit() && self.duration.len() < 6,
            SongField::ReleaseDate => {
                (ch.is_ascii_digit() || ch == '-') && self.release_date.len() < 10
            }
            _ => true,
        };
        if accepted {
            self.value_mut(self.active).push(ch);
            self.clear_error(self.active);
        }
        accepted
    }

    /// Lyrics are the only multi-line input.
    pub(crate) fn push_newline(&mut self) -> bool {
        if self.active != SongField::Lyrics {
            return false;
        }
        self.lyrics.push('\n');
        self.clear_error(SongField::Lyrics);
        true
    }

    pub(crate) fn backspace(&mut self) {
        let field = self.active;
        self.value_mut(field).pop();
        self.clear_error(field);
    }

    /// Nudge the duration like a slider, clamped to the accepted range.
    pub(crate) fn adjust_duration(&mut self, delta: i64) {
        let current = self.duration_seconds().clamp(MIN_DURATION, MAX_DURATION);
        let next = (current + delta).clamp(MIN_DURATION, MAX_DURATION);
        self.duration = next.to_string();
        self.clear_error(SongField::Duration);
    }

    /// Empty input reads as zero; digits too large for `i64` read as the
    /// maximum so they are still flagged as too long.
    fn duration_seconds(&self) -> i64 {
        let raw = self.duration.trim();
        if raw.is_empty() {
            0
        } else {
            raw.parse().unwrap_or(i64::MAX)
        }
    }

    /// Build the candidate handed to submission. Single-line inputs are
    /// trimmed; lyrics are kept verbatim.
    pub(crate) fn candidate(&self) -> SongCandidate {
        SongCandidate {
            title: self.title.trim().to_string(),
            artist: self.artist.trim().to_string(),
            album_cover: self.album_cover.trim().to_string(),
            lyrics: self.lyrics.clone(),
            release_date: NaiveDate::parse_from_str(self.release_date.trim(), DATE_FORMAT).ok(),
            duration: self.duration_seconds(),
            genre: self.genre.trim().to_string(),
        }
    }

    pub(crate) fn set_errors(&mut self, errors: Vec<ValidationError>) {
        if let Some(first) = errors.first() {
            self.active = first.field;
        }
        self.errors = errors;
    }

    pub(crate) fn error_for(&self, field: SongField) -> Option<&str> {
        self.errors
            .iter()
            .find(|err| err.field == field)
            .map(|err| err.reason.as_str())
    }

    fn clear_error(&mut self, field: SongField) {
        self.errors.retain(|err| err.field != field);
    }

    /// Render every field with its inline error, returning the lines plus the
    /// cursor offset (relative to the top-left of the form area).
    pub(crate) fn build_lines(&self, palette: &Palette) -> (Vec<Line<'static>>, Position) {
        let mut lines = Vec::new();
        let mut cursor = Position::new(0, 0);

        for field in SongField::ALL {
            let is_active = self.active == field;
            let value = self.value(field);
            let prefix = format!("{}: ", field.label());
            let label_style = if is_active {
                Style::default()
                    .fg(palette.highlight)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(palette.text)
            };
            let value_style = if is_active {
                Style::default().fg(palette.highlight)
            } else {
                Style::default().fg(palette.text)
            };

            if field == SongField::Lyrics {
                lines.push(Line::from(Span::styled(prefix, label_style)));
                if value.is_empty() {
                    if is_active {
                        cursor = Position::new(2, to_u16(lines.len()));
                    }
                    lines.push(Line::from(Span::styled(
                        "  Enter the full lyrics of the song",
                        palette.muted(),
                    )));
                } else {
                    for row in value.split('\n') {
                        if is_active {
                            cursor = Position::new(
                                to_u16(row.chars().count()).saturating_add(2),
                                to_u16(lines.len()),
                            );
                        }
                        lines.push(Line::from(Span::styled(format!("  {row}"), value_style)));
                    }
                }
            } else {
                if is_active {
                    cursor = Position::new(
                        to_u16(prefix.chars().count() + value.chars().count()),
                        to_u16(lines.len()),
                    );
                }
                let mut spans = vec![Span::styled(prefix, label_style)];
                if value.is_empty() {
                    spans.push(Span::styled(placeholder(field), palette.muted()));
                } else {
                    spans.push(Span::styled(value.to_string(), value_style));
                }
                if let Some(hint) = self.hint(field) {
                    spans.push(Span::styled(hint, palette.muted()));
                }
                lines.push(Line::from(spans));
            }

            if let Some(reason) = self.error_for(field) {
                lines.push(Line::from(Span::styled(
                    format!("  ↳ {reason}"),
                    Style::default().fg(palette.error),
                )));
            }
        }

        (lines, cursor)
    }

    fn hint(&self, field: SongField) -> Option<String> {
        match field {
            SongField::Duration => {
                let seconds = self.duration_seconds();
                if (MIN_DURATION..=MAX_DURATION).contains(&seconds) {
                    Some(format!("  ({})", format_duration(seconds as u32)))
                } else {
                    None
                }
            }
            SongField::AlbumCover => Some("  (a valid URL for the album cover image)".to_string()),
            _ => None,
        }
    }
}

/// Terminal coordinates are `u16`; anything larger pins to the edge.
fn to_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

fn field_index(field: SongField) -> usize {
    SongField::ALL
        .iter()
        .position(|candidate| *candidate == field)
        .unwrap_or(0)
}

fn placeholder(field: SongField) -> &'static str {
    match field {
        SongField::Title => "Enter song title",
        SongField::Artist => "Enter artist name",
        SongField::AlbumCover => "Enter album cover URL",
        SongField::Genre => "Enter song genre",
        SongField::ReleaseDate => "YYYY-MM-DD",
        SongField::Duration => "seconds",
        SongField::Lyrics => "",
    }
}
