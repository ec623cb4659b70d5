use chrono::{Datelike, NaiveDate};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

/// ASCII textures used as album-cover placeholders. The song id picks one so
/// a given song always gets the same cover.
pub(crate) const COVER_ART: &[&[&str]] = &[
    &["/\\/\\/", "\\/\\/\\"],
    &["*+*+", "+*+*"],
    &["=--=", "--=="],
    &["<>><", "><<>"],
    &["oOo ", " OoO"],
    &["~~  ", "  ~~"],
    &["^v^v", "v^v^"],
    &["::''", "''::"],
    &["[]<>", "<>[]"],
    &["|..|", ".||."],
];

/// Repeat a short ASCII motif until it fills the requested width.
pub(crate) fn repeat_pattern_row(row: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    if row.is_empty() {
        return " ".repeat(width);
    }
    let repeat_count = width / row.len() + 2;
    let mut repeated = row.repeat(repeat_count);
    repeated.truncate(width);
    repeated
}

/// Stable pattern choice for a song id.
pub(crate) fn pattern_for(id: &str) -> &'static [&'static str] {
    let sum: usize = id.bytes().map(usize::from).sum();
    COVER_ART[sum % COVER_ART.len()]
}

/// Center `text` inside `width` columns, padding with spaces.
pub(crate) fn centered_label(text: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let mut label: String = text.chars().take(width).collect();
    let len = label.chars().count();
    let padding = width - len;
    let left = padding / 2;
    let right = padding - left;
    label.insert_str(0, &" ".repeat(left));
    label.push_str(&" ".repeat(right));
    label
}

/// Fill a cover-sized box with the pattern and put the song's initial in the
/// middle row.
pub(crate) fn build_cover_lines(
    initial: char,
    pattern: &[&str],
    inner_width: u16,
    inner_height: u16,
    pattern_style: Style,
) -> Vec<Line<'static>> {
    let width = inner_width as usize;
    let height = inner_height as usize;
    if width == 0 || height == 0 {
        return vec![Line::from("")];
    }

    let label_row = height / 2;
    let badge = format!("[ {initial} ]");
    (0..height)
        .map(|row_idx| {
            if row_idx == label_row {
                Line::from(Span::styled(
                    centered_label(&badge, width),
                    Style::default().add_modifier(Modifier::BOLD),
                ))
            } else if pattern.is_empty() {
                Line::from(Span::styled(" ".repeat(width), pattern_style))
            } else {
                let base = pattern[row_idx % pattern.len()];
                Line::from(Span::styled(repeat_pattern_row(base, width), pattern_style))
            }
        })
        .collect()
}

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// `m:ss`, the way the duration slider labels its value.
pub(crate) fn format_duration(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Long-form date such as `January 1st, 2020`.
pub(crate) fn format_long_date(date: NaiveDate) -> String {
    let day = date.day();
    format!(
        "{} {}{}, {}",
        date.format("%B"),
        day,
        ordinal_suffix(day),
        date.year()
    )
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}
