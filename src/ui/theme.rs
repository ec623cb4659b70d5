use ratatui::style::{Color, Modifier, Style};

use crate::config::ThemeMode;

/// Colours used across every screen for one theme mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Palette {
    pub(crate) background: Color,
    pub(crate) text: Color,
    pub(crate) muted: Color,
    pub(crate) accent: Color,
    pub(crate) highlight: Color,
    pub(crate) error: Color,
    pub(crate) success: Color,
    pub(crate) chart: Color,
}

impl Palette {
    pub(crate) const fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self {
                background: Color::Rgb(18, 18, 24),
                text: Color::Rgb(236, 236, 240),
                muted: Color::Rgb(130, 130, 140),
                accent: Color::Cyan,
                highlight: Color::Yellow,
                error: Color::Red,
                success: Color::Green,
                chart: Color::Rgb(120, 170, 255),
            },
            ThemeMode::Light => Self {
                background: Color::Rgb(250, 250, 250),
                text: Color::Rgb(24, 24, 27),
                muted: Color::Rgb(113, 113, 122),
                accent: Color::Blue,
                highlight: Color::Rgb(180, 83, 9),
                error: Color::Rgb(185, 28, 28),
                success: Color::Rgb(21, 128, 61),
                chart: Color::Rgb(37, 99, 235),
            },
        }
    }

    pub(crate) fn base(&self) -> Style {
        Style::default().bg(self.background).fg(self.text)
    }

    pub(crate) fn key(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub(crate) fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }
}
