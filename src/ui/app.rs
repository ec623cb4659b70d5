use std::cmp::min;

use anyhow::Result;
use crossterm::event::KeyCode;
use open::that as open_link;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    BarChart, Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap,
};
use ratatui::Frame;
use tracing::{info, warn};

use crate::config::{save_config, AppConfig};
use crate::error::SubmissionError;
use crate::listing::list_all;
use crate::models::{SongField, SongRecord};
use crate::store::DocumentStore;
use crate::submission::submit;

use super::forms::{SongForm, DURATION_PAGE};
use super::helpers::{
    build_cover_lines, centered_rect, format_duration, format_long_date, pattern_for,
};
use super::screens::{LandingScreen, SongListScreen, SongListState, NAV_TITLES};
use super::theme::Palette;

/// Height of the navigation bar.
const NAV_HEIGHT: u16 = 3;
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows given to the album-cover placeholder in the detail pane.
const COVER_HEIGHT: u16 = 7;

/// Top-level views reachable from the navigation bar.
enum Screen {
    Landing,
    Songs(SongListScreen),
    Create,
}

impl Screen {
    fn nav_index(&self) -> usize {
        match self {
            Screen::Landing => 0,
            Screen::Songs(_) => 1,
            Screen::Create => 2,
        }
    }
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

/// Central application state shared across the TUI. The store is handed in
/// by the caller; nothing here reaches for a global handle.
pub struct App {
    store: Box<dyn DocumentStore>,
    config: AppConfig,
    persist_config: bool,
    palette: Palette,
    screen: Screen,
    landing: LandingScreen,
    form: SongForm,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(store: Box<dyn DocumentStore>, config: AppConfig) -> Self {
        let palette = Palette::for_mode(config.theme);
        let form = SongForm::new(config.default_duration);
        Self {
            store,
            palette,
            form,
            config,
            persist_config: false,
            screen: Screen::Landing,
            landing: LandingScreen::new(&mut rand::rng()),
            status: None,
        }
    }

    /// Write configuration changes (such as the theme) back to disk.
    pub fn persisting_config(mut self) -> Self {
        self.persist_config = true;
        self
    }

    /// Handle a plain key press. Returns `true` when the app should exit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        match self.screen {
            Screen::Create => {
                self.handle_form_key(code)?;
                Ok(false)
            }
            _ => self.handle_browse_key(code),
        }
    }

    /// Handle a key pressed together with Ctrl. Returns `true` when the app
    /// should exit.
    pub(crate) fn handle_ctrl_key(&mut self, code: KeyCode) -> Result<bool> {
        match code {
            KeyCode::Char('c') => Ok(true),
            KeyCode::Char('s') => {
                if matches!(self.screen, Screen::Create) {
                    self.submit_form()?;
                }
                Ok(false)
            }
            _ => Ok(false),
        }
    }

    fn handle_browse_key(&mut self, code: KeyCode) -> Result<bool> {
        match code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Char('1') => self.open_landing(),
            KeyCode::Char('2') => self.open_songs(),
            KeyCode::Char('3') => self.open_create(),
            KeyCode::Tab => self.open_nav(self.screen.nav_index() + 1),
            KeyCode::BackTab => self.open_nav(self.screen.nav_index() + NAV_TITLES.len() - 1),
            KeyCode::Char('t') | KeyCode::Char('T') => self.toggle_theme(),
            _ => {
                return match self.screen {
                    Screen::Landing => self.handle_landing_key(code),
                    Screen::Songs(_) => self.handle_songs_key(code),
                    Screen::Create => Ok(false),
                };
            }
        }
        Ok(false)
    }

    fn handle_landing_key(&mut self, code: KeyCode) -> Result<bool> {
        match code {
            KeyCode::Esc => return Ok(true),
            KeyCode::Enter => self.open_songs(),
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.landing.shuffle(&mut rand::rng());
            }
            _ => {}
        }
        Ok(false)
    }

    fn handle_songs_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut status_to_set: Option<(String, StatusKind)> = None;
        let mut refresh = false;
        let mut back = false;

        if let Screen::Songs(ref mut songs) = self.screen {
            match code {
                KeyCode::Esc => back = true,
                KeyCode::Up => songs.move_selection(-1),
                KeyCode::Down => songs.move_selection(1),
                KeyCode::PageUp => songs.move_selection(-5),
                KeyCode::PageDown => songs.move_selection(5),
                KeyCode::Home => songs.select_first(),
                KeyCode::End => songs.select_last(),
                KeyCode::Char('r') | KeyCode::Char('R') => refresh = true,
                KeyCode::Enter => {
                    if let Some(song) = songs.current_song() {
                        let cover = song.album_cover.trim().to_string();
                        status_to_set = Some(match open_link(&cover) {
                            Ok(()) => (format!("Opened cover for {}.", song.title), StatusKind::Info),
                            Err(err) => {
                                warn!(error = %err, url = %cover, "failed to open album cover");
                                (format!("Failed to open album cover: {err}"), StatusKind::Error)
                            }
                        });
                    } else {
                        status_to_set = Some(("No song selected.".to_string(), StatusKind::Error));
                    }
                }
                _ => {}
            }
        }

        if back {
            self.open_landing();
        } else if refresh {
            self.open_songs();
        }
        if let Some((text, kind)) = status_to_set {
            self.set_status(text, kind);
        }
        Ok(false)
    }

    fn handle_form_key(&mut self, code: KeyCode) -> Result<()> {
        match code {
            KeyCode::Esc => {
                self.clear_status();
                self.screen = Screen::Landing;
            }
            KeyCode::Tab | KeyCode::Down => self.form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.form.previous_field(),
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Left if self.form.active == SongField::Duration => {
                self.form.adjust_duration(-1)
            }
            KeyCode::Right if self.form.active == SongField::Duration => {
                self.form.adjust_duration(1)
            }
            KeyCode::PageDown if self.form.active == SongField::Duration => {
                self.form.adjust_duration(-DURATION_PAGE)
            }
            KeyCode::PageUp if self.form.active == SongField::Duration => {
                self.form.adjust_duration(DURATION_PAGE)
            }
            KeyCode::Enter => {
                if !self.form.push_newline() {
                    self.submit_form()?;
                }
            }
            KeyCode::Char(ch) => {
                self.form.push_char(ch);
            }
            _ => {}
        }
        Ok(())
    }

    /// Submit the form once. Input survives a failure and is cleared on success.
    fn submit_form(&mut self) -> Result<()> {
        let candidate = self.form.candidate();
        match submit(self.store.as_ref(), &candidate) {
            Ok(song) => {
                self.form.reset();
                self.set_status(
                    format!("Song Created: \"{}\" has been added to the database.", song.title),
                    StatusKind::Info,
                );
            }
            Err(SubmissionError::Invalid(errors)) => {
                let count = errors.len();
                self.form.set_errors(errors);
                self.set_status(
                    format!("Please fix {count} field(s) before submitting."),
                    StatusKind::Error,
                );
            }
            Err(SubmissionError::StorageFailure(_)) => {
                self.set_status(
                    "Failed to add song to the database. Please try again.",
                    StatusKind::Error,
                );
            }
        }
        Ok(())
    }

    fn open_nav(&mut self, index: usize) {
        match index % NAV_TITLES.len() {
            0 => self.open_landing(),
            1 => self.open_songs(),
            _ => self.open_create(),
        }
    }

    fn open_landing(&mut self) {
        self.clear_status();
        self.screen = Screen::Landing;
    }

    /// Every visit re-queries the store.
    fn open_songs(&mut self) {
        self.clear_status();
        let next = match list_all(self.store.as_ref()) {
            Ok(songs) => SongListScreen::loaded(songs),
            Err(err) => SongListScreen::failed(err.to_string()),
        };
        match self.screen {
            Screen::Songs(ref mut current) => current.replace(next),
            _ => self.screen = Screen::Songs(next),
        }
    }

    fn open_create(&mut self) {
        self.clear_status();
        self.screen = Screen::Create;
    }

    fn toggle_theme(&mut self) {
        self.config.theme = self.config.theme.toggled();
        self.palette = Palette::for_mode(self.config.theme);
        info!(theme = ?self.config.theme, "switched theme");
        if self.persist_config {
            if let Err(err) = save_config(&self.config) {
                warn!(error = %err, "failed to save configuration");
                self.set_status(format!("Could not save theme: {err}"), StatusKind::Error);
            }
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(self.palette.base()), area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(NAV_HEIGHT.min(area.height)),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_nav(frame, chunks[0]);
        match &self.screen {
            Screen::Landing => self.draw_landing(frame, chunks[1]),
            Screen::Songs(songs) => self.draw_songs(frame, chunks[1], songs),
            Screen::Create => self.draw_form(frame, chunks[1]),
        }
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_nav(&self, frame: &mut Frame, area: Rect) {
        let theme_label = format!(" [t] {:?} ", self.config.theme);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.palette.muted())
            .title(Span::styled(" The Song Gallery ", self.palette.key()))
            .title_top(Line::from(Span::styled(theme_label, self.palette.muted())).right_aligned());

        let titles: Vec<Line> = NAV_TITLES
            .iter()
            .enumerate()
            .map(|(index, title)| Line::from(format!("{} {title}", index + 1)))
            .collect();
        let tabs = Tabs::new(titles)
            .block(block)
            .select(self.screen.nav_index())
            .style(Style::default().fg(self.palette.text))
            .highlight_style(
                Style::default()
                    .fg(self.palette.highlight)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            );
        frame.render_widget(tabs, area);
    }

    fn draw_landing(&self, frame: &mut Frame, area: Rect) {
        let inner = centered_rect(80, 90, area);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(3),
            ])
            .split(inner);

        let heading = Paragraph::new(Line::from(Span::styled(
            "The Song Gallery",
            Style::default()
                .fg(self.palette.text)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(heading, rows[0]);

        let tagline = Paragraph::new(
            "Discover the lyrics to your favorite songs and explore new music from various genres.",
        )
        .style(self.palette.muted())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        frame.render_widget(tagline, rows[1]);

        let chart_width = rows[2].width.min(60);
        let chart_area = Rect {
            x: rows[2].x + (rows[2].width - chart_width) / 2,
            width: chart_width,
            ..rows[2]
        };
        let bar_width = (chart_width.saturating_sub(2) / self.landing.bars.len().max(1) as u16)
            .saturating_sub(1)
            .max(1);
        let chart = BarChart::default()
            .block(Block::default().borders(Borders::ALL).border_style(self.palette.muted()))
            .data(self.landing.bars.as_slice())
            .bar_width(bar_width)
            .bar_gap(1)
            .bar_style(Style::default().fg(self.palette.chart))
            .value_style(Style::default().fg(self.palette.background).bg(self.palette.chart))
            .label_style(self.palette.muted());
        frame.render_widget(chart, chart_area);

        let button = Paragraph::new(Line::from(vec![
            Span::styled("[ Get Started ]", self.palette.key()),
            Span::styled("  press Enter", self.palette.muted()),
        ]))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::NONE));
        frame.render_widget(button, rows[3]);
    }

    fn draw_songs(&self, frame: &mut Frame, area: Rect, screen: &SongListScreen) {
        let songs = match &screen.state {
            SongListState::Failed(reason) => {
                let message = Paragraph::new(vec![
                    Line::from(Span::styled(
                        "Something went wrong loading the songs.",
                        Style::default()
                            .fg(self.palette.error)
                            .add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(reason.clone(), self.palette.muted())),
                ])
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
                frame.render_widget(message, centered_rect(80, 30, area));
                return;
            }
            SongListState::Loaded(songs) if songs.is_empty() => {
                let message = Paragraph::new("No songs yet. Press '3' to add one.")
                    .style(self.palette.muted())
                    .alignment(Alignment::Center);
                frame.render_widget(message, centered_rect(80, 20, area));
                return;
            }
            SongListState::Loaded(songs) => songs,
        };

        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
            .split(area);

        let items: Vec<ListItem> = songs
            .iter()
            .map(|song| {
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(format!("[{}] ", song.initial()), self.palette.key()),
                        Span::styled(
                            song.title.clone(),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                    ]),
                    Line::from(Span::styled(format!("    {}", song.artist), self.palette.muted())),
                ])
            })
            .collect();
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.palette.muted())
                    .title(format!(" Songs ({}) ", songs.len())),
            )
            .highlight_style(Style::default().fg(self.palette.highlight))
            .highlight_symbol("▶ ");
        let mut list_state = ListState::default();
        list_state.select(Some(min(screen.selected, songs.len() - 1)));
        frame.render_stateful_widget(list, panes[0], &mut list_state);

        if let Some(song) = screen.current_song() {
            self.draw_song_detail(frame, panes[1], song);
        }
    }

    fn draw_song_detail(&self, frame: &mut Frame, area: Rect, song: &SongRecord) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.palette.muted())
            .title(format!(" {} ", song.display_title()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(COVER_HEIGHT), Constraint::Min(0)])
            .split(inner);
        let header = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(COVER_HEIGHT * 2 + 2), Constraint::Min(0)])
            .split(rows[0]);

        let cover_block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.palette.muted());
        let cover_inner = cover_block.inner(header[0]);
        let cover = Paragraph::new(build_cover_lines(
            song.initial(),
            pattern_for(song.id.as_str()),
            cover_inner.width,
            cover_inner.height,
            self.palette.muted(),
        ))
        .block(cover_block);
        frame.render_widget(cover, header[0]);

        let label = |text: &'static str| Span::styled(text, self.palette.muted());
        let facts = Paragraph::new(vec![
            Line::from(Span::styled(
                song.title.clone(),
                Style::default()
                    .fg(self.palette.text)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(song.artist.clone(), self.palette.muted())),
            Line::from(vec![label("Genre: "), Span::raw(song.genre.clone())]),
            Line::from(vec![label("Duration: "), Span::raw(format_duration(song.duration))]),
            Line::from(vec![
                label("Released: "),
                Span::raw(format_long_date(song.release_date)),
            ]),
            Line::from(vec![
                label("Cover: "),
                Span::styled(song.album_cover.clone(), Style::default().fg(self.palette.accent)),
            ]),
        ])
        .block(Block::default().borders(Borders::NONE))
        .wrap(Wrap { trim: true });
        frame.render_widget(facts, header[1]);

        let mut lyrics = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Lyrics Preview",
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ];
        lyrics.extend(song.lyrics.lines().map(|row| Line::from(row.to_string())));
        let preview = Paragraph::new(lyrics).wrap(Wrap { trim: false });
        frame.render_widget(preview, rows[1]);
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.palette.muted())
            .title(" Add a Song ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let (lines, cursor) = self.form.build_lines(&self.palette);
        // Keep the active row visible when the lyrics outgrow the box.
        let scroll = cursor.y.saturating_sub(inner.height.saturating_sub(1));
        frame.render_widget(Paragraph::new(lines).scroll((scroll, 0)), inner);

        let cursor_x = inner.x.saturating_add(cursor.x).min(inner.right().saturating_sub(1));
        let cursor_y = inner.y.saturating_add(cursor.y - scroll);
        if cursor_y < inner.bottom() {
            frame.set_cursor_position((cursor_x, cursor_y));
        }
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(self.palette.muted());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let status_line = match &self.status {
            Some(status) => {
                let colour = match status.kind {
                    StatusKind::Info => self.palette.success,
                    StatusKind::Error => self.palette.error,
                };
                Line::from(Span::styled(status.text.clone(), Style::default().fg(colour)))
            }
            None => Line::from(""),
        };

        let paragraph =
            Paragraph::new(vec![status_line, self.footer_instructions()]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = self.palette.key();
        let pairs: &[(&str, &str)] = match self.screen {
            Screen::Landing => &[
                ("[1-3]", " Navigate   "),
                ("[Enter]", " Get Started   "),
                ("[r]", " New Chart   "),
                ("[t]", " Theme   "),
                ("[q]", " Quit"),
            ],
            Screen::Songs(_) => &[
                ("[↑↓]", " Select   "),
                ("[Enter]", " Open Cover   "),
                ("[r]", " Refresh   "),
                ("[1-3]", " Navigate   "),
                ("[Esc]", " Back   "),
                ("[q]", " Quit"),
            ],
            Screen::Create => &[
                ("[Tab/↑↓]", " Field   "),
                ("[←→ PgUp/PgDn]", " Duration   "),
                ("[Enter/Ctrl-S]", " Create Song   "),
                ("[Esc]", " Back   "),
                ("[Ctrl-C]", " Quit"),
            ],
        };

        let spans: Vec<Span<'static>> = pairs
            .iter()
            .flat_map(|(key, action)| {
                [
                    Span::styled(key.to_string(), key_style),
                    Span::raw(action.to_string()),
                ]
            })
            .collect();
        Line::from(spans)
    }
}
