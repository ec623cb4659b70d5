use rand::Rng;

use crate::models::SongRecord;

/// Entries of the navigation bar, left to right.
pub(crate) const NAV_TITLES: [&str; 3] = ["Landing", "View All Songs", "Add a Song"];

/// Labels of the decorative landing chart.
pub(crate) const CHART_LABELS: [&str; 6] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun"];
/// Inclusive value range of each chart bar.
pub(crate) const CHART_RANGE: (u64, u64) = (20, 100);

/// Landing page state: just the random bars of the decorative chart.
pub(crate) struct LandingScreen {
    pub(crate) bars: Vec<(&'static str, u64)>,
}

impl LandingScreen {
    pub(crate) fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut screen = Self { bars: Vec::new() };
        screen.shuffle(rng);
        screen
    }

    /// Draw a fresh set of bar heights.
    pub(crate) fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let (low, high) = CHART_RANGE;
        self.bars = CHART_LABELS
            .iter()
            .map(|label| (*label, rng.random_range(low..=high)))
            .collect();
    }
}

/// Outcome of the most recent listing query. A failed query is kept apart from
/// an empty collection so the view can say which one happened.
pub(crate) enum SongListState {
    Loaded(Vec<SongRecord>),
    Failed(String),
}

/// List/detail view over every stored song.
pub(crate) struct SongListScreen {
    pub(crate) state: SongListState,
    pub(crate) selected: usize,
}

impl SongListScreen {
    pub(crate) fn loaded(songs: Vec<SongRecord>) -> Self {
        Self {
            state: SongListState::Loaded(songs),
            selected: 0,
        }
    }

    pub(crate) fn failed(message: impl Into<String>) -> Self {
        Self {
            state: SongListState::Failed(message.into()),
            selected: 0,
        }
    }

    /// Swap in a fresh listing, keeping the selection on the same song when it
    /// is still present.
    pub(crate) fn replace(&mut self, next: SongListScreen) {
        let focus = self.current_song().map(|song| song.id.clone());
        *self = next;
        if let (Some(id), SongListState::Loaded(songs)) = (focus, &self.state) {
            if let Some(index) = songs.iter().position(|song| song.id == id) {
                self.selected = index;
            }
        }
    }

    pub(crate) fn songs(&self) -> &[SongRecord] {
        match &self.state {
            SongListState::Loaded(songs) => songs,
            SongListState::Failed(_) => &[],
        }
    }

    pub(crate) fn current_song(&self) -> Option<&SongRecord> {
        self.songs().get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        let len = self.songs().len();
        if len == 0 {
            return;
        }
        let new = (self.selected as isize + offset).clamp(0, len as isize - 1);
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.songs().len().saturating_sub(1);
    }
}
