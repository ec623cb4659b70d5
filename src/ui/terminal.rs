use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::debug;

use super::app::App;

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// How long to wait for input before redrawing anyway.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Run the gallery until `app` asks to quit.
///
/// Raw mode and the alternate screen are always undone before returning, so an
/// error from a key handler still leaves a usable shell behind.
pub fn run_app(app: &mut App) -> Result<()> {
    let mut tui = enter_tui()?;
    let outcome = drive(&mut tui, app);
    leave_tui(&mut tui)?;
    outcome
}

fn enter_tui() -> Result<Tui> {
    enable_raw_mode().context("could not switch the terminal to raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("could not open the alternate screen")?;
    Terminal::new(CrosstermBackend::new(stdout)).context("could not attach to the terminal")
}

fn drive(tui: &mut Tui, app: &mut App) -> Result<()> {
    loop {
        tui.draw(|frame| app.draw(frame))
            .context("could not render the gallery")?;

        if !event::poll(POLL_INTERVAL).context("could not poll for input")? {
            continue;
        }
        // Releases and repeats are reported on some platforms; only presses act.
        let Event::Key(key) = event::read().context("could not read input")? else {
            continue;
        };
        if key.kind == KeyEventKind::Press && dispatch(app, key)? {
            debug!("quit requested");
            return Ok(());
        }
    }
}

/// Chorded keys go to their own handler so plain letters stay text in the form.
fn dispatch(app: &mut App, key: KeyEvent) -> Result<bool> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        app.handle_ctrl_key(key.code)
    } else {
        app.handle_key(key.code)
    }
}

fn leave_tui(tui: &mut Tui) -> Result<()> {
    disable_raw_mode().context("could not leave raw mode")?;
    execute!(tui.backend_mut(), LeaveAlternateScreen)
        .context("could not close the alternate screen")?;
    tui.show_cursor().context("could not show the cursor")
}
