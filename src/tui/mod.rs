pub mod render;
pub mod state;

use anyhow::Result;
use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use futures_util::StreamExt;
use ratatui::prelude::*;
use state::AppState;
use std::io::stdout;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

/// Commands the TUI sends to the search engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiCommand {
    /// Full text of the search box after an edit.
    QueryChanged(String),
    SelectNext,
    SelectPrev,
    Quit,
}

/// Run the TUI. Reads state from `state_rx`, sends commands on `cmd_tx`.
pub async fn run_tui(
    state_rx: watch::Receiver<AppState>,
    cmd_tx: mpsc::Sender<TuiCommand>,
) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = tui_loop(&mut terminal, state_rx, cmd_tx).await;

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn tui_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    mut state_rx: watch::Receiver<AppState>,
    cmd_tx: mpsc::Sender<TuiCommand>,
) -> Result<()> {
    let mut events = EventStream::new();
    let mut spinner = tokio::time::interval(Duration::from_millis(100));
    spinner.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut spinner_frame: u8 = 0;

    // Edits are drawn from this buffer; the engine's copy arrives a round trip later.
    let mut query = state_rx.borrow().query.clone();

    loop {
        let state = with_local_query(state_rx.borrow().clone(), &query);
        terminal.draw(|f| render::draw(f, &state, spinner_frame))?;

        tokio::select! {
            ev = events.next() => {
                let Some(ev) = ev else { return Ok(()) };
                if let Event::Key(key) = ev? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    match handle_key(key, &mut query) {
                        Some(TuiCommand::Quit) => {
                            let _ = cmd_tx.send(TuiCommand::Quit).await;
                            return Ok(());
                        }
                        Some(cmd) => {
                            let _ = cmd_tx.send(cmd).await;
                        }
                        None => {}
                    }
                }
            }
            changed = state_rx.changed() => {
                if changed.is_err() {
                    // Engine is gone; nothing left to show.
                    return Ok(());
                }
            }
            _ = spinner.tick(), if state.searching => {
                spinner_frame = spinner_frame.wrapping_add(1);
            }
        }
    }
}

fn with_local_query(mut state: AppState, query: &str) -> AppState {
    if state.query != query {
        state.query = query.to_string();
    }
    state
}

/// Map a key press onto the local query buffer and the command to send.
pub fn handle_key(key: KeyEvent, query: &mut String) -> Option<TuiCommand> {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(TuiCommand::Quit),
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
            if query.is_empty() {
                return None;
            }
            query.clear();
            Some(TuiCommand::QueryChanged(String::new()))
        }
        (KeyCode::Up, _) => Some(TuiCommand::SelectPrev),
        (KeyCode::Down, _) => Some(TuiCommand::SelectNext),
        (KeyCode::Backspace, _) => {
            query.pop()?;
            Some(TuiCommand::QueryChanged(query.clone()))
        }
        (KeyCode::Char(c), m) if !m.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            query.push(c);
            Some(TuiCommand::QueryChanged(query.clone()))
        }
        _ => None,
    }
}
