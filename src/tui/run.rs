//! TUI effects boundary: event loop, terminal lifecycle, key mapping.
//!
//! This is the only module touching the terminal. It wires the pure layers
//! (state, update, view) to crossterm and ratatui. Kept minimal: all
//! intelligence lives in the pure layers.
//!
//! A key reader thread feeds a single mpsc channel; the event loop owns
//! the App and processes each event to completion before the next.

use std::io;
use std::sync::mpsc;
use std::thread;

use crossterm::ExecutableCommand;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use log::{debug, info};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::prefs::PreferenceStore;
use crate::types::Column;

use super::state::{Action, App, AppEvent};
use super::update::dispatch;
use super::view::render;

// ============================================================================
// KEY MAPPING
// ============================================================================

/// Map a crossterm key event to a semantic Action.
///
/// `text_entry` is true while a text field has focus: printable keys are
/// then input rather than commands. Returns None for unmapped keys.
pub fn map_key(key: KeyEvent, text_entry: bool) -> Option<Action> {
    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    if text_entry {
        return match key.code {
            KeyCode::Char(c) => Some(Action::Input(c)),
            KeyCode::Backspace => Some(Action::Backspace),
            KeyCode::Tab => Some(Action::NextField),
            KeyCode::BackTab => Some(Action::PrevField),
            KeyCode::Up => Some(Action::MoveUp),
            KeyCode::Down => Some(Action::MoveDown),
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::Esc => Some(Action::Back),
            _ => None,
        };
    }

    match key.code {
        // Navigation
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        KeyCode::Esc => Some(Action::Back),

        // Selection
        KeyCode::Char(' ') | KeyCode::Enter => Some(Action::ToggleSelection),

        // Sorting by column number
        KeyCode::Char(c @ '1'..='4') => Column::from_index((c as u8 - b'1') as usize).map(Action::SortBy),

        // Actions
        KeyCode::Char('/') => Some(Action::Search),
        KeyCode::Char('a') => Some(Action::AddEmployee),
        KeyCode::Char('d') | KeyCode::Delete => Some(Action::RemoveSelected),
        KeyCode::Char('t') => Some(Action::ToggleTheme),
        KeyCode::Char('q') => Some(Action::Quit),

        // Confirm
        KeyCode::Char('Y') | KeyCode::Char('y') => Some(Action::ConfirmYes),
        KeyCode::Char('N') | KeyCode::Char('n') => Some(Action::ConfirmNo),

        _ => None,
    }
}

// ============================================================================
// TERMINAL LIFECYCLE
// ============================================================================

/// Set up the terminal for TUI mode.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Install a panic hook that restores the terminal before printing the panic.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Best-effort terminal restoration
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}

// ============================================================================
// BACKGROUND THREADS
// ============================================================================

/// Spawn a thread that reads crossterm events and forwards them to the channel.
fn spawn_key_reader(tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        loop {
            let event = match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => AppEvent::Key(key),
                Ok(Event::Resize(..)) => AppEvent::Resize,
                Ok(_) => continue, // mouse, focus, paste, key release
                Err(_) => break,
            };
            if tx.send(event).is_err() {
                break; // receiver dropped, TUI is shutting down
            }
        }
    });
}

// ============================================================================
// EVENT LOOP
// ============================================================================

/// Run the TUI event loop until the user quits.
///
/// Every event is followed by a full redraw, so each table operation is
/// rendered before the next key is handled.
pub fn run(mut app: App, store: &mut dyn PreferenceStore) -> io::Result<App> {
    install_panic_hook();
    let mut terminal = setup_terminal()?;
    info!("tui started with {} employees", app.table.roster().len());

    let (tx, rx) = mpsc::channel::<AppEvent>();
    spawn_key_reader(tx);

    let result = event_loop(&mut terminal, &mut app, store, &rx);

    restore_terminal()?;
    info!("tui stopped with {} employees", app.table.roster().len());
    result.map(|()| app)
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    store: &mut dyn PreferenceStore,
    rx: &mpsc::Receiver<AppEvent>,
) -> io::Result<()> {
    loop {
        terminal.draw(|frame| render(app, frame))?;

        if app.should_quit {
            return Ok(());
        }

        // Block on the next event
        let event = match rx.recv() {
            Ok(e) => e,
            Err(_) => return Ok(()), // reader thread gone
        };

        match event {
            AppEvent::Key(key) => {
                if let Some(action) = map_key(key, app.screen.takes_text()) {
                    debug!("{:?} on {:?}", action, app.screen);
                    dispatch(app, &action, store);
                }
            }
            AppEvent::Resize => {}
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn ctrl_c_maps_to_quit_in_both_modes() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(ctrl_c, false), Some(Action::Quit));
        assert_eq!(map_key(ctrl_c, true), Some(Action::Quit));
    }

    #[test]
    fn vim_keys_map_to_movement() {
        assert_eq!(map_key(key(KeyCode::Char('j')), false), Some(Action::MoveDown));
        assert_eq!(map_key(key(KeyCode::Char('k')), false), Some(Action::MoveUp));
    }

    #[test]
    fn arrow_keys_map_to_movement() {
        assert_eq!(map_key(key(KeyCode::Up), false), Some(Action::MoveUp));
        assert_eq!(map_key(key(KeyCode::Down), false), Some(Action::MoveDown));
    }

    #[test]
    fn space_and_enter_toggle_selection() {
        assert_eq!(map_key(key(KeyCode::Char(' ')), false), Some(Action::ToggleSelection));
        assert_eq!(map_key(key(KeyCode::Enter), false), Some(Action::ToggleSelection));
    }

    #[test]
    fn number_keys_sort_by_column() {
        assert_eq!(map_key(key(KeyCode::Char('1')), false), Some(Action::SortBy(Column::Name)));
        assert_eq!(map_key(key(KeyCode::Char('2')), false), Some(Action::SortBy(Column::Position)));
        assert_eq!(map_key(key(KeyCode::Char('3')), false), Some(Action::SortBy(Column::Department)));
        assert_eq!(map_key(key(KeyCode::Char('4')), false), Some(Action::SortBy(Column::Salary)));
    }

    #[test]
    fn command_keys() {
        assert_eq!(map_key(key(KeyCode::Char('/')), false), Some(Action::Search));
        assert_eq!(map_key(key(KeyCode::Char('a')), false), Some(Action::AddEmployee));
        assert_eq!(map_key(key(KeyCode::Char('d')), false), Some(Action::RemoveSelected));
        assert_eq!(map_key(key(KeyCode::Delete), false), Some(Action::RemoveSelected));
        assert_eq!(map_key(key(KeyCode::Char('t')), false), Some(Action::ToggleTheme));
        assert_eq!(map_key(key(KeyCode::Char('q')), false), Some(Action::Quit));
    }

    #[test]
    fn text_entry_turns_letters_into_input() {
        assert_eq!(map_key(key(KeyCode::Char('q')), true), Some(Action::Input('q')));
        assert_eq!(map_key(key(KeyCode::Char('1')), true), Some(Action::Input('1')));
        assert_eq!(map_key(key(KeyCode::Char(' ')), true), Some(Action::Input(' ')));
        assert_eq!(map_key(key(KeyCode::Enter), true), Some(Action::Submit));
        assert_eq!(map_key(key(KeyCode::Tab), true), Some(Action::NextField));
        assert_eq!(map_key(key(KeyCode::BackTab), true), Some(Action::PrevField));
        assert_eq!(map_key(key(KeyCode::Backspace), true), Some(Action::Backspace));
    }

    #[test]
    fn esc_maps_to_back_in_both_modes() {
        assert_eq!(map_key(key(KeyCode::Esc), false), Some(Action::Back));
        assert_eq!(map_key(key(KeyCode::Esc), true), Some(Action::Back));
    }

    #[test]
    fn unmapped_key_returns_none() {
        assert_eq!(map_key(key(KeyCode::Char('z')), false), None);
        assert_eq!(map_key(key(KeyCode::F(1)), true), None);
    }
}
