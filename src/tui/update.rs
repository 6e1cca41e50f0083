//! State transitions: (Screen, Action) → Transition, then effects.
//!
//! `update` is pure: it reads the table but never changes it. Each screen
//! defines which actions it accepts; unhandled actions return the current
//! screen unchanged. `apply_effect` is where table operations and the
//! theme write happen. Both are testable without a terminal.

use log::{debug, warn};

use crate::prefs::{PreferenceStore, save_theme};
use crate::table::TableController;
use crate::types::SortDirection;

use super::state::{Action, App, Effect, Notice, RecordForm, Screen, Transition};

/// Pure state transition function.
///
/// Given the current screen, an action, the cursor and a read-only view of
/// the table, produces the next transition.
pub fn update(screen: Screen, action: &Action, cursor: usize, table: &TableController) -> Transition {
    match screen {
        Screen::Table => update_table(cursor, action, table),
        Screen::Search => update_search(action, table),
        Screen::AddForm(form) => update_form(form, action),
        Screen::Confirm { count } => update_confirm(count, action),
    }
}

/// Run one action against the app: transition, then effects.
pub fn dispatch(app: &mut App, action: &Action, store: &mut dyn PreferenceStore) {
    app.notice = None;

    match update(app.screen.clone(), action, app.cursor, &app.table) {
        Transition::Screen(screen) => app.screen = screen,
        Transition::Cursor(cursor) => app.cursor = cursor,
        Transition::Quit => app.should_quit = true,
        Transition::Effect(effect) => apply_effect(app, effect, store),
    }
}

// ============================================================================
// PER-SCREEN HANDLERS
// ============================================================================

/// Table: cursor movement, selection, sorting, and opening dialogs.
fn update_table(cursor: usize, action: &Action, table: &TableController) -> Transition {
    let len = table.view_len();

    match action {
        Action::MoveUp => Transition::Cursor(cursor.saturating_sub(1)),
        Action::MoveDown => {
            let new_cursor = if len == 0 { 0 } else { (cursor + 1).min(len - 1) };
            Transition::Cursor(new_cursor)
        }
        Action::ToggleSelection => {
            if cursor < len {
                Transition::Effect(Effect::ToggleRow(cursor))
            } else {
                Transition::Screen(Screen::Table)
            }
        }
        Action::SortBy(column) => Transition::Effect(Effect::Sort(*column)),
        Action::Search => Transition::Screen(Screen::Search),
        Action::AddEmployee => Transition::Screen(Screen::AddForm(RecordForm::default())),
        Action::RemoveSelected => Transition::Effect(Effect::RequestRemoval),
        Action::ToggleTheme => Transition::Effect(Effect::ToggleTheme),
        Action::Back => {
            if table.filter_term().is_empty() {
                Transition::Screen(Screen::Table)
            } else {
                Transition::Effect(Effect::SetFilter(String::new()))
            }
        }
        Action::Quit => Transition::Quit,
        _ => Transition::Screen(Screen::Table),
    }
}

/// Search: every keystroke refilters; Enter or Esc returns to the table.
fn update_search(action: &Action, table: &TableController) -> Transition {
    match action {
        Action::Input(c) => {
            let mut term = table.filter_term().to_string();
            term.push(*c);
            Transition::Effect(Effect::SetFilter(term))
        }
        Action::Backspace => {
            let mut term = table.filter_term().to_string();
            if term.pop().is_some() {
                Transition::Effect(Effect::SetFilter(term))
            } else {
                Transition::Screen(Screen::Search)
            }
        }
        Action::Submit | Action::Back => Transition::Screen(Screen::Table),
        Action::Quit => Transition::Quit,
        _ => Transition::Screen(Screen::Search),
    }
}

/// AddForm: edit fields, submit, or close (discarding input).
fn update_form(form: RecordForm, action: &Action) -> Transition {
    match action {
        Action::Input(c) => Transition::Screen(Screen::AddForm(form.push(*c))),
        Action::Backspace => Transition::Screen(Screen::AddForm(form.backspace())),
        Action::NextField | Action::MoveDown => Transition::Screen(Screen::AddForm(form.next_field())),
        Action::PrevField | Action::MoveUp => Transition::Screen(Screen::AddForm(form.prev_field())),
        Action::Submit => Transition::Effect(Effect::SubmitRecord(form)),
        Action::Back => Transition::Screen(Screen::Table),
        Action::Quit => Transition::Quit,
        _ => Transition::Screen(Screen::AddForm(form)),
    }
}

/// Confirm: yes removes, no goes back with the selection intact.
fn update_confirm(count: usize, action: &Action) -> Transition {
    match action {
        Action::ConfirmYes => Transition::Effect(Effect::ConfirmRemoval),
        Action::ConfirmNo | Action::Back => Transition::Screen(Screen::Table),
        Action::Quit => Transition::Quit,
        _ => Transition::Screen(Screen::Confirm { count }),
    }
}

// ============================================================================
// EFFECTS
// ============================================================================

/// Execute an effect requested by a transition.
///
/// The screen is left as it was unless the effect moves somewhere else.
pub fn apply_effect(app: &mut App, effect: Effect, store: &mut dyn PreferenceStore) {
    match effect {
        Effect::SetFilter(term) => {
            app.table.set_filter_term(&term);
            app.cursor = 0;
        }
        Effect::Sort(column) => {
            let direction = app.table.sort_by(column);
            let label = match direction {
                SortDirection::Ascending => "ascending",
                SortDirection::Descending => "descending",
            };
            app.notice = Some(Notice::info(format!("Sorted by {}, {}", column, label)));
        }
        Effect::ToggleRow(index) => app.table.toggle_selection(index),
        Effect::SubmitRecord(form) => match app.table.add_record(&form.draft) {
            Ok(()) => {
                // Form stays open and empty, ready for another entry
                app.notice = Some(Notice::info(format!("Added {}", form.draft.name.trim())));
                app.screen = Screen::AddForm(RecordForm::default());
                app.cursor = app.table.view_len().saturating_sub(1);
            }
            Err(e) => {
                debug!("add rejected: {}", e);
                app.notice = Some(Notice::error(e.to_string()));
                app.screen = Screen::AddForm(form);
            }
        },
        Effect::RequestRemoval => match app.table.pending_removal() {
            Ok(count) => app.screen = Screen::Confirm { count },
            Err(e) => {
                app.notice = Some(Notice::error(e.to_string()));
                app.screen = Screen::Table;
            }
        },
        Effect::ConfirmRemoval => {
            let removed = app.table.confirm_removal();
            app.notice = Some(Notice::info(format!("Removed {} employee(s)", removed)));
            app.screen = Screen::Table;
        }
        Effect::ToggleTheme => {
            app.theme = app.theme.toggled();
            if let Err(e) = save_theme(store, app.theme) {
                warn!("theme not saved: {}", e);
                app.notice = Some(Notice::error(format!("Theme not saved: {}", e)));
            }
        }
    }

    clamp_cursor(app);
}

/// Keep the cursor on a row of the current view.
fn clamp_cursor(app: &mut App) {
    let len = app.table.view_len();
    app.cursor = if len == 0 { 0 } else { app.cursor.min(len - 1) };
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PreferenceError;
    use crate::prefs::{MemoryStore, THEME_KEY};
    use crate::tui::state::NoticeKind;
    use crate::types::{Column, RecordDraft, Theme};

    fn app() -> App {
        App::new(TableController::default(), Theme::Light)
    }

    fn run(app: &mut App, actions: &[Action]) -> MemoryStore {
        let mut store = MemoryStore::new();
        for action in actions {
            dispatch(app, action, &mut store);
        }
        store
    }

    fn type_text(text: &str) -> Vec<Action> {
        text.chars().map(Action::Input).collect()
    }

    /// Store whose writes always fail.
    #[derive(Debug)]
    struct ReadOnlyStore;

    impl PreferenceStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), PreferenceError> {
            Err(PreferenceError::Io {
                path: "/read-only".into(),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            })
        }
    }

    // -- Table --

    #[test]
    fn table_quit() {
        let table = TableController::default();
        assert_eq!(update(Screen::Table, &Action::Quit, 0, &table), Transition::Quit);
    }

    #[test]
    fn table_cursor_down_clamps_at_end() {
        let table = TableController::default();
        assert_eq!(
            update(Screen::Table, &Action::MoveDown, 4, &table),
            Transition::Cursor(4)
        );
        assert_eq!(
            update(Screen::Table, &Action::MoveDown, 1, &table),
            Transition::Cursor(2)
        );
    }

    #[test]
    fn table_cursor_up_at_top_stays() {
        let table = TableController::default();
        assert_eq!(
            update(Screen::Table, &Action::MoveUp, 0, &table),
            Transition::Cursor(0)
        );
    }

    #[test]
    fn table_toggle_targets_cursor_row() {
        let table = TableController::default();
        assert_eq!(
            update(Screen::Table, &Action::ToggleSelection, 3, &table),
            Transition::Effect(Effect::ToggleRow(3))
        );
    }

    #[test]
    fn table_toggle_on_empty_view_is_noop() {
        let mut table = TableController::default();
        table.set_filter_term("no such employee");
        assert_eq!(
            update(Screen::Table, &Action::ToggleSelection, 0, &table),
            Transition::Screen(Screen::Table)
        );
    }

    #[test]
    fn table_back_clears_active_filter() {
        let mut table = TableController::default();
        assert_eq!(
            update(Screen::Table, &Action::Back, 0, &table),
            Transition::Screen(Screen::Table)
        );
        table.set_filter_term("HR");
        assert_eq!(
            update(Screen::Table, &Action::Back, 0, &table),
            Transition::Effect(Effect::SetFilter(String::new()))
        );
    }

    #[test]
    fn toggle_selection_and_back() {
        let mut app = app();
        run(&mut app, &[Action::MoveDown, Action::ToggleSelection]);
        assert!(app.table.is_selected(1));

        run(&mut app, &[Action::ToggleSelection]);
        assert!(app.table.selection().is_empty());
    }

    #[test]
    fn sort_key_sorts_and_reports_direction() {
        let mut app = app();
        run(&mut app, &[Action::SortBy(Column::Salary)]);
        assert_eq!(app.table.record_at(0).unwrap().name, "David Brown");
        assert_eq!(
            app.notice,
            Some(Notice::info("Sorted by Salary, descending"))
        );
    }

    #[test]
    fn notice_cleared_by_next_action() {
        let mut app = app();
        run(&mut app, &[Action::SortBy(Column::Name), Action::MoveDown]);
        assert!(app.notice.is_none());
    }

    // -- Search --

    #[test]
    fn typing_in_search_filters_live() {
        let mut app = app();
        let mut actions = vec![Action::Search];
        actions.extend(type_text("hr"));
        run(&mut app, &actions);

        assert_eq!(app.screen, Screen::Search);
        assert_eq!(app.table.filter_term(), "hr");
        assert_eq!(app.table.view_len(), 1);
    }

    #[test]
    fn search_backspace_widens_filter() {
        let mut app = app();
        let mut actions = vec![Action::Search];
        actions.extend(type_text("hrx"));
        actions.push(Action::Backspace);
        run(&mut app, &actions);
        assert_eq!(app.table.filter_term(), "hr");
        assert_eq!(app.table.view_len(), 1);
    }

    #[test]
    fn search_submit_keeps_filter() {
        let mut app = app();
        let mut actions = vec![Action::Search];
        actions.extend(type_text("it"));
        actions.push(Action::Submit);
        run(&mut app, &actions);
        assert_eq!(app.screen, Screen::Table);
        assert_eq!(app.table.view_len(), 2);

        run(&mut app, &[Action::Back]);
        assert_eq!(app.table.view_len(), 5);
    }

    #[test]
    fn filtering_resets_cursor() {
        let mut app = app();
        let mut actions = vec![Action::MoveDown, Action::MoveDown, Action::Search];
        actions.extend(type_text("a"));
        run(&mut app, &actions);
        assert_eq!(app.cursor, 0);
    }

    // -- Add form --

    #[test]
    fn add_form_submits_and_stays_open() {
        let mut app = app();
        let mut actions = vec![Action::AddEmployee];
        actions.extend(type_text("Zed"));
        actions.push(Action::NextField);
        actions.extend(type_text("Intern"));
        actions.push(Action::NextField);
        actions.extend(type_text("Ops"));
        actions.push(Action::NextField);
        actions.extend(type_text("50000"));
        actions.push(Action::Submit);
        run(&mut app, &actions);

        assert_eq!(app.table.roster().len(), 6);
        assert_eq!(app.table.roster()[5].name, "Zed");
        assert_eq!(app.screen, Screen::AddForm(RecordForm::default()));
        assert_eq!(app.notice, Some(Notice::info("Added Zed")));
        assert_eq!(app.cursor, 5);
    }

    #[test]
    fn add_form_invalid_keeps_input() {
        let mut app = app();
        let mut actions = vec![Action::AddEmployee];
        actions.extend(type_text("Zed"));
        actions.push(Action::Submit);
        run(&mut app, &actions);

        assert_eq!(app.table.roster().len(), 5);
        match &app.screen {
            Screen::AddForm(form) => assert_eq!(form.draft.name, "Zed"),
            other => panic!("Expected AddForm, got {:?}", other),
        }
        let notice = app.notice.expect("validation notice");
        assert_eq!(notice.kind, NoticeKind::Error);
        assert!(notice.text.contains("Position"));
    }

    #[test]
    fn add_form_escape_discards() {
        let mut app = app();
        let mut actions = vec![Action::AddEmployee];
        actions.extend(type_text("Zed"));
        actions.push(Action::Back);
        run(&mut app, &actions);
        assert_eq!(app.screen, Screen::Table);
        assert_eq!(app.table.roster().len(), 5);
    }

    #[test]
    fn form_arrow_keys_move_between_fields() {
        let form = RecordForm::default();
        assert_eq!(
            update_form(form.clone(), &Action::MoveDown),
            Transition::Screen(Screen::AddForm(form.clone().next_field()))
        );
        assert_eq!(
            update_form(form.clone(), &Action::MoveUp),
            Transition::Screen(Screen::AddForm(form.prev_field()))
        );
    }

    #[test]
    fn form_submit_emits_effect_with_draft() {
        let form = RecordForm {
            draft: RecordDraft::new("a", "b", "c", "1"),
            focus: Column::Salary,
        };
        assert_eq!(
            update(Screen::AddForm(form.clone()), &Action::Submit, 0, &TableController::default()),
            Transition::Effect(Effect::SubmitRecord(form))
        );
    }

    // -- Removal --

    #[test]
    fn remove_without_selection_shows_error() {
        let mut app = app();
        run(&mut app, &[Action::RemoveSelected]);
        assert_eq!(app.screen, Screen::Table);
        assert_eq!(
            app.notice,
            Some(Notice::error("Please select employees to remove."))
        );
    }

    #[test]
    fn remove_goes_through_confirm() {
        let mut app = app();
        run(
            &mut app,
            &[
                Action::ToggleSelection,
                Action::MoveDown,
                Action::ToggleSelection,
                Action::RemoveSelected,
            ],
        );
        assert_eq!(app.screen, Screen::Confirm { count: 2 });
        assert_eq!(app.table.roster().len(), 5);

        run(&mut app, &[Action::ConfirmYes]);
        assert_eq!(app.screen, Screen::Table);
        assert_eq!(app.table.roster().len(), 3);
        assert!(app.table.selection().is_empty());
        assert_eq!(app.notice, Some(Notice::info("Removed 2 employee(s)")));
    }

    #[test]
    fn confirm_no_keeps_everything() {
        let mut app = app();
        run(
            &mut app,
            &[Action::ToggleSelection, Action::RemoveSelected, Action::ConfirmNo],
        );
        assert_eq!(app.screen, Screen::Table);
        assert_eq!(app.table.roster().len(), 5);
        assert!(app.table.is_selected(0));
    }

    #[test]
    fn confirm_ignores_other_keys() {
        assert_eq!(
            update_confirm(3, &Action::ToggleSelection),
            Transition::Screen(Screen::Confirm { count: 3 })
        );
    }

    #[test]
    fn removing_last_rows_clamps_cursor() {
        let mut app = app();
        run(
            &mut app,
            &[
                Action::MoveDown,
                Action::MoveDown,
                Action::MoveDown,
                Action::MoveDown,
                Action::ToggleSelection,
                Action::RemoveSelected,
                Action::ConfirmYes,
            ],
        );
        assert_eq!(app.table.view_len(), 4);
        assert_eq!(app.cursor, 3);
    }

    // -- Theme --

    #[test]
    fn theme_toggle_is_persisted() {
        let mut app = app();
        let store = run(&mut app, &[Action::ToggleTheme]);
        assert_eq!(app.theme, Theme::Dark);
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("dark"));
    }

    #[test]
    fn theme_save_failure_still_toggles() {
        let mut app = app();
        dispatch(&mut app, &Action::ToggleTheme, &mut ReadOnlyStore);
        assert_eq!(app.theme, Theme::Dark);
        assert_eq!(app.notice.map(|n| n.kind), Some(NoticeKind::Error));
    }
}
