//! TUI state algebra: pure types, zero effects.
//!
//! These types define the whole TUI state space. The transition function
//! and the rendering layer both program against them.
//!
//! Design principle: Screen variants carry only per-screen transient state
//! (form contents, pending counts). Table data lives in the controller
//! owned by App, and so does everything that must survive a screen change
//! (cursor, theme, last notice).

use crossterm::event::KeyEvent;

use crate::table::TableController;
use crate::types::{Column, RecordDraft, Theme};

// ============================================================================
// APP EVENTS
// ============================================================================

/// Everything the event loop can receive from its channel.
#[derive(Debug)]
pub enum AppEvent {
    /// A terminal key event from the crossterm reader thread.
    Key(KeyEvent),
    /// The terminal was resized; redraw.
    Resize,
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

/// Top-level TUI model.
#[derive(Debug)]
pub struct App {
    /// Current screen.
    pub screen: Screen,

    /// Roster, view and selection.
    pub table: TableController,

    /// Focused view row. Kept within the view by the effect handler.
    pub cursor: usize,

    /// Presentation mode, loaded from preferences at startup.
    pub theme: Theme,

    /// Message from the last operation, cleared on the next key.
    pub notice: Option<Notice>,

    /// Set to true when the app should exit on the next tick.
    pub should_quit: bool,
}

/// One-line feedback shown above the help line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

// ============================================================================
// SCREENS
// ============================================================================

/// The current TUI screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Screen {
    /// Browsing the table.
    #[default]
    Table,

    /// Typing into the search box. The term itself lives in the controller.
    Search,

    /// Add-employee form over the table.
    AddForm(RecordForm),

    /// Confirmation gate before removal.
    Confirm {
        /// Number of selected rows about to be removed.
        count: usize,
    },
}

impl Screen {
    /// Whether printable keys are text input on this screen.
    pub fn takes_text(&self) -> bool {
        matches!(self, Screen::Search | Screen::AddForm(_))
    }
}

/// Contents of the add-employee form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordForm {
    pub draft: RecordDraft,
    /// Field receiving keystrokes.
    pub focus: Column,
}

impl Default for RecordForm {
    fn default() -> Self {
        RecordForm {
            draft: RecordDraft::default(),
            focus: Column::Name,
        }
    }
}

impl RecordForm {
    pub fn push(mut self, c: char) -> Self {
        self.draft.field_mut(self.focus).push(c);
        self
    }

    pub fn backspace(mut self) -> Self {
        self.draft.field_mut(self.focus).pop();
        self
    }

    pub fn next_field(mut self) -> Self {
        self.focus = self.focus.next();
        self
    }

    pub fn prev_field(mut self) -> Self {
        self.focus = self.focus.prev();
        self
    }
}

// ============================================================================
// ACTIONS
// ============================================================================

/// Semantic user action, decoupled from raw key events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Move cursor up in the table / previous form field.
    MoveUp,
    /// Move cursor down in the table / next form field.
    MoveDown,
    /// Toggle selection of the cursor row.
    ToggleSelection,
    /// Sort by a column (number keys 1-4).
    SortBy(Column),
    /// Focus the search box.
    Search,
    /// Open the add-employee form.
    AddEmployee,
    /// Remove selected rows (goes through the confirm gate).
    RemoveSelected,
    /// Switch between light and dark.
    ToggleTheme,
    /// A printable character while a text field has focus.
    Input(char),
    /// Delete the last character of the focused text field.
    Backspace,
    /// Next form field.
    NextField,
    /// Previous form field.
    PrevField,
    /// Submit the form / leave the search box.
    Submit,
    /// Confirm action (y on confirmation screen).
    ConfirmYes,
    /// Decline action (n on confirmation screen).
    ConfirmNo,
    /// Close a dialog, or clear the filter on the table.
    Back,
    /// Quit the application.
    Quit,
}

// ============================================================================
// TRANSITIONS
// ============================================================================

/// Result of a pure state transition.
///
/// The update function returns this. The effects boundary inspects it
/// to decide what to render and which table operations to run.
#[derive(Debug, PartialEq)]
pub enum Transition {
    /// Render this screen (may be the same or a different screen).
    Screen(Screen),
    /// Move the table cursor.
    Cursor(usize),
    /// Quit the application.
    Quit,
    /// Run a table or preference operation.
    Effect(Effect),
}

/// Operation requested by a pure transition.
///
/// Pure code never executes these; it only describes them.
#[derive(Debug, PartialEq)]
pub enum Effect {
    /// Replace the filter term.
    SetFilter(String),
    /// Sort the view by a column.
    Sort(Column),
    /// Toggle selection of a view row.
    ToggleRow(usize),
    /// Validate and append the form's record.
    SubmitRecord(RecordForm),
    /// Check the selection and open the confirm gate.
    RequestRemoval,
    /// Remove the selected rows.
    ConfirmRemoval,
    /// Flip and persist the theme.
    ToggleTheme,
}

// ============================================================================
// CONSTRUCTORS
// ============================================================================

impl App {
    /// Create an App on the table screen.
    pub fn new(table: TableController, theme: Theme) -> Self {
        App {
            screen: Screen::Table,
            table,
            cursor: 0,
            theme,
            notice: None,
            should_quit: false,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
