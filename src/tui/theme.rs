//! TUI color semantics and palettes.
//!
//! Two palettes, one per presentation mode. Pure data, consumed by the
//! rendering layer.
//!
//! Color semantics (both palettes):
//! - Accent: interactive elements (keybinding hints, focused field)
//! - Highlight: rows selected for removal
//! - Danger: error notices and the removal prompt
//! - Success: confirmation notices
//! - Muted: de-emphasized text (help line, tallies)

use ratatui::style::{Color, Modifier, Style};

use crate::types::Theme;

/// Styles for one presentation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Background and default text for the whole frame.
    pub base: Style,
    /// Title bar.
    pub title: Style,
    /// Table header row.
    pub header: Style,
    /// Rows selected for removal.
    pub selected: Style,
    /// Cursor row, layered over the row's own style.
    pub cursor: Style,
    /// Keybinding hints, focused input.
    pub accent: Style,
    /// De-emphasized text.
    pub muted: Style,
    pub danger: Style,
    pub success: Style,
    /// Dialog border and background.
    pub dialog: Style,
}

pub const LIGHT: Palette = Palette {
    base: Style::new().fg(Color::Black).bg(Color::White),
    title: Style::new().fg(Color::Black).add_modifier(Modifier::BOLD),
    header: Style::new().fg(Color::Blue).add_modifier(Modifier::BOLD),
    selected: Style::new().fg(Color::Black).bg(Color::LightBlue),
    cursor: Style::new().add_modifier(Modifier::REVERSED),
    accent: Style::new().fg(Color::Blue),
    muted: Style::new().fg(Color::DarkGray),
    danger: Style::new().fg(Color::Red),
    success: Style::new().fg(Color::Green),
    dialog: Style::new().fg(Color::Black).bg(Color::Gray),
};

pub const DARK: Palette = Palette {
    base: Style::new().fg(Color::Gray).bg(Color::Black),
    title: Style::new().fg(Color::White).add_modifier(Modifier::BOLD),
    header: Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    selected: Style::new().fg(Color::White).bg(Color::Blue),
    cursor: Style::new().add_modifier(Modifier::REVERSED),
    accent: Style::new().fg(Color::Cyan),
    muted: Style::new().fg(Color::DarkGray),
    danger: Style::new().fg(Color::LightRed),
    success: Style::new().fg(Color::LightGreen),
    dialog: Style::new().fg(Color::White).bg(Color::DarkGray),
};

/// Palette for a presentation mode.
pub fn palette(theme: Theme) -> &'static Palette {
    match theme {
        Theme::Light => &LIGHT,
        Theme::Dark => &DARK,
    }
}

// ============================================================================
// TESTS
// ============================================================================
