//! roster-table: an interactive employee roster table for the terminal.

pub mod collate;
pub mod error;
pub mod prefs;
pub mod report;
pub mod table;
pub mod tui;
pub mod types;
