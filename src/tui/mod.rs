//! TUI module for the interactive roster table.
//!
//! Organized along FP/Unix boundaries:
//! - `state`: Pure data types (Screen, Action, Transition)
//! - `update`: Pure transitions, plus the effect handler driving the table
//! - `view`: Pure rendering (App → Frame)
//! - `theme`: Light and dark palettes
//! - `run`: Effects boundary (terminal, key mapping, event loop)

pub mod run;
pub mod state;
pub mod theme;
pub mod update;
pub mod view;
