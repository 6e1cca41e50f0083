//! The roster table: source data, derived view, selection.
//!
//! `TableController` is the only owner of table state. The view is a list
//! of roster positions, so every view row maps back to its record without
//! searching. Selection indices point into the view and are cleared every
//! time the view is rebuilt or reordered.

use std::collections::BTreeSet;

use log::{debug, info};

use crate::collate::compare_by;
use crate::error::{TableError, ValidationError};
use crate::types::{Column, Employee, RecordDraft, RowDescriptor, SortDirection, seed_roster};

// ============================================================================
// COLLABORATORS
// ============================================================================

/// Yes/no gate consulted before removing rows.
pub trait ConfirmationGate {
    /// Asked with the number of rows about to be removed.
    fn confirm(&mut self, count: usize) -> bool;
}

impl<F> ConfirmationGate for F
where
    F: FnMut(usize) -> bool,
{
    fn confirm(&mut self, count: usize) -> bool {
        self(count)
    }
}

/// Receives the projected rows after every state change.
pub trait Renderer {
    fn render(&mut self, rows: &[RowDescriptor]);
}

/// Renderer that keeps the latest frame and counts renders.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Snapshot {
    pub rows: Vec<RowDescriptor>,
    pub renders: usize,
}

impl Renderer for Snapshot {
    fn render(&mut self, rows: &[RowDescriptor]) {
        self.rows = rows.to_vec();
        self.renders += 1;
    }
}

/// Front-end events the table understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    FilterChanged(String),
    SortRequested(Column),
    RowClicked(usize),
    AddSubmitted(RecordDraft),
    RemoveRequested,
}

/// Result of a removal request that passed the selection check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalOutcome {
    Removed(usize),
    Cancelled,
}

/// Text shown by confirmation gates.
pub fn removal_prompt(count: usize) -> String {
    format!(
        "Are you sure you want to remove {} selected employee(s)?",
        count
    )
}

// ============================================================================
// CONTROLLER
// ============================================================================

#[derive(Debug, Clone)]
pub struct TableController {
    roster: Vec<Employee>,
    /// Roster positions in display order.
    view: Vec<usize>,
    selected: BTreeSet<usize>,
    filter_term: String,
}

impl Default for TableController {
    fn default() -> Self {
        TableController::new(seed_roster())
    }
}

impl TableController {
    /// Unfiltered controller over the given roster.
    pub fn new(roster: Vec<Employee>) -> Self {
        let view = (0..roster.len()).collect();
        TableController {
            roster,
            view,
            selected: BTreeSet::new(),
            filter_term: String::new(),
        }
    }

    // -- Reads --

    pub fn roster(&self) -> &[Employee] {
        &self.roster
    }

    pub fn view_len(&self) -> usize {
        self.view.len()
    }

    /// Record shown at a view index.
    pub fn record_at(&self, view_index: usize) -> Option<&Employee> {
        self.view.get(view_index).map(|&pos| &self.roster[pos])
    }

    /// Records in view order.
    pub fn view_records(&self) -> impl Iterator<Item = &Employee> {
        self.view.iter().map(|&pos| &self.roster[pos])
    }

    pub fn selection(&self) -> &BTreeSet<usize> {
        &self.selected
    }

    pub fn is_selected(&self, view_index: usize) -> bool {
        self.selected.contains(&view_index)
    }

    pub fn filter_term(&self) -> &str {
        &self.filter_term
    }

    // -- Operations --

    /// Filter the roster by a case-insensitive substring of name,
    /// position or department. The view comes back in roster order.
    pub fn set_filter_term(&mut self, term: &str) {
        self.filter_term = term.to_string();
        let needle = term.to_lowercase();
        self.view = self
            .roster
            .iter()
            .enumerate()
            .filter(|(_, employee)| matches_term(employee, &needle))
            .map(|(pos, _)| pos)
            .collect();
        self.selected.clear();
        debug!("filter {:?} -> {} rows", term, self.view.len());
    }

    /// Sort the view by a column, flipping direction on repeated calls.
    ///
    /// The direction is read from the current first two rows: if they are
    /// already strictly ascending the sort goes descending, otherwise
    /// ascending. Two rows that tie under the column always yield an
    /// ascending sort. Selection is cleared since rows move.
    pub fn sort_by(&mut self, column: Column) -> SortDirection {
        let direction = match (self.record_at(0), self.record_at(1)) {
            (Some(first), Some(second)) if compare_by(column, first, second).is_lt() => {
                SortDirection::Descending
            }
            _ => SortDirection::Ascending,
        };

        let roster = &self.roster;
        self.view.sort_by(|&a, &b| {
            let ord = compare_by(column, &roster[a], &roster[b]);
            match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
        self.selected.clear();
        debug!("sorted by {} {:?}", column, direction);
        direction
    }

    /// Flip one view row in or out of the selection.
    ///
    /// Indices outside the view are ignored.
    pub fn toggle_selection(&mut self, view_index: usize) {
        if view_index >= self.view.len() {
            debug!("ignoring toggle of row {} (view has {})", view_index, self.view.len());
            return;
        }
        if !self.selected.remove(&view_index) {
            self.selected.insert(view_index);
        }
    }

    /// Validate and append a record, then show the whole roster again.
    pub fn add_record(&mut self, draft: &RecordDraft) -> Result<(), TableError> {
        let employee = validate_draft(draft)?;
        info!("adding {} ({})", employee.name, employee.department);
        self.roster.push(employee);
        self.reset_view();
        Ok(())
    }

    /// Number of rows a removal would take out.
    pub fn pending_removal(&self) -> Result<usize, TableError> {
        if self.selected.is_empty() {
            Err(TableError::EmptySelection)
        } else {
            Ok(self.selected.len())
        }
    }

    /// Remove every selected row and show the whole roster again.
    ///
    /// Callers gate this behind a confirmation. Returns how many records
    /// were removed.
    pub fn confirm_removal(&mut self) -> usize {
        let positions: Vec<usize> = self
            .selected
            .iter()
            .filter_map(|&i| self.view.get(i).copied())
            .collect();
        let removed = remove_positions(&mut self.roster, &positions);
        info!("removed {} record(s), {} left", removed, self.roster.len());
        self.reset_view();
        removed
    }

    /// Remove the selection after asking the gate.
    pub fn remove_selected(
        &mut self,
        gate: &mut dyn ConfirmationGate,
    ) -> Result<RemovalOutcome, TableError> {
        let count = self.pending_removal()?;
        if gate.confirm(count) {
            Ok(RemovalOutcome::Removed(self.confirm_removal()))
        } else {
            debug!("removal of {} row(s) cancelled", count);
            Ok(RemovalOutcome::Cancelled)
        }
    }

    /// Project the view and selection to row descriptors.
    pub fn render(&self) -> Vec<RowDescriptor> {
        self.view_records()
            .enumerate()
            .map(|(i, employee)| RowDescriptor::from_employee(employee, self.is_selected(i)))
            .collect()
    }

    /// Run one front-end command, rendering after every state change.
    pub fn apply(
        &mut self,
        command: Command,
        gate: &mut dyn ConfirmationGate,
        renderer: &mut dyn Renderer,
    ) -> Result<(), TableError> {
        match command {
            Command::FilterChanged(term) => self.set_filter_term(&term),
            Command::SortRequested(column) => {
                self.sort_by(column);
            }
            Command::RowClicked(index) => self.toggle_selection(index),
            Command::AddSubmitted(draft) => self.add_record(&draft)?,
            Command::RemoveRequested => {
                if self.remove_selected(gate)? == RemovalOutcome::Cancelled {
                    return Ok(());
                }
            }
        }
        renderer.render(&self.render());
        Ok(())
    }

    /// Drop the filter and selection, showing the roster in order.
    fn reset_view(&mut self) {
        self.filter_term.clear();
        self.view = (0..self.roster.len()).collect();
        self.selected.clear();
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// `needle` must already be lowercase.
fn matches_term(employee: &Employee, needle: &str) -> bool {
    [&employee.name, &employee.position, &employee.department]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Turn raw form input into a record, or say which field is wrong.
pub fn validate_draft(draft: &RecordDraft) -> Result<Employee, ValidationError> {
    for column in Column::ALL {
        if draft.field(column).trim().is_empty() {
            return Err(ValidationError::Missing { field: column });
        }
    }

    let raw_salary = draft.salary.trim();
    let salary = raw_salary
        .parse::<u64>()
        .map_err(|_| ValidationError::InvalidSalary {
            value: raw_salary.to_string(),
        })?;

    Ok(Employee::new(
        draft.name.trim(),
        draft.position.trim(),
        draft.department.trim(),
        salary,
    ))
}

/// Remove items at the given positions, highest first so earlier removals
/// never shift positions still to be removed. Duplicates and out-of-range
/// positions are skipped. Returns the number removed.
pub fn remove_positions<T>(items: &mut Vec<T>, positions: &[usize]) -> usize {
    let mut ordered: Vec<usize> = positions.to_vec();
    ordered.sort_unstable_by(|a, b| b.cmp(a));
    ordered.dedup();

    let mut removed = 0;
    for pos in ordered {
        if pos < items.len() {
            items.remove(pos);
            removed += 1;
        }
    }
    removed
}

// ============================================================================
// TESTS
// ============================================================================
