//! Table formatting for printed output.
//!
//! Pure functions: (rows, OutputFormat) → String.
//! No I/O, no side effects.

use serde::Serialize;

use crate::types::{Column, OutputFormat, RowDescriptor};

/// Format rendered rows for output.
pub fn format_rows(rows: &[RowDescriptor], format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => format_human(rows),
        OutputFormat::Json => format_json(rows),
    }
}

/// Dollar amount with thousands separators: 75000 → "$75,000".
pub fn format_salary(salary: u64) -> String {
    let digits = salary.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push('$');
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Cell text for one column of a row.
pub fn cell_text(row: &RowDescriptor, column: Column) -> String {
    match column {
        Column::Name => row.name.clone(),
        Column::Position => row.position.clone(),
        Column::Department => row.department.clone(),
        Column::Salary => format_salary(row.salary),
    }
}

// ============================================================================
// HUMAN FORMAT
// ============================================================================

fn format_human(rows: &[RowDescriptor]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| Column::ALL.iter().map(|&c| cell_text(row, c)).collect())
        .collect();

    let widths: Vec<usize> = Column::ALL
        .iter()
        .map(|column| {
            cells
                .iter()
                .map(|r| r[column.index()].chars().count())
                .chain(std::iter::once(column.label().len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();

    let header: Vec<&str> = Column::ALL.iter().map(|c| c.label()).collect();
    out.push_str(&format_line("  ", &header, &widths));
    let rule: Vec<String> = widths.iter().map(|&w| "─".repeat(w)).collect();
    let rule: Vec<&str> = rule.iter().map(String::as_str).collect();
    out.push_str(&format_line("  ", &rule, &widths));

    for (row, row_cells) in rows.iter().zip(&cells) {
        let marker = if row.is_selected { "* " } else { "  " };
        let row_cells: Vec<&str> = row_cells.iter().map(String::as_str).collect();
        out.push_str(&format_line(marker, &row_cells, &widths));
    }

    out.push('\n');
    let selected = rows.iter().filter(|r| r.is_selected).count();
    out.push_str(&format!(
        "{} employee{}",
        rows.len(),
        if rows.len() == 1 { "" } else { "s" }
    ));
    if selected > 0 {
        out.push_str(&format!(", {} selected", selected));
    }
    out.push('\n');

    out
}

/// One padded line. Salary is right-aligned, text columns left-aligned.
fn format_line(marker: &str, cells: &[&str], widths: &[usize]) -> String {
    let mut line = String::from(marker);
    for (i, (cell, &width)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        let pad = width.saturating_sub(cell.chars().count());
        if i == Column::Salary.index() {
            line.push_str(&" ".repeat(pad));
            line.push_str(cell);
        } else {
            line.push_str(cell);
            line.push_str(&" ".repeat(pad));
        }
    }
    line.truncate(line.trim_end().len());
    line.push('\n');
    line
}

// ============================================================================
// JSON FORMAT
// ============================================================================

#[derive(Serialize)]
struct JsonTable<'a> {
    count: usize,
    selected: usize,
    rows: &'a [RowDescriptor],
}

fn format_json(rows: &[RowDescriptor]) -> String {
    let table = JsonTable {
        count: rows.len(),
        selected: rows.iter().filter(|r| r.is_selected).count(),
        rows,
    };
    serde_json::to_string_pretty(&table).unwrap_or_else(|e| {
        // Plain strings and integers always serialize
        panic!("Failed to serialize rows to JSON: {}", e)
    })
}

// ============================================================================
// TESTS
// ============================================================================
