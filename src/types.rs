//! Domain types for roster-table.
//!
//! Records, columns, raw form input and the row descriptors handed to
//! renderers. No behaviour beyond parsing and display.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

// ============================================================================
// RECORDS
// ============================================================================

/// One employee row. Identity is positional within the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    pub name: String,
    pub position: String,
    pub department: String,
    pub salary: u64,
}

impl Employee {
    pub fn new(
        name: impl Into<String>,
        position: impl Into<String>,
        department: impl Into<String>,
        salary: u64,
    ) -> Self {
        Employee {
            name: name.into(),
            position: position.into(),
            department: department.into(),
            salary,
        }
    }

    /// Text value of a string column. Salary has no text value.
    pub fn text(&self, column: Column) -> Option<&str> {
        match column {
            Column::Name => Some(&self.name),
            Column::Position => Some(&self.position),
            Column::Department => Some(&self.department),
            Column::Salary => None,
        }
    }
}

/// The roster every session starts from.
pub fn seed_roster() -> Vec<Employee> {
    vec![
        Employee::new("Alice Johnson", "Manager", "HR", 75_000),
        Employee::new("Bob Smith", "Developer", "IT", 82_000),
        Employee::new("Carol White", "Designer", "Marketing", 68_000),
        Employee::new("David Brown", "Engineer", "Engineering", 90_000),
        Employee::new("Emily Davis", "Analyst", "Finance", 70_000),
    ]
}

/// Unvalidated add-record input, exactly as a form supplies it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordDraft {
    pub name: String,
    pub position: String,
    pub department: String,
    pub salary: String,
}

impl RecordDraft {
    pub fn new(
        name: impl Into<String>,
        position: impl Into<String>,
        department: impl Into<String>,
        salary: impl Into<String>,
    ) -> Self {
        RecordDraft {
            name: name.into(),
            position: position.into(),
            department: department.into(),
            salary: salary.into(),
        }
    }

    /// Raw value of the given field.
    pub fn field(&self, column: Column) -> &str {
        match column {
            Column::Name => &self.name,
            Column::Position => &self.position,
            Column::Department => &self.department,
            Column::Salary => &self.salary,
        }
    }

    pub fn field_mut(&mut self, column: Column) -> &mut String {
        match column {
            Column::Name => &mut self.name,
            Column::Position => &mut self.position,
            Column::Department => &mut self.department,
            Column::Salary => &mut self.salary,
        }
    }
}

/// One rendered row: the record fields plus its selection flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowDescriptor {
    pub name: String,
    pub position: String,
    pub department: String,
    pub salary: u64,
    pub is_selected: bool,
}

impl RowDescriptor {
    pub fn from_employee(employee: &Employee, is_selected: bool) -> Self {
        RowDescriptor {
            name: employee.name.clone(),
            position: employee.position.clone(),
            department: employee.department.clone(),
            salary: employee.salary,
            is_selected,
        }
    }
}

// ============================================================================
// COLUMNS
// ============================================================================

/// Table column. Doubles as sort key and form field identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Name,
    Position,
    Department,
    Salary,
}

impl Column {
    /// All columns in display order.
    pub const ALL: [Column; 4] = [
        Column::Name,
        Column::Position,
        Column::Department,
        Column::Salary,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Column::Name => "Name",
            Column::Position => "Position",
            Column::Department => "Department",
            Column::Salary => "Salary",
        }
    }

    /// Zero-based display position.
    pub fn index(self) -> usize {
        match self {
            Column::Name => 0,
            Column::Position => 1,
            Column::Department => 2,
            Column::Salary => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Column> {
        Column::ALL.get(index).copied()
    }

    pub fn next(self) -> Column {
        Column::ALL[(self.index() + 1) % Column::ALL.len()]
    }

    pub fn prev(self) -> Column {
        Column::ALL[(self.index() + Column::ALL.len() - 1) % Column::ALL.len()]
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(Column::Name),
            "position" => Ok(Column::Position),
            "department" => Ok(Column::Department),
            "salary" => Ok(Column::Salary),
            other => Err(format!(
                "unknown column '{}' (expected name, position, department or salary)",
                other
            )),
        }
    }
}

/// Direction a sort was applied in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

// ============================================================================
// PRESENTATION SETTINGS
// ============================================================================

/// Light or dark presentation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Stored preference value.
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Only an exact "dark" selects dark mode; anything else is light.
    pub fn from_preference(value: Option<&str>) -> Theme {
        match value {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output format for printed tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable aligned table.
    #[default]
    Human,
    /// Machine-readable JSON.
    Json,
}

// ============================================================================
// TESTS
// ============================================================================
