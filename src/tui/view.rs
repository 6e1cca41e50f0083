//! Pure rendering: map App state to ratatui widget trees.
//!
//! The table is always drawn; dialogs (add form, confirm) are drawn on
//! top of it. Widget-building functions are pure (state in, widgets out);
//! the only effect is Frame::render_widget() writing to the buffer.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};

use crate::report::cell_text;
use crate::table::removal_prompt;
use crate::types::{Column, RowDescriptor};

use super::state::{App, NoticeKind, RecordForm, Screen};
use super::theme::{Palette, palette};

// ============================================================================
// DISPATCH
// ============================================================================

/// Render the whole app to the terminal frame.
pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();
    let palette = palette(app.theme);

    frame.render_widget(Block::new().style(palette.base), area);

    let chunks = Layout::vertical([
        Constraint::Length(1), // title
        Constraint::Length(1), // search box
        Constraint::Min(0),    // table
        Constraint::Length(1), // tally
        Constraint::Length(1), // notice
        Constraint::Length(1), // help
    ])
    .split(area);

    frame.render_widget(render_title(app, palette), chunks[0]);
    frame.render_widget(render_search(app, palette), chunks[1]);
    render_table(app, palette, frame, chunks[2]);
    frame.render_widget(render_tally(app, palette), chunks[3]);
    frame.render_widget(render_notice(app, palette), chunks[4]);
    frame.render_widget(render_help(app, palette), chunks[5]);

    match &app.screen {
        Screen::AddForm(form) => render_form(form, palette, frame, area),
        Screen::Confirm { count } => render_confirm(*count, palette, frame, area),
        Screen::Table | Screen::Search => {}
    }
}

// ============================================================================
// SHARED LAYOUT
// ============================================================================

/// Title bar with the current presentation mode.
fn render_title(app: &App, palette: &Palette) -> Paragraph<'static> {
    Paragraph::new(Line::from(vec![
        Span::styled("Employee Roster", palette.title),
        Span::styled(format!("   {} mode ", app.theme), palette.muted),
        Span::styled("[t]", palette.accent),
    ]))
}

/// Search box. Shows a caret while it has focus.
fn render_search(app: &App, palette: &Palette) -> Paragraph<'static> {
    let term = app.table.filter_term().to_string();
    let focused = app.screen == Screen::Search;

    let mut spans = vec![
        Span::styled("Search: ", if focused { palette.accent } else { palette.muted }),
        Span::raw(term),
    ];
    if focused {
        spans.push(Span::styled("▏", palette.accent));
    } else if app.table.filter_term().is_empty() {
        spans.push(Span::styled("press / to filter", palette.muted));
    }

    Paragraph::new(Line::from(spans))
}

/// Selection tally under the table.
fn render_tally(app: &App, palette: &Palette) -> Paragraph<'static> {
    let shown = app.table.view_len();
    let total = app.table.roster().len();
    let selected = app.table.selection().len();

    let mut text = if shown == total {
        format!("  {} employee{}", total, if total == 1 { "" } else { "s" })
    } else {
        format!("  {} of {} employees", shown, total)
    };
    if selected > 0 {
        text.push_str(&format!("  ·  {} selected", selected));
    }

    Paragraph::new(Span::styled(text, palette.muted))
}

/// Feedback from the last operation, if any.
fn render_notice(app: &App, palette: &Palette) -> Paragraph<'static> {
    match &app.notice {
        Some(notice) => {
            let style = match notice.kind {
                NoticeKind::Info => palette.success,
                NoticeKind::Error => palette.danger,
            };
            Paragraph::new(Span::styled(format!("  {}", notice.text), style))
        }
        None => Paragraph::new(""),
    }
}

/// Help line showing available keybindings for the current screen.
///
/// The remove hint only appears while rows are selected.
fn render_help(app: &App, palette: &Palette) -> Paragraph<'static> {
    let help_text = match &app.screen {
        Screen::Table => {
            let mut parts = vec!["[j/k] move", "[Space] select", "[1-4] sort", "[/] search", "[a] add"];
            if !app.table.selection().is_empty() {
                parts.push("[d] remove");
            }
            if !app.table.filter_term().is_empty() {
                parts.push("[Esc] clear filter");
            }
            parts.push("[t] theme");
            parts.push("[q] quit");
            parts.join("  ")
        }
        Screen::Search => "type to filter  [Enter/Esc] done".to_string(),
        Screen::AddForm(_) => "[Tab] next field  [Enter] add  [Esc] close".to_string(),
        Screen::Confirm { .. } => "[y] yes, remove  [n] no, go back".to_string(),
    };

    Paragraph::new(Span::styled(help_text, palette.muted))
}

// ============================================================================
// TABLE
// ============================================================================

fn render_table(app: &App, palette: &Palette, frame: &mut Frame, area: Rect) {
    let rows = app.table.render();

    if rows.is_empty() {
        let message = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("  No matching employees", palette.muted)),
        ]);
        frame.render_widget(message, area);
        return;
    }

    let header = Row::new(
        std::iter::once(Cell::from(""))
            .chain(Column::ALL.iter().map(|c| Cell::from(header_label(*c)))),
    )
    .style(palette.header);

    let body: Vec<Row> = rows.iter().map(|row| table_row(row, palette)).collect();

    let widths = [
        Constraint::Length(3),
        Constraint::Percentage(30),
        Constraint::Percentage(25),
        Constraint::Percentage(25),
        Constraint::Percentage(20),
    ];

    let table = Table::new(body, widths)
        .header(header)
        .column_spacing(1)
        .row_highlight_style(palette.cursor);

    // The cursor is hidden while typing a search term
    let cursor = match app.screen {
        Screen::Search => None,
        _ => Some(app.cursor.min(rows.len() - 1)),
    };
    let mut state = TableState::default().with_selected(cursor);
    frame.render_stateful_widget(table, area, &mut state);
}

/// Header text: the number key that sorts by the column, then its name.
fn header_label(column: Column) -> Line<'static> {
    let text = format!("{} {}", column.index() + 1, column.label());
    if column == Column::Salary {
        Line::from(text).right_aligned()
    } else {
        Line::from(text)
    }
}

fn table_row(row: &RowDescriptor, palette: &Palette) -> Row<'static> {
    let marker = if row.is_selected { "[x]" } else { "[ ]" };
    let cells = std::iter::once(Cell::from(marker)).chain(Column::ALL.iter().map(|&column| {
        let text = cell_text(row, column);
        if column == Column::Salary {
            Cell::from(Line::from(text).right_aligned())
        } else {
            Cell::from(text)
        }
    }));

    let row_widget = Row::new(cells);
    if row.is_selected {
        row_widget.style(palette.selected)
    } else {
        row_widget
    }
}

// ============================================================================
// DIALOGS
// ============================================================================

/// Rectangle of at most `width` x `height`, centered in `area`.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_form(form: &RecordForm, palette: &Palette, frame: &mut Frame, area: Rect) {
    let popup = centered_rect(50, 10, area);
    frame.render_widget(Clear, popup);

    let block = Block::bordered()
        .title(" Add Employee ")
        .style(palette.dialog);
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let mut lines = vec![Line::from("")];
    for column in Column::ALL {
        let focused = column == form.focus;
        let label = format!(" {:<11}", format!("{}:", column.label()));
        let value = form.draft.field(column).to_string();

        let mut spans = vec![
            Span::styled(label, if focused { palette.accent } else { palette.dialog }),
            Span::raw(value),
        ];
        if focused {
            spans.push(Span::styled("▏", palette.accent));
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " Enter adds and keeps the form open",
        palette.muted,
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_confirm(count: usize, palette: &Palette, frame: &mut Frame, area: Rect) {
    let popup = centered_rect(64, 7, area);
    frame.render_widget(Clear, popup);

    let block = Block::bordered()
        .title(" Remove Employees ")
        .style(palette.dialog);
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!(" {}", removal_prompt(count)), palette.danger)),
        Line::from(""),
        Line::from(vec![
            Span::styled(" [y] ", palette.accent),
            Span::raw("yes, remove   "),
            Span::styled("[n] ", palette.accent),
            Span::raw("no, go back"),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

// ============================================================================
// TESTS
// ============================================================================
