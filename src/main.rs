//! roster-table CLI
//!
//! Interactive employee roster table for the terminal.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{LevelFilter, info};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode, WriteLogger};

use roster_table::prefs::{
    JsonFileStore, MemoryStore, PreferenceStore, default_preferences_path, load_theme, save_theme,
};
use roster_table::report::format_rows;
use roster_table::table::{Command, Snapshot, TableController};
use roster_table::tui::run::run;
use roster_table::tui::state::App;
use roster_table::types::{Column, OutputFormat, Theme};

#[derive(Parser)]
#[command(name = "roster-table")]
#[command(about = "Search, sort, select, add and remove employees in a terminal table")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Preference file (default: config dir)
    #[arg(long, global = true)]
    prefs: Option<PathBuf>,

    /// Keep preferences in memory only
    #[arg(long, global = true)]
    no_persist: bool,

    /// Log file for the interactive table (default: data dir)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Log debug detail
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive table (default)
    Tui,

    /// Print the seed roster after filtering, sorting and selecting
    List {
        /// Case-insensitive substring of name, position or department
        #[arg(long)]
        filter: Option<String>,

        /// Column to sort by; repeat to toggle the direction again
        #[arg(long)]
        sort: Vec<Column>,

        /// Zero-based view row to select; may be repeated
        #[arg(long)]
        select: Vec<usize>,

        /// Output format
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormatArg,
    },

    /// Show or change the stored presentation mode
    Theme {
        /// New mode; omit to print the current one
        #[arg(value_enum)]
        mode: Option<ThemeArg>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormatArg {
    Human,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

fn main() -> ExitCode {
    let mut cli = Cli::parse();
    let command = cli.command.take().unwrap_or(Commands::Tui);
    let mut store = init(&cli, &command);

    let result = match command {
        Commands::Tui => cmd_tui(store.as_mut()),
        Commands::List {
            filter,
            sort,
            select,
            format,
        } => cmd_list(filter, &sort, &select, format.into()),
        Commands::Theme { mode } => cmd_theme(store.as_mut(), mode.map(Theme::from)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

// ============================================================================
// SETUP
// ============================================================================

/// Install the logger for `command`, then open the preference store.
///
/// The store warns about unreadable files, so logging must exist first.
fn init(cli: &Cli, command: &Commands) -> Box<dyn PreferenceStore> {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    match command {
        Commands::Tui => init_file_logging(cli.log_file.as_deref(), level),
        Commands::List { .. } | Commands::Theme { .. } => init_stderr_logging(level),
    }
    open_store(cli.prefs.as_deref(), cli.no_persist)
}

/// Logs go to a file while the terminal belongs to the table.
fn init_file_logging(path: Option<&Path>, level: LevelFilter) {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_log_path);
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    match File::create(&path) {
        Ok(log_file) => {
            let _ = WriteLogger::init(level, Config::default(), log_file);
        }
        Err(e) => eprintln!("Note: logging disabled, cannot create {}: {}", path.display(), e),
    }
}

fn init_stderr_logging(level: LevelFilter) {
    let _ = TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto);
}

/// On Linux: ~/.local/share/roster-table/roster-table.log
fn default_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("roster-table")
        .join("roster-table.log")
}

fn open_store(path: Option<&Path>, no_persist: bool) -> Box<dyn PreferenceStore> {
    if no_persist {
        return Box::new(MemoryStore::new());
    }
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_preferences_path);
    Box::new(JsonFileStore::open_or_empty(path))
}

// ============================================================================
// COMMAND HANDLERS
// ============================================================================

fn cmd_tui(store: &mut dyn PreferenceStore) -> Result<(), String> {
    let theme = load_theme(store);
    info!("starting in {} mode", theme);

    let app = App::new(TableController::default(), theme);
    run(app, store).map_err(|e| format!("TUI error: {}", e))?;
    Ok(())
}

fn cmd_list(
    filter: Option<String>,
    sort: &[Column],
    select: &[usize],
    format: OutputFormat,
) -> Result<(), String> {
    let mut table = TableController::default();
    let mut snapshot = Snapshot::default();
    // Nothing here removes rows
    let mut gate = |_count: usize| false;

    let mut commands = Vec::new();
    if let Some(term) = filter {
        commands.push(Command::FilterChanged(term));
    }
    commands.extend(sort.iter().copied().map(Command::SortRequested));
    commands.extend(select.iter().copied().map(Command::RowClicked));

    for command in commands {
        table
            .apply(command, &mut gate, &mut snapshot)
            .map_err(|e| e.to_string())?;
    }

    let rows = if snapshot.renders == 0 {
        table.render()
    } else {
        snapshot.rows
    };
    println!("{}", format_rows(&rows, format));
    Ok(())
}

fn cmd_theme(store: &mut dyn PreferenceStore, mode: Option<Theme>) -> Result<(), String> {
    match mode {
        None => println!("{}", load_theme(store)),
        Some(theme) => {
            save_theme(store, theme).map_err(|e| e.to_string())?;
            println!("Theme set to {}", theme);
        }
    }
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
