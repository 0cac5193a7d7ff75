use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use crate::cli::error::{internal_error, user_error, validate_non_empty, validate_opacity, validate_quadrant_index};
use crate::cli::output::{
    format_matrix, format_settings, format_statistics, get_terminal_width, is_tty, short_id, QuadrantSection,
};
use crate::exchange::{default_export_dir, DataExchange, Format};
use crate::models::{parse_hex_color, Settings, TaskRecord, DEFAULT_QUADRANT_NAMES};
use crate::settings::SettingsStore;
use crate::store::TaskStore;
use anyhow::{Context, Result};

#[derive(Parser)]
#[command(name = "eisen")]
#[command(about = "Eisenhower matrix task ledger")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new task to a quadrant
    Add {
        /// Quadrant number (1-4) or name
        quadrant: String,
        /// Task description
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        description: Vec<String>,
    },
    /// List tasks by quadrant
    List {
        /// Only show this quadrant (number 1-4 or name)
        quadrant: Option<String>,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Mark a task as done
    Done {
        /// Task ID or unique prefix
        id: String,
    },
    /// Mark a task as not done
    Undo {
        /// Task ID or unique prefix
        id: String,
    },
    /// Replace a task's description
    Edit {
        /// Task ID or unique prefix
        id: String,
        /// New description
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        description: Vec<String>,
    },
    /// Move a task to another quadrant
    Move {
        /// Task ID or unique prefix
        id: String,
        /// Target quadrant number (1-4) or name
        quadrant: String,
    },
    /// Permanently delete a task
    Delete {
        /// Task ID or unique prefix
        id: String,
    },
    /// Show task statistics
    Stats {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Export all tasks
    Export {
        /// File format
        #[arg(value_enum)]
        format: FormatArg,
        /// Output file (defaults to a timestamped file in the exports directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace all tasks with the contents of an export file
    Import {
        /// File format
        #[arg(value_enum)]
        format: FormatArg,
        /// File to import
        path: PathBuf,
    },
    /// Settings management commands
    Settings {
        #[command(subcommand)]
        subcommand: SettingsCommands,
    },
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show current settings
    Show {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Change appearance settings
    Set {
        /// Background color (#RRGGBB)
        #[arg(long)]
        background_color: Option<String>,
        /// Text color (#RRGGBB)
        #[arg(long)]
        text_color: Option<String>,
        /// Background opacity in percent (0-100)
        #[arg(long)]
        opacity: Option<String>,
        /// Theme name
        #[arg(long)]
        theme: Option<String>,
    },
    /// Rename a quadrant's display name
    Rename {
        /// Quadrant number (1-4)
        index: String,
        /// New display name
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        name: Vec<String>,
    },
    /// Restore default settings
    Reset,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Json,
    Csv,
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => Format::Json,
            FormatArg::Csv => Format::Csv,
        }
    }
}

/// Everything a command needs, built once per process
pub struct AppContext {
    pub store: TaskStore,
    pub settings_store: SettingsStore,
    pub settings: Settings,
    pub export_dir: PathBuf,
}

impl AppContext {
    /// Open the configured database and settings
    pub fn open_default() -> Result<Self> {
        let store = TaskStore::open_default()?;
        let settings_store = SettingsStore::open_default()?;
        let settings = settings_store.load()?;
        let export_dir = default_export_dir()?;
        Ok(Self {
            store,
            settings_store,
            settings,
            export_dir,
        })
    }

    fn exchange(&self) -> DataExchange<'_> {
        DataExchange::new(&self.store, &self.export_dir)
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let ctx = AppContext::open_default()?;
    execute(&cli.command, ctx)
}

/// Dispatch a parsed command against an explicit context
pub fn execute(command: &Commands, mut ctx: AppContext) -> Result<()> {
    match command {
        Commands::Add { quadrant, description } => handle_add(&ctx, quadrant, &description.join(" ")),
        Commands::List { quadrant, json } => handle_list(&ctx, quadrant.as_deref(), *json),
        Commands::Done { id } => handle_status(&ctx, id, true),
        Commands::Undo { id } => handle_status(&ctx, id, false),
        Commands::Edit { id, description } => handle_edit(&ctx, id, &description.join(" ")),
        Commands::Move { id, quadrant } => handle_move(&ctx, id, quadrant),
        Commands::Delete { id } => handle_delete(&ctx, id),
        Commands::Stats { json } => handle_stats(&ctx, *json),
        Commands::Export { format, output } => handle_export(&ctx, (*format).into(), output.as_deref()),
        Commands::Import { format, path } => handle_import(&ctx, (*format).into(), path),
        Commands::Settings { subcommand } => handle_settings(&mut ctx, subcommand),
    }
}

/// Map a quadrant argument to the stored quadrant value
///
/// Numbers 1-4 and the configured display names select one of the four
/// stored quadrant keys; any other text is used verbatim.
pub fn resolve_quadrant(arg: &str, settings: &Settings) -> Result<String, String> {
    let arg = arg.trim();
    validate_non_empty(arg, "Quadrant")?;

    if arg.chars().all(|c| c.is_ascii_digit()) {
        let idx = validate_quadrant_index(arg)?;
        return Ok(DEFAULT_QUADRANT_NAMES[idx - 1].to_string());
    }

    if let Some(pos) = settings
        .quadrants
        .names
        .iter()
        .position(|name| name.eq_ignore_ascii_case(arg))
    {
        if let Some(stored) = DEFAULT_QUADRANT_NAMES.get(pos) {
            return Ok(stored.to_string());
        }
    }

    Ok(arg.to_string())
}

fn resolve_task_id(ctx: &AppContext, id: &str) -> Result<String> {
    match ctx.store.resolve_id(id)? {
        Some(full) => Ok(full),
        None => user_error(&format!("Task '{}' not found", id)),
    }
}

fn handle_add(ctx: &AppContext, quadrant: &str, description: &str) -> Result<()> {
    if let Err(e) = validate_non_empty(description, "Description") {
        user_error(&e);
    }
    let quadrant = resolve_quadrant(quadrant, &ctx.settings).unwrap_or_else(|e| user_error(&e));

    let record = TaskRecord::new(&quadrant, description);
    if !ctx.store.add(&record.id, &record.quadrant, &record.description, record.done) {
        internal_error(&format!("Failed to add task to '{}'", quadrant));
    }
    println!("Added task {} to '{}'", short_id(&record.id), quadrant);
    Ok(())
}

fn handle_list(ctx: &AppContext, quadrant: Option<&str>, json: bool) -> Result<()> {
    let display_title = |stored: &str| -> String {
        DEFAULT_QUADRANT_NAMES
            .iter()
            .position(|name| *name == stored)
            .map(|i| ctx.settings.quadrant_name(i).to_string())
            .unwrap_or_else(|| stored.to_string())
    };

    let quadrants: Vec<String> = match quadrant {
        Some(arg) => vec![resolve_quadrant(arg, &ctx.settings).unwrap_or_else(|e| user_error(&e))],
        None => {
            // The four matrix quadrants first, then any other values found in the store
            let mut all: Vec<String> = DEFAULT_QUADRANT_NAMES.iter().map(|q| q.to_string()).collect();
            for extra in ctx.store.quadrants() {
                if !all.contains(&extra) {
                    all.push(extra);
                }
            }
            all
        }
    };

    let sections: Vec<QuadrantSection> = quadrants
        .iter()
        .map(|q| QuadrantSection {
            title: display_title(q),
            items: ctx.store.get_by_quadrant(q),
        })
        .collect();

    if json {
        let value: Vec<serde_json::Value> = quadrants
            .iter()
            .zip(&sections)
            .map(|(stored, section)| {
                serde_json::json!({
                    "quadrant": stored,
                    "title": section.title,
                    "tasks": section.items.iter().map(|item| serde_json::json!({
                        "id": item.id,
                        "description": item.description,
                        "done": item.done,
                    })).collect::<Vec<_>>(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", format_matrix(&sections, get_terminal_width(), is_tty()));
    }
    Ok(())
}

fn handle_status(ctx: &AppContext, id: &str, done: bool) -> Result<()> {
    let id = resolve_task_id(ctx, id)?;
    if !ctx.store.update_status(&id, done) {
        internal_error(&format!("Failed to update task {}", id));
    }
    if done {
        println!("Completed task {}", short_id(&id));
    } else {
        println!("Reopened task {}", short_id(&id));
    }
    Ok(())
}

fn handle_edit(ctx: &AppContext, id: &str, description: &str) -> Result<()> {
    if let Err(e) = validate_non_empty(description, "Description") {
        user_error(&e);
    }
    let id = resolve_task_id(ctx, id)?;
    if !ctx.store.update_description(&id, description) {
        internal_error(&format!("Failed to update task {}", id));
    }
    println!("Updated task {}", short_id(&id));
    Ok(())
}

fn handle_move(ctx: &AppContext, id: &str, quadrant: &str) -> Result<()> {
    let id = resolve_task_id(ctx, id)?;
    let quadrant = resolve_quadrant(quadrant, &ctx.settings).unwrap_or_else(|e| user_error(&e));
    if !ctx.store.move_task(&id, &quadrant) {
        internal_error(&format!("Failed to move task {}", id));
    }
    println!("Moved task {} to '{}'", short_id(&id), quadrant);
    Ok(())
}

fn handle_delete(ctx: &AppContext, id: &str) -> Result<()> {
    let id = resolve_task_id(ctx, id)?;
    if !ctx.store.delete(&id) {
        internal_error(&format!("Failed to delete task {}", id));
    }
    println!("Deleted task {}", short_id(&id));
    Ok(())
}

fn handle_stats(ctx: &AppContext, json: bool) -> Result<()> {
    let stats = ctx.store.get_statistics();
    if json {
        let value = serde_json::json!({
            "per_quadrant": stats.per_quadrant,
            "overview": stats.overview,
            "distribution": stats.distribution(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", format_statistics(&stats, is_tty()));
    }
    Ok(())
}

fn handle_export(ctx: &AppContext, format: Format, output: Option<&std::path::Path>) -> Result<()> {
    let exchange = ctx.exchange();
    let path = match format {
        Format::Json => exchange.export_json(output),
        Format::Csv => exchange.export_csv(output),
    }
    .context("Failed to export tasks")?;
    println!("Tasks exported to: {}", path.display());
    Ok(())
}

fn handle_import(ctx: &AppContext, format: Format, path: &std::path::Path) -> Result<()> {
    let exchange = ctx.exchange();
    let result = match format {
        Format::Json => exchange.import_json(path),
        Format::Csv => exchange.import_csv(path),
    };
    match result {
        Ok(summary) => {
            println!("{}", summary);
            Ok(())
        }
        Err(e) => user_error(&e.to_string()),
    }
}

fn handle_settings(ctx: &mut AppContext, subcommand: &SettingsCommands) -> Result<()> {
    match subcommand {
        SettingsCommands::Show { json } => {
            if *json {
                println!("{}", serde_json::to_string_pretty(&ctx.settings)?);
            } else {
                println!("{}", format_settings(&ctx.settings));
            }
        }
        SettingsCommands::Set { background_color, text_color, opacity, theme } => {
            if background_color.is_none() && text_color.is_none() && opacity.is_none() && theme.is_none() {
                user_error("Nothing to change. Use --background-color, --text-color, --opacity or --theme.");
            }
            let mut settings = ctx.settings.clone();
            for (value, target, field) in [
                (background_color, &mut settings.appearance.background_color, "background color"),
                (text_color, &mut settings.appearance.text_color, "text color"),
            ] {
                if let Some(color) = value {
                    if parse_hex_color(color).is_none() {
                        user_error(&format!("Invalid {}: '{}'. Use the form #RRGGBB.", field, color));
                    }
                    *target = color.to_uppercase();
                }
            }
            if let Some(opacity) = opacity {
                settings.appearance.opacity = validate_opacity(opacity).unwrap_or_else(|e| user_error(&e));
            }
            if let Some(theme) = theme {
                if let Err(e) = validate_non_empty(theme, "Theme") {
                    user_error(&e);
                }
                settings.theme = theme.clone();
            }
            save_settings(ctx, settings)?;
            println!("Settings saved");
        }
        SettingsCommands::Rename { index, name } => {
            let idx = validate_quadrant_index(index).unwrap_or_else(|e| user_error(&e));
            let name = name.join(" ");
            if let Err(e) = validate_non_empty(&name, "Quadrant name") {
                user_error(&e);
            }
            let mut settings = ctx.settings.clone();
            // Repair short name lists from older files before indexing
            while settings.quadrants.names.len() < DEFAULT_QUADRANT_NAMES.len() {
                let next = settings.quadrants.names.len();
                settings.quadrants.names.push(DEFAULT_QUADRANT_NAMES[next].to_string());
            }
            settings.quadrants.names[idx - 1] = name.clone();
            save_settings(ctx, settings)?;
            println!("Renamed quadrant {} to '{}'", idx, name);
        }
        SettingsCommands::Reset => {
            ctx.settings = ctx.settings_store.reset()?;
            println!("Settings reset to defaults");
        }
    }
    Ok(())
}

fn save_settings(ctx: &mut AppContext, settings: Settings) -> Result<()> {
    if let Err(e) = settings.validate() {
        user_error(&e);
    }
    ctx.settings_store.save(&settings)?;
    ctx.settings = settings;
    Ok(())
}
