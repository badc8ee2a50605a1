use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::Config;
use crate::models::{MenuState, Note, NoteChanges, SortKey};
use crate::pipeline;
use crate::storage::Storage;
use crate::store::{Clock, NoteStore, StoreError};
use crate::transfer::{self, ExportError, ImportError};

#[derive(Parser)]
#[command(name = "notepad")]
#[command(about = "Notepad - create, tag, favorite, search and sort notes in the terminal")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Use development mode (uses separate dev config/storage)
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch interactive TUI (default if no subcommand)
    Tui,
    /// Create a new note
    #[command(alias = "new")]
    Add {
        /// Note title
        #[arg(long)]
        title: Option<String>,
        /// Note content
        #[arg(long)]
        content: Option<String>,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },
    /// List notes, filtered and sorted like the TUI sidebar
    List {
        /// Case-insensitive search over title, content and tags
        #[arg(short, long)]
        search: Option<String>,
        /// Sort order
        #[arg(long, value_enum, default_value_t = SortKey::Updated)]
        sort: SortKey,
        /// Only show favorites
        #[arg(long)]
        favorites: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Toggle the favorite flag of a note
    Favorite {
        /// Note id
        id: String,
    },
    /// Delete a note (asks for confirmation)
    Delete {
        /// Note id
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Export all notes as pretty-printed JSON
    Export {
        /// Output file, or "-" for stdout
        #[arg(short, long, default_value = transfer::EXPORT_FILE_NAME)]
        output: PathBuf,
    },
    /// Append the notes of a JSON export file
    Import {
        /// File to import
        path: PathBuf,
    },
    /// Print the keyboard shortcuts
    Shortcuts,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Store error: {0}")]
    StoreError(#[from] StoreError),
    #[error("Export failed: {0}")]
    ExportError(#[from] ExportError),
    #[error("Import failed: {0}")]
    ImportError(#[from] ImportError),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

/// Handle the add command
pub fn handle_add<S: Storage, C: Clock>(
    title: Option<String>,
    content: Option<String>,
    tags: Option<String>,
    store: &mut NoteStore<S, C>,
) -> Result<String, CliError> {
    let id = store.create_note()?;

    let changes = NoteChanges {
        title,
        content,
        ..NoteChanges::default()
    };
    if !changes.is_empty() {
        store.update_active_note(changes)?;
    }
    for tag in parse_tag_list(tags.as_deref()) {
        store.add_tag(&tag)?;
    }

    println!("Note created successfully (ID: {})", id);
    Ok(id)
}

/// Handle the list command
pub fn handle_list<S: Storage, C: Clock>(
    menu: &MenuState,
    json: bool,
    store: &NoteStore<S, C>,
) -> Result<(), CliError> {
    let notes = pipeline::filter_and_sort(store.notes(), menu);

    if json {
        let owned: Vec<Note> = notes.into_iter().cloned().collect();
        println!("{}", transfer::export_json(&owned).map_err(StoreError::from)?);
        return Ok(());
    }

    if notes.is_empty() {
        println!("No notes found");
        return Ok(());
    }
    for note in notes {
        println!("{}", format_list_row(note));
    }
    Ok(())
}

/// Handle the favorite command
pub fn handle_favorite<S: Storage, C: Clock>(id: &str, store: &mut NoteStore<S, C>) -> Result<(), CliError> {
    let favorite = store.toggle_favorite(id)?;
    if favorite {
        println!("Note {} marked as favorite", id);
    } else {
        println!("Note {} removed from favorites", id);
    }
    Ok(())
}

/// Handle the delete command; `--yes` answers the confirmation up front
pub fn handle_delete<S: Storage, C: Clock>(id: &str, yes: bool, store: &mut NoteStore<S, C>) -> Result<(), CliError> {
    let deleted = if yes {
        store.delete_note(id, &MenuState::default(), &mut |_: &str| true)?
    } else {
        store.delete_note(id, &MenuState::default(), &mut prompt_on_stdin)?
    };

    if deleted {
        println!("Note {} deleted", id);
    } else {
        println!("Delete cancelled");
    }
    Ok(())
}

/// Handle the export command
pub fn handle_export<S: Storage, C: Clock>(output: &Path, store: &NoteStore<S, C>) -> Result<(), CliError> {
    if output.as_os_str() == "-" {
        println!("{}", store.export_all()?);
        return Ok(());
    }

    transfer::export_to_file(output, store.notes())?;
    println!("Exported {} notes to {}", store.len(), output.display());
    Ok(())
}

/// Handle the import command
pub fn handle_import<S: Storage, C: Clock>(path: &Path, store: &mut NoteStore<S, C>) -> Result<usize, CliError> {
    let text = transfer::read_import_file(path)?;
    let count = store.import_notes(&text)?;
    println!("Imported {} notes from {}", count, path.display());
    Ok(count)
}

/// Handle the shortcuts command
pub fn handle_shortcuts(config: &Config) {
    print!("{}", crate::tui::widgets::help::build_help_text(config));
}

/// One line per note: star, title, date, tags and id
pub fn format_list_row(note: &Note) -> String {
    let star = if note.favorite { "★" } else { " " };
    let mut row = format!("{} {}  ({})", star, note.display_title(), note.updated_date_label());
    if !note.tags.is_empty() {
        row.push_str("  ");
        row.push_str(&crate::tui::widgets::tags::format_tags_brackets(&note.tags));
    }
    row.push_str("  ");
    row.push_str(&note.id);
    row
}

/// Split a comma-separated tag option into trimmed, non-empty tags
pub fn parse_tag_list(tags: Option<&str>) -> Vec<String> {
    tags.map(|raw| {
        raw.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

fn prompt_on_stdin(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
