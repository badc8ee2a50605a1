use clap::Parser;
use color_eyre::Result;
use notepad::cli::{self, Cli, Commands};
use notepad::models::MenuState;
use notepad::{Config, NoteStore, Profile, SqliteStorage, SystemClock, logging, utils};

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // --dev keeps config and data apart from the real ones
    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };

    let config = match &cli.config {
        Some(path) => Config::load_from_path(path, profile)?,
        None => Config::load_with_profile(profile)?,
    };

    let storage_path = config.get_storage_path();

    // Running without logs is fine
    let log_dir = utils::get_data_dir(profile)
        .or_else(|| storage_path.parent().map(|p| p.to_path_buf()));
    if let Some(dir) = log_dir {
        if let Err(e) = logging::init_logging(&config.log_level, &dir) {
            eprintln!("Warning: logging disabled: {}", e);
        }
    }

    let storage = SqliteStorage::open(&storage_path)?;
    let mut store = NoteStore::load(storage, SystemClock)?;

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            let app = notepad::tui::App::new(config, store);
            notepad::tui::run_event_loop(app)?;
        }
        Commands::Add { title, content, tags } => {
            cli::handle_add(title, content, tags, &mut store)?;
        }
        Commands::List { search, sort, favorites, json } => {
            let menu = MenuState {
                search: search.unwrap_or_default(),
                sort_by: sort,
                show_favorites_only: favorites,
                ..MenuState::default()
            };
            cli::handle_list(&menu, json, &store)?;
        }
        Commands::Favorite { id } => {
            cli::handle_favorite(&id, &mut store)?;
        }
        Commands::Delete { id, yes } => {
            cli::handle_delete(&id, yes, &mut store)?;
        }
        Commands::Export { output } => {
            cli::handle_export(&output, &store)?;
        }
        Commands::Import { path } => {
            cli::handle_import(&path, &mut store)?;
        }
        Commands::Shortcuts => {
            cli::handle_shortcuts(&config);
        }
    }

    Ok(())
}
