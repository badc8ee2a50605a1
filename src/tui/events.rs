use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, size as terminal_size};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::time::Duration;
use crate::storage::Storage;
use crate::store::Clock;
use crate::tui::app::{App, Focus, Mode, SAVE_STATUS};
use crate::tui::error::TuiError;
use crate::tui::layout::Layout;
use crate::tui::widgets::editor::Editor;
use crate::utils::{has_primary_modifier, matches_key_event, parse_key_binding};

const POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Restores the terminal on drop, so a panic never leaves it in raw mode
/// or on the alternate screen.
struct TerminalGuard {
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
}

impl TerminalGuard {
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut guard = Self {
            raw_mode_enabled: true,
            alternate_screen_enabled: false,
        };
        execute!(io::stdout(), EnterAlternateScreen)?;
        guard.alternate_screen_enabled = true;
        Ok(guard)
    }

    /// Restore explicitly on normal exit; drop then does nothing
    fn restore(&mut self) -> Result<(), TuiError> {
        if self.raw_mode_enabled {
            disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        if self.alternate_screen_enabled {
            execute!(io::stdout(), LeaveAlternateScreen)?;
            self.alternate_screen_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Errors are ignored, we are already cleaning up
        if self.raw_mode_enabled {
            let _ = disable_raw_mode();
        }
        if self.alternate_screen_enabled {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
}

pub fn run_event_loop<S: Storage, C: Clock>(mut app: App<S, C>) -> Result<(), TuiError> {
    // Check before entering the alternate screen so the error stays readable
    let (width, height) = terminal_size()?;
    if !Layout::fits(width, height) {
        return Err(TuiError::RenderError(format!(
            "Terminal size too small. Current: {}x{}, Minimum required: {}x{}. Please resize your terminal window.",
            width,
            height,
            Layout::MIN_WIDTH + 2,
            Layout::MIN_HEIGHT + 2
        )));
    }

    let mut guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    tracing::info!(notes = app.store.len(), "tui started");

    loop {
        app.check_status_message_timeout();

        terminal.draw(|f| {
            let layout = Layout::calculate(f.area(), app.config.sidebar_width_percent, app.menu.is_open);
            crate::tui::render::render(f, &mut app, &layout);
        })?;

        if event::poll(POLL_INTERVAL)? {
            // Only Press events; Windows also reports Release
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press && handle_key_event(&mut app, key_event)? {
                    break;
                }
            }
        }
    }

    guard.restore()?;
    tracing::info!("tui stopped");
    Ok(())
}

/// Does `key_event` trigger the configured binding string?
fn pressed(key_event: KeyEvent, binding: &str) -> Result<bool, TuiError> {
    let parsed = parse_key_binding(binding).map_err(TuiError::KeyBindingError)?;
    Ok(matches_key_event(key_event, &parsed))
}

/// Dispatch one key press. Returns `Ok(true)` when the app should quit.
pub fn handle_key_event<S: Storage, C: Clock>(app: &mut App<S, C>, key_event: KeyEvent) -> Result<bool, TuiError> {
    match app.mode {
        Mode::ConfirmDelete => return handle_delete_confirmation_modal(app, key_event),
        Mode::ImportPrompt => return handle_import_prompt(app, key_event),
        Mode::Message => {
            if matches!(key_event.code, KeyCode::Enter | KeyCode::Esc) {
                app.dismiss_message();
            }
            return Ok(false);
        }
        Mode::Help => return handle_help_mode(app, key_event),
        Mode::Normal => {}
    }

    if handle_global_key_bindings(app, key_event)? {
        return Ok(false);
    }

    match app.focus {
        Focus::List => handle_list_keys(app, key_event),
        Focus::Search => handle_search_keys(app, key_event),
        Focus::Title | Focus::Tags | Focus::Content => handle_field_keys(app, key_event),
    }
}

/// Bindings that work whatever has focus. Returns true when consumed.
fn handle_global_key_bindings<S: Storage, C: Clock>(app: &mut App<S, C>, key_event: KeyEvent) -> Result<bool, TuiError> {
    let kb = app.config.key_bindings.clone();

    if pressed(key_event, &kb.new_note)? {
        app.create_note();
    } else if pressed(key_event, &kb.focus_search)? {
        app.focus_search();
    } else if pressed(key_event, &kb.save)? {
        app.set_status_message(SAVE_STATUS);
    } else if pressed(key_event, &kb.help)? {
        app.toggle_help();
    } else {
        return Ok(false);
    }
    Ok(true)
}

fn handle_help_mode<S: Storage, C: Clock>(app: &mut App<S, C>, key_event: KeyEvent) -> Result<bool, TuiError> {
    if key_event.code == KeyCode::Esc || pressed(key_event, &app.config.key_bindings.help)? {
        app.toggle_help();
    }
    Ok(false)
}

fn handle_delete_confirmation_modal<S: Storage, C: Clock>(app: &mut App<S, C>, key_event: KeyEvent) -> Result<bool, TuiError> {
    match key_event.code {
        KeyCode::Up | KeyCode::Down | KeyCode::Tab | KeyCode::BackTab => {
            app.delete_modal_selection = 1 - app.delete_modal_selection.min(1);
        }
        KeyCode::Enter => {
            let answer = app.delete_modal_selection == 0;
            app.resolve_delete(answer);
        }
        KeyCode::Esc => app.resolve_delete(false),
        _ => {}
    }
    Ok(false)
}

fn handle_import_prompt<S: Storage, C: Clock>(app: &mut App<S, C>, key_event: KeyEvent) -> Result<bool, TuiError> {
    match key_event.code {
        KeyCode::Enter => app.submit_import(),
        KeyCode::Esc => app.mode = Mode::Normal,
        _ => {
            edit_single_line(&mut app.import_input, key_event);
        }
    }
    Ok(false)
}

fn handle_list_keys<S: Storage, C: Clock>(app: &mut App<S, C>, key_event: KeyEvent) -> Result<bool, TuiError> {
    let kb = app.config.key_bindings.clone();

    if pressed(key_event, &kb.quit)? {
        return Ok(true);
    }
    if key_event.code == KeyCode::Up || pressed(key_event, &kb.list_up)? {
        app.move_selection(false);
    } else if key_event.code == KeyCode::Down || pressed(key_event, &kb.list_down)? {
        app.move_selection(true);
    } else if pressed(key_event, &kb.select)? {
        app.focus_field(Focus::Title);
    } else if pressed(key_event, &kb.toggle_favorite)? {
        app.toggle_favorite_active();
    } else if pressed(key_event, &kb.delete)? {
        app.request_delete();
    } else if pressed(key_event, &kb.cycle_sort)? {
        app.cycle_sort();
    } else if pressed(key_event, &kb.favorites_only)? {
        app.toggle_favorites_only();
    } else if pressed(key_event, &kb.toggle_sidebar)? {
        app.toggle_sidebar();
    } else if pressed(key_event, &kb.export)? {
        app.export_notes();
    } else if pressed(key_event, &kb.import)? {
        app.open_import_prompt();
    } else if key_event.code == KeyCode::Tab {
        app.focus_next();
    } else if key_event.code == KeyCode::BackTab {
        app.focus_prev();
    }
    Ok(false)
}

fn handle_search_keys<S: Storage, C: Clock>(app: &mut App<S, C>, key_event: KeyEvent) -> Result<bool, TuiError> {
    match key_event.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Tab | KeyCode::Down => app.focus = Focus::List,
        _ => {
            if edit_single_line(&mut app.search_editor, key_event) {
                app.apply_search();
            }
        }
    }
    Ok(false)
}

fn handle_field_keys<S: Storage, C: Clock>(app: &mut App<S, C>, key_event: KeyEvent) -> Result<bool, TuiError> {
    match key_event.code {
        KeyCode::Esc => {
            app.focus_field(Focus::List);
            return Ok(false);
        }
        KeyCode::Tab => {
            app.focus_next();
            return Ok(false);
        }
        KeyCode::BackTab => {
            app.focus_prev();
            return Ok(false);
        }
        _ => {}
    }

    match app.focus {
        Focus::Title => {
            if key_event.code == KeyCode::Enter {
                app.focus_next();
            } else if edit_single_line(&mut app.title_editor, key_event) {
                app.commit_title();
            }
        }
        Focus::Tags => handle_tag_keys(app, key_event),
        Focus::Content => {
            if edit_multi_line(&mut app.content_editor, key_event) {
                app.commit_content();
            }
        }
        Focus::List | Focus::Search => {}
    }
    Ok(false)
}

/// Enter adds the typed tag. With an empty input, ←/→ walk the chips and
/// Delete or Backspace removes the marked one.
fn handle_tag_keys<S: Storage, C: Clock>(app: &mut App<S, C>, key_event: KeyEvent) {
    let input_empty = app.tag_input.is_empty();
    match key_event.code {
        KeyCode::Enter => app.submit_tag(),
        KeyCode::Left if input_empty => app.select_tag(false),
        KeyCode::Right if input_empty && app.selected_tag.is_some() => app.select_tag(true),
        KeyCode::Delete | KeyCode::Backspace if app.selected_tag.is_some() => app.remove_selected_tag(),
        _ => {
            app.selected_tag = None;
            edit_single_line(&mut app.tag_input, key_event);
        }
    }
}

/// Apply an editing key to a one-line input. Returns true if the text changed.
fn edit_single_line(editor: &mut Editor, key_event: KeyEvent) -> bool {
    match key_event.code {
        KeyCode::Enter | KeyCode::Up | KeyCode::Down => false,
        _ => edit_multi_line(editor, key_event),
    }
}

fn edit_multi_line(editor: &mut Editor, key_event: KeyEvent) -> bool {
    let primary = has_primary_modifier(key_event.modifiers);
    match key_event.code {
        KeyCode::Char('z') | KeyCode::Char('Z') if primary => editor.undo(),
        KeyCode::Char(_) if primary => false,
        KeyCode::Char(ch) => {
            editor.insert_char(ch);
            true
        }
        KeyCode::Enter => {
            editor.insert_newline();
            true
        }
        KeyCode::Backspace => {
            let before = (editor.cursor_line, editor.cursor_col);
            editor.delete_char();
            before != (editor.cursor_line, editor.cursor_col)
        }
        KeyCode::Left => {
            editor.move_cursor_left();
            false
        }
        KeyCode::Right => {
            editor.move_cursor_right();
            false
        }
        KeyCode::Up => {
            editor.move_cursor_up();
            false
        }
        KeyCode::Down => {
            editor.move_cursor_down();
            false
        }
        KeyCode::Home => {
            editor.move_cursor_home();
            false
        }
        KeyCode::End => {
            editor.move_cursor_end();
            false
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;
    use crate::storage::MemoryStorage;
    use crate::store::{NoteStore, SystemClock};
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    fn app() -> App<MemoryStorage, SystemClock> {
        let store = NoteStore::load(MemoryStorage::new(), SystemClock).unwrap();
        App::new(Config::default(), store)
    }

    fn press(app: &mut App<MemoryStorage, SystemClock>, code: KeyCode) -> bool {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE)).unwrap()
    }

    fn ctrl(app: &mut App<MemoryStorage, SystemClock>, ch: char) -> bool {
        handle_key_event(app, KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)).unwrap()
    }

    fn type_text(app: &mut App<MemoryStorage, SystemClock>, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    #[test]
    fn ctrl_n_creates_and_focuses_list() {
        let mut app = app();
        ctrl(&mut app, 'n');
        assert_eq!(app.store.len(), 1);
        assert_eq!(app.focus, Focus::List);
    }

    #[test]
    fn ctrl_s_is_a_no_op_with_status() {
        let mut app = app();
        ctrl(&mut app, 's');
        assert!(app.store.is_empty());
        assert_eq!(app.status_message.as_deref(), Some(SAVE_STATUS));
    }

    #[test]
    fn ctrl_f_then_typing_filters() {
        let mut app = app();
        ctrl(&mut app, 'n');
        ctrl(&mut app, 'f');
        assert_eq!(app.focus, Focus::Search);
        type_text(&mut app, "qx");
        assert_eq!(app.menu.search, "qx");
        assert!(app.display_notes().is_empty());
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.focus, Focus::List);
    }

    #[test]
    fn f1_toggles_help_and_blocks_other_keys() {
        let mut app = app();
        press(&mut app, KeyCode::F(1));
        assert_eq!(app.mode, Mode::Help);
        assert!(!press(&mut app, KeyCode::Char('q')));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn editing_flow_updates_note() {
        let mut app = app();
        ctrl(&mut app, 'n');
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.focus, Focus::Title);
        type_text(&mut app, "Trip");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "travel");
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "pack");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "go");

        let note = app.store.active_note().unwrap();
        assert_eq!(note.title, "Trip");
        assert_eq!(note.tags, vec!["travel"]);
        assert_eq!(note.content, "pack\ngo");

        // q types into the field instead of quitting
        assert!(!press(&mut app, KeyCode::Char('q')));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.focus, Focus::List);
    }

    #[test]
    fn list_keys_favorite_sort_and_quit() {
        let mut app = app();
        ctrl(&mut app, 'n');
        press(&mut app, KeyCode::Char(' '));
        assert!(app.store.active_note().unwrap().favorite);
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.menu.sort_by, crate::models::SortKey::Created);
        press(&mut app, KeyCode::Char('v'));
        assert!(app.menu.show_favorites_only);
        press(&mut app, KeyCode::Char('b'));
        assert!(!app.menu.is_open);
        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn delete_goes_through_modal() {
        let mut app = app();
        ctrl(&mut app, 'n');
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.mode, Mode::ConfirmDelete);
        // Default choice is Cancel
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.store.len(), 1);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Enter);
        assert!(app.store.is_empty());
        assert!(app.store.active_note().is_none());
    }

    #[test]
    fn undo_reverts_title_keystroke() {
        let mut app = app();
        ctrl(&mut app, 'n');
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "ab");
        ctrl(&mut app, 'z');
        assert_eq!(app.store.active_note().unwrap().title, "a");
    }
}
