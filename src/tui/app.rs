use crate::Config;
use crate::models::{MenuState, Note, NoteChanges};
use crate::pipeline;
use crate::storage::{SqliteStorage, Storage};
use crate::store::{Clock, NoteStore, StoreError, SystemClock};
use crate::transfer;
use crate::tui::widgets::editor::Editor;
use crate::utils;
use ratatui::widgets::ListState;
use std::time::{Duration, Instant};

/// How long a status-bar message stays up
pub const STATUS_MESSAGE_TIMEOUT: Duration = Duration::from_secs(3);
pub const SAVE_STATUS: &str = "Notes are saved automatically";

/// Which input receives plain keystrokes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Search,
    Title,
    Tags,
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Help,
    ConfirmDelete,
    ImportPrompt,
    Message,
}

pub struct App<S: Storage = SqliteStorage, C: Clock = SystemClock> {
    pub config: Config,
    pub store: NoteStore<S, C>,
    pub menu: MenuState,
    pub focus: Focus,
    pub mode: Mode,
    pub list_state: ListState,
    pub title_editor: Editor,
    pub tag_input: Editor,
    pub content_editor: Editor,
    pub search_editor: Editor,
    pub import_input: Editor,
    /// Chip marked for removal in the tags row
    pub selected_tag: Option<usize>,
    pub status_message: Option<String>,
    status_message_time: Option<Instant>,
    pub delete_pending: Option<String>,
    pub delete_modal_selection: usize, // 0 = Delete, 1 = Cancel
    pub message: Option<String>,
    /// Note the title/content editors were loaded from
    editing_id: Option<String>,
}

impl<S: Storage, C: Clock> App<S, C> {
    pub fn new(config: Config, store: NoteStore<S, C>) -> Self {
        let mut app = Self {
            config,
            store,
            menu: MenuState::default(),
            focus: Focus::List,
            mode: Mode::Normal,
            list_state: ListState::default(),
            title_editor: Editor::new(),
            tag_input: Editor::new(),
            content_editor: Editor::new(),
            search_editor: Editor::new(),
            import_input: Editor::new(),
            selected_tag: None,
            status_message: None,
            status_message_time: None,
            delete_pending: None,
            delete_modal_selection: 1,
            message: None,
            editing_id: None,
        };
        app.after_store_change();
        app
    }

    /// Notes in display order under the current menu state
    pub fn display_notes(&self) -> Vec<&Note> {
        pipeline::filter_and_sort(self.store.notes(), &self.menu)
    }

    /// Re-sync the editors and the list highlight with the store
    pub fn after_store_change(&mut self) {
        self.sync_editors();
        self.sync_list_selection();
    }

    /// Highlight the active note if it is on screen
    pub fn sync_list_selection(&mut self) {
        let index = self
            .store
            .active_id()
            .and_then(|id| self.display_notes().iter().position(|note| note.id == id));
        self.list_state.select(index);
    }

    /// Reload the field editors when the active note changed under them
    fn sync_editors(&mut self) {
        let active = self.store.active_id().map(str::to_string);
        if active == self.editing_id {
            return;
        }

        match self.store.active_note() {
            Some(note) => {
                self.title_editor = Editor::from_string(&note.title);
                self.content_editor = Editor::from_string(&note.content);
            }
            None => {
                self.title_editor.clear();
                self.content_editor.clear();
                if matches!(self.focus, Focus::Title | Focus::Tags | Focus::Content) {
                    self.focus = Focus::List;
                }
            }
        }
        self.tag_input.clear();
        self.selected_tag = None;
        self.editing_id = active;
    }

    pub fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_message_time = Some(Instant::now());
    }

    /// Clear the status message once it has been up long enough
    pub fn check_status_message_timeout(&mut self) {
        if let Some(time) = self.status_message_time {
            if time.elapsed() >= STATUS_MESSAGE_TIMEOUT {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }

    fn report_error(&mut self, context: &str, err: StoreError) {
        tracing::error!(error = %err, "{}", context);
        self.set_status_message(format!("{}: {}", context, err));
    }

    pub fn show_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
        self.mode = Mode::Message;
    }

    pub fn dismiss_message(&mut self) {
        self.message = None;
        self.mode = Mode::Normal;
    }

    pub fn toggle_help(&mut self) {
        self.mode = if self.mode == Mode::Help { Mode::Normal } else { Mode::Help };
    }

    pub fn create_note(&mut self) {
        match self.store.create_note() {
            Ok(_) => {
                self.focus = Focus::List;
                self.after_store_change();
            }
            Err(e) => self.report_error("Failed to create note", e),
        }
    }

    /// Move the highlight by one row; the highlighted note becomes active
    pub fn move_selection(&mut self, down: bool) {
        let ids = pipeline::display_ids(self.store.notes(), &self.menu);
        if ids.is_empty() {
            return;
        }
        let current = self
            .store
            .active_id()
            .and_then(|id| ids.iter().position(|candidate| candidate == id));
        let next = match current {
            Some(i) if down => (i + 1).min(ids.len() - 1),
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        if let Err(e) = self.store.select(&ids[next]) {
            self.report_error("Failed to select note", e);
        }
        self.after_store_change();
    }

    pub fn focus_search(&mut self) {
        self.focus = Focus::Search;
    }

    /// Put the cursor in an editor field. Without an active note the list keeps focus.
    pub fn focus_field(&mut self, field: Focus) {
        if matches!(field, Focus::Title | Focus::Tags | Focus::Content) && self.store.active_note().is_none() {
            self.focus = Focus::List;
            return;
        }
        if field != Focus::Tags {
            self.selected_tag = None;
        }
        self.focus = field;
    }

    /// Tab order: Title → Tags → Content → List
    pub fn focus_next(&mut self) {
        let next = match self.focus {
            Focus::Title => Focus::Tags,
            Focus::Tags => Focus::Content,
            Focus::Content | Focus::Search => Focus::List,
            Focus::List => Focus::Title,
        };
        self.focus_field(next);
    }

    pub fn focus_prev(&mut self) {
        let prev = match self.focus {
            Focus::Title | Focus::Search => Focus::List,
            Focus::Tags => Focus::Title,
            Focus::Content => Focus::Tags,
            Focus::List => Focus::Content,
        };
        self.focus_field(prev);
    }

    /// Push the title editor's text into the active note if it changed
    pub fn commit_title(&mut self) {
        let title = self.title_editor.text();
        if self.store.active_note().is_some_and(|note| note.title != title) {
            if let Err(e) = self.store.update_active_note(NoteChanges::title(title)) {
                self.report_error("Failed to save title", e);
            }
            self.sync_list_selection();
        }
    }

    pub fn commit_content(&mut self) {
        let content = self.content_editor.text();
        if self.store.active_note().is_some_and(|note| note.content != content) {
            if let Err(e) = self.store.update_active_note(NoteChanges::content(content)) {
                self.report_error("Failed to save content", e);
            }
            self.sync_list_selection();
        }
    }

    pub fn apply_search(&mut self) {
        self.menu.search = self.search_editor.text();
        self.sync_list_selection();
    }

    /// Add the tag input as a tag. The input is cleared either way.
    pub fn submit_tag(&mut self) {
        let input = self.tag_input.text();
        self.tag_input.clear();
        match self.store.add_tag(&input) {
            Ok(true) => {}
            Ok(false) if !input.trim().is_empty() => {
                self.set_status_message(format!("Tag \"{}\" already added", input.trim()));
            }
            Ok(false) => {}
            Err(e) => self.report_error("Failed to add tag", e),
        }
        self.sync_list_selection();
    }

    /// Step the chip selection left or right, wrapping off the right end
    pub fn select_tag(&mut self, right: bool) {
        let count = self.store.active_note().map(|note| note.tags.len()).unwrap_or(0);
        if count == 0 {
            self.selected_tag = None;
            return;
        }
        self.selected_tag = match (self.selected_tag, right) {
            (None, false) => Some(count - 1),
            (None, true) => None,
            (Some(i), false) => Some(i.saturating_sub(1)),
            (Some(i), true) if i + 1 < count => Some(i + 1),
            (Some(_), true) => None,
        };
    }

    pub fn remove_selected_tag(&mut self) {
        let Some(index) = self.selected_tag.take() else {
            return;
        };
        let Some(tag) = self.store.active_note().and_then(|note| note.tags.get(index).cloned()) else {
            return;
        };
        if let Err(e) = self.store.remove_tag(&tag) {
            self.report_error("Failed to remove tag", e);
        }
        self.sync_list_selection();
    }

    pub fn toggle_favorite_active(&mut self) {
        let Some(id) = self.store.active_id().map(str::to_string) else {
            self.set_status_message("No note selected");
            return;
        };
        if let Err(e) = self.store.toggle_favorite(&id) {
            self.report_error("Failed to toggle favorite", e);
        }
        self.sync_list_selection();
    }

    pub fn cycle_sort(&mut self) {
        self.menu.sort_by = self.menu.sort_by.next();
        self.set_status_message(format!("Sorted by {}", self.menu.sort_by.label()));
        self.sync_list_selection();
    }

    pub fn toggle_favorites_only(&mut self) {
        self.menu.show_favorites_only = !self.menu.show_favorites_only;
        self.sync_list_selection();
    }

    pub fn toggle_sidebar(&mut self) {
        self.menu.is_open = !self.menu.is_open;
    }

    /// Open the confirmation modal for the active note, if the list shows it
    pub fn request_delete(&mut self) {
        let visible = self
            .store
            .active_id()
            .filter(|id| self.display_notes().iter().any(|note| note.id == *id))
            .map(str::to_string);
        match visible {
            Some(id) => {
                self.delete_pending = Some(id);
                self.delete_modal_selection = 1;
                self.mode = Mode::ConfirmDelete;
            }
            None => self.set_status_message("No note selected"),
        }
    }

    /// Close the modal; the store's delete gate gets `answer`
    pub fn resolve_delete(&mut self, answer: bool) {
        self.mode = Mode::Normal;
        let Some(id) = self.delete_pending.take() else {
            return;
        };
        match self.store.delete_note(&id, &self.menu, &mut |_: &str| answer) {
            Ok(true) => self.set_status_message("Note deleted"),
            Ok(false) => {}
            Err(e) => self.report_error("Failed to delete note", e),
        }
        self.after_store_change();
    }

    /// Write notes.json into the configured export directory
    pub fn export_notes(&mut self) {
        let dir = self.config.get_export_dir();
        match transfer::export_to_dir(&dir, self.store.notes()) {
            Ok(path) => {
                tracing::info!(path = %path.display(), count = self.store.len(), "notes exported");
                self.set_status_message(format!("Exported {} notes to {}", self.store.len(), path.display()));
            }
            Err(e) => {
                tracing::error!(error = %e, "export failed");
                self.show_message(format!("Export failed: {}", e));
            }
        }
    }

    pub fn open_import_prompt(&mut self) {
        self.import_input.clear();
        self.mode = Mode::ImportPrompt;
    }

    /// Import the file named in the prompt. Failures leave the store as it
    /// was and pop up a message.
    pub fn submit_import(&mut self) {
        self.mode = Mode::Normal;
        let raw = self.import_input.text();
        let raw = raw.trim();
        if raw.is_empty() {
            return;
        }
        let path = utils::expand_path(raw);

        let result = transfer::read_import_file(&path)
            .map_err(StoreError::from)
            .and_then(|text| self.store.import_notes(&text));
        match result {
            Ok(count) => self.set_status_message(format!("Imported {} notes", count)),
            Err(e) => self.show_message(format!("Import failed: {}", e)),
        }
        self.after_store_change();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SortKey;
    use crate::storage::MemoryStorage;
    use pretty_assertions::assert_eq;

    fn app() -> App<MemoryStorage, SystemClock> {
        let store = NoteStore::load(MemoryStorage::new(), SystemClock).unwrap();
        App::new(Config::default(), store)
    }

    fn type_into(editor: &mut Editor, text: &str) {
        for ch in text.chars() {
            editor.insert_char(ch);
        }
    }

    #[test]
    fn starts_with_nothing_active() {
        let app = app();
        assert_eq!(app.focus, Focus::List);
        assert!(app.store.active_note().is_none());
        assert_eq!(app.list_state.selected(), None);
    }

    #[test]
    fn create_note_selects_it_in_the_list() {
        let mut app = app();
        app.focus_search();
        app.create_note();
        assert_eq!(app.focus, Focus::List);
        assert_eq!(app.list_state.selected(), Some(0));
        assert_eq!(app.title_editor.text(), "");
    }

    #[test]
    fn editor_fields_need_an_active_note() {
        let mut app = app();
        app.focus_field(Focus::Title);
        assert_eq!(app.focus, Focus::List);

        app.create_note();
        app.focus_next();
        assert_eq!(app.focus, Focus::Title);
        app.focus_next();
        app.focus_next();
        assert_eq!(app.focus, Focus::Content);
        app.focus_next();
        assert_eq!(app.focus, Focus::List);
    }

    #[test]
    fn title_edits_are_committed() {
        let mut app = app();
        app.create_note();
        type_into(&mut app.title_editor, "Groceries");
        app.commit_title();
        assert_eq!(app.store.active_note().unwrap().title, "Groceries");
    }

    #[test]
    fn duplicate_tag_clears_input_and_reports() {
        let mut app = app();
        app.create_note();
        type_into(&mut app.tag_input, "home ");
        app.submit_tag();
        type_into(&mut app.tag_input, "home");
        app.submit_tag();
        assert_eq!(app.store.active_note().unwrap().tags, vec!["home"]);
        assert!(app.tag_input.is_empty());
        assert!(app.status_message.as_deref().unwrap().contains("already"));
    }

    #[test]
    fn chip_selection_removes_tag() {
        let mut app = app();
        app.create_note();
        for tag in ["a", "b", "c"] {
            type_into(&mut app.tag_input, tag);
            app.submit_tag();
        }
        app.select_tag(false);
        app.select_tag(false);
        assert_eq!(app.selected_tag, Some(1));
        app.remove_selected_tag();
        assert_eq!(app.store.active_note().unwrap().tags, vec!["a", "c"]);
        assert_eq!(app.selected_tag, None);
    }

    #[test]
    fn cancelled_delete_keeps_note() {
        let mut app = app();
        app.create_note();
        app.request_delete();
        assert_eq!(app.mode, Mode::ConfirmDelete);
        app.resolve_delete(false);
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.store.len(), 1);
    }

    #[test]
    fn confirmed_delete_moves_to_next_note() {
        let mut app = app();
        app.create_note();
        let first = app.store.active_id().unwrap().to_string();
        app.create_note();
        app.request_delete();
        app.resolve_delete(true);
        assert_eq!(app.store.active_id(), Some(first.as_str()));
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[test]
    fn search_hides_active_note_from_list() {
        let mut app = app();
        app.create_note();
        type_into(&mut app.search_editor, "zzz");
        app.apply_search();
        assert!(app.display_notes().is_empty());
        assert_eq!(app.list_state.selected(), None);
        assert!(app.store.active_note().is_some());
    }

    #[test]
    fn hidden_active_note_is_not_offered_for_delete() {
        let mut app = app();
        app.create_note();
        type_into(&mut app.search_editor, "zzz");
        app.apply_search();
        app.request_delete();
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.delete_pending, None);
        assert_eq!(app.status_message.as_deref(), Some("No note selected"));
        assert_eq!(app.store.len(), 1);
    }

    #[test]
    fn selection_moves_through_display_order() {
        let mut app = app();
        app.create_note();
        app.create_note();
        app.menu.sort_by = SortKey::Title;
        app.move_selection(true);
        assert_eq!(app.list_state.selected(), Some(1));
        app.move_selection(true);
        assert_eq!(app.list_state.selected(), Some(1));
        app.move_selection(false);
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[test]
    fn failed_import_shows_message_and_keeps_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"a":1}"#).unwrap();

        let mut app = app();
        app.open_import_prompt();
        type_into(&mut app.import_input, path.to_str().unwrap());
        app.submit_import();
        assert_eq!(app.mode, Mode::Message);
        assert!(app.message.as_deref().unwrap().starts_with("Import failed"));
        assert!(app.store.is_empty());
    }

    #[test]
    fn export_writes_into_export_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app();
        app.config.export_dir = dir.path().to_string_lossy().to_string();
        app.create_note();
        app.export_notes();
        assert!(dir.path().join(transfer::EXPORT_FILE_NAME).exists());
        assert!(app.status_message.as_deref().unwrap().starts_with("Exported 1 notes"));
    }
}
