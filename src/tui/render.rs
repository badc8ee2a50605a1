use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::widgets::{Block, Borders};
use ratatui::style::Style;
use crate::pipeline;
use crate::storage::Storage;
use crate::store::Clock;
use crate::tui::{App, Focus, Layout, Mode};
use crate::tui::widgets::{
    color::parse_color,
    confirm_delete::render_confirm_delete,
    help::render_help,
    note_editor::{render_note_editor, NoteEditorView},
    note_list::render_note_list,
    prompt::{render_import_prompt, render_message},
    status_bar::render_status_bar,
    toolbar::{render_header, render_toolbar, APP_TITLE},
};
use crate::utils::format_key_binding_for_display as key;

pub fn render<S: Storage, C: Clock>(f: &mut Frame, app: &mut App<S, C>, layout: &Layout) {
    let active_theme = app.config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let outer_block = Block::default()
        .borders(Borders::ALL)
        .title(APP_TITLE)
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(fg_color).bg(bg_color));
    f.render_widget(outer_block, f.area());

    // Popups own the cursor while they are up
    let editing = app.mode == Mode::Normal;

    render_header(f, layout.header_area, &app.config);
    render_toolbar(
        f,
        layout.toolbar_area,
        &mut app.search_editor,
        &app.menu,
        editing && app.focus == Focus::Search,
        &app.config,
    );

    if app.menu.is_open && layout.sidebar_area.width > 0 {
        let notes = pipeline::filter_and_sort(app.store.notes(), &app.menu);
        render_note_list(
            f,
            layout.sidebar_area,
            &notes,
            app.store.len(),
            &mut app.list_state,
            &app.config,
            app.focus == Focus::List,
        );
    }

    let view = NoteEditorView {
        note: app.store.active_note(),
        title: &mut app.title_editor,
        tag_input: &mut app.tag_input,
        content: &mut app.content_editor,
        focus: app.focus,
        selected_tag: app.selected_tag,
        show_cursor: editing,
    };
    render_note_editor(f, layout.main_area, view, &app.config);

    match app.mode {
        Mode::Help => render_help(f, f.area(), &app.config),
        Mode::ConfirmDelete => {
            let title = app
                .delete_pending
                .as_deref()
                .and_then(|id| app.store.get(id))
                .map(|note| note.display_title().to_string())
                .unwrap_or_default();
            render_confirm_delete(f, f.area(), &title, app.delete_modal_selection, &app.config);
        }
        Mode::ImportPrompt => render_import_prompt(f, f.area(), &mut app.import_input, &app.config),
        Mode::Message => render_message(f, f.area(), app.message.as_deref().unwrap_or_default(), &app.config),
        Mode::Normal => {}
    }

    let key_hints = get_key_hints(app);
    render_status_bar(f, layout.status_area, app.status_message.as_deref(), &key_hints, &app.config);
}

fn get_key_hints<S: Storage, C: Clock>(app: &App<S, C>) -> Vec<String> {
    let kb = &app.config.key_bindings;
    match app.mode {
        Mode::Help => vec![format!("Esc or {}: Close help", key(&kb.help))],
        Mode::ConfirmDelete => vec!["↑/↓: Choose".to_string(), "Enter: Confirm".to_string(), "Esc: Cancel".to_string()],
        Mode::ImportPrompt => vec!["Enter: Import".to_string(), "Esc: Cancel".to_string()],
        Mode::Message => vec!["Enter: Close".to_string()],
        Mode::Normal => match app.focus {
            Focus::List => vec![
                format!("{}: Quit", key(&kb.quit)),
                format!("{}: New", key(&kb.new_note)),
                format!("{}: Edit", key(&kb.select)),
                format!("{}: Favorite", key(&kb.toggle_favorite)),
                format!("{}: Delete", key(&kb.delete)),
                format!("{}: Search", key(&kb.focus_search)),
                format!("{}: Sort", key(&kb.cycle_sort)),
                format!("{}: Favorites only", key(&kb.favorites_only)),
                format!("{}: Sidebar", key(&kb.toggle_sidebar)),
                format!("{}: Help", key(&kb.help)),
            ],
            Focus::Search => vec!["Type to filter".to_string(), "Esc/Enter: Back to list".to_string()],
            Focus::Tags => vec![
                "Enter: Add tag".to_string(),
                "←/→: Pick tag".to_string(),
                "Del: Remove tag".to_string(),
                "Tab/Shift+Tab: Next/previous field".to_string(),
                "Esc: Back to list".to_string(),
            ],
            Focus::Title | Focus::Content => vec![
                "Tab/Shift+Tab: Next/previous field".to_string(),
                format!("{}: Undo", key("Ctrl+z")),
                "Esc: Back to list".to_string(),
                format!("{}: Help", key(&kb.help)),
            ],
        },
    }
}
