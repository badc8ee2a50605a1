use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::style::{Style, Modifier};
use ratatui::Frame;
use ratatui::layout::{Rect, Layout, Constraint, Margin};
use ratatui::text::{Line, Span};
use crate::models::MenuState;
use crate::Config;
use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::editor::Editor;
use crate::utils::format_key_binding_for_display as key;

pub const APP_TITLE: &str = "Notepad";

/// One line: app title on the left, the "New Note" action on the right
pub fn render_header(f: &mut Frame, area: Rect, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);

    let title = Paragraph::new(Line::from(Span::styled(
        APP_TITLE,
        Style::default().fg(fg_color).add_modifier(Modifier::BOLD),
    )));
    f.render_widget(title, area);

    let action = Line::from(vec![
        Span::styled(format!("{} ", key(&config.key_bindings.new_note)), Style::default().fg(highlight_bg)),
        Span::styled("New Note", Style::default().fg(fg_color)),
    ])
    .right_aligned();
    f.render_widget(Paragraph::new(action), area);
}

/// Search input, sort selector, favorites toggle and the file/help actions
pub fn render_toolbar(
    f: &mut Frame,
    area: Rect,
    search: &mut Editor,
    menu: &MenuState,
    search_focused: bool,
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let favorite_color = parse_color(&active_theme.favorite);
    let kb = &config.key_bindings;
    let normal = Style::default().fg(fg_color);

    let [search_area, sort_area, favorites_area, actions_area] = Layout::horizontal([
        Constraint::Min(16),
        Constraint::Length(18),
        Constraint::Length(18),
        Constraint::Length(28),
    ])
    .areas(area);

    // Search
    let search_inner = search_area.inner(Margin::new(1, 1));
    search.update_horizontal_scroll(search_inner.width as usize);
    let search_line = if search.is_empty() && !search_focused {
        Line::from(Span::styled("Search notes...", normal.add_modifier(Modifier::DIM)))
    } else {
        let (_, visible) = search.get_visible_lines(1, search_inner.width as usize);
        Line::from(visible.into_iter().next().unwrap_or_default())
    };
    let search_border = if search_focused { Style::default().fg(highlight_bg) } else { normal };
    f.render_widget(
        Paragraph::new(search_line).style(normal).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{}: Search", key(&kb.focus_search)))
                .border_style(search_border),
        ),
        search_area,
    );
    if search_focused {
        if let Some(pos) = search.get_cursor_screen_pos(search_area) {
            f.set_cursor_position(pos);
        }
    }

    // Sort
    f.render_widget(
        Paragraph::new(menu.sort_by.label()).style(normal).block(
            Block::default().borders(Borders::ALL).title(format!("{}: Sort", key(&kb.cycle_sort))),
        ),
        sort_area,
    );

    // Favorites-only
    let favorites_line = if menu.show_favorites_only {
        Line::from(Span::styled("★ Favorites", Style::default().fg(favorite_color)))
    } else {
        Line::from(Span::styled("☆ All notes", normal))
    };
    f.render_widget(
        Paragraph::new(favorites_line).block(
            Block::default().borders(Borders::ALL).title(format!("{}: Show", key(&kb.favorites_only))),
        ),
        favorites_area,
    );

    // Actions
    let actions = format!(
        "{} Export  {} Import  {} Help",
        key(&kb.export),
        key(&kb.import),
        key(&kb.help),
    );
    f.render_widget(
        Paragraph::new(actions).style(normal).block(Block::default().borders(Borders::ALL).title("Actions")),
        actions_area,
    );
}
