use ratatui::widgets::{Block, Borders, Paragraph, Clear, Wrap};
use ratatui::style::{Style, Modifier};
use ratatui::Frame;
use ratatui::layout::{Rect, Alignment, Layout, Constraint, Margin};
use ratatui::text::Line;
use crate::Config;
use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::editor::Editor;
use crate::tui::widgets::popup_area;

/// Path input for importing a notes file
pub fn render_import_prompt(f: &mut Frame, area: Rect, input: &mut Editor, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let normal = Style::default().fg(fg_color).bg(bg_color);

    let popup_area = popup_area(area, 60, 30);
    f.render_widget(Clear, popup_area);
    let outer = Block::default()
        .borders(Borders::ALL)
        .title("Import Notes")
        .title_alignment(Alignment::Center)
        .style(normal);
    f.render_widget(outer, popup_area);

    let inner = popup_area.inner(Margin::new(1, 1));
    let [label_area, input_area, hint_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Min(0),
    ])
    .areas(inner);

    f.render_widget(Paragraph::new("Path to a JSON export:").style(normal), label_area);

    let input_width = input_area.width.saturating_sub(2) as usize;
    input.update_horizontal_scroll(input_width);
    let (_, visible) = input.get_visible_lines(1, input_width);
    f.render_widget(
        Paragraph::new(visible.into_iter().next().unwrap_or_default())
            .style(normal)
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(highlight_bg))),
        input_area,
    );
    if let Some(pos) = input.get_cursor_screen_pos(input_area) {
        f.set_cursor_position(pos);
    }

    f.render_widget(
        Paragraph::new("Enter: Import  Esc: Cancel").style(normal.add_modifier(Modifier::DIM)),
        hint_area,
    );
}

/// Blocking message popup, dismissed with Enter or Esc
pub fn render_message(f: &mut Frame, area: Rect, message: &str, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let normal = Style::default().fg(fg_color).bg(bg_color);

    let popup_area = popup_area(area, 50, 30);
    f.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from(message.to_string()),
        Line::from(""),
        Line::from("Press Enter to close").style(normal.add_modifier(Modifier::DIM)),
    ];
    let paragraph = Paragraph::new(lines)
        .block(Block::default()
            .borders(Borders::ALL)
            .title("Notice")
            .title_alignment(Alignment::Center)
            .style(normal))
        .style(normal)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center);

    f.render_widget(paragraph, popup_area);
}
