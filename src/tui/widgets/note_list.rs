use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, StatefulWidget, Scrollbar, ScrollbarState, ScrollbarOrientation};
use ratatui::style::{Style, Modifier};
use ratatui::Frame;
use ratatui::layout::{Rect, Layout, Direction, Constraint};
use ratatui::text::{Line, Span};
use crate::models::Note;
use crate::Config;
use crate::tui::widgets::color::{parse_color, get_contrast_text_color};
use crate::tui::widgets::tags::format_tags_brackets;
use crate::tui::widgets::truncate_with_ellipsis;

/// Each row takes two lines: star + title, then date + tag chips
const LINES_PER_ITEM: usize = 2;

pub fn render_note_list(
    f: &mut Frame,
    area: Rect,
    notes: &[&Note],
    total_count: usize,
    list_state: &mut ListState,
    config: &Config,
    focused: bool,
) {
    let max_width = area.width.saturating_sub(4) as usize; // 2 for borders, 1 scrollbar, 1 padding

    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let favorite_color = parse_color(&active_theme.favorite);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = if active_theme.highlight_fg.is_empty() {
        get_contrast_text_color(highlight_bg)
    } else {
        parse_color(&active_theme.highlight_fg)
    };

    let border_style = if focused {
        Style::default().fg(highlight_bg)
    } else {
        Style::default().fg(fg_color)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Notes ({} of {})", notes.len(), total_count))
        .border_style(border_style);

    if notes.is_empty() {
        let hint = if total_count == 0 {
            "No notes yet"
        } else {
            "No notes match"
        };
        let paragraph = Paragraph::new(hint)
            .block(block)
            .style(Style::default().fg(fg_color).add_modifier(Modifier::DIM));
        f.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = notes
        .iter()
        .map(|note| note_item(note, max_width, favorite_color))
        .collect();
    let total_items = items.len();

    // Split area to reserve space for scrollbar
    let list_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    let list_area = list_areas[0];
    let scrollbar_area = list_areas[1];

    let list = List::new(items)
        .block(block)
        .style(Style::default().fg(fg_color))
        .highlight_style(Style::default().fg(highlight_fg).bg(highlight_bg));
    StatefulWidget::render(list, list_area, f.buffer_mut(), list_state);

    let visible_items = (list_area.height.saturating_sub(2) as usize) / LINES_PER_ITEM;
    if total_items > visible_items && visible_items > 0 && scrollbar_area.width > 0 {
        let scrollbar_inner_area = Rect::new(
            scrollbar_area.x,
            list_area.y + 1,
            scrollbar_area.width,
            list_area.height.saturating_sub(2),
        );

        let selected_index = list_state.selected().unwrap_or(0);
        let scroll_position = selected_index.saturating_sub(visible_items - 1);
        let mut scrollbar_state = ScrollbarState::new(total_items)
            .viewport_content_length(visible_items)
            .position(scroll_position);

        let scrollbar = Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"))
            .track_symbol(Some("│"))
            .thumb_symbol("█");

        f.render_stateful_widget(scrollbar, scrollbar_inner_area, &mut scrollbar_state);
    }
}

fn note_item(note: &Note, max_width: usize, favorite_color: ratatui::style::Color) -> ListItem<'static> {
    let star = if note.favorite {
        Span::styled("★ ", Style::default().fg(favorite_color))
    } else {
        Span::raw("  ")
    };
    let title = truncate_with_ellipsis(note.display_title(), max_width.saturating_sub(2));

    let mut details = format!("  {}", note.updated_date_label());
    if !note.tags.is_empty() {
        details.push_str("  ");
        details.push_str(&format_tags_brackets(&note.tags));
    }

    ListItem::new(vec![
        Line::from(vec![star, Span::raw(title)]),
        Line::from(Span::styled(
            truncate_with_ellipsis(&details, max_width),
            Style::default().add_modifier(Modifier::DIM),
        )),
    ])
}
