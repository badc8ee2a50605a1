use ratatui::widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarState, ScrollbarOrientation};
use ratatui::style::{Style, Modifier};
use ratatui::Frame;
use ratatui::layout::{Rect, Layout, Constraint, Alignment, Margin};
use ratatui::text::{Line, Span};
use crate::models::Note;
use crate::Config;
use crate::tui::app::Focus;
use crate::tui::widgets::color::{parse_color, get_contrast_text_color};
use crate::tui::widgets::editor::Editor;
use crate::tui::widgets::tags::tag_chip_spans;

/// Shown in the editor pane when no note is active
pub const PLACEHOLDER: &str = "Select a note or create a new one";
pub const TAG_INPUT_PREFIX: &str = "Add tag: ";

/// Everything the editor pane draws. The editors are mutable so their
/// scroll offsets can follow the cursor.
pub struct NoteEditorView<'a> {
    pub note: Option<&'a Note>,
    pub title: &'a mut Editor,
    pub tag_input: &'a mut Editor,
    pub content: &'a mut Editor,
    pub focus: Focus,
    pub selected_tag: Option<usize>,
    pub show_cursor: bool,
}

/// Title, Tags and Content rows of the editor pane
pub fn field_areas(area: Rect) -> [Rect; 3] {
    Layout::vertical([Constraint::Length(3), Constraint::Length(4), Constraint::Min(3)]).areas(area)
}

pub fn render_note_editor(f: &mut Frame, area: Rect, mut view: NoteEditorView, config: &Config) {
    if area.width < 4 || area.height < 4 {
        return;
    }

    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);
    let text_style = Style::default().fg(fg_color);
    let dim_style = text_style.add_modifier(Modifier::DIM);

    let Some(note) = view.note else {
        let paragraph = Paragraph::new(PLACEHOLDER)
            .block(Block::default().borders(Borders::ALL).title("Note"))
            .style(dim_style)
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    };

    let field_block = |title: &'static str, field: Focus| {
        let border = if view.focus == field {
            Style::default().fg(highlight_bg)
        } else {
            text_style
        };
        Block::default().borders(Borders::ALL).title(title).border_style(border)
    };
    let [title_area, tags_area, content_area] = field_areas(area);

    // Title
    let title_inner = title_area.inner(Margin::new(1, 1));
    view.title.update_horizontal_scroll(title_inner.width as usize);
    let title_line = if view.title.is_empty() && view.focus != Focus::Title {
        Line::from(Span::styled(note.display_title().to_string(), dim_style))
    } else {
        let (_, visible) = view.title.get_visible_lines(1, title_inner.width as usize);
        Line::from(visible.into_iter().next().unwrap_or_default())
    };
    f.render_widget(
        Paragraph::new(title_line).style(text_style).block(field_block("Title", Focus::Title)),
        title_area,
    );

    // Tags: chips on the first line, the input on the second
    let tags_inner = tags_area.inner(Margin::new(1, 1));
    let chip_line = if note.tags.is_empty() {
        Line::from(Span::styled("No tags", dim_style))
    } else {
        Line::from(tag_chip_spans(
            &note.tags,
            view.selected_tag,
            text_style,
            Style::default().fg(highlight_fg).bg(highlight_bg),
        ))
    };
    let prefix_width = TAG_INPUT_PREFIX.chars().count() as u16;
    let input_width = tags_inner.width.saturating_sub(prefix_width) as usize;
    view.tag_input.update_horizontal_scroll(input_width);
    let (_, input_visible) = view.tag_input.get_visible_lines(1, input_width);
    let input_line = Line::from(vec![
        Span::styled(TAG_INPUT_PREFIX, dim_style),
        Span::raw(input_visible.into_iter().next().unwrap_or_default()),
    ]);
    f.render_widget(
        Paragraph::new(vec![chip_line, input_line]).style(text_style).block(field_block("Tags", Focus::Tags)),
        tags_area,
    );

    // Content
    let content_inner = content_area.inner(Margin::new(1, 1));
    let viewport_height = content_inner.height as usize;
    let viewport_width = content_inner.width as usize;
    view.content.update_scroll(viewport_height);
    view.content.update_horizontal_scroll(viewport_width);
    let (_, visible) = view.content.get_visible_lines(viewport_height, viewport_width);
    let lines: Vec<Line> = visible.into_iter().map(Line::from).collect();
    let stamps = format!(" Created {} · Updated {} ", short_stamp(&note.created_at), short_stamp(&note.updated_at));
    f.render_widget(
        Paragraph::new(lines)
            .style(text_style)
            .block(field_block("Content", Focus::Content).title_bottom(Line::from(stamps).right_aligned())),
        content_area,
    );

    let total_lines = view.content.lines.len();
    if total_lines > viewport_height && viewport_height > 0 {
        let mut scrollbar_state = ScrollbarState::new(total_lines)
            .viewport_content_length(viewport_height)
            .position(view.content.scroll_offset);
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"))
            .track_symbol(Some("│"))
            .thumb_symbol("█");
        f.render_stateful_widget(scrollbar, content_area.inner(Margin::new(0, 1)), &mut scrollbar_state);
    }

    if !view.show_cursor {
        return;
    }
    let cursor = match view.focus {
        Focus::Title => view.title.get_cursor_screen_pos(title_area),
        Focus::Content => view.content.get_cursor_screen_pos(content_area),
        Focus::Tags => {
            let col = view.tag_input.cursor_col.saturating_sub(view.tag_input.scroll_col) as u16;
            let x = tags_inner.x + prefix_width + col;
            (x < tags_inner.x + tags_inner.width && tags_inner.height > 1).then_some((x, tags_inner.y + 1))
        }
        Focus::List | Focus::Search => None,
    };
    if let Some((x, y)) = cursor {
        f.set_cursor_position((x, y));
    }
}

/// `2024-05-01 14:03` in local time, or the stored text when it does not parse
fn short_stamp(raw: &str) -> String {
    crate::models::parse_timestamp(raw)
        .map(|at| at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| raw.to_string())
}
