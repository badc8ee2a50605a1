use ratatui::style::Style;
use ratatui::text::Span;

/// Format tags as a string with brackets: [tag1] [tag2] [tag3]
pub fn format_tags_brackets(tags: &[String]) -> String {
    tags.iter()
        .map(|tag| format!("[{}]", tag))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Chips for the editor's tag row. The selected chip (marked for removal)
/// gets `selected_style` and a trailing ×.
pub fn tag_chip_spans(
    tags: &[String],
    selected: Option<usize>,
    style: Style,
    selected_style: Style,
) -> Vec<Span<'static>> {
    let mut spans = Vec::with_capacity(tags.len() * 2);
    for (index, tag) in tags.iter().enumerate() {
        if Some(index) == selected {
            spans.push(Span::styled(format!("[{} ×]", tag), selected_style));
        } else {
            spans.push(Span::styled(format!("[{}]", tag), style));
        }
        spans.push(Span::raw(" "));
    }
    spans
}
