use ratatui::widgets::{Block, Borders, Paragraph, Clear, Wrap};
use ratatui::style::Style;
use ratatui::Frame;
use ratatui::layout::{Rect, Alignment};
use crate::Config;
use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::popup_area;
use crate::utils::format_key_binding_for_display as key;

pub fn render_help(f: &mut Frame, area: Rect, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);

    let popup_area = popup_area(area, 60, 70);
    f.render_widget(Clear, popup_area);

    let paragraph = Paragraph::new(build_help_text(config))
        .block(Block::default()
            .borders(Borders::ALL)
            .title("Help - Key Bindings")
            .title_alignment(Alignment::Center)
            .style(Style::default().fg(fg_color).bg(bg_color)))
        .style(Style::default().fg(fg_color).bg(bg_color))
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, popup_area);
}

/// The static shortcut reference, shared by the help popup and the
/// `shortcuts` subcommand
pub fn build_help_text(config: &Config) -> String {
    let kb = &config.key_bindings;
    let mut text = String::new();

    text.push_str("Global:\n");
    text.push_str(&format!("  {}: New note\n", key(&kb.new_note)));
    text.push_str(&format!("  {}: Search notes\n", key(&kb.focus_search)));
    text.push_str(&format!("  {}: Save (notes are saved automatically)\n", key(&kb.save)));
    text.push_str(&format!("  {}: Show/hide help\n", key(&kb.help)));
    text.push('\n');

    text.push_str("Note list:\n");
    text.push_str(&format!("  {} / {} (or ↑ / ↓): Select note\n", key(&kb.list_up), key(&kb.list_down)));
    text.push_str(&format!("  {}: Edit title\n", key(&kb.select)));
    text.push_str(&format!("  {}: Toggle favorite\n", key(&kb.toggle_favorite)));
    text.push_str(&format!("  {}: Delete note\n", key(&kb.delete)));
    text.push_str(&format!("  {}: Cycle sort order\n", key(&kb.cycle_sort)));
    text.push_str(&format!("  {}: Favorites only\n", key(&kb.favorites_only)));
    text.push_str(&format!("  {}: Toggle sidebar\n", key(&kb.toggle_sidebar)));
    text.push_str(&format!("  {}: Export notes.json\n", key(&kb.export)));
    text.push_str(&format!("  {}: Import notes\n", key(&kb.import)));
    text.push_str(&format!("  {}: Quit\n", key(&kb.quit)));
    text.push('\n');

    text.push_str("Editing:\n");
    text.push_str("  Tab / Shift+Tab: Title → Tags → Content → List\n");
    text.push_str("  Enter (tags): Add tag\n");
    text.push_str("  ← / → (empty tag input): Pick a tag, Delete removes it\n");
    text.push_str(&format!("  {}: Undo keystroke\n", key("Ctrl+z")));
    text.push_str("  Esc: Back to the list\n");

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_lists_global_shortcuts_from_config() {
        let mut config = Config::default();
        config.key_bindings.quit = "x".to_string();
        let text = build_help_text(&config);
        assert!(text.contains("New note"));
        assert!(text.contains("F1: Show/hide help"));
        assert!(text.contains("  x: Quit"));
    }
}
