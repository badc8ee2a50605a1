use ratatui::layout::Rect;
use std::cmp;
use std::fmt;

/// One reversible keystroke
#[derive(Clone, Debug)]
pub enum EditOperation {
    InsertChar { line: usize, col: usize },
    DeleteChar { line: usize, col: usize, ch: char },
    InsertNewline { line: usize, col: usize },
    DeleteNewline { line: usize, col: usize },
}

/// Text buffer behind every input field: title, tag input, search,
/// import path and the multi-line content.
#[derive(Debug, Clone)]
pub struct Editor {
    pub lines: Vec<String>,
    pub cursor_line: usize,
    pub cursor_col: usize,
    pub scroll_offset: usize, // Vertical scroll (line offset)
    pub scroll_col: usize,    // Horizontal scroll (column offset)
    undo_stack: Vec<EditOperation>,
    max_history: usize,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    pub fn new() -> Self {
        Self::from_string("")
    }

    /// Load `content` with the cursor at its end
    pub fn from_string(content: &str) -> Self {
        let lines: Vec<String> = if content.is_empty() {
            vec![String::new()]
        } else {
            content.split('\n').map(|s| s.to_string()).collect()
        };
        let cursor_line = lines.len().saturating_sub(1);
        let cursor_col = lines.last().map(|l| l.chars().count()).unwrap_or(0);
        Self {
            lines,
            cursor_line,
            cursor_col,
            scroll_offset: 0,
            scroll_col: 0,
            undo_stack: Vec::new(),
            max_history: 100,
        }
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.is_empty())
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    fn line_len(&self, line: usize) -> usize {
        self.lines.get(line).map(|l| l.chars().count()).unwrap_or(0)
    }

    fn ensure_cursor_valid(&mut self) {
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        if self.cursor_line >= self.lines.len() {
            self.cursor_line = self.lines.len() - 1;
        }
        self.cursor_col = cmp::min(self.cursor_col, self.line_len(self.cursor_line));
    }

    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' {
            self.insert_newline();
            return;
        }
        self.ensure_cursor_valid();
        let (line, col) = (self.cursor_line, self.cursor_col);
        insert_at(&mut self.lines[line], col, ch);
        self.cursor_col += 1;
        self.add_to_undo(EditOperation::InsertChar { line, col });
    }

    pub fn insert_newline(&mut self) {
        self.ensure_cursor_valid();
        let (line, col) = (self.cursor_line, self.cursor_col);
        let remainder = split_at(&mut self.lines[line], col);
        self.lines.insert(line + 1, remainder);
        self.cursor_line += 1;
        self.cursor_col = 0;
        self.add_to_undo(EditOperation::InsertNewline { line, col });
    }

    /// Backspace
    pub fn delete_char(&mut self) {
        self.ensure_cursor_valid();
        let (line, col) = (self.cursor_line, self.cursor_col);
        if col > 0 {
            if let Some(ch) = remove_at(&mut self.lines[line], col - 1) {
                self.cursor_col -= 1;
                self.add_to_undo(EditOperation::DeleteChar { line, col: col - 1, ch });
            }
        } else if line > 0 {
            let current = self.lines.remove(line);
            let prev_len = self.line_len(line - 1);
            self.lines[line - 1].push_str(&current);
            self.cursor_line = line - 1;
            self.cursor_col = prev_len;
            self.add_to_undo(EditOperation::DeleteNewline { line: line - 1, col: prev_len });
        }
    }

    pub fn move_cursor_up(&mut self) {
        if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.cursor_col = cmp::min(self.cursor_col, self.line_len(self.cursor_line));
        }
    }

    pub fn move_cursor_down(&mut self) {
        if self.cursor_line + 1 < self.lines.len() {
            self.cursor_line += 1;
            self.cursor_col = cmp::min(self.cursor_col, self.line_len(self.cursor_line));
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.cursor_col = self.line_len(self.cursor_line);
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_col < self.line_len(self.cursor_line) {
            self.cursor_col += 1;
        } else if self.cursor_line + 1 < self.lines.len() {
            self.cursor_line += 1;
            self.cursor_col = 0;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_col = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_col = self.line_len(self.cursor_line);
    }

    fn add_to_undo(&mut self, op: EditOperation) {
        self.undo_stack.push(op);
        if self.undo_stack.len() > self.max_history {
            self.undo_stack.remove(0);
        }
    }

    /// Revert the last keystroke. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(op) = self.undo_stack.pop() else {
            return false;
        };
        match op {
            EditOperation::InsertChar { line, col } => {
                if let Some(text) = self.lines.get_mut(line) {
                    remove_at(text, col);
                    self.cursor_line = line;
                    self.cursor_col = col;
                }
            }
            EditOperation::DeleteChar { line, col, ch } => {
                if let Some(text) = self.lines.get_mut(line) {
                    insert_at(text, col, ch);
                    self.cursor_line = line;
                    self.cursor_col = col + 1;
                }
            }
            EditOperation::InsertNewline { line, col } => {
                if line + 1 < self.lines.len() {
                    let next = self.lines.remove(line + 1);
                    self.lines[line].push_str(&next);
                    self.cursor_line = line;
                    self.cursor_col = col;
                }
            }
            EditOperation::DeleteNewline { line, col } => {
                if let Some(text) = self.lines.get_mut(line) {
                    let remainder = split_at(text, col);
                    self.lines.insert(line + 1, remainder);
                    self.cursor_line = line + 1;
                    self.cursor_col = 0;
                }
            }
        }
        true
    }

    /// Visible slice of lines after both scroll offsets are applied.
    /// Returns the index of the first visible line too.
    pub fn get_visible_lines(&self, viewport_height: usize, viewport_width: usize) -> (usize, Vec<String>) {
        let start = cmp::min(self.scroll_offset, self.lines.len());
        let end = cmp::min(start + viewport_height, self.lines.len());
        let visible = self.lines[start..end]
            .iter()
            .map(|line| line.chars().skip(self.scroll_col).take(viewport_width).collect())
            .collect();
        (start, visible)
    }

    pub fn update_scroll(&mut self, viewport_height: usize) {
        if viewport_height == 0 {
            return;
        }
        if self.cursor_line < self.scroll_offset {
            self.scroll_offset = self.cursor_line;
        } else if self.cursor_line >= self.scroll_offset + viewport_height {
            self.scroll_offset = self.cursor_line + 1 - viewport_height;
        }
    }

    /// `viewport_width` is the inner width, borders already removed
    pub fn update_horizontal_scroll(&mut self, viewport_width: usize) {
        if viewport_width == 0 {
            return;
        }
        if self.cursor_col < self.scroll_col {
            self.scroll_col = self.cursor_col;
        } else if self.cursor_col >= self.scroll_col + viewport_width {
            self.scroll_col = self.cursor_col + 1 - viewport_width;
        }
    }

    /// Screen position of the cursor inside a bordered `area`, if visible
    pub fn get_cursor_screen_pos(&self, area: Rect) -> Option<(u16, u16)> {
        let inner_height = area.height.saturating_sub(2) as usize;
        let inner_width = area.width.saturating_sub(2) as usize;
        let row = self.cursor_line.checked_sub(self.scroll_offset)?;
        let col = self.cursor_col.checked_sub(self.scroll_col)?;
        if row >= inner_height || col >= inner_width {
            return None;
        }
        Some((area.x + 1 + col as u16, area.y + 1 + row as u16))
    }
}

impl fmt::Display for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

fn byte_index(text: &str, col: usize) -> usize {
    text.char_indices().nth(col).map(|(i, _)| i).unwrap_or(text.len())
}

fn insert_at(text: &mut String, col: usize, ch: char) {
    let idx = byte_index(text, col);
    text.insert(idx, ch);
}

fn remove_at(text: &mut String, col: usize) -> Option<char> {
    if col >= text.chars().count() {
        return None;
    }
    let idx = byte_index(text, col);
    Some(text.remove(idx))
}

fn split_at(text: &mut String, col: usize) -> String {
    let idx = byte_index(text, col);
    text.split_off(idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn typed(text: &str) -> Editor {
        let mut editor = Editor::new();
        for ch in text.chars() {
            editor.insert_char(ch);
        }
        editor
    }

    #[test]
    fn typing_and_backspace() {
        let mut editor = typed("héllo");
        editor.delete_char();
        assert_eq!(editor.text(), "héll");
        assert_eq!(editor.cursor_col, 4);
    }

    #[test]
    fn newline_splits_and_backspace_joins() {
        let mut editor = typed("abcd");
        editor.move_cursor_left();
        editor.move_cursor_left();
        editor.insert_newline();
        assert_eq!(editor.lines, vec!["ab", "cd"]);
        editor.delete_char();
        assert_eq!(editor.text(), "abcd");
        assert_eq!((editor.cursor_line, editor.cursor_col), (0, 2));
    }

    #[test]
    fn undo_reverts_keystrokes_in_order() {
        let mut editor = typed("ab\nc");
        editor.delete_char();
        assert!(editor.undo());
        assert_eq!(editor.text(), "ab\nc");
        assert!(editor.undo());
        assert!(editor.undo());
        assert_eq!(editor.text(), "ab");
        assert!(editor.undo());
        assert!(editor.undo());
        assert_eq!(editor.text(), "");
        assert!(!editor.undo());
    }

    #[test]
    fn from_string_keeps_trailing_newline() {
        let editor = Editor::from_string("one\n");
        assert_eq!(editor.lines, vec!["one", ""]);
        assert_eq!(editor.text(), "one\n");
        assert_eq!((editor.cursor_line, editor.cursor_col), (1, 0));
    }

    #[test]
    fn scrolling_keeps_cursor_visible() {
        let mut editor = Editor::from_string("1\n2\n3\n4\n5");
        editor.update_scroll(2);
        assert_eq!(editor.scroll_offset, 3);
        let (start, visible) = editor.get_visible_lines(2, 10);
        assert_eq!(start, 3);
        assert_eq!(visible, vec!["4", "5"]);

        let area = Rect::new(0, 0, 10, 4);
        assert_eq!(editor.get_cursor_screen_pos(area), Some((2, 2)));
    }

    #[test]
    fn horizontal_scroll_follows_cursor() {
        let mut editor = typed("abcdefgh");
        editor.update_horizontal_scroll(4);
        assert_eq!(editor.scroll_col, 5);
        editor.move_cursor_home();
        editor.update_horizontal_scroll(4);
        assert_eq!(editor.scroll_col, 0);
    }
}
