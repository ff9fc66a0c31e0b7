use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::components::text_field::Edit;

/// Multi-line text buffer with a cursor kept on a char boundary.
#[derive(Debug, Clone, Default)]
pub struct TextArea {
    text: String,
    cursor: usize,
    scroll: usize,
}

impl TextArea {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = 0;
        self.scroll = 0;
    }

    pub fn clear(&mut self) {
        self.set_text(String::new());
    }

    pub fn insert_str(&mut self, text: &str) -> Edit {
        if text.is_empty() {
            return Edit::Unchanged;
        }
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        self.text.insert_str(self.cursor, &normalized);
        self.cursor += normalized.len();
        Edit::Changed
    }

    fn line_start(&self, pos: usize) -> usize {
        self.text[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0)
    }

    fn line_end(&self, pos: usize) -> usize {
        self.text[pos..]
            .find('\n')
            .map(|i| pos + i)
            .unwrap_or(self.text.len())
    }

    fn prev_boundary(&self, pos: usize) -> Option<usize> {
        self.text[..pos].chars().next_back().map(|c| pos - c.len_utf8())
    }

    fn next_boundary(&self, pos: usize) -> Option<usize> {
        self.text[pos..].chars().next().map(|c| pos + c.len_utf8())
    }

    /// Byte offset of column `col` (in chars) on the line starting at `start`, clamped to the line.
    fn offset_in_line(&self, start: usize, col: usize) -> usize {
        let end = self.line_end(start);
        self.text[start..end]
            .char_indices()
            .nth(col)
            .map(|(i, _)| start + i)
            .unwrap_or(end)
    }

    /// Cursor position as (row, column), both counted from zero, column in chars.
    pub fn cursor_position(&self) -> (usize, usize) {
        let row = self.text[..self.cursor].matches('\n').count();
        let start = self.line_start(self.cursor);
        let col = self.text[start..self.cursor].chars().count();
        (row, col)
    }

    fn move_vertical(&mut self, down: bool) {
        let start = self.line_start(self.cursor);
        let col = self.text[start..self.cursor].chars().count();
        let target_start = if down {
            let end = self.line_end(self.cursor);
            if end == self.text.len() {
                return;
            }
            end + 1
        } else {
            if start == 0 {
                return;
            }
            self.line_start(start - 1)
        };
        self.cursor = self.offset_in_line(target_start, col);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Edit {
        match key.code {
            KeyCode::Enter => {
                self.text.insert(self.cursor, '\n');
                self.cursor += 1;
                Edit::Changed
            }
            KeyCode::Backspace => match self.prev_boundary(self.cursor) {
                Some(prev) => {
                    self.text.replace_range(prev..self.cursor, "");
                    self.cursor = prev;
                    Edit::Changed
                }
                None => Edit::Unchanged,
            },
            KeyCode::Delete => match self.next_boundary(self.cursor) {
                Some(next) => {
                    self.text.replace_range(self.cursor..next, "");
                    Edit::Changed
                }
                None => Edit::Unchanged,
            },
            KeyCode::Left => {
                if let Some(prev) = self.prev_boundary(self.cursor) {
                    self.cursor = prev;
                }
                Edit::Unchanged
            }
            KeyCode::Right => {
                if let Some(next) = self.next_boundary(self.cursor) {
                    self.cursor = next;
                }
                Edit::Unchanged
            }
            KeyCode::Up => {
                self.move_vertical(false);
                Edit::Unchanged
            }
            KeyCode::Down => {
                self.move_vertical(true);
                Edit::Unchanged
            }
            KeyCode::Home => {
                self.cursor = self.line_start(self.cursor);
                Edit::Unchanged
            }
            KeyCode::End => {
                self.cursor = self.line_end(self.cursor);
                Edit::Unchanged
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.text.insert(self.cursor, c);
                self.cursor += c.len_utf8();
                Edit::Changed
            }
            _ => Edit::Unchanged,
        }
    }

    /// First visible row for a viewport of `height` rows, keeping the cursor in view.
    pub fn scroll_for(&mut self, height: usize) -> usize {
        let (row, _) = self.cursor_position();
        if height == 0 {
            return self.scroll;
        }
        if row < self.scroll {
            self.scroll = row;
        } else if row >= self.scroll + height {
            self.scroll = row + 1 - height;
        }
        self.scroll
    }
}
