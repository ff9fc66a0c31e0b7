use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Outcome of feeding a key to a text input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    Changed,
    Submitted,
    Unchanged,
}

/// Single-line text input. The cursor counts chars, not bytes.
#[derive(Debug, Clone, Default)]
pub struct TextField {
    value: String,
    cursor: usize,
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.chars().count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    /// Insert pasted text at the cursor. Line breaks are dropped.
    pub fn insert_str(&mut self, text: &str) -> Edit {
        let clean: String = text.chars().filter(|c| *c != '\n' && *c != '\r').collect();
        if clean.is_empty() {
            return Edit::Unchanged;
        }
        let at = self.byte_index();
        self.value.insert_str(at, &clean);
        self.cursor += clean.chars().count();
        Edit::Changed
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Edit {
        let len = self.value.chars().count();
        match key.code {
            KeyCode::Enter => Edit::Submitted,
            KeyCode::Backspace => {
                if self.cursor == 0 {
                    return Edit::Unchanged;
                }
                self.cursor -= 1;
                let at = self.byte_index();
                self.value.remove(at);
                Edit::Changed
            }
            KeyCode::Delete => {
                if self.cursor >= len {
                    return Edit::Unchanged;
                }
                let at = self.byte_index();
                self.value.remove(at);
                Edit::Changed
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                Edit::Unchanged
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(len);
                Edit::Unchanged
            }
            KeyCode::Home => {
                self.cursor = 0;
                Edit::Unchanged
            }
            KeyCode::End => {
                self.cursor = len;
                Edit::Unchanged
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if self.value.is_empty() {
                    return Edit::Unchanged;
                }
                self.clear();
                Edit::Changed
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                let at = self.byte_index();
                self.value.insert(at, c);
                self.cursor += 1;
                Edit::Changed
            }
            _ => Edit::Unchanged,
        }
    }
}
