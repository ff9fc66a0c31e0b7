use std::path::PathBuf;

use alloy::primitives::Bytes;
use crossterm::event::KeyEvent;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::components::Component;
use crate::components::text_area::TextArea;
use crate::components::text_field::{Edit, TextField};
use crate::data::payload::{self, InputError};
use crate::data::types::Submission;
use crate::events::{AppEvent, Focus};
use crate::theme::THEME;
use crate::utils;

const MAX_RECENT_SUBMISSIONS: usize = 8;

/// JSON drop zone, editable payload buffer and the send action.
pub struct InputPanel {
    pub loading: bool,
    pub error: Option<String>,
    pub focus: Focus,
    /// Set while a wallet binding is available for submission.
    pub wallet_ready: bool,
    drop_field: TextField,
    editor: TextArea,
    read_seq: u64,
    submissions: Vec<Submission>,
    failed_payload: Option<String>,
}

impl InputPanel {
    pub fn new() -> Self {
        Self {
            loading: false,
            error: None,
            focus: Focus::DropZone,
            wallet_ready: false,
            drop_field: TextField::new(),
            editor: TextArea::new(),
            read_seq: 0,
            submissions: Vec::new(),
            failed_payload: None,
        }
    }

    pub fn buffer(&self) -> &str {
        self.editor.text()
    }

    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    pub fn has_failed_payload(&self) -> bool {
        self.failed_payload.is_some()
    }

    /// Handle one dropped file. Starts a read, or rejects the drop outright.
    pub fn drop_text(&mut self, text: &str) -> Option<AppEvent> {
        match payload::parse_drop(text) {
            Ok(path) => self.drop_path(path),
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }

    /// Load an already-resolved path. Only the extension is checked.
    pub fn drop_path(&mut self, path: PathBuf) -> Option<AppEvent> {
        self.error = None;
        if let Err(e) = payload::check_json_path(&path) {
            self.error = Some(e.to_string());
            return None;
        }
        self.loading = true;
        self.read_seq += 1;
        self.drop_field.clear();
        Some(AppEvent::ReadFile {
            seq: self.read_seq,
            path,
        })
    }

    /// Apply a finished read. Results of superseded drops are ignored.
    pub fn on_file_read(&mut self, seq: u64, result: Result<String, InputError>) {
        if seq != self.read_seq {
            tracing::debug!(seq, latest = self.read_seq, "discarding stale file read");
            return;
        }
        self.loading = false;
        match result {
            Ok(text) => {
                self.editor.set_text(text);
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    pub fn can_submit(&self) -> bool {
        self.wallet_ready && !self.editor.is_empty()
    }

    /// Encode the buffer for sending. The buffer is cleared whether or not the send succeeds.
    pub fn submit(&mut self) -> Option<AppEvent> {
        if !self.can_submit() {
            return None;
        }
        let bytes = payload::encode_payload(self.editor.text());
        self.editor.clear();
        self.failed_payload = None;
        Some(AppEvent::SubmitInput(bytes))
    }

    pub fn on_submitted(&mut self, submission: Submission) {
        self.error = None;
        self.submissions.insert(0, submission);
        self.submissions.truncate(MAX_RECENT_SUBMISSIONS);
    }

    pub fn on_submission_failed(&mut self, error: String, payload: Bytes) {
        self.error = Some(error);
        self.failed_payload = Some(String::from_utf8_lossy(&payload).into_owned());
    }

    /// Put the last payload that failed to send back into the buffer.
    pub fn restore_failed_payload(&mut self) -> bool {
        match self.failed_payload.take() {
            Some(text) => {
                self.editor.set_text(text);
                self.error = None;
                true
            }
            None => false,
        }
    }

    pub fn handle_paste(&mut self, text: &str) -> Option<AppEvent> {
        match self.focus {
            Focus::Editor => {
                self.editor.insert_str(text);
                None
            }
            _ => self.drop_text(text),
        }
    }

    fn render_drop_zone(&self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == Focus::DropZone;
        let block = Block::default()
            .title(" Drop JSON ")
            .borders(Borders::ALL)
            .border_style(THEME.focus_border_style(focused));
        let inner = block.inner(area);

        let line = if self.loading {
            Line::from(Span::styled("Loading file...", THEME.accent_style()))
        } else if self.drop_field.is_empty() {
            Line::from(Span::styled(
                "Drag 'n' drop a JSON file here, or type its path and press Enter",
                THEME.muted_style(),
            ))
        } else {
            Line::from(Span::styled(
                self.drop_field.value(),
                Style::default().fg(THEME.text),
            ))
        };
        frame.render_widget(Paragraph::new(line).block(block), area);

        if focused && !self.loading {
            let cursor_x = utils::cell_offset(inner.x, self.drop_field.cursor());
            if cursor_x < inner.right() {
                frame.set_cursor_position((cursor_x, inner.y));
            }
        }
    }

    fn render_editor(&mut self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == Focus::Editor;
        let block = Block::default()
            .title(" Input ")
            .borders(Borders::ALL)
            .border_style(THEME.focus_border_style(focused));
        let inner = block.inner(area);
        let scroll = self.editor.scroll_for(inner.height as usize);

        let paragraph = if self.editor.is_empty() {
            Paragraph::new(Span::styled("(empty)", THEME.muted_style()))
        } else {
            Paragraph::new(self.editor.text()).style(Style::default().fg(THEME.text))
        };
        frame.render_widget(paragraph.block(block).scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0)), area);

        if focused {
            let (row, col) = self.editor.cursor_position();
            let x = utils::cell_offset(inner.x, col);
            let y = utils::cell_offset(inner.y, row.saturating_sub(scroll));
            if x < inner.right() && y < inner.bottom() {
                frame.set_cursor_position((x, y));
            }
        }
    }

    fn render_send(&self, frame: &mut Frame, area: Rect) {
        let style = if self.can_submit() {
            THEME.selected_style()
        } else {
            THEME.muted_style()
        };
        let mut spans = vec![
            Span::styled(" [ Send Input ] ", style),
            Span::styled(" Ctrl+S", THEME.muted_style()),
        ];
        if self.has_failed_payload() {
            spans.push(Span::styled("   Ctrl+R restore failed input", THEME.accent_style()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_submissions(&self, frame: &mut Frame, area: Rect) {
        let rows: Vec<Row> = self
            .submissions()
            .iter()
            .map(|s| {
                Row::new(vec![
                    Cell::from(s.sent_at.format("%H:%M:%S").to_string()),
                    Cell::from(utils::truncate_hash(&s.tx_hash)).style(THEME.hash_style()),
                    Cell::from(
                        s.input_index
                            .map(|i| format!("#{i}"))
                            .unwrap_or_else(|| "-".to_string()),
                    ),
                    Cell::from(format!("{} bytes", s.payload_len)),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(9),
                Constraint::Length(16),
                Constraint::Length(8),
                Constraint::Min(8),
            ],
        )
        .header(
            Row::new(vec!["Time", "Tx", "Index", "Size"]).style(THEME.table_header_style()),
        )
        .block(
            Block::default()
                .title(" Recent Inputs ")
                .borders(Borders::ALL)
                .border_style(THEME.border_style()),
        );
        frame.render_widget(table, area);
    }
}

impl Default for InputPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for InputPanel {
    fn handle_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        match self.focus {
            Focus::DropZone if !self.loading => match self.drop_field.handle_key(key) {
                Edit::Submitted if !self.drop_field.is_empty() => {
                    let text = self.drop_field.value().to_string();
                    self.drop_text(&text)
                }
                _ => None,
            },
            Focus::Editor => {
                self.editor.handle_key(key);
                None
            }
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Send Input ")
            .borders(Borders::ALL)
            .border_style(THEME.border_style())
            .style(Style::default().bg(THEME.surface));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let error_height = if self.error.is_some() { 3 } else { 0 };
        let history_height = if self.submissions.is_empty() {
            0
        } else {
            (self.submissions.len() as u16 + 3).min(8)
        };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(error_height),
                Constraint::Min(3),
                Constraint::Length(1),
                Constraint::Length(history_height),
            ])
            .split(inner);

        self.render_drop_zone(frame, chunks[0]);

        if let Some(ref err) = self.error {
            let alert = Paragraph::new(Line::from(vec![
                Span::styled(
                    "Error! ",
                    Style::default()
                        .fg(THEME.error)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(err.as_str(), Style::default().fg(THEME.error)),
            ]))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(THEME.error_style()),
            );
            frame.render_widget(alert, chunks[1]);
        }

        self.render_editor(frame, chunks[2]);
        self.render_send(frame, chunks[3]);
        if !self.submissions.is_empty() {
            self.render_submissions(frame, chunks[4]);
        }
    }
}
