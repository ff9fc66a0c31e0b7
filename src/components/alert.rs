use crossterm::event::KeyEvent;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::theme::THEME;
use crate::utils;

/// Modal warning that stays up until the next key press.
pub struct AlertOverlay {
    pub message: Option<String>,
}

impl AlertOverlay {
    pub fn new() -> Self {
        Self { message: None }
    }

    pub fn show(&mut self, message: String) {
        self.message = Some(message);
    }

    pub fn visible(&self) -> bool {
        self.message.is_some()
    }

    /// Returns true if it consumed the event
    pub fn handle_key(&mut self, _key: KeyEvent) -> bool {
        self.message.take().is_some()
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(ref message) = self.message else {
            return;
        };

        let width = utils::cell_offset(6, message.chars().count())
            .max(30)
            .min(area.width);
        let height = 5.min(area.height);
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        let popup_area = Rect::new(x, y, width, height);

        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Alert ")
            .borders(Borders::ALL)
            .border_style(THEME.warning_style())
            .style(Style::default().bg(THEME.surface));

        let text = Paragraph::new(vec![
            Line::from(Span::styled(message.as_str(), Style::default().fg(THEME.text))),
            Line::from(""),
            Line::from(Span::styled("press any key", THEME.muted_style())),
        ])
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(text, popup_area);
    }
}
