use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::theme::THEME;

pub struct StatusBar {
    pub connected: bool,
    pub error_message: Option<String>,
    pub warning: Option<String>,
    pub loading: Option<&'static str>,
}

impl StatusBar {
    pub fn new() -> Self {
        Self {
            connected: false,
            error_message: None,
            warning: None,
            loading: None,
        }
    }

    pub fn clear_messages(&mut self) {
        self.error_message = None;
        self.warning = None;
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        // Background
        let bg = Block::default().style(THEME.header_style());
        frame.render_widget(bg, area);

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(16)])
            .split(area);

        // --- Left side ---
        let left_content = if let Some(ref err) = self.error_message {
            Line::from(vec![
                Span::styled(
                    " ! ",
                    Style::default()
                        .fg(THEME.error)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(err.as_str(), Style::default().fg(THEME.error)),
            ])
        } else if let Some(ref warning) = self.warning {
            Line::from(vec![
                Span::styled(
                    " ! ",
                    Style::default()
                        .fg(THEME.warning)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(warning.as_str(), Style::default().fg(THEME.warning)),
            ])
        } else if let Some(what) = self.loading {
            Line::from(Span::styled(
                format!(" {what}..."),
                Style::default().fg(THEME.text_accent),
            ))
        } else {
            Line::from(vec![
                Span::styled(" Tab", Style::default().fg(THEME.text_accent)),
                Span::styled(":Next field  ", Style::default().fg(THEME.text_muted)),
                Span::styled("Ctrl+S", Style::default().fg(THEME.text_accent)),
                Span::styled(":Send  ", Style::default().fg(THEME.text_muted)),
                Span::styled("F1", Style::default().fg(THEME.text_accent)),
                Span::styled(":Help  ", Style::default().fg(THEME.text_muted)),
                Span::styled("Ctrl+C", Style::default().fg(THEME.text_accent)),
                Span::styled(":Quit", Style::default().fg(THEME.text_muted)),
            ])
        };

        let left = Paragraph::new(left_content).style(THEME.header_style());
        frame.render_widget(left, chunks[0]);

        // --- Right side: connection status ---
        let (dot_color, status_text) = if self.connected {
            (THEME.success, "Connected")
        } else {
            (THEME.error, "Disconnected")
        };

        let right_content = Line::from(vec![
            Span::styled("\u{25cf} ", Style::default().fg(dot_color)),
            Span::styled(status_text, Style::default().fg(dot_color)),
            Span::raw(" "),
        ]);

        let right = Paragraph::new(right_content)
            .alignment(Alignment::Right)
            .style(THEME.header_style());
        frame.render_widget(right, chunks[1]);
    }
}
