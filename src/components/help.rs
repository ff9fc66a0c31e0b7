use crossterm::event::KeyEvent;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::theme::THEME;

pub struct HelpOverlay {
    pub visible: bool,
}

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "General",
        &[
            ("Tab", "Next field"),
            ("Shift+Tab", "Previous field"),
            ("F1 / ?", "Toggle this help"),
            ("q", "Quit (from the chain list)"),
            ("Ctrl+C", "Quit"),
        ],
    ),
    (
        "Network",
        &[
            ("Enter / c", "Connect wallet"),
            ("\u{2191}/k \u{2193}/j", "Move in the chain list"),
            ("Enter", "Switch to highlighted chain"),
            ("d", "Disconnect wallet"),
        ],
    ),
    (
        "Input",
        &[
            ("drop / paste", "Load a JSON file into the buffer"),
            ("Enter", "Load the typed path"),
            ("Ctrl+S", "Send input"),
            ("Ctrl+R", "Restore input that failed to send"),
        ],
    ),
];

impl HelpOverlay {
    pub fn new() -> Self {
        Self { visible: false }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    /// Returns true if it consumed the event
    pub fn handle_key(&mut self, _key: KeyEvent) -> bool {
        if self.visible {
            self.visible = false;
            true
        } else {
            false
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.visible {
            return;
        }

        let popup_width = area.width * 60 / 100;
        let popup_height = area.height * 70 / 100;
        let x = area.x + (area.width - popup_width) / 2;
        let y = area.y + (area.height - popup_height) / 2;
        let popup_area = Rect::new(x, y, popup_width, popup_height);

        // Clear the area behind the popup
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .borders(Borders::ALL)
            .border_style(THEME.focus_border_style(true))
            .style(Style::default().bg(THEME.surface));

        let mut help_text = Vec::new();
        for (title, keys) in SECTIONS {
            if !help_text.is_empty() {
                help_text.push(Line::from(""));
            }
            help_text.push(Line::from(Span::styled(
                *title,
                Style::default()
                    .fg(THEME.text_accent)
                    .add_modifier(Modifier::BOLD),
            )));
            for (keys, action) in *keys {
                help_text.push(Line::from(vec![
                    Span::styled(format!("  {keys:<14}"), Style::default().fg(THEME.text_accent)),
                    Span::styled(*action, Style::default().fg(THEME.text)),
                ]));
            }
        }
        help_text.push(Line::from(""));
        help_text.push(Line::from(Span::styled(
            "Press any key to close",
            THEME.muted_style(),
        )));

        let paragraph = Paragraph::new(help_text)
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, popup_area);
    }
}
