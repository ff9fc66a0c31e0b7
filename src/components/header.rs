use alloy::primitives::Address;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::theme::THEME;
use crate::utils;

pub struct Header {
    pub chain_name: Option<String>,
    pub account: Option<Address>,
    pub deployments: usize,
}

impl Header {
    pub fn new(deployments: usize) -> Self {
        Self {
            chain_name: None,
            account: None,
            deployments,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        // Background for the entire header bar
        let header_block = Block::default().style(THEME.header_style());
        frame.render_widget(header_block, area);

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(12),
                Constraint::Min(0),
                Constraint::Length(40),
            ])
            .split(area);

        // Left: App title
        let title = Paragraph::new(Span::styled(
            " input-tui",
            Style::default()
                .fg(THEME.text_accent)
                .add_modifier(Modifier::BOLD),
        ))
        .style(THEME.header_style());
        frame.render_widget(title, chunks[0]);

        let deployments = Paragraph::new(Span::styled(
            format!("{} deployments configured", self.deployments),
            THEME.muted_style(),
        ))
        .style(THEME.header_style());
        frame.render_widget(deployments, chunks[1]);

        // Right: network and account
        let network_info = match (&self.chain_name, &self.account) {
            (Some(chain), Some(account)) => Line::from(vec![
                Span::styled(chain.as_str(), Style::default().fg(THEME.text)),
                Span::styled(" | ", THEME.muted_style()),
                Span::styled(utils::truncate_address(account), THEME.address_style()),
                Span::raw(" "),
            ]),
            _ => Line::from(Span::styled("no wallet ", THEME.muted_style())),
        };
        let network_paragraph = Paragraph::new(network_info)
            .alignment(Alignment::Right)
            .style(THEME.header_style());
        frame.render_widget(network_paragraph, chunks[2]);
    }
}
