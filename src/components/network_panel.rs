use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::components::Component;
use crate::components::text_field::{Edit, TextField};
use crate::data::deployments::DeploymentTable;
use crate::data::types::{ChainId, ChainInfo, WalletInfo};
use crate::events::{AppEvent, Focus};
use crate::theme::THEME;
use crate::utils;

pub const NO_DEPLOYMENT_MESSAGE: &str = "No deploy on this chain";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Connection {
    Disconnected,
    Connecting,
    Connected(WalletInfo),
}

/// Wallet connect/disconnect, chain switching and the contract address field.
pub struct NetworkPanel {
    pub connection: Connection,
    pub switching: bool,
    pub focus: Focus,
    chains: Vec<ChainInfo>,
    deployments: Arc<DeploymentTable>,
    highlighted: usize,
    list_state: ListState,
    address: TextField,
    address_edited: bool,
}

impl NetworkPanel {
    /// A non-empty `dapp_address` counts as a manual override and is never replaced.
    pub fn new(chains: Vec<ChainInfo>, deployments: Arc<DeploymentTable>, dapp_address: &str) -> Self {
        let mut address = TextField::new();
        address.set_value(dapp_address);
        Self {
            connection: Connection::Disconnected,
            switching: false,
            focus: Focus::ChainSelector,
            chains,
            deployments,
            highlighted: 0,
            list_state: ListState::default().with_selected(Some(0)),
            address,
            address_edited: !dapp_address.is_empty(),
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.connection, Connection::Connected(_))
    }

    pub fn wallet(&self) -> Option<&WalletInfo> {
        match &self.connection {
            Connection::Connected(wallet) => Some(wallet),
            _ => None,
        }
    }

    pub fn active_chain(&self) -> Option<ChainId> {
        self.wallet().map(|w| w.chain)
    }

    pub fn chain_label(&self, chain: ChainId) -> String {
        self.chains
            .iter()
            .find(|c| c.id == chain)
            .map(|c| c.label.clone())
            .unwrap_or_else(|| format!("Chain {chain}"))
    }

    pub fn address(&self) -> &str {
        self.address.value()
    }

    pub fn request_connect(&mut self) -> Option<AppEvent> {
        if self.connection != Connection::Disconnected {
            return None;
        }
        self.connection = Connection::Connecting;
        Some(AppEvent::Connect)
    }

    pub fn request_disconnect(&self) -> Option<AppEvent> {
        self.is_connected().then_some(AppEvent::Disconnect)
    }

    /// React to a chain being picked in the selector.
    ///
    /// Only chains present in the deployment table are switched to; anything else
    /// raises an alert and leaves the active chain untouched.
    pub fn select_chain(&mut self, chain: ChainId) -> Option<AppEvent> {
        let active = self.active_chain()?;
        if self.switching || chain == active {
            return None;
        }
        if self.deployments.contains(chain) {
            self.switching = true;
            Some(AppEvent::SwitchChain(chain))
        } else {
            tracing::warn!(%chain, "no deployment for selected chain");
            self.highlight(active);
            Some(AppEvent::Alert(NO_DEPLOYMENT_MESSAGE.to_string()))
        }
    }

    pub fn on_connected(&mut self, wallet: WalletInfo) {
        let chain = wallet.chain;
        self.connection = Connection::Connected(wallet);
        self.switching = false;
        self.highlight(chain);
    }

    pub fn on_connect_failed(&mut self) {
        self.connection = Connection::Disconnected;
    }

    pub fn on_disconnected(&mut self) {
        self.connection = Connection::Disconnected;
        self.switching = false;
    }

    pub fn on_chain_switched(&mut self, chain: ChainId) {
        self.switching = false;
        if let Connection::Connected(wallet) = &mut self.connection {
            wallet.chain = chain;
        }
        self.highlight(chain);
    }

    pub fn on_switch_failed(&mut self) {
        self.switching = false;
        if let Some(active) = self.active_chain() {
            self.highlight(active);
        }
    }

    /// Follow the deployed dapp address of `chain` unless the user has typed their own.
    /// Returns the new address when the field changed.
    pub fn adopt_deployment_address(&mut self, chain: ChainId) -> Option<String> {
        if self.address_edited {
            return None;
        }
        let address = self.deployments.get(chain)?.dapp_address?.to_string();
        if address == self.address.value() {
            return None;
        }
        self.address.set_value(address.clone());
        Some(address)
    }

    pub fn handle_paste(&mut self, text: &str) -> Option<AppEvent> {
        if self.focus != Focus::AddressField || !self.is_connected() {
            return None;
        }
        match self.address.insert_str(text) {
            Edit::Changed => self.address_changed(),
            _ => None,
        }
    }

    fn address_changed(&mut self) -> Option<AppEvent> {
        self.address_edited = true;
        Some(AppEvent::DappAddressChanged(self.address.value().to_string()))
    }

    fn highlight(&mut self, chain: ChainId) {
        if let Some(index) = self.chains.iter().position(|c| c.id == chain) {
            self.highlighted = index;
            self.list_state.select(Some(index));
        }
    }

    fn move_highlight(&mut self, down: bool) {
        if self.chains.is_empty() {
            return;
        }
        self.highlighted = if down {
            (self.highlighted + 1).min(self.chains.len() - 1)
        } else {
            self.highlighted.saturating_sub(1)
        };
        self.list_state.select(Some(self.highlighted));
    }

    fn handle_selector_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        match self.connection {
            Connection::Disconnected => match key.code {
                KeyCode::Enter | KeyCode::Char('c') => self.request_connect(),
                _ => None,
            },
            Connection::Connecting => None,
            Connection::Connected(_) => match key.code {
                _ if self.switching => None,
                KeyCode::Char('d') => self.request_disconnect(),
                KeyCode::Char('j') | KeyCode::Down => {
                    self.move_highlight(true);
                    None
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    self.move_highlight(false);
                    None
                }
                KeyCode::Enter => {
                    let chain = self.chains.get(self.highlighted)?.id;
                    self.select_chain(chain)
                }
                _ => None,
            },
        }
    }

    fn render_chain_list(&mut self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == Focus::ChainSelector;
        let block = Block::default()
            .title(" Switch Chain ")
            .borders(Borders::ALL)
            .border_style(THEME.focus_border_style(focused));

        if self.switching {
            let text = Paragraph::new(Span::styled(
                "Switching chain...",
                Style::default()
                    .fg(THEME.warning)
                    .add_modifier(Modifier::BOLD),
            ))
            .block(block);
            frame.render_widget(text, area);
            return;
        }

        let active = self.active_chain();
        let items: Vec<ListItem> = self
            .chains
            .iter()
            .map(|chain| {
                let marker = if Some(chain.id) == active { "\u{25cf} " } else { "  " };
                let deployed = if self.deployments.contains(chain.id) {
                    Span::styled(" deployed", THEME.success_style())
                } else {
                    Span::styled(" no deploy", THEME.muted_style())
                };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, THEME.success_style()),
                    Span::styled(chain.label.clone(), Style::default().fg(THEME.text)),
                    Span::styled(format!(" ({})", chain.id), THEME.muted_style()),
                    deployed,
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(if focused {
                THEME.selected_style()
            } else {
                Style::default()
            });
        frame.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn render_address(&self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == Focus::AddressField;
        let block = Block::default()
            .title(" Contract Address ")
            .borders(Borders::ALL)
            .border_style(THEME.focus_border_style(focused));
        let inner = block.inner(area);
        let text = if self.address.is_empty() {
            Span::styled("0x...", THEME.muted_style())
        } else {
            Span::styled(self.address.value(), THEME.address_style())
        };
        frame.render_widget(Paragraph::new(text).block(block), area);

        if focused {
            let cursor_x = utils::cell_offset(inner.x, self.address.cursor());
            if cursor_x < inner.right() {
                frame.set_cursor_position((cursor_x, inner.y));
            }
        }
    }
}

impl Component for NetworkPanel {
    fn handle_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        match self.focus {
            Focus::ChainSelector => self.handle_selector_key(key),
            Focus::AddressField if self.is_connected() => match self.address.handle_key(key) {
                Edit::Changed => self.address_changed(),
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Network ")
            .borders(Borders::ALL)
            .border_style(THEME.border_style())
            .style(Style::default().bg(THEME.surface));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let wallet = match &self.connection {
            Connection::Disconnected | Connection::Connecting => {
                let label = if self.connection == Connection::Connecting {
                    "connecting"
                } else {
                    "Connect Wallet"
                };
                let style = if self.focus == Focus::ChainSelector {
                    THEME.selected_style()
                } else {
                    THEME.accent_style()
                };
                let button = Paragraph::new(vec![
                    Line::from(""),
                    Line::from(Span::styled(format!("[ {label} ]"), style)),
                    Line::from(Span::styled("Enter / c", THEME.muted_style())),
                ])
                .alignment(Alignment::Center);
                frame.render_widget(button, inner);
                return;
            }
            Connection::Connected(wallet) => wallet.clone(),
        };

        let endpoints: Vec<Line> = self
            .deployments
            .get(wallet.chain)
            .map(|d| {
                [("GraphQL", &d.graphql_api_url), ("Inspect", &d.inspect_api_url)]
                    .into_iter()
                    .filter_map(|(name, url)| {
                        let url = url.as_deref()?;
                        Some(Line::from(vec![
                            Span::styled(format!(" {name}: "), THEME.muted_style()),
                            Span::styled(url.to_string(), Style::default().fg(THEME.text)),
                        ]))
                    })
                    .collect()
            })
            .unwrap_or_default();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(endpoints.len() as u16),
                Constraint::Min(3),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(inner);

        let account = Line::from(vec![
            Span::styled(" Account: ", THEME.muted_style()),
            Span::styled(utils::truncate_address(&wallet.address), THEME.address_style()),
            Span::styled("  on ", THEME.muted_style()),
            Span::styled(self.chain_label(wallet.chain), THEME.accent_style()),
        ]);
        frame.render_widget(Paragraph::new(account), chunks[0]);
        frame.render_widget(Paragraph::new(endpoints), chunks[1]);

        self.render_chain_list(frame, chunks[2]);
        self.render_address(frame, chunks[3]);

        let disconnect = Line::from(vec![
            Span::styled(" [ Disconnect Wallet ]", THEME.error_style()),
            Span::styled(" d", THEME.muted_style()),
        ]);
        frame.render_widget(Paragraph::new(disconnect), chunks[4]);
    }
}
