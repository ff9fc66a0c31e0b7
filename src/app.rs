use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::prelude::*;
use ratatui::widgets::*;
use tokio::sync::mpsc;

use crate::components::Component;
use crate::components::alert::AlertOverlay;
use crate::components::header::Header;
use crate::components::help::HelpOverlay;
use crate::components::input_panel::InputPanel;
use crate::components::network_panel::NetworkPanel;
use crate::components::status_bar::StatusBar;
use crate::data::WalletService;
use crate::data::connector::{InputSubmitter, WalletConnector};
use crate::data::deployments::DeploymentTable;
use crate::data::payload;
use crate::data::types::ChainId;
use crate::events::{AppEvent, Focus};
use crate::theme::THEME;

pub struct App<C> {
    // Components
    header: Header,
    network: NetworkPanel,
    input: InputPanel,
    status_bar: StatusBar,
    help: HelpOverlay,
    alert: AlertOverlay,
    focus: Focus,

    /// Contract address inputs are sent to, shared by both panels.
    dapp_address: String,

    // Data
    wallet_service: WalletService<C>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,

    // State
    should_quit: bool,
    tick_rate: Duration,
}

impl<C> App<C>
where
    C: WalletConnector + InputSubmitter,
{
    pub fn new(
        wallet_service: WalletService<C>,
        deployments: Arc<DeploymentTable>,
        dapp_address: String,
        event_tx: mpsc::UnboundedSender<AppEvent>,
        event_rx: mpsc::UnboundedReceiver<AppEvent>,
        tick_rate_ms: u64,
    ) -> Self {
        let header = Header::new(deployments.len());
        let network = NetworkPanel::new(wallet_service.chains(), deployments, &dapp_address);
        let mut app = Self {
            header,
            network,
            input: InputPanel::new(),
            status_bar: StatusBar::new(),
            help: HelpOverlay::new(),
            alert: AlertOverlay::new(),
            focus: Focus::ChainSelector,
            dapp_address,
            wallet_service,
            event_tx,
            event_rx,
            should_quit: false,
            tick_rate: Duration::from_millis(tick_rate_ms),
        };
        app.set_focus(Focus::ChainSelector);
        app
    }

    /// Load `path` into the input panel without any drop-text unquoting.
    pub fn load_path(&mut self, path: PathBuf) {
        if let Some(event) = self.input.drop_path(path) {
            self.handle_app_event(event);
        }
        self.sync_error_display();
    }

    pub async fn run(&mut self, mut terminal: ratatui::DefaultTerminal) -> color_eyre::Result<()> {
        let mut interval = tokio::time::interval(self.tick_rate);
        let mut events = EventStream::new();

        while !self.should_quit {
            tokio::select! {
                _ = interval.tick() => {
                    terminal.draw(|frame| self.render(frame))?;
                }
                Some(Ok(event)) = events.next() => {
                    self.handle_terminal_event(event);
                }
                Some(app_event) = self.event_rx.recv() => {
                    self.handle_app_event(app_event);
                }
            }
        }

        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        frame.render_widget(
            Block::default().style(Style::default().bg(THEME.bg)),
            area,
        );

        // Layout: header (1) | network | input | status bar (1)
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(38), Constraint::Percentage(62)])
            .split(rows[1]);

        self.header.render(frame, rows[0]);
        self.network.render(frame, columns[0]);
        self.input.render(frame, columns[1]);
        self.status_bar.render(frame, rows[2]);

        // Overlays
        self.help.render(frame, area);
        self.alert.render(frame, area);
    }

    fn handle_terminal_event(&mut self, event: Event) {
        match event {
            // Only handle key press events (not release/repeat) for cross-platform compat
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Paste(text) => self.handle_paste(&text),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        // Overlays consume all keys when visible
        if self.alert.handle_key(key) || self.help.handle_key(key) {
            return;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('s') if ctrl => {
                self.submit();
                return;
            }
            KeyCode::Char('r') if ctrl => {
                if self.input.restore_failed_payload() {
                    self.set_focus(Focus::Editor);
                }
                self.sync_error_display();
                return;
            }
            KeyCode::Tab => {
                self.cycle_focus(true);
                return;
            }
            KeyCode::BackTab => {
                self.cycle_focus(false);
                return;
            }
            KeyCode::F(1) => {
                self.help.toggle();
                return;
            }
            KeyCode::Char('?') if !self.focus.is_text_entry() => {
                self.help.toggle();
                return;
            }
            KeyCode::Char('q') if !self.focus.is_text_entry() => {
                self.should_quit = true;
                return;
            }
            _ => {}
        }

        let app_event = match self.focus {
            Focus::ChainSelector | Focus::AddressField => self.network.handle_key(key),
            Focus::DropZone | Focus::Editor => self.input.handle_key(key),
        };

        if let Some(event) = app_event {
            self.handle_app_event(event);
        }
        self.sync_error_display();
    }

    fn handle_paste(&mut self, text: &str) {
        let app_event = match self.focus {
            Focus::ChainSelector => {
                // A drop lands on the input panel wherever focus is.
                self.set_focus(Focus::DropZone);
                self.input.handle_paste(text)
            }
            Focus::AddressField => self.network.handle_paste(text),
            Focus::DropZone | Focus::Editor => self.input.handle_paste(text),
        };
        if let Some(event) = app_event {
            self.handle_app_event(event);
        }
        self.sync_error_display();
    }

    fn submit(&mut self) {
        if !self.input.wallet_ready {
            self.status_bar.warning = Some("Connect a wallet before sending".to_string());
            return;
        }
        if let Some(event) = self.input.submit() {
            self.handle_app_event(event);
        }
    }

    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Connect => {
                self.status_bar.clear_messages();
                self.status_bar.loading = Some("Connecting wallet");
                self.wallet_service.connect();
            }
            AppEvent::Disconnect => {
                self.wallet_service.disconnect();
            }
            AppEvent::SwitchChain(chain) => {
                self.status_bar.clear_messages();
                self.status_bar.loading = Some("Switching chain");
                self.wallet_service.switch_chain(chain);
            }
            AppEvent::DappAddressChanged(address) => {
                self.dapp_address = address;
            }
            AppEvent::ReadFile { seq, path } => {
                self.status_bar.loading = Some("Reading file");
                payload::spawn_read(path, seq, self.event_tx.clone());
            }
            AppEvent::SubmitInput(bytes) => {
                self.status_bar.loading = Some("Sending input");
                self.wallet_service.submit(&self.dapp_address, bytes);
            }
            AppEvent::WalletConnected(wallet) => {
                tracing::info!(account = %wallet.address, chain = %wallet.chain, "wallet connected");
                self.status_bar.loading = None;
                self.status_bar.connected = true;
                self.header.account = Some(wallet.address);
                let chain = wallet.chain;
                self.network.on_connected(wallet);
                self.input.wallet_ready = true;
                self.on_active_chain(chain);
            }
            AppEvent::WalletConnectFailed(msg) => {
                self.status_bar.loading = None;
                self.network.on_connect_failed();
                self.show_status_error(msg);
            }
            AppEvent::WalletDisconnected => {
                tracing::info!("wallet disconnected");
                self.network.on_disconnected();
                self.input.wallet_ready = false;
                self.status_bar.connected = false;
                self.status_bar.loading = None;
                self.header.account = None;
                self.header.chain_name = None;
                if self.focus == Focus::AddressField {
                    self.set_focus(Focus::ChainSelector);
                }
            }
            AppEvent::ChainSwitched(_) | AppEvent::ChainSwitchFailed(_)
                if !self.network.is_connected() =>
            {
                tracing::debug!("ignoring chain switch result after disconnect");
            }
            AppEvent::ChainSwitched(chain) => {
                tracing::info!(%chain, "chain switched");
                self.status_bar.loading = None;
                self.network.on_chain_switched(chain);
                self.on_active_chain(chain);
            }
            AppEvent::ChainSwitchFailed(msg) => {
                self.status_bar.loading = None;
                self.network.on_switch_failed();
                self.show_status_error(msg);
            }
            AppEvent::FileRead { seq, result } => {
                self.input.on_file_read(seq, result);
                if !self.input.loading {
                    self.status_bar.loading = None;
                }
            }
            AppEvent::InputSubmitted(submission) => {
                self.status_bar.loading = None;
                self.input.on_submitted(submission);
            }
            AppEvent::SubmissionFailed { error, payload } => {
                self.status_bar.loading = None;
                self.input.on_submission_failed(error, payload);
            }
            AppEvent::Alert(msg) => {
                self.status_bar.warning = Some(msg.clone());
                self.alert.show(msg);
            }
        }
        self.sync_error_display();
    }

    fn on_active_chain(&mut self, chain: ChainId) {
        self.header.chain_name = Some(self.network.chain_label(chain));
        if let Some(address) = self.network.adopt_deployment_address(chain) {
            tracing::debug!(%chain, dapp = %address, "using deployed dapp address");
            self.dapp_address = address;
        }
    }

    fn show_status_error(&mut self, msg: String) {
        self.input.error = None;
        self.status_bar.error_message = Some(msg);
    }

    /// Only one error is on screen at a time; the most recent one wins.
    fn sync_error_display(&mut self) {
        if self.input.error.is_some() {
            self.status_bar.error_message = None;
        }
    }

    fn cycle_focus(&mut self, forward: bool) {
        let mut focus = self.focus;
        loop {
            focus = if forward { focus.next() } else { focus.prev() };
            if focus != Focus::AddressField || self.network.is_connected() {
                break;
            }
        }
        self.set_focus(focus);
    }

    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.network.focus = focus;
        self.input.focus = focus;
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use alloy::primitives::Address;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::components::network_panel::NO_DEPLOYMENT_MESSAGE;
    use crate::data::fake::FakeWallet;

    const DAPP_1: &str = "0x70ac08179605af2d9e75782b8decdd3c22aa4d0c";
    const DAPP_137: &str = "0xab7528bb862fb57e8a2bcd567a2e929a0be56a5e";
    const DEPLOYMENTS: &str = r#"{
        "0x1": { "DAppAddress": "0x70ac08179605af2d9e75782b8decdd3c22aa4d0c" },
        "0x89": { "DAppAddress": "0xab7528bb862fb57e8a2bcd567a2e929a0be56a5e" }
    }"#;

    fn app_with(wallet: FakeWallet, dapp_address: &str) -> (App<FakeWallet>, Arc<FakeWallet>) {
        let wallet = Arc::new(wallet);
        let deployments = Arc::new(DeploymentTable::from_json(DEPLOYMENTS).unwrap());
        let (tx, rx) = mpsc::unbounded_channel();
        let service = WalletService::new(Arc::clone(&wallet), tx.clone());
        let app = App::new(service, deployments, dapp_address.to_string(), tx, rx, 100);
        (app, wallet)
    }

    fn app() -> (App<FakeWallet>, Arc<FakeWallet>) {
        app_with(FakeWallet::with_chains(&[1, 137, 999]), "")
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    /// Feed the next background result back into the app.
    async fn pump(app: &mut App<FakeWallet>) {
        let event = app.event_rx.recv().await.unwrap();
        app.handle_app_event(event);
    }

    async fn connected() -> (App<FakeWallet>, Arc<FakeWallet>) {
        let (mut app, wallet) = app();
        app.handle_terminal_event(key(KeyCode::Enter));
        pump(&mut app).await;
        assert!(app.network.is_connected());
        (app, wallet)
    }

    fn json_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_connect_adopts_deployment_address() {
        let (app, _) = connected().await;
        assert_eq!(app.network.active_chain(), Some(ChainId(1)));
        assert!(app.dapp_address.eq_ignore_ascii_case(DAPP_1));
        assert!(app.input.wallet_ready);
        assert!(app.status_bar.connected);
        assert_eq!(app.header.chain_name.as_deref(), Some("chain-1"));
    }

    #[tokio::test]
    async fn test_connect_failure_is_visible() {
        let wallet = FakeWallet {
            fail_connect: true,
            ..FakeWallet::with_chains(&[1])
        };
        let (mut app, _) = app_with(wallet, "");
        app.handle_terminal_event(key(KeyCode::Enter));
        pump(&mut app).await;
        assert!(!app.network.is_connected());
        assert!(app.status_bar.error_message.is_some());
    }

    #[tokio::test]
    async fn test_unconfigured_chain_alerts_without_switch() {
        let (mut app, wallet) = connected().await;
        // chain-999 is last in the list
        app.handle_terminal_event(key(KeyCode::Down));
        app.handle_terminal_event(key(KeyCode::Down));
        app.handle_terminal_event(key(KeyCode::Enter));

        assert_eq!(app.alert.message.as_deref(), Some(NO_DEPLOYMENT_MESSAGE));
        assert_eq!(app.network.active_chain(), Some(ChainId(1)));
        assert!(!app.network.switching);
        assert!(wallet.switch_requests().is_empty());

        // The alert swallows the next key press.
        app.handle_terminal_event(key(KeyCode::Enter));
        assert!(!app.alert.visible());
    }

    #[tokio::test]
    async fn test_configured_chain_switches_once() {
        let (mut app, wallet) = connected().await;
        app.handle_terminal_event(key(KeyCode::Down));
        app.handle_terminal_event(key(KeyCode::Enter));
        assert!(app.network.switching);

        // Keys are ignored while the switch is in flight.
        app.handle_terminal_event(key(KeyCode::Enter));

        pump(&mut app).await;
        assert!(!app.network.switching);
        assert_eq!(wallet.switch_requests(), vec![ChainId(137)]);
        assert_eq!(app.network.active_chain(), Some(ChainId(137)));
        assert!(app.dapp_address.eq_ignore_ascii_case(DAPP_137));
    }

    #[tokio::test]
    async fn test_switch_result_after_disconnect_is_ignored() {
        let (mut app, _) = connected().await;
        app.handle_terminal_event(key(KeyCode::Down));
        app.handle_terminal_event(key(KeyCode::Enter));
        assert!(app.network.switching);

        // Disconnect is held back until the switch settles.
        app.handle_terminal_event(key(KeyCode::Char('d')));
        assert!(app.network.is_connected());

        app.handle_app_event(AppEvent::WalletDisconnected);
        app.handle_app_event(AppEvent::ChainSwitched(ChainId(137)));
        assert!(!app.network.is_connected());
        assert!(app.header.chain_name.is_none());
        assert!(app.header.account.is_none());
        assert!(app.dapp_address.eq_ignore_ascii_case(DAPP_1));

        app.handle_app_event(AppEvent::ChainSwitchFailed("late".to_string()));
        assert!(app.status_bar.error_message.is_none());
    }

    #[tokio::test]
    async fn test_manual_address_survives_switch() {
        let (mut app, _) = app_with(FakeWallet::with_chains(&[1, 137]), "0xdead");
        app.handle_terminal_event(key(KeyCode::Enter));
        pump(&mut app).await;
        app.handle_terminal_event(key(KeyCode::Down));
        app.handle_terminal_event(key(KeyCode::Enter));
        pump(&mut app).await;
        assert_eq!(app.dapp_address, "0xdead");
    }

    #[tokio::test]
    async fn test_address_field_edits_shared_address() {
        let (mut app, _) = connected().await;
        app.handle_terminal_event(key(KeyCode::Tab));
        assert_eq!(app.focus, Focus::AddressField);
        app.handle_terminal_event(key(KeyCode::Backspace));
        assert!(app.dapp_address.eq_ignore_ascii_case(&DAPP_1[..DAPP_1.len() - 1]));
    }

    #[tokio::test]
    async fn test_tab_skips_address_field_when_disconnected() {
        let (mut app, _) = app();
        app.handle_terminal_event(key(KeyCode::Tab));
        assert_eq!(app.focus, Focus::DropZone);
        app.handle_terminal_event(Event::Key(KeyEvent::new(
            KeyCode::BackTab,
            KeyModifiers::SHIFT,
        )));
        assert_eq!(app.focus, Focus::ChainSelector);
    }

    #[tokio::test]
    async fn test_drop_valid_json_fills_buffer() {
        let (mut app, _) = app();
        let file = json_file(r#"{"a":1}"#);
        app.handle_terminal_event(Event::Paste(file.path().display().to_string()));
        assert!(app.input.loading);
        assert_eq!(app.focus, Focus::DropZone);

        pump(&mut app).await;
        assert!(!app.input.loading);
        assert_eq!(app.input.buffer(), r#"{"a":1}"#);
        assert!(app.input.error.is_none());
        assert!(app.status_bar.loading.is_none());
    }

    #[tokio::test]
    async fn test_drop_invalid_json_keeps_buffer() {
        let (mut app, _) = app();
        let file = json_file("not json");
        app.load_path(file.path().to_path_buf());
        pump(&mut app).await;
        assert_eq!(app.input.buffer(), "");
        assert_eq!(
            app.input.error.as_deref(),
            Some("Invalid JSON file. Please upload a valid JSON.")
        );
    }

    #[tokio::test]
    async fn test_load_path_with_spaces() {
        let (mut app, _) = app();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("my input.json");
        std::fs::write(&path, r#"{"a":1}"#).unwrap();

        app.load_path(path);
        assert!(app.input.error.is_none());
        assert!(app.input.loading);

        pump(&mut app).await;
        assert_eq!(app.input.buffer(), r#"{"a":1}"#);
        assert!(app.input.error.is_none());
    }

    #[tokio::test]
    async fn test_submit_requires_wallet() {
        let (mut app, wallet) = app();
        let file = json_file("[1,2]");
        app.load_path(file.path().to_path_buf());
        pump(&mut app).await;

        app.handle_terminal_event(ctrl('s'));
        assert_eq!(app.input.buffer(), "[1,2]");
        assert!(app.status_bar.warning.is_some());
        assert!(wallet.submissions().is_empty());
    }

    #[tokio::test]
    async fn test_submit_success_clears_buffer() {
        let (mut app, wallet) = connected().await;
        let file = json_file(r#"{"a":1}"#);
        app.load_path(file.path().to_path_buf());
        pump(&mut app).await;

        app.handle_terminal_event(ctrl('s'));
        assert_eq!(app.input.buffer(), "");
        pump(&mut app).await;

        assert_eq!(app.input.submissions().len(), 1);
        let submissions = wallet.submissions();
        assert_eq!(
            submissions[0].0,
            DAPP_1.parse::<Address>().unwrap()
        );
        assert_eq!(&submissions[0].1[..], br#"{"a":1}"#);
    }

    #[tokio::test]
    async fn test_submit_failure_is_restorable() {
        let wallet = FakeWallet {
            fail_submit: true,
            ..FakeWallet::with_chains(&[1, 137])
        };
        let (mut app, _) = app_with(wallet, "");
        app.handle_terminal_event(key(KeyCode::Enter));
        pump(&mut app).await;

        let file = json_file(r#"{"b":2}"#);
        app.load_path(file.path().to_path_buf());
        pump(&mut app).await;

        app.handle_terminal_event(ctrl('s'));
        pump(&mut app).await;
        assert_eq!(app.input.buffer(), "");
        assert!(app.input.error.as_deref().unwrap().contains("execution reverted"));

        app.handle_terminal_event(ctrl('r'));
        assert_eq!(app.input.buffer(), r#"{"b":2}"#);
        assert!(app.input.error.is_none());
        assert_eq!(app.focus, Focus::Editor);
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let (mut app, _) = app();
        app.set_focus(Focus::Editor);
        app.handle_terminal_event(key(KeyCode::Char('q')));
        assert!(!app.should_quit);
        app.handle_terminal_event(ctrl('c'));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_render_switching_state() {
        let (mut app, _) = connected().await;
        app.handle_terminal_event(key(KeyCode::Down));
        app.handle_terminal_event(key(KeyCode::Enter));

        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        let buffer = terminal.backend().buffer();
        let content: String = buffer.content.iter().map(|cell| cell.symbol()).collect();
        assert!(content.contains("Switching chain..."));
    }
}
