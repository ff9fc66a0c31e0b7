pub mod chains;
pub mod connector;
pub mod deployments;
pub mod payload;
pub mod provider;
pub mod types;

use std::str::FromStr;
use std::sync::Arc;

use alloy::primitives::{Address, Bytes};
use tokio::sync::mpsc;

use crate::data::connector::{InputSubmitter, WalletConnector};
use crate::data::types::{ChainId, ChainInfo};
use crate::events::AppEvent;

/// Runs wallet and contract calls in the background, posting one `AppEvent` per call.
pub struct WalletService<C> {
    connector: Arc<C>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl<C> WalletService<C>
where
    C: WalletConnector + InputSubmitter,
{
    pub fn new(connector: Arc<C>, event_tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self {
            connector,
            event_tx,
        }
    }

    pub fn chains(&self) -> Vec<ChainInfo> {
        self.connector.chains()
    }

    pub fn connect(&self) {
        let connector = Arc::clone(&self.connector);
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            match connector.connect().await {
                Ok(wallet) => {
                    let _ = tx.send(AppEvent::WalletConnected(wallet));
                }
                Err(e) => {
                    tracing::error!(error = %e, "wallet connection failed");
                    let _ = tx.send(AppEvent::WalletConnectFailed(format!(
                        "Failed to connect wallet: {e}"
                    )));
                }
            }
        });
    }

    pub fn disconnect(&self) {
        let connector = Arc::clone(&self.connector);
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            if let Err(e) = connector.disconnect().await {
                tracing::warn!(error = %e, "wallet disconnect reported an error");
            }
            let _ = tx.send(AppEvent::WalletDisconnected);
        });
    }

    pub fn switch_chain(&self, chain: ChainId) {
        let connector = Arc::clone(&self.connector);
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            match connector.switch_chain(chain).await {
                Ok(active) => {
                    let _ = tx.send(AppEvent::ChainSwitched(active));
                }
                Err(e) => {
                    tracing::error!(%chain, error = %e, "chain switch failed");
                    let _ = tx.send(AppEvent::ChainSwitchFailed(format!(
                        "Failed to switch to chain {chain}: {e}"
                    )));
                }
            }
        });
    }

    /// Submit `payload` to the input box for the dapp named by `dapp_address`.
    ///
    /// The address text comes straight from the user; a value that does not parse fails
    /// the submission without reaching the contract.
    pub fn submit(&self, dapp_address: &str, payload: Bytes) {
        let tx = self.event_tx.clone();
        let dapp = match Address::from_str(dapp_address.trim()) {
            Ok(dapp) => dapp,
            Err(e) => {
                tracing::error!(dapp_address, error = %e, "rejected contract address");
                let _ = tx.send(AppEvent::SubmissionFailed {
                    error: format!("Invalid contract address '{dapp_address}': {e}"),
                    payload,
                });
                return;
            }
        };

        let connector = Arc::clone(&self.connector);
        tokio::spawn(async move {
            match connector.add_input(dapp, payload.clone()).await {
                Ok(submission) => {
                    tracing::info!(%dapp, tx_hash = %submission.tx_hash, "input submitted");
                    let _ = tx.send(AppEvent::InputSubmitted(submission));
                }
                Err(e) => {
                    tracing::error!(%dapp, error = %e, "input submission failed");
                    let _ = tx.send(AppEvent::SubmissionFailed {
                        error: format!("Failed to send input: {e}"),
                        payload,
                    });
                }
            }
        });
    }
}


#[cfg(test)]
mod tests {
    use super::fake::FakeWallet;
    use super::*;

    fn service(wallet: FakeWallet) -> (
        WalletService<FakeWallet>,
        Arc<FakeWallet>,
        mpsc::UnboundedReceiver<AppEvent>,
    ) {
        let wallet = Arc::new(wallet);
        let (tx, rx) = mpsc::unbounded_channel();
        (WalletService::new(Arc::clone(&wallet), tx), wallet, rx)
    }

    const DAPP: &str = "0xab7528bb862fB57E8A2BCd567a2e929a0Be56a5e";

    #[tokio::test]
    async fn test_connect_posts_wallet() {
        let (service, _, mut rx) = service(FakeWallet::with_chains(&[31337, 1]));
        service.connect();
        match rx.recv().await {
            Some(AppEvent::WalletConnected(info)) => assert_eq!(info.chain, ChainId(31337)),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connect_failure() {
        let wallet = FakeWallet {
            fail_connect: true,
            ..FakeWallet::with_chains(&[1])
        };
        let (service, _, mut rx) = service(wallet);
        service.connect();
        match rx.recv().await {
            Some(AppEvent::WalletConnectFailed(msg)) => assert!(msg.contains("user rejected")),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_disconnect() {
        let (service, _, mut rx) = service(FakeWallet::with_chains(&[1]));
        service.disconnect();
        assert!(matches!(rx.recv().await, Some(AppEvent::WalletDisconnected)));
    }

    #[tokio::test]
    async fn test_switch_chain_issues_one_request() {
        let (service, wallet, mut rx) = service(FakeWallet::with_chains(&[1, 137]));
        service.switch_chain(ChainId(137));
        assert!(matches!(
            rx.recv().await,
            Some(AppEvent::ChainSwitched(ChainId(137)))
        ));
        assert_eq!(wallet.switch_requests(), vec![ChainId(137)]);
    }

    #[tokio::test]
    async fn test_switch_chain_failure() {
        let wallet = FakeWallet {
            fail_switch: true,
            ..FakeWallet::with_chains(&[1, 137])
        };
        let (service, _, mut rx) = service(wallet);
        service.switch_chain(ChainId(137));
        match rx.recv().await {
            Some(AppEvent::ChainSwitchFailed(msg)) => assert!(msg.contains("137")),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_submit_sends_payload() {
        let (service, wallet, mut rx) = service(FakeWallet::with_chains(&[1]));
        service.submit(DAPP, Bytes::from_static(br#"{"a":1}"#));
        assert!(matches!(rx.recv().await, Some(AppEvent::InputSubmitted(_))));
        let submissions = wallet.submissions();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].0, Address::from_str(DAPP).unwrap());
        assert_eq!(&submissions[0].1[..], br#"{"a":1}"#);
    }

    #[tokio::test]
    async fn test_submit_failure_returns_payload() {
        let wallet = FakeWallet {
            fail_submit: true,
            ..FakeWallet::with_chains(&[1])
        };
        let (service, _, mut rx) = service(wallet);
        service.submit(DAPP, Bytes::from_static(b"[]"));
        match rx.recv().await {
            Some(AppEvent::SubmissionFailed { error, payload }) => {
                assert!(error.contains("execution reverted"));
                assert_eq!(&payload[..], b"[]");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_submit_invalid_address_skips_contract() {
        let (service, wallet, mut rx) = service(FakeWallet::with_chains(&[1]));
        service.submit("not an address", Bytes::from_static(b"{}"));
        match rx.recv().await {
            Some(AppEvent::SubmissionFailed { error, .. }) => {
                assert!(error.contains("Invalid contract address"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(wallet.submissions().is_empty());
    }
}
