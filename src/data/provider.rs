use std::sync::Arc;

use alloy::network::{EthereumWallet, ReceiptResponse, TransactionBuilder};
use alloy::primitives::{Address, Bytes};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::sol;
use alloy::sol_types::SolCall;
use alloy::transports::http::reqwest::Url;
use chrono::Local;
use color_eyre::eyre::{Result, WrapErr, bail, eyre};
use tokio::sync::RwLock;

use crate::data::connector::{InputSubmitter, WalletConnector};
use crate::data::deployments::{DEFAULT_INPUT_BOX, Deployment, DeploymentTable};
use crate::data::types::{ChainId, ChainInfo, Submission, WalletInfo};

sol! {
    interface IInputBox {
        event InputAdded(address indexed dapp, uint256 indexed inputIndex, address sender, bytes input);

        function addInput(address dapp, bytes calldata input) external returns (bytes32);
    }
}

type SharedProvider = Arc<dyn Provider + Send + Sync>;

struct Session {
    chain: ChainId,
    provider: SharedProvider,
}

/// A wallet backed by a local private key and one HTTP provider per active chain.
pub struct LocalWallet {
    signer: Option<PrivateKeySigner>,
    chains: Vec<ChainInfo>,
    deployments: Arc<DeploymentTable>,
    initial_chain: ChainId,
    session: RwLock<Option<Session>>,
}

impl LocalWallet {
    pub fn new(
        private_key: Option<&str>,
        chains: Vec<ChainInfo>,
        deployments: Arc<DeploymentTable>,
        initial_chain: ChainId,
    ) -> Result<Self> {
        let signer = private_key
            .map(|key| key.trim().parse::<PrivateKeySigner>())
            .transpose()
            .wrap_err("invalid private key")?;
        Ok(Self {
            signer,
            chains,
            deployments,
            initial_chain,
            session: RwLock::new(None),
        })
    }

    fn signer(&self) -> Result<PrivateKeySigner> {
        self.signer
            .clone()
            .ok_or_else(|| eyre!("No private key configured (set --private-key or PRIVATE_KEY)"))
    }

    /// Build a signing provider for `chain` and check the node agrees on the chain id.
    async fn open(&self, chain: ChainId) -> Result<SharedProvider> {
        let signer = self.signer()?;
        let info = self
            .chains
            .iter()
            .find(|c| c.id == chain)
            .ok_or_else(|| eyre!("Chain {chain} is not available in this wallet"))?;
        let url: Url = info
            .rpc_url
            .parse()
            .wrap_err_with(|| format!("invalid RPC URL {}", info.rpc_url))?;

        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .on_http(url);
        let reported = provider
            .get_chain_id()
            .await
            .wrap_err_with(|| format!("failed to reach {}", info.rpc_url))?;
        if reported != chain.0 {
            bail!(
                "RPC {} reports chain {reported}, expected {chain}",
                info.rpc_url
            );
        }
        Ok(Arc::new(provider))
    }

    async fn active_session(&self) -> Result<(ChainId, SharedProvider)> {
        let guard = self.session.read().await;
        let session = guard
            .as_ref()
            .ok_or_else(|| eyre!("Wallet is not connected"))?;
        Ok((session.chain, Arc::clone(&session.provider)))
    }
}

impl WalletConnector for LocalWallet {
    fn chains(&self) -> Vec<ChainInfo> {
        self.chains.clone()
    }

    async fn connect(&self) -> Result<WalletInfo> {
        let address = self.signer()?.address();
        let chain = self.initial_chain;
        let provider = self.open(chain).await?;
        *self.session.write().await = Some(Session { chain, provider });
        tracing::info!(%address, %chain, "wallet connected");
        Ok(WalletInfo { address, chain })
    }

    async fn disconnect(&self) -> Result<()> {
        self.session.write().await.take();
        tracing::info!("wallet disconnected");
        Ok(())
    }

    async fn switch_chain(&self, chain: ChainId) -> Result<ChainId> {
        self.active_session().await?;
        let provider = self.open(chain).await?;
        let mut session = self.session.write().await;
        if session.is_none() {
            bail!("Wallet was disconnected during the chain switch");
        }
        *session = Some(Session { chain, provider });
        tracing::info!(%chain, "switched chain");
        Ok(chain)
    }
}

impl InputSubmitter for LocalWallet {
    async fn add_input(&self, dapp: Address, payload: Bytes) -> Result<Submission> {
        let (chain, provider) = self.active_session().await?;
        let input_box = self
            .deployments
            .get(chain)
            .map(Deployment::input_box)
            .unwrap_or(DEFAULT_INPUT_BOX);
        let payload_len = payload.len();

        let call = IInputBox::addInputCall {
            dapp,
            input: payload,
        };
        let tx = TransactionRequest::default()
            .with_to(input_box)
            .with_input(call.abi_encode());

        let receipt = provider
            .send_transaction(tx)
            .await
            .wrap_err("failed to send addInput transaction")?
            .get_receipt()
            .await
            .wrap_err("failed to fetch addInput receipt")?;
        if !receipt.status() {
            bail!("addInput transaction {} reverted", receipt.transaction_hash);
        }

        let input_index = receipt
            .inner
            .logs()
            .iter()
            .find_map(|log| log.log_decode::<IInputBox::InputAdded>().ok())
            .map(|log| log.inner.data.inputIndex);

        Ok(Submission {
            tx_hash: receipt.transaction_hash,
            input_index,
            payload_len,
            sent_at: Local::now(),
        })
    }
}
