use std::future::Future;

use alloy::primitives::{Address, Bytes};
use color_eyre::eyre::Result;

use crate::data::types::{ChainId, ChainInfo, Submission, WalletInfo};

/// Wallet capability the network panel drives: connection state and chain switching.
pub trait WalletConnector: Send + Sync + 'static {
    /// Chains the wallet is able to switch to.
    fn chains(&self) -> Vec<ChainInfo>;

    fn connect(&self) -> impl Future<Output = Result<WalletInfo>> + Send;

    fn disconnect(&self) -> impl Future<Output = Result<()>> + Send;

    /// Switch the connected wallet to `chain`, returning the chain it ended up on.
    fn switch_chain(&self, chain: ChainId) -> impl Future<Output = Result<ChainId>> + Send;
}

/// Contract binding that records payloads in the rollup input box.
pub trait InputSubmitter: Send + Sync + 'static {
    fn add_input(
        &self,
        dapp: Address,
        payload: Bytes,
    ) -> impl Future<Output = Result<Submission>> + Send;
}
