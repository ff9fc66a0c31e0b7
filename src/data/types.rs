use std::fmt;
use std::str::FromStr;

use alloy::primitives::{Address, B256, U256};
use chrono::{DateTime, Local};

/// EVM chain identifier. Accepts decimal (`137`) or hex (`0x89`) text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChainId(pub u64);

impl ChainId {
    pub fn to_hex(self) -> String {
        format!("{:#x}", self.0)
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid chain id '{0}'")]
pub struct ParseChainIdError(pub String);

impl FromStr for ChainId {
    type Err = ParseChainIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parsed = match trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            Some(hex) => u64::from_str_radix(hex, 16),
            None => trimmed.parse::<u64>(),
        };
        parsed
            .map(ChainId)
            .map_err(|_| ParseChainIdError(s.to_string()))
    }
}

/// A network the wallet can switch to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainInfo {
    pub id: ChainId,
    pub label: String,
    pub rpc_url: String,
}

/// Connected account and the chain it is currently on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletInfo {
    pub address: Address,
    pub chain: ChainId,
}

/// A payload accepted by the input box.
#[derive(Debug, Clone)]
pub struct Submission {
    pub tx_hash: B256,
    pub input_index: Option<U256>,
    pub payload_len: usize,
    pub sent_at: DateTime<Local>,
}
