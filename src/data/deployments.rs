use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use alloy::primitives::{Address, address};
use serde::Deserialize;

use crate::data::types::{ChainId, ParseChainIdError};

/// Built-in table used when no `--deployments` file is given.
const DEFAULT_DEPLOYMENTS: &str = include_str!("deployments.json");

/// Cartesi rollups v1 InputBox, deployed at the same address on every chain.
pub const DEFAULT_INPUT_BOX: Address = address!("59b22D57D4f067708AB0c00552767405926dc768");

#[derive(Debug, thiserror::Error)]
pub enum DeploymentError {
    #[error("failed to read deployments file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid deployments JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("deployments key is not a chain id: {0}")]
    ChainId(#[from] ParseChainIdError),
    #[error("chain {0} is listed more than once in the deployments table")]
    DuplicateChain(ChainId),
}

/// Per-network deployment parameters, in the key style of Cartesi front-end configs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Deployment {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, rename = "rpcUrl")]
    pub rpc_url: Option<String>,
    #[serde(default, rename = "DAppAddress")]
    pub dapp_address: Option<Address>,
    #[serde(default, rename = "InputBoxAddress")]
    pub input_box_address: Option<Address>,
    #[serde(default, rename = "graphqlAPIURL")]
    pub graphql_api_url: Option<String>,
    #[serde(default, rename = "inspectAPIURL")]
    pub inspect_api_url: Option<String>,
}

impl Deployment {
    pub fn input_box(&self) -> Address {
        self.input_box_address.unwrap_or(DEFAULT_INPUT_BOX)
    }
}

/// Immutable chain id -> deployment lookup, loaded once at start-up.
#[derive(Debug, Clone, Default)]
pub struct DeploymentTable {
    entries: BTreeMap<ChainId, Deployment>,
}

impl DeploymentTable {
    pub fn from_json(json: &str) -> Result<Self, DeploymentError> {
        let raw: BTreeMap<String, Deployment> = serde_json::from_str(json)?;
        let mut entries = BTreeMap::new();
        for (key, deployment) in raw {
            let chain = key.parse::<ChainId>()?;
            if entries.insert(chain, deployment).is_some() {
                return Err(DeploymentError::DuplicateChain(chain));
            }
        }
        Ok(Self { entries })
    }

    pub fn load(path: &Path) -> Result<Self, DeploymentError> {
        let json = fs::read_to_string(path).map_err(|source| DeploymentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn builtin() -> Result<Self, DeploymentError> {
        Self::from_json(DEFAULT_DEPLOYMENTS)
    }

    pub fn contains(&self, chain: ChainId) -> bool {
        self.entries.contains_key(&chain)
    }

    pub fn get(&self, chain: ChainId) -> Option<&Deployment> {
        self.entries.get(&chain)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ChainId, &Deployment)> {
        self.entries.iter().map(|(id, d)| (*id, d))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership() {
        let table = DeploymentTable::from_json(r#"{"1": {}, "137": {}}"#).unwrap();
        assert!(table.contains(ChainId(1)));
        assert!(table.contains(ChainId(137)));
        assert!(!table.contains(ChainId(999)));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_hex_keys_normalized() {
        let table = DeploymentTable::from_json(r#"{"0x7a69": {"label": "localhost"}}"#).unwrap();
        assert!(table.contains(ChainId(31337)));
        assert_eq!(
            table.get(ChainId(31337)).unwrap().label.as_deref(),
            Some("localhost")
        );
    }

    #[test]
    fn test_cartesi_style_fields() {
        let json = r#"{
            "0xaa36a7": {
                "token": "ETH",
                "rpcUrl": "https://rpc.sepolia.org",
                "DAppAddress": "0xab7528bb862fB57E8A2BCd567a2e929a0Be56a5e",
                "graphqlAPIURL": "http://localhost:8080/graphql"
            }
        }"#;
        let table = DeploymentTable::from_json(json).unwrap();
        let deployment = table.get(ChainId(11155111)).unwrap();
        assert_eq!(deployment.rpc_url.as_deref(), Some("https://rpc.sepolia.org"));
        assert_eq!(
            deployment.dapp_address,
            Some(address!("ab7528bb862fB57E8A2BCd567a2e929a0Be56a5e"))
        );
        assert_eq!(deployment.input_box(), DEFAULT_INPUT_BOX);
        assert!(deployment.inspect_api_url.is_none());
    }

    #[test]
    fn test_input_box_override() {
        let json = r#"{"1": {"InputBoxAddress": "0x0000000000000000000000000000000000000001"}}"#;
        let table = DeploymentTable::from_json(json).unwrap();
        assert_eq!(
            table.get(ChainId(1)).unwrap().input_box(),
            Address::with_last_byte(1)
        );
    }

    #[test]
    fn test_invalid_key() {
        let err = DeploymentTable::from_json(r#"{"mainnet": {}}"#).unwrap_err();
        assert!(matches!(err, DeploymentError::ChainId(_)));
    }

    #[test]
    fn test_duplicate_chain_rejected() {
        let err = DeploymentTable::from_json(r#"{"1": {}, "0x1": {}}"#).unwrap_err();
        assert!(matches!(err, DeploymentError::DuplicateChain(ChainId(1))));
    }

    #[test]
    fn test_invalid_json() {
        let err = DeploymentTable::from_json("not json").unwrap_err();
        assert!(matches!(err, DeploymentError::Json(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = DeploymentTable::load(Path::new("/nonexistent/deployments.json")).unwrap_err();
        assert!(matches!(err, DeploymentError::Read { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"137": {"label": "Polygon"}}"#).unwrap();
        let table = DeploymentTable::load(&path).unwrap();
        assert!(table.contains(ChainId(137)));
    }

    #[test]
    fn test_builtin_table() {
        let table = DeploymentTable::builtin().unwrap();
        assert!(table.contains(ChainId(31337)));
        assert!(!table.is_empty());
    }
}
