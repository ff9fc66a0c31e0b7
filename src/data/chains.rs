use crate::data::deployments::DeploymentTable;
use crate::data::types::{ChainId, ChainInfo};

fn preset(id: u64, label: &str, rpc_url: &str) -> ChainInfo {
    ChainInfo {
        id: ChainId(id),
        label: label.to_string(),
        rpc_url: rpc_url.to_string(),
    }
}

/// Networks the local wallet knows about out of the box.
pub fn presets() -> Vec<ChainInfo> {
    vec![
        preset(1, "Ethereum", "https://eth.merkle.io"),
        preset(11155111, "Sepolia", "https://rpc.sepolia.org"),
        preset(10, "Optimism", "https://mainnet.optimism.io"),
        preset(8453, "Base", "https://mainnet.base.org"),
        preset(137, "Polygon", "https://polygon-rpc.com"),
        preset(42161, "Arbitrum One", "https://arb1.arbitrum.io/rpc"),
        preset(31337, "localhost", "http://localhost:8545"),
    ]
}

/// Get a chain preset by name or chain id.
pub fn find_preset(name: &str) -> Option<ChainInfo> {
    let chain = match name.to_lowercase().as_str() {
        "ethereum" | "eth" | "mainnet" => ChainId(1),
        "sepolia" => ChainId(11155111),
        "optimism" | "op" => ChainId(10),
        "base" => ChainId(8453),
        "polygon" | "matic" => ChainId(137),
        "arbitrum" | "arb" => ChainId(42161),
        "localhost" | "local" | "anvil" => ChainId(31337),
        other => other.parse::<ChainId>().ok()?,
    };
    presets().into_iter().find(|c| c.id == chain)
}

/// The wallet's chain list: presets, with deployment entries overriding or extending them.
pub fn available_chains(deployments: &DeploymentTable) -> Vec<ChainInfo> {
    let mut chains = presets();
    for (id, deployment) in deployments.iter() {
        match chains.iter_mut().find(|c| c.id == id) {
            Some(chain) => {
                if let Some(rpc_url) = &deployment.rpc_url {
                    chain.rpc_url = rpc_url.clone();
                }
                if let Some(label) = &deployment.label {
                    chain.label = label.clone();
                }
            }
            None => {
                if let Some(rpc_url) = &deployment.rpc_url {
                    chains.push(ChainInfo {
                        id,
                        label: deployment.label.clone().unwrap_or_else(|| id.to_hex()),
                        rpc_url: rpc_url.clone(),
                    });
                }
            }
        }
    }
    chains
}

/// Pick the chain named by `name` (preset alias, label or id) out of `chains`.
pub fn resolve_chain(name: &str, chains: &[ChainInfo]) -> Option<ChainId> {
    let wanted = find_preset(name)
        .map(|c| c.id)
        .or_else(|| name.parse::<ChainId>().ok());
    chains
        .iter()
        .find(|c| Some(c.id) == wanted || c.label.eq_ignore_ascii_case(name.trim()))
        .map(|c| c.id)
}
