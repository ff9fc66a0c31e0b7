use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "input-tui",
    about = "Terminal front end for sending JSON inputs to a rollup dApp"
)]
pub struct Config {
    /// Deployments file mapping chain ids to dApp / InputBox addresses
    #[arg(long)]
    pub deployments: Option<PathBuf>,

    /// Chain to connect to (preset name or chain id)
    #[arg(long, default_value = "localhost")]
    pub chain: String,

    /// RPC endpoint URL overriding the chain's default
    #[arg(short, long, env = "RPC_URL")]
    pub rpc_url: Option<String>,

    /// Hex private key used to sign input transactions
    #[arg(long, env = "PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    /// Contract (dApp) address to send inputs to
    #[arg(short, long)]
    pub dapp_address: Option<String>,

    /// JSON file to load into the input buffer at start-up
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Tick rate in milliseconds for UI refresh
    #[arg(long, default_value = "100")]
    pub tick_rate_ms: u64,

    /// Log file (defaults to the user data directory)
    #[arg(long, env = "INPUT_TUI_LOG")]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["input-tui"]).unwrap();
        assert_eq!(config.chain, "localhost");
        assert_eq!(config.tick_rate_ms, 100);
        assert!(config.deployments.is_none());
        assert!(config.file.is_none());
    }

    #[test]
    fn test_flags() {
        let config = Config::try_parse_from([
            "input-tui",
            "--chain",
            "137",
            "--dapp-address",
            "0xab7528bb862fB57E8A2BCd567a2e929a0Be56a5e",
            "--file",
            "payload.json",
            "--deployments",
            "config.json",
        ])
        .unwrap();
        assert_eq!(config.chain, "137");
        assert_eq!(
            config.dapp_address.as_deref(),
            Some("0xab7528bb862fB57E8A2BCd567a2e929a0Be56a5e")
        );
        assert_eq!(config.file, Some(PathBuf::from("payload.json")));
        assert_eq!(config.deployments, Some(PathBuf::from("config.json")));
    }
}
