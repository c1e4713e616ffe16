//! # Cluster Resolution
//!
//! Picks a Solana cluster from process configuration and derives the
//! endpoints that hang off it (RPC, websocket, explorer links).
//!
//! Resolution is a pure function of configuration: an explicit RPC URL wins
//! and the cluster is inferred from it; otherwise a configured cluster name
//! is used; otherwise devnet. Unrecognized input falls back to devnet, the
//! network this dashboard targets.

use std::fmt;

/// Solana cluster selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cluster {
    /// Solana mainnet-beta (production network)
    MainnetBeta,
    /// Solana devnet (test network)
    Devnet,
    /// Solana testnet (staging network)
    Testnet,
    /// Local test validator
    Localnet,
}

impl Cluster {
    /// Resolve a cluster from an optional explicit RPC URL and an optional
    /// cluster name. The URL wins when both are present.
    pub fn resolve(rpc_url: Option<&str>, name: Option<&str>) -> Self {
        match (rpc_url, name) {
            (Some(url), _) => Self::from_url(url),
            (None, Some(name)) => Self::from_name(name),
            (None, None) => Cluster::Devnet,
        }
    }

    /// Infer the cluster from an RPC endpoint URL.
    ///
    /// Local validator URLs are recognized by host; anything else
    /// unrecognized is treated as devnet.
    pub fn from_url(url: &str) -> Self {
        if url.contains("mainnet") {
            Cluster::MainnetBeta
        } else if url.contains("devnet") {
            Cluster::Devnet
        } else if url.contains("testnet") {
            Cluster::Testnet
        } else if url.contains("localhost") || url.contains("127.0.0.1") {
            Cluster::Localnet
        } else {
            Cluster::Devnet
        }
    }

    /// Parse a cluster name; unrecognized names fall back to devnet.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "mainnet-beta" | "mainnet" => Cluster::MainnetBeta,
            "devnet" => Cluster::Devnet,
            "testnet" => Cluster::Testnet,
            "localnet" | "localhost" => Cluster::Localnet,
            _ => Cluster::Devnet,
        }
    }

    /// Canonical cluster name, as used in explorer URLs.
    pub fn name(&self) -> &'static str {
        match self {
            Cluster::MainnetBeta => "mainnet-beta",
            Cluster::Devnet => "devnet",
            Cluster::Testnet => "testnet",
            Cluster::Localnet => "localnet",
        }
    }

    /// Default public RPC endpoint for this cluster.
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Cluster::MainnetBeta => "https://api.mainnet-beta.solana.com",
            Cluster::Devnet => "https://api.devnet.solana.com",
            Cluster::Testnet => "https://api.testnet.solana.com",
            Cluster::Localnet => "http://127.0.0.1:8899",
        }
    }

    /// Whether test-only features (airdrops) are available.
    pub fn is_devnet(&self) -> bool {
        matches!(self, Cluster::Devnet)
    }

    /// Derive the websocket endpoint from an RPC endpoint.
    ///
    /// Scheme maps http(s) -> ws(s); local validators serve pubsub on the
    /// RPC port + 1.
    pub fn ws_url(rpc_url: &str) -> String {
        let ws = if let Some(rest) = rpc_url.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = rpc_url.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            rpc_url.to_string()
        };
        ws.replace(":8899", ":8900")
    }

    /// Explorer URL for a transaction signature on this cluster.
    pub fn explorer_tx_url(&self, signature: &str) -> String {
        format!(
            "https://explorer.solana.com/tx/{signature}?cluster={}",
            self.name()
        )
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_url() {
        assert_eq!(
            Cluster::from_url("https://api.mainnet-beta.solana.com"),
            Cluster::MainnetBeta
        );
        assert_eq!(
            Cluster::from_url("https://api.devnet.solana.com"),
            Cluster::Devnet
        );
        assert_eq!(
            Cluster::from_url("https://api.testnet.solana.com"),
            Cluster::Testnet
        );
        assert_eq!(Cluster::from_url("http://127.0.0.1:8899"), Cluster::Localnet);
        assert_eq!(Cluster::from_url("http://localhost:8899"), Cluster::Localnet);
        // Unrecognized endpoints fall back to devnet.
        assert_eq!(Cluster::from_url("https://rpc.example.com"), Cluster::Devnet);
    }

    #[test]
    fn test_from_name_falls_back_to_devnet() {
        assert_eq!(Cluster::from_name("mainnet-beta"), Cluster::MainnetBeta);
        assert_eq!(Cluster::from_name("MAINNET"), Cluster::MainnetBeta);
        assert_eq!(Cluster::from_name("testnet"), Cluster::Testnet);
        assert_eq!(Cluster::from_name("localnet"), Cluster::Localnet);
        assert_eq!(Cluster::from_name("garbage"), Cluster::Devnet);
        assert_eq!(Cluster::from_name(""), Cluster::Devnet);
    }

    #[test]
    fn test_resolve_url_wins_over_name() {
        assert_eq!(
            Cluster::resolve(Some("https://api.testnet.solana.com"), Some("mainnet-beta")),
            Cluster::Testnet
        );
        assert_eq!(Cluster::resolve(None, Some("mainnet")), Cluster::MainnetBeta);
        assert_eq!(Cluster::resolve(None, None), Cluster::Devnet);
    }

    #[test]
    fn test_ws_url() {
        assert_eq!(
            Cluster::ws_url("https://api.devnet.solana.com"),
            "wss://api.devnet.solana.com"
        );
        assert_eq!(
            Cluster::ws_url("http://127.0.0.1:8899"),
            "ws://127.0.0.1:8900"
        );
    }

    #[test]
    fn test_explorer_tx_url() {
        assert_eq!(
            Cluster::Devnet.explorer_tx_url("5sig"),
            "https://explorer.solana.com/tx/5sig?cluster=devnet"
        );
    }
}
