//! # Application Configuration
//!
//! This module manages application configuration loaded from environment
//! variables. All configuration is validated on startup to fail fast if
//! misconfigured.
//!
//! ## Recognized Variables
//!
//! - `RPC_URL` - optional explicit RPC endpoint, overrides the cluster default
//! - `CLUSTER` - optional network name (`mainnet-beta`, `devnet`, `testnet`,
//!   `localnet`); unrecognized names fall back to devnet
//! - `TRACKED_MINTS` - comma-separated mint addresses to display balances
//!   for; empty means no tokens are tracked
//!
//! ## Global Config Access
//!
//! Use [`core_config()`] to access the global configuration instance. The
//! config must be initialized once at application startup using
//! [`init_config()`].

use std::env;
use std::sync::OnceLock;

use crate::error::{AppError, Result};

/// Application configuration loaded from environment variables.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Explicit RPC endpoint URL; when set it overrides the cluster default.
    pub rpc_url: Option<String>,

    /// Named network to connect to when no explicit endpoint is given.
    pub cluster_name: Option<String>,

    /// Mint addresses whose token balances should be displayed.
    pub tracked_mints: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let rpc_url = env::var("RPC_URL").ok().filter(|url| !url.trim().is_empty());
        let cluster_name = env::var("CLUSTER")
            .ok()
            .filter(|name| !name.trim().is_empty());
        let tracked_mints =
            parse_tracked_mints(&env::var("TRACKED_MINTS").unwrap_or_default());

        Self {
            rpc_url,
            cluster_name,
            tracked_mints,
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.rpc_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(AppError::Config(format!(
                    "RPC_URL must be an http(s) endpoint, got '{url}'"
                )));
            }
        }

        for mint in &self.tracked_mints {
            let decoded = bs58::decode(mint)
                .into_vec()
                .map_err(|_| AppError::Config(format!("TRACKED_MINTS entry '{mint}' is not base58")))?;
            if decoded.len() != 32 {
                return Err(AppError::Config(format!(
                    "TRACKED_MINTS entry '{mint}' is not a 32-byte address"
                )));
            }
        }

        Ok(())
    }
}

/// Split a comma-separated mint list, dropping whitespace and empty segments.
pub fn parse_tracked_mints(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|mint| !mint.is_empty())
        .map(str::to_string)
        .collect()
}

/// Global configuration instance (initialized once at startup).
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Initialize the global configuration.
///
/// This should be called once at application startup, before any component
/// that needs configuration is used.
///
/// # Errors
///
/// Returns an error if validation fails or the config has already been
/// initialized.
pub fn init_config() -> Result<()> {
    let config = Config::from_env();
    config.validate()?;

    CONFIG
        .set(config)
        .map_err(|_| AppError::Config("Config has already been initialized".to_string()))
}

/// Get a reference to the global configuration.
///
/// # Panics
///
/// Panics if [`init_config()`] has not been called yet.
pub fn core_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Config must be initialized with init_config() before use")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tracked_mints_empty() {
        assert!(parse_tracked_mints("").is_empty());
        assert!(parse_tracked_mints(" , ,").is_empty());
    }

    #[test]
    fn test_parse_tracked_mints_trims_entries() {
        let mints = parse_tracked_mints(
            " 4zMMC9srt5Ri5X14GAgXhaHii3GnPAEERYPJgZJDncDU , EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
        );
        assert_eq!(
            mints,
            vec![
                "4zMMC9srt5Ri5X14GAgXhaHii3GnPAEERYPJgZJDncDU".to_string(),
                "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v".to_string(),
            ]
        );
    }

    #[test]
    fn test_validate_accepts_good_config() {
        let config = Config {
            rpc_url: Some("https://api.devnet.solana.com".to_string()),
            cluster_name: None,
            tracked_mints: vec!["4zMMC9srt5Ri5X14GAgXhaHii3GnPAEERYPJgZJDncDU".to_string()],
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let config = Config {
            rpc_url: Some("ftp://example.com".to_string()),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_mint() {
        let config = Config {
            tracked_mints: vec!["not-a-mint!".to_string()],
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            // Valid base58, wrong length.
            tracked_mints: vec!["abc".to_string()],
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
