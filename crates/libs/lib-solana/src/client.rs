//! # Solana RPC Client
//!
//! Provides a high-level wrapper around the Solana RPC client with cluster
//! management and the handful of queries the dashboard core needs.
//!
//! ## Features
//!
//! - **Cluster Selection**: Easy switching between mainnet, devnet, testnet
//!   and a local validator
//! - **Balance Queries**: Native (SOL) and parsed token account balances
//! - **Transaction Submission**: Send signed transactions and poll for
//!   confirmation against a freshness anchor
//! - **Airdrops**: Request test funds on devnet
//! - **Health Checks**: Verify RPC endpoint connectivity
//!
//! All methods are async and map failures into [`AppError`]. Missing
//! accounts are reported as `None` on the read paths rather than as errors,
//! so callers can render an empty state without special-casing.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use lib_core::config::Config;
use lib_core::error::{AppError, Result};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_commitment_config::CommitmentConfig;
use solana_program::program_pack::Pack;
use solana_sdk::{
    account::Account,
    hash::Hash,
    native_token::LAMPORTS_PER_SOL,
    pubkey::Pubkey,
    signature::Signature,
    transaction::Transaction,
};
use tracing::{debug, info};

use crate::cluster::Cluster;

/// Interval between confirmation status polls.
const CONFIRM_POLL_INTERVAL: Duration = Duration::from_millis(400);

/// Upper bound on finalization polls (roughly one minute).
const FINALIZE_MAX_POLLS: usize = 150;

/// Parsed balance of a token-holding account, as reported by the RPC node.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTokenAmount {
    /// Raw integer balance in base units.
    pub amount: u64,
    /// Decimal precision of the mint.
    pub decimals: u8,
    /// Human-readable amount (`amount / 10^decimals`).
    pub ui_amount: f64,
}

/// High-level Solana RPC client wrapper.
///
/// Wraps the official nonblocking `RpcClient` with cluster awareness and
/// error mapping. Construction is lazy - network requests only happen when
/// methods are called.
pub struct SolanaClient {
    rpc: Arc<RpcClient>,
    cluster: Cluster,
    url: String,
    commitment: CommitmentConfig,
}

/// Builder for configuring [`SolanaClient`].
#[derive(Debug, Clone, Default)]
pub struct SolanaClientBuilder {
    cluster: Option<Cluster>,
    rpc_url: Option<String>,
}

impl SolanaClientBuilder {
    /// Set the target cluster.
    pub fn cluster(mut self, cluster: Cluster) -> Self {
        self.cluster = Some(cluster);
        self
    }

    /// Set an explicit RPC URL (overrides the cluster default endpoint).
    pub fn rpc_url(mut self, url: impl Into<String>) -> Self {
        self.rpc_url = Some(url.into());
        self
    }

    /// Build the client with the configured settings.
    pub fn build(self) -> SolanaClient {
        let cluster = match (&self.rpc_url, self.cluster) {
            (_, Some(cluster)) => cluster,
            (Some(url), None) => Cluster::from_url(url),
            (None, None) => Cluster::Devnet,
        };
        let url = self
            .rpc_url
            .unwrap_or_else(|| cluster.default_rpc_url().to_string());

        info!("connecting to Solana RPC at {url} ({cluster})");

        let commitment = CommitmentConfig::confirmed();
        SolanaClient {
            rpc: Arc::new(RpcClient::new_with_commitment(url.clone(), commitment)),
            cluster,
            url,
            commitment,
        }
    }
}

impl SolanaClient {
    /// Create a client builder.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use lib_solana::client::SolanaClient;
    /// use lib_solana::cluster::Cluster;
    ///
    /// let client = SolanaClient::builder()
    ///     .cluster(Cluster::Devnet)
    ///     .build();
    /// ```
    pub fn builder() -> SolanaClientBuilder {
        SolanaClientBuilder::default()
    }

    /// Create a client from process configuration.
    ///
    /// An explicit `RPC_URL` wins and the cluster is inferred from it;
    /// otherwise the configured cluster name is used; otherwise devnet.
    pub fn from_config(config: &Config) -> Self {
        let cluster = Cluster::resolve(config.rpc_url.as_deref(), config.cluster_name.as_deref());
        let mut builder = Self::builder().cluster(cluster);
        if let Some(url) = &config.rpc_url {
            builder = builder.rpc_url(url.clone());
        }
        builder.build()
    }

    /// The cluster this client targets.
    pub fn cluster(&self) -> Cluster {
        self.cluster
    }

    /// The RPC endpoint URL this client targets.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch an account, mapping "does not exist" to `None`.
    async fn fetch_account(&self, account: &Pubkey) -> Result<Option<Account>> {
        let response = self
            .rpc
            .get_account_with_commitment(account, self.commitment)
            .await
            .map_err(|e| AppError::Network(format!("failed to fetch account {account}: {e}")))?;
        Ok(response.value)
    }

    /// Native balance of an account in SOL.
    ///
    /// Returns `None` when the account does not exist on-chain; callers
    /// render that as an unknown balance rather than an error.
    pub async fn native_balance(&self, account: &Pubkey) -> Result<Option<f64>> {
        Ok(self
            .fetch_account(account)
            .await?
            .map(|account| account.lamports as f64 / LAMPORTS_PER_SOL as f64))
    }

    /// Whether an account exists on-chain.
    pub async fn account_exists(&self, account: &Pubkey) -> Result<bool> {
        Ok(self.fetch_account(account).await?.is_some())
    }

    /// Decimal precision of a token mint.
    ///
    /// Fails with [`AppError::InvalidMint`] if the account does not exist or
    /// does not hold valid mint state.
    pub async fn mint_decimals(&self, mint: &Pubkey) -> Result<u8> {
        let account = self
            .fetch_account(mint)
            .await?
            .ok_or_else(|| AppError::InvalidMint(format!("mint account {mint} does not exist")))?;

        if account.owner != spl_token::id() {
            return Err(AppError::InvalidMint(format!(
                "{mint} is not owned by the token program"
            )));
        }

        let mint_state = spl_token::state::Mint::unpack(&account.data)
            .map_err(|_| AppError::InvalidMint(format!("{mint} is not a valid token mint")))?;

        Ok(mint_state.decimals)
    }

    /// Parsed balance of a token-holding account.
    ///
    /// Returns `None` when the account does not exist (the owner simply
    /// holds no balance of that mint).
    pub async fn token_balance(&self, token_account: &Pubkey) -> Result<Option<ParsedTokenAmount>> {
        if !self.account_exists(token_account).await? {
            return Ok(None);
        }

        let balance = self
            .rpc
            .get_token_account_balance(token_account)
            .await
            .map_err(|e| {
                AppError::Network(format!(
                    "failed to fetch token balance for {token_account}: {e}"
                ))
            })?;

        let amount: u64 = balance.amount.parse().map_err(|_| {
            AppError::Internal(format!(
                "unparseable token amount '{}' for {token_account}",
                balance.amount
            ))
        })?;
        let ui_amount = balance
            .ui_amount
            .unwrap_or_else(|| amount as f64 / 10f64.powi(balance.decimals as i32));

        Ok(Some(ParsedTokenAmount {
            amount,
            decimals: balance.decimals,
            ui_amount,
        }))
    }

    /// Get the latest blockhash, used as the freshness anchor for
    /// transactions.
    ///
    /// Blockhashes expire after roughly a minute, so this should be fetched
    /// immediately before signing rather than at build time.
    pub async fn latest_blockhash(&self) -> Result<Hash> {
        self.rpc
            .get_latest_blockhash()
            .await
            .map_err(|e| AppError::Network(format!("failed to get latest blockhash: {e}")))
    }

    /// Send a signed transaction without waiting for confirmation.
    ///
    /// Returns the signature assigned to the transaction; confirmation is
    /// polled separately via [`confirm_signature`](Self::confirm_signature).
    pub async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature> {
        self.rpc
            .send_transaction(transaction)
            .await
            .map_err(|e| AppError::Network(format!("failed to send transaction: {e}")))
    }

    /// Poll until `signature` reaches the requested commitment level.
    ///
    /// The `anchor` is the blockhash the transaction was signed against;
    /// once the network no longer considers it valid the transaction can
    /// never land, and the wait fails with [`AppError::StaleAnchor`].
    /// A program-level rejection surfaces as [`AppError::Network`] with the
    /// on-chain error message.
    pub async fn confirm_signature(
        &self,
        signature: &Signature,
        anchor: &Hash,
        commitment: CommitmentConfig,
    ) -> Result<()> {
        loop {
            let status = self
                .rpc
                .get_signature_status_with_commitment(signature, commitment)
                .await
                .map_err(|e| AppError::Network(format!("failed to query status: {e}")))?;

            match status {
                Some(Ok(())) => return Ok(()),
                Some(Err(tx_err)) => {
                    return Err(AppError::Network(format!("transaction failed: {tx_err}")))
                }
                None => {
                    let anchor_valid = self
                        .rpc
                        .is_blockhash_valid(anchor, commitment)
                        .await
                        .map_err(|e| {
                            AppError::Network(format!("failed to check blockhash: {e}"))
                        })?;
                    if !anchor_valid {
                        return Err(AppError::StaleAnchor);
                    }
                    debug!("{signature} not yet at {commitment:?}, polling again");
                    tokio::time::sleep(CONFIRM_POLL_INTERVAL).await;
                }
            }
        }
    }

    /// Poll until `signature` is finalized, with a bounded wait.
    ///
    /// Used to upgrade an already-confirmed transaction; finality usually
    /// lands within seconds of confirmation.
    pub async fn confirm_finalized(&self, signature: &Signature) -> Result<()> {
        let commitment = CommitmentConfig::finalized();
        for _ in 0..FINALIZE_MAX_POLLS {
            let status = self
                .rpc
                .get_signature_status_with_commitment(signature, commitment)
                .await
                .map_err(|e| AppError::Network(format!("failed to query status: {e}")))?;

            match status {
                Some(Ok(())) => return Ok(()),
                Some(Err(tx_err)) => {
                    return Err(AppError::Network(format!("transaction failed: {tx_err}")))
                }
                None => tokio::time::sleep(CONFIRM_POLL_INTERVAL).await,
            }
        }
        Err(AppError::Network(format!(
            "{signature} did not finalize within the wait window"
        )))
    }

    /// Request an airdrop of `lamports` to `account` (test clusters only).
    pub async fn request_airdrop(&self, account: &Pubkey, lamports: u64) -> Result<Signature> {
        self.rpc
            .request_airdrop(account, lamports)
            .await
            .map_err(|e| AppError::Network(format!("airdrop request failed: {e}")))
    }

    /// Check if the RPC endpoint is healthy and responsive.
    pub async fn health_check(&self) -> Result<()> {
        self.rpc
            .get_version()
            .await
            .map_err(|e| AppError::Network(format!("health check failed: {e}")))?;
        Ok(())
    }
}

/// Parse a base58 transaction signature.
pub fn parse_signature(raw: &str) -> Result<Signature> {
    Signature::from_str(raw.trim())
        .map_err(|e| AppError::Validation(format!("invalid signature '{raw}': {e}")))
}
