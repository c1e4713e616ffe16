//! # Token Balance Readers
//!
//! Derives token-holding accounts for tracked mints and fetches their parsed
//! balances. All lookups in a batch run concurrently; a mint the owner holds
//! no account for simply contributes nothing, and an individual lookup
//! failure is logged and skipped rather than aborting the batch.
//!
//! [`FetchSequencer`] tags fetches with a request generation so a stale
//! in-flight result (a manual refresh racing an account-change notification,
//! or a fetch completing after the account switched) can be discarded
//! instead of overwriting newer data.

use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::future::join_all;
use lib_core::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use spl_associated_token_account::get_associated_token_address;
use tracing::warn;

use crate::client::SolanaClient;

/// Balance of one tracked mint for the active owner.
///
/// Derived on every fetch, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenBalance {
    pub mint: String,
    pub balance: u64,
    pub decimals: u8,
    pub ui_amount: f64,
}

/// Derive the associated token account holding `owner`'s balance of `mint`.
///
/// Pure derivation from the mint, owner, and program identifiers; no network
/// call is involved.
pub fn derive_token_address(mint: &Pubkey, owner: &Pubkey) -> Pubkey {
    get_associated_token_address(owner, mint)
}

/// Parse configured mint addresses into public keys.
pub fn parse_mint_list(mints: &[String]) -> Result<Vec<Pubkey>> {
    mints
        .iter()
        .map(|mint| {
            Pubkey::from_str(mint)
                .map_err(|e| AppError::Validation(format!("invalid mint address '{mint}': {e}")))
        })
        .collect()
}

/// Fetch the owner's balance of a single mint.
///
/// Returns `None` when the owner has no token account for the mint, and on
/// lookup failure (logged) so one bad mint never poisons a batch.
pub async fn fetch_token_balance(
    client: &SolanaClient,
    mint: &Pubkey,
    owner: &Pubkey,
) -> Option<TokenBalance> {
    let token_account = derive_token_address(mint, owner);
    match client.token_balance(&token_account).await {
        Ok(Some(parsed)) => Some(TokenBalance {
            mint: mint.to_string(),
            balance: parsed.amount,
            decimals: parsed.decimals,
            ui_amount: parsed.ui_amount,
        }),
        Ok(None) => None,
        Err(e) => {
            warn!("token balance lookup failed for mint {mint}: {e}");
            None
        }
    }
}

/// Fetch the owner's balances for every tracked mint concurrently.
///
/// The result preserves the configured mint order regardless of which
/// lookup resolves first; mints with no balance are filtered out.
pub async fn fetch_token_balances(
    client: &SolanaClient,
    owner: &Pubkey,
    mints: &[Pubkey],
) -> Vec<TokenBalance> {
    let lookups = mints
        .iter()
        .map(|mint| fetch_token_balance(client, mint, owner));
    join_all(lookups).await.into_iter().flatten().collect()
}

/// Monotonically increasing request-generation counter.
///
/// Each fetch calls [`begin`](Self::begin) and only applies its result if
/// its generation is still current when it resolves.
#[derive(Debug, Default)]
pub struct FetchSequencer {
    current: AtomicU64,
}

impl FetchSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new fetch, superseding all earlier ones.
    pub fn begin(&self) -> u64 {
        self.current.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether `generation` is still the latest issued.
    pub fn is_current(&self, generation: u64) -> bool {
        self.current.load(Ordering::SeqCst) == generation
    }
}
