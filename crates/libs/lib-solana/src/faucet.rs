//! # Devnet Faucet
//!
//! Requests test funds and waits for the airdrop to land. Gated on the
//! devnet cluster before any network interaction; faucet signatures are
//! reported to the caller but not recorded in transfer history.

use lib_core::error::{AppError, Result};
use solana_commitment_config::CommitmentConfig;
use solana_sdk::{native_token::LAMPORTS_PER_SOL, pubkey::Pubkey};
use tracing::info;

use crate::client::SolanaClient;
use crate::submit::TransferReceipt;

/// Default airdrop size in SOL.
pub const DEFAULT_AIRDROP_SOL: f64 = 1.0;

/// Request `sol` of test funds for `recipient` and confirm the airdrop.
pub async fn request_test_funds(
    client: &SolanaClient,
    recipient: &Pubkey,
    sol: f64,
) -> Result<TransferReceipt> {
    if !client.cluster().is_devnet() {
        return Err(AppError::Validation(
            "airdrop is only available on devnet".to_string(),
        ));
    }
    if !sol.is_finite() || sol <= 0.0 {
        return Err(AppError::Validation(
            "airdrop amount must be a positive number".to_string(),
        ));
    }

    let lamports = (sol * LAMPORTS_PER_SOL as f64) as u64;
    info!("requesting {sol} SOL airdrop for {recipient}");
    let signature = client.request_airdrop(recipient, lamports).await?;

    let anchor = client.latest_blockhash().await?;
    client
        .confirm_signature(&signature, &anchor, CommitmentConfig::confirmed())
        .await?;

    let signature = signature.to_string();
    info!("airdrop {signature} confirmed");
    Ok(TransferReceipt {
        explorer_url: client.cluster().explorer_tx_url(&signature),
        signature,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::Cluster;

    #[tokio::test]
    async fn test_airdrop_rejected_off_devnet() {
        let client = SolanaClient::builder().cluster(Cluster::MainnetBeta).build();
        let result = request_test_funds(&client, &Pubkey::new_unique(), 1.0).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_airdrop_rejects_non_positive_amount() {
        let client = SolanaClient::builder().cluster(Cluster::Devnet).build();
        let result = request_test_funds(&client, &Pubkey::new_unique(), 0.0).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    #[ignore] // Requires RPC connection; devnet faucet is rate-limited
    async fn test_devnet_airdrop() {
        let client = SolanaClient::builder().cluster(Cluster::Devnet).build();
        let recipient = Pubkey::new_unique();
        let receipt = request_test_funds(&client, &recipient, 1.0).await.unwrap();
        assert!(receipt.explorer_url.contains(&receipt.signature));
    }
}
