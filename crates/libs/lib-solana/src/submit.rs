//! # Transaction Submitter
//!
//! Drives a built transfer through its lifecycle:
//!
//! ```text
//! building -> signing -> submitted(pending) -> confirmed | finalized | error
//! ```
//!
//! The freshness anchor is fetched immediately before signing. A wallet
//! refusal is terminal and leaves no trace in history. Once a signature
//! exists, a `pending` record is appended BEFORE confirmation - a crash or
//! reload mid-confirmation still shows the attempt - and every later
//! failure mutates that record to `error` while preserving the signature.
//!
//! There is no automatic retry: a failed attempt is rebuilt and resubmitted
//! as a new attempt with its own record. Resubmission with a stale anchor
//! fails cleanly; the network's uniqueness-of-signature guarantee is the
//! double-spend safety net, not application logic.

use std::sync::Arc;

use lib_core::error::{AppError, Result};
use solana_commitment_config::CommitmentConfig;
use tracing::{info, warn};

use crate::client::{parse_signature, SolanaClient};
use crate::history::{SharedHistory, TransactionRecord, TxStatus};
use crate::transfer::TransferPlan;
use crate::wallet::WalletSigner;

/// Terminal outcome of a successful submission.
#[derive(Debug, Clone)]
pub struct TransferReceipt {
    pub signature: String,
    pub explorer_url: String,
}

/// Submits transfers and keeps the shared history in step with their
/// lifecycle.
pub struct TransferService {
    client: Arc<SolanaClient>,
    history: SharedHistory,
}

impl TransferService {
    pub fn new(client: Arc<SolanaClient>, history: SharedHistory) -> Self {
        Self { client, history }
    }

    /// Sign, send, and confirm a transfer plan.
    ///
    /// Resolves to exactly one terminal outcome: a receipt with an explorer
    /// link, or an error. Errors after signing also surface through the
    /// history record for the attempt.
    pub async fn submit(
        &self,
        signer: &dyn WalletSigner,
        plan: TransferPlan,
    ) -> Result<TransferReceipt> {
        info!(
            "building transaction: {} base units of {} to {}",
            plan.base_units, plan.mint, plan.recipient
        );
        let mut transaction = plan.into_transaction();

        // Anchor attached at the last moment to minimize the staleness
        // window while the wallet prompt is open.
        let anchor = self.client.latest_blockhash().await?;

        info!("requesting wallet signature");
        signer.sign_transaction(&mut transaction, anchor).await?;

        let signature = *transaction.signatures.first().ok_or_else(|| {
            AppError::SignerUnavailable("wallet returned an unsigned transaction".to_string())
        })?;
        let signature_str = signature.to_string();

        // The attempt becomes visible before confirmation.
        self.history
            .lock()
            .append(TransactionRecord::pending(signature_str.clone()))?;

        info!("submitting transaction {signature_str}");
        if let Err(e) = self.client.send_transaction(&transaction).await {
            self.mark_failed(&signature_str, &e);
            return Err(e);
        }

        match self
            .client
            .confirm_signature(&signature, &anchor, CommitmentConfig::confirmed())
            .await
        {
            Ok(()) => {
                self.history
                    .lock()
                    .update_status(&signature_str, TxStatus::Confirmed, None)?;
            }
            Err(e) => {
                self.mark_failed(&signature_str, &e);
                return Err(e);
            }
        }

        info!("transaction {signature_str} confirmed");
        Ok(TransferReceipt {
            explorer_url: self.client.cluster().explorer_tx_url(&signature_str),
            signature: signature_str,
        })
    }

    /// Wait for a confirmed transaction to reach finality and upgrade its
    /// record.
    ///
    /// The signature is already on-chain at `confirmed`, so finality no
    /// longer depends on the anchor; status is polled directly with a
    /// bounded wait.
    pub async fn await_finalized(&self, signature: &str) -> Result<()> {
        let parsed = parse_signature(signature)?;
        if let Err(e) = self.client.confirm_finalized(&parsed).await {
            self.mark_failed(signature, &e);
            return Err(e);
        }

        self.history
            .lock()
            .update_status(signature, TxStatus::Finalized, None)?;
        Ok(())
    }

    /// Mutate the attempt's record to `error`, keeping the signature for
    /// explorer lookup. Storage failures here must not mask the original
    /// submission error.
    fn mark_failed(&self, signature: &str, error: &AppError) {
        let result =
            self.history
                .lock()
                .update_status(signature, TxStatus::Error, Some(error.user_message()));
        if let Err(store_err) = result {
            warn!("failed to persist error status for {signature}: {store_err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::Cluster;
    use crate::history::TransactionHistory;
    use crate::transfer::TransferBuilder;
    use crate::wallet::LocalKeypairSigner;
    use lib_core::store::MemoryStore;
    use solana_sdk::signature::{Keypair, Signer};

    #[tokio::test]
    #[ignore] // Requires a funded devnet wallet and an RPC connection
    async fn test_devnet_transfer_lifecycle() {
        let client = Arc::new(SolanaClient::builder().cluster(Cluster::Devnet).build());
        let history = TransactionHistory::shared(Arc::new(MemoryStore::new()));

        let keypair = Keypair::new();
        let sender = keypair.pubkey();
        history.lock().activate(sender).unwrap();

        let signer = LocalKeypairSigner::from_keypair(keypair);
        let plan = TransferBuilder::new(&client)
            .build(
                sender,
                "4zMMC9srt5Ri5X14GAgXhaHii3GnPAEERYPJgZJDncDU",
                "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU",
                "0.1",
            )
            .await
            .unwrap();

        let service = TransferService::new(client, history.clone());
        let receipt = service.submit(&signer, plan).await.unwrap();

        let guard = history.lock();
        assert_eq!(guard.records()[0].signature, receipt.signature);
        assert_eq!(guard.records()[0].status, TxStatus::Confirmed);
    }
}
