//! # Wallet Signer Port
//!
//! Signing is delegated to an external wallet behind [`WalletSigner`]. The
//! port is a suspension point with no timeout: an interactive wallet may
//! keep the prompt open indefinitely, and the submitter stays in its signing
//! state until the wallet resolves or refuses.
//!
//! [`LocalKeypairSigner`] is the provided implementation for the operator
//! binaries and tests: it loads a keypair from a Solana CLI JSON file or a
//! base58-encoded secret and signs locally.

use std::path::Path;

use async_trait::async_trait;
use lib_core::error::{AppError, Result};
use solana_sdk::{
    hash::Hash,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    transaction::Transaction,
};

/// External wallet contract: expose a public key and sign transactions.
///
/// Implementations fail with [`AppError::SignerUnavailable`] when no key is
/// loaded or the wallet lacks a signing capability, and with
/// [`AppError::UserRejected`] when an interactive wallet refuses. Both are
/// terminal for a submission attempt and never reach the history store.
#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// Public key of the connected wallet, if any.
    fn pubkey(&self) -> Option<Pubkey>;

    /// Sign `transaction` against `recent_blockhash`.
    async fn sign_transaction(
        &self,
        transaction: &mut Transaction,
        recent_blockhash: Hash,
    ) -> Result<()>;
}

/// Signer backed by a locally held keypair.
#[derive(Default)]
pub struct LocalKeypairSigner {
    keypair: Option<Keypair>,
}

impl LocalKeypairSigner {
    /// A signer with no keypair loaded; all signing attempts fail with
    /// `SignerUnavailable`.
    pub fn disconnected() -> Self {
        Self::default()
    }

    /// Wrap an existing keypair.
    pub fn from_keypair(keypair: Keypair) -> Self {
        Self {
            keypair: Some(keypair),
        }
    }

    /// Load a keypair from a Solana CLI JSON file (a byte array on disk).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::SignerUnavailable(format!("failed to read {}: {e}", path.display()))
        })?;

        let bytes: Vec<u8> = serde_json::from_str(&contents).map_err(|e| {
            AppError::SignerUnavailable(format!("{} is not a keypair file: {e}", path.display()))
        })?;

        Self::from_secret_bytes(&bytes)
    }

    /// Load a keypair from a base58-encoded secret.
    pub fn from_base58(secret: &str) -> Result<Self> {
        let bytes = bs58::decode(secret.trim())
            .into_vec()
            .map_err(|e| AppError::SignerUnavailable(format!("invalid base58 secret: {e}")))?;
        Self::from_secret_bytes(&bytes)
    }

    /// Accepts the 64-byte keypair layout Solana tooling writes (secret then
    /// public key) or a bare 32-byte secret.
    fn from_secret_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 32 && bytes.len() != 64 {
            return Err(AppError::SignerUnavailable(format!(
                "expected a 32 or 64 byte secret, got {}",
                bytes.len()
            )));
        }
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&bytes[..32]);

        Ok(Self {
            keypair: Some(Keypair::new_from_array(secret)),
        })
    }

    /// Whether a keypair is loaded.
    pub fn is_connected(&self) -> bool {
        self.keypair.is_some()
    }

    /// Drop the keypair; subsequent signing attempts fail.
    pub fn disconnect(&mut self) {
        self.keypair = None;
    }
}

#[async_trait]
impl WalletSigner for LocalKeypairSigner {
    fn pubkey(&self) -> Option<Pubkey> {
        self.keypair.as_ref().map(|keypair| keypair.pubkey())
    }

    async fn sign_transaction(
        &self,
        transaction: &mut Transaction,
        recent_blockhash: Hash,
    ) -> Result<()> {
        let keypair = self
            .keypair
            .as_ref()
            .ok_or_else(|| AppError::SignerUnavailable("no keypair loaded".to_string()))?;

        transaction
            .try_sign(&[keypair], recent_blockhash)
            .map_err(|e| AppError::SignerUnavailable(format!("signing failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disconnected_signer_is_unavailable() {
        let signer = LocalKeypairSigner::disconnected();
        assert!(signer.pubkey().is_none());

        let mut transaction = Transaction::default();
        let result = signer
            .sign_transaction(&mut transaction, Hash::default())
            .await;
        assert!(matches!(result, Err(AppError::SignerUnavailable(_))));
    }

    #[tokio::test]
    async fn test_loaded_signer_signs() {
        let keypair = Keypair::new();
        let pubkey = keypair.pubkey();
        let signer = LocalKeypairSigner::from_keypair(keypair);
        assert_eq!(signer.pubkey(), Some(pubkey));

        let mut transaction = Transaction::new_with_payer(&[], Some(&pubkey));
        signer
            .sign_transaction(&mut transaction, Hash::new_unique())
            .await
            .unwrap();
        assert_ne!(
            transaction.signatures[0],
            solana_sdk::signature::Signature::default()
        );
    }

    #[test]
    fn test_from_base58_round_trip() {
        let keypair = Keypair::new();
        let encoded = bs58::encode(keypair.to_bytes()).into_string();

        let signer = LocalKeypairSigner::from_base58(&encoded).unwrap();
        assert_eq!(signer.pubkey(), Some(keypair.pubkey()));
    }

    #[test]
    fn test_from_secret_bytes_rejects_bad_length() {
        assert!(LocalKeypairSigner::from_secret_bytes(&[0u8; 16]).is_err());
    }

    #[test]
    fn test_from_file_json_array() {
        let keypair = Keypair::new();
        let path = std::env::temp_dir().join(format!("devnet-desk-key-{}.json", std::process::id()));
        std::fs::write(&path, serde_json::to_string(&keypair.to_bytes().to_vec()).unwrap())
            .unwrap();

        let signer = LocalKeypairSigner::from_file(&path).unwrap();
        assert_eq!(signer.pubkey(), Some(keypair.pubkey()));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_disconnect() {
        let mut signer = LocalKeypairSigner::from_keypair(Keypair::new());
        assert!(signer.is_connected());
        signer.disconnect();
        assert!(!signer.is_connected());
        assert!(signer.pubkey().is_none());
    }
}
