//! # Solana Library
//!
//! Solana integration for the devnet wallet dashboard: cluster resolution,
//! RPC client wrapper, balance readers, transfer building and submission,
//! and the per-account transaction history.

// Declare all modules
pub mod balance;
pub mod client;
pub mod cluster;
pub mod faucet;
pub mod history;
pub mod submit;
pub mod transfer;
pub mod wallet;
pub mod watch;

// Re-export commonly used types from root for convenience
pub use balance::{FetchSequencer, TokenBalance};
pub use client::{SolanaClient, SolanaClientBuilder};
pub use cluster::Cluster;
pub use history::{SharedHistory, TransactionHistory, TransactionRecord, TxStatus};
pub use submit::{TransferReceipt, TransferService};
pub use transfer::{TransferBuilder, TransferPlan};
pub use wallet::{LocalKeypairSigner, WalletSigner};
pub use watch::BalanceWatcher;
