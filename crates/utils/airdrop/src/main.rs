//! # Airdrop Utility
//!
//! Requests devnet test funds for a public key and waits for the airdrop to
//! confirm.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --package airdrop -- <public-key> [sol]
//! ```
//!
//! Honors `RPC_URL` / `CLUSTER` from the environment (or a `.env` file);
//! refuses to run against anything but devnet.

use std::str::FromStr;

use anyhow::Context;
use lib_core::config::{core_config, init_config};
use lib_solana::client::SolanaClient;
use lib_solana::faucet::{request_test_funds, DEFAULT_AIRDROP_SOL};
use solana_sdk::pubkey::Pubkey;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    init_config()?;

    let mut args = std::env::args().skip(1);
    let Some(recipient) = args.next() else {
        eprintln!("Usage: airdrop <public-key> [sol]");
        std::process::exit(1);
    };
    let recipient = Pubkey::from_str(recipient.trim()).context("invalid public key")?;
    let sol = match args.next() {
        Some(raw) => raw.parse().context("SOL amount must be a number")?,
        None => DEFAULT_AIRDROP_SOL,
    };

    let client = SolanaClient::from_config(core_config());
    println!("Requesting {sol} SOL on {}...", client.cluster());

    let receipt = request_test_funds(&client, &recipient, sol).await?;

    println!("Airdrop successful!");
    println!("Signature: {}", receipt.signature);
    println!("Explorer:  {}", receipt.explorer_url);

    Ok(())
}
