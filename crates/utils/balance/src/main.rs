//! # Balance Dump Utility
//!
//! Prints the SOL balance and tracked SPL token balances for a public key.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --package balance -- <public-key>
//! ```
//!
//! Honors `RPC_URL` / `CLUSTER` / `TRACKED_MINTS` from the environment (or a
//! `.env` file). Balance reads are best-effort: an unreachable account or
//! mint degrades to an empty line rather than aborting the dump.

use std::str::FromStr;

use anyhow::Context;
use lib_core::config::{core_config, init_config};
use lib_solana::balance::{fetch_token_balances, parse_mint_list};
use lib_solana::client::SolanaClient;
use lib_utils::format::{format_token_amount, short_address};
use solana_sdk::pubkey::Pubkey;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    init_config()?;

    let mut args = std::env::args().skip(1);
    let Some(owner) = args.next() else {
        eprintln!("Usage: balance <public-key>");
        std::process::exit(1);
    };
    let owner = Pubkey::from_str(owner.trim()).context("invalid public key")?;

    let config = core_config();
    let client = SolanaClient::from_config(config);

    match client.native_balance(&owner).await {
        Ok(Some(sol)) => println!("SOL Balance: {sol:.4} SOL"),
        Ok(None) => println!("SOL Balance: account not found"),
        Err(e) => println!("SOL Balance: unavailable ({})", e.user_message()),
    }

    let mints = parse_mint_list(&config.tracked_mints)?;
    if mints.is_empty() {
        println!();
        println!("No tracked mints configured (set TRACKED_MINTS).");
        return Ok(());
    }

    println!();
    println!("SPL Token Balances:");
    let balances = fetch_token_balances(&client, &owner, &mints).await;
    for mint in &mints {
        let mint_str = mint.to_string();
        match balances.iter().find(|balance| balance.mint == mint_str) {
            Some(balance) => println!(
                "{}: {}",
                short_address(&balance.mint),
                format_token_amount(balance.ui_amount, balance.decimals)
            ),
            None => println!("{}: 0", short_address(&mint_str)),
        }
    }

    Ok(())
}
