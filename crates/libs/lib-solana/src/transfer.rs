//! # Transfer Builder
//!
//! Builds SPL token transfer transactions: validates user input, resolves
//! the mint's decimal precision, derives both parties' token-holding
//! accounts, and assembles the instruction list. When the recipient has no
//! token account yet, the account creation rides in the same transaction as
//! the transfer so both succeed or fail together.
//!
//! The output is an unsigned [`TransferPlan`]. The freshness anchor (recent
//! blockhash) is deliberately NOT attached here - it is fetched immediately
//! before signing to keep the staleness window small.

use std::str::FromStr;

use lib_core::error::{AppError, Result};
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, transaction::Transaction};
use tracing::info;

use crate::balance::derive_token_address;
use crate::client::SolanaClient;

/// An unsigned, unsubmitted token transfer.
///
/// Built fresh per submission attempt and consumed by the submitter; never
/// persisted.
#[derive(Debug, Clone)]
pub struct TransferPlan {
    pub mint: Pubkey,
    pub sender: Pubkey,
    pub recipient: Pubkey,
    pub sender_token_account: Pubkey,
    pub recipient_token_account: Pubkey,
    /// Integer amount in the mint's base units.
    pub base_units: u64,
    pub decimals: u8,
    /// Whether the plan includes creating the recipient's token account.
    pub creates_recipient_account: bool,
    instructions: Vec<Instruction>,
}

impl TransferPlan {
    /// The assembled instruction list, in execution order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// The designated fee payer (the sender).
    pub fn fee_payer(&self) -> &Pubkey {
        &self.sender
    }

    /// Compile into an unsigned transaction with no blockhash attached.
    pub fn into_transaction(self) -> Transaction {
        Transaction::new_with_payer(&self.instructions, Some(&self.sender))
    }
}

/// Parse a human-entered amount; must be a positive finite number.
pub fn parse_amount(raw: &str) -> Result<f64> {
    let amount: f64 = raw
        .trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("amount '{raw}' is not a number")))?;
    if !amount.is_finite() || amount <= 0.0 {
        return Err(AppError::Validation(
            "amount must be a positive number".to_string(),
        ));
    }
    Ok(amount)
}

/// Parse a base58 account address, labeling the field in the error.
pub fn parse_account(label: &str, raw: &str) -> Result<Pubkey> {
    Pubkey::from_str(raw.trim())
        .map_err(|e| AppError::Validation(format!("invalid {label} address '{raw}': {e}")))
}

/// Resolve a human-entered amount to integer base units:
/// `floor(amount * 10^decimals)`.
///
/// An entered amount below the mint's smallest unit floors to zero; the
/// builder rejects that case rather than submitting a zero-value transfer.
pub fn to_base_units(amount: f64, decimals: u8) -> u64 {
    (amount * 10f64.powi(decimals as i32)).floor() as u64
}

/// Assemble the instruction list for a transfer.
///
/// Exactly two instructions (create recipient token account, then transfer)
/// when the recipient account does not exist yet; exactly one otherwise.
#[allow(clippy::too_many_arguments)]
pub fn assemble_instructions(
    mint: &Pubkey,
    sender: &Pubkey,
    recipient: &Pubkey,
    sender_token_account: &Pubkey,
    recipient_token_account: &Pubkey,
    base_units: u64,
    decimals: u8,
    recipient_account_exists: bool,
) -> Result<Vec<Instruction>> {
    let mut instructions = Vec::with_capacity(2);

    if !recipient_account_exists {
        // Funded by the sender, owned by the recipient.
        instructions.push(
            spl_associated_token_account::instruction::create_associated_token_account(
                sender,
                recipient,
                mint,
                &spl_token::id(),
            ),
        );
    }

    instructions.push(
        spl_token::instruction::transfer_checked(
            &spl_token::id(),
            sender_token_account,
            mint,
            recipient_token_account,
            sender,
            &[],
            base_units,
            decimals,
        )
        .map_err(|e| AppError::Internal(format!("failed to build transfer instruction: {e}")))?,
    );

    Ok(instructions)
}

/// Builds [`TransferPlan`]s against a live cluster.
pub struct TransferBuilder<'a> {
    client: &'a SolanaClient,
}

impl<'a> TransferBuilder<'a> {
    pub fn new(client: &'a SolanaClient) -> Self {
        Self { client }
    }

    /// Validate inputs and build a transfer of `amount` of `mint` from
    /// `sender` to `recipient`.
    ///
    /// Validation failures are caught before any network interaction; the
    /// only network reads are the mint's decimals and the existence probe
    /// for the recipient's token account.
    pub async fn build(
        &self,
        sender: Pubkey,
        mint: &str,
        recipient: &str,
        amount: &str,
    ) -> Result<TransferPlan> {
        let mint = parse_account("mint", mint)?;
        let recipient = parse_account("recipient", recipient)?;
        let amount = parse_amount(amount)?;

        let decimals = self.client.mint_decimals(&mint).await?;
        let base_units = to_base_units(amount, decimals);
        if base_units == 0 {
            return Err(AppError::Validation(format!(
                "amount {amount} is below the smallest unit of this token ({decimals} decimals)"
            )));
        }

        let sender_token_account = derive_token_address(&mint, &sender);
        let recipient_token_account = derive_token_address(&mint, &recipient);
        let recipient_account_exists =
            self.client.account_exists(&recipient_token_account).await?;

        let instructions = assemble_instructions(
            &mint,
            &sender,
            &recipient,
            &sender_token_account,
            &recipient_token_account,
            base_units,
            decimals,
            recipient_account_exists,
        )?;

        info!(
            "built transfer of {base_units} base units of {mint} to {recipient} \
             (creates recipient account: {})",
            !recipient_account_exists
        );

        Ok(TransferPlan {
            mint,
            sender,
            recipient,
            sender_token_account,
            recipient_token_account,
            base_units,
            decimals,
            creates_recipient_account: !recipient_account_exists,
            instructions,
        })
    }
}
