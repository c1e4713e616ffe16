//! # Centralized Error Handling
//!
//! This module defines the application-wide error type [`AppError`] used
//! consistently across the workspace. It follows the `thiserror` pattern for
//! ergonomic error handling.
//!
//! ## Error Categories
//!
//! 1. **Pre-flight errors** - caught before any network interaction
//!    - [`Validation`](AppError::Validation) - bad user input
//!    - [`Config`](AppError::Config) - bad process configuration
//!
//! 2. **On-chain resolution errors** - the target does not resolve
//!    - [`InvalidMint`](AppError::InvalidMint)
//!    - [`AccountNotFound`](AppError::AccountNotFound)
//!
//! 3. **Wallet-side refusal** - terminal, never recorded in history
//!    - [`UserRejected`](AppError::UserRejected)
//!    - [`SignerUnavailable`](AppError::SignerUnavailable)
//!
//! 4. **Post-signature failures** - must still leave an `error` history record
//!    - [`Network`](AppError::Network) - transport, timeout, confirmation
//!    - [`StaleAnchor`](AppError::StaleAnchor) - blockhash expired before
//!      confirmation
//!
//! 5. **Local failures**
//!    - [`Storage`](AppError::Storage) - persistence port
//!    - [`Internal`](AppError::Internal) - unexpected failures

use thiserror::Error;

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application-wide error type covering all error scenarios.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error during startup or environment loading.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input, caught before any network call.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The mint account does not exist or is not a valid token mint.
    #[error("Invalid mint: {0}")]
    InvalidMint(String),

    /// A referenced on-chain account does not resolve.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// The wallet refused to sign.
    #[error("Signing rejected by wallet")]
    UserRejected,

    /// No wallet is connected, or the connected wallet cannot sign.
    #[error("Signer unavailable: {0}")]
    SignerUnavailable(String),

    /// RPC transport, timeout, or confirmation failure.
    #[error("Network error: {0}")]
    Network(String),

    /// The freshness anchor (recent blockhash) expired before confirmation.
    #[error("Transaction expired: blockhash is no longer valid")]
    StaleAnchor,

    /// Persistence port failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal error (unexpected failures).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get a user-friendly error message.
    ///
    /// Input and wallet errors carry their context verbatim; infrastructure
    /// errors collapse to a generic message so implementation details are not
    /// surfaced to the user.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::InvalidMint(msg) => format!("Invalid mint: {msg}"),
            AppError::AccountNotFound(msg) => format!("Account not found: {msg}"),
            AppError::UserRejected => "Signing rejected by wallet".to_string(),
            AppError::SignerUnavailable(_) => "No wallet available to sign".to_string(),
            AppError::Network(msg) => msg.clone(),
            AppError::StaleAnchor => {
                "Transaction expired before confirmation; please retry".to_string()
            }
            AppError::Config(_) | AppError::Storage(_) | AppError::Internal(_) => {
                "An internal error occurred".to_string()
            }
        }
    }
}

/// Convert `serde_json::Error` to `AppError`.
///
/// JSON in this workspace only appears in the persistence layer.
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Storage(format!("JSON error: {err}"))
    }
}
