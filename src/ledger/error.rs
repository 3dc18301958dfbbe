//! Ledger error taxonomy

use super::address::Address;
use thiserror::Error;

/// Errors returned by ledger operations
///
/// A call that returns any of these has not modified the ledger.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: u128, need: u128 },
    #[error("Allowance exceeded: have {have}, need {need}")]
    AllowanceExceeded { have: u128, need: u128 },
    #[error("Invalid recipient: cannot credit the null address")]
    InvalidRecipient,
    #[error("Invalid address: owner and recipient must not be null")]
    InvalidAddress,
    #[error("Unauthorized: {caller} may not mint")]
    Unauthorized { caller: Address },
    #[error("Arithmetic overflow")]
    Overflow,
    #[error("Invalid name: must be 1-50 characters")]
    InvalidName,
    #[error("Invalid symbol: must be 1-10 characters")]
    InvalidSymbol,
    #[error("Invalid decimals: must be 0-18")]
    InvalidDecimals,
    #[error("Conservation violated: balances sum to {sum}, total supply is {supply}")]
    ConservationViolated { sum: u128, supply: u128 },
    #[error("Invalid state: {0}")]
    InvalidState(String),
}
