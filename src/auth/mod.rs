//! Caller authentication for hosts
//!
//! The ledger core trusts the caller identity it is given. This module
//! produces that identity from a secp256k1-signed [`SignedCall`]:
//! - the signature must verify against the embedded public key
//! - the caller is the address derived from that key
//! - the nonce must match the caller's next expected nonce

pub mod authenticator;
pub mod call;

pub use authenticator::Authenticator;
pub use call::{Call, SignedCall};

use crate::crypto::KeyError;
use crate::ledger::{Address, LedgerError};
use thiserror::Error;

/// Authentication errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid public key")]
    InvalidPublicKey,
    #[error("Invalid signature")]
    InvalidSignature,
    #[error("Bad nonce: expected {expected}, got {got}")]
    BadNonce { expected: u64, got: u64 },
    #[error("Nonce space exhausted for {0}")]
    NonceExhausted(Address),
    #[error("Key error: {0}")]
    Key(#[from] KeyError),
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}
