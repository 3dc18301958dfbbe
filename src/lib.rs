//! Token Ledger: an ERC-20 style bookkeeping core in Rust
//!
//! This crate provides the balance and allowance layer of a fungible token:
//! - Mint, transfer, approve and transfer-from with checked arithmetic
//! - Conservation of total supply across every successful call
//! - Explicit caller identities instead of an ambient sender
//! - A lock-guarded shared handle for concurrent hosts
//! - secp256k1-signed calls with per-caller nonces
//! - JSON snapshots with backups
//!
//! # Example
//!
//! ```rust
//! use token_ledger::auth::{Authenticator, Call, SignedCall};
//! use token_ledger::crypto::KeyPair;
//! use token_ledger::ledger::{LedgerCore, MintPolicy, TokenMetadata};
//!
//! let minter = KeyPair::generate();
//! let metadata = TokenMetadata::new("My Token", "MTK", 18).unwrap();
//! let mut ledger = LedgerCore::new(metadata, MintPolicy::Minter(minter.address()));
//!
//! // Sign and execute a mint
//! let mut auth = Authenticator::new();
//! let call = Call::Mint { to: minter.address(), amount: 1000 };
//! let signed = SignedCall::sign(call, 0, &minter).unwrap();
//! auth.execute(&mut ledger, &signed).unwrap();
//!
//! assert_eq!(ledger.balance_of(minter.address()), 1000);
//! ```

pub mod auth;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod ledger;
pub mod storage;

// Re-export commonly used types
pub use auth::{AuthError, Authenticator, Call, SignedCall};
pub use config::LedgerConfig;
pub use crypto::KeyPair;
pub use ledger::{Address, LedgerCore, LedgerError, MintPolicy, SharedLedger, TokenMetadata};
pub use storage::{Storage, StorageConfig};
