//! ERC-20 style balance and allowance ledger
//!
//! Provides the bookkeeping layer for a fungible token:
//! - Balances per address and a total supply that only `mint` raises
//! - Allowances for delegated transfers, set by `approve`
//! - Transfer and transfer-from operations that conserve supply
//!
//! # Example
//!
//! ```rust
//! use token_ledger::ledger::{Address, LedgerCore, MintPolicy, TokenMetadata};
//!
//! let alice: Address = "0x00000000000000000000000000000000000000a1".parse().unwrap();
//! let bob: Address = "0x00000000000000000000000000000000000000b0".parse().unwrap();
//!
//! let metadata = TokenMetadata::new("My Token", "MTK", 18).unwrap();
//! let mut ledger =
//!     LedgerCore::with_initial_mint(metadata, MintPolicy::Open, alice, 1000).unwrap();
//!
//! ledger.transfer(alice, bob, 100).unwrap();
//! assert_eq!(ledger.balance_of(bob), 100);
//! assert_eq!(ledger.total_supply(), 1000);
//! ```

pub mod address;
pub mod error;
pub mod ledger;
pub mod metadata;
pub mod shared;

pub use address::{Address, AddressError, ADDRESS_LEN};
pub use error::LedgerError;
pub use ledger::{LedgerCore, MintPolicy};
pub use metadata::TokenMetadata;
pub use shared::SharedLedger;
