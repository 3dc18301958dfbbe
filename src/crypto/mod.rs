//! Cryptographic utilities for ledger hosts
//!
//! This module provides:
//! - SHA-256 hashing
//! - ECDSA key management (secp256k1) and caller address derivation

pub mod hash;
pub mod keys;

pub use hash::sha256;
pub use keys::{
    public_key_from_hex, public_key_to_address, sign_message, verify_signature, KeyError, KeyPair,
};
