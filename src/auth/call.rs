//! Ledger calls and their signed form

use super::AuthError;
use crate::crypto::{sha256, KeyPair};
use crate::ledger::{Address, LedgerCore, LedgerError};
use serde::{Deserialize, Serialize};

/// One mutating ledger operation, minus the caller
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Call {
    Mint { to: Address, amount: u128 },
    Transfer { to: Address, amount: u128 },
    Approve { spender: Address, amount: u128 },
    TransferFrom { owner: Address, to: Address, amount: u128 },
}

impl Call {
    /// Execute this call on `ledger` as `caller`
    pub fn apply(&self, ledger: &mut LedgerCore, caller: Address) -> Result<(), LedgerError> {
        match *self {
            Call::Mint { to, amount } => ledger.mint(caller, to, amount),
            Call::Transfer { to, amount } => ledger.transfer(caller, to, amount),
            Call::Approve { spender, amount } => {
                ledger.approve(caller, spender, amount);
                Ok(())
            }
            Call::TransferFrom { owner, to, amount } => {
                ledger.transfer_from(caller, owner, to, amount)
            }
        }
    }
}

/// A call signed by the key that owns the calling address
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignedCall {
    pub call: Call,
    /// Must equal the caller's next expected nonce
    pub nonce: u64,
    /// Compressed secp256k1 public key, hex
    pub public_key: String,
    /// Compact ECDSA signature over [`SignedCall::digest`], hex
    pub signature: String,
}

#[derive(Serialize)]
struct SigningPayload<'a> {
    call: &'a Call,
    nonce: u64,
}

fn signing_digest(call: &Call, nonce: u64) -> Result<Vec<u8>, AuthError> {
    let bytes = serde_json::to_vec(&SigningPayload { call, nonce })?;
    Ok(sha256(&bytes))
}

impl SignedCall {
    /// Sign `call` with `key` for the given nonce
    pub fn sign(call: Call, nonce: u64, key: &KeyPair) -> Result<Self, AuthError> {
        let digest = signing_digest(&call, nonce)?;
        let signature = key.sign(&digest)?;

        Ok(Self {
            call,
            nonce,
            public_key: key.public_key_hex(),
            signature: hex::encode(signature),
        })
    }

    /// SHA-256 of the JSON encoding of `{call, nonce}`
    pub fn digest(&self) -> Result<Vec<u8>, AuthError> {
        signing_digest(&self.call, self.nonce)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{MintPolicy, TokenMetadata};

    fn addr(n: u8) -> Address {
        let mut bytes = [0u8; 20];
        bytes[19] = n;
        Address::new(bytes)
    }

    #[test]
    fn test_apply_dispatches() {
        let metadata = TokenMetadata::new("Call Token", "CALL", 0).unwrap();
        let mut ledger = LedgerCore::new(metadata, MintPolicy::Open);
        let (a, b, c) = (addr(1), addr(2), addr(3));

        Call::Mint { to: a, amount: 50 }.apply(&mut ledger, a).unwrap();
        Call::Transfer { to: b, amount: 20 }.apply(&mut ledger, a).unwrap();
        Call::Approve { spender: c, amount: 5 }.apply(&mut ledger, b).unwrap();
        Call::TransferFrom { owner: b, to: c, amount: 5 }
            .apply(&mut ledger, c)
            .unwrap();

        assert_eq!(ledger.balance_of(a), 30);
        assert_eq!(ledger.balance_of(b), 15);
        assert_eq!(ledger.balance_of(c), 5);
        assert_eq!(ledger.allowance(b, c), 0);
    }

    #[test]
    fn test_call_json_shape() {
        let call = Call::Transfer {
            to: addr(2),
            amount: u128::MAX,
        };
        let json = serde_json::to_string(&call).unwrap();
        assert!(json.starts_with("{\"transfer\""));

        let back: Call = serde_json::from_str(&json).unwrap();
        assert_eq!(back, call);
    }

    #[test]
    fn test_digest_covers_nonce() {
        let key = KeyPair::generate();
        let call = Call::Approve {
            spender: addr(9),
            amount: 1,
        };

        let first = SignedCall::sign(call.clone(), 0, &key).unwrap();
        let second = SignedCall::sign(call, 1, &key).unwrap();
        assert_ne!(first.digest().unwrap(), second.digest().unwrap());
    }
}
