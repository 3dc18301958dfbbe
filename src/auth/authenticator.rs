//! Signature and nonce checks for incoming calls

use super::call::SignedCall;
use super::AuthError;
use crate::crypto::{public_key_from_hex, public_key_to_address, verify_signature};
use crate::ledger::{Address, LedgerCore, SharedLedger};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Resolves signed calls to verified caller addresses
///
/// Each address carries a nonce starting at zero. A call is accepted only
/// with the current nonce, which is then consumed whether or not the ledger
/// goes on to accept the call.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Authenticator {
    nonces: HashMap<Address, u64>,
}

impl Authenticator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The nonce the next call from `caller` must carry
    pub fn next_nonce(&self, caller: Address) -> u64 {
        self.nonces.get(&caller).copied().unwrap_or(0)
    }

    /// Verify `signed` and return the address that signed it
    pub fn authenticate(&mut self, signed: &SignedCall) -> Result<Address, AuthError> {
        let public_key =
            public_key_from_hex(&signed.public_key).map_err(|_| AuthError::InvalidPublicKey)?;
        let signature = hex::decode(&signed.signature).map_err(|_| AuthError::InvalidSignature)?;
        let digest = signed.digest()?;

        let valid = verify_signature(&public_key, &digest, &signature)
            .map_err(|_| AuthError::InvalidSignature)?;
        if !valid {
            log::warn!("Rejected call with bad signature");
            return Err(AuthError::InvalidSignature);
        }

        let caller = public_key_to_address(&public_key);
        let expected = self.next_nonce(caller);
        if signed.nonce != expected {
            log::warn!(
                "Rejected call from {}: nonce {}, expected {}",
                caller,
                signed.nonce,
                expected
            );
            return Err(AuthError::BadNonce {
                expected,
                got: signed.nonce,
            });
        }

        let next = expected
            .checked_add(1)
            .ok_or(AuthError::NonceExhausted(caller))?;
        self.nonces.insert(caller, next);

        Ok(caller)
    }

    /// Authenticate `signed` and apply it to `ledger`
    pub fn execute(
        &mut self,
        ledger: &mut LedgerCore,
        signed: &SignedCall,
    ) -> Result<Address, AuthError> {
        let caller = self.authenticate(signed)?;
        signed.call.apply(ledger, caller)?;
        Ok(caller)
    }

    /// Same as [`Authenticator::execute`] against a shared ledger
    pub async fn execute_shared(
        &mut self,
        ledger: &SharedLedger,
        signed: &SignedCall,
    ) -> Result<Address, AuthError> {
        let caller = self.authenticate(signed)?;
        ledger.write(|l| signed.call.apply(l, caller)).await?;
        Ok(caller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Call;
    use crate::crypto::KeyPair;
    use crate::ledger::{LedgerError, MintPolicy, TokenMetadata};

    fn addr(n: u8) -> Address {
        let mut bytes = [0u8; 20];
        bytes[19] = n;
        Address::new(bytes)
    }

    fn ledger_minted_by(minter: Address) -> LedgerCore {
        let metadata = TokenMetadata::new("Signed Token", "SIG", 18).unwrap();
        LedgerCore::new(metadata, MintPolicy::Minter(minter))
    }

    #[test]
    fn test_execute_signed_calls() {
        let key = KeyPair::generate();
        let mut ledger = ledger_minted_by(key.address());
        let mut auth = Authenticator::new();

        let mint = SignedCall::sign(
            Call::Mint {
                to: key.address(),
                amount: 1000,
            },
            0,
            &key,
        )
        .unwrap();
        assert_eq!(auth.execute(&mut ledger, &mint).unwrap(), key.address());

        let transfer = SignedCall::sign(
            Call::Transfer {
                to: addr(2),
                amount: 100,
            },
            1,
            &key,
        )
        .unwrap();
        auth.execute(&mut ledger, &transfer).unwrap();

        assert_eq!(ledger.balance_of(key.address()), 900);
        assert_eq!(ledger.balance_of(addr(2)), 100);
        assert_eq!(auth.next_nonce(key.address()), 2);
    }

    #[test]
    fn test_replay_rejected() {
        let key = KeyPair::generate();
        let mut ledger = ledger_minted_by(key.address());
        let mut auth = Authenticator::new();

        let mint = SignedCall::sign(
            Call::Mint {
                to: key.address(),
                amount: 10,
            },
            0,
            &key,
        )
        .unwrap();
        auth.execute(&mut ledger, &mint).unwrap();

        let result = auth.execute(&mut ledger, &mint);
        assert!(matches!(
            result,
            Err(AuthError::BadNonce {
                expected: 1,
                got: 0
            })
        ));
        assert_eq!(ledger.total_supply(), 10);
    }

    #[test]
    fn test_tampered_call_rejected() {
        let key = KeyPair::generate();
        let mut ledger = ledger_minted_by(key.address());
        let mut auth = Authenticator::new();

        let mut signed = SignedCall::sign(
            Call::Mint {
                to: key.address(),
                amount: 10,
            },
            0,
            &key,
        )
        .unwrap();
        signed.call = Call::Mint {
            to: key.address(),
            amount: 10_000,
        };

        let result = auth.execute(&mut ledger, &signed);
        assert!(matches!(result, Err(AuthError::InvalidSignature)));
        assert_eq!(ledger.total_supply(), 0);
        assert_eq!(auth.next_nonce(key.address()), 0);
    }

    #[test]
    fn test_garbage_key_rejected() {
        let key = KeyPair::generate();
        let mut auth = Authenticator::new();

        let mut signed = SignedCall::sign(
            Call::Approve {
                spender: addr(1),
                amount: 1,
            },
            0,
            &key,
        )
        .unwrap();
        signed.public_key = "abcd".to_string();

        assert!(matches!(
            auth.authenticate(&signed),
            Err(AuthError::InvalidPublicKey)
        ));
    }

    #[test]
    fn test_ledger_rejection_consumes_nonce() {
        let minter = KeyPair::generate();
        let outsider = KeyPair::generate();
        let mut ledger = ledger_minted_by(minter.address());
        let mut auth = Authenticator::new();

        let signed = SignedCall::sign(
            Call::Mint {
                to: outsider.address(),
                amount: 1,
            },
            0,
            &outsider,
        )
        .unwrap();

        let result = auth.execute(&mut ledger, &signed);
        assert!(matches!(
            result,
            Err(AuthError::Ledger(LedgerError::Unauthorized { .. }))
        ));
        assert_eq!(auth.next_nonce(outsider.address()), 1);
        assert_eq!(ledger.total_supply(), 0);
    }

    #[tokio::test]
    async fn test_execute_shared() {
        let key = KeyPair::generate();
        let shared = SharedLedger::new(ledger_minted_by(key.address()));
        let mut auth = Authenticator::new();

        let mint = SignedCall::sign(
            Call::Mint {
                to: addr(5),
                amount: 42,
            },
            0,
            &key,
        )
        .unwrap();
        auth.execute_shared(&shared, &mint).await.unwrap();

        assert_eq!(shared.balance_of(addr(5)).await, 42);
    }

    #[tokio::test]
    async fn test_rejected_shared_call_leaves_ledger_unchanged() {
        let owner = KeyPair::generate();
        let spender = KeyPair::generate();
        let mut ledger = ledger_minted_by(owner.address());
        ledger.mint(owner.address(), owner.address(), 50).unwrap();
        ledger.approve(owner.address(), spender.address(), 80);
        let shared = SharedLedger::new(ledger);
        let mut auth = Authenticator::new();

        // Allowance covers it, balance does not
        let overdraw = SignedCall::sign(
            Call::TransferFrom {
                owner: owner.address(),
                to: addr(6),
                amount: 60,
            },
            0,
            &spender,
        )
        .unwrap();
        let result = auth.execute_shared(&shared, &overdraw).await;
        assert!(matches!(
            result,
            Err(AuthError::Ledger(LedgerError::InsufficientBalance {
                have: 50,
                need: 60
            }))
        ));

        assert_eq!(shared.balance_of(owner.address()).await, 50);
        assert_eq!(shared.balance_of(addr(6)).await, 0);
        assert_eq!(shared.allowance(owner.address(), spender.address()).await, 80);
        assert_eq!(shared.total_supply().await, 50);
        assert_eq!(auth.next_nonce(spender.address()), 1);
    }
}
