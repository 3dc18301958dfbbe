//! Shared ledger handle for concurrent hosts
//!
//! Every mutation runs under the write lock for its full duration, so
//! callers observe operations in one total order and never see half of a
//! transfer.

use super::address::Address;
use super::error::LedgerError;
use super::ledger::LedgerCore;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A cloneable, thread-safe handle to one [`LedgerCore`]
#[derive(Clone, Debug)]
pub struct SharedLedger {
    inner: Arc<RwLock<LedgerCore>>,
}

impl SharedLedger {
    pub fn new(ledger: LedgerCore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ledger)),
        }
    }

    pub async fn mint(
        &self,
        caller: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), LedgerError> {
        self.inner.write().await.mint(caller, to, amount)
    }

    pub async fn transfer(
        &self,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), LedgerError> {
        self.inner.write().await.transfer(from, to, amount)
    }

    pub async fn approve(&self, owner: Address, spender: Address, amount: u128) {
        self.inner.write().await.approve(owner, spender, amount)
    }

    pub async fn transfer_from(
        &self,
        spender: Address,
        owner: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), LedgerError> {
        self.inner
            .write()
            .await
            .transfer_from(spender, owner, to, amount)
    }

    pub async fn balance_of(&self, account: Address) -> u128 {
        self.inner.read().await.balance_of(account)
    }

    pub async fn allowance(&self, owner: Address, spender: Address) -> u128 {
        self.inner.read().await.allowance(owner, spender)
    }

    pub async fn total_supply(&self) -> u128 {
        self.inner.read().await.total_supply()
    }

    /// Run a closure against a consistent view of the ledger
    pub async fn read<R>(&self, f: impl FnOnce(&LedgerCore) -> R) -> R {
        f(&*self.inner.read().await)
    }

    /// Run one ledger operation under the write lock
    pub(crate) async fn write<R>(&self, f: impl FnOnce(&mut LedgerCore) -> R) -> R {
        f(&mut *self.inner.write().await)
    }

    /// Clone the current state, e.g. for persisting it
    pub async fn snapshot(&self) -> LedgerCore {
        self.inner.read().await.clone()
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

    fn shared_with_supply(holders: &[Address], each: u128) -> SharedLedger {
        let metadata = TokenMetadata::new("Shared", "SHR", 6).unwrap();
        let mut ledger = LedgerCore::new(metadata, MintPolicy::Open);
        for holder in holders {
            ledger.mint(*holder, *holder, each).unwrap();
        }
        SharedLedger::new(ledger)
    }

    #[tokio::test]
    async fn test_shared_operations() {
        let ledger = shared_with_supply(&[addr(1)], 100);

        ledger.transfer(addr(1), addr(2), 40).await.unwrap();
        ledger.approve(addr(2), addr(3), 10).await;
        ledger
            .transfer_from(addr(3), addr(2), addr(4), 10)
            .await
            .unwrap();

        assert_eq!(ledger.balance_of(addr(1)).await, 60);
        assert_eq!(ledger.balance_of(addr(2)).await, 30);
        assert_eq!(ledger.balance_of(addr(4)).await, 10);
        assert_eq!(ledger.allowance(addr(2), addr(3)).await, 0);
        assert_eq!(ledger.total_supply().await, 100);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let ledger = shared_with_supply(&[], 0);
        let other = ledger.clone();

        other.mint(addr(1), addr(1), 5).await.unwrap();
        assert_eq!(ledger.balance_of(addr(1)).await, 5);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_transfers_conserve_supply() {
        let accounts: Vec<Address> = (1..=8).map(addr).collect();
        let ledger = shared_with_supply(&accounts, 1_000);

        let mut handles = Vec::new();
        for i in 0..accounts.len() {
            let ledger = ledger.clone();
            let from = accounts[i];
            let to = accounts[(i + 1) % accounts.len()];
            handles.push(tokio::spawn(async move {
                for _ in 0..200 {
                    let _ = ledger.transfer(from, to, 7).await;
                    let total = ledger
                        .read(|l| l.holders().iter().map(|(_, b)| *b).sum::<u128>())
                        .await;
                    assert_eq!(total, 8_000);
                }
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(ledger.total_supply().await, 8_000);
        ledger.snapshot().await.verify_conservation().unwrap();
    }
}
