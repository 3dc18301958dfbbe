//! ERC-20 style ledger core
//!
//! Owns every balance, every allowance and the total supply of one token.
//! Each mutating call either applies completely or returns an error and
//! leaves the ledger as it was.

use super::address::Address;
use super::error::LedgerError;
use super::metadata::TokenMetadata;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Who may call [`LedgerCore::mint`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "address", rename_all = "snake_case")]
pub enum MintPolicy {
    /// Any caller may mint
    #[default]
    Open,
    /// Only the given caller may mint
    Minter(Address),
}

impl MintPolicy {
    /// Whether `caller` is allowed to mint under this policy
    pub fn permits(&self, caller: Address) -> bool {
        match self {
            MintPolicy::Open => true,
            MintPolicy::Minter(minter) => *minter == caller,
        }
    }
}

/// Balance and allowance bookkeeping for a single token
///
/// Mutating operations take the authenticated caller as their first
/// argument; the ledger never looks up an ambient sender.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerCore {
    metadata: TokenMetadata,
    mint_policy: MintPolicy,
    total_supply: u128,
    /// Balances: address -> amount (zero balances are not stored)
    balances: HashMap<Address, u128>,
    /// Allowances: owner -> (spender -> amount)
    allowances: HashMap<Address, HashMap<Address, u128>>,
}

impl LedgerCore {
    /// Create an empty ledger with zero supply
    pub fn new(metadata: TokenMetadata, mint_policy: MintPolicy) -> Self {
        log::info!(
            "Ledger created: {} ({}), mint policy {:?}",
            metadata.name,
            metadata.symbol,
            mint_policy
        );

        Self {
            metadata,
            mint_policy,
            total_supply: 0,
            balances: HashMap::new(),
            allowances: HashMap::new(),
        }
    }

    /// Create a ledger whose initial supply is minted to `holder`
    ///
    /// This is construction, not a call, so the mint policy is not consulted.
    pub fn with_initial_mint(
        metadata: TokenMetadata,
        mint_policy: MintPolicy,
        holder: Address,
        amount: u128,
    ) -> Result<Self, LedgerError> {
        let mut ledger = Self::new(metadata, mint_policy);
        ledger.credit_supply(holder, amount)?;
        log::info!("Initial supply of {} minted to {}", amount, holder);
        Ok(ledger)
    }

    // =========================================================================
    // Views
    // =========================================================================

    pub fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn symbol(&self) -> &str {
        &self.metadata.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.metadata.decimals
    }

    pub fn mint_policy(&self) -> MintPolicy {
        self.mint_policy
    }

    /// Get total supply
    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    /// Get balance of an address, zero if it has never been credited
    pub fn balance_of(&self, account: Address) -> u128 {
        self.balances.get(&account).copied().unwrap_or(0)
    }

    /// Get what `spender` may still move out of `owner`'s balance
    pub fn allowance(&self, owner: Address, spender: Address) -> u128 {
        self.allowances
            .get(&owner)
            .and_then(|spenders| spenders.get(&spender))
            .copied()
            .unwrap_or(0)
    }

    /// All accounts holding a non-zero balance, ordered by address
    pub fn holders(&self) -> Vec<(Address, u128)> {
        let mut holders: Vec<(Address, u128)> =
            self.balances.iter().map(|(a, b)| (*a, *b)).collect();
        holders.sort_by_key(|(address, _)| *address);
        holders
    }

    pub fn holder_count(&self) -> usize {
        self.balances.len()
    }

    /// Check that the balance table sums to the total supply
    pub fn verify_conservation(&self) -> Result<(), LedgerError> {
        let sum = self
            .balances
            .values()
            .try_fold(0u128, |acc, b| acc.checked_add(*b));

        match sum {
            Some(sum) if sum == self.total_supply => Ok(()),
            Some(sum) => Err(LedgerError::ConservationViolated {
                sum,
                supply: self.total_supply,
            }),
            None => Err(LedgerError::ConservationViolated {
                sum: u128::MAX,
                supply: self.total_supply,
            }),
        }
    }

    /// Check every rule a ledger built through its own operations upholds
    ///
    /// Used on state that arrives from outside, such as a loaded snapshot.
    pub fn validate_invariants(&self) -> Result<(), LedgerError> {
        TokenMetadata::new(
            self.metadata.name.clone(),
            self.metadata.symbol.clone(),
            self.metadata.decimals,
        )?;

        if self.balances.contains_key(&Address::ZERO) {
            return Err(LedgerError::InvalidState(
                "null address holds a balance".to_string(),
            ));
        }
        if let Some((account, _)) = self.balances.iter().find(|(_, b)| **b == 0) {
            return Err(LedgerError::InvalidState(format!(
                "zero balance stored for {}",
                account
            )));
        }

        for (owner, spenders) in &self.allowances {
            if spenders.is_empty() {
                return Err(LedgerError::InvalidState(format!(
                    "empty allowance table for {}",
                    owner
                )));
            }
            if let Some((spender, _)) = spenders.iter().find(|(_, a)| **a == 0) {
                return Err(LedgerError::InvalidState(format!(
                    "zero allowance stored for {} over {}",
                    spender, owner
                )));
            }
        }

        self.verify_conservation()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Create `amount` new tokens and credit them to `to`
    ///
    /// A zero amount is accepted and changes nothing.
    pub fn mint(
        &mut self,
        caller: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), LedgerError> {
        if !self.mint_policy.permits(caller) {
            return Err(LedgerError::Unauthorized { caller });
        }

        self.credit_supply(to, amount)?;

        log::info!("Minted {} {} to {}", amount, self.metadata.symbol, to);
        Ok(())
    }

    /// Move `amount` from the caller `from` to `to`
    pub fn transfer(
        &mut self,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), LedgerError> {
        if to.is_null() {
            return Err(LedgerError::InvalidRecipient);
        }

        self.move_balance(from, to, amount)?;

        log::debug!("Transfer {} from {} to {}", amount, from, to);
        Ok(())
    }

    /// Set the caller `owner`'s allowance for `spender` to exactly `amount`
    ///
    /// Any outstanding allowance is replaced, not added to. A spender watching
    /// for a lowered approval can still spend the old amount first.
    pub fn approve(&mut self, owner: Address, spender: Address, amount: u128) {
        if amount == 0 {
            if let Some(spenders) = self.allowances.get_mut(&owner) {
                spenders.remove(&spender);
                if spenders.is_empty() {
                    self.allowances.remove(&owner);
                }
            }
        } else {
            self.allowances
                .entry(owner)
                .or_default()
                .insert(spender, amount);
        }

        log::debug!("Approve {} for {} by {}", amount, spender, owner);
    }

    /// Move `amount` from `owner` to `to` on behalf of the caller `spender`
    ///
    /// Spends the same amount of `spender`'s allowance. When `owner == to`
    /// balances stay put but the allowance is still spent.
    pub fn transfer_from(
        &mut self,
        spender: Address,
        owner: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), LedgerError> {
        if owner.is_null() || to.is_null() {
            return Err(LedgerError::InvalidAddress);
        }

        let current_allowance = self.allowance(owner, spender);
        if current_allowance < amount {
            return Err(LedgerError::AllowanceExceeded {
                have: current_allowance,
                need: amount,
            });
        }

        self.move_balance(owner, to, amount)?;
        self.approve(owner, spender, current_allowance - amount);

        log::debug!(
            "TransferFrom {} from {} to {} by {}",
            amount,
            owner,
            to,
            spender
        );
        Ok(())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Increase supply and `to`'s balance together
    fn credit_supply(&mut self, to: Address, amount: u128) -> Result<(), LedgerError> {
        if to.is_null() {
            return Err(LedgerError::InvalidRecipient);
        }

        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        let balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;

        self.total_supply = supply;
        self.set_balance(to, balance);
        Ok(())
    }

    /// Debit `from` and credit `to`; all checks run before either write
    fn move_balance(
        &mut self,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), LedgerError> {
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return Err(LedgerError::InsufficientBalance {
                have: from_balance,
                need: amount,
            });
        }

        // Reading both balances first would credit a self-transfer twice
        if from == to {
            return Ok(());
        }

        let to_balance = self.balance_of(to);
        let new_to = to_balance
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        let new_from = from_balance - amount;

        debug_assert_eq!(
            from_balance.checked_add(to_balance),
            new_from.checked_add(new_to)
        );

        self.set_balance(from, new_from);
        self.set_balance(to, new_to);
        Ok(())
    }

    fn set_balance(&mut self, account: Address, balance: u128) {
        if balance == 0 {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, balance);
        }
    }
}
