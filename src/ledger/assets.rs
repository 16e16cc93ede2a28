// Asset transfer - The external fund-movement collaborator
//
// The engine computes amounts and records bookkeeping; actually moving
// currency between accounts and the pool escrow is delegated to whatever
// asset ledger the host runs on. A transfer either fully succeeds or the
// whole engine operation aborts with no bookkeeping recorded.

use crate::identity::AccountId;
use std::collections::HashMap;
use thiserror::Error;

/// Failure reported by the underlying asset ledger
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct TransferError(pub String);

// ============================================================================
// ASSET TRANSFER TRAIT
// ============================================================================

/// Trait for the asset ledger the pooled funds actually live on
pub trait AssetTransfer {
    /// Move `amount` from `from` into the pool escrow
    fn collect(&mut self, from: &AccountId, amount: u64) -> Result<(), TransferError>;

    /// Pay `amount` out of the pool escrow to `to`
    fn payout(&mut self, to: &AccountId, amount: u64) -> Result<(), TransferError>;
}

// ============================================================================
// IN-MEMORY ASSET LEDGER
// ============================================================================

/// A working in-memory asset ledger: per-account balances plus one escrow
/// bucket holding everything collected into band pools.
#[derive(Clone, Debug, Default)]
pub struct InMemoryAssets {
    accounts: HashMap<AccountId, u64>,
    escrow: u64,
}

impl InMemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit an account out of thin air (test/host setup)
    pub fn mint(&mut self, account: &AccountId, amount: u64) {
        *self.accounts.entry(account.clone()).or_insert(0) += amount;
    }

    pub fn balance_of(&self, account: &AccountId) -> u64 {
        self.accounts.get(account).copied().unwrap_or(0)
    }

    /// Total held in escrow across all pools
    pub fn escrow(&self) -> u64 {
        self.escrow
    }
}

impl AssetTransfer for InMemoryAssets {
    fn collect(&mut self, from: &AccountId, amount: u64) -> Result<(), TransferError> {
        let balance = self.accounts.entry(from.clone()).or_insert(0);
        if *balance < amount {
            return Err(TransferError(format!(
                "account {from} holds {balance}, cannot collect {amount}"
            )));
        }
        *balance -= amount;
        self.escrow += amount;
        Ok(())
    }

    fn payout(&mut self, to: &AccountId, amount: u64) -> Result<(), TransferError> {
        if self.escrow < amount {
            return Err(TransferError(format!(
                "escrow holds {}, cannot pay out {amount}",
                self.escrow
            )));
        }
        self.escrow -= amount;
        *self.accounts.entry(to.clone()).or_insert(0) += amount;
        Ok(())
    }
}

// ============================================================================
// MOCK ASSET LEDGER
// ============================================================================

/// Mock implementation of AssetTransfer for testing failure handling
pub struct MockAssets {
    should_succeed: bool,
    failure_message: Option<String>,
    call_count: usize,
}

impl MockAssets {
    /// Create a new mock (defaults to failure)
    pub fn new() -> Self {
        Self {
            should_succeed: false,
            failure_message: None,
            call_count: 0,
        }
    }

    /// Configure to always succeed
    pub fn with_success(mut self) -> Self {
        self.should_succeed = true;
        self
    }

    /// Configure to always fail with a message
    pub fn with_failure(mut self, message: String) -> Self {
        self.should_succeed = false;
        self.failure_message = Some(message);
        self
    }

    /// Number of transfer attempts seen
    pub fn call_count(&self) -> usize {
        self.call_count
    }

    fn attempt(&mut self) -> Result<(), TransferError> {
        self.call_count += 1;
        if self.should_succeed {
            Ok(())
        } else {
            Err(TransferError(
                self.failure_message
                    .clone()
                    .unwrap_or_else(|| "mock transfer rejected".to_string()),
            ))
        }
    }
}

impl Default for MockAssets {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetTransfer for MockAssets {
    fn collect(&mut self, _from: &AccountId, _amount: u64) -> Result<(), TransferError> {
        self.attempt()
    }

    fn payout(&mut self, _to: &AccountId, _amount: u64) -> Result<(), TransferError> {
        self.attempt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_moves_funds_into_escrow() {
        let alice = AccountId::from_seed("alice");
        let mut assets = InMemoryAssets::new();
        assets.mint(&alice, 500);

        assets.collect(&alice, 300).unwrap();

        assert_eq!(assets.balance_of(&alice), 200);
        assert_eq!(assets.escrow(), 300);
    }

    #[test]
    fn test_collect_rejects_overdraft() {
        let alice = AccountId::from_seed("alice");
        let mut assets = InMemoryAssets::new();
        assets.mint(&alice, 100);

        assert!(assets.collect(&alice, 101).is_err());
        assert_eq!(assets.balance_of(&alice), 100);
        assert_eq!(assets.escrow(), 0);
    }

    #[test]
    fn test_payout_rejects_empty_escrow() {
        let alice = AccountId::from_seed("alice");
        let mut assets = InMemoryAssets::new();

        assert!(assets.payout(&alice, 1).is_err());
    }

    #[test]
    fn test_mock_counts_calls() {
        let alice = AccountId::from_seed("alice");
        let mut mock = MockAssets::new().with_success();

        mock.collect(&alice, 10).unwrap();
        mock.payout(&alice, 10).unwrap();

        assert_eq!(mock.call_count(), 2);
    }
}
