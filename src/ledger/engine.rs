// Ledger Engine - Band/member/balance accounting state machine
//
// Three keyed tables (bands, members, balances) plus two monotonic counters,
// mutated only through the operations below. Every operation checks all of
// its preconditions before writing anything: a failure aborts with zero side
// effects. Fund-moving operations invoke the external AssetTransfer
// collaborator between validation and commit, so a rejected transfer also
// leaves the books untouched.

use crate::identity::AccountId;
use crate::ledger::assets::{AssetTransfer, TransferError};
use crate::ledger::band::{Band, BandId, BandMember, MemberKey};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

/// Errors from ledger operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("caller is not authorized for this operation")]
    NotAuthorized,

    #[error("band not found")]
    BandNotFound,

    #[error("member not found in band")]
    MemberNotFound,

    #[error("percentage must be between 1 and 100")]
    InvalidPercentage,

    #[error("insufficient balance")]
    InsufficientBalance,

    #[error("record already exists")]
    AlreadyExists,

    #[error("amount must be greater than zero")]
    InvalidAmount,

    #[error("band balance would overflow")]
    BalanceOverflow,

    #[error("asset transfer failed: {0}")]
    TransferFailed(#[from] TransferError),
}

/// A member's share of the current pool at their current percentage,
/// rounded down to the smallest currency unit.
fn share_of(balance: u64, percentage: u8) -> u64 {
    ((balance as u128 * percentage as u128) / 100) as u64
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

/// The ledger state machine: bands, their members, and pooled balances.
///
/// Strictly serial: callers invoke `&mut self` operations one at a time and
/// observe each as an indivisible transition. Transaction ordering in a
/// concurrent host is the host's responsibility.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BandLedger {
    /// Band table: id -> band record
    bands: HashMap<BandId, Band>,
    /// Member table: (band, member) -> member record
    members: HashMap<MemberKey, BandMember>,
    /// Balance table: id -> pooled balance in smallest currency units
    balances: HashMap<BandId, u64>,
    /// Next band id to allocate (starts at 1)
    next_band_id: u64,
    /// Global join sequence, shared across all bands (starts at 0)
    member_join_sequence: u64,
}

impl BandLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self {
            bands: HashMap::new(),
            members: HashMap::new(),
            balances: HashMap::new(),
            next_band_id: 1,
            member_join_sequence: 0,
        }
    }

    // ========================================================================
    // MUTATING OPERATIONS
    // ========================================================================

    /// Register a new band owned by the caller, with an empty pool.
    pub fn create_band(
        &mut self,
        name: impl Into<String>,
        caller: &AccountId,
    ) -> Result<BandId, LedgerError> {
        let band_id = BandId::new(self.next_band_id);

        // Freshly allocated ids should never collide; kept as a guard in case
        // a future host pre-seeds or reuses ids.
        if self.bands.contains_key(&band_id) {
            return Err(LedgerError::AlreadyExists);
        }

        let band = Band::new(name.into(), caller.clone(), unix_now());
        self.bands.insert(band_id, band);
        self.balances.insert(band_id, 0);
        self.next_band_id += 1;

        debug!(%band_id, owner = %caller, "band created");
        Ok(band_id)
    }

    /// Register a member under a band with a percentage share. Owner-only.
    pub fn add_member(
        &mut self,
        band_id: BandId,
        member: &AccountId,
        name: impl Into<String>,
        percentage: u8,
        caller: &AccountId,
    ) -> Result<(), LedgerError> {
        let band = self.bands.get(&band_id).ok_or(LedgerError::BandNotFound)?;
        if band.owner() != caller {
            return Err(LedgerError::NotAuthorized);
        }
        if percentage == 0 || percentage > 100 {
            return Err(LedgerError::InvalidPercentage);
        }
        let key = MemberKey::new(band_id, member.clone());
        if self.members.contains_key(&key) {
            return Err(LedgerError::AlreadyExists);
        }

        let record = BandMember::new(name.into(), percentage, self.member_join_sequence);
        self.members.insert(key, record);
        // Re-borrow mutably only after every precondition has passed
        if let Some(band) = self.bands.get_mut(&band_id) {
            band.record_member_added();
        }
        self.member_join_sequence += 1;

        debug!(%band_id, member = %member, percentage, "member added");
        Ok(())
    }

    /// Change a member's percentage going forward. Owner-only. Does not touch
    /// balances or earnings.
    pub fn update_member_percentage(
        &mut self,
        band_id: BandId,
        member: &AccountId,
        new_percentage: u8,
        caller: &AccountId,
    ) -> Result<(), LedgerError> {
        let band = self.bands.get(&band_id).ok_or(LedgerError::BandNotFound)?;
        if band.owner() != caller {
            return Err(LedgerError::NotAuthorized);
        }
        let key = MemberKey::new(band_id, member.clone());
        if !self.members.contains_key(&key) {
            return Err(LedgerError::MemberNotFound);
        }
        if new_percentage == 0 || new_percentage > 100 {
            return Err(LedgerError::InvalidPercentage);
        }

        if let Some(record) = self.members.get_mut(&key) {
            record.set_percentage(new_percentage);
        }

        debug!(%band_id, member = %member, new_percentage, "percentage updated");
        Ok(())
    }

    /// Deposit funds from the caller into a band's pool. Any caller may
    /// deposit; the band must be active.
    pub fn deposit_payment(
        &mut self,
        band_id: BandId,
        amount: u64,
        caller: &AccountId,
        assets: &mut dyn AssetTransfer,
    ) -> Result<(), LedgerError> {
        let band = self.bands.get(&band_id).ok_or(LedgerError::BandNotFound)?;
        if amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }
        // Error-code reuse carried from the source contract: an inactive band
        // rejects deposits as NotAuthorized.
        if !band.is_active() {
            return Err(LedgerError::NotAuthorized);
        }
        let balance = *self.balances.get(&band_id).ok_or(LedgerError::BandNotFound)?;
        let new_balance = balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow)?;

        assets.collect(caller, amount)?;
        self.balances.insert(band_id, new_balance);

        debug!(%band_id, amount, new_balance, "deposit recorded");
        Ok(())
    }

    /// Withdraw the caller's share of the band's CURRENT pool: the share is
    /// `floor(balance * percentage / 100)` against whatever the balance is
    /// right now, so sequential withdrawals by different members are
    /// order-dependent. Returns the amount paid out.
    pub fn withdraw_earnings(
        &mut self,
        band_id: BandId,
        caller: &AccountId,
        assets: &mut dyn AssetTransfer,
    ) -> Result<u64, LedgerError> {
        let key = MemberKey::new(band_id, caller.clone());
        let percentage = self
            .members
            .get(&key)
            .ok_or(LedgerError::MemberNotFound)?
            .percentage();
        let balance = *self.balances.get(&band_id).ok_or(LedgerError::BandNotFound)?;

        let share = share_of(balance, percentage);
        if share == 0 {
            return Err(LedgerError::InsufficientBalance);
        }

        assets.payout(caller, share)?;
        self.balances.insert(band_id, balance - share);
        if let Some(record) = self.members.get_mut(&key) {
            record.record_earnings(share);
        }

        debug!(%band_id, member = %caller, share, "earnings withdrawn");
        Ok(share)
    }

    /// Sweep the entire pool to the owner, bypassing per-member percentages.
    /// Circuit-breaker operation; owner-only. Returns the amount swept.
    pub fn emergency_withdraw(
        &mut self,
        band_id: BandId,
        caller: &AccountId,
        assets: &mut dyn AssetTransfer,
    ) -> Result<u64, LedgerError> {
        let band = self.bands.get(&band_id).ok_or(LedgerError::BandNotFound)?;
        if band.owner() != caller {
            return Err(LedgerError::NotAuthorized);
        }
        let balance = *self.balances.get(&band_id).ok_or(LedgerError::BandNotFound)?;
        if balance == 0 {
            return Err(LedgerError::InsufficientBalance);
        }

        assets.payout(caller, balance)?;
        self.balances.insert(band_id, 0);

        debug!(%band_id, amount = balance, "emergency withdrawal");
        Ok(balance)
    }

    /// Mark a band inactive, closing it to further deposits. Owner-only and
    /// idempotent; withdrawals against the remaining pool keep working.
    pub fn deactivate_band(
        &mut self,
        band_id: BandId,
        caller: &AccountId,
    ) -> Result<(), LedgerError> {
        let band = self.bands.get(&band_id).ok_or(LedgerError::BandNotFound)?;
        if band.owner() != caller {
            return Err(LedgerError::NotAuthorized);
        }

        if let Some(band) = self.bands.get_mut(&band_id) {
            band.deactivate();
        }

        debug!(%band_id, "band deactivated");
        Ok(())
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Look up a band record
    pub fn get_band_info(&self, band_id: BandId) -> Option<&Band> {
        self.bands.get(&band_id)
    }

    /// Look up a member record
    pub fn get_member_info(&self, band_id: BandId, member: &AccountId) -> Option<&BandMember> {
        self.members.get(&MemberKey::new(band_id, member.clone()))
    }

    /// Current pooled balance of a band
    pub fn get_band_balance(&self, band_id: BandId) -> Option<u64> {
        self.balances.get(&band_id).copied()
    }

    /// What a member could withdraw right now: their percentage of the
    /// current pool. Absent if the band or member is missing.
    pub fn calculate_member_earnings(&self, band_id: BandId, member: &AccountId) -> Option<u64> {
        let balance = self.get_band_balance(band_id)?;
        let record = self.get_member_info(band_id, member)?;
        Some(share_of(balance, record.percentage()))
    }

    /// Current value of the global join sequence
    pub fn get_member_join_order(&self) -> u64 {
        self.member_join_sequence
    }

    /// Number of bands ever created
    pub fn get_total_bands(&self) -> u64 {
        self.next_band_id - 1
    }

    /// Whether an identity is registered under a band
    pub fn is_band_member(&self, band_id: BandId, member: &AccountId) -> bool {
        self.members
            .contains_key(&MemberKey::new(band_id, member.clone()))
    }
}

impl Default for BandLedger {
    fn default() -> Self {
        Self::new()
    }
}
