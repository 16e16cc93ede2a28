// Band records - The three logical tables' row types
//
// Bands, members, and the composite key that joins them. Plain data with
// accessor methods; all mutation goes through the engine.

use crate::identity::AccountId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a band, assigned in creation order starting at 1
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BandId(u64);

impl BandId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for BandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "band#{}", self.0)
    }
}

/// Composite key for the member table: one record per (band, member) pair
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberKey {
    pub band: BandId,
    pub member: AccountId,
}

impl MemberKey {
    pub fn new(band: BandId, member: AccountId) -> Self {
        Self { band, member }
    }
}

/// A registered band: an owner and a pool of funds to split among members
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Band {
    name: String,
    owner: AccountId,
    total_members: u64,
    active: bool,
    created_at: u64,
}

impl Band {
    pub(crate) fn new(name: String, owner: AccountId, created_at: u64) -> Self {
        Self {
            name,
            owner,
            total_members: 0,
            active: true,
            created_at,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The owner, fixed at creation
    pub fn owner(&self) -> &AccountId {
        &self.owner
    }

    /// Count of member records, maintained incrementally by the engine
    pub fn total_members(&self) -> u64 {
        self.total_members
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Unix timestamp (seconds) recorded at creation
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    pub(crate) fn record_member_added(&mut self) {
        self.total_members += 1;
    }

    pub(crate) fn deactivate(&mut self) {
        self.active = false;
    }
}

/// A member's registration under a band: a percentage claim on the pool
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BandMember {
    name: String,
    percentage: u8,
    total_earned: u64,
    joined_at: u64,
}

impl BandMember {
    pub(crate) fn new(name: String, percentage: u8, joined_at: u64) -> Self {
        Self {
            name,
            percentage,
            total_earned: 0,
            joined_at,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Share of the current pool this member may withdraw, in 1..=100
    pub fn percentage(&self) -> u8 {
        self.percentage
    }

    /// Cumulative amount ever withdrawn; only increases
    pub fn total_earned(&self) -> u64 {
        self.total_earned
    }

    /// Global join sequence value at insertion, strictly increasing across all bands
    pub fn joined_at(&self) -> u64 {
        self.joined_at
    }

    pub(crate) fn set_percentage(&mut self, percentage: u8) {
        self.percentage = percentage;
    }

    pub(crate) fn record_earnings(&mut self, amount: u64) {
        self.total_earned += amount;
    }
}
