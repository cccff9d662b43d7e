//! Core Types for the YieldRise Treasury
//!
//! Fundamental data structures shared by the accounting engine, its
//! executors and anything that reads the ledger.

use core::fmt;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Type alias for account identities (32-byte hash)
pub type Address = [u8; 32];

/// Asset amount in base units (18 decimals)
pub type Amount = u128;

/// Basis points (10_000 = 100%)
pub type BasisPoints = u128;

// ============ Track Types ============

/// One of the two independently accounted assets
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
#[borsh(use_discriminant = true)]
#[repr(u8)]
pub enum AssetTrack {
    /// Chain-native settlement asset
    Native = 0x01,
    /// External stable-value asset
    Stable = 0x02,
}

impl AssetTrack {
    /// Both tracks, in settlement order
    pub const ALL: [AssetTrack; 2] = [AssetTrack::Native, AssetTrack::Stable];

    /// Ticker of the asset carried by this track
    pub fn symbol(&self) -> &'static str {
        match self {
            AssetTrack::Native => crate::constants::token::NATIVE_SYMBOL,
            AssetTrack::Stable => crate::constants::token::STABLE_SYMBOL,
        }
    }
}

impl fmt::Display for AssetTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetTrack::Native => f.write_str("native"),
            AssetTrack::Stable => f.write_str("stable"),
        }
    }
}

// ============ Depositor Types ============

/// Per-depositor record on one asset track.
///
/// Records are never removed; a full halt or a rescue resets the live
/// fields to zero while `lifetime_contribution` survives for reporting.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default,
    Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct DepositorRecord {
    /// Principal currently recognized for this depositor
    pub contribution: Amount,
    /// Sum of every deposit ever made; never reduced
    pub lifetime_contribution: Amount,
    /// Yield allocated but not yet paid out
    pub claimable_yield: Amount,
}

impl DepositorRecord {
    /// Whether the depositor currently has principal in the pool
    pub fn is_active(&self) -> bool {
        self.contribution > 0
    }
}

/// Read-only view of one depositor
#[derive(
    Debug, Clone, Copy, PartialEq, Eq,
    Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct DepositorView {
    /// Depositor identity
    pub depositor: Address,
    /// Stored record
    pub record: DepositorRecord,
    /// Share of the total contribution (basis points, truncated)
    pub share_bps: BasisPoints,
    /// Liquid entitlement still owed to the depositor
    pub unstakeable: Amount,
}

// ============ Pool Types ============

/// Complete observable state of one asset track
#[derive(
    Debug, Clone, PartialEq, Eq,
    Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct PoolSnapshot {
    /// Track the snapshot was taken from
    pub track: AssetTrack,
    /// Sum of contributions plus unattributed stake
    pub total_contribution: Amount,
    /// Immediately withdrawable compartment
    pub liquid: Amount,
    /// Compartment supplied to the yield strategy
    pub locked: Amount,
    /// Harvested yield awaiting claims
    pub yield_pool: Amount,
    /// Truncation remainder of past harvests
    pub undistributed_dust: Amount,
    /// Strategy value basis used for the next harvest
    pub last_observed_value: Amount,
    /// Contribution floor
    pub minimum_contribution: Amount,
    /// Whether administrative privileges were dropped
    pub renounced: bool,
    /// Number of completed harvests that distributed yield
    pub harvest_count: u64,
    /// Every depositor ever seen, in address order
    pub depositors: crate::Vec<DepositorView>,
}

impl PoolSnapshot {
    /// Sum of all recorded contributions
    pub fn attributed_contribution(&self) -> Amount {
        self.depositors.iter().map(|d| d.record.contribution).sum()
    }

    /// Sum of all claimable yield
    pub fn allocated_yield(&self) -> Amount {
        self.depositors.iter().map(|d| d.record.claimable_yield).sum()
    }

    /// Stake recognized by the pool but owned by no depositor
    /// (sweeps and forfeited locked shares)
    pub fn unattributed_contribution(&self) -> Amount {
        self.total_contribution
            .saturating_sub(self.attributed_contribution())
    }
}
