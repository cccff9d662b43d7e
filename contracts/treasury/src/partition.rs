//! Liquidity Partition
//!
//! The Liquid / Locked / Yield compartments of one asset track.
//!
//! Every accepted deposit is split by the fixed liquid ratio. The liquid
//! share is computed on the depositor's cumulative contribution,
//! `unstakeable(prior + amount) - unstakeable(prior)`, so `liquid` always
//! equals the sum of every depositor's unstakeable amount exactly and
//! rounding never over-issues the liquid side.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use yieldrise_common::math;
use yieldrise_common::{Amount, AssetTrack, BasisPoints, TreasuryError, TreasuryResult};

/// Result of splitting a deposit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split {
    pub liquid: Amount,
    pub locked: Amount,
}

/// Compartment balances of one asset track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct LiquidityPartition {
    track: AssetTrack,
    liquid_ratio_bps: BasisPoints,
    /// Immediately withdrawable
    liquid: Amount,
    /// Supplied to the yield strategy
    locked: Amount,
    /// Harvested, allocated, unclaimed
    yield_pool: Amount,
}

impl LiquidityPartition {
    pub fn new(track: AssetTrack, liquid_ratio_bps: BasisPoints) -> TreasuryResult<Self> {
        math::validate_bps(liquid_ratio_bps, "liquid_ratio_bps")?;
        Ok(Self {
            track,
            liquid_ratio_bps,
            liquid: 0,
            locked: 0,
            yield_pool: 0,
        })
    }

    /// Liquid entitlement of a contribution
    pub fn unstakeable(&self, contribution: Amount) -> TreasuryResult<Amount> {
        math::apply_bps(contribution, self.liquid_ratio_bps)
    }

    /// Split `amount` deposited on top of `prior_contribution`
    pub fn split(&self, prior_contribution: Amount, amount: Amount) -> TreasuryResult<Split> {
        let before = self.unstakeable(prior_contribution)?;
        let after = self.unstakeable(math::add(prior_contribution, amount)?)?;
        let liquid = math::sub(after, before)?;
        Ok(Split {
            liquid,
            locked: math::sub(amount, liquid)?,
        })
    }

    /// Book a split deposit into the liquid and locked compartments
    pub fn apply_deposit(&mut self, split: Split) -> TreasuryResult<()> {
        let liquid = math::add(self.liquid, split.liquid)?;
        let locked = math::add(self.locked, split.locked)?;
        self.liquid = liquid;
        self.locked = locked;
        Ok(())
    }

    /// Pull funds that arrived outside the deposit path into `locked`
    pub fn absorb_unattributed(&mut self, amount: Amount) -> TreasuryResult<()> {
        self.locked = math::add(self.locked, amount)?;
        Ok(())
    }

    /// Check a liquid payout is covered
    pub fn ensure_liquid(&self, amount: Amount) -> TreasuryResult<()> {
        if amount > self.liquid {
            return Err(TreasuryError::InsufficientLiquidity {
                track: self.track,
                available: self.liquid,
                requested: amount,
            });
        }
        Ok(())
    }

    /// Debit a liquid payout
    pub fn release_liquid(&mut self, amount: Amount) -> TreasuryResult<()> {
        self.ensure_liquid(amount)?;
        self.liquid -= amount;
        Ok(())
    }

    /// Add allocated yield to the yield compartment
    pub fn credit_yield(&mut self, amount: Amount) -> TreasuryResult<()> {
        self.yield_pool = math::add(self.yield_pool, amount)?;
        Ok(())
    }

    /// Debit a yield payout
    pub fn debit_yield(&mut self, amount: Amount) -> TreasuryResult<()> {
        if amount > self.yield_pool {
            return Err(TreasuryError::InvariantViolated {
                invariant: "claim exceeds yield pool",
            });
        }
        self.yield_pool -= amount;
        Ok(())
    }

    /// Empty every compartment (pool teardown)
    pub fn clear(&mut self) {
        self.liquid = 0;
        self.locked = 0;
        self.yield_pool = 0;
    }

    pub fn liquid(&self) -> Amount {
        self.liquid
    }

    pub fn locked(&self) -> Amount {
        self.locked
    }

    pub fn yield_pool(&self) -> Amount {
        self.yield_pool
    }

    pub fn liquid_ratio_bps(&self) -> BasisPoints {
        self.liquid_ratio_bps
    }
}
