//! Contribution Ledger
//!
//! Per-depositor and aggregate principal bookkeeping for one asset track.
//! Records are created on first deposit and never removed: exits reset
//! them to zero while `lifetime_contribution` survives.

use std::collections::BTreeMap;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use yieldrise_common::accounts;
use yieldrise_common::math;
use yieldrise_common::{Address, Amount, DepositorRecord, TreasuryError, TreasuryResult};

/// Principal ledger of one asset track
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct ContributionLedger {
    records: BTreeMap<Address, DepositorRecord>,
    /// Sum of contributions plus unattributed stake
    total_contribution: Amount,
    /// Deposits under this amount are rejected
    minimum_contribution: Amount,
}

impl ContributionLedger {
    /// Create an empty ledger with a contribution floor
    pub fn new(minimum_contribution: Amount) -> Self {
        Self {
            records: BTreeMap::new(),
            total_contribution: 0,
            minimum_contribution,
        }
    }

    /// Check a deposit against the floor without touching state
    pub fn validate_deposit(&self, depositor: &Address, amount: Amount) -> TreasuryResult<()> {
        if *depositor == accounts::ZERO {
            return Err(TreasuryError::InvalidParameter {
                param: "depositor",
                reason: "cannot be the zero address",
            });
        }
        if amount == 0 {
            return Err(TreasuryError::ZeroAmount);
        }
        if amount < self.minimum_contribution {
            return Err(TreasuryError::BelowMinimum {
                amount,
                minimum: self.minimum_contribution,
            });
        }
        Ok(())
    }

    /// Credit a deposit. Returns the depositor's new contribution.
    ///
    /// Outstanding `claimable_yield` carries across deposits.
    pub fn deposit(&mut self, depositor: &Address, amount: Amount) -> TreasuryResult<Amount> {
        self.validate_deposit(depositor, amount)?;

        let current = self.record(depositor);
        let updated = DepositorRecord {
            contribution: math::add(current.contribution, amount)?,
            lifetime_contribution: math::add(current.lifetime_contribution, amount)?,
            claimable_yield: current.claimable_yield,
        };
        let total = math::add(self.total_contribution, amount)?;

        self.records.insert(*depositor, updated);
        self.total_contribution = total;
        Ok(updated.contribution)
    }

    /// Current principal of a depositor (0 if never seen)
    pub fn read(&self, depositor: &Address) -> Amount {
        self.record(depositor).contribution
    }

    /// Full record of a depositor (all zero if never seen)
    pub fn record(&self, depositor: &Address) -> DepositorRecord {
        self.records.get(depositor).copied().unwrap_or_default()
    }

    /// Every depositor ever seen, in address order
    pub fn records(&self) -> impl Iterator<Item = (&Address, &DepositorRecord)> {
        self.records.iter()
    }

    /// Depositors with live principal, in address order
    pub fn active(&self) -> impl Iterator<Item = (&Address, &DepositorRecord)> {
        self.records.iter().filter(|(_, record)| record.is_active())
    }

    /// Number of depositors with live principal
    pub fn depositor_count(&self) -> usize {
        self.active().count()
    }

    /// Sum of all recorded contributions
    pub fn attributed_total(&self) -> Amount {
        self.records.values().map(|r| r.contribution).sum()
    }

    /// Sum of all claimable yield
    pub fn allocated_yield(&self) -> Amount {
        self.records.values().map(|r| r.claimable_yield).sum()
    }

    pub fn total_contribution(&self) -> Amount {
        self.total_contribution
    }

    pub fn minimum_contribution(&self) -> Amount {
        self.minimum_contribution
    }

    pub fn set_minimum_contribution(&mut self, amount: Amount) {
        self.minimum_contribution = amount;
    }

    /// Recognize stake that belongs to no depositor
    pub fn add_unattributed(&mut self, amount: Amount) -> TreasuryResult<()> {
        self.total_contribution = math::add(self.total_contribution, amount)?;
        Ok(())
    }

    /// Reset a depositor's principal after paying out `paid_out` of it.
    ///
    /// Only `paid_out` leaves the total; the remainder stays behind as
    /// unattributed stake.
    pub fn zero_contribution(&mut self, depositor: &Address, paid_out: Amount) -> TreasuryResult<()> {
        let total = math::sub(self.total_contribution, paid_out)?;
        if let Some(record) = self.records.get_mut(depositor) {
            record.contribution = 0;
        }
        self.total_contribution = total;
        Ok(())
    }

    /// Credit allocated yield to a depositor
    pub fn credit_yield(&mut self, depositor: &Address, amount: Amount) -> TreasuryResult<()> {
        let record = self.records.entry(*depositor).or_default();
        record.claimable_yield = math::add(record.claimable_yield, amount)?;
        Ok(())
    }

    /// Zero a depositor's claimable yield, returning what it held
    pub fn take_yield(&mut self, depositor: &Address) -> Amount {
        self.records
            .get_mut(depositor)
            .map(|record| core::mem::take(&mut record.claimable_yield))
            .unwrap_or(0)
    }

    /// Zero every depositor's claimable yield, returning the sum
    pub fn clear_yield(&mut self) -> Amount {
        self.records
            .values_mut()
            .map(|record| core::mem::take(&mut record.claimable_yield))
            .sum()
    }

    /// Wipe every live field of every record and the total (pool teardown)
    pub fn reset_all(&mut self) {
        for record in self.records.values_mut() {
            record.contribution = 0;
            record.claimable_yield = 0;
        }
        self.total_contribution = 0;
    }
}
