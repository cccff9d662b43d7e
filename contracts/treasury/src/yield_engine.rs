//! Yield Engine
//!
//! Harvest and claim for one asset track.
//!
//! The strategy's current value is compared against `last_observed_value`,
//! the principal basis supplied to it. A positive delta is withdrawn into
//! pool custody and allocated to active depositors pro rata to their share
//! of the total contribution. After the withdrawal the strategy is back at
//! its basis, so a second harvest with no new growth is a no-op.
//!
//! Allocation is computed at full precision and truncated once per
//! depositor. What truncation leaves behind, plus the share of unattributed
//! stake, accumulates in `undistributed_dust` and stays in custody until a
//! rescue.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use yieldrise_common::math;
use yieldrise_common::{Address, Amount, TreasuryError, TreasuryEvent, TreasuryResult};

use crate::collaborators::{Custody, YieldStrategy};
use crate::engine::{short_address, TrackEngine};
use crate::ledger::ContributionLedger;
use crate::shares::yield_share;

/// Harvest bookkeeping of one track
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct HarvestState {
    /// Strategy value that counts as principal
    pub last_observed_value: Amount,
    /// Harvested funds allocated to nobody
    pub undistributed_dust: Amount,
    /// Harvests that distributed something
    pub harvest_count: u64,
}

/// Result of a distributing harvest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarvestOutcome {
    /// Funds withdrawn from the strategy
    pub delta: Amount,
    /// Portion credited to depositors
    pub distributed: Amount,
    /// Portion left undistributed
    pub dust: Amount,
    /// Depositors credited
    pub recipients: u64,
}

/// Split `delta` among the active depositors of `ledger`, each in
/// proportion to its contribution out of the total.
///
/// Returns the per-depositor credits (zero credits omitted) and their sum.
pub fn allocate(ledger: &ContributionLedger, delta: Amount) -> TreasuryResult<(Vec<(Address, Amount)>, Amount)> {
    let total = ledger.total_contribution();
    let mut credits = Vec::new();
    let mut distributed: Amount = 0;

    for (depositor, record) in ledger.active() {
        let credit = yield_share(delta, record.contribution, total)?;
        if credit > 0 {
            distributed = math::add(distributed, credit)?;
            credits.push((*depositor, credit));
        }
    }

    if distributed > delta {
        return Err(TreasuryError::InvariantViolated {
            invariant: "allocation exceeds harvested delta",
        });
    }
    Ok((credits, distributed))
}

impl<C: Custody, S: YieldStrategy> TrackEngine<C, S> {
    /// Growth of the strategy above its principal basis
    pub fn pending_yield(&self) -> TreasuryResult<Amount> {
        let value = self.strategy.current_value()?;
        Ok(value.saturating_sub(self.harvest.last_observed_value))
    }

    /// Withdraw strategy growth and allocate it to depositors.
    ///
    /// Returns `None` when there is nothing to harvest, including when the
    /// strategy reports less than its basis; the basis is kept in that case
    /// so later growth first has to recover the loss.
    pub fn harvest(&mut self) -> TreasuryResult<Option<HarvestOutcome>> {
        let value = self.strategy.current_value()?;
        let basis = self.harvest.last_observed_value;

        if value < basis {
            warn!(
                track = %self.track,
                value,
                basis,
                "strategy below principal basis, nothing harvested"
            );
            return Ok(None);
        }
        if value == basis {
            debug!(track = %self.track, value, "no strategy growth");
            return Ok(None);
        }

        let received = self.strategy.withdraw(value - basis)?;
        if received == 0 {
            return Ok(None);
        }

        let (credits, distributed) = allocate(&self.ledger, received)?;
        let dust = received - distributed;
        for (depositor, credit) in &credits {
            self.ledger.credit_yield(depositor, *credit)?;
        }
        self.partition.credit_yield(distributed)?;
        self.harvest.undistributed_dust = math::add(self.harvest.undistributed_dust, dust)?;
        self.harvest.harvest_count += 1;

        let outcome = HarvestOutcome {
            delta: received,
            distributed,
            dust,
            recipients: credits.len() as u64,
        };
        let sequence = self.next_sequence();
        self.emit(TreasuryEvent::YieldHarvested {
            track: self.track,
            delta: outcome.delta,
            distributed,
            dust,
            recipients: outcome.recipients,
            sequence,
        });
        info!(
            track = %self.track,
            delta = outcome.delta,
            distributed,
            dust,
            recipients = outcome.recipients,
            "yield harvested"
        );

        Ok(Some(outcome))
    }

    /// Pay out the depositor's claimable yield in full
    pub fn claim(&mut self, depositor: &Address) -> TreasuryResult<Amount> {
        let amount = self.ledger.record(depositor).claimable_yield;
        if amount == 0 {
            return Err(TreasuryError::NothingToClaim { depositor: *depositor });
        }
        if amount > self.partition.yield_pool() {
            return Err(TreasuryError::InvariantViolated {
                invariant: "claim exceeds yield pool",
            });
        }

        self.custody.transfer_out(depositor, amount)?;
        self.ledger.take_yield(depositor);
        self.partition.debit_yield(amount)?;

        let sequence = self.next_sequence();
        self.emit(TreasuryEvent::YieldClaimed {
            track: self.track,
            depositor: *depositor,
            amount,
            yield_pool: self.partition.yield_pool(),
            sequence,
        });
        info!(
            track = %self.track,
            depositor = %short_address(depositor),
            amount,
            "yield claimed"
        );

        Ok(amount)
    }
}
