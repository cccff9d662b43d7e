//! Single-Track Engine
//!
//! `TrackEngine` owns one contribution ledger, one liquidity partition and
//! the harvest bookkeeping of an asset track, plus the custody and strategy
//! collaborators that settle it. The two asset tracks run two instances of
//! the same engine.
//!
//! Deposits live here; harvest and claim are in [`crate::yield_engine`],
//! halt, rescue, renounce and sweep in [`crate::lifecycle`].
//!
//! ## Ordering
//!
//! Every operation validates first, then calls collaborators, then commits
//! to the ledger. A validation failure leaves the track untouched.

use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};
use yieldrise_common::math;
use yieldrise_common::{
    AdminConfig, Address, Amount, AssetTrack, BasisPoints, DepositorRecord, DepositorView,
    EventLog, PoolSnapshot, TreasuryError, TreasuryEvent, TreasuryResult,
};

use crate::collaborators::{Custody, YieldStrategy};
use crate::config::TrackConfig;
use crate::ledger::ContributionLedger;
use crate::lifecycle::RenounceLatch;
use crate::partition::{LiquidityPartition, Split};
use crate::shares::ShareCalculator;
use crate::yield_engine::{HarvestOutcome, HarvestState};

/// Outcome of an accepted deposit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositReceipt {
    /// Depositor's principal after the deposit
    pub new_contribution: Amount,
    /// Portion kept liquid
    pub liquid_share: Amount,
    /// Portion supplied to the strategy
    pub locked_share: Amount,
    /// Harvest run ahead of the deposit, if it distributed anything
    pub harvested: Option<HarvestOutcome>,
}

/// Accounting engine of one asset track
#[derive(Debug)]
pub struct TrackEngine<C, S> {
    pub(crate) track: AssetTrack,
    pub(crate) admin: AdminConfig,
    pub(crate) latch: RenounceLatch,
    pub(crate) harvest_on_deposit: bool,
    pub(crate) ledger: ContributionLedger,
    pub(crate) partition: LiquidityPartition,
    pub(crate) harvest: HarvestState,
    pub(crate) custody: C,
    pub(crate) strategy: S,
    events: EventLog,
    sequence: u64,
}

impl<C: Custody, S: YieldStrategy> TrackEngine<C, S> {
    /// Create an empty engine
    pub fn new(
        config: &TrackConfig,
        admin: AdminConfig,
        latch: RenounceLatch,
        custody: C,
        strategy: S,
    ) -> TreasuryResult<Self> {
        config.validate()?;
        if custody.pool_account() != config.pool_account {
            return Err(TreasuryError::InvalidParameter {
                param: "pool_account",
                reason: "custody does not hold the configured pool account",
            });
        }

        Ok(Self {
            track: config.track,
            admin,
            latch,
            harvest_on_deposit: config.harvest_on_deposit,
            ledger: ContributionLedger::new(config.minimum_contribution),
            partition: LiquidityPartition::new(config.track, config.liquid_ratio_bps)?,
            harvest: HarvestState::default(),
            custody,
            strategy,
            events: EventLog::new(),
            sequence: 0,
        })
    }

    // ========================================================================
    // Deposits
    // ========================================================================

    /// Accept a deposit of `amount` from `depositor`.
    ///
    /// With `harvest_on_deposit`, pending yield is harvested first so it is
    /// shared among existing depositors only. That harvest is its own
    /// atomic step: a deposit rejected later by custody does not undo it.
    pub fn deposit(&mut self, depositor: &Address, amount: Amount) -> TreasuryResult<DepositReceipt> {
        self.ledger.validate_deposit(depositor, amount)?;
        let prior = self.ledger.read(depositor);
        let split = self.partition.split(prior, amount)?;
        math::add(self.ledger.total_contribution(), amount)?;

        let harvested = if self.harvest_on_deposit {
            self.harvest()?
        } else {
            None
        };

        self.custody.transfer_in(depositor, amount)?;
        if split.locked > 0 {
            if let Err(err) = self.strategy.deposit(split.locked) {
                warn!(
                    track = %self.track,
                    depositor = %short_address(depositor),
                    amount,
                    error = %err,
                    "strategy refused locked share, refunding deposit"
                );
                self.custody.transfer_out(depositor, amount)?;
                return Err(err);
            }
        }

        let new_contribution = self.commit_deposit(depositor, amount, split)?;

        Ok(DepositReceipt {
            new_contribution,
            liquid_share: split.liquid,
            locked_share: split.locked,
            harvested,
        })
    }

    fn commit_deposit(&mut self, depositor: &Address, amount: Amount, split: Split) -> TreasuryResult<Amount> {
        let new_contribution = self.ledger.deposit(depositor, amount)?;
        self.partition.apply_deposit(split)?;
        self.harvest.last_observed_value = math::add(self.harvest.last_observed_value, split.locked)?;

        let sequence = self.next_sequence();
        self.events.emit(TreasuryEvent::Contributed {
            track: self.track,
            depositor: *depositor,
            amount,
            liquid_share: split.liquid,
            locked_share: split.locked,
            new_contribution,
            total_contribution: self.ledger.total_contribution(),
            sequence,
        });
        info!(
            track = %self.track,
            depositor = %short_address(depositor),
            amount,
            liquid = split.liquid,
            locked = split.locked,
            total = self.ledger.total_contribution(),
            "contribution accepted"
        );

        Ok(new_contribution)
    }

    // ========================================================================
    // Read surface
    // ========================================================================

    pub fn track(&self) -> AssetTrack {
        self.track
    }

    pub fn total_contribution(&self) -> Amount {
        self.ledger.total_contribution()
    }

    pub fn liquid(&self) -> Amount {
        self.partition.liquid()
    }

    pub fn locked(&self) -> Amount {
        self.partition.locked()
    }

    pub fn yield_pool(&self) -> Amount {
        self.partition.yield_pool()
    }

    pub fn undistributed_dust(&self) -> Amount {
        self.harvest.undistributed_dust
    }

    pub fn minimum_contribution(&self) -> Amount {
        self.ledger.minimum_contribution()
    }

    pub fn depositor_count(&self) -> usize {
        self.ledger.depositor_count()
    }

    pub fn record(&self, depositor: &Address) -> DepositorRecord {
        self.ledger.record(depositor)
    }

    pub fn contribution(&self, depositor: &Address) -> Amount {
        self.ledger.read(depositor)
    }

    pub fn lifetime_contribution(&self, depositor: &Address) -> Amount {
        self.ledger.record(depositor).lifetime_contribution
    }

    pub fn claimable_yield(&self, depositor: &Address) -> Amount {
        self.ledger.record(depositor).claimable_yield
    }

    /// Depositor's share of the total contribution, in basis points
    pub fn percentage_of(&self, depositor: &Address) -> TreasuryResult<BasisPoints> {
        self.shares().percentage_of(depositor)
    }

    /// Liquid entitlement a halt would pay right now
    pub fn unstakeable_amount(&self, depositor: &Address) -> TreasuryResult<Amount> {
        self.shares().unstakeable_amount(depositor)
    }

    /// Events emitted since the last drain
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Hand the emitted events to an indexer
    pub fn drain_events(&mut self) -> Vec<TreasuryEvent> {
        self.events.drain()
    }

    /// Complete observable state of the track
    pub fn snapshot(&self) -> TreasuryResult<PoolSnapshot> {
        let shares = self.shares();
        let depositors = self
            .ledger
            .records()
            .map(|(depositor, record)| {
                Ok(DepositorView {
                    depositor: *depositor,
                    record: *record,
                    share_bps: shares.percentage_of(depositor)?,
                    unstakeable: self.partition.unstakeable(record.contribution)?,
                })
            })
            .collect::<TreasuryResult<Vec<_>>>()?;

        Ok(PoolSnapshot {
            track: self.track,
            total_contribution: self.ledger.total_contribution(),
            liquid: self.partition.liquid(),
            locked: self.partition.locked(),
            yield_pool: self.partition.yield_pool(),
            undistributed_dust: self.harvest.undistributed_dust,
            last_observed_value: self.harvest.last_observed_value,
            minimum_contribution: self.ledger.minimum_contribution(),
            renounced: self.latch.is_set(),
            harvest_count: self.harvest.harvest_count,
            depositors,
        })
    }

    /// SHA-256 over the borsh encoding of the snapshot
    pub fn state_commitment(&self) -> TreasuryResult<[u8; 32]> {
        let encoded = borsh::to_vec(&self.snapshot()?).map_err(|_| TreasuryError::InvariantViolated {
            invariant: "snapshot must encode",
        })?;
        let mut hasher = Sha256::new();
        hasher.update(&encoded);
        let result = hasher.finalize();
        let mut commitment = [0u8; 32];
        commitment.copy_from_slice(&result);
        Ok(commitment)
    }

    /// Check every ledger invariant of the track
    pub fn verify_invariants(&self) -> TreasuryResult<()> {
        let total = self.ledger.total_contribution();
        let compartments = math::add(self.partition.liquid(), self.partition.locked())?;
        if compartments != total {
            return Err(TreasuryError::InvariantViolated {
                invariant: "liquid + locked == total_contribution",
            });
        }
        if self.ledger.attributed_total() > total {
            return Err(TreasuryError::InvariantViolated {
                invariant: "sum(contribution) <= total_contribution",
            });
        }
        if self.ledger.allocated_yield() != self.partition.yield_pool() {
            return Err(TreasuryError::InvariantViolated {
                invariant: "sum(claimable_yield) == yield_pool",
            });
        }
        if self.shares().total_unstakeable()? != self.partition.liquid() {
            return Err(TreasuryError::InvariantViolated {
                invariant: "liquid == sum(unstakeable)",
            });
        }
        debug!(track = %self.track, total, "invariants hold");
        Ok(())
    }

    // ========================================================================
    // Internals
    // ========================================================================

    pub(crate) fn shares(&self) -> ShareCalculator<'_> {
        ShareCalculator::new(&self.ledger, &self.partition)
    }

    pub(crate) fn next_sequence(&mut self) -> u64 {
        self.sequence += 1;
        self.sequence
    }

    pub(crate) fn emit(&mut self, event: TreasuryEvent) {
        self.events.emit(event);
    }
}

/// Leading bytes of an address, hex encoded, for log fields
pub(crate) fn short_address(address: &Address) -> String {
    hex::encode(&address[..6])
}
