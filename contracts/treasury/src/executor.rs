//! Asset Track Executor
//!
//! Serializes every operation on one asset track behind a mutex, so a
//! track can be shared across threads. The two tracks have separate
//! executors and never contend with each other.
//!
//! A panic while the lock is held poisons it; the track then answers every
//! call with `EngineUnavailable` instead of serving state that may be half
//! committed.

use std::sync::{Mutex, MutexGuard};

use tracing::{error, info_span};
use yieldrise_common::{
    Address, Amount, AssetTrack, BasisPoints, DepositorRecord, PoolSnapshot, TreasuryError,
    TreasuryEvent, TreasuryResult,
};

use crate::collaborators::{Custody, YieldStrategy};
use crate::engine::{DepositReceipt, TrackEngine};
use crate::lifecycle::{HaltReceipt, RescueReceipt};
use crate::yield_engine::HarvestOutcome;

/// Thread-safe handle to one asset track
#[derive(Debug)]
pub struct AssetTrackExecutor<C, S> {
    track: AssetTrack,
    engine: Mutex<TrackEngine<C, S>>,
}

impl<C: Custody, S: YieldStrategy> AssetTrackExecutor<C, S> {
    pub fn new(engine: TrackEngine<C, S>) -> Self {
        Self {
            track: engine.track(),
            engine: Mutex::new(engine),
        }
    }

    pub fn track(&self) -> AssetTrack {
        self.track
    }

    fn lock(&self) -> TreasuryResult<MutexGuard<'_, TrackEngine<C, S>>> {
        self.engine.lock().map_err(|_| {
            error!(track = %self.track, "track engine poisoned");
            TreasuryError::EngineUnavailable { track: self.track }
        })
    }

    /// Run `op` with exclusive access to the engine
    pub fn execute<R>(
        &self,
        op: &'static str,
        f: impl FnOnce(&mut TrackEngine<C, S>) -> TreasuryResult<R>,
    ) -> TreasuryResult<R> {
        let span = info_span!("track_op", track = %self.track, op);
        let _entered = span.enter();
        let mut engine = self.lock()?;
        f(&mut engine)
    }

    /// Run a read-only query against the engine
    pub fn query<R>(&self, f: impl FnOnce(&TrackEngine<C, S>) -> R) -> TreasuryResult<R> {
        let engine = self.lock()?;
        Ok(f(&engine))
    }

    // ========================================================================
    // Operations
    // ========================================================================

    pub fn deposit(&self, depositor: &Address, amount: Amount) -> TreasuryResult<DepositReceipt> {
        self.execute("deposit", |engine| engine.deposit(depositor, amount))
    }

    pub fn halt(&self, depositor: &Address) -> TreasuryResult<HaltReceipt> {
        self.execute("halt", |engine| engine.halt(depositor))
    }

    pub fn harvest(&self) -> TreasuryResult<Option<HarvestOutcome>> {
        self.execute("harvest", |engine| engine.harvest())
    }

    pub fn claim(&self, depositor: &Address) -> TreasuryResult<Amount> {
        self.execute("claim", |engine| engine.claim(depositor))
    }

    pub fn rescue(&self, caller: &Address) -> TreasuryResult<RescueReceipt> {
        self.execute("rescue", |engine| engine.rescue(caller))
    }

    pub fn renounce_contract(&self, caller: &Address) -> TreasuryResult<()> {
        self.execute("renounce_contract", |engine| engine.renounce_contract(caller))
    }

    pub fn set_minimum_contribution(&self, caller: &Address, amount: Amount) -> TreasuryResult<()> {
        self.execute("set_minimum_contribution", |engine| {
            engine.set_minimum_contribution(caller, amount)
        })
    }

    pub fn sweep_unattributed(&self) -> TreasuryResult<Amount> {
        self.execute("sweep_unattributed", |engine| engine.sweep_unattributed())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn total_contribution(&self) -> TreasuryResult<Amount> {
        self.query(|engine| engine.total_contribution())
    }

    pub fn liquid(&self) -> TreasuryResult<Amount> {
        self.query(|engine| engine.liquid())
    }

    pub fn locked(&self) -> TreasuryResult<Amount> {
        self.query(|engine| engine.locked())
    }

    pub fn yield_pool(&self) -> TreasuryResult<Amount> {
        self.query(|engine| engine.yield_pool())
    }

    pub fn minimum_contribution(&self) -> TreasuryResult<Amount> {
        self.query(|engine| engine.minimum_contribution())
    }

    pub fn record(&self, depositor: &Address) -> TreasuryResult<DepositorRecord> {
        self.query(|engine| engine.record(depositor))
    }

    pub fn contribution(&self, depositor: &Address) -> TreasuryResult<Amount> {
        self.query(|engine| engine.contribution(depositor))
    }

    pub fn lifetime_contribution(&self, depositor: &Address) -> TreasuryResult<Amount> {
        self.query(|engine| engine.lifetime_contribution(depositor))
    }

    pub fn claimable_yield(&self, depositor: &Address) -> TreasuryResult<Amount> {
        self.query(|engine| engine.claimable_yield(depositor))
    }

    pub fn percentage_of(&self, depositor: &Address) -> TreasuryResult<BasisPoints> {
        self.query(|engine| engine.percentage_of(depositor))?
    }

    pub fn unstakeable_amount(&self, depositor: &Address) -> TreasuryResult<Amount> {
        self.query(|engine| engine.unstakeable_amount(depositor))?
    }

    pub fn pending_yield(&self) -> TreasuryResult<Amount> {
        self.query(|engine| engine.pending_yield())?
    }

    pub fn check_renounced(&self) -> TreasuryResult<bool> {
        self.query(|engine| engine.check_renounced())
    }

    pub fn snapshot(&self) -> TreasuryResult<PoolSnapshot> {
        self.query(|engine| engine.snapshot())?
    }

    pub fn state_commitment(&self) -> TreasuryResult<[u8; 32]> {
        self.query(|engine| engine.state_commitment())?
    }

    pub fn verify_invariants(&self) -> TreasuryResult<()> {
        self.query(|engine| engine.verify_invariants())?
    }

    pub fn drain_events(&self) -> TreasuryResult<Vec<TreasuryEvent>> {
        self.execute("drain_events", |engine| Ok(engine.drain_events()))
    }
}
