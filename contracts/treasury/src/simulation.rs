//! Simulated Chain
//!
//! In-memory asset balances and a yield strategy position book, shared by
//! a [`SimulatedCustody`] and a [`SimulatedStrategy`] per track. Used by the
//! test-suite and the `yieldrise-sim` binary; production deployments plug
//! real custody and strategy adapters into the same traits.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use yieldrise_common::{Address, Amount, AssetTrack, TreasuryError, TreasuryResult};

use crate::collaborators::{Custody, YieldStrategy};
use crate::config::TreasuryConfig;
use crate::treasury::Treasury;

/// Treasury whose both tracks settle on a [`SimulatedChain`]
pub type SimulatedTreasury = Treasury<SimulatedCustody, SimulatedStrategy, SimulatedCustody, SimulatedStrategy>;

/// Account holding the strategy's underlying reserves on the native track
pub const NATIVE_STRATEGY_RESERVE: Address = *b"yieldrise::strategy::native\0\0\0\0\0";

/// Account holding the strategy's underlying reserves on the stable track
pub const STABLE_STRATEGY_RESERVE: Address = *b"yieldrise::strategy::stable\0\0\0\0\0";

/// Reserve account of the strategy serving `track`
pub fn strategy_reserve(track: AssetTrack) -> Address {
    match track {
        AssetTrack::Native => NATIVE_STRATEGY_RESERVE,
        AssetTrack::Stable => STABLE_STRATEGY_RESERVE,
    }
}

#[derive(Debug, Default)]
struct ChainState {
    /// Raw asset balances
    balances: BTreeMap<(AssetTrack, Address), Amount>,
    /// Strategy-native (wrapped) positions
    positions: BTreeMap<(AssetTrack, Address), Amount>,
    /// Holders whose transfers are rejected
    frozen: BTreeSet<Address>,
    /// Tracks whose strategy refuses deposits and withdrawals
    paused_strategies: BTreeSet<AssetTrack>,
}

impl ChainState {
    fn balance(&self, track: AssetTrack, holder: &Address) -> Amount {
        self.balances.get(&(track, *holder)).copied().unwrap_or(0)
    }

    fn position(&self, track: AssetTrack, holder: &Address) -> Amount {
        self.positions.get(&(track, *holder)).copied().unwrap_or(0)
    }

    fn transfer(
        &mut self,
        track: AssetTrack,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> TreasuryResult<()> {
        let rejected = TreasuryError::TransferFailed {
            from: *from,
            to: *to,
            amount,
        };
        if self.frozen.contains(from) || self.frozen.contains(to) {
            return Err(rejected);
        }
        let available = self.balance(track, from);
        if available < amount {
            return Err(rejected);
        }
        self.balances.insert((track, *from), available - amount);
        let credited = self.balance(track, to).checked_add(amount).ok_or(TreasuryError::Overflow)?;
        self.balances.insert((track, *to), credited);
        Ok(())
    }
}

/// Shared in-memory ledger of both asset tracks
#[derive(Debug, Clone, Default)]
pub struct SimulatedChain {
    state: Arc<Mutex<ChainState>>,
}

impl SimulatedChain {
    /// Create an empty chain
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, ChainState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Credit `amount` of the track's asset to `holder` out of thin air
    pub fn mint(&self, track: AssetTrack, holder: &Address, amount: Amount) {
        let mut state = self.state();
        let balance = state.balance(track, holder).saturating_add(amount);
        state.balances.insert((track, *holder), balance);
    }

    /// Raw asset balance of `holder`
    pub fn balance(&self, track: AssetTrack, holder: &Address) -> Amount {
        self.state().balance(track, holder)
    }

    /// Strategy-native position held by `holder`
    pub fn position(&self, track: AssetTrack, holder: &Address) -> Amount {
        self.state().position(track, holder)
    }

    /// Plain transfer between two holders (e.g. a gift straight to the pool)
    pub fn transfer(
        &self,
        track: AssetTrack,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> TreasuryResult<()> {
        self.state().transfer(track, from, to, amount)
    }

    /// Reject every transfer from or to `holder`
    pub fn freeze(&self, holder: &Address) {
        self.state().frozen.insert(*holder);
    }

    /// Lift a freeze
    pub fn unfreeze(&self, holder: &Address) {
        self.state().frozen.remove(holder);
    }

    /// Make the track's strategy refuse deposits and withdrawals
    pub fn pause_strategy(&self, track: AssetTrack, paused: bool) {
        let mut state = self.state();
        if paused {
            state.paused_strategies.insert(track);
        } else {
            state.paused_strategies.remove(&track);
        }
    }

    /// Custody handle for a pool account
    pub fn custody(&self, track: AssetTrack, pool: Address) -> SimulatedCustody {
        SimulatedCustody {
            chain: self.clone(),
            track,
            pool,
        }
    }

    /// Strategy handle for a pool account
    pub fn strategy(&self, track: AssetTrack, pool: Address) -> SimulatedStrategy {
        SimulatedStrategy {
            chain: self.clone(),
            track,
            pool,
            reserve: strategy_reserve(track),
        }
    }
}

/// Build a treasury over `chain` using the configured pool accounts
pub fn simulated_treasury(config: TreasuryConfig, chain: &SimulatedChain) -> TreasuryResult<SimulatedTreasury> {
    let native_pool = config.native.pool_account;
    let stable_pool = config.stable.pool_account;
    Treasury::new(
        config,
        (
            chain.custody(AssetTrack::Native, native_pool),
            chain.strategy(AssetTrack::Native, native_pool),
        ),
        (
            chain.custody(AssetTrack::Stable, stable_pool),
            chain.strategy(AssetTrack::Stable, stable_pool),
        ),
    )
}

/// [`Custody`] backed by a [`SimulatedChain`]
#[derive(Debug, Clone)]
pub struct SimulatedCustody {
    chain: SimulatedChain,
    track: AssetTrack,
    pool: Address,
}

impl Custody for SimulatedCustody {
    fn pool_account(&self) -> Address {
        self.pool
    }

    fn transfer_in(&mut self, from: &Address, amount: Amount) -> TreasuryResult<()> {
        self.chain.transfer(self.track, from, &self.pool, amount)
    }

    fn transfer_out(&mut self, to: &Address, amount: Amount) -> TreasuryResult<()> {
        self.chain.transfer(self.track, &self.pool, to, amount)
    }

    fn balance_of(&self, holder: &Address) -> Amount {
        self.chain.balance(self.track, holder)
    }
}

/// Lending-market style [`YieldStrategy`] backed by a [`SimulatedChain`].
///
/// Supplied funds move to the strategy reserve and are mirrored 1:1 by a
/// wrapped position; [`SimulatedStrategy::accrue`] grows the position.
#[derive(Debug, Clone)]
pub struct SimulatedStrategy {
    chain: SimulatedChain,
    track: AssetTrack,
    pool: Address,
    reserve: Address,
}

impl SimulatedStrategy {
    /// Grow the pool's position by `amount` of interest
    pub fn accrue(&self, amount: Amount) {
        let mut state = self.chain.state();
        let reserve = state.balance(self.track, &self.reserve).saturating_add(amount);
        state.balances.insert((self.track, self.reserve), reserve);
        let position = state.position(self.track, &self.pool).saturating_add(amount);
        state.positions.insert((self.track, self.pool), position);
    }

    /// Shrink the pool's position by `amount` (strategy loss)
    pub fn impair(&self, amount: Amount) {
        let mut state = self.chain.state();
        let reserve = state.balance(self.track, &self.reserve).saturating_sub(amount);
        state.balances.insert((self.track, self.reserve), reserve);
        let position = state.position(self.track, &self.pool).saturating_sub(amount);
        state.positions.insert((self.track, self.pool), position);
    }

    fn ensure_running(&self, state: &ChainState) -> TreasuryResult<()> {
        if state.paused_strategies.contains(&self.track) {
            return Err(TreasuryError::StrategyFailure {
                reason: "strategy paused",
            });
        }
        Ok(())
    }
}

impl YieldStrategy for SimulatedStrategy {
    fn deposit(&mut self, amount: Amount) -> TreasuryResult<()> {
        let mut state = self.chain.state();
        self.ensure_running(&state)?;
        state.transfer(self.track, &self.pool, &self.reserve, amount)?;
        let position = state
            .position(self.track, &self.pool)
            .checked_add(amount)
            .ok_or(TreasuryError::Overflow)?;
        state.positions.insert((self.track, self.pool), position);
        Ok(())
    }

    fn withdraw(&mut self, amount: Amount) -> TreasuryResult<Amount> {
        let mut state = self.chain.state();
        self.ensure_running(&state)?;
        let position = state.position(self.track, &self.pool);
        if position < amount {
            return Err(TreasuryError::StrategyFailure {
                reason: "withdrawal exceeds position",
            });
        }
        state.transfer(self.track, &self.reserve, &self.pool, amount)?;
        state.positions.insert((self.track, self.pool), position - amount);
        Ok(amount)
    }

    fn current_value(&self) -> TreasuryResult<Amount> {
        Ok(self.chain.position(self.track, &self.pool))
    }

    fn transfer_position(&mut self, to: &Address) -> TreasuryResult<Amount> {
        let mut state = self.chain.state();
        let moved = state.positions.remove(&(self.track, self.pool)).unwrap_or(0);
        let credited = state
            .position(self.track, to)
            .checked_add(moved)
            .ok_or(TreasuryError::Overflow)?;
        state.positions.insert((self.track, *to), credited);
        Ok(moved)
    }
}
