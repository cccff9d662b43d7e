//! Dual-Asset Treasury
//!
//! One executor per asset track plus the renounce latch they share.
//! Depositor operations go straight to a track; ownership is treasury-wide.

use tracing::info;
use yieldrise_common::{Address, AssetTrack, TreasuryResult};

use crate::collaborators::{Custody, YieldStrategy};
use crate::config::TreasuryConfig;
use crate::engine::TrackEngine;
use crate::executor::AssetTrackExecutor;
use crate::lifecycle::RenounceLatch;

/// Native and stable asset tracks under one owner
#[derive(Debug)]
pub struct Treasury<NC, NS, SC, SS> {
    config: TreasuryConfig,
    latch: RenounceLatch,
    native: AssetTrackExecutor<NC, NS>,
    stable: AssetTrackExecutor<SC, SS>,
}

impl<NC, NS, SC, SS> Treasury<NC, NS, SC, SS>
where
    NC: Custody,
    NS: YieldStrategy,
    SC: Custody,
    SS: YieldStrategy,
{
    /// Build both tracks from `config` and their collaborators
    pub fn new(
        config: TreasuryConfig,
        native: (NC, NS),
        stable: (SC, SS),
    ) -> TreasuryResult<Self> {
        config.validate()?;
        let latch = RenounceLatch::new();

        let native = TrackEngine::new(&config.native, config.admin, latch.clone(), native.0, native.1)?;
        let stable = TrackEngine::new(&config.stable, config.admin, latch.clone(), stable.0, stable.1)?;
        info!(
            native_minimum = config.native.minimum_contribution,
            stable_minimum = config.stable.minimum_contribution,
            "treasury initialized"
        );

        Ok(Self {
            config,
            latch,
            native: AssetTrackExecutor::new(native),
            stable: AssetTrackExecutor::new(stable),
        })
    }

    pub fn config(&self) -> &TreasuryConfig {
        &self.config
    }

    /// Native-asset track
    pub fn native(&self) -> &AssetTrackExecutor<NC, NS> {
        &self.native
    }

    /// Stable-asset track
    pub fn stable(&self) -> &AssetTrackExecutor<SC, SS> {
        &self.stable
    }

    /// Whether ownership has been renounced
    pub fn check_renounced(&self) -> bool {
        self.latch.is_set()
    }

    /// Renounce ownership of both tracks. The event is recorded on the
    /// native track.
    pub fn renounce_contract(&self, caller: &Address) -> TreasuryResult<()> {
        self.native.renounce_contract(caller)
    }

    /// Rescue both tracks, native first
    pub fn rescue_all(&self, caller: &Address) -> TreasuryResult<()> {
        self.native.rescue(caller)?;
        self.stable.rescue(caller)?;
        Ok(())
    }

    /// State commitments of both tracks, in track order
    pub fn state_commitments(&self) -> TreasuryResult<[(AssetTrack, [u8; 32]); 2]> {
        Ok([
            (AssetTrack::Native, self.native.state_commitment()?),
            (AssetTrack::Stable, self.stable.state_commitment()?),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::SimulatedChain;
    use yieldrise_common::accounts::{NATIVE_POOL, STABLE_POOL};
    use yieldrise_common::constants::token::ONE;
    use yieldrise_common::TreasuryError;

    fn owner() -> Address {
        [1u8; 32]
    }

    fn build(chain: &SimulatedChain) -> crate::SimulatedTreasury {
        crate::simulated_treasury(TreasuryConfig::new(owner()).unwrap(), chain).unwrap()
    }

    #[test]
    fn test_tracks_are_independent() {
        let chain = SimulatedChain::new();
        let alice = [2u8; 32];
        chain.mint(AssetTrack::Native, &alice, 10 * ONE);
        chain.mint(AssetTrack::Stable, &alice, 1_000 * ONE);
        let treasury = build(&chain);

        treasury.native().deposit(&alice, 10 * ONE).unwrap();
        treasury.stable().deposit(&alice, 1_000 * ONE).unwrap();
        treasury.native().halt(&alice).unwrap();

        assert_eq!(treasury.native().contribution(&alice).unwrap(), 0);
        assert_eq!(treasury.stable().contribution(&alice).unwrap(), 1_000 * ONE);
        assert_eq!(chain.balance(AssetTrack::Stable, &STABLE_POOL), 750 * ONE);
        assert_eq!(chain.balance(AssetTrack::Native, &NATIVE_POOL), 0);
    }

    #[test]
    fn test_renounce_covers_both_tracks() {
        let chain = SimulatedChain::new();
        let treasury = build(&chain);

        treasury.renounce_contract(&owner()).unwrap();

        assert!(treasury.check_renounced());
        assert!(treasury.stable().check_renounced().unwrap());
        assert_eq!(
            treasury.stable().renounce_contract(&owner()),
            Err(TreasuryError::ContractRenounced)
        );
        assert_eq!(
            treasury.stable().set_minimum_contribution(&owner(), 0),
            Err(TreasuryError::ContractRenounced)
        );
        assert_eq!(treasury.rescue_all(&owner()), Err(TreasuryError::ContractRenounced));
    }

    #[test]
    fn test_rejects_shared_pool_account() {
        let chain = SimulatedChain::new();
        let mut config = TreasuryConfig::new(owner()).unwrap();
        config.stable.pool_account = NATIVE_POOL;

        assert!(crate::simulated_treasury(config, &chain).is_err());
    }

    #[test]
    fn test_concurrent_deposits() {
        let chain = SimulatedChain::new();
        let treasury = build(&chain);
        let depositors: Vec<Address> = (10u8..26).map(|i| [i; 32]).collect();
        for depositor in &depositors {
            chain.mint(AssetTrack::Native, depositor, 5 * ONE);
            chain.mint(AssetTrack::Stable, depositor, 500 * ONE);
        }

        std::thread::scope(|scope| {
            for depositor in &depositors {
                let treasury = &treasury;
                scope.spawn(move || {
                    for _ in 0..5 {
                        treasury.native().deposit(depositor, ONE).unwrap();
                        treasury.stable().deposit(depositor, 100 * ONE).unwrap();
                    }
                });
            }
        });

        assert_eq!(treasury.native().total_contribution().unwrap(), 80 * ONE);
        assert_eq!(treasury.stable().total_contribution().unwrap(), 8_000 * ONE);
        assert_eq!(treasury.native().drain_events().unwrap().len(), 80);
        treasury.native().verify_invariants().unwrap();
        treasury.stable().verify_invariants().unwrap();
    }
}
