//! Lifecycle and administration of one asset track.
//!
//! Depositor exit (`halt`), the owner's emergency `rescue`, the one-way
//! renounce latch, the contribution floor and the permissionless sweep of
//! funds that reached custody outside the deposit path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{info, warn};
use yieldrise_common::math;
use yieldrise_common::{
    authorize, Address, AdminAction, Amount, TreasuryError, TreasuryEvent, TreasuryResult,
};

use crate::collaborators::{Custody, YieldStrategy};
use crate::engine::{short_address, TrackEngine};

/// One-way renounce flag shared by every track of a treasury
#[derive(Debug, Clone, Default)]
pub struct RenounceLatch(Arc<AtomicBool>);

impl RenounceLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Set the latch. Returns `false` if it was already set.
    pub fn set(&self) -> bool {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

/// Outcome of a depositor exit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HaltReceipt {
    /// Liquid entitlement returned to the depositor
    pub paid_out: Amount,
    /// Locked remainder left behind as unattributed stake
    pub forfeited: Amount,
}

/// Outcome of a rescue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RescueReceipt {
    /// Liquid entitlements returned to depositors
    pub refunded: Amount,
    pub refunded_depositors: u64,
    /// Strategy position handed to the owner
    pub swept_to_admin: Amount,
}

impl<C: Custody, S: YieldStrategy> TrackEngine<C, S> {
    /// Whether ownership has been renounced
    pub fn check_renounced(&self) -> bool {
        self.latch.is_set()
    }

    /// Exit the pool: pay the liquid entitlement and zero the contribution.
    ///
    /// The locked remainder stays in the strategy and in the total as
    /// unattributed stake. Claimable yield is untouched.
    pub fn halt(&mut self, depositor: &Address) -> TreasuryResult<HaltReceipt> {
        let record = self.ledger.record(depositor);
        if !record.is_active() {
            return Err(TreasuryError::NoActiveContribution { depositor: *depositor });
        }
        let paid_out = self.partition.unstakeable(record.contribution)?;
        self.partition.ensure_liquid(paid_out)?;

        if paid_out > 0 {
            self.custody.transfer_out(depositor, paid_out)?;
        }
        self.partition.release_liquid(paid_out)?;
        self.ledger.zero_contribution(depositor, paid_out)?;

        let receipt = HaltReceipt {
            paid_out,
            forfeited: record.contribution - paid_out,
        };
        let sequence = self.next_sequence();
        self.emit(TreasuryEvent::ContributionHalted {
            track: self.track,
            depositor: *depositor,
            paid_out,
            forfeited: receipt.forfeited,
            total_contribution: self.ledger.total_contribution(),
            sequence,
        });
        info!(
            track = %self.track,
            depositor = %short_address(depositor),
            paid_out,
            forfeited = receipt.forfeited,
            "contribution halted"
        );

        Ok(receipt)
    }

    /// Owner check plus renounce latch, with refusals logged per action
    fn authorize_admin(&self, caller: &Address, action: AdminAction) -> TreasuryResult<()> {
        authorize(&self.admin, caller, self.latch.is_set()).inspect_err(|err| {
            warn!(
                track = %self.track,
                action = action.name(),
                caller = %short_address(caller),
                error = %err,
                "admin action refused"
            );
        })
    }

    /// Tear the pool down: refund every liquid entitlement, then hand the
    /// whole strategy position (yield and dust included) to the owner.
    ///
    /// Each step commits as soon as its transfer succeeds, so a failed
    /// rescue can be retried without paying anyone twice.
    pub fn rescue(&mut self, caller: &Address) -> TreasuryResult<RescueReceipt> {
        self.authorize_admin(caller, AdminAction::Rescue)?;

        let refunds = self
            .ledger
            .active()
            .map(|(depositor, record)| Ok((*depositor, self.partition.unstakeable(record.contribution)?)))
            .collect::<TreasuryResult<Vec<_>>>()?;
        let refunded = refunds
            .iter()
            .try_fold(0, |sum: Amount, (_, amount)| math::add(sum, *amount))?;
        if refunded != self.partition.liquid() {
            return Err(TreasuryError::InvariantViolated {
                invariant: "liquid == sum(unstakeable)",
            });
        }

        for (depositor, amount) in &refunds {
            if *amount > 0 {
                self.custody.transfer_out(depositor, *amount)?;
            }
            self.partition.release_liquid(*amount)?;
            self.ledger.zero_contribution(depositor, *amount)?;
        }

        let held = math::add(self.partition.yield_pool(), self.harvest.undistributed_dust)?;
        if held > 0 {
            self.strategy.deposit(held)?;
            self.ledger.clear_yield();
            let yield_pool = self.partition.yield_pool();
            self.partition.debit_yield(yield_pool)?;
            self.harvest.undistributed_dust = 0;
            self.harvest.last_observed_value = math::add(self.harvest.last_observed_value, held)?;
        }

        let owner = self.admin.owner;
        let swept_to_admin = self.strategy.transfer_position(&owner)?;
        self.ledger.reset_all();
        self.partition.clear();
        self.harvest.last_observed_value = 0;

        let receipt = RescueReceipt {
            refunded,
            refunded_depositors: refunds.len() as u64,
            swept_to_admin,
        };
        let sequence = self.next_sequence();
        self.emit(TreasuryEvent::PoolRescued {
            track: self.track,
            admin: owner,
            refunded,
            refunded_depositors: receipt.refunded_depositors,
            swept_to_admin,
            sequence,
        });
        warn!(
            track = %self.track,
            refunded,
            depositors = receipt.refunded_depositors,
            swept_to_admin,
            "pool rescued"
        );

        Ok(receipt)
    }

    /// Permanently give up every owner-only operation.
    ///
    /// The latch is shared, so renouncing through one track renounces the
    /// whole treasury.
    pub fn renounce_contract(&mut self, caller: &Address) -> TreasuryResult<()> {
        self.authorize_admin(caller, AdminAction::Renounce)?;
        if !self.latch.set() {
            return Err(TreasuryError::ContractRenounced);
        }

        let sequence = self.next_sequence();
        self.emit(TreasuryEvent::ContractRenounced {
            track: self.track,
            owner: self.admin.owner,
            sequence,
        });
        warn!(track = %self.track, owner = %short_address(&self.admin.owner), "ownership renounced");
        Ok(())
    }

    /// Change the contribution floor. Existing contributions are unaffected.
    pub fn set_minimum_contribution(&mut self, caller: &Address, amount: Amount) -> TreasuryResult<()> {
        self.authorize_admin(caller, AdminAction::SetMinimumContribution)?;

        let old_minimum = self.ledger.minimum_contribution();
        self.ledger.set_minimum_contribution(amount);

        let sequence = self.next_sequence();
        self.emit(TreasuryEvent::MinimumContributionChanged {
            track: self.track,
            old_minimum,
            new_minimum: amount,
            sequence,
        });
        info!(track = %self.track, old_minimum, new_minimum = amount, "minimum contribution changed");
        Ok(())
    }

    /// Supply funds that reached custody outside the deposit path to the
    /// strategy and count them as unattributed stake.
    ///
    /// Returns the amount swept. Open to any caller and still available
    /// after renounce.
    pub fn sweep_unattributed(&mut self) -> TreasuryResult<Amount> {
        let held = self.custody.balance_of(&self.custody.pool_account());
        let accounted = math::add(
            math::add(self.partition.liquid(), self.partition.yield_pool())?,
            self.harvest.undistributed_dust,
        )?;
        if held < accounted {
            return Err(TreasuryError::InvariantViolated {
                invariant: "custody covers liquid + yield_pool + dust",
            });
        }
        let excess = held - accounted;
        if excess == 0 {
            return Ok(0);
        }

        self.strategy.deposit(excess)?;
        self.partition.absorb_unattributed(excess)?;
        self.ledger.add_unattributed(excess)?;
        self.harvest.last_observed_value = math::add(self.harvest.last_observed_value, excess)?;

        let sequence = self.next_sequence();
        self.emit(TreasuryEvent::UnattributedSwept {
            track: self.track,
            amount: excess,
            total_contribution: self.ledger.total_contribution(),
            sequence,
        });
        info!(track = %self.track, amount = excess, "unattributed funds swept");
        Ok(excess)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrackConfig;
    use crate::simulation::{SimulatedChain, SimulatedCustody, SimulatedStrategy};
    use yieldrise_common::accounts::STABLE_POOL;
    use yieldrise_common::constants::token::ONE;
    use yieldrise_common::{AdminConfig, AssetTrack, EventType};

    type Engine = TrackEngine<SimulatedCustody, SimulatedStrategy>;

    const TRACK: AssetTrack = AssetTrack::Stable;

    fn owner() -> Address {
        [1u8; 32]
    }

    fn alice() -> Address {
        [2u8; 32]
    }

    fn bob() -> Address {
        [3u8; 32]
    }

    fn setup() -> (SimulatedChain, Engine, SimulatedStrategy) {
        setup_with_latch(RenounceLatch::new())
    }

    fn setup_with_latch(latch: RenounceLatch) -> (SimulatedChain, Engine, SimulatedStrategy) {
        let chain = SimulatedChain::new();
        let engine = TrackEngine::new(
            &TrackConfig::for_track(TRACK).with_minimum(0),
            AdminConfig::new(owner()).unwrap(),
            latch,
            chain.custody(TRACK, STABLE_POOL),
            chain.strategy(TRACK, STABLE_POOL),
        )
        .unwrap();
        let strategy = chain.strategy(TRACK, STABLE_POOL);
        (chain, engine, strategy)
    }

    fn deposit(chain: &SimulatedChain, engine: &mut Engine, who: &Address, amount: Amount) {
        chain.mint(TRACK, who, amount);
        engine.deposit(who, amount).unwrap();
    }

    #[test]
    fn test_latch_is_one_way() {
        let latch = RenounceLatch::new();
        let shared = latch.clone();
        assert!(!shared.is_set());
        assert!(latch.set());
        assert!(shared.is_set());
        assert!(!shared.set());
    }

    #[test]
    fn test_halt_pays_liquid_share() {
        let (chain, mut engine, _) = setup();
        deposit(&chain, &mut engine, &alice(), 1_500 * ONE);
        deposit(&chain, &mut engine, &bob(), 500 * ONE);

        let receipt = engine.halt(&alice()).unwrap();

        assert_eq!(receipt.paid_out, 1_125 * ONE);
        assert_eq!(receipt.forfeited, 375 * ONE);
        assert_eq!(chain.balance(TRACK, &alice()), 1_125 * ONE);
        assert_eq!(engine.contribution(&alice()), 0);
        assert_eq!(engine.unstakeable_amount(&alice()).unwrap(), 0);
        assert_eq!(engine.lifetime_contribution(&alice()), 1_500 * ONE);
        // Forfeited stake still counts towards the total
        assert_eq!(engine.total_contribution(), 875 * ONE);
        assert_eq!(engine.liquid(), 375 * ONE);
        assert_eq!(engine.locked(), 500 * ONE);
        engine.verify_invariants().unwrap();
    }

    #[test]
    fn test_halt_requires_contribution() {
        let (chain, mut engine, _) = setup();
        deposit(&chain, &mut engine, &alice(), ONE);
        engine.halt(&alice()).unwrap();

        assert_eq!(
            engine.halt(&alice()),
            Err(TreasuryError::NoActiveContribution { depositor: alice() })
        );
        assert_eq!(
            engine.halt(&bob()),
            Err(TreasuryError::NoActiveContribution { depositor: bob() })
        );
    }

    #[test]
    fn test_halt_keeps_claimable_yield() {
        let (chain, mut engine, strategy) = setup();
        deposit(&chain, &mut engine, &alice(), 100 * ONE);
        strategy.accrue(ONE);
        engine.harvest().unwrap();

        engine.halt(&alice()).unwrap();

        assert_eq!(engine.claimable_yield(&alice()), ONE);
        assert_eq!(engine.claim(&alice()).unwrap(), ONE);
    }

    #[test]
    fn test_halt_transfer_failure_is_atomic() {
        let (chain, mut engine, _) = setup();
        deposit(&chain, &mut engine, &alice(), 100 * ONE);
        chain.freeze(&alice());

        assert!(engine.halt(&alice()).is_err());

        assert_eq!(engine.contribution(&alice()), 100 * ONE);
        assert_eq!(engine.liquid(), 75 * ONE);
    }

    #[test]
    fn test_rescue_refunds_and_sweeps() {
        let (chain, mut engine, strategy) = setup();
        deposit(&chain, &mut engine, &alice(), 10_000 * ONE);
        deposit(&chain, &mut engine, &bob(), 10_000 * ONE);
        strategy.accrue(100 * ONE);
        engine.harvest().unwrap();

        let receipt = engine.rescue(&owner()).unwrap();

        assert_eq!(receipt.refunded, 15_000 * ONE);
        assert_eq!(receipt.refunded_depositors, 2);
        // locked principal plus harvested yield
        assert_eq!(receipt.swept_to_admin, 5_100 * ONE);
        assert_eq!(chain.balance(TRACK, &alice()), 7_500 * ONE);
        assert_eq!(chain.balance(TRACK, &bob()), 7_500 * ONE);
        assert_eq!(chain.position(TRACK, &owner()), 5_100 * ONE);
        assert_eq!(chain.balance(TRACK, &STABLE_POOL), 0);

        assert_eq!(engine.total_contribution(), 0);
        assert_eq!(engine.liquid(), 0);
        assert_eq!(engine.locked(), 0);
        assert_eq!(engine.yield_pool(), 0);
        assert_eq!(engine.claimable_yield(&alice()), 0);
        assert_eq!(engine.contribution(&bob()), 0);
        assert_eq!(engine.lifetime_contribution(&bob()), 10_000 * ONE);
        engine.verify_invariants().unwrap();
    }

    #[test]
    fn test_deposits_resume_after_rescue() {
        let (chain, mut engine, _) = setup();
        deposit(&chain, &mut engine, &alice(), 100 * ONE);
        engine.rescue(&owner()).unwrap();

        deposit(&chain, &mut engine, &bob(), 40 * ONE);

        assert_eq!(engine.total_contribution(), 40 * ONE);
        assert_eq!(engine.percentage_of(&bob()).unwrap(), 10_000);
        engine.verify_invariants().unwrap();
    }

    #[test]
    fn test_rescue_requires_owner() {
        let (chain, mut engine, _) = setup();
        deposit(&chain, &mut engine, &alice(), ONE);

        assert_eq!(
            engine.rescue(&alice()),
            Err(TreasuryError::Unauthorized {
                expected: owner(),
                actual: alice(),
            })
        );
        assert_eq!(engine.contribution(&alice()), ONE);
    }

    #[test]
    fn test_rescue_retry_after_strategy_failure() {
        let (chain, mut engine, strategy) = setup();
        deposit(&chain, &mut engine, &alice(), 100 * ONE);
        strategy.accrue(ONE);
        engine.harvest().unwrap();
        chain.pause_strategy(TRACK, true);

        assert!(engine.rescue(&owner()).is_err());
        // Refund went out, yield is still held in custody
        assert_eq!(chain.balance(TRACK, &alice()), 75 * ONE);
        assert_eq!(engine.yield_pool(), ONE);
        engine.verify_invariants().unwrap();

        chain.pause_strategy(TRACK, false);
        let receipt = engine.rescue(&owner()).unwrap();
        assert_eq!(receipt.refunded, 0);
        assert_eq!(receipt.swept_to_admin, 26 * ONE);
        assert_eq!(chain.balance(TRACK, &alice()), 75 * ONE);
    }

    #[test]
    fn test_renounce_once() {
        let (_, mut engine, _) = setup();

        assert!(engine.renounce_contract(&alice()).is_err());
        engine.renounce_contract(&owner()).unwrap();
        assert!(engine.check_renounced());
        assert_eq!(engine.renounce_contract(&owner()), Err(TreasuryError::ContractRenounced));
        assert_eq!(engine.events().filter_by_type(EventType::ContractRenounced).len(), 1);
    }

    #[test]
    fn test_renounce_disables_admin_but_not_depositors() {
        let (chain, mut engine, _) = setup();
        deposit(&chain, &mut engine, &alice(), 10 * ONE);
        engine.renounce_contract(&owner()).unwrap();

        assert_eq!(engine.rescue(&owner()), Err(TreasuryError::ContractRenounced));
        assert_eq!(
            engine.set_minimum_contribution(&owner(), ONE),
            Err(TreasuryError::ContractRenounced)
        );

        deposit(&chain, &mut engine, &bob(), 10 * ONE);
        engine.halt(&alice()).unwrap();
        chain.mint(TRACK, &STABLE_POOL, ONE);
        assert_eq!(engine.sweep_unattributed().unwrap(), ONE);
    }

    #[test]
    fn test_shared_latch_crosses_engines() {
        let latch = RenounceLatch::new();
        let (_, mut first, _) = setup_with_latch(latch.clone());
        let (_, mut second, _) = setup_with_latch(latch);

        first.renounce_contract(&owner()).unwrap();

        assert!(second.check_renounced());
        assert_eq!(second.rescue(&owner()), Err(TreasuryError::ContractRenounced));
    }

    #[test]
    fn test_set_minimum() {
        let (chain, mut engine, _) = setup();
        chain.mint(TRACK, &alice(), 150 * ONE);

        engine.set_minimum_contribution(&owner(), 100 * ONE).unwrap();
        assert_eq!(engine.minimum_contribution(), 100 * ONE);
        assert!(matches!(
            engine.deposit(&alice(), 50 * ONE),
            Err(TreasuryError::BelowMinimum { .. })
        ));

        engine.set_minimum_contribution(&owner(), 50 * ONE).unwrap();
        engine.deposit(&alice(), 50 * ONE).unwrap();
        engine.deposit(&alice(), 100 * ONE).unwrap();
        assert_eq!(engine.lifetime_contribution(&alice()), 150 * ONE);
        assert!(engine.set_minimum_contribution(&alice(), 0).is_err());
    }

    #[test]
    fn test_sweep_gift() {
        let (chain, mut engine, _) = setup();
        deposit(&chain, &mut engine, &alice(), 20_000 * ONE);
        chain.mint(TRACK, &bob(), 5_000 * ONE);
        chain.transfer(TRACK, &bob(), &STABLE_POOL, 5_000 * ONE).unwrap();

        assert_eq!(engine.sweep_unattributed().unwrap(), 5_000 * ONE);

        assert_eq!(engine.total_contribution(), 25_000 * ONE);
        assert_eq!(engine.locked(), 10_000 * ONE);
        assert_eq!(engine.unstakeable_amount(&alice()).unwrap(), 15_000 * ONE);
        assert_eq!(engine.percentage_of(&alice()).unwrap(), 8_000);
        assert_eq!(engine.sweep_unattributed().unwrap(), 0);
        engine.verify_invariants().unwrap();
    }

    #[test]
    fn test_sweep_into_empty_pool() {
        let (chain, mut engine, _) = setup();
        chain.mint(TRACK, &STABLE_POOL, 100);

        assert_eq!(engine.sweep_unattributed().unwrap(), 100);
        assert_eq!(engine.locked(), 100);
        assert_eq!(engine.liquid(), 0);
    }

    #[test]
    fn test_sweep_leaves_yield_and_dust() {
        let (chain, mut engine, strategy) = setup();
        deposit(&chain, &mut engine, &alice(), 1);
        deposit(&chain, &mut engine, &bob(), 2);
        strategy.accrue(10);
        engine.harvest().unwrap();

        assert_eq!(engine.sweep_unattributed().unwrap(), 0);
        assert_eq!(engine.undistributed_dust(), 1);
    }
}
