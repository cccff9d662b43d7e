//! External Collaborators
//!
//! The engine never moves assets itself. Every settlement goes through a
//! [`Custody`] boundary, and the locked compartment lives in a
//! [`YieldStrategy`] the engine only observes through its reported value.

use yieldrise_common::{Address, Amount, TreasuryResult};

/// Asset custody for one track.
///
/// The pool's own funds sit under [`Custody::pool_account`]. Transfers in
/// pull from a holder into the pool; transfers out pay from the pool.
pub trait Custody {
    /// Account holding the pool's raw asset
    fn pool_account(&self) -> Address;

    /// Pull `amount` from `from` into the pool
    fn transfer_in(&mut self, from: &Address, amount: Amount) -> TreasuryResult<()>;

    /// Pay `amount` from the pool to `to`
    fn transfer_out(&mut self, to: &Address, amount: Amount) -> TreasuryResult<()>;

    /// Raw asset balance of any holder
    fn balance_of(&self, holder: &Address) -> Amount;
}

/// External yield-generating strategy for one track.
///
/// A value oracle that is expected to be monotonic or flat; the engine
/// tolerates it reporting less than before.
pub trait YieldStrategy {
    /// Supply `amount` from pool custody into the strategy
    fn deposit(&mut self, amount: Amount) -> TreasuryResult<()>;

    /// Redeem `amount` of the pool's position back into pool custody,
    /// returning what was actually received
    fn withdraw(&mut self, amount: Amount) -> TreasuryResult<Amount>;

    /// Current value of the pool's position
    fn current_value(&self) -> TreasuryResult<Amount>;

    /// Hand the whole position, in the strategy's own representation, to `to`
    fn transfer_position(&mut self, to: &Address) -> TreasuryResult<Amount>;
}
