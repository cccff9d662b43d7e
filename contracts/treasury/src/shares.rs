//! Share Calculator
//!
//! Proportional basis-point shares of the total contribution. Shares are
//! truncated, so the sum over all depositors may fall short of 10,000;
//! the shortfall is the accepted rounding-down bias of the ledger.

use yieldrise_common::math;
use yieldrise_common::{Address, Amount, BasisPoints, TreasuryResult};

use crate::ledger::ContributionLedger;
use crate::partition::LiquidityPartition;

/// Read-only share arithmetic over a ledger and its partition
#[derive(Debug, Clone, Copy)]
pub struct ShareCalculator<'a> {
    ledger: &'a ContributionLedger,
    partition: &'a LiquidityPartition,
}

impl<'a> ShareCalculator<'a> {
    pub fn new(ledger: &'a ContributionLedger, partition: &'a LiquidityPartition) -> Self {
        Self { ledger, partition }
    }

    /// `contribution * 10000 / total_contribution`, 0 on an empty pool
    pub fn percentage_of(&self, depositor: &Address) -> TreasuryResult<BasisPoints> {
        math::share_bps(self.ledger.read(depositor), self.ledger.total_contribution())
    }

    /// Liquid fraction of the depositor's contribution, recomputed on every call
    pub fn unstakeable_amount(&self, depositor: &Address) -> TreasuryResult<Amount> {
        self.partition.unstakeable(self.ledger.read(depositor))
    }

    /// Sum of every depositor's unstakeable amount
    pub fn total_unstakeable(&self) -> TreasuryResult<Amount> {
        self.ledger
            .active()
            .try_fold(0, |sum, (_, record)| {
                math::add(sum, self.partition.unstakeable(record.contribution)?)
            })
    }
}

/// Portion of `delta` owed to `contribution` out of `total`.
///
/// Computed at full precision and truncated once, 0 on an empty pool.
pub fn yield_share(delta: Amount, contribution: Amount, total: Amount) -> TreasuryResult<Amount> {
    if total == 0 {
        return Ok(0);
    }
    math::mul_div(delta, contribution, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use yieldrise_common::constants::partition::LIQUID_RATIO_BPS;
    use yieldrise_common::constants::token::ONE;
    use yieldrise_common::AssetTrack;

    fn alice() -> Address {
        [2u8; 32]
    }

    fn bob() -> Address {
        [3u8; 32]
    }

    fn partition() -> LiquidityPartition {
        LiquidityPartition::new(AssetTrack::Stable, LIQUID_RATIO_BPS).unwrap()
    }

    #[test]
    fn test_percentage_truncates() {
        let mut ledger = ContributionLedger::new(0);
        ledger.deposit(&alice(), 10_000 * ONE).unwrap();
        ledger.deposit(&bob(), 25_000 * ONE).unwrap();
        let partition = partition();
        let shares = ShareCalculator::new(&ledger, &partition);

        // 28.57%
        assert_eq!(shares.percentage_of(&alice()).unwrap(), 2857);
        assert_eq!(shares.percentage_of(&bob()).unwrap(), 7142);
    }

    #[test]
    fn test_percentage_empty_pool() {
        let ledger = ContributionLedger::new(0);
        let partition = partition();
        let shares = ShareCalculator::new(&ledger, &partition);
        assert_eq!(shares.percentage_of(&alice()).unwrap(), 0);
    }

    #[test]
    fn test_unstakeable_follows_contribution() {
        let mut ledger = ContributionLedger::new(0);
        ledger.deposit(&alice(), 10_000 * ONE).unwrap();
        let partition = partition();

        let unstakeable = ShareCalculator::new(&ledger, &partition)
            .unstakeable_amount(&alice())
            .unwrap();
        assert_eq!(unstakeable, 7_500 * ONE);

        ledger.deposit(&alice(), 2_000 * ONE).unwrap();
        let shares = ShareCalculator::new(&ledger, &partition);
        assert_eq!(shares.unstakeable_amount(&alice()).unwrap(), 9_000 * ONE);
        assert_eq!(shares.total_unstakeable().unwrap(), 9_000 * ONE);
    }

    #[test]
    fn test_yield_share() {
        assert_eq!(yield_share(1_000_000, 25, 100).unwrap(), 250_000);
        assert_eq!(yield_share(3, 1, 4).unwrap(), 0);
        assert_eq!(yield_share(5, 1, 0).unwrap(), 0);
    }

    #[test]
    fn test_yield_share_keeps_ratio_past_basis_points() {
        let total = 175 * ONE;
        let first = yield_share(ONE, 100 * ONE, total).unwrap();
        let second = yield_share(ONE, 50 * ONE, total).unwrap();
        let third = yield_share(ONE, 25 * ONE, total).unwrap();

        // A basis-point split would stop at 5714 / 2857 / 1428
        assert_eq!(first, 571_428_571_428_571_428);
        assert_eq!(second, 285_714_285_714_285_714);
        assert_eq!(third, 142_857_142_857_142_857);
        assert!(first - 2 * second <= 1);
        assert!(second - 2 * third <= 1);
    }
}
