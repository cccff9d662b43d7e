//! Mathematical Utilities for the YieldRise Treasury
//!
//! Checked integer math for basis-point shares and partition splits.
//! Every division truncates toward zero; nothing is ever rounded up.

use alloy_primitives::U256;

use crate::constants::partition::BPS_DENOMINATOR;
use crate::errors::{TreasuryError, TreasuryResult};
use crate::types::{Amount, BasisPoints};

/// Checked addition
pub fn add(a: Amount, b: Amount) -> TreasuryResult<Amount> {
    a.checked_add(b).ok_or(TreasuryError::Overflow)
}

/// Checked subtraction
pub fn sub(a: Amount, b: Amount) -> TreasuryResult<Amount> {
    a.checked_sub(b).ok_or(TreasuryError::Underflow)
}

/// Calculate `value * numerator / denominator`, truncating.
///
/// The product is formed in 256 bits; only a quotient that does not fit
/// `u128` overflows.
pub fn mul_div(value: Amount, numerator: u128, denominator: u128) -> TreasuryResult<Amount> {
    if denominator == 0 {
        return Err(TreasuryError::DivisionByZero);
    }
    let quotient = U256::from(value) * U256::from(numerator) / U256::from(denominator);
    u128::try_from(quotient).map_err(|_| TreasuryError::Overflow)
}

/// Share of `part` in `whole`, in basis points
///
/// Returns 0 when `whole` is zero.
///
/// # Example
/// 10,000 of 35,000 is 2857 bps (28.57%), not 2858.
pub fn share_bps(part: Amount, whole: Amount) -> TreasuryResult<BasisPoints> {
    if whole == 0 {
        return Ok(0);
    }
    mul_div(part, BPS_DENOMINATOR, whole)
}

/// Apply a basis-point rate to an amount
pub fn apply_bps(amount: Amount, bps: BasisPoints) -> TreasuryResult<Amount> {
    mul_div(amount, bps, BPS_DENOMINATOR)
}

/// Validate that a basis-point value does not exceed 100%
pub fn validate_bps(bps: BasisPoints, param: &'static str) -> TreasuryResult<BasisPoints> {
    if bps > BPS_DENOMINATOR {
        return Err(TreasuryError::InvalidParameter {
            param,
            reason: "exceeds 10000 basis points",
        });
    }
    Ok(bps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::partition::LIQUID_RATIO_BPS;
    use crate::constants::token::ONE;

    #[test]
    fn test_share_truncates() {
        assert_eq!(share_bps(10_000 * ONE, 35_000 * ONE).unwrap(), 2857);
        assert_eq!(share_bps(1, 3).unwrap(), 3333);
        assert_eq!(share_bps(12_500, 100_000).unwrap(), 1250);
    }

    #[test]
    fn test_share_of_empty_pool() {
        assert_eq!(share_bps(0, 0).unwrap(), 0);
        assert_eq!(share_bps(5, 0).unwrap(), 0);
    }

    #[test]
    fn test_apply_liquid_ratio() {
        assert_eq!(apply_bps(10_000 * ONE, LIQUID_RATIO_BPS).unwrap(), 7_500 * ONE);
        assert_eq!(apply_bps(50 * ONE, LIQUID_RATIO_BPS).unwrap(), 37_500_000_000_000_000_000);
        // 3 * 0.75 = 2.25 truncates to 2
        assert_eq!(apply_bps(3, LIQUID_RATIO_BPS).unwrap(), 2);
    }

    #[test]
    fn test_mul_div_wide_product() {
        // 100 tokens of yield against 10,000 of 17,500 staked
        let product_overflows_u128 = (100 * ONE).checked_mul(10_000 * ONE).is_none();
        assert!(product_overflows_u128);
        assert_eq!(
            mul_div(100 * ONE, 10_000 * ONE, 17_500 * ONE).unwrap(),
            57_142_857_142_857_142_857
        );
    }

    #[test]
    fn test_mul_div_errors() {
        assert_eq!(mul_div(1, 1, 0), Err(TreasuryError::DivisionByZero));
        assert_eq!(mul_div(u128::MAX, 2, 1), Err(TreasuryError::Overflow));
    }

    #[test]
    fn test_checked_add_sub() {
        assert_eq!(add(2, 3).unwrap(), 5);
        assert_eq!(add(u128::MAX, 1), Err(TreasuryError::Overflow));
        assert_eq!(sub(3, 2).unwrap(), 1);
        assert_eq!(sub(2, 3), Err(TreasuryError::Underflow));
    }

    #[test]
    fn test_validate_bps() {
        assert_eq!(validate_bps(7_500, "ratio").unwrap(), 7_500);
        assert!(validate_bps(10_001, "ratio").is_err());
    }
}
