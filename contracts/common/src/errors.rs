//! Error Types for the YieldRise Treasury
//!
//! Typed errors so integrators can branch on the failure kind
//! (insufficient funds vs. unauthorized vs. permanently closed).

use core::fmt;

use crate::types::{Address, Amount, AssetTrack};

/// Result type alias for treasury operations
pub type TreasuryResult<T> = Result<T, TreasuryError>;

/// Main error enum for all treasury errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreasuryError {
    // ============ Amount Errors ============
    /// Deposit under the configured contribution floor
    BelowMinimum { amount: Amount, minimum: Amount },

    /// Zero amount not allowed
    ZeroAmount,

    // ============ Authorization Errors ============
    /// Caller is not the owner of the treasury
    Unauthorized { expected: Address, actual: Address },

    /// Administrative operation attempted after renounce
    ContractRenounced,

    // ============ Depositor Errors ============
    /// Claim with no allocated yield
    NothingToClaim { depositor: Address },

    /// Halt by a depositor with no live contribution
    NoActiveContribution { depositor: Address },

    // ============ Consistency Errors ============
    /// Payout exceeds its compartment balance.
    /// Only reachable if a ledger invariant is already broken.
    InsufficientLiquidity {
        track: AssetTrack,
        available: Amount,
        requested: Amount,
    },

    /// A ledger invariant check failed
    InvariantViolated { invariant: &'static str },

    // ============ Math Errors ============
    /// Arithmetic overflow occurred
    Overflow,

    /// Arithmetic underflow occurred
    Underflow,

    /// Division by zero
    DivisionByZero,

    // ============ Collaborator Errors ============
    /// Custody transfer rejected by the asset holder
    TransferFailed {
        from: Address,
        to: Address,
        amount: Amount,
    },

    /// External yield strategy rejected the request
    StrategyFailure { reason: &'static str },

    // ============ Configuration Errors ============
    /// Invalid configuration or input parameter
    InvalidParameter {
        param: &'static str,
        reason: &'static str,
    },

    /// The track's serial execution point is unusable (a writer panicked)
    EngineUnavailable { track: AssetTrack },
}

impl TreasuryError {
    /// Returns a stable error code for logging/debugging
    pub fn code(&self) -> &'static str {
        match self {
            Self::BelowMinimum { .. } => "E010_BELOW_MINIMUM",
            Self::ZeroAmount => "E011_ZERO_AMOUNT",
            Self::Unauthorized { .. } => "E020_UNAUTHORIZED",
            Self::ContractRenounced => "E021_RENOUNCED",
            Self::NothingToClaim { .. } => "E030_NOTHING_TO_CLAIM",
            Self::NoActiveContribution { .. } => "E031_NO_CONTRIBUTION",
            Self::InsufficientLiquidity { .. } => "E040_INSUFFICIENT_LIQUIDITY",
            Self::InvariantViolated { .. } => "E041_INVARIANT",
            Self::Overflow => "E050_OVERFLOW",
            Self::Underflow => "E051_UNDERFLOW",
            Self::DivisionByZero => "E052_DIV_ZERO",
            Self::TransferFailed { .. } => "E060_TRANSFER_FAILED",
            Self::StrategyFailure { .. } => "E061_STRATEGY_FAILURE",
            Self::InvalidParameter { .. } => "E070_INVALID_PARAM",
            Self::EngineUnavailable { .. } => "E080_ENGINE_UNAVAILABLE",
        }
    }

    /// Returns true if this error is recoverable (user can fix it)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::BelowMinimum { .. } => true, // Increase amount
            Self::ZeroAmount => true,
            Self::NothingToClaim { .. } => true, // Wait for a harvest
            Self::TransferFailed { .. } => true, // Fund or approve, then retry
            _ => false,
        }
    }

    /// Returns true if this error signals a broken internal invariant.
    ///
    /// Fatal errors must never be retried; the track should be halted and
    /// investigated.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InsufficientLiquidity { .. }
                | Self::InvariantViolated { .. }
                | Self::EngineUnavailable { .. }
        )
    }
}

impl fmt::Display for TreasuryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BelowMinimum { amount, minimum } => {
                write!(f, "{}: amount {} below minimum {}", self.code(), amount, minimum)
            }
            Self::InsufficientLiquidity { track, available, requested } => write!(
                f,
                "{}: {} track has {} liquid, {} requested",
                self.code(),
                track,
                available,
                requested
            ),
            Self::InvariantViolated { invariant } => {
                write!(f, "{}: {}", self.code(), invariant)
            }
            Self::TransferFailed { amount, .. } => {
                write!(f, "{}: transfer of {} rejected", self.code(), amount)
            }
            Self::StrategyFailure { reason } => write!(f, "{}: {}", self.code(), reason),
            Self::InvalidParameter { param, reason } => {
                write!(f, "{}: {} {}", self.code(), param, reason)
            }
            Self::EngineUnavailable { track } => {
                write!(f, "{}: {} track engine poisoned", self.code(), track)
            }
            _ => f.write_str(self.code()),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TreasuryError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_error_codes_unique() {
        let errors = [
            TreasuryError::BelowMinimum { amount: 1, minimum: 2 },
            TreasuryError::ZeroAmount,
            TreasuryError::Unauthorized { expected: [1u8; 32], actual: [2u8; 32] },
            TreasuryError::ContractRenounced,
            TreasuryError::NothingToClaim { depositor: [1u8; 32] },
            TreasuryError::NoActiveContribution { depositor: [1u8; 32] },
            TreasuryError::InsufficientLiquidity {
                track: AssetTrack::Native,
                available: 0,
                requested: 1,
            },
            TreasuryError::InvariantViolated { invariant: "x" },
            TreasuryError::Overflow,
            TreasuryError::Underflow,
            TreasuryError::DivisionByZero,
            TreasuryError::TransferFailed { from: [0u8; 32], to: [1u8; 32], amount: 1 },
            TreasuryError::StrategyFailure { reason: "x" },
            TreasuryError::InvalidParameter { param: "x", reason: "y" },
            TreasuryError::EngineUnavailable { track: AssetTrack::Stable },
        ];

        let codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        let unique: BTreeSet<_> = codes.iter().collect();
        assert_eq!(codes.len(), unique.len(), "Error codes must be unique");
    }

    #[test]
    fn test_liquidity_errors_are_fatal() {
        let err = TreasuryError::InsufficientLiquidity {
            track: AssetTrack::Stable,
            available: 10,
            requested: 11,
        };
        assert!(err.is_fatal());
        assert!(!err.is_recoverable());
        assert!(!TreasuryError::ContractRenounced.is_fatal());
        assert!(TreasuryError::BelowMinimum { amount: 1, minimum: 2 }.is_recoverable());
    }

    #[test]
    fn test_display_carries_code() {
        let err = TreasuryError::BelowMinimum { amount: 5, minimum: 10 };
        assert_eq!(err.to_string(), "E010_BELOW_MINIMUM: amount 5 below minimum 10");
        assert_eq!(TreasuryError::ContractRenounced.to_string(), "E021_RENOUNCED");
    }
}
