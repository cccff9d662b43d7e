//! Access Control Module
//!
//! Owner-gated authorization for the treasury's administrative surface.
//! The owner identity is external configuration; the renounced flag is
//! passed in explicitly so every check sees the same latch value.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::constants::accounts;
use crate::errors::{TreasuryError, TreasuryResult};
use crate::types::Address;

// ============================================================================
// Types
// ============================================================================

/// Owner-gated operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    /// Change the contribution floor of a track
    SetMinimumContribution,
    /// Unwind a pool and sweep its locked side to the owner
    Rescue,
    /// Drop administrative privileges for good
    Renounce,
}

impl AdminAction {
    /// Name used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            AdminAction::SetMinimumContribution => "set_minimum_contribution",
            AdminAction::Rescue => "rescue",
            AdminAction::Renounce => "renounce_contract",
        }
    }
}

/// Administrative configuration of a treasury
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct AdminConfig {
    /// Owner identity
    pub owner: Address,
}

impl AdminConfig {
    /// Create a new admin configuration
    pub fn new(owner: Address) -> TreasuryResult<Self> {
        if owner == accounts::ZERO {
            return Err(TreasuryError::InvalidParameter {
                param: "owner",
                reason: "cannot be the zero address",
            });
        }
        Ok(Self { owner })
    }

    /// Whether `caller` is the owner
    pub fn is_owner(&self, caller: &Address) -> bool {
        self.owner == *caller
    }
}

// ============================================================================
// Core Access Control Functions
// ============================================================================

/// Require that `caller` is the owner
pub fn require_owner(config: &AdminConfig, caller: &Address) -> TreasuryResult<()> {
    if !config.is_owner(caller) {
        return Err(TreasuryError::Unauthorized {
            expected: config.owner,
            actual: *caller,
        });
    }
    Ok(())
}

/// Authorize an administrative action
///
/// Ownership is checked first, so non-owners always see `Unauthorized`.
/// Every administrative action is refused once renounced.
pub fn authorize(
    config: &AdminConfig,
    caller: &Address,
    renounced: bool,
) -> TreasuryResult<()> {
    require_owner(config, caller)?;

    if renounced {
        return Err(TreasuryError::ContractRenounced);
    }

    Ok(())
}
