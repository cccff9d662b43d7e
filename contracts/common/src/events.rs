//! Treasury Events
//!
//! Every state change of an asset track emits one event. Events can be
//! indexed off-chain for building UIs, loyalty reporting and audits.

use crate::Vec;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use crate::types::{Address, Amount, AssetTrack};

/// Event types for indexing and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
#[borsh(use_discriminant = true)]
#[repr(u8)]
pub enum EventType {
    // Depositor Events (0x01 - 0x1F)
    Contributed = 0x01,
    ContributionHalted = 0x02,
    YieldClaimed = 0x03,

    // Yield Events (0x20 - 0x3F)
    YieldHarvested = 0x20,
    UnattributedSwept = 0x21,

    // Administrative Events (0x80 - 0x9F)
    MinimumContributionChanged = 0x80,
    PoolRescued = 0x81,
    ContractRenounced = 0x82,
}

/// Main event enum containing all treasury events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum TreasuryEvent {
    // ============ Depositor Events ============

    /// Emitted when a deposit is accepted and partitioned
    Contributed {
        track: AssetTrack,
        depositor: Address,
        amount: Amount,
        liquid_share: Amount,
        locked_share: Amount,
        new_contribution: Amount,
        total_contribution: Amount,
        sequence: u64,
    },

    /// Emitted when a depositor exits with their liquid entitlement
    ContributionHalted {
        track: AssetTrack,
        depositor: Address,
        paid_out: Amount,
        forfeited: Amount,
        total_contribution: Amount,
        sequence: u64,
    },

    /// Emitted when allocated yield is paid out
    YieldClaimed {
        track: AssetTrack,
        depositor: Address,
        amount: Amount,
        yield_pool: Amount,
        sequence: u64,
    },

    // ============ Yield Events ============

    /// Emitted when a positive strategy delta is distributed
    YieldHarvested {
        track: AssetTrack,
        delta: Amount,
        distributed: Amount,
        dust: Amount,
        recipients: u64,
        sequence: u64,
    },

    /// Emitted when funds that arrived outside the deposit path are absorbed
    UnattributedSwept {
        track: AssetTrack,
        amount: Amount,
        total_contribution: Amount,
        sequence: u64,
    },

    // ============ Administrative Events ============

    /// Emitted when the contribution floor changes
    MinimumContributionChanged {
        track: AssetTrack,
        old_minimum: Amount,
        new_minimum: Amount,
        sequence: u64,
    },

    /// Emitted when the administrator unwinds a pool
    PoolRescued {
        track: AssetTrack,
        admin: Address,
        refunded: Amount,
        refunded_depositors: u64,
        swept_to_admin: Amount,
        sequence: u64,
    },

    /// Emitted once when administrative privileges are dropped
    ContractRenounced {
        track: AssetTrack,
        owner: Address,
        sequence: u64,
    },
}

impl TreasuryEvent {
    /// Get the event type for filtering
    pub fn event_type(&self) -> EventType {
        match self {
            Self::Contributed { .. } => EventType::Contributed,
            Self::ContributionHalted { .. } => EventType::ContributionHalted,
            Self::YieldClaimed { .. } => EventType::YieldClaimed,
            Self::YieldHarvested { .. } => EventType::YieldHarvested,
            Self::UnattributedSwept { .. } => EventType::UnattributedSwept,
            Self::MinimumContributionChanged { .. } => EventType::MinimumContributionChanged,
            Self::PoolRescued { .. } => EventType::PoolRescued,
            Self::ContractRenounced { .. } => EventType::ContractRenounced,
        }
    }

    /// Track the event belongs to
    pub fn track(&self) -> AssetTrack {
        match self {
            Self::Contributed { track, .. }
            | Self::ContributionHalted { track, .. }
            | Self::YieldClaimed { track, .. }
            | Self::YieldHarvested { track, .. }
            | Self::UnattributedSwept { track, .. }
            | Self::MinimumContributionChanged { track, .. }
            | Self::PoolRescued { track, .. }
            | Self::ContractRenounced { track, .. } => *track,
        }
    }

    /// Position of the event in its track's operation sequence
    pub fn sequence(&self) -> u64 {
        match self {
            Self::Contributed { sequence, .. }
            | Self::ContributionHalted { sequence, .. }
            | Self::YieldClaimed { sequence, .. }
            | Self::YieldHarvested { sequence, .. }
            | Self::UnattributedSwept { sequence, .. }
            | Self::MinimumContributionChanged { sequence, .. }
            | Self::PoolRescued { sequence, .. }
            | Self::ContractRenounced { sequence, .. } => *sequence,
        }
    }

    /// Serialize event to bytes for storage/transmission
    pub fn to_bytes(&self) -> Vec<u8> {
        borsh::to_vec(self).unwrap_or_default()
    }

    /// Deserialize event from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        borsh::from_slice(bytes).ok()
    }
}

/// Event log for collecting events during execution
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<TreasuryEvent>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Emit an event (add to log)
    pub fn emit(&mut self, event: TreasuryEvent) {
        self.events.push(event);
    }

    /// Get all events
    pub fn events(&self) -> &[TreasuryEvent] {
        &self.events
    }

    /// Take ownership of all events, leaving the log empty
    pub fn drain(&mut self) -> Vec<TreasuryEvent> {
        core::mem::take(&mut self.events)
    }

    /// Filter events by type
    pub fn filter_by_type(&self, event_type: EventType) -> Vec<&TreasuryEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Most recent event, if any
    pub fn last(&self) -> Option<&TreasuryEvent> {
        self.events.last()
    }

    /// Check if any events were emitted
    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Get number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
