//! YieldRise Treasury
//!
//! Custodial contribution and yield accounting for two independent asset
//! tracks, a native coin and a stablecoin.
//!
//! Every deposit is split by a fixed ratio: 75% stays liquid in pool custody
//! and is returned on exit, 25% is supplied to an external yield strategy.
//! Strategy growth is harvested back into custody and allocated to
//! depositors in proportion to their share of the track's total stake.
//!
//! ## Layout
//!
//! - **ledger**: Per-depositor principal, lifetime totals and claimable yield
//! - **partition**: Liquid / Locked / Yield compartments
//! - **shares**: Basis-point shares and liquid entitlements
//! - **engine**: `TrackEngine`, one track's state and its deposit path
//! - **yield_engine**: Harvest and claim
//! - **lifecycle**: Halt, rescue, renounce, contribution floor, sweep
//! - **executor**: Mutex-guarded handle to one track
//! - **treasury**: Both tracks under one owner
//! - **collaborators**: `Custody` and `YieldStrategy` seams
//! - **simulation**: In-memory chain implementing both seams
//! - **config**: Track and treasury configuration

pub mod collaborators;
pub mod config;
pub mod engine;
pub mod executor;
pub mod ledger;
pub mod lifecycle;
pub mod partition;
pub mod shares;
pub mod simulation;
pub mod treasury;
pub mod yield_engine;


pub use collaborators::{Custody, YieldStrategy};
pub use config::{TrackConfig, TreasuryConfig};
pub use engine::{DepositReceipt, TrackEngine};
pub use executor::AssetTrackExecutor;
pub use lifecycle::{HaltReceipt, RenounceLatch, RescueReceipt};
pub use simulation::{simulated_treasury, SimulatedChain, SimulatedTreasury};
pub use treasury::Treasury;
pub use yield_engine::{HarvestOutcome, HarvestState};

pub use yieldrise_common as common;
