//! YieldRise Common Library
//!
//! Shared types, constants, errors, math and events for the YieldRise
//! treasury: a custodial ledger that takes deposits on two asset tracks,
//! keeps 75% of every deposit liquid and supplies 25% to an external yield
//! strategy, and distributes harvested yield in proportion to stake.
//!
//! ## Modules
//!
//! - **constants**: Partition ratios, default floors, well-known accounts
//! - **errors**: Typed `TreasuryError` with stable codes
//! - **types**: Tracks, depositor records, pool snapshots
//! - **math**: Checked basis-point arithmetic (always truncating)
//! - **events**: One event per state change, plus an in-memory log
//! - **access_control**: Owner checks and the renounce gate
//!
//! This crate is `no_std` compatible when built without the `std` feature.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Re-export Vec for submodules based on feature
#[cfg(not(feature = "std"))]
pub use alloc::vec::Vec;
#[cfg(feature = "std")]
pub use std::vec::Vec;

pub mod constants;
pub mod errors;
pub mod types;
pub mod math;
pub mod events;
pub mod access_control;

// Re-exports for convenience
pub use constants::*;
pub use errors::*;
pub use types::*;
pub use events::*;
pub use access_control::*;
