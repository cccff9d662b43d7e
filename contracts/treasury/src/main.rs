//! YieldRise simulator.
//!
//! Replays a production-like sequence of deposits, harvests, claims and
//! exits on an in-memory chain and prints both track snapshots as JSON.
//!
//! `RUST_LOG` controls verbosity; `TREASURY_OWNER` and the other variables
//! read by `TreasuryConfig::from_env` override the defaults.

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use yieldrise_common::constants::token::ONE;
use yieldrise_common::{Address, AssetTrack, TreasuryResult};
use yieldrise_treasury::{simulated_treasury, SimulatedChain, SimulatedTreasury, TreasuryConfig};

const DEFAULT_OWNER: Address = [0xA1; 32];

fn wallet(n: u8) -> Address {
    [0x10 + n; 32]
}

fn load_config() -> TreasuryResult<TreasuryConfig> {
    match TreasuryConfig::from_env() {
        Ok(config) => Ok(config),
        Err(err) => {
            warn!(error = %err, "falling back to default configuration");
            TreasuryConfig::new(DEFAULT_OWNER)
        }
    }
}

fn replay(chain: &SimulatedChain, treasury: &SimulatedTreasury) -> TreasuryResult<()> {
    let (w1, w2, w3, w4) = (wallet(1), wallet(2), wallet(3), wallet(4));
    for w in [w1, w2, w3, w4] {
        chain.mint(AssetTrack::Native, &w, 100 * ONE);
        chain.mint(AssetTrack::Stable, &w, 10_000 * ONE);
    }
    let native = treasury.native();
    let stable = treasury.stable();
    let native_pool = treasury.config().native.pool_account;
    let stable_pool = treasury.config().stable.pool_account;

    native.deposit(&w3, 25 * ONE)?;
    stable.deposit(&w1, 1_500 * ONE)?;

    chain.strategy(AssetTrack::Stable, stable_pool).accrue(30 * ONE);
    stable.harvest()?;
    stable.claim(&w1)?;
    stable.halt(&w1)?;

    for w in [&w2, &w4] {
        stable.deposit(w, 1_500 * ONE)?;
        native.deposit(w, 25 * ONE)?;
    }

    chain.strategy(AssetTrack::Native, native_pool).accrue(3 * ONE);
    chain.strategy(AssetTrack::Stable, stable_pool).accrue(100 * ONE);
    native.harvest()?;
    stable.harvest()?;

    stable.deposit(&w1, 500 * ONE)?;
    native.halt(&w2)?;

    native.verify_invariants()?;
    stable.verify_invariants()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = load_config()?;
    let chain = SimulatedChain::new();
    let treasury = simulated_treasury(config, &chain)?;

    replay(&chain, &treasury)?;

    for (track, commitment) in treasury.state_commitments()? {
        info!(%track, commitment = %hex::encode(commitment), "final state");
    }
    let snapshots = [treasury.native().snapshot()?, treasury.stable().snapshot()?];
    println!("{}", serde_json::to_string_pretty(&snapshots)?);
    Ok(())
}
