//! Protocol Constants
//!
//! All magic numbers and default configuration values for the YieldRise treasury.
//!
//! # Network Configuration
//!
//! Use feature flags to compile for different networks:
//! - `mainnet` - Production values (meaningful contribution floors)
//! - Default (no feature) - Testnet values (small floors for testing)
//!
//! ```toml
//! # For mainnet deployment:
//! yieldrise-common = { path = "...", features = ["mainnet"] }
//! ```

/// Asset Metadata
pub mod token {
    /// One whole unit with decimals (1 token = 10^18 base units)
    pub const ONE: u128 = 1_000_000_000_000_000_000;

    /// Native settlement asset symbol
    pub const NATIVE_SYMBOL: &str = "AVAX";
    /// External stable-value asset symbol
    pub const STABLE_SYMBOL: &str = "DAI";
}

/// Liquidity partition (in basis points, 10_000 = 100%)
pub mod partition {
    /// Basis points denominator
    pub const BPS_DENOMINATOR: u128 = 10_000;

    /// Share of every deposit that stays immediately withdrawable (75%)
    pub const LIQUID_RATIO_BPS: u128 = 7_500;

    /// Share of every deposit supplied to the yield strategy (25%)
    pub const LOCKED_RATIO_BPS: u128 = BPS_DENOMINATOR - LIQUID_RATIO_BPS;
}

/// Contribution Limits
///
/// Values differ between mainnet and testnet to allow easier testing.
pub mod limits {
    use super::token::ONE;

    /// Default minimum native contribution
    /// - Mainnet: 1 AVAX
    /// - Testnet: 0.01 AVAX
    #[cfg(feature = "mainnet")]
    pub const MIN_NATIVE_CONTRIBUTION: u128 = ONE;
    #[cfg(not(feature = "mainnet"))]
    pub const MIN_NATIVE_CONTRIBUTION: u128 = ONE / 100;

    /// Default minimum stable contribution
    /// - Mainnet: 50 DAI
    /// - Testnet: 1 DAI
    #[cfg(feature = "mainnet")]
    pub const MIN_STABLE_CONTRIBUTION: u128 = 50 * ONE;
    #[cfg(not(feature = "mainnet"))]
    pub const MIN_STABLE_CONTRIBUTION: u128 = ONE;
}

/// Well-known account identifiers
pub mod accounts {
    /// Custody account of the native track pool
    pub const NATIVE_POOL: [u8; 32] = *b"yieldrise::pool::native\0\0\0\0\0\0\0\0\0";

    /// Custody account of the stable track pool
    pub const STABLE_POOL: [u8; 32] = *b"yieldrise::pool::stable\0\0\0\0\0\0\0\0\0";

    /// The zero address is never a valid owner or depositor
    pub const ZERO: [u8; 32] = [0u8; 32];
}
