//! Treasury configuration.
//!
//! Defaults come from `yieldrise_common::constants`; the `mainnet` feature
//! switches the contribution floors. `TreasuryConfig::from_env` lets the
//! simulator override them at runtime.

use serde::{Deserialize, Serialize};
use yieldrise_common::constants::{accounts, limits, partition};
use yieldrise_common::math::validate_bps;
use yieldrise_common::{AdminConfig, Address, Amount, AssetTrack, TreasuryError, TreasuryResult};

/// Configuration of one asset track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackConfig {
    /// Track this configuration applies to
    pub track: AssetTrack,
    /// Custody account of the pool
    pub pool_account: Address,
    /// Initial contribution floor
    pub minimum_contribution: Amount,
    /// Liquid share of every deposit, in basis points
    pub liquid_ratio_bps: u128,
    /// Harvest pending yield before crediting a new deposit
    pub harvest_on_deposit: bool,
}

impl TrackConfig {
    /// Default configuration for `track`
    pub fn for_track(track: AssetTrack) -> Self {
        let (pool_account, minimum_contribution) = match track {
            AssetTrack::Native => (accounts::NATIVE_POOL, limits::MIN_NATIVE_CONTRIBUTION),
            AssetTrack::Stable => (accounts::STABLE_POOL, limits::MIN_STABLE_CONTRIBUTION),
        };
        Self {
            track,
            pool_account,
            minimum_contribution,
            liquid_ratio_bps: partition::LIQUID_RATIO_BPS,
            harvest_on_deposit: true,
        }
    }

    /// Override the contribution floor
    pub fn with_minimum(mut self, minimum_contribution: Amount) -> Self {
        self.minimum_contribution = minimum_contribution;
        self
    }

    /// Toggle harvesting before deposits
    pub fn with_harvest_on_deposit(mut self, enabled: bool) -> Self {
        self.harvest_on_deposit = enabled;
        self
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> TreasuryResult<()> {
        validate_bps(self.liquid_ratio_bps, "liquid_ratio_bps")?;
        if self.pool_account == accounts::ZERO {
            return Err(TreasuryError::InvalidParameter {
                param: "pool_account",
                reason: "cannot be the zero address",
            });
        }
        Ok(())
    }
}

/// Configuration of a dual-track treasury
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreasuryConfig {
    /// Administrative configuration shared by both tracks
    pub admin: AdminConfig,
    /// Native track
    pub native: TrackConfig,
    /// Stable track
    pub stable: TrackConfig,
}

impl TreasuryConfig {
    /// Default configuration owned by `owner`
    pub fn new(owner: Address) -> TreasuryResult<Self> {
        let config = Self {
            admin: AdminConfig::new(owner)?,
            native: TrackConfig::for_track(AssetTrack::Native),
            stable: TrackConfig::for_track(AssetTrack::Stable),
        };
        config.validate()?;
        Ok(config)
    }

    /// Configuration of one track
    pub fn track(&self, track: AssetTrack) -> &TrackConfig {
        match track {
            AssetTrack::Native => &self.native,
            AssetTrack::Stable => &self.stable,
        }
    }

    /// Check both tracks are usable and distinct
    pub fn validate(&self) -> TreasuryResult<()> {
        if self.native.track != AssetTrack::Native || self.stable.track != AssetTrack::Stable {
            return Err(TreasuryError::InvalidParameter {
                param: "track",
                reason: "track configuration assigned to the wrong slot",
            });
        }
        if self.native.pool_account == self.stable.pool_account {
            return Err(TreasuryError::InvalidParameter {
                param: "pool_account",
                reason: "tracks must not share a custody account",
            });
        }
        self.native.validate()?;
        self.stable.validate()
    }

    /// Load configuration from environment variables.
    ///
    /// - `TREASURY_OWNER` (hex, 32 bytes) is required
    /// - `NATIVE_MIN_CONTRIBUTION`, `STABLE_MIN_CONTRIBUTION` (base units)
    /// - `HARVEST_ON_DEPOSIT` (`true`/`false`)
    pub fn from_env() -> TreasuryResult<Self> {
        let owner = env_var("TREASURY_OWNER").ok_or(TreasuryError::InvalidParameter {
            param: "TREASURY_OWNER",
            reason: "environment variable is required",
        })?;
        let mut config = Self::new(parse_address(&owner)?)?;

        if let Some(raw) = env_var("NATIVE_MIN_CONTRIBUTION") {
            config.native.minimum_contribution = parse_amount(&raw, "NATIVE_MIN_CONTRIBUTION")?;
        }
        if let Some(raw) = env_var("STABLE_MIN_CONTRIBUTION") {
            config.stable.minimum_contribution = parse_amount(&raw, "STABLE_MIN_CONTRIBUTION")?;
        }
        if let Some(raw) = env_var("HARVEST_ON_DEPOSIT") {
            let enabled = raw.parse::<bool>().map_err(|_| TreasuryError::InvalidParameter {
                param: "HARVEST_ON_DEPOSIT",
                reason: "expected true or false",
            })?;
            config.native.harvest_on_deposit = enabled;
            config.stable.harvest_on_deposit = enabled;
        }

        config.validate()?;
        Ok(config)
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse a 32-byte address from hex (with or without `0x`)
pub fn parse_address(raw: &str) -> TreasuryResult<Address> {
    let invalid = TreasuryError::InvalidParameter {
        param: "address",
        reason: "expected 32 bytes of hex",
    };
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let bytes = hex::decode(digits).map_err(|_| invalid.clone())?;
    bytes.try_into().map_err(|_| invalid)
}

fn parse_amount(raw: &str, param: &'static str) -> TreasuryResult<Amount> {
    raw.trim().parse::<Amount>().map_err(|_| TreasuryError::InvalidParameter {
        param,
        reason: "expected an unsigned integer amount",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_track_config() {
        let config = TrackConfig::for_track(AssetTrack::Stable);
        assert_eq!(config.liquid_ratio_bps, 7_500);
        assert_eq!(config.pool_account, accounts::STABLE_POOL);
        assert!(config.harvest_on_deposit);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_ratio_rejected() {
        let mut config = TrackConfig::for_track(AssetTrack::Native);
        config.liquid_ratio_bps = 12_000;
        assert!(matches!(
            config.validate(),
            Err(TreasuryError::InvalidParameter { param: "liquid_ratio_bps", .. })
        ));
    }

    #[test]
    fn test_shared_pool_account_rejected() {
        let mut config = TreasuryConfig::new([1u8; 32]).unwrap();
        config.stable.pool_account = config.native.pool_account;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_address() {
        let hex_owner = format!("0x{}", "01".repeat(32));
        assert_eq!(parse_address(&hex_owner).unwrap(), [1u8; 32]);
        assert!(parse_address("0x0102").is_err());
        assert!(parse_address("not hex").is_err());
    }

    #[test]
    fn test_config_serde() {
        let config = TreasuryConfig::new([7u8; 32]).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        let decoded: TreasuryConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, decoded);
        assert_eq!(decoded.track(AssetTrack::Native).track, AssetTrack::Native);
    }
}
