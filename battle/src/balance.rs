//! Opponent balancing
//!
//! Scales base stats to a reference level with the main-series stat formula,
//! taking IVs and EVs as zero:
//!
//! ```text
//! hp    = floor(2 * base * level / 100) + level + 10
//! other = floor(2 * base * level / 100) + 5
//! ```
//!
//! Computed in 128-bit and saturated to `u32`. Both terms are non-decreasing
//! in `level`, so a higher reference level never produces a lower stat.

use crate::error::{BattleError, Result};
use crate::types::{Battler, OpponentSpecies, Stat, Stats};

/// Stats scaled to a level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BalancedStats {
    pub level: u32,
    pub stats: Stats,
}

/// Scale `base` to `reference_level`
pub fn balance(base: &Stats, reference_level: i64) -> Result<BalancedStats> {
    let level = validate_level(reference_level)?;
    let stats = base.map(|stat, value| match stat {
        Stat::Hp => scaled_hp(value, level),
        _ => scaled_stat(value, level),
    });
    Ok(BalancedStats { level, stats })
}

/// Build an opponent battler at the reference level
pub fn balanced_opponent(species: &OpponentSpecies, reference_level: i64) -> Result<Battler> {
    let balanced = balance(&species.base_stats, reference_level)?;
    Battler::new(species.name.clone(), balanced.level, balanced.stats)
}

/// Non-HP stat at a level
pub fn scaled_stat(base: u32, level: u32) -> u32 {
    saturate(growth(base, level) + 5)
}

/// HP at a level
pub fn scaled_hp(base: u32, level: u32) -> u32 {
    saturate(growth(base, level) + u128::from(level) + 10)
}

fn growth(base: u32, level: u32) -> u128 {
    2 * u128::from(base) * u128::from(level) / 100
}

fn saturate(value: u128) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn validate_level(level: i64) -> Result<u32> {
    if level <= 0 {
        return Err(BattleError::InvalidInput(format!(
            "reference level must be positive (got {})",
            level
        )));
    }
    u32::try_from(level)
        .map_err(|_| BattleError::InvalidInput(format!("reference level {} is too large", level)))
}
