//! Abilities and the effects they (and items) carry

use pokearena_protocol::AbilityRecord;

use super::stats::Stat;
use crate::error::{BattleError, Result};

/// What an effect does when applied to a battler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectType {
    /// Add the amount to one stat
    Boost(Stat),

    /// Restore current HP, capped at max HP
    Heal,

    /// Raise (or lower) the level
    Level,
}

impl EffectType {
    /// Parse the `effect_type` column ("speed", "heal", "level", ...)
    pub fn from_name(name: &str) -> Result<Self> {
        let key = name.trim().to_lowercase();
        match key.as_str() {
            "heal" | "restore" => Ok(EffectType::Heal),
            "level" | "level-up" => Ok(EffectType::Level),
            _ => Stat::from_name(&key)
                .map(EffectType::Boost)
                .ok_or_else(|| BattleError::InvalidInput(format!("unknown effect type '{}'", name))),
        }
    }
}

/// An effect with its magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Effect {
    pub kind: EffectType,
    pub amount: i64,
}

impl Effect {
    pub fn new(kind: EffectType, amount: i64) -> Self {
        Self { kind, amount }
    }

    pub fn parse(effect_type: &str, amount: i64) -> Result<Self> {
        Ok(Self::new(EffectType::from_name(effect_type)?, amount))
    }
}

/// An entry of the ability catalog
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ability {
    pub id: u64,
    pub name: String,
    pub effect: Effect,
}

impl Ability {
    pub fn new(id: u64, name: impl Into<String>, effect: Effect) -> Self {
        Self {
            id,
            name: name.into(),
            effect,
        }
    }
}

impl TryFrom<&AbilityRecord> for Ability {
    type Error = BattleError;

    fn try_from(record: &AbilityRecord) -> Result<Self> {
        if record.name.trim().is_empty() {
            return Err(BattleError::InvalidInput(format!(
                "ability {} has no name",
                record.id
            )));
        }
        Ok(Self::new(
            record.id,
            record.name.clone(),
            Effect::parse(&record.effect_type, record.effect_amount)?,
        ))
    }
}
