//! Battlers and opponent species

use pokearena_protocol::PokemonRecord;

use super::ability::{Ability, Effect, EffectType};
use super::stats::{Stat, Stats};
use crate::error::{BattleError, Result};

/// Highest level a battler can reach
pub const MAX_LEVEL: u32 = 100;

/// A species as fetched from the data source, with validated base stats
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpponentSpecies {
    /// National dex id
    pub id: u32,

    pub name: String,

    pub base_stats: Stats,

    pub sprite: Option<String>,

    pub types: Vec<String>,
}

impl TryFrom<&PokemonRecord> for OpponentSpecies {
    type Error = BattleError;

    fn try_from(record: &PokemonRecord) -> Result<Self> {
        if record.name.trim().is_empty() {
            return Err(BattleError::InvalidInput("species has no name".to_string()));
        }
        Ok(Self {
            id: record.id,
            name: record.name.clone(),
            base_stats: Stats::from_raw(&record.base_stats)?,
            sprite: record.sprite.clone(),
            types: record.types.clone(),
        })
    }
}

/// A Pokemon taking part in a battle
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Battler {
    /// Store id, for Pokemon owned by a user
    pub id: Option<u64>,

    pub name: String,

    /// Level (1-100)
    pub level: u32,

    /// Stats at the current level
    pub stats: Stats,

    /// Current HP (`stats.hp` is the maximum)
    pub current_hp: u32,

    pub abilities: Vec<Ability>,
}

impl Battler {
    /// Create a battler at full HP with no abilities
    pub fn new(name: impl Into<String>, level: u32, stats: Stats) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(BattleError::InvalidInput("battler name is empty".to_string()));
        }
        if level == 0 {
            return Err(BattleError::InvalidInput(format!(
                "{} has level 0, levels start at 1",
                name
            )));
        }
        Ok(Self {
            id: None,
            name,
            level,
            current_hp: stats.hp,
            stats,
            abilities: Vec::new(),
        })
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_abilities(mut self, abilities: Vec<Ability>) -> Self {
        self.abilities = abilities;
        self
    }

    /// Speed used for turn order
    pub fn speed(&self) -> u32 {
        self.stats.speed
    }

    /// Apply one effect. Returns the change that was actually applied.
    pub fn apply_effect(&mut self, effect: &Effect) -> i64 {
        match effect.kind {
            EffectType::Boost(Stat::Hp) => {
                let change = self.stats.adjust(Stat::Hp, effect.amount);
                let hp = (i64::from(self.current_hp) + change).clamp(0, i64::from(self.stats.hp));
                self.current_hp = hp as u32;
                change
            }
            EffectType::Boost(stat) => self.stats.adjust(stat, effect.amount),
            EffectType::Heal => {
                let before = i64::from(self.current_hp);
                let hp = before
                    .saturating_add(effect.amount)
                    .clamp(0, i64::from(self.stats.hp));
                self.current_hp = hp as u32;
                hp - before
            }
            EffectType::Level => {
                let before = i64::from(self.level);
                let level = before
                    .saturating_add(effect.amount)
                    .clamp(1, i64::from(MAX_LEVEL));
                self.level = level as u32;
                level - before
            }
        }
    }

    /// Apply every ability's effect once, in order
    pub fn trigger_abilities(&mut self) -> Vec<i64> {
        let effects: Vec<Effect> = self.abilities.iter().map(|a| a.effect).collect();
        effects.iter().map(|e| self.apply_effect(e)).collect()
    }
}
