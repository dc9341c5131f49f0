//! Stat blocks and stat identifiers

use pokearena_protocol::RawStats;

use crate::error::{BattleError, Result};

/// The six battle stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Stat {
    Hp,
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
}

impl Stat {
    /// All stats in display order
    pub fn all() -> &'static [Stat] {
        &[
            Stat::Hp,
            Stat::Attack,
            Stat::Defense,
            Stat::SpecialAttack,
            Stat::SpecialDefense,
            Stat::Speed,
        ]
    }

    /// Parse from the names used by PokeAPI and the catalog ("special-attack")
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().replace('_', "-").as_str() {
            "hp" => Some(Stat::Hp),
            "attack" | "atk" => Some(Stat::Attack),
            "defense" | "def" => Some(Stat::Defense),
            "special-attack" | "spa" => Some(Stat::SpecialAttack),
            "special-defense" | "spd" => Some(Stat::SpecialDefense),
            "speed" | "spe" => Some(Stat::Speed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stat::Hp => "hp",
            Stat::Attack => "attack",
            Stat::Defense => "defense",
            Stat::SpecialAttack => "special-attack",
            Stat::SpecialDefense => "special-defense",
            Stat::Speed => "speed",
        }
    }
}

/// A validated, non-negative stat block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub special_attack: u32,
    pub special_defense: u32,
    pub speed: u32,
}

impl Stats {
    pub fn new(
        hp: u32,
        attack: u32,
        defense: u32,
        special_attack: u32,
        special_defense: u32,
        speed: u32,
    ) -> Self {
        Self {
            hp,
            attack,
            defense,
            special_attack,
            special_defense,
            speed,
        }
    }

    /// Validate wire stats. Any negative stat is rejected.
    pub fn from_raw(raw: &RawStats) -> Result<Self> {
        let check = |stat: Stat, value: i64| -> Result<u32> {
            if value < 0 {
                return Err(BattleError::InvalidInput(format!(
                    "base {} must not be negative (got {})",
                    stat.as_str(),
                    value
                )));
            }
            u32::try_from(value).map_err(|_| {
                BattleError::InvalidInput(format!("base {} out of range ({})", stat.as_str(), value))
            })
        };

        Ok(Self {
            hp: check(Stat::Hp, raw.hp)?,
            attack: check(Stat::Attack, raw.attack)?,
            defense: check(Stat::Defense, raw.defense)?,
            special_attack: check(Stat::SpecialAttack, raw.special_attack)?,
            special_defense: check(Stat::SpecialDefense, raw.special_defense)?,
            speed: check(Stat::Speed, raw.speed)?,
        })
    }

    /// Get a single stat
    pub fn get(&self, stat: Stat) -> u32 {
        match stat {
            Stat::Hp => self.hp,
            Stat::Attack => self.attack,
            Stat::Defense => self.defense,
            Stat::SpecialAttack => self.special_attack,
            Stat::SpecialDefense => self.special_defense,
            Stat::Speed => self.speed,
        }
    }

    /// Set a single stat
    pub fn set(&mut self, stat: Stat, value: u32) {
        match stat {
            Stat::Hp => self.hp = value,
            Stat::Attack => self.attack = value,
            Stat::Defense => self.defense = value,
            Stat::SpecialAttack => self.special_attack = value,
            Stat::SpecialDefense => self.special_defense = value,
            Stat::Speed => self.speed = value,
        }
    }

    /// Add a signed amount to a stat, clamped at zero. Returns the actual change.
    pub fn adjust(&mut self, stat: Stat, amount: i64) -> i64 {
        let current = i64::from(self.get(stat));
        let new_value = current.saturating_add(amount).clamp(0, i64::from(u32::MAX));
        self.set(stat, new_value as u32);
        new_value - current
    }

    /// Apply `f` to every stat, building a new block
    pub fn map(&self, mut f: impl FnMut(Stat, u32) -> u32) -> Self {
        let mut out = Self::default();
        for &stat in Stat::all() {
            out.set(stat, f(stat, self.get(stat)));
        }
        out
    }
}
