//! Domain types for battle setup

mod ability;
mod item;
mod pokemon;
mod stats;

pub use ability::{Ability, Effect, EffectType};
pub use item::{Backpack, Item};
pub use pokemon::{Battler, MAX_LEVEL, OpponentSpecies};
pub use stats::{Stat, Stats};
