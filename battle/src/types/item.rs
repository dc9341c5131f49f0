//! Backpack items

use pokearena_protocol::BackpackEntry;

use super::ability::{Effect, EffectType};
use super::pokemon::Battler;
use crate::error::{BattleError, Result};

/// A stack of identical items
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub id: u64,
    pub name: String,
    pub image: Option<String>,

    /// Units owned (never 0 while the stack is in a backpack)
    pub count: u32,

    pub effect: Effect,
}

impl TryFrom<&BackpackEntry> for Item {
    type Error = BattleError;

    fn try_from(entry: &BackpackEntry) -> Result<Self> {
        if entry.count == 0 {
            return Err(BattleError::InvalidInput(format!(
                "backpack entry {} has count 0",
                entry.id
            )));
        }
        Ok(Self {
            id: entry.id,
            name: entry.name.clone(),
            image: entry.image.clone(),
            count: entry.count,
            effect: Effect::parse(&entry.effect_type, entry.effect_amount)?,
        })
    }
}

impl Item {
    /// Convert back into the listing row
    pub fn to_entry(&self) -> BackpackEntry {
        let effect_type = match self.effect.kind {
            EffectType::Boost(stat) => stat.as_str().to_string(),
            EffectType::Heal => "heal".to_string(),
            EffectType::Level => "level".to_string(),
        };
        BackpackEntry {
            id: self.id,
            name: self.name.clone(),
            image: self.image.clone(),
            count: self.count,
            effect_type,
            effect_amount: self.effect.amount,
        }
    }
}

/// A user's item inventory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Backpack {
    items: Vec<Item>,
}

impl Backpack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from listing rows, merging rows that share an id
    pub fn from_entries(entries: &[BackpackEntry]) -> Result<Self> {
        let mut backpack = Self::new();
        for entry in entries {
            backpack.add(Item::try_from(entry)?)?;
        }
        Ok(backpack)
    }

    /// Add a stack; an existing stack with the same id grows instead
    pub fn add(&mut self, item: Item) -> Result<()> {
        if item.count == 0 {
            return Err(BattleError::InvalidInput(format!(
                "cannot add an empty stack of {}",
                item.name
            )));
        }
        match self.items.iter_mut().find(|i| i.id == item.id) {
            Some(existing) => existing.count = existing.count.saturating_add(item.count),
            None => self.items.push(item),
        }
        Ok(())
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, item_id: u64) -> Option<&Item> {
        self.items.iter().find(|i| i.id == item_id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Use one unit on a battler. Returns the change the effect applied.
    pub fn use_item(&mut self, item_id: u64, target: &mut Battler) -> Result<i64> {
        let index = self.index_of(item_id)?;
        let change = target.apply_effect(&self.items[index].effect);
        self.take(index, 1);
        Ok(change)
    }

    /// Throw away `quantity` units. Returns how many remain.
    pub fn discard(&mut self, item_id: u64, quantity: u32) -> Result<u32> {
        let index = self.index_of(item_id)?;
        let count = self.items[index].count;
        if quantity == 0 || quantity > count {
            return Err(BattleError::InvalidInput(format!(
                "cannot delete {} of {} (owned: {})",
                quantity, self.items[index].name, count
            )));
        }
        Ok(self.take(index, quantity))
    }

    pub fn to_entries(&self) -> Vec<BackpackEntry> {
        self.items.iter().map(Item::to_entry).collect()
    }

    fn index_of(&self, item_id: u64) -> Result<usize> {
        // Empty stacks can only arrive through deserialization; treat them as absent
        self.items
            .iter()
            .position(|i| i.id == item_id && i.count > 0)
            .ok_or_else(|| BattleError::NotFound(format!("item {}", item_id)))
    }

    fn take(&mut self, index: usize, quantity: u32) -> u32 {
        let remaining = self.items[index].count.saturating_sub(quantity);
        if remaining == 0 {
            self.items.remove(index);
        } else {
            self.items[index].count = remaining;
        }
        remaining
    }
}
