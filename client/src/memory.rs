//! In-memory collaborators
//!
//! Stand-ins for the relational store and a fixed opponent list. Used by the
//! demos and tests, and handy for running the arena without a database.

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use pokearena_battle::{Ability, Backpack, BattleError, Battler, OpponentSpecies};
use pokearena_protocol::{AbilityRecord, normalize_name};
use rand::seq::SliceRandom;

use crate::source::{AbilityCatalog, OpponentSource, TrainerStore, UserId};

/// Fixed ability catalog
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    abilities: Vec<Ability>,
}

impl MemoryCatalog {
    pub fn new(abilities: Vec<Ability>) -> Self {
        Self { abilities }
    }

    /// Build from catalog rows, rejecting malformed ones
    pub fn from_records(records: &[AbilityRecord]) -> Result<Self> {
        let abilities = records
            .iter()
            .map(Ability::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self::new(abilities))
    }
}

#[async_trait]
impl AbilityCatalog for MemoryCatalog {
    async fn list_all(&self) -> Result<Vec<Ability>> {
        Ok(self.abilities.clone())
    }
}

/// Fixed list of opponent species
#[derive(Debug, Clone, Default)]
pub struct MemoryOpponents {
    species: Vec<OpponentSpecies>,
}

impl MemoryOpponents {
    pub fn new(species: Vec<OpponentSpecies>) -> Self {
        Self { species }
    }
}

#[async_trait]
impl OpponentSource for MemoryOpponents {
    async fn fetch_by_name(&self, name: &str) -> Result<OpponentSpecies> {
        let wanted = normalize_name(name)?;
        self.species
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(&wanted))
            .cloned()
            .ok_or_else(|| BattleError::NotFound(format!("pokemon '{}'", name)).into())
    }

    async fn fetch_random(&self) -> Result<OpponentSpecies> {
        self.species
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or_else(|| BattleError::NotFound("any pokemon (opponent list is empty)".to_string()).into())
    }
}

/// Pokemon and backpacks keyed by owner
#[derive(Debug, Default)]
pub struct MemoryTrainerStore {
    pokemon: RwLock<HashMap<(UserId, u64), Battler>>,
    backpacks: RwLock<HashMap<UserId, Backpack>>,
}

impl MemoryTrainerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give `owner` a Pokemon. The battler must carry an id.
    pub fn insert_pokemon(&self, owner: UserId, pokemon: Battler) -> Result<()> {
        let id = pokemon
            .id
            .ok_or_else(|| BattleError::InvalidInput(format!("{} has no id", pokemon.name)))?;
        self.pokemon
            .write()
            .map_err(|_| anyhow!("Pokemon store lock poisoned"))?
            .insert((owner, id), pokemon);
        Ok(())
    }

    pub fn set_backpack(&self, owner: UserId, backpack: Backpack) -> Result<()> {
        self.backpacks
            .write()
            .map_err(|_| anyhow!("Backpack store lock poisoned"))?
            .insert(owner, backpack);
        Ok(())
    }
}

#[async_trait]
impl TrainerStore for MemoryTrainerStore {
    async fn get_pokemon(&self, owner: UserId, id: u64) -> Result<Battler> {
        self.pokemon
            .read()
            .map_err(|_| anyhow!("Pokemon store lock poisoned"))?
            .get(&(owner, id))
            .cloned()
            .ok_or_else(|| BattleError::NotFound(format!("pokemon {} for user {}", id, owner)).into())
    }

    async fn list_pokemon(&self, owner: UserId) -> Result<Vec<Battler>> {
        let pokemon = self
            .pokemon
            .read()
            .map_err(|_| anyhow!("Pokemon store lock poisoned"))?;
        let mut owned: Vec<Battler> = pokemon
            .iter()
            .filter(|((o, _), _)| *o == owner)
            .map(|(_, p)| p.clone())
            .collect();
        owned.sort_by_key(|p| p.id);
        Ok(owned)
    }

    async fn save_pokemon(&self, owner: UserId, pokemon: Battler) -> Result<()> {
        self.insert_pokemon(owner, pokemon)
    }

    async fn backpack(&self, owner: UserId) -> Result<Backpack> {
        Ok(self
            .backpacks
            .read()
            .map_err(|_| anyhow!("Backpack store lock poisoned"))?
            .get(&owner)
            .cloned()
            .unwrap_or_default())
    }

    async fn save_backpack(&self, owner: UserId, backpack: Backpack) -> Result<()> {
        self.set_backpack(owner, backpack)
    }
}
