use anyhow::Result;
use async_trait::async_trait;
use pokearena_battle::{Ability, Backpack, Battler, OpponentSpecies};

/// Id of a logged-in user
pub type UserId = u64;

/// Where opponent species come from.
///
/// Implementations report unknown names as `BattleError::NotFound` and
/// surface transport failures unchanged. Any retrying happens in here, never
/// in the caller.
#[async_trait]
pub trait OpponentSource: Send + Sync {
    /// Look a species up by name
    async fn fetch_by_name(&self, name: &str) -> Result<OpponentSpecies>;

    /// Pick a species at random
    async fn fetch_random(&self) -> Result<OpponentSpecies>;
}

/// The authoritative list of abilities. May be empty.
#[async_trait]
pub trait AbilityCatalog: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Ability>>;
}

/// Per-user Pokemon and backpacks.
///
/// Lookups are always scoped by owner: a Pokemon owned by someone else is
/// reported as `BattleError::NotFound`.
#[async_trait]
pub trait TrainerStore: Send + Sync {
    async fn get_pokemon(&self, owner: UserId, id: u64) -> Result<Battler>;

    /// All of an owner's Pokemon, ordered by id
    async fn list_pokemon(&self, owner: UserId) -> Result<Vec<Battler>>;

    async fn save_pokemon(&self, owner: UserId, pokemon: Battler) -> Result<()>;

    async fn backpack(&self, owner: UserId) -> Result<Backpack>;

    async fn save_backpack(&self, owner: UserId, backpack: Backpack) -> Result<()>;
}
