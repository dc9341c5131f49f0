mod arena;
pub mod config;
pub mod memory;
mod pokeapi;
mod sessions;
mod source;

pub use arena::{Arena, BattlePage, Lobby};
pub use config::{ArenaConfig, POKEAPI_URL, RetryPolicy};
pub use pokeapi::{FetchError, PokeApiClient};
pub use sessions::{SessionId, SessionRecord, SessionStore};
pub use source::{AbilityCatalog, OpponentSource, TrainerStore, UserId};

pub use pokearena_battle::{BattleError, BattleState, Battler, OpponentSpecies};
pub use pokearena_protocol::{DeleteItemForm, StartBattleForm, UseItemForm};
