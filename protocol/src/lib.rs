//! Wire records for PokeArena.
//!
//! Everything in this crate is loosely typed on purpose: it mirrors what the
//! outside world sends (PokeAPI JSON, catalog rows, backpack rows and form
//! bodies). Validation into domain types happens in `pokearena-battle`.

use thiserror::Error;

pub mod backpack;
pub mod catalog;
pub mod forms;
pub mod pokeapi;

pub use backpack::{BackpackEntry, parse_backpack};
pub use catalog::{AbilityRecord, parse_catalog};
pub use forms::{DeleteItemForm, OpponentRef, StartBattleForm, UseItemForm, parse_form};
pub use pokeapi::{PokemonRecord, RawStats, normalize_name, parse_pokemon, species_path};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid message format: {0}")]
    InvalidFormat(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Empty message")]
    EmptyMessage,
}
