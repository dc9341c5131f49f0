//! Random Battle Example
//!
//! Fetches a random opponent from PokeAPI, balances it against a stored
//! Charmander and prints who moves first. Uses in-memory stores for the
//! user's Pokemon, backpack and ability catalog.
//!
//! Run with `RUST_LOG=debug` to see fetches and retries.

use anyhow::Result;
use pokearena_battle::{Backpack, Stats};
use pokearena_client::memory::{MemoryCatalog, MemoryTrainerStore};
use pokearena_client::{
    Arena, ArenaConfig, BattlePage, Battler, PokeApiClient, SessionId, StartBattleForm,
    UseItemForm,
};
use pokearena_protocol::{OpponentRef, parse_backpack, parse_catalog};

const USER: u64 = 1;

const CATALOG: &str = r#"[
    {"id": 1, "name": "Guts", "effect_type": "attack", "effect_amount": 10},
    {"id": 2, "name": "Swift Swim", "effect_type": "speed", "effect_amount": 15},
    {"id": 3, "name": "Thick Fat", "effect_type": "defense", "effect_amount": 10},
    {"id": 4, "name": "Regenerator", "effect_type": "heal", "effect_amount": 20}
]"#;

const BACKPACK: &str = r#"[
    {"id": 1, "name": "Potion", "image": null, "count": 3, "effect_type": "heal", "effect_amount": 20},
    {"id": 2, "name": "Rare Candy", "image": null, "count": 1, "effect_type": "level", "effect_amount": 1}
]"#;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ArenaConfig::from_env();
    let source = PokeApiClient::new(&config)?;
    let catalog = MemoryCatalog::from_records(&parse_catalog(CATALOG)?)?;

    let trainers = MemoryTrainerStore::new();
    let charmander = Battler::new("Charmander", 12, Stats::new(35, 19, 17, 20, 18, 22))?.with_id(1);
    trainers.insert_pokemon(USER, charmander)?;
    trainers.set_backpack(USER, Backpack::from_entries(&parse_backpack(BACKPACK)?)?)?;

    let arena = Arena::new(source, catalog, trainers);
    let session = SessionId::new("demo");
    arena.sessions().login(&session, USER)?;

    let lobby = arena.open_lobby(&session).await?;
    println!("A wild {} appeared!", lobby.opponent.name);
    for pokemon in &lobby.gallery {
        println!("  available: {} (lv {})", pokemon.name, pokemon.level);
    }

    // Level up before the fight
    let candy = UseItemForm {
        item_id: 2,
        id: 1,
        effect_type: None,
        effect_amount: None,
    };
    let leveled = arena.use_item(&session, &candy).await?;
    println!("{} grew to level {}", leveled.name, leveled.level);

    let form = StartBattleForm {
        pokemon_id: 1,
        opponent_pokemon: OpponentRef::Named {
            name: lobby.opponent.name.clone(),
        },
    };
    let mut state = arena
        .start_battle(&session, &form, &mut rand::thread_rng())
        .await?;

    println!(
        "{} (lv {}, spe {}) vs {} (lv {}, spe {}, ability {})",
        state.user.name,
        state.user.level,
        state.user.speed(),
        state.opponent.name,
        state.opponent.level,
        state.opponent.speed(),
        state
            .opponent
            .abilities
            .first()
            .map(|a| a.name.as_str())
            .unwrap_or("none"),
    );
    println!(
        "{} moves first",
        if state.user_goes_first() {
            &state.user.name
        } else {
            &state.opponent.name
        }
    );

    state.trigger_abilities();
    println!("After abilities: opponent stats {:?}", state.opponent.stats);

    if let BattlePage::Battle(current) = arena.current_battle(&session)? {
        println!("Session holds a battle against {}", current.opponent.name);
    }

    arena.conclude_battle(&session)?;
    println!("Battle over. Backpack: {:?}", arena.backpack(&session).await?);

    Ok(())
}
