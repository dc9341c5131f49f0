//! PokeAPI species records
//!
//! These types represent the JSON returned by `GET /api/v2/pokemon/{name}`.
//! Only the fields the arena needs are kept.


use crate::ParseError;
use anyhow::Result;
use serde::Deserialize;

/// Base stats as they arrive on the wire (signed, unvalidated)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawStats {
    pub hp: i64,
    pub attack: i64,
    pub defense: i64,
    pub special_attack: i64,
    pub special_defense: i64,
    pub speed: i64,
}

/// A species record fetched from the data source
#[derive(Debug, Clone, PartialEq)]
pub struct PokemonRecord {
    /// National dex id
    pub id: u32,

    /// Lowercase species name (e.g. "pidgey")
    pub name: String,

    pub base_stats: RawStats,

    /// Front sprite URL, when the source has one
    pub sprite: Option<String>,

    /// Type names ordered by slot
    pub types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct WirePokemon {
    id: u32,
    name: String,
    #[serde(default)]
    stats: Vec<WireStat>,
    #[serde(default)]
    sprites: Option<WireSprites>,
    #[serde(default)]
    types: Vec<WireTypeSlot>,
}

#[derive(Debug, Deserialize)]
struct WireStat {
    base_stat: i64,
    stat: NamedResource,
}

#[derive(Debug, Deserialize)]
struct WireSprites {
    front_default: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireTypeSlot {
    slot: u8,
    #[serde(rename = "type")]
    kind: NamedResource,
}

#[derive(Debug, Deserialize)]
struct NamedResource {
    name: String,
}

/// Parse a species body into a [`PokemonRecord`]
pub fn parse_pokemon(body: &str) -> Result<PokemonRecord> {
    if body.trim().is_empty() {
        return Err(ParseError::EmptyMessage.into());
    }

    let wire: WirePokemon = serde_json::from_str(body)
        .map_err(|e| ParseError::InvalidFormat(format!("species body: {}", e)))?;

    let base_stats = collect_stats(&wire.stats)?;

    let mut slots: Vec<&WireTypeSlot> = wire.types.iter().collect();
    slots.sort_by_key(|t| t.slot);

    Ok(PokemonRecord {
        id: wire.id,
        name: wire.name,
        base_stats,
        sprite: wire.sprites.and_then(|s| s.front_default),
        types: slots.into_iter().map(|t| t.kind.name.clone()).collect(),
    })
}

fn collect_stats(stats: &[WireStat]) -> Result<RawStats> {
    let find = |name: &str| -> Result<i64> {
        stats
            .iter()
            .find(|s| s.stat.name == name)
            .map(|s| s.base_stat)
            .ok_or_else(|| ParseError::MissingField(format!("stat {}", name)).into())
    };

    Ok(RawStats {
        hp: find("hp")?,
        attack: find("attack")?,
        defense: find("defense")?,
        special_attack: find("special-attack")?,
        special_defense: find("special-defense")?,
        speed: find("speed")?,
    })
}

/// Normalize a user supplied species name for lookup ("  Mr Mime " -> "mr-mime")
pub fn normalize_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ParseError::MissingField("species name".to_string()).into());
    }

    Ok(name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase())
}

/// Path of a species resource relative to the API root
pub fn species_path(name_or_id: &str) -> String {
    format!("pokemon/{}", name_or_id)
}
