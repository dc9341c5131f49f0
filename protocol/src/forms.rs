//! Inbound form bodies
//!
//! The battle page posts the opponent either as `{"name": "pidgey"}` or as a
//! bare string, depending on which page sent it. Both are accepted.

use crate::ParseError;
use anyhow::Result;
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Reference to the opponent chosen in the lobby
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OpponentRef {
    Named { name: String },
    Bare(String),
}

impl OpponentRef {
    pub fn name(&self) -> &str {
        match self {
            Self::Named { name } => name,
            Self::Bare(name) => name,
        }
    }
}

/// Body of `POST /battle/startBattle`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StartBattleForm {
    pub pokemon_id: u64,
    pub opponent_pokemon: OpponentRef,
}

/// Body of `POST /api/pokemon/item`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UseItemForm {
    pub item_id: u64,

    /// Target Pokemon id
    pub id: u64,

    /// Echoed by the page; the stored item is authoritative
    #[serde(default)]
    pub effect_type: Option<String>,
    #[serde(default)]
    pub effect_amount: Option<i64>,
}

/// Body of `DELETE /api/backpack/delete/{id}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DeleteItemForm {
    pub quantity: u32,
}

/// Parse any form body from JSON
pub fn parse_form<T: DeserializeOwned>(body: &str) -> Result<T> {
    if body.trim().is_empty() {
        return Err(ParseError::EmptyMessage.into());
    }
    let form = serde_json::from_str(body)
        .map_err(|e| ParseError::InvalidFormat(format!("form body: {}", e)))?;
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_battle_named_opponent() {
        let form: StartBattleForm =
            parse_form(r#"{"pokemon_id": 4, "opponent_pokemon": {"name": "pidgey"}}"#).unwrap();

        assert_eq!(form.pokemon_id, 4);
        assert_eq!(form.opponent_pokemon.name(), "pidgey");
    }

    #[test]
    fn test_start_battle_bare_opponent() {
        let form: StartBattleForm =
            parse_form(r#"{"pokemon_id": 4, "opponent_pokemon": "rattata"}"#).unwrap();

        assert_eq!(form.opponent_pokemon, OpponentRef::Bare("rattata".to_string()));
        assert_eq!(form.opponent_pokemon.name(), "rattata");
    }

    #[test]
    fn test_use_item_form() {
        let form: UseItemForm = parse_form(
            r#"{"effect_type": "heal", "effect_amount": 20, "item_id": 7, "id": 2}"#,
        )
        .unwrap();

        assert_eq!(form.item_id, 7);
        assert_eq!(form.id, 2);
        assert_eq!(form.effect_amount, Some(20));
    }

    #[test]
    fn test_delete_form() {
        let form: DeleteItemForm = parse_form(r#"{"quantity": 2}"#).unwrap();
        assert_eq!(form.quantity, 2);
    }

    #[test]
    fn test_empty_body() {
        assert!(parse_form::<DeleteItemForm>("").is_err());
        assert!(parse_form::<DeleteItemForm>(r#"{"quantity": -1}"#).is_err());
    }
}
