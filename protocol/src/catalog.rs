//! Ability catalog rows
//!
//! The catalog is owned by an external store. Rows look like
//! `{"id": 3, "name": "Swift Swim", "effect_type": "speed", "effect_amount": 10}`.

use crate::ParseError;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// One row of the ability catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityRecord {
    pub id: u64,
    pub name: String,
    pub effect_type: String,
    #[serde(default)]
    pub effect_amount: i64,
}

/// Parse a JSON array of catalog rows
pub fn parse_catalog(body: &str) -> Result<Vec<AbilityRecord>> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| ParseError::InvalidFormat(format!("catalog body: {}", e)))?;

    if !value.is_array() {
        return Err(ParseError::InvalidFormat("expected an array of abilities".to_string()).into());
    }

    let rows = serde_json::from_value(value)
        .map_err(|e| ParseError::InvalidFormat(format!("catalog row: {}", e)))?;
    Ok(rows)
}
