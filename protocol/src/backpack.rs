//! Backpack rows served to the inventory page

use crate::ParseError;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// One stack of items in a user's backpack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackpackEntry {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    pub count: u32,
    pub effect_type: String,
    #[serde(default)]
    pub effect_amount: i64,
}

/// Parse the backpack listing. Anything other than a JSON array is rejected.
pub fn parse_backpack(body: &str) -> Result<Vec<BackpackEntry>> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| ParseError::InvalidFormat(format!("backpack body: {}", e)))?;

    if !value.is_array() {
        return Err(ParseError::InvalidFormat(
            "expected an array but received something else".to_string(),
        )
        .into());
    }

    let entries = serde_json::from_value(value)
        .map_err(|e| ParseError::InvalidFormat(format!("backpack entry: {}", e)))?;
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_backpack() {
        let body = r#"[{"id": 7, "name": "Potion", "image": "/img/potion.png",
                        "count": 3, "effect_type": "heal", "effect_amount": 20}]"#;
        let entries = parse_backpack(body).unwrap();

        assert_eq!(
            entries,
            vec![BackpackEntry {
                id: 7,
                name: "Potion".to_string(),
                image: Some("/img/potion.png".to_string()),
                count: 3,
                effect_type: "heal".to_string(),
                effect_amount: 20,
            }]
        );
    }

    #[test]
    fn test_parse_backpack_rejects_object() {
        let err = parse_backpack(r#"{"message": "unauthorized"}"#).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ParseError>(),
            Some(ParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_serialize_round_shape() {
        let entry = BackpackEntry {
            id: 1,
            name: "Rare Candy".to_string(),
            image: None,
            count: 1,
            effect_type: "level".to_string(),
            effect_amount: 1,
        };
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["effect_type"], "level");
        assert_eq!(json["count"], 1);
    }
}
