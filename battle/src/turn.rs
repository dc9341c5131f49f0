//! Turn order

/// Who acts first in a round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnOrder {
    pub user_goes_first: bool,
}

/// The faster battler acts first. On equal speed the user acts first.
pub fn resolve_turn_order(user_speed: u32, opponent_speed: u32) -> TurnOrder {
    TurnOrder {
        user_goes_first: user_speed >= opponent_speed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tie_goes_to_user() {
        assert!(resolve_turn_order(100, 100).user_goes_first);
        assert!(resolve_turn_order(0, 0).user_goes_first);
    }

    #[test]
    fn test_faster_goes_first() {
        assert!(!resolve_turn_order(100, 101).user_goes_first);
        assert!(resolve_turn_order(101, 100).user_goes_first);
        assert!(!resolve_turn_order(0, u32::MAX).user_goes_first);
    }
}
