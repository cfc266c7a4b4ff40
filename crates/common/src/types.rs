use serde::{Deserialize, Serialize};

/// Prefix of every reservation counter key in the counter store.
pub const COUNTER_KEY_PREFIX: &str = "item.";

/// Identifier of a catalog product.
///
/// Wraps the numeric id so product ids cannot be confused with
/// quantities or prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(i64);

impl ItemId {
    /// Creates an item ID from a raw integer.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the underlying integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }

    /// Returns the counter store key holding this item's available quantity.
    pub fn counter_key(&self) -> String {
        format!("{COUNTER_KEY_PREFIX}{}", self.0)
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ItemId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::str::FromStr for ItemId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_key_uses_item_prefix() {
        assert_eq!(ItemId::new(3).counter_key(), "item.3");
        assert_eq!(ItemId::new(1050).counter_key(), "item.1050");
    }

    #[test]
    fn item_id_parses_base_ten() {
        assert_eq!("42".parse::<ItemId>().unwrap(), ItemId::new(42));
        assert!("4x".parse::<ItemId>().is_err());
        assert!("".parse::<ItemId>().is_err());
    }

    #[test]
    fn item_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&ItemId::new(7)).unwrap();
        assert_eq!(json, "7");
        let back: ItemId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ItemId::new(7));
    }
}
