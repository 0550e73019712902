//! Core domain types

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::field_tree::FieldNode;

/// One liquidity bin of the pool's bin map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bin {
    /// Reserve of the single token the bin holds
    pub reserve: BigDecimal,
    /// Sum of all receipt claims on this bin
    pub total_claim: BigDecimal,
}

/// Immutable view of a pool and its bin map at one ledger state
#[derive(Debug, Clone)]
pub struct PoolSnapshot {
    pub pool_address: String,
    /// State version every read of the snapshot was pinned to
    pub state_version: u64,
    pub bin_map_address: String,
    /// Keyed by bin lower tick
    pub bin_map: BTreeMap<i32, Bin>,
    pub current_tick: Option<i32>,
    pub active_reserve_x: BigDecimal,
    pub active_reserve_y: BigDecimal,
    pub active_total_claim: BigDecimal,
    pub bin_width: u32,
    /// Resource address of the liquidity receipts
    pub receipt_manager_id: String,
}

/// A receipt's claim on one bin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    pub tick: i32,
    pub claim_amount: BigDecimal,
}

impl Claim {
    pub fn new(tick: i32, claim_amount: BigDecimal) -> Self {
        Self { tick, claim_amount }
    }
}

/// Token amounts a receipt redeems for, as exact decimal strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedemptionAmounts {
    #[serde(rename = "xToken")]
    pub token_x: String,
    #[serde(rename = "yToken")]
    pub token_y: String,
}

impl RedemptionAmounts {
    pub fn from_decimals(token_x: &BigDecimal, token_y: &BigDecimal) -> Self {
        Self {
            token_x: format_decimal(token_x),
            token_y: format_decimal(token_y),
        }
    }

    pub fn zero() -> Self {
        Self {
            token_x: "0".to_string(),
            token_y: "0".to_string(),
        }
    }
}

/// Plain decimal notation with trailing zeros stripped (`100.0` -> `100`)
pub fn format_decimal(value: &BigDecimal) -> String {
    let normalized = value.normalized();
    let (_, scale) = normalized.as_bigint_and_exponent();
    if scale < 0 {
        normalized.with_scale(0).to_plain_string()
    } else {
        normalized.to_plain_string()
    }
}

/// Details of a ledger entity
#[derive(Debug, Clone)]
pub struct EntityDetails {
    pub address: String,
    /// Entity kind reported by the ledger, e.g. `Component` or `FungibleResource`
    pub entity_type: String,
    pub blueprint_name: Option<String>,
    /// Decoded component state, absent for entities without one
    pub state: Option<FieldNode>,
}

impl EntityDetails {
    pub fn is_component(&self) -> bool {
        self.entity_type == "Component"
    }
}

/// A key of a key-value store as returned by the key listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreKey {
    /// Raw encoded key, used to request the value
    pub raw_hex: String,
    pub decoded: FieldNode,
}

/// One page of a key listing
#[derive(Debug, Clone, Default)]
pub struct KeyPage {
    pub items: Vec<StoreKey>,
    pub next_cursor: Option<String>,
}

/// A key-value store entry
#[derive(Debug, Clone)]
pub struct StoreEntry {
    pub key: FieldNode,
    pub value: FieldNode,
}

/// Non-fungible data for one requested id
#[derive(Debug, Clone)]
pub struct NonFungibleItem {
    pub id: String,
    pub is_burned: bool,
    /// `None` when the ledger holds no data for the id
    pub data: Option<FieldNode>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_format_decimal_strips_trailing_zeros() {
        let cases = [
            ("100.0", "100"),
            ("0.500", "0.5"),
            ("0", "0"),
            ("0.000", "0"),
            ("1200", "1200"),
            ("0.000000000000000001", "0.000000000000000001"),
        ];
        for (input, expected) in cases {
            let value = BigDecimal::from_str(input).unwrap();
            assert_eq!(format_decimal(&value), expected, "formatting {}", input);
        }
    }

    #[test]
    fn test_amounts_serialize_with_original_keys() {
        let amounts = RedemptionAmounts {
            token_x: "1.5".to_string(),
            token_y: "0".to_string(),
        };
        let json = serde_json::to_value(&amounts).unwrap();
        assert_eq!(json, serde_json::json!({ "xToken": "1.5", "yToken": "0" }));
    }
}
