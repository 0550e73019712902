//! Gateway API request and response bodies

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct LedgerStateSelector {
    pub state_version: u64,
}

impl LedgerStateSelector {
    pub fn pinned(state_version: Option<u64>) -> Option<Self> {
        state_version.map(|state_version| Self { state_version })
    }
}

#[derive(Debug, Deserialize)]
pub struct GatewayStatusResponse {
    pub ledger_state: LedgerState,
}

#[derive(Debug, Deserialize)]
pub struct LedgerState {
    pub state_version: u64,
}

#[derive(Debug, Serialize)]
pub struct EntityDetailsRequest<'a> {
    pub addresses: Vec<&'a str>,
    pub aggregation_level: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub at_ledger_state: Option<LedgerStateSelector>,
}

#[derive(Debug, Deserialize)]
pub struct EntityDetailsResponse {
    #[serde(default)]
    pub items: Vec<EntityDetailsItem>,
}

#[derive(Debug, Deserialize)]
pub struct EntityDetailsItem {
    pub address: String,
    #[serde(default)]
    pub details: Option<EntityDetailsBody>,
}

#[derive(Debug, Deserialize)]
pub struct EntityDetailsBody {
    #[serde(rename = "type")]
    pub entity_type: String,
    #[serde(default)]
    pub blueprint_name: Option<String>,
    #[serde(default)]
    pub state: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct KeyValueStoreKeysRequest<'a> {
    pub key_value_store_address: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub at_ledger_state: Option<LedgerStateSelector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<&'a str>,
    pub limit_per_page: usize,
}

#[derive(Debug, Deserialize)]
pub struct KeyValueStoreKeysResponse {
    #[serde(default)]
    pub items: Vec<KeyValueStoreKeysItem>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct KeyValueStoreKeysItem {
    pub key: EncodedValue,
}

/// A value as the gateway returns it: raw SBOR hex plus its programmatic JSON
#[derive(Debug, Deserialize)]
pub struct EncodedValue {
    pub raw_hex: String,
    pub programmatic_json: Value,
}

#[derive(Debug, Serialize)]
pub struct KeyValueStoreDataRequest<'a> {
    pub key_value_store_address: &'a str,
    pub keys: Vec<KeyHex<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub at_ledger_state: Option<LedgerStateSelector>,
}

#[derive(Debug, Serialize)]
pub struct KeyHex<'a> {
    pub key_hex: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct KeyValueStoreDataResponse {
    #[serde(default)]
    pub entries: Vec<KeyValueStoreEntry>,
}

#[derive(Debug, Deserialize)]
pub struct KeyValueStoreEntry {
    pub key: EncodedValue,
    pub value: EncodedValue,
}

#[derive(Debug, Serialize)]
pub struct NonFungibleDataRequest<'a> {
    pub resource_address: &'a str,
    pub non_fungible_ids: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub at_ledger_state: Option<LedgerStateSelector>,
}

#[derive(Debug, Deserialize)]
pub struct NonFungibleDataResponse {
    #[serde(default)]
    pub non_fungible_ids: Vec<NonFungibleDataItem>,
}

#[derive(Debug, Deserialize)]
pub struct NonFungibleDataItem {
    pub non_fungible_id: String,
    #[serde(default)]
    pub is_burned: bool,
    #[serde(default)]
    pub data: Option<EncodedValue>,
}

/// Error body of a non-2xx response
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub details: Option<ErrorDetails>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetails {
    #[serde(rename = "type")]
    pub error_type: String,
}
