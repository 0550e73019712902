//! Core trait abstractions (ports)

use async_trait::async_trait;

use super::error::LedgerResult;
use super::types::{EntityDetails, KeyPage, NonFungibleItem, StoreEntry, StoreKey};

/// Ledger query port - read access to ledger state, optionally pinned to a
/// state version.
///
/// Implementations decode remote values into [`crate::core::FieldNode`]
/// trees; decode failures are [`crate::core::LedgerError::Malformed`].
#[async_trait]
pub trait LedgerQuery: Send + Sync {
    /// Latest state version the ledger has committed
    async fn current_state_version(&self) -> LedgerResult<u64>;

    /// Details of one entity, `None` if it does not exist at that state
    async fn entity_details(
        &self,
        address: &str,
        state_version: Option<u64>,
    ) -> LedgerResult<Option<EntityDetails>>;

    /// One page of a key-value store's keys
    async fn list_store_keys(
        &self,
        store_address: &str,
        state_version: Option<u64>,
        cursor: Option<&str>,
        page_size: usize,
    ) -> LedgerResult<KeyPage>;

    /// Values for the given keys; keys without a value are omitted
    async fn store_values(
        &self,
        store_address: &str,
        keys: &[StoreKey],
        state_version: Option<u64>,
    ) -> LedgerResult<Vec<StoreEntry>>;

    /// Non-fungible data for the given ids of one resource
    async fn non_fungible_data(
        &self,
        resource_address: &str,
        ids: &[String],
        state_version: Option<u64>,
    ) -> LedgerResult<Vec<NonFungibleItem>>;
}
