//! Pool snapshot assembly
//!
//! Reads the pool component, pages through every key of its bin-map store
//! and fetches the bin values in concurrent chunks. A snapshot is all or
//! nothing: any failed chunk or undecodable bin fails the assembly.

use bigdecimal::{BigDecimal, Signed};
use futures::future::try_join_all;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

use super::fetch::{chunk_count, timed};
use crate::config::FetchConfig;
use crate::core::error::{classify_component_error, classify_store_error};
use crate::core::field_tree::parse_int;
use crate::core::{
    Bin, ComponentError, DataError, FieldNode, LedgerQuery, PoolSnapshot, RedemptionError,
    RedemptionResult, StoreEntry, StoreKey,
};

const BIN_MAP_FIELD: &str = "bin_map";
const RECEIPT_MANAGER_FIELD: &str = "liquidity_receipt_manager";
const ACTIVE_X_FIELD: &str = "active_x";
const ACTIVE_Y_FIELD: &str = "active_y";
const ACTIVE_TOTAL_CLAIM_FIELD: &str = "active_total_claim";
const BIN_SPAN_FIELD: &str = "bin_span";
const TICK_INDEX_FIELD: &str = "tick_index";
const CURRENT_TICK_FIELD: &str = "current";

const BIN_AMOUNT_FIELD: &str = "amount";
const BIN_TOTAL_CLAIM_FIELD: &str = "total_claim";

/// Builds [`PoolSnapshot`]s from ledger state
pub struct SnapshotAssembler {
    ledger: Arc<dyn LedgerQuery>,
    settings: FetchConfig,
}

/// Scalars read from the pool component state
struct PoolFields {
    bin_map_address: String,
    receipt_manager_id: String,
    active_reserve_x: BigDecimal,
    active_reserve_y: BigDecimal,
    active_total_claim: BigDecimal,
    bin_width: u32,
    current_tick: Option<i32>,
}

impl SnapshotAssembler {
    pub fn new(ledger: Arc<dyn LedgerQuery>, settings: FetchConfig) -> Self {
        Self { ledger, settings }
    }

    /// Assemble the snapshot of `pool_address` at `state_version`, or at the
    /// current ledger tip when none is given.
    ///
    /// Every read of the snapshot is pinned to the same state version.
    pub async fn assemble(
        &self,
        pool_address: &str,
        state_version: Option<u64>,
    ) -> RedemptionResult<PoolSnapshot> {
        let pinned = self.resolve_state_version(state_version).await?;
        let at = Some(pinned);

        let state = self.fetch_component_state(pool_address, at).await?;
        let fields = PoolFields::extract(pool_address, &state)?;

        let keys = self.list_all_keys(&fields.bin_map_address, at).await?;
        let entries = self
            .fetch_values(&fields.bin_map_address, &keys, at)
            .await?;
        let bin_map = decode_bins(&entries)?;

        info!(
            "Assembled snapshot of {} at {}: {} bins, current tick {:?}",
            pool_address,
            pinned,
            bin_map.len(),
            fields.current_tick
        );

        Ok(PoolSnapshot {
            pool_address: pool_address.to_string(),
            state_version: pinned,
            bin_map_address: fields.bin_map_address,
            bin_map,
            current_tick: fields.current_tick,
            active_reserve_x: fields.active_reserve_x,
            active_reserve_y: fields.active_reserve_y,
            active_total_claim: fields.active_total_claim,
            bin_width: fields.bin_width,
            receipt_manager_id: fields.receipt_manager_id,
        })
    }

    /// State version to pin reads to. A requested version beyond the tip
    /// fails, since the ledger answers such reads with empty state.
    async fn resolve_state_version(&self, requested: Option<u64>) -> RedemptionResult<u64> {
        let current = timed(
            self.settings.call_timeout(),
            self.ledger.current_state_version(),
        )
        .await
        .map_err(|e| classify_store_error(e, None))?;

        match requested {
            Some(requested) if requested > current => {
                Err(DataError::StateVersionTooHigh { requested, current }.into())
            }
            Some(requested) => Ok(requested),
            None => Ok(current),
        }
    }

    async fn fetch_component_state(
        &self,
        pool_address: &str,
        state_version: Option<u64>,
    ) -> RedemptionResult<FieldNode> {
        debug!("Fetching component details for {}", pool_address);

        let details = timed(
            self.settings.call_timeout(),
            self.ledger.entity_details(pool_address, state_version),
        )
        .await
        .map_err(|e| classify_component_error(e, pool_address, state_version))?
        .ok_or_else(|| ComponentError::NotFound {
            address: pool_address.to_string(),
        })?;

        if !details.is_component() {
            return Err(ComponentError::WrongEntityType {
                address: pool_address.to_string(),
                found: details.entity_type,
            }
            .into());
        }

        match details.state {
            Some(state) if !state.children().is_empty() => Ok(state),
            _ => Err(ComponentError::InvalidState {
                address: pool_address.to_string(),
            }
            .into()),
        }
    }

    /// Page through every key of the store. Pages are strictly sequential.
    async fn list_all_keys(
        &self,
        store_address: &str,
        state_version: Option<u64>,
    ) -> RedemptionResult<Vec<StoreKey>> {
        let mut keys = Vec::new();
        let mut seen_keys = HashSet::new();
        let mut seen_cursors = HashSet::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = timed(
                self.settings.call_timeout(),
                self.ledger.list_store_keys(
                    store_address,
                    state_version,
                    cursor.as_deref(),
                    self.settings.page_size,
                ),
            )
            .await
            .map_err(|e| classify_store_error(e, state_version))?;
            pages += 1;

            for key in page.items {
                if seen_keys.insert(key.raw_hex.clone()) {
                    keys.push(key);
                }
            }

            match page.next_cursor {
                Some(next) => {
                    if !seen_cursors.insert(next.clone()) {
                        return Err(RedemptionError::malformed(format!(
                            "key listing of {} repeated cursor {}",
                            store_address, next
                        )));
                    }
                    cursor = Some(next);
                }
                None => break,
            }
        }

        debug!(
            "Listed {} keys of {} in {} pages",
            keys.len(),
            store_address,
            pages
        );
        Ok(keys)
    }

    /// Fetch values in concurrent chunks; one failed chunk fails them all
    async fn fetch_values(
        &self,
        store_address: &str,
        keys: &[StoreKey],
        state_version: Option<u64>,
    ) -> RedemptionResult<Vec<StoreEntry>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        debug!(
            "Fetching {} bin values of {} in {} chunks",
            keys.len(),
            store_address,
            chunk_count(keys.len(), self.settings.chunk_size)
        );

        let requests = keys.chunks(self.settings.chunk_size.max(1)).map(|chunk| {
            timed(
                self.settings.call_timeout(),
                self.ledger.store_values(store_address, chunk, state_version),
            )
        });

        let chunks = try_join_all(requests)
            .await
            .map_err(|e| classify_store_error(e, state_version))?;

        Ok(chunks.into_iter().flatten().collect())
    }
}

impl PoolFields {
    fn extract(address: &str, state: &FieldNode) -> RedemptionResult<Self> {
        let bin_width: u32 = required(state, address, BIN_SPAN_FIELD)?.parse_int()?;
        if bin_width == 0 {
            return Err(RedemptionError::malformed(format!(
                "{} of {} is zero",
                BIN_SPAN_FIELD, address
            )));
        }

        let active_total_claim =
            required(state, address, ACTIVE_TOTAL_CLAIM_FIELD)?.parse_decimal()?;
        if active_total_claim.is_negative() {
            return Err(RedemptionError::malformed(format!(
                "{} of {} is negative",
                ACTIVE_TOTAL_CLAIM_FIELD, address
            )));
        }

        let current_tick = state
            .field(TICK_INDEX_FIELD)
            .and_then(|index| index.variant_field(CURRENT_TICK_FIELD))
            .map(|tick| {
                tick.innermost_value()
                    .ok_or_else(|| RedemptionError::malformed("current tick has no value"))
                    .and_then(parse_int::<i32>)
            })
            .transpose()?;

        Ok(Self {
            bin_map_address: required_value(state, address, BIN_MAP_FIELD)?,
            receipt_manager_id: required_value(state, address, RECEIPT_MANAGER_FIELD)?,
            active_reserve_x: required(state, address, ACTIVE_X_FIELD)?.parse_decimal()?,
            active_reserve_y: required(state, address, ACTIVE_Y_FIELD)?.parse_decimal()?,
            active_total_claim,
            bin_width,
            current_tick,
        })
    }
}

fn missing_field(address: &str, name: &str) -> RedemptionError {
    ComponentError::MissingField {
        address: address.to_string(),
        field: name.to_string(),
    }
    .into()
}

fn required<'a>(state: &'a FieldNode, address: &str, name: &str) -> RedemptionResult<&'a FieldNode> {
    state.field(name).ok_or_else(|| missing_field(address, name))
}

fn required_value(state: &FieldNode, address: &str, name: &str) -> RedemptionResult<String> {
    required(state, address, name)?
        .value()
        .map(str::to_string)
        .ok_or_else(|| missing_field(address, name))
}

/// Decode bin-map entries; any undecodable entry fails the whole map
fn decode_bins(entries: &[StoreEntry]) -> RedemptionResult<BTreeMap<i32, Bin>> {
    let mut bin_map = BTreeMap::new();

    for entry in entries {
        let tick: i32 = entry
            .key
            .innermost_value()
            .ok_or_else(|| RedemptionError::malformed("bin key has no tick value"))
            .and_then(parse_int::<i32>)?;

        let decimal_field = |name: &str| -> RedemptionResult<BigDecimal> {
            let value = entry
                .value
                .field(name)
                .ok_or_else(|| {
                    RedemptionError::malformed(format!("bin {} is missing `{}`", tick, name))
                })?
                .parse_decimal()?;
            if value.is_negative() {
                return Err(RedemptionError::malformed(format!(
                    "bin {} has negative `{}`",
                    tick, name
                )));
            }
            Ok(value)
        };

        let bin = Bin {
            reserve: decimal_field(BIN_AMOUNT_FIELD)?,
            total_claim: decimal_field(BIN_TOTAL_CLAIM_FIELD)?,
        };
        if bin_map.insert(tick, bin).is_some() {
            return Err(RedemptionError::malformed(format!(
                "bin map holds tick {} more than once",
                tick
            )));
        }
    }

    Ok(bin_map)
}
