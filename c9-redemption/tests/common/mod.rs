//! In-memory ledger shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use c9_redemption::config::FetchConfig;
use c9_redemption::core::{
    EntityDetails, FieldNode, KeyPage, LedgerError, LedgerQuery, LedgerResult, NonFungibleItem,
    StoreEntry, StoreKey,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub const POOL: &str = "component_rdx1cpxz8j4q5ulccekt9ng9u2aaxszw0am9dhs8aqdmdv92jme0pc5kdy";
pub const UNKNOWN_POOL: &str =
    "component_rdx1cr5uxxjq4a0r3gfn6yd62lk96fqca34tnmyqdxkwefhckcjea4t3am";
pub const TOKEN_RESOURCE: &str =
    "resource_rdx1tknxxxxxxxxxradxrdxxxxxxxxx009923554798xxxxxxxxxradxrd";
pub const BIN_MAP: &str = "internal_keyvaluestore_rdx1krq7yqmu3ey3wkt9xqvv2m7jnkspz9hq3vdc";
pub const RECEIPT_RESOURCE: &str = "resource_rdx1ngs8l9cwkyud7p4dxm0rw2ppfajf25ngnmxh0x7u9xs3yqvlhqsepq";

/// Tip of the mock ledger
pub const LEDGER_TIP: u64 = 1_000;
/// Oldest state version the mock ledger still serves
pub const FIRST_STATE: u64 = 10;

#[derive(Default)]
pub struct CallCounters {
    pub state_version: AtomicUsize,
    pub entity_details: AtomicUsize,
    pub key_pages: AtomicUsize,
    pub value_chunks: AtomicUsize,
    pub receipts: AtomicUsize,
}

impl CallCounters {
    pub fn total(&self) -> usize {
        [
            &self.state_version,
            &self.entity_details,
            &self.key_pages,
            &self.value_chunks,
            &self.receipts,
        ]
        .iter()
        .map(|counter| counter.load(Ordering::SeqCst))
        .sum()
    }
}

/// One store keyed by raw hex, entities by address, receipts by id
#[derive(Default)]
pub struct MockLedger {
    pub entities: HashMap<String, EntityDetails>,
    pub bin_keys: Vec<StoreKey>,
    pub bin_values: HashMap<String, FieldNode>,
    pub receipts: HashMap<String, NonFungibleItem>,
    /// Receipt fetches that fail with the given error
    pub receipt_failures: HashMap<String, LedgerError>,
    /// Receipt fetches that never answer in time
    pub slow_receipts: HashSet<String>,
    /// Failure of the ledger tip query
    pub tip_failure: Option<LedgerError>,
    /// Value requests containing this key fail
    pub failing_value_key: Option<String>,
    /// Every page of the key listing points back at the first page
    pub looping_cursor: bool,
    /// Every page after the first repeats the first key of the store
    pub repeat_first_key: bool,
    pub calls: CallCounters,
    /// Keys asked for across all value requests
    pub requested_value_keys: AtomicUsize,
    /// State version passed to every state read, in call order
    pub seen_versions: Mutex<Vec<Option<u64>>>,
}

impl MockLedger {
    /// Pool at tick 0 with active reserves 1000 X / 2000 Y over 100 claim
    /// units, and two inactive bins: -50 (500 Y / 50) and 50 (300 X / 30)
    pub fn standard_pool() -> Self {
        let mut ledger = Self::default();
        ledger.add_pool(Some(0), "1000", "2000", "100");
        ledger.add_bin(-50, "500", "50");
        ledger.add_bin(50, "300", "30");
        ledger.entities.insert(
            TOKEN_RESOURCE.to_string(),
            EntityDetails {
                address: TOKEN_RESOURCE.to_string(),
                entity_type: "FungibleResource".to_string(),
                blueprint_name: None,
                state: None,
            },
        );
        ledger
    }

    pub fn add_pool(&mut self, current_tick: Option<i32>, active_x: &str, active_y: &str, active_total: &str) {
        self.entities.insert(
            POOL.to_string(),
            EntityDetails {
                address: POOL.to_string(),
                entity_type: "Component".to_string(),
                blueprint_name: Some("C9".to_string()),
                state: Some(pool_state(current_tick, active_x, active_y, active_total)),
            },
        );
    }

    pub fn add_bin(&mut self, tick: i32, amount: &str, total_claim: &str) {
        let raw_hex = format!("5c{:08x}", tick);
        self.bin_keys.push(StoreKey {
            raw_hex: raw_hex.clone(),
            decoded: FieldNode::tuple(vec![FieldNode::leaf("I32", tick.to_string())]),
        });
        self.bin_values.insert(
            raw_hex,
            FieldNode::tuple(vec![
                FieldNode::leaf("Decimal", amount).named("amount"),
                FieldNode::leaf("Decimal", total_claim).named("total_claim"),
            ]),
        );
    }

    pub fn add_receipt(&mut self, id: &str, claims: &[(i32, &str)]) {
        let data = FieldNode::tuple(vec![
            FieldNode::leaf("String", "C9 Liquidity Receipt").named("name"),
            FieldNode::map(
                claims
                    .iter()
                    .map(|(tick, claim)| {
                        (
                            FieldNode::leaf("I32", tick.to_string()),
                            FieldNode::leaf("Decimal", *claim),
                        )
                    })
                    .collect(),
            )
            .named("liquidity_claims"),
        ]);
        self.receipts.insert(
            id.to_string(),
            NonFungibleItem {
                id: id.to_string(),
                is_burned: false,
                data: Some(data),
            },
        );
    }

    pub fn add_raw_receipt(&mut self, item: NonFungibleItem) {
        self.receipts.insert(item.id.clone(), item);
    }

    /// Distinct state versions the state reads were made at
    pub fn versions_read(&self) -> Vec<Option<u64>> {
        let mut versions = self.seen_versions.lock().unwrap().clone();
        versions.dedup();
        versions
    }

    fn check_state(&self, state_version: Option<u64>) -> LedgerResult<()> {
        self.seen_versions.lock().unwrap().push(state_version);
        match state_version {
            Some(requested) if requested < FIRST_STATE => Err(LedgerError::StateVersionOutOfRange(
                format!("state version {} is before the first ledger state", requested),
            )),
            _ => Ok(()),
        }
    }
}

/// Component state laid out the way a C9 pool stores it
pub fn pool_state(current_tick: Option<i32>, active_x: &str, active_y: &str, active_total: &str) -> FieldNode {
    let current = match current_tick {
        Some(tick) => FieldNode::variant(
            "Some",
            vec![FieldNode::tuple(vec![FieldNode::leaf("I32", tick.to_string())])],
        ),
        None => FieldNode::variant("None", vec![]),
    };

    FieldNode::tuple(vec![
        FieldNode::leaf("Own", BIN_MAP).named("bin_map"),
        FieldNode::tuple(vec![current.named("current")]).named("tick_index"),
        FieldNode::leaf("Reference", RECEIPT_RESOURCE).named("liquidity_receipt_manager"),
        FieldNode::leaf("Decimal", active_x).named("active_x"),
        FieldNode::leaf("Decimal", active_y).named("active_y"),
        FieldNode::leaf("Decimal", active_total).named("active_total_claim"),
        FieldNode::leaf("U32", "50").named("bin_span"),
    ])
}

/// Fetch settings without the inter-chunk pause
pub fn fast_settings() -> FetchConfig {
    FetchConfig {
        chunk_delay_ms: 0,
        ..FetchConfig::default()
    }
}

#[async_trait]
impl LedgerQuery for MockLedger {
    async fn current_state_version(&self) -> LedgerResult<u64> {
        self.calls.state_version.fetch_add(1, Ordering::SeqCst);
        match &self.tip_failure {
            Some(err) => Err(err.clone()),
            None => Ok(LEDGER_TIP),
        }
    }

    async fn entity_details(
        &self,
        address: &str,
        state_version: Option<u64>,
    ) -> LedgerResult<Option<EntityDetails>> {
        self.calls.entity_details.fetch_add(1, Ordering::SeqCst);
        self.check_state(state_version)?;
        Ok(self.entities.get(address).cloned())
    }

    async fn list_store_keys(
        &self,
        store_address: &str,
        state_version: Option<u64>,
        cursor: Option<&str>,
        page_size: usize,
    ) -> LedgerResult<KeyPage> {
        self.calls.key_pages.fetch_add(1, Ordering::SeqCst);
        self.check_state(state_version)?;
        if store_address != BIN_MAP {
            return Err(LedgerError::NotFound(store_address.to_string()));
        }

        let start = match cursor {
            Some(cursor) => cursor
                .parse::<usize>()
                .map_err(|_| LedgerError::InvalidRequest(format!("bad cursor {}", cursor)))?,
            None => 0,
        };
        let end = (start + page_size).min(self.bin_keys.len());
        let next_cursor = if self.looping_cursor {
            Some("0".to_string())
        } else if end < self.bin_keys.len() {
            Some(end.to_string())
        } else {
            None
        };

        let mut items = self.bin_keys[start..end].to_vec();
        if self.repeat_first_key && start > 0 {
            items.extend(self.bin_keys.first().cloned());
        }

        Ok(KeyPage { items, next_cursor })
    }

    async fn store_values(
        &self,
        store_address: &str,
        keys: &[StoreKey],
        state_version: Option<u64>,
    ) -> LedgerResult<Vec<StoreEntry>> {
        self.calls.value_chunks.fetch_add(1, Ordering::SeqCst);
        self.requested_value_keys
            .fetch_add(keys.len(), Ordering::SeqCst);
        self.check_state(state_version)?;
        if store_address != BIN_MAP {
            return Err(LedgerError::NotFound(store_address.to_string()));
        }
        if let Some(failing) = &self.failing_value_key {
            if keys.iter().any(|key| &key.raw_hex == failing) {
                return Err(LedgerError::Transport("connection reset".to_string()));
            }
        }

        Ok(keys
            .iter()
            .filter_map(|key| {
                self.bin_values.get(&key.raw_hex).map(|value| StoreEntry {
                    key: key.decoded.clone(),
                    value: value.clone(),
                })
            })
            .collect())
    }

    async fn non_fungible_data(
        &self,
        resource_address: &str,
        ids: &[String],
        state_version: Option<u64>,
    ) -> LedgerResult<Vec<NonFungibleItem>> {
        self.calls.receipts.fetch_add(1, Ordering::SeqCst);
        self.check_state(state_version)?;
        if resource_address != RECEIPT_RESOURCE {
            return Err(LedgerError::NotFound(resource_address.to_string()));
        }
        if let Some(err) = ids.iter().find_map(|id| self.receipt_failures.get(id)) {
            return Err(err.clone());
        }
        if ids.iter().any(|id| self.slow_receipts.contains(id)) {
            tokio::time::sleep(Duration::from_secs(5)).await;
        }

        Ok(ids
            .iter()
            .filter_map(|id| self.receipts.get(id).cloned())
            .collect())
    }
}
