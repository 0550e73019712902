//! Batch redemption
//!
//! One snapshot is shared by every receipt of a batch. Receipts are fetched
//! in chunks, each chunk concurrently, with a fixed pause between chunks to
//! stay under the gateway's rate limit. A failing receipt is logged and
//! dropped; only errors that invalidate the whole request abort the batch.

use futures::future::join_all;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::assembler::SnapshotAssembler;
use super::calculator::calculate;
use super::fetch::{chunk_count, timed};
use super::receipt::decode_claims;
use super::validation::{validate_component_address, validate_receipt_ids};
use crate::config::FetchConfig;
use crate::core::error::classify_receipt_error;
use crate::core::{
    Claim, LedgerQuery, NftError, PoolSnapshot, RedemptionAmounts, RedemptionResult,
};

/// Receipt id -> redeemable amounts
pub type RedemptionMap = BTreeMap<String, RedemptionAmounts>;

pub struct BatchOrchestrator {
    ledger: Arc<dyn LedgerQuery>,
    assembler: SnapshotAssembler,
    settings: FetchConfig,
}

impl BatchOrchestrator {
    pub fn new(ledger: Arc<dyn LedgerQuery>, settings: FetchConfig) -> Self {
        Self {
            assembler: SnapshotAssembler::new(ledger.clone(), settings.clone()),
            ledger,
            settings,
        }
    }

    pub fn assembler(&self) -> &SnapshotAssembler {
        &self.assembler
    }

    /// Redeem many receipts of one pool against a single snapshot.
    ///
    /// Inputs are validated before any ledger call.
    pub async fn calculate_many(
        &self,
        pool_address: &str,
        receipt_ids: &[String],
        state_version: Option<u64>,
    ) -> RedemptionResult<RedemptionMap> {
        validate_component_address(pool_address)?;
        validate_receipt_ids(receipt_ids)?;

        let snapshot = self.assembler.assemble(pool_address, state_version).await?;
        self.calculate_with_snapshot(&snapshot, receipt_ids).await
    }

    /// Redeem receipts against an already assembled snapshot
    pub async fn calculate_with_snapshot(
        &self,
        snapshot: &PoolSnapshot,
        receipt_ids: &[String],
    ) -> RedemptionResult<RedemptionMap> {
        if snapshot.current_tick.is_none() {
            warn!(
                "Pool {} has no active tick, no receipt is redeemable",
                snapshot.pool_address
            );
            return Ok(RedemptionMap::new());
        }

        let mut seen = HashSet::new();
        let ids: Vec<&String> = receipt_ids.iter().filter(|id| seen.insert(*id)).collect();

        let chunk_size = self.settings.chunk_size.max(1);
        let total_chunks = chunk_count(ids.len(), chunk_size);
        let mut results = RedemptionMap::new();
        let mut failed = 0usize;

        for (index, chunk) in ids.chunks(chunk_size).enumerate() {
            if index > 0 && !self.settings.chunk_delay().is_zero() {
                tokio::time::sleep(self.settings.chunk_delay()).await;
            }
            debug!(
                "Redeeming receipt chunk {}/{} ({} receipts)",
                index + 1,
                total_chunks,
                chunk.len()
            );

            let outcomes = join_all(chunk.iter().map(|id| self.calculate_one(snapshot, id))).await;

            // Single writer: merge only after the whole chunk resolved
            for (id, outcome) in chunk.iter().zip(outcomes) {
                match outcome {
                    Ok(amounts) => {
                        results.insert((*id).clone(), amounts);
                    }
                    Err(err) if err.aborts_batch() => return Err(err),
                    Err(err) => {
                        warn!("Dropping receipt {} from batch: {}", id, err);
                        failed += 1;
                    }
                }
            }
        }

        info!(
            "Redeemed {} of {} receipts of {} ({} failed)",
            results.len(),
            ids.len(),
            snapshot.pool_address,
            failed
        );
        Ok(results)
    }

    /// Fetch one receipt and redeem it against `snapshot`
    pub async fn calculate_one(
        &self,
        snapshot: &PoolSnapshot,
        receipt_id: &str,
    ) -> RedemptionResult<RedemptionAmounts> {
        let claims = self.fetch_claims(snapshot, receipt_id).await?;
        calculate(snapshot, &claims)
    }

    async fn fetch_claims(
        &self,
        snapshot: &PoolSnapshot,
        receipt_id: &str,
    ) -> RedemptionResult<Vec<Claim>> {
        let ids = [receipt_id.to_string()];
        let items = timed(
            self.settings.call_timeout(),
            self.ledger.non_fungible_data(
                &snapshot.receipt_manager_id,
                &ids,
                Some(snapshot.state_version),
            ),
        )
        .await
        .map_err(|e| classify_receipt_error(e, receipt_id, Some(snapshot.state_version)))?;

        let item = items
            .into_iter()
            .find(|item| item.id == receipt_id)
            .ok_or_else(|| NftError::NotFound {
                id: receipt_id.to_string(),
            })?;

        if item.is_burned {
            return Err(NftError::Burned {
                id: receipt_id.to_string(),
            }
            .into());
        }

        let data = item.data.ok_or_else(|| NftError::NotFound {
            id: receipt_id.to_string(),
        })?;

        decode_claims(receipt_id, &data)
    }
}
