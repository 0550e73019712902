//! Public entry points
//!
//! Inputs are validated locally before any ledger call is made.

use std::sync::Arc;
use tracing::info;

use crate::config::FetchConfig;
use crate::core::{LedgerQuery, NftError, RedemptionAmounts, RedemptionResult};
use crate::domain::{BatchOrchestrator, RedemptionMap};

pub use crate::domain::validation::{
    validate_component_address, validate_receipt_id, validate_receipt_ids,
};

pub struct RedemptionService {
    orchestrator: BatchOrchestrator,
}

impl RedemptionService {
    pub fn new(ledger: Arc<dyn LedgerQuery>, settings: FetchConfig) -> Self {
        Self {
            orchestrator: BatchOrchestrator::new(ledger, settings),
        }
    }

    /// Redeemable amounts of one receipt
    pub async fn calculate_redemption_value(
        &self,
        component_address: &str,
        nft_id: &str,
        state_version: Option<u64>,
    ) -> RedemptionResult<RedemptionAmounts> {
        validate_component_address(component_address)?;
        validate_receipt_id(nft_id)?;

        let snapshot = self
            .orchestrator
            .assembler()
            .assemble(component_address, state_version)
            .await?;
        if snapshot.current_tick.is_none() {
            return Err(NftError::NoActiveTick.into());
        }

        let amounts = self.orchestrator.calculate_one(&snapshot, nft_id).await?;
        info!(
            "Receipt {} of {} redeems for x={} y={}",
            nft_id, component_address, amounts.token_x, amounts.token_y
        );
        Ok(amounts)
    }

    /// Redeemable amounts of many receipts; failed receipts are left out
    pub async fn calculate_redemption_values(
        &self,
        component_address: &str,
        nft_ids: &[String],
        state_version: Option<u64>,
    ) -> RedemptionResult<RedemptionMap> {
        self.orchestrator
            .calculate_many(component_address, nft_ids, state_version)
            .await
    }
}
