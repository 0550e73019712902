//! Liquidity receipt decoding

use bigdecimal::Signed;

use crate::core::field_tree::{parse_decimal, parse_int};
use crate::core::{Claim, FieldNode, NftError, RedemptionError, RedemptionResult};

const LIQUIDITY_CLAIMS_FIELD: &str = "liquidity_claims";

/// Read the `liquidity_claims` map (tick -> claim amount) of a receipt
pub fn decode_claims(id: &str, data: &FieldNode) -> RedemptionResult<Vec<Claim>> {
    let malformed = |reason: String| -> RedemptionError {
        NftError::Malformed {
            id: id.to_string(),
            reason,
        }
        .into()
    };

    let entries = data
        .field(LIQUIDITY_CLAIMS_FIELD)
        .and_then(FieldNode::entries)
        .ok_or_else(|| malformed(format!("no `{}` map", LIQUIDITY_CLAIMS_FIELD)))?;

    entries
        .iter()
        .map(|(key, value)| {
            let tick = key
                .innermost_value()
                .ok_or_else(|| malformed("claim key has no tick".to_string()))
                .and_then(|raw| parse_int::<i32>(raw).map_err(|e| malformed(e.to_string())))?;
            let claim_amount = value
                .innermost_value()
                .ok_or_else(|| malformed(format!("claim on tick {} has no amount", tick)))
                .and_then(|raw| parse_decimal(raw).map_err(|e| malformed(e.to_string())))?;
            if claim_amount.is_negative() {
                return Err(malformed(format!("negative claim on tick {}", tick)));
            }
            Ok(Claim::new(tick, claim_amount))
        })
        .collect()
}
