//! Redemption math
//!
//! Bins below the active tick hold only token Y, bins above it only token X.
//! The active bin is split using the pool-level active reserves and active
//! total claim, not the per-bin totals.

use bigdecimal::{BigDecimal, Zero};
use std::cmp::Ordering;

use crate::core::{Bin, Claim, NftError, PoolSnapshot, RedemptionAmounts, RedemptionResult};

/// Token amounts `claims` redeem for against `snapshot`
pub fn calculate(snapshot: &PoolSnapshot, claims: &[Claim]) -> RedemptionResult<RedemptionAmounts> {
    let current_tick = snapshot.current_tick.ok_or(NftError::NoActiveTick)?;

    let mut token_x = BigDecimal::zero();
    let mut token_y = BigDecimal::zero();

    for claim in claims {
        match claim.tick.cmp(&current_tick) {
            Ordering::Less => {
                if let Some(amount) = bin_amount(snapshot.bin_map.get(&claim.tick), claim) {
                    token_y += amount;
                }
            }
            Ordering::Greater => {
                if let Some(amount) = bin_amount(snapshot.bin_map.get(&claim.tick), claim) {
                    token_x += amount;
                }
            }
            Ordering::Equal => {
                if snapshot.active_total_claim.is_zero() {
                    continue;
                }
                token_x += proportional(
                    &snapshot.active_reserve_x,
                    &claim.claim_amount,
                    &snapshot.active_total_claim,
                );
                token_y += proportional(
                    &snapshot.active_reserve_y,
                    &claim.claim_amount,
                    &snapshot.active_total_claim,
                );
            }
        }
    }

    Ok(RedemptionAmounts::from_decimals(&token_x, &token_y))
}

/// A claim's portion of an inactive bin. Missing and empty bins yield nothing.
fn bin_amount(bin: Option<&Bin>, claim: &Claim) -> Option<BigDecimal> {
    let bin = bin?;
    if bin.total_claim.is_zero() {
        return None;
    }
    Some(proportional(&bin.reserve, &claim.claim_amount, &bin.total_claim))
}

/// `reserve * (claim / total)`, multiplied first so terminating results stay exact
fn proportional(reserve: &BigDecimal, claim: &BigDecimal, total: &BigDecimal) -> BigDecimal {
    (reserve * claim) / total
}
