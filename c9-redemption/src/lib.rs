//! C9 Redemption Calculator
//!
//! Reconstructs, from Radix ledger state, the token amounts a holder of a C9
//! concentrated-liquidity receipt can redeem. A pool's bin map is read once
//! per request via paginated key listing and chunked value fetches, then each
//! receipt's per-tick claims are priced against it with exact decimal math.

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod service;

// Re-export commonly used types
pub use crate::adapters::GatewayClient;
pub use crate::config::{FetchConfig, GatewayConfig, RedemptionConfig};
pub use crate::core::{
    LedgerQuery, PoolSnapshot, RedemptionAmounts, RedemptionError, RedemptionResult,
};
pub use crate::domain::RedemptionMap;
pub use crate::service::RedemptionService;
