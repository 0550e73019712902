//! Core domain abstractions and types
//!
//! Foundational types, the ledger port and the error taxonomy. Nothing in
//! here performs I/O.

pub mod error;
pub mod field_tree;
pub mod traits;
pub mod types;

// Re-export commonly used items
pub use error::{
    ComponentError, DataError, LedgerError, LedgerResult, NftError, RedemptionError,
    RedemptionResult,
};
pub use field_tree::{FieldNode, NodeBody};
pub use traits::LedgerQuery;
pub use types::{
    format_decimal, Bin, Claim, EntityDetails, KeyPage, NonFungibleItem, PoolSnapshot,
    RedemptionAmounts, StoreEntry, StoreKey,
};
