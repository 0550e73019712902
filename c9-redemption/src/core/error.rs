//! Centralized error types for the redemption calculator
//!
//! Two layers: [`LedgerError`] is what a ledger collaborator reports about a
//! single remote call, [`RedemptionError`] is what callers of the public
//! surface see. The classifier functions at the bottom translate the former
//! into the latter given what the failed call was reading.

use std::time::Duration;
use thiserror::Error;

/// Errors reported by a [`crate::core::LedgerQuery`] implementation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Request rejected by ledger: {0}")]
    InvalidRequest(String),

    #[error("State version out of range: {0}")]
    StateVersionOutOfRange(String),

    #[error("Malformed ledger response: {0}")]
    Malformed(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Result type alias for collaborator calls
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Main error type of the public surface
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RedemptionError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Component error: {0}")]
    Component(#[from] ComponentError),

    #[error("NFT error: {0}")]
    Nft(#[from] NftError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Malformed data: {0}")]
    MalformedData(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

/// The pool address does not point at a usable C9 component
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComponentError {
    #[error("Component not found: {address}")]
    NotFound { address: String },

    #[error("Entity {address} is a {found}, not a component")]
    WrongEntityType { address: String, found: String },

    #[error("Component {address} has no readable state")]
    InvalidState { address: String },

    #[error("Component {address} is missing field `{field}`")]
    MissingField { address: String, field: String },

    #[error("Component {address} rejected by ledger: {reason}")]
    Rejected { address: String, reason: String },
}

/// A receipt cannot be redeemed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NftError {
    #[error("Receipt not found: {id}")]
    NotFound { id: String },

    #[error("Receipt {id} has been burned")]
    Burned { id: String },

    #[error("Receipt {id} is malformed: {reason}")]
    Malformed { id: String, reason: String },

    #[error("Pool has no active tick")]
    NoActiveTick,
}

/// The requested ledger state cannot be served
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    #[error("State version {requested} is beyond the current ledger state {current}")]
    StateVersionTooHigh { requested: u64, current: u64 },

    #[error("State version {requested} is not available: {reason}")]
    StateVersionUnavailable { requested: u64, reason: String },
}

/// Result type alias for public operations
pub type RedemptionResult<T> = Result<T, RedemptionError>;

impl RedemptionError {
    pub fn validation(message: impl Into<String>) -> Self {
        RedemptionError::Validation(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        RedemptionError::MalformedData(message.into())
    }

    /// Errors that invalidate every result in a batch, not just one receipt
    pub fn aborts_batch(&self) -> bool {
        matches!(
            self,
            RedemptionError::Validation(_)
                | RedemptionError::Component(_)
                | RedemptionError::Data(_)
        )
    }
}

fn unavailable_state(reason: String, state_version: Option<u64>) -> RedemptionError {
    match state_version {
        Some(requested) => DataError::StateVersionUnavailable { requested, reason }.into(),
        None => RedemptionError::Transport(reason),
    }
}

fn transport(err: LedgerError) -> RedemptionError {
    RedemptionError::Transport(err.to_string())
}

/// Classify a failure while reading the pool component itself
pub fn classify_component_error(
    err: LedgerError,
    address: &str,
    state_version: Option<u64>,
) -> RedemptionError {
    match err {
        LedgerError::NotFound(_) => ComponentError::NotFound {
            address: address.to_string(),
        }
        .into(),
        LedgerError::InvalidRequest(reason) => ComponentError::Rejected {
            address: address.to_string(),
            reason,
        }
        .into(),
        LedgerError::StateVersionOutOfRange(reason) => unavailable_state(reason, state_version),
        LedgerError::Malformed(reason) => RedemptionError::MalformedData(reason),
        err @ (LedgerError::Timeout(_) | LedgerError::Transport(_)) => transport(err),
    }
}

/// Classify a failure while reading the bin-map key-value store
pub fn classify_store_error(err: LedgerError, state_version: Option<u64>) -> RedemptionError {
    match err {
        LedgerError::StateVersionOutOfRange(reason) => unavailable_state(reason, state_version),
        LedgerError::Malformed(reason) => RedemptionError::MalformedData(reason),
        err => transport(err),
    }
}

/// Classify a failure while reading one receipt's non-fungible data
pub fn classify_receipt_error(
    err: LedgerError,
    id: &str,
    state_version: Option<u64>,
) -> RedemptionError {
    match err {
        LedgerError::NotFound(_) => NftError::NotFound { id: id.to_string() }.into(),
        LedgerError::InvalidRequest(reason) | LedgerError::Malformed(reason) => {
            NftError::Malformed {
                id: id.to_string(),
                reason,
            }
            .into()
        }
        LedgerError::StateVersionOutOfRange(reason) => unavailable_state(reason, state_version),
        err @ (LedgerError::Timeout(_) | LedgerError::Transport(_)) => transport(err),
    }
}
