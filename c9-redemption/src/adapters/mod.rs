//! Adapters layer - infrastructure implementations
//!
//! Implementations of the ports defined in the core layer. Currently the
//! only one is the HTTP client for the Radix Gateway API.

pub mod gateway;

pub use gateway::{decode_programmatic_json, GatewayClient};
