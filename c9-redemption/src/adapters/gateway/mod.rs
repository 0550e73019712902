//! Radix Babylon Gateway adapter

pub mod client;
pub mod decode;
pub mod wire;

pub use client::GatewayClient;
pub use decode::decode_programmatic_json;
