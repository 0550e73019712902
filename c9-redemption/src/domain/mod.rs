//! Domain logic: snapshot assembly, redemption math and batching

pub mod assembler;
pub mod calculator;
mod fetch;
pub mod orchestrator;
pub mod receipt;
pub mod validation;

pub use assembler::SnapshotAssembler;
pub use calculator::calculate;
pub use orchestrator::{BatchOrchestrator, RedemptionMap};
pub use receipt::decode_claims;
