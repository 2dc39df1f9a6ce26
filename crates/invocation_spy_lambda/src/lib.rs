//! AWS-oriented adapters and handlers for recording function invocations.
//!
//! This crate owns runtime integration details (object storage adapters, the
//! tracker, and the spy handler wrapper) and re-exports the artifact contract
//! and key primitives under a single runtime module boundary.

pub mod adapters;
pub mod handlers;

pub mod runtime {
    pub use invocation_spy_core::{contract, storage_keys};
}
