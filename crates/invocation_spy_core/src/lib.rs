//! Shared invocation spy domain primitives.
//!
//! This crate owns the tracked artifact format, storage key derivation and the
//! error taxonomy. It intentionally excludes AWS SDK, Lambda runtime and async
//! runtime concerns so the artifact layout can be reused by any backend.

pub mod contract;
pub mod storage_keys;
