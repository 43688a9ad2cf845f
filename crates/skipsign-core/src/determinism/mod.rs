//! Determinism helpers: canonical JSON and hashing.

pub mod canonical_json;
pub mod hashing;
