//! skipsign wire models.
//!
//! Each wire format is isolated under a `vN` module so that later formats can
//! be added without breaking readers of existing artifacts.
//!
//! Notes on serde:
//! - These structs define field names and nesting only.
//! - The bytes that get signed come from `crate::determinism::canonical_json`,
//!   never from default `serde_json` formatting.

pub mod v1;

pub use v1::{ArtifactV1, SignatureV1, SignedPayloadV1};
