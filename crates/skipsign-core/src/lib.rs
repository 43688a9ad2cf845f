//! skipsign-core
//!
//! Core primitives for skipsign:
//! - Node identity codec (base64 <-> fixed-length identity)
//! - Exclusion records and their canonical JSON bytes
//! - RSA-PSS signing and verification
//! - Artifact emission and parsing (v1)
//! - The decode -> build -> sign -> emit pipeline
//!
//! The crate performs no filesystem or network I/O. Callers implement
//! `pipeline::Collaborators` to supply bytes and receive the artifact.

pub mod config;
pub mod determinism;
pub mod emit;
pub mod errors;
pub mod identity;
pub mod model;
pub mod pipeline;
pub mod record;
pub mod signer;
pub mod version;

pub use crate::errors::{SkipSignError, SkipSignResult, Stage};

/// Convenience re-exports.
pub mod prelude {
    pub use crate::config::{IdentityConfig, PipelineConfig, TagPolicy, ID_LEN};
    pub use crate::emit::{emit, parse_artifact};
    pub use crate::identity::{IdType, Identity, IdentityCodec};
    pub use crate::pipeline::verify::{verify_artifact, VerifyReport};
    pub use crate::pipeline::{run, Collaborators, PipelineReport, PipelineState};
    pub use crate::record::{build, ExclusionRecord, RecordSignature};
    pub use crate::signer::{sign, verify, SigningKey, VerifyingKey};
    pub use crate::{SkipSignError, SkipSignResult, Stage};
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    pub const SIGNING_PKCS8: &str = include_str!("../../../tests/fixtures/keys/signing_pkcs8.pem");
    pub const SIGNING_PKCS1: &str = include_str!("../../../tests/fixtures/keys/signing_pkcs1.pem");
    pub const SIGNING_PUBLIC: &str =
        include_str!("../../../tests/fixtures/keys/signing_public.pem");
    pub const SIGNING_SPKI: &str = include_str!("../../../tests/fixtures/keys/signing_spki.pem");
    pub const OTHER_PUBLIC: &str = include_str!("../../../tests/fixtures/keys/other_public.pem");
    pub const NOT_A_KEY: &str = include_str!("../../../tests/fixtures/keys/not_a_key.pem");

    pub const NODE_A: &str = "fGzEHmv3Lnp817dS1wsS55ISz/ww4YqLHD8LUdtFmVAC";
    pub const NODE_B: &str = "NZcb5um7AkqJVYL+DkLgSEiobaVQqu8PzL+6hvmfYX0C";
    pub const GATEWAY: &str = "F3n1n03yUfa4GusI+1Kl2ErU7vgzx/3wvFds0aqxHSQB";
}
