//! Version 1 of the signed skip-node artifact.
//!
//! ```json
//! {
//!   "version": "v1",
//!   "skipNodes": ["<base64 identity>", "..."],
//!   "signature": { "alg": "rsa-pss-sha256", "value": "<base64>" }
//! }
//! ```
//!
//! The signed payload is `SignedPayloadV1`: the artifact minus `signature`.

use serde::{Deserialize, Serialize};

/// The part of the artifact covered by the signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SignedPayloadV1 {
    pub version: String,
    pub skip_nodes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignatureV1 {
    pub alg: String,
    /// Standard base64 of the raw signature bytes.
    pub value: String,
}

/// The emitted artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ArtifactV1 {
    pub version: String,
    pub skip_nodes: Vec<String>,
    pub signature: SignatureV1,
}
