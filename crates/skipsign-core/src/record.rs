//! Exclusion records.
//!
//! An `ExclusionRecord` is the ordered list of identities to skip plus, once
//! signed, the signature over its canonical bytes. Order is input order and
//! duplicates are kept as-is.

use crate::determinism::{canonical_json, hashing};
use crate::errors::{SkipSignError, SkipSignResult};
use crate::identity::Identity;
use crate::model::v1::SignedPayloadV1;
use crate::version::ArtifactVersion;

/// Stable identifier of the signature scheme.
pub const SIG_ALG_RSA_PSS_SHA256: &str = "rsa-pss-sha256";

/// Signature attached to a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSignature {
    pub alg: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionRecord {
    identities: Vec<Identity>,
    signature: Option<RecordSignature>,
}

/// Assemble identities into an unsigned record.
pub fn build(identities: Vec<Identity>) -> ExclusionRecord {
    ExclusionRecord {
        identities,
        signature: None,
    }
}

impl ExclusionRecord {
    pub fn identities(&self) -> &[Identity] {
        &self.identities
    }

    pub fn signature(&self) -> Option<&RecordSignature> {
        self.signature.as_ref()
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// Attach the signature. A record is signed exactly once.
    pub(crate) fn attach_signature(&mut self, sig: RecordSignature) -> SkipSignResult<()> {
        if self.signature.is_some() {
            return Err(SkipSignError::signing("record is already signed"));
        }
        self.signature = Some(sig);
        Ok(())
    }

    pub(crate) fn from_parts(identities: Vec<Identity>, signature: RecordSignature) -> Self {
        Self {
            identities,
            signature: Some(signature),
        }
    }

    /// The signed portion of the record in wire form.
    pub fn payload(&self) -> SignedPayloadV1 {
        SignedPayloadV1 {
            version: ArtifactVersion::V1.as_str().to_string(),
            skip_nodes: self.identities.iter().map(Identity::to_base64).collect(),
        }
    }

    /// Canonical bytes: the exact input to signing and verification.
    /// The signature field is never part of them.
    pub fn canonical_bytes(&self) -> SkipSignResult<Vec<u8>> {
        canonical_json::canonical_bytes_of(&self.payload())
    }

    /// Lowercase hex SHA-256 of the canonical bytes.
    pub fn fingerprint(&self) -> SkipSignResult<String> {
        Ok(hashing::hash_bytes_hex(&self.canonical_bytes()?))
    }
}
