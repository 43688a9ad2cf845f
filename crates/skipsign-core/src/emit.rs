//! Artifact emission and parsing.
//!
//! The artifact is pretty-printed `ArtifactV1` JSON followed by a newline. It
//! is meant for humans to inspect; verifiers parse it back with
//! `parse_artifact` and re-derive the canonical bytes from the parsed record.

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;

use crate::config::IdentityConfig;
use crate::errors::{SkipSignError, SkipSignResult};
use crate::identity::IdentityCodec;
use crate::model::v1::{ArtifactV1, SignatureV1};
use crate::record::{ExclusionRecord, RecordSignature, SIG_ALG_RSA_PSS_SHA256};
use crate::version::ArtifactVersion;

/// Default maximum artifact size accepted by `parse_artifact` (64 MiB).
pub const DEFAULT_MAX_ARTIFACT_BYTES: usize = 64 * 1024 * 1024;

/// Serialize a signed record into artifact bytes.
pub fn emit(record: &ExclusionRecord) -> SkipSignResult<Vec<u8>> {
    let sig = record
        .signature()
        .ok_or_else(|| SkipSignError::serialization("refusing to emit an unsigned record"))?;

    let payload = record.payload();
    let artifact = ArtifactV1 {
        version: payload.version,
        skip_nodes: payload.skip_nodes,
        signature: SignatureV1 {
            alg: sig.alg.clone(),
            value: B64.encode(&sig.bytes),
        },
    };

    let mut out = serde_json::to_vec_pretty(&artifact)
        .map_err(|e| SkipSignError::serialization(format!("failed to encode artifact: {e}")))?;
    out.push(b'\n');
    Ok(out)
}

/// Parse artifact bytes back into a signed record.
///
/// Identities go through the same codec as input rows, so an artifact only
/// parses if every entry is a valid identity for `identity`.
pub fn parse_artifact(bytes: &[u8], identity: IdentityConfig) -> SkipSignResult<ExclusionRecord> {
    if bytes.len() > DEFAULT_MAX_ARTIFACT_BYTES {
        return Err(SkipSignError::serialization(format!(
            "artifact too large ({} bytes > limit {})",
            bytes.len(),
            DEFAULT_MAX_ARTIFACT_BYTES
        )));
    }

    let artifact: ArtifactV1 = serde_json::from_slice(bytes)
        .map_err(|e| SkipSignError::serialization(format!("failed to parse artifact: {e}")))?;

    ArtifactVersion::parse(&artifact.version)?;

    if artifact.signature.alg != SIG_ALG_RSA_PSS_SHA256 {
        return Err(SkipSignError::serialization(format!(
            "unsupported signature algorithm: {}",
            artifact.signature.alg
        )));
    }
    let sig_bytes = B64.decode(&artifact.signature.value).map_err(|e| {
        SkipSignError::serialization(format!("signature value is not valid base64: {e}"))
    })?;

    let codec = IdentityCodec::new(identity)?;
    let identities = artifact
        .skip_nodes
        .iter()
        .enumerate()
        .map(|(i, token)| codec.decode(token).map_err(|e| e.at_row(i + 1)))
        .collect::<SkipSignResult<Vec<_>>>()?;

    Ok(ExclusionRecord::from_parts(
        identities,
        RecordSignature {
            alg: artifact.signature.alg,
            bytes: sig_bytes,
        },
    ))
}
