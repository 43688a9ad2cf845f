//! Artifact verification.
//!
//! Used by `skipsign verify` and by any consumer holding the public key.
//! Performs no I/O: the caller passes the artifact bytes and a loaded key.
//!
//! Parse failures are errors. A well-formed artifact whose signature does not
//! match still yields a report, with `ok == false`, so callers can print it.

use tracing::debug;

use crate::config::IdentityConfig;
use crate::emit::parse_artifact;
use crate::errors::{SkipSignError, SkipSignResult};
use crate::signer::{self, VerifyingKey};

/// Verification outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyReport {
    pub ok: bool,
    pub identities: usize,
    pub fingerprint: String,
    pub signature_alg: String,
    /// Why verification failed, if it did.
    pub detail: Option<String>,
}

/// Parse an artifact and check its signature.
pub fn verify_artifact(
    bytes: &[u8],
    key: &VerifyingKey,
    identity: IdentityConfig,
) -> SkipSignResult<VerifyReport> {
    let record = parse_artifact(bytes, identity)?;
    let fingerprint = record.fingerprint()?;
    let signature_alg = record
        .signature()
        .map(|s| s.alg.clone())
        .unwrap_or_default();

    let (ok, detail) = match signer::verify(&record, key) {
        Ok(()) => (true, None),
        Err(SkipSignError::Verification(msg)) => (false, Some(msg)),
        Err(e) => return Err(e),
    };
    debug!(ok, fingerprint = %fingerprint, "verified artifact");

    Ok(VerifyReport {
        ok,
        identities: record.identities().len(),
        fingerprint,
        signature_alg,
        detail,
    })
}
