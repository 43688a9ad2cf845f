use std::fmt;
use std::process::ExitCode;

use anyhow::{Context, Result};
use serde::Serialize;
use skipsign_core::pipeline::verify::{verify_artifact, VerifyReport};
use skipsign_core::pipeline::Collaborators;
use skipsign_core::signer::VerifyingKey;

use crate::args::IdentityArgs;
use crate::io::{expand_path, FsIo};
use crate::output;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOut {
    pub ok: bool,
    pub artifact: String,
    pub identities: usize,
    pub fingerprint: String,
    pub signature_alg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl VerifyOut {
    fn new(artifact: String, r: VerifyReport) -> Self {
        Self {
            ok: r.ok,
            artifact,
            identities: r.identities,
            fingerprint: r.fingerprint,
            signature_alg: r.signature_alg,
            detail: r.detail,
        }
    }
}

impl fmt::Display for VerifyOut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ok {
            write!(
                f,
                "ok: {} node id(s) in {} (sha256 {})",
                self.identities, self.artifact, self.fingerprint
            )
        } else {
            write!(
                f,
                "FAILED: {}: {}",
                self.artifact,
                self.detail.as_deref().unwrap_or("signature check failed")
            )
        }
    }
}

pub fn run(json: bool, artifact: &str, key: &str, identity: &IdentityArgs) -> Result<ExitCode> {
    let artifact_path = expand_path(artifact)
        .with_context(|| format!("failed to expand artifact path {artifact}"))?;
    let key_path = expand_path(key).with_context(|| format!("failed to expand key path {key}"))?;

    let io = FsIo::default();
    let key = VerifyingKey::from_pem(&io.read_bytes(&key_path)?)
        .with_context(|| format!("failed to load key from {}", key_path.display()))?;
    let bytes = io.read_bytes(&artifact_path)?;
    let report = verify_artifact(&bytes, &key, identity.to_config())
        .with_context(|| format!("failed to read signed list {}", artifact_path.display()))?;

    let out = VerifyOut::new(artifact_path.display().to_string(), report);
    output::print(json, &out)?;
    Ok(if out.ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
