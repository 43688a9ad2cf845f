use std::fmt;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use skipsign_core::config::PipelineConfig;
use skipsign_core::pipeline::{self, PipelineReport};

use crate::args::IdentityArgs;
use crate::io::{expand_path, FsIo};
use crate::output;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignOut {
    pub identities: usize,
    pub fingerprint: String,
    pub signature_alg: String,
    pub output: String,
    pub artifact_bytes: usize,
    pub warnings: Vec<String>,
}

impl From<PipelineReport> for SignOut {
    fn from(r: PipelineReport) -> Self {
        let warnings = r.warnings().map(|d| d.message.clone()).collect();
        Self {
            identities: r.identities,
            fingerprint: r.fingerprint,
            signature_alg: r.signature_alg,
            output: r.output_path.display().to_string(),
            artifact_bytes: r.artifact_bytes,
            warnings,
        }
    }
}

impl fmt::Display for SignOut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "signed {} node id(s) -> {} ({} bytes, sha256 {})",
            self.identities, self.output, self.artifact_bytes, self.fingerprint
        )
    }
}

pub fn run(
    json: bool,
    key_path: &str,
    input_csv_path: &str,
    output_path: &str,
    identity: &IdentityArgs,
) -> Result<ExitCode> {
    let cfg = PipelineConfig::new(
        expand_path(input_csv_path)
            .with_context(|| format!("failed to expand input CSV path {input_csv_path}"))?,
        expand_path(key_path)
            .with_context(|| format!("failed to expand signing key path {key_path}"))?,
        expand_path(output_path)
            .with_context(|| format!("failed to expand output path {output_path}"))?,
    )
    .with_identity(identity.to_config());

    // Under -v the log lines stand in for the spinner.
    let pb = if tracing::enabled!(tracing::Level::INFO) {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(80));

    let io = FsIo::with_progress(pb.clone());
    let result = pipeline::run(&cfg, &io);
    pb.finish_and_clear();

    let report = result?;
    output::print(json, &SignOut::from(report))?;
    Ok(ExitCode::SUCCESS)
}
