//! The signing pipeline.
//!
//! `Start -> Decoded -> Built -> Signed -> Emitted`, strictly linear. Any
//! failure moves the run to `Failed` and aborts it; there is no partial or
//! resumable state.
//!
//! The core crate does no filesystem I/O itself. The caller provides a
//! `Collaborators` implementation for reading and writing bytes and for
//! surfacing warnings. The output is written once, as the final step, so a
//! failed run never leaves an artifact behind.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::{validate_config, PipelineConfig};
use crate::emit;
use crate::errors::{SkipSignResult, Stage};
use crate::identity::{Identity, IdentityCodec};
use crate::record::{self, ExclusionRecord, SIG_ALG_RSA_PSS_SHA256};
use crate::signer::{self, SigningKey};

pub mod parse;
pub mod verify;

/// I/O and diagnostics boundary used by the pipeline.
pub trait Collaborators {
    fn read_bytes(&self, path: &Path) -> SkipSignResult<Vec<u8>>;

    fn write_bytes(&self, path: &Path, data: &[u8]) -> SkipSignResult<()>;

    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }

    /// Called as the run enters each stage.
    fn stage(&self, _stage: Stage) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Start,
    Decoded,
    Built,
    Signed,
    Emitted,
    Failed,
}

impl PipelineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Decoded => "decoded",
            Self::Built => "built",
            Self::Signed => "signed",
            Self::Emitted => "emitted",
            Self::Failed => "failed",
        }
    }
}

/// A structured diagnostic collected during a run.
#[derive(Debug, Clone)]
pub struct PipelineDiagnostic {
    pub level: DiagnosticLevel,
    pub code: String,
    pub message: String,
    pub data: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Info,
    Warning,
}

/// Per-run state: current stage and collected diagnostics.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    pub state: PipelineState,
    pub diagnostics: Vec<PipelineDiagnostic>,
}

impl Default for PipelineContext {
    fn default() -> Self {
        Self {
            state: PipelineState::Start,
            diagnostics: Vec::new(),
        }
    }
}

impl PipelineContext {
    pub fn push_info(&mut self, code: impl Into<String>, message: impl Into<String>) {
        self.diagnostics.push(PipelineDiagnostic {
            level: DiagnosticLevel::Info,
            code: code.into(),
            message: message.into(),
            data: BTreeMap::new(),
        });
    }

    pub fn push_warning(
        &mut self,
        code: impl Into<String>,
        message: impl Into<String>,
        data: BTreeMap<String, String>,
    ) {
        self.diagnostics.push(PipelineDiagnostic {
            level: DiagnosticLevel::Warning,
            code: code.into(),
            message: message.into(),
            data,
        });
    }

    fn advance(&mut self, next: PipelineState) {
        debug!(from = self.state.as_str(), to = next.as_str(), "pipeline state");
        self.state = next;
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub state: PipelineState,
    pub identities: usize,
    /// Hex SHA-256 of the signed canonical bytes.
    pub fingerprint: String,
    pub signature_alg: String,
    pub output_path: PathBuf,
    pub artifact_bytes: usize,
    pub diagnostics: Vec<PipelineDiagnostic>,
}

impl PipelineReport {
    pub fn warnings(&self) -> impl Iterator<Item = &PipelineDiagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.level == DiagnosticLevel::Warning)
    }
}

/// Run the whole pipeline: decode, build, sign, emit, write.
pub fn run<C>(cfg: &PipelineConfig, io: &C) -> SkipSignResult<PipelineReport>
where
    C: Collaborators + ?Sized,
{
    let mut ctx = PipelineContext::default();
    match run_stages(cfg, io, &mut ctx) {
        Ok(report) => Ok(report),
        Err(e) => {
            ctx.advance(PipelineState::Failed);
            debug!(stage = e.stage().as_str(), error = %e, "pipeline aborted");
            Err(e)
        }
    }
}

fn run_stages<C>(
    cfg: &PipelineConfig,
    io: &C,
    ctx: &mut PipelineContext,
) -> SkipSignResult<PipelineReport>
where
    C: Collaborators + ?Sized,
{
    validate_config(cfg)?;
    let codec = IdentityCodec::new(cfg.identity)?;

    io.stage(Stage::Read);
    let input = io.read_bytes(&cfg.input_path)?;
    io.stage(Stage::Decode);
    let identities = decode_input(&input, &codec, ctx, io)?;
    ctx.advance(PipelineState::Decoded);
    info!(count = identities.len(), input = %cfg.input_path.display(), "decoded identities");

    io.stage(Stage::Build);
    let record = record::build(identities);
    ctx.advance(PipelineState::Built);

    let record = sign_with_key_file(record, &cfg.key_path, io)?;
    ctx.advance(PipelineState::Signed);
    let fingerprint = record.fingerprint()?;
    info!(fingerprint = %fingerprint, "signed record");

    io.stage(Stage::Emit);
    let artifact = emit::emit(&record)?;
    io.stage(Stage::Write);
    io.write_bytes(&cfg.output_path, &artifact)?;
    ctx.advance(PipelineState::Emitted);
    ctx.push_info(
        "artifact.written",
        format!("wrote {} bytes to {}", artifact.len(), cfg.output_path.display()),
    );
    info!(output = %cfg.output_path.display(), bytes = artifact.len(), "artifact written");

    Ok(PipelineReport {
        state: ctx.state,
        identities: record.identities().len(),
        fingerprint,
        signature_alg: SIG_ALG_RSA_PSS_SHA256.to_string(),
        output_path: cfg.output_path.clone(),
        artifact_bytes: artifact.len(),
        diagnostics: ctx.diagnostics.clone(),
    })
}

/// Decode every row, failing on the first bad one.
pub fn decode_input<C>(
    input: &[u8],
    codec: &IdentityCodec,
    ctx: &mut PipelineContext,
    io: &C,
) -> SkipSignResult<Vec<Identity>>
where
    C: Collaborators + ?Sized,
{
    let rows = parse::parse_rows(input)?;
    let mut out = Vec::with_capacity(rows.len());
    for r in rows {
        if r.extra_fields > 0 {
            let msg = format!(
                "row {} contains {} value(s) after the id, ignoring them",
                r.row, r.extra_fields
            );
            io.warn(&msg);
            let mut data = BTreeMap::new();
            data.insert("row".to_string(), r.row.to_string());
            data.insert("extraFields".to_string(), r.extra_fields.to_string());
            ctx.push_warning("input.extra_fields", msg, data);
        }
        let id = codec.decode(&r.token).map_err(|e| e.at_row(r.row))?;
        debug!(
            row = r.row,
            kind = id.id_type().map_or("unknown", |t| t.as_str()),
            "decoded id"
        );
        out.push(id);
    }
    Ok(out)
}

// Key bytes and the parsed key are dropped when this returns.
fn sign_with_key_file<C>(
    record: ExclusionRecord,
    key_path: &Path,
    io: &C,
) -> SkipSignResult<ExclusionRecord>
where
    C: Collaborators + ?Sized,
{
    io.stage(Stage::Key);
    let key_bytes = io.read_bytes(key_path)?;
    let key = SigningKey::from_pem(&key_bytes)?;
    debug!(modulus_bits = key.modulus_bits(), "loaded signing key");
    io.stage(Stage::Sign);
    signer::sign(record, &key)
}
