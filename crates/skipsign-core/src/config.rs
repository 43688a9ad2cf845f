//! Configuration structures for skipsign-core.
//!
//! The core crate does not read environment variables or global settings.
//! The caller (CLI, tests) builds a `PipelineConfig` explicitly and passes it
//! to `pipeline::run`.

use std::path::PathBuf;

use crate::errors::{SkipSignError, SkipSignResult};

/// Byte length of a node identity: 32-byte digest plus 1 type byte.
pub const ID_LEN: usize = 33;

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Delimited input listing one base64 identity per row.
    pub input_path: PathBuf,
    /// PEM-encoded private key.
    pub key_path: PathBuf,
    /// Where the signed artifact is written.
    pub output_path: PathBuf,
    pub identity: IdentityConfig,
}

impl PipelineConfig {
    pub fn new(
        input_path: impl Into<PathBuf>,
        key_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            input_path: input_path.into(),
            key_path: key_path.into(),
            output_path: output_path.into(),
            identity: IdentityConfig::default(),
        }
    }

    pub fn with_identity(mut self, identity: IdentityConfig) -> Self {
        self.identity = identity;
        self
    }
}

/// Shape of the identities accepted by the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityConfig {
    pub len: usize,
    pub tag_policy: TagPolicy,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            len: ID_LEN,
            tag_policy: TagPolicy::Known,
        }
    }
}

/// How the final (type) byte of an identity is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagPolicy {
    /// Only the known identity types are accepted.
    Known,
    /// Any final byte is accepted.
    Any,
}

/// Validate an identity configuration.
pub fn validate_identity(cfg: &IdentityConfig) -> SkipSignResult<()> {
    if cfg.len == 0 {
        return Err(SkipSignError::invalid_argument(
            "identity length must be greater than zero",
        ));
    }
    Ok(())
}

/// Validate a full configuration object.
pub fn validate_config(cfg: &PipelineConfig) -> SkipSignResult<()> {
    for (name, p) in [
        ("input path", &cfg.input_path),
        ("key path", &cfg.key_path),
        ("output path", &cfg.output_path),
    ] {
        if p.as_os_str().is_empty() {
            return Err(SkipSignError::invalid_argument(format!(
                "{name} must not be empty"
            )));
        }
    }

    if cfg.output_path == cfg.input_path || cfg.output_path == cfg.key_path {
        return Err(SkipSignError::invalid_argument(
            "output path must differ from the input and key paths",
        ));
    }

    validate_identity(&cfg.identity)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> PipelineConfig {
        PipelineConfig::new("ids.csv", "key.pem", "skipNodes.json")
    }

    #[test]
    fn default_config_is_valid() {
        validate_config(&cfg()).unwrap();
        assert_eq!(cfg().identity.len, ID_LEN);
    }

    #[test]
    fn zero_length_identity_detected() {
        let c = cfg().with_identity(IdentityConfig {
            len: 0,
            tag_policy: TagPolicy::Any,
        });
        assert!(validate_config(&c).is_err());
    }

    #[test]
    fn empty_path_detected() {
        let mut c = cfg();
        c.key_path = PathBuf::new();
        let e = validate_config(&c).unwrap_err();
        assert!(e.to_string().contains("key path"));
    }

    #[test]
    fn output_overwriting_input_detected() {
        let mut c = cfg();
        c.output_path = c.input_path.clone();
        assert!(validate_config(&c).is_err());
    }
}
