//! Error types for skipsign-core.
//!
//! Every failure in the pipeline is fatal. Errors carry enough context to name
//! the failing stage and the offending input, so the CLI can print a single
//! descriptive line and exit.

use std::fmt;

use thiserror::Error;

/// Result alias used across the crate.
pub type SkipSignResult<T> = Result<T, SkipSignError>;

/// Pipeline stage an error was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Config,
    Read,
    Decode,
    Build,
    Key,
    Sign,
    Emit,
    Write,
    Verify,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::Read => "read",
            Self::Decode => "decode",
            Self::Build => "build",
            Self::Key => "key",
            Self::Sign => "sign",
            Self::Emit => "emit",
            Self::Write => "write",
            Self::Verify => "verify",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All errors produced by skipsign-core.
#[derive(Debug, Error)]
pub enum SkipSignError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("decode: row {row}: malformed input: {reason}")]
    Input { row: usize, reason: String },

    #[error("decode: row {row}: could not decode id {token:?} (ids are expected in base64): {reason}")]
    Decode {
        row: usize,
        token: String,
        reason: String,
    },

    #[error("decode: row {row}: id {token:?} decodes to {actual} bytes, expected {expected}")]
    Length {
        row: usize,
        token: String,
        expected: usize,
        actual: usize,
    },

    #[error("decode: row {row}: id {token:?} has unknown type tag {tag}")]
    Tag { row: usize, token: String, tag: u8 },

    #[error("key: {0}")]
    KeyFormat(String),

    #[error("sign: {0}")]
    Signing(String),

    #[error("emit: {0}")]
    Serialization(String),

    #[error("verify: {0}")]
    Verification(String),

    #[error("{stage}: {path}: {source}")]
    Io {
        stage: Stage,
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl SkipSignError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn key_format(msg: impl Into<String>) -> Self {
        Self::KeyFormat(msg.into())
    }

    pub fn signing(msg: impl Into<String>) -> Self {
        Self::Signing(msg.into())
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    pub fn verification(msg: impl Into<String>) -> Self {
        Self::Verification(msg.into())
    }

    pub fn io(stage: Stage, path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            stage,
            path: path.into(),
            source,
        }
    }

    /// Stage the error belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            Self::InvalidArgument(_) => Stage::Config,
            Self::Input { .. } | Self::Decode { .. } | Self::Length { .. } | Self::Tag { .. } => {
                Stage::Decode
            }
            Self::KeyFormat(_) => Stage::Key,
            Self::Signing(_) => Stage::Sign,
            Self::Serialization(_) => Stage::Emit,
            Self::Verification(_) => Stage::Verify,
            Self::Io { stage, .. } => *stage,
        }
    }

    /// Re-tag a codec error with the row it came from.
    pub(crate) fn at_row(self, at: usize) -> Self {
        match self {
            Self::Input { reason, .. } => Self::Input { row: at, reason },
            Self::Decode { token, reason, .. } => Self::Decode {
                row: at,
                token,
                reason,
            },
            Self::Length {
                token,
                expected,
                actual,
                ..
            } => Self::Length {
                row: at,
                token,
                expected,
                actual,
            },
            Self::Tag { token, tag, .. } => Self::Tag { row: at, token, tag },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_names_stage_and_input() {
        let e = SkipSignError::Length {
            row: 2,
            token: "QUJD".to_string(),
            expected: 33,
            actual: 3,
        };
        let msg = e.to_string();
        assert!(msg.starts_with("decode: row 2"));
        assert!(msg.contains("\"QUJD\""));
        assert_eq!(e.stage(), Stage::Decode);
    }

    #[test]
    fn io_error_keeps_its_stage() {
        let e = SkipSignError::io(
            Stage::Write,
            "/tmp/out.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(e.stage(), Stage::Write);
        assert!(e.to_string().starts_with("write: /tmp/out.json"));
    }

    #[test]
    fn at_row_rewrites_codec_errors_only() {
        let e = SkipSignError::Tag {
            row: 0,
            token: "x".to_string(),
            tag: 9,
        }
        .at_row(7);
        assert!(matches!(e, SkipSignError::Tag { row: 7, .. }));

        let e = SkipSignError::signing("boom").at_row(7);
        assert!(matches!(e, SkipSignError::Signing(_)));
    }
}
