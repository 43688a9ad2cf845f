//! Version helpers.
//!
//! Centralizes parsing of the artifact `version` field. Unknown versions are
//! rejected rather than read best-effort.

use crate::errors::{SkipSignError, SkipSignResult};

/// Known artifact versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactVersion {
    V1,
}

impl ArtifactVersion {
    /// Parse an artifact version string (e.g. "v1").
    pub fn parse(s: &str) -> SkipSignResult<Self> {
        match s {
            "v1" => Ok(Self::V1),
            _ => Err(SkipSignError::serialization(format!(
                "unsupported artifact version: {s}"
            ))),
        }
    }

    /// Return the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V1 => "v1",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_v1() {
        assert_eq!(ArtifactVersion::parse("v1").unwrap(), ArtifactVersion::V1);
        assert_eq!(ArtifactVersion::V1.as_str(), "v1");
    }

    #[test]
    fn parse_unknown() {
        let e = ArtifactVersion::parse("v9").unwrap_err();
        assert!(e.to_string().contains("unsupported artifact version"));
    }
}
