//! Node identities and their textual codec.
//!
//! An identity is a fixed-length byte string whose final byte tags the kind of
//! entity it names. On the wire (input rows, artifacts) identities are carried
//! as standard base64 with canonical padding.
//!
//! Decoding is two-staged: base64 -> bytes, then bytes -> `Identity` with a
//! strict length check and a tag check according to `TagPolicy`.

use std::fmt;

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;

use crate::config::{validate_identity, IdentityConfig, TagPolicy};
use crate::errors::{SkipSignError, SkipSignResult};

/// Entity kind carried in the final byte of an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdType {
    Generic,
    Gateway,
    Node,
    User,
    Group,
}

impl IdType {
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Generic),
            1 => Some(Self::Gateway),
            2 => Some(Self::Node),
            3 => Some(Self::User),
            4 => Some(Self::Group),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Gateway => "gateway",
            Self::Node => "node",
            Self::User => "user",
            Self::Group => "group",
        }
    }
}

/// A validated, immutable node identity.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    bytes: Box<[u8]>,
}

impl Identity {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Raw final byte.
    pub fn tag(&self) -> u8 {
        self.bytes[self.bytes.len() - 1]
    }

    /// Entity kind, if the tag is one of the known types.
    pub fn id_type(&self) -> Option<IdType> {
        IdType::from_tag(self.tag())
    }

    /// Standard base64 form, the inverse of `IdentityCodec::decode`.
    pub fn to_base64(&self) -> String {
        B64.encode(&self.bytes)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base64())
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({})", self.to_base64())
    }
}

/// Decoder for identities of one configured shape.
#[derive(Debug, Clone, Copy)]
pub struct IdentityCodec {
    cfg: IdentityConfig,
}

impl Default for IdentityCodec {
    fn default() -> Self {
        Self {
            cfg: IdentityConfig::default(),
        }
    }
}

impl IdentityCodec {
    pub fn new(cfg: IdentityConfig) -> SkipSignResult<Self> {
        validate_identity(&cfg)?;
        Ok(Self { cfg })
    }

    /// Decode a base64 token into an identity.
    ///
    /// Errors carry row 0; callers reading from a file re-tag them with the
    /// row they came from.
    pub fn decode(&self, token: &str) -> SkipSignResult<Identity> {
        let bytes = B64.decode(token).map_err(|e| SkipSignError::Decode {
            row: 0,
            token: token.to_string(),
            reason: e.to_string(),
        })?;
        self.identity_from_bytes(token, bytes)
    }

    /// Second decoding stage: length and tag checks on raw bytes.
    pub fn identity_from_bytes(&self, token: &str, bytes: Vec<u8>) -> SkipSignResult<Identity> {
        if bytes.len() != self.cfg.len {
            return Err(SkipSignError::Length {
                row: 0,
                token: token.to_string(),
                expected: self.cfg.len,
                actual: bytes.len(),
            });
        }

        let tag = bytes[bytes.len() - 1];
        if self.cfg.tag_policy == TagPolicy::Known && IdType::from_tag(tag).is_none() {
            return Err(SkipSignError::Tag {
                row: 0,
                token: token.to_string(),
                tag,
            });
        }

        Ok(Identity {
            bytes: bytes.into_boxed_slice(),
        })
    }

    pub fn encode(&self, id: &Identity) -> String {
        id.to_base64()
    }
}
