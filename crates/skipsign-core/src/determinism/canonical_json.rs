//! Canonical JSON encoding.
//!
//! Produces a single byte sequence for a logical JSON value, independent of
//! process, platform or map iteration order:
//! - object keys sorted by their UTF-8 bytes
//! - no insignificant whitespace
//! - integers only (floating point numbers are rejected)
//! - strings escaped minimally: `"` and `\`, short escapes for `\b \f \n \r \t`,
//!   `\u00XX` (lowercase hex) for the remaining control characters
//!
//! Never hash or sign `serde_json::to_vec` output directly; it is not a
//! canonical form.

use itertools::Itertools;
use serde_json::Value;

use crate::errors::{SkipSignError, SkipSignResult};

/// Encode a JSON value into its canonical bytes.
pub fn to_canonical_bytes(value: &Value) -> SkipSignResult<Vec<u8>> {
    let mut out = Vec::with_capacity(256);
    write_value(&mut out, value)?;
    Ok(out)
}

/// Serialize any serde value, then canonicalize it.
pub fn canonical_bytes_of<T: serde::Serialize>(value: &T) -> SkipSignResult<Vec<u8>> {
    let v = serde_json::to_value(value)
        .map_err(|e| SkipSignError::serialization(format!("failed to serialize value: {e}")))?;
    to_canonical_bytes(&v)
}

fn write_value(out: &mut Vec<u8>, value: &Value) -> SkipSignResult<()> {
    match value {
        Value::Null => out.extend_from_slice(b"null"),
        Value::Bool(true) => out.extend_from_slice(b"true"),
        Value::Bool(false) => out.extend_from_slice(b"false"),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                out.extend_from_slice(i.to_string().as_bytes());
            } else if let Some(u) = n.as_u64() {
                out.extend_from_slice(u.to_string().as_bytes());
            } else {
                return Err(SkipSignError::serialization(format!(
                    "non-integer number not allowed in canonical JSON: {n}"
                )));
            }
        }
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_value(out, item)?;
            }
            out.push(b']');
        }
        Value::Object(map) => {
            out.push(b'{');
            let sorted = map
                .iter()
                .sorted_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));
            for (i, (k, v)) in sorted.enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_string(out, k);
                out.push(b':');
                write_value(out, v)?;
            }
            out.push(b'}');
        }
    }
    Ok(())
}

fn write_string(out: &mut Vec<u8>, s: &str) {
    out.push(b'"');
    for ch in s.chars() {
        match ch {
            '"' => out.extend_from_slice(b"\\\""),
            '\\' => out.extend_from_slice(b"\\\\"),
            '\u{08}' => out.extend_from_slice(b"\\b"),
            '\u{0C}' => out.extend_from_slice(b"\\f"),
            '\n' => out.extend_from_slice(b"\\n"),
            '\r' => out.extend_from_slice(b"\\r"),
            '\t' => out.extend_from_slice(b"\\t"),
            c if (c as u32) < 0x20 => {
                out.extend_from_slice(format!("\\u{:04x}", c as u32).as_bytes());
            }
            c => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
    }
    out.push(b'"');
}
