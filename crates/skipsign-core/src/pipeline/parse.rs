//! Parsing helpers for pipeline inputs.
//!
//! Operates on in-memory bytes only; reading the file is the caller's job.
//!
//! The input is CSV without a header row. The first field of each row is the
//! identity token. Rows may carry extra fields, which are reported and
//! ignored. Blank lines are skipped.

use csv::ReaderBuilder;

use crate::errors::{SkipSignError, SkipSignResult};

/// One row of the identity list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRow {
    /// 1-based line number in the input.
    pub row: usize,
    pub token: String,
    /// Number of fields after the identity token.
    pub extra_fields: usize,
}

/// Split delimited input into identity rows.
pub fn parse_rows(bytes: &[u8]) -> SkipSignResult<Vec<InputRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for (i, rec) in reader.records().enumerate() {
        let rec = rec.map_err(|e| SkipSignError::Input {
            row: e.position().map_or(i + 1, |p| p.line() as usize),
            reason: e.to_string(),
        })?;

        let row = rec.position().map_or(i + 1, |p| p.line() as usize);
        let token = rec.get(0).unwrap_or_default().to_string();
        rows.push(InputRow {
            row,
            token,
            extra_fields: rec.len().saturating_sub(1),
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn one_token_per_row() {
        let rows = parse_rows(b"AAAA\nBBBB\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].token, "AAAA");
        assert_eq!(rows[1].token, "BBBB");
        assert_eq!(rows[1].row, 2);
        assert!(rows.iter().all(|r| r.extra_fields == 0));
    }

    #[test]
    fn extra_fields_counted() {
        let rows = parse_rows(b"AAAA,node-a,eu\nBBBB\n").unwrap();
        assert_eq!(rows[0].extra_fields, 2);
        assert_eq!(rows[0].token, "AAAA");
        assert_eq!(rows[1].extra_fields, 0);
    }

    #[test]
    fn blank_lines_skipped_and_lines_numbered() {
        let rows = parse_rows(b"AAAA\n\nBBBB").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].row, 3);
    }

    #[test]
    fn quoted_fields() {
        let rows = parse_rows(b"\"AA+/AA==\",\"a, b\"\n").unwrap();
        assert_eq!(rows[0].token, "AA+/AA==");
        assert_eq!(rows[0].extra_fields, 1);
    }

    #[test]
    fn empty_input_has_no_rows() {
        assert!(parse_rows(b"").unwrap().is_empty());
    }

    #[test]
    fn crlf_line_endings() {
        let rows = parse_rows(b"AAAA\r\nBBBB\r\n").unwrap();
        assert_eq!(rows[0].token, "AAAA");
        assert_eq!(rows[1].token, "BBBB");
    }

    #[test]
    fn invalid_utf8_rejected() {
        let e = parse_rows(b"AAAA\n\xff\xfe\n").unwrap_err();
        assert_matches!(e, SkipSignError::Input { .. });
    }
}
