//! Reading eggNOG-mapper annotation tables.
//!
//! Tables are tab-separated with no header row; lines starting with `#` are
//! comments. Every data row must carry the 21 documented columns. A short row
//! aborts the read with [`ConvertError::MalformedRow`], since guessing which
//! column went missing would shift `eggNOG_OGs` onto the wrong field. Extra
//! trailing columns are ignored.
//!
//! Rows are read as raw bytes. Token extraction decodes only `eggNOG_OGs`, so
//! stray non-UTF-8 bytes in free-text columns such as `Description` are
//! tolerated; invalid UTF-8 in `eggNOG_OGs` itself is
//! [`ConvertError::InvalidText`].

use crate::error::ConvertError;
use crate::io::compression::auto_detect_reader;
use crate::record::{AnnotationRecord, EMAPPER_FIELDS, category_token};
use anyhow::{Context, Result};
use csv::{ByteRecord, ReaderBuilder};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Index of the `eggNOG_OGs` column.
const OGS_FIELD: usize = 4;

fn reader_builder() -> ReaderBuilder {
    let mut b = ReaderBuilder::new();
    b.delimiter(b'\t')
        .has_headers(false)
        .comment(Some(b'#'))
        .quoting(false)
        .flexible(true);
    b
}

/// 1-based input line of `rec`, falling back to its record index.
fn line_of(rec: &ByteRecord, index: usize) -> u64 {
    rec.position()
        .map(|p| p.line())
        .unwrap_or(index as u64 + 1)
}

fn check_width(rec: &ByteRecord, index: usize) -> Result<()> {
    if rec.len() < EMAPPER_FIELDS {
        return Err(ConvertError::MalformedRow {
            line: line_of(rec, index),
            found: rec.len(),
            expected: EMAPPER_FIELDS,
        }
        .into());
    }
    Ok(())
}

/// Category tokens, one per data row, in input order.
///
/// Only the `eggNOG_OGs` column is decoded; empty values yield empty tokens.
///
/// # Errors
/// Returns an error if reading fails or a row is shorter than the layout.
pub fn read_category_tokens<R: Read>(reader: R) -> Result<Vec<String>> {
    let mut rdr = reader_builder().from_reader(reader);
    let mut tokens = Vec::new();
    for (i, rec) in rdr.byte_records().enumerate() {
        let rec = rec.with_context(|| format!("read annotation record #{}", i + 1))?;
        check_width(&rec, i)?;
        let ogs = std::str::from_utf8(&rec[OGS_FIELD]).map_err(|_| ConvertError::InvalidText {
            line: line_of(&rec, i),
            field: OGS_FIELD + 1,
        })?;
        tokens.push(category_token(ogs).to_string());
    }
    Ok(tokens)
}

/// Fully typed rows.
///
/// Every column is decoded here, so any invalid UTF-8 is an error.
///
/// # Errors
/// Returns an error if reading fails, a row is shorter than the layout, or a
/// row cannot be deserialized.
pub fn read_annotations<R: Read>(reader: R) -> Result<Vec<AnnotationRecord>> {
    let mut rdr = reader_builder().from_reader(reader);
    let mut out = Vec::new();
    for (i, rec) in rdr.byte_records().enumerate() {
        let rec = rec.with_context(|| format!("read annotation record #{}", i + 1))?;
        check_width(&rec, i)?;
        let fields: ByteRecord = rec.iter().take(EMAPPER_FIELDS).collect();
        let row: AnnotationRecord = fields
            .deserialize(None)
            .with_context(|| format!("parse annotation record #{}", i + 1))?;
        out.push(row);
    }
    Ok(out)
}

/// Open `path`, decompressing when needed, and read its category tokens.
///
/// # Errors
/// [`ConvertError::Io`] if the file cannot be opened, otherwise as
/// [`read_category_tokens`].
pub fn read_category_tokens_file(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let f = File::open(path).map_err(|e| ConvertError::io(path, e))?;
    let rdr = auto_detect_reader(f, path)
        .with_context(|| format!("setup decompression for {}", path.display()))?;
    read_category_tokens(rdr).with_context(|| format!("read {}", path.display()))
}

/// Open `path`, decompressing when needed, and read every typed row.
///
/// # Errors
/// As [`read_category_tokens_file`] and [`read_annotations`].
pub fn read_annotations_file(path: impl AsRef<Path>) -> Result<Vec<AnnotationRecord>> {
    let path = path.as_ref();
    let f = File::open(path).map_err(|e| ConvertError::io(path, e))?;
    let rdr = auto_detect_reader(f, path)
        .with_context(|| format!("setup decompression for {}", path.display()))?;
    read_annotations(rdr).with_context(|| format!("read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::annotation_line;

    #[test]
    fn skips_comments_and_keeps_order() -> Result<()> {
        let input = format!(
            "## emapper-2.1.12\n#query\tseed_ortholog\n{}{}# done\n",
            annotation_line("g1", "COG0002@1|root"),
            annotation_line("g2", "COG0001@2|Bacteria"),
        );
        let tokens = read_category_tokens(input.as_bytes())?;
        assert_eq!(tokens, vec!["COG0002", "COG0001"]);
        Ok(())
    }

    #[test]
    fn short_row_is_malformed() {
        let input = format!("{}g2\tseed\t1e-5\n", annotation_line("g1", "COG1@x"));
        let err = read_category_tokens(input.as_bytes()).unwrap_err();
        match err.downcast_ref::<ConvertError>() {
            Some(ConvertError::MalformedRow {
                line,
                found,
                expected,
            }) => {
                assert_eq!(*line, 2);
                assert_eq!(*found, 3);
                assert_eq!(*expected, 21);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_ogs_field_counts_as_empty_token() -> Result<()> {
        let input = annotation_line("g1", "");
        assert_eq!(read_category_tokens(input.as_bytes())?, vec![""]);
        Ok(())
    }

    #[test]
    fn extra_columns_ignored() -> Result<()> {
        let line = annotation_line("g1", "COG7@x");
        let input = format!("{}\textra\n", line.trim_end());
        let rows = read_annotations(input.as_bytes())?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category_token(), "COG7");
        assert_eq!(rows[0].query, "g1");
        Ok(())
    }

    /// Replace the start of field `field` (0-based) of `line` with `bytes`.
    fn with_raw_field(line: &str, field: usize, bytes: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        for (i, f) in line.trim_end_matches('\n').split('\t').enumerate() {
            if i > 0 {
                out.push(b'\t');
            }
            if i == field {
                out.extend_from_slice(bytes);
            }
            out.extend_from_slice(f.as_bytes());
        }
        out.push(b'\n');
        out
    }

    #[test]
    fn invalid_utf8_in_description_is_ignored() -> Result<()> {
        let input = with_raw_field(&annotation_line("g1", "COG3@x"), 19, &[0xff]);
        assert_eq!(read_category_tokens(&input[..])?, vec!["COG3"]);
        Ok(())
    }

    #[test]
    fn invalid_utf8_in_ogs_is_reported() {
        let first = annotation_line("g1", "COG3@x");
        let mut input = first.clone().into_bytes();
        input.extend(with_raw_field(&first, OGS_FIELD, &[0xc3, 0x28]));
        let err = read_category_tokens(&input[..]).unwrap_err();
        match err.downcast_ref::<ConvertError>() {
            Some(ConvertError::InvalidText { line, field }) => {
                assert_eq!(*line, 2);
                assert_eq!(*field, 5);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn only_comments_yield_nothing() -> Result<()> {
        let tokens = read_category_tokens("# nothing here\n".as_bytes())?;
        assert!(tokens.is_empty());
        Ok(())
    }
}
