//! ARFF rendering and parsing.
//!
//! The writer emits, in order: the relation line, one `REAL` attribute per
//! schema token, the nominal label attribute, `@DATA`, and one data line per
//! row. A data line is the row's counts in schema order followed by a single
//! empty label field, so `{COG0001: 2, COG0002: 1}` renders as `2,1,` and a
//! sample with no tokens renders as an empty line.
//!
//! Data lines are assembled field by field from the aligned row; the field
//! count always equals the attribute count.
//!
//! Attribute names are written bare unless they contain whitespace, a comma,
//! a brace, `%` or a quote; those are wrapped in single quotes with `'` and `\`
//! escaped by a backslash.
//!
//! [`read_arff`] parses documents of this shape back, which downstream tools
//! and the round-trip tests rely on.

use crate::config::ArffOptions;
use crate::error::ConvertError;
use crate::frequency::FrequencyTable;
use crate::pivot::{FeatureMatrix, FeatureRow};
use anyhow::Result;
use std::borrow::Cow;
use std::fmt::Write as _;

const RELATION_KW: &str = "@RELATION";
const ATTRIBUTE_KW: &str = "@ATTRIBUTE";
const DATA_KW: &str = "@DATA";
const FIELD_SEP: &str = ",";
const MISSING: &str = "?";

/// A declared attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attribute {
    /// Numeric attribute, declared `REAL`.
    Real(String),
    /// Nominal attribute with its allowed values.
    Nominal { name: String, values: Vec<String> },
}

impl Attribute {
    pub fn name(&self) -> &str {
        match self {
            Attribute::Real(name) => name,
            Attribute::Nominal { name, .. } => name,
        }
    }

    fn declaration(&self) -> String {
        match self {
            Attribute::Real(name) => format!("{ATTRIBUTE_KW} {}    REAL", quoted(name)),
            Attribute::Nominal { name, values } => format!(
                "{ATTRIBUTE_KW} {}      {{{}}}",
                quoted(name),
                values.join(", ")
            ),
        }
    }
}

fn needs_quotes(name: &str) -> bool {
    name.chars()
        .any(|c| c.is_whitespace() || matches!(c, ',' | '{' | '}' | '%' | '\'' | '"'))
}

fn quoted(name: &str) -> Cow<'_, str> {
    if !needs_quotes(name) {
        return Cow::Borrowed(name);
    }
    let mut out = String::with_capacity(name.len() + 2);
    out.push('\'');
    for c in name.chars() {
        if matches!(c, '\'' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
    Cow::Owned(out)
}

/* ===================== Writer ===================== */

/// Render a whole document into memory.
pub fn render_arff(matrix: &FeatureMatrix, options: &ArffOptions) -> String {
    let attributes = matrix.schema().attributes(options);
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "{RELATION_KW}    {}", options.relation);
    for attr in &attributes {
        let _ = writeln!(out, "{}", attr.declaration());
    }
    let _ = writeln!(out, "{DATA_KW}");
    for row in matrix.rows() {
        let _ = writeln!(out, "{}", data_line(row));
    }
    out
}

/// Counts of `row` followed by an empty label field.
fn data_line(row: &FeatureRow) -> String {
    let mut fields: Vec<String> = row.values().iter().map(u64::to_string).collect();
    fields.push(String::new());
    fields.join(FIELD_SEP)
}

/* ===================== Reader ===================== */

/// A parsed ARFF document. Data cells are `None` when empty or `?`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArffDocument {
    pub relation: String,
    pub attributes: Vec<Attribute>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl ArffDocument {
    /// Rebuild the token counts of one data row.
    ///
    /// Only `REAL` attributes named `<relation>-<token>` contribute; the label
    /// and any other attribute are ignored.
    ///
    /// # Errors
    /// Returns an error if `row` is out of range or a count is not a
    /// non-negative integer.
    pub fn frequencies(&self, row: usize) -> Result<FrequencyTable> {
        let cells = self
            .rows
            .get(row)
            .ok_or_else(|| anyhow::anyhow!("no data row #{row}"))?;
        let prefix = format!("{}-", self.relation);
        let mut counts = Vec::new();
        for (attr, cell) in self.attributes.iter().zip(cells) {
            let Attribute::Real(name) = attr else {
                continue;
            };
            let Some(token) = name.strip_prefix(&prefix) else {
                continue;
            };
            let n = match cell {
                Some(v) => parse_count(v)
                    .ok_or_else(|| anyhow::anyhow!("attribute {name}: bad count {v:?}"))?,
                None => 0,
            };
            counts.push((token.to_string(), n));
        }
        Ok(FrequencyTable::from_counts(counts))
    }

    /// Names of all declared attributes, in order.
    pub fn attribute_names(&self) -> Vec<&str> {
        self.attributes.iter().map(Attribute::name).collect()
    }
}

/// Counts are written as integers, but accept `2.0` from other tools.
fn parse_count(v: &str) -> Option<u64> {
    if let Ok(n) = v.parse::<u64>() {
        return Some(n);
    }
    let f = v.parse::<f64>().ok()?;
    (f >= 0.0 && f.fract() == 0.0).then_some(f as u64)
}

/// Parse an ARFF document.
///
/// Header lines are matched case-insensitively; `%` comments and blank lines
/// are skipped in the header. After `@DATA` every line is a data row, blank
/// ones included, since a schema with only the label attribute renders its row
/// as an empty line.
///
/// # Errors
/// Returns [`ConvertError::InvalidArff`] when a declaration is malformed, a
/// data line has the wrong number of fields, a `REAL` cell is not numeric, or
/// a nominal cell is not one of the declared values.
pub fn read_arff(text: &str) -> Result<ArffDocument> {
    let mut relation: Option<String> = None;
    let mut attributes = Vec::new();
    let mut rows = Vec::new();
    let mut in_data = false;

    for (i, raw) in text.lines().enumerate() {
        let line_no = i + 1;
        if in_data {
            rows.push(parse_data_line(raw, &attributes, line_no)?);
            continue;
        }
        let line = raw.trim();
        if line.is_empty() || line.starts_with('%') {
            continue;
        }
        let (keyword, rest) = match line.split_once(char::is_whitespace) {
            Some((k, r)) => (k, r.trim()),
            None => (line, ""),
        };
        if keyword.eq_ignore_ascii_case(RELATION_KW) {
            if rest.is_empty() {
                return Err(ConvertError::invalid_arff(line_no, "missing relation name").into());
            }
            relation = Some(rest.to_string());
        } else if keyword.eq_ignore_ascii_case(ATTRIBUTE_KW) {
            attributes.push(parse_attribute(rest, line_no)?);
        } else if keyword.eq_ignore_ascii_case(DATA_KW) {
            in_data = true;
        } else {
            return Err(
                ConvertError::invalid_arff(line_no, format!("unexpected line {line:?}")).into(),
            );
        }
    }

    let relation = relation.ok_or_else(|| ConvertError::invalid_arff(0, "no @RELATION line"))?;
    if !in_data {
        return Err(ConvertError::invalid_arff(0, "no @DATA section").into());
    }
    Ok(ArffDocument {
        relation,
        attributes,
        rows,
    })
}

/// Split off a bare or quoted attribute name, returning it unescaped.
fn split_name(decl: &str) -> Option<(String, &str)> {
    let mut chars = decl.char_indices();
    let (_, first) = chars.next()?;
    if !matches!(first, '\'' | '"') {
        return decl
            .split_once(char::is_whitespace)
            .map(|(n, rest)| (n.to_string(), rest));
    }
    let mut name = String::new();
    let mut escaped = false;
    for (i, c) in chars {
        if escaped {
            name.push(c);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == first {
            return Some((name, &decl[i + c.len_utf8()..]));
        } else {
            name.push(c);
        }
    }
    None
}

fn parse_attribute(decl: &str, line_no: usize) -> Result<Attribute, ConvertError> {
    let (name, kind) = split_name(decl)
        .map(|(n, k)| (n, k.trim()))
        .filter(|(_, k)| !k.is_empty())
        .ok_or_else(|| ConvertError::invalid_arff(line_no, "attribute without a type"))?;
    if let Some(body) = kind.strip_prefix('{') {
        let body = body
            .strip_suffix('}')
            .ok_or_else(|| ConvertError::invalid_arff(line_no, "unterminated value set"))?;
        let values = body.split(FIELD_SEP).map(|v| v.trim().to_string()).collect();
        return Ok(Attribute::Nominal { name, values });
    }
    match kind.to_ascii_uppercase().as_str() {
        "REAL" | "NUMERIC" | "INTEGER" => Ok(Attribute::Real(name)),
        other => Err(ConvertError::invalid_arff(
            line_no,
            format!("unsupported attribute type {other}"),
        )),
    }
}

fn parse_data_line(
    line: &str,
    attributes: &[Attribute],
    line_no: usize,
) -> Result<Vec<Option<String>>, ConvertError> {
    let fields: Vec<&str> = line.split(FIELD_SEP).collect();
    if fields.len() != attributes.len() {
        return Err(ConvertError::invalid_arff(
            line_no,
            format!(
                "data line has {} fields, {} attributes declared",
                fields.len(),
                attributes.len()
            ),
        ));
    }
    let mut cells = Vec::with_capacity(fields.len());
    for (attr, field) in attributes.iter().zip(fields) {
        let field = field.trim();
        if field.is_empty() || field == MISSING {
            cells.push(None);
            continue;
        }
        match attr {
            Attribute::Real(name) if field.parse::<f64>().is_err() => {
                return Err(ConvertError::invalid_arff(
                    line_no,
                    format!("{name}: {field:?} is not numeric"),
                ));
            }
            Attribute::Nominal { name, values } if !values.iter().any(|v| v == field) => {
                return Err(ConvertError::invalid_arff(
                    line_no,
                    format!("{name}: {field:?} is not a declared value"),
                ));
            }
            _ => cells.push(Some(field.to_string())),
        }
    }
    Ok(cells)
}
