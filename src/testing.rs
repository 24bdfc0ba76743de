//! Fixtures and assertions for tests of annotation conversions.
//!
//! - [`annotation_line`] / [`annotation_table`]: rows in the eggNOG-mapper layout
//! - [`AnnotationTableBuilder`]: fluent construction of whole tables
//! - [`assert_arff_consistent`]: structural checks every rendered document must pass
//!
//! # Example
//!
//! ```
//! use eggnog_arff::testing::*;
//! use eggnog_arff::{ArffOptions, convert_bytes};
//!
//! let table = AnnotationTableBuilder::new()
//!     .add_genes("COG0001@bactNOG", 2)
//!     .add_gene("COG0002@bactNOG")
//!     .build();
//!
//! let arff = convert_bytes(table.as_bytes(), &ArffOptions::default()).unwrap();
//! assert_arff_consistent(&arff);
//! assert!(arff.ends_with("2,1,\n"));
//! ```

use crate::arff::{Attribute, read_arff};
use crate::record::EMAPPER_COLUMNS;
use std::fs;
use std::io;
use std::path::Path;

/// One tab-separated data row with `ogs` in the `eggNOG_OGs` column and `-`
/// everywhere else. Ends with a newline.
#[must_use]
pub fn annotation_line(query: &str, ogs: &str) -> String {
    let mut fields = vec!["-"; EMAPPER_COLUMNS.len()];
    fields[0] = query;
    fields[4] = ogs;
    let mut line = fields.join("\t");
    line.push('\n');
    line
}

/// The comment header eggNOG-mapper writes above its column names.
#[must_use]
pub fn annotation_header() -> String {
    format!(
        "## emapper-2.1.12\n## command: emapper.py -i genome.faa -o genome\n#{}\n",
        EMAPPER_COLUMNS.join("\t")
    )
}

/// A complete table: header comments plus one gene per `ogs` value.
#[must_use]
pub fn annotation_table(ogs: &[&str]) -> String {
    AnnotationTableBuilder::new().add_all(ogs.iter().copied()).build()
}

/// Fluent builder for annotation tables.
///
/// Genes are named `gene_1`, `gene_2`, ... in insertion order.
#[derive(Debug, Clone)]
pub struct AnnotationTableBuilder {
    text: String,
    genes: usize,
}

impl Default for AnnotationTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AnnotationTableBuilder {
    /// Start with the standard comment header.
    #[must_use]
    pub fn new() -> Self {
        Self {
            text: annotation_header(),
            genes: 0,
        }
    }

    /// Start with no header at all.
    #[must_use]
    pub fn bare() -> Self {
        Self {
            text: String::new(),
            genes: 0,
        }
    }

    #[must_use]
    pub fn add_gene(mut self, ogs: &str) -> Self {
        self.genes += 1;
        let query = format!("gene_{}", self.genes);
        self.text.push_str(&annotation_line(&query, ogs));
        self
    }

    /// Add `n` genes sharing the same `eggNOG_OGs` value.
    #[must_use]
    pub fn add_genes(mut self, ogs: &str, n: usize) -> Self {
        for _ in 0..n {
            self = self.add_gene(ogs);
        }
        self
    }

    #[must_use]
    pub fn add_all<'a, I: IntoIterator<Item = &'a str>>(mut self, ogs: I) -> Self {
        for o in ogs {
            self = self.add_gene(o);
        }
        self
    }

    /// Add a comment line (the leading `#` is added).
    #[must_use]
    pub fn add_comment(mut self, comment: &str) -> Self {
        self.text.push('#');
        self.text.push_str(comment);
        self.text.push('\n');
        self
    }

    /// Add a raw line as-is, e.g. a deliberately malformed row.
    #[must_use]
    pub fn add_raw(mut self, line: &str) -> Self {
        self.text.push_str(line);
        if !line.ends_with('\n') {
            self.text.push('\n');
        }
        self
    }

    #[must_use]
    pub fn build(self) -> String {
        self.text
    }

    /// Write the table to `path` uncompressed.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn write_to(self, path: impl AsRef<Path>) -> io::Result<()> {
        fs::write(path, self.text)
    }
}

/// Panic unless `arff` is a well-formed conversion output.
///
/// Checks that every data line has one field per attribute, that the numeric
/// attributes are in strictly ascending order, that the label attribute comes
/// last, and that the label cell is empty on every row.
///
/// # Panics
/// When any of the above does not hold.
pub fn assert_arff_consistent(arff: &str) {
    let doc = match read_arff(arff) {
        Ok(doc) => doc,
        Err(e) => panic!("document does not parse: {e:#}\n{arff}"),
    };
    let (label, features) = match doc.attributes.split_last() {
        Some(split) => split,
        None => panic!("no attributes declared"),
    };
    assert!(
        matches!(label, Attribute::Nominal { .. }),
        "last attribute must be the nominal label, got {label:?}"
    );
    assert!(
        features.iter().all(|a| matches!(a, Attribute::Real(_))),
        "non-numeric feature attribute"
    );
    let names: Vec<&str> = features.iter().map(Attribute::name).collect();
    assert!(
        names.windows(2).all(|w| w[0] < w[1]),
        "feature attributes not strictly ascending: {names:?}"
    );
    for (i, row) in doc.rows.iter().enumerate() {
        assert_eq!(row.len(), doc.attributes.len(), "row {i} width");
        assert_eq!(row.last(), Some(&None), "row {i} has a label value");
    }
}
