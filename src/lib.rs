//! # eggnog-arff
//!
//! Turns eggNOG-mapper ortholog-group annotations into ARFF feature matrices
//! for downstream phenotype classifiers.
//!
//! Each annotated gene carries an `eggNOG_OGs` value such as
//! `COG0001@1|root,COG0001@2|Bacteria`. The part before the first `@` is the
//! gene's category token. A genome becomes one feature vector: how many of
//! its genes fall into each token. The set of columns is not fixed up front;
//! it is inferred from the tokens actually observed.
//!
//! ## Stages
//!
//! 1. [`io::annotations`] reads tab-separated rows and extracts tokens
//! 2. [`FrequencyTable`] counts tokens with the [`Count`] combiner
//! 3. [`Schema`] sorts the distinct tokens (byte order) into columns
//! 4. [`FeatureMatrix`] pivots counts into schema-aligned rows
//! 5. [`arff::render_arff`] writes `@RELATION`, one `REAL` attribute per
//!    token, the empty `phenotype` label attribute, `@DATA`, and the rows
//!
//! ## Quick Start
//!
//! ```
//! use eggnog_arff::*;
//! # use anyhow::Result;
//!
//! # fn main() -> Result<()> {
//! let table = "\
//! g1\t-\t-\t-\tCOG0001@bactNOG\t-\t-\t-\t-\t-\t-\t-\t-\t-\t-\t-\t-\t-\t-\t-\t-
//! g2\t-\t-\t-\tCOG0001@bactNOG\t-\t-\t-\t-\t-\t-\t-\t-\t-\t-\t-\t-\t-\t-\t-\t-
//! g3\t-\t-\t-\tCOG0002@bactNOG\t-\t-\t-\t-\t-\t-\t-\t-\t-\t-\t-\t-\t-\t-\t-\t-
//! ";
//! let arff = convert_bytes(table.as_bytes(), &ArffOptions::default())?;
//! assert_eq!(
//!     arff,
//!     "@RELATION    Cog\n\
//!      @ATTRIBUTE Cog-COG0001    REAL\n\
//!      @ATTRIBUTE Cog-COG0002    REAL\n\
//!      @ATTRIBUTE phenotype      {Susceptible, Resistant}\n\
//!      @DATA\n\
//!      2,1,\n"
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Files and batches
//!
//! [`convert_file`] reads one table (gzip, zstd, bzip2 and xz inputs are
//! decompressed transparently) and writes one ARFF file. [`convert_batch`]
//! converts many tables into a single ARFF with one row per sample over the
//! union of their tokens. Both take an explicit config value and return
//! [`ConversionStats`].
//!
//! ## Errors
//!
//! Functions return [`anyhow::Result`]. Domain failures are [`ConvertError`]
//! values inside it: a row shorter than the 21-column layout aborts the
//! conversion before anything is written. An input without data rows is
//! valid and yields a document with only the label attribute.
//!
//! ## Module Overview
//!
//! - [`record`] - annotation row layout and token extraction
//! - [`combiners`] - keyed aggregation (`CombineFn`, `Count`)
//! - [`frequency`], [`schema`], [`pivot`] - counting, column inference, alignment
//! - [`arff`] - ARFF rendering and parsing
//! - [`io`] - table reading, compression, glob expansion, atomic writes
//! - [`pipeline`] - end-to-end conversions
//! - [`config`], [`metrics`], [`error`] - settings, statistics, failures
//! - [`testing`] - fixtures for tests

pub mod arff;
pub mod combiners;
pub mod config;
pub mod error;
pub mod frequency;
pub mod io;
pub mod metrics;
pub mod pipeline;
pub mod pivot;
pub mod record;
pub mod schema;
pub mod testing;

pub use arff::{ArffDocument, Attribute, read_arff, render_arff};
pub use combiners::{CombineFn, Count};
pub use config::{ArffOptions, BatchConfig, ConversionConfig};
pub use error::ConvertError;
pub use frequency::FrequencyTable;
pub use metrics::ConversionStats;
pub use pipeline::{convert_batch, convert_bytes, convert_file, convert_reader, count_tokens};
pub use pivot::{FeatureMatrix, FeatureRow};
pub use record::{AnnotationRecord, category_token};
pub use schema::Schema;
