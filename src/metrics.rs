//! Conversion statistics.
//!
//! Every conversion returns a [`ConversionStats`] summary. It can be logged
//! or saved as pretty-printed JSON next to the ARFF output, which is how the
//! surrounding workflow keeps a record of what each sample contributed.

use crate::config::PLACEHOLDER_TOKENS;
use crate::frequency::FrequencyTable;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

/// What one conversion read and wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Number of annotation tables converted (rows in the ARFF data section).
    pub samples: usize,
    /// Data rows read across all tables, after comment stripping.
    pub rows: u64,
    /// Rows that were counted; lower than `rows` only when placeholders are skipped.
    pub counted_rows: u64,
    /// Generated (non-label) attributes in the output schema.
    pub distinct_tokens: usize,
    /// Rows whose category token was empty.
    pub empty_tokens: u64,
    /// Rows whose category token was a placeholder such as `-` or empty.
    pub placeholder_tokens: u64,
    pub elapsed_ms: u64,
}

impl ConversionStats {
    /// Tally the raw tokens of one sample before any filtering.
    pub(crate) fn record_tokens(&mut self, tokens: &[String]) {
        self.samples += 1;
        self.rows += tokens.len() as u64;
        for t in tokens {
            if t.is_empty() {
                self.empty_tokens += 1;
            }
            if PLACEHOLDER_TOKENS.contains(&t.as_str()) {
                self.placeholder_tokens += 1;
            }
        }
    }

    pub(crate) fn record_table(&mut self, table: &FrequencyTable) {
        self.counted_rows += table.total();
    }

    pub(crate) fn finish(&mut self, distinct_tokens: usize, elapsed: Duration) {
        self.distinct_tokens = distinct_tokens;
        self.elapsed_ms = elapsed.as_millis() as u64;
    }

    /// Emit the summary at info level.
    pub fn log_summary(&self) {
        log::info!(
            "converted {} sample(s): {} rows, {} counted, {} attributes, {} placeholder tokens ({} empty) in {} ms",
            self.samples,
            self.rows,
            self.counted_rows,
            self.distinct_tokens,
            self.placeholder_tokens,
            self.empty_tokens,
            self.elapsed_ms
        );
    }

    /// Save as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or written.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
        let mut w = BufWriter::new(f);
        serde_json::to_writer_pretty(&mut w, self)
            .with_context(|| format!("serialize stats to {}", path.display()))?;
        w.write_all(b"\n")?;
        w.flush()?;
        Ok(())
    }
}
