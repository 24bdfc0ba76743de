//! Per-sample ortholog-group counts.

use crate::combiners::{Count, combine_by_key, combine_by_key_par};
use rayon::prelude::*;
use std::collections::HashMap;

/// Occurrence count of every category token seen in one sample.
///
/// Built once and never mutated. Tokens that did not occur are absent, so every
/// stored count is at least 1 and the counts sum to the number of rows read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: HashMap<String, u64>,
}

impl FrequencyTable {
    /// Count tokens, one per input row.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pairs = tokens.into_iter().map(|t| -> (String, ()) { (t.into(), ()) });
        let counts: HashMap<String, u64> = combine_by_key(pairs, &Count);
        Self { counts }
    }

    /// Count tokens on the rayon pool. Same result as [`Self::from_tokens`].
    pub fn from_par_tokens<I>(tokens: I) -> Self
    where
        I: IntoParallelIterator,
        I::Item: Into<String>,
    {
        let pairs = tokens
            .into_par_iter()
            .map(|t| -> (String, ()) { (t.into(), ()) });
        let counts: HashMap<String, u64> = combine_by_key_par(pairs, &Count);
        Self { counts }
    }

    /// Rebuild a table from finished counts. Zero counts are dropped and
    /// repeated tokens are added up.
    pub fn from_counts<I, S>(counts: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let mut out: HashMap<String, u64> = HashMap::new();
        for (token, n) in counts {
            if n > 0 {
                *out.entry(token.into()).or_insert(0) += n;
            }
        }
        Self { counts: out }
    }

    pub fn get(&self, token: &str) -> Option<u64> {
        self.counts.get(token).copied()
    }

    /// Count for `token`, 0 when it never occurred.
    pub fn count_or_zero(&self, token: &str) -> u64 {
        self.get(token).unwrap_or(0)
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts, i.e. the number of rows that were counted.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Distinct tokens, in no particular order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }
}
