//! Pivot per-sample counts into schema-aligned feature rows.
//!
//! A single annotation table pivots into exactly one row. Several tables pivot
//! into one row each against the union schema, with 0 for tokens a sample
//! never saw.

use crate::frequency::FrequencyTable;
use crate::schema::Schema;

/// Counts of one sample, positionally aligned with a [`Schema`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureRow {
    values: Vec<u64>,
}

impl FeatureRow {
    /// Look up every schema token, in schema order.
    pub fn pivot(table: &FrequencyTable, schema: &Schema) -> Self {
        let values = schema
            .tokens()
            .iter()
            .map(|t| table.count_or_zero(t))
            .collect();
        Self { values }
    }

    pub fn values(&self) -> &[u64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn sum(&self) -> u64 {
        self.values.iter().sum()
    }
}

/// A schema together with its rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureMatrix {
    schema: Schema,
    rows: Vec<FeatureRow>,
}

impl FeatureMatrix {
    /// One sample, one row.
    pub fn from_table(table: &FrequencyTable) -> Self {
        Self::from_tables(std::slice::from_ref(table))
    }

    /// One row per table, in the given order, against the union schema.
    pub fn from_tables(tables: &[FrequencyTable]) -> Self {
        let schema = Schema::infer_union(tables);
        let rows = tables.iter().map(|t| FeatureRow::pivot(t, &schema)).collect();
        Self { schema, rows }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    /// `(token, value)` pairs of one row, in column order.
    pub fn labeled_row(&self, row: usize) -> Option<impl Iterator<Item = (&str, u64)>> {
        let r = self.rows.get(row)?;
        Some(
            self.schema
                .tokens()
                .iter()
                .map(String::as_str)
                .zip(r.values().iter().copied()),
        )
    }
}
