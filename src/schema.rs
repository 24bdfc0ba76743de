//! Output schema inferred from the observed category tokens.

use crate::arff::Attribute;
use crate::config::ArffOptions;
use crate::frequency::FrequencyTable;
use std::collections::BTreeSet;

/// Sorted, duplicate-free category tokens; one numeric attribute each.
///
/// Ordering is plain byte order on the UTF-8 text, so the same input always
/// yields the same column order regardless of locale. The trailing label
/// attribute is not part of the token list; it is appended by
/// [`Schema::attributes`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    tokens: Vec<String>,
}

impl Schema {
    /// Schema of a single sample.
    pub fn infer(table: &FrequencyTable) -> Self {
        Self::infer_union([table])
    }

    /// Union of the token sets of several samples.
    pub fn infer_union<'a, I>(tables: I) -> Self
    where
        I: IntoIterator<Item = &'a FrequencyTable>,
    {
        let set: BTreeSet<&str> = tables.into_iter().flat_map(|t| t.tokens()).collect();
        Self {
            tokens: set.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Number of generated (non-label) columns.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Full attribute list: one `REAL` per token, then the nominal label.
    pub fn attributes(&self, options: &ArffOptions) -> Vec<Attribute> {
        let mut attrs: Vec<Attribute> = self
            .tokens
            .iter()
            .map(|t| Attribute::Real(options.attribute_name(t)))
            .collect();
        attrs.push(Attribute::Nominal {
            name: options.label.clone(),
            values: options.label_values.clone(),
        });
        attrs
    }
}
