//! Conversion settings.
//!
//! Everything the converter needs to know is carried in explicit values passed
//! to the entry points: [`ArffOptions`] shapes the emitted document, while
//! [`ConversionConfig`] and [`BatchConfig`] add the file locations. Both are
//! serde-enabled so an orchestration layer can hand them over as JSON.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Relation name written after `@RELATION` and used as attribute prefix.
pub const DEFAULT_RELATION: &str = "Cog";

/// Name of the trailing class attribute.
pub const DEFAULT_LABEL: &str = "phenotype";

/// Values of the trailing class attribute.
pub const DEFAULT_LABEL_VALUES: [&str; 2] = ["Susceptible", "Resistant"];

/// Category values eggNOG-mapper uses for "no assignment".
pub const PLACEHOLDER_TOKENS: [&str; 2] = ["", "-"];

/// Options controlling how tokens become ARFF attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArffOptions {
    /// Relation name; also the `<relation>-<token>` attribute prefix.
    pub relation: String,
    /// Name of the nominal label attribute declared after the features.
    pub label: String,
    /// Allowed values of the label attribute.
    pub label_values: Vec<String>,
    /// Drop empty and `-` category tokens before counting.
    pub skip_placeholders: bool,
}

impl Default for ArffOptions {
    fn default() -> Self {
        Self {
            relation: DEFAULT_RELATION.to_string(),
            label: DEFAULT_LABEL.to_string(),
            label_values: DEFAULT_LABEL_VALUES.iter().map(|v| v.to_string()).collect(),
            skip_placeholders: false,
        }
    }
}

impl ArffOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_relation<S: Into<String>>(mut self, relation: S) -> Self {
        self.relation = relation.into();
        self
    }

    pub fn with_label<S: Into<String>>(mut self, label: S) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_label_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.label_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_skip_placeholders(mut self, skip: bool) -> Self {
        self.skip_placeholders = skip;
        self
    }

    /// Attribute name for a category token, e.g. `Cog-COG0001`.
    pub fn attribute_name(&self, token: &str) -> String {
        format!("{}-{}", self.relation, token)
    }

    /// Whether `token` should be counted under these options.
    pub fn keeps(&self, token: &str) -> bool {
        !(self.skip_placeholders && PLACEHOLDER_TOKENS.contains(&token))
    }
}

/// A single-sample conversion: one annotation table in, one ARFF file out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(default)]
    pub options: ArffOptions,
    /// Where to save the JSON statistics, if anywhere.
    #[serde(default)]
    pub stats: Option<PathBuf>,
}

impl ConversionConfig {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            options: ArffOptions::default(),
            stats: None,
        }
    }

    pub fn with_options(mut self, options: ArffOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_stats(mut self, path: impl Into<PathBuf>) -> Self {
        self.stats = Some(path.into());
        self
    }

    /// Load a config document written by an orchestration layer.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or is not a valid config.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
        serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse config {}", path.display()))
    }
}

/// A multi-sample conversion: many tables, one ARFF with a row per sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Explicit input files, converted in the given order.
    #[serde(default)]
    pub inputs: Vec<PathBuf>,
    /// Glob pattern whose matches are appended (sorted) after `inputs`.
    #[serde(default)]
    pub pattern: Option<String>,
    pub output: PathBuf,
    #[serde(default)]
    pub options: ArffOptions,
    #[serde(default)]
    pub stats: Option<PathBuf>,
    /// Worker threads for reading samples; `None` lets rayon decide.
    #[serde(default)]
    pub threads: Option<usize>,
}

impl BatchConfig {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            inputs: Vec::new(),
            pattern: None,
            output: output.into(),
            options: ArffOptions::default(),
            stats: None,
            threads: None,
        }
    }

    pub fn with_inputs<I, P>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.inputs.extend(inputs.into_iter().map(Into::into));
        self
    }

    pub fn with_pattern<S: Into<String>>(mut self, pattern: S) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_options(mut self, options: ArffOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_stats(mut self, path: impl Into<PathBuf>) -> Self {
        self.stats = Some(path.into());
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }
}
