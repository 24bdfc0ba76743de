//! End-to-end conversions.
//!
//! Each entry point runs the same stages: read category tokens, count them,
//! infer the schema, pivot into rows, render ARFF. Output is rendered fully in
//! memory before anything is written.

use crate::arff::render_arff;
use crate::config::{ArffOptions, BatchConfig, ConversionConfig};
use crate::frequency::FrequencyTable;
use crate::io::annotations::{read_category_tokens, read_category_tokens_file};
use crate::io::glob::expand_inputs;
use crate::io::write_atomic;
use crate::metrics::ConversionStats;
use crate::pivot::FeatureMatrix;
use anyhow::{Context, Result};
use log::{debug, info};
use rayon::prelude::*;
use std::io::Read;
use std::path::PathBuf;
use std::time::Instant;

/// Count tokens, dropping placeholders when the options ask for it.
///
/// Counting runs on the current rayon pool.
pub fn count_tokens(tokens: &[String], options: &ArffOptions) -> FrequencyTable {
    FrequencyTable::from_par_tokens(
        tokens
            .par_iter()
            .filter(|t| options.keeps(t))
            .map(String::as_str),
    )
}

/// Convert an in-memory annotation table into ARFF text.
///
/// # Errors
/// Returns an error if the table has a short row.
pub fn convert_bytes(input: &[u8], options: &ArffOptions) -> Result<String> {
    convert_reader(input, options).map(|(text, _)| text)
}

/// Convert an annotation table from any reader.
///
/// # Errors
/// Returns an error if reading fails or the table has a short row.
pub fn convert_reader<R: Read>(
    reader: R,
    options: &ArffOptions,
) -> Result<(String, ConversionStats)> {
    let start = Instant::now();
    let tokens = read_category_tokens(reader)?;
    let mut stats = ConversionStats::default();
    stats.record_tokens(&tokens);

    let table = count_tokens(&tokens, options);
    stats.record_table(&table);
    let matrix = FeatureMatrix::from_table(&table);
    debug!(
        "{} rows, {} distinct tokens",
        tokens.len(),
        matrix.schema().len()
    );

    let text = render_arff(&matrix, options);
    stats.finish(matrix.schema().len(), start.elapsed());
    Ok((text, stats))
}

/// Convert one annotation file into one ARFF file.
///
/// # Errors
/// Returns an error if the input cannot be read, has a short row, or the
/// output (or the optional stats file) cannot be written. Nothing is written
/// when the input is rejected.
pub fn convert_file(config: &ConversionConfig) -> Result<ConversionStats> {
    let start = Instant::now();
    info!(
        "converting {} -> {}",
        config.input.display(),
        config.output.display()
    );

    let tokens = read_category_tokens_file(&config.input)?;
    let mut stats = ConversionStats::default();
    stats.record_tokens(&tokens);

    let table = count_tokens(&tokens, &config.options);
    stats.record_table(&table);
    let matrix = FeatureMatrix::from_table(&table);
    let text = render_arff(&matrix, &config.options);

    write_atomic(&config.output, text.as_bytes())
        .with_context(|| format!("write {}", config.output.display()))?;
    stats.finish(matrix.schema().len(), start.elapsed());

    if let Some(path) = &config.stats {
        stats.save_to_file(path)?;
    }
    Ok(stats)
}

/// Convert several annotation files into one ARFF with a row per sample.
///
/// Samples are read in parallel; rows keep the input order (explicit inputs
/// first, then sorted pattern matches). Columns are the union of all samples'
/// tokens, with 0 where a sample lacks a token.
///
/// # Errors
/// Returns an error if no inputs resolve, any input fails to read, or the
/// output cannot be written. One bad sample aborts the whole batch.
pub fn convert_batch(config: &BatchConfig) -> Result<ConversionStats> {
    let start = Instant::now();
    let inputs = expand_inputs(&config.inputs, config.pattern.as_deref())?;
    info!(
        "converting {} sample(s) -> {}",
        inputs.len(),
        config.output.display()
    );

    let tokens = match config.threads {
        Some(n) => rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build()
            .context("build reader thread pool")?
            .install(|| read_all(&inputs))?,
        None => read_all(&inputs)?,
    };

    let mut stats = ConversionStats::default();
    let mut tables = Vec::with_capacity(tokens.len());
    for (i, (path, toks)) in inputs.iter().zip(&tokens).enumerate() {
        stats.record_tokens(toks);
        let table = count_tokens(toks, &config.options);
        stats.record_table(&table);
        debug!(
            "row {}: {} ({} rows, {} tokens)",
            i + 1,
            path.display(),
            toks.len(),
            table.len()
        );
        tables.push(table);
    }

    let matrix = FeatureMatrix::from_tables(&tables);
    let text = render_arff(&matrix, &config.options);
    write_atomic(&config.output, text.as_bytes())
        .with_context(|| format!("write {}", config.output.display()))?;
    stats.finish(matrix.schema().len(), start.elapsed());

    if let Some(path) = &config.stats {
        stats.save_to_file(path)?;
    }
    Ok(stats)
}

fn read_all(inputs: &[PathBuf]) -> Result<Vec<Vec<String>>> {
    inputs
        .par_iter()
        .map(|p| read_category_tokens_file(p))
        .collect::<Result<Vec<_>>>()
}
