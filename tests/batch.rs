//! Multi-sample conversions over the union schema.

use eggnog_arff::testing::{AnnotationTableBuilder, assert_arff_consistent};
use eggnog_arff::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn one_row_per_sample_over_union_schema() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let a = dir.path().join("a.emapper.annotations");
    let b = dir.path().join("b.emapper.annotations");
    AnnotationTableBuilder::new()
        .add_genes("COG0001@x", 2)
        .add_gene("COG0003@x")
        .write_to(&a)?;
    AnnotationTableBuilder::new()
        .add_gene("COG0002@x")
        .add_genes("COG0003@x", 3)
        .write_to(&b)?;
    let output = dir.path().join("all.arff");

    let cfg = BatchConfig::new(&output).with_inputs([&a, &b]).with_threads(2);
    let stats = convert_batch(&cfg)?;

    let arff = fs::read_to_string(&output)?;
    assert_arff_consistent(&arff);
    assert!(arff.ends_with("@DATA\n2,0,1,\n0,1,3,\n"));
    assert_eq!(stats.samples, 2);
    assert_eq!(stats.rows, 7);
    assert_eq!(stats.distinct_tokens, 3);

    let doc = read_arff(&arff)?;
    assert_eq!(doc.frequencies(1)?.total(), 4);
    Ok(())
}

#[test]
fn glob_rows_follow_sorted_paths() -> anyhow::Result<()> {
    let dir = tempdir()?;
    AnnotationTableBuilder::new()
        .add_gene("COG2@x")
        .write_to(dir.path().join("s2.emapper.annotations"))?;
    AnnotationTableBuilder::new()
        .add_gene("COG1@x")
        .write_to(dir.path().join("s1.emapper.annotations"))?;
    let output = dir.path().join("out.arff");
    let pattern = format!("{}/*.emapper.annotations", dir.path().display());

    convert_batch(&BatchConfig::new(&output).with_pattern(pattern))?;
    let arff = fs::read_to_string(&output)?;
    assert!(arff.ends_with("@DATA\n1,0,\n0,1,\n"));
    Ok(())
}

#[test]
fn one_bad_sample_fails_the_batch() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let good = dir.path().join("good.tsv");
    let bad = dir.path().join("bad.tsv");
    AnnotationTableBuilder::new().add_gene("COG1@x").write_to(&good)?;
    fs::write(&bad, "short\trow\n")?;
    let output = dir.path().join("out.arff");

    let result = convert_batch(&BatchConfig::new(&output).with_inputs([&good, &bad]));
    assert!(result.is_err());
    assert!(!output.exists());
    Ok(())
}

#[test]
fn empty_sample_contributes_zero_row() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let full = dir.path().join("full.tsv");
    let empty = dir.path().join("empty.tsv");
    AnnotationTableBuilder::new().add_genes("COG1@x", 2).write_to(&full)?;
    AnnotationTableBuilder::new().write_to(&empty)?;
    let output = dir.path().join("out.arff");

    convert_batch(&BatchConfig::new(&output).with_inputs([&full, &empty]))?;
    assert!(fs::read_to_string(&output)?.ends_with("@DATA\n2,\n0,\n"));
    Ok(())
}
