//! File-based conversions: compression, atomic output, error reporting.

use eggnog_arff::testing::{AnnotationTableBuilder, annotation_table};
use eggnog_arff::*;
use std::fs;
use std::io::Write;
use tempfile::tempdir;

#[test]
fn converts_file_and_saves_stats() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("genome.emapper.annotations");
    let output = dir.path().join("out/genome.arff");
    let stats_path = dir.path().join("genome.stats.json");
    AnnotationTableBuilder::new()
        .add_genes("COG0001@bactNOG", 2)
        .add_gene("COG0002@bactNOG")
        .write_to(&input)?;

    let cfg = ConversionConfig::new(&input, &output).with_stats(&stats_path);
    let stats = convert_file(&cfg)?;

    assert_eq!(fs::read_to_string(&output)?.lines().last(), Some("2,1,"));
    assert_eq!(stats.rows, 3);
    assert_eq!(stats.distinct_tokens, 2);
    let saved: ConversionStats = serde_json::from_str(&fs::read_to_string(&stats_path)?)?;
    assert_eq!(saved, stats);
    Ok(())
}

#[test]
fn malformed_row_aborts_without_output() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("bad.emapper.annotations");
    let output = dir.path().join("bad.arff");
    AnnotationTableBuilder::new()
        .add_gene("COG1@x")
        .add_raw("gene_2\tseed\t1e-10\t200.0\tCOG2@x")
        .write_to(&input)?;

    let err = convert_file(&ConversionConfig::new(&input, &output)).unwrap_err();
    let kind = err
        .chain()
        .find_map(|e| e.downcast_ref::<ConvertError>())
        .expect("typed error in chain");
    assert!(matches!(
        kind,
        ConvertError::MalformedRow {
            found: 5,
            expected: 21,
            ..
        }
    ));
    assert!(!output.exists());
    Ok(())
}

#[test]
fn failed_conversion_keeps_previous_output() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("bad.tsv");
    let output = dir.path().join("keep.arff");
    fs::write(&output, "previous\n")?;
    fs::write(&input, "too\tshort\n")?;

    assert!(convert_file(&ConversionConfig::new(&input, &output)).is_err());
    assert_eq!(fs::read_to_string(&output)?, "previous\n");
    Ok(())
}

#[test]
fn missing_input_is_io_failure() {
    let dir = tempdir().unwrap();
    let cfg = ConversionConfig::new(dir.path().join("absent.tsv"), dir.path().join("o.arff"));
    let err = convert_file(&cfg).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConvertError>(),
        Some(ConvertError::Io { .. })
    ));
}

#[test]
fn unwritable_output_is_reported() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("in.tsv");
    fs::write(&input, annotation_table(&["COG1@x"]))?;
    let blocker = dir.path().join("file");
    fs::write(&blocker, "")?;
    // A regular file cannot be used as a directory.
    let cfg = ConversionConfig::new(&input, blocker.join("out.arff"));
    assert!(convert_file(&cfg).is_err());
    Ok(())
}

#[test]
fn config_loaded_from_json() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("in.tsv");
    let output = dir.path().join("out.arff");
    fs::write(&input, annotation_table(&["COG1@x", "-"]))?;
    let cfg_path = dir.path().join("config.json");
    let doc = serde_json::json!({
        "input": input,
        "output": output,
        "options": { "relation": "OG", "skip_placeholders": true }
    });
    fs::write(&cfg_path, serde_json::to_vec(&doc)?)?;

    let cfg = ConversionConfig::from_json_file(&cfg_path)?;
    assert_eq!(cfg.options.label, "phenotype");
    convert_file(&cfg)?;
    assert_eq!(
        fs::read_to_string(&output)?,
        "@RELATION    OG\n@ATTRIBUTE OG-COG1    REAL\n@ATTRIBUTE phenotype      {Susceptible, Resistant}\n@DATA\n1,\n"
    );
    Ok(())
}

#[cfg(feature = "compression-gzip")]
#[test]
fn gzip_input_and_output() -> anyhow::Result<()> {
    use flate2::Compression;
    use flate2::read::GzDecoder;
    use flate2::write::GzEncoder;
    use std::io::Read;

    let dir = tempdir()?;
    let input = dir.path().join("genome.emapper.annotations.gz");
    let output = dir.path().join("genome.arff.gz");
    {
        let mut enc = GzEncoder::new(fs::File::create(&input)?, Compression::default());
        enc.write_all(annotation_table(&["COG5@x", "COG5@y", "COG4"]).as_bytes())?;
        enc.finish()?;
    }

    convert_file(&ConversionConfig::new(&input, &output))?;

    let mut text = String::new();
    GzDecoder::new(fs::File::open(&output)?).read_to_string(&mut text)?;
    assert!(text.ends_with("@DATA\n1,2,\n"));
    Ok(())
}

#[cfg(feature = "compression-zstd")]
#[test]
fn zstd_input() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("genome.tsv.zst");
    let output = dir.path().join("genome.arff");
    let compressed = zstd::encode_all(annotation_table(&["COG8@x"]).as_bytes(), 3)?;
    fs::write(&input, compressed)?;

    let stats = convert_file(&ConversionConfig::new(&input, &output))?;
    assert_eq!(stats.rows, 1);
    assert!(fs::read_to_string(&output)?.ends_with("1,\n"));
    Ok(())
}

#[cfg(feature = "compression-zstd")]
#[test]
fn zstd_output_is_a_complete_frame() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("genome.tsv");
    let output = dir.path().join("genome.arff.zst");
    fs::write(&input, annotation_table(&["COG8@x", "COG9@x", "COG8@y"]))?;

    convert_file(&ConversionConfig::new(&input, &output))?;

    // decode_all rejects a frame without its end marker.
    let text = String::from_utf8(zstd::decode_all(fs::File::open(&output)?)?)?;
    assert!(text.ends_with("@DATA\n2,1,\n"));
    Ok(())
}

#[cfg(feature = "compression-gzip")]
#[test]
fn typed_rows_from_gzip_file() -> anyhow::Result<()> {
    use eggnog_arff::io::annotations::read_annotations_file;
    use flate2::Compression;
    use flate2::write::GzEncoder;

    let dir = tempdir()?;
    let input = dir.path().join("genome.emapper.annotations.gz");
    {
        let table = AnnotationTableBuilder::new()
            .add_gene("COG0001@1|root,COG0001@2|Bacteria")
            .add_gene("-")
            .build();
        let mut enc = GzEncoder::new(fs::File::create(&input)?, Compression::default());
        enc.write_all(table.as_bytes())?;
        enc.finish()?;
    }

    let rows = read_annotations_file(&input)?;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].query, "gene_1");
    assert_eq!(rows[0].category_token(), "COG0001");
    assert_eq!(rows[1].category_token(), "-");
    Ok(())
}
