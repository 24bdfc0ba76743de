//! Resolving batch inputs from glob patterns.
//!
//! Batch conversions name their samples either explicitly, by pattern (for
//! example `annotations/*.emapper.annotations`), or both. Pattern matches are
//! sorted so the row order of the resulting ARFF is reproducible.

use anyhow::{Context, Result, bail};
use glob::glob;
use std::path::PathBuf;

/// Expand a glob pattern into sorted file paths. Directories are skipped.
///
/// # Errors
/// Returns an error if the pattern is invalid or a matched entry cannot be
/// read. No matches is not an error here.
pub fn expand_glob(pattern: &str) -> Result<Vec<PathBuf>> {
    let paths = glob(pattern).with_context(|| format!("invalid glob pattern: {pattern}"))?;

    let mut result = Vec::new();
    for entry in paths {
        let path =
            entry.with_context(|| format!("error reading glob entry for pattern: {pattern}"))?;
        if path.is_file() {
            result.push(path);
        }
    }
    result.sort();
    Ok(result)
}

/// Explicit inputs in their given order, then the sorted pattern matches.
///
/// Every path is kept once, at its first position: repeated explicit inputs
/// and pattern matches that were also listed explicitly are dropped.
///
/// # Errors
/// Returns an error if the pattern is invalid, matches nothing, or if the
/// combined list is empty.
pub fn expand_inputs(inputs: &[PathBuf], pattern: Option<&str>) -> Result<Vec<PathBuf>> {
    let matched = match pattern {
        Some(pattern) => {
            let matched = expand_glob(pattern)?;
            if matched.is_empty() {
                bail!("no files found matching pattern: {pattern}");
            }
            matched
        }
        None => Vec::new(),
    };

    let mut out: Vec<PathBuf> = Vec::with_capacity(inputs.len() + matched.len());
    for path in inputs.iter().cloned().chain(matched) {
        if !out.contains(&path) {
            out.push(path);
        }
    }
    if out.is_empty() {
        bail!("no annotation files given");
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn matches_sorted_files_only() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("b.emapper.annotations"), "")?;
        fs::write(dir.path().join("a.emapper.annotations"), "")?;
        fs::create_dir(dir.path().join("c.emapper.annotations"))?;
        let pattern = format!("{}/*.emapper.annotations", dir.path().display());
        let files = expand_glob(&pattern)?;
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.emapper.annotations", "b.emapper.annotations"]);
        Ok(())
    }

    #[test]
    fn explicit_inputs_first_without_duplicates() -> Result<()> {
        let dir = tempdir()?;
        let a = dir.path().join("a.tsv");
        let b = dir.path().join("b.tsv");
        fs::write(&a, "")?;
        fs::write(&b, "")?;
        let pattern = format!("{}/*.tsv", dir.path().display());
        let files = expand_inputs(std::slice::from_ref(&b), Some(&pattern))?;
        assert_eq!(files, vec![b, a]);
        Ok(())
    }

    #[test]
    fn repeated_explicit_input_kept_once() -> Result<()> {
        let a = PathBuf::from("a.tsv");
        let b = PathBuf::from("b.tsv");
        let files = expand_inputs(&[a.clone(), b.clone(), a.clone()], None)?;
        assert_eq!(files, vec![a, b]);
        Ok(())
    }

    #[test]
    fn nothing_to_convert_is_an_error() {
        assert!(expand_inputs(&[], None).is_err());
        assert!(expand_inputs(&[], Some("/definitely/not/here/*.tsv")).is_err());
    }
}
