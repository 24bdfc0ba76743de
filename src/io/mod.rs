pub mod annotations;
pub mod compression;
pub mod glob;

use crate::error::ConvertError;
use anyhow::{Context, Result};
use compression::{FinishWrite, auto_detect_writer};
use std::fs::create_dir_all;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Write `contents` to `path` all at once.
///
/// The bytes go to a temporary file next to `path` which then replaces it, so
/// a failed write never leaves a truncated document behind. Output is
/// compressed when the extension of `path` names a codec.
///
/// # Errors
/// [`ConvertError::Io`] if the directory, the temporary file, finishing the
/// (possibly compressed) stream, or the final rename fails. The target is left
/// untouched in every case.
pub fn write_atomic(path: impl AsRef<Path>, contents: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    create_dir_all(dir).map_err(|e| ConvertError::io(dir, e))?;

    let tmp = NamedTempFile::new_in(dir).map_err(|e| ConvertError::io(dir, e))?;
    {
        let file = tmp.reopen().map_err(|e| ConvertError::io(tmp.path(), e))?;
        let mut w = auto_detect_writer(file, path)
            .with_context(|| format!("setup compression for {}", path.display()))?;
        w.write_all(contents)
            .map_err(|e| ConvertError::io(tmp.path(), e))?;
        w.finish_write()
            .map_err(|e| ConvertError::io(tmp.path(), e))?;
    }
    tmp.persist(path)
        .map_err(|e| ConvertError::io(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn creates_parent_and_replaces_file() -> Result<()> {
        let dir = tempdir()?;
        let out = dir.path().join("nested/out.arff");
        write_atomic(&out, b"first\n")?;
        write_atomic(&out, b"second\n")?;
        assert_eq!(fs::read_to_string(&out)?, "second\n");
        let leftovers = fs::read_dir(out.parent().unwrap())?.count();
        assert_eq!(leftovers, 1);
        Ok(())
    }
}
