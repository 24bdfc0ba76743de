//! Transparent compression for annotation inputs and ARFF outputs.
//!
//! eggNOG-mapper tables are often archived compressed. Readers are wrapped by
//! looking at the file extension first and, when that says nothing, at the
//! first bytes of the stream. Writers are wrapped by extension only.
//!
//! Available codecs depend on feature flags:
//! - **Gzip** (`.gz`) - `flate2`, feature `compression-gzip`
//! - **Zstd** (`.zst`) - `zstd`, feature `compression-zstd`
//! - **Bzip2** (`.bz2`) - `bzip2`, feature `compression-bzip2`
//! - **Xz** (`.xz`) - `xz2`, feature `compression-xz`
//!
//! With every feature disabled both functions are plain pass-throughs.
//!
//! Compressed streams end with a trailer that is only written when the
//! encoder is finished, so writers come back as [`FinishWrite`] and callers
//! must call [`FinishWrite::finish_write`] to see any error it raises.

use anyhow::{Context, Result};
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

type ReaderWrap = fn(Box<dyn Read>) -> io::Result<Box<dyn Read>>;
type WriterWrap = fn(Box<dyn Write>) -> io::Result<Box<dyn FinishWrite>>;

/// A writer that must be finished explicitly.
pub trait FinishWrite: Write {
    /// Write any trailer, flush, and release the underlying writer.
    fn finish_write(self: Box<Self>) -> io::Result<()>;
}

impl<W: Write> FinishWrite for BufWriter<W> {
    fn finish_write(self: Box<Self>) -> io::Result<()> {
        self.into_inner().map_err(|e| e.into_error())?.flush()
    }
}

/// A compression format known at build time.
pub struct Codec {
    pub name: &'static str,
    /// Lowercase extensions including the leading dot.
    pub extensions: &'static [&'static str],
    pub magic: &'static [u8],
    wrap_reader: ReaderWrap,
    wrap_writer: WriterWrap,
}

static CODECS: &[Codec] = &[
    #[cfg(feature = "compression-gzip")]
    Codec {
        name: "gzip",
        extensions: &[".gz", ".gzip"],
        magic: &[0x1f, 0x8b],
        wrap_reader: gzip::reader,
        wrap_writer: gzip::writer,
    },
    #[cfg(feature = "compression-zstd")]
    Codec {
        name: "zstd",
        extensions: &[".zst", ".zstd"],
        magic: &[0x28, 0xb5, 0x2f, 0xfd],
        wrap_reader: zstd_codec::reader,
        wrap_writer: zstd_codec::writer,
    },
    #[cfg(feature = "compression-bzip2")]
    Codec {
        name: "bzip2",
        extensions: &[".bz2", ".bzip2"],
        magic: &[0x42, 0x5a, 0x68],
        wrap_reader: bzip2_codec::reader,
        wrap_writer: bzip2_codec::writer,
    },
    #[cfg(feature = "compression-xz")]
    Codec {
        name: "xz",
        extensions: &[".xz"],
        magic: &[0xfd, 0x37, 0x7a, 0x58, 0x5a, 0x00],
        wrap_reader: xz::reader,
        wrap_writer: xz::writer,
    },
];

/// Codec whose extension matches `path`, case-insensitively.
pub fn codec_for_path(path: impl AsRef<Path>) -> Option<&'static Codec> {
    let name = path.as_ref().to_string_lossy().to_lowercase();
    CODECS
        .iter()
        .find(|c| c.extensions.iter().any(|ext| name.ends_with(ext)))
}

/// Codec whose signature starts the buffered stream. The reader is not advanced.
fn codec_for_magic<R: BufRead>(reader: &mut R) -> Option<&'static Codec> {
    let head = reader.fill_buf().ok()?;
    CODECS
        .iter()
        .find(|c| !c.magic.is_empty() && head.starts_with(c.magic))
}

/// Wrap `reader` with a decompressor if `path_hint` or the stream content
/// says it is compressed.
///
/// # Errors
/// Returns an error if the decompressor cannot be set up.
pub fn auto_detect_reader<R: Read + 'static>(
    reader: R,
    path_hint: impl AsRef<Path>,
) -> Result<Box<dyn Read>> {
    if let Some(codec) = codec_for_path(&path_hint) {
        return (codec.wrap_reader)(Box::new(reader))
            .with_context(|| format!("wrap reader with {} codec", codec.name));
    }

    let mut buffered = BufReader::new(reader);
    if let Some(codec) = codec_for_magic(&mut buffered) {
        return (codec.wrap_reader)(Box::new(buffered))
            .with_context(|| format!("wrap reader with {} codec", codec.name));
    }

    Ok(Box::new(buffered))
}

/// Wrap `writer` with a compressor chosen by the extension of `path_hint`,
/// or a plain buffer when there is none.
///
/// Nothing is guaranteed to reach `writer` until the result is finished.
///
/// # Errors
/// Returns an error if the compressor cannot be set up.
pub fn auto_detect_writer<W: Write + 'static>(
    writer: W,
    path_hint: impl AsRef<Path>,
) -> Result<Box<dyn FinishWrite>> {
    if let Some(codec) = codec_for_path(&path_hint) {
        return (codec.wrap_writer)(Box::new(writer))
            .with_context(|| format!("wrap writer with {} codec", codec.name));
    }
    Ok(Box::new(BufWriter::new(writer)))
}

#[cfg(feature = "compression-gzip")]
mod gzip {
    use super::*;
    use flate2::Compression;
    use flate2::read::MultiGzDecoder;
    use flate2::write::GzEncoder;

    impl FinishWrite for GzEncoder<Box<dyn Write>> {
        fn finish_write(self: Box<Self>) -> io::Result<()> {
            self.finish()?.flush()
        }
    }

    // Multi-member so bgzip'd tables decode completely.
    pub(super) fn reader(r: Box<dyn Read>) -> io::Result<Box<dyn Read>> {
        Ok(Box::new(MultiGzDecoder::new(r)))
    }

    pub(super) fn writer(w: Box<dyn Write>) -> io::Result<Box<dyn FinishWrite>> {
        Ok(Box::new(GzEncoder::new(w, Compression::default())))
    }
}

#[cfg(feature = "compression-zstd")]
mod zstd_codec {
    use super::*;
    use zstd::stream::write::Encoder;

    impl FinishWrite for Encoder<'static, Box<dyn Write>> {
        fn finish_write(self: Box<Self>) -> io::Result<()> {
            self.finish()?.flush()
        }
    }

    pub(super) fn reader(r: Box<dyn Read>) -> io::Result<Box<dyn Read>> {
        zstd::stream::read::Decoder::new(r).map(|d| Box::new(d) as Box<dyn Read>)
    }

    pub(super) fn writer(w: Box<dyn Write>) -> io::Result<Box<dyn FinishWrite>> {
        Encoder::new(w, 3).map(|e| Box::new(e) as Box<dyn FinishWrite>)
    }
}

#[cfg(feature = "compression-bzip2")]
mod bzip2_codec {
    use super::*;
    use bzip2::Compression;
    use bzip2::read::MultiBzDecoder;
    use bzip2::write::BzEncoder;

    impl FinishWrite for BzEncoder<Box<dyn Write>> {
        fn finish_write(self: Box<Self>) -> io::Result<()> {
            self.finish()?.flush()
        }
    }

    pub(super) fn reader(r: Box<dyn Read>) -> io::Result<Box<dyn Read>> {
        Ok(Box::new(MultiBzDecoder::new(r)))
    }

    pub(super) fn writer(w: Box<dyn Write>) -> io::Result<Box<dyn FinishWrite>> {
        Ok(Box::new(BzEncoder::new(w, Compression::default())))
    }
}

#[cfg(feature = "compression-xz")]
mod xz {
    use super::*;
    use xz2::read::XzDecoder;
    use xz2::write::XzEncoder;

    impl FinishWrite for XzEncoder<Box<dyn Write>> {
        fn finish_write(self: Box<Self>) -> io::Result<()> {
            self.finish()?.flush()
        }
    }

    pub(super) fn reader(r: Box<dyn Read>) -> io::Result<Box<dyn Read>> {
        Ok(Box::new(XzDecoder::new_multi_decoder(r)))
    }

    pub(super) fn writer(w: Box<dyn Write>) -> io::Result<Box<dyn FinishWrite>> {
        Ok(Box::new(XzEncoder::new(w, 6)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn plain_text_passes_through() -> Result<()> {
        let mut out = String::new();
        auto_detect_reader(Cursor::new(b"q1\tCOG1@x\n".to_vec()), "a.annotations")?
            .read_to_string(&mut out)?;
        assert_eq!(out, "q1\tCOG1@x\n");
        Ok(())
    }

    #[test]
    fn unknown_extension_has_no_codec() {
        assert!(codec_for_path("sample.emapper.annotations").is_none());
    }

    #[cfg(feature = "compression-gzip")]
    #[test]
    fn gzip_detected_by_extension_and_magic() -> Result<()> {
        assert_eq!(
            codec_for_path("S1.emapper.annotations.GZ").map(|c| c.name),
            Some("gzip")
        );

        let mut buf = Vec::new();
        {
            let mut enc = flate2::write::GzEncoder::new(&mut buf, flate2::Compression::default());
            enc.write_all(b"hello\n")?;
            enc.finish()?;
        }
        let mut out = String::new();
        auto_detect_reader(Cursor::new(buf), "no-extension")?.read_to_string(&mut out)?;
        assert_eq!(out, "hello\n");
        Ok(())
    }

    /// Accepts `room` bytes, then fails like a full disk.
    struct Full {
        room: usize,
    }

    impl Write for Full {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.room == 0 {
                return Err(io::Error::other("no space left on device"));
            }
            let n = buf.len().min(self.room);
            self.room -= n;
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn plain_writer_reports_error_on_finish() -> Result<()> {
        let mut w = auto_detect_writer(Full { room: 2 }, "out.arff")?;
        // Buffered, so the short write only surfaces when finishing.
        w.write_all(b"@RELATION    Cog\n")?;
        assert!(w.finish_write().is_err());
        Ok(())
    }

    #[cfg(feature = "compression-gzip")]
    #[test]
    fn gzip_trailer_error_is_reported() -> Result<()> {
        // Room for the 10-byte gzip header only.
        let mut w = auto_detect_writer(Full { room: 10 }, "out.arff.gz")?;
        w.write_all(b"2,1,\n")?;
        let err = w.finish_write().unwrap_err();
        assert_eq!(err.to_string(), "no space left on device");
        Ok(())
    }
}
