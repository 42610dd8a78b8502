//! Gzip side files
//!
//! Streams a document file to and from a compressed sibling. Neither
//! direction writes to its destination in place: output is staged and
//! renamed, so the primary document is never left half-inflated.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use super::error::{StoreError, StoreResult};
use super::persistence::{self, with_suffix};

/// Extension appended to a document's file name for its compressed copy
pub const GZIP_SUFFIX: &str = ".gz";

const INFLATE_SUFFIX: &str = ".inflate.tmp";

/// Default compressed path: the document's file name plus `.gz`
pub fn default_output(path: &Path) -> PathBuf {
    with_suffix(path, GZIP_SUFFIX)
}

/// Compress `source` into `output`
pub fn compress(source: &Path, output: &Path) -> StoreResult<()> {
    let input = open_source(source)?;
    let staged = persistence::temp_path(output);

    let result = (|| -> io::Result<()> {
        let mut reader = BufReader::new(input);
        let writer = BufWriter::new(File::create(&staged)?);
        let mut encoder = GzEncoder::new(writer, Compression::default());
        io::copy(&mut reader, &mut encoder)?;
        let mut writer = encoder.finish()?;
        writer.flush()?;
        std::fs::rename(&staged, output)
    })();

    result.map_err(|err| {
        persistence::discard(&staged);
        StoreError::IoFailed {
            path: output.to_path_buf(),
            source: err,
        }
    })
}

/// Inflate `source` into a staging file next to `target`
///
/// Returns the staging path; the caller decides whether to commit it.
pub fn decompress_staged(source: &Path, target: &Path) -> StoreResult<PathBuf> {
    let input = open_source(source)?;
    let staged = inflate_path(target);

    let result = (|| -> io::Result<()> {
        let mut decoder = GzDecoder::new(BufReader::new(input));
        let mut writer = BufWriter::new(File::create(&staged)?);
        io::copy(&mut decoder, &mut writer)?;
        writer.flush()?;
        writer.into_inner().map_err(|e| e.into_error())?.sync_all()
    })();

    match result {
        Ok(()) => Ok(staged),
        Err(err) => {
            persistence::discard(&staged);
            Err(StoreError::IoFailed {
                path: source.to_path_buf(),
                source: err,
            })
        }
    }
}

/// Staging path for an inflated document, distinct from the write staging file
fn inflate_path(target: &Path) -> PathBuf {
    with_suffix(target, INFLATE_SUFFIX)
}

fn open_source(source: &Path) -> StoreResult<File> {
    File::open(source).map_err(|e| StoreError::from_io(e, source.to_path_buf()))
}
