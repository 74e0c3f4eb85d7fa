//! MD5 checksums for exported files.
//!
//! The checksum recorded in metadata is always computed over the exact
//! byte stream of the exported file. For metadata-only generation the
//! object is serialized to a temporary file first so that the checksum
//! matches what a later export of the same object would produce.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use md5::{Digest, Md5};

use crate::objects::ObjectAdapter;

use super::ExportError;

/// Compute the MD5 hex digest of a file on disk.
pub(crate) fn md5_of_file(path: &Path) -> Result<String, ExportError> {
    let mut file = File::open(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut hasher = Md5::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = file.read(&mut buf).map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Compute the MD5 hex digest an export of `obj` would have.
///
/// The object is written to a temporary file with the proper extension
/// and hashed from disk, so format quirks like line endings are covered.
pub(crate) fn md5_of_object(obj: &dyn ObjectAdapter) -> Result<String, ExportError> {
    let extension = obj.extension();
    debug_assert!(extension.starts_with('.'));
    let tmp = tempfile::Builder::new()
        .prefix("fmuio-checksum-")
        .suffix(extension)
        .tempfile()
        .map_err(|source| ExportError::Io {
            path: Path::new(extension).to_path_buf(),
            source,
        })?;
    obj.write_to(tmp.path())?;
    md5_of_file(tmp.path())
}
