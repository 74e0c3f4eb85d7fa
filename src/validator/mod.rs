//! # Export Validation Module
//!
//! After-the-fact integrity checks for exported files and their metadata
//! sidecars. Validation answers the question a consumer pipeline asks
//! before indexing a file: is the metadata present, well formed, and does
//! it still describe the bytes on disk?
//!
//! ## Validation Checklist
//!
//! 1. **Structure Check**: the data file and its sidecar exist
//! 2. **Document Check**: the sidecar parses and carries the expected
//!    version, source and class
//! 3. **Integrity Check**: the recorded checksum and paths match the file
//!    on disk
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fmuio::validator::validate_export;
//! use std::path::Path;
//!
//! let report = validate_export(Path::new("share/results/maps/topvolantis.gri"))?;
//! println!("{report}");
//! # anyhow::Ok(())
//! ```

use std::path::Path;

use anyhow::Result;

pub use report::{CheckStatus, ValidationCheck, ValidationReport};

mod document;
mod integrity;
mod report;
mod structure;


/// Validation error types
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// The data file or its sidecar is missing or unreadable.
    #[error("Structure error: {0}")]
    StructureError(String),

    /// The sidecar content is not a metadata document.
    #[error("Document error: {0}")]
    DocumentError(String),

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Validate one exported data file against its metadata sidecar.
///
/// Fatal problems end validation early with an error: a missing data
/// file, a missing sidecar, a sidecar that does not parse. Everything
/// else is collected as checks in the returned [`ValidationReport`] and
/// judged by the caller via [`ValidationReport::has_failures`].
pub fn validate_export(path: &Path) -> Result<ValidationReport> {
    let mut report = ValidationReport::new(path.display().to_string());

    // 1. Structure Check
    let metafile = structure::check_structure(path, &mut report)?;

    // 2. Document Check
    let document = document::check_document(&metafile, &mut report)?;

    // 3. Integrity Check
    integrity::check_integrity(path, &document, &mut report)?;

    Ok(report)
}
