//! # Export Object Module
//!
//! The exporter is generic over *what* is being exported through the
//! [`ObjectAdapter`] trait: an adapter knows its object class, which kind
//! folder and extension it uses, how to describe itself for the metadata
//! `data` block, and how to serialize itself to a file.
//!
//! Built-in adapters cover the common payloads:
//!
//! | Adapter | class | folder | format |
//! |---|---|---|---|
//! | [`RegularSurface`] | `surface` | `maps` | Irap ASCII (`.gri`) |
//! | [`Table`] | `table` | `tables` | CSV |
//! | [`PointSet`] | `points` | `points` | CSV |
//! | [`Polygons`] | `polygons` | `polygons` | CSV |
//! | [`DictObject`] | `dictionary` | `dictionaries` | JSON |
//!
//! All serializations are deterministic: the same object always produces
//! byte-identical files, which is what makes sidecar checksums meaningful.

mod dict;
mod points;
mod surface;
mod table;


pub use dict::DictObject;
pub use points::{Point, PointSet, Polygons};
pub use surface::RegularSurface;
pub use table::{Table, TableValue};

use std::path::Path;

use serde_json::Value;
use thiserror::Error;

/// Errors from object validation and serialization.
#[derive(Error, Debug)]
pub enum ObjectError {
    /// Grid dimensions do not match the number of values.
    #[error("Surface has {expected} nodes (ncol*nrow) but {actual} values")]
    DimensionMismatch {
        /// ncol * nrow.
        expected: usize,
        /// Length of the value vector.
        actual: usize,
    },

    /// A table row has a different width than the header.
    #[error("Table row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        /// Zero-based row index.
        row: usize,
        /// Number of columns in the header.
        expected: usize,
        /// Number of cells in the row.
        actual: usize,
    },

    /// Writing the serialized object failed.
    #[error("Failed to write object to file")]
    Io(#[from] std::io::Error),

    /// CSV serialization failed.
    #[error("Failed to serialize object as CSV")]
    Csv(#[from] csv::Error),

    /// JSON serialization failed.
    #[error("Failed to serialize object as JSON")]
    Json(#[from] serde_json::Error),
}

/// An exportable object.
///
/// Implementations must serialize deterministically, and `extension` must
/// include the leading dot. `bbox` and `spec` feed the metadata `data`
/// block and may be `None` for objects without geometry.
pub trait ObjectAdapter {
    /// Object class stored in the metadata root, e.g. `surface`.
    fn classname(&self) -> &str;

    /// Kind folder below `share/<class>/`, e.g. `maps`.
    fn efolder(&self) -> &str;

    /// File extension including the leading dot, e.g. `.gri`.
    fn extension(&self) -> &str;

    /// File format name stored in `data.format`, e.g. `irap_ascii`.
    fn format(&self) -> &str;

    /// Layout descriptor for `data.layout`, when the class has one.
    fn layout(&self) -> Option<&str> {
        None
    }

    /// Name carried by the object itself, used when settings give none.
    fn name_hint(&self) -> Option<&str> {
        None
    }

    /// Bounding box for `data.bbox`.
    fn bbox(&self) -> Option<Value> {
        None
    }

    /// Shape description for `data.spec`.
    fn spec(&self) -> Option<Value> {
        None
    }

    /// Serialize the object to `path`.
    fn write_to(&self, path: &Path) -> Result<(), ObjectError>;
}
