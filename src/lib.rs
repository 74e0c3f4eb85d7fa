//! # fmuio - FMU Export Metadata Engine
//!
//! `fmuio` produces deterministic, schema-conformant metadata and output
//! file locations for artifacts of FMU (Fast Model Update) simulation
//! pipelines. Given a data object, export settings and a global
//! configuration, it decides where the file belongs inside the FMU folder
//! tree, what it is called, and writes a YAML metadata document next to
//! it that downstream consumers index on.
//!
//! ## Key Features
//!
//! - **Deterministic placement**: Exports land in a fixed tree below the
//!   case or realization root, `share/<class>/<efolder>/...`, so the same
//!   inputs always produce the same location.
//!
//! - **Predictable naming**: File stems are composed from name, parent,
//!   tag and sampling dates with strict lowercasing and transliteration,
//!   never from free-form user text.
//!
//! - **Sidecar metadata**: Every export can carry a hidden
//!   `.<name>.<ext>.yml` document with provenance, access, masterdata and
//!   an MD5 checksum of the written bytes.
//!
//! - **Context awareness**: The engine detects whether it runs inside an
//!   FMU realization, at case level, or detached, and adjusts placement
//!   and provenance accordingly.
//!
//! - **Data before metadata**: An invalid global configuration never
//!   blocks the data file; the export proceeds and only the metadata is
//!   skipped, with a diagnostic.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fmuio::content::Content;
//! use fmuio::export::{ExportOverrides, ExportSettings, Exporter};
//! use fmuio::objects::RegularSurface;
//!
//! # fn example(config: serde_yaml::Value) -> anyhow::Result<()> {
//! // Base settings shared by all exports of this job
//! let mut settings = ExportSettings::new();
//! settings.content = Content::Depth;
//! settings.unit = "m".to_string();
//!
//! let exporter = Exporter::with_settings(Some(config), settings);
//!
//! // A 2x2 surface with one undefined node
//! let surface = RegularSurface::new(
//!     "TopVolantis",
//!     2, 2,
//!     0.0, 0.0, 50.0, 50.0, 0.0,
//!     vec![1500.0, 1510.0, f64::NAN, 1520.0],
//! )?;
//!
//! let outcome = exporter.export(&surface, &ExportOverrides::none())?;
//! println!("data:     {}", outcome.path.display());
//! if let Some(meta) = &outcome.metadata_path {
//!     println!("metadata: {}", meta.display());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Inside a realization run this creates:
//!
//! ```text
//! <case>/realization-0/iter-0/share/results/maps/
//! ├── topvolantis.gri        # Irap ASCII surface
//! └── .topvolantis.gri.yml   # metadata document
//! ```
//!
//! ## Architecture
//!
//! The library is organized into the following modules:
//!
//! - [`content`]: the controlled vocabulary of what exported data *is*
//! - [`context`]: run environment detection and context resolution
//! - [`filename`]: deterministic file stem construction
//! - [`paths`]: destination resolution inside the FMU folder tree
//! - [`config`]: the global configuration and its validity rules
//! - [`metadata`]: the metadata document and its blocks
//! - [`objects`]: exportable data objects and their serializations
//! - [`case`]: case-level metadata (`fmu_case.yml`)
//! - [`export`]: the orchestrating [`export::Exporter`]
//! - [`validator`]: after-the-fact checks of exported files
//!
//! ## Metadata Document
//!
//! The sidecar document follows the 0.8.0 dialect. Its top-level blocks:
//!
//! | Block | Required | Content |
//! |-------|----------|---------|
//! | version | Yes | Schema version of the document |
//! | source | Yes | Always `fmu` |
//! | class | Yes | Object class (`surface`, `table`, ...) |
//! | tracklog | Yes | Events with timestamp and user |
//! | file | Yes | Relative/absolute paths, checksum |
//! | data | Yes | Name, content, unit, spec, bbox, time |
//! | access | Yes | Asset, classification, SSDL block |
//! | fmu | No | Model, case, realization, iteration |
//! | display | No | Display name hint |
//! | masterdata | No | SMDA identity from the configuration |
//! | _preprocessed | No | Marker for data awaiting a case |

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![allow(clippy::too_many_arguments)]

pub mod case;
pub mod config;
pub mod content;
pub mod context;
pub mod export;
pub mod filename;
pub mod metadata;
pub mod objects;
pub mod paths;
pub mod validator;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::case::CaseDocument;
    pub use crate::config::{evaluate, read_config_file, Classification, ConfigValidity, GlobalConfig};
    pub use crate::content::Content;
    pub use crate::context::{FmuContext, RunEnvironment};
    pub use crate::export::{
        read_metadata, ExportError, ExportOutcome, ExportOverrides, ExportSettings, Exporter,
        PreprocessedFile, TimePoint, Timedata,
    };
    pub use crate::metadata::{ExportDocument, SCHEMA_VERSION, SOURCE};
    pub use crate::objects::{
        DictObject, ObjectAdapter, PointSet, Polygons, RegularSurface, Table,
    };
    pub use crate::validator::{validate_export, ValidationReport};
}
