//! # Metadata Document Module
//!
//! Every export is accompanied by a metadata document stored as a hidden
//! YAML sidecar next to the data file. The document is schema-versioned
//! and identifies:
//!
//! - **what** the data is (`data` block: name, content, geometry, format)
//! - **where** it lives (`file` block: path pair and checksum)
//! - **where it came from** (`fmu` block: model, case, realization,
//!   iteration, workflow; `tracklog`: events)
//! - **who may see it** (`access` block) and the `masterdata` identity
//!   copied from the global configuration
//!
//! Documents are plain serde types; the assembly logic that fills them
//! lives with the exporter. Consumers key on `version` + `source` to
//! recognize the dialect.

mod document;


pub use document::{
    AccessBlock, CaseBlock, ContextBlock, DataBlock, DisplayBlock, ExportDocument, FileBlock,
    FmuBlock, IterationBlock, PreprocessedInfo, RealizationBlock, SsdlBlock, TimeBlock,
    TimeStamp, TracklogEvent, UserBlock, WorkflowBlock,
};

/// Schema version of documents produced by this crate.
pub const SCHEMA_VERSION: &str = "0.8.0";

/// Source marker of documents produced by this crate.
pub const SOURCE: &str = "fmu";

/// Tracklog event name for document creation.
pub const EVENT_CREATED: &str = "created";
