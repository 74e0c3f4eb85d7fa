//! The metadata document and its blocks.
//!
//! Serialization shape follows the 0.8.0 dialect: optional blocks are
//! omitted entirely rather than written as nulls, and the preprocessed
//! marker keeps its historical underscore-prefixed key.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::config::{Asset, Classification, Masterdata, ModelInfo};

use super::{EVENT_CREATED, SCHEMA_VERSION, SOURCE};

/// A complete metadata document for one exported file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    /// Schema version of the document.
    pub version: String,
    /// Producing ecosystem, always `fmu` for this crate.
    pub source: String,
    /// Object class, e.g. `surface` or `table`.
    pub class: String,
    /// Events that happened to the document, oldest first.
    pub tracklog: Vec<TracklogEvent>,
    /// Provenance block; absent for exports outside FMU.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fmu: Option<FmuBlock>,
    /// File placement and integrity.
    pub file: FileBlock,
    /// What the data is.
    pub data: DataBlock,
    /// Display hints for consumers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<DisplayBlock>,
    /// Who may see the data.
    pub access: AccessBlock,
    /// Masterdata identity copied from the global configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub masterdata: Option<Masterdata>,
    /// Marker carried by preprocessed exports so a later case run can
    /// re-export the file with its original naming.
    #[serde(
        rename = "_preprocessed",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub preprocessed: Option<PreprocessedInfo>,
}

impl ExportDocument {
    /// Start a document with the fixed identity fields and a `created`
    /// tracklog event.
    pub fn new(class: &str, user: &str, file: FileBlock, data: DataBlock, access: AccessBlock) -> Self {
        ExportDocument {
            version: SCHEMA_VERSION.to_string(),
            source: SOURCE.to_string(),
            class: class.to_string(),
            tracklog: vec![TracklogEvent::created(user)],
            fmu: None,
            file,
            data,
            display: None,
            access,
            masterdata: None,
            preprocessed: None,
        }
    }

    /// True when this document marks data awaiting re-export into a case.
    pub fn is_preprocessed(&self) -> bool {
        self.preprocessed.is_some()
    }
}

/// One tracklog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TracklogEvent {
    /// Local timestamp, second resolution.
    pub datetime: String,
    /// Who triggered the event.
    pub user: UserBlock,
    /// Event name, e.g. `created`.
    pub event: String,
}

impl TracklogEvent {
    /// A `created` event timestamped now, attributed to `user`.
    pub fn created(user: &str) -> Self {
        TracklogEvent {
            datetime: Local::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
            user: UserBlock {
                id: user.to_string(),
            },
            event: EVENT_CREATED.to_string(),
        }
    }
}

/// A user reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserBlock {
    /// User identifier, typically the login name.
    pub id: String,
}

/// File placement and integrity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileBlock {
    /// Path relative to the export root; the consumer index key.
    pub relative_path: PathBuf,
    /// Absolute path at export time.
    pub absolute_path: PathBuf,
    /// MD5 checksum of the data file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum_md5: Option<String>,
    /// Relative path of the realization symlink, for case+symlink exports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_path_symlink: Option<PathBuf>,
    /// Absolute path of the realization symlink.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absolute_path_symlink: Option<PathBuf>,
}

/// What the exported data is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataBlock {
    /// Resolved data name; the official stratigraphic name when the
    /// export name matched the stratigraphy column.
    pub name: String,
    /// True when the name denotes an official stratigraphic unit.
    pub stratigraphic: bool,
    /// Known aliases of the name.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alias: Vec<String>,
    /// Content kind, e.g. `depth`; `unset` when never declared.
    pub content: String,
    /// Content detail, stored under the kind's own key, e.g.
    /// `seismic: {attribute: amplitude}`.
    #[serde(flatten, default, skip_serializing_if = "BTreeMap::is_empty")]
    pub content_detail: BTreeMap<String, Value>,
    /// Tag qualifier from the export settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagname: Option<String>,
    /// File format of the data file, e.g. `irap_ascii`.
    pub format: String,
    /// Layout descriptor, e.g. `regular`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    /// Unit of the values, empty when not applicable.
    #[serde(default)]
    pub unit: String,
    /// Vertical domain to reference mapping, e.g. `depth: msl`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub vertical_domain: BTreeMap<String, String>,
    /// Shape description from the object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<Value>,
    /// Bounding box from the object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Value>,
    /// Sampling time block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<TimeBlock>,
    /// True when the data is a model prediction.
    pub is_prediction: bool,
    /// True when the data is an observation.
    pub is_observation: bool,
    /// Free-text description lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Vec<String>>,
}

/// Sampling times of the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBlock {
    /// Base time, the oldest when a pair is given.
    pub t0: TimeStamp,
    /// Monitor time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t1: Option<TimeStamp>,
}

/// One sampling time with an optional label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeStamp {
    /// ISO timestamp, date inputs land at midnight.
    pub value: String,
    /// Label such as `base` or `monitor`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Provenance of the export within FMU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FmuBlock {
    /// Model name and revision from the global configuration.
    pub model: ModelInfo,
    /// Run context the export happened in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ContextBlock>,
    /// The case, when case identity was available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case: Option<CaseBlock>,
    /// The iteration, for realization-scoped exports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iteration: Option<IterationBlock>,
    /// The realization, for realization-scoped exports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realization: Option<RealizationBlock>,
    /// The workflow that produced the export.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow: Option<WorkflowBlock>,
}

/// Run context marker inside the fmu block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextBlock {
    /// Context name, e.g. `realization`.
    pub stage: String,
}

/// Case identity inside the fmu block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseBlock {
    /// Case name, usually the case folder name.
    pub name: String,
    /// Case uuid from the case metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<Uuid>,
    /// Who initialized the case.
    pub user: UserBlock,
    /// Free-text description lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Vec<String>>,
}

/// Iteration identity inside the fmu block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationBlock {
    /// Iteration number, when the folder name carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    /// Iteration folder name, e.g. `iter-0`.
    pub name: String,
}

/// Realization identity inside the fmu block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealizationBlock {
    /// Realization number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    /// Realization folder name, e.g. `realization-7`.
    pub name: String,
}

/// Workflow reference inside the fmu block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowBlock {
    /// Free-form workflow reference, e.g. a job name.
    pub reference: String,
}

/// Who may see the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessBlock {
    /// The owning asset.
    pub asset: Asset,
    /// Resolved security classification.
    pub classification: Classification,
    /// SSDL sub-block kept for consumers of the 0.8.0 dialect.
    pub ssdl: SsdlBlock,
}

/// SSDL access sub-block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SsdlBlock {
    /// Same value as `access.classification`.
    pub access_level: Classification,
    /// Whether data may be shown in the REP portal.
    pub rep_include: bool,
}

/// Display hints for consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayBlock {
    /// Name to show in user interfaces.
    pub name: String,
}

/// Marker block carried by preprocessed exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessedInfo {
    /// Export name used at preprocessing time.
    pub name: String,
    /// Tag used at preprocessing time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagname: Option<String>,
    /// Subfolder used at preprocessing time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subfolder: Option<String>,
}
