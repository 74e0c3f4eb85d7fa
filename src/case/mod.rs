//! # Case Metadata Module
//!
//! A case (one ensemble run area on scratch) carries its own metadata
//! document at `share/metadata/fmu_case.yml`, created once when the case
//! is set up. Realization exports read it back to stamp case identity
//! (name, uuid, initiating user) into their own documents.
//!
//! Initialization is idempotent: an existing case file is never
//! overwritten, re-initialization logs a warning and returns the existing
//! path.


use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::{Asset, Classification, GlobalConfig, Masterdata, ModelInfo};
use crate::metadata::{TracklogEvent, UserBlock, SCHEMA_VERSION, SOURCE};

/// Case metadata location below the case root.
pub const CASE_METADATA_PATH: &str = "share/metadata/fmu_case.yml";

/// Errors from case metadata handling.
#[derive(Error, Debug)]
pub enum CaseError {
    /// Reading or writing the case file failed.
    #[error("Cannot access case metadata at {path}")]
    Io {
        /// The case metadata path.
        path: String,
        /// The underlying io error.
        #[source]
        source: std::io::Error,
    },

    /// The case file is not a valid case document.
    #[error("Case metadata at {path} is not valid")]
    Malformed {
        /// The case metadata path.
        path: String,
        /// The underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },
}

/// The case metadata document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseDocument {
    /// Document class, always `case`.
    pub class: String,
    /// Masterdata identity copied from the global configuration.
    pub masterdata: Masterdata,
    /// Access defaults for the case.
    pub access: CaseAccess,
    /// Case identity.
    pub fmu: CaseFmu,
    /// Events that happened to the case, oldest first.
    pub tracklog: Vec<TracklogEvent>,
    /// Producing ecosystem marker.
    pub source: String,
    /// Schema version.
    pub version: String,
}

/// Access defaults stored on the case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseAccess {
    /// The owning asset.
    pub asset: Asset,
    /// Default classification, when configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<Classification>,
}

/// The fmu sub-document of a case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseFmu {
    /// Model name and revision.
    pub model: ModelInfo,
    /// The case itself.
    pub case: CaseInfo,
}

/// Case identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseInfo {
    /// Case name, usually the case folder name.
    pub name: String,
    /// Unique case identifier, minted at initialization.
    pub uuid: Uuid,
    /// Who initialized the case.
    pub user: UserBlock,
    /// Free-text description lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Vec<String>>,
}

impl CaseDocument {
    /// The case metadata path below a case root.
    pub fn path_for(casepath: &Path) -> PathBuf {
        casepath.join(CASE_METADATA_PATH)
    }

    /// Read the case document for a case root, `None` when the case was
    /// never initialized.
    pub fn read_from_case(casepath: &Path) -> Result<Option<CaseDocument>, CaseError> {
        let path = Self::path_for(casepath);
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path).map_err(|source| CaseError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let doc = serde_yaml::from_str(&text).map_err(|source| CaseError::Malformed {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Some(doc))
    }

    /// Initialize case metadata below `casepath`.
    ///
    /// Creates `share/metadata/fmu_case.yml` with a fresh uuid. When the
    /// file already exists it is left untouched and its path returned.
    pub fn initialize(
        casepath: &Path,
        config: &GlobalConfig,
        case_name: &str,
        user: &str,
        description: Option<Vec<String>>,
    ) -> Result<PathBuf, CaseError> {
        let path = Self::path_for(casepath);
        if path.exists() {
            warn!(
                "The case metadata file already exists and will not be overwritten: {}",
                path.display()
            );
            return Ok(path);
        }

        let doc = CaseDocument {
            class: "case".to_string(),
            masterdata: config.masterdata.clone(),
            access: CaseAccess {
                asset: config.access.asset.clone(),
                classification: config.access.classification,
            },
            fmu: CaseFmu {
                model: config.model.clone(),
                case: CaseInfo {
                    name: case_name.to_string(),
                    uuid: Uuid::new_v4(),
                    user: UserBlock {
                        id: user.to_string(),
                    },
                    description,
                },
            },
            tracklog: vec![TracklogEvent::created(user)],
            source: SOURCE.to_string(),
            version: SCHEMA_VERSION.to_string(),
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| CaseError::Io {
                path: parent.display().to_string(),
                source,
            })?;
        }
        let yaml = serde_yaml::to_string(&doc).map_err(|source| CaseError::Malformed {
            path: path.display().to_string(),
            source,
        })?;
        fs::write(&path, yaml).map_err(|source| CaseError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(path)
    }
}
