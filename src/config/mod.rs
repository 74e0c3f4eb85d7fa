//! # Global Configuration Module
//!
//! The global configuration is the asset-wide YAML document every FMU
//! project carries: model name and revision, SMDA masterdata references,
//! access defaults and the stratigraphic column. Its identity fields are
//! copied verbatim into every metadata document.
//!
//! Invalid configuration is a fact of life during project setup, so it is
//! deliberately not fatal here: [`evaluate`] returns either a fully typed
//! [`GlobalConfig`] or the collected problems. Exports proceed without
//! metadata in the invalid case; only metadata generation itself refuses.
//!
//! A configuration file named by the `FMU_GLOBAL_CONFIG` environment
//! variable overrides whatever was passed in code; ERT forward models use
//! that to inject the case configuration.


use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Environment variable naming a global-config file that overrides the
/// in-code configuration.
pub const GLOBAL_CONFIG_ENV: &str = "FMU_GLOBAL_CONFIG";

/// Errors from reading configuration documents.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Cannot read global config from {path}")]
    Read {
        /// The path that was attempted.
        path: String,
        /// The underlying io error.
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid YAML at all.
    #[error("Global config is not valid YAML")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result of validating a configuration document.
#[derive(Debug)]
pub enum ConfigValidity {
    /// The document parsed into a complete configuration.
    Valid(Box<GlobalConfig>),
    /// The document is unusable; metadata cannot be produced from it.
    Invalid {
        /// Human-readable problems, one per finding.
        problems: Vec<String>,
    },
}

impl ConfigValidity {
    /// The typed configuration, if valid.
    pub fn ok(self) -> Option<GlobalConfig> {
        match self {
            ConfigValidity::Valid(cfg) => Some(*cfg),
            ConfigValidity::Invalid { .. } => None,
        }
    }
}

/// The asset-wide configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Model name and revision.
    pub model: ModelInfo,
    /// SMDA masterdata references.
    pub masterdata: Masterdata,
    /// Access defaults for exported data.
    pub access: AccessConfig,
    /// Stratigraphic column: exportable name to official entry.
    #[serde(default)]
    pub stratigraphy: BTreeMap<String, StratigraphyEntry>,
}

impl GlobalConfig {
    /// Look up a stratigraphy entry by the name used at export time.
    pub fn stratigraphy_entry(&self, name: &str) -> Option<&StratigraphyEntry> {
        self.stratigraphy.get(name)
    }
}

/// Model identity carried into every metadata document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model name, e.g. the asset or field model name.
    pub name: String,
    /// Model revision, e.g. `21.0.0`.
    pub revision: String,
    /// Optional free-text description lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Vec<String>>,
}

/// Masterdata wrapper; SMDA is the only recognized registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Masterdata {
    /// SMDA masterdata references.
    pub smda: SmdaMasterdata,
}

/// References into the SMDA masterdata registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmdaMasterdata {
    /// Coordinate system reference.
    pub coordinate_system: IdentifiedItem,
    /// Countries the asset belongs to.
    pub country: Vec<IdentifiedItem>,
    /// Discoveries covered by the asset.
    pub discovery: Vec<DiscoveryItem>,
    /// Fields covered by the asset.
    pub field: Vec<IdentifiedItem>,
    /// Stratigraphic column in use.
    pub stratigraphic_column: IdentifiedItem,
}

/// A masterdata item referenced by identifier and uuid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifiedItem {
    /// Registry identifier, e.g. `ST_WGS84_UTM37N_P32637`.
    pub identifier: String,
    /// Registry uuid.
    pub uuid: Uuid,
}

/// A discovery reference; SMDA keys these by short identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryItem {
    /// Registry short identifier.
    pub short_identifier: String,
    /// Registry uuid.
    pub uuid: Uuid,
}

/// Access defaults from the configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessConfig {
    /// The owning asset.
    pub asset: Asset,
    /// Default security classification for exports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<Classification>,
    /// Legacy SSDL sub-block with classification and REP flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssdl: Option<SsdlAccess>,
}

/// The owning asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Asset name, e.g. `Drogon`.
    pub name: String,
}

/// Legacy SSDL access sub-block.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SsdlAccess {
    /// Security classification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_level: Option<Classification>,
    /// Whether data may be shown in the REP portal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rep_include: Option<bool>,
}

/// Security classification of exported data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Classification {
    /// Visible to the whole company.
    Internal,
    /// Restricted to the asset team.
    Restricted,
}

impl Classification {
    /// Canonical lowercase string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Internal => "internal",
            Classification::Restricted => "restricted",
        }
    }
}

impl FromStr for Classification {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "internal" => Ok(Classification::Internal),
            "restricted" => Ok(Classification::Restricted),
            "asset" => {
                warn!(
                    "The value 'asset' for access classification is deprecated, \
                     use 'restricted' instead"
                );
                Ok(Classification::Restricted)
            }
            other => Err(format!(
                "Illegal classification <{other}>, use 'internal' or 'restricted'"
            )),
        }
    }
}

impl TryFrom<String> for Classification {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One stratigraphic-column entry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StratigraphyEntry {
    /// True when the name denotes an official stratigraphic unit.
    #[serde(default)]
    pub stratigraphic: bool,
    /// Official SMDA name, when it differs from the export name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Known aliases for the unit.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alias: Vec<String>,
}

/// Read a configuration document from a YAML file.
pub fn read_config_file(path: &Path) -> Result<serde_yaml::Value, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_yaml::from_str(&text)?)
}

/// Apply the `FMU_GLOBAL_CONFIG` override: when the variable names a file,
/// that file wins over the in-code document.
pub fn apply_env_override(
    explicit: Option<serde_yaml::Value>,
) -> Result<Option<serde_yaml::Value>, ConfigError> {
    match std::env::var(GLOBAL_CONFIG_ENV) {
        Ok(path) if !path.is_empty() => {
            warn!("Config taken from file named in {GLOBAL_CONFIG_ENV}: {path}");
            read_config_file(Path::new(&path)).map(Some)
        }
        _ => Ok(explicit),
    }
}

/// Validate a configuration document.
///
/// Structural problems are collected before the typed parse so that a
/// user sees every missing block at once, not just the first.
pub fn evaluate(value: &serde_yaml::Value) -> ConfigValidity {
    let mut problems = structural_problems(value);
    if problems.is_empty() {
        match serde_yaml::from_value::<GlobalConfig>(value.clone()) {
            Ok(config) => return ConfigValidity::Valid(Box::new(config)),
            Err(err) => problems.push(err.to_string()),
        }
    }
    ConfigValidity::Invalid { problems }
}

fn structural_problems(value: &serde_yaml::Value) -> Vec<String> {
    let mut problems = Vec::new();

    let Some(root) = value.as_mapping() else {
        problems.push("the config must be a mapping".to_string());
        return problems;
    };

    match root.get("model").and_then(|m| m.as_mapping()) {
        None => problems.push("the config is missing the 'model' block".to_string()),
        Some(model) => {
            for key in ["name", "revision"] {
                if nonempty_str(model.get(key)).is_none() {
                    problems.push(format!("'model.{key}' is missing or empty"));
                }
            }
        }
    }

    match root
        .get("masterdata")
        .and_then(|m| m.as_mapping())
        .and_then(|m| m.get("smda"))
        .and_then(|m| m.as_mapping())
    {
        None => problems.push("the config is missing the 'masterdata.smda' block".to_string()),
        Some(smda) => {
            for key in [
                "coordinate_system",
                "country",
                "discovery",
                "field",
                "stratigraphic_column",
            ] {
                if smda.get(key).is_none() {
                    problems.push(format!("'masterdata.smda.{key}' is missing"));
                }
            }
        }
    }

    match root.get("access").and_then(|m| m.as_mapping()) {
        None => problems.push("the config is missing the 'access' block".to_string()),
        Some(access) => {
            let asset_name = access
                .get("asset")
                .and_then(|a| a.as_mapping())
                .and_then(|a| nonempty_str(a.get("name")));
            if asset_name.is_none() {
                problems.push("'access.asset.name' is missing or empty".to_string());
            }
        }
    }

    problems
}

fn nonempty_str(value: Option<&serde_yaml::Value>) -> Option<&str> {
    value.and_then(|v| v.as_str()).filter(|s| !s.is_empty())
}
