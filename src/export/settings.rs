//! Export settings: the immutable base plus per-call overrides.
//!
//! Settings are plain data. The exporter never mutates its base settings;
//! each call merges the base with an [`ExportOverrides`] value into a
//! fresh snapshot, so concurrent exports from one exporter cannot observe
//! each other. Legacy spellings are accepted through explicit `apply_*`
//! methods that warn and map onto the typed fields.

use chrono::NaiveDate;
use log::warn;
use thiserror::Error;

use crate::config::{Classification, SsdlAccess};
use crate::content::Content;
use crate::context::FmuContext;

/// Errors from settings validation.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The same concern was set through both its new and legacy spelling.
    #[error(
        "Using both '{new_key}' and the legacy 'access_ssdl.{legacy_key}' is not supported"
    )]
    ConflictingAccessInput {
        /// The typed field name.
        new_key: &'static str,
        /// The legacy sub-key.
        legacy_key: &'static str,
    },
}

/// One sampling time with an optional label.
#[derive(Debug, Clone, PartialEq)]
pub struct TimePoint {
    /// The sampling date.
    pub value: NaiveDate,
    /// Label such as `base` or `monitor`.
    pub label: Option<String>,
}

impl TimePoint {
    /// An unlabeled time point.
    pub fn new(value: NaiveDate) -> Self {
        TimePoint { value, label: None }
    }

    /// A labeled time point.
    pub fn labeled(value: NaiveDate, label: impl Into<String>) -> Self {
        TimePoint {
            value,
            label: Some(label.into()),
        }
    }
}

/// Sampling times for the exported data.
#[derive(Debug, Clone, PartialEq)]
pub struct Timedata {
    /// First time point.
    pub t0: TimePoint,
    /// Second time point, for difference data.
    pub t1: Option<TimePoint>,
}

impl Timedata {
    /// A single sampling time.
    pub fn single(t0: TimePoint) -> Self {
        Timedata { t0, t1: None }
    }

    /// A time pair, e.g. monitor and base of a 4D difference.
    pub fn pair(a: TimePoint, b: TimePoint) -> Self {
        Timedata { t0: a, t1: Some(b) }
    }

    /// The points ordered oldest-first, which is how metadata stores them.
    pub fn ordered(&self) -> (&TimePoint, Option<&TimePoint>) {
        match &self.t1 {
            Some(t1) if t1.value < self.t0.value => (t1, Some(&self.t0)),
            Some(t1) => (&self.t0, Some(t1)),
            None => (&self.t0, None),
        }
    }
}

/// The base settings of an exporter.
///
/// All fields have inert defaults. [`ExportSettings::new`] additionally
/// marks data as prediction, which is the common case. With no name set
/// the object must carry one itself.
#[derive(Debug, Clone, Default)]
pub struct ExportSettings {
    /// Export name; falls back to the object's own name when empty.
    pub name: String,
    /// Tag qualifier appended to the file stem.
    pub tagname: String,
    /// Parent qualifier prepended to the file stem.
    pub parent: String,
    /// Extra folder level below the object-kind folder.
    pub subfolder: String,
    /// What the data represents.
    pub content: Content,
    /// Sampling times.
    pub timedata: Option<Timedata>,
    /// Unit of the values.
    pub unit: String,
    /// Vertical domain and its reference, e.g. `depth`/`msl`.
    pub vertical_domain: Option<(String, String)>,
    /// Requested run context; resolved against the environment.
    pub fmu_context: Option<FmuContext>,
    /// Explicit case root, overriding environment detection.
    pub casepath: Option<std::path::PathBuf>,
    /// Forced realization number, overriding the environment.
    pub realization: Option<u32>,
    /// Security classification override.
    pub classification: Option<Classification>,
    /// REP portal inclusion override.
    pub rep_include: Option<bool>,
    /// The data is a prediction.
    pub is_prediction: bool,
    /// The data is an observation, stored under `share/observations`.
    pub is_observation: bool,
    /// Free-text description lines.
    pub description: Option<Vec<String>>,
    /// Display name hint for consumers.
    pub display_name: Option<String>,
    /// Folder override; relative swaps the kind folder.
    pub forcefolder: String,
    /// Opt-in for absolute forcefolder paths.
    pub allow_forcefolder_absolute: bool,
    /// Create the destination folder tree on export.
    pub createfolder: bool,
    /// Fail the export when the destination folder does not exist.
    pub verifyfolder: bool,
    /// Render date pairs oldest-first in file stems.
    pub filename_timedata_reverse: bool,
    /// Workflow reference recorded in the fmu block.
    pub workflow: Option<String>,
}

impl ExportSettings {
    /// Settings for prediction results, the common case.
    pub fn new() -> Self {
        ExportSettings {
            is_prediction: true,
            createfolder: true,
            verifyfolder: true,
            ..ExportSettings::default()
        }
    }

    /// Apply a legacy `access_ssdl` block.
    ///
    /// Maps `access_level` onto `classification` and `rep_include` onto
    /// the typed field, warning about the deprecation. Setting both the
    /// legacy and the typed spelling of the same concern is an error.
    pub fn apply_legacy_access_ssdl(&mut self, ssdl: &SsdlAccess) -> Result<(), SettingsError> {
        warn!(
            "The 'access_ssdl' setting is deprecated, use 'classification' and \
             'rep_include' instead"
        );
        if let Some(level) = ssdl.access_level {
            if self.classification.is_some() {
                return Err(SettingsError::ConflictingAccessInput {
                    new_key: "classification",
                    legacy_key: "access_level",
                });
            }
            self.classification = Some(level);
        }
        if let Some(rep) = ssdl.rep_include {
            if self.rep_include.is_some() {
                return Err(SettingsError::ConflictingAccessInput {
                    new_key: "rep_include",
                    legacy_key: "rep_include",
                });
            }
            self.rep_include = Some(rep);
        }
        Ok(())
    }

    /// Accept the retired `runpath` setting; it has no effect anymore.
    pub fn apply_legacy_runpath(&mut self, _runpath: &str) {
        warn!(
            "The 'runpath' setting no longer has any function and will be removed; \
             use 'casepath' when the case root cannot be detected"
        );
    }

    /// Merge per-call overrides into a fresh snapshot.
    pub(crate) fn merged(&self, overrides: &ExportOverrides) -> ExportSettings {
        let mut eff = self.clone();
        let o = overrides;
        if let Some(v) = &o.name {
            eff.name = v.clone();
        }
        if let Some(v) = &o.tagname {
            eff.tagname = v.clone();
        }
        if let Some(v) = &o.parent {
            eff.parent = v.clone();
        }
        if let Some(v) = &o.subfolder {
            eff.subfolder = v.clone();
        }
        if let Some(v) = &o.content {
            eff.content = v.clone();
        }
        if let Some(v) = &o.timedata {
            eff.timedata = Some(v.clone());
        }
        if let Some(v) = &o.unit {
            eff.unit = v.clone();
        }
        if let Some(v) = &o.vertical_domain {
            eff.vertical_domain = Some(v.clone());
        }
        if let Some(v) = o.fmu_context {
            eff.fmu_context = Some(v);
        }
        if let Some(v) = &o.casepath {
            eff.casepath = Some(v.clone());
        }
        if let Some(v) = o.classification {
            eff.classification = Some(v);
        }
        if let Some(v) = o.rep_include {
            eff.rep_include = Some(v);
        }
        if let Some(v) = o.is_prediction {
            eff.is_prediction = v;
        }
        if let Some(v) = o.is_observation {
            eff.is_observation = v;
        }
        if let Some(v) = &o.description {
            eff.description = Some(v.clone());
        }
        if let Some(v) = &o.display_name {
            eff.display_name = Some(v.clone());
        }
        if let Some(v) = &o.forcefolder {
            eff.forcefolder = v.clone();
        }
        if let Some(v) = &o.workflow {
            eff.workflow = Some(v.clone());
        }
        eff
    }
}

/// Per-call overrides, merged onto the base settings.
///
/// Only set fields replace the base value; everything else is inherited.
#[derive(Debug, Clone, Default)]
pub struct ExportOverrides {
    /// Override the export name.
    pub name: Option<String>,
    /// Override the tag qualifier.
    pub tagname: Option<String>,
    /// Override the parent qualifier.
    pub parent: Option<String>,
    /// Override the subfolder.
    pub subfolder: Option<String>,
    /// Override the content; the last one given wins.
    pub content: Option<Content>,
    /// Override the sampling times.
    pub timedata: Option<Timedata>,
    /// Override the unit.
    pub unit: Option<String>,
    /// Override the vertical domain.
    pub vertical_domain: Option<(String, String)>,
    /// Override the requested run context.
    pub fmu_context: Option<FmuContext>,
    /// Override the case root.
    pub casepath: Option<std::path::PathBuf>,
    /// Override the classification.
    pub classification: Option<Classification>,
    /// Override REP portal inclusion.
    pub rep_include: Option<bool>,
    /// Override the prediction flag.
    pub is_prediction: Option<bool>,
    /// Override the observation flag.
    pub is_observation: Option<bool>,
    /// Override the description.
    pub description: Option<Vec<String>>,
    /// Override the display name.
    pub display_name: Option<String>,
    /// Override the forcefolder.
    pub forcefolder: Option<String>,
    /// Override the workflow reference.
    pub workflow: Option<String>,
}

impl ExportOverrides {
    /// No overrides; use the base settings as-is.
    pub fn none() -> Self {
        ExportOverrides::default()
    }

    /// Override just the name, the most common per-call change.
    pub fn named(name: impl Into<String>) -> Self {
        ExportOverrides {
            name: Some(name.into()),
            ..ExportOverrides::default()
        }
    }
}
