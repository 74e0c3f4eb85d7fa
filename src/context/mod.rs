//! # Run Context Module
//!
//! Where in an FMU run an export happens decides both the folder layout and
//! the provenance block of the metadata. This module provides:
//!
//! - [`FmuContext`]: the five recognized contexts
//! - [`RunEnvironment`]: an immutable snapshot of the ERT/RMS environment
//!   markers, captured once and passed around explicitly
//! - [`resolve_context`]: reconciliation of a requested context against the
//!   detected environment
//!
//! Detection never mutates process state, and nothing in this crate reads
//! environment variables after the snapshot is taken. Tests and embedders
//! construct [`RunEnvironment`] values directly.

#[cfg(test)]
mod tests;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable carrying the ERT experiment identifier.
pub const ENV_EXPERIMENT_ID: &str = "_ERT_EXPERIMENT_ID";
/// Environment variable carrying the ERT ensemble identifier.
pub const ENV_ENSEMBLE_ID: &str = "_ERT_ENSEMBLE_ID";
/// Environment variable carrying the ERT runpath of the active realization.
pub const ENV_RUNPATH: &str = "_ERT_RUNPATH";
/// Environment variable carrying the active realization number.
pub const ENV_REALIZATION_NUMBER: &str = "_ERT_REALIZATION_NUMBER";
/// Environment variable carrying the active iteration number.
pub const ENV_ITERATION_NUMBER: &str = "_ERT_ITERATION_NUMBER";
/// Environment variable set by the RMS launcher when running interactively.
pub const ENV_RMS_EXEC_MODE: &str = "RUNRMS_EXEC_MODE";

/// Errors from context parsing and resolution.
#[derive(Error, Debug)]
pub enum ContextError {
    /// The given context string is not one of the recognized contexts.
    #[error("Invalid fmu_context <{0}>! Valid contexts are: realization, case, case_symlink_realization, preprocessed, non-fmu")]
    InvalidContext(String),
}

/// The run context of an export.
///
/// The context decides whether exports land under a realization, directly
/// under the case, or outside any FMU structure, and which provenance is
/// recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FmuContext {
    /// Export belongs to a single realization of an ensemble.
    Realization,
    /// Export belongs to the case as a whole.
    Case,
    /// Export is stored at case level, with a symlink planted back into
    /// the active realization.
    CaseSymlinkRealization,
    /// Export happens before any FMU run; metadata is marked for later
    /// re-export into a case.
    Preprocessed,
    /// Export happens outside FMU entirely, e.g. interactive modelling.
    #[serde(rename = "non-fmu")]
    NonFmu,
}

impl FmuContext {
    /// Canonical lowercase string form, as stored in metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            FmuContext::Realization => "realization",
            FmuContext::Case => "case",
            FmuContext::CaseSymlinkRealization => "case_symlink_realization",
            FmuContext::Preprocessed => "preprocessed",
            FmuContext::NonFmu => "non-fmu",
        }
    }

    /// True for contexts whose primary destination is at case level.
    pub fn is_case_scoped(&self) -> bool {
        matches!(self, FmuContext::Case | FmuContext::CaseSymlinkRealization)
    }
}

impl fmt::Display for FmuContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FmuContext {
    type Err = ContextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "realization" => Ok(FmuContext::Realization),
            "case" => Ok(FmuContext::Case),
            "case_symlink_realization" => Ok(FmuContext::CaseSymlinkRealization),
            "preprocessed" => Ok(FmuContext::Preprocessed),
            "non-fmu" | "non_fmu" => Ok(FmuContext::NonFmu),
            other => Err(ContextError::InvalidContext(other.to_string())),
        }
    }
}

/// Immutable snapshot of the FMU-related process environment.
///
/// [`RunEnvironment::capture`] reads the ERT marker variables once; all
/// later decisions work off the snapshot. A detached (all-empty) value
/// describes interactive use outside FMU.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunEnvironment {
    /// ERT experiment identifier, when running under ERT.
    pub experiment_id: Option<String>,
    /// ERT ensemble identifier, when running under ERT.
    pub ensemble_id: Option<String>,
    /// Runpath of the active realization, set by the forward model.
    pub runpath: Option<PathBuf>,
    /// Active realization number.
    pub realization_number: Option<u32>,
    /// Active iteration number.
    pub iteration_number: Option<u32>,
    /// True when running inside an interactive RMS session.
    pub inside_rms: bool,
}

impl RunEnvironment {
    /// Snapshot the ERT/RMS marker variables from the process environment.
    pub fn capture() -> Self {
        RunEnvironment {
            experiment_id: env_nonempty(ENV_EXPERIMENT_ID),
            ensemble_id: env_nonempty(ENV_ENSEMBLE_ID),
            runpath: env_nonempty(ENV_RUNPATH).map(PathBuf::from),
            realization_number: env_number(ENV_REALIZATION_NUMBER),
            iteration_number: env_number(ENV_ITERATION_NUMBER),
            inside_rms: env_nonempty(ENV_RMS_EXEC_MODE).is_some(),
        }
    }

    /// Environment with no FMU markers at all, e.g. a plain script run.
    pub fn detached() -> Self {
        RunEnvironment::default()
    }

    /// True when any ERT marker indicates an FMU run.
    pub fn is_fmu_run(&self) -> bool {
        self.experiment_id.is_some() || self.ensemble_id.is_some() || self.runpath.is_some()
    }

    /// Context implied by the environment alone, if any.
    ///
    /// A runpath marks a realization run; experiment markers without a
    /// runpath mark a case-level run (e.g. an ERT workflow job). Outside
    /// FMU there is no implied context.
    pub fn implied_context(&self) -> Option<FmuContext> {
        if self.runpath.is_some() {
            Some(FmuContext::Realization)
        } else if self.experiment_id.is_some() || self.ensemble_id.is_some() {
            Some(FmuContext::Case)
        } else {
            None
        }
    }
}

/// Reconcile a requested context with the detected environment.
///
/// Inside an FMU run a requested context wins (a forward job may well
/// export case-level data). Outside an FMU run, every requested context
/// except `preprocessed` and `non-fmu` is forced to `non-fmu` with a
/// warning, since realization or case placement would be meaningless.
pub fn resolve_context(requested: Option<FmuContext>, env: &RunEnvironment) -> FmuContext {
    let implied = env.implied_context();
    match (requested, implied) {
        (Some(req), Some(_)) => req,
        (None, Some(implied)) => implied,
        (None, None) => FmuContext::NonFmu,
        (Some(req), None) => match req {
            FmuContext::Preprocessed | FmuContext::NonFmu => req,
            other => {
                warn!(
                    "Requested fmu_context is <{other}> but since this is detected as a non \
                     FMU run, the actual context is force set to <non-fmu>"
                );
                FmuContext::NonFmu
            }
        },
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn env_number(key: &str) -> Option<u32> {
    let raw = env_nonempty(key)?;
    match raw.parse() {
        Ok(n) => Some(n),
        Err(_) => {
            warn!("Ignoring non-numeric value in {key}: {raw}");
            None
        }
    }
}
