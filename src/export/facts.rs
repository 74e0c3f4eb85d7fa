//! Derivation of FMU provenance facts from the run environment.
//!
//! A realization runpath like `/scratch/f/case/realization-7/iter-0`
//! carries the case root and the realization/iteration identity in its
//! trailing components. Case identity (name, uuid, initiating user) is
//! read back from the case metadata file when the case was initialized.

use std::path::{Path, PathBuf};

use log::warn;

use crate::case::CaseDocument;
use crate::context::RunEnvironment;
use crate::metadata::CaseBlock;
use crate::paths::lexical_absolute;

/// Provenance facts backing the metadata fmu block.
#[derive(Debug, Clone)]
pub(crate) struct FmuFacts {
    /// The case root.
    pub casepath: PathBuf,
    /// Case identity from `fmu_case.yml`, when present.
    pub case: Option<CaseBlock>,
    /// Realization folder name, empty outside realization runs.
    pub realname: String,
    /// Iteration folder name, empty outside realization runs.
    pub itername: String,
    /// Realization number.
    pub realization_id: Option<u32>,
    /// Iteration number, when the folder name carries one.
    pub iteration_id: Option<u32>,
}

/// Derive provenance facts for an FMU run.
///
/// Returns `None` with a warning when no case root can be established;
/// the export still proceeds, only without an fmu block.
pub(crate) fn derive_fmu_facts(
    explicit_casepath: Option<&Path>,
    env: &RunEnvironment,
) -> Option<FmuFacts> {
    let parsed = env
        .runpath
        .as_deref()
        .and_then(|rp| lexical_absolute(rp).ok())
        .and_then(|rp| split_runpath(&rp));

    let casepath = match (explicit_casepath, &parsed) {
        (Some(cp), _) => lexical_absolute(cp).ok()?,
        (None, Some(parts)) => parts.casepath.clone(),
        (None, None) => {
            warn!(
                "Could not auto detect the case path from the environment; metadata \
                 will be made without the fmu block. Set 'casepath' explicitly to fix this."
            );
            return None;
        }
    };

    let (realname, itername, mut realization_id, iteration_id) = match &parsed {
        Some(parts) => (
            parts.realname.clone(),
            parts.itername.clone(),
            parts.realization_id,
            parts.iteration_id,
        ),
        None => (
            env.realization_number
                .map(|n| format!("realization-{n}"))
                .unwrap_or_default(),
            env.iteration_number
                .map(|n| format!("iter-{n}"))
                .unwrap_or_default(),
            env.realization_number,
            env.iteration_number,
        ),
    };
    if realization_id.is_none() {
        realization_id = env.realization_number;
    }

    let case = read_case_identity(&casepath);

    Some(FmuFacts {
        casepath,
        case,
        realname,
        itername,
        realization_id,
        iteration_id,
    })
}

struct RunpathParts {
    casepath: PathBuf,
    realname: String,
    itername: String,
    realization_id: Option<u32>,
    iteration_id: Option<u32>,
}

/// Split an absolute runpath at its `realization-<N>` component.
fn split_runpath(runpath: &Path) -> Option<RunpathParts> {
    let components: Vec<String> = runpath
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    let real_index = components
        .iter()
        .rposition(|c| parse_numbered(c, "realization-").is_some())?;

    let realname = components[real_index].clone();
    let realization_id = parse_numbered(&realname, "realization-");
    let itername = components.get(real_index + 1).cloned().unwrap_or_default();
    let iteration_id = parse_numbered(&itername, "iter-");

    let mut casepath = PathBuf::new();
    for part in &components[..real_index] {
        casepath.push(part);
    }

    Some(RunpathParts {
        casepath,
        realname,
        itername,
        realization_id,
        iteration_id,
    })
}

fn parse_numbered(component: &str, prefix: &str) -> Option<u32> {
    component.strip_prefix(prefix)?.parse().ok()
}

/// Fetch case identity from the case metadata, when it exists and parses.
fn read_case_identity(casepath: &Path) -> Option<CaseBlock> {
    match CaseDocument::read_from_case(casepath) {
        Ok(Some(doc)) => Some(CaseBlock {
            name: doc.fmu.case.name,
            uuid: Some(doc.fmu.case.uuid),
            user: doc.fmu.case.user,
            description: doc.fmu.case.description,
        }),
        Ok(None) => {
            warn!(
                "Case metadata does not exist at {}; case identity will be missing \
                 from the metadata",
                CaseDocument::path_for(casepath).display()
            );
            None
        }
        Err(err) => {
            warn!("Could not read case metadata ({err}); case identity will be missing");
            None
        }
    }
}
