//! # Destination Path Module
//!
//! Exports land in a fixed folder tree below an export root:
//!
//! ```text
//! <root>[/<realization>/<iteration>]/share/<class>/<efolder>[/<subfolder>]/<file>
//! ```
//!
//! where `<class>` is `results`, `observations` or `preprocessed` and
//! `<efolder>` is the object-kind folder (`maps`, `tables`, ...). The
//! `forcefolder` escape hatch swaps the object-kind folder (relative form)
//! or replaces the whole destination (absolute form, gated and
//! discouraged). Resolution itself is pure; [`ensure_folder`] is the one
//! place that touches the filesystem, creating and verifying the folder
//! according to the `createfolder`/`verifyfolder` settings.
//!
//! Every resolved destination carries both the absolute path and the path
//! relative to the export root; consumers index on the relative form.


use std::fs;
use std::path::{Component, Path, PathBuf};

use log::{info, warn};
use thiserror::Error;

use crate::context::FmuContext;

/// Top folder for all exports below the root.
pub const SHARE_FOLDER: &str = "share";
/// Class folder for model results.
pub const RESULTS_FOLDER: &str = "results";
/// Class folder for observations.
pub const OBSERVATIONS_FOLDER: &str = "observations";
/// Class folder for preprocessed data awaiting a case.
pub const PREPROCESSED_FOLDER: &str = "preprocessed";

/// Errors from destination resolution.
#[derive(Error, Debug)]
pub enum PathError {
    /// Absolute forcefolder without the explicit opt-in.
    #[error(
        "Can't use absolute path as 'forcefolder', i.e. starting with '/'. This is \
         strongly discouraged and is only allowed when the 'allow_forcefolder_absolute' \
         setting is enabled"
    )]
    ForcefolderAbsoluteNotAllowed,

    /// Absolute forcefolder combined with preprocessed placement.
    #[error("Cannot use absolute path to 'forcefolder' with preprocessed data")]
    ForcefolderWithPreprocessed,

    /// Absolute forcefolder on a destination that must stay inside the run.
    #[error("You cannot use forcefolder in combination with fmucontext={0}")]
    ForcefolderNotAllowedHere(String),

    /// The derived absolute path contains non-ASCII characters.
    #[error("Path has non-ascii elements which is not supported: {0}")]
    NonAscii(String),

    /// The destination does not live under the export root.
    #[error("Path {path} is not inside the export root {root}")]
    OutsideRoot {
        /// The offending destination.
        path: String,
        /// The export root it was checked against.
        root: String,
    },

    /// The destination folder could not be created.
    #[error("Cannot create folder {}", .path.display())]
    CreateFolder {
        /// The folder that was attempted.
        path: PathBuf,
        /// The underlying io error.
        #[source]
        source: std::io::Error,
    },

    /// The destination folder does not exist after resolution.
    #[error("The folder {} does not exist and 'createfolder' is disabled", .0.display())]
    MissingFolder(PathBuf),

    /// The current working directory could not be determined.
    #[error("Cannot establish current working directory")]
    NoWorkingDirectory(#[source] std::io::Error),
}

/// Inputs deciding where a single file lands.
#[derive(Debug, Clone)]
pub struct DestinationSpec<'a> {
    /// Export root: case root, runpath or working directory.
    pub rootpath: &'a Path,
    /// Placement mode; realization appends the realization/iteration
    /// folders, preprocessed swaps the class folder.
    pub mode: FmuContext,
    /// Realization folder name, e.g. `realization-7`. Empty when absent.
    pub realname: &'a str,
    /// Iteration folder name, e.g. `iter-0`. Empty when absent.
    pub itername: &'a str,
    /// Object-kind folder, e.g. `maps`.
    pub efolder: &'a str,
    /// Store under `observations` instead of `results`.
    pub is_observation: bool,
    /// Folder override; relative swaps `efolder`, absolute replaces all.
    pub forcefolder: &'a str,
    /// Opt-in for the absolute forcefolder form.
    pub allow_forcefolder_absolute: bool,
    /// Optional extra folder level below the object-kind folder.
    pub subfolder: &'a str,
}

/// A fully resolved destination for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    /// Absolute path, lexically normalized.
    pub absolute_path: PathBuf,
    /// Path relative to the export root. Falls back to the absolute path
    /// when an absolute forcefolder points outside the root.
    pub relative_path: PathBuf,
    /// True when an absolute forcefolder replaced the standard tree.
    pub forced_absolute: bool,
}

impl Destination {
    /// The directory that must exist before the file can be written.
    pub fn folder(&self) -> &Path {
        self.absolute_path.parent().unwrap_or(&self.absolute_path)
    }
}

/// Resolve the destination folder for the given placement mode.
///
/// `allow_forcefolder` is false for secondary destinations (the symlink
/// target of a case+symlink export), where an absolute forcefolder would
/// break the run structure. `info` names that context in the error.
pub fn resolve_folder(
    spec: &DestinationSpec,
    allow_forcefolder: bool,
    info: &str,
) -> Result<(PathBuf, bool), PathError> {
    let mut dest = spec.rootpath.to_path_buf();

    if spec.mode == FmuContext::Realization {
        if !spec.realname.is_empty() {
            dest.push(spec.realname);
        }
        if !spec.itername.is_empty() {
            dest.push(spec.itername);
        }
    }

    dest.push(SHARE_FOLDER);

    let force_is_absolute = Path::new(spec.forcefolder).is_absolute();

    if spec.mode == FmuContext::Preprocessed {
        if force_is_absolute {
            return Err(PathError::ForcefolderWithPreprocessed);
        }
        dest.push(PREPROCESSED_FOLDER);
    } else if spec.is_observation {
        dest.push(OBSERVATIONS_FOLDER);
    } else {
        dest.push(RESULTS_FOLDER);
    }

    let mut forced_absolute = false;
    if spec.forcefolder.is_empty() {
        dest.push(spec.efolder);
    } else if force_is_absolute {
        if !spec.allow_forcefolder_absolute {
            return Err(PathError::ForcefolderAbsoluteNotAllowed);
        }
        warn!("Using absolute paths in forcefolder is not recommended!");
        if !allow_forcefolder {
            return Err(PathError::ForcefolderNotAllowedHere(info.to_string()));
        }
        dest = PathBuf::from(spec.forcefolder);
        forced_absolute = true;
    } else {
        warn!("The standard folder name is overrided: {}", spec.forcefolder);
        dest.push(spec.forcefolder);
    }

    if !spec.subfolder.is_empty() {
        dest.push(spec.subfolder);
    }

    Ok((dest, forced_absolute))
}

/// Resolve the full destination (folder plus file name) and derive the
/// absolute/relative path pair.
///
/// The absolute path must be pure ASCII; consumers of the sidecar index
/// require it. The relative path is taken against the export root, except
/// for forced-absolute destinations outside the root, which fall back to
/// the absolute path.
pub fn resolve_destination(
    spec: &DestinationSpec,
    filename: &str,
    allow_forcefolder: bool,
    info: &str,
) -> Result<Destination, PathError> {
    let (folder, forced_absolute) = resolve_folder(spec, allow_forcefolder, info)?;
    let path = folder.join(filename);
    let absolute_path = lexical_absolute(&path)?;

    if !absolute_path.to_string_lossy().is_ascii() {
        return Err(PathError::NonAscii(
            absolute_path.to_string_lossy().into_owned(),
        ));
    }

    let relative_path = match path.strip_prefix(spec.rootpath) {
        Ok(rel) => rel.to_path_buf(),
        Err(_) if forced_absolute => {
            info!(
                "Relative path equal to absolute path due to forcefolder with absolute \
                 path deviating from rootpath {}",
                spec.rootpath.display()
            );
            absolute_path.clone()
        }
        Err(_) => {
            return Err(PathError::OutsideRoot {
                path: path.to_string_lossy().into_owned(),
                root: spec.rootpath.to_string_lossy().into_owned(),
            })
        }
    };

    Ok(Destination {
        absolute_path,
        relative_path,
        forced_absolute,
    })
}

/// Create and verify a destination folder.
///
/// With `create` the folder tree is created if absent; re-creation of an
/// existing tree is a no-op, so repeated resolution of the same
/// destination never errors. With `verify` a folder that still does not
/// exist afterwards is a fatal resource error.
pub fn ensure_folder(folder: &Path, create: bool, verify: bool) -> Result<(), PathError> {
    if create {
        fs::create_dir_all(folder).map_err(|source| PathError::CreateFolder {
            path: folder.to_path_buf(),
            source,
        })?;
    }
    if verify && !folder.is_dir() {
        return Err(PathError::MissingFolder(folder.to_path_buf()));
    }
    Ok(())
}

/// Make a path absolute and fold `.` and `..` components lexically.
///
/// Unlike `canonicalize` this never touches the filesystem, so it works
/// for destinations that do not exist yet. Symlinked parents are left as
/// spelled.
pub fn lexical_absolute(path: &Path) -> Result<PathBuf, PathError> {
    let base = if path.is_absolute() {
        PathBuf::new()
    } else {
        std::env::current_dir().map_err(PathError::NoWorkingDirectory)?
    };

    let mut out = base;
    for component in path.components() {
        match component {
            Component::Prefix(p) => out.push(p.as_os_str()),
            Component::RootDir => out.push(Component::RootDir.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(part) => out.push(part),
        }
    }
    Ok(out)
}
