//! # Export Orchestration Module
//!
//! The [`Exporter`] drives one export end to end: it resolves the run
//! context, derives the destination and file name, assembles the metadata
//! document and writes everything to disk.
//!
//! An `Exporter` holds base [`ExportSettings`] and a validated global
//! configuration. Every call derives a fresh settings snapshot from the
//! base plus per-call [`ExportOverrides`], so repeated exports from one
//! `Exporter` cannot leak state into each other.
//!
//! An invalid configuration does not block data: [`Exporter::export`]
//! still writes the object and only skips the metadata sidecar with a
//! diagnostic. [`Exporter::generate_metadata`] has no file to salvage and
//! fails instead.
//!
//! ```no_run
//! use fmuio::export::{Exporter, ExportOverrides, ExportSettings};
//! use fmuio::content::Content;
//! use fmuio::objects::RegularSurface;
//!
//! # fn demo(config: serde_yaml::Value, surface: RegularSurface) -> Result<(), fmuio::export::ExportError> {
//! let mut settings = ExportSettings::new();
//! settings.content = Content::Depth;
//! settings.unit = "m".to_string();
//!
//! let exporter = Exporter::with_settings(Some(config), settings);
//! let outcome = exporter.export(&surface, &ExportOverrides::named("topvolantis"))?;
//! println!("exported to {}", outcome.path.display());
//! # Ok(())
//! # }
//! ```

mod assemble;
mod checksum;
mod facts;
mod preprocessed;
mod settings;
mod sidecar;

#[cfg(test)]
mod tests;

pub use preprocessed::PreprocessedFile;
pub use settings::{ExportOverrides, ExportSettings, SettingsError, TimePoint, Timedata};
pub use sidecar::{find_sidecar, read_metadata, sidecar_path, write_sidecar, SidecarError};

pub(crate) use checksum::md5_of_file;

use std::path::{Path, PathBuf};

use log::{info, warn};
use thiserror::Error;

use crate::config::{self, ConfigValidity, GlobalConfig};
use crate::context::{resolve_context, FmuContext, RunEnvironment};
use crate::filename::{build_filestem, FilenameError, StemParts};
use crate::metadata::ExportDocument;
use crate::objects::{ObjectAdapter, ObjectError};
use crate::paths::{
    ensure_folder, lexical_absolute, resolve_destination, Destination, DestinationSpec, PathError,
};

use assemble::{assemble_document, DocumentParts};
use facts::{derive_fmu_facts, FmuFacts};

/// Errors from exporting an object or generating its metadata.
#[derive(Debug, Error)]
pub enum ExportError {
    /// File name construction failed.
    #[error("Filename error: {0}")]
    Filename(#[from] FilenameError),

    /// Destination resolution failed.
    #[error("Path error: {0}")]
    Path(#[from] PathError),

    /// Object validation or serialization failed.
    #[error("Object error: {0}")]
    Object(#[from] ObjectError),

    /// Sidecar reading or writing failed.
    #[error("Metadata file error: {0}")]
    Sidecar(#[from] SidecarError),

    /// Metadata generation requires a valid global configuration.
    #[error(
        "The global configuration has one or more errors that makes it impossible to \
         create valid metadata: {}",
        .problems.join("; ")
    )]
    InvalidConfig {
        /// What the configuration check found.
        problems: Vec<String>,
    },

    /// The input file for a re-export does not exist.
    #[error("The file {} does not exist.", .0.display())]
    MissingFile(PathBuf),

    /// The input file was not produced by a preprocessed export.
    #[error(
        "The special entry for preprocessed data <_preprocessed> is missing in the \
         metadata. A possible solution is to rerun the preprocessed export."
    )]
    NotPreprocessed,

    /// A filesystem operation failed.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        /// The path being accessed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// What one export produced.
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    /// Absolute path of the written data file.
    pub path: PathBuf,
    /// Absolute path of the metadata sidecar, absent when the
    /// configuration was invalid.
    pub metadata_path: Option<PathBuf>,
    /// Absolute path of the symlink copy, for case+symlink exports.
    pub symlink_path: Option<PathBuf>,
    /// The document written to the sidecar.
    pub metadata: Option<ExportDocument>,
}

impl ExportOutcome {
    /// The symlink path when one was made, otherwise the physical path.
    pub fn symlink_or_primary(&self) -> &Path {
        self.symlink_path.as_deref().unwrap_or(&self.path)
    }
}

/// One configured export pipeline.
///
/// Construction validates the global configuration once; an invalid
/// configuration is reported immediately and remembered, it never blocks
/// construction. The run environment is captured once as well, so all
/// exports from the same `Exporter` agree on their provenance.
#[derive(Debug, Clone)]
pub struct Exporter {
    settings: ExportSettings,
    environment: RunEnvironment,
    config: Option<GlobalConfig>,
    config_problems: Vec<String>,
    user: String,
}

impl Exporter {
    /// Exporter with default settings and the ambient run environment.
    pub fn new(config: Option<serde_yaml::Value>) -> Self {
        Self::with_settings(config, ExportSettings::new())
    }

    /// Exporter with explicit base settings.
    pub fn with_settings(config: Option<serde_yaml::Value>, settings: ExportSettings) -> Self {
        Self::with_environment(config, settings, RunEnvironment::capture())
    }

    /// Exporter with an explicit run environment instead of the ambient
    /// one. This is the seam tests use to simulate FMU runs.
    pub fn with_environment(
        config: Option<serde_yaml::Value>,
        settings: ExportSettings,
        environment: RunEnvironment,
    ) -> Self {
        let (config, config_problems) = match config::apply_env_override(config) {
            Ok(Some(value)) => match config::evaluate(&value) {
                ConfigValidity::Valid(config) => (Some(*config), Vec::new()),
                ConfigValidity::Invalid { problems } => (None, problems),
            },
            Ok(None) => (None, vec!["no configuration was provided".to_string()]),
            Err(err) => (None, vec![err.to_string()]),
        };
        if config.is_none() {
            warn!(
                "The global configuration has one or more errors that makes it \
                 impossible to create valid metadata. The data will still be exported \
                 but no metadata will be made. You are strongly encouraged to correct \
                 your configuration. Detailed information: {}",
                config_problems.join("; ")
            );
        }

        let user = std::env::var("USER").unwrap_or_else(|_| "unknown".to_string());

        Self {
            settings,
            environment,
            config,
            config_problems,
            user,
        }
    }

    /// The base settings every call starts from.
    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    /// Mutable base settings; changes apply to subsequent calls only.
    pub fn settings_mut(&mut self) -> &mut ExportSettings {
        &mut self.settings
    }

    /// The run environment this exporter was built with.
    pub fn environment(&self) -> &RunEnvironment {
        &self.environment
    }

    /// Whether the global configuration passed validation.
    pub fn config_is_valid(&self) -> bool {
        self.config.is_some()
    }

    /// Problems found in the global configuration, empty when valid.
    pub fn config_problems(&self) -> &[String] {
        &self.config_problems
    }

    /// Generate the complete metadata document for an object without
    /// writing the object itself.
    ///
    /// With `compute_checksum` the object is serialized to a throwaway
    /// temporary file and hashed, so the recorded checksum matches a later
    /// export byte for byte. Requires a valid configuration.
    pub fn generate_metadata(
        &self,
        obj: &dyn ObjectAdapter,
        overrides: &ExportOverrides,
        compute_checksum: bool,
    ) -> Result<ExportDocument, ExportError> {
        let settings = self.settings.merged(overrides);
        self.generate_with_settings(obj, settings, None, compute_checksum)
    }

    /// Export an object: write it to the resolved destination, then write
    /// its metadata sidecar and, for case+symlink exports, the symlinked
    /// copies.
    ///
    /// The checksum is computed from the actually written file. When the
    /// configuration is invalid the object is still written, only the
    /// sidecar is skipped with a diagnostic.
    pub fn export(
        &self,
        obj: &dyn ObjectAdapter,
        overrides: &ExportOverrides,
    ) -> Result<ExportOutcome, ExportError> {
        let settings = self.settings.merged(overrides);
        self.export_with_settings(obj, settings, None)
    }

    /// Generate metadata for re-exporting a preprocessed file.
    ///
    /// The file must carry a sidecar with the `_preprocessed` marker. Its
    /// data description is reused; name, tagname and subfolder fall back
    /// to the values recorded at the preprocessed export.
    pub fn generate_file_metadata(
        &self,
        path: &Path,
        overrides: &ExportOverrides,
        compute_checksum: bool,
    ) -> Result<ExportDocument, ExportError> {
        let file = PreprocessedFile::load(path)?;
        let settings = self.file_settings(&file, overrides);
        let prior = file.prior().clone();
        self.generate_with_settings(&file, settings, Some(&prior), compute_checksum)
    }

    /// Re-export a preprocessed file into the resolved destination, with
    /// metadata carried over from its previous life.
    pub fn export_file(
        &self,
        path: &Path,
        overrides: &ExportOverrides,
    ) -> Result<ExportOutcome, ExportError> {
        let file = PreprocessedFile::load(path)?;
        let settings = self.file_settings(&file, overrides);
        let prior = file.prior().clone();
        self.export_with_settings(&file, settings, Some(&prior))
    }

    fn generate_with_settings(
        &self,
        obj: &dyn ObjectAdapter,
        settings: ExportSettings,
        prior: Option<&ExportDocument>,
        compute_checksum: bool,
    ) -> Result<ExportDocument, ExportError> {
        let config = self.valid_config()?;
        let resolved = self.resolve(obj, settings)?;

        let checksum = if compute_checksum {
            Some(checksum::md5_of_object(obj)?)
        } else {
            None
        };

        Ok(assemble_document(DocumentParts {
            obj,
            settings: &resolved.settings,
            context: resolved.context,
            config,
            facts: resolved.facts.as_ref(),
            destination: &resolved.destination,
            symlink: resolved.symlink.as_ref(),
            user: &self.user,
            checksum,
            prior,
        }))
    }

    fn export_with_settings(
        &self,
        obj: &dyn ObjectAdapter,
        settings: ExportSettings,
        prior: Option<&ExportDocument>,
    ) -> Result<ExportOutcome, ExportError> {
        let resolved = self.resolve(obj, settings)?;

        ensure_folder(
            resolved.destination.folder(),
            resolved.settings.createfolder,
            resolved.settings.verifyfolder,
        )?;
        let outfile = resolved.destination.absolute_path.clone();
        obj.write_to(&outfile)?;
        info!("Object written to {}", outfile.display());

        let checksum = checksum::md5_of_file(&outfile)?;

        let (metadata, metadata_path) = match self.config.as_ref() {
            Some(config) => {
                let document = assemble_document(DocumentParts {
                    obj,
                    settings: &resolved.settings,
                    context: resolved.context,
                    config,
                    facts: resolved.facts.as_ref(),
                    destination: &resolved.destination,
                    symlink: resolved.symlink.as_ref(),
                    user: &self.user,
                    checksum: Some(checksum),
                    prior,
                });
                let metafile = write_sidecar(&outfile, &document)?;
                info!("Metadata file is {}", metafile.display());
                (Some(document), Some(metafile))
            }
            None => {
                warn!("Data will be exported, but without metadata.");
                (None, None)
            }
        };

        let symlink_path = match &resolved.symlink {
            Some(link) => {
                ensure_folder(
                    link.folder(),
                    resolved.settings.createfolder,
                    resolved.settings.verifyfolder,
                )?;
                create_symlink(&outfile, &link.absolute_path)?;
                if let Some(metafile) = &metadata_path {
                    create_symlink(metafile, &sidecar_path(&link.absolute_path)?)?;
                }
                Some(link.absolute_path.clone())
            }
            None => None,
        };

        Ok(ExportOutcome {
            path: outfile,
            metadata_path,
            symlink_path,
            metadata,
        })
    }

    /// Everything about one call that is decided before any I/O happens.
    fn resolve(
        &self,
        obj: &dyn ObjectAdapter,
        settings: ExportSettings,
    ) -> Result<Resolved, ExportError> {
        let context = resolve_context(settings.fmu_context, &self.environment);

        let mut facts = if self.environment.is_fmu_run() {
            derive_fmu_facts(settings.casepath.as_deref(), &self.environment)
        } else {
            None
        };
        if let Some(forced) = settings.realization {
            if let Some(facts) = facts.as_mut() {
                facts.realization_id = Some(forced);
                facts.realname = format!("realization-{forced}");
            }
        }

        let rootpath = match &facts {
            Some(facts) => facts.casepath.clone(),
            None => match &settings.casepath {
                Some(casepath) => lexical_absolute(casepath)?,
                None => self.rootpath_outside_fmu()?,
            },
        };

        let name_for_stem = if settings.name.is_empty() {
            obj.name_hint().unwrap_or_default().to_string()
        } else {
            settings.name.clone()
        };
        let (time0, time1) = match &settings.timedata {
            Some(timedata) => {
                let (t0, t1) = timedata.ordered();
                (Some(t0.value), t1.map(|t| t.value))
            }
            None => (None, None),
        };
        let stem = build_filestem(&StemParts {
            name: &name_for_stem,
            tagname: &settings.tagname,
            parent: &settings.parent,
            time0,
            time1,
            reverse_date_pair: settings.filename_timedata_reverse,
        })?;
        let filename = format!("{stem}{}", obj.extension());

        let spec = DestinationSpec {
            rootpath: &rootpath,
            mode: context,
            realname: facts.as_ref().map_or("", |f| f.realname.as_str()),
            itername: facts.as_ref().map_or("", |f| f.itername.as_str()),
            efolder: obj.efolder(),
            is_observation: settings.is_observation,
            forcefolder: &settings.forcefolder,
            allow_forcefolder_absolute: settings.allow_forcefolder_absolute,
            subfolder: &settings.subfolder,
        };
        let destination = resolve_destination(&spec, &filename, true, context.as_str())?;

        // The case+symlink context places the file at case level and
        // mirrors it into the realization tree.
        let symlink = if context == FmuContext::CaseSymlinkRealization {
            let link_spec = DestinationSpec {
                mode: FmuContext::Realization,
                ..spec
            };
            Some(resolve_destination(
                &link_spec,
                &filename,
                false,
                context.as_str(),
            )?)
        } else {
            None
        };

        Ok(Resolved {
            settings,
            context,
            facts,
            destination,
            symlink,
        })
    }

    /// Adopt naming recorded at the preprocessed export for fields the
    /// caller left unset.
    fn file_settings(&self, file: &PreprocessedFile, overrides: &ExportOverrides) -> ExportSettings {
        let mut settings = self.settings.merged(overrides);
        let marker = file.marker();
        if settings.name.is_empty() {
            settings.name = marker.name.clone();
        }
        if settings.tagname.is_empty() {
            if let Some(tagname) = &marker.tagname {
                settings.tagname = tagname.clone();
            }
        }
        if settings.subfolder.is_empty() {
            if let Some(subfolder) = &marker.subfolder {
                settings.subfolder = subfolder.clone();
            }
        }
        settings
    }

    fn valid_config(&self) -> Result<&GlobalConfig, ExportError> {
        self.config.as_ref().ok_or_else(|| ExportError::InvalidConfig {
            problems: self.config_problems.clone(),
        })
    }

    /// Export root when no case root applies: the working directory, or
    /// two levels up inside an interactive modeling session, which runs
    /// under `<root>/rms/model`.
    fn rootpath_outside_fmu(&self) -> Result<PathBuf, ExportError> {
        let cwd = std::env::current_dir().map_err(PathError::NoWorkingDirectory)?;
        if self.environment.inside_rms {
            Ok(lexical_absolute(&cwd.join("../.."))?)
        } else {
            Ok(cwd)
        }
    }
}

struct Resolved {
    settings: ExportSettings,
    context: FmuContext,
    facts: Option<FmuFacts>,
    destination: Destination,
    symlink: Option<Destination>,
}

/// Symlink `target` pointing at `source`, replacing a previous link.
#[cfg(unix)]
fn create_symlink(source: &Path, target: &Path) -> Result<(), ExportError> {
    if target.symlink_metadata().is_ok() {
        std::fs::remove_file(target).map_err(|err| ExportError::Io {
            path: target.to_path_buf(),
            source: err,
        })?;
    }
    std::os::unix::fs::symlink(source, target).map_err(|err| ExportError::Io {
        path: target.to_path_buf(),
        source: err,
    })
}

#[cfg(not(unix))]
fn create_symlink(_source: &Path, target: &Path) -> Result<(), ExportError> {
    warn!(
        "Symlinks are not supported on this platform, skipping {}",
        target.display()
    );
    Ok(())
}
