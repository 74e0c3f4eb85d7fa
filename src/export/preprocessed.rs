//! Re-export of preprocessed files into a case.
//!
//! Data exported in the `preprocessed` context lives outside any case,
//! under `share/preprocessed/`. When such a file is later exported into
//! a case, the file itself is copied verbatim and its existing metadata
//! supplies the data description, so the case export does not need the
//! original object.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::metadata::{ExportDocument, PreprocessedInfo};
use crate::objects::{ObjectAdapter, ObjectError};
use crate::paths::PREPROCESSED_FOLDER;

use super::sidecar::read_metadata;
use super::ExportError;

/// A previously exported preprocessed file together with its metadata.
///
/// Acts as an [`ObjectAdapter`] that serializes by copying the source
/// file and describes itself from the prior metadata document.
#[derive(Debug)]
pub struct PreprocessedFile {
    path: PathBuf,
    extension: String,
    efolder: String,
    marker: PreprocessedInfo,
    prior: ExportDocument,
}

impl PreprocessedFile {
    /// Load a preprocessed file and its metadata sidecar.
    ///
    /// Fails when the file does not exist, when it has no sidecar, or
    /// when the sidecar lacks the `_preprocessed` marker (meaning it was
    /// not produced by a preprocessed export).
    pub fn load(path: &Path) -> Result<Self, ExportError> {
        if !path.is_file() {
            return Err(ExportError::MissingFile(path.to_path_buf()));
        }
        let prior = read_metadata(path)?;
        let marker = prior
            .preprocessed
            .clone()
            .ok_or(ExportError::NotPreprocessed)?;

        let extension = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let efolder = efolder_from_relative_path(&prior.file.relative_path);

        Ok(Self {
            path: path.to_path_buf(),
            extension,
            efolder,
            marker,
            prior,
        })
    }

    /// The prior metadata document this file was exported with.
    pub(crate) fn prior(&self) -> &ExportDocument {
        &self.prior
    }

    /// The `_preprocessed` marker from the prior export.
    pub(crate) fn marker(&self) -> &PreprocessedInfo {
        &self.marker
    }
}

/// The kind folder from a prior relative path, e.g.
/// `share/preprocessed/maps/top.gri` yields `maps`.
fn efolder_from_relative_path(relative_path: &Path) -> String {
    let components: Vec<&str> = relative_path
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .collect();
    if let Some(pos) = components.iter().position(|c| *c == PREPROCESSED_FOLDER) {
        if let Some(folder) = components.get(pos + 1) {
            // Guard against the file itself sitting directly below
            // share/preprocessed/.
            if pos + 2 < components.len() {
                return (*folder).to_string();
            }
        }
    }
    relative_path
        .parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl ObjectAdapter for PreprocessedFile {
    fn classname(&self) -> &str {
        &self.prior.class
    }

    fn efolder(&self) -> &str {
        &self.efolder
    }

    fn extension(&self) -> &str {
        &self.extension
    }

    fn format(&self) -> &str {
        &self.prior.data.format
    }

    fn layout(&self) -> Option<&str> {
        self.prior.data.layout.as_deref()
    }

    fn name_hint(&self) -> Option<&str> {
        Some(&self.marker().name)
    }

    fn bbox(&self) -> Option<Value> {
        self.prior.data.bbox.clone()
    }

    fn spec(&self) -> Option<Value> {
        self.prior.data.spec.clone()
    }

    fn write_to(&self, path: &Path) -> Result<(), ObjectError> {
        fs::copy(&self.path, path)?;
        Ok(())
    }
}
