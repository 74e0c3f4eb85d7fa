//! Metadata sidecar files.
//!
//! Each exported file `name.ext` gets a hidden YAML companion
//! `.name.ext.yml` in the same directory. Reading also accepts the
//! retired JSON dialect (`.name.ext.json`) so older exports stay
//! consumable; new sidecars are always YAML.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::metadata::ExportDocument;

/// Errors from reading or writing metadata sidecars.
#[derive(Debug, Error)]
pub enum SidecarError {
    /// The data file has no usable file name component.
    #[error("Cannot derive a metadata file name from: {}", .0.display())]
    NoFileName(PathBuf),

    /// No sidecar exists next to the data file.
    #[error("Cannot find requested metafile: {}", .0.display())]
    NotFound(PathBuf),

    /// Reading or writing the sidecar failed.
    #[error("Cannot access metadata file {}: {source}", .path.display())]
    Io {
        /// The sidecar path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The sidecar is not valid metadata YAML.
    #[error("Cannot parse metadata file {}: {source}", .path.display())]
    Yaml {
        /// The sidecar path.
        path: PathBuf,
        /// The underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },

    /// A JSON-dialect sidecar is not valid metadata.
    #[error("Cannot parse metadata file {}: {source}", .path.display())]
    Json {
        /// The sidecar path.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// The sidecar path for a data file: `dir/.name.ext.yml`.
pub fn sidecar_path(datafile: &Path) -> Result<PathBuf, SidecarError> {
    let name = datafile
        .file_name()
        .ok_or_else(|| SidecarError::NoFileName(datafile.to_path_buf()))?
        .to_string_lossy();
    let dir = datafile.parent().unwrap_or_else(|| Path::new(""));
    Ok(dir.join(format!(".{name}.yml")))
}

/// Write the metadata sidecar for a data file, returning its path.
pub fn write_sidecar(
    datafile: &Path,
    document: &ExportDocument,
) -> Result<PathBuf, SidecarError> {
    let path = sidecar_path(datafile)?;
    let yaml = serde_yaml::to_string(document).map_err(|source| SidecarError::Yaml {
        path: path.clone(),
        source,
    })?;
    fs::write(&path, yaml).map_err(|source| SidecarError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Locate the existing sidecar of a data file, preferring the YAML
/// spelling over the retired JSON one.
pub fn find_sidecar(datafile: &Path) -> Result<PathBuf, SidecarError> {
    let path = sidecar_path(datafile)?;
    if path.is_file() {
        return Ok(path);
    }
    let json = path.with_extension("json");
    if json.is_file() {
        return Ok(json);
    }
    Err(SidecarError::NotFound(path))
}

/// Read back the metadata sidecar belonging to a data file.
pub fn read_metadata(datafile: &Path) -> Result<ExportDocument, SidecarError> {
    let path = find_sidecar(datafile)?;
    let text = fs::read_to_string(&path).map_err(|source| SidecarError::Io {
        path: path.clone(),
        source,
    })?;
    if path.extension().is_some_and(|e| e == "json") {
        serde_json::from_str(&text).map_err(|source| SidecarError::Json { path, source })
    } else {
        serde_yaml::from_str(&text).map_err(|source| SidecarError::Yaml { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sidecar_path_is_hidden_yaml() {
        let path = sidecar_path(Path::new("share/results/maps/top--ds.gri")).unwrap();
        assert_eq!(path, Path::new("share/results/maps/.top--ds.gri.yml"));
    }

    #[test]
    fn test_sidecar_path_without_directory() {
        let path = sidecar_path(Path::new("volumes.csv")).unwrap();
        assert_eq!(path, Path::new(".volumes.csv.yml"));
    }

    #[test]
    fn test_read_missing_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_metadata(&dir.path().join("data.csv")).unwrap_err();
        assert!(matches!(err, SidecarError::NotFound(_)));
        assert!(err.to_string().starts_with("Cannot find requested metafile"));
    }

    #[test]
    fn test_find_sidecar_prefers_yaml_over_json() {
        let dir = tempfile::tempdir().unwrap();
        let datafile = dir.path().join("data.csv");
        fs::write(dir.path().join(".data.csv.json"), "{}").unwrap();
        assert_eq!(
            find_sidecar(&datafile).unwrap(),
            dir.path().join(".data.csv.json")
        );

        fs::write(dir.path().join(".data.csv.yml"), "").unwrap();
        assert_eq!(
            find_sidecar(&datafile).unwrap(),
            dir.path().join(".data.csv.yml")
        );
    }
}
