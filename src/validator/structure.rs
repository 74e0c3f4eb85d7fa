use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::export::find_sidecar;

use super::{ValidationCheck, ValidationError, ValidationReport};

/// Step 1: the data file and its metadata sidecar exist.
pub(crate) fn check_structure(path: &Path, report: &mut ValidationReport) -> Result<PathBuf> {
    if !path.is_file() {
        report.add_check(ValidationCheck::failed(
            "Data file exists",
            format!("No such file: {}", path.display()),
        ));
        anyhow::bail!(ValidationError::StructureError(format!(
            "the data file {} does not exist",
            path.display()
        )));
    }
    report.add_check(ValidationCheck::ok("Data file exists"));

    let metafile = match find_sidecar(path) {
        Ok(metafile) => metafile,
        Err(err) => {
            report.add_check(ValidationCheck::failed(
                "Metadata file exists",
                err.to_string(),
            ));
            anyhow::bail!(ValidationError::StructureError(format!(
                "no metadata file next to {}",
                path.display()
            )));
        }
    };
    report.add_check(ValidationCheck::ok("Metadata file exists"));

    Ok(metafile)
}
