use std::path::Path;

use anyhow::Result;

use crate::export::md5_of_file;
use crate::metadata::ExportDocument;

use super::{ValidationCheck, ValidationReport};

/// Step 3: the document still describes the bytes on disk.
pub(crate) fn check_integrity(
    datafile: &Path,
    document: &ExportDocument,
    report: &mut ValidationReport,
) -> Result<()> {
    match &document.file.checksum_md5 {
        Some(recorded) => {
            let actual = md5_of_file(datafile)?;
            if *recorded == actual {
                report.add_check(ValidationCheck::ok("Checksum matches"));
            } else {
                report.add_check(ValidationCheck::failed(
                    "Checksum matches",
                    format!("recorded {} but the file hashes to {}", recorded, actual),
                ));
            }
        }
        None => {
            report.add_check(ValidationCheck::warning(
                "Checksum matches",
                "the document records no checksum_md5",
            ));
        }
    }

    // the relative path is the consumer index key; it must agree with the
    // recorded absolute location
    if document
        .file
        .absolute_path
        .ends_with(&document.file.relative_path)
    {
        report.add_check(ValidationCheck::ok("Recorded paths are consistent"));
    } else {
        report.add_check(ValidationCheck::failed(
            "Recorded paths are consistent",
            format!(
                "{} does not end with {}",
                document.file.absolute_path.display(),
                document.file.relative_path.display()
            ),
        ));
    }

    let described = &document.file.absolute_path;
    let same = match (datafile.canonicalize(), described.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => datafile == described.as_path(),
    };
    if same {
        report.add_check(ValidationCheck::ok("Document describes this file"));
    } else {
        report.add_check(ValidationCheck::warning(
            "Document describes this file",
            format!("the document points at {}", described.display()),
        ));
    }

    Ok(())
}
