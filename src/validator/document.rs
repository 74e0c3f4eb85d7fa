use std::fs;
use std::path::Path;

use anyhow::Result;

use crate::metadata::{ExportDocument, EVENT_CREATED, SCHEMA_VERSION, SOURCE};

use super::{ValidationCheck, ValidationError, ValidationReport};

/// Classes the exporter can produce.
const EXPORT_CLASSES: [&str; 5] = ["surface", "table", "points", "polygons", "dictionary"];

/// Step 2: the sidecar parses and identifies itself correctly.
pub(crate) fn check_document(
    metafile: &Path,
    report: &mut ValidationReport,
) -> Result<ExportDocument> {
    let text = fs::read_to_string(metafile)?;
    let document: ExportDocument = match serde_yaml::from_str(&text) {
        Ok(document) => {
            report.add_check(ValidationCheck::ok("Metadata parses as a document"));
            document
        }
        Err(err) => {
            report.add_check(ValidationCheck::failed(
                "Metadata parses as a document",
                err.to_string(),
            ));
            anyhow::bail!(ValidationError::DocumentError(err.to_string()));
        }
    };

    if document.version == SCHEMA_VERSION {
        report.add_check(ValidationCheck::ok("Schema version"));
    } else {
        report.add_check(ValidationCheck::warning(
            "Schema version",
            format!(
                "version {} differs from the supported {}",
                document.version, SCHEMA_VERSION
            ),
        ));
    }

    if document.source == SOURCE {
        report.add_check(ValidationCheck::ok("Source is fmu"));
    } else {
        report.add_check(ValidationCheck::failed(
            "Source is fmu",
            format!("unexpected source '{}'", document.source),
        ));
    }

    if EXPORT_CLASSES.contains(&document.class.as_str()) {
        report.add_check(ValidationCheck::ok(format!("Class: {}", document.class)));
    } else {
        report.add_check(ValidationCheck::warning(
            "Known object class",
            format!("'{}' is not a class this crate exports", document.class),
        ));
    }

    if document.tracklog.iter().any(|e| e.event == EVENT_CREATED) {
        report.add_check(ValidationCheck::ok("Tracklog has a created event"));
    } else {
        report.add_check(ValidationCheck::warning(
            "Tracklog has a created event",
            "no 'created' event in the tracklog",
        ));
    }

    Ok(document)
}
