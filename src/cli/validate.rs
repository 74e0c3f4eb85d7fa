use anyhow::Result;
use log::info;
use std::path::PathBuf;

use fmuio::validator::validate_export;

/// Validate an exported file against its metadata sidecar
pub fn run(file: PathBuf) -> Result<()> {
    info!("Validating {}", file.display());

    let report = match validate_export(&file) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Validation error: {}", e);
            std::process::exit(1);
        }
    };

    #[cfg(feature = "colorized_output")]
    println!("{}", report.format_colored());

    #[cfg(not(feature = "colorized_output"))]
    println!("{}", report);

    if report.has_failures() {
        std::process::exit(1);
    }

    Ok(())
}
