use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::info;
use std::fs;
use std::path::PathBuf;

use fmuio::case::CaseDocument;
use fmuio::config::{evaluate, ConfigValidity};
use fmuio::content::Content;
use fmuio::context::RunEnvironment;
use fmuio::export::{ExportOverrides, ExportSettings, Exporter, TimePoint, Timedata};
use fmuio::objects::RegularSurface;
use fmuio::validator::validate_export;

/// Self-contained global configuration for the demo case.
const DEMO_CONFIG: &str = r#"
model:
  name: demo
  revision: 2024a
masterdata:
  smda:
    coordinate_system:
      identifier: ST_WGS84_UTM37N_P32637
      uuid: ad214d85-8a1d-19da-e053-c918a4889309
    country:
      - identifier: Norway
        uuid: ad214d85-8a1d-19da-e053-c918a4889309
    discovery:
      - short_identifier: DemoDiscovery
        uuid: ad214d85-8a1d-19da-e053-c918a4889309
    field:
      - identifier: DemoField
        uuid: ad214d85-8a1d-19da-e053-c918a4889309
    stratigraphic_column:
      identifier: DemoStratColumn
      uuid: ad214d85-8a1d-19da-e053-c918a4889309
access:
  asset:
    name: Demo
  ssdl:
    access_level: internal
    rep_include: false
stratigraphy:
  TopVolantis:
    stratigraphic: true
    name: VOLANTIS GP. Top
    alias:
      - TopVOLANTIS
"#;

/// Export a synthetic surface into a demo case
pub fn run(output: PathBuf) -> Result<()> {
    info!("FMU export demo");
    info!("Case root: {}", output.display());

    let casepath = output;
    fs::create_dir_all(&casepath)
        .with_context(|| format!("Failed to create {}", casepath.display()))?;

    let config_value: serde_yaml::Value =
        serde_yaml::from_str(DEMO_CONFIG).context("Demo configuration must parse")?;
    let config = match evaluate(&config_value) {
        ConfigValidity::Valid(config) => *config,
        ConfigValidity::Invalid { problems } => {
            anyhow::bail!("Demo configuration is invalid: {}", problems.join("; "));
        }
    };

    let user = std::env::var("USER").unwrap_or_else(|_| "demo".to_string());
    let case_file = CaseDocument::initialize(
        &casepath,
        &config,
        "fmuio_demo",
        &user,
        Some(vec!["Synthetic case produced by the demo command".to_string()]),
    )?;
    println!("Case metadata:  {}", case_file.display());

    // a simulated realization run rooted inside the demo case
    let environment = RunEnvironment {
        experiment_id: Some(uuid::Uuid::new_v4().to_string()),
        ensemble_id: Some(uuid::Uuid::new_v4().to_string()),
        runpath: Some(casepath.join("realization-0").join("iter-0")),
        realization_number: Some(0),
        iteration_number: Some(0),
        inside_rms: false,
    };

    let mut settings = ExportSettings::new();
    settings.content = Content::Depth;
    settings.unit = "m".to_string();
    let exporter = Exporter::with_environment(Some(config_value), settings, environment);

    let surface = demo_surface()?;

    info!("Exporting a depth surface...");
    let outcome = exporter.export(&surface, &ExportOverrides::named("TopVolantis"))?;
    println!("Data file:      {}", outcome.path.display());
    if let Some(metafile) = &outcome.metadata_path {
        println!("Metadata file:  {}", metafile.display());
    }

    info!("Exporting the same surface as a 4D difference...");
    let mut overrides = ExportOverrides::named("TopVolantis");
    overrides.tagname = Some("difference".to_string());
    overrides.timedata = Some(Timedata::pair(
        TimePoint::labeled(
            NaiveDate::from_ymd_opt(2022, 1, 2).expect("valid demo date"),
            "monitor",
        ),
        TimePoint::labeled(
            NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid demo date"),
            "base",
        ),
    ));
    let dated = exporter.export(&surface, &overrides)?;
    println!("4D data file:   {}", dated.path.display());

    println!();
    let report = validate_export(&outcome.path)?;
    #[cfg(feature = "colorized_output")]
    println!("{}", report.format_colored());
    #[cfg(not(feature = "colorized_output"))]
    println!("{}", report);

    println!("Inspect a file with: fmuio inspect {}", outcome.path.display());

    Ok(())
}

/// A gentle synthetic dome, deep enough to look like a reservoir top.
fn demo_surface() -> Result<RegularSurface> {
    let ncol = 20;
    let nrow = 12;
    let mut values = Vec::with_capacity(ncol * nrow);
    for j in 0..nrow {
        for i in 0..ncol {
            let x = i as f64 / (ncol - 1) as f64 - 0.5;
            let y = j as f64 / (nrow - 1) as f64 - 0.5;
            values.push(1500.0 + 400.0 * (x * x + y * y));
        }
    }
    Ok(RegularSurface::new(
        "TopVolantis",
        ncol,
        nrow,
        460_000.0,
        5_930_000.0,
        50.0,
        50.0,
        0.0,
        values,
    )?)
}
