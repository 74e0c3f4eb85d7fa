//! Integration tests for fmuio
//!
//! These tests drive the exporter through the public API only, from case
//! initialization to validated files on disk.

use std::fs;
use std::path::Path;

use fmuio::content::SeismicDetail;
use fmuio::objects::{Point, TableValue};
use fmuio::prelude::*;
use serde_json::json;
use tempfile::tempdir;

/// Global configuration shared by every test, shaped like the smallest
/// config a real asset would carry.
const GLOBAL_CONFIG: &str = r#"
model:
  name: Drogon
  revision: 2024a.1
masterdata:
  smda:
    coordinate_system:
      identifier: ST_WGS84_UTM37N_P32637
      uuid: ad214d85-8a1d-19da-e053-c918a4889309
    country:
      - identifier: Norway
        uuid: ad214d85-8a1d-19da-e053-c918a4889309
    discovery:
      - short_identifier: DROGON
        uuid: ad214d85-8a1d-19da-e053-c918a4889309
    field:
      - identifier: DROGON
        uuid: ad214d85-8a1d-19da-e053-c918a4889309
    stratigraphic_column:
      identifier: DROGON_2020
      uuid: ad214d85-8a1d-19da-e053-c918a4889309
access:
  asset:
    name: Drogon
  ssdl:
    access_level: internal
    rep_include: true
stratigraphy:
  TopVolantis:
    stratigraphic: true
    name: VOLANTIS GP. Top
    alias:
      - TopVOLANTIS
      - TOP_VOLANTIS
"#;

fn config() -> serde_yaml::Value {
    serde_yaml::from_str(GLOBAL_CONFIG).unwrap()
}

/// Environment markers of an ERT forward model job for realization 0.
fn realization_environment(casepath: &Path) -> RunEnvironment {
    RunEnvironment {
        experiment_id: Some("6a886efc-7f6a-4b4e-a971-e4e78b2a7f3b".to_string()),
        ensemble_id: Some("0ffb0037-1c58-4a72-b266-e0a8a9c1e0ff".to_string()),
        runpath: Some(casepath.join("realization-0/iter-0")),
        realization_number: Some(0),
        iteration_number: Some(0),
        inside_rms: false,
    }
}

fn depth_settings() -> ExportSettings {
    let mut settings = ExportSettings::new();
    settings.content = Content::Depth;
    settings.unit = "m".to_string();
    settings
}

fn small_surface(name: &str) -> RegularSurface {
    RegularSurface::new(
        name,
        3,
        2,
        460_000.0,
        5_930_000.0,
        50.0,
        50.0,
        0.0,
        vec![1620.0, 1625.0, 1630.0, 1622.0, f64::NAN, 1634.0],
    )
    .unwrap()
}

/// Test the full realization pipeline: initialize a case, export a
/// surface from a forward model, read the sidecar back and validate it.
#[test]
fn test_realization_export_round_trip() {
    let scratch = tempdir().unwrap();
    let casepath = scratch.path().join("my_case");
    fs::create_dir_all(&casepath).unwrap();

    // Initialize case metadata, the way an ERT pre-hook would.
    let parsed = config();
    let global = match evaluate(&parsed) {
        ConfigValidity::Valid(config) => *config,
        ConfigValidity::Invalid { problems } => panic!("config invalid: {problems:?}"),
    };
    let case_file =
        CaseDocument::initialize(&casepath, &global, "my_case", "jriv", None).unwrap();
    assert!(case_file.ends_with("share/metadata/fmu_case.yml"));

    // Export a depth surface from inside realization 0.
    let exporter = Exporter::with_environment(
        Some(parsed),
        depth_settings(),
        realization_environment(&casepath),
    );
    let mut overrides = ExportOverrides::named("TopVolantis");
    overrides.tagname = Some("ds_extract".to_string());
    let outcome = exporter.export(&small_surface("irrelevant"), &overrides).unwrap();

    assert_eq!(
        outcome.path,
        casepath.join("realization-0/iter-0/share/results/maps/topvolantis--ds_extract.gri")
    );
    assert!(outcome.path.is_file());
    let metafile = outcome.metadata_path.clone().unwrap();
    assert!(metafile.ends_with(".topvolantis--ds_extract.gri.yml"));

    // The sidecar on disk is the returned document.
    let document = read_metadata(&outcome.path).unwrap();
    assert_eq!(Some(&document), outcome.metadata.as_ref());
    assert_eq!(document.version, SCHEMA_VERSION);
    assert_eq!(document.source, SOURCE);
    assert_eq!(document.class, "surface");

    // The export name resolved against the stratigraphic column, with the
    // input name recorded as an alias.
    assert_eq!(document.data.name, "VOLANTIS GP. Top");
    assert!(document.data.stratigraphic);
    assert_eq!(
        document.data.alias,
        vec!["TopVOLANTIS", "TOP_VOLANTIS", "TopVolantis"]
    );
    assert_eq!(document.data.content, "depth");
    assert_eq!(document.data.unit, "m");
    assert!(document.file.checksum_md5.is_some());

    // Provenance points back to the initialized case.
    let fmu = document.fmu.as_ref().unwrap();
    assert_eq!(fmu.model.name, "Drogon");
    assert_eq!(fmu.context.as_ref().unwrap().stage, "realization");
    let case = fmu.case.as_ref().unwrap();
    assert_eq!(case.name, "my_case");
    assert_eq!(case.user.id, "jriv");
    assert!(case.uuid.is_some());
    assert_eq!(fmu.realization.as_ref().unwrap().id, Some(0));
    assert_eq!(fmu.iteration.as_ref().unwrap().name, "iter-0");

    // Classification came from the config's ssdl block.
    assert_eq!(document.access.classification, Classification::Internal);
    assert!(document.access.ssdl.rep_include);

    let report = validate_export(&outcome.path).unwrap();
    assert!(!report.has_failures(), "{report}");
    assert!(!report.has_warnings(), "{report}");
}

/// Test that each object kind lands in its own share folder with its
/// own file format.
#[test]
fn test_every_object_kind_lands_in_its_folder() {
    let scratch = tempdir().unwrap();
    let casepath = scratch.path().join("kinds");
    fs::create_dir_all(&casepath).unwrap();

    let exporter = Exporter::with_environment(
        Some(config()),
        depth_settings(),
        realization_environment(&casepath),
    );
    let root = casepath.join("realization-0/iter-0/share/results");

    let surface = small_surface("amplitude");
    let table = Table::new(
        "summary",
        vec!["DATE".to_string(), "FOPT".to_string()],
        vec![
            vec![TableValue::from("2020-01-01"), TableValue::from(0.0)],
            vec![TableValue::from("2020-02-01"), TableValue::from(152.5)],
        ],
    )
    .unwrap();
    let points = PointSet::new(
        "wellpicks",
        vec![Point::new(461_000.0, 5_931_000.0, 1624.5)],
    );
    let polygons = Polygons::new(
        "boundary",
        vec![vec![
            Point::new(460_000.0, 5_930_000.0, 0.0),
            Point::new(460_100.0, 5_930_000.0, 0.0),
            Point::new(460_100.0, 5_930_100.0, 0.0),
        ]],
    );
    let parameters = DictObject::new("parameters", json!({"KVKH": 0.3, "SEED": 42}));

    let cases: Vec<(&dyn ObjectAdapter, &str, &str)> = vec![
        (&surface, "maps/amplitude.gri", "surface"),
        (&table, "tables/summary.csv", "table"),
        (&points, "points/wellpicks.csv", "points"),
        (&polygons, "polygons/boundary.csv", "polygons"),
        (&parameters, "dictionaries/parameters.json", "dictionary"),
    ];
    for (object, relative, class) in cases {
        let outcome = exporter.export(object, &ExportOverrides::none()).unwrap();
        assert_eq!(outcome.path, root.join(relative));
        assert!(outcome.path.is_file());
        assert_eq!(outcome.metadata.as_ref().unwrap().class, class);

        let report = validate_export(&outcome.path).unwrap();
        assert!(!report.has_failures(), "{relative}: {report}");
    }
}

/// Test the case+symlink context: the file lives at case level and the
/// realization tree holds symlinks that validate like the original.
#[test]
fn test_case_symlink_export_validates_through_the_link() {
    let scratch = tempdir().unwrap();
    let casepath = scratch.path().join("aggregated");
    fs::create_dir_all(&casepath).unwrap();

    let mut settings = depth_settings();
    settings.fmu_context = Some(FmuContext::CaseSymlinkRealization);
    let exporter = Exporter::with_environment(
        Some(config()),
        settings,
        realization_environment(&casepath),
    );

    let outcome = exporter
        .export(&small_surface("mean_depth"), &ExportOverrides::none())
        .unwrap();

    assert_eq!(
        outcome.path,
        casepath.join("share/results/maps/mean_depth.gri")
    );
    let link = outcome.symlink_path.clone().unwrap();
    assert_eq!(
        link,
        casepath.join("realization-0/iter-0/share/results/maps/mean_depth.gri")
    );
    assert!(link.symlink_metadata().unwrap().file_type().is_symlink());
    assert_eq!(link.canonicalize().unwrap(), outcome.path.canonicalize().unwrap());

    // The sidecar is mirrored next to the link, so consumers scanning a
    // realization tree see a complete export.
    let report = validate_export(&link).unwrap();
    assert!(!report.has_failures(), "{report}");

    let document = read_metadata(&link).unwrap();
    assert_eq!(
        document.fmu.unwrap().context.unwrap().stage,
        "case_symlink_realization"
    );
    assert!(document.file.absolute_path_symlink.is_some());
}

/// Test a 4D difference export: the date pair shows newest first in the
/// filename and oldest first in the time block.
#[test]
fn test_dated_difference_export() {
    let scratch = tempdir().unwrap();
    let casepath = scratch.path().join("dated");
    fs::create_dir_all(&casepath).unwrap();

    let mut settings = ExportSettings::new();
    settings.content = Content::Seismic(SeismicDetail {
        attribute: Some("amplitude".to_string()),
        calculation: Some("mean".to_string()),
        ..SeismicDetail::default()
    });
    settings.timedata = Some(Timedata::pair(
        TimePoint::labeled(chrono::NaiveDate::from_ymd_opt(2022, 1, 2).unwrap(), "monitor"),
        TimePoint::labeled(chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(), "base"),
    ));
    let exporter = Exporter::with_environment(
        Some(config()),
        settings,
        realization_environment(&casepath),
    );

    let mut overrides = ExportOverrides::named("amplitude");
    overrides.tagname = Some("difference".to_string());
    let outcome = exporter.export(&small_surface("irrelevant"), &overrides).unwrap();

    assert!(outcome
        .path
        .ends_with("share/results/maps/amplitude--difference--20220102_20200101.gri"));

    let time = outcome.metadata.unwrap().data.time.unwrap();
    assert_eq!(time.t0.value, "2020-01-01T00:00:00");
    assert_eq!(time.t0.label.as_deref(), Some("base"));
    assert_eq!(time.t1.as_ref().unwrap().value, "2022-01-02T00:00:00");
    assert_eq!(time.t1.unwrap().label.as_deref(), Some("monitor"));
}
