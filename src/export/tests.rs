use super::*;

use std::fs;

use chrono::NaiveDate;

use crate::config::tests::MINIMAL_CONFIG;
use crate::content::Content;
use crate::objects::tests::small_surface;

fn config_value() -> serde_yaml::Value {
    serde_yaml::from_str(MINIMAL_CONFIG).unwrap()
}

/// A realization run rooted inside `casepath`.
fn fmu_environment(casepath: &Path) -> RunEnvironment {
    RunEnvironment {
        experiment_id: Some("6a886efc".to_string()),
        ensemble_id: Some("0ffb0037".to_string()),
        runpath: Some(casepath.join("realization-0").join("iter-0")),
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

fn case_root(dir: &tempfile::TempDir) -> PathBuf {
    let casepath = dir.path().join("mycase");
    fs::create_dir_all(&casepath).unwrap();
    casepath
}

#[test]
fn test_exporter_accepts_valid_config() {
    let exporter = Exporter::with_environment(
        Some(config_value()),
        depth_settings(),
        RunEnvironment::detached(),
    );
    assert!(exporter.config_is_valid());
    assert!(exporter.config_problems().is_empty());
}

#[test]
fn test_exporter_keeps_problems_of_invalid_config() {
    let empty: serde_yaml::Value = serde_yaml::from_str("{}").unwrap();
    let exporter =
        Exporter::with_environment(Some(empty), depth_settings(), RunEnvironment::detached());
    assert!(!exporter.config_is_valid());
    assert!(!exporter.config_problems().is_empty());
}

#[test]
fn test_generate_metadata_fails_without_valid_config() {
    let exporter =
        Exporter::with_environment(None, depth_settings(), RunEnvironment::detached());
    let err = exporter
        .generate_metadata(&small_surface(), &ExportOverrides::none(), false)
        .unwrap_err();
    assert!(matches!(err, ExportError::InvalidConfig { .. }));
    assert!(err.to_string().contains("impossible to create valid metadata"));
}

#[test]
fn test_generate_metadata_outside_fmu() {
    let exporter = Exporter::with_environment(
        Some(config_value()),
        depth_settings(),
        RunEnvironment::detached(),
    );
    let doc = exporter
        .generate_metadata(
            &small_surface(),
            &ExportOverrides::named("TopVolantis"),
            false,
        )
        .unwrap();

    assert_eq!(doc.class, "surface");
    assert!(doc.fmu.is_none());
    assert_eq!(
        doc.file.relative_path,
        Path::new("share/results/maps/topvolantis.gri")
    );
    assert!(doc.file.checksum_md5.is_none());

    // stratigraphy swaps the name and records the input as alias
    assert_eq!(doc.data.name, "VOLANTIS GP. Top");
    assert!(doc.data.stratigraphic);
    assert!(doc.data.alias.iter().any(|a| a == "TopVolantis"));
    assert_eq!(doc.data.content, "depth");
    assert_eq!(doc.data.unit, "m");
    assert_eq!(doc.data.vertical_domain.get("depth").unwrap(), "msl");

    assert_eq!(doc.version, crate::metadata::SCHEMA_VERSION);
    assert_eq!(doc.masterdata.unwrap().smda.country[0].identifier, "Norway");
}

#[test]
fn test_generate_metadata_with_checksum() {
    let exporter = Exporter::with_environment(
        Some(config_value()),
        depth_settings(),
        RunEnvironment::detached(),
    );
    let doc = exporter
        .generate_metadata(&small_surface(), &ExportOverrides::none(), true)
        .unwrap();
    let digest = doc.file.checksum_md5.unwrap();
    assert_eq!(digest.len(), 32);
    assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn test_generate_metadata_name_falls_back_to_object() {
    let exporter = Exporter::with_environment(
        Some(config_value()),
        depth_settings(),
        RunEnvironment::detached(),
    );
    let doc = exporter
        .generate_metadata(&small_surface(), &ExportOverrides::none(), false)
        .unwrap();
    // the fixture surface is named TopVolantis
    assert_eq!(
        doc.file.relative_path,
        Path::new("share/results/maps/topvolantis.gri")
    );
}

#[test]
fn test_generate_metadata_with_timedata_in_stem_and_data() {
    let exporter = Exporter::with_environment(
        Some(config_value()),
        depth_settings(),
        RunEnvironment::detached(),
    );
    let mut overrides = ExportOverrides::named("mysurface");
    overrides.timedata = Some(Timedata::pair(
        TimePoint::labeled(NaiveDate::from_ymd_opt(2022, 1, 2).unwrap(), "monitor"),
        TimePoint::labeled(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(), "base"),
    ));
    let doc = exporter
        .generate_metadata(&small_surface(), &overrides, false)
        .unwrap();

    // newest first in the stem
    assert_eq!(
        doc.file.relative_path,
        Path::new("share/results/maps/mysurface--20220102_20200101.gri")
    );
    // oldest first in the data block
    let time = doc.data.time.unwrap();
    assert_eq!(time.t0.value, "2020-01-01T00:00:00");
    assert_eq!(time.t0.label.as_deref(), Some("base"));
    assert_eq!(time.t1.unwrap().value, "2022-01-02T00:00:00");
}

#[test]
fn test_export_realization_run() {
    let dir = tempfile::tempdir().unwrap();
    let casepath = case_root(&dir);
    let exporter = Exporter::with_environment(
        Some(config_value()),
        depth_settings(),
        fmu_environment(&casepath),
    );

    let outcome = exporter
        .export(&small_surface(), &ExportOverrides::named("TopVolantis"))
        .unwrap();

    assert_eq!(
        outcome.path,
        casepath.join("realization-0/iter-0/share/results/maps/topvolantis.gri")
    );
    assert!(outcome.path.is_file());

    let metafile = outcome.metadata_path.unwrap();
    assert!(metafile.ends_with(".topvolantis.gri.yml"));
    assert!(metafile.is_file());

    let doc = outcome.metadata.unwrap();
    let fmu = doc.fmu.clone().unwrap();
    assert_eq!(fmu.model.name, "ff");
    assert_eq!(fmu.context.unwrap().stage, "realization");
    assert_eq!(fmu.realization.unwrap().id, Some(0));
    assert_eq!(fmu.iteration.unwrap().name, "iter-0");
    assert_eq!(
        doc.file.relative_path,
        Path::new("realization-0/iter-0/share/results/maps/topvolantis.gri")
    );

    // the sidecar on disk equals the returned document
    let read_back = read_metadata(&outcome.path).unwrap();
    assert_eq!(read_back, doc);

    // the recorded checksum is the checksum of the written bytes
    assert_eq!(
        read_back.file.checksum_md5.unwrap(),
        checksum::md5_of_file(&outcome.path).unwrap()
    );
}

#[test]
fn test_read_metadata_accepts_json_dialect_sidecar() {
    let dir = tempfile::tempdir().unwrap();
    let casepath = case_root(&dir);
    let exporter = Exporter::with_environment(
        Some(config_value()),
        depth_settings(),
        fmu_environment(&casepath),
    );
    let outcome = exporter
        .export(&small_surface(), &ExportOverrides::named("TopVolantis"))
        .unwrap();
    let doc = outcome.metadata.unwrap();

    // rewrite the sidecar the way the retired JSON dialect spelled it
    let metafile = outcome.metadata_path.unwrap();
    fs::remove_file(&metafile).unwrap();
    let json_file = metafile.with_extension("json");
    fs::write(&json_file, serde_json::to_string_pretty(&doc).unwrap()).unwrap();

    assert_eq!(read_metadata(&outcome.path).unwrap(), doc);
}

#[test]
fn test_export_with_invalid_config_skips_sidecar() {
    let dir = tempfile::tempdir().unwrap();
    let casepath = case_root(&dir);
    let exporter =
        Exporter::with_environment(None, depth_settings(), fmu_environment(&casepath));

    let outcome = exporter
        .export(&small_surface(), &ExportOverrides::named("mysurface"))
        .unwrap();

    assert!(outcome.path.is_file());
    assert!(outcome.metadata_path.is_none());
    assert!(outcome.metadata.is_none());

    let err = read_metadata(&outcome.path).unwrap_err();
    assert!(err
        .to_string()
        .starts_with("Cannot find requested metafile"));
}

#[test]
fn test_export_observation_goes_to_observations_tree() {
    let dir = tempfile::tempdir().unwrap();
    let casepath = case_root(&dir);
    let mut settings = depth_settings();
    settings.is_observation = true;
    let exporter = Exporter::with_environment(
        Some(config_value()),
        settings,
        fmu_environment(&casepath),
    );

    let outcome = exporter
        .export(&small_surface(), &ExportOverrides::named("obs"))
        .unwrap();
    assert_eq!(
        outcome.path,
        casepath.join("realization-0/iter-0/share/observations/maps/obs.gri")
    );
}

#[test]
fn test_export_relative_forcefolder_swaps_kind_folder() {
    let dir = tempfile::tempdir().unwrap();
    let casepath = case_root(&dir);
    let exporter = Exporter::with_environment(
        Some(config_value()),
        depth_settings(),
        fmu_environment(&casepath),
    );

    let mut overrides = ExportOverrides::named("mysurface");
    overrides.forcefolder = Some("whatever".to_string());
    let outcome = exporter.export(&small_surface(), &overrides).unwrap();
    assert_eq!(
        outcome.path,
        casepath.join("realization-0/iter-0/share/results/whatever/mysurface.gri")
    );
}

#[test]
fn test_base_settings_unchanged_by_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let casepath = case_root(&dir);
    let exporter = Exporter::with_environment(
        Some(config_value()),
        depth_settings(),
        fmu_environment(&casepath),
    );

    exporter
        .export(&small_surface(), &ExportOverrides::named("first"))
        .unwrap();
    assert_eq!(exporter.settings().name, "");

    let outcome = exporter
        .export(&small_surface(), &ExportOverrides::named("second"))
        .unwrap();
    assert!(outcome.path.ends_with("second.gri"));
}

#[test]
fn test_createfolder_disabled_requires_existing_tree() {
    let dir = tempfile::tempdir().unwrap();
    let casepath = case_root(&dir);
    let mut settings = depth_settings();
    settings.createfolder = false;
    let exporter = Exporter::with_environment(
        Some(config_value()),
        settings,
        fmu_environment(&casepath),
    );

    let err = exporter
        .export(&small_surface(), &ExportOverrides::named("nofolder"))
        .unwrap_err();
    assert!(matches!(
        err,
        ExportError::Path(PathError::MissingFolder(_))
    ));

    // once the tree exists the same export goes through
    fs::create_dir_all(casepath.join("realization-0/iter-0/share/results/maps")).unwrap();
    let outcome = exporter
        .export(&small_surface(), &ExportOverrides::named("nofolder"))
        .unwrap();
    assert!(outcome.path.is_file());
}

#[cfg(unix)]
#[test]
fn test_export_case_symlink_realization() {
    let dir = tempfile::tempdir().unwrap();
    let casepath = case_root(&dir);
    let mut settings = depth_settings();
    settings.fmu_context = Some(FmuContext::CaseSymlinkRealization);
    let exporter = Exporter::with_environment(
        Some(config_value()),
        settings,
        fmu_environment(&casepath),
    );

    let outcome = exporter
        .export(&small_surface(), &ExportOverrides::named("aggregated"))
        .unwrap();

    // physical file at case level, symlink in the realization tree
    assert_eq!(
        outcome.path,
        casepath.join("share/results/maps/aggregated.gri")
    );
    let link = outcome.symlink_path.clone().unwrap();
    assert_eq!(
        link,
        casepath.join("realization-0/iter-0/share/results/maps/aggregated.gri")
    );
    assert_eq!(outcome.symlink_or_primary(), link);
    assert!(link.symlink_metadata().unwrap().file_type().is_symlink());
    assert_eq!(fs::read_link(&link).unwrap(), outcome.path);

    // the sidecar is mirrored as well
    let link_meta = sidecar_path(&link).unwrap();
    assert!(link_meta.symlink_metadata().unwrap().file_type().is_symlink());

    let doc = outcome.metadata.unwrap();
    assert_eq!(
        doc.file.relative_path_symlink.unwrap(),
        Path::new("realization-0/iter-0/share/results/maps/aggregated.gri")
    );
}

#[test]
fn test_preprocessed_export_and_reexport() {
    let dir = tempfile::tempdir().unwrap();
    let casepath = case_root(&dir);

    // step 1: preprocessed export, carrying the marker
    let mut settings = depth_settings();
    settings.fmu_context = Some(FmuContext::Preprocessed);
    settings.tagname = "qc".to_string();
    settings.is_observation = true;
    let pre = Exporter::with_environment(
        Some(config_value()),
        settings,
        fmu_environment(&casepath),
    );
    let first = pre
        .export(&small_surface(), &ExportOverrides::named("depthsurface"))
        .unwrap();
    assert_eq!(
        first.path,
        casepath.join("share/preprocessed/maps/depthsurface--qc.gri")
    );
    let marker = first.metadata.as_ref().unwrap().preprocessed.clone().unwrap();
    assert_eq!(marker.name, "depthsurface");
    assert_eq!(marker.tagname.as_deref(), Some("qc"));

    // step 2: re-export the file into the realization tree
    let mut settings = ExportSettings::new();
    settings.is_observation = true;
    let exporter = Exporter::with_environment(
        Some(config_value()),
        settings,
        fmu_environment(&casepath),
    );
    let outcome = exporter
        .export_file(&first.path, &ExportOverrides::none())
        .unwrap();

    // naming is adopted from the marker
    assert_eq!(
        outcome.path,
        casepath.join("realization-0/iter-0/share/observations/maps/depthsurface--qc.gri")
    );
    assert!(outcome.path.is_file());

    let doc = outcome.metadata.unwrap();
    // the data description survived the re-export
    assert_eq!(doc.data.content, "depth");
    assert_eq!(doc.data.unit, "m");
    assert_eq!(doc.data.tagname.as_deref(), Some("qc"));
    // the marker is dropped once the file lives inside a case
    assert!(doc.preprocessed.is_none());
    // history is continued, not restarted
    assert_eq!(doc.tracklog.len(), 2);
    // the copied bytes are identical
    assert_eq!(
        fs::read(&first.path).unwrap(),
        fs::read(&outcome.path).unwrap()
    );
}

#[test]
fn test_export_file_requires_preprocessed_marker() {
    let dir = tempfile::tempdir().unwrap();
    let casepath = case_root(&dir);
    let exporter = Exporter::with_environment(
        Some(config_value()),
        depth_settings(),
        fmu_environment(&casepath),
    );

    // a normal export has no marker
    let plain = exporter
        .export(&small_surface(), &ExportOverrides::named("plain"))
        .unwrap();
    let err = exporter
        .export_file(&plain.path, &ExportOverrides::none())
        .unwrap_err();
    assert!(matches!(err, ExportError::NotPreprocessed));

    // and a file without metadata cannot be re-exported at all
    let bare = casepath.join("bare.gri");
    fs::write(&bare, b"x").unwrap();
    let err = exporter
        .export_file(&bare, &ExportOverrides::none())
        .unwrap_err();
    assert!(matches!(err, ExportError::Sidecar(SidecarError::NotFound(_))));

    // missing files are rejected up front
    let err = exporter
        .export_file(&casepath.join("nope.gri"), &ExportOverrides::none())
        .unwrap_err();
    assert!(matches!(err, ExportError::MissingFile(_)));
}

#[test]
fn test_casepath_is_export_root_outside_fmu() {
    let dir = tempfile::tempdir().unwrap();
    let casepath = case_root(&dir);
    let mut settings = depth_settings();
    settings.casepath = Some(casepath.clone());
    let exporter =
        Exporter::with_environment(Some(config_value()), settings, RunEnvironment::detached());

    let outcome = exporter
        .export(&small_surface(), &ExportOverrides::named("loose"))
        .unwrap();
    assert_eq!(outcome.path, casepath.join("share/results/maps/loose.gri"));
    // no provenance block outside FMU
    assert!(outcome.metadata.unwrap().fmu.is_none());
}

#[test]
fn test_explicit_casepath_wins_for_case_context() {
    let dir = tempfile::tempdir().unwrap();
    let casepath = case_root(&dir);
    // a case-stage run: experiment markers but no runpath
    let environment = RunEnvironment {
        experiment_id: Some("6a886efc".to_string()),
        ensemble_id: Some("0ffb0037".to_string()),
        runpath: None,
        realization_number: None,
        iteration_number: None,
        inside_rms: false,
    };
    let mut settings = depth_settings();
    settings.casepath = Some(casepath.clone());
    let exporter = Exporter::with_environment(Some(config_value()), settings, environment);

    let outcome = exporter
        .export(&small_surface(), &ExportOverrides::named("casefile"))
        .unwrap();
    assert_eq!(
        outcome.path,
        casepath.join("share/results/maps/casefile.gri")
    );
    let fmu = outcome.metadata.unwrap().fmu.unwrap();
    assert_eq!(fmu.context.unwrap().stage, "case");
    assert!(fmu.realization.is_none());
    assert!(fmu.iteration.is_none());
}

#[test]
fn test_case_identity_flows_from_case_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let casepath = case_root(&dir);
    let config = crate::config::tests::minimal_config();
    crate::case::CaseDocument::initialize(&casepath, &config, "mycase", "someuser", None)
        .unwrap();

    let exporter = Exporter::with_environment(
        Some(config_value()),
        depth_settings(),
        fmu_environment(&casepath),
    );
    let doc = exporter
        .generate_metadata(&small_surface(), &ExportOverrides::named("x"), false)
        .unwrap();

    let case = doc.fmu.unwrap().case.unwrap();
    assert_eq!(case.name, "mycase");
    assert_eq!(case.user.id, "someuser");
    assert!(case.uuid.is_some());
}
