use super::*;

use std::path::PathBuf;

fn realization_env() -> RunEnvironment {
    RunEnvironment {
        experiment_id: Some("6a8e1e0f-9315-46bb-9648-8de87151f4c7".to_string()),
        ensemble_id: Some("b027f225-c45d-477d-8f33-73695217ba14".to_string()),
        runpath: Some(PathBuf::from("/scratch/fields/user/drogon/realization-7/iter-0")),
        realization_number: Some(7),
        iteration_number: Some(0),
        inside_rms: false,
    }
}

#[test]
fn test_context_round_trips_through_strings() {
    for ctx in [
        FmuContext::Realization,
        FmuContext::Case,
        FmuContext::CaseSymlinkRealization,
        FmuContext::Preprocessed,
        FmuContext::NonFmu,
    ] {
        assert_eq!(ctx.as_str().parse::<FmuContext>().unwrap(), ctx);
    }
}

#[test]
fn test_context_parse_is_case_insensitive() {
    assert_eq!(
        "CASE_SYMLINK_REALIZATION".parse::<FmuContext>().unwrap(),
        FmuContext::CaseSymlinkRealization
    );
}

#[test]
fn test_context_parse_rejects_unknown() {
    let err = "blabla".parse::<FmuContext>().unwrap_err();
    assert!(err.to_string().contains("Invalid fmu_context"));
}

#[test]
fn test_context_serializes_to_lowercase() {
    let json = serde_json::to_string(&FmuContext::NonFmu).unwrap();
    assert_eq!(json, "\"non-fmu\"");
    let json = serde_json::to_string(&FmuContext::CaseSymlinkRealization).unwrap();
    assert_eq!(json, "\"case_symlink_realization\"");
}

#[test]
fn test_environment_implies_realization_from_runpath() {
    let env = realization_env();
    assert!(env.is_fmu_run());
    assert_eq!(env.implied_context(), Some(FmuContext::Realization));
}

#[test]
fn test_environment_implies_case_without_runpath() {
    let env = RunEnvironment {
        runpath: None,
        ..realization_env()
    };
    assert_eq!(env.implied_context(), Some(FmuContext::Case));
}

#[test]
fn test_detached_environment_implies_nothing() {
    let env = RunEnvironment::detached();
    assert!(!env.is_fmu_run());
    assert_eq!(env.implied_context(), None);
}

#[test]
fn test_resolve_defaults_to_environment() {
    assert_eq!(
        resolve_context(None, &realization_env()),
        FmuContext::Realization
    );
    assert_eq!(
        resolve_context(None, &RunEnvironment::detached()),
        FmuContext::NonFmu
    );
}

#[test]
fn test_resolve_requested_wins_inside_fmu() {
    assert_eq!(
        resolve_context(Some(FmuContext::Case), &realization_env()),
        FmuContext::Case
    );
}

#[test]
fn test_resolve_forces_non_fmu_outside_fmu() {
    let env = RunEnvironment::detached();
    assert_eq!(
        resolve_context(Some(FmuContext::Realization), &env),
        FmuContext::NonFmu
    );
    assert_eq!(
        resolve_context(Some(FmuContext::Case), &env),
        FmuContext::NonFmu
    );
}

#[test]
fn test_resolve_preprocessed_survives_outside_fmu() {
    let env = RunEnvironment::detached();
    assert_eq!(
        resolve_context(Some(FmuContext::Preprocessed), &env),
        FmuContext::Preprocessed
    );
}
