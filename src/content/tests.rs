use super::*;

use serde_json::json;

#[test]
fn test_parse_plain_kind() {
    let content = Content::parse("depth", None).unwrap();
    assert_eq!(content, Content::Depth);
    assert_eq!(content.kind_str(), "depth");
    assert!(content.detail_value().is_none());
}

#[test]
fn test_parse_unknown_kind_lists_valid_ones() {
    let err = Content::parse("not_valid", None).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("Invalid content: <not_valid>!"));
    assert!(msg.contains("depth"));
    assert!(msg.contains("seismic"));
}

#[test]
fn test_parse_seismic_requires_detail() {
    let err = Content::parse("seismic", None).unwrap_err();
    assert!(err.to_string().contains("requires additional input"));
}

#[test]
fn test_parse_seismic_with_detail() {
    let detail = json!({
        "attribute": "amplitude",
        "calculation": "mean",
        "zrange": 12.0,
        "stacking_offset": "0-15",
    });
    let content = Content::parse("seismic", Some(&detail)).unwrap();
    assert_eq!(content.kind_str(), "seismic");
    assert_eq!(content.detail_value().unwrap(), detail);
}

#[test]
fn test_parse_seismic_detail_with_wrong_type_fails() {
    let detail = json!({"stacking_offset": 123.4});
    let err = Content::parse("seismic", Some(&detail)).unwrap_err();
    assert!(err.to_string().contains("impossible to create valid content"));
}

#[test]
fn test_parse_seismic_detail_with_unknown_field_fails() {
    let detail = json!({"attribute": "amplitude", "banana": 1});
    assert!(Content::parse("seismic", Some(&detail)).is_err());
}

#[test]
fn test_parse_seismic_deprecated_offset_is_remapped() {
    let detail = json!({"offset": "0-15"});
    let content = Content::parse("seismic", Some(&detail)).unwrap();
    assert_eq!(
        content.detail_value().unwrap(),
        json!({"stacking_offset": "0-15"})
    );
}

#[test]
fn test_parse_seismic_offset_conflict() {
    let detail = json!({"offset": "0-15", "stacking_offset": "15-30"});
    let err = Content::parse("seismic", Some(&detail)).unwrap_err();
    assert!(err.to_string().contains("stacking_offset"));
}

#[test]
fn test_parse_field_region_detail() {
    let content = Content::parse("field_region", Some(&json!({"id": 1}))).unwrap();
    assert_eq!(content, Content::FieldRegion(FieldRegionDetail { id: 1 }));
    assert_eq!(content.detail_value().unwrap(), json!({"id": 1}));
}

#[test]
fn test_parse_fluid_contact_requires_contact_field() {
    let err = Content::parse("fluid_contact", Some(&json!({"truncated": true}))).unwrap_err();
    assert!(matches!(err, ContentError::InvalidDetail { .. }));
}

#[test]
fn test_parse_plain_kind_rejects_detail() {
    let err = Content::parse("depth", Some(&json!({"x": 1}))).unwrap_err();
    assert!(matches!(err, ContentError::UnexpectedDetail(_)));
}

#[test]
fn test_parse_property_without_detail_warns_but_passes() {
    let content = Content::parse("property", None).unwrap();
    assert_eq!(content, Content::Property(None));
}

#[test]
fn test_empty_detail_object_counts_as_missing() {
    let err = Content::parse("seismic", Some(&json!({}))).unwrap_err();
    assert!(matches!(err, ContentError::RequiresInput(_)));
}

#[test]
fn test_non_mapping_detail_is_rejected() {
    let err = Content::parse("seismic", Some(&json!("amplitude"))).unwrap_err();
    assert!(err.to_string().starts_with("Incorrectly formatted content"));
}

#[test]
fn test_unset_content() {
    let content = Content::default();
    assert!(content.is_unset());
    assert_eq!(content.kind_str(), "unset");
}

#[test]
fn test_typed_construction_needs_no_parsing() {
    let content = Content::FluidContact(FluidContactDetail {
        contact: "owc".to_string(),
        truncated: Some(true),
    });
    assert_eq!(
        content.detail_value().unwrap(),
        json!({"contact": "owc", "truncated": true})
    );
}
