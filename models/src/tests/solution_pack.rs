use crate::SolutionPack;

use serde_json::json;

#[test]
fn given_pack_with_template_when_read_then_exposes_uuid_and_file_name() {
    let pack: SolutionPack = serde_json::from_value(json!({
        "name": "SOAR Framework",
        "label": "SOAR Framework",
        "version": "1.0.0",
        "installed": true,
        "template": {"uuid": "tmpl-1", "name": "ignored"},
        "publisher": "Fortinet"
    }))
    .unwrap();

    assert!(pack.is_installed());
    assert_eq!(pack.template_uuid(), Some("tmpl-1"));
    assert_eq!(pack.export_file_name(), "SOAR Framework_1.0.0.json");
    assert_eq!(pack.extra["publisher"], json!("Fortinet"));
}

#[test]
fn given_pack_with_null_template_when_read_then_has_no_template() {
    let pack: SolutionPack =
        serde_json::from_value(json!({"name": "X", "version": "2", "template": null})).unwrap();

    assert!(pack.template_uuid().is_none());
    assert!(!pack.is_installed());
}

#[test]
fn given_pack_without_version_when_file_name_derived_then_no_trailing_separator() {
    let pack: SolutionPack = serde_json::from_value(json!({"name": "Phishing Kit"})).unwrap();

    assert_eq!(pack.version, "");
    assert_eq!(pack.export_file_name(), "Phishing Kit.json");
}
