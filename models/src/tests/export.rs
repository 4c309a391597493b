use crate::{
    ConnectorRecord, ExportJobStatus, ExportOptions, ExportTemplate, ExportTemplateRecord,
    ExportTemplateSpec, ModelError,
};

use serde_json::json;

/// **VALUE**: The serialized template carries every section the platform expects,
/// including the empty placeholder lists.
///
/// **BUG THIS CATCHES**: A renamed field (e.g. `picklist_names` instead of `picklistNames`)
/// would make the platform silently export nothing for that section.
#[test]
fn given_default_options_when_serialized_then_uses_platform_field_names() {
    let template = ExportTemplate {
        name: String::from("Alert Export"),
        options: ExportOptions::default(),
        metadata: Default::default(),
    };

    let value = serde_json::to_value(&template).unwrap();

    assert_eq!(value["metadata"], json!({"autoSelectPicklists": true}));
    let options = &value["options"];
    for key in [
        "modules",
        "picklistNames",
        "connectors",
        "viewTemplates",
        "recordSets",
        "appSettings",
        "showOnlyConfigured",
        "preprocessingRules",
        "ruleChannels",
    ] {
        assert_eq!(options[key], json!([]), "missing or non-empty {key}");
    }
    assert_eq!(
        options["playbooks"],
        json!({"collections": [], "globalVariables": []})
    );
    assert_eq!(
        options["playbookBlocks"],
        json!({"blocks": [], "includeGlobalVariables": true})
    );
}

#[test]
fn given_spec_with_attributes_when_module_selections_built_then_attributes_attach() {
    let spec = ExportTemplateSpec::new("Security Config")
        .with_module("alerts")
        .with_module("incidents")
        .with_module_attributes("alerts", ["name", "status"]);

    let selections = spec.module_selections();

    assert_eq!(selections.len(), 2);
    assert_eq!(selections[0].included_attributes, vec!["name", "status"]);
    assert!(selections[1].included_attributes.is_empty());
    assert_eq!(spec.export_file_name(), "security_config.json");
}

#[test]
fn given_blank_name_when_validated_then_returns_validation_error() {
    let result = ExportTemplateSpec::new("  ").validate();

    assert!(matches!(result, Err(ModelError::InvalidTemplate { .. })));
}

#[test]
fn given_attributes_for_unexported_module_when_validated_then_rejected() {
    let result = ExportTemplateSpec::new("x")
        .with_module_attributes("alerts", ["name"])
        .validate();

    let err = result.unwrap_err().to_string();
    assert!(err.contains("alerts"));
}

#[test]
fn given_status_payloads_when_checked_then_only_literal_sentinel_completes() {
    let pending: ExportJobStatus = serde_json::from_value(json!({"status": "Pending"})).unwrap();
    let done: ExportJobStatus = serde_json::from_value(json!({
        "status": "Export Complete",
        "file": {"@id": "/api/3/files/xyz"}
    }))
    .unwrap();

    assert!(!pending.is_complete());
    assert!(pending.file_iri().is_none());
    assert!(done.is_complete());
    assert_eq!(done.file_iri(), Some("/api/3/files/xyz"));
}

#[test]
fn given_connector_record_when_export_value_built_then_follows_rpm_naming() {
    let record = ConnectorRecord {
        name: String::from("openai"),
        label: String::from("OpenAI"),
        version: String::from("1.2.0"),
    };

    assert_eq!(record.export_value(), "cyops-connector-openai-1.2.0");
}

#[test]
fn given_template_records_when_created_at_read_then_missing_dates_sort_oldest() {
    let dated: ExportTemplateRecord = serde_json::from_value(json!({
        "@id": "/api/3/export_templates/new", "name": "T", "createDate": 1700000000.5
    }))
    .unwrap();
    let undated: ExportTemplateRecord = serde_json::from_value(json!({
        "@id": "/api/3/export_templates/old", "name": "T"
    }))
    .unwrap();

    assert!(dated.created_at() > undated.created_at());
    assert_eq!(dated.uuid(), "new");
}
