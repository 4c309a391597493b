use crate::helpers::{hydra, user_client};

use fsr_client::{FsrError, LookupEntity};

use models::ExportTemplateSpec;

use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

async fn mount_picklist(server: &MockServer, name: &str, iri: &str, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/api/3/picklist_names"))
        .and(query_param("name", name))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(hydra(json!([{"@id": iri, "name": name}]))),
        )
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// **VALUE**: A resolved name is never fetched twice.
///
/// **WHY THIS MATTERS**: Template builders resolve the same picklists repeatedly;
/// without the cache every export would re-query the platform for each name.
#[tokio::test]
async fn given_picklist_resolved_once_when_resolved_again_then_single_lookup_call() {
    let server = MockServer::start().await;
    let client = user_client(&server).await;
    mount_picklist(&server, "AlertStatus", "/api/3/picklist_names/ps-1", 1).await;
    let resolver = client.export_config().resolver();

    let first = resolver.picklist_iri("AlertStatus").await.unwrap();
    let second = resolver.picklist_iri("AlertStatus").await.unwrap();

    assert_eq!(first, "/api/3/picklist_names/ps-1");
    assert_eq!(second, first);
    assert_eq!(client.cached_resolutions(), 1);
}

#[tokio::test]
async fn given_cleared_cache_when_resolved_again_then_lookup_repeats() {
    let server = MockServer::start().await;
    let client = user_client(&server).await;
    mount_picklist(&server, "AlertStatus", "/api/3/picklist_names/ps-1", 2).await;
    let resolver = client.export_config().resolver();

    resolver.picklist_iri("AlertStatus").await.unwrap();
    client.clear_cache();
    resolver.picklist_iri("AlertStatus").await.unwrap();

    assert_eq!(client.cached_resolutions(), 1);
}

#[tokio::test]
async fn given_unknown_picklist_when_resolved_then_lookup_not_found_names_it() {
    let server = MockServer::start().await;
    let client = user_client(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/3/picklist_names"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hydra(json!([]))))
        .mount(&server)
        .await;

    let error = client
        .export_config()
        .resolver()
        .picklist_iri("Nope")
        .await
        .unwrap_err();

    match error {
        FsrError::LookupNotFound { entity, name, .. } => {
            assert_eq!(entity, LookupEntity::Picklist);
            assert_eq!(name, "Nope");
        }
        other => panic!("expected LookupNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn given_connector_list_when_resolving_label_then_export_value_is_built() {
    let server = MockServer::start().await;
    let client = user_client(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/integration/connectors/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hydra(json!([
            {"name": "fortiedr", "label": "FortiEDR", "version": "2.0.1"},
            {"name": "openai", "label": "OpenAI", "version": "1.2.0"}
        ]))))
        .expect(1)
        .mount(&server)
        .await;
    let resolver = client.export_config().resolver();

    let info = resolver.connector("OpenAI").await.unwrap();
    let again = resolver.connector("OpenAI").await.unwrap();

    assert_eq!(info.value, "cyops-connector-openai-1.2.0");
    assert_eq!(info.version, "1.2.0");
    assert_eq!(info.label, "OpenAI");
    assert_eq!(again, info);
}

#[tokio::test]
async fn given_playbook_collection_when_resolved_then_value_is_iri_uuid() {
    let server = MockServer::start().await;
    let client = user_client(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/3/workflow_collections"))
        .and(query_param("name", "Incident Response"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hydra(json!([
            {"@id": "/api/3/workflow_collections/wc-77", "name": "Incident Response"}
        ]))))
        .mount(&server)
        .await;

    let info = client
        .export_config()
        .resolver()
        .playbook_collection("Incident Response")
        .await
        .unwrap();

    assert_eq!(info.label, "Incident Response");
    assert_eq!(info.value, "wc-77");
}

/// **VALUE**: Duplicate template names resolve to the newest exact match.
///
/// **BUG THIS CATCHES**: Taking the first search hit would export a stale template,
/// or one whose name merely contains the search term.
#[tokio::test]
async fn given_duplicate_template_names_when_resolved_then_newest_exact_match_wins() {
    let server = MockServer::start().await;
    let client = user_client(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/3/export_templates"))
        .and(query_param("name", "Nightly"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hydra(json!([
            {"@id": "/api/3/export_templates/old", "name": "Nightly", "createDate": 1700000000},
            {"@id": "/api/3/export_templates/other", "name": "Nightly Copy", "createDate": 1800000000},
            {"@id": "/api/3/export_templates/new", "name": "Nightly", "createDate": 1750000000}
        ]))))
        .expect(1)
        .mount(&server)
        .await;
    let resolver = client.export_config().resolver();

    assert_eq!(resolver.template_uuid("Nightly").await.unwrap(), "new");
    assert_eq!(resolver.template_uuid("Nightly").await.unwrap(), "new");
}

// ----------------------------------------------------------------------------
// Template builder
// ----------------------------------------------------------------------------

/// **VALUE**: One unresolvable name aborts the template before anything is created.
///
/// **BUG THIS CATCHES**: Posting the template while resolving lazily would leave a
/// half-configured template on the platform.
#[tokio::test]
async fn given_missing_connector_when_building_template_then_nothing_is_created() {
    let server = MockServer::start().await;
    let client = user_client(&server).await;
    mount_picklist(&server, "AlertStatus", "/api/3/picklist_names/ps-1", 1).await;
    Mock::given(method("GET"))
        .and(path("/api/integration/connectors/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hydra(json!([]))))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/3/export_templates"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let spec = ExportTemplateSpec::new("Alert Export")
        .with_picklist("AlertStatus")
        .with_connector("Missing Connector");

    let error = client
        .export_config()
        .create_simplified_template(&spec)
        .await
        .unwrap_err();

    assert!(
        matches!(
            error,
            FsrError::LookupNotFound {
                entity: LookupEntity::Connector,
                ..
            }
        ),
        "{error:?}"
    );
}

#[tokio::test]
async fn given_resolvable_spec_when_building_template_then_wire_shape_is_complete() {
    let server = MockServer::start().await;
    let client = user_client(&server).await;
    mount_picklist(&server, "AlertStatus", "/api/3/picklist_names/ps-1", 1).await;
    Mock::given(method("GET"))
        .and(path("/api/integration/connectors/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hydra(json!([
            {"name": "openai", "label": "OpenAI", "version": "1.2.0"}
        ]))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/3/workflow_collections"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hydra(json!([
            {"@id": "/api/3/workflow_collections/wc-77", "name": "Incident Response"}
        ]))))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/3/export_templates"))
        .and(|request: &Request| {
            let Ok(body) = request.body_json::<Value>() else {
                return false;
            };
            let options = &body["options"];
            body["name"] == "Alert Export"
                && body["metadata"]["autoSelectPicklists"] == true
                && options["modules"] == json!([{"value": "alerts", "includedAttributes": ["name", "severity"]}])
                && options["picklistNames"] == json!(["/api/3/picklist_names/ps-1"])
                && options["connectors"][0]["value"] == "cyops-connector-openai-1.2.0"
                && options["connectors"][0]["configCount"] == 1
                && options["playbooks"]["collections"][0]["value"] == "wc-77"
                && options["viewTemplates"] == json!(["modules-alerts-list"])
                && options["rules"] == json!([])
                && options["playbookBlocks"]["includeGlobalVariables"] == true
        })
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"@id": "/api/3/export_templates/tpl-9", "name": "Alert Export"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    let spec = ExportTemplateSpec::new("Alert Export")
        .with_module("alerts")
        .with_module_attributes("alerts", ["name", "severity"])
        .with_picklist("AlertStatus")
        .with_connector("OpenAI")
        .with_playbook_collection("Incident Response")
        .with_view_template("modules-alerts-list");

    let created = client
        .export_config()
        .create_simplified_template(&spec)
        .await
        .unwrap();

    assert_eq!(created["@id"], "/api/3/export_templates/tpl-9");
    assert_eq!(client.cached_resolutions(), 3);
}
