use crate::helpers::{fast_poll, hydra, user_client};

use fsr_client::FsrError;

use models::ExportTemplateSpec;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const ARTIFACT: &[u8] = b"PK\x03\x04 exported configuration";

/// Job status that reports pending `pending_polls` times, then completes.
async fn mount_job(server: &MockServer, job_uuid: &str, pending_polls: usize, file_iri: &str) {
    let calls = Arc::new(AtomicUsize::new(0));
    let file_iri = file_iri.to_string();

    Mock::given(method("GET"))
        .and(path(format!("/api/3/export_jobs/{job_uuid}")))
        .respond_with(move |_: &Request| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if n < pending_polls {
                ResponseTemplate::new(200).set_body_json(json!({"status": "Export In Progress"}))
            } else {
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "Export Complete", "file": {"@id": file_iri}}))
            }
        })
        .expect((pending_polls + 1) as u64)
        .named("export job status")
        .mount(server)
        .await;
}

async fn mount_artifact(server: &MockServer, file_iri: &str) {
    Mock::given(method("GET"))
        .and(path(file_iri))
        .respond_with(ResponseTemplate::new(200).set_body_raw(ARTIFACT, "application/zip"))
        .expect(1)
        .named("export artifact")
        .mount(server)
        .await;
}

/// **VALUE**: The workflow polls until completion and writes the artifact verbatim.
///
/// **WHY THIS MATTERS**: Exports are zip archives served with a binary content
/// type; any decoding on the way to disk corrupts them.
#[tokio::test]
async fn given_job_pending_twice_when_exporting_by_uuid_then_third_poll_downloads() {
    let server = MockServer::start().await;
    let client = user_client(&server).await;
    let dir = tempdir().unwrap();
    let output = dir.path().join("nightly.json");
    Mock::given(method("PUT"))
        .and(path("/api/export"))
        .and(query_param("fileName", "nightly.json"))
        .and(query_param("template", "tpl-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jobUuid": "abc"})))
        .expect(1)
        .mount(&server)
        .await;
    mount_job(&server, "abc", 2, "/api/3/files/xyz").await;
    mount_artifact(&server, "/api/3/files/xyz").await;

    let outcome = client
        .export_config()
        .export_by_template_uuid("tpl-1", Some(output.as_path()), &fast_poll())
        .await
        .unwrap();

    assert_eq!(outcome.polls, 3);
    assert_eq!(outcome.job_uuid, "abc");
    assert_eq!(outcome.file_iri, "/api/3/files/xyz");
    assert_eq!(outcome.path, output);
    assert_eq!(std::fs::read(&output).unwrap(), ARTIFACT);
}

#[tokio::test]
async fn given_template_spec_when_exporting_config_then_template_is_created_and_exported() {
    let server = MockServer::start().await;
    let client = user_client(&server).await;
    let dir = tempdir().unwrap();
    let output = dir.path().join("alerts-backup.json");
    Mock::given(method("POST"))
        .and(path("/api/3/export_templates"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"@id": "/api/3/export_templates/tpl-9", "name": "Alert Export"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/export"))
        .and(query_param("fileName", "alert_export.json"))
        .and(query_param("template", "tpl-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jobUuid": "job-9"})))
        .expect(1)
        .mount(&server)
        .await;
    mount_job(&server, "job-9", 0, "/api/3/files/f-9").await;
    mount_artifact(&server, "/api/3/files/f-9").await;

    let outcome = client
        .export_config()
        .export_config(
            &ExportTemplateSpec::new("Alert Export").with_module("alerts"),
            Some(output.as_path()),
            &fast_poll(),
        )
        .await
        .unwrap();

    assert_eq!(outcome.polls, 1);
    assert_eq!(std::fs::read(&output).unwrap(), ARTIFACT);
}

#[tokio::test]
async fn given_existing_template_name_when_exporting_then_file_name_follows_output_path() {
    let server = MockServer::start().await;
    let client = user_client(&server).await;
    let dir = tempdir().unwrap();
    let output = dir.path().join("weekly.json");
    Mock::given(method("GET"))
        .and(path("/api/3/export_templates"))
        .and(query_param("name", "Weekly"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hydra(json!([
            {"@id": "/api/3/export_templates/tpl-w", "name": "Weekly", "createDate": 1}
        ]))))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/export"))
        .and(query_param("fileName", "weekly.json"))
        .and(query_param("template", "tpl-w"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jobUuid": "job-w"})))
        .expect(1)
        .mount(&server)
        .await;
    mount_job(&server, "job-w", 1, "/api/3/files/f-w").await;
    mount_artifact(&server, "/api/3/files/f-w").await;

    let outcome = client
        .export_config()
        .export_by_template_name("Weekly", Some(output.as_path()), &fast_poll())
        .await
        .unwrap();

    assert_eq!(outcome.polls, 2);
    assert!(output.exists());
}

/// **BUG THIS CATCHES**: Triggering with a non-JSON file name leaves a job on the
/// platform whose artifact the import side rejects.
#[tokio::test]
async fn given_non_json_file_name_when_triggering_then_rejected_before_request() {
    let server = MockServer::start().await;
    let client = user_client(&server).await;
    Mock::given(method("PUT"))
        .and(path("/api/export"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jobUuid": "never"})))
        .expect(0)
        .mount(&server)
        .await;

    let error = client
        .export_config()
        .trigger_export("tpl", "export.zip")
        .await
        .unwrap_err();

    assert!(matches!(error, FsrError::InvalidInput { .. }), "{error:?}");
    assert!(error.to_string().contains("export.zip"));
}

#[tokio::test]
async fn given_non_json_output_path_when_exporting_then_no_request_is_made() {
    let server = MockServer::start().await;
    let client = user_client(&server).await;
    Mock::given(method("PUT"))
        .and(path("/api/export"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let error = client
        .export_config()
        .export_by_template_uuid("tpl-1", Some(std::path::Path::new("out.txt")), &fast_poll())
        .await
        .unwrap_err();

    assert!(matches!(error, FsrError::InvalidInput { .. }), "{error:?}");
}

#[tokio::test]
async fn given_complete_job_without_file_when_exporting_then_decode_error() {
    let server = MockServer::start().await;
    let client = user_client(&server).await;
    let dir = tempdir().unwrap();
    Mock::given(method("PUT"))
        .and(path("/api/export"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jobUuid": "bare"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/3/export_jobs/bare"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "Export Complete"})),
        )
        .mount(&server)
        .await;

    let error = client
        .export_config()
        .export_by_template_uuid("tpl-1", Some(dir.path().join("x.json").as_path()), &fast_poll())
        .await
        .unwrap_err();

    assert!(matches!(error, FsrError::Decode { .. }), "{error:?}");
}

#[tokio::test]
async fn given_job_never_completes_when_timeout_set_then_poll_timeout() {
    let server = MockServer::start().await;
    let client = user_client(&server).await;
    let dir = tempdir().unwrap();
    Mock::given(method("PUT"))
        .and(path("/api/export"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jobUuid": "slow"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/3/export_jobs/slow"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "Export In Progress"})),
        )
        .mount(&server)
        .await;
    let poll = fast_poll().with_timeout(std::time::Duration::from_millis(60));

    let error = client
        .export_config()
        .export_by_template_uuid("tpl-1", Some(dir.path().join("slow.json").as_path()), &poll)
        .await
        .unwrap_err();

    match error {
        FsrError::PollTimeout { job_uuid, polls, .. } => {
            assert_eq!(job_uuid, "slow");
            assert!(polls >= 1);
        }
        other => panic!("expected PollTimeout, got {other:?}"),
    }
}

#[tokio::test]
async fn given_status_endpoint_fails_when_polling_then_error_propagates() {
    let server = MockServer::start().await;
    let client = user_client(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/3/export_jobs/gone"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"hydra:description": "No such job"})),
        )
        .mount(&server)
        .await;

    let error = client
        .export_config()
        .get_export_status("gone")
        .await
        .unwrap_err();

    assert!(matches!(error, FsrError::ResourceNotFound { .. }), "{error:?}");
    assert!(error.to_string().contains("No such job"));
}
