use crate::helpers::{api_key_client, hydra};

use fsr_client::FsrError;

use std::io::Write;

use serde_json::{Value, json};
use tempfile::{NamedTempFile, tempdir};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

// ----------------------------------------------------------------------------
// Alerts
// ----------------------------------------------------------------------------

#[tokio::test]
async fn given_alerts_when_listing_with_params_then_collection_is_returned() {
    let server = MockServer::start().await;
    let client = api_key_client(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/3/alerts"))
        .and(query_param("$limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hydra(json!([
            {"@id": "/api/3/alerts/a-1", "name": "Phishing"},
            {"@id": "/api/3/alerts/a-2", "name": "Malware"}
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let page = client.alerts().list(&[("$limit", "2")]).await.unwrap();

    assert_eq!(page["hydra:totalItems"], 2);
    assert_eq!(page["hydra:member"][1]["name"], "Malware");
}

#[tokio::test]
async fn given_alert_lifecycle_when_crud_calls_made_then_each_hits_its_route() {
    let server = MockServer::start().await;
    let client = api_key_client(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/3/alerts"))
        .and(body_json(json!({"name": "Suspicious login", "severity": "High"})))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"@id": "/api/3/alerts/a-9", "name": "Suspicious login"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/3/alerts/a-9"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"@id": "/api/3/alerts/a-9", "status": "Open"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/3/alerts/a-9"))
        .and(body_json(json!({"status": "Closed"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"@id": "/api/3/alerts/a-9", "status": "Closed"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/3/alerts/a-9"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let alerts = client.alerts();

    let created = alerts
        .create(json!({"name": "Suspicious login", "severity": "High"}))
        .await
        .unwrap();
    let fetched = alerts.get("a-9").await.unwrap();
    let updated = alerts.update("a-9", json!({"status": "Closed"})).await.unwrap();
    alerts.delete("a-9").await.unwrap();

    assert_eq!(created["@id"], "/api/3/alerts/a-9");
    assert_eq!(fetched["status"], "Open");
    assert_eq!(updated["status"], "Closed");
}

#[tokio::test]
async fn given_missing_alert_when_fetched_then_resource_not_found() {
    let server = MockServer::start().await;
    let client = api_key_client(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/3/alerts/nope"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "Alert not found"})),
        )
        .mount(&server)
        .await;

    let error = client.alerts().get("nope").await.unwrap_err();

    assert!(matches!(error, FsrError::ResourceNotFound { .. }), "{error:?}");
    assert_eq!(error.status_code(), Some(404));
}

// ----------------------------------------------------------------------------
// Files
// ----------------------------------------------------------------------------

fn is_multipart_with(request: &Request, needle: &str) -> bool {
    let is_multipart = request
        .headers
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"));
    is_multipart && String::from_utf8_lossy(&request.body).contains(needle)
}

/// **VALUE**: Uploads go out as multipart with the file under field `file`.
///
/// **BUG THIS CATCHES**: Leaving the session's JSON content type on the request
/// makes the platform reject the upload body.
#[tokio::test]
async fn given_bytes_when_uploaded_then_multipart_file_field_is_sent() {
    let server = MockServer::start().await;
    let client = api_key_client(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/3/files"))
        .and(header("Authorization", "API-KEY test-api-key-0001"))
        .and(|request: &Request| {
            is_multipart_with(request, "name=\"file\"; filename=\"notes.txt\"")
                && is_multipart_with(request, "incident notes")
        })
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"@id": "/api/3/files/f-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let uploaded = client
        .files()
        .upload_bytes("notes.txt", &b"incident notes"[..], Some("text/plain"))
        .await
        .unwrap();

    assert_eq!(uploaded["@id"], "/api/3/files/f-1");
}

#[tokio::test]
async fn given_local_file_when_uploaded_then_its_name_and_content_are_sent() {
    let server = MockServer::start().await;
    let client = api_key_client(&server).await;
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"evidence bytes").unwrap();
    let expected_name = file
        .path()
        .file_name()
        .unwrap()
        .to_string_lossy()
        .into_owned();
    let needle = format!("filename=\"{expected_name}\"");
    Mock::given(method("POST"))
        .and(path("/api/3/files"))
        .and(move |request: &Request| {
            is_multipart_with(request, &needle) && is_multipart_with(request, "evidence bytes")
        })
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"@id": "/api/3/files/f-2"})))
        .expect(1)
        .mount(&server)
        .await;

    let uploaded = client.files().upload(file.path()).await.unwrap();

    assert_eq!(uploaded["@id"], "/api/3/files/f-2");
}

#[tokio::test]
async fn given_missing_local_file_when_uploaded_then_io_error_without_request() {
    let server = MockServer::start().await;
    let client = api_key_client(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/3/files"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let dir = tempdir().unwrap();

    let error = client
        .files()
        .upload(dir.path().join("absent.bin"))
        .await
        .unwrap_err();

    assert!(matches!(error, FsrError::Io { .. }), "{error:?}");
}

#[tokio::test]
async fn given_binary_file_when_downloaded_then_bytes_are_written_verbatim() {
    let server = MockServer::start().await;
    let client = api_key_client(&server).await;
    let payload: Vec<u8> = (0u8..=255).collect();
    Mock::given(method("GET"))
        .and(path("/api/3/files/f-3"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(payload.clone(), "application/octet-stream"),
        )
        .expect(1)
        .mount(&server)
        .await;
    let dir = tempdir().unwrap();
    let target = dir.path().join("download.bin");

    let written = client
        .files()
        .download("/api/3/files/f-3", &target)
        .await
        .unwrap();

    assert_eq!(written, target);
    assert_eq!(std::fs::read(&target).unwrap(), payload);
}

#[tokio::test]
async fn given_json_file_when_downloaded_then_body_is_not_reformatted() {
    let server = MockServer::start().await;
    let client = api_key_client(&server).await;
    let raw = "{ \"keep\" :  \"spacing\" }";
    Mock::given(method("GET"))
        .and(path("/api/3/files/f-4"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(raw, "application/json"))
        .mount(&server)
        .await;
    let dir = tempdir().unwrap();
    let target = dir.path().join("export.json");

    client
        .files()
        .download("/api/3/files/f-4", &target)
        .await
        .unwrap();

    assert_eq!(std::fs::read_to_string(&target).unwrap(), raw);
    let parsed: Value = serde_json::from_str(raw).unwrap();
    assert_eq!(parsed["keep"], "spacing");
}
