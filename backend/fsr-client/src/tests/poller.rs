use crate::error::FsrError;
use crate::export::PollOptions;
use crate::export::poller::poll_until_complete;

use models::ExportJobStatus;

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

fn pending() -> ExportJobStatus {
    serde_json::from_value(serde_json::json!({"status": "Pending"})).unwrap()
}

fn complete() -> ExportJobStatus {
    serde_json::from_value(serde_json::json!({
        "status": "Export Complete",
        "file": {"@id": "/api/3/files/xyz"}
    }))
    .unwrap()
}

fn fast() -> PollOptions {
    PollOptions::new(Duration::from_millis(5))
}

#[tokio::test]
async fn given_two_pending_statuses_when_polling_then_completes_on_third_poll() {
    let calls = Arc::new(AtomicU32::new(0));

    let (status, polls) = poll_until_complete("abc", &fast(), || {
        let calls = calls.clone();
        async move {
            match calls.fetch_add(1, Ordering::SeqCst) {
                0 | 1 => Ok::<_, FsrError>(pending()),
                _ => Ok::<_, FsrError>(complete()),
            }
        }
    })
    .await
    .unwrap();

    assert_eq!(polls, 3);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(status.file_iri(), Some("/api/3/files/xyz"));
}

#[tokio::test]
async fn given_status_request_fails_when_polling_then_error_aborts_loop() {
    let calls = Arc::new(AtomicU32::new(0));

    let result = poll_until_complete("abc", &fast(), || {
        let calls = calls.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<ExportJobStatus, _>(FsrError::from_http_response(
                404,
                "",
                "GET /api/3/export_jobs/abc",
            ))
        }
    })
    .await;

    assert!(matches!(result, Err(FsrError::ResourceNotFound { .. })));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

/// **VALUE**: A timeout bounds a job that never completes.
///
/// **BUG THIS CATCHES**: Without the deadline check the loop would spin forever on a
/// stuck platform job.
#[tokio::test]
async fn given_job_never_completes_when_timeout_elapses_then_poll_timeout() {
    let options = fast().with_timeout(Duration::from_millis(40));

    let result =
        poll_until_complete("stuck", &options, || async { Ok::<_, FsrError>(pending()) }).await;

    match result {
        Err(FsrError::PollTimeout { job_uuid, polls, .. }) => {
            assert_eq!(job_uuid, "stuck");
            assert!(polls >= 1);
        }
        other => panic!("expected PollTimeout, got {other:?}"),
    }
}

#[tokio::test]
async fn given_cancelled_token_when_polling_then_cancelled_before_any_request() {
    let token = CancellationToken::new();
    token.cancel();
    let calls = Arc::new(AtomicU32::new(0));

    let result = poll_until_complete("abc", &fast().with_cancellation(token), || {
        let calls = calls.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, FsrError>(pending())
        }
    })
    .await;

    assert!(matches!(result, Err(FsrError::Cancelled { .. })));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn given_token_cancelled_while_waiting_when_polling_then_cancelled() {
    let token = CancellationToken::new();
    let options = PollOptions::new(Duration::from_secs(60)).with_cancellation(token.clone());

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        token.cancel();
    });

    let result =
        poll_until_complete("abc", &options, || async { Ok::<_, FsrError>(pending()) }).await;
    canceller.await.unwrap();

    assert!(matches!(result, Err(FsrError::Cancelled { .. })));
}

#[test]
fn given_default_poll_options_then_unbounded_five_second_interval() {
    let options = PollOptions::default();

    assert_eq!(options.interval, Duration::from_secs(5));
    assert!(options.timeout.is_none());
    assert!(options.cancel.is_none());
}
