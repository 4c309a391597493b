use super::{ExportPhase, PollOptions};
use crate::error::FsrError;

use common::ErrorLocation;
use models::ExportJobStatus;

use std::future::Future;
use std::panic::Location;
use std::time::Instant;

use backoff::backoff::{Backoff, Constant};
use log::{debug, info};
use tokio::time::sleep as TokioSleep;

/// Fetch the job status until it reads `"Export Complete"`.
///
/// Returns the final status and the number of status requests made. A
/// failed status request aborts the loop.
pub(crate) async fn poll_until_complete<F, Fut>(
    job_uuid: &str,
    options: &PollOptions,
    mut fetch_status: F,
) -> Result<(ExportJobStatus, u32), FsrError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<ExportJobStatus, FsrError>>,
{
    let started = Instant::now();
    let mut backoff = Constant::new(options.interval);
    let mut polls: u32 = 0;

    debug!("Export job {job_uuid}: {}", ExportPhase::Polling);

    loop {
        check_cancelled(job_uuid, options)?;

        let status = fetch_status().await?;
        polls += 1;

        if status.is_complete() {
            info!(
                "Export job {job_uuid}: {} after {polls} poll(s)",
                ExportPhase::Complete
            );
            return Ok((status, polls));
        }
        debug!("Export job {job_uuid} status '{}' (poll {polls})", status.status);

        let mut wait = backoff.next_backoff().unwrap_or(options.interval);
        if let Some(timeout) = options.timeout {
            let remaining = timeout.saturating_sub(started.elapsed());
            if remaining.is_zero() {
                return Err(timed_out(job_uuid, polls, started));
            }
            wait = wait.min(remaining);
        }

        match &options.cancel {
            Some(token) => {
                tokio::select! {
                    _ = token.cancelled() => return Err(cancelled(job_uuid)),
                    _ = TokioSleep(wait) => {}
                }
            }
            None => TokioSleep(wait).await,
        }

        if options
            .timeout
            .is_some_and(|timeout| started.elapsed() >= timeout)
        {
            return Err(timed_out(job_uuid, polls, started));
        }
    }
}

fn check_cancelled(job_uuid: &str, options: &PollOptions) -> Result<(), FsrError> {
    match &options.cancel {
        Some(token) if token.is_cancelled() => Err(cancelled(job_uuid)),
        _ => Ok(()),
    }
}

#[track_caller]
fn cancelled(job_uuid: &str) -> FsrError {
    FsrError::Cancelled {
        job_uuid: job_uuid.to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
}

#[track_caller]
fn timed_out(job_uuid: &str, polls: u32, started: Instant) -> FsrError {
    FsrError::PollTimeout {
        job_uuid: job_uuid.to_string(),
        polls,
        elapsed_secs: started.elapsed().as_secs(),
        location: ErrorLocation::from(Location::caller()),
    }
}
