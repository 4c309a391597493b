//! Export job polling and the outcome of an export workflow.

pub(crate) mod poller;

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// How an export job is polled.
///
/// The default polls every five seconds with no timeout and no
/// cancellation, so a job that never completes blocks forever.
#[derive(Debug, Clone)]
pub struct PollOptions {
    pub interval: Duration,
    /// Give up with [`crate::FsrError::PollTimeout`] after this long.
    pub timeout: Option<Duration>,
    /// Stop with [`crate::FsrError::Cancelled`] once cancelled.
    pub cancel: Option<CancellationToken>,
}

impl PollOptions {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            timeout: None,
            cancel: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

impl Default for PollOptions {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}

/// Result of a completed export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    /// Where the artifact was written.
    pub path: PathBuf,
    pub job_uuid: String,
    pub file_iri: String,
    /// Status requests made, including the one that saw completion.
    pub polls: u32,
}

/// Stages of an export, for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportPhase {
    Created,
    Triggered,
    Polling,
    Complete,
}

impl fmt::Display for ExportPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match self {
            ExportPhase::Created => "created",
            ExportPhase::Triggered => "triggered",
            ExportPhase::Polling => "polling",
            ExportPhase::Complete => "complete",
        };
        f.write_str(phase)
    }
}
