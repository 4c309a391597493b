use crate::export::PollOptions;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use log::Log;

const DEFAULT_TIMEOUT_DURATION: Duration = Duration::from_secs(30);

/// Construction-time settings of a [`crate::FortiSoar`] client.
#[derive(Clone)]
pub struct ClientOptions {
    pub verify_ssl: bool,
    /// Trace every request and response to the log sink.
    pub verbose: bool,
    pub timeout: Duration,
    /// Interval used by [`crate::FortiSoar::poll_options`].
    pub poll_interval: Duration,
    /// Where verbose traces go. `None` uses the global `log` logger.
    pub log_sink: Option<Arc<dyn Log>>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            verify_ssl: true,
            verbose: false,
            timeout: DEFAULT_TIMEOUT_DURATION,
            poll_interval: PollOptions::DEFAULT_INTERVAL,
            log_sink: None,
        }
    }
}

impl ClientOptions {
    pub fn with_verify_ssl(mut self, verify_ssl: bool) -> Self {
        self.verify_ssl = verify_ssl;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_log_sink(mut self, sink: Arc<dyn Log>) -> Self {
        self.log_sink = Some(sink);
        self
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("verify_ssl", &self.verify_ssl)
            .field("verbose", &self.verbose)
            .field("timeout", &self.timeout)
            .field("poll_interval", &self.poll_interval)
            .field("log_sink", &self.log_sink.as_ref().map(|_| "custom"))
            .finish()
    }
}
