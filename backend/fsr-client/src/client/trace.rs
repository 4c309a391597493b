//! Verbose request/response tracing.
//!
//! Records go to the client's own sink so several clients can trace
//! independently. Nothing here can fail the call being traced.

use super::response::ApiResponse;

use std::fmt::Arguments;
use std::sync::Arc;

use log::{Level, Log, Record};
use reqwest::Method;
use serde_json::Value;
use url::Url;

const TRACE_TARGET: &str = "fsr_client::http";
const SEPARATOR: &str = "==================================================";
/// Bodies up to this size are logged as text, larger ones as a byte count.
const MAX_LOGGED_BODY: usize = 1000;

#[derive(Clone)]
pub(crate) struct RequestTracer {
    enabled: bool,
    sink: Option<Arc<dyn Log>>,
}

impl RequestTracer {
    pub(crate) fn new(enabled: bool, sink: Option<Arc<dyn Log>>) -> Self {
        Self { enabled, sink }
    }

    fn emit(&self, level: Level, args: Arguments<'_>) {
        let record = Record::builder()
            .args(args)
            .level(level)
            .target(TRACE_TARGET)
            .module_path_static(Some(module_path!()))
            .file_static(Some(file!()))
            .build();

        match &self.sink {
            Some(sink) => {
                if sink.enabled(record.metadata()) {
                    sink.log(&record);
                }
            }
            None => {
                if level <= log::max_level() {
                    log::logger().log(&record);
                }
            }
        }
    }

    pub(crate) fn request(
        &self,
        method: &Method,
        url: &Url,
        params: &[(String, String)],
        body: Option<&Value>,
        file_count: usize,
    ) {
        if !self.enabled {
            return;
        }

        self.emit(Level::Info, format_args!("{SEPARATOR}"));
        self.emit(Level::Info, format_args!("Request: {method} {url}"));
        for (key, value) in params {
            self.emit(Level::Info, format_args!("  param {key}: {value}"));
        }
        if let Some(body) = body {
            self.emit(Level::Info, format_args!("  body: {body}"));
        }
        if file_count > 0 {
            self.emit(Level::Info, format_args!("  files: {file_count}"));
        }
    }

    pub(crate) fn response(&self, response: &ApiResponse) {
        if !self.enabled {
            return;
        }

        self.emit(
            Level::Info,
            format_args!(
                "Response: HTTP {} in {:.2}s",
                response.status,
                response.elapsed.as_secs_f64()
            ),
        );

        if response.is_json() {
            match serde_json::from_slice::<Value>(&response.body)
                .ok()
                .and_then(|value| serde_json::to_string_pretty(&value).ok())
            {
                Some(pretty) => self.emit(Level::Info, format_args!("Response JSON:\n{pretty}")),
                None => {
                    let text = truncated_text(&response.body);
                    self.emit(Level::Info, format_args!("Response Text: {text}..."));
                }
            }
        } else if response.body.len() < MAX_LOGGED_BODY {
            let text = String::from_utf8_lossy(&response.body);
            self.emit(Level::Info, format_args!("Response Text: {text}"));
        } else {
            self.emit(
                Level::Info,
                format_args!("Response Content Length: {} bytes", response.body.len()),
            );
        }
        self.emit(Level::Info, format_args!("{SEPARATOR}"));
    }

    pub(crate) fn failure(&self, request: &str, error: &reqwest::Error) {
        if self.enabled {
            self.emit(Level::Error, format_args!("Request failed: {request}: {error}"));
        }
    }
}

fn truncated_text(body: &[u8]) -> String {
    String::from_utf8_lossy(body)
        .chars()
        .take(MAX_LOGGED_BODY)
        .collect()
}
