//! The request dispatcher.
//!
//! Every call goes through [`FortiSoar::request`]: capability check for
//! `/auth/` paths, endpoint normalization, header merge, send, and
//! translation of failed responses into [`FsrError`].

pub mod endpoint;
mod options;
mod request;
mod response;
mod trace;

pub use options::ClientOptions;
pub use request::{ApiRequest, FilePart};
pub use response::{ApiResponse, ResponseBody};

use crate::api::{AlertsApi, ExportConfigApi, FilesApi, SolutionPacksApi};
use crate::auth::{AuthStrategy, Credentials, Operation};
use crate::cache::ResolutionCache;
use crate::config::ClientConfig;
use crate::error::FsrError;
use crate::export::PollOptions;
use endpoint::{ensure_leading_slash, is_auth_endpoint, normalize_base_url, normalize_endpoint};
use trace::RequestTracer;

use common::HttpStatusCode;

use std::fmt;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use log::{debug, warn};
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

/// An authenticated FortiSOAR session.
///
/// Built once per platform and credential; holds the connection pool, the
/// auth strategy and the name-resolution cache.
pub struct FortiSoar {
    base_url: String,
    http: Client,
    auth: Box<dyn AuthStrategy>,
    session_headers: HeaderMap,
    tracer: RequestTracer,
    cache: Mutex<ResolutionCache>,
    poll_interval: Duration,
}

impl FortiSoar {
    /// Connect and authenticate.
    ///
    /// API keys are validated and username/password is exchanged for a token
    /// before this returns.
    ///
    /// # Errors
    /// [`FsrError::InvalidInput`]/[`FsrError::UrlParse`] for a bad base URL,
    /// [`FsrError::AuthInit`] when authentication fails.
    pub async fn new(
        base_url: &str,
        credentials: Credentials,
        options: ClientOptions,
    ) -> Result<Self, FsrError> {
        let base_url = normalize_base_url(base_url)?;
        let http = build_http_client(&options)?;
        let auth = credentials.into_strategy(&http, &base_url).await?;
        debug!("Connected to {base_url} using {}", auth.auth_type());

        Ok(Self::assemble(base_url, http, auth, options))
    }

    /// Client around a caller-supplied strategy. No network I/O.
    ///
    /// # Errors
    /// Base URL and HTTP client construction errors.
    pub fn with_auth(
        base_url: &str,
        auth: Box<dyn AuthStrategy>,
        options: ClientOptions,
    ) -> Result<Self, FsrError> {
        let base_url = normalize_base_url(base_url)?;
        let http = build_http_client(&options)?;
        Ok(Self::assemble(base_url, http, auth, options))
    }

    /// # Errors
    /// [`FsrError::Config`] when the configuration is invalid, otherwise as
    /// [`FortiSoar::new`].
    pub async fn from_config(config: &ClientConfig) -> Result<Self, FsrError> {
        Self::new(
            &config.fortisoar.base_url,
            config.credentials()?,
            config.client_options(),
        )
        .await
    }

    fn assemble(
        base_url: String,
        http: Client,
        auth: Box<dyn AuthStrategy>,
        options: ClientOptions,
    ) -> Self {
        let session_headers = auth.auth_headers();
        Self {
            base_url,
            http,
            auth,
            session_headers,
            tracer: RequestTracer::new(options.verbose, options.log_sink),
            cache: Mutex::new(ResolutionCache::new()),
            poll_interval: options.poll_interval,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth(&self) -> &dyn AuthStrategy {
        self.auth.as_ref()
    }

    /// # Errors
    /// [`FsrError::UnsupportedOperation`] when the auth strategy refuses it.
    pub fn check_operation(&self, operation: Operation) -> Result<(), FsrError> {
        self.auth.check_operation_supported(operation)
    }

    /// Dispatch one request.
    ///
    /// # Errors
    /// - [`FsrError::UnsupportedOperation`] for `/auth/` paths the strategy
    ///   refuses, before any I/O
    /// - the translated error for any status ≥ 400
    /// - [`FsrError::Transport`] when no response was received
    pub async fn request(&self, request: ApiRequest) -> Result<ApiResponse, FsrError> {
        let path = ensure_leading_slash(&request.endpoint);
        if is_auth_endpoint(&path) {
            self.check_operation(Operation::Auth)?;
        }

        let mut url = Url::parse(&format!("{}{}", self.base_url, normalize_endpoint(&path)))?;
        if !request.params.is_empty() {
            url.query_pairs_mut().extend_pairs(
                request
                    .params
                    .iter()
                    .map(|(key, value)| (key.as_str(), value.as_str())),
            );
        }

        let mut headers = self.session_headers.clone();
        for (name, value) in &request.headers {
            headers.insert(name.clone(), value.clone());
        }

        self.tracer.request(
            &request.method,
            &url,
            &request.params,
            request.body.as_ref(),
            request.files.len(),
        );

        let request_line = format!("{} {url}", request.method);
        let mut builder = self.http.request(request.method.clone(), url);
        if request.files.is_empty() {
            builder = builder.headers(headers);
            if let Some(body) = &request.body {
                builder = builder.json(body);
            }
        } else {
            // The multipart boundary header is set by reqwest.
            headers.remove(CONTENT_TYPE);
            builder = builder.headers(headers).multipart(multipart_form(&request)?);
        }

        let started = Instant::now();
        let response = match builder.send().await {
            Ok(response) => response,
            Err(error) => {
                self.tracer.failure(&request_line, &error);
                return Err(match error.status() {
                    Some(status) => FsrError::from_http_response(status.as_u16(), "", request_line),
                    None => FsrError::Transport(error),
                });
            }
        };

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response.bytes().await?;

        let response = ApiResponse {
            status,
            content_type,
            body,
            elapsed: started.elapsed(),
        };
        self.tracer.response(&response);

        if HttpStatusCode::from(status).is_error() {
            let error = FsrError::from_http_response(
                status,
                &String::from_utf8_lossy(&response.body),
                request_line,
            );
            warn!("{} ({})", error, error.error_category());
            return Err(error);
        }

        Ok(response)
    }

    /// `GET`, decoded by content type.
    ///
    /// # Errors
    /// As [`FortiSoar::request`], plus [`FsrError::Decode`] for a body that
    /// is neither binary nor valid JSON.
    pub async fn get(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<ResponseBody, FsrError> {
        self.request(ApiRequest::get(endpoint).with_params(params))
            .await?
            .decode()
    }

    /// `GET` deserialized into `T`.
    ///
    /// # Errors
    /// As [`FortiSoar::get`].
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, FsrError> {
        self.request(ApiRequest::get(endpoint).with_params(params))
            .await?
            .json_as()
    }

    /// # Errors
    /// As [`FortiSoar::request`], plus [`FsrError::Decode`].
    pub async fn post(&self, endpoint: &str, body: Value) -> Result<Value, FsrError> {
        self.request(ApiRequest::post(endpoint).with_body(body))
            .await?
            .json()
    }

    /// # Errors
    /// As [`FortiSoar::request`], plus [`FsrError::Decode`].
    pub async fn put(
        &self,
        endpoint: &str,
        body: Option<Value>,
        params: &[(&str, &str)],
    ) -> Result<Value, FsrError> {
        let mut request = ApiRequest::put(endpoint).with_params(params);
        if let Some(body) = body {
            request = request.with_body(body);
        }
        self.request(request).await?.json()
    }

    /// # Errors
    /// As [`FortiSoar::request`].
    pub async fn delete(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<(), FsrError> {
        self.request(ApiRequest::delete(endpoint).with_params(params))
            .await?;
        Ok(())
    }

    /// Structured query against a module: `POST /api/query/{module}`.
    ///
    /// # Errors
    /// As [`FortiSoar::post`].
    pub async fn query(&self, module: &str, body: Value) -> Result<Value, FsrError> {
        self.post(&format!("/api/query/{module}"), body).await
    }

    pub fn alerts(&self) -> AlertsApi<'_> {
        AlertsApi::new(self)
    }

    pub fn files(&self) -> FilesApi<'_> {
        FilesApi::new(self)
    }

    pub fn export_config(&self) -> ExportConfigApi<'_> {
        ExportConfigApi::new(self)
    }

    pub fn solution_packs(&self) -> SolutionPacksApi<'_> {
        SolutionPacksApi::new(self)
    }

    /// Poll settings using the interval configured for this client.
    pub fn poll_options(&self) -> PollOptions {
        PollOptions::new(self.poll_interval)
    }

    /// Forget every cached name resolution.
    pub fn clear_cache(&self) {
        self.with_cache(ResolutionCache::clear);
    }

    pub fn cached_resolutions(&self) -> usize {
        self.with_cache(|cache| cache.len())
    }

    /// Run `f` under the cache lock. Never hold this across an await.
    pub(crate) fn with_cache<R>(&self, f: impl FnOnce(&mut ResolutionCache) -> R) -> R {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut cache)
    }
}

impl fmt::Debug for FortiSoar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FortiSoar")
            .field("base_url", &self.base_url)
            .field("auth", &self.auth.auth_type())
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

fn build_http_client(options: &ClientOptions) -> Result<Client, FsrError> {
    if !options.verify_ssl {
        warn!("TLS certificate verification is disabled");
    }

    Ok(Client::builder()
        .timeout(options.timeout)
        .danger_accept_invalid_certs(!options.verify_ssl)
        .build()?)
}

/// File parts plus the body's top-level scalar fields as text parts.
fn multipart_form(request: &ApiRequest) -> Result<Form, FsrError> {
    let mut form = Form::new();

    for file in &request.files {
        let mut part = Part::bytes(file.bytes.to_vec()).file_name(file.file_name.clone());
        if let Some(mime) = &file.mime {
            part = part
                .mime_str(mime)
                .map_err(|e| FsrError::invalid_input(format!("Invalid MIME type '{mime}': {e}")))?;
        }
        form = form.part(file.field_name.clone(), part);
    }

    if let Some(Value::Object(fields)) = &request.body {
        for (key, value) in fields {
            let text = match value {
                Value::String(text) => text.clone(),
                Value::Number(number) => number.to_string(),
                Value::Bool(flag) => flag.to_string(),
                _ => continue,
            };
            form = form.text(key.clone(), text);
        }
    }

    Ok(form)
}
