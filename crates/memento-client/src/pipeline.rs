//! Authenticated request pipeline with coordinated token refresh.
//!
//! Every call goes through [`Pipeline::send`]: the current access token is
//! attached verbatim as the `Authorization` header (no scheme prefix, and
//! never on the refresh call itself), the response funnels through a single
//! status-mapping stage, and a 401 triggers one shared refresh cycle. All
//! requests in flight during a refresh observe the same rotated pair and
//! re-dispatch at most once; the completion signal is a broadcast channel,
//! not a polled flag, so no waiter can miss a refresh that settles between
//! its check and its wait.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use memento_api_models::{AuthResponse, ErrorMessage};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::broadcast;
use url::Url;

use crate::error::{ClientError, ClientResult};
use crate::events::{EventBus, UiEvent};
use crate::session::SessionHandle;
use crate::storage::SessionStore;

/// Path of the token rotation endpoint, exempt from token attachment and
/// from refresh-triggered retries.
pub(crate) const REFRESH_PATH: &str = "/api/user/refresh";

/// Default bound on any single request, covering connect and body transfer.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Correlation header echoed into server logs.
const HEADER_REQUEST_ID: &str = "x-request-id";

/// Request body variants the Memento API accepts.
#[derive(Debug, Clone)]
pub(crate) enum Body {
    /// No body.
    Empty,
    /// `application/x-www-form-urlencoded` key/value pairs.
    Form(Vec<(&'static str, String)>),
    /// Multipart form with text fields and file parts.
    Multipart(MultipartForm),
}

/// Owned multipart payload, rebuildable for the one authorization retry.
#[derive(Debug, Clone, Default)]
pub(crate) struct MultipartForm {
    pub(crate) texts: Vec<(&'static str, String)>,
    pub(crate) files: Vec<FilePart>,
}

/// A single file part of a multipart form.
#[derive(Debug, Clone)]
pub(crate) struct FilePart {
    pub(crate) field: &'static str,
    pub(crate) file_name: String,
    pub(crate) bytes: Vec<u8>,
}

impl MultipartForm {
    fn to_form(&self) -> reqwest::multipart::Form {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in &self.texts {
            form = form.text(*name, value.clone());
        }
        for part in &self.files {
            form = form.part(
                part.field,
                reqwest::multipart::Part::bytes(part.bytes.clone())
                    .file_name(part.file_name.clone()),
            );
        }
        form
    }
}

/// One logical API call: method, path relative to the base URL, query
/// parameters, and body. Held by value so it can be dispatched again after
/// a token refresh.
#[derive(Debug, Clone)]
pub(crate) struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(&'static str, String)>,
    body: Body,
}

impl ApiRequest {
    pub(crate) fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            query: Vec::new(),
            body: Body::Empty,
        }
    }

    pub(crate) fn post_form(path: impl Into<String>, fields: Vec<(&'static str, String)>) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            query: Vec::new(),
            body: Body::Form(fields),
        }
    }

    pub(crate) fn post_multipart(path: impl Into<String>, form: MultipartForm) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            query: Vec::new(),
            body: Body::Multipart(form),
        }
    }

    pub(crate) fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::DELETE,
            path: path.into(),
            query: Vec::new(),
            body: Body::Empty,
        }
    }

    pub(crate) fn query(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.query.push((name, value.into()));
        self
    }
}

/// Configuration for constructing a [`Pipeline`].
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Base URL of the Memento server.
    pub base_url: Url,
    /// Bound applied to every request.
    pub timeout: Duration,
    /// Correlation id attached to every request as `x-request-id`.
    pub request_id: Option<String>,
}

impl PipelineConfig {
    /// Configuration with the default request timeout.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
            request_id: None,
        }
    }
}

/// Shared HTTP funnel owning the transport client and refresh coordination.
#[derive(Debug)]
pub struct Pipeline {
    http: reqwest::Client,
    base_url: Url,
    session: SessionHandle,
    store: Option<SessionStore>,
    events: EventBus,
    /// `Some` while a refresh is in flight; waiters subscribe under the same
    /// lock that installs the sender, so none can miss the completion.
    refresh_gate: Mutex<Option<broadcast::Sender<()>>>,
}

impl Pipeline {
    /// Construct the pipeline around a session handle and optional
    /// persistent store.
    pub fn new(
        config: PipelineConfig,
        session: SessionHandle,
        store: Option<SessionStore>,
        events: EventBus,
    ) -> ClientResult<Self> {
        if config.base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidRequest {
                message: format!("base URL '{}' cannot carry paths", config.base_url),
            });
        }
        let mut default_headers = HeaderMap::new();
        if let Some(request_id) = &config.request_id {
            let value = HeaderValue::from_str(request_id).map_err(|_| {
                ClientError::InvalidRequest {
                    message: "request id contains invalid header characters".to_string(),
                }
            })?;
            default_headers.insert(HEADER_REQUEST_ID, value);
        }
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(|source| ClientError::Transport { source })?;
        Ok(Self {
            http,
            base_url: config.base_url,
            session,
            store,
            events,
            refresh_gate: Mutex::new(None),
        })
    }

    /// Session handle this pipeline authenticates with.
    #[must_use]
    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Event bus carrying session-expiry and toast events.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Write the current session to the persistent store, if one is
    /// configured. Persistence failures are logged, never fatal.
    pub fn persist_session(&self) {
        if let Some(store) = &self.store
            && let Err(err) = store.save(&self.session.snapshot())
        {
            tracing::warn!(error = %err, path = %store.path().display(), "failed to persist session record");
        }
    }

    fn lock_gate(&self) -> MutexGuard<'_, Option<broadcast::Sender<()>>> {
        self.refresh_gate
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Dispatch a request and run its response through the funnel,
    /// refreshing and retrying once on authorization failure.
    pub(crate) async fn send(&self, request: &ApiRequest) -> ClientResult<reqwest::Response> {
        let sent_with = self.session.access_token();
        let response = self.dispatch(request).await?;

        if request.path != REFRESH_PATH
            && response.status() == StatusCode::UNAUTHORIZED
            && sent_with.is_some()
        {
            if self.session.access_token() != sent_with {
                // A refresh settled while this response was in the air; the
                // current token may already be good. One re-dispatch, final.
                let retry = self.dispatch(request).await?;
                return self.finish(retry).await;
            }
            return self.refresh_and_retry(request).await;
        }
        self.finish(response).await
    }

    /// Convenience: send and decode a JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
    ) -> ClientResult<T> {
        let response = self.send(request).await?;
        Self::json_body(response).await
    }

    /// Convenience: send and discard the response body.
    pub(crate) async fn execute(&self, request: &ApiRequest) -> ClientResult<()> {
        self.send(request).await.map(|_| ())
    }

    /// Convenience: send and collect the raw response bytes.
    pub(crate) async fn get_bytes(&self, request: &ApiRequest) -> ClientResult<Vec<u8>> {
        let response = self.send(request).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|source| ClientError::Transport { source })?;
        Ok(bytes.to_vec())
    }

    async fn refresh_and_retry(&self, request: &ApiRequest) -> ClientResult<reqwest::Response> {
        enum Role {
            Leader(broadcast::Sender<()>),
            Waiter(broadcast::Receiver<()>),
        }

        let role = {
            let mut gate = self.lock_gate();
            match gate.as_ref() {
                Some(leader) => Role::Waiter(leader.subscribe()),
                None => {
                    let (sender, _) = broadcast::channel(1);
                    *gate = Some(sender.clone());
                    Role::Leader(sender)
                }
            }
        };

        match role {
            Role::Leader(done) => {
                let outcome = self.refresh_tokens().await;
                // Gate is cleared on every exit path before any caller
                // observes the outcome.
                *self.lock_gate() = None;
                let _ = done.send(());
                match outcome {
                    Ok(()) => {
                        let retry = self.dispatch(request).await?;
                        self.finish(retry).await
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, path = %request.path, "token refresh failed");
                        Err(ClientError::RefreshFailed)
                    }
                }
            }
            Role::Waiter(mut done) => {
                let _ = done.recv().await;
                let retry = self.dispatch(request).await?;
                self.finish(retry).await
            }
        }
    }

    /// Exchange the current refresh token for a new pair and persist it.
    ///
    /// A 400 here is terminal: the refresh credential itself is dead, so the
    /// session is cleared, persisted, and a single
    /// [`UiEvent::SessionExpired`] is emitted. Never recurses into another
    /// refresh cycle regardless of the response status.
    async fn refresh_tokens(&self) -> ClientResult<()> {
        let Some(refresh_token) = self.session.refresh_token() else {
            return Err(ClientError::Unauthorized);
        };
        let request = ApiRequest::post_form(REFRESH_PATH, vec![("refreshToken", refresh_token)]);
        let response = self.dispatch(&request).await?;
        let status = response.status();
        if status == StatusCode::BAD_REQUEST {
            let message = Self::rejection_message(response).await;
            self.session.clear();
            self.persist_session();
            self.events.emit(UiEvent::SessionExpired);
            return Err(ClientError::ServerRejected { message });
        }
        if !status.is_success() {
            return Err(ClientError::Http {
                status: status.as_u16(),
            });
        }
        let auth: AuthResponse = Self::json_body(response).await?;
        self.session.replace_tokens(auth.token);
        self.persist_session();
        Ok(())
    }

    /// Build and dispatch one attempt. Statuses are never turned into
    /// transport errors here; every response reaches the funnel.
    async fn dispatch(&self, request: &ApiRequest) -> ClientResult<reqwest::Response> {
        let url = self
            .base_url
            .join(&request.path)
            .map_err(|err| ClientError::InvalidRequest {
                message: format!("invalid request path '{}': {err}", request.path),
            })?;
        let mut builder = self.http.request(request.method.clone(), url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if request.path != REFRESH_PATH
            && let Some(token) = self.session.access_token()
            && !token.is_empty()
        {
            builder = builder.header(reqwest::header::AUTHORIZATION, token);
        }
        match &request.body {
            Body::Empty => {}
            Body::Form(fields) => builder = builder.form(fields),
            Body::Multipart(form) => builder = builder.multipart(form.to_form()),
        }
        builder
            .send()
            .await
            .map_err(|source| ClientError::Transport { source })
    }

    /// Map a final response into the caller-facing outcome.
    async fn finish(&self, response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::BAD_REQUEST {
            let message = Self::rejection_message(response).await;
            return Err(ClientError::ServerRejected { message });
        }
        if status == StatusCode::UNAUTHORIZED && self.session.access_token().is_none() {
            return Err(ClientError::Unauthorized);
        }
        Err(ClientError::Http {
            status: status.as_u16(),
        })
    }

    async fn json_body<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let bytes = response
            .bytes()
            .await
            .map_err(|source| ClientError::Transport { source })?;
        serde_json::from_slice(&bytes).map_err(|source| ClientError::Decode { source })
    }

    async fn rejection_message(response: reqwest::Response) -> String {
        let bytes = response.bytes().await.unwrap_or_default();
        serde_json::from_slice::<ErrorMessage>(&bytes).map_or_else(
            |_| {
                let text = String::from_utf8_lossy(&bytes).trim().to_string();
                if text.is_empty() {
                    "request failed".to_string()
                } else {
                    text
                }
            },
            |payload| payload.message,
        )
    }
}
