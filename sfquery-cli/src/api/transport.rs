//! HTTP transport seam
//!
//! The core never talks to `reqwest` directly: every call goes through the
//! [`Transport`] trait so the bootstrap and query chains can be driven by a
//! scripted transport in tests. Bodies come back already decoded into
//! `serde_json::Value`.

use super::errors::{ApiError, TransportError};
use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use std::time::Duration;

/// Where a request goes and which bearer token (if any) it carries
#[derive(Clone)]
pub struct RequestContext {
    base_uri: String,
    bearer_token: Option<String>,
}

impl RequestContext {
    /// Context for unauthenticated calls (the token endpoint)
    pub fn anonymous(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
            bearer_token: None,
        }
    }

    pub fn authenticated(base_uri: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
            bearer_token: Some(token.into()),
        }
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.bearer_token.as_deref()
    }

    pub fn url_for(&self, path: &str) -> String {
        join_url(&self.base_uri, path)
    }
}

impl std::fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("base_uri", &self.base_uri)
            .field("authenticated", &self.bearer_token.is_some())
            .finish()
    }
}

/// Raw response: status code plus decoded body
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// The body of a 200 response, or a uniform [`ApiError::Status`]
    pub fn into_success(self) -> Result<Value, ApiError> {
        if self.status == 200 {
            Ok(self.body)
        } else {
            Err(ApiError::Status {
                status_code: self.status,
                body: self.body,
            })
        }
    }
}

/// GET/POST against a base URI joined with a path
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `path` with optional query parameters
    async fn get(
        &self,
        ctx: &RequestContext,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<ApiResponse, TransportError>;

    /// POST a form-encoded body to `path`
    async fn post_form(
        &self,
        ctx: &RequestContext,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<ApiResponse, TransportError>;
}

/// GET that only accepts a 200 answer
pub(crate) async fn get_success(
    transport: &dyn Transport,
    ctx: &RequestContext,
    path: &str,
    params: &[(&str, &str)],
) -> Result<Value, ApiError> {
    debug!("GET {}", path);
    let response = transport.get(ctx, path, params).await?;
    debug!("GET {} -> {}", path, response.status);
    response.into_success()
}

/// Join a base URI and a relative path with exactly one `/` between them.
/// Absolute URLs pass through untouched.
pub fn join_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, path)
    }
}

/// Production transport backed by `reqwest`
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport whose every request gives up after `timeout`
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<ApiResponse, TransportError> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        Ok(ApiResponse::new(status, decode_body(text)))
    }

    fn authorize(&self, request: reqwest::RequestBuilder, ctx: &RequestContext) -> reqwest::RequestBuilder {
        match ctx.bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Empty bodies become `null`, non-JSON bodies are kept as a string
fn decode_body(text: String) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(
        &self,
        ctx: &RequestContext,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<ApiResponse, TransportError> {
        let mut request = self
            .client
            .get(ctx.url_for(path))
            .header("Accept", "application/json");
        if !params.is_empty() {
            request = request.query(params);
        }
        self.send(self.authorize(request, ctx)).await
    }

    async fn post_form(
        &self,
        ctx: &RequestContext,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<ApiResponse, TransportError> {
        let request = self
            .client
            .post(ctx.url_for(path))
            .header("Accept", "application/json")
            .form(form);
        self.send(self.authorize(request, ctx)).await
    }
}
