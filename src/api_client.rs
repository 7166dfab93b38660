use reqwest::header::{CONTENT_TYPE, HeaderMap, RETRY_AFTER};
use reqwest::{Client, Method};
use secrecy::{ExposeSecret, Secret};
use serde_json::{Value, json};
use std::time::Duration;

/// Raw (non-JSON) bodies are cut to this many characters.
pub const RAW_BODY_LIMIT: usize = 500;
/// Serialized bodies in request traces are cut to this many characters.
pub const LOGGED_BODY_LIMIT: usize = 200;

/// How the client reacts to `429 Too Many Requests`.
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff: Duration::from_secs(15),
            max_backoff: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// A `Retry-After` header expressed in seconds wins over the fixed backoff,
    /// capped at `max_backoff`.
    pub fn wait_for(&self, headers: &HeaderMap) -> Duration {
        headers
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(|seconds| Duration::from_secs(seconds).min(self.max_backoff))
            .unwrap_or(self.backoff)
    }
}

/// A single call against the API, relative to the client's base URL.
#[derive(Clone, Debug)]
pub struct ApiRequest {
    method: Method,
    path: String,
    bearer: Option<Secret<String>>,
    body: Option<Value>,
    query: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            bearer: None,
            body: None,
            query: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn bearer(mut self, token: &Secret<String>) -> Self {
        self.bearer = Some(token.clone());
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Status code and parsed body of a call.
///
/// Status `0` means the request never produced an HTTP response.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn transport_failure(error: &reqwest::Error) -> Self {
        Self {
            status: 0,
            body: json!({ "_error": describe_error(error) }),
        }
    }

    pub fn rate_limited() -> Self {
        Self {
            status: 429,
            body: json!({ "error": "Rate limited after retries" }),
        }
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.body.get(key).is_some()
    }

    /// Looks up a value by JSON pointer, e.g. `/user/id`.
    pub fn at(&self, pointer: &str) -> Option<&Value> {
        self.body.pointer(pointer)
    }

    pub fn str_at(&self, pointer: &str) -> Option<&str> {
        self.at(pointer).and_then(Value::as_str)
    }

    /// The array found at `pointer`, or an empty slice.
    pub fn array_at(&self, pointer: &str) -> &[Value] {
        self.at(pointer)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.str_at("/error").or_else(|| self.str_at("/message"))
    }
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
    http_client: Client,
    retry_policy: RetryPolicy,
}

impl ApiClient {
    pub fn new(
        base_url: String,
        timeout: Duration,
        retry_policy: RetryPolicy,
    ) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
            retry_policy,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Performs the call, absorbing every failure into the returned response.
    #[tracing::instrument(
        name = "Calling the deck builder API",
        skip_all,
        fields(method = %request.method(), path = %request.path())
    )]
    pub async fn send(&self, request: &ApiRequest) -> ApiResponse {
        let url = format!("{}{}", self.base_url, request.path);
        let mut attempt = 0;
        loop {
            let response = match self.build(request, &url).send().await {
                Ok(response) => response,
                Err(e) => {
                    tracing::warn!(error.message = %e, "Request failed before a response arrived");
                    return ApiResponse::transport_failure(&e);
                }
            };
            let status = response.status().as_u16();

            if status == 429 {
                if attempt >= self.retry_policy.max_retries {
                    tracing::warn!(retries = attempt, "Still rate limited, giving up");
                    return ApiResponse::rate_limited();
                }
                let wait = self.retry_policy.wait_for(response.headers());
                attempt += 1;
                tracing::warn!(
                    attempt,
                    wait_ms = wait.as_millis() as u64,
                    "Rate limited, retrying"
                );
                tokio::time::sleep(wait).await;
                continue;
            }

            let text = match response.text().await {
                Ok(text) => text,
                Err(e) => return ApiResponse::transport_failure(&e),
            };
            let body = parse_body(&text);
            tracing::debug!(
                status,
                body = %truncate(&body.to_string(), LOGGED_BODY_LIMIT),
                "{} {} -> {}",
                request.method,
                request.path,
                status
            );
            return ApiResponse { status, body };
        }
    }

    fn build(&self, request: &ApiRequest, url: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .http_client
            .request(request.method.clone(), url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token.expose_secret());
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        builder
    }
}

fn parse_body(text: &str) -> Value {
    serde_json::from_str(text)
        .unwrap_or_else(|_| json!({ "_raw": truncate(text, RAW_BODY_LIMIT) }))
}

fn truncate(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

fn describe_error(e: &dyn std::error::Error) -> String {
    let mut description = e.to_string();
    let mut current = e.source();
    while let Some(cause) = current {
        description.push_str(": ");
        description.push_str(&cause.to_string());
        current = cause.source();
    }
    description
}
