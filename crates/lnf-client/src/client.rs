//! HTTP client for the Lost & Found reporting API.
//!
//! [`ApiClient::execute`] is the only place that talks to the network. The
//! typed endpoint methods in `lost_items`, `found_items` and `locations` fix
//! the path, method and body shape and delegate to it, so every failure
//! surfaces as a [`RequestFailure`] with a displayable message.

use std::borrow::Cow;
use std::time::Duration;

use lnf_core::AppConfig;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use hyper::ext::ReasonPhrase;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::error::RequestFailure;
use crate::payload::{ApiPayload, RequestBody, RequestOptions};

/// Origin assumed for a root-relative base URL such as `/api`.
const RELATIVE_BASE_ORIGIN: &str = "http://localhost";

/// Replaces the `token` query pair in logs and error text.
const REDACTED_TOKEN: &str = "token=[redacted]";

/// Characters `encodeURIComponent` leaves alone.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Client for the reporting API.
///
/// Holds no per-call state, so it can be cloned freely and shared across
/// tasks. Use [`ApiClient::from_config`] in binaries or
/// [`ApiClient::with_base_url`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Builds a client from the loaded application config.
    ///
    /// # Errors
    ///
    /// Returns [`RequestFailure::Transport`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, RequestFailure> {
        Self::new(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`RequestFailure::Transport`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn with_base_url(base_url: &str) -> Result<Self, RequestFailure> {
        Self::new(base_url, 30, "lnf/0.1 (lost-and-found)")
    }

    /// Creates a client with an explicit timeout and `User-Agent`.
    ///
    /// A root-relative `base_url` (the default `/api`) is resolved against
    /// `http://localhost`, since there is no page origin to inherit.
    ///
    /// # Errors
    ///
    /// Returns [`RequestFailure::Transport`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, RequestFailure> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()
            .map_err(RequestFailure::transport)?;

        let trimmed = base_url.trim().trim_end_matches('/');
        let base_url = if trimmed.starts_with('/') || trimmed.is_empty() {
            tracing::warn!(
                base_url = trimmed,
                origin = RELATIVE_BASE_ORIGIN,
                "relative API base URL; resolving against localhost"
            );
            format!("{RELATIVE_BASE_ORIGIN}{trimmed}")
        } else {
            trimmed.to_string()
        };

        Ok(Self { client, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Executes one request against `endpoint` (a path relative to the base
    /// URL, query string included) and normalizes the outcome.
    ///
    /// - non-2xx: the error body's `detail[0].msg`, scalar `detail` or
    ///   `message` becomes the failure message, falling back to the status
    ///   text or `"HTTP error! Status: <code>"`;
    /// - 204 or an empty body: [`ApiPayload::NoContent`];
    /// - `text/plain`: [`ApiPayload::Text`];
    /// - anything else: [`ApiPayload::Json`].
    ///
    /// # Errors
    ///
    /// Every failure is a [`RequestFailure`]; it is logged at error level
    /// with the request URL, management token masked, before being returned.
    pub async fn execute(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<ApiPayload, RequestFailure> {
        let url = self.url_for(endpoint);
        let method = options.method.clone();
        match self.send(&url, options).await {
            Ok(payload) => {
                tracing::debug!(%method, url = %redact_token(&url), "API request succeeded");
                Ok(payload)
            }
            Err(err) => {
                tracing::error!(
                    %method,
                    url = %redact_token(&url),
                    endpoint = %redact_token(endpoint),
                    status = ?err.status(),
                    detail = ?err.detail(),
                    error = %err,
                    "API request failed"
                );
                Err(err)
            }
        }
    }

    /// Executes a request and decodes the payload into `T`.
    ///
    /// No content decodes from `null` and text from a JSON string, so
    /// `Option<T>` targets accept an empty response.
    ///
    /// # Errors
    ///
    /// Returns any [`RequestFailure`] from [`ApiClient::execute`], or
    /// [`RequestFailure::Decode`] if the payload does not match `T`.
    pub async fn execute_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, RequestFailure> {
        let payload = self.execute(endpoint, options).await?;
        serde_json::from_value(payload.into_value()).map_err(|source| {
            let err = RequestFailure::Decode {
                message: format!(
                    "Unexpected response from {}: {source}",
                    redact_token(endpoint)
                ),
                source,
            };
            tracing::error!(
                endpoint = %redact_token(endpoint),
                error = %err,
                "API response did not match expected shape"
            );
            err
        })
    }

    pub(crate) fn url_for(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn send(&self, url: &str, options: RequestOptions) -> Result<ApiPayload, RequestFailure> {
        let url = Url::parse(url).map_err(|e| {
            RequestFailure::validation(format!(
                "Invalid request URL \"{}\": {e}",
                redact_token(url)
            ))
        })?;

        let RequestOptions {
            method,
            body,
            headers,
        } = options;

        let mut request = self.client.request(method, url);
        request = match body {
            RequestBody::Form(form) => {
                // The transport writes the multipart boundary itself.
                let mut headers = headers;
                headers.remove(CONTENT_TYPE);
                request.headers(headers).multipart(form.into_multipart()?)
            }
            RequestBody::Json(value) => {
                let bytes = serde_json::to_vec(&value).map_err(|source| RequestFailure::Decode {
                    message: format!("Could not encode request body: {source}"),
                    source,
                })?;
                request.headers(json_headers(headers)).body(bytes)
            }
            RequestBody::Empty => request.headers(json_headers(headers)),
        };

        let response = request.send().await.map_err(RequestFailure::transport)?;
        let status = response.status();

        if !status.is_success() {
            let reason = response
                .extensions()
                .get::<ReasonPhrase>()
                .and_then(|r| std::str::from_utf8(r.as_bytes()).ok())
                .map(str::to_string);
            let raw = response.text().await.unwrap_or_default();
            return Err(http_failure(status, reason.as_deref(), &raw));
        }

        let declared_empty = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.trim() == "0");
        if status == StatusCode::NO_CONTENT || declared_empty {
            return Ok(ApiPayload::NoContent);
        }

        let is_text = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("text/plain"));

        let body = response.bytes().await.map_err(RequestFailure::transport)?;
        if body.is_empty() {
            return Ok(ApiPayload::NoContent);
        }

        if is_text {
            return Ok(ApiPayload::Text(String::from_utf8_lossy(&body).into_owned()));
        }

        let value = serde_json::from_slice(&body).map_err(|source| RequestFailure::Decode {
            message: format!("Invalid JSON in response: {source}"),
            source,
        })?;
        Ok(ApiPayload::Json(value))
    }
}

/// Default `Content-Type: application/json`, overridable by the caller.
fn json_headers(caller: HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    for (name, value) in &caller {
        headers.insert(name.clone(), value.clone());
    }
    headers
}

/// Builds the failure for a non-2xx response from its raw body.
///
/// An unparseable body falls back to the reason phrase the server sent,
/// then the canonical one for the status. `reason` is only present when the
/// server's phrase differs from the canonical one.
pub(crate) fn http_failure(status: StatusCode, reason: Option<&str>, raw_body: &str) -> RequestFailure {
    let generic = format!("HTTP error! Status: {}", status.as_u16());
    let body = serde_json::from_str::<serde_json::Value>(raw_body).unwrap_or_else(|_| {
        let text = reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .or_else(|| status.canonical_reason())
            .map_or_else(|| generic.clone(), str::to_string);
        serde_json::json!({ "message": text })
    });

    let message = error_message(&body).unwrap_or(generic);
    let detail = body.get("detail").filter(|d| !d.is_null()).cloned();
    RequestFailure::Http {
        message,
        status: status.as_u16(),
        detail,
    }
}

/// `endpoint` (or a full URL) with the value of its `token` query parameter
/// masked.
pub(crate) fn redact_token(endpoint: &str) -> Cow<'_, str> {
    let Some((path, query)) = endpoint.split_once('?') else {
        return Cow::Borrowed(endpoint);
    };
    let is_token = |pair: &str| pair.starts_with("token=");
    if !query.split('&').any(is_token) {
        return Cow::Borrowed(endpoint);
    }
    let masked: Vec<&str> = query
        .split('&')
        .map(|pair| if is_token(pair) { REDACTED_TOKEN } else { pair })
        .collect();
    Cow::Owned(format!("{path}?{}", masked.join("&")))
}

/// Picks the display message out of an error body: `detail[0].msg`, then a
/// scalar `detail`, then `message`.
pub(crate) fn error_message(body: &serde_json::Value) -> Option<String> {
    let non_empty = |s: &str| (!s.trim().is_empty()).then(|| s.to_string());
    let detail = body.get("detail");

    let from_list = detail
        .and_then(|d| d.get(0))
        .and_then(|first| first.get("msg"))
        .and_then(serde_json::Value::as_str)
        .and_then(non_empty);

    let from_scalar = || match detail {
        Some(serde_json::Value::String(s)) => non_empty(s.as_str()),
        Some(v @ (serde_json::Value::Number(_) | serde_json::Value::Bool(_))) => Some(v.to_string()),
        _ => None,
    };

    let from_message = || {
        body.get("message")
            .and_then(serde_json::Value::as_str)
            .and_then(non_empty)
    };

    from_list.or_else(from_scalar).or_else(from_message)
}

/// Percent-encodes `value` the way `encodeURIComponent` does.
pub(crate) fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// True when a required identifier or token is missing.
pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
