use crate::config::Config;
use crate::types::RateMeta;
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub code: String,
    pub message: String,
    pub retriable: bool,
}

#[derive(Debug, Clone)]
pub struct RestResponse<T> {
    pub value: Option<T>,
    pub error: Option<ErrorInfo>,
    pub status: StatusCode,
}

impl<T> RestResponse<T> {
    /// Collapse into a plain result; a success without a body counts as an error.
    pub fn into_result(self) -> Result<T, ErrorInfo> {
        match (self.value, self.error) {
            (Some(v), None) => Ok(v),
            (_, Some(e)) => Err(e),
            (None, None) => Err(ErrorInfo {
                code: "server_error".into(),
                message: format!("empty response (status {})", self.status),
                retriable: false,
            }),
        }
    }
}

/// Shared client for outbound calls. The timeout applies to both GitHub and
/// the LLM provider.
pub fn build_client(cfg: &Config) -> reqwest::Result<Client> {
    let mut default_headers = HeaderMap::new();
    if let Ok(ua) = HeaderValue::from_str(&cfg.user_agent) {
        default_headers.insert(USER_AGENT, ua);
    }
    Client::builder()
        .default_headers(default_headers)
        .timeout(Duration::from_secs(cfg.timeout_secs))
        .use_rustls_tls()
        .build()
}

fn auth_header(token: &str) -> Option<HeaderValue> {
    if token.is_empty() {
        return None;
    }
    HeaderValue::from_str(&format!("Bearer {}", token)).ok()
}

pub fn map_status_to_error(status: StatusCode, message: String) -> ErrorInfo {
    let (code, retriable) = match status {
        StatusCode::BAD_REQUEST => ("bad_request", false),
        StatusCode::UNAUTHORIZED => ("unauthorized", false),
        StatusCode::FORBIDDEN => ("forbidden", false),
        StatusCode::NOT_FOUND => ("not_found", false),
        StatusCode::CONFLICT => ("conflict", false),
        StatusCode::UNPROCESSABLE_ENTITY => ("unprocessable", false),
        StatusCode::TOO_MANY_REQUESTS => ("rate_limited", true),
        s if s.is_server_error() => ("upstream_error", true),
        _ => ("server_error", false),
    };
    ErrorInfo {
        code: code.to_string(),
        message,
        retriable,
    }
}

pub fn extract_rate_from_rest(headers: &HeaderMap) -> RateMeta {
    let remaining = headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<i32>().ok());
    let used = headers
        .get("x-ratelimit-used")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<i32>().ok());
    let reset_at = headers
        .get("x-ratelimit-reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<i64>().ok())
        .and_then(|epoch| chrono::DateTime::<chrono::Utc>::from_timestamp(epoch, 0))
        .map(|dt| dt.to_rfc3339());
    RateMeta {
        remaining,
        used,
        reset_at,
    }
}

fn log_rate(path: &str, status: StatusCode, rate: &RateMeta) {
    if let Some(remaining) = rate.remaining {
        debug!(
            "REST GET {} status {} rate remaining {} used {} reset {}",
            path,
            status,
            remaining,
            rate.used.unwrap_or_default(),
            rate.reset_at.as_deref().unwrap_or("-")
        );
    }
    if rate.remaining == Some(0) {
        warn!(
            "GitHub rate limit exhausted until {}",
            rate.reset_at.as_deref().unwrap_or("unknown")
        );
    }
}

/// Percent-encode a single URL path segment (owner, repo name).
pub fn encode_path_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

pub async fn rest_get_json<T: for<'de> Deserialize<'de>>(
    client: &Client,
    cfg: &Config,
    path: &str,
) -> RestResponse<T> {
    rest_get_json_with_query(client, cfg, path, &[]).await
}

/// Single GET against the GitHub REST API. No retries: failures are reported
/// back to the caller, which decides whether they are fatal.
pub async fn rest_get_json_with_query<T: for<'de> Deserialize<'de>>(
    client: &Client,
    cfg: &Config,
    path: &str,
    query: &[(&str, String)],
) -> RestResponse<T> {
    let url = format!("{}{}", cfg.api_url, path);
    let mut req = client
        .get(&url)
        .header("X-GitHub-Api-Version", &cfg.api_version)
        .header(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
    if let Some(auth) = auth_header(&cfg.github_token) {
        req = req.header(AUTHORIZATION, auth);
    }
    if !query.is_empty() {
        req = req.query(query);
    }

    let res = match req.send().await {
        Ok(r) => r,
        Err(e) => {
            warn!("REST GET {} error sending request: {}", url, e);
            return RestResponse {
                value: None,
                error: Some(ErrorInfo {
                    code: "upstream_error".into(),
                    message: e.to_string(),
                    retriable: true,
                }),
                status: StatusCode::BAD_GATEWAY,
            };
        }
    };

    let status = res.status();
    log_rate(path, status, &extract_rate_from_rest(res.headers()));

    if status.is_success() {
        return match res.json::<T>().await {
            Ok(val) => RestResponse {
                value: Some(val),
                error: None,
                status,
            },
            Err(e) => RestResponse {
                value: None,
                error: Some(ErrorInfo {
                    code: "server_error".into(),
                    message: e.to_string(),
                    retriable: false,
                }),
                status,
            },
        };
    }

    let text = res.text().await.unwrap_or_default();
    warn!("REST GET {} failed with status {}", url, status);
    RestResponse {
        value: None,
        error: Some(map_status_to_error(status, text)),
        status,
    }
}
