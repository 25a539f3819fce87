use crate::config::Config;
use crate::github::GitHubClient;
use crate::http::{self, ErrorInfo};
use crate::input::{self, LenientJson};
use crate::llm::LlmClient;
use crate::search::{run_search, SearchRequest, SearchResponse};
use crate::suggest::{
    default_languages, default_tool_groups, fallback_summary, suggest_languages, suggest_tools,
    summarize_issue, ToolGroups,
};
use crate::types::Summary;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::CorsLayer;

pub const MISSING_ISSUE: &str = "Missing issue data.";

/// Per-process state handed to every handler. Read-only.
#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub llm: LlmClient,
    pub github: GitHubClient,
}

impl AppState {
    pub fn new(cfg: Config) -> reqwest::Result<Self> {
        let cfg = Arc::new(cfg);
        let client = http::build_client(&cfg)?;
        Ok(Self {
            llm: LlmClient::new(client.clone(), cfg.clone()),
            github: GitHubClient::new(client, cfg.clone()),
            cfg,
        })
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(&'static str),
    #[error("GitHub request failed: {}", .0.message)]
    Upstream(ErrorInfo),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    retriable: Option<bool>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, retriable) = match &self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, None, None),
            ApiError::Upstream(e) => (
                StatusCode::BAD_GATEWAY,
                Some(e.code.clone()),
                Some(e.retriable),
            ),
        };
        let body = ErrorBody {
            error: self.to_string(),
            code,
            retriable,
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/ai/languages", post(languages_handler))
        .route("/ai/tools", post(tools_handler))
        .route("/ai/summary", post(summary_handler))
        .route("/ai/search", post(search_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run(cfg: Config) -> anyhow::Result<()> {
    let port = cfg.port;
    if !cfg.has_llm_key() {
        warn!("OPENROUTER_API_KEY is not set; AI endpoints will serve fallbacks");
    }
    if cfg.github_token.is_empty() {
        warn!("GITHUB_TOKEN is not set; GitHub calls are unauthenticated");
    }
    let state = AppState::new(cfg)?;
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Backend running on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "open-stack-backend",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct LanguagesRequest {
    #[serde(default, deserialize_with = "input::string_list")]
    pub domains: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LanguagesResponse {
    pub languages: Vec<String>,
}

async fn languages_handler(
    State(state): State<AppState>,
    LenientJson(req): LenientJson<LanguagesRequest>,
) -> Json<LanguagesResponse> {
    info!("POST /ai/languages domains={}", req.domains.len());
    let languages = suggest_languages(&state.llm, &req.domains)
        .await
        .unwrap_or_else(|e| {
            warn!("AI /languages error: {}", e);
            default_languages()
        });
    Json(LanguagesResponse { languages })
}

#[derive(Debug, Default, Deserialize)]
pub struct ToolsRequest {
    #[serde(default, deserialize_with = "input::string_list")]
    pub domains: Vec<String>,
    #[serde(default, deserialize_with = "input::string_list")]
    pub languages: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToolsResponse {
    pub groups: ToolGroups,
}

async fn tools_handler(
    State(state): State<AppState>,
    LenientJson(req): LenientJson<ToolsRequest>,
) -> Json<ToolsResponse> {
    info!(
        "POST /ai/tools domains={} languages={}",
        req.domains.len(),
        req.languages.len()
    );
    let groups = suggest_tools(&state.llm, &req.domains, &req.languages)
        .await
        .unwrap_or_else(|e| {
            warn!("AI /tools error: {}", e);
            default_tool_groups()
        });
    Json(ToolsResponse { groups })
}

#[derive(Debug, Default, Deserialize)]
pub struct IssueInput {
    #[serde(default, deserialize_with = "input::text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "input::text")]
    pub body: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SummaryRequest {
    pub issue: Option<IssueInput>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: Summary,
}

async fn summary_handler(
    State(state): State<AppState>,
    LenientJson(req): LenientJson<SummaryRequest>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let issue = req.issue.unwrap_or_default();
    let title = issue
        .title
        .filter(|t| !t.is_empty())
        .ok_or(ApiError::Validation(MISSING_ISSUE))?;
    let body = issue.body.unwrap_or_default();
    info!("POST /ai/summary title={:?}", title);

    let summary = summarize_issue(&state.llm, &title, &body)
        .await
        .unwrap_or_else(|e| {
            warn!("AI /summary error: {}", e);
            fallback_summary(&title)
        });
    Ok(Json(SummaryResponse { summary }))
}

async fn search_handler(
    State(state): State<AppState>,
    LenientJson(req): LenientJson<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    info!(
        "POST /ai/search languages={} difficulty={} activity_days={} per_page={}",
        req.languages.len(),
        req.difficulty_pref,
        req.activity_days,
        req.per_page
    );
    let response = run_search(&state.llm, &state.github, &state.cfg, req)
        .await
        .map_err(|e| {
            error!("GitHub issue search failed: {} {}", e.code, e.message);
            ApiError::Upstream(e)
        })?;
    info!("Search returned {} results", response.results.len());
    Ok(Json(response))
}
