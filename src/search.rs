//! The search workflow: query synthesis, issue search, repository
//! enrichment and per-issue summaries.

use crate::config::Config;
use crate::github::GitHubClient;
use crate::http::ErrorInfo;
use crate::input;
use crate::llm::{LlmClient, LlmError};
use crate::normalize::split_repo_id;
use crate::query::{build_fallback_query, DifficultyPref};
use crate::suggest::{fallback_summary, summarize_issue, to_json_list};
use crate::types::{Issue, Repository, SearchResult, Summary};
use futures::stream::{self, StreamExt};
use log::{debug, warn};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

fn default_difficulty_pref() -> String {
    "any".to_string()
}

fn default_activity_days() -> i64 {
    180
}

fn default_per_page() -> u32 {
    12
}

fn lenient_difficulty_pref<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(input::text(d)?.unwrap_or_else(default_difficulty_pref))
}

fn lenient_activity_days<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    Ok(input::integer(d)?.unwrap_or_else(default_activity_days))
}

fn lenient_per_page<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    Ok(input::integer(d)?
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or_else(default_per_page))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default, deserialize_with = "input::string_list")]
    pub domains: Vec<String>,
    #[serde(default, deserialize_with = "input::string_list")]
    pub languages: Vec<String>,
    #[serde(default, deserialize_with = "input::string_list")]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub confidence: Option<Value>,
    #[serde(default)]
    pub contribution_style: Option<Value>,
    #[serde(
        default = "default_difficulty_pref",
        deserialize_with = "lenient_difficulty_pref"
    )]
    pub difficulty_pref: String,
    #[serde(
        default = "default_activity_days",
        deserialize_with = "lenient_activity_days"
    )]
    pub activity_days: i64,
    #[serde(default = "default_per_page", deserialize_with = "lenient_per_page")]
    pub per_page: u32,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            domains: Vec::new(),
            languages: Vec::new(),
            technologies: Vec::new(),
            confidence: None,
            contribution_style: None,
            difficulty_pref: default_difficulty_pref(),
            activity_days: default_activity_days(),
            per_page: default_per_page(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchResult>,
}

// Free-form inputs are shown to the model as plain text.
fn display_value(v: &Option<Value>) -> String {
    match v {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

pub fn search_query_prompt(req: &SearchRequest) -> String {
    format!(
        "Return ONLY JSON: {{\"query\":\"...\"}}.\n\
         Build a GitHub search query for open issues.\n\
         Inputs:\n\
         Domains: {}\n\
         Languages: {}\n\
         Technologies: {}\n\
         Confidence: {}\n\
         Contribution preference: {}\n\
         Difficulty: {}\n\
         Activity window days: {}\n\
         \n\
         Constraints:\n\
         - Always include: type:issue state:open\n\
         - Include updated:>=YYYY-MM-DD for activity window\n\
         - If difficulty is goodFirst/helpWanted, include label\n\
         - Keep query concise",
        to_json_list(&req.domains),
        to_json_list(&req.languages),
        to_json_list(&req.technologies),
        display_value(&req.confidence),
        display_value(&req.contribution_style),
        req.difficulty_pref,
        req.activity_days,
    )
}

pub async fn llm_search_query(llm: &LlmClient, req: &SearchRequest) -> Result<String, LlmError> {
    let reply = llm.complete_json(&search_query_prompt(req)).await?;
    Ok(reply
        .get("query")
        .and_then(Value::as_str)
        .map(|q| q.trim().to_string())
        .unwrap_or_default())
}

/// LLM query when available, otherwise the deterministic fallback.
pub async fn resolve_query(llm: &LlmClient, req: &SearchRequest) -> String {
    let query = llm_search_query(llm, req).await.unwrap_or_else(|e| {
        warn!("AI search query error: {}", e);
        String::new()
    });
    if !query.is_empty() {
        return query;
    }
    build_fallback_query(
        &req.languages,
        DifficultyPref::parse(&req.difficulty_pref),
        req.activity_days,
    )
}

/// Distinct repository ids in first-seen order.
pub fn distinct_repo_ids(issues: &[Issue]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for issue in issues {
        if seen.insert(issue.repo_id.as_str()) {
            ids.push(issue.repo_id.clone());
        }
    }
    ids
}

/// Fetch every id with at most `limit` requests in flight. A failed or
/// unusable id maps to `None` without affecting the others.
pub async fn fetch_repos(
    github: &GitHubClient,
    ids: Vec<String>,
    limit: usize,
) -> HashMap<String, Option<Repository>> {
    stream::iter(ids)
        .map(|id| {
            let github = github.clone();
            async move {
                let repo = match split_repo_id(&id) {
                    Some((owner, name)) => match github.fetch_repo(owner, name).await {
                        Ok(r) => Some(r),
                        Err(e) => {
                            warn!("Repository {} unavailable: {} {}", id, e.code, e.message);
                            None
                        }
                    },
                    None => None,
                };
                (id, repo)
            }
        })
        .buffer_unordered(limit.max(1))
        .collect::<HashMap<_, _>>()
        .await
}

pub async fn summarize_or_fallback(llm: &LlmClient, issue: &Issue) -> Summary {
    summarize_issue(llm, &issue.title, &issue.body)
        .await
        .unwrap_or_else(|e| {
            warn!("AI summary error for {}: {}", issue.id, e);
            fallback_summary(&issue.title)
        })
}

/// Run the whole workflow. Only the primary issue search can fail.
pub async fn run_search(
    llm: &LlmClient,
    github: &GitHubClient,
    cfg: &Config,
    req: SearchRequest,
) -> Result<SearchResponse, ErrorInfo> {
    let query = resolve_query(llm, &req).await;
    debug!("Resolved search query: {}", query);

    let issues = github.search_issues(&query, req.per_page).await?;
    let repos = fetch_repos(github, distinct_repo_ids(&issues), cfg.repo_fetch_concurrency).await;

    let resolved: Vec<(Issue, Repository)> = issues
        .into_iter()
        .filter_map(|issue| {
            let repo = repos.get(&issue.repo_id).cloned().flatten()?;
            Some((issue, repo))
        })
        .collect();

    let results = stream::iter(resolved)
        .map(|(issue, repo)| {
            let llm = llm.clone();
            async move {
                let summary = summarize_or_fallback(&llm, &issue).await;
                SearchResult {
                    issue,
                    repo,
                    summary,
                    score: 0,
                }
            }
        })
        .buffered(cfg.summary_concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

    Ok(SearchResponse { query, results })
}
