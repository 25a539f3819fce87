use crate::config::Config;
use crate::http::{self, encode_path_segment, ErrorInfo};
use crate::normalize::{parse_issue, parse_repo};
use crate::types::{Issue, RawRepository, RawSearchIssues, Repository};
use reqwest::Client;
use std::sync::Arc;

/// Thin wrapper over the two GitHub REST endpoints this service uses.
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    cfg: Arc<Config>,
}

impl GitHubClient {
    pub fn new(client: Client, cfg: Arc<Config>) -> Self {
        Self { client, cfg }
    }

    pub async fn fetch_repo(&self, owner: &str, name: &str) -> Result<Repository, ErrorInfo> {
        let path = format!(
            "/repos/{}/{}",
            encode_path_segment(owner),
            encode_path_segment(name)
        );
        http::rest_get_json::<RawRepository>(&self.client, &self.cfg, &path)
            .await
            .into_result()
            .map(parse_repo)
    }

    /// Issue search sorted by last update, newest first.
    pub async fn search_issues(&self, query: &str, per_page: u32) -> Result<Vec<Issue>, ErrorInfo> {
        let params = [
            ("q", query.to_string()),
            ("per_page", per_page.to_string()),
            ("sort", "updated".to_string()),
            ("order", "desc".to_string()),
        ];
        let found = http::rest_get_json_with_query::<RawSearchIssues>(
            &self.client,
            &self.cfg,
            "/search/issues",
            &params,
        )
        .await
        .into_result()?;
        Ok(found.items.iter().map(parse_issue).collect())
    }
}
