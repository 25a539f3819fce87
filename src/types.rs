use serde::{Deserialize, Serialize};

// Rate metadata parsed from GitHub REST headers; logged, never returned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateMeta {
    pub remaining: Option<i32>,
    pub used: Option<i32>,
    pub reset_at: Option<String>,
}

/// A GitHub issue reshaped for the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// `owner/repo#number`
    pub id: String,
    pub title: String,
    pub body: String,
    pub repo_id: String,
    pub labels: Vec<String>,
    pub html_url: String,
    pub good_first_issue: bool,
    pub help_wanted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    pub id: String,
    pub name: String,
    pub owner: String,
    pub stars: u64,
    pub license: String,
    pub archived: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_commit_at: Option<String>,
    pub html_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub tldr: String,
    pub first_pr_checklist: Vec<String>,
    pub difficulty_score: u8,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SearchResult {
    pub issue: Issue,
    pub repo: Repository,
    pub summary: Summary,
    /// Reserved for ranking; always 0.
    pub score: u32,
}

// Raw GitHub REST payloads. Every field is optional so that partial or
// unusual items still normalize.

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLabel {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawIssue {
    pub number: Option<u64>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub repository_url: Option<String>,
    pub html_url: Option<String>,
    pub labels: Option<Vec<RawLabel>>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSearchIssues {
    #[serde(default)]
    pub items: Vec<RawIssue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOwner {
    pub login: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLicense {
    pub spdx_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRepository {
    pub full_name: Option<String>,
    pub name: Option<String>,
    pub owner: Option<RawOwner>,
    pub stargazers_count: Option<u64>,
    pub license: Option<RawLicense>,
    pub archived: Option<bool>,
    pub pushed_at: Option<String>,
    pub html_url: Option<String>,
}
