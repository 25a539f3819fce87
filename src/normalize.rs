//! Reshape raw GitHub REST payloads into [`Issue`] and [`Repository`].

use crate::types::{Issue, RawIssue, RawRepository, Repository};

pub const GOOD_FIRST_ISSUE: &str = "good first issue";
pub const HELP_WANTED: &str = "help wanted";
pub const UNKNOWN_REPO: &str = "unknown/unknown";

pub fn parse_issue(item: &RawIssue) -> Issue {
    let labels: Vec<String> = item
        .labels
        .iter()
        .flatten()
        .filter_map(|l| l.name.clone())
        .filter(|name| !name.is_empty())
        .collect();
    let lowered: Vec<String> = labels.iter().map(|l| l.to_lowercase()).collect();
    let repo_id = extract_repo_id(item);
    let number = item
        .number
        .map(|n| n.to_string())
        .unwrap_or_default();

    Issue {
        id: format!("{}#{}", repo_id, number),
        title: item.title.clone().unwrap_or_default(),
        body: item.body.clone().unwrap_or_default(),
        repo_id,
        labels,
        html_url: item.html_url.clone().unwrap_or_default(),
        good_first_issue: lowered.iter().any(|l| l == GOOD_FIRST_ISSUE),
        help_wanted: lowered.iter().any(|l| l == HELP_WANTED),
        created_at: item.created_at.clone(),
    }
}

/// `owner/repo` for an issue: last two segments of `repository_url`, else
/// segments 3 and 4 of `html_url`, else `unknown/unknown`.
pub fn extract_repo_id(item: &RawIssue) -> String {
    let from_api = item
        .repository_url
        .as_deref()
        .filter(|u| !u.is_empty())
        .and_then(|u| {
            let parts: Vec<&str> = u.split('/').collect();
            match parts.as_slice() {
                [.., owner, name] => join_owner_name(owner, name),
                _ => None,
            }
        });
    if let Some(id) = from_api {
        return id;
    }

    item.html_url
        .as_deref()
        .filter(|u| !u.is_empty())
        .and_then(|u| {
            let parts: Vec<&str> = u.split('/').collect();
            match (parts.get(3), parts.get(4)) {
                (Some(owner), Some(name)) => join_owner_name(owner, name),
                _ => None,
            }
        })
        .unwrap_or_else(|| UNKNOWN_REPO.to_string())
}

fn join_owner_name(owner: &str, name: &str) -> Option<String> {
    if owner.is_empty() || name.is_empty() {
        return None;
    }
    Some(format!("{}/{}", owner, name))
}

/// Split `owner/name`; `None` when either half is empty.
pub fn split_repo_id(id: &str) -> Option<(&str, &str)> {
    let (owner, name) = id.split_once('/')?;
    if owner.is_empty() || name.is_empty() {
        return None;
    }
    Some((owner, name))
}

pub fn parse_repo(repo: RawRepository) -> Repository {
    Repository {
        id: repo.full_name.unwrap_or_default(),
        name: repo.name.unwrap_or_default(),
        owner: repo.owner.and_then(|o| o.login).unwrap_or_default(),
        stars: repo.stargazers_count.unwrap_or(0),
        license: repo.license.and_then(|l| l.spdx_id).unwrap_or_default(),
        archived: repo.archived.unwrap_or(false),
        last_commit_at: repo.pushed_at,
        html_url: repo.html_url.unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RawLabel, RawLicense, RawOwner};

    fn label(name: &str) -> RawLabel {
        RawLabel {
            name: Some(name.to_string()),
        }
    }

    #[test]
    fn id_from_repository_url() {
        let item = RawIssue {
            number: Some(42),
            repository_url: Some("https://api.github.com/repos/foo/bar".into()),
            ..Default::default()
        };
        let issue = parse_issue(&item);
        assert_eq!(issue.id, "foo/bar#42");
        assert_eq!(issue.repo_id, "foo/bar");
    }

    #[test]
    fn id_falls_back_to_html_url() {
        let item = RawIssue {
            number: Some(7),
            html_url: Some("https://github.com/acme/widgets/issues/7".into()),
            ..Default::default()
        };
        assert_eq!(parse_issue(&item).id, "acme/widgets#7");
    }

    #[test]
    fn id_unknown_when_nothing_usable() {
        let item = RawIssue {
            number: Some(1),
            html_url: Some("https://github.com".into()),
            ..Default::default()
        };
        assert_eq!(extract_repo_id(&item), UNKNOWN_REPO);
        assert_eq!(extract_repo_id(&RawIssue::default()), UNKNOWN_REPO);
    }

    #[test]
    fn mixed_case_labels_are_detected() {
        let item = RawIssue {
            labels: Some(vec![
                label("Good First Issue"),
                label("HELP WANTED"),
                RawLabel { name: None },
                label(""),
            ]),
            ..Default::default()
        };
        let issue = parse_issue(&item);
        assert!(issue.good_first_issue);
        assert!(issue.help_wanted);
        assert_eq!(issue.labels, vec!["Good First Issue", "HELP WANTED"]);
    }

    #[test]
    fn label_match_is_exact_not_substring() {
        let item = RawIssue {
            labels: Some(vec![label("not a good first issue yet")]),
            ..Default::default()
        };
        let issue = parse_issue(&item);
        assert!(!issue.good_first_issue);
        assert!(!issue.help_wanted);
    }

    #[test]
    fn repo_defaults_when_fields_absent() {
        let repo = parse_repo(RawRepository::default());
        assert_eq!(repo.stars, 0);
        assert_eq!(repo.license, "");
        assert!(!repo.archived);
        assert_eq!(repo.owner, "");
    }

    #[test]
    fn absent_timestamps_are_omitted_from_json() {
        let issue = serde_json::to_value(parse_issue(&RawIssue::default())).unwrap();
        assert!(issue.get("createdAt").is_none());
        let repo = serde_json::to_value(parse_repo(RawRepository::default())).unwrap();
        assert!(repo.get("lastCommitAt").is_none());

        let repo = serde_json::to_value(parse_repo(RawRepository {
            pushed_at: Some("2026-01-01T00:00:00Z".into()),
            ..Default::default()
        }))
        .unwrap();
        assert_eq!(repo["lastCommitAt"], "2026-01-01T00:00:00Z");
    }

    #[test]
    fn repo_maps_fields() {
        let repo = parse_repo(RawRepository {
            full_name: Some("foo/bar".into()),
            name: Some("bar".into()),
            owner: Some(RawOwner {
                login: Some("foo".into()),
            }),
            stargazers_count: Some(120),
            license: Some(RawLicense {
                spdx_id: Some("MIT".into()),
            }),
            archived: Some(true),
            pushed_at: Some("2026-01-01T00:00:00Z".into()),
            html_url: Some("https://github.com/foo/bar".into()),
        });
        assert_eq!(repo.id, "foo/bar");
        assert_eq!(repo.owner, "foo");
        assert_eq!(repo.stars, 120);
        assert_eq!(repo.license, "MIT");
        assert!(repo.archived);
    }

    #[test]
    fn split_repo_id_rejects_empty_halves() {
        assert_eq!(split_repo_id("foo/bar"), Some(("foo", "bar")));
        assert_eq!(split_repo_id("foo/"), None);
        assert_eq!(split_repo_id("nope"), None);
    }
}
