//! LLM-backed suggestions: languages, tool groups and issue summaries.
//!
//! Each operation returns `Result<_, LlmError>`; the matching `default_*` or
//! `fallback_*` function is what callers substitute on error.

use crate::llm::{LlmClient, LlmError};
use crate::types::Summary;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_LANGUAGES: [&str; 10] = [
    "Python",
    "JavaScript",
    "TypeScript",
    "Java",
    "Go",
    "C#",
    "C++",
    "Rust",
    "Dart",
    "Ruby",
];

pub const DEFAULT_CHECKLIST: [&str; 4] = [
    "Read the README",
    "Check CONTRIBUTING.md",
    "Comment on the issue",
    "Open a small PR",
];

pub const DEFAULT_DIFFICULTY: u8 = 3;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolGroups {
    #[serde(rename = "Frontend", default)]
    pub frontend: Vec<String>,
    #[serde(rename = "Backend", default)]
    pub backend: Vec<String>,
    #[serde(rename = "AI", default)]
    pub ai: Vec<String>,
    #[serde(rename = "DevOps", default)]
    pub devops: Vec<String>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn default_languages() -> Vec<String> {
    owned(&DEFAULT_LANGUAGES)
}

pub fn default_tool_groups() -> ToolGroups {
    ToolGroups {
        frontend: owned(&["React", "Flutter", "Vue", "Svelte", "Angular"]),
        backend: owned(&["Node", "Django", "Spring", "Rails", "FastAPI"]),
        ai: owned(&["PyTorch", "TensorFlow", "scikit-learn"]),
        devops: owned(&["Docker", "Kubernetes", "Terraform", "GitHub Actions"]),
    }
}

pub fn fallback_summary(title: &str) -> Summary {
    Summary {
        tldr: title.to_string(),
        first_pr_checklist: owned(&DEFAULT_CHECKLIST),
        difficulty_score: DEFAULT_DIFFICULTY,
    }
}

pub(crate) fn to_json_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

pub fn languages_prompt(domains: &[String]) -> String {
    format!(
        "Return ONLY JSON: {{\"languages\":[...]}}.\n\
         Given these domains: {}\n\
         Return 8-12 relevant programming languages.",
        to_json_list(domains)
    )
}

pub fn tools_prompt(domains: &[String], languages: &[String]) -> String {
    format!(
        "Return ONLY JSON: {{\"groups\":{{\"Frontend\":[...],\"Backend\":[...],\"AI\":[...],\"DevOps\":[...]}}}}.\n\
         Domains: {}\n\
         Languages: {}\n\
         Provide 3-6 tools per group.",
        to_json_list(domains),
        to_json_list(languages)
    )
}

pub fn summary_prompt(title: &str, body: &str) -> String {
    format!(
        "Return ONLY JSON with keys: tldr (string), firstPrChecklist (array of strings), difficultyScore (1-5).\n\
         Summarize this GitHub issue for a beginner:\n\
         \n\
         Title: {}\n\
         Body: {}",
        title, body
    )
}

/// Languages from the reply's `languages` array, or the defaults when the
/// reply has none.
pub fn languages_from_reply(reply: &Value) -> Vec<String> {
    match reply.get("languages").and_then(Value::as_array) {
        Some(items) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        None => default_languages(),
    }
}

pub fn tool_groups_from_reply(reply: &Value) -> ToolGroups {
    reply
        .get("groups")
        .filter(|g| g.is_object())
        .and_then(|g| serde_json::from_value::<ToolGroups>(g.clone()).ok())
        .unwrap_or_else(default_tool_groups)
}

pub fn summary_from_reply(reply: &Value, title: &str) -> Summary {
    let tldr = reply
        .get("tldr")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(title)
        .to_string();
    let first_pr_checklist = reply
        .get("firstPrChecklist")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();
    Summary {
        tldr,
        first_pr_checklist,
        difficulty_score: coerce_difficulty(reply.get("difficultyScore")),
    }
}

/// Numbers and numeric strings in 1..=5 (rounded); anything else is 3.
pub fn coerce_difficulty(raw: Option<&Value>) -> u8 {
    let n = match raw {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match n.map(f64::round) {
        Some(v) if (1.0..=5.0).contains(&v) => v as u8,
        _ => DEFAULT_DIFFICULTY,
    }
}

pub async fn suggest_languages(llm: &LlmClient, domains: &[String]) -> Result<Vec<String>, LlmError> {
    let reply = llm.complete_json(&languages_prompt(domains)).await?;
    Ok(languages_from_reply(&reply))
}

pub async fn suggest_tools(
    llm: &LlmClient,
    domains: &[String],
    languages: &[String],
) -> Result<ToolGroups, LlmError> {
    let reply = llm.complete_json(&tools_prompt(domains, languages)).await?;
    Ok(tool_groups_from_reply(&reply))
}

pub async fn summarize_issue(llm: &LlmClient, title: &str, body: &str) -> Result<Summary, LlmError> {
    let reply = llm.complete_json(&summary_prompt(title, body)).await?;
    Ok(summary_from_reply(&reply, title))
}
