use std::env;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MODEL: &str = "mistralai/mistral-7b-instruct";
pub const DEFAULT_LLM_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Runtime configuration shared by the LLM client, the GitHub client and the
/// search workflow. Built once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub llm_api_key: String,
    pub llm_model: String,
    pub llm_url: String,
    /// Empty means unauthenticated GitHub calls.
    pub github_token: String,
    pub api_url: String,
    pub api_version: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub repo_fetch_concurrency: usize,
    pub summary_concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            llm_api_key: String::new(),
            llm_model: DEFAULT_MODEL.to_string(),
            llm_url: DEFAULT_LLM_URL.to_string(),
            github_token: String::new(),
            api_url: "https://api.github.com".to_string(),
            api_version: "2022-11-28".to_string(),
            user_agent: default_user_agent(),
            timeout_secs: 30,
            repo_fetch_concurrency: 8,
            summary_concurrency: 1,
        }
    }
}

fn default_user_agent() -> String {
    format!("open-stack-backend/{}", env!("CARGO_PKG_VERSION"))
}

impl Config {
    /// Load configuration from environment.
    ///
    /// Env vars:
    /// - PORT (default: 3000)
    /// - OPENROUTER_API_KEY (default: empty, LLM features fall back)
    /// - OPENROUTER_MODEL (default: mistralai/mistral-7b-instruct)
    /// - OPENROUTER_URL (default: OpenRouter chat completions endpoint)
    /// - GITHUB_TOKEN (or GH_TOKEN) (default: empty, unauthenticated)
    /// - GITHUB_API_URL (default: https://api.github.com)
    /// - GITHUB_API_VERSION (default: 2022-11-28)
    /// - GITHUB_USER_AGENT (default: open-stack-backend/<version>)
    /// - HTTP_TIMEOUT_SECS (default: 30)
    /// - REPO_FETCH_CONCURRENCY (default: 8)
    /// - SUMMARY_CONCURRENCY (default: 1)
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let github_token = env::var("GITHUB_TOKEN")
            .or_else(|_| env::var("GH_TOKEN"))
            .unwrap_or_default();
        let api_url = env::var("GITHUB_API_URL").unwrap_or(defaults.api_url);

        Ok(Self {
            port: parse_var("PORT", defaults.port)?,
            llm_api_key: env::var("OPENROUTER_API_KEY").unwrap_or_default(),
            llm_model: non_empty_var("OPENROUTER_MODEL").unwrap_or(defaults.llm_model),
            llm_url: non_empty_var("OPENROUTER_URL").unwrap_or(defaults.llm_url),
            github_token,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_version: env::var("GITHUB_API_VERSION").unwrap_or(defaults.api_version),
            user_agent: env::var("GITHUB_USER_AGENT").unwrap_or(defaults.user_agent),
            timeout_secs: parse_var("HTTP_TIMEOUT_SECS", defaults.timeout_secs)?,
            repo_fetch_concurrency: parse_var(
                "REPO_FETCH_CONCURRENCY",
                defaults.repo_fetch_concurrency,
            )?
            .max(1),
            summary_concurrency: parse_var("SUMMARY_CONCURRENCY", defaults.summary_concurrency)?
                .max(1),
        })
    }

    pub fn has_llm_key(&self) -> bool {
        !self.llm_api_key.is_empty()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, String> {
    match non_empty_var(name) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| format!("Invalid {}: {:?}", name, raw)),
        None => Ok(default),
    }
}
