//! Chat-completions client for the LLM provider (OpenRouter-compatible).
//!
//! Every call is a single request/response round trip that must yield a JSON
//! object. Callers decide what to do on failure; nothing here retries.

use crate::config::Config;
use crate::json_extract::extract_json;
use log::{error, warn};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

pub const SYSTEM_INSTRUCTION: &str = "Return strictly valid JSON.";
pub const TEMPERATURE: f32 = 0.4;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("OPENROUTER_API_KEY is missing.")]
    MissingApiKey,
    #[error("LLM request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("LLM provider returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("LLM provider did not return valid JSON.")]
    InvalidJson { raw: String },
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
    temperature: f32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<MessageContent>,
}

#[derive(Deserialize)]
struct MessageContent {
    content: Option<String>,
}

#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    cfg: Arc<Config>,
}

impl LlmClient {
    pub fn new(client: Client, cfg: Arc<Config>) -> Self {
        Self { client, cfg }
    }

    /// Send `prompt` and return the JSON object found in the reply.
    pub async fn complete_json(&self, prompt: &str) -> Result<Value, LlmError> {
        if !self.cfg.has_llm_key() {
            return Err(LlmError::MissingApiKey);
        }

        let request = ChatRequest {
            model: &self.cfg.llm_model,
            messages: [
                Message {
                    role: "system",
                    content: SYSTEM_INSTRUCTION,
                },
                Message {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(&self.cfg.llm_url)
            .header(AUTHORIZATION, format!("Bearer {}", self.cfg.llm_api_key))
            .header(CONTENT_TYPE, "application/json")
            .header("HTTP-Referer", "http://localhost")
            .header("X-Title", "OpenStack MVP")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let chat: ChatResponse = response.json().await?;
        let text = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default();
        if text.is_empty() {
            warn!("LLM provider returned empty text.");
        }

        extract_json(&text).ok_or_else(|| {
            error!("LLM provider raw response: {}", text);
            LlmError::InvalidJson { raw: text }
        })
    }
}
