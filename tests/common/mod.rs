#![allow(dead_code)]

use open_stack_backend::config::Config;
use open_stack_backend::server::{router, AppState};

pub const LLM_KEY: &str = "test-key";

/// Config pointing at mock servers. `llm_url` of `None` leaves the key unset.
pub fn test_config(github_url: &str, llm_url: Option<&str>) -> Config {
    Config {
        api_url: github_url.to_string(),
        llm_url: llm_url.unwrap_or("http://127.0.0.1:1/chat").to_string(),
        llm_api_key: llm_url.map(|_| LLM_KEY.to_string()).unwrap_or_default(),
        timeout_secs: 5,
        ..Config::default()
    }
}

/// Serve the router on an ephemeral port and return its base URL.
pub async fn spawn_app(cfg: Config) -> String {
    let app = router(AppState::new(cfg).expect("client builds"));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{}", addr)
}

pub async fn post_json(
    base: &str,
    path: &str,
    body: serde_json::Value,
) -> (reqwest::StatusCode, serde_json::Value) {
    let res = reqwest::Client::new()
        .post(format!("{}{}", base, path))
        .json(&body)
        .send()
        .await
        .expect("request");
    let status = res.status();
    let value = res.json::<serde_json::Value>().await.expect("json body");
    (status, value)
}

/// POST an arbitrary body, optionally without a content type.
pub async fn post_raw(
    base: &str,
    path: &str,
    body: &'static str,
    content_type: Option<&str>,
) -> (reqwest::StatusCode, serde_json::Value) {
    let mut req = reqwest::Client::new()
        .post(format!("{}{}", base, path))
        .body(body);
    if let Some(ct) = content_type {
        req = req.header(reqwest::header::CONTENT_TYPE, ct);
    }
    let res = req.send().await.expect("request");
    let status = res.status();
    let value = res.json::<serde_json::Value>().await.expect("json body");
    (status, value)
}

/// Chat-completions reply whose message content is `content`.
pub fn llm_reply(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    })
}
