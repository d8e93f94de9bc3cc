//! OpenAI-compatible chat completions adapter.
//!
//! Any endpoint speaking the `/v1/chat/completions` shape works; the URL,
//! model and timeout come from config.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use advisor_core::{
    errors::Error,
    model::{client::CompletionClient, types::CompletionRequest},
    Result,
};

#[derive(Clone, Debug)]
pub struct OpenAiClient {
    endpoint: String,
    api_key: String,
    model: String,
    http: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::External(format!("ai client build error: {e}")))?;
        Ok(Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
            http,
        })
    }

    fn request_body(&self, req: &CompletionRequest) -> Value {
        json!({
            "model": self.model,
            "messages": req.messages(),
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, req: CompletionRequest) -> Result<String> {
        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(&req))
            .send()
            .await
            .map_err(|e| Error::External(format!("ai request error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::External(format!(
                "ai completion failed: {status} {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let v: Value = resp
            .json()
            .await
            .map_err(|e| Error::External(format!("ai json error: {e}")))?;

        let text = extract_content(&v)?;
        debug!(chars = text.chars().count(), "ai completion received");
        Ok(text)
    }
}

/// Pull the assistant text out of a chat completions response.
///
/// `content` is either a string or a list of `{ "type": "text", "text": ... }`
/// parts.
fn extract_content(v: &Value) -> Result<String> {
    let content = v
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .ok_or_else(|| {
            Error::External("ai response has no choices[0].message.content".to_string())
        })?;

    let text = match content {
        Value::String(s) => s.clone(),
        Value::Array(parts) => parts
            .iter()
            .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => String::new(),
    };

    if text.trim().is_empty() {
        return Err(Error::External(
            "ai completion returned empty text".to_string(),
        ));
    }
    Ok(text)
}
