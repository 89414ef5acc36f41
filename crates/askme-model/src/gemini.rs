use crate::client::ModelClient;
use crate::config::ModelConfig;
use crate::prompt::build_prompt;
use askme_core::{AskMeError, AskMeResult, Message};
use async_trait::async_trait;

/// Gemini `generateContent` API backend.
pub struct GeminiClient {
    config: ModelConfig,
    http: reqwest::Client,
}

impl GeminiClient {
    /// Creates a client from the given config. Fails if no API key is set.
    pub fn new(config: ModelConfig) -> AskMeResult<Self> {
        if config.api_key.is_empty() {
            return Err(AskMeError::Config(
                "Gemini API key is not configured".to_string(),
            ));
        }
        Ok(Self {
            config,
            http: reqwest::Client::new(),
        })
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn generate(&self, message: &str, history: &[Message]) -> AskMeResult<String> {
        let url = format!(
            "{}/v1beta/{}:generateContent",
            self.config.base_url(),
            self.config.model_id
        );
        let prompt = build_prompt(message, history, self.config.max_context_messages);

        let body = serde_json::json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }]
        });

        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AskMeError::Http(e.to_string()))?;

        let status = resp.status();
        let resp_body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| AskMeError::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(AskMeError::Model(format!(
                "Gemini API error {status}: {resp_body}"
            )));
        }

        parse_generate_response(&resp_body)
    }
}

fn parse_generate_response(body: &serde_json::Value) -> AskMeResult<String> {
    let text = body["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AskMeError::Model("Gemini response contained no text".to_string()))?;
    Ok(text.to_string())
}
