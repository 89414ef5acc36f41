use serde::{Deserialize, Serialize};

/// Configuration for the Gemini backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// API key for the Gemini API.
    pub api_key: String,
    /// Model resource name, e.g. `models/gemini-2.5-flash`.
    #[serde(default = "default_model_id")]
    pub model_id: String,
    /// Override for the API origin. Mainly for tests.
    #[serde(default)]
    pub api_base_url: Option<String>,
    /// How many preceding turns to include as prompt context.
    #[serde(default = "default_max_context_messages")]
    pub max_context_messages: usize,
}

fn default_model_id() -> String {
    "models/gemini-2.5-flash".to_string()
}

fn default_max_context_messages() -> usize {
    6
}

impl ModelConfig {
    /// Resolved API origin.
    pub fn base_url(&self) -> &str {
        self.api_base_url
            .as_deref()
            .unwrap_or("https://generativelanguage.googleapis.com")
    }
}
