use crate::BackendError;
use crate::http::{default_agent, post_json};
use serde::Deserialize;
use serde_json::json;

use super::{CompletionOptions, SummarizeProvider};

const DEFAULT_BASE_URL: &str = "http://localhost:11434";
const MAX_RETRIES: usize = 2;

pub struct OllamaProvider {
    model: String,
    base_url: String,
    options: CompletionOptions,
    agent: ureq::Agent,
}

impl OllamaProvider {
    pub fn new(model: &str, options: CompletionOptions) -> Self {
        let base_url = std::env::var("OLLAMA_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        Self {
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            options,
            agent: default_agent(),
        }
    }

    fn build_request_body(&self, system_prompt: &str, user_text: &str) -> serde_json::Value {
        json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_text},
            ],
            "stream": false,
            "options": {
                "temperature": self.options.temperature,
                "num_predict": self.options.max_tokens,
            },
        })
    }

    fn parse_response(body: &str) -> Result<String, BackendError> {
        let response: OllamaChatResponse = serde_json::from_str(body)
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;
        if let Some(error) = response.error {
            return Err(BackendError::Failed(error));
        }
        let message = response
            .message
            .ok_or_else(|| BackendError::InvalidResponse("no message".into()))?;
        if let Some(count) = response.eval_count {
            tracing::debug!(eval_count = count, "ollama reply received");
        }
        Ok(message.content.trim().to_string())
    }
}

impl SummarizeProvider for OllamaProvider {
    fn name(&self) -> &'static str {
        "ollama"
    }

    fn complete(&self, system_prompt: &str, user_text: &str) -> Result<String, BackendError> {
        let url = format!("{}/api/chat", self.base_url);
        let body = self.build_request_body(system_prompt, user_text);
        let raw = post_json(&self.agent, &url, None, &body, MAX_RETRIES)?;
        Self::parse_response(raw.trim())
    }
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: Option<OllamaMessage>,
    error: Option<String>,
    eval_count: Option<u64>,
}

#[derive(Deserialize)]
struct OllamaMessage {
    content: String,
}
