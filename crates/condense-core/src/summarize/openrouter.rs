use crate::BackendError;
use crate::http::{default_agent, post_json};
use serde::Deserialize;
use serde_json::json;

use super::{CompletionOptions, SummarizeProvider};

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";
const MAX_RETRIES: usize = 2;

pub struct OpenRouterProvider {
    model: String,
    base_url: String,
    api_key: String,
    options: CompletionOptions,
    agent: ureq::Agent,
}

impl OpenRouterProvider {
    pub fn new(
        model: Option<&str>,
        api_key: Option<&str>,
        options: CompletionOptions,
    ) -> Result<Self, BackendError> {
        let api_key = api_key
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| BackendError::Failed("cloud API key not set".into()))?
            .to_string();
        let base_url =
            std::env::var("OPENROUTER_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        Ok(Self {
            model: model.unwrap_or(DEFAULT_MODEL).to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            options,
            agent: default_agent(),
        })
    }

    fn build_request_body(&self, system_prompt: &str, user_text: &str) -> serde_json::Value {
        json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_text},
            ],
            "temperature": self.options.temperature,
            "max_tokens": self.options.max_tokens,
        })
    }

    fn parse_response(body: &str) -> Result<String, BackendError> {
        let response: OpenRouterResponse = serde_json::from_str(body)
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::InvalidResponse("no choices".into()))?;
        Ok(choice.message.content.unwrap_or_default().trim().to_string())
    }
}

impl SummarizeProvider for OpenRouterProvider {
    fn name(&self) -> &'static str {
        "openrouter"
    }

    fn complete(&self, system_prompt: &str, user_text: &str) -> Result<String, BackendError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.build_request_body(system_prompt, user_text);
        let raw = post_json(&self.agent, &url, Some(&self.api_key), &body, MAX_RETRIES)?;
        Self::parse_response(raw.trim())
    }
}

#[derive(Deserialize)]
struct OpenRouterResponse {
    choices: Vec<OpenRouterChoice>,
}

#[derive(Deserialize)]
struct OpenRouterChoice {
    message: OpenRouterMessage,
}

#[derive(Deserialize)]
struct OpenRouterMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::OpenRouterProvider;
    use crate::summarize::CompletionOptions;

    #[test]
    fn parse_response_extracts_content() {
        let body = r#"{"choices":[{"message":{"content":"{\"key\": \"x\"}\n"}}]}"#;
        let content = OpenRouterProvider::parse_response(body).unwrap();
        assert_eq!(content, "{\"key\": \"x\"}");
    }

    #[test]
    fn parse_response_requires_a_choice() {
        assert!(OpenRouterProvider::parse_response(r#"{"choices":[]}"#).is_err());
    }

    #[test]
    fn build_request_body_uses_system_prompt_and_model() {
        let provider = OpenRouterProvider {
            model: "test-model".to_string(),
            base_url: "http://example.com".to_string(),
            api_key: "test-key".to_string(),
            options: CompletionOptions {
                temperature: 0.5,
                max_tokens: 64,
            },
            agent: crate::http::default_agent(),
        };
        let body = provider.build_request_body("instructions", "chunk.");
        let model = body.get("model").and_then(|value| value.as_str());
        let system = body
            .get("messages")
            .and_then(|value| value.as_array())
            .and_then(|messages| messages.first())
            .and_then(|message| message.get("content"))
            .and_then(|value| value.as_str());
        assert_eq!(model, Some("test-model"));
        assert_eq!(system, Some("instructions"));
        assert_eq!(body["max_tokens"], 64);
        assert_eq!(body["temperature"], 0.5);
    }

    #[test]
    fn new_requires_api_key() {
        assert!(OpenRouterProvider::new(None, None, CompletionOptions::default()).is_err());
        assert!(OpenRouterProvider::new(None, Some("k"), CompletionOptions::default()).is_ok());
    }
}
