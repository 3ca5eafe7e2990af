pub mod ollama;
pub mod openrouter;
pub mod parse;
pub mod prompt;
pub mod repair;

use crate::BackendError;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

pub use parse::{ParsedReply, parse_reply};
pub use prompt::SUMMARY_PROMPT;
pub use repair::repair_line;

pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.1";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 500;

/// Sampling options forwarded to every provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionOptions {
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// A chat-completion service taking a system turn and a user turn.
pub trait SummarizeProvider: Send + Sync {
    fn name(&self) -> &'static str;
    fn complete(&self, system_prompt: &str, user_text: &str) -> Result<String, BackendError>;
}

/// Create a summarize provider by name (`"ollama"` or `"openrouter"`).
pub fn create_summarize_provider(
    provider: &str,
    model: Option<&str>,
    api_key: Option<&str>,
    options: CompletionOptions,
) -> Result<Box<dyn SummarizeProvider>, BackendError> {
    match provider {
        "ollama" => Ok(Box::new(ollama::OllamaProvider::new(
            model.unwrap_or(DEFAULT_OLLAMA_MODEL),
            options,
        ))),
        "openrouter" => Ok(Box::new(openrouter::OpenRouterProvider::new(
            model, api_key, options,
        )?)),
        other => Err(BackendError::Failed(format!(
            "unknown summarize provider: {other}"
        ))),
    }
}

/// Outcome of one backend call. The reply is always text to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub reply: String,
    pub failed: bool,
}

/// Send one chunk to the provider, turning any failure into an error marker reply.
///
/// A provider panic counts as a failure of this chunk only.
pub fn invoke(provider: &dyn SummarizeProvider, chunk_text: &str, system_prompt: &str) -> Invocation {
    let user_text = prompt::user_turn(chunk_text);
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        provider.complete(system_prompt, &user_text)
    }))
    .unwrap_or_else(|payload| Err(BackendError::Failed(panic_message(payload.as_ref()))));

    match outcome {
        Ok(reply) => Invocation {
            reply,
            failed: false,
        },
        Err(err) => {
            tracing::warn!(provider = provider.name(), error = %err, "backend call failed");
            Invocation {
                reply: error_marker(provider.name(), &err),
                failed: true,
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|message| message.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("provider panicked: {detail}")
}

pub fn error_marker(provider: &str, err: &BackendError) -> String {
    format!("Error in {provider} backend: Error: {err}")
}
