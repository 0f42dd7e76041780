#[cfg(test)]
#[path = "agent_test.rs"]
pub(crate) mod tests;

use crate::cli::ServeArgs;
use crate::config::prompt::{ self, PromptConfig };
use crate::history::HISTORY_FOR_PROMPT_LEN;
use crate::llm::LlmConfig;
use crate::llm::chat::{ ChatClient, new_client as new_chat_client };
use crate::models::chat::ChatRequest;

use log::{ debug, info, warn };
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error as ThisError;

pub const MESSAGE_REQUIRED: &str = "Message is required";
pub const API_KEY_NOT_CONFIGURED: &str = "Gemini API key not configured";
pub const GENERATION_FAILED: &str = "Failed to generate response";

pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

/// Failure categories of one relay call. `Display` carries the detail for the
/// log; `client_message` is all a caller ever sees.
#[derive(Debug, ThisError)]
pub enum RelayError {
    #[error("request has no message")]
    MissingMessage,
    #[error("upstream API key is not configured")]
    NotConfigured,
    #[error("request body could not be parsed: {0}")]
    InvalidBody(String),
    #[error("upstream generation failed: {0}")]
    Upstream(String),
    #[error("upstream generation timed out after {0:?}")]
    Timeout(Duration),
}

impl RelayError {
    pub fn client_message(&self) -> &'static str {
        match self {
            RelayError::MissingMessage => MESSAGE_REQUIRED,
            RelayError::NotConfigured => API_KEY_NOT_CONFIGURED,
            RelayError::InvalidBody(_)
            | RelayError::Upstream(_)
            | RelayError::Timeout(_) => GENERATION_FAILED,
        }
    }
}

/// Turns a visitor message into a single upstream generation call.
/// Holds no per-request state, so one instance serves every request.
#[derive(Clone)]
pub struct RelayAgent {
    chat_client: Option<Arc<dyn ChatClient>>,
    prompt_config: Arc<PromptConfig>,
    upstream_timeout: Duration,
}

impl RelayAgent {
    pub fn new(
        chat_client: Option<Arc<dyn ChatClient>>,
        prompt_config: Arc<PromptConfig>,
        upstream_timeout: Duration
    ) -> Self {
        Self { chat_client, prompt_config, upstream_timeout }
    }

    pub fn from_args(args: &ServeArgs) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let prompt_config = prompt::load_prompts_or_default(args.prompts_path.as_deref())?;

        let api_key = args.gemini_api_key.clone().filter(|k| !k.trim().is_empty());
        let chat_client = match api_key {
            Some(key) => {
                let chat_config = LlmConfig {
                    api_key: Some(key),
                    completion_model: args.chat_model.clone(),
                    base_url: args.chat_base_url.clone(),
                };
                let client = new_chat_client(&chat_config)?;
                info!(
                    "Chat client configured: Model={}, BaseURL={:?}",
                    client.get_model(),
                    client.get_base_url()
                );
                Some(client)
            }
            None => {
                warn!("GEMINI_API_KEY is not set. Chat requests will be rejected until it is configured.");
                None
            }
        };

        Ok(Self::new(
            chat_client,
            prompt_config,
            Duration::from_secs(args.upstream_timeout_secs)
        ))
    }

    pub fn is_configured(&self) -> bool {
        self.chat_client.is_some()
    }

    pub async fn handle(&self, request: ChatRequest) -> Result<String, RelayError> {
        let message = request.message
            .filter(|m| !m.is_empty())
            .ok_or(RelayError::MissingMessage)?;

        let client = self.chat_client.as_ref().ok_or(RelayError::NotConfigured)?;

        let history = request.conversation_history.unwrap_or_default();
        if history.len() > HISTORY_FOR_PROMPT_LEN {
            debug!(
                "Truncating conversation history from {} to {} entries",
                history.len(),
                HISTORY_FOR_PROMPT_LEN
            );
        }

        let full_prompt = prompt::get_chat_prompt(&self.prompt_config, &history, &message);

        match tokio::time::timeout(self.upstream_timeout, client.complete(&full_prompt)).await {
            Ok(Ok(resp)) => Ok(resp.response),
            Ok(Err(e)) => Err(RelayError::Upstream(e.to_string())),
            Err(_) => Err(RelayError::Timeout(self.upstream_timeout)),
        }
    }
}
