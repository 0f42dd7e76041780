#[cfg(test)]
#[path = "gemini_test.rs"]
mod tests;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use log::{debug, info};

use super::{ChatClient, CompletionResponse};
use crate::llm::LlmConfig;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Deserialize)]
struct GoogleResponse {
    #[serde(default)]
    candidates: Vec<GoogleCandidate>,
}

#[derive(Deserialize)]
struct GoogleCandidate {
    content: Option<GoogleContent>,
}

#[derive(Deserialize)]
struct GoogleContent {
    #[serde(default)]
    parts: Vec<GooglePart>,
}

#[derive(Deserialize)]
struct GooglePart {
    #[serde(default)]
    text: Option<String>,
}

fn extract_text(resp: GoogleResponse) -> Option<String> {
    let content = resp.candidates.into_iter().next()?.content?;
    let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
    if text.trim().is_empty() { None } else { Some(text) }
}

pub struct GeminiChatClient {
    http: HttpClient,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiChatClient {
    pub fn new(
        api_key: String,
        model: Option<String>,
        base_url: Option<String>
    ) -> Self {
        let chat_model = model.unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
        let url = base_url.unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string());

        Self {
            http: HttpClient::new(),
            api_key,
            model: chat_model,
            base_url: url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let api_key = config.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| "Google API key is required for GeminiChatClient".to_string())?;

        Ok(Self::new(api_key, config.completion_model.clone(), config.base_url.clone()))
    }
}

#[async_trait]
impl ChatClient for GeminiChatClient {
    async fn complete(
        &self,
        prompt: &str
    ) -> Result<CompletionResponse, Box<dyn StdError + Send + Sync>> {
        info!(
            "GeminiChatClient::complete() → model={} base_url={}",
            self.model,
            self.base_url
        );

        let payload = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart { text: prompt.to_string() }],
            }],
        };

        let url = format!(
            "{url}/v1beta/models/{model}:generateContent",
            url = self.base_url,
            model = self.model
        );

        // Error text is logged; it must never contain the key.
        let resp = self.http
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| e.without_url())?;
        let status = resp.status();
        if !status.is_success() {
            return Err(format!("Gemini returned status {}", status.as_u16()).into());
        }

        let data = resp.json::<GoogleResponse>().await.map_err(|e| e.without_url())?;
        let text = extract_text(data).ok_or_else(|| "Gemini returned no usable text".to_string())?;
        debug!("Gemini returned {} characters", text.len());

        Ok(CompletionResponse { response: text })
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }

    fn get_base_url(&self) -> Option<String> {
        Some(self.base_url.clone())
    }
}
