#[cfg(test)]
#[path = "prompt_test.rs"]
mod tests;

use serde::Deserialize;
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use log::info;

use crate::history::format_history_for_prompt;
use crate::models::chat::HistoryEntry;

pub const DEFAULT_PERSONA: &str = r#"
You are "Ask VIKI" - Vikyath's witty AI assistant. Keep responses concise (2-3 sentences max), professional yet friendly, and add subtle humor when appropriate.

VIKI's Core Info:
- Name: Sai Vikyath R Komatireddy
- Role: Software Engineer & Data Scientist
- Education: MS Data Science (Stony Brook), BS CS (IIT Guwahati)
- Key Skills: AI/ML, Full-Stack Dev, Data Science, Cloud
- Tech Stack: Python, React, Next.js, FastAPI, Docker, K8s, Spring Boot, Kafka, MongoDB

Experience Highlights:
- Oracle (2022-2023): Built AI doc assistant (95%+ success rate), fraud detection system
- SalVenture Tech (2024-2025): Led website dev, custom LLM chatbot, CI/CD pipelines
- AI Innovation Institute (2024-2025): 3D scene graph platform, 25% accuracy boost

Projects:
- Query Mind: Semantic search engine (<1s latency, 40% precision boost)
- Music Rec System: Advanced ML with Spotify data, solved cold start problem

Personality: Loves fishing, hiking, running. Tackles complex problems like they're puzzles 🧩

Response Guidelines:
- Keep it short and sweet (2-3 sentences)
- Be enthusiastic but not overwhelming
- Add light humor when it fits naturally
- Always end positively about Vikyath's fit
- If asked about something not covered, redirect politely
- Use emojis sparingly but effectively
"#;

pub const DEFAULT_INSTRUCTIONS: &str = "\
- You are \"Ask VIKI\" - be concise, professional, and witty
- Keep responses to 2-3 sentences maximum
- Use the profile info above to answer accurately
- Add subtle humor when appropriate (but keep it professional)
- Always end with a positive note about Vikyath's capabilities
- If asked about something not covered, redirect politely
- Use 1-2 emojis max, only when they enhance the message";

#[derive(Debug)]
pub enum PromptError {
    EmptyTemplate(String),
    IoError(std::io::Error),
    JsonError(serde_json::Error),
}

impl fmt::Display for PromptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptError::EmptyTemplate(key) => write!(f, "Prompt template '{}' is empty", key),
            PromptError::IoError(e) => write!(f, "Prompt file IO error: {}", e),
            PromptError::JsonError(e) => write!(f, "Prompt JSON parsing error: {}", e),
        }
    }
}

impl Error for PromptError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PromptError::IoError(e) => Some(e),
            PromptError::JsonError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PromptError {
    fn from(err: std::io::Error) -> Self {
        PromptError::IoError(err)
    }
}

impl From<serde_json::Error> for PromptError {
    fn from(err: serde_json::Error) -> Self {
        PromptError::JsonError(err)
    }
}

/// Fixed text wrapped around every visitor question.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PromptConfig {
    pub persona: String,
    pub instructions: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            persona: DEFAULT_PERSONA.to_string(),
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
        }
    }
}

impl PromptConfig {
    fn validate(&self) -> Result<(), PromptError> {
        if self.persona.trim().is_empty() {
            return Err(PromptError::EmptyTemplate("persona".to_string()));
        }
        if self.instructions.trim().is_empty() {
            return Err(PromptError::EmptyTemplate("instructions".to_string()));
        }
        Ok(())
    }
}

pub fn load_prompts<P: AsRef<Path>>(path: P) -> Result<Arc<PromptConfig>, PromptError> {
    let file_content = fs::read_to_string(&path)?;
    let config: PromptConfig = serde_json::from_str(&file_content)?;
    config.validate()?;
    info!("Loaded prompt templates from {}", path.as_ref().display());
    Ok(Arc::new(config))
}

/// Built-in templates unless a prompts file is given.
pub fn load_prompts_or_default(path: Option<&str>) -> Result<Arc<PromptConfig>, PromptError> {
    match path {
        Some(p) if !p.trim().is_empty() => load_prompts(p),
        _ => {
            info!("Using built-in prompt templates");
            Ok(Arc::new(PromptConfig::default()))
        }
    }
}

pub fn get_chat_prompt(config: &PromptConfig, history: &[HistoryEntry], message: &str) -> String {
    let conversation_context = format_history_for_prompt(history);

    format!(
        "{persona}\n\nPrevious conversation context:\n{context}\n\nCurrent visitor question: {message}\n\nInstructions: \n{instructions}\n\nResponse (2-3 sentences max):",
        persona = config.persona,
        context = conversation_context,
        message = message,
        instructions = config.instructions
    )
}
