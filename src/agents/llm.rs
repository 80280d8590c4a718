use async_trait::async_trait;
use rig::completion::{Chat, Message};
use rig::providers::{gemini, openai};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

use super::{ChatMessage, LanguageModel, Role};
use crate::error::{config_error, llm_error, BotResult, Error};

/// Hosted model family used for completions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    OpenAi,
    Gemini,
}

impl LlmProvider {
    /// Environment variable holding the API key
    pub fn api_key_var(&self) -> &'static str {
        match self {
            LlmProvider::OpenAi => "OPENAI_API_KEY",
            LlmProvider::Gemini => "GEMINI_API_KEY",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            LlmProvider::OpenAi => "gpt-4o-mini",
            LlmProvider::Gemini => "gemini-2.0-flash",
        }
    }
}

impl FromStr for LlmProvider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(LlmProvider::OpenAi),
            "gemini" => Ok(LlmProvider::Gemini),
            other => Err(config_error(&format!("Unknown LLM provider: {}", other))),
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmProvider::OpenAi => write!(f, "openai"),
            LlmProvider::Gemini => write!(f, "gemini"),
        }
    }
}

enum Backend {
    OpenAi(openai::Client),
    Gemini(gemini::Client),
}

/// Language model served through Rig
pub struct RigModel {
    backend: Backend,
    model: String,
    temperature: f64,
}

impl RigModel {
    pub fn new(provider: LlmProvider, api_key: &str, model: &str, temperature: f64) -> Self {
        info!("Using {} model: {}", provider, model);

        let backend = match provider {
            LlmProvider::OpenAi => Backend::OpenAi(openai::Client::new(api_key)),
            LlmProvider::Gemini => Backend::Gemini(gemini::Client::new(api_key)),
        };

        Self {
            backend,
            model: model.to_string(),
            temperature,
        }
    }
}

fn to_rig_message(message: &ChatMessage) -> Message {
    match message.role {
        Role::User => Message::user(message.content.clone()),
        Role::Assistant => Message::assistant(message.content.clone()),
    }
}

#[async_trait]
impl LanguageModel for RigModel {
    async fn chat(&self, preamble: &str, prompt: &str, history: &[ChatMessage]) -> BotResult<String> {
        debug!(
            "Sending prompt to {} with {} earlier messages",
            self.model,
            history.len()
        );
        let chat_history: Vec<Message> = history.iter().map(to_rig_message).collect();

        let response = match &self.backend {
            Backend::OpenAi(client) => {
                let agent = client
                    .agent(&self.model)
                    .preamble(preamble)
                    .temperature(self.temperature)
                    .build();
                agent.chat(prompt.to_string(), chat_history).await
            }
            Backend::Gemini(client) => {
                let agent = client
                    .agent(&self.model)
                    .preamble(preamble)
                    .temperature(self.temperature)
                    .build();
                agent.chat(prompt.to_string(), chat_history).await
            }
        }
        .map_err(|e| llm_error(&format!("Rig API request failed: {}", e)))?;

        Ok(response)
    }
}
