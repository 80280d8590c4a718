use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::BotResult;

pub mod calendar;
pub mod llm;
pub mod router;

pub use calendar::CalendarAgent;
pub use llm::{LlmProvider, RigModel};
pub use router::{Capability, RouteState, Router};

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message of the running conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Latest user message of a conversation
pub fn last_user_message(history: &[ChatMessage]) -> Option<&ChatMessage> {
    history.iter().rev().find(|m| m.role == Role::User)
}

/// Messages preceding the latest user message
pub fn earlier_turns(history: &[ChatMessage]) -> &[ChatMessage] {
    match history.iter().rposition(|m| m.role == Role::User) {
        Some(index) => &history[..index],
        None => history,
    }
}

/// Text completion over a conversation
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Answer `prompt` under the system instructions in `preamble`, following
    /// the earlier turns in `history`
    async fn chat(&self, preamble: &str, prompt: &str, history: &[ChatMessage]) -> BotResult<String>;

    /// Single-shot completion without prior turns
    async fn complete(&self, preamble: &str, prompt: &str) -> BotResult<String> {
        self.chat(preamble, prompt, &[]).await
    }
}

/// Specialized responder for one capability
#[async_trait]
pub trait Handler: Send + Sync {
    /// Name of the handler, as shown in the routing graph
    fn name(&self) -> &'static str;

    /// Produce a reply to the latest user message of `history`
    async fn respond(&self, history: &[ChatMessage]) -> BotResult<ChatMessage>;
}
