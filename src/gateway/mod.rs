//! Language model gateway.
//!
//! The orchestrator only sees the [`ChatModel`] trait: it hands over the whole
//! transcript plus the tool catalog and gets back exactly one assistant turn.

mod openai;

pub use openai::OpenAIGateway;

use crate::agent::{Message, ToolCallRequest};
use crate::error::Result;
use crate::tools::ToolSpec;
use async_trait::async_trait;

/// Token counters reported by the provider for one request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// One assistant turn returned by the model.
#[derive(Debug, Clone, Default)]
pub struct ModelReply {
    /// Provider-assigned response id.
    pub id: String,
    /// Model that actually served the request.
    pub model: String,
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCallRequest>,
    pub usage: Usage,
}

impl ModelReply {
    /// Convert into the transcript entry for this turn.
    pub fn to_message(&self) -> Message {
        Message::Assistant {
            content: self.content.clone(),
            tool_calls: self.tool_calls.clone(),
        }
    }
}

/// Trait for chat completion backends.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Request the next assistant turn for `transcript`, advertising `tools`.
    async fn complete(&self, transcript: &[Message], tools: &[ToolSpec]) -> Result<ModelReply>;
}
