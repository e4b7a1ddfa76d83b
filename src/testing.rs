//! Test doubles for the model gateway and the tool dispatcher.

use crate::agent::{Message, ToolCallRequest};
use crate::error::{AgentError, Result};
use crate::gateway::{ChatModel, ModelReply, Usage};
use crate::tools::{tool_catalog, ToolDispatcher, ToolSpec};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Build a tool call request.
pub fn call(id: &str, name: &str, arguments: &str) -> ToolCallRequest {
    ToolCallRequest {
        id: id.to_string(),
        name: name.to_string(),
        arguments: arguments.to_string(),
    }
}

/// A final text reply.
pub fn text_reply(content: &str, total_tokens: u32) -> ModelReply {
    ModelReply {
        id: "resp".to_string(),
        model: "scripted".to_string(),
        content: Some(content.to_string()),
        tool_calls: Vec::new(),
        usage: Usage {
            prompt_tokens: total_tokens / 2,
            completion_tokens: total_tokens - total_tokens / 2,
            total_tokens,
        },
    }
}

/// A reply requesting tool calls.
pub fn tool_reply(calls: Vec<ToolCallRequest>, total_tokens: u32) -> ModelReply {
    ModelReply {
        content: None,
        tool_calls: calls,
        ..text_reply("", total_tokens)
    }
}

/// Model that replays a fixed script and records every transcript it sees.
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<ModelReply>>>,
    seen: Mutex<Vec<Vec<Message>>>,
    tools_seen: Mutex<Vec<usize>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<Result<ModelReply>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Self::default()
        }
    }

    /// Model that asks for a shell call forever.
    pub fn looping(rounds: usize) -> Self {
        let replies = (0..rounds)
            .map(|i| {
                Ok(tool_reply(
                    vec![call(&format!("loop_{}", i), "shell", r#"{"command":"true"}"#)],
                    1,
                ))
            })
            .collect();
        Self::new(replies)
    }

    /// Transcripts passed to each request, in order.
    pub fn seen(&self) -> Vec<Vec<Message>> {
        self.seen.lock().unwrap().clone()
    }

    /// Number of catalog entries passed to each request.
    pub fn tools_seen(&self) -> Vec<usize> {
        self.tools_seen.lock().unwrap().clone()
    }

    pub fn requests(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(&self, transcript: &[Message], tools: &[ToolSpec]) -> Result<ModelReply> {
        self.seen.lock().unwrap().push(transcript.to_vec());
        self.tools_seen.lock().unwrap().push(tools.len());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AgentError::Gateway("script exhausted".to_string())))
    }
}

/// Dispatcher that records calls and answers from a table.
#[derive(Default)]
pub struct RecordingDispatcher {
    outputs: HashMap<String, String>,
    calls: Mutex<Vec<(String, String)>>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer calls to `name` with `output`.
    pub fn with_output(mut self, name: &str, output: &str) -> Self {
        self.outputs.insert(name.to_string(), output.to_string());
        self
    }

    /// `(name, arguments)` of every dispatched call, in order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ToolDispatcher for RecordingDispatcher {
    fn catalog(&self) -> Vec<ToolSpec> {
        tool_catalog()
    }

    async fn dispatch(&self, name: &str, arguments: &str) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((name.to_string(), arguments.to_string()));
        self.outputs
            .get(name)
            .cloned()
            .ok_or_else(|| AgentError::UnknownTool(name.to_string()))
    }
}
