//! Conversation transcript sent to the model on every request.

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCallRequest {
    /// Opaque call identifier echoed back in the matching tool result.
    pub id: String,
    /// Name of the requested tool.
    pub name: String,
    /// Raw JSON argument payload, exactly as produced by the model.
    pub arguments: String,
}

/// One entry of the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    System {
        content: String,
    },
    User {
        content: String,
    },
    Assistant {
        content: Option<String>,
        tool_calls: Vec<ToolCallRequest>,
    },
    Tool {
        call_id: String,
        content: String,
    },
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Message::System {
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Message::User {
            content: content.into(),
        }
    }

    pub fn tool(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Message::Tool {
            call_id: call_id.into(),
            content: content.into(),
        }
    }

    /// Tool calls carried by an assistant message; empty for every other role.
    pub fn tool_calls(&self) -> &[ToolCallRequest] {
        match self {
            Message::Assistant { tool_calls, .. } => tool_calls,
            _ => &[],
        }
    }
}

/// Ordered, append-only message history.
///
/// There is no way to remove or rewrite an entry once pushed.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Call ids requested by assistant messages that have no tool result yet.
    pub fn pending_tool_calls(&self) -> Vec<&str> {
        let mut pending: Vec<&str> = Vec::new();
        for message in &self.messages {
            match message {
                Message::Assistant { tool_calls, .. } => {
                    pending.extend(tool_calls.iter().map(|c| c.id.as_str()));
                }
                Message::Tool { call_id, .. } => {
                    pending.retain(|id| id != call_id);
                }
                _ => {}
            }
        }
        pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(id: &str) -> ToolCallRequest {
        ToolCallRequest {
            id: id.to_string(),
            name: "shell".to_string(),
            arguments: "{}".to_string(),
        }
    }

    #[test]
    fn test_pending_tool_calls_cleared_by_results() {
        let mut transcript = Transcript::new();
        transcript.push(Message::user("hi"));
        transcript.push(Message::Assistant {
            content: None,
            tool_calls: vec![call("a"), call("b")],
        });
        assert_eq!(transcript.pending_tool_calls(), vec!["a", "b"]);

        transcript.push(Message::tool("a", "ok"));
        assert_eq!(transcript.pending_tool_calls(), vec!["b"]);

        transcript.push(Message::tool("b", "ok"));
        assert!(transcript.pending_tool_calls().is_empty());
    }

    #[test]
    fn test_tool_calls_only_on_assistant() {
        assert!(Message::user("x").tool_calls().is_empty());
        let msg = Message::Assistant {
            content: Some("done".to_string()),
            tool_calls: vec![call("1")],
        };
        assert_eq!(msg.tool_calls().len(), 1);
    }
}
