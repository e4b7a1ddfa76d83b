//! Conversation loop with tool calling.

use super::stats::TurnStats;
use super::transcript::{Message, Transcript, ToolCallRequest};
use crate::error::{AgentError, Result};
use crate::gateway::ChatModel;
use crate::tools::{ToolDispatcher, ToolSpec};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Longest argument preview written to the log.
const ARGS_PREVIEW_CHARS: usize = 300;

/// Default cap on tool-call rounds in a single turn.
pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 25;

/// A conversation with a model that may call tools.
///
/// Owns the transcript for the lifetime of the session. Each call to
/// [`Conversation::handle_turn`] appends the user input, then alternates
/// between model requests and tool execution until the model answers
/// without requesting tools.
pub struct Conversation {
    model: Arc<dyn ChatModel>,
    tools: Arc<dyn ToolDispatcher>,
    catalog: Vec<ToolSpec>,
    transcript: Transcript,
    stats: TurnStats,
    max_tool_rounds: usize,
}

impl Conversation {
    /// Start a conversation whose first message is `system_prompt`.
    pub fn new(
        model: Arc<dyn ChatModel>,
        tools: Arc<dyn ToolDispatcher>,
        system_prompt: &str,
    ) -> Self {
        let mut transcript = Transcript::new();
        transcript.push(Message::system(system_prompt));
        let catalog = tools.catalog();

        Self {
            model,
            tools,
            catalog,
            transcript,
            stats: TurnStats::default(),
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
        }
    }

    /// Set the maximum number of tool-call rounds per turn. 0 means no limit.
    pub fn with_max_tool_rounds(mut self, max: usize) -> Self {
        self.max_tool_rounds = max;
        self
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Stats of the current or most recent turn.
    pub fn stats(&self) -> &TurnStats {
        &self.stats
    }

    /// Hand out the stats of the last turn and reset them.
    pub fn take_stats(&mut self) -> TurnStats {
        std::mem::take(&mut self.stats)
    }

    /// Process one user turn and return the model's final answer.
    ///
    /// Tool failures are reported back to the model as `"error ..."` results.
    /// Model request failures and the round limit end the turn with an error;
    /// the conversation stays usable afterwards.
    pub async fn handle_turn(&mut self, input: &str) -> Result<String> {
        self.stats = TurnStats::default();
        self.transcript.push(Message::user(input));

        let mut rounds = 0;

        loop {
            debug!(
                "Requesting model, round {}, {} messages",
                rounds + 1,
                self.transcript.len()
            );

            let start = Instant::now();
            let reply = self
                .model
                .complete(self.transcript.messages(), &self.catalog)
                .await;
            let elapsed = start.elapsed();

            let reply = match reply {
                Ok(reply) => reply,
                Err(e) => {
                    error!(err = %e, elapsed = ?elapsed, "llm call failed");
                    return Err(e);
                }
            };

            self.stats.record_llm_call(elapsed, reply.usage.total_tokens);
            info!(
                id = %reply.id,
                model = %reply.model,
                prompt_tokens = reply.usage.prompt_tokens,
                completion_tokens = reply.usage.completion_tokens,
                total_tokens = reply.usage.total_tokens,
                elapsed = ?elapsed,
                "llm usage"
            );

            self.transcript.push(reply.to_message());

            if reply.tool_calls.is_empty() {
                return Ok(reply.content.unwrap_or_default());
            }

            if self.max_tool_rounds > 0 && rounds >= self.max_tool_rounds {
                // Every requested call still gets a result message.
                let err = AgentError::ToolLimitExceeded(rounds);
                for call in &reply.tool_calls {
                    self.transcript
                        .push(Message::tool(&call.id, format!("error {}", err)));
                }
                warn!(
                    rounds,
                    requested = reply.tool_calls.len(),
                    "tool-call limit reached, aborting turn"
                );
                return Err(err);
            }

            for call in &reply.tool_calls {
                let output = self.run_tool(call).await;
                self.transcript.push(Message::tool(&call.id, output));
            }

            rounds += 1;
        }
    }

    /// Run one requested tool and turn its outcome into result text.
    async fn run_tool(&mut self, call: &ToolCallRequest) -> String {
        info!(
            id = %call.id,
            name = %call.name,
            args = %args_preview(&call.arguments),
            "tool call"
        );

        let start = Instant::now();
        let result = self.tools.dispatch(&call.name, &call.arguments).await;
        let elapsed = start.elapsed();
        self.stats.record_tool_call(elapsed);

        info!(
            calls = self.stats.tool_calls,
            last_duration = ?elapsed,
            total_tool_time = ?self.stats.tool_time,
            ok = result.is_ok(),
            "tool metrics"
        );

        match result {
            Ok(output) => output,
            Err(e) => {
                error!(id = %call.id, name = %call.name, err = %e, "error in tool call");
                format!("error {}", e)
            }
        }
    }
}

/// Shorten tool arguments for logging.
fn args_preview(arguments: &str) -> String {
    let mut chars = arguments.char_indices();
    match chars.nth(ARGS_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}… (truncated)", &arguments[..cut]),
        None => arguments.to_string(),
    }
}
