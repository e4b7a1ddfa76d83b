//! Conversation orchestration with tool calling.
//!
//! A [`Conversation`] owns the transcript and drives each user turn through
//! as many model requests and tool calls as the model asks for, collecting
//! [`TurnStats`] along the way.

mod runner;
mod stats;
mod transcript;

pub use runner::{Conversation, DEFAULT_MAX_TOOL_ROUNDS};
pub use stats::{TurnReport, TurnStats};
pub use transcript::{Message, ToolCallRequest, Transcript};
