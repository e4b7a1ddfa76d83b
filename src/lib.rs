//! tinyagent - a small tool-calling agent
//!
//! Sends each line typed at the prompt to a language model, lets the model
//! run shell commands, postgres queries and web searches, feeds the results
//! back and prints the final answer together with timing statistics.
//!
//! # Architecture
//!
//! - `agent` - Transcript, turn statistics and the conversation loop
//! - `tools` - Tool catalog, argument decoding, dispatch and executors
//! - `gateway` - Model gateway abstraction and the OpenAI backend
//! - `config` - Configuration management
//! - `cli` - Interactive loop, history and console output
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tinyagent::agent::Conversation;
//! use tinyagent::config::Settings;
//! use tinyagent::gateway::OpenAIGateway;
//! use tinyagent::tools::ToolBox;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let model = Arc::new(OpenAIGateway::new(&settings.model)?);
//!     let tools = Arc::new(ToolBox::from_settings(&settings.tools)?);
//!
//!     let mut conversation = Conversation::new(model, tools, &settings.model.system_prompt);
//!     let answer = conversation.handle_turn("How much disk space is free?").await?;
//!     println!("{}", answer);
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod openai;
pub mod tools;

#[cfg(test)]
mod testing;

pub use error::{AgentError, Result};
