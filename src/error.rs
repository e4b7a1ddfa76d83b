//! Error types for tinyagent.

use thiserror::Error;

/// Library-level error type for tinyagent operations.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("model gateway error: {0}")]
    Gateway(String),

    #[error("invalid tool arguments: {0}")]
    Decode(String),

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("{tool}: missing required argument '{field}'")]
    MissingArgument { tool: &'static str, field: &'static str },

    #[error("missing query")]
    MissingQuery,

    #[error("tool execution failed: {0}")]
    ToolExecution(String),

    #[error("search http status {0}")]
    SearchHttp(u16),

    #[error("tool call denied: {0}")]
    ToolDenied(String),

    #[error("turn aborted: tool-call limit exceeded ({0} rounds)")]
    ToolLimitExceeded(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Result type alias for tinyagent operations.
pub type Result<T> = std::result::Result<T, AgentError>;
